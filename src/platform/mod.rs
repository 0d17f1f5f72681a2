//! Concrete implementations of the core's outer boundaries
//!
//! The INI credential file loader and the XML-over-HTTPS management API
//! transport. All I/O is isolated here; `core` only sees the traits.

pub mod config_file;
pub mod xml_api;

pub use config_file::{load_config, parse_config};
pub use xml_api::{XmlApiClient, XmlApiConnector};
