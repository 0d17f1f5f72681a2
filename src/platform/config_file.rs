//! INI credential file loader
//!
//! ```ini
//! [DEFAULT]
//! username = admin
//! password = secret
//!
//! [10.1.1.1]
//! type = ucsm
//! alternates = 10.1.1.2 10.1.1.3
//! ```

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::Path;

use ini::{Ini, ParseOption};

use crate::core::{ConfigSection, ConfigSnapshot};
use crate::utils::ConfigError;

/// Values are taken verbatim: no quote stripping or backslash escapes, so
/// passwords containing `\` or `"` survive.
fn parse_options() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
    }
}

/// Load the credential file at `path`
///
/// # Errors
/// * `FileNotFound` / `FileUnreadable` - checked before parsing
/// * `Parse` - malformed INI
pub fn load_config(path: &Path) -> Result<ConfigSnapshot, ConfigError> {
    ensure_readable(path)?;
    let ini = Ini::load_from_file_opt(path, parse_options())
        .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), "loaded configuration file");
    Ok(snapshot_from_ini(&ini))
}

/// Parse credential file contents already in memory
pub fn parse_config(contents: &str) -> Result<ConfigSnapshot, ConfigError> {
    let ini = Ini::load_from_str_opt(contents, parse_options())
        .map_err(|e| ConfigError::Parse(e.to_string()))?;
    Ok(snapshot_from_ini(&ini))
}

fn ensure_readable(path: &Path) -> Result<(), ConfigError> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => {
            return Err(ConfigError::FileUnreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };

    if !meta.is_file() {
        return Err(ConfigError::FileUnreadable {
            path: path.to_path_buf(),
            reason: "not a regular file".to_string(),
        });
    }

    File::open(path)
        .map(|_| ())
        .map_err(|e| ConfigError::FileUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

fn snapshot_from_ini(ini: &Ini) -> ConfigSnapshot {
    let mut snapshot = ConfigSnapshot::new();
    for (name, props) in ini.iter() {
        let Some(name) = name else {
            let stray = props.iter().count();
            if stray > 0 {
                tracing::warn!(keys = stray, "ignoring keys outside of any section");
            }
            continue;
        };

        let mut section = ConfigSection::new();
        for (key, value) in props.iter() {
            section.insert(key, value.trim());
        }
        snapshot.insert_section(name, section);
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
[DEFAULT]
username = admin
password = p\\ss\"word

[10.1.1.1]
Type = ucsm
alternates = 10.1.1.2 10.1.1.3
";

    #[test]
    fn test_parse_sections_and_default() {
        let snapshot = parse_config(SAMPLE).unwrap();

        let default = snapshot.default_section().unwrap();
        assert_eq!(default.get("username"), Some("admin"));
        // Backslash and quote kept verbatim
        assert_eq!(default.get("password"), Some("p\\ss\"word"));

        let host = snapshot.section_for("10.1.1.1").unwrap();
        assert_eq!(host.get("type"), Some("ucsm"));
        assert_eq!(host.get("alternates"), Some("10.1.1.2 10.1.1.3"));
        assert!(snapshot.section_for("DEFAULT").is_none());
    }

    #[test]
    fn test_blank_value_is_kept_as_present() {
        let snapshot = parse_config("[10.1.1.1]\nalternates =\n").unwrap();
        let host = snapshot.section_for("10.1.1.1").unwrap();
        assert_eq!(host.get_raw("alternates"), Some(""));
        assert_eq!(host.get("alternates"), None);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let snapshot = load_config(file.path()).unwrap();
        assert!(snapshot.section_for("10.1.1.1").is_some());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.ini");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(ref p) if p == &path));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::FileUnreadable { .. }));
    }

    #[test]
    fn test_malformed_section_header() {
        let err = parse_config("[DEFAULT\nusername = admin\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
