//! UCS XML API transport over HTTPS
//!
//! UCS Manager and Cisco IMC share the same request shape: XML documents POSTed
//! to `/nuova`, authenticated with a cookie from `aaaLogin`. This module only
//! moves documents; fault semantics live in `core::session`.

use std::borrow::Cow;

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use reqwest::header::CONTENT_TYPE;

use crate::constants::{DEFAULT_API_PORT, XML_API_PATH};
use crate::core::{ApiConnector, LoginInfo, ManagedObject, ManagementApi, PropertyFilter};
use crate::models::{BackendKind, SecureString};
use crate::normalize::split_host_port;
use crate::utils::ApiError;

/// XML API client bound to one address
pub struct XmlApiClient {
    address: String,
    endpoint: String,
    http: reqwest::Client,
    cookie: Option<String>,
}

impl XmlApiClient {
    pub fn new(address: &str, verify_tls: bool) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(!verify_tls)
            .build()
            .map_err(|e| ApiError::Http(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            address: address.to_string(),
            endpoint: endpoint_url(address),
            http,
            cookie: None,
        })
    }

    async fn post(&self, body: String) -> Result<ParsedResponse, ApiError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::Http(format!("{} returned HTTP {}", self.address, status)));
        }

        let parsed = parse_response(&text)?;
        parsed.check_error()?;
        Ok(parsed)
    }
}

#[async_trait::async_trait]
impl ManagementApi for XmlApiClient {
    async fn login(
        &mut self,
        username: &str,
        password: &SecureString,
    ) -> Result<LoginInfo, ApiError> {
        let response = self.post(login_request(username, password)).await?;
        let cookie = response
            .root
            .attr("outCookie")
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ApiError::Malformed("aaaLogin response carried no cookie".to_string()))?;

        self.cookie = Some(cookie.to_string());
        Ok(LoginInfo {
            version: response.root.attr("outVersion").map(str::to_string),
        })
    }

    async fn resolve_class(
        &mut self,
        class_id: &str,
        filter: Option<&PropertyFilter>,
    ) -> Result<Vec<ManagedObject>, ApiError> {
        let cookie = self.cookie.as_deref().ok_or(ApiError::NotLoggedIn)?;
        let response = self
            .post(resolve_class_request(cookie, class_id, filter))
            .await?;

        Ok(response
            .objects
            .into_iter()
            .filter(|obj| obj.class_id == class_id)
            .collect())
    }

    async fn logout(&mut self) -> Result<(), ApiError> {
        let Some(cookie) = self.cookie.take() else {
            return Ok(());
        };
        self.post(logout_request(&cookie)).await.map(|_| ())
    }
}

/// Opens an [`XmlApiClient`] per candidate address
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlApiConnector {
    verify_tls: bool,
}

impl XmlApiConnector {
    pub fn new(verify_tls: bool) -> Self {
        Self { verify_tls }
    }
}

impl ApiConnector for XmlApiConnector {
    fn open(
        &self,
        address: &str,
        backend: BackendKind,
    ) -> Result<Box<dyn ManagementApi>, ApiError> {
        tracing::debug!(%address, %backend, verify_tls = self.verify_tls, "opening XML API client");
        Ok(Box::new(XmlApiClient::new(address, self.verify_tls)?))
    }
}

fn endpoint_url(address: &str) -> String {
    let (host, port) = split_host_port(address);
    let host = if host.contains(':') {
        format!("[{}]", host)
    } else {
        host
    };
    if port == DEFAULT_API_PORT {
        format!("https://{}{}", host, XML_API_PATH)
    } else {
        format!("https://{}:{}{}", host, port, XML_API_PATH)
    }
}

fn login_request(username: &str, password: &SecureString) -> String {
    format!(
        r#"<aaaLogin inName="{}" inPassword="{}" />"#,
        escape(username),
        escape(password.as_str())
    )
}

fn resolve_class_request(cookie: &str, class_id: &str, filter: Option<&PropertyFilter>) -> String {
    let filter_xml = match filter {
        Some(f) => format!(
            r#"<inFilter><eq class="{}" property="{}" value="{}" /></inFilter>"#,
            escape(f.class_id.as_str()),
            escape(f.property.as_str()),
            escape(f.value.as_str())
        ),
        None => String::new(),
    };
    format!(
        r#"<configResolveClass cookie="{}" classId="{}" inHierarchical="false">{}</configResolveClass>"#,
        escape(cookie),
        escape(class_id),
        filter_xml
    )
}

fn logout_request(cookie: &str) -> String {
    format!(r#"<aaaLogout inCookie="{}" />"#, escape(cookie))
}

/// Root element plus every nested element of an XML API response
#[derive(Debug, Default)]
struct ParsedResponse {
    root: ManagedObject,
    objects: Vec<ManagedObject>,
}

impl ParsedResponse {
    fn check_error(&self) -> Result<(), ApiError> {
        match self.root.attr("errorCode") {
            Some(code) => Err(ApiError::Rejected {
                code: code.to_string(),
                description: self
                    .root
                    .attr("errorDescr")
                    .unwrap_or("no description")
                    .to_string(),
            }),
            None => Ok(()),
        }
    }
}

fn element_to_object(element: &BytesStart<'_>) -> Result<ManagedObject, ApiError> {
    let mut obj = ManagedObject::new(String::from_utf8_lossy(element.name().as_ref()));
    for attr in element.attributes() {
        let attr = attr.map_err(|e| ApiError::Malformed(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value: Cow<'_, str> = attr
            .unescape_value()
            .map_err(|e| ApiError::Malformed(e.to_string()))?;
        obj.attributes.insert(key, value.into_owned());
    }
    Ok(obj)
}

fn parse_response(xml: &str) -> Result<ParsedResponse, ApiError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut root: Option<ManagedObject> = None;
    let mut objects = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let obj = element_to_object(&e)?;
                if root.is_none() {
                    root = Some(obj);
                } else {
                    objects.push(obj);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ApiError::Malformed(format!(
                    "at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
    }

    let root = root.ok_or_else(|| ApiError::Malformed("empty response".to_string()))?;
    Ok(ParsedResponse { root, objects })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        assert_eq!(endpoint_url("ucs-a"), "https://ucs-a/nuova");
        assert_eq!(endpoint_url("10.0.0.2:8443"), "https://10.0.0.2:8443/nuova");
        assert_eq!(endpoint_url("[fe80::1]:8443"), "https://[fe80::1]:8443/nuova");
    }

    #[test]
    fn test_login_request_escapes_credentials() {
        let body = login_request("admin", &SecureString::new("a<b&\"c"));
        assert_eq!(
            body,
            r#"<aaaLogin inName="admin" inPassword="a&lt;b&amp;&quot;c" />"#
        );
    }

    #[test]
    fn test_resolve_class_request_with_filter() {
        let filter = PropertyFilter::equal("faultInst", "severity", "critical");
        let body = resolve_class_request("cookie-1", "faultInst", Some(&filter));
        assert!(body.starts_with(r#"<configResolveClass cookie="cookie-1" classId="faultInst""#));
        assert!(body.contains(
            r#"<inFilter><eq class="faultInst" property="severity" value="critical" /></inFilter>"#
        ));
    }

    #[test]
    fn test_resolve_class_request_without_filter() {
        let body = resolve_class_request("cookie-1", "faultInst", None);
        assert!(!body.contains("inFilter"));
    }

    #[test]
    fn test_parse_login_response() {
        let xml = r#"<aaaLogin cookie="" response="yes" outCookie="1712345678/abcd" outRefreshPeriod="600" outPriv="admin" outVersion="4.1(3b)"> </aaaLogin>"#;
        let parsed = parse_response(xml).unwrap();
        parsed.check_error().unwrap();
        assert_eq!(parsed.root.class_id, "aaaLogin");
        assert_eq!(parsed.root.attr("outCookie"), Some("1712345678/abcd"));
        assert_eq!(parsed.root.attr("outVersion"), Some("4.1(3b)"));
    }

    #[test]
    fn test_parse_error_response() {
        let xml = r#"<aaaLogin cookie="" response="yes" errorCode="551" invocationResult="unidentified-fail" errorDescr="Authentication failed" />"#;
        let err = parse_response(xml).unwrap().check_error().unwrap_err();
        match err {
            ApiError::Rejected { code, description } => {
                assert_eq!(code, "551");
                assert_eq!(description, "Authentication failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_fault_list() {
        let xml = r#"<configResolveClass cookie="c" response="yes" classId="faultInst">
            <outConfigs>
                <faultInst ack="no" cause="link-down" code="F0283" created="2024-03-01T10:22:13.512" descr="ether port 1/17 oper state: link-down" dn="sys/switch-A/slot-1/switch-ether/port-17/fault-F0283" severity="major" />
                <faultInst ack="no" cause="thermal-problem" code="F0185" created="2024-03-03T12:40:02.118" descr="DIMM A1 temperature: upper-critical &amp; rising" dn="sys/chassis-1/blade-5/fault-F0185" severity="critical" />
            </outConfigs>
        </configResolveClass>"#;
        let parsed = parse_response(xml).unwrap();
        let faults: Vec<&ManagedObject> = parsed
            .objects
            .iter()
            .filter(|o| o.class_id == "faultInst")
            .collect();
        assert_eq!(faults.len(), 2);
        assert_eq!(faults[0].attr("code"), Some("F0283"));
        assert_eq!(
            faults[1].attr("descr"),
            Some("DIMM A1 temperature: upper-critical & rising")
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_response(""), Err(ApiError::Malformed(_))));
        assert!(matches!(
            parse_response("<a></b>"),
            Err(ApiError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_without_login_is_rejected() {
        let mut client = XmlApiClient::new("127.0.0.1", false).unwrap();
        let err = client.resolve_class("faultInst", None).await.unwrap_err();
        assert!(matches!(err, ApiError::NotLoggedIn));
        // Logout without a cookie is a no-op
        client.logout().await.unwrap();
    }
}
