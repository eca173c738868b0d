//! Blocking HTTP capability used by the CI and liveness pollers.
//!
//! Pollers only see the `Transport` trait so they can be exercised with a
//! canned transport in tests.

use crate::error::{Error, Result};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Transport {
    /// Issue a GET request with the given extra headers.
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse>;
}

/// GET `url` and decode a JSON body; non-2xx statuses are errors.
pub fn get_json<T: DeserializeOwned>(transport: &dyn Transport, url: &str) -> Result<T> {
    let resp = transport.get(url, &[])?;
    if !resp.is_success() {
        return Err(Error::http(url, format!("unexpected status {}", resp.status)));
    }
    Ok(serde_json::from_str(&resp.body)?)
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!("qadash/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        let mut req = self.client.get(url);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let resp = req.send().map_err(|e| Error::http(url, e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(|e| Error::http(url, e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeTransport;
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Payload {
        value: u32,
    }

    #[test]
    fn test_get_json_decodes_body() {
        let t = FakeTransport::default().with("http://ci/api", 200, r#"{"value": 7}"#);
        let p: Payload = get_json(&t, "http://ci/api").unwrap();
        assert_eq!(p.value, 7);
    }

    #[test]
    fn test_get_json_rejects_status_and_bad_json() {
        let t = FakeTransport::default()
            .with("http://ci/down", 503, "")
            .with("http://ci/garbage", 200, "<html>");
        assert!(matches!(
            get_json::<Payload>(&t, "http://ci/down"),
            Err(Error::Http { .. })
        ));
        assert!(matches!(
            get_json::<Payload>(&t, "http://ci/garbage"),
            Err(Error::Json(_))
        ));
        assert!(get_json::<Payload>(&t, "http://ci/missing").is_err());
    }
}
