//! Request signing seam
//!
//! Credential-based signing (SigV4) lives outside this crate. A [`Signer`] receives
//! the fully built request and adds whatever authentication headers it needs.

use http::{HeaderMap, HeaderValue, Method};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use url::Url;

use crate::error::{Error, Result};

/// A request ready to be signed.
#[derive(Debug, Clone)]
pub struct SignableRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute request URL
    pub url: Url,
    /// Headers; signers add to these
    pub headers: HeaderMap,
    /// Serialized body
    pub body: Vec<u8>,
}

/// Adds authentication to outbound requests.
pub trait Signer: Send + Sync + fmt::Debug {
    /// Sign `request` in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials cannot be applied.
    fn sign(&self, request: &mut SignableRequest) -> Result<()>;
}

/// Signs with a Bedrock API key sent as a bearer token.
#[derive(Debug, Clone)]
pub struct BearerTokenSigner {
    token: SecretString,
}

impl BearerTokenSigner {
    /// Create a signer from an API key.
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

impl Signer for BearerTokenSigner {
    fn sign(&self, request: &mut SignableRequest) -> Result<()> {
        let mut value =
            HeaderValue::from_str(&format!("Bearer {}", self.token.expose_secret()))
                .map_err(|_| Error::HttpClient("API key is not a valid header value".to_string()))?;
        value.set_sensitive(true);
        request.headers.insert(http::header::AUTHORIZATION, value);
        Ok(())
    }
}

/// Leaves requests untouched (pre-signed proxies, local endpoints).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSigner;

impl Signer for NoopSigner {
    fn sign(&self, _request: &mut SignableRequest) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SignableRequest {
        SignableRequest {
            method: Method::POST,
            url: Url::parse("https://bedrock-runtime.us-east-1.amazonaws.com/model/m/converse")
                .unwrap(),
            headers: HeaderMap::new(),
            body: b"{}".to_vec(),
        }
    }

    #[test]
    fn test_bearer_signer_sets_sensitive_header() {
        let signer = BearerTokenSigner::new(SecretString::from("abc123"));
        let mut req = request();
        signer.sign(&mut req).unwrap();

        let value = req.headers.get(http::header::AUTHORIZATION).unwrap();
        assert_eq!(value.to_str().unwrap(), "Bearer abc123");
        assert!(value.is_sensitive());
    }

    #[test]
    fn test_bearer_signer_rejects_invalid_token() {
        let signer = BearerTokenSigner::new(SecretString::from("bad\ntoken"));
        assert!(signer.sign(&mut request()).is_err());
    }

    #[test]
    fn test_noop_signer() {
        let mut req = request();
        NoopSigner.sign(&mut req).unwrap();
        assert!(req.headers.is_empty());
    }
}
