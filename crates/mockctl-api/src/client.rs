// Admin API HTTP client
//
// Wraps `reqwest::Client` with base-URL path joining, `{ data: [] }`
// envelope unwrapping and verbatim error payload capture. Resource
// endpoints (services, service actions, reference data) are implemented
// as inherent methods in separate files to keep this module focused on
// transport mechanics.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{DataEnvelope, FlagEncoding};
use crate::transport::TransportConfig;

/// Scope segment used when a list is requested without a group.
pub const ALL_GROUPS: &str = "all";

/// Raw HTTP client for the mock server's admin API.
///
/// All list methods return unwrapped `data` payloads; the envelope is
/// stripped before the caller sees it. Error responses keep their body
/// verbatim in [`Error::Api`].
pub struct AdminClient {
    http: reqwest::Client,
    base_url: Url,
    flag_encoding: FlagEncoding,
}

impl AdminClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// The `base_url` is the server root, optionally with a path prefix
    /// (e.g. `http://localhost:9010` or `https://tools/mockserver/`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, Self::check_base_url(base_url)?))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            flag_encoding: FlagEncoding::default(),
        }
    }

    /// Choose how yes/no flags are written into request bodies.
    #[must_use]
    pub fn with_flag_encoding(mut self, encoding: FlagEncoding) -> Self {
        self.flag_encoding = encoding;
        self
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn flag_encoding(&self) -> FlagEncoding {
        self.flag_encoding
    }

    fn check_base_url(url: Url) -> Result<Url, Error> {
        if url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(url.to_string()));
        }
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append percent-encoded path segments to the base URL.
    ///
    /// `endpoint(&["services", "all", "findall"])` on `http://h:9010/x`
    /// yields `http://h:9010/x/services/all/findall`.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET a `findall`-style endpoint and unwrap the `data` envelope.
    pub(crate) async fn get_list<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, Error> {
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        let envelope: DataEnvelope<T> = self.handle_response(resp).await?;
        Ok(envelope.data)
    }

    /// GET a single bare JSON object.
    pub(crate) async fn get_one<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    /// GET an action endpoint whose response body is not interesting.
    pub(crate) async fn get_empty(&self, url: Url) -> Result<(), Error> {
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        self.handle_empty(resp).await
    }

    /// PUT an already-encoded JSON body. The response body is ignored.
    pub(crate) async fn put_json(&self, url: Url, body: &Value) -> Result<(), Error> {
        debug!("PUT {url}");
        trace!(%body, "request body");
        let resp = self.http.put(url).json(body).send().await?;
        self.handle_empty(resp).await
    }

    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {url}");
        let resp = self.http.delete(url).send().await?;
        self.handle_empty(resp).await
    }

    /// Encode a record for the wire, applying the flag encoding to the
    /// named flag fields.
    pub(crate) fn encode<T: serde::Serialize>(
        &self,
        record: &T,
        flag_fields: &[&str],
    ) -> Result<Value, Error> {
        let mut body =
            serde_json::to_value(record).map_err(|e| Error::Serialization(e.to_string()))?;
        self.flag_encoding.apply(&mut body, flag_fields);
        Ok(body)
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        Error::Api {
            status: status.as_u16(),
            body: if raw.is_empty() {
                status.to_string()
            } else {
                raw
            },
        }
    }
}
