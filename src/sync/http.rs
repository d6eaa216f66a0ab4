//! HTTP transport to the remote authority.
//!
//! Thin blocking `reqwest` client over the fixed path namespace:
//!
//! ```text
//! POST /sessions                      {gmId}     -> {code, gmId, state}
//! GET  /sessions/{code}                          -> state
//! POST /sessions/{code}/join          {playerId} -> {state}
//! POST /sessions/{code}/command       request    -> {accepted, errors, events, state}
//! GET  /content/cards                            -> [cardDefinition]
//! ```
//!
//! Path segments are percent-encoded. Non-success statuses become
//! `ApiError::status` with the body parsed as JSON when possible, or kept
//! as a JSON string otherwise.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use super::transport::{CreateSessionResponse, EngineResponse, JoinSessionResponse, Transport};
use crate::cards::CardDefinition;
use crate::core::{ClientConfig, CommandRequest, PlayerId, SessionState};
use crate::error::ApiError;

/// Blocking HTTP client for the authority API.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Build a client for `config.base_url` with the configured timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::transport(format!("invalid base url {}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::transport(format!(
                "invalid base url {}",
                config.base_url
            )));
        }
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::transport(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::transport("invalid base url"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn call<R: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&dyn ErasedBody>,
    ) -> Result<R, ApiError> {
        let url = self.url(segments)?;
        log::debug!(target: "duel_tower::sync", "{method} {url}");

        let mut builder: RequestBuilder = self.client.request(method, url);
        if let Some(body) = body {
            builder = builder.json(&body.to_value()?);
        }

        let response = builder
            .send()
            .map_err(|e| ApiError::transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .map_err(|e| ApiError::transport(e.to_string()))?;

        if !status.is_success() {
            let body = (!text.is_empty())
                .then(|| serde_json::from_str(&text).unwrap_or(Value::String(text)));
            return Err(ApiError::status(status.as_u16(), body));
        }

        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| ApiError::decode(e.to_string()))
    }
}

/// Request body that can be turned into JSON.
pub(crate) trait ErasedBody {
    fn to_value(&self) -> Result<Value, ApiError>;
}

impl<T: Serialize> ErasedBody for T {
    fn to_value(&self) -> Result<Value, ApiError> {
        serde_json::to_value(self).map_err(|e| ApiError::decode(e.to_string()))
    }
}

impl Transport for HttpTransport {
    fn create_session(&mut self, gm_id: &PlayerId) -> Result<CreateSessionResponse, ApiError> {
        self.call(Method::POST, &["sessions"], Some(&json!({ "gmId": gm_id })))
    }

    fn session_state(&mut self, code: &str) -> Result<SessionState, ApiError> {
        self.call(Method::GET, &["sessions", code], None)
    }

    fn join_session(
        &mut self,
        code: &str,
        player_id: &PlayerId,
    ) -> Result<JoinSessionResponse, ApiError> {
        self.call(
            Method::POST,
            &["sessions", code, "join"],
            Some(&json!({ "playerId": player_id })),
        )
    }

    fn send_command(
        &mut self,
        code: &str,
        request: &CommandRequest,
    ) -> Result<EngineResponse, ApiError> {
        self.call(Method::POST, &["sessions", code, "command"], Some(request))
    }

    fn card_definitions(&mut self) -> Result<Vec<CardDefinition>, ApiError> {
        let raw: Vec<Value> = self.call(Method::GET, &["content", "cards"], None)?;
        Ok(raw.iter().map(CardDefinition::from_raw).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let config = ClientConfig::default().with_base_url("http://localhost:8080/api/");
        let http = HttpTransport::new(&config).unwrap();

        let url = http.url(&["sessions", "AB C", "join"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/sessions/AB%20C/join");
    }

    #[test]
    fn test_rejects_bad_base() {
        let config = ClientConfig::default().with_base_url("not a url");
        assert!(HttpTransport::new(&config).is_err());
    }

    #[test]
    fn test_unreachable_is_transport_error() {
        let config = ClientConfig::default().with_base_url("http://127.0.0.1:9/api");
        let mut http = HttpTransport::new(&config).unwrap();

        let err = http.session_state("ABC123").unwrap_err();
        assert!(err.is_transport());
    }
}
