//! Blocking client for the remote question service.

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;
use tutor_model::QuestionBank;

use crate::config::SourceSettings;
use crate::error::{Result, SourceError};
use crate::file::parse_bank;
use crate::types::{ErrorBody, FetchRequest};

const USER_AGENT_VALUE: &str = concat!("long-multiplication/", env!("CARGO_PKG_VERSION"));

/// Anything that can produce a fresh question bank. The refresher runs
/// sources on a background thread.
pub trait BankSource: Send + 'static {
    fn fetch(&self) -> Result<QuestionBank>;
}

#[derive(Debug, Clone)]
pub struct QuestionClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    request: FetchRequest,
}

impl QuestionClient {
    /// Builds a client from settings. Fails with [`SourceError::Disabled`]
    /// when the remote source is turned off.
    pub fn new(settings: &SourceSettings) -> Result<Self> {
        if !settings.enabled {
            return Err(SourceError::Disabled);
        }
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout())
            .build()
            .map_err(|e| SourceError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            request: FetchRequest {
                tag: settings.tag.clone(),
                device_id: settings.device_id.clone(),
            },
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POSTs the fetch request and parses the reply into a bank.
    pub fn fetch(&self) -> Result<QuestionBank> {
        debug!("Fetching question bank from {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.request)
            .send()?;
        let body = handle_response(response)?;

        parse_bank(&body)
    }
}

impl BankSource for QuestionClient {
    fn fetch(&self) -> Result<QuestionBank> {
        QuestionClient::fetch(self)
    }
}

/// Checks the status and returns the body text of a successful reply.
fn handle_response(response: reqwest::blocking::Response) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(http_error(status.as_u16(), &body));
    }
    Ok(response.text()?)
}

/// Error for a non-success reply. The body's `message` is used when
/// present; a JSON body without one reads "Server error", and a body
/// that is not JSON reads "Unknown error".
pub(crate) fn http_error(status: u16, body: &str) -> SourceError {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            message: Some(message),
        }) if !message.is_empty() => message,
        Ok(_) => "Server error".to_string(),
        Err(_) => "Unknown error".to_string(),
    };
    SourceError::Http { status, message }
}
