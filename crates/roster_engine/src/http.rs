use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use roster_core::{
    FetchError, Position, Registration, SubmissionError, TransportError, TransportKind, UsersPage,
};
use roster_logging::{roster_debug, roster_info};

use crate::envelope;
use crate::source::{DataSource, RegistrationToken};

pub const DEFAULT_BASE_URL: &str = "https://frontend-test-assignment-api.abz.agency/api/v1";
const TOKEN_HEADER: &str = "Token";

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Upper bound on a response body; larger bodies are treated as malformed.
    pub max_response_bytes: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_response_bytes: 1024 * 1024,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("invalid base url {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// [`DataSource`] backed by the registration REST service.
#[derive(Debug, Clone)]
pub struct HttpSource {
    settings: HttpSettings,
    base: Url,
    client: Client,
}

impl HttpSource {
    pub fn new(settings: HttpSettings) -> Result<Self, SetupError> {
        let base = Url::parse(&settings.base_url).map_err(|err| SetupError::InvalidBaseUrl {
            url: settings.base_url.clone(),
            message: err.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(SetupError::InvalidBaseUrl {
                url: settings.base_url.clone(),
                message: "url cannot carry a path".to_string(),
            });
        }
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self {
            settings,
            base,
            client,
        })
    }

    fn endpoint(&self, resource: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(resource);
        }
        url
    }

    async fn get(&self, url: Url) -> Result<(u16, Vec<u8>), FetchError> {
        roster_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = self.read_body(response).await?;
        Ok((status, body))
    }

    /// Reads the body in chunks, giving up once it exceeds the configured cap.
    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, FetchError> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::Malformed(format!(
                    "response of {content_len} bytes exceeds limit of {max_bytes}"
                )));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FetchError::Malformed(format!(
                    "response exceeds limit of {max_bytes} bytes"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl DataSource for HttpSource {
    async fn fetch_positions(&self) -> Result<Vec<Position>, FetchError> {
        let (status, body) = self.get(self.endpoint("positions")).await?;
        envelope::positions(status, &body)
    }

    async fn fetch_users_page(&self, page: u32, count: u32) -> Result<UsersPage, FetchError> {
        let mut url = self.endpoint("users");
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("count", &count.to_string());
        let (status, body) = self.get(url).await?;
        envelope::users_page(status, &body, page)
    }

    async fn fetch_token(&self) -> Result<RegistrationToken, FetchError> {
        let (status, body) = self.get(self.endpoint("token")).await?;
        envelope::token(status, &body).map(RegistrationToken::new)
    }

    async fn submit_user(
        &self,
        token: RegistrationToken,
        registration: &Registration,
    ) -> Result<(), SubmissionError> {
        let photo = Part::bytes(registration.photo.bytes.to_vec())
            .file_name(registration.photo.file_name.clone())
            .mime_str(&registration.photo.content_type)
            .map_err(|err| SubmissionError::Service {
                status: None,
                message: Some(format!("photo content type rejected: {err}")),
            })?;
        let form = Form::new()
            .text("name", registration.name.clone())
            .text("email", registration.email.clone())
            .text("phone", registration.phone.clone())
            .text("position_id", registration.position_id.to_string())
            .part("photo", photo);

        let url = self.endpoint("users");
        roster_info!(
            "POST {} (photo {} bytes)",
            url,
            registration.photo.size()
        );
        let response = self
            .client
            .post(url)
            .header(TOKEN_HEADER, token.into_inner())
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|err| SubmissionError::Transport(transport_error(&err)))?;
        let status = response.status().as_u16();
        let body = self.read_body(response).await.map_err(|err| match err {
            FetchError::Transport(transport) => SubmissionError::Transport(transport),
            other => SubmissionError::Service {
                status: Some(status),
                message: Some(other.to_string()),
            },
        })?;
        envelope::submission(status, &body)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    FetchError::Transport(transport_error(&err))
}

/// Timeout and connect flags decide first; otherwise the error text is
/// matched, and anything unrecognised counts as a connectivity failure.
fn transport_error(err: &reqwest::Error) -> TransportError {
    let detail = describe(err);
    let kind = if err.is_timeout() {
        TransportKind::Timeout
    } else if err.is_connect() {
        TransportKind::Connectivity
    } else {
        TransportKind::classify(&detail).unwrap_or(TransportKind::Connectivity)
    };
    TransportError::new(kind, detail)
}

fn describe(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    text
}
