use base64::{engine::general_purpose, Engine as _};
use serde_json::{json, Value};
use tokio::runtime::Runtime;

/// One outbound message; at most one attachment (the media kit PDF).
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<EmailAttachment>,
}

#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Mail dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail provider rejected the message: {0}")]
    Rejected(String),
    #[error("mail transport unavailable: {0}")]
    Transport(String),
    #[error("mail runtime unavailable: {0}")]
    Runtime(String),
}

/// Trait describing outbound mail delivery so the notification flow can be
/// exercised with recording doubles.
pub trait MailGateway: Send + Sync {
    fn send(&self, email: OutboundEmail) -> Result<(), MailError>;
}

/// Client for an HTTP JSON mail provider. Owns its own runtime so the
/// gateway trait stays synchronous and callable from blocking contexts.
pub struct HttpMailClient {
    client: reqwest::Client,
    runtime: Runtime,
    endpoint: String,
    api_key: String,
}

impl HttpMailClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self, MailError> {
        let runtime = Runtime::new().map_err(|err| MailError::Runtime(err.to_string()))?;
        Ok(Self {
            client: reqwest::Client::new(),
            runtime,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

impl std::fmt::Debug for HttpMailClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMailClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl MailGateway for HttpMailClient {
    fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        let payload = provider_payload(&email);
        let response = self
            .runtime
            .block_on(async {
                self.client
                    .post(&self.endpoint)
                    .bearer_auth(&self.api_key)
                    .json(&payload)
                    .send()
                    .await
            })
            .map_err(|err| MailError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = self
            .runtime
            .block_on(async { response.text().await })
            .unwrap_or_default();
        Err(MailError::Rejected(format!("{status}: {detail}")))
    }
}

fn provider_payload(email: &OutboundEmail) -> Value {
    let mut payload = json!({
        "from": email.from,
        "to": [email.to],
        "subject": email.subject,
        "text": email.body,
    });

    if let Some(attachment) = &email.attachment {
        payload["attachments"] = json!([{
            "filename": attachment.filename,
            "content": general_purpose::STANDARD.encode(&attachment.content),
        }]);
    }

    payload
}
