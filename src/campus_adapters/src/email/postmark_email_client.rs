use campus_core::{Email, EmailClient, EmailDeliveryError};
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

const SEND_PATH: &str = "/email";
const MESSAGE_STREAM: &str = "outbound";
const SERVER_TOKEN_HEADER: &str = "X-Postmark-Server-Token";

/// Sends plain-text mail through Postmark's single-message endpoint.
pub struct PostmarkEmailClient {
    http_client: Client,
    endpoint: Url,
    sender: Email,
    server_token: Secret<String>,
}

impl PostmarkEmailClient {
    /// The endpoint is resolved once here; a base url that cannot be joined
    /// with the send path is a configuration error.
    pub fn new(
        base_url: &str,
        sender: Email,
        server_token: Secret<String>,
        http_client: Client,
    ) -> Result<Self, EmailDeliveryError> {
        let endpoint = Url::parse(base_url)
            .and_then(|base| base.join(SEND_PATH))
            .map_err(|e| EmailDeliveryError::InvalidEndpoint(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint,
            sender,
            server_token,
        })
    }
}

#[async_trait::async_trait]
impl EmailClient for PostmarkEmailClient {
    #[tracing::instrument(name = "Sending email via Postmark", skip_all)]
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), EmailDeliveryError> {
        let message = OutboundMessage {
            from: self.sender.as_ref().expose_secret(),
            to: recipient.as_ref().expose_secret(),
            subject,
            text_body: content,
            message_stream: MESSAGE_STREAM,
        };

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .header(SERVER_TOKEN_HEADER, self.server_token.expose_secret())
            .json(&message)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(timeout = e.is_timeout(), "Postmark request failed");
                EmailDeliveryError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            // Postmark explains rejections in the body; it is only logged.
            let error_code = response
                .json::<PostmarkRejection>()
                .await
                .map(|r| r.error_code)
                .ok();
            tracing::warn!(status = status.as_u16(), ?error_code, "Postmark rejected the message");
            return Err(EmailDeliveryError::Rejected {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct OutboundMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
    message_stream: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PostmarkRejection {
    error_code: i64,
}
