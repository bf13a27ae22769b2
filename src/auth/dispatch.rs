//! OTP delivery collaborators.
//!
//! The flow treats delivery as fire-and-forget except for propagating
//! failure. [`LogOtpSender`] is the local-dev default; [`HttpOtpSender`]
//! posts to a transactional-email endpoint.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::info;
use url::Url;

use crate::APP_USER_AGENT;

/// Delivery abstraction for one-time codes.
#[async_trait]
pub trait OtpSender: Send + Sync {
    /// Deliver `code` to `email`, or return an error so the flow can surface
    /// the failure without marking the code as sent.
    async fn send(&self, email: &str, code: &str) -> Result<()>;
}

/// Local dev sender that logs instead of sending real email.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogOtpSender;

#[async_trait]
impl OtpSender for LogOtpSender {
    async fn send(&self, email: &str, code: &str) -> Result<()> {
        info!(email = %email, code = %code, "otp send stub");
        Ok(())
    }
}

/// Sender posting `{"email", "otp"}` to an email-dispatch endpoint.
#[derive(Clone, Debug)]
pub struct HttpOtpSender {
    client: Client,
    endpoint: Url,
}

impl HttpOtpSender {
    /// Build a sender for `endpoint`.
    ///
    /// # Errors
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(endpoint: Url) -> Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .context("failed to build OTP dispatch client")?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl OtpSender for HttpOtpSender {
    async fn send(&self, email: &str, code: &str) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({ "email": email, "otp": code }))
            .send()
            .await
            .context("OTP dispatch request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("OTP dispatch rejected: {status}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn log_sender_always_succeeds() {
        let sender = LogOtpSender;
        sender.send("a@x.com", "123456").await.unwrap();
    }

    #[tokio::test]
    async fn http_sender_posts_email_and_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send-otp-email"))
            .and(body_json(json!({ "email": "a@x.com", "otp": "123456" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let endpoint = Url::parse(&format!("{}/send-otp-email", server.uri())).unwrap();
        let sender = HttpOtpSender::new(endpoint).unwrap();
        sender.send("a@x.com", "123456").await.unwrap();
    }

    #[tokio::test]
    async fn http_sender_surfaces_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let endpoint = Url::parse(&format!("{}/send-otp-email", server.uri())).unwrap();
        let sender = HttpOtpSender::new(endpoint).unwrap();
        let err = sender.send("a@x.com", "123456").await.unwrap_err();
        assert!(err.to_string().contains("rejected"));
    }
}
