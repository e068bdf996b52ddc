use async_trait::async_trait;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};

use taskforge_core::{Email, EmailClient, EmailTemplate, OneTimeCode};

/// Email delivery over Postmark's HTTP API.
#[derive(Clone)]
pub struct PostmarkEmailClient {
    http_client: Client,
    base_url: String,
    sender: Email,
    authorization_token: Secret<String>,
}

impl PostmarkEmailClient {
    pub fn new(
        base_url: String,
        sender: Email,
        authorization_token: Secret<String>,
        http_client: Client,
    ) -> Self {
        Self {
            http_client,
            base_url,
            sender,
            authorization_token,
        }
    }
}

#[async_trait]
impl EmailClient for PostmarkEmailClient {
    #[tracing::instrument(name = "Sending email", skip_all)]
    async fn send_code(
        &self,
        recipient: &Email,
        recipient_name: &str,
        template: EmailTemplate,
        code: &OneTimeCode,
    ) -> Result<(), String> {
        let base = Url::parse(&self.base_url).map_err(|e| e.to_string())?;
        let url = base.join("/email").map_err(|e| e.to_string())?;

        let (subject, body) = render(template, recipient_name, code);

        let request_body = SendEmailRequest {
            from: self.sender.expose(),
            to: recipient.expose(),
            subject,
            html_body: &body,
            text_body: &body,
            message_stream: MESSAGE_STREAM,
        };

        let request = self
            .http_client
            .post(url)
            .header(
                POSTMARK_AUTH_HEADER,
                self.authorization_token.expose_secret(),
            )
            .json(&request_body);

        request
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;

        Ok(())
    }
}

fn render(template: EmailTemplate, name: &str, code: &OneTimeCode) -> (&'static str, String) {
    match template {
        EmailTemplate::VerifyEmail => (
            "Verify Your Email",
            format!(
                "Hello {name},\n\nPlease verify your email by entering the following code: {}\n\n\
                 This code will expire in 24 hours.",
                code.as_str()
            ),
        ),
        EmailTemplate::ResetPassword => (
            "Reset Your Password",
            format!(
                "Hello {name},\n\nYou requested to reset your password. Use this code to reset \
                 your password: {}\n\nThis code will expire in 1 hour.\n\nIf you didn't request \
                 a password reset, you can ignore this email.",
                code.as_str()
            ),
        ),
    }
}

const MESSAGE_STREAM: &str = "outbound";
const POSTMARK_AUTH_HEADER: &str = "X-Postmark-Server-Token";

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
    message_stream: &'a str,
}
