use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::EmailConfig;
use crate::error::AppError;

/// Sends the finished report (plain-text summary + PNG attachment) over
/// SMTPS. The sender address doubles as the recipient, matching the
/// self-notification setup this tool is meant for.
pub struct Mailer {
    config: EmailConfig,
}

impl Mailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(
        &self,
        subject: &str,
        body: &str,
        attachment_name: &str,
        png_bytes: Vec<u8>,
    ) -> Result<Message> {
        let mailbox: Mailbox = self
            .config
            .address
            .parse()
            .context("invalid email address")?;
        let png_type = ContentType::parse("image/png").expect("static content type");

        Message::builder()
            .from(mailbox.clone())
            .to(mailbox)
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body.to_string()))
                    .singlepart(
                        Attachment::new(attachment_name.to_string()).body(png_bytes, png_type),
                    ),
            )
            .context("failed to build email message")
    }

    pub fn send_report(
        &self,
        subject: &str,
        body: &str,
        attachment_name: &str,
        png_bytes: Vec<u8>,
    ) -> Result<()> {
        let message = self.build_message(subject, body, attachment_name, png_bytes)?;

        let creds = Credentials::new(self.config.address.clone(), self.config.auth_code.clone());
        let transport = SmtpTransport::relay(&self.config.smtp_host)
            .map_err(|e| AppError::Email(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build();

        tracing::info!(
            host = %self.config.smtp_host,
            port = self.config.smtp_port,
            subject,
            "Sending report email"
        );
        transport
            .send(&message)
            .map_err(|e| AppError::Email(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailer() -> Mailer {
        Mailer::new(EmailConfig {
            enabled: true,
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 465,
            address: "trader@example.com".to_string(),
            auth_code: "secret".to_string(),
        })
    }

    #[test]
    fn message_carries_subject_and_attachment() {
        let msg = mailer()
            .build_message("daily report", "hello", "chart.png", vec![1, 2, 3])
            .unwrap();
        let raw = String::from_utf8_lossy(&msg.formatted()).to_string();
        assert!(raw.contains("daily report"));
        assert!(raw.contains("chart.png"));
        assert!(raw.contains("image/png"));
    }

    #[test]
    fn invalid_address_is_rejected() {
        let mut m = mailer();
        m.config.address = "not-an-address".to_string();
        assert!(m.build_message("s", "b", "a.png", vec![]).is_err());
    }
}
