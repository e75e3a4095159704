//! Email service for sending transactional emails.
//!
//! Uses `lettre` for SMTP transport. Every message is sent as a multipart
//! alternative (plaintext + HTML).

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::MultiPart,
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::config::EmailConfig;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Creates an SMTP transport.
    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(|e| EmailError::SendError(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build();

        Ok(transport)
    }

    /// Sends the account verification OTP email.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be built or sent.
    pub async fn send_verification_otp(
        &self,
        to_email: &str,
        to_name: &str,
        otp: &str,
    ) -> Result<(), EmailError> {
        let subject = "Verify your RiderLedger account";
        let text = format!(
            r"Hi {to_name},

Welcome to RiderLedger! Your email verification code is:

    {otp}

This code is valid for 1 hour. Enter it in the app to finish setting up
your account.

If you didn't create a RiderLedger account, you can safely ignore this
email."
        );
        let html = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>Verify your RiderLedger account</h2>
  <p>Hi {to_name},</p>
  <p>Your email verification code is:</p>
  <p style="font-size: 24px; font-weight: bold; letter-spacing: 3px;">{otp}</p>
  <p>This code is valid for 1 hour.</p>
  <p style="color: #777;">If you didn't create a RiderLedger account, you can safely ignore this email.</p>
</div>"#
        );

        self.send_email(to_email, subject, &text, &html).await
    }

    /// Sends the password reset OTP email.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be built or sent.
    pub async fn send_reset_otp(
        &self,
        to_email: &str,
        to_name: &str,
        otp: &str,
    ) -> Result<(), EmailError> {
        let subject = "RiderLedger password reset code";
        let text = format!(
            r"Hi {to_name},

We received a request to reset the password for your RiderLedger account.
Your reset code is:

    {otp}

This code is valid for 10 minutes. Enter it in the app to continue.

If you didn't request a password reset, you can safely ignore this email."
        );
        let html = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>Password reset</h2>
  <p>Hi {to_name},</p>
  <p>Your password reset code is:</p>
  <p style="font-size: 24px; font-weight: bold; letter-spacing: 3px;">{otp}</p>
  <p>This code is valid for 10 minutes.</p>
  <p style="color: #777;">If you didn't request a password reset, you can safely ignore this email.</p>
</div>"#
        );

        self.send_email(to_email, subject, &text, &html).await
    }

    /// Sends an email with plaintext and HTML bodies.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be built or sent.
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(
                text_body.to_string(),
                html_body.to_string(),
            ))
            .map_err(|e| EmailError::BuildError(e.to_string()))?;

        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EmailConfig;

    #[test]
    fn test_email_config_default() {
        let config = EmailConfig::default();
        assert_eq!(config.smtp_host, "localhost");
        assert_eq!(config.smtp_port, 1025);
    }
}
