//! Password-reset tokens and email delivery.
//!
//! Reset tokens are opaque random strings; only their SHA-256 hash is
//! stored in the contact row so a record-store leak does not expose
//! usable tokens. Delivery uses the `lettre` async SMTP transport;
//! configuration is loaded from environment variables, and when
//! `SMTP_HOST` is not set no mailer is constructed and reset requests are
//! logged instead of mailed.

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use sha2::{Digest, Sha256};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Generate a random reset token.
///
/// Returns `(plaintext_token, sha256_hex_hash)`. The plaintext is mailed
/// to the contact; only the hash is persisted.
pub fn generate_reset_token() -> (String, String) {
    let plaintext = Uuid::new_v4().to_string();
    let hash = hash_reset_token(&plaintext);
    (plaintext, hash)
}

/// Compute the SHA-256 hex digest of a reset token.
pub fn hash_reset_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Error type for reset-mail delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(#[from] lettre::error::Error),
}

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@reeltrack.local";

/// Configuration for the SMTP reset mailer.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
    /// Base URL of the dashboard, used to build the reset link.
    pub dashboard_url: String,
}

impl MailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that reset
    /// mail is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                   |
    /// |-----------------|----------|---------------------------|
    /// | `SMTP_HOST`     | yes      | —                         |
    /// | `SMTP_PORT`     | no       | `587`                     |
    /// | `SMTP_FROM`     | no       | `noreply@reeltrack.local` |
    /// | `SMTP_USER`     | no       | —                         |
    /// | `SMTP_PASSWORD` | no       | —                         |
    /// | `DASHBOARD_URL` | no       | `http://localhost:5173`   |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
            dashboard_url: std::env::var("DASHBOARD_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        })
    }
}

/// Sends password-reset emails via SMTP.
pub struct Mailer {
    config: MailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl Mailer {
    /// Build a mailer from configuration.
    pub fn new(config: MailConfig) -> Result<Self, MailError> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);

        if let (Some(user), Some(password)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            config,
        })
    }

    /// Send a password-reset email containing the one-time link.
    pub async fn send_reset(&self, to: &str, token: &str) -> Result<(), MailError> {
        let from: Mailbox = self.config.from_address.parse()?;
        let to: Mailbox = to.parse()?;

        let reset_link = format!(
            "{}/reset-password?token={token}",
            self.config.dashboard_url.trim_end_matches('/')
        );

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject("Reset your Reeltrack password")
            .body(format!(
                "A password reset was requested for your account.\n\n\
                 Open this link to choose a new password:\n{reset_link}\n\n\
                 If you did not request this, you can ignore this email."
            ))?;

        self.transport.send(message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_token_hash_is_stable_sha256() {
        let (plaintext, hash) = generate_reset_token();
        assert_eq!(hash, hash_reset_token(&plaintext));
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn distinct_tokens_have_distinct_hashes() {
        let (_, a) = generate_reset_token();
        let (_, b) = generate_reset_token();
        assert_ne!(a, b);
    }
}
