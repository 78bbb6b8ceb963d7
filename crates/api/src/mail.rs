//! Outbound email for the device-reset flow.
//!
//! Handlers talk to a [`Mailer`] trait object so tests can substitute a
//! recording or failing implementation. [`SmtpMailer`] wraps the `lettre`
//! async SMTP transport; if `SMTP_HOST` is not set, [`EmailConfig::from_env`]
//! returns `None` and [`DisabledMailer`] is used instead.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// No SMTP server is configured.
    #[error("Email delivery is not configured")]
    Disabled,
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@cctv.local";

/// Configuration for SMTP delivery.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set.
    ///
    /// | Variable        | Required | Default              |
    /// |-----------------|----------|----------------------|
    /// | `SMTP_HOST`     | yes      | --                   |
    /// | `SMTP_PORT`     | no       | `587`                |
    /// | `SMTP_FROM`     | no       | `noreply@cctv.local` |
    /// | `SMTP_USER`     | no       | --                   |
    /// | `SMTP_PASSWORD` | no       | --                   |
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
        })
    }
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the device-reset token to `to`.
    async fn send_device_reset(&self, to: &str, token: &str) -> Result<(), EmailError>;
}

/// Subject line of the device-reset email.
pub const RESET_SUBJECT: &str = "Device reset request";

/// Plain-text body of the device-reset email.
pub fn reset_body(token: &str) -> String {
    format!(
        "A device reset was requested for your account.\n\n\
         Reset token: {token}\n\n\
         The token expires in 24 hours. Submit it together with your password \
         to unbind your current device. If you did not request this, ignore \
         this email."
    )
}

/// Sends email through an SMTP relay.
pub struct SmtpMailer {
    from_address: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build the transport once; connections are opened lazily per send.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            from_address: config.from_address.clone(),
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_device_reset(&self, to: &str, token: &str) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(self.from_address.parse()?)
            .to(to.parse()?)
            .subject(RESET_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(reset_body(token))
            .map_err(|e| EmailError::Build(e.to_string()))?;

        self.transport.send(email).await?;

        tracing::info!(to, "Device reset email sent");
        Ok(())
    }
}

/// Mailer used when SMTP is not configured. Every send fails, so reset
/// requests are rolled back rather than leaving undeliverable tokens.
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send_device_reset(&self, to: &str, _token: &str) -> Result<(), EmailError> {
        tracing::warn!(to, "Email delivery requested but SMTP is not configured");
        Err(EmailError::Disabled)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
