//! Outbound mail
//!
//! The [`Mailer`] trait is the delivery port used by the account flows.
//! Two local backends ship with the crate:
//! - [`LogMailer`] writes the message to the tracing log (development)
//! - [`FileMailer`] drops one `.eml` file per message into a directory

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

/// A plain-text mail message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Render as an RFC 5322 message
    pub fn to_rfc5322(&self) -> String {
        format!(
            "From: {}\r\nTo: {}\r\nSubject: {}\r\nDate: {}\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n{}\r\n",
            self.from,
            self.to,
            self.subject,
            Utc::now().to_rfc2822(),
            self.body
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Mail delivery failed: {0}")]
    Delivery(String),

    #[error("Mail I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Mail delivery port
#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Send `message` on a background task
///
/// The caller never observes the outcome; failures are logged at `warn`.
pub fn dispatch_detached<M>(mailer: Arc<M>, message: MailMessage)
where
    M: Mailer + Sync + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = Mailer::send(&*mailer, &message).await {
            tracing::warn!(error = %e, to = %message.to, "Failed to deliver mail");
        }
    });
}

/// Development backend: logs the full message
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        tracing::info!(
            from = %message.from,
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "Mail sent (log backend)"
        );
        Ok(())
    }
}

/// Writes each message to `<dir>/<timestamp>-<uuid>.eml`
#[derive(Debug, Clone)]
pub struct FileMailer {
    dir: PathBuf,
}

impl FileMailer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

impl Mailer for FileMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let file_name = format!(
            "{}-{}.eml",
            Utc::now().format("%Y%m%d%H%M%S"),
            Uuid::new_v4().simple()
        );
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, message.to_rfc5322()).await?;
        tracing::debug!(path = %path.display(), to = %message.to, "Mail written to file");
        Ok(())
    }
}

/// Backend chosen at startup from configuration
#[derive(Debug, Clone)]
pub enum ConfiguredMailer {
    Log(LogMailer),
    File(FileMailer),
}

impl Mailer for ConfiguredMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        match self {
            ConfiguredMailer::Log(m) => Mailer::send(m, message).await,
            ConfiguredMailer::File(m) => Mailer::send(m, message).await,
        }
    }
}
