//! Outgoing mail.
//!
//! The server only needs to send password reset links, so a mail is a
//! recipient, a subject and the link. Delivery is behind the [`Mailer`] trait;
//! the default [`LogMailer`] writes mails to the log instead of sending them.

use async_trait::async_trait;

use guildhall_core::user::User;

/// A mail ready to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub username: String,
    pub link: String,
}

impl Mail {
    /// The "forgot password" mail carrying the reset link.
    pub fn password_reset(user: &User, link: String) -> Self {
        Self {
            to: user.email.clone(),
            subject: "Guildhall: reset your password".to_string(),
            username: user.username.clone(),
            link,
        }
    }
}

/// Mail delivery abstraction. Delivery is fire and forget: the reset flow
/// answers the same whether or not the mail arrives.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &Mail);
}

/// Mailer that emits every mail through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: &Mail) {
        tracing::info!(
            to = %mail.to,
            subject = %mail.subject,
            username = %mail.username,
            link = %mail.link,
            "Sending mail"
        );
    }
}

/// Mailer that keeps every mail in memory so tests can inspect them.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    sent: std::sync::Arc<tokio::sync::Mutex<Vec<Mail>>>,
}

#[cfg(test)]
impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every mail sent so far, oldest first.
    pub async fn sent(&self) -> Vec<Mail> {
        self.sent.lock().await.clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: &Mail) {
        self.sent.lock().await.push(mail.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_mailer_keeps_mails() {
        let mailer = RecordingMailer::new();
        let user = User::new("example", "example@example.com", "hash");
        let mail = Mail::password_reset(&user, "https://app.com/reset?token=abc".to_string());

        mailer.send(&mail).await;

        let sent = mailer.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "example@example.com");
        assert_eq!(sent[0].link, "https://app.com/reset?token=abc");
    }

    #[test]
    fn test_password_reset_mail() {
        let user = User::new("example", "example@example.com", "hash");
        let mail = Mail::password_reset(&user, "https://app.com/reset".to_string());

        assert_eq!(mail.to, "example@example.com");
        assert_eq!(mail.username, "example");
        assert_eq!(mail.subject, "Guildhall: reset your password");
    }
}
