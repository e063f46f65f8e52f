use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use mockall::automock;
use zeroize::Zeroizing;

use crate::{entities::contact::ContactForm, errors::MailError, settings::AppConfig};

/// Outbound notification relay for accepted submissions.
#[automock]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_contact(&self, form: &ContactForm) -> Result<(), MailError>;
}

/// STARTTLS SMTP relay with credentials and recipient taken from config.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let password = Zeroizing::new(config.smtp_password.clone());
        let credentials =
            Credentials::new(config.smtp_user.clone(), password.to_string());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .timeout(Some(Duration::from_secs(config.outbound_timeout_secs)))
            .build();

        let from: Mailbox = format!("Contact Form <{}>", config.smtp_user).parse()?;
        let to: Mailbox = config.contact_recipient.parse()?;

        Ok(SmtpMailer { transport, from, to })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_contact(&self, form: &ContactForm) -> Result<(), MailError> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(format!("New Contact Form Submission from {}", form.name))
            .header(ContentType::TEXT_PLAIN)
            .body(format!(
                "Name: {}\nEmail: {}\nMessage: {}",
                form.name, form.email, form.message
            ))
            .map_err(|e| MailError::Message(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map(|_| ())
            .map_err(|e| MailError::Transport(e.to_string()))
    }
}
