use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::{
    message::MultiPart, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};

use crate::config::AppConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    async fn deliver(&self, email: OutgoingEmail) -> Result<()>;
}

pub struct SmtpMailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailTransport {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.mail_host)
            .port(config.mail_port);

        if let (Some(user), Some(pass)) = (&config.mail_user, &config.mail_pass) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            mailer: builder.build(),
            from: config.mail_from.clone(),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn deliver(&self, email: OutgoingEmail) -> Result<()> {
        let OutgoingEmail {
            to,
            subject,
            text,
            html,
        } = email;

        let message = Message::builder()
            .from(self.from.parse().context("invalid sender address")?)
            .to(to.parse().context("invalid recipient address")?)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(text, html))
            .context("failed to build email message")?;

        self.mailer
            .send(message)
            .await
            .context("failed to deliver email over SMTP")?;
        Ok(())
    }
}
