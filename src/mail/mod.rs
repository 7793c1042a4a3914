use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub mod transport;

pub use transport::{MailTransport, OutgoingEmail, SmtpMailTransport};

pub const SUBJECT_NEW_ESTABLISHMENT: &str = "Novo Estabelecimento Cadastrado!";
pub const MESSAGE_SENT: &str = "E-mail enviado com sucesso!";
pub const MESSAGE_SEND_FAILED: &str = "Falha ao enviar e-mail.";
pub const MESSAGE_EMAIL_REQUIRED: &str = "O campo \"email\" é obrigatório.";

/// Every field is optional on the wire; a missing recipient is answered
/// with a failure outcome, not a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EstablishmentRegistration {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub endereco: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOutcome {
    pub success: bool,
    pub message: String,
}

impl SendOutcome {
    fn sent() -> Self {
        Self {
            success: true,
            message: MESSAGE_SENT.to_string(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

pub struct EmailSender {
    transport: Arc<dyn MailTransport>,
}

impl EmailSender {
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    pub async fn send_email(&self, to: &str, subject: &str, text: &str) -> SendOutcome {
        let email = OutgoingEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            text: text.to_string(),
            html: format!("<p>{text}</p>"),
        };
        self.deliver(email).await
    }

    pub async fn register_establishment(
        &self,
        registration: EstablishmentRegistration,
    ) -> SendOutcome {
        let recipient = match registration.email.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => {
                tracing::warn!("establishment registration without recipient email");
                return SendOutcome::failed(MESSAGE_EMAIL_REQUIRED);
            }
        };

        let nome = registration.nome.unwrap_or_default();
        let endereco = registration.endereco.unwrap_or_default();

        let email = OutgoingEmail {
            to: recipient,
            subject: SUBJECT_NEW_ESTABLISHMENT.to_string(),
            text: format!("Um novo estabelecimento foi cadastrado: {nome}"),
            html: format!(
                "<p><strong>Nome:</strong> {nome}</p><p><strong>Endereço:</strong> {endereco}</p>"
            ),
        };
        self.deliver(email).await
    }

    async fn deliver(&self, email: OutgoingEmail) -> SendOutcome {
        let recipient = email.to.clone();
        match self.transport.deliver(email).await {
            Ok(()) => {
                tracing::info!(to = %recipient, "email sent");
                SendOutcome::sent()
            }
            Err(error) => {
                tracing::error!(to = %recipient, error = %error, "email delivery failed");
                SendOutcome::failed(MESSAGE_SEND_FAILED)
            }
        }
    }
}
