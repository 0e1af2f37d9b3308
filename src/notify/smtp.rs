use anyhow::Context;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, instrument};

use super::{cancellation_body, confirmation_body, Notifier, ReservationNotice};
use crate::config::SmtpConfig;

/// Sends plain-text mail through an authenticated SMTP relay.
#[derive(Clone)]
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpNotifier {
    pub fn new(cfg: &SmtpConfig) -> anyhow::Result<Self> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.host)
            .with_context(|| format!("smtp relay {}", cfg.host))?
            .port(cfg.port)
            .credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()))
            .build();
        Ok(Self {
            mailer,
            from: cfg.from.clone(),
        })
    }

    async fn send(&self, to: &str, subject: &str, body: String) -> anyhow::Result<()> {
        anyhow::ensure!(!to.is_empty(), "recipient email is empty");
        let email = Message::builder()
            .from(self.from.parse().context("invalid from address")?)
            .to(to.parse().context("invalid recipient address")?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .context("build email")?;
        self.mailer.send(email).await.context("smtp send")?;
        debug!(%to, %subject, "mail sent");
        Ok(())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    #[instrument(skip(self, notice), fields(ticket = %notice.ticket_number))]
    async fn booking_confirmed(&self, to: &str, notice: &ReservationNotice) -> anyhow::Result<()> {
        self.send(to, "Reservation confirmed", confirmation_body(notice))
            .await
    }

    #[instrument(skip(self, notice), fields(ticket = %notice.ticket_number))]
    async fn booking_cancelled(
        &self,
        to: &str,
        notice: &ReservationNotice,
        refund_amount: f64,
    ) -> anyhow::Result<()> {
        self.send(
            to,
            "Reservation cancelled",
            cancellation_body(notice, refund_amount),
        )
        .await
    }

    #[instrument(skip(self, code))]
    async fn verification_code(&self, to: &str, code: &str) -> anyhow::Result<()> {
        let body = format!("Your verification code is {code}. It expires in 5 minutes.\n");
        self.send(to, "Your verification code", body).await
    }
}
