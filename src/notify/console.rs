use async_trait::async_trait;
use tracing::info;

use super::{cancellation_body, confirmation_body, Notifier, ReservationNotice};

/// Writes every message to the log instead of sending it. Used when no SMTP
/// relay is configured.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn booking_confirmed(&self, to: &str, notice: &ReservationNotice) -> anyhow::Result<()> {
        anyhow::ensure!(!to.is_empty(), "recipient email is empty");
        info!(
            %to,
            ticket = %notice.ticket_number,
            body = %confirmation_body(notice),
            "mail: booking confirmed"
        );
        Ok(())
    }

    async fn booking_cancelled(
        &self,
        to: &str,
        notice: &ReservationNotice,
        refund_amount: f64,
    ) -> anyhow::Result<()> {
        anyhow::ensure!(!to.is_empty(), "recipient email is empty");
        info!(
            %to,
            ticket = %notice.ticket_number,
            refund_amount,
            body = %cancellation_body(notice, refund_amount),
            "mail: booking cancelled"
        );
        Ok(())
    }

    async fn verification_code(&self, to: &str, code: &str) -> anyhow::Result<()> {
        anyhow::ensure!(!to.is_empty(), "recipient email is empty");
        info!(%to, %code, "mail: verification code");
        Ok(())
    }
}
