//! Outbound customer messages: booking confirmations, cancellations and
//! registration codes.
//!
//! Workflows call the [`Notifier`] after their writes; a delivery failure is
//! returned to the caller as an internal error and nothing is rolled back.

mod console;
mod smtp;

#[cfg(test)]
pub(crate) mod recording;

use async_trait::async_trait;
use time::OffsetDateTime;

pub use console::ConsoleNotifier;
pub use smtp::SmtpNotifier;

/// Flight leg printed on confirmation and cancellation mails.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightLeg {
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: OffsetDateTime,
}

/// What a customer is told about one reservation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationNotice {
    pub ticket_number: String,
    pub seat_number: String,
    /// Absent when the flight could not be loaded.
    pub flight: Option<FlightLeg>,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn booking_confirmed(&self, to: &str, notice: &ReservationNotice) -> anyhow::Result<()>;

    async fn booking_cancelled(
        &self,
        to: &str,
        notice: &ReservationNotice,
        refund_amount: f64,
    ) -> anyhow::Result<()>;

    async fn verification_code(&self, to: &str, code: &str) -> anyhow::Result<()>;
}

pub(crate) fn confirmation_body(notice: &ReservationNotice) -> String {
    let mut body = format!(
        "Your reservation is confirmed.\nTicket: {}\nSeat: {}\n",
        notice.ticket_number, notice.seat_number
    );
    if let Some(leg) = &notice.flight {
        body.push_str(&leg_lines(leg));
    }
    body
}

pub(crate) fn cancellation_body(notice: &ReservationNotice, refund_amount: f64) -> String {
    let mut body = format!(
        "Your reservation {} has been cancelled.\nSeat: {}\n",
        notice.ticket_number, notice.seat_number
    );
    if let Some(leg) = &notice.flight {
        body.push_str(&leg_lines(leg));
    }
    body.push_str(&format!("Refund: {refund_amount:.2}\n"));
    body
}

fn leg_lines(leg: &FlightLeg) -> String {
    format!(
        "Flight: {} ({} -> {})\nDeparture: {} UTC\n",
        leg.flight_number,
        leg.origin,
        leg.destination,
        leg.departure_time
            .to_offset(time::UtcOffset::UTC)
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default(),
    )
}
