use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use async_trait::async_trait;

use super::{Notifier, ReservationNotice};

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Confirmed { to: String, notice: ReservationNotice },
    Cancelled { to: String, notice: ReservationNotice, refund_amount: f64 },
    Code { to: String, code: String },
}

/// Keeps every message in memory; can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Sent>>,
    pub fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: AtomicBool::new(true),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, msg: Sent) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("smtp unavailable");
        }
        self.sent.lock().unwrap().push(msg);
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn booking_confirmed(&self, to: &str, notice: &ReservationNotice) -> anyhow::Result<()> {
        self.record(Sent::Confirmed {
            to: to.into(),
            notice: notice.clone(),
        })
    }

    async fn booking_cancelled(
        &self,
        to: &str,
        notice: &ReservationNotice,
        refund_amount: f64,
    ) -> anyhow::Result<()> {
        self.record(Sent::Cancelled {
            to: to.into(),
            notice: notice.clone(),
            refund_amount,
        })
    }

    async fn verification_code(&self, to: &str, code: &str) -> anyhow::Result<()> {
        self.record(Sent::Code {
            to: to.into(),
            code: code.into(),
        })
    }
}
