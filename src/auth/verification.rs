//! Email verification codes for customer self-registration.
//!
//! Codes live in a bounded map keyed by email. An entry expires after the
//! TTL and is dropped on the next read or by the background sweep. When the
//! map is full, expired entries are swept first and then the oldest live
//! entry is evicted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

pub const CODE_TTL: Duration = Duration::from_secs(5 * 60);
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Six decimal digits, never starting with zero.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}

#[derive(Debug)]
struct Entry {
    code: String,
    stored_at: Instant,
    expires_at: Instant,
}

#[derive(Clone)]
pub struct VerificationCodes {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    ttl: Duration,
    capacity: usize,
}

impl VerificationCodes {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
            capacity: capacity.max(1),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Stores `code` for `email`, replacing any previous one.
    pub fn put(&self, email: &str, code: &str) {
        let now = Instant::now();
        let mut entries = self.entries();
        if !entries.contains_key(email) && entries.len() >= self.capacity {
            entries.retain(|_, e| e.expires_at > now);
            if entries.len() >= self.capacity {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, e)| e.stored_at)
                    .map(|(k, _)| k.clone());
                if let Some(key) = oldest {
                    debug!(email = %key, "verification cache full; evicting oldest");
                    entries.remove(&key);
                }
            }
        }
        entries.insert(
            email.to_string(),
            Entry {
                code: code.to_string(),
                stored_at: now,
                expires_at: now + self.ttl,
            },
        );
    }

    /// Live code for `email`; an expired entry is removed and reads as absent.
    pub fn get(&self, email: &str) -> Option<String> {
        let mut entries = self.entries();
        match entries.get(email) {
            Some(e) if e.expires_at > Instant::now() => Some(e.code.clone()),
            Some(_) => {
                entries.remove(email);
                None
            }
            None => None,
        }
    }

    pub fn is_valid(&self, email: &str, code: &str) -> bool {
        self.get(email).is_some_and(|stored| stored == code)
    }

    pub fn delete(&self, email: &str) {
        self.entries().remove(email);
    }

    /// Drops every expired entry; returns how many went.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        before - entries.len()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs [`sweep`](Self::sweep) every `every` until the runtime shuts down.
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let codes = self.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(every);
            loop {
                tick.tick().await;
                let removed = codes.sweep();
                if removed > 0 {
                    debug!(removed, "expired verification codes swept");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert!(!code.starts_with('0'));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn code_expires_after_ttl() {
        let codes = VerificationCodes::new(CODE_TTL, 10);
        codes.put("ana@b.co", "123456");
        assert!(codes.is_valid("ana@b.co", "123456"));
        assert!(!codes.is_valid("ana@b.co", "654321"));

        tokio::time::advance(CODE_TTL + Duration::from_secs(1)).await;
        assert!(!codes.is_valid("ana@b.co", "123456"));
        assert!(codes.is_empty());
    }

    #[test]
    fn delete_makes_code_single_use() {
        let codes = VerificationCodes::new(CODE_TTL, 10);
        codes.put("ana@b.co", "123456");
        codes.delete("ana@b.co");
        assert_eq!(codes.get("ana@b.co"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn full_cache_evicts_oldest_and_never_grows_past_capacity() {
        let codes = VerificationCodes::new(CODE_TTL, 3);
        for i in 0..3 {
            codes.put(&format!("u{i}@b.co"), "111111");
            tokio::time::advance(Duration::from_secs(1)).await;
        }
        codes.put("u3@b.co", "222222");
        assert_eq!(codes.len(), 3);
        assert_eq!(codes.get("u0@b.co"), None);
        assert!(codes.is_valid("u3@b.co", "222222"));

        // replacing an existing key does not evict anyone
        codes.put("u1@b.co", "333333");
        assert_eq!(codes.len(), 3);
        assert!(codes.is_valid("u2@b.co", "111111"));
    }

    #[tokio::test(start_paused = true)]
    async fn full_cache_prefers_dropping_expired_entries() {
        let codes = VerificationCodes::new(Duration::from_secs(10), 2);
        codes.put("old@b.co", "111111");
        tokio::time::advance(Duration::from_secs(8)).await;
        codes.put("live@b.co", "222222");
        tokio::time::advance(Duration::from_secs(5)).await;

        codes.put("new@b.co", "333333");
        assert!(codes.is_valid("live@b.co", "222222"));
        assert!(codes.is_valid("new@b.co", "333333"));
        assert_eq!(codes.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_drops_expired_entries_in_background() {
        let codes = VerificationCodes::new(Duration::from_secs(30), 10);
        codes.put("a@b.co", "111111");
        codes.put("b@b.co", "222222");
        let handle = codes.spawn_sweeper(Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(45)).await;
        assert_eq!(codes.len(), 0);
        handle.abort();
    }
}
