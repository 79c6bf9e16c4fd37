//! Credential pool
//! Owns every credential's exhaustion/usage state. All mutation goes through the
//! pool's own methods, each a single critical section on one mutex.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use reqwest::header::HeaderValue;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use crate::error::{GuardError, GuardResult};

/// One secret plus its quota bookkeeping. Handed out as a snapshot.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub id: usize,
    secret: String,
    pub exhausted: bool,
    pub request_count: u64,
}

impl Credential {
    fn new(id: usize, secret: String) -> Self {
        Self {
            id,
            secret,
            exhausted: false,
            request_count: 0,
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .field("exhausted", &self.exhausted)
            .field("request_count", &self.request_count)
            .finish()
    }
}

#[derive(Debug)]
struct RotationState {
    credentials: Vec<Credential>,
    current_index: usize,
    last_reset_date: NaiveDate,
}

/// Read-only snapshot for observability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolStatus {
    pub total: usize,
    pub current_index: usize,
    pub available_count: usize,
    pub exhausted_count: usize,
    pub request_counts: Vec<u64>,
    pub last_reset_date: NaiveDate,
}

/// Ordered credentials with circular rotation and a UTC daily reset.
pub struct CredentialPool {
    state: Mutex<RotationState>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for CredentialPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPool").field("status", &self.status()).finish()
    }
}

impl CredentialPool {
    /// Build a pool on the system UTC clock.
    pub fn new<I, S>(secrets: I) -> GuardResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_clock(secrets, Arc::new(SystemClock))
    }

    /// Build a pool; blank secrets and secrets that cannot travel in a request
    /// header are dropped, and an empty result is fatal.
    pub fn with_clock<I, S>(secrets: I, clock: Arc<dyn Clock>) -> GuardResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let credentials: Vec<Credential> = secrets
            .into_iter()
            .map(|s| {
                let secret: String = s.into();
                secret.trim().to_string()
            })
            .filter(|s| !s.is_empty())
            .enumerate()
            .filter(|(position, secret)| {
                let usable = HeaderValue::from_str(secret).is_ok();
                if !usable {
                    warn!(position, "dropping credential with characters not allowed in a header");
                }
                usable
            })
            .map(|(_, secret)| secret)
            .enumerate()
            .map(|(id, secret)| Credential::new(id, secret))
            .collect();

        if credentials.is_empty() {
            return Err(GuardError::NoCredentials);
        }

        info!(total = credentials.len(), "credential pool ready");

        let today = clock.today_utc();
        Ok(Self {
            state: Mutex::new(RotationState {
                credentials,
                current_index: 0,
                last_reset_date: today,
            }),
            clock,
        })
    }

    pub fn len(&self) -> usize {
        self.lock_state().credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Today's date according to the pool clock.
    pub fn today_utc(&self) -> NaiveDate {
        self.clock.today_utc()
    }

    /// The credential to use next, or `None` while the pool is depleted.
    pub fn current_credential(&self) -> Option<Credential> {
        let mut state = self.lock_state();
        self.apply_daily_reset(&mut state);

        let current = state.current_index;
        if !state.credentials[current].exhausted {
            return Some(state.credentials[current].clone());
        }

        if Self::rotate_locked(&mut state) {
            Some(state.credentials[state.current_index].clone())
        } else {
            None
        }
    }

    /// Record a quota rejection for `id` and move off it.
    ///
    /// Returns whether a non-exhausted credential is current afterwards.
    pub fn mark_exhausted(&self, id: usize) -> bool {
        let mut state = self.lock_state();
        self.apply_daily_reset(&mut state);

        let Some(credential) = state.credentials.get_mut(id) else {
            warn!(id, "mark_exhausted called with unknown credential id");
            return false;
        };

        if !credential.exhausted {
            credential.exhausted = true;
            warn!(
                id,
                request_count = credential.request_count,
                "credential quota exhausted"
            );
        }

        // A concurrent caller may already have rotated past this credential
        let current = state.current_index;
        if current != id && !state.credentials[current].exhausted {
            return true;
        }

        Self::rotate_locked(&mut state)
    }

    /// Move `current_index` to the next non-exhausted credential, circularly.
    pub fn rotate_to_next_available(&self) -> bool {
        let mut state = self.lock_state();
        self.apply_daily_reset(&mut state);
        Self::rotate_locked(&mut state)
    }

    /// Clear exhaustion and usage if the UTC date moved past the last reset.
    ///
    /// Returns whether a reset happened.
    pub fn check_daily_reset(&self) -> bool {
        let mut state = self.lock_state();
        self.apply_daily_reset(&mut state)
    }

    /// Count one confirmed successful generation against `id`.
    pub fn increment_usage(&self, id: usize) {
        let mut state = self.lock_state();
        if let Some(credential) = state.credentials.get_mut(id) {
            credential.request_count += 1;
        }
    }

    pub fn status(&self) -> PoolStatus {
        let mut state = self.lock_state();
        self.apply_daily_reset(&mut state);

        let exhausted_count = state.credentials.iter().filter(|c| c.exhausted).count();
        PoolStatus {
            total: state.credentials.len(),
            current_index: state.current_index,
            available_count: state.credentials.len() - exhausted_count,
            exhausted_count,
            request_counts: state.credentials.iter().map(|c| c.request_count).collect(),
            last_reset_date: state.last_reset_date,
        }
    }

    // ======== locked helpers ========

    fn lock_state(&self) -> MutexGuard<'_, RotationState> {
        // State is only mutated in whole, non-panicking steps, so a poisoned lock
        // still guards consistent data
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn apply_daily_reset(&self, state: &mut RotationState) -> bool {
        let today = self.clock.today_utc();
        if today <= state.last_reset_date {
            return false;
        }

        for credential in state.credentials.iter_mut() {
            credential.exhausted = false;
            credential.request_count = 0;
        }
        state.current_index = 0;
        info!(
            previous = %state.last_reset_date,
            today = %today,
            "daily quota reset applied to all credentials"
        );
        state.last_reset_date = today;
        true
    }

    /// Scan at most `len` positions after the current one.
    fn rotate_locked(state: &mut RotationState) -> bool {
        let len = state.credentials.len();
        let start = state.current_index;

        for step in 1..=len {
            let candidate = (start + step) % len;
            if !state.credentials[candidate].exhausted {
                state.current_index = candidate;
                if candidate != start {
                    debug!(from = start, to = candidate, "rotated to next credential");
                }
                return true;
            }
        }

        warn!(total = len, "all credentials exhausted until the next UTC reset");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::ManualClock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pool_with_clock(n: usize) -> (CredentialPool, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(date(2026, 1, 15)));
        let secrets: Vec<String> = (0..n).map(|i| format!("key-{}", i)).collect();
        let pool = CredentialPool::with_clock(secrets, clock.clone()).unwrap();
        (pool, clock)
    }

    #[test]
    fn test_empty_or_blank_list_fails_fast() {
        assert!(matches!(CredentialPool::new(Vec::<String>::new()), Err(GuardError::NoCredentials)));
        assert!(matches!(CredentialPool::new(vec!["  ", ""]), Err(GuardError::NoCredentials)));
    }

    #[test]
    fn test_blank_secrets_are_skipped_and_ids_stay_dense() {
        let pool = CredentialPool::new(vec!["a", " ", "b"]).unwrap();
        assert_eq!(pool.len(), 2);
        assert!(pool.mark_exhausted(0));
        let current = pool.current_credential().unwrap();
        assert_eq!(current.id, 1);
        assert_eq!(current.secret(), "b");
    }

    #[test]
    fn test_secrets_unusable_as_header_are_dropped() {
        let pool = CredentialPool::new(vec!["bad\nkey", "good-key"]).unwrap();
        assert_eq!(pool.len(), 1);
        let current = pool.current_credential().unwrap();
        assert_eq!(current.id, 0);
        assert_eq!(current.secret(), "good-key");

        assert!(matches!(
            CredentialPool::new(vec!["only\u{7f}bad"]),
            Err(GuardError::NoCredentials)
        ));
    }

    #[test]
    fn test_rotation_skips_pre_exhausted_credential() {
        // [A, B, C], C exhausted, current A: exhausting A lands on B
        let (pool, _) = pool_with_clock(3);
        pool.mark_exhausted(2);
        assert_eq!(pool.status().current_index, 0);

        assert!(pool.mark_exhausted(0));
        assert_eq!(pool.status().current_index, 1);
        assert_eq!(pool.current_credential().unwrap().id, 1);
    }

    #[test]
    fn test_exhausting_every_credential_depletes_pool() {
        let (pool, _) = pool_with_clock(3);
        assert!(pool.mark_exhausted(0));
        assert!(pool.mark_exhausted(1));
        assert!(!pool.mark_exhausted(2));

        let status = pool.status();
        assert_eq!(status.available_count, 0);
        assert_eq!(status.exhausted_count, 3);
        assert!(pool.current_credential().is_none());
        assert!(!pool.rotate_to_next_available());
    }

    #[test]
    fn test_rotation_lands_on_only_remaining_credential() {
        let (pool, _) = pool_with_clock(2);
        pool.mark_exhausted(1);
        // current (0) is the only one left: rotation comes back to it
        assert!(pool.rotate_to_next_available());
        assert_eq!(pool.status().current_index, 0);
    }

    #[test]
    fn test_stale_exhaustion_report_does_not_rotate_again() {
        // Two callers both saw credential 0 fail; the second report must not skip 1
        let (pool, _) = pool_with_clock(3);
        assert!(pool.mark_exhausted(0));
        assert_eq!(pool.status().current_index, 1);
        assert!(pool.mark_exhausted(0));
        assert_eq!(pool.status().current_index, 1);
    }

    #[test]
    fn test_daily_reset_clears_everything() {
        let (pool, clock) = pool_with_clock(3);
        pool.increment_usage(0);
        pool.increment_usage(0);
        pool.mark_exhausted(0);
        pool.increment_usage(1);
        pool.mark_exhausted(1);
        assert_eq!(pool.status().current_index, 2);

        clock.advance_days(1);

        let status = pool.status();
        assert_eq!(status.exhausted_count, 0);
        assert_eq!(status.current_index, 0);
        assert_eq!(status.request_counts, vec![0, 0, 0]);
        assert_eq!(status.last_reset_date, date(2026, 1, 16));
    }

    #[test]
    fn test_reset_revives_depleted_pool() {
        let (pool, clock) = pool_with_clock(2);
        pool.mark_exhausted(0);
        pool.mark_exhausted(1);
        assert!(pool.current_credential().is_none());

        clock.advance_days(1);
        assert_eq!(pool.current_credential().unwrap().id, 0);
    }

    #[test]
    fn test_same_day_does_not_reset() {
        let (pool, _) = pool_with_clock(2);
        pool.mark_exhausted(0);
        assert!(!pool.check_daily_reset());
        assert_eq!(pool.status().exhausted_count, 1);
    }

    #[test]
    fn test_usage_counts_per_credential() {
        let (pool, _) = pool_with_clock(2);
        pool.increment_usage(1);
        pool.increment_usage(1);
        pool.increment_usage(7);
        assert_eq!(pool.status().request_counts, vec![0, 2]);
    }

    #[test]
    fn test_debug_output_hides_secrets() {
        let pool = CredentialPool::new(vec!["super-secret-key"]).unwrap();
        let credential = pool.current_credential().unwrap();
        assert!(!format!("{:?}", credential).contains("super-secret-key"));
        assert!(!format!("{:?}", pool).contains("super-secret-key"));
    }
}
