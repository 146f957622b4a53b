//! Duplicate request suppression
//!
//! RADIUS clients retransmit a request with the same Identifier and Request
//! Authenticator when an answer is lost (RFC 2865 Section 2). The server
//! remembers each request it dispatched for the duplicate interval and drops
//! retransmissions seen within it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use radius_proto::Packet;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Cache key for a request: `client-ip/identifier/base64(authenticator)`
pub fn duplicate_key(client_ip: IpAddr, request: &Packet) -> String {
    let authenticator = request.authenticator().unwrap_or_default();
    format!(
        "{}/{}/{}",
        client_ip,
        request.identifier,
        STANDARD.encode(authenticator)
    )
}

#[derive(Debug)]
struct CacheState {
    /// Key -> when it was first seen
    entries: HashMap<String, Instant>,
    last_sweep: Instant,
}

/// Mutex-guarded map of recently seen requests
///
/// Expired entries are swept opportunistically from
/// [`DuplicateCache::check_and_insert`], at most once per interval.
#[derive(Debug)]
pub struct DuplicateCache {
    interval: Duration,
    state: Mutex<CacheState>,
}

impl DuplicateCache {
    pub fn new(interval: Duration) -> Self {
        DuplicateCache {
            interval,
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                last_sweep: Instant::now(),
            }),
        }
    }

    /// Record `key` as seen at `now`; returns true if it was already seen
    /// within the duplicate interval
    pub fn check_and_insert(&self, key: String, now: Instant) -> bool {
        let mut state = lock(&self.state);

        if now.saturating_duration_since(state.last_sweep) > self.interval {
            let before = state.entries.len();
            let interval = self.interval;
            state
                .entries
                .retain(|_, seen| now.saturating_duration_since(*seen) <= interval);
            state.last_sweep = now;
            debug!(
                removed = before - state.entries.len(),
                remaining = state.entries.len(),
                "Duplicate cache sweep completed"
            );
        }

        match state.entries.get(&key) {
            Some(seen) if now.saturating_duration_since(*seen) < self.interval => true,
            _ => {
                state.entries.insert(key, now);
                false
            }
        }
    }

    /// Remove every entry first seen before `cutoff`; returns how many were removed
    pub fn sweep(&self, cutoff: Instant) -> usize {
        let mut state = lock(&self.state);
        let before = state.entries.len();
        state.entries.retain(|_, seen| *seen >= cutoff);
        before - state.entries.len()
    }

    pub fn len(&self) -> usize {
        lock(&self.state).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
