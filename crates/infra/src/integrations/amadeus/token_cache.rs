//! Process-wide cache of Amadeus access tokens

use calcopilot_common::{Clock, SystemClock};
use chrono::{DateTime, Duration, Utc};
use moka::sync::Cache;
use tracing::debug;

/// Upper bound for provider-reported lifetimes.
const MAX_LIFETIME_SECS: u64 = 366 * 24 * 60 * 60;

fn seconds(secs: u64) -> Duration {
    Duration::seconds(secs.min(MAX_LIFETIME_SECS) as i64)
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Bearer tokens keyed by client id
///
/// A token is served only while `expires_at - refresh_margin` lies in the
/// future according to the injected clock.
pub struct TokenCache<C: Clock = SystemClock> {
    tokens: Cache<String, CachedToken>,
    clock: C,
    refresh_margin: Duration,
}

impl TokenCache<SystemClock> {
    pub fn new(refresh_margin_secs: u64) -> Self {
        Self::with_clock(SystemClock, refresh_margin_secs)
    }
}

impl<C: Clock> TokenCache<C> {
    pub fn with_clock(clock: C, refresh_margin_secs: u64) -> Self {
        Self {
            tokens: Cache::builder().max_capacity(16).build(),
            clock,
            refresh_margin: seconds(refresh_margin_secs),
        }
    }

    pub fn get(&self, client_id: &str) -> Option<String> {
        let cached = self.tokens.get(client_id)?;
        if cached.expires_at - self.refresh_margin > self.clock.utc_now() {
            return Some(cached.token);
        }
        debug!("cached travel token is about to expire");
        self.tokens.invalidate(client_id);
        None
    }

    pub fn insert(&self, client_id: &str, token: String, expires_in_secs: u64) {
        let expires_at = self.clock.utc_now() + seconds(expires_in_secs);
        self.tokens.insert(client_id.to_string(), CachedToken { token, expires_at });
    }
}
