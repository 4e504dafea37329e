// modgrab-net/src/limit.rs
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Minimum-interval gate in front of every outbound registry request.
///
/// Admission is serialized through the mutex: the lock is held across the
/// sleep, so no two callers are ever released closer together than the
/// configured interval, whatever order they arrive in. Queueing is roughly
/// FIFO but only the spacing invariant is guaranteed.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_release: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn per_minute(requests_per_minute: u32) -> Self {
        let rpm = requests_per_minute.max(1);
        Self {
            min_interval: Duration::from_secs_f64(60.0 / f64::from(rpm)),
            last_release: Mutex::new(None),
        }
    }

    /// Blocks the calling task until the next request may be issued, then
    /// records the release time. Never errors.
    pub async fn wait(&self) {
        let mut last = self.last_release.lock().await;
        if let Some(prev) = *last {
            let ready = prev + self.min_interval;
            if ready > Instant::now() {
                tokio::time::sleep_until(ready).await;
            }
        }
        *last = Some(Instant::now());
    }
}
