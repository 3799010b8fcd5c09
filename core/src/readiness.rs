//! Readiness gate
//!
//! The host game and the tally are loaded by scripts we don't control, so
//! we can't be told when they're ready. The gate samples a capability probe
//! on a fixed interval and resolves once: either every named capability is
//! present, or the timeout passes and we continue in degraded mode with the
//! missing names reported.
//!
//! The gate is consumed by [`ReadinessGate::wait`]; drop the future (e.g. in
//! a `tokio::select!`) to cancel it.

use std::time::Duration;

use dragonfin_types::ReadinessConfig;
use tokio::time::{Instant, MissedTickBehavior};

/// Something that can report whether a named capability exists yet.
pub trait Capabilities {
    fn is_present(&self, name: &str) -> bool;
}

impl<F> Capabilities for F
where
    F: Fn(&str) -> bool,
{
    fn is_present(&self, name: &str) -> bool {
        self(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// All capabilities were present
    Ready { waited: Duration },
    /// Timed out; proceed without these
    Degraded { missing: Vec<String> },
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready { .. })
    }
}

/// Log a presence report every this many polls
const PROGRESS_LOG_EVERY: u32 = 10;

#[derive(Debug, Clone)]
pub struct ReadinessGate {
    names: Vec<String>,
    poll_interval: Duration,
    timeout: Duration,
}

impl ReadinessGate {
    pub fn new(names: Vec<String>, poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            names,
            // A zero interval would make tokio's interval panic
            poll_interval: poll_interval.max(Duration::from_millis(1)),
            timeout,
        }
    }

    pub fn from_config(config: &ReadinessConfig) -> Self {
        Self::new(
            config.capabilities.clone(),
            Duration::from_millis(config.poll_interval_ms),
            Duration::from_millis(config.timeout_ms),
        )
    }

    /// Wait until every capability is present or the timeout elapses.
    pub async fn wait<P>(self, probe: &P) -> Readiness
    where
        P: Capabilities + ?Sized,
    {
        await_capabilities(probe, &self.names, self.poll_interval, self.timeout).await
    }
}

fn missing<P: Capabilities + ?Sized>(probe: &P, names: &[String]) -> Vec<String> {
    names
        .iter()
        .filter(|name| !probe.is_present(name))
        .cloned()
        .collect()
}

/// Poll `probe` every `poll_interval` until all `names` are present or
/// `timeout` elapses.
pub async fn await_capabilities<P>(
    probe: &P,
    names: &[String],
    poll_interval: Duration,
    timeout: Duration,
) -> Readiness
where
    P: Capabilities + ?Sized,
{
    let start = Instant::now();
    let deadline = tokio::time::sleep_until(start + timeout);
    tokio::pin!(deadline);

    let mut ticker = tokio::time::interval(poll_interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut polls: u32 = 0;
    loop {
        tokio::select! {
            biased;
            _ = &mut deadline => {
                // One last look before giving up
                let missing = missing(probe, names);
                if missing.is_empty() {
                    tracing::info!("Dependencies present at timeout, continuing");
                    return Readiness::Ready { waited: start.elapsed() };
                }
                tracing::warn!(
                    ?missing,
                    timeout_ms = timeout.as_millis() as u64,
                    "Dependency wait timed out, some features unavailable"
                );
                return Readiness::Degraded { missing };
            }
            _ = ticker.tick() => {}
        }

        polls += 1;
        let missing = missing(probe, names);
        if missing.is_empty() {
            tracing::info!(polls, "Dependencies loaded");
            return Readiness::Ready {
                waited: start.elapsed(),
            };
        }

        if polls % PROGRESS_LOG_EVERY == 0 {
            tracing::debug!(
                waited_ms = start.elapsed().as_millis() as u64,
                ?missing,
                "Waiting for dependencies"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_immediately() {
        let probe = |_: &str| true;
        let result = await_capabilities(
            &probe,
            &names(&["director", "fish_tally"]),
            Duration::from_millis(100),
            Duration::from_secs(20),
        )
        .await;
        assert_eq!(result, Readiness::Ready { waited: Duration::ZERO });
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_after_capability_appears() {
        let polls = AtomicU32::new(0);
        // director shows up on the 5th poll
        let probe = |name: &str| {
            if name == "director" {
                polls.fetch_add(1, Ordering::SeqCst) >= 4
            } else {
                true
            }
        };

        let result = await_capabilities(
            &probe,
            &names(&["director", "fish_tally"]),
            Duration::from_millis(100),
            Duration::from_secs(20),
        )
        .await;

        assert_eq!(
            result,
            Readiness::Ready {
                waited: Duration::from_millis(400)
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_reports_missing() {
        let probe = |name: &str| name == "fish_tally";
        let start = Instant::now();

        let result = ReadinessGate::new(
            names(&["director", "fish_tally"]),
            Duration::from_millis(100),
            Duration::from_secs(2),
        )
        .wait(&probe)
        .await;

        assert_eq!(
            result,
            Readiness::Degraded {
                missing: names(&["director"])
            }
        );
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_name_set_is_ready() {
        let probe = |_: &str| false;
        let result = await_capabilities(
            &probe,
            &[],
            Duration::from_millis(100),
            Duration::from_millis(500),
        )
        .await;
        assert!(result.is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_future_cancels() {
        let probe = |_: &str| false;
        let gate = ReadinessGate::from_config(&ReadinessConfig::default());

        let outcome = tokio::select! {
            r = gate.wait(&probe) => Some(r),
            _ = tokio::time::sleep(Duration::from_millis(300)) => None,
        };
        assert!(outcome.is_none());
    }
}
