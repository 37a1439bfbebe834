//! Retry and rate limiting for calls to the extraction service
//!
//! A `Retrier` owns its policy, its clock and the time of its last call, so
//! two ingestion pipelines never share throttling state. The clock is
//! injected; tests drive it by hand instead of sleeping.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::RetryError;

/// Source of elapsed time and a way to wait
pub trait Clock {
    /// Monotonic time since an arbitrary fixed origin.
    fn now(&self) -> Duration;
    fn sleep(&mut self, duration: Duration);
}

/// Wall clock backed by `std::thread::sleep`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first; values below 1 are treated as 1
    pub max_attempts: u32,
    /// Wait after the n-th failed attempt; the last entry repeats
    pub backoff_schedule: Vec<Duration>,
    /// Minimum spacing between the starts of consecutive calls
    pub min_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_schedule: vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
            ],
            min_interval: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn backoff_for(&self, attempt: usize) -> Duration {
        self.backoff_schedule
            .get(attempt)
            .or(self.backoff_schedule.last())
            .copied()
            .unwrap_or(Duration::ZERO)
    }
}

#[derive(Debug)]
pub struct Retrier<C: Clock> {
    policy: RetryPolicy,
    clock: C,
    last_call: Option<Duration>,
}

impl Retrier<SystemClock> {
    pub fn with_system_clock(policy: RetryPolicy) -> Self {
        Self::new(policy, SystemClock::new())
    }
}

impl<C: Clock> Retrier<C> {
    pub fn new(policy: RetryPolicy, clock: C) -> Self {
        Self {
            policy,
            clock,
            last_call: None,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run `op` under the policy.
    ///
    /// Errors for which `is_retryable` returns false end the run immediately.
    pub fn execute<T, E, F, R>(&mut self, mut op: F, is_retryable: R) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Result<T, E>,
        R: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            self.throttle();
            self.last_call = Some(self.clock.now());
            attempt += 1;

            let err = match op() {
                Ok(value) => return Ok(value),
                Err(e) if !is_retryable(&e) => return Err(RetryError::Fatal(e)),
                Err(e) => e,
            };

            if attempt >= max_attempts {
                tracing::warn!(attempts = attempt, error = %err, "retries exhausted");
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last: err,
                });
            }

            let wait = self.policy.backoff_for(attempt as usize - 1);
            tracing::warn!(attempt, ?wait, error = %err, "retrying after failure");
            self.clock.sleep(wait);
        }
    }

    fn throttle(&mut self) {
        let Some(last) = self.last_call else {
            return;
        };
        let elapsed = self.clock.now().saturating_sub(last);
        if elapsed < self.policy.min_interval {
            self.clock.sleep(self.policy.min_interval - elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct FakeClock {
        now: Duration,
        sleeps: Vec<Duration>,
    }

    impl Clock for FakeClock {
        fn now(&self) -> Duration {
            self.now
        }

        fn sleep(&mut self, duration: Duration) {
            self.now += duration;
            self.sleeps.push(duration);
        }
    }

    #[derive(Debug, PartialEq)]
    enum CallError {
        RateLimited,
        BadRequest,
    }

    impl std::fmt::Display for CallError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{self:?}")
        }
    }

    fn retryable(e: &CallError) -> bool {
        *e == CallError::RateLimited
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_succeeds_after_retryable_failures() {
        let mut retrier = Retrier::new(RetryPolicy::default(), FakeClock::default());
        let mut calls = 0;
        let result = retrier.execute(
            || {
                calls += 1;
                if calls < 3 {
                    Err(CallError::RateLimited)
                } else {
                    Ok(calls)
                }
            },
            retryable,
        );

        assert_eq!(result, Ok(3));
        assert_eq!(retrier.clock().sleeps, vec![secs(1), secs(2)]);
    }

    #[test]
    fn test_exhausted_reports_attempts_and_last_error() {
        let mut retrier = Retrier::new(RetryPolicy::default(), FakeClock::default());
        let mut calls = 0;
        let result: Result<(), _> = retrier.execute(
            || {
                calls += 1;
                Err(CallError::RateLimited)
            },
            retryable,
        );

        assert_eq!(calls, 3);
        assert_eq!(
            result,
            Err(RetryError::Exhausted {
                attempts: 3,
                last: CallError::RateLimited
            })
        );
        // No wait after the final attempt
        assert_eq!(retrier.clock().sleeps, vec![secs(1), secs(2)]);
    }

    #[test]
    fn test_fatal_error_is_not_retried() {
        let mut retrier = Retrier::new(RetryPolicy::default(), FakeClock::default());
        let mut calls = 0;
        let result: Result<(), _> = retrier.execute(
            || {
                calls += 1;
                Err(CallError::BadRequest)
            },
            retryable,
        );

        assert_eq!(calls, 1);
        assert_eq!(result, Err(RetryError::Fatal(CallError::BadRequest)));
        assert!(retrier.clock().sleeps.is_empty());
    }

    #[test]
    fn test_last_backoff_entry_repeats() {
        let policy = RetryPolicy {
            max_attempts: 5,
            backoff_schedule: vec![secs(1), secs(3)],
            min_interval: Duration::ZERO,
        };
        let mut retrier = Retrier::new(policy, FakeClock::default());
        let _: Result<(), _> = retrier.execute(|| Err(CallError::RateLimited), retryable);

        assert_eq!(
            retrier.clock().sleeps,
            vec![secs(1), secs(3), secs(3), secs(3)]
        );
    }

    #[test]
    fn test_min_interval_spaces_consecutive_calls() {
        let policy = RetryPolicy {
            min_interval: Duration::from_millis(500),
            ..RetryPolicy::default()
        };
        let mut retrier = Retrier::new(policy, FakeClock::default());

        let ok = |_: &CallError| false;
        assert_eq!(retrier.execute(|| Ok::<_, CallError>(1), ok), Ok(1));
        assert_eq!(retrier.execute(|| Ok::<_, CallError>(2), ok), Ok(2));
        assert_eq!(retrier.clock().sleeps, vec![Duration::from_millis(500)]);

        // Enough time has passed on its own
        retrier.clock.now += secs(10);
        assert_eq!(retrier.execute(|| Ok::<_, CallError>(3), ok), Ok(3));
        assert_eq!(retrier.clock().sleeps.len(), 1);
    }

    #[test]
    fn test_zero_attempts_still_calls_once() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        let mut retrier = Retrier::new(policy, FakeClock::default());
        let result: Result<(), _> = retrier.execute(|| Err(CallError::RateLimited), retryable);
        assert!(matches!(result, Err(RetryError::Exhausted { attempts: 1, .. })));
    }

    #[test]
    fn test_backoff_for_empty_schedule() {
        let policy = RetryPolicy {
            backoff_schedule: Vec::new(),
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff_for(0), Duration::ZERO);
    }
}
