use std::fmt;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::driver::multi_error::{CombinedError, MultiError};
use crate::driver::transient::Transience;

/// Blocking wait between attempts.
pub trait Sleeper {
    fn sleep(&mut self, delay: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, delay: Duration) {
        thread::sleep(delay);
    }
}

/// Fixed-delay retry knobs, usually loaded from `[retry]` in `hkit.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    pub fn run<T, E, F>(&self, operation: F) -> Result<T, CombinedError>
    where
        F: FnMut() -> Result<T, E>,
        E: Transience + fmt::Display,
    {
        retry_after(self.attempts, operation, self.delay)
    }
}

/// Runs `operation` up to `attempts` times, sleeping `delay` between
/// transient failures on the current thread.
pub fn retry_after<T, E, F>(attempts: u32, operation: F, delay: Duration) -> Result<T, CombinedError>
where
    F: FnMut() -> Result<T, E>,
    E: Transience + fmt::Display,
{
    retry_after_with(&mut ThreadSleeper, attempts, operation, delay)
}

/// Same as [`retry_after`] with an explicit sleeper.
///
/// The first success wins and earlier failures are dropped. A permanent
/// failure stops the session at once. Otherwise every failure is kept and
/// surfaced, joined, once the budget is spent. There is no sleep after the
/// last attempt. `attempts == 0` runs the operation once.
pub fn retry_after_with<S, T, E, F>(
    sleeper: &mut S,
    attempts: u32,
    mut operation: F,
    delay: Duration,
) -> Result<T, CombinedError>
where
    S: Sleeper + ?Sized,
    F: FnMut() -> Result<T, E>,
    E: Transience + fmt::Display,
{
    let attempts = attempts.max(1);
    let mut failures = MultiError::new();

    for attempt in 1..=attempts {
        let err = match operation() {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        let transient = err.is_transient();
        debug!(attempt, attempts, transient, error = %err, "attempt failed");
        failures.collect(Some(err));

        if !transient {
            break;
        }
        if attempt < attempts {
            sleeper.sleep(delay);
        }
    }

    let Some(combined) = failures.to_error() else {
        unreachable!("a failed retry session records at least one error");
    };
    warn!(failures = failures.len(), "retry session failed");
    Err(combined)
}

#[cfg(test)]
mod tests {
    use super::{RetryPolicy, Sleeper, retry_after, retry_after_with};
    use crate::driver::transient::AttemptError;
    use std::time::Duration;

    #[derive(Default)]
    struct CountingSleeper {
        slept: Vec<Duration>,
    }

    impl Sleeper for CountingSleeper {
        fn sleep(&mut self, delay: Duration) {
            self.slept.push(delay);
        }
    }

    const DELAY: Duration = Duration::from_secs(2);

    #[test]
    fn success_on_first_attempt_never_sleeps() {
        let mut sleeper = CountingSleeper::default();
        let mut calls = 0;
        let result = retry_after_with(
            &mut sleeper,
            3,
            || {
                calls += 1;
                Ok::<_, AttemptError>(())
            },
            DELAY,
        );

        assert!(result.is_ok());
        assert_eq!(calls, 1);
        assert!(sleeper.slept.is_empty());
    }

    #[test]
    fn transient_failures_exhaust_budget_and_sleep_between_attempts() {
        let mut sleeper = CountingSleeper::default();
        let mut calls = 0;
        let result: Result<(), _> = retry_after_with(
            &mut sleeper,
            3,
            || {
                calls += 1;
                Err(AttemptError::retriable(anyhow::anyhow!("attempt {calls} not ready")))
            },
            DELAY,
        );

        let err = result.expect_err("should fail");
        assert_eq!(calls, 3);
        assert_eq!(sleeper.slept, vec![DELAY, DELAY]);
        assert_eq!(err.count(), 3);
        let lines: Vec<_> = err.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Temporary Error: attempt 1 not ready",
                "Temporary Error: attempt 2 not ready",
                "Temporary Error: attempt 3 not ready",
            ]
        );
    }

    #[test]
    fn permanent_failure_short_circuits() {
        let mut sleeper = CountingSleeper::default();
        let mut calls = 0;
        let result: Result<(), _> = retry_after_with(
            &mut sleeper,
            5,
            || {
                calls += 1;
                Err(AttemptError::permanent(anyhow::anyhow!("image is not a disk")))
            },
            DELAY,
        );

        let err = result.expect_err("should fail");
        assert_eq!(calls, 1);
        assert!(sleeper.slept.is_empty());
        assert_eq!(err.lines().count(), 1);
        assert_eq!(err.message(), "image is not a disk");
    }

    #[test]
    fn transient_then_success_discards_earlier_failure() {
        let mut sleeper = CountingSleeper::default();
        let mut calls = 0;
        let result = retry_after_with(
            &mut sleeper,
            3,
            || {
                calls += 1;
                if calls < 2 {
                    Err(AttemptError::retriable(anyhow::anyhow!("busy")))
                } else {
                    Ok(())
                }
            },
            DELAY,
        );

        assert!(result.is_ok());
        assert_eq!(calls, 2);
        assert_eq!(sleeper.slept.len(), 1);
    }

    #[test]
    fn permanent_after_transient_reports_both() {
        let mut sleeper = CountingSleeper::default();
        let mut calls = 0;
        let result: Result<(), _> = retry_after_with(
            &mut sleeper,
            4,
            || {
                calls += 1;
                if calls == 1 {
                    Err(AttemptError::retriable(anyhow::anyhow!("busy")))
                } else {
                    Err(AttemptError::permanent(anyhow::anyhow!("gone")))
                }
            },
            DELAY,
        );

        let err = result.expect_err("should fail");
        assert_eq!(calls, 2);
        assert_eq!(sleeper.slept.len(), 1);
        assert_eq!(err.message(), "Temporary Error: busy\ngone");
    }

    #[test]
    fn zero_attempts_still_runs_once() {
        let mut sleeper = CountingSleeper::default();
        let mut calls = 0;
        let result: Result<(), _> = retry_after_with(
            &mut sleeper,
            0,
            || {
                calls += 1;
                Err(AttemptError::retriable(anyhow::anyhow!("busy")))
            },
            DELAY,
        );

        assert!(result.is_err());
        assert_eq!(calls, 1);
        assert!(sleeper.slept.is_empty());
    }

    #[test]
    fn returns_the_successful_value() {
        let mut calls = 0;
        let got = retry_after(
            3,
            || {
                calls += 1;
                if calls == 1 {
                    Err(AttemptError::retriable(anyhow::anyhow!("not yet")))
                } else {
                    Ok("192.168.64.2")
                }
            },
            Duration::from_millis(1),
        )
        .expect("ip");
        assert_eq!(got, "192.168.64.2");
    }

    #[test]
    fn policy_runs_with_its_own_budget() {
        let policy = RetryPolicy::new(2, Duration::from_millis(1));
        let mut calls = 0;
        let result: Result<(), _> = policy.run(|| {
            calls += 1;
            Err(AttemptError::retriable(anyhow::anyhow!("busy")))
        });
        assert_eq!(result.expect_err("fail").lines().count(), 2);
        assert_eq!(calls, 2);
    }
}
