use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Bounded retry with a fixed pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

/// Returned once every attempt has failed.
#[derive(Debug)]
pub struct Exhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::single_attempt()
    }
}

impl RetryPolicy {
    /// `max_attempts` of zero is treated as one.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn single_attempt() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Runs `op` until it succeeds or the attempt budget is spent.
    ///
    /// Attempts are strictly sequential; `op` receives the 1-based attempt number.
    pub async fn run<T, E, F, Fut>(&self, what: &str, mut op: F) -> Result<T, Exhausted<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= self.max_attempts => {
                    log::warn!("{what}: attempt {attempt}/{} failed: {err}", self.max_attempts);
                    return Err(Exhausted {
                        attempts: attempt,
                        last_error: err,
                    });
                }
                Err(err) => {
                    log::warn!(
                        "{what}: attempt {attempt}/{} failed, retrying in {}ms: {err}",
                        self.max_attempts,
                        self.delay.as_millis()
                    );
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }
}
