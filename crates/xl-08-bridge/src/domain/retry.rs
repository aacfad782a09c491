//! Bounded retry of fallible operations.

use tracing::warn;

use crate::domain::errors::BridgeError;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy { max_attempts: 5 }
    }
}

impl RetryPolicy {
    /// Run `op` until it succeeds or the attempt budget is spent. The
    /// closure receives the 1-based attempt number. Exhaustion is
    /// terminal: callers treat it as a fatal relay failure, not
    /// something to wrap in another retry loop.
    pub fn run<T, E: std::fmt::Display>(
        &self,
        mut op: impl FnMut(u32) -> Result<T, E>,
    ) -> Result<T, BridgeError> {
        for attempt in 1..=self.max_attempts {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(
                        "[xl-08] Attempt {}/{} failed: {}",
                        attempt, self.max_attempts, e
                    );
                }
            }
        }
        Err(BridgeError::AttemptsExhausted {
            attempts: self.max_attempts,
        })
    }
}
