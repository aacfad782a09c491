//! Bridge client errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("No endpoints configured")]
    NoEndpoints,

    #[error("Gave up after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },
}
