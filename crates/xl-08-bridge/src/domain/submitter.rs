//! Serialized submission for a single signing identity.

use parking_lot::Mutex;

/// Hands out the identity's nonce sequence under a lock. A nonce is
/// consumed only when the submission closure succeeds, so a failed
/// relay retries with the same nonce instead of leaving a gap.
#[derive(Debug)]
pub struct Submitter {
    next_nonce: Mutex<u64>,
}

impl Submitter {
    pub fn new(next_nonce: u64) -> Submitter {
        Submitter {
            next_nonce: Mutex::new(next_nonce),
        }
    }

    pub fn next_nonce(&self) -> u64 {
        *self.next_nonce.lock()
    }

    /// Run `submit` with the current nonce while holding the lock.
    pub fn submit<T, E>(&self, submit: impl FnOnce(u64) -> Result<T, E>) -> Result<T, E> {
        let mut nonce = self.next_nonce.lock();
        let result = submit(*nonce);
        if result.is_ok() {
            *nonce += 1;
        }
        result
    }
}
