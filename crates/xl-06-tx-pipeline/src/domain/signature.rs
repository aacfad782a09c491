//! Recoverable secp256k1 signatures over personal-message digests.
//!
//! Verification is by recovery: the signature yields a public key, the
//! public key yields an external-chain address, and the pipeline then
//! checks that address is bound to the claimed sender. Only canonical
//! low-s signatures are accepted, so each payload has exactly one valid
//! signature encoding per key.

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use shared_types::{Address, Hash};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("Signature scalar is zero or out of range")]
    InvalidScalar,

    #[error("Signature s value is in the upper half of the curve order")]
    HighS,

    #[error("Invalid recovery byte {0}")]
    InvalidRecoveryId(u8),

    #[error("Public key recovery failed")]
    RecoveryFailed,
}

/// A 65-byte recoverable signature: `r`, `s` and the recovery byte `v`
/// (0/1, or the legacy 27/28).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub v: u8,
}

/// Digest of `message` under the personal-message envelope: the prefix
/// commits to the message length, so a signature over one payload can
/// never validate a longer payload with the same head.
pub fn personal_message_hash(message: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(b"\x19Ethereum Signed Message:\n");
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    hasher.finalize().into()
}

/// The external-chain address of a public key: the low 20 bytes of the
/// Keccak-256 digest of its uncompressed point, without the 0x04 tag.
pub fn address_of_key(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let digest = Keccak256::digest(&point.as_bytes()[1..]);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest[12..]);
    Address(out)
}

/// Recover the signing address of `digest` from a canonical signature.
pub fn recover_address(digest: &Hash, sig: &TxSignature) -> Result<Address, SignatureError> {
    let mut raw = [0u8; 64];
    raw[..32].copy_from_slice(&sig.r);
    raw[32..].copy_from_slice(&sig.s);
    let signature = Signature::from_slice(&raw).map_err(|_| SignatureError::InvalidScalar)?;
    if signature.normalize_s().is_some() {
        return Err(SignatureError::HighS);
    }
    let recovery_byte = match sig.v {
        0 | 27 => 0,
        1 | 28 => 1,
        other => return Err(SignatureError::InvalidRecoveryId(other)),
    };
    let recovery_id =
        RecoveryId::from_byte(recovery_byte).ok_or(SignatureError::InvalidRecoveryId(sig.v))?;
    let key = VerifyingKey::recover_from_prehash(digest, &signature, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailed)?;
    Ok(address_of_key(&key))
}

/// Produce a canonical recoverable signature over a prehashed digest.
/// Used by client tooling and tests; the chain itself only recovers.
pub fn sign_digest(key: &SigningKey, digest: &Hash) -> Result<TxSignature, SignatureError> {
    let (sig, recovery_id) = key
        .sign_prehash_recoverable(digest)
        .map_err(|_| SignatureError::RecoveryFailed)?;
    // Normalizing s reflects the public key across the x axis, which
    // flips the recovery parity bit.
    let (sig, recovery_id) = match sig.normalize_s() {
        Some(normalized) => {
            let flipped = RecoveryId::from_byte(recovery_id.to_byte() ^ 1)
                .ok_or(SignatureError::InvalidRecoveryId(recovery_id.to_byte()))?;
            (normalized, flipped)
        }
        None => (sig, recovery_id),
    };
    let bytes = sig.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[..32]);
    s.copy_from_slice(&bytes[32..]);
    Ok(TxSignature {
        r,
        s,
        v: recovery_id.to_byte(),
    })
}
