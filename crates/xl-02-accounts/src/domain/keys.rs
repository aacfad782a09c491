//! Ledger-tree key layout for account records.
//!
//! All account keys live under the `acc:` prefix. Keys embed the tagged
//! 21-byte identifier form so identity-keyed and address-keyed records
//! can never collide.

use shared_types::{Address, Identifier, Identity};

/// Persistent counter feeding identity generation.
pub const IDENTITY_SEED_KEY: &[u8] = b"$acc.identitySeed";

pub fn balance_key(identifier: &Identifier) -> Vec<u8> {
    let mut key = Vec::with_capacity(34);
    key.extend_from_slice(b"acc:");
    key.extend_from_slice(&identifier.to_key_bytes());
    key.extend_from_slice(b":balance");
    key
}

pub fn next_nonce_key(id: &Identity) -> Vec<u8> {
    let mut key = Vec::with_capacity(36);
    key.extend_from_slice(b"acc:");
    key.extend_from_slice(&Identifier::Id(*id).to_key_bytes());
    key.extend_from_slice(b":nextNonce");
    key
}

/// Address to identity mapping.
pub fn address_id_key(addr: &Address) -> Vec<u8> {
    let mut key = Vec::with_capacity(29);
    key.extend_from_slice(b"acc:");
    key.extend_from_slice(&Identifier::Addr(*addr).to_key_bytes());
    key.extend_from_slice(b":id");
    key
}

/// Prefix under which an identity's bound addresses are recorded.
pub fn id_addr_pair_prefix(id: &Identity) -> Vec<u8> {
    let mut key = Vec::with_capacity(31);
    key.extend_from_slice(b"acc:");
    key.extend_from_slice(&Identifier::Id(*id).to_key_bytes());
    key.extend_from_slice(b":addr:");
    key
}

pub fn id_addr_pair_key(id: &Identity, addr: &Address) -> Vec<u8> {
    let mut key = id_addr_pair_prefix(id);
    key.extend_from_slice(addr.as_bytes());
    key
}
