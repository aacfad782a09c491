//! Account registry operations.
//!
//! All functions operate through the state-tree handle traits, so the
//! same code serves validation (read-only snapshot) and execution
//! (working state).

use sha3::{Digest, Keccak256};
use shared_types::{Address, Amount, Identifier, Identity};
use tracing::debug;
use xl_01_state_tree::{ReadState, WriteState};

use crate::domain::errors::AccountError;
use crate::domain::keys;

/// Generate a fresh identity from the persisted seed counter and the
/// current block hash, then advance the seed. Deterministic across
/// replicas because both inputs are consensus state.
fn generate_identity(state: &mut impl WriteState) -> Result<Identity, AccountError> {
    let seed = match state.ledger_get(keys::IDENTITY_SEED_KEY) {
        None => 1u64,
        Some(raw) => decode_u64(&raw, "identity seed")?,
    };

    let mut preimage = [0u8; 40];
    preimage[..8].copy_from_slice(&seed.to_be_bytes());
    preimage[8..].copy_from_slice(&state.block_hash());
    let digest = Keccak256::digest(preimage);
    let mut content = [0u8; 20];
    content.copy_from_slice(&digest[..20]);

    state.ledger_set(keys::IDENTITY_SEED_KEY, (seed + 1).to_be_bytes().to_vec());
    Ok(Identity(content))
}

/// Whether the identity has at least one bound address.
pub fn is_identity_registered(state: &impl ReadState, id: &Identity) -> bool {
    let prefix = keys::id_addr_pair_prefix(id);
    let end = prefix_end(&prefix);
    let mut found = false;
    state.ledger_range(Some(&prefix), Some(&end), &mut |_, _| {
        found = true;
        true
    });
    found
}

pub fn is_address_registered(state: &impl ReadState, addr: &Address) -> bool {
    state.ledger_get(&keys::address_id_key(addr)).is_some()
}

/// Whether `addr` is one of the addresses bound to `id`. Signature
/// checks resolve the recovered address through this rather than the
/// global address index, so a key bound to one identity cannot sign
/// for another.
pub fn has_address(state: &impl ReadState, id: &Identity, addr: &Address) -> bool {
    state
        .ledger_get(&keys::id_addr_pair_key(id, addr))
        .is_some()
}

/// Resolve an identifier to a registered identity, if any.
pub fn identifier_to_identity(state: &impl ReadState, identifier: &Identifier) -> Option<Identity> {
    match identifier {
        Identifier::Id(id) => {
            if is_identity_registered(state, id) {
                Some(*id)
            } else {
                None
            }
        }
        Identifier::Addr(addr) => {
            let raw = state.ledger_get(&keys::address_id_key(addr))?;
            Identity::from_slice(&raw).ok()
        }
    }
}

/// Rewrite an address identifier to its bound identity. Unbound
/// addresses pass through unchanged, keying an address-only record.
pub fn normalize(state: &impl ReadState, identifier: &Identifier) -> Identifier {
    if let Identifier::Addr(addr) = identifier {
        if let Some(raw) = state.ledger_get(&keys::address_id_key(addr)) {
            if let Ok(id) = Identity::from_slice(&raw) {
                return Identifier::Id(id);
            }
        }
    }
    *identifier
}

/// Bind `addr` to `id`, creating the account record. Any balance the
/// address accumulated before registration moves into the identity's
/// record; the nonce starts at one.
pub fn bind(
    state: &mut impl WriteState,
    id: &Identity,
    addr: &Address,
) -> Result<(), AccountError> {
    if is_identity_registered(state, id) || is_address_registered(state, addr) {
        return Err(AccountError::AlreadyRegistered);
    }

    state.ledger_set(&keys::address_id_key(addr), id.as_bytes().to_vec());
    state.ledger_set(&keys::id_addr_pair_key(id, addr), Vec::new());

    let addr_identifier = Identifier::Addr(*addr);
    let absorbed = raw_balance(state, &addr_identifier)?;
    if !absorbed.is_zero() {
        state.ledger_remove(&keys::balance_key(&addr_identifier));
        debug!("[xl-02] Absorbed pre-registration balance {} into {}", absorbed, id);
    }

    state.ledger_set(
        &keys::balance_key(&Identifier::Id(*id)),
        absorbed.to_be_bytes().to_vec(),
    );
    advance_nonce(state, id)?;
    Ok(())
}

/// Create an account for `addr` under a freshly generated identity.
pub fn register(
    state: &mut impl WriteState,
    addr: &Address,
) -> Result<Identity, AccountError> {
    if is_address_registered(state, addr) {
        return Err(AccountError::AlreadyRegistered);
    }
    let id = generate_identity(state)?;
    bind(state, &id, addr)?;
    debug!("[xl-02] Registered {} as {}", addr, id);
    Ok(id)
}

fn raw_balance(state: &impl ReadState, identifier: &Identifier) -> Result<Amount, AccountError> {
    match state.ledger_get(&keys::balance_key(identifier)) {
        None => Ok(Amount::zero()),
        Some(raw) => {
            if raw.len() != 32 {
                return Err(AccountError::Corrupt(format!(
                    "balance record of {} has {} bytes",
                    identifier,
                    raw.len()
                )));
            }
            Ok(Amount::from_be_bytes(&raw))
        }
    }
}

/// Balance of the account the identifier resolves to.
pub fn balance_of(state: &impl ReadState, identifier: &Identifier) -> Result<Amount, AccountError> {
    let normalized = normalize(state, identifier);
    raw_balance(state, &normalized)
}

pub fn save_balance(
    state: &mut impl WriteState,
    identifier: &Identifier,
    balance: Amount,
) -> Result<(), AccountError> {
    let normalized = normalize(state, identifier);
    state.ledger_set(
        &keys::balance_key(&normalized),
        balance.to_be_bytes().to_vec(),
    );
    Ok(())
}

/// Credit `delta`. An unbound address target materializes an
/// address-only record on first credit.
pub fn add_balance(
    state: &mut impl WriteState,
    identifier: &Identifier,
    delta: Amount,
) -> Result<(), AccountError> {
    let balance = balance_of(state, identifier)?;
    let new_balance = balance
        .checked_add(delta)
        .map_err(|_| AccountError::InvalidAmount)?;
    save_balance(state, identifier, new_balance)
}

/// Debit `delta`. Fails without mutating when the balance is short.
pub fn sub_balance(
    state: &mut impl WriteState,
    identifier: &Identifier,
    delta: Amount,
) -> Result<(), AccountError> {
    let balance = balance_of(state, identifier)?;
    let new_balance = balance
        .checked_sub(delta)
        .map_err(|_| AccountError::InsufficientBalance {
            have: balance.to_string(),
            need: delta.to_string(),
        })?;
    save_balance(state, identifier, new_balance)
}

/// The nonce the account's next transaction must carry. Zero means the
/// account does not exist yet; registration initializes it to one.
pub fn next_nonce_of(state: &impl ReadState, id: &Identity) -> Result<u64, AccountError> {
    match state.ledger_get(&keys::next_nonce_key(id)) {
        None => Ok(0),
        Some(raw) => decode_u64(&raw, "nonce record"),
    }
}

/// Advance the nonce by exactly one.
pub fn advance_nonce(state: &mut impl WriteState, id: &Identity) -> Result<(), AccountError> {
    let next = next_nonce_of(state, id)? + 1;
    state.ledger_set(&keys::next_nonce_key(id), next.to_be_bytes().to_vec());
    Ok(())
}

fn decode_u64(raw: &[u8], what: &str) -> Result<u64, AccountError> {
    let bytes: [u8; 8] = raw
        .try_into()
        .map_err(|_| AccountError::Corrupt(format!("{what} has {} bytes", raw.len())))?;
    Ok(u64::from_be_bytes(bytes))
}

/// Smallest key strictly greater than every key with this prefix.
fn prefix_end(prefix: &[u8]) -> Vec<u8> {
    let mut end = prefix.to_vec();
    for i in (0..end.len()).rev() {
        if end[i] != 0xff {
            end[i] += 1;
            end.truncate(i + 1);
            return end;
        }
    }
    // All 0xff: no upper bound needed in practice for our prefixes.
    end.push(0);
    end
}
