//! Read-only queries over committed state.
//!
//! Queries never touch the working version: they answer from the
//! latest committed snapshot, except withdrawal proofs which address an
//! explicit committed height.

use serde_json::json;
use shared_types::{Address, Identifier, Identity, TxHash};
use xl_01_state_tree::StateStore;
use xl_02_accounts::{balance_of, identifier_to_identity, next_nonce_of};
use xl_05_withdraw::{withdraw_proof_bytes, PackedWithdraw, WithdrawError};
use xl_06_tx_pipeline::{tx_status, TxStatus};

pub const CODE_OK: u32 = 0;
pub const CODE_PATH_NOT_EXIST: u32 = 60010;
pub const CODE_PARSING_REQUEST: u32 = 60020;
pub const CODE_PARSING_RESPONSE: u32 = 60030;
pub const CODE_INVALID_IDENTIFIER: u32 = 60040;
pub const CODE_WITHDRAW_PROOF_INVALID_HEIGHT: u32 = 61000;
pub const CODE_WITHDRAW_PROOF_NOT_EXIST: u32 = 61010;
pub const CODE_TX_NOT_EXIST: u32 = 62000;

#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub path: String,
    pub data: Vec<u8>,
    /// Committed height a proof query addresses; ignored by the other
    /// paths.
    pub height: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResponse {
    pub code: u32,
    pub info: String,
    pub value: Vec<u8>,
}

impl QueryResponse {
    fn ok(value: Vec<u8>) -> QueryResponse {
        QueryResponse {
            code: CODE_OK,
            info: String::new(),
            value,
        }
    }

    fn fail(code: u32, info: &str) -> QueryResponse {
        QueryResponse {
            code,
            info: info.to_string(),
            value: Vec::new(),
        }
    }
}

pub fn handle_query(store: &StateStore, req: &QueryRequest) -> QueryResponse {
    match req.path.as_str() {
        "account_info" => account_info(store, &req.data),
        "address_info" => address_info(store, &req.data),
        "tx_state" => tx_state(store, &req.data),
        "withdraw_proof" => withdraw_proof(store, &req.data, req.height),
        _ => QueryResponse::fail(CODE_PATH_NOT_EXIST, "Unknown query path"),
    }
}

/// `0x`-prefixed input is always an address; anything else is tried as
/// a base64 identity first. Short hex can be valid base64, so the
/// prefix is the only reliable discriminator.
fn parse_identifier(text: &str) -> Option<Identifier> {
    if text.starts_with("0x") {
        return text.parse::<Address>().ok().map(Identifier::Addr);
    }
    if let Ok(id) = text.parse::<Identity>() {
        return Some(Identifier::Id(id));
    }
    text.parse::<Address>().ok().map(Identifier::Addr)
}

fn account_info(store: &StateStore, data: &[u8]) -> QueryResponse {
    let text = match std::str::from_utf8(data) {
        Ok(text) => text,
        Err(_) => return QueryResponse::fail(CODE_PARSING_REQUEST, "Identifier is not UTF-8"),
    };
    let identifier = match parse_identifier(text) {
        Some(identifier) => identifier,
        None => return QueryResponse::fail(CODE_INVALID_IDENTIFIER, "Unparsable identifier"),
    };
    let snap = store.snapshot();
    let id = match identifier_to_identity(&snap, &identifier) {
        Some(id) => id,
        None => return QueryResponse::fail(CODE_INVALID_IDENTIFIER, "Identifier not registered"),
    };
    let balance = match balance_of(&snap, &Identifier::Id(id)) {
        Ok(balance) => balance,
        Err(_) => return QueryResponse::fail(CODE_PARSING_RESPONSE, "Corrupt balance record"),
    };
    let next_nonce = match next_nonce_of(&snap, &id) {
        Ok(nonce) => nonce,
        Err(_) => return QueryResponse::fail(CODE_PARSING_RESPONSE, "Corrupt nonce record"),
    };
    let value = json!({
        "balance": balance.to_string(),
        "id": id.to_string(),
        "next_nonce": next_nonce,
    });
    QueryResponse::ok(value.to_string().into_bytes())
}

/// Balance of a raw address record, registered or not.
fn address_info(store: &StateStore, data: &[u8]) -> QueryResponse {
    let text = match std::str::from_utf8(data) {
        Ok(text) => text,
        Err(_) => return QueryResponse::fail(CODE_PARSING_REQUEST, "Address is not UTF-8"),
    };
    let addr: Address = match text.parse() {
        Ok(addr) => addr,
        Err(_) => return QueryResponse::fail(CODE_INVALID_IDENTIFIER, "Unparsable address"),
    };
    let snap = store.snapshot();
    let balance = match balance_of(&snap, &Identifier::Addr(addr)) {
        Ok(balance) => balance,
        Err(_) => return QueryResponse::fail(CODE_PARSING_RESPONSE, "Corrupt balance record"),
    };
    let value = json!({ "balance": balance.to_string() });
    QueryResponse::ok(value.to_string().into_bytes())
}

fn parse_tx_hash(data: &[u8]) -> Option<TxHash> {
    if data.len() == 32 {
        let mut hash = [0u8; 32];
        hash.copy_from_slice(data);
        return Some(hash);
    }
    let text = std::str::from_utf8(data).ok()?;
    let stripped = text.strip_prefix("0x").unwrap_or(text);
    let bytes = hex::decode(stripped).ok()?;
    bytes.try_into().ok()
}

fn tx_state(store: &StateStore, data: &[u8]) -> QueryResponse {
    let hash = match parse_tx_hash(data) {
        Some(hash) => hash,
        None => return QueryResponse::fail(CODE_PARSING_REQUEST, "Unparsable transaction hash"),
    };
    let status = tx_status(&store.snapshot(), &hash);
    if status == TxStatus::NotSet {
        return QueryResponse::fail(CODE_TX_NOT_EXIST, "Unknown transaction");
    }
    let value = json!({ "status": status.to_string() });
    QueryResponse::ok(value.to_string().into_bytes())
}

fn withdraw_proof(store: &StateStore, data: &[u8], height: u64) -> QueryResponse {
    let packed = match PackedWithdraw::from_bytes(data) {
        Ok(packed) => packed,
        Err(_) => return QueryResponse::fail(CODE_PARSING_REQUEST, "Unparsable packed withdrawal"),
    };
    if height == 0 || height > store.height() {
        return QueryResponse::fail(
            CODE_WITHDRAW_PROOF_INVALID_HEIGHT,
            "Height is not a committed height",
        );
    }
    match withdraw_proof_bytes(store, &packed, height) {
        Ok(bytes) => QueryResponse::ok(bytes),
        Err(WithdrawError::ProofNotAvailable(_)) => QueryResponse::fail(
            CODE_WITHDRAW_PROOF_INVALID_HEIGHT,
            "Height has been pruned",
        ),
        Err(WithdrawError::WithdrawalNotFound(_)) => {
            QueryResponse::fail(CODE_WITHDRAW_PROOF_NOT_EXIST, "No such withdrawal")
        }
        Err(_) => QueryResponse::fail(CODE_PARSING_RESPONSE, "Proof construction failed"),
    }
}
