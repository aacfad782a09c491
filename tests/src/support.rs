//! Keys, signatures, and raw transaction envelopes shared by the
//! integration flows.

use k256::ecdsa::SigningKey;
use shared_types::{Address, Amount, BlockTime, Hash, Identifier, TxHash};
use xl_03_deposit::Proposal;
use xl_06_tx_pipeline::{
    address_of_key, encode_tx, sign_digest, ClaimHashedTransferTx, DepositApprovalTx, DepositTx,
    HashedTransferTx, RegisterTx, Transaction, TransferOutput, TransferTx, TxSignature, WithdrawTx,
};
use xl_07_app::{AppConfig, Application, QueryRequest, QueryResponse};

static INIT_TRACING: std::sync::Once = std::sync::Once::new();

/// Install a log subscriber once so `RUST_LOG` works under
/// `cargo test -- --nocapture`.
fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Application bootstrapped from `(addr, balance, approver weight)`
/// genesis triples with default retention.
pub fn app_with_genesis(accounts: &[(Address, u64, u32)]) -> Application {
    init_tracing();
    let mut app = Application::new(&AppConfig::default());
    app.init_chain(&genesis_json(accounts)).unwrap();
    app
}

pub fn key(seed: u8) -> SigningKey {
    SigningKey::from_slice(&[seed; 32]).unwrap()
}

pub fn key_address(key: &SigningKey) -> Address {
    address_of_key(key.verifying_key())
}

fn empty_sig() -> TxSignature {
    TxSignature {
        r: [0u8; 32],
        s: [0u8; 32],
        v: 0,
    }
}

/// Genesis document for `(addr, balance, approver weight)` triples.
pub fn genesis_json(accounts: &[(Address, u64, u32)]) -> String {
    let accounts: Vec<_> = accounts
        .iter()
        .map(|(addr, balance, weight)| {
            serde_json::json!({
                "addr": addr.to_string(),
                "balance": balance.to_string(),
                "weight": weight,
            })
        })
        .collect();
    serde_json::json!({ "accounts": accounts }).to_string()
}

pub fn query(app: &Application, path: &str, data: Vec<u8>, height: u64) -> QueryResponse {
    app.query(&QueryRequest {
        path: path.to_string(),
        data,
        height,
    })
}

/// JSON body of a successful query.
pub fn query_value(app: &Application, path: &str, data: Vec<u8>) -> serde_json::Value {
    let res = query(app, path, data, 0);
    assert_eq!(res.code, 0, "query {path} failed: {}", res.info);
    serde_json::from_slice(&res.value).unwrap()
}

pub fn register_raw(key: &SigningKey) -> Vec<u8> {
    let mut tx = RegisterTx {
        addr: key_address(key),
        sig: empty_sig(),
    };
    tx.sig = sign_digest(key, &tx.signing_digest()).unwrap();
    encode_tx(&Transaction::Register(tx)).unwrap()
}

pub fn transfer_raw(
    key: &SigningKey,
    from: Identifier,
    to: Identifier,
    value: u64,
    nonce: u64,
) -> Vec<u8> {
    let mut tx = TransferTx {
        from,
        outputs: vec![TransferOutput {
            to,
            value: Amount::from(value),
            remark: Vec::new(),
        }],
        fee: Amount::from(0),
        nonce,
        sig: empty_sig(),
    };
    tx.sig = sign_digest(key, &tx.signing_digest()).unwrap();
    encode_tx(&Transaction::Transfer(tx)).unwrap()
}

pub fn withdraw_raw(
    key: &SigningKey,
    from: Identifier,
    to_addr: Address,
    value: u64,
    fee: u64,
    nonce: u64,
) -> Vec<u8> {
    let mut tx = WithdrawTx {
        from,
        to_addr,
        value: Amount::from(value),
        fee: Amount::from(fee),
        nonce,
        sig: empty_sig(),
    };
    tx.sig = sign_digest(key, &tx.signing_digest()).unwrap();
    encode_tx(&Transaction::Withdraw(tx)).unwrap()
}

pub fn deposit_raw(key: &SigningKey, from: Identifier, proposal: Proposal, nonce: u64) -> Vec<u8> {
    let mut tx = DepositTx {
        from,
        proposal,
        nonce,
        sig: empty_sig(),
    };
    tx.sig = sign_digest(key, &tx.signing_digest()).unwrap();
    encode_tx(&Transaction::Deposit(tx)).unwrap()
}

pub fn deposit_approval_raw(
    key: &SigningKey,
    from: Identifier,
    deposit_tx_hash: TxHash,
    nonce: u64,
) -> Vec<u8> {
    let mut tx = DepositApprovalTx {
        from,
        deposit_tx_hash,
        nonce,
        sig: empty_sig(),
    };
    tx.sig = sign_digest(key, &tx.signing_digest()).unwrap();
    encode_tx(&Transaction::DepositApproval(tx)).unwrap()
}

#[allow(clippy::too_many_arguments)]
pub fn hashed_transfer_raw(
    key: &SigningKey,
    from: Identifier,
    to: Identifier,
    value: u64,
    hash_commit: Hash,
    expiry: BlockTime,
    nonce: u64,
) -> Vec<u8> {
    let mut tx = HashedTransferTx {
        from,
        to,
        value: Amount::from(value),
        hash_commit,
        expiry,
        fee: Amount::from(0),
        nonce,
        sig: empty_sig(),
    };
    tx.sig = sign_digest(key, &tx.signing_digest()).unwrap();
    encode_tx(&Transaction::HashedTransfer(tx)).unwrap()
}

pub fn claim_raw(
    key: &SigningKey,
    from: Identifier,
    htlc_tx_hash: TxHash,
    secret: Vec<u8>,
    nonce: u64,
) -> Vec<u8> {
    let mut tx = ClaimHashedTransferTx {
        from,
        htlc_tx_hash,
        secret,
        nonce,
        sig: empty_sig(),
    };
    tx.sig = sign_digest(key, &tx.signing_digest()).unwrap();
    encode_tx(&Transaction::ClaimHashedTransfer(tx)).unwrap()
}
