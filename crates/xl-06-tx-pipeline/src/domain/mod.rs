pub mod codec;
pub mod result;
pub mod signature;
pub mod status;
pub mod txs;

pub use codec::{decode_tx, encode_tx, tx_hash, CodecError, Transaction};
pub use result::{TxResult, TxStatus};
pub use signature::{
    address_of_key, personal_message_hash, recover_address, sign_digest, SignatureError,
    TxSignature,
};
pub use status::{set_tx_status, tx_status};
pub use txs::{
    ClaimHashedTransferTx, DepositApprovalTx, DepositTx, HashedTransferTx, RegisterTx,
    StateCorruption, TransferOutput, TransferTx, WithdrawTx, MAX_REMARK_LEN,
};
