//! Transaction response codes and statuses.
//!
//! Codes are grouped by kind: 0 is success, 1xxxx are transaction
//! failures (the second pair of digits names the kind), 6xxxx are
//! query failures owned by the application layer. The table is part of
//! consensus: every replica must return the same code for the same
//! transaction, and whether a failed transaction consumes the sender's
//! nonce is a property of its code.

use std::fmt;

/// Lifecycle status of a transaction, persisted by its hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    NotSet,
    Fail,
    Success,
    Pending,
}

impl TxStatus {
    pub fn as_i8(self) -> i8 {
        match self {
            TxStatus::NotSet => -1,
            TxStatus::Fail => 0,
            TxStatus::Success => 1,
            TxStatus::Pending => 2,
        }
    }

    pub fn from_i8(v: i8) -> Option<TxStatus> {
        match v {
            -1 => Some(TxStatus::NotSet),
            0 => Some(TxStatus::Fail),
            1 => Some(TxStatus::Success),
            2 => Some(TxStatus::Pending),
            _ => None,
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TxStatus::NotSet => "not set",
            TxStatus::Fail => "fail",
            TxStatus::Success => "success",
            TxStatus::Pending => "pending",
        })
    }
}

/// Outcome of checking or delivering one transaction.
///
/// `advances_nonce` marks failure classes that still consume the
/// sender's nonce at deliver time: the transaction was well formed and
/// authorized, it merely lost to the state it found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxResult {
    pub code: u32,
    pub info: &'static str,
    pub status: TxStatus,
    pub advances_nonce: bool,
    pub data: Option<Vec<u8>>,
    pub tags: Vec<(String, String)>,
}

impl TxResult {
    pub fn success() -> TxResult {
        TxResult {
            code: 0,
            info: "",
            status: TxStatus::Success,
            advances_nonce: true,
            data: None,
            tags: Vec::new(),
        }
    }

    fn fail(code: u32, info: &'static str, advances_nonce: bool) -> TxResult {
        TxResult {
            code,
            info,
            status: TxStatus::Fail,
            advances_nonce,
            data: None,
            tags: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Downgrade a successful result to pending, for transactions whose
    /// final outcome depends on later transactions.
    pub fn pending(mut self) -> TxResult {
        self.status = TxStatus::Pending;
        self
    }

    pub fn with_data(mut self, data: Vec<u8>) -> TxResult {
        self.data = Some(data);
        self
    }

    pub fn with_tag(mut self, key: &str, value: String) -> TxResult {
        self.tags.push((key.to_string(), value));
        self
    }

    // Register

    pub fn register_invalid_format() -> TxResult {
        Self::fail(10000, "Invalid register transaction format", false)
    }
    pub fn register_invalid_signature() -> TxResult {
        Self::fail(10010, "Invalid register transaction signature", false)
    }
    pub fn register_duplicated() -> TxResult {
        Self::fail(10020, "Duplicated registration", false)
    }

    // Deposit

    pub fn deposit_invalid_format() -> TxResult {
        Self::fail(11000, "Invalid deposit transaction format", false)
    }
    pub fn deposit_invalid_signature() -> TxResult {
        Self::fail(11010, "Invalid deposit transaction signature", false)
    }
    pub fn deposit_duplicated() -> TxResult {
        Self::fail(11020, "Duplicated deposit transaction", false)
    }
    pub fn deposit_sender_not_registered() -> TxResult {
        Self::fail(11030, "Sender of deposit transaction not registered", false)
    }
    pub fn deposit_invalid_nonce() -> TxResult {
        Self::fail(11040, "Invalid deposit transaction nonce", false)
    }
    pub fn deposit_not_approver() -> TxResult {
        Self::fail(11050, "Sender is not a deposit approver", true)
    }
    pub fn deposit_double_approval() -> TxResult {
        Self::fail(11060, "Sender already approved this proposal", true)
    }
    pub fn deposit_already_executed() -> TxResult {
        Self::fail(11070, "Deposit for this block number already executed", true)
    }

    // Transfer

    pub fn transfer_invalid_format() -> TxResult {
        Self::fail(12000, "Invalid transfer transaction format", false)
    }
    pub fn transfer_invalid_signature() -> TxResult {
        Self::fail(12010, "Invalid transfer transaction signature", false)
    }
    pub fn transfer_duplicated() -> TxResult {
        Self::fail(12020, "Duplicated transfer transaction", false)
    }
    pub fn transfer_sender_not_registered() -> TxResult {
        Self::fail(12030, "Sender of transfer transaction not registered", false)
    }
    pub fn transfer_not_enough_balance() -> TxResult {
        Self::fail(12040, "Not enough balance for transfer", true)
    }
    pub fn transfer_invalid_receiver() -> TxResult {
        Self::fail(12050, "Invalid transfer receiver", true)
    }
    pub fn transfer_invalid_nonce() -> TxResult {
        Self::fail(12060, "Invalid transfer transaction nonce", false)
    }

    // Withdraw

    pub fn withdraw_invalid_format() -> TxResult {
        Self::fail(13000, "Invalid withdraw transaction format", false)
    }
    pub fn withdraw_invalid_signature() -> TxResult {
        Self::fail(13010, "Invalid withdraw transaction signature", false)
    }
    pub fn withdraw_duplicated() -> TxResult {
        Self::fail(13020, "Duplicated withdraw transaction", false)
    }
    pub fn withdraw_sender_not_registered() -> TxResult {
        Self::fail(13030, "Sender of withdraw transaction not registered", false)
    }
    pub fn withdraw_not_enough_balance() -> TxResult {
        Self::fail(13040, "Not enough balance for withdrawal", true)
    }
    pub fn withdraw_invalid_nonce() -> TxResult {
        Self::fail(13050, "Invalid withdraw transaction nonce", false)
    }

    // Deposit approval

    pub fn deposit_approval_invalid_format() -> TxResult {
        Self::fail(14000, "Invalid deposit approval transaction format", false)
    }
    pub fn deposit_approval_invalid_signature() -> TxResult {
        Self::fail(14010, "Invalid deposit approval transaction signature", false)
    }
    pub fn deposit_approval_duplicated() -> TxResult {
        Self::fail(14020, "Duplicated deposit approval transaction", false)
    }
    pub fn deposit_approval_sender_not_registered() -> TxResult {
        Self::fail(14030, "Sender of deposit approval not registered", false)
    }
    pub fn deposit_approval_invalid_nonce() -> TxResult {
        Self::fail(14040, "Invalid deposit approval transaction nonce", false)
    }
    pub fn deposit_approval_not_approver() -> TxResult {
        Self::fail(14050, "Sender is not a deposit approver", true)
    }
    pub fn deposit_approval_double_approval() -> TxResult {
        Self::fail(14060, "Sender already approved this proposal", true)
    }
    pub fn deposit_approval_already_executed() -> TxResult {
        Self::fail(14070, "Deposit for this block number already executed", true)
    }
    pub fn deposit_approval_proposal_not_exist() -> TxResult {
        Self::fail(14080, "Referenced deposit proposal does not exist", true)
    }

    // Hashed transfer

    pub fn hashed_transfer_invalid_format() -> TxResult {
        Self::fail(15000, "Invalid hashed transfer transaction format", false)
    }
    pub fn hashed_transfer_invalid_signature() -> TxResult {
        Self::fail(15010, "Invalid hashed transfer transaction signature", false)
    }
    pub fn hashed_transfer_duplicated() -> TxResult {
        Self::fail(15020, "Duplicated hashed transfer transaction", false)
    }
    pub fn hashed_transfer_sender_not_registered() -> TxResult {
        Self::fail(15030, "Sender of hashed transfer not registered", false)
    }
    pub fn hashed_transfer_not_enough_balance() -> TxResult {
        Self::fail(15040, "Not enough balance for hashed transfer", true)
    }
    pub fn hashed_transfer_invalid_receiver() -> TxResult {
        Self::fail(15050, "Invalid hashed transfer receiver", true)
    }
    pub fn hashed_transfer_invalid_nonce() -> TxResult {
        Self::fail(15060, "Invalid hashed transfer transaction nonce", false)
    }
    pub fn hashed_transfer_invalid_expiry() -> TxResult {
        Self::fail(15070, "Hashed transfer expiry is not in the future", true)
    }

    // Claim hashed transfer

    pub fn claim_hashed_transfer_invalid_format() -> TxResult {
        Self::fail(16000, "Invalid claim transaction format", false)
    }
    pub fn claim_hashed_transfer_invalid_signature() -> TxResult {
        Self::fail(16010, "Invalid claim transaction signature", false)
    }
    pub fn claim_hashed_transfer_duplicated() -> TxResult {
        Self::fail(16020, "Duplicated claim transaction", false)
    }
    pub fn claim_hashed_transfer_sender_not_registered() -> TxResult {
        Self::fail(16030, "Sender of claim transaction not registered", false)
    }
    pub fn claim_hashed_transfer_tx_not_exist() -> TxResult {
        Self::fail(16040, "Referenced hashed transfer does not exist", true)
    }
    pub fn claim_hashed_transfer_expired() -> TxResult {
        Self::fail(16050, "Hashed transfer has expired", true)
    }
    pub fn claim_hashed_transfer_invalid_nonce() -> TxResult {
        Self::fail(16060, "Invalid claim transaction nonce", false)
    }
    pub fn claim_hashed_transfer_invalid_secret() -> TxResult {
        Self::fail(16070, "Secret does not match the commitment", true)
    }
    pub fn claim_hashed_transfer_not_yet_expired() -> TxResult {
        Self::fail(16080, "Hashed transfer has not yet expired", true)
    }
    pub fn claim_hashed_transfer_invalid_sender() -> TxResult {
        Self::fail(16090, "Sender is neither receiver nor creator", true)
    }
}
