//! Genesis document parsing and application.
//!
//! Genesis is applied exactly once and must be identical on every
//! replica, so every irregularity is a hard failure: an unparsable
//! document, a duplicate address or identity, or a malformed value
//! refuses to start the node rather than silently diverging.

use serde::Deserialize;
use shared_types::{Address, Amount, Identifier, Identity};
use tracing::info;
use xl_01_state_tree::WriteState;
use xl_02_accounts::{add_balance, bind, register};
use xl_03_deposit::{set_approvers, Approver};

use crate::domain::errors::AppError;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Genesis {
    #[serde(default)]
    pub accounts: Vec<GenesisAccount>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenesisAccount {
    /// External-chain address, `0x`-prefixed hex.
    pub addr: String,

    /// Chain-local identity, base64. Generated from the seed counter
    /// when absent.
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub balance: Option<Amount>,

    /// Deposit approver weight. Zero or absent means not an approver.
    #[serde(default)]
    pub weight: Option<u32>,
}

pub fn parse_genesis(raw: &str) -> Result<Genesis, AppError> {
    serde_json::from_str(raw).map_err(|e| AppError::InvalidGenesis(e.to_string()))
}

/// Create every genesis account and install the approver set.
pub fn apply_genesis(state: &mut impl WriteState, genesis: &Genesis) -> Result<(), AppError> {
    let mut approvers = Vec::new();
    for account in &genesis.accounts {
        let addr: Address = account
            .addr
            .parse()
            .map_err(|e| AppError::InvalidGenesis(format!("address {:?}: {e}", account.addr)))?;
        let id = match &account.id {
            Some(text) => {
                let id: Identity = text
                    .parse()
                    .map_err(|e| AppError::InvalidGenesis(format!("identity {text:?}: {e}")))?;
                bind(state, &id, &addr)
                    .map_err(|e| AppError::InvalidGenesis(format!("account {addr}: {e}")))?;
                id
            }
            None => register(state, &addr)
                .map_err(|e| AppError::InvalidGenesis(format!("account {addr}: {e}")))?,
        };
        if let Some(balance) = account.balance {
            if !balance.is_zero() {
                add_balance(state, &Identifier::Id(id), balance)
                    .map_err(|e| AppError::InvalidGenesis(format!("account {addr}: {e}")))?;
            }
        }
        match account.weight {
            Some(weight) if weight > 0 => approvers.push(Approver {
                identity: id,
                weight,
            }),
            _ => {}
        }
    }
    set_approvers(state, &approvers)
        .map_err(|e| AppError::InvalidGenesis(format!("approvers: {e}")))?;
    info!(
        "[xl-07] Applied genesis: {} accounts, {} approvers",
        genesis.accounts.len(),
        approvers.len()
    );
    Ok(())
}
