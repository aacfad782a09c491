//! Deposit voting state: approver set, votes, weights, executions.

use shared_types::{Hash, Identifier, Identity, TxHash};
use tracing::{debug, info};
use xl_01_state_tree::{ReadState, WriteState};
use xl_02_accounts::add_balance;

use crate::domain::errors::DepositError;
use crate::domain::proposal::{Approver, Proposal};

const APPROVERS_KEY: &[u8] = b"deposit:approvers";
const WEIGHT_SUM_KEY: &[u8] = b"deposit:approversWeightSum";

fn proposal_key(tx_hash: &TxHash) -> Vec<u8> {
    [b"deposit:proposal:".as_slice(), tx_hash].concat()
}

fn weight_key(proposal_hash: &Hash) -> Vec<u8> {
    [b"deposit:weight:".as_slice(), proposal_hash].concat()
}

fn approval_key(approver: &Identity, proposal_hash: &Hash) -> Vec<u8> {
    [
        b"deposit:approval:".as_slice(),
        approver.as_bytes(),
        b":",
        proposal_hash,
    ]
    .concat()
}

fn executed_key(block_number: u64) -> Vec<u8> {
    [b"deposit:executed:".as_slice(), &block_number.to_be_bytes()].concat()
}

/// Replace the whole approver set. An empty set clears both the list
/// and the weight-sum record.
pub fn set_approvers(state: &mut impl WriteState, list: &[Approver]) -> Result<(), DepositError> {
    if list.is_empty() {
        state.ledger_remove(APPROVERS_KEY);
        state.ledger_remove(WEIGHT_SUM_KEY);
        info!("[xl-03] Cleared deposit approvers");
        return Ok(());
    }
    let total: u64 = list.iter().map(|a| u64::from(a.weight)).sum();
    let encoded = bincode::serialize(list)
        .map_err(|e| DepositError::Corrupt(format!("encode approvers: {e}")))?;
    state.ledger_set(APPROVERS_KEY, encoded);
    state.ledger_set(WEIGHT_SUM_KEY, total.to_be_bytes().to_vec());
    info!("[xl-03] Set {} deposit approvers, weight sum {}", list.len(), total);
    Ok(())
}

pub fn approvers(state: &impl ReadState) -> Result<Vec<Approver>, DepositError> {
    match state.ledger_get(APPROVERS_KEY) {
        None => Ok(Vec::new()),
        Some(raw) => bincode::deserialize(&raw)
            .map_err(|e| DepositError::Corrupt(format!("decode approvers: {e}"))),
    }
}

pub fn weight_sum(state: &impl ReadState) -> Result<u64, DepositError> {
    match state.ledger_get(WEIGHT_SUM_KEY) {
        None => Ok(0),
        Some(raw) => decode_u64(&raw, "approver weight sum"),
    }
}

/// The weight the identity carries, if it is an approver.
pub fn approver_weight(
    state: &impl ReadState,
    id: &Identity,
) -> Result<Option<u32>, DepositError> {
    Ok(approvers(state)?
        .iter()
        .find(|a| a.identity == *id)
        .map(|a| a.weight))
}

pub fn proposal_by_tx_hash(
    state: &impl ReadState,
    tx_hash: &TxHash,
) -> Result<Option<Proposal>, DepositError> {
    match state.ledger_get(&proposal_key(tx_hash)) {
        None => Ok(None),
        Some(raw) => bincode::deserialize(&raw)
            .map(Some)
            .map_err(|e| DepositError::Corrupt(format!("decode proposal: {e}"))),
    }
}

pub fn has_approved(state: &impl ReadState, approver: &Identity, proposal_hash: &Hash) -> bool {
    state
        .ledger_get(&approval_key(approver, proposal_hash))
        .is_some()
}

pub fn proposal_weight(state: &impl ReadState, proposal_hash: &Hash) -> Result<u64, DepositError> {
    match state.ledger_get(&weight_key(proposal_hash)) {
        None => Ok(0),
        Some(raw) => decode_u64(&raw, "proposal weight"),
    }
}

/// Executed proposal hash for an external block number, if any.
pub fn execution_of(state: &impl ReadState, block_number: u64) -> Option<Hash> {
    state
        .ledger_get(&executed_key(block_number))
        .and_then(|raw| raw.try_into().ok())
}

/// Preconditions shared by proposing and approving.
fn check_vote(
    state: &impl ReadState,
    proposal: &mut Proposal,
    voter: &Identity,
) -> Result<(), DepositError> {
    if execution_of(state, proposal.block_number).is_some() {
        return Err(DepositError::AlreadyExecuted(proposal.block_number));
    }
    if approver_weight(state, voter)?.is_none() {
        return Err(DepositError::NotApprover);
    }
    if has_approved(state, voter, &proposal.hash()) {
        return Err(DepositError::DoubleApproval);
    }
    Ok(())
}

/// Validation path for a new proposal.
pub fn check_deposit(
    state: &impl ReadState,
    proposal: &mut Proposal,
    proposer: &Identity,
) -> Result<(), DepositError> {
    if !proposal.validate() {
        return Err(DepositError::InvalidProposal);
    }
    check_vote(state, proposal, proposer)
}

/// Validation path for an approval of an existing proposal.
pub fn check_deposit_approval(
    state: &impl ReadState,
    deposit_tx_hash: &TxHash,
    approver: &Identity,
) -> Result<(), DepositError> {
    let mut proposal =
        proposal_by_tx_hash(state, deposit_tx_hash)?.ok_or(DepositError::ProposalNotExist)?;
    check_vote(state, &mut proposal, approver)
}

/// Record a vote and execute on quorum. Returns whether execution
/// happened. The caller has already run the matching check.
fn process_vote(
    state: &mut impl WriteState,
    proposal: &mut Proposal,
    voter: &Identity,
) -> Result<bool, DepositError> {
    let proposal_hash = proposal.hash();
    if has_approved(state, voter, &proposal_hash) {
        return Err(DepositError::DoubleApproval);
    }
    state.ledger_set(&approval_key(voter, &proposal_hash), vec![1]);

    let weight =
        u64::from(approver_weight(state, voter)?.ok_or(DepositError::NotApprover)?);
    let new_weight = proposal_weight(state, &proposal_hash)? + weight;
    state.ledger_set(&weight_key(&proposal_hash), new_weight.to_be_bytes().to_vec());

    let total = weight_sum(state)?;
    if new_weight * 3 <= total * 2 {
        debug!(
            "[xl-03] Proposal {} at weight {}/{}",
            hex::encode(proposal_hash),
            new_weight,
            total
        );
        return Ok(false);
    }
    if execution_of(state, proposal.block_number).is_some() {
        return Err(DepositError::AlreadyExecuted(proposal.block_number));
    }

    state.ledger_set(&executed_key(proposal.block_number), proposal_hash.to_vec());
    for input in &proposal.inputs {
        add_balance(state, &Identifier::Addr(input.from_addr), input.value)?;
    }
    info!(
        "[xl-03] Executed deposit proposal {} for block number {}",
        hex::encode(proposal_hash),
        proposal.block_number
    );
    Ok(true)
}

/// Store the proposal under its originating tx hash, record the
/// proposer's vote and execute on quorum.
pub fn process_deposit(
    state: &mut impl WriteState,
    proposal: &mut Proposal,
    proposer: &Identity,
    tx_hash: &TxHash,
) -> Result<bool, DepositError> {
    let encoded = bincode::serialize(proposal)
        .map_err(|e| DepositError::Corrupt(format!("encode proposal: {e}")))?;
    state.ledger_set(&proposal_key(tx_hash), encoded);
    process_vote(state, proposal, proposer)
}

/// Record an approval vote on a previously stored proposal and execute
/// on quorum.
pub fn process_deposit_approval(
    state: &mut impl WriteState,
    deposit_tx_hash: &TxHash,
    approver: &Identity,
) -> Result<bool, DepositError> {
    let mut proposal =
        proposal_by_tx_hash(state, deposit_tx_hash)?.ok_or(DepositError::ProposalNotExist)?;
    process_vote(state, &mut proposal, approver)
}

fn decode_u64(raw: &[u8], what: &str) -> Result<u64, DepositError> {
    let bytes: [u8; 8] = raw
        .try_into()
        .map_err(|_| DepositError::Corrupt(format!("{what} has wrong length")))?;
    Ok(u64::from_be_bytes(bytes))
}
