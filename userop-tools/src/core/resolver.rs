// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Recovers a deployed contract's address from its creation event.
//!
//! Contracts deployed through a CREATE2 factory announce themselves by emitting an event during
//! construction. The log's emitting address is the deployed contract; when the event also carries
//! an indexed address it is compared against the emitter, but only as a consistency check.
//!
//! Two unrelated contracts emitting events with the same signature in one transaction cannot be
//! told apart: the first matching log wins.

use alloy::primitives::{Address, TxHash, B256};

use crate::{
    core::{
        event::topic_for_event,
        receipt::TxReceipt,
        service::{ChainRpc, ChainRpcError},
    },
    utils::color::DebugColor,
};

/// Outcome of comparing the emitting address with the event's first indexed parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexedCheck {
    /// The event carries no indexed parameter.
    Absent,
    Matched,
    Mismatched(Address),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedContractAddress {
    /// Emitting address of the matched log.
    pub address: Address,
    /// Position of the matched log in the receipt.
    pub log_index: usize,
    pub indexed_check: IndexedCheck,
}

impl ResolvedContractAddress {
    pub fn is_consistent(&self) -> bool {
        !matches!(self.indexed_check, IndexedCheck::Mismatched(_))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to look up logs of {tx_hash}: {source}")]
pub struct LookupError {
    pub tx_hash: TxHash,
    #[source]
    pub source: ChainRpcError,
}

/// Fetches the transaction's receipt and resolves the address that emitted `event_signature`.
///
/// Returns `Ok(None)` when no log carries the event.
pub async fn resolve_deployed_address(
    rpc: &(impl ChainRpc + ?Sized),
    tx_hash: TxHash,
    event_signature: &str,
) -> Result<Option<ResolvedContractAddress>, LookupError> {
    let receipt = rpc
        .get_transaction_receipt(tx_hash)
        .await
        .map_err(|source| LookupError { tx_hash, source })?;

    let resolved = resolve_from_receipt(&receipt, topic_for_event(event_signature));
    match &resolved {
        Some(resolved) => {
            info!(@grey, "found {event_signature} at address: {}", resolved.address.debug_lavender());
            match resolved.indexed_check {
                IndexedCheck::Matched => {
                    debug!(@grey, "indexed parameter matches the emitting address")
                }
                IndexedCheck::Mismatched(indexed) => warn!(@yellow,
                    "emitting address {} does not match indexed parameter {}",
                    resolved.address, indexed),
                IndexedCheck::Absent => {}
            }
        }
        None => warn!(@yellow, "no {event_signature} event in {}", tx_hash.debug_lavender()),
    }
    Ok(resolved)
}

/// Scans logs in order for the first one whose first topic is `topic`.
pub fn resolve_from_receipt(receipt: &TxReceipt, topic: B256) -> Option<ResolvedContractAddress> {
    receipt
        .logs
        .iter()
        .enumerate()
        .find(|(_, log)| log.topics.first() == Some(&topic))
        .map(|(log_index, log)| {
            let indexed_check = match log.topics.get(1) {
                None => IndexedCheck::Absent,
                Some(word) => {
                    let indexed = Address::from_word(*word);
                    if indexed == log.address {
                        IndexedCheck::Matched
                    } else {
                        IndexedCheck::Mismatched(indexed)
                    }
                }
            };
            ResolvedContractAddress {
                address: log.address,
                log_index,
                indexed_check,
            }
        })
}
