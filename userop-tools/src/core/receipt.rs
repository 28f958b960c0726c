// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Chain-agnostic view of a mined transaction.

use alloy::{
    primitives::{Address, Bytes, TxHash, B256},
    rpc::types::TransactionReceipt,
};

/// Execution status of a mined transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxStatus {
    Success,
    Failure,
}

impl TxStatus {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<bool> for TxStatus {
    fn from(success: bool) -> Self {
        if success {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

/// A single log emitted by a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    /// Contract that emitted the log.
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

impl LogEntry {
    pub fn new(address: Address, topics: Vec<B256>, data: Bytes) -> Self {
        Self {
            address,
            topics,
            data,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    pub transaction_hash: TxHash,
    pub status: TxStatus,
    pub block_number: u64,
    /// Logs in emission order.
    pub logs: Vec<LogEntry>,
}

impl TxReceipt {
    pub fn succeeded(&self) -> bool {
        self.status.is_success()
    }
}

impl From<&TransactionReceipt> for TxReceipt {
    fn from(receipt: &TransactionReceipt) -> Self {
        let logs = receipt
            .inner
            .logs()
            .iter()
            .map(|log| LogEntry {
                address: log.address(),
                topics: log.topics().to_vec(),
                data: log.data().data.clone(),
            })
            .collect();
        Self {
            transaction_hash: receipt.transaction_hash,
            status: receipt.status().into(),
            block_number: receipt.block_number.unwrap_or_default(),
            logs,
        }
    }
}
