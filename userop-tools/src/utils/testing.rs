// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! In-memory collaborators for unit tests.

use std::{
    collections::{BTreeMap, HashMap},
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use alloy::{
    primitives::{Address, Bytes, TxHash, U256},
    sol_types::SolValue,
};
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::{
    receipt::TxReceipt,
    service::{
        AbstractionService, Call, ChainRpc, ChainRpcError, ServiceError, UserOperationHandle,
        UserOperationReceipt,
    },
};

/// A chain holding canned receipts and a single `uint256` state value per block.
///
/// The head advances to a transaction's block once it has been waited for, so "latest" reads
/// before and after a confirmation see different state.
#[derive(Default)]
pub struct MockChain {
    receipts: Mutex<HashMap<TxHash, TxReceipt>>,
    states: Mutex<BTreeMap<u64, U256>>,
    head: Mutex<u64>,
    reads: Mutex<Vec<(Address, Option<u64>)>>,
}

impl MockChain {
    pub fn insert_receipt(&self, receipt: TxReceipt) {
        self.receipts
            .lock()
            .insert(receipt.transaction_hash, receipt);
    }

    /// Sets the state value from `block` onwards.
    pub fn set_state(&self, block: u64, value: u64) {
        self.states.lock().insert(block, U256::from(value));
    }

    pub fn set_head(&self, block: u64) {
        *self.head.lock() = block;
    }

    /// Block tags of every state read, in order.
    pub fn reads(&self) -> Vec<(Address, Option<u64>)> {
        self.reads.lock().clone()
    }

    fn state_at(&self, block: u64) -> U256 {
        self.states
            .lock()
            .range(..=block)
            .next_back()
            .map(|(_, value)| *value)
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChainRpc for MockChain {
    async fn read_contract_state(
        &self,
        address: Address,
        _input: Bytes,
        block: Option<u64>,
    ) -> Result<Bytes, ChainRpcError> {
        self.reads.lock().push((address, block));
        let block = block.unwrap_or_else(|| *self.head.lock());
        Ok(self.state_at(block).abi_encode().into())
    }

    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, ChainRpcError> {
        self.receipts
            .lock()
            .get(&tx_hash)
            .cloned()
            .ok_or(ChainRpcError::ReceiptNotFound(tx_hash))
    }

    async fn wait_for_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> Result<TxReceipt, ChainRpcError> {
        let receipt = self.get_transaction_receipt(tx_hash).await.map_err(|_| {
            ChainRpcError::Timeout {
                tx_hash,
                elapsed: Duration::ZERO,
            }
        })?;
        let mut head = self.head.lock();
        *head = (*head).max(receipt.block_number);
        Ok(receipt)
    }
}

#[derive(Clone, Copy, Debug)]
pub enum MockBehavior {
    /// Every operation lands in the configured transaction.
    Include(TxHash),
    Reject,
    /// Submission is accepted, then the service gives up on the operation.
    Abandon,
    Timeout,
}

/// An abstraction service with scripted outcomes.
pub struct MockService {
    behavior: MockBehavior,
    submitted: Mutex<Vec<Vec<Call>>>,
    waits: AtomicUsize,
}

impl MockService {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            submitted: Mutex::default(),
            waits: AtomicUsize::new(0),
        }
    }

    pub fn submitted(&self) -> Vec<Vec<Call>> {
        self.submitted.lock().clone()
    }

    pub fn waits(&self) -> usize {
        self.waits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AbstractionService for MockService {
    async fn submit_operation(&self, calls: &[Call]) -> Result<UserOperationHandle, ServiceError> {
        if let MockBehavior::Reject = self.behavior {
            return Err(ServiceError::Rejected("AA21 didn't pay prefund".into()));
        }
        let mut submitted = self.submitted.lock();
        submitted.push(calls.to_vec());
        Ok(UserOperationHandle::new(format!("0x{:064x}", submitted.len())))
    }

    async fn wait_for_receipt(
        &self,
        handle: &UserOperationHandle,
    ) -> Result<UserOperationReceipt, ServiceError> {
        self.waits.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            MockBehavior::Include(tx_hash) => Ok(UserOperationReceipt {
                included_transaction_hash: tx_hash,
            }),
            MockBehavior::Timeout => Err(ServiceError::Timeout {
                handle: handle.clone(),
                elapsed: Duration::from_secs(120),
            }),
            MockBehavior::Abandon => Err(ServiceError::Rejected(
                "batch failed off-chain and will not be retried".into(),
            )),
            MockBehavior::Reject => Err(ServiceError::Rejected("unknown operation".into())),
        }
    }
}
