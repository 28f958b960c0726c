// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Collaborator interfaces.
//!
//! The pipeline talks to two external services: an account-abstraction service that signs,
//! sponsors and relays batches of calls, and a plain chain RPC endpoint used to confirm and
//! inspect the resulting transactions. Both are consumed through the traits below; the
//! [`rpc`] and [`wallet`] modules provide `alloy`-backed implementations.

use std::{fmt, time::Duration};

use alloy::{
    primitives::{Address, Bytes, TxHash, U256},
    sol_types::SolCall,
};
use async_trait::async_trait;
use serde::Serialize;

use crate::core::receipt::TxReceipt;

pub mod rpc;
pub mod wallet;

pub use rpc::AlloyChainRpc;
pub use wallet::WalletCallsService;

/// A single call inside a user operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Call {
    #[serde(rename = "to")]
    pub target: Address,
    pub data: Bytes,
    pub value: U256,
}

impl Call {
    pub fn new(target: Address, data: Bytes) -> Self {
        Self {
            target,
            data,
            value: U256::ZERO,
        }
    }

    /// Call encoding a typed contract function.
    pub fn contract<C: SolCall>(target: Address, call: &C) -> Self {
        Self::new(target, call.abi_encode().into())
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

/// Identifier the abstraction service assigns to a submitted operation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserOperationHandle(String);

impl UserOperationHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserOperationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Where a user operation landed on chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserOperationReceipt {
    pub included_transaction_hash: TxHash,
}

/// Polling policy for the wait operations.
#[derive(Clone, Debug)]
pub struct WaitConfig {
    pub poll_interval: Duration,
    pub timeout: Duration,
    /// Blocks that must exist on top of (and including) the transaction's block.
    pub confirmations: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            timeout: Duration::from_secs(120),
            confirmations: 1,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("operation rejected: {0}")]
    Rejected(String),
    #[error("operation {handle} not included after {elapsed:?}")]
    Timeout {
        handle: UserOperationHandle,
        elapsed: Duration,
    },
    #[error("rpc error: {0}")]
    Rpc(#[from] alloy::transports::RpcError<alloy::transports::TransportErrorKind>),
    #[error("malformed service response: {0}")]
    Malformed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ChainRpcError {
    #[error("rpc error: {0}")]
    Rpc(#[from] alloy::transports::RpcError<alloy::transports::TransportErrorKind>),
    #[error("no receipt for transaction {0}")]
    ReceiptNotFound(TxHash),
    #[error("transaction {tx_hash} not confirmed after {elapsed:?}")]
    Timeout { tx_hash: TxHash, elapsed: Duration },
    #[error("could not decode return data: {0}")]
    Decode(#[from] alloy::sol_types::Error),
}

/// Account-abstraction service that relays batches of calls as user operations.
#[async_trait]
pub trait AbstractionService: Send + Sync {
    /// Hands the ordered call list to the service.
    async fn submit_operation(&self, calls: &[Call]) -> Result<UserOperationHandle, ServiceError>;

    /// Waits until the operation lands in a chain transaction.
    ///
    /// Waiting again on the same handle yields the same receipt.
    async fn wait_for_receipt(
        &self,
        handle: &UserOperationHandle,
    ) -> Result<UserOperationReceipt, ServiceError>;
}

/// Read access to the chain.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Executes a read-only call, at `block` when given, otherwise at the latest block.
    async fn read_contract_state(
        &self,
        address: Address,
        input: Bytes,
        block: Option<u64>,
    ) -> Result<Bytes, ChainRpcError>;

    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, ChainRpcError>;

    /// Waits until the transaction is mined to the configured confirmation depth.
    async fn wait_for_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> Result<TxReceipt, ChainRpcError>;
}

/// Typed read of a contract view function.
pub async fn read_contract<C: SolCall + Sync>(
    rpc: &(impl ChainRpc + ?Sized),
    address: Address,
    call: &C,
    block: Option<u64>,
) -> Result<C::Return, ChainRpcError> {
    let output = rpc
        .read_contract_state(address, call.abi_encode().into(), block)
        .await?;
    Ok(C::abi_decode_returns(&output)?)
}
