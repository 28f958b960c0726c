// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Submission and confirmation of user operations.
//!
//! An operation moves through
//! `Built → Submitted → IncludedInTransaction → Confirmed → {Succeeded | Failed}`.
//! Nothing is retried: a rejected or timed-out operation has to be rebuilt and resubmitted by the
//! caller, since resubmitting the same deployment blindly could deploy it twice. An on-chain revert
//! is an ordinary outcome and is reported in the [`Confirmation`], not raised.

use std::fmt;

use alloy::primitives::TxHash;

use crate::{
    core::service::{
        AbstractionService, Call, ChainRpc, ChainRpcError, ServiceError, UserOperationHandle,
    },
    utils::color::{Color, DebugColor},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationStage {
    Built,
    Submitted,
    IncludedInTransaction,
    Confirmed,
    Succeeded,
    Failed,
}

impl fmt::Display for OperationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            Self::Built => "built",
            Self::Submitted => "submitted",
            Self::IncludedInTransaction => "included in transaction",
            Self::Confirmed => "confirmed",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(stage)
    }
}

/// Final state of a confirmed operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub handle: UserOperationHandle,
    pub succeeded: bool,
    pub transaction_hash: TxHash,
    pub block_number: u64,
}

impl Confirmation {
    pub fn stage(&self) -> OperationStage {
        if self.succeeded {
            OperationStage::Succeeded
        } else {
            OperationStage::Failed
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("operation has no calls")]
    EmptyOperation,
    #[error("submission rejected: {0}")]
    SubmissionRejected(#[source] ServiceError),
    #[error("confirmation timed out: {0}")]
    ConfirmationTimeout(String),
    #[error("abstraction service failed while waiting for {handle}: {source}")]
    Service {
        handle: UserOperationHandle,
        #[source]
        source: ServiceError,
    },
    #[error("chain rpc failed while confirming {tx_hash}: {source}")]
    Rpc {
        tx_hash: TxHash,
        #[source]
        source: ChainRpcError,
    },
}

/// Drives operations through the abstraction service and confirms them on chain.
///
/// The driver does not look at what the calls do; deployments and plain state changes go
/// through the same path.
pub struct LifecycleDriver<'a, S: ?Sized, R: ?Sized> {
    service: &'a S,
    rpc: &'a R,
    label: String,
}

impl<'a, S, R> LifecycleDriver<'a, S, R>
where
    S: AbstractionService + ?Sized,
    R: ChainRpc + ?Sized,
{
    /// `label` prefixes every log line, e.g. `SimpleCounter: deploy`.
    pub fn new(service: &'a S, rpc: &'a R, label: impl Into<String>) -> Self {
        Self {
            service,
            rpc,
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn rpc(&self) -> &'a R {
        self.rpc
    }

    pub async fn submit_and_confirm(&self, calls: &[Call]) -> Result<Confirmation, LifecycleError> {
        if calls.is_empty() {
            return Err(LifecycleError::EmptyOperation);
        }
        self.checkpoint(OperationStage::Built, format_args!("{} call(s)", calls.len()));

        let handle = self
            .service
            .submit_operation(calls)
            .await
            .map_err(LifecycleError::SubmissionRejected)?;
        self.checkpoint(OperationStage::Submitted, handle.lavender());

        let receipt = self
            .service
            .wait_for_receipt(&handle)
            .await
            .map_err(|source| match source {
                ServiceError::Timeout { .. } => {
                    LifecycleError::ConfirmationTimeout(source.to_string())
                }
                // The relay dropped the operation; it will never land.
                ServiceError::Rejected(_) => LifecycleError::SubmissionRejected(source),
                source => LifecycleError::Service {
                    handle: handle.clone(),
                    source,
                },
            })?;
        let tx_hash = receipt.included_transaction_hash;
        self.checkpoint(OperationStage::IncludedInTransaction, tx_hash.debug_lavender());

        let tx_receipt = self
            .rpc
            .wait_for_transaction_receipt(tx_hash)
            .await
            .map_err(|source| match source {
                ChainRpcError::Timeout { .. } => {
                    LifecycleError::ConfirmationTimeout(source.to_string())
                }
                source => LifecycleError::Rpc { tx_hash, source },
            })?;
        self.checkpoint(
            OperationStage::Confirmed,
            format_args!("block {}", tx_receipt.block_number),
        );

        let confirmation = Confirmation {
            handle,
            succeeded: tx_receipt.succeeded(),
            transaction_hash: tx_hash,
            block_number: tx_receipt.block_number,
        };
        if confirmation.succeeded {
            info!(@mint, "[{}] transaction success", self.label);
        } else {
            error!(@red, "[{}] transaction {} reverted", self.label, tx_hash);
        }
        Ok(confirmation)
    }

    fn checkpoint(&self, stage: OperationStage, detail: impl fmt::Display) {
        info!(@grey, "[{}] user operation {stage}: {detail}", self.label);
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{address, b256, bytes};

    use super::*;
    use crate::{
        core::receipt::{TxReceipt, TxStatus},
        utils::testing::{MockBehavior, MockChain, MockService},
    };

    const TX: TxHash = b256!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");

    fn calls() -> Vec<Call> {
        vec![Call::new(
            address!("00000000000000000000000000000000000000c0"),
            bytes!("d09de08a"),
        )]
    }

    fn chain(status: TxStatus) -> MockChain {
        let chain = MockChain::default();
        chain.insert_receipt(TxReceipt {
            transaction_hash: TX,
            status,
            block_number: 42,
            logs: vec![],
        });
        chain
    }

    #[tokio::test]
    async fn confirms_success() {
        let service = MockService::new(MockBehavior::Include(TX));
        let chain = chain(TxStatus::Success);
        let driver = LifecycleDriver::new(&service, &chain, "test");

        let confirmation = driver.submit_and_confirm(&calls()).await.unwrap();
        assert!(confirmation.succeeded);
        assert_eq!(confirmation.stage(), OperationStage::Succeeded);
        assert_eq!(confirmation.transaction_hash, TX);
        assert_eq!(confirmation.block_number, 42);
        assert_eq!(service.submitted(), vec![calls()]);
    }

    #[tokio::test]
    async fn revert_is_reported() {
        let service = MockService::new(MockBehavior::Include(TX));
        let chain = chain(TxStatus::Failure);
        let driver = LifecycleDriver::new(&service, &chain, "test");

        let confirmation = driver.submit_and_confirm(&calls()).await.unwrap();
        assert!(!confirmation.succeeded);
        assert_eq!(confirmation.stage(), OperationStage::Failed);
    }

    #[tokio::test]
    async fn rejection_is_fatal() {
        let service = MockService::new(MockBehavior::Reject);
        let chain = chain(TxStatus::Success);
        let driver = LifecycleDriver::new(&service, &chain, "test");

        let err = driver.submit_and_confirm(&calls()).await.unwrap_err();
        assert!(matches!(err, LifecycleError::SubmissionRejected(_)));
        assert_eq!(service.waits(), 0);
    }

    #[tokio::test]
    async fn dropped_after_submission_is_a_rejection() {
        let service = MockService::new(MockBehavior::Abandon);
        let chain = chain(TxStatus::Success);
        let driver = LifecycleDriver::new(&service, &chain, "test");

        let err = driver.submit_and_confirm(&calls()).await.unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::SubmissionRejected(ServiceError::Rejected(_))
        ));
        assert_eq!(service.submitted().len(), 1);
        assert_eq!(service.waits(), 1);
    }

    #[tokio::test]
    async fn service_timeout() {
        let service = MockService::new(MockBehavior::Timeout);
        let chain = chain(TxStatus::Success);
        let driver = LifecycleDriver::new(&service, &chain, "test");

        let err = driver.submit_and_confirm(&calls()).await.unwrap_err();
        assert!(matches!(err, LifecycleError::ConfirmationTimeout(_)));
        assert_eq!(service.submitted().len(), 1);
    }

    #[tokio::test]
    async fn chain_timeout() {
        let service = MockService::new(MockBehavior::Include(TX));
        let chain = MockChain::default();
        let driver = LifecycleDriver::new(&service, &chain, "test");

        let err = driver.submit_and_confirm(&calls()).await.unwrap_err();
        assert!(matches!(err, LifecycleError::ConfirmationTimeout(_)));
    }

    #[tokio::test]
    async fn empty_operation() {
        let service = MockService::new(MockBehavior::Include(TX));
        let chain = chain(TxStatus::Success);
        let driver = LifecycleDriver::new(&service, &chain, "test");

        let err = driver.submit_and_confirm(&[]).await.unwrap_err();
        assert!(matches!(err, LifecycleError::EmptyOperation));
        assert!(service.submitted().is_empty());
    }
}
