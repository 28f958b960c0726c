// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Before/after checks for state-changing operations.
//!
//! State is read at the latest block before the call, and again pinned to the block the call was
//! confirmed in. Pinning keeps a later block (possibly carrying someone else's mutation) out of
//! the comparison, so a drift shows up as a mismatch instead of silently passing.

use std::{future::Future, time::Duration};

use async_trait::async_trait;

use crate::core::{
    lifecycle::{Confirmation, LifecycleError},
    service::ChainRpcError,
};

/// Reads a numeric piece of contract state.
#[async_trait]
pub trait StateReader: Send + Sync {
    /// Reads at `block`, or at the latest block when `None`.
    async fn read(&self, block: Option<u64>) -> Result<i128, VerificationError>;
}

#[derive(Clone, Debug, Default)]
pub struct VerificationConfig {
    /// Pause between confirmation and the pinned read, for nodes that lag behind the one that
    /// reported the receipt.
    pub settle_delay: Option<Duration>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerificationOutcome {
    Matched {
        before: i128,
        after: i128,
        confirmation: Confirmation,
    },
    /// The call succeeded but the state moved by something other than the expected delta.
    Mismatched {
        before: i128,
        after: i128,
        confirmation: Confirmation,
    },
    /// The call reverted; state is not re-read.
    TransactionFailed { confirmation: Confirmation },
}

impl VerificationOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    pub fn confirmation(&self) -> &Confirmation {
        match self {
            Self::Matched { confirmation, .. }
            | Self::Mismatched { confirmation, .. }
            | Self::TransactionFailed { confirmation } => confirmation,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("failed to read state: {0}")]
    Read(#[from] ChainRpcError),
    #[error("state value {0} does not fit in an i128")]
    OutOfRange(String),
    #[error("{0}")]
    Lifecycle(#[from] LifecycleError),
}

/// Runs `call` and checks that it moved `state` by `expected_delta`.
pub async fn verify_delta<S, F>(
    state: &S,
    expected_delta: i128,
    call: F,
    config: &VerificationConfig,
) -> Result<VerificationOutcome, VerificationError>
where
    S: StateReader + ?Sized,
    F: Future<Output = Result<Confirmation, LifecycleError>>,
{
    let before = state.read(None).await?;
    info!(@grey, "starting state: {}", before.to_string().lavender());

    let confirmation = call.await?;
    if !confirmation.succeeded {
        return Ok(VerificationOutcome::TransactionFailed { confirmation });
    }

    if let Some(delay) = config.settle_delay {
        tokio::time::sleep(delay).await;
    }
    let after = state.read(Some(confirmation.block_number)).await?;
    info!(@grey, "ending state: {} (block {})", after.to_string().lavender(), confirmation.block_number);

    let outcome = if after.checked_sub(before) == Some(expected_delta) {
        info!(@mint, "state changed by {expected_delta} as expected");
        VerificationOutcome::Matched {
            before,
            after,
            confirmation,
        }
    } else {
        warn!(@yellow, "expected state {before} to change by {expected_delta}, got {after}");
        VerificationOutcome::Mismatched {
            before,
            after,
            confirmation,
        }
    };
    Ok(outcome)
}
