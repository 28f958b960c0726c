// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Counter interactions with before/after verification.

use std::slice;

use alloy::primitives::Address;

use crate::{
    core::{
        counter::{CounterAction, CounterState},
        lifecycle::LifecycleDriver,
        service::{AbstractionService, ChainRpc},
        verification::{verify_delta, VerificationConfig, VerificationOutcome},
    },
    Result,
};

/// Submits `action` against the counter at `counter` and checks the resulting count.
pub async fn counter<S, R>(
    service: &S,
    rpc: &R,
    counter: Address,
    action: CounterAction,
    config: &VerificationConfig,
) -> Result<VerificationOutcome>
where
    S: AbstractionService + ?Sized,
    R: ChainRpc + ?Sized,
{
    let driver = LifecycleDriver::new(service, rpc, format!("SimpleCounter: {action}"));
    let state = CounterState::new(rpc, counter);
    let call = action.call(counter);
    let outcome = verify_delta(
        &state,
        action.expected_delta(),
        driver.submit_and_confirm(slice::from_ref(&call)),
        config,
    )
    .await?;
    Ok(outcome)
}
