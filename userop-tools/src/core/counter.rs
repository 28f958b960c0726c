// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! The `SimpleCounter` contract used to exercise the pipeline end to end.

use std::fmt;

use alloy::{primitives::Address, sol};
use async_trait::async_trait;

use crate::core::{
    service::{read_contract, Call, ChainRpc},
    verification::{StateReader, VerificationError},
};

sol! {
    interface SimpleCounter {
        event SimpleCounterCreated(address counter);

        function increment() external;
        function decrement() external;
        function getCount() external view returns (uint256);
    }
}

/// Event the counter emits from its constructor.
pub const CREATED_EVENT: &str = "SimpleCounterCreated(address)";

/// A state-changing counter call and the delta it must produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CounterAction {
    Increment,
    Decrement,
}

impl CounterAction {
    pub fn expected_delta(self) -> i128 {
        match self {
            Self::Increment => 1,
            Self::Decrement => -1,
        }
    }

    pub fn call(self, counter: Address) -> Call {
        match self {
            Self::Increment => Call::contract(counter, &SimpleCounter::incrementCall {}),
            Self::Decrement => Call::contract(counter, &SimpleCounter::decrementCall {}),
        }
    }
}

impl fmt::Display for CounterAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increment => f.write_str("increment"),
            Self::Decrement => f.write_str("decrement"),
        }
    }
}

/// Reads `getCount()` of a deployed counter.
pub struct CounterState<'a, R: ?Sized> {
    rpc: &'a R,
    counter: Address,
}

impl<'a, R: ChainRpc + ?Sized> CounterState<'a, R> {
    pub fn new(rpc: &'a R, counter: Address) -> Self {
        Self { rpc, counter }
    }
}

#[async_trait]
impl<R: ChainRpc + ?Sized> StateReader for CounterState<'_, R> {
    async fn read(&self, block: Option<u64>) -> Result<i128, VerificationError> {
        let count = read_contract(self.rpc, self.counter, &SimpleCounter::getCountCall {}, block)
            .await?;
        u128::try_from(count)
            .ok()
            .and_then(|count| i128::try_from(count).ok())
            .ok_or_else(|| VerificationError::OutOfRange(count.to_string()))
    }
}
