// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use alloy::primitives::{address, Address};

/// The keyless CREATE2 deployment proxy present at the same address on most EVM chains.
///
/// Its calldata convention is `salt ‖ init_code`; it deploys with CREATE2 and returns the new
/// address without emitting an event, so deployments through it are resolved from the events the
/// deployed contract itself emits during construction.
pub const CREATE2_FACTORY_ADDRESS: Address = address!("4e59b44847b379578588920cA78FbF26c0B4956C");
