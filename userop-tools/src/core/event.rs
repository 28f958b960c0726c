// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Event signature hashing.
//!
//! A log's first topic is the keccak-256 hash of its event's canonical signature: the event name
//! followed by the parenthesized, comma-separated parameter types, with no parameter names and no
//! whitespace (e.g. `Transfer(address,address,uint256)`). A non-canonical signature hashes fine
//! but never matches a log, so user input should go through [`canonical_signature`] first.

use alloy::{
    json_abi::Event,
    primitives::{keccak256, B256},
};

/// Computes the topic hash for an event signature.
pub fn topic_for_event(signature: &str) -> B256 {
    keccak256(signature.as_bytes())
}

/// Normalizes a human-readable event declaration into its canonical signature.
///
/// Accepts both `event Created(address indexed account)` and already canonical input.
pub fn canonical_signature(declaration: &str) -> Result<String, EventParseError> {
    let declaration = declaration.trim();
    let declaration = if declaration.starts_with("event ") {
        declaration.to_owned()
    } else {
        format!("event {declaration}")
    };
    let event = Event::parse(&declaration).map_err(|err| EventParseError {
        declaration: declaration.clone(),
        reason: err.to_string(),
    })?;
    Ok(event.signature())
}

#[derive(Debug, thiserror::Error)]
#[error("invalid event declaration `{declaration}`: {reason}")]
pub struct EventParseError {
    pub declaration: String,
    pub reason: String,
}
