// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Compiled contract artifacts.
//!
//! Reads the JSON emitted by Hardhat (`bytecode` as a hex string) or Foundry (`bytecode.object`).

use std::{fs, path::Path};

use alloy::{
    json_abi::{Constructor, JsonAbi},
    primitives::Bytes,
};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    #[serde(default)]
    pub contract_name: Option<String>,
    pub abi: JsonAbi,
    #[serde(deserialize_with = "deserialize_bytecode")]
    pub bytecode: Bytes,
}

impl ContractArtifact {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn constructor(&self) -> Option<&Constructor> {
        self.abi.constructor()
    }

    /// Contract name, falling back to `fallback` for artifacts without one.
    pub fn name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.contract_name.as_deref().unwrap_or(fallback)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("could not read artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid artifact: {0}")]
    Json(#[from] serde_json::Error),
}

fn deserialize_bytecode<'de, D>(deserializer: D) -> Result<Bytes, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Bytecode {
        Hex(Bytes),
        Object { object: Bytes },
    }

    Ok(match Bytecode::deserialize(deserializer)? {
        Bytecode::Hex(bytes) | Bytecode::Object { object: bytes } => bytes,
    })
}
