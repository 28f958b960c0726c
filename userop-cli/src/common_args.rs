// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::time::Duration;

use alloy::{
    primitives::Address,
    providers::{Provider, ProviderBuilder},
};
use eyre::Context;
use userop_tools::core::{
    deployment::CREATE2_FACTORY_ADDRESS,
    event::canonical_signature,
    service::{
        rpc::AlloyChainRpc,
        wallet::{WalletCallsService, WalletConfig},
        WaitConfig,
    },
};

use crate::constants::{DEFAULT_ENDPOINT, DEFAULT_WALLET_ENDPOINT};

#[derive(Debug, clap::Args)]
pub struct DeploymentArgs {
    /// Deterministic deployment factory receiving `salt ‖ init code`
    #[arg(long, default_value_t = CREATE2_FACTORY_ADDRESS)]
    factory: Address,
    /// Event emitted by the deployed contract, used to find its address (e.g. "Created(address)")
    #[arg(long)]
    event: Option<String>,
}

impl DeploymentArgs {
    pub fn factory(&self) -> Address {
        self.factory
    }

    /// The event signature in canonical form.
    pub fn event(&self) -> eyre::Result<Option<String>> {
        self.event
            .as_deref()
            .map(canonical_signature)
            .transpose()
            .wrap_err("invalid --event")
    }
}

#[derive(Debug, clap::Args)]
pub struct ProviderArgs {
    /// Chain RPC endpoint used for reads and receipts
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

impl ProviderArgs {
    pub async fn build_provider(&self) -> eyre::Result<impl Provider> {
        let provider = ProviderBuilder::new()
            .connect(&self.endpoint)
            .await
            .wrap_err_with(|| format!("could not connect to {}", self.endpoint))?;
        Ok(provider)
    }

    pub async fn build_chain_rpc(&self, wait: &WaitArgs) -> eyre::Result<AlloyChainRpc<impl Provider>> {
        let provider = self.build_provider().await?;
        Ok(AlloyChainRpc::new(provider, wait.config()))
    }
}

#[derive(Debug, clap::Args)]
pub struct WaitArgs {
    /// Seconds to wait for a user operation or transaction before giving up
    #[arg(long, default_value = "120")]
    timeout_secs: u64,
    /// Milliseconds between status polls
    #[arg(long, default_value = "2000")]
    poll_interval_ms: u64,
    /// Blocks a transaction must be buried under before it counts as confirmed
    #[arg(long, default_value = "1")]
    confirmations: u64,
}

impl WaitArgs {
    pub fn config(&self) -> WaitConfig {
        WaitConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            timeout: Duration::from_secs(self.timeout_secs),
            confirmations: self.confirmations,
        }
    }
}

#[derive(Debug, clap::Args)]
pub struct WalletArgs {
    /// EIP-5792 wallet endpoint that signs and submits user operations
    #[arg(long, env = "WALLET_RPC_URL", default_value = DEFAULT_WALLET_ENDPOINT)]
    wallet_endpoint: String,
    /// Smart account sending the operations
    #[arg(long, env = "SENDER_ADDRESS")]
    from: Option<Address>,
    /// ERC-7677 paymaster endpoint sponsoring the operations
    #[arg(long, env = "PAYMASTER_URL")]
    paymaster_url: Option<String>,
}

impl WalletArgs {
    pub fn config(&self, chain_id: u64, wait: &WaitArgs) -> WalletConfig {
        WalletConfig {
            chain_id,
            from: self.from,
            paymaster_url: self.paymaster_url.clone(),
            wait: wait.config(),
        }
    }

    /// Connects to the wallet, submitting on the chain `rpc` reads from.
    pub async fn build_service<P: Provider>(
        &self,
        rpc: &AlloyChainRpc<P>,
        wait: &WaitArgs,
    ) -> eyre::Result<WalletCallsService<impl Provider>> {
        let chain_id = rpc
            .provider()
            .get_chain_id()
            .await
            .wrap_err("could not fetch chain id")?;
        let provider = ProviderBuilder::new()
            .connect(&self.wallet_endpoint)
            .await
            .wrap_err_with(|| format!("could not connect to wallet at {}", self.wallet_endpoint))?;
        Ok(WalletCallsService::new(provider, self.config(chain_id, wait)))
    }
}
