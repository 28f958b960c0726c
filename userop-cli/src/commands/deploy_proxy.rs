// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::path::PathBuf;

use alloy::primitives::Address;
use userop_tools::{
    core::artifact::ContractArtifact,
    ops::{self, ProxyDeployment},
};

use crate::{
    commands::deploy::report,
    common_args::{DeploymentArgs, ProviderArgs, WaitArgs, WalletArgs},
    error::CliResult,
};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Proxy artifact; its constructor takes `(address implementation, bytes data)`
    #[arg(long)]
    proxy_artifact: PathBuf,
    /// Artifact of the implementation, for its initializer ABI
    #[arg(long)]
    implementation_artifact: PathBuf,
    /// Address of the deployed implementation
    #[arg(long)]
    implementation: Address,
    /// Implementation function run through the proxy on creation
    #[arg(long, default_value = "initialize")]
    initializer: String,
    /// The initializer arguments.
    #[arg(
        long,
        num_args(0..),
        value_name = "ARGS",
        allow_hyphen_values = true,
    )]
    initializer_args: Vec<String>,

    #[command(flatten)]
    deployment: DeploymentArgs,
    #[command(flatten)]
    provider: ProviderArgs,
    #[command(flatten)]
    wait: WaitArgs,
    #[command(flatten)]
    wallet: WalletArgs,
}

pub async fn exec(args: Args) -> CliResult {
    let proxy = ContractArtifact::from_path(&args.proxy_artifact)?;
    let implementation = ContractArtifact::from_path(&args.implementation_artifact)?;
    let deployment = ProxyDeployment {
        proxy: &proxy,
        implementation: args.implementation,
        implementation_abi: &implementation.abi,
        initializer: &args.initializer,
        initializer_args: &args.initializer_args,
    };
    let event = args.deployment.event()?;

    let rpc = args.provider.build_chain_rpc(&args.wait).await?;
    let service = args.wallet.build_service(&rpc, &args.wait).await?;
    let outcome = ops::deploy_proxy(
        &service,
        &rpc,
        &deployment,
        args.deployment.factory(),
        event.as_deref(),
    )
    .await?;
    report(&outcome, event.as_deref())
}
