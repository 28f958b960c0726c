// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::path::PathBuf;

use eyre::eyre;
use userop_tools::{
    core::{artifact::ContractArtifact, deployment::build_deploy_payload},
    ops::{self, DeploymentOutcome},
};

use crate::{
    common_args::{DeploymentArgs, ProviderArgs, WaitArgs, WalletArgs},
    error::CliResult,
    utils::decode0x,
};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Compiled contract artifact (Hardhat or Foundry JSON)
    #[arg(long, required_unless_present = "bytecode")]
    artifact: Option<PathBuf>,
    /// Hex-encoded creation bytecode, for contracts without an artifact
    #[arg(long, conflicts_with = "artifact")]
    bytecode: Option<String>,
    /// The constructor arguments.
    #[arg(
        long,
        num_args(0..),
        value_name = "ARGS",
        allow_hyphen_values = true,
    )]
    constructor_args: Vec<String>,

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
    let artifact = args
        .artifact
        .as_ref()
        .map(ContractArtifact::from_path)
        .transpose()?;
    let payload = match &artifact {
        Some(artifact) => build_deploy_payload(
            &artifact.bytecode,
            artifact.constructor(),
            &args.constructor_args,
        )?,
        None => {
            let bytecode = decode0x(args.bytecode.as_deref().unwrap_or_default())?;
            build_deploy_payload(&bytecode, None, &args.constructor_args)?
        }
    };
    let event = args.deployment.event()?;
    let name = artifact
        .as_ref()
        .map_or("Contract", |artifact| artifact.name_or("Contract"));

    let rpc = args.provider.build_chain_rpc(&args.wait).await?;
    let service = args.wallet.build_service(&rpc, &args.wait).await?;
    let outcome = ops::deploy(
        &service,
        &rpc,
        &format!("{name}: deploy"),
        &payload,
        args.deployment.factory(),
        event.as_deref(),
    )
    .await?;
    report(&outcome, event.as_deref())
}

/// Fails on a reverted deployment and prints where the contract landed.
pub fn report(outcome: &DeploymentOutcome, event: Option<&str>) -> CliResult {
    if !outcome.succeeded() {
        return Err(eyre!(
            "deployment reverted in transaction {}",
            outcome.confirmation.transaction_hash
        )
        .into());
    }
    match (outcome.address(), event) {
        (Some(address), _) => println!("{address}"),
        (None, Some(event)) => {
            log::warn!("no {event} log in transaction {}", outcome.confirmation.transaction_hash);
            println!("{}", outcome.predicted_address);
        }
        (None, None) => println!("{}", outcome.predicted_address),
    }
    Ok(())
}
