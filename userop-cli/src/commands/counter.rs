// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use std::time::Duration;

use alloy::primitives::Address;
use eyre::eyre;
use userop_tools::{
    core::{
        counter::CounterAction,
        verification::{VerificationConfig, VerificationOutcome},
    },
    ops,
};

use crate::{
    common_args::{ProviderArgs, WaitArgs, WalletArgs},
    error::CliResult,
};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Action {
    Increment,
    Decrement,
}

impl From<Action> for CounterAction {
    fn from(action: Action) -> Self {
        match action {
            Action::Increment => Self::Increment,
            Action::Decrement => Self::Decrement,
        }
    }
}

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Counter function to call
    #[arg(value_enum)]
    action: Action,
    /// Address of the deployed SimpleCounter
    #[arg(long)]
    pub(crate) contract_address: Address,
    /// Milliseconds to wait after confirmation before reading the new count (0 to skip)
    #[arg(long, default_value = "1000")]
    settle_delay_ms: u64,

    #[command(flatten)]
    provider: ProviderArgs,
    #[command(flatten)]
    wait: WaitArgs,
    #[command(flatten)]
    wallet: WalletArgs,
}

pub async fn exec(args: Args) -> CliResult {
    let rpc = args.provider.build_chain_rpc(&args.wait).await?;
    let service = args.wallet.build_service(&rpc, &args.wait).await?;
    let config = VerificationConfig {
        settle_delay: (args.settle_delay_ms > 0)
            .then(|| Duration::from_millis(args.settle_delay_ms)),
    };

    let action = CounterAction::from(args.action);
    let outcome = ops::counter(&service, &rpc, args.contract_address, action, &config).await?;
    match outcome {
        VerificationOutcome::Matched { .. } => Ok(()),
        VerificationOutcome::Mismatched { before, after, .. } => Err(eyre!(
            "{action} expected count {before} to change by {}, found {after}",
            action.expected_delta()
        )
        .into()),
        VerificationOutcome::TransactionFailed { confirmation } => Err(eyre!(
            "{action} reverted in transaction {}",
            confirmation.transaction_hash
        )
        .into()),
    }
}
