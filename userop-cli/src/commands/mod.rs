// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use crate::error::CliResult;

pub mod counter;
mod deploy;
mod deploy_proxy;

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Interact with a deployed SimpleCounter and verify the count changed
    #[clap(visible_alias = "c")]
    Counter(counter::Args),
    /// Deploy a contract through the deterministic deployment factory
    #[clap(visible_alias = "d")]
    Deploy(deploy::Args),
    /// Deploy an initializable proxy in front of an existing implementation
    DeployProxy(deploy_proxy::Args),
}

pub async fn exec(cmd: Command) -> CliResult {
    match cmd {
        Command::Counter(args) => counter::exec(args).await,
        Command::Deploy(args) => deploy::exec(args).await,
        Command::DeployProxy(args) => deploy_proxy::exec(args).await,
    }
}
