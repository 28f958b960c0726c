// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! Contract deployment through a deterministic deployment factory.

use alloy::{
    json_abi::JsonAbi,
    primitives::{Address, B256},
};

use crate::{
    core::{
        artifact::ContractArtifact,
        deployment::{build_proxy_deploy_payload, proxy::find_function, DeployPayload},
        lifecycle::{Confirmation, LifecycleDriver},
        resolver::{resolve_deployed_address, ResolvedContractAddress},
        service::{AbstractionService, ChainRpc},
    },
    utils::color::DebugColor,
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentOutcome {
    pub confirmation: Confirmation,
    pub salt: B256,
    /// CREATE2 address derived from factory, salt and init code.
    pub predicted_address: Address,
    /// Address recovered from the creation event, when one was requested and found.
    pub resolved: Option<ResolvedContractAddress>,
}

impl DeploymentOutcome {
    pub fn succeeded(&self) -> bool {
        self.confirmation.succeeded
    }

    pub fn address(&self) -> Option<Address> {
        self.resolved.map(|resolved| resolved.address)
    }
}

/// Deploys `payload` through `factory` as a user operation.
///
/// When `event_signature` is given, the deployed address is resolved from the first log carrying
/// that event in the confirmed transaction.
pub async fn deploy<S, R>(
    service: &S,
    rpc: &R,
    label: &str,
    payload: &DeployPayload,
    factory: Address,
    event_signature: Option<&str>,
) -> Result<DeploymentOutcome>
where
    S: AbstractionService + ?Sized,
    R: ChainRpc + ?Sized,
{
    let predicted_address = payload.predicted_address(factory);
    debug!(@grey, "[{label}] salt: {}", payload.salt().debug_lavender());
    debug!(@grey, "[{label}] predicted address: {}", predicted_address.debug_lavender());

    let driver = LifecycleDriver::new(service, rpc, label);
    let confirmation = driver.submit_and_confirm(&[payload.call(factory)]).await?;

    let resolved = match event_signature {
        Some(signature) if confirmation.succeeded => {
            resolve_deployed_address(rpc, confirmation.transaction_hash, signature).await?
        }
        _ => None,
    };
    if let Some(resolved) = resolved {
        info!(@grey, "[{label}] deployed contract address: {}", resolved.address.debug_lavender());
        if resolved.address != predicted_address {
            warn!(@yellow, "[{label}] event emitted by {} but factory address is {}",
                resolved.address, predicted_address);
        }
    }

    Ok(DeploymentOutcome {
        confirmation,
        salt: payload.salt(),
        predicted_address,
        resolved,
    })
}

/// An initializable proxy in front of an already deployed implementation.
#[derive(Clone, Copy, Debug)]
pub struct ProxyDeployment<'a> {
    pub proxy: &'a ContractArtifact,
    pub implementation: Address,
    pub implementation_abi: &'a JsonAbi,
    /// Implementation function the proxy delegate-calls on creation.
    pub initializer: &'a str,
    pub initializer_args: &'a [String],
}

impl ProxyDeployment<'_> {
    pub fn payload(&self) -> Result<DeployPayload> {
        let initializer = find_function(
            self.implementation_abi,
            self.initializer,
            self.initializer_args.len(),
        )?;
        let payload = build_proxy_deploy_payload(
            &self.proxy.bytecode,
            self.proxy.constructor(),
            self.implementation,
            initializer,
            self.initializer_args,
        )?;
        Ok(payload)
    }
}

/// Deploys a proxy through `factory`, initialized in the same transaction.
pub async fn deploy_proxy<S, R>(
    service: &S,
    rpc: &R,
    proxy: &ProxyDeployment<'_>,
    factory: Address,
    event_signature: Option<&str>,
) -> Result<DeploymentOutcome>
where
    S: AbstractionService + ?Sized,
    R: ChainRpc + ?Sized,
{
    let label = format!("{}: proxy deploy", proxy.proxy.name_or("Proxy"));
    debug!(@grey, "[{label}] implementation: {}", proxy.implementation.debug_lavender());
    let payload = proxy.payload()?;
    deploy(service, rpc, &label, &payload, factory, event_signature).await
}
