// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! [`AbstractionService`] over the EIP-5792 wallet call API.
//!
//! The wallet (a smart account behind a bundler) owns signing, nonce management and paymaster
//! sponsorship. Batches go in through `wallet_sendCalls` and are tracked with
//! `wallet_getCallsStatus` until the wallet reports the transaction that included them.

use std::{collections::HashMap, time::Duration};

use alloy::{
    primitives::{Address, TxHash, U64},
    providers::Provider,
    transports::{RpcError, TransportErrorKind},
};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::time::{sleep, Instant};

use super::{
    AbstractionService, Call, ServiceError, UserOperationHandle, UserOperationReceipt, WaitConfig,
};

const SEND_CALLS: &str = "wallet_sendCalls";
const GET_CALLS_STATUS: &str = "wallet_getCallsStatus";
const API_VERSION: &str = "2.0.0";

#[derive(Clone, Debug, Default)]
pub struct WalletConfig {
    pub chain_id: u64,
    /// Smart account sending the calls; the wallet's default account when unset.
    pub from: Option<Address>,
    /// ERC-7677 paymaster endpoint sponsoring the operation.
    pub paymaster_url: Option<String>,
    pub wait: WaitConfig,
}

pub struct WalletCallsService<P> {
    provider: P,
    config: WalletConfig,
    settled: Mutex<HashMap<UserOperationHandle, UserOperationReceipt>>,
}

impl<P: Provider> WalletCallsService<P> {
    pub fn new(provider: P, config: WalletConfig) -> Self {
        Self {
            provider,
            config,
            settled: Mutex::default(),
        }
    }

    fn request(&self, calls: &[Call]) -> SendCallsRequest {
        SendCallsRequest {
            version: API_VERSION,
            chain_id: U64::from(self.config.chain_id),
            from: self.config.from,
            atomic_required: true,
            calls: calls.to_vec(),
            capabilities: Capabilities {
                paymaster_service: self
                    .config
                    .paymaster_url
                    .clone()
                    .map(|url| PaymasterService { url }),
            },
        }
    }

    async fn poll(&self, handle: &UserOperationHandle) -> Result<CallsState, ServiceError> {
        let status: CallsStatus = self
            .provider
            .raw_request(GET_CALLS_STATUS.into(), (handle.id().to_owned(),))
            .await?;
        status.state()
    }
}

#[async_trait]
impl<P: Provider> AbstractionService for WalletCallsService<P> {
    async fn submit_operation(&self, calls: &[Call]) -> Result<UserOperationHandle, ServiceError> {
        let request = self.request(calls);
        let response: SendCallsResponse = self
            .provider
            .raw_request(SEND_CALLS.into(), (request,))
            .await
            .map_err(rejection)?;
        Ok(UserOperationHandle::new(response.into_id()))
    }

    async fn wait_for_receipt(
        &self,
        handle: &UserOperationHandle,
    ) -> Result<UserOperationReceipt, ServiceError> {
        let cached = self.settled.lock().get(handle).cloned();
        if let Some(receipt) = cached {
            return Ok(receipt);
        }

        let start = Instant::now();
        loop {
            match self.poll(handle).await? {
                CallsState::Included(tx_hash) => {
                    let receipt = UserOperationReceipt {
                        included_transaction_hash: tx_hash,
                    };
                    self.settled.lock().insert(handle.clone(), receipt.clone());
                    return Ok(receipt);
                }
                CallsState::Failed(reason) => return Err(ServiceError::Rejected(reason)),
                CallsState::Pending => {
                    debug!(@grey, "operation {} pending", handle.lavender());
                }
            }
            let elapsed = start.elapsed();
            if elapsed >= self.config.wait.timeout {
                return Err(ServiceError::Timeout {
                    handle: handle.clone(),
                    elapsed,
                });
            }
            sleep(poll_delay(self.config.wait.poll_interval)).await;
        }
    }
}

/// Error responses from the wallet are rejections; anything else is a transport failure.
fn rejection(err: RpcError<TransportErrorKind>) -> ServiceError {
    match err.as_error_resp() {
        Some(payload) => {
            ServiceError::Rejected(format!("{} (code {})", payload.message, payload.code))
        }
        None => ServiceError::Rpc(err),
    }
}

fn poll_delay(interval: Duration) -> Duration {
    interval.max(Duration::from_millis(50))
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendCallsRequest {
    version: &'static str,
    chain_id: U64,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<Address>,
    atomic_required: bool,
    calls: Vec<Call>,
    capabilities: Capabilities,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct Capabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    paymaster_service: Option<PaymasterService>,
}

#[derive(Clone, Debug, Serialize)]
struct PaymasterService {
    url: String,
}

/// Pre-2.0 wallets answer with the bare identifier.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SendCallsResponse {
    Id(String),
    Object { id: String },
}

impl SendCallsResponse {
    fn into_id(self) -> String {
        match self {
            Self::Id(id) | Self::Object { id } => id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CallsStatus {
    status: StatusCode,
    #[serde(default)]
    receipts: Option<Vec<CallReceipt>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StatusCode {
    Code(u16),
    Label(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CallReceipt {
    transaction_hash: TxHash,
}

#[derive(Debug, PartialEq, Eq)]
enum CallsState {
    Pending,
    Included(TxHash),
    Failed(String),
}

impl CallsStatus {
    fn state(&self) -> Result<CallsState, ServiceError> {
        let included = || {
            self.receipts
                .as_deref()
                .and_then(<[CallReceipt]>::first)
                .map(|receipt| CallsState::Included(receipt.transaction_hash))
                .ok_or_else(|| ServiceError::Malformed("settled batch without receipts".into()))
        };
        match &self.status {
            StatusCode::Code(100) => Ok(CallsState::Pending),
            // 500 and 600 are on-chain reverts: the batch still has a transaction.
            StatusCode::Code(200 | 500 | 600) => included(),
            StatusCode::Code(400) => Ok(CallsState::Failed(
                "batch failed off-chain and will not be retried".into(),
            )),
            StatusCode::Label(label) if label.eq_ignore_ascii_case("PENDING") => {
                Ok(CallsState::Pending)
            }
            StatusCode::Label(label) if label.eq_ignore_ascii_case("CONFIRMED") => included(),
            StatusCode::Code(code) => Err(ServiceError::Malformed(format!("unknown status {code}"))),
            StatusCode::Label(label) => {
                Err(ServiceError::Malformed(format!("unknown status {label}")))
            }
        }
    }
}
