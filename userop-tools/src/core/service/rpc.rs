// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! [`ChainRpc`] over an `alloy` provider.

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes, TxHash},
    providers::Provider,
    rpc::types::{BlockId, TransactionRequest},
};
use async_trait::async_trait;
use tokio::time::{sleep, Instant};

use super::{ChainRpc, ChainRpcError, WaitConfig};
use crate::{core::receipt::TxReceipt, utils::color::DebugColor};

pub struct AlloyChainRpc<P> {
    provider: P,
    wait: WaitConfig,
}

impl<P: Provider> AlloyChainRpc<P> {
    pub fn new(provider: P, wait: WaitConfig) -> Self {
        Self { provider, wait }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

/// Whether a receipt mined at `receipt_block` has `confirmations` blocks at `head`.
fn is_confirmed(receipt_block: u64, head: u64, confirmations: u64) -> bool {
    head.saturating_add(1).saturating_sub(receipt_block) >= confirmations
}

#[async_trait]
impl<P: Provider> ChainRpc for AlloyChainRpc<P> {
    async fn read_contract_state(
        &self,
        address: Address,
        input: Bytes,
        block: Option<u64>,
    ) -> Result<Bytes, ChainRpcError> {
        let tx = TransactionRequest::default()
            .with_to(address)
            .with_input(input);
        let block = block.map(BlockId::number).unwrap_or_else(BlockId::latest);
        Ok(self.provider.call(tx).block(block).await?)
    }

    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt, ChainRpcError> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await?
            .ok_or(ChainRpcError::ReceiptNotFound(tx_hash))?;
        Ok(TxReceipt::from(&receipt))
    }

    async fn wait_for_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> Result<TxReceipt, ChainRpcError> {
        let start = Instant::now();
        loop {
            if let Some(receipt) = self.provider.get_transaction_receipt(tx_hash).await? {
                let receipt = TxReceipt::from(&receipt);
                let head = self.provider.get_block_number().await?;
                if is_confirmed(receipt.block_number, head, self.wait.confirmations) {
                    return Ok(receipt);
                }
                debug!(@grey, "tx {} mined at block {}, head at {}",
                    tx_hash.debug_lavender(), receipt.block_number, head);
            }
            let elapsed = start.elapsed();
            if elapsed >= self.wait.timeout {
                return Err(ChainRpcError::Timeout { tx_hash, elapsed });
            }
            sleep(self.wait.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use alloy::{
        primitives::{address, b256, bytes, B256},
        providers::ProviderBuilder,
        transports::mock::Asserter,
    };
    use serde_json::{json, Value};

    use super::*;
    use crate::core::receipt::TxStatus;

    const TX: TxHash = b256!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
    const COUNTER: Address = address!("00000000000000000000000000000000000000c0");
    const TOPIC: B256 = b256!("1111111111111111111111111111111111111111111111111111111111111111");

    fn mocked(
        asserter: &Asserter,
        confirmations: u64,
        timeout: Duration,
    ) -> AlloyChainRpc<impl Provider> {
        let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());
        AlloyChainRpc::new(
            provider,
            WaitConfig {
                poll_interval: Duration::from_millis(1),
                timeout,
                confirmations,
            },
        )
    }

    /// A reverted EIP-1559 receipt mined at block 10 with one log from the counter.
    fn reverted_receipt() -> Value {
        let block_hash = B256::repeat_byte(0x22);
        json!({
            "type": "0x2",
            "status": "0x0",
            "cumulativeGasUsed": "0x5208",
            "logsBloom": format!("0x{}", "00".repeat(256)),
            "logs": [{
                "address": COUNTER,
                "topics": [TOPIC],
                "data": "0x",
                "blockHash": block_hash,
                "blockNumber": "0xa",
                "transactionHash": TX,
                "transactionIndex": "0x0",
                "logIndex": "0x0",
                "removed": false,
            }],
            "transactionHash": TX,
            "transactionIndex": "0x0",
            "blockHash": block_hash,
            "blockNumber": "0xa",
            "gasUsed": "0x5208",
            "effectiveGasPrice": "0x1",
            "from": "0x00000000000000000000000000000000000000ee",
            "to": COUNTER,
            "contractAddress": null,
        })
    }

    #[tokio::test]
    async fn waits_for_confirmation_depth() {
        let asserter = Asserter::new();
        let rpc = mocked(&asserter, 2, Duration::from_secs(5));
        // not mined yet
        asserter.push_success(&Value::Null);
        // mined, but only one block deep
        asserter.push_success(&reverted_receipt());
        asserter.push_success(&"0xa");
        asserter.push_success(&reverted_receipt());
        asserter.push_success(&"0xb");

        let receipt = rpc.wait_for_transaction_receipt(TX).await.unwrap();
        assert_eq!(receipt.transaction_hash, TX);
        assert_eq!(receipt.status, TxStatus::Failure);
        assert_eq!(receipt.block_number, 10);
        assert_eq!(receipt.logs.len(), 1);
        assert_eq!(receipt.logs[0].address, COUNTER);
        assert_eq!(receipt.logs[0].topics, vec![TOPIC]);
    }

    #[tokio::test]
    async fn unmined_past_deadline_times_out() {
        let asserter = Asserter::new();
        let rpc = mocked(&asserter, 1, Duration::ZERO);
        asserter.push_success(&Value::Null);

        let err = rpc.wait_for_transaction_receipt(TX).await.unwrap_err();
        assert!(matches!(err, ChainRpcError::Timeout { tx_hash, .. } if tx_hash == TX));
    }

    #[tokio::test]
    async fn missing_receipt() {
        let asserter = Asserter::new();
        let rpc = mocked(&asserter, 1, Duration::from_secs(5));
        asserter.push_success(&Value::Null);

        let err = rpc.get_transaction_receipt(TX).await.unwrap_err();
        assert!(matches!(err, ChainRpcError::ReceiptNotFound(tx_hash) if tx_hash == TX));
    }

    #[tokio::test]
    async fn pinned_read() {
        let asserter = Asserter::new();
        let rpc = mocked(&asserter, 1, Duration::from_secs(5));
        asserter.push_success(&"0x01");

        let output = rpc
            .read_contract_state(COUNTER, bytes!("a87d942c"), Some(10))
            .await
            .unwrap();
        assert_eq!(output, bytes!("01"));
    }

    #[test]
    fn confirmation_depth() {
        assert!(is_confirmed(10, 10, 1));
        assert!(is_confirmed(10, 12, 1));

        assert!(!is_confirmed(10, 10, 3));
        assert!(!is_confirmed(10, 11, 3));
        assert!(is_confirmed(10, 12, 3));

        assert!(is_confirmed(10, 9, 0));
    }
}
