//! Payment verification against ledger blocks
//!
//! Verification is an exact match: a block at the given index must contain a
//! transfer whose memo, source address, destination address and amount all
//! equal the expected values. Any mismatch, a missing block, or a block
//! without a transfer operation is "not verified", returned as `Ok(false)`
//! rather than an error, because the payment may simply not have propagated
//! yet and the caller is free to retry with a later block.

use crate::{
    address::{AccountAddress, DEFAULT_SUBACCOUNT},
    client::BlockQuery,
    types::BlockQueryRequest,
    Result,
};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Stateless payment verifier over a block-query client
#[derive(Clone)]
pub struct PaymentVerifier {
    client: Arc<dyn BlockQuery>,
}

impl PaymentVerifier {
    /// Create verifier over a block-query client
    pub fn new(client: Arc<dyn BlockQuery>) -> Self {
        Self { client }
    }

    /// Check that the block at `block_index` records the expected transfer
    ///
    /// The source address is derived from `sender` (the identity that paid)
    /// and the destination address from `receiver`. Safe to call repeatedly
    /// and concurrently; performs no local state changes.
    pub async fn verify(
        &self,
        sender: &str,
        receiver: &str,
        amount: Decimal,
        block_index: u64,
        memo: u64,
    ) -> Result<bool> {
        let response = self
            .client
            .query_blocks(BlockQueryRequest::single(block_index))
            .await?;

        let block = match response.blocks.into_iter().find(|b| b.index == block_index) {
            Some(block) => block,
            None => {
                tracing::debug!(block = block_index, "Block not present in ledger");
                return Ok(false);
            }
        };

        let transfer = match block.transfer {
            Some(transfer) => transfer,
            None => {
                tracing::debug!(block = block_index, "Block carries no transfer operation");
                return Ok(false);
            }
        };

        if transfer.memo != memo {
            tracing::debug!(block = block_index, "Memo mismatch");
            return Ok(false);
        }

        let expected_from = AccountAddress::derive(sender, DEFAULT_SUBACCOUNT);
        if transfer.from != expected_from {
            tracing::debug!(block = block_index, "Source address mismatch");
            return Ok(false);
        }

        let expected_to = AccountAddress::derive(receiver, DEFAULT_SUBACCOUNT);
        if transfer.to != expected_to {
            tracing::debug!(block = block_index, "Destination address mismatch");
            return Ok(false);
        }

        // Exact amount, no tolerance
        if transfer.amount != amount {
            tracing::debug!(block = block_index, "Amount mismatch");
            return Ok(false);
        }

        Ok(true)
    }
}
