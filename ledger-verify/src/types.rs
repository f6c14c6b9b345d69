//! Wire types for the ledger block-query interface

use crate::address::AccountAddress;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request for a contiguous range of blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockQueryRequest {
    /// First block index
    pub start: u64,
    /// Number of blocks requested
    pub length: u64,
}

impl BlockQueryRequest {
    /// Request exactly one block
    pub fn single(index: u64) -> Self {
        Self {
            start: index,
            length: 1,
        }
    }
}

/// Response carrying zero or more blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockQueryResponse {
    /// Returned blocks, possibly fewer than requested
    pub blocks: Vec<LedgerBlock>,
}

/// A single ledger block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerBlock {
    /// Block index
    pub index: u64,
    /// Block timestamp (nanoseconds since Unix epoch)
    pub timestamp_nanos: i64,
    /// Transfer recorded in this block, if any
    pub transfer: Option<TransferOp>,
}

/// Transfer operation inside a block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferOp {
    /// Source address
    pub from: AccountAddress,
    /// Destination address
    pub to: AccountAddress,
    /// Transferred amount
    pub amount: Decimal,
    /// Correlation memo quoted by the sender
    pub memo: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_block_request() {
        let request = BlockQueryRequest::single(17);
        assert_eq!(request.start, 17);
        assert_eq!(request.length, 1);
    }

    #[test]
    fn test_wire_json_roundtrip() {
        let block = LedgerBlock {
            index: 5,
            timestamp_nanos: 1_700_000_000_000_000_000,
            transfer: Some(TransferOp {
                from: AccountAddress::derive("alice", 0),
                to: AccountAddress::derive("water-org", 0),
                amount: Decimal::new(100_00, 2),
                memo: 42,
            }),
        };

        let json = serde_json::to_string(&BlockQueryResponse { blocks: vec![block] }).unwrap();
        let parsed: BlockQueryResponse = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.blocks.len(), 1);
        let transfer = parsed.blocks[0].transfer.as_ref().unwrap();
        assert_eq!(transfer.memo, 42);
        assert_eq!(transfer.amount, Decimal::new(100_00, 2));
        assert_eq!(transfer.from, AccountAddress::derive("alice", 0));
    }
}
