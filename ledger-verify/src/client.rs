//! Block-query client
//!
//! The ledger service is a separate system exposing a block-query endpoint.
//! The `BlockQuery` trait is the seam components program against; the HTTP
//! implementation below is the production client, and tests substitute
//! in-memory stubs.

use crate::{
    error::{Error, Result},
    types::{BlockQueryRequest, BlockQueryResponse},
};
use async_trait::async_trait;
use std::time::Duration;

/// Read-only block-query interface to the ledger
#[async_trait]
pub trait BlockQuery: Send + Sync {
    /// Fetch a range of blocks; absent blocks are simply not returned
    async fn query_blocks(&self, request: BlockQueryRequest) -> Result<BlockQueryResponse>;
}

/// HTTP client for the ledger service
pub struct HttpLedgerClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpLedgerClient {
    /// Create client against a ledger endpoint
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl BlockQuery for HttpLedgerClient {
    async fn query_blocks(&self, request: BlockQueryRequest) -> Result<BlockQueryResponse> {
        let url = format!("{}/query_blocks", self.endpoint);

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(Error::Transport(format!(
                "Ledger returned HTTP {}",
                response.status()
            )));
        }

        let body: BlockQueryResponse = response.json().await?;

        tracing::debug!(
            start = request.start,
            returned = body.blocks.len(),
            "Block query completed"
        );

        Ok(body)
    }
}
