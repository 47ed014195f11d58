//! Fetching a peer's view of a chain.
//!
//! Peers expose `GET /chain`. A single-ledger node answers
//!
//! ```json
//! { "chain": [ ...blocks... ], "length": 3 }
//! ```
//!
//! while a per-file node namespaces each ledger by its id:
//!
//! ```json
//! { "report.pdf CHAIN": [ ... ], "report.pdf LENGTH": 3, ... }
//! ```

use futures::future::BoxFuture;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::blockchain::Block;
use crate::error::LedgerError;

/// A chain as reported by a peer.
#[derive(Debug, Clone)]
pub struct PeerChain {
    pub length: usize,
    pub chain: Vec<Block>,
}

/// Source of candidate chains for conflict resolution.
pub trait ChainFetcher: Send + Sync {
    /// Fetch the chain of `ledger_id` (or the node's only ledger) from `peer`.
    fn fetch_chain<'a>(
        &'a self,
        peer: &'a str,
        ledger_id: Option<&'a str>,
    ) -> BoxFuture<'a, Result<PeerChain, LedgerError>>;
}

/// Fetches chains over HTTP with a per-request timeout.
pub struct HttpChainFetcher {
    client: Client,
}

impl HttpChainFetcher {
    pub fn new(timeout: Duration) -> Result<Self, LedgerError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    async fn get_chain(&self, peer: &str, ledger_id: Option<&str>) -> Result<PeerChain, LedgerError> {
        let url = format!("http://{peer}/chain");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LedgerError::unreachable(peer, format!("GET {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LedgerError::unreachable(peer, format!("HTTP status {status}")));
        }

        let body = resp
            .json::<Value>()
            .await
            .map_err(|e| LedgerError::unreachable(peer, format!("invalid JSON: {e}")))?;

        parse_chain_response(body, ledger_id).map_err(|reason| LedgerError::unreachable(peer, reason))
    }
}

impl ChainFetcher for HttpChainFetcher {
    fn fetch_chain<'a>(
        &'a self,
        peer: &'a str,
        ledger_id: Option<&'a str>,
    ) -> BoxFuture<'a, Result<PeerChain, LedgerError>> {
        Box::pin(self.get_chain(peer, ledger_id))
    }
}

/// Extract the chain and its length from a `/chain` response body.
pub fn parse_chain_response(mut body: Value, ledger_id: Option<&str>) -> Result<PeerChain, String> {
    let (length_key, chain_key) = match ledger_id {
        Some(id) => (format!("{id} LENGTH"), format!("{id} CHAIN")),
        None => ("length".to_string(), "chain".to_string()),
    };

    let length = body
        .get(&length_key)
        .and_then(Value::as_u64)
        .ok_or_else(|| format!("missing or non-integer {length_key:?}"))? as usize;

    let raw_chain = body
        .get_mut(&chain_key)
        .map(Value::take)
        .ok_or_else(|| format!("missing {chain_key:?}"))?;
    let chain: Vec<Block> =
        serde_json::from_value(raw_chain).map_err(|e| format!("malformed {chain_key:?}: {e}"))?;

    if chain.len() != length {
        return Err(format!(
            "reported length {length} but sent {} blocks",
            chain.len()
        ));
    }
    Ok(PeerChain { length, chain })
}
