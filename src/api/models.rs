use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::blockchain::Block;
use crate::network::ChainFetcher;
use crate::node::LedgerNode;
use crate::registry::LedgerRegistry;
use crate::transaction::Transaction;

/// Shared state of a single-ledger node.
pub struct AppState {
    /// Recipient of mining rewards (dash-less UUID v4).
    pub node_id: String,
    pub node: LedgerNode,
    pub fetcher: Arc<dyn ChainFetcher>,
}

/// Shared state of a node tracking one ledger per file.
pub struct FilesState {
    pub registry: LedgerRegistry,
    pub fetcher: Arc<dyn ChainFetcher>,
}

/// Fresh node identifier.
pub fn new_node_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/* ---------- Request Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: String,
    pub recipient: String,
    #[serde(rename = "bookID")]
    pub book_id: String,
}

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct NewFileRequest {
    #[serde(rename = "fileID")]
    pub file_id: String,
    pub difficulty: Option<u32>,
}

#[derive(Deserialize)]
pub struct FileRequest {
    #[serde(rename = "fileID")]
    pub file_id: String,
}

#[derive(Deserialize)]
pub struct FileQuery {
    #[serde(rename = "fileID")]
    pub file_id: Option<String>,
}

#[derive(Deserialize)]
pub struct NewFileTxRequest {
    #[serde(rename = "fileID")]
    pub file_id: String,
    pub author: String,
    #[serde(rename = "block name")]
    pub block_name: String,
}

#[derive(Deserialize)]
pub struct RegisterFileNodesRequest {
    #[serde(rename = "fileID")]
    pub file_id: String,
    pub nodes: Option<Vec<String>>,
}

/* ---------- Response Models ---------- */

#[derive(Serialize)]
pub struct MessageResponse {
    #[serde(rename = "fileID", skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    pub message: String,
}

#[derive(Serialize)]
pub struct MineResponse {
    #[serde(rename = "fileID", skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    pub message: &'static str,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl MineResponse {
    pub fn forged(file_id: Option<String>, block: Block) -> Self {
        Self {
            file_id,
            message: "New Block Forged",
            index: block.index,
            transactions: block.transactions,
            proof: block.proof,
            previous_hash: block.previous_hash,
        }
    }
}

#[derive(Serialize)]
pub struct ChainResponse {
    pub chain: Vec<Block>,
    pub length: usize,
}

#[derive(Serialize)]
pub struct NodesResponse {
    #[serde(rename = "fileID", skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    #[serde(rename = "fileID", skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_chain: Option<Vec<Block>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<Vec<Block>>,
}

impl ResolveResponse {
    pub fn new(file_id: Option<String>, replaced: bool, chain: Vec<Block>) -> Self {
        if replaced {
            Self {
                file_id,
                message: "Chain has been replaced",
                new_chain: Some(chain),
                chain: None,
            }
        } else {
            Self {
                file_id,
                message: "Chain has not been replaced; it is authoritative",
                new_chain: None,
                chain: Some(chain),
            }
        }
    }
}
