use serde::{Deserialize, Serialize};

use crate::blockchain::Timestamp;

/// Transfer of a content item between two parties (single-ledger node).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferTx {
    pub sender: String,
    pub recipient: String,
    /// Identifier of the content being transferred.
    #[serde(rename = "bookID")]
    pub book_id: String,
}

/// Record of a file chunk written by an author (per-file ledgers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileChunkTx {
    pub author: String,
    #[serde(rename = "block name")]
    pub block_name: String,
    /// SHA-256 of the chunk contents, or "0" when no chunk was read.
    #[serde(rename = "file hash")]
    pub file_hash: String,
    pub timestamp: Timestamp,
}

/// A pending item awaiting inclusion in the next block.
///
/// Serialized untagged: on the wire a transaction is just the fields of its
/// variant, which keeps block digests identical to what peers compute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Transaction {
    Transfer(TransferTx),
    FileChunk(FileChunkTx),
}

impl Transaction {
    pub fn transfer(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        book_id: impl Into<String>,
    ) -> Self {
        Transaction::Transfer(TransferTx {
            sender: sender.into(),
            recipient: recipient.into(),
            book_id: book_id.into(),
        })
    }

    pub fn file_chunk(
        author: impl Into<String>,
        block_name: impl Into<String>,
        file_hash: impl Into<String>,
        timestamp: impl Into<Timestamp>,
    ) -> Self {
        Transaction::FileChunk(FileChunkTx {
            author: author.into(),
            block_name: block_name.into(),
            file_hash: file_hash.into(),
            timestamp: timestamp.into(),
        })
    }

    /// Reward recorded by a node when it mines a block: sender "0" marks
    /// the coins as newly created.
    pub fn reward(node_id: &str) -> Self {
        Self::transfer("0", node_id, "0")
    }
}
