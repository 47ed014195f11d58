pub mod consensus;
pub mod fetch;
pub mod peers;

pub use consensus::resolve;
pub use fetch::{ChainFetcher, HttpChainFetcher};
pub use peers::PeerRegistry;
