mod api;
mod blockchain;
mod config;
mod error;
mod network;
mod node;
mod registry;
mod transaction;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;
use std::io;
use std::sync::Arc;

use api::{AppState, FilesState};
use config::{NodeConfig, NodeMode};
use network::{ChainFetcher, HttpChainFetcher};
use node::LedgerNode;
use registry::LedgerRegistry;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let cfg = NodeConfig::from_env();
    let fetcher: Arc<dyn ChainFetcher> =
        Arc::new(HttpChainFetcher::new(cfg.peer_timeout).map_err(io::Error::other)?);
    let (host, port) = (cfg.host.clone(), cfg.port);

    info!(
        "⛓️ Starting {:?} ledger node at http://{host}:{port} (difficulty {})",
        cfg.mode, cfg.difficulty
    );

    match cfg.mode {
        NodeMode::Single => {
            let node_id = api::models::new_node_id();
            info!("node id {node_id}");
            let state = web::Data::new(AppState {
                node_id,
                node: LedgerNode::new(cfg.ledger_config()),
                fetcher,
            });

            HttpServer::new(move || {
                App::new()
                    .app_data(state.clone())
                    .configure(api::init_routes)
            })
            .bind((host.as_str(), port))?
            .run()
            .await
        }
        NodeMode::Files => {
            let state = web::Data::new(FilesState {
                registry: LedgerRegistry::new(cfg.ledger_config()),
                fetcher,
            });

            HttpServer::new(move || {
                App::new()
                    .app_data(state.clone())
                    .configure(api::init_file_routes)
            })
            .bind((host.as_str(), port))?
            .run()
            .await
        }
    }
}
