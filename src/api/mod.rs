mod chain;
mod files;
mod health;
pub mod models;
mod nodes;
mod tx;

use actix_web::web::ServiceConfig;

pub use models::{AppState, FilesState};

/// Routes of a single-ledger node.
pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(health::health_check)
        .service(chain::mine)
        .service(chain::get_chain)
        .service(tx::post_transaction)
        .service(nodes::register_nodes)
        .service(nodes::list_nodes)
        .service(nodes::resolve);
}

/// Routes of a node keeping one ledger per file.
pub fn init_file_routes(cfg: &mut ServiceConfig) {
    cfg.service(health::health_check)
        .service(files::new_file)
        .service(files::mine_file)
        .service(files::post_file_transaction)
        .service(files::get_all_chains)
        .service(files::register_file_nodes)
        .service(files::list_file_nodes)
        .service(files::resolve_file);
}
