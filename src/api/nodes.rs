use actix_web::{HttpResponse, get, post, web};
use log::info;

use super::models::{AppState, NodesResponse, RegisterNodesRequest, ResolveResponse};
use crate::error::LedgerError;

/// Register peer nodes.
#[post("/nodes/register")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> Result<HttpResponse, LedgerError> {
    let nodes = body.into_inner().nodes.ok_or(LedgerError::MissingField("nodes"))?;
    let total_nodes = state.node.register_peers(&nodes)?;
    info!("NODES - {} peer(s) known", total_nodes.len());

    Ok(HttpResponse::Created().json(NodesResponse {
        file_id: None,
        message: Some("New nodes added"),
        total_nodes,
    }))
}

#[get("/nodes/list")]
pub async fn list_nodes(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(NodesResponse {
        file_id: None,
        message: None,
        total_nodes: state.node.peers(),
    })
}

/// Run consensus against every registered peer.
#[get("/nodes/resolve")]
pub async fn resolve(state: web::Data<AppState>) -> HttpResponse {
    let replaced = state.node.resolve(state.fetcher.as_ref()).await;
    HttpResponse::Ok().json(ResolveResponse::new(None, replaced, state.node.chain()))
}
