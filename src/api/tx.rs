use actix_web::{HttpResponse, post, web};
use log::debug;

use super::models::{AppState, MessageResponse, NewTxRequest};
use crate::transaction::Transaction;

/// Queue a transaction for the next mined block.
#[post("/transactions/new")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> HttpResponse {
    let body = body.into_inner();
    let tx = Transaction::transfer(body.sender, body.recipient, body.book_id);
    let index = state.node.add_transaction(tx);
    debug!("POST /transactions/new - queued for block {index}");

    HttpResponse::Created().json(MessageResponse {
        file_id: None,
        message: format!("Transaction will be added to Block {index}"),
    })
}
