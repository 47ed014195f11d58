use actix_web::{HttpResponse, get, web};
use log::info;

use super::models::{AppState, ChainResponse, MineResponse};
use crate::error::LedgerError;
use crate::transaction::Transaction;

/// Mine a block from the pending pool, rewarding this node.
#[get("/mine")]
pub async fn mine(state: web::Data<AppState>) -> Result<HttpResponse, LedgerError> {
    let reward = Transaction::reward(&state.node_id);
    let block = state.node.mine(Some(reward)).await?;
    info!(
        "MINE - forged block #{} (proof={}, txs={})",
        block.index,
        block.proof,
        block.transactions.len()
    );
    Ok(HttpResponse::Ok().json(MineResponse::forged(None, block)))
}

/// Get the full chain.
#[get("/chain")]
pub async fn get_chain(state: web::Data<AppState>) -> HttpResponse {
    let chain = state.node.chain();
    HttpResponse::Ok().json(ChainResponse {
        length: chain.len(),
        chain,
    })
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use serde_json::Value;

    use crate::api::test_support::single_state;
    use crate::blockchain::pow::is_valid_proof;

    #[actix_web::test]
    async fn mine_then_read_chain() {
        let state = single_state();
        let node_id = state.node_id.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::api::init_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/chain").to_request();
        let before: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(before["length"], 1);
        let genesis_proof = before["chain"][0]["proof"].as_u64().unwrap();
        assert_eq!(genesis_proof, 100);

        let req = test::TestRequest::get().uri("/mine").to_request();
        let mined: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(mined["message"], "New Block Forged");
        assert_eq!(mined["index"], 2);
        assert_eq!(mined["transactions"][0]["sender"], "0");
        assert_eq!(mined["transactions"][0]["recipient"], node_id.as_str());
        assert!(mined.get("fileID").is_none());

        let req = test::TestRequest::get().uri("/chain").to_request();
        let after: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(after["length"], 2);
        let genesis: crate::blockchain::Block =
            serde_json::from_value(after["chain"][0].clone()).unwrap();
        assert_eq!(after["chain"][1]["previous_hash"], genesis.hash().as_str());
        assert!(is_valid_proof(
            100,
            mined["proof"].as_u64().unwrap(),
            &genesis.hash(),
            2
        ));
    }
}
