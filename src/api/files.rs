//! Routes of a node that keeps one ledger per file.

use actix_web::{HttpResponse, get, post, web};
use log::{debug, info};
use serde_json::{Map, Value, json};

use super::models::{
    FileQuery, FileRequest, FilesState, MessageResponse, MineResponse,
    NewFileRequest, NewFileTxRequest, NodesResponse, RegisterFileNodesRequest, ResolveResponse,
};
use crate::blockchain::Timestamp;
use crate::error::LedgerError;
use crate::transaction::{Transaction, digest_file};

/// Start a new ledger for a file.
#[post("/newfile")]
pub async fn new_file(
    state: web::Data<FilesState>,
    body: web::Json<NewFileRequest>,
) -> Result<HttpResponse, LedgerError> {
    let body = body.into_inner();
    state.registry.create(&body.file_id, body.difficulty)?;

    Ok(HttpResponse::Created().json(MessageResponse {
        file_id: Some(body.file_id),
        message: "new local Blockchain created".to_string(),
    }))
}

#[post("/mine")]
pub async fn mine_file(
    state: web::Data<FilesState>,
    body: web::Json<FileRequest>,
) -> Result<HttpResponse, LedgerError> {
    let file_id = body.into_inner().file_id;
    let node = state.registry.get(&file_id)?;
    let block = node.mine(None).await?;
    info!("MINE - {file_id:?} forged block #{}", block.index);

    Ok(HttpResponse::Ok().json(MineResponse::forged(Some(file_id), block)))
}

/// Record a file chunk; its digest is computed from the chunk on disk.
#[post("/transactions/new")]
pub async fn post_file_transaction(
    state: web::Data<FilesState>,
    body: web::Json<NewFileTxRequest>,
) -> Result<HttpResponse, LedgerError> {
    let body = body.into_inner();
    let node = state.registry.get(&body.file_id)?;

    let block_name = body.block_name.clone();
    let file_hash = web::block(move || digest_file(&block_name))
        .await
        .map_err(|e| LedgerError::Internal(e.to_string()))??;
    debug!("POST /transactions/new - {} -> {file_hash}", body.block_name);

    let tx = Transaction::file_chunk(body.author, body.block_name, file_hash, Timestamp::now());
    let index = node.add_transaction(tx);

    Ok(HttpResponse::Created().json(MessageResponse {
        file_id: Some(body.file_id),
        message: format!("Transaction will be added to Block {index}"),
    }))
}

/// Every ledger's chain and length, plus totals.
#[get("/chain")]
pub async fn get_all_chains(state: web::Data<FilesState>) -> HttpResponse {
    let mut body = Map::new();
    let mut total_blocks = 0;
    let snapshot = state.registry.snapshot();
    let total_files = snapshot.len();

    for (id, chain) in snapshot {
        total_blocks += chain.len();
        body.insert(format!("{id} LENGTH"), json!(chain.len()));
        body.insert(format!("{id} CHAIN"), json!(chain));
    }
    body.insert("Total number of files".into(), json!(total_files));
    body.insert("Total number of Blocks".into(), json!(total_blocks));

    HttpResponse::Ok().json(Value::Object(body))
}

#[post("/nodes/register")]
pub async fn register_file_nodes(
    state: web::Data<FilesState>,
    body: web::Json<RegisterFileNodesRequest>,
) -> Result<HttpResponse, LedgerError> {
    let body = body.into_inner();
    let node = state.registry.get(&body.file_id)?;
    let nodes = body.nodes.ok_or(LedgerError::MissingField("nodes"))?;
    let total_nodes = node.register_peers(&nodes)?;

    Ok(HttpResponse::Created().json(NodesResponse {
        file_id: Some(body.file_id),
        message: Some("New nodes added"),
        total_nodes,
    }))
}

#[get("/nodes/list")]
pub async fn list_file_nodes(
    state: web::Data<FilesState>,
    query: web::Query<FileQuery>,
) -> Result<HttpResponse, LedgerError> {
    let file_id = query
        .into_inner()
        .file_id
        .ok_or(LedgerError::MissingField("fileID"))?;
    let node = state.registry.get(&file_id)?;

    Ok(HttpResponse::Ok().json(NodesResponse {
        file_id: Some(file_id),
        message: None,
        total_nodes: node.peers(),
    }))
}

#[post("/nodes/resolve")]
pub async fn resolve_file(
    state: web::Data<FilesState>,
    body: web::Json<FileRequest>,
) -> Result<HttpResponse, LedgerError> {
    let file_id = body.into_inner().file_id;
    let node = state.registry.get(&file_id)?;
    let replaced = node.resolve(state.fetcher.as_ref()).await;

    Ok(HttpResponse::Ok().json(ResolveResponse::new(
        Some(file_id),
        replaced,
        node.chain(),
    )))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::{Value, json};
    use std::io::Write;
    use std::sync::Arc;

    use crate::api::models::FilesState;
    use crate::api::test_support::files_state;
    use crate::blockchain::{Ledger, LedgerConfig};
    use crate::network::testing::MapFetcher;

    macro_rules! files_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .configure(crate::api::init_file_routes),
            )
            .await
        };
    }

    fn post(uri: &str, body: Value) -> actix_web::test::TestRequest {
        test::TestRequest::post().uri(uri).set_json(body)
    }

    #[actix_web::test]
    async fn file_ledger_lifecycle() {
        let app = files_app!(files_state());

        let resp = test::call_service(&app, post("/newfile", json!({"fileID": "a.txt"})).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = test::call_service(&app, post("/newfile", json!({"fileID": "a.txt"})).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = test::read_body(resp).await;
        assert_eq!(body, "a.txt already exists!");

        let resp = test::call_service(
            &app,
            post("/transactions/new", json!({"fileID": "a.txt", "author": "alice", "block name": "0"}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["fileID"], "a.txt");
        assert_eq!(body["message"], "Transaction will be added to Block 2");

        let mined: Value =
            test::call_and_read_body_json(&app, post("/mine", json!({"fileID": "a.txt"})).to_request()).await;
        assert_eq!(mined["fileID"], "a.txt");
        assert_eq!(mined["index"], 2);
        assert_eq!(mined["transactions"].as_array().unwrap().len(), 1);
        assert_eq!(mined["transactions"][0]["file hash"], "0");
        assert_eq!(mined["transactions"][0]["author"], "alice");
    }

    #[actix_web::test]
    async fn chunk_digest_is_read_from_disk() {
        let mut chunk = tempfile::NamedTempFile::new().unwrap();
        chunk.write_all(b"abc").unwrap();
        let name = chunk.path().to_str().unwrap().to_string();

        let state = files_state();
        let node = state.registry.create("doc", None).unwrap();
        let app = files_app!(state);

        let req = post("/transactions/new", json!({"fileID": "doc", "author": "bob", "block name": name}));
        assert_eq!(test::call_service(&app, req.to_request()).await.status(), StatusCode::CREATED);

        let tx = serde_json::to_value(&node.ledger().pending()[0]).unwrap();
        assert_eq!(
            tx["file hash"],
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );

        let req = post("/transactions/new", json!({"fileID": "doc", "author": "bob", "block name": "/no/such/chunk"}));
        assert_eq!(test::call_service(&app, req.to_request()).await.status(), StatusCode::BAD_REQUEST);

        let req = post("/transactions/new", json!({"fileID": "doc", "author": "eve", "block name": "/dev/zero"}));
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = test::read_body(resp).await;
        assert_eq!(body, "cannot read /dev/zero: not a regular file");
        assert_eq!(node.ledger().pending().len(), 1);
    }

    #[actix_web::test]
    async fn unknown_file_is_not_found() {
        let app = files_app!(files_state());
        let resp = test::call_service(&app, post("/mine", json!({"fileID": "ghost"})).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/nodes/list?fileID=ghost").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/nodes/list").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn aggregated_chain_view() {
        let state = files_state();
        state.registry.create("a", None).unwrap().ledger().mine_block();
        state.registry.create("b", None).unwrap();
        let app = files_app!(state);

        let req = test::TestRequest::get().uri("/chain").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["a LENGTH"], 2);
        assert_eq!(body["b LENGTH"], 1);
        assert_eq!(body["a CHAIN"].as_array().unwrap().len(), 2);
        assert_eq!(body["b CHAIN"][0]["previous_hash"], "genesis");
        assert_eq!(body["Total number of files"], 2);
        assert_eq!(body["Total number of Blocks"], 3);
    }

    #[actix_web::test]
    async fn peers_and_resolution_are_per_file() {
        let mut peer = Ledger::new(LedgerConfig::for_files().with_difficulty(2));
        peer.mine_block();
        peer.mine_block();

        let state = FilesState {
            fetcher: Arc::new(MapFetcher::default().with_chain("peer:5002", peer.chain())),
            ..files_state()
        };
        state.registry.create("a", None).unwrap();
        state.registry.create("b", None).unwrap();
        let app = files_app!(state);

        let req = post("/nodes/register", json!({"fileID": "a", "nodes": ["http://peer:5002"]}));
        let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
        assert_eq!(body["total_nodes"], json!(["peer:5002"]));

        let req = test::TestRequest::get().uri("/nodes/list?fileID=b").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total_nodes"], json!([]));

        let body: Value =
            test::call_and_read_body_json(&app, post("/nodes/resolve", json!({"fileID": "b"})).to_request()).await;
        assert_eq!(body["message"], "Chain has not been replaced; it is authoritative");

        let body: Value =
            test::call_and_read_body_json(&app, post("/nodes/resolve", json!({"fileID": "a"})).to_request()).await;
        assert_eq!(body["fileID"], "a");
        assert_eq!(body["message"], "Chain has been replaced");
        assert_eq!(body["new_chain"].as_array().unwrap().len(), 3);
    }

    #[actix_web::test]
    async fn per_file_difficulty() {
        let state = files_state();
        let app = files_app!(state);
        let req = post("/newfile", json!({"fileID": "hard", "difficulty": 0}));
        assert_eq!(test::call_service(&app, req.to_request()).await.status(), StatusCode::BAD_REQUEST);
        let req = post("/newfile", json!({"fileID": "easy", "difficulty": 1}));
        assert_eq!(test::call_service(&app, req.to_request()).await.status(), StatusCode::CREATED);
    }
}
