use actix_web::{HttpResponse, Responder, get};

/// Liveness probe, mounted in both node modes.
#[get("/health")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("Ledger node is up and running 🦀")
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test};

    #[actix_web::test]
    async fn answers_in_both_modes() {
        let single = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(crate::api::test_support::single_state()))
                .configure(crate::api::init_routes),
        )
        .await;
        let files = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(crate::api::test_support::files_state()))
                .configure(crate::api::init_file_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        assert!(test::call_service(&single, req).await.status().is_success());
        let req = test::TestRequest::get().uri("/health").to_request();
        assert!(test::call_service(&files, req).await.status().is_success());
    }
}
