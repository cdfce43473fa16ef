use std::io::Write;

use actix_web::http::header;
use actix_web::{test, web, App};

use devmarket_auth::Role;
use devmarket_server::config::ServerConfig;
use devmarket_server::db::{Database, UpsertGateway};
use devmarket_server::middleware::AccessGate;
use devmarket_server::routes;
use devmarket_server::state::AppState;

fn test_config(ads_txt_path: &str) -> ServerConfig {
    ServerConfig {
        port: 0,
        db_path: ":memory:".to_string(),
        auth_secret: b"integration-test-secret-0123456789".to_vec(),
        allowed_origins: vec![],
        rate_limit_rpm: 1000,
        ads_txt_path: ads_txt_path.to_string(),
        public_dir: None,
        metrics_token: None,
        admin_email: "admin@devtools.com".to_string(),
        admin_password: "admin123".to_string(),
    }
}

fn make_state(ads_txt_path: &str) -> web::Data<AppState> {
    let db = Database::new(":memory:").unwrap();
    web::Data::new(AppState::new(test_config(ads_txt_path), db))
}

fn admin_token(state: &AppState) -> String {
    state
        .session_keys
        .issue("admin-1", "admin@devtools.com", Role::SuperAdmin, 3600)
        .unwrap()
}

macro_rules! service {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .wrap(AccessGate::new($state.session_keys.clone()))
                .configure(routes::health::configure)
                .configure(routes::gateways::configure)
                .configure(routes::pages::configure)
                .configure(routes::donations::configure)
                .configure(routes::contact::configure)
                .configure(routes::ads::configure)
                .configure(routes::admin::configure),
        )
        .await
    };
}

#[actix_rt::test]
async fn health_reports_ok() {
    let state = make_state("./ads.txt");
    let app = service!(state);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["service"], "devmarket");
}

#[actix_rt::test]
async fn gateway_listing_is_filtered_ordered_and_secretless() {
    let state = make_state("./ads.txt");

    state
        .db
        .upsert_gateway(&UpsertGateway {
            gateway: "PAYPAL".to_string(),
            display_name: "PayPal".to_string(),
            description: None,
            is_enabled: true,
            display_order: 2,
            public_key: Some("paypal-client-id".to_string()),
            secret_key: Some("paypal-client-secret".to_string()),
            supported_currencies: vec!["USD".to_string(), "EUR".to_string()],
        })
        .unwrap();
    state
        .db
        .upsert_gateway(&UpsertGateway {
            gateway: "STRIPE".to_string(),
            display_name: "Stripe".to_string(),
            description: Some("Cards".to_string()),
            is_enabled: true,
            display_order: 1,
            public_key: Some("pk_live_x".to_string()),
            secret_key: Some("sk_live_x".to_string()),
            supported_currencies: vec!["USD".to_string()],
        })
        .unwrap();
    state
        .db
        .upsert_gateway(&UpsertGateway {
            gateway: "RAZORPAY".to_string(),
            display_name: "Razorpay".to_string(),
            description: None,
            is_enabled: false,
            display_order: 0,
            public_key: None,
            secret_key: Some("rzp-secret".to_string()),
            supported_currencies: vec![],
        })
        .unwrap();

    let app = service!(state);
    let req = test::TestRequest::get()
        .uri("/api/payment-gateways")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let gateways = body["gateways"].as_array().unwrap();

    assert_eq!(gateways.len(), 2);
    assert_eq!(gateways[0]["gateway"], "STRIPE");
    assert_eq!(gateways[1]["gateway"], "PAYPAL");

    // secretKey must be structurally absent, not just null
    for gateway in gateways {
        let obj = gateway.as_object().unwrap();
        assert!(!obj.contains_key("secretKey"));
        assert!(!obj.contains_key("secret_key"));
    }
}

#[actix_rt::test]
async fn page_listing_counts_views_per_call() {
    let state = make_state("./ads.txt");
    state
        .db
        .create_page("donate", "Donate", None, 5.0, "USD", true, true)
        .unwrap();
    state
        .db
        .create_page("hidden", "Hidden", None, 5.0, "USD", false, true)
        .unwrap();

    let app = service!(state);

    for _ in 0..3 {
        let req = test::TestRequest::get()
            .uri("/api/payment-pages")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let pages = body["pages"].as_array().unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0]["slug"], "donate");
    }

    // Three listing calls -> exactly three counted views
    let pages = state.db.list_pages(true).unwrap();
    let donate = pages.iter().find(|p| p.slug == "donate").unwrap();
    assert_eq!(donate.view_count, 3);

    // The filtered-out page was never counted
    let hidden = pages.iter().find(|p| p.slug == "hidden").unwrap();
    assert_eq!(hidden.view_count, 0);
}

#[actix_rt::test]
async fn include_inactive_lifts_filters() {
    let state = make_state("./ads.txt");
    state
        .db
        .create_page("open", "Open", None, 5.0, "USD", true, true)
        .unwrap();
    state
        .db
        .create_page("off", "Off", None, 5.0, "USD", false, false)
        .unwrap();

    let app = service!(state);
    let req = test::TestRequest::get()
        .uri("/api/payment-pages?includeInactive=true")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["pages"].as_array().unwrap().len(), 2);
}

#[actix_rt::test]
async fn single_page_fetch_counts_one_view() {
    let state = make_state("./ads.txt");
    state
        .db
        .create_page("donate", "Donate", None, 5.0, "USD", true, true)
        .unwrap();

    let app = service!(state);
    let req = test::TestRequest::get()
        .uri("/api/payment-page/donate")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let page = state.db.get_page("donate").unwrap().unwrap();
    assert_eq!(page.view_count, 1);

    let req = test::TestRequest::get()
        .uri("/api/payment-page/nope")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
async fn donation_settings_default_when_unset() {
    let state = make_state("./ads.txt");
    let app = service!(state);

    let req = test::TestRequest::get()
        .uri("/api/donation-settings")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["settings"]["minimumAmount"], 1.0);
    assert_eq!(body["settings"]["enableDonations"], true);
    assert_eq!(body["settings"]["thankYouMessage"], "Thank you for your donation!");
}

#[actix_rt::test]
async fn contact_validation_rejects_and_persists_nothing() {
    let state = make_state("./ads.txt");
    let app = service!(state);

    // Missing email
    let req = test::TestRequest::post()
        .uri("/api/contact")
        .set_json(serde_json::json!({
            "name": "Alice",
            "subject": "Hi",
            "category": "GENERAL",
            "message": "Hello"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // Malformed email
    let req = test::TestRequest::post()
        .uri("/api/contact")
        .set_json(serde_json::json!({
            "name": "Alice",
            "email": "not-an-email",
            "subject": "Hi",
            "category": "GENERAL",
            "message": "Hello"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    assert_eq!(state.db.count_contacts().unwrap(), 0);
}

#[actix_rt::test]
async fn contact_valid_submission_returns_201_with_id() {
    let state = make_state("./ads.txt");
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/api/contact")
        .set_json(serde_json::json!({
            "name": "Alice",
            "email": "alice@example.com",
            "subject": "Hi",
            "category": "GENERAL",
            "message": "Hello"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert!(!body["id"].as_str().unwrap().is_empty());

    assert_eq!(state.db.count_contacts().unwrap(), 1);
}

#[actix_rt::test]
async fn verification_tags_resolve_behind_the_gate() {
    let state = make_state("./ads.txt");
    state
        .db
        .upsert_vendor(
            "AdSense",
            "GOOGLE_ADSENSE",
            true,
            &serde_json::json!({"verification_code": "abc"}),
        )
        .unwrap();
    state
        .db
        .upsert_vendor("Empty", "MEDIANET", true, &serde_json::json!({}))
        .unwrap();

    let token = admin_token(&state);
    let app = service!(state);

    // Ungated request is rejected by the middleware
    let req = test::TestRequest::get()
        .uri("/api/admin/ads/verification-tags")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    // Admin token resolves the tags; the empty vendor is dropped
    let req = test::TestRequest::get()
        .uri("/api/admin/ads/verification-tags")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let tags = body["tags"].as_array().unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0]["name"], "google-site-verification");
    assert_eq!(tags[0]["content"], "abc");
}

#[actix_rt::test]
async fn admin_gateway_listing_masks_secrets() {
    let state = make_state("./ads.txt");
    state
        .db
        .upsert_gateway(&UpsertGateway {
            gateway: "STRIPE".to_string(),
            display_name: "Stripe".to_string(),
            description: None,
            is_enabled: true,
            display_order: 1,
            public_key: Some("pk_live_x".to_string()),
            secret_key: Some("sk_live_x".to_string()),
            supported_currencies: vec!["USD".to_string()],
        })
        .unwrap();

    let token = admin_token(&state);
    let app = service!(state);

    let req = test::TestRequest::get()
        .uri("/api/admin/payment-gateways")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let gateway = &body["gateways"][0];
    assert_eq!(gateway["secretKey"], "••••••••");
    assert_eq!(gateway["publicKey"], "pk_live_x");
}

#[actix_rt::test]
async fn admin_gateway_upsert_requires_fields() {
    let state = make_state("./ads.txt");
    let token = admin_token(&state);
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/api/admin/payment-gateways")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(serde_json::json!({"gateway": "", "displayName": ""}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::post()
        .uri("/api/admin/payment-gateways")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(serde_json::json!({
            "gateway": "STRIPE",
            "displayName": "Stripe",
            "isEnabled": true,
            "displayOrder": 1
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    assert_eq!(state.db.list_gateways().unwrap().len(), 1);
}

#[actix_rt::test]
async fn ads_txt_served_with_cache_header() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "google.com, pub-123, DIRECT, f08c47fec0942fa0").unwrap();

    let state = make_state(file.path().to_str().unwrap());
    let app = service!(state);

    let req = test::TestRequest::get().uri("/ads.txt").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("cache-control").unwrap(),
        "public, max-age=3600"
    );

    let body = test::read_body(resp).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("pub-123"));
}

#[actix_rt::test]
async fn ads_txt_missing_is_404() {
    let state = make_state("./definitely-not-here/ads.txt");
    let app = service!(state);

    let req = test::TestRequest::get().uri("/ads.txt").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}
