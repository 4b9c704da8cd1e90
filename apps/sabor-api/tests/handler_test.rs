//! Handler tests for the HTTP API
//!
//! These drive the full router with `oneshot`:
//! - session cookie issue and use
//! - loose JSON normalisation (numbers as strings, `,` decimals)
//! - status codes and `{code, message}` error bodies

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt; // For oneshot()

use sabor_api::{router, AppState, CookieSettings};
use sabor_db::{Database, DbConfig};

const LOGIN: &str = "operador.master";
const PASSWORD: &str = "123456";

async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let state = AppState::new(
        db,
        "handler-test-secret",
        CookieSettings {
            secure: false,
            max_age_secs: 3600,
        },
    )
    .unwrap();

    state
        .auth
        .register_operator("Operador Master", LOGIN, PASSWORD)
        .await
        .unwrap();

    router(state)
}

fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Logs in and returns the `sabor_session=...` pair for the Cookie header.
async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "login": LOGIN, "senha": PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));

    set_cookie.split(';').next().unwrap().to_string()
}

async fn register_burger(app: &Router, cookie: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/produto",
            Some(cookie),
            json!({
                "nome": "Kernel Burger",
                "codigoBarras": "1111111111111",
                "precoUnitario": "22,00",
                "qtdEstoque": "35"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    json_body(response).await["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_login_sale_and_report_flow() {
    let app = app().await;
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(get("/api/auth/session", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["operador"]["login"], LOGIN);

    let product_id = register_burger(&app, &cookie).await;

    let response = app
        .clone()
        .oneshot(get("/api/produto/1111111111111", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let product = json_body(response).await;
    assert_eq!(product["precoUnitario"], "22.00");
    assert_eq!(product["qtdEstoque"], 35);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/venda",
            Some(&cookie),
            json!({ "itens": [{ "idProduto": product_id, "quantidade": 3 }] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let sale = json_body(response).await;
    assert_eq!(sale["total"], "66.00");
    assert_eq!(sale["paymentTag"], "Dinheiro");
    assert_eq!(sale["operator"]["name"], "Operador Master");
    assert_eq!(sale["items"][0]["unitPriceAtSale"], "22.00");

    let response = app
        .clone()
        .oneshot(get("/api/produto", Some(&cookie)))
        .await
        .unwrap();
    let products = json_body(response).await;
    assert_eq!(products[0]["qtdEstoque"], 32);

    let response = app
        .clone()
        .oneshot(get("/api/venda?page=1&limit=10", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let report = json_body(response).await;
    assert_eq!(report["sales"].as_array().unwrap().len(), 1);
    assert_eq!(report["summary"]["totalSales"], 1);
    assert_eq!(report["summary"]["totalRevenue"], "66.00");
    assert_eq!(report["summary"]["byPayment"][0]["paymentTag"], "Dinheiro");
    assert_eq!(report["pageInfo"]["pageSize"], 10);
    assert_eq!(report["pageInfo"]["totalPages"], 1);
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let app = app().await;

    for uri in ["/api/produto", "/api/venda", "/api/auth/session"] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(json_body(response).await["code"], "UNAUTHORIZED");
    }

    let response = app
        .clone()
        .oneshot(get("/api/produto", Some("sabor_session=forged")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_token_is_accepted() {
    let app = app().await;
    let cookie = login(&app).await;
    let token = cookie.trim_start_matches("sabor_session=");

    let request = Request::builder()
        .uri("/api/produto")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_failures() {
    let app = app().await;

    let wrong = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "login": LOGIN, "senha": "000000" }),
        ))
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert!(wrong.headers().get(header::SET_COOKIE).is_none());

    let unknown = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "login": "ninguem", "senha": PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let blank = app
        .clone()
        .oneshot(json_request("POST", "/api/auth/login", None, json!({})))
        .await
        .unwrap();
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_input_is_400() {
    let app = app().await;
    let cookie = login(&app).await;

    let malformed = Request::builder()
        .method("POST")
        .uri("/api/venda")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, &cookie)
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(malformed).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "INVALID_INPUT");

    let empty_cart = app
        .clone()
        .oneshot(json_request("POST", "/api/venda", Some(&cookie), json!({ "itens": [] })))
        .await
        .unwrap();
    assert_eq!(empty_cart.status(), StatusCode::BAD_REQUEST);

    let fractional = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/venda",
            Some(&cookie),
            json!({ "itens": [{ "idProduto": 1, "quantidade": 1.5 }] }),
        ))
        .await
        .unwrap();
    assert_eq!(fractional.status(), StatusCode::BAD_REQUEST);

    let bad_price = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/produto",
            Some(&cookie),
            json!({ "nome": "X", "codigoBarras": "123", "precoUnitario": "abc", "qtdEstoque": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(bad_price.status(), StatusCode::BAD_REQUEST);

    let bad_page = app
        .clone()
        .oneshot(get("/api/venda?page=um", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(bad_page.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_conflicts_are_409() {
    let app = app().await;
    let cookie = login(&app).await;
    let product_id = register_burger(&app, &cookie).await;

    let duplicate = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/produto",
            Some(&cookie),
            json!({
                "nome": "Outro",
                "codigoBarras": "1111111111111",
                "precoUnitario": 10,
                "qtdEstoque": 1
            }),
        ))
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(duplicate).await["code"], "DUPLICATE_KEY");

    let too_many = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/venda",
            Some(&cookie),
            json!({ "itens": [{ "idProduto": product_id, "quantidade": 36 }] }),
        ))
        .await
        .unwrap();
    assert_eq!(too_many.status(), StatusCode::CONFLICT);
    let body = json_body(too_many).await;
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");
    assert!(body["message"].as_str().unwrap().contains("Kernel Burger"));
}

#[tokio::test]
async fn test_stock_adjustment_and_out_of_stock_lookup() {
    let app = app().await;
    let cookie = login(&app).await;
    let product_id = register_burger(&app, &cookie).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/produto",
            Some(&cookie),
            json!({ "id": product_id.to_string(), "qtdEstoque": 0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["qtdEstoque"], 0);

    let lookup = app
        .clone()
        .oneshot(get("/api/produto/1111111111111", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(lookup.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(lookup).await["code"], "INSUFFICIENT_STOCK");

    let unknown = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/produto",
            Some(&cookie),
            json!({ "id": 999, "qtdEstoque": 5 }),
        ))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let negative = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/produto",
            Some(&cookie),
            json!({ "id": product_id, "qtdEstoque": -1 }),
        ))
        .await
        .unwrap();
    assert_eq!(negative.status(), StatusCode::BAD_REQUEST);

    let huge = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/produto",
            Some(&cookie),
            json!({ "id": product_id, "qtdEstoque": 1e20 }),
        ))
        .await
        .unwrap();
    assert_eq!(huge.status(), StatusCode::BAD_REQUEST);
    let body = json_body(huge).await;
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(body["message"].as_str().unwrap().contains("qtdEstoque"));

    let response = app
        .clone()
        .oneshot(get("/api/produto", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(json_body(response).await[0]["qtdEstoque"], 0);
}

#[tokio::test]
async fn test_logout_expires_cookie() {
    let app = app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("sabor_session="));
    assert!(set_cookie.contains("Max-Age=0"));
    assert_eq!(json_body(response).await["success"], true);
}

#[tokio::test]
async fn test_health() {
    let app = app().await;

    let response = app.oneshot(get("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}
