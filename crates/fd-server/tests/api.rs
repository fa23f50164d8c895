//! End-to-end tests of the REST surface over an in-memory record store.

use actix_web::App;
use actix_web::body::MessageBody;
use actix_http::Request;
use actix_web::dev::Service;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::test;
use actix_web::web;
use fd_app::Application;
use fd_db::MemoryStore;
use fd_db::RecordStore;
use fd_model::Game;
use fd_model::GridOffset;
use fd_model::GridPoint;
use fd_model::LootConfig;
use fd_model::Map;
use fd_model::Office;
use fd_model::Road;
use fd_server::api;
use fd_server::files;
use serde_json::Value;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn world() -> Game {
    let mut game = Game::new(
        LootConfig {
            period: Duration::from_secs(5),
            probability: 0.0,
        },
        Duration::from_secs(60),
    );
    let mut map = Map::new("m1".into(), "Town".into(), 1.0, 3);
    map.add_road(Road::horizontal(GridPoint::new(0, 0), 10));
    map.add_loot_value(10);
    map.add_office(Office::new(
        "o0".into(),
        GridPoint::new(2, 0),
        GridOffset { dx: 5, dy: 0 },
    ))
    .expect("unique office");
    game.add_map(map).expect("fresh map id");
    game
}

async fn service(
    www_root: std::path::PathBuf,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let app = web::Data::new(Application::new(world(), store.clone(), false));
    test::init_service(
        App::new()
            .app_data(app)
            .app_data(web::Data::new(store))
            .app_data(web::Data::new(files::DocumentRoot(www_root)))
            .route("/health", web::get().to(api::health))
            .service(api::scope(true))
            .default_service(web::to(files::serve)),
    )
    .await
}

async fn join<S, B>(app: &S, name: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/game/join")
        .set_json(json!({ "userName": name, "mapId": "m1" }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    test::read_body_json(resp).await
}

#[actix_web::test]
async fn join_then_state_reports_the_spawn() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = service(dir.path().to_path_buf()).await;
    let joined = join(&app, "Alice").await;
    let token = joined["authToken"].as_str().expect("token");
    assert_eq!(token.len(), 32);
    assert_eq!(joined["playerId"], 1);
    let req = test::TestRequest::get()
        .uri("/api/v1/game/state")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let state: Value = test::read_body_json(resp).await;
    assert_eq!(state["players"]["1"]["pos"], json!([0.0, 0.0]));
    assert_eq!(state["players"]["1"]["speed"], json!([0.0, 0.0]));
    assert_eq!(state["players"]["1"]["dir"], "U");
    assert_eq!(state["players"]["1"]["bag"], json!([]));
    assert_eq!(state["players"]["1"]["score"], 0);
}

#[actix_web::test]
async fn action_and_external_tick_move_the_dog() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = service(dir.path().to_path_buf()).await;
    let joined = join(&app, "Alice").await;
    let token = joined["authToken"].as_str().expect("token");
    let req = test::TestRequest::post()
        .uri("/api/v1/game/player/action")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .set_json(json!({ "move": "R" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    let req = test::TestRequest::post()
        .uri("/api/v1/game/tick")
        .set_json(json!({ "timeDelta": 1000 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    let req = test::TestRequest::get()
        .uri("/api/v1/game/state")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let state: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(state["players"]["1"]["pos"], json!([1.0, 0.0]));
    assert_eq!(state["players"]["1"]["speed"], json!([1.0, 0.0]));
    assert_eq!(state["players"]["1"]["dir"], "R");
}

#[actix_web::test]
async fn maps_listing_and_lookup() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = service(dir.path().to_path_buf()).await;
    let req = test::TestRequest::get().uri("/api/v1/maps").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
        Some(b"no-cache".as_slice())
    );
    let listed: Value = test::read_body_json(resp).await;
    assert_eq!(listed, json!([{ "id": "m1", "name": "Town" }]));
    let req = test::TestRequest::get().uri("/api/v1/maps/m1").to_request();
    let full: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(full["roads"], json!([{ "x0": 0, "y0": 0, "x1": 10 }]));
    assert_eq!(
        full["offices"],
        json!([{ "id": "o0", "x": 2, "y": 0, "offsetX": 5, "offsetY": 0 }])
    );
    let req = test::TestRequest::get().uri("/api/v1/maps/nowhere").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "mapNotFound");
}

#[actix_web::test]
async fn auth_failures_are_distinguished() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = service(dir.path().to_path_buf()).await;
    let req = test::TestRequest::get().uri("/api/v1/game/state").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "invalidToken");
    let req = test::TestRequest::get()
        .uri("/api/v1/game/state")
        .insert_header((
            header::AUTHORIZATION,
            "Bearer 0123456789abcdef0123456789abcdef",
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "unknownToken");
}

#[actix_web::test]
async fn protocol_violations() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = service(dir.path().to_path_buf()).await;
    // wrong verb
    let req = test::TestRequest::get().uri("/api/v1/game/join").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        resp.headers().get(header::ALLOW).map(|v| v.as_bytes()),
        Some(b"POST".as_slice())
    );
    // unroutable api path
    let req = test::TestRequest::get().uri("/api/v1/nothing/here").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "badRequest");
    // wrong content type
    let req = test::TestRequest::post()
        .uri("/api/v1/game/tick")
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload(r#"{"timeDelta":1000}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "invalidArgument");
    // non-positive delta
    let req = test::TestRequest::post()
        .uri("/api/v1/game/tick")
        .set_json(json!({ "timeDelta": 0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    // oversized records page
    let req = test::TestRequest::get()
        .uri("/api/v1/game/records?start=0&maxItems=101")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "invalidArgument");
}

#[actix_web::test]
async fn records_start_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = service(dir.path().to_path_buf()).await;
    let req = test::TestRequest::get().uri("/api/v1/game/records").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn static_files_come_from_the_www_root() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("index.html"), b"<html>hi</html>").expect("write index");
    std::fs::write(dir.path().join("app.js"), b"console.log(1)").expect("write js");
    let app = service(dir.path().to_path_buf()).await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
        Some(b"text/html".as_slice())
    );
    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/app.js").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/missing.png").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn health_answers_ok() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = service(dir.path().to_path_buf()).await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
