use super::dto;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::Scope;
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::web;
use fd_app::AppError;
use fd_app::Application;
use fd_app::Token;
use fd_db::RecordStore;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

type App = web::Data<Application>;

/// REST-boundary error: status code plus the `{code, message}` body every
/// API consumer expects. Internal faults degrade to text/plain.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "badRequest",
            message: message.to_string(),
        }
    }
    pub fn invalid_argument(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "invalidArgument",
            message: message.to_string(),
        }
    }
    pub fn invalid_token() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "invalidToken",
            message: "Authorization header is missing or malformed".to_string(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        let status = match &error {
            AppError::InvalidName | AppError::PageLimit => StatusCode::BAD_REQUEST,
            AppError::MapNotFound => StatusCode::NOT_FOUND,
            AppError::UnknownToken => StatusCode::UNAUTHORIZED,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            code: error.code(),
            message: error.to_string(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl actix_web::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }
    fn error_response(&self) -> HttpResponse {
        if self.status == StatusCode::INTERNAL_SERVER_ERROR {
            return HttpResponse::build(self.status)
                .insert_header((header::CACHE_CONTROL, "no-cache"))
                .content_type("text/plain")
                .body(self.message.clone());
        }
        HttpResponse::build(self.status)
            .insert_header((header::CACHE_CONTROL, "no-cache"))
            .json(serde_json::json!({ "code": self.code, "message": self.message }))
    }
}

/// Wraps a payload the way every API response goes out.
fn ok_json(value: serde_json::Value) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .json(value)
}

/// Pulls the bearer token out of the `Authorization` header.
fn bearer(req: &HttpRequest) -> Result<Token, ApiError> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(Token::parse_bearer)
        .ok_or_else(ApiError::invalid_token)
}

/// Parses a POST body. The content type must be JSON; a syntactically broken
/// body is a bad request, a well-formed body of the wrong shape an invalid
/// argument.
fn parse_body<T: DeserializeOwned>(req: &HttpRequest, body: &[u8]) -> Result<T, ApiError> {
    let json_content = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/json"))
        .unwrap_or(false);
    if !json_content {
        return Err(ApiError::invalid_argument("Content-Type must be application/json"));
    }
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| ApiError::bad_request("Request parse error"))?;
    serde_json::from_value(value).map_err(|_| ApiError::invalid_argument("Invalid request payload"))
}

async fn maps_list(app: App) -> HttpResponse {
    ok_json(dto::map_list_json(&app.maps().await))
}

async fn map_info(app: App, path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let map = app.map(&path.into_inner().as_str().into()).await?;
    Ok(ok_json(dto::map_json(&map)))
}

async fn join(app: App, req: HttpRequest, body: web::Bytes) -> Result<HttpResponse, ApiError> {
    let request: dto::JoinRequest = parse_body(&req, &body)?;
    let outcome = app
        .join(&request.user_name, &request.map_id.as_str().into())
        .await?;
    Ok(ok_json(dto::join_json(&outcome)))
}

async fn players(app: App, req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let token = bearer(&req)?;
    Ok(ok_json(dto::players_json(&app.players(&token).await?)))
}

async fn state(app: App, req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let token = bearer(&req)?;
    Ok(ok_json(dto::state_json(&app.state(&token).await?)))
}

async fn action(app: App, req: HttpRequest, body: web::Bytes) -> Result<HttpResponse, ApiError> {
    let token = bearer(&req)?;
    let request: dto::ActionRequest = parse_body(&req, &body)?;
    app.change_dir(&token, request.direction).await?;
    Ok(ok_json(serde_json::json!({})))
}

async fn tick(app: App, req: HttpRequest, body: web::Bytes) -> Result<HttpResponse, ApiError> {
    let request: dto::TickRequest = parse_body(&req, &body)?;
    if request.time_delta <= 0 {
        return Err(ApiError::invalid_argument("timeDelta must be positive"));
    }
    app.tick(Duration::from_millis(request.time_delta as u64)).await;
    Ok(ok_json(serde_json::json!({})))
}

async fn records(app: App, req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let query = web::Query::<dto::RecordsQuery>::from_query(req.query_string())
        .map_err(|_| ApiError::invalid_argument("Invalid records query"))?;
    let page = app.records(query.start, query.max_items).await?;
    Ok(ok_json(dto::records_json(&page)))
}

/// Liveness probe: process up, store reachable.
pub async fn health(store: web::Data<Arc<dyn RecordStore>>) -> HttpResponse {
    match store
        .ping()
        .await
        .inspect_err(|e| log::error!("health check failed: {}", e))
    {
        Ok(()) => HttpResponse::Ok().body("ok"),
        Err(_) => HttpResponse::ServiceUnavailable().body("store unavailable"),
    }
}

async fn get_only() -> HttpResponse {
    method_not_allowed("GET, HEAD")
}

async fn post_only() -> HttpResponse {
    method_not_allowed("POST")
}

fn method_not_allowed(allow: &str) -> HttpResponse {
    HttpResponse::MethodNotAllowed()
        .insert_header((header::ALLOW, allow))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .json(serde_json::json!({ "code": "invalidMethod", "message": "Invalid method" }))
}

async fn unroutable() -> HttpResponse {
    HttpResponse::BadRequest()
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .json(serde_json::json!({ "code": "badRequest", "message": "Bad request" }))
}

/// Routing table of the API surface. The tick endpoint exists only when the
/// scheduler runs in external mode.
#[rustfmt::skip]
pub fn scope(external_ticks: bool) -> Scope {
    let games = web::scope("/api")
        .service(web::resource("/v1/maps")
            .route(web::get().to(maps_list))
            .route(web::head().to(maps_list))
            .default_service(web::to(get_only)))
        .service(web::resource("/v1/maps/{id}")
            .route(web::get().to(map_info))
            .route(web::head().to(map_info))
            .default_service(web::to(get_only)))
        .service(web::resource("/v1/game/join")
            .route(web::post().to(join))
            .default_service(web::to(post_only)))
        .service(web::resource("/v1/game/players")
            .route(web::get().to(players))
            .route(web::head().to(players))
            .default_service(web::to(get_only)))
        .service(web::resource("/v1/game/state")
            .route(web::get().to(state))
            .route(web::head().to(state))
            .default_service(web::to(get_only)))
        .service(web::resource("/v1/game/player/action")
            .route(web::post().to(action))
            .default_service(web::to(post_only)))
        .service(web::resource("/v1/game/records")
            .route(web::get().to(records))
            .route(web::head().to(records))
            .default_service(web::to(get_only)));
    let games = match external_ticks {
        true => games.service(web::resource("/v1/game/tick")
            .route(web::post().to(tick))
            .default_service(web::to(post_only))),
        false => games,
    };
    games.default_service(web::to(unroutable))
}
