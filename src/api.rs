// Rural Ledger - REST API with Axum
// Every response body is JSON, errors included.

use crate::category::DataCategory;
use crate::config::ServerConfig;
use crate::error::{HardwareError, LedgerError};
use crate::hardware::{read_reading, HardwareReading, SensorLink};
use crate::ledger::{Ledger, Transaction};
use crate::money::Money;
use crate::registry::ClientRegistry;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Header carrying the client credential.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Transactions listed by `/revenue`.
pub const RECENT_LIMIT: usize = 10;

/// Source label for transactions produced by the sensor link.
pub const HARDWARE_SOURCE: &str = "hardware_sensor";

pub const SERVICE_NAME: &str = "Rural Data Revenue API";

// ============================================================================
// STATE
// ============================================================================

/// Shared application state, built once at startup and cloned into handlers.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
    pub registry: Arc<ClientRegistry>,
    pub hardware: Arc<dyn SensorLink>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(
        ledger: Ledger,
        registry: ClientRegistry,
        hardware: impl SensorLink + 'static,
        config: ServerConfig,
    ) -> Self {
        AppState {
            ledger: Arc::new(ledger),
            registry: Arc::new(registry),
            hardware: Arc::new(hardware),
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API key")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Hardware(#[from] HardwareError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Hardware(_) | ApiError::Ledger(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "request rejected");
        }

        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

// ============================================================================
// RESPONSES
// ============================================================================

#[derive(Serialize)]
struct StatusResponse {
    service: &'static str,
    port: u16,
    status: &'static str,
    monthly_revenue_target: String,
    current_month_revenue: String,
    revenue_percentage: String,
    transactions_today: u64,
    clients: Vec<String>,
    documentation: &'static str,
    health_check: &'static str,
    revenue_endpoint: &'static str,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
    hardware_connected: bool,
    api_uptime: &'static str,
}

#[derive(Serialize)]
struct RevenueResponse {
    monthly_target: Money,
    current_revenue: Money,
    remaining_target: Money,
    daily_average_needed: Money,
    transactions_today: u64,
    total_transactions: u64,
    recent_transactions: Vec<Transaction>,
}

#[derive(Serialize)]
struct IngestResponse {
    status: &'static str,
    message: &'static str,
    government_reference: String,
    revenue_generated: Money,
    transaction_id: u64,
    client: String,
    data: Map<String, Value>,
}

#[derive(Serialize)]
struct HardwareReadResponse {
    status: &'static str,
    data: HardwareReading,
    revenue: Money,
    timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
struct CommandResponse {
    status: &'static str,
    message: String,
    timestamp: DateTime<Utc>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET / - Service status
async fn service_status(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.ledger.snapshot(0);

    Json(StatusResponse {
        service: SERVICE_NAME,
        port: state.config.port,
        status: "active",
        monthly_revenue_target: snapshot.target.display_usd(),
        current_month_revenue: snapshot.total.display_usd(),
        revenue_percentage: format!("{:.1}%", snapshot.total.percent_of(snapshot.target)),
        transactions_today: snapshot.transactions_today,
        clients: state.registry.names().into_iter().map(String::from).collect(),
        documentation: "/docs",
        health_check: "/health",
        revenue_endpoint: "/revenue",
    })
}

/// GET /health - Health check
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        hardware_connected: state.hardware.is_connected(),
        api_uptime: "24/7",
    })
}

/// GET /revenue - Ledger aggregates and the latest transactions
async fn revenue(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.ledger.snapshot(RECENT_LIMIT);

    Json(RevenueResponse {
        monthly_target: snapshot.target,
        current_revenue: snapshot.total,
        remaining_target: snapshot.remaining,
        daily_average_needed: snapshot.daily_average_needed,
        transactions_today: snapshot.transactions_today,
        total_transactions: snapshot.total_transactions,
        recent_transactions: snapshot.recent,
    })
}

/// POST /api/v1/process_rural_data - Price and record one submission
async fn process_rural_data(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<IngestResponse>, ApiError> {
    // Credential first: nothing about the body is looked at for unknown callers
    let client = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|key| state.registry.authorize(key))
        .ok_or(ApiError::Unauthorized)?;

    let Json(body) = body?;
    let Value::Object(mut payload) = body else {
        return Err(ApiError::BadRequest(
            "Request body must be a JSON object".to_string(),
        ));
    };

    let label = payload.get("type").and_then(Value::as_str).unwrap_or("unknown");
    let source = payload
        .get("source")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    let category = DataCategory::from_label(label);
    let price = category.price();
    let transaction = state.ledger.record(price, source, category)?;

    let reference = format!(
        "GOV-{}-{}",
        transaction.timestamp.timestamp(),
        transaction.sequence
    );

    payload.insert("government_id".to_string(), json!(reference));
    payload.insert(
        "submission_date".to_string(),
        json!(transaction.timestamp.to_rfc3339()),
    );
    payload.insert("revenue_generated".to_string(), json!(price.as_dollars()));
    payload.insert("processing_status".to_string(), json!("completed"));

    Ok(Json(IngestResponse {
        status: "success",
        message: "Data processed for government submission",
        government_reference: reference,
        revenue_generated: price,
        transaction_id: transaction.sequence,
        client: client.name.clone(),
        data: payload,
    }))
}

/// GET /api/v1/hardware/read - One reading from the sensor link
async fn read_hardware(State(state): State<AppState>) -> Result<Json<HardwareReadResponse>, ApiError> {
    let link = Arc::clone(&state.hardware);
    let reading = tokio::task::spawn_blocking(move || read_reading(link.as_ref()))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    let revenue = reading.revenue_generated;
    if revenue > Money::ZERO {
        state
            .ledger
            .record(revenue, HARDWARE_SOURCE, reading.reading.category())?;
    }

    Ok(Json(HardwareReadResponse {
        status: "success",
        data: reading,
        revenue,
        timestamp: Utc::now(),
    }))
}

/// POST /api/v1/hardware/command - Forward a command to the robot
async fn hardware_command(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CommandResponse>, ApiError> {
    let Json(body) = body?;
    let command = match body.get("command") {
        None | Some(Value::Null) => None,
        Some(Value::String(command)) => Some(command.as_str()),
        Some(_) => {
            return Err(ApiError::BadRequest("command must be a string".to_string()));
        }
    }
    .filter(|c| !c.trim().is_empty())
    .ok_or_else(|| ApiError::BadRequest("No command provided".to_string()))?
    .to_string();

    let link = Arc::clone(&state.hardware);
    let to_send = command.clone();
    tokio::task::spawn_blocking(move || link.send_command(&to_send))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(CommandResponse {
        status: "success",
        message: format!("Command sent: {}", command),
        timestamp: Utc::now(),
    }))
}

/// GET /docs - Static API documentation
async fn documentation(State(state): State<AppState>) -> impl IntoResponse {
    let clients: Vec<Value> = state
        .registry
        .clients()
        .iter()
        .map(|c| {
            json!({
                "name": c.name,
                "contract": format!("{}/month", c.monthly_contract),
                "services": c.services,
            })
        })
        .collect();

    let prices: Map<String, Value> = DataCategory::PRICED
        .iter()
        .map(|c| (c.as_str().to_string(), json!(c.price().as_dollars())))
        .collect();

    Json(json!({
        "api_name": SERVICE_NAME,
        "version": crate::VERSION,
        "revenue_model": format!("{}/month", state.ledger.config().monthly_target),
        "endpoints": {
            "/": "API Status",
            "/health": "Health Check",
            "/revenue": "Revenue Tracking",
            "/api/v1/process_rural_data": "Process Rural Data (POST)",
            "/api/v1/hardware/read": "Read Hardware Data (GET)",
            "/api/v1/hardware/command": "Send Hardware Command (POST)"
        },
        "authentication": "X-API-Key header required",
        "pricing": prices,
        "fallback_price": crate::category::FALLBACK_PRICE.as_dollars(),
        "clients": clients,
        "hardware_support": "Serial interface for rural robots"
    }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/process_rural_data", post(process_rural_data))
        .route("/hardware/read", get(read_hardware))
        .route("/hardware/command", post(hardware_command));

    Router::new()
        .route("/", get(service_status))
        .route("/health", get(health_check))
        .route("/revenue", get(revenue))
        .route("/docs", get(documentation))
        .nest("/api/v1", api_routes)
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
