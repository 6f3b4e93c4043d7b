//! HTTP transport implementation.
//!
//! Plain JSON-RPC 2.0 over `POST`, one request per call and no MCP session,
//! so curl or a browser can query the analytics tools directly.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rmcp::{ErrorData as McpError, ServerHandler, model::ErrorCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info, instrument, warn};

use super::{TransportError, config::HttpConfig};
use crate::core::{Error, McpServer};

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code: code.0,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Error response carrying a protocol error from the server.
    pub fn from_mcp_error(id: Option<Value>, err: McpError) -> Self {
        let mut response = Self::error(id, err.code, err.message);
        if let Some(error) = response.error.as_mut() {
            error.data = err.data;
        }
        response
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<Value>, method: &str) -> Self {
        Self::error(
            id,
            ErrorCode::METHOD_NOT_FOUND,
            format!("Method not found: {method}"),
        )
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<Value>) -> Self {
        Self::error(id, ErrorCode::INVALID_REQUEST, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, ErrorCode::INVALID_PARAMS, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, ErrorCode::INTERNAL_ERROR, msg)
    }
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The MCP server instance.
    server: McpServer,
}

impl AppState {
    pub fn new(server: McpServer) -> Self {
        Self { server }
    }
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Build the axum router for the given server.
    ///
    /// Fails when the configured CORS origin is not a valid header value.
    pub fn router(&self, server: McpServer) -> crate::core::Result<Router> {
        let mut app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/health", get(health_check))
            .route("/", get(root_handler))
            .with_state(AppState::new(server))
            .layer(TraceLayer::new_for_http());

        if let Some(origin) = &self.config.allowed_origin {
            app = app.layer(cors_layer(origin)?);
        }

        Ok(app)
    }

    /// Serve until the listener fails.
    pub async fn run(self, server: McpServer) -> crate::core::Result<()> {
        let addr = self.config.address();
        let app = self.router(server)?;

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - JSON-RPC on POST http://{}{}", addr, self.config.rpc_path);
        match &self.config.allowed_origin {
            Some(origin) => info!("CORS allowed origin: {}", origin),
            None => debug!("CORS disabled"),
        }

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::serve("http", e))?;

        Ok(())
    }
}

/// CORS for browser clients: `*` allows any origin, anything else must be
/// one exact origin.
fn cors_layer(origin: &str) -> crate::core::Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    if origin == "*" {
        return Ok(layer.allow_origin(Any));
    }

    let origin = HeaderValue::from_str(origin).map_err(|_| {
        Error::config(format!("MCP_HTTP_CORS_ORIGIN '{origin}' is not a valid origin"))
    })?;
    Ok(layer.allow_origin(origin))
}

/// Root handler - describes the server.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "transport": "HTTP",
        "protocol": "JSON-RPC 2.0",
        "methods": ["initialize", "ping", "tools/list", "tools/call"],
        "health": "/health"
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Handle JSON-RPC requests.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    tracing::Span::current().record("method", request.method.as_str());
    info!("Received JSON-RPC request: {}", request.method);

    match process_request(&state, request).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Process a JSON-RPC request.
///
/// Returns `None` for notifications, which get no JSON-RPC response.
pub async fn process_request(state: &AppState, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
    if request.jsonrpc != "2.0" {
        return Some(JsonRpcResponse::invalid_request(request.id));
    }

    let response = match request.method.as_str() {
        "initialize" => handle_initialize(state, request),

        "ping" => JsonRpcResponse::success(request.id, serde_json::json!({})),

        "tools/list" => handle_tools_list(state, request),

        "tools/call" => handle_tools_call(state, request).await,

        method if method.starts_with("notifications/") => {
            debug!("Received notification: {}", method);
            return None;
        }

        method => {
            warn!("Unknown method: {}", method);
            JsonRpcResponse::method_not_found(request.id, method)
        }
    };

    Some(response)
}

/// Handle initialize request.
fn handle_initialize(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing initialize request");

    match serde_json::to_value(state.server.get_info()) {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
    }
}

/// Handle tools/list request.
fn handle_tools_list(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/list request");

    let tools = state.server.list_tools();
    JsonRpcResponse::success(request.id, serde_json::json!({ "tools": tools }))
}

/// Handle tools/call request.
async fn handle_tools_call(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/call request");

    let Some(params) = request.params else {
        return JsonRpcResponse::invalid_params(request.id, "Missing params");
    };

    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return JsonRpcResponse::invalid_params(request.id, "Missing tool name");
    };

    match state
        .server
        .call_tool(name, params.get("arguments").cloned())
        .await
    {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::from_mcp_error(request.id, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::domains::tools::ToolRegistry;
    use crate::domains::tools::testing::RecordingApi;
    use serde_json::json;
    use std::sync::Arc;

    const UNI: &str = "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984";

    fn state_with(api: Option<Arc<RecordingApi>>) -> AppState {
        let api = api.map(|api| api as Arc<dyn crate::core::AnalyticsApi>);
        AppState::new(McpServer::with_registry(
            Config::default(),
            ToolRegistry::with_api(api),
        ))
    }

    fn request(method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params: Some(params),
        }
    }

    async fn call(state: &AppState, method: &str, params: Value) -> JsonRpcResponse {
        process_request(state, request(method, params)).await.unwrap()
    }

    #[tokio::test]
    async fn test_initialize_reports_tools_capability() {
        let response = call(&state_with(None), "initialize", json!({})).await;
        let result = response.result.unwrap();

        assert_eq!(result["serverInfo"]["name"], "token-analytics-mcp");
        assert!(result["capabilities"]["tools"].is_object());
        assert!(result["capabilities"].get("resources").is_none());
        assert!(result["protocolVersion"].is_string());
    }

    #[tokio::test]
    async fn test_ping_and_tools_list() {
        let state = state_with(None);

        let pong = call(&state, "ping", json!({})).await;
        assert_eq!(pong.result, Some(json!({})));

        let listed = call(&state, "tools/list", json!({})).await;
        let tools = listed.result.unwrap()["tools"].as_array().unwrap().len();
        assert_eq!(tools, 6);
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let state = state_with(None);
        let response = process_request(
            &state,
            request("notifications/initialized", Value::Null),
        )
        .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_rejects_bad_version_and_unknown_method() {
        let state = state_with(None);

        let mut bad = request("ping", json!({}));
        bad.jsonrpc = "1.0".to_string();
        let response = process_request(&state, bad).await.unwrap();
        assert_eq!(response.error.unwrap().code, ErrorCode::INVALID_REQUEST.0);

        let response = call(&state, "resources/list", json!({})).await;
        assert_eq!(response.error.unwrap().code, ErrorCode::METHOD_NOT_FOUND.0);
    }

    #[tokio::test]
    async fn test_tools_call_error_codes() {
        let state = state_with(None);
        let response = call(&state, "tools/call", json!({ "name": "get_token_info" })).await;
        let error = response.error.unwrap();
        assert_eq!(error.code, ErrorCode::INVALID_REQUEST.0);
        assert!(error.message.contains("MCP_ANALYTICS_API_KEY"));

        let api = Arc::new(RecordingApi::returning(json!({})));
        let state = state_with(Some(api.clone()));

        let response = call(&state, "tools/call", json!({ "name": "get_price" })).await;
        assert_eq!(response.error.unwrap().code, ErrorCode::METHOD_NOT_FOUND.0);

        let response = call(
            &state,
            "tools/call",
            json!({ "name": "get_token_info", "arguments": { "token_address": "nope" } }),
        )
        .await;
        assert_eq!(response.error.unwrap().code, ErrorCode::INVALID_PARAMS.0);

        let response = call(&state, "tools/call", json!({})).await;
        assert_eq!(response.error.unwrap().code, ErrorCode::INVALID_PARAMS.0);

        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_tools_call_scalar_arguments() {
        let params = json!({ "name": "get_token_info", "arguments": "0xabc" });

        let response = call(&state_with(None), "tools/call", params.clone()).await;
        assert_eq!(response.error.unwrap().code, ErrorCode::INVALID_REQUEST.0);

        let api = Arc::new(RecordingApi::returning(json!({})));
        let response = call(&state_with(Some(api.clone())), "tools/call", params).await;
        assert_eq!(response.error.unwrap().code, ErrorCode::INVALID_PARAMS.0);
        assert_eq!(api.call_count(), 0);
    }

    #[test]
    fn test_router_cors_origin() {
        let server = McpServer::new(Config::default());
        let with_origin = |origin: &str| {
            HttpTransport::new(HttpConfig {
                allowed_origin: Some(origin.to_string()),
                ..HttpConfig::default()
            })
        };

        assert!(HttpTransport::new(HttpConfig::default()).router(server.clone()).is_ok());
        assert!(with_origin("*").router(server.clone()).is_ok());
        assert!(with_origin("https://app.example.com").router(server.clone()).is_ok());
        assert!(matches!(
            with_origin("https://app\nexample.com").router(server),
            Err(Error::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_tools_call_success() {
        let api = Arc::new(RecordingApi::returning(json!({
            "holders": [{ "address": UNI, "balance": 1 }]
        })));
        let state = state_with(Some(api.clone()));

        let response = call(
            &state,
            "tools/call",
            json!({ "name": "get_top_holders", "arguments": { "token_address": UNI } }),
        )
        .await;

        let result = response.result.unwrap();
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("Top Holders"));
        assert_eq!(response.id, Some(json!(1)));
        assert_eq!(api.call_count(), 1);
    }
}
