//! Admin HTTP API (driver adapter).
//!
//! Axum-based REST surface over the execution dispatcher: post fills,
//! cancels and rejects against any order, and read the order/execution
//! views. Errors come back as structured JSON; they never turn into FIX
//! messages.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dispatch::{DispatchError, ExecutionDispatcher};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Bridge to the order state machine and session table.
    pub dispatcher: ExecutionDispatcher,
    /// Application version.
    pub version: String,
}

/// Health check response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Fill request body.
#[derive(Debug, Serialize, Deserialize)]
pub struct FillRequest {
    /// Quantity to fill.
    pub quantity: u64,
    /// Fill price.
    pub price: Decimal,
}

/// Generic success body for mutating endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct OkResponse {
    /// Always `"ok"`.
    pub status: String,
}

/// Structured error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// Wrapper giving `DispatchError` an HTTP rendering.
#[derive(Debug)]
pub struct AdminError(DispatchError);

impl From<DispatchError> for AdminError {
    fn from(err: DispatchError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            DispatchError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            DispatchError::BadState { .. } => (StatusCode::CONFLICT, "BAD_STATE"),
            DispatchError::Overfill { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "OVERFILL"),
            DispatchError::InvalidQuantity => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_QUANTITY")
            }
        };
        let body = ErrorResponse {
            code: code.to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/orders", get(list_orders))
        .route("/api/v1/orders/{cl_ord_id}", get(get_order))
        .route("/api/v1/orders/{cl_ord_id}/fill", post(submit_fill))
        .route("/api/v1/orders/{cl_ord_id}/cancel", post(admin_cancel))
        .route("/api/v1/orders/{cl_ord_id}/reject", post(admin_reject))
        .route("/api/v1/executions", get(list_executions))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version,
    })
}

/// List all orders, oldest first.
async fn list_orders(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.dispatcher.list_orders())
}

/// Fetch one order by ClOrdID.
async fn get_order(
    State(state): State<AppState>,
    Path(cl_ord_id): Path<String>,
) -> Result<impl IntoResponse, AdminError> {
    state
        .dispatcher
        .get_order(&cl_ord_id)
        .map(Json)
        .ok_or_else(|| AdminError(DispatchError::NotFound { cl_ord_id }))
}

/// List the execution log, oldest first.
async fn list_executions(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.dispatcher.list_executions())
}

/// Post a fill against an order.
async fn submit_fill(
    State(state): State<AppState>,
    Path(cl_ord_id): Path<String>,
    Json(request): Json<FillRequest>,
) -> Result<impl IntoResponse, AdminError> {
    state
        .dispatcher
        .submit_fill(&cl_ord_id, request.quantity, request.price)?;
    Ok(Json(OkResponse {
        status: "ok".to_string(),
    }))
}

/// Cancel an order administratively.
async fn admin_cancel(
    State(state): State<AppState>,
    Path(cl_ord_id): Path<String>,
) -> Result<impl IntoResponse, AdminError> {
    state.dispatcher.admin_cancel(&cl_ord_id)?;
    Ok(Json(OkResponse {
        status: "ok".to_string(),
    }))
}

/// Reject an order administratively.
async fn admin_reject(
    State(state): State<AppState>,
    Path(cl_ord_id): Path<String>,
) -> Result<impl IntoResponse, AdminError> {
    state.dispatcher.admin_reject(&cl_ord_id)?;
    Ok(Json(OkResponse {
        status: "ok".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewOrderCommand, OrdType, Order, Side, TimeInForce};
    use crate::session::SessionRegistry;
    use crate::store::OrderStore;
    use axum::body::Body;
    use axum::http::Request;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn make_app() -> (Router, Arc<OrderStore>) {
        let store = Arc::new(OrderStore::new());
        let registry = Arc::new(SessionRegistry::new());
        let dispatcher = ExecutionDispatcher::new(Arc::clone(&store), registry);
        let app = create_router(AppState {
            dispatcher,
            version: "test".to_string(),
        });
        (app, store)
    }

    fn seed_order(store: &OrderStore, cl_ord_id: &str) {
        let order = Order::new(NewOrderCommand {
            cl_ord_id: cl_ord_id.to_string(),
            symbol: "AAPL".to_string(),
            side: Side::Buy,
            order_type: OrdType::Market,
            quantity: 100,
            limit_price: None,
            time_in_force: TimeInForce::Day,
            sender_comp_id: "TEST_CLIENT".to_string(),
        })
        .unwrap();
        store.insert(order).unwrap();
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_version() {
        let (app, _store) = make_app();
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], "test");
    }

    #[tokio::test]
    async fn fill_endpoint_applies_fill() {
        let (app, store) = make_app();
        seed_order(&store, "ORD-1");

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/orders/ORD-1/fill")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"quantity":100,"price":"230.10"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let order = store.get_order("ORD-1").unwrap();
        assert_eq!(order.filled_quantity(), 100);
        assert_eq!(order.avg_px(), dec!(230.10));
    }

    #[tokio::test]
    async fn fill_unknown_order_is_404() {
        let (app, _store) = make_app();

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/orders/NOPE/fill")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"quantity":10,"price":"1.0"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn cancel_twice_is_409() {
        let (app, store) = make_app();
        seed_order(&store, "ORD-1");

        let cancel = |app: Router| async move {
            app.oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/orders/ORD-1/cancel")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
        };

        let first = cancel(app.clone()).await;
        assert_eq!(first.status(), StatusCode::OK);

        let second = cancel(app).await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let body = body_json(second).await;
        assert_eq!(body["code"], "BAD_STATE");
    }

    #[tokio::test]
    async fn overfill_is_422() {
        let (app, store) = make_app();
        seed_order(&store, "ORD-1");

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/orders/ORD-1/fill")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"quantity":150,"price":"230.10"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["code"], "OVERFILL");
    }

    #[tokio::test]
    async fn order_views_round_trip() {
        let (app, store) = make_app();
        seed_order(&store, "ORD-1");

        let list = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/orders")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(list.status(), StatusCode::OK);
        let body = body_json(list).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let one = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/orders/ORD-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(one.status(), StatusCode::OK);
        let body = body_json(one).await;
        assert_eq!(body["cl_ord_id"], "ORD-1");
        assert_eq!(body["status"], "NEW");
    }
}
