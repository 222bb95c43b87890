use crate::{
    error::DonationError,
    handlers::AppState,
    models::{CaptureOrderRequest, CaptureOrderResponse, CreateOrderRequest, CreateOrderResponse},
};
use axum::{extract::rejection::JsonRejection, extract::State, Json};

pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<CreateOrderResponse>, DonationError> {
    let Json(request) = payload.map_err(invalid_body)?;

    let order_id = state.orders.create_order(request).await?;

    Ok(Json(CreateOrderResponse { order_id }))
}

pub async fn capture_order(
    State(state): State<AppState>,
    payload: Result<Json<CaptureOrderRequest>, JsonRejection>,
) -> Result<Json<CaptureOrderResponse>, DonationError> {
    let Json(request) = payload.map_err(invalid_body)?;

    let outcome = state.orders.capture_order(request.order_id).await?;

    Ok(Json(CaptureOrderResponse {
        success: true,
        capture_id: outcome.transaction.id,
        warnings: outcome.warnings,
    }))
}

fn invalid_body(rejection: JsonRejection) -> DonationError {
    DonationError::Validation(format!("Invalid request body: {}", rejection.body_text()))
}
