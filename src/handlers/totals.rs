use crate::{handlers::AppState, models::TotalsResponse};
use axum::{extract::State, Json};

pub async fn get_totals(State(state): State<AppState>) -> Json<TotalsResponse> {
    Json(state.ledger.totals().await)
}
