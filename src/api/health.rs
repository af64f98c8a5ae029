use axum::{Extension, response::Json};
use serde_json::{Value, json};

use super::CallbackState;

/// Service name, version and the state of the pending login.
pub async fn health(Extension(state): Extension<CallbackState>) -> Json<Value> {
    let login = state.session.lock().await.state();
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "login": login.as_str(),
    }))
}
