use axum::response::IntoResponse;
use axum_macros::debug_handler;

use crate::utils::response::into_reponse;

// Handler 404 - Not Found
#[debug_handler]
pub async fn error_404() -> impl IntoResponse {
    let ret = serde_json::json!({
        "error": "route not found!".to_string(),
    });
    into_reponse(404, ret)
}
