use axum::{extract::Extension, response::IntoResponse};
use axum_macros::debug_handler;
use sqlx::PgPool;
use std::sync::Arc;

use crate::models::order::{CreateOrderInfo, Order};
use crate::utils::response::into_reponse;

/// Stored emails are always trimmed and lowercased so later client linkage
/// matches regardless of how the checkout form was filled in.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[debug_handler]
pub async fn create_order(
    payload: String,
    Extension(pool): Extension<Arc<PgPool>>,
) -> impl IntoResponse {
    tracing::debug!("payload : {:#?}", payload);
    let params: CreateOrderInfo;
    let response = serde_json::from_str(&payload);
    match response {
        Ok(p) => params = p,
        Err(_e) => {
            let ret = serde_json::json!({
                "error": "API params are incorrect!".to_string(),
            });
            return into_reponse(400, ret);
        }
    };

    if params.order_id_string.len() == 0 {
        let ret = serde_json::json!({
            "error": "order_id_string is empty!".to_string(),
        });
        return into_reponse(400, ret);
    }
    if params.client_name.len() == 0 {
        let ret = serde_json::json!({
            "error": "client_name is empty!".to_string(),
        });
        return into_reponse(400, ret);
    }
    if params.client_email.len() == 0 {
        let ret = serde_json::json!({
            "error": "client_email is empty!".to_string(),
        });
        return into_reponse(400, ret);
    }

    let client_email = normalize_email(&params.client_email);

    // client_id stays NULL at intake; client linkage is a later flow
    let record = sqlx::query_as::<_, Order>(
        r#"INSERT INTO orders (order_id_string, actor_id, client_id, client_name, client_email, word_count, usage, total_price, script, payment_method, stripe_payment_intent_id, status)
           VALUES ($1, $2, NULL, $3, $4, $5, $6, $7, $8, $9, $10, $11)
           RETURNING *"#,
    )
    .bind(&params.order_id_string)
    .bind(params.actor_id)
    .bind(&params.client_name)
    .bind(&client_email)
    .bind(params.word_count)
    .bind(&params.usage)
    .bind(params.total_price)
    .bind(&params.script)
    .bind(&params.payment_method)
    .bind(&params.stripe_payment_intent_id)
    .bind(&params.status)
    .fetch_one(&*pool)
    .await;

    match record {
        Ok(record) => into_reponse(200, serde_json::json!(record)),
        Err(e) => {
            let ret = serde_json::json!({
                "error": e.to_string(),
            });
            into_reponse(400, ret)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Yassine@Example.COM "), "yassine@example.com");
        assert_eq!(normalize_email("already@lower.com"), "already@lower.com");
    }
}
