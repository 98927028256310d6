use axum::{extract::Extension, response::IntoResponse};
use axum_macros::debug_handler;
use std::sync::Arc;

use crate::config::Config;
use crate::models::payment::PaymentIntentInfo;
use crate::utils::payment_api;
use crate::utils::response::into_reponse;

#[debug_handler]
pub async fn create_payment_intent(
    payload: String,
    Extension(config): Extension<Arc<Config>>,
) -> impl IntoResponse {
    tracing::debug!("payload : {:#?}", payload);
    let params: PaymentIntentInfo;
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

    if !(params.amount > 0.0) {
        let ret = serde_json::json!({
            "error": "amount must be greater than zero!".to_string(),
        });
        return into_reponse(400, ret);
    }

    let http = reqwest::Client::new();

    // reuse an existing provider customer for this email, create one on a
    // miss, and keep going without one if the create yields no id
    let mut customer_id: Option<String> = None;
    if let Some(email) = params.email.as_deref().filter(|value| !value.is_empty()) {
        match payment_api::find_customer(&http, &config.stripe_secret_key, email).await {
            Ok(Some(id)) => customer_id = Some(id),
            Ok(None) => {
                customer_id = payment_api::create_customer(
                    &http,
                    &config.stripe_secret_key,
                    email,
                    params.name.as_deref(),
                )
                .await;
            }
            Err(e) => {
                let ret = serde_json::json!({
                    "error": e.to_string(),
                });
                return into_reponse(400, ret);
            }
        }
    }

    let amount = payment_api::to_minor_units(params.amount);
    let currency = params
        .currency
        .as_deref()
        .filter(|value| !value.is_empty())
        .unwrap_or(&config.default_currency);

    let intent = match payment_api::create_intent(
        &http,
        &config.stripe_secret_key,
        amount,
        currency,
        customer_id.as_deref(),
        params.setup_future_usage.as_deref(),
    )
    .await
    {
        Ok(intent) => intent,
        Err(e) => {
            let ret = serde_json::json!({
                "error": e.to_string(),
            });
            return into_reponse(400, ret);
        }
    };

    match intent.client_secret {
        Some(client_secret) => {
            let ret = serde_json::json!({
                "client_secret": client_secret,
                "customer_id": customer_id,
            });
            into_reponse(200, ret)
        }
        None => {
            tracing::error!("payment intent {} has no client secret", intent.id);
            let ret = serde_json::json!({
                "error": "payment provider returned no client secret!".to_string(),
            });
            into_reponse(500, ret)
        }
    }
}
