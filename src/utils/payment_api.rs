use serde::Deserialize;
use serde::Serialize;

pub const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripeCustomer {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripeCustomerList {
    pub data: Vec<StripeCustomer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripePaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
}

/// Callers send amounts in major currency units (`70`, not `7000`); the
/// provider wants integer minor units.
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// The provider wraps failures as `{"error": {"message": ...}}`; that
/// message is forwarded to our caller untouched.
pub fn error_message(body: &serde_json::Value) -> String {
    body["error"]["message"]
        .as_str()
        .unwrap_or("payment provider request failed")
        .to_string()
}

pub async fn find_customer(
    http: &reqwest::Client,
    secret_key: &str,
    email: &str,
) -> anyhow::Result<Option<String>> {
    let response = http
        .get(format!("{}/customers", STRIPE_API_BASE))
        .bearer_auth(secret_key)
        .query(&[("email", email), ("limit", "1")])
        .send()
        .await?;

    let status = response.status();
    let body: serde_json::Value = response.json().await?;
    if !status.is_success() {
        return Err(anyhow::anyhow!(error_message(&body)));
    }

    let list: StripeCustomerList = serde_json::from_value(body)?;
    Ok(list.data.into_iter().next().map(|customer| customer.id))
}

/// A create that comes back without an id is logged and swallowed; the
/// payment intent can still be created without a customer.
pub async fn create_customer(
    http: &reqwest::Client,
    secret_key: &str,
    email: &str,
    name: Option<&str>,
) -> Option<String> {
    let mut form: Vec<(&str, String)> = vec![("email", email.to_string())];
    if let Some(name) = name {
        form.push(("name", name.to_string()));
    }

    let response = match http
        .post(format!("{}/customers", STRIPE_API_BASE))
        .bearer_auth(secret_key)
        .form(&form)
        .send()
        .await
    {
        Ok(response) => response,
        Err(error) => {
            tracing::warn!("customer create failed: {}", error);
            return None;
        }
    };

    let body: serde_json::Value = match response.json().await {
        Ok(body) => body,
        Err(error) => {
            tracing::warn!("customer create returned no body: {}", error);
            return None;
        }
    };

    match body["id"].as_str() {
        Some(id) => Some(id.to_string()),
        None => {
            tracing::warn!("customer create returned no id: {}", body);
            None
        }
    }
}

pub async fn create_intent(
    http: &reqwest::Client,
    secret_key: &str,
    amount_minor: i64,
    currency: &str,
    customer_id: Option<&str>,
    setup_future_usage: Option<&str>,
) -> anyhow::Result<StripePaymentIntent> {
    let mut form: Vec<(&str, String)> = vec![
        ("amount", amount_minor.to_string()),
        ("currency", currency.to_string()),
        ("automatic_payment_methods[enabled]", "true".to_string()),
    ];
    if let Some(customer_id) = customer_id {
        form.push(("customer", customer_id.to_string()));
    }
    if let Some(setup_future_usage) = setup_future_usage {
        form.push(("setup_future_usage", setup_future_usage.to_string()));
    }

    let response = http
        .post(format!("{}/payment_intents", STRIPE_API_BASE))
        .bearer_auth(secret_key)
        .form(&form)
        .send()
        .await?;

    let status = response.status();
    let body: serde_json::Value = response.json().await?;
    if !status.is_success() {
        return Err(anyhow::anyhow!(error_message(&body)));
    }

    let intent: StripePaymentIntent = serde_json::from_value(body)?;
    Ok(intent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_units_become_minor_units() {
        assert_eq!(to_minor_units(70.0), 7000);
        assert_eq!(to_minor_units(12.5), 1250);
        assert_eq!(to_minor_units(19.99), 1999);
    }

    #[test]
    fn provider_error_message_is_forwarded() {
        let body = serde_json::json!({
            "error": { "message": "Amount must convert to at least 50 cents." }
        });
        assert_eq!(
            error_message(&body),
            "Amount must convert to at least 50 cents."
        );
    }

    #[test]
    fn unreadable_provider_error_gets_a_fallback() {
        assert_eq!(
            error_message(&serde_json::json!({})),
            "payment provider request failed"
        );
    }

    #[test]
    fn customer_list_takes_the_first_hit() {
        let body = r#"{"object": "list", "data": [{"id": "cus_123"}, {"id": "cus_456"}]}"#;
        let list: StripeCustomerList = serde_json::from_str(body).unwrap();
        assert_eq!(
            list.data.into_iter().next().map(|c| c.id).as_deref(),
            Some("cus_123")
        );
    }

    #[test]
    fn intent_without_client_secret_parses() {
        let intent: StripePaymentIntent =
            serde_json::from_str(r#"{"id": "pi_123", "client_secret": null}"#).unwrap();
        assert_eq!(intent.client_secret, None);
    }
}
