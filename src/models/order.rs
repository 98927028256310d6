use serde::Deserialize;
use serde::Serialize;
use sqlx::types::chrono::NaiveDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderInfo {
    pub order_id_string: String,            // client-facing order reference
    pub actor_id: Uuid,                     // actor fulfilling the order
    pub client_name: String,
    pub client_email: String,
    pub word_count: i32,
    pub usage: String,                      // usage category (ad, e-learning, ...)
    pub total_price: f64,
    pub script: Option<String>,
    pub payment_method: String,
    pub stripe_payment_intent_id: Option<String>,
    pub status: String,
}

#[derive(sqlx::FromRow)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_id_string: String,
    pub actor_id: Uuid,
    pub client_id: Option<Uuid>,            // linked later, never at intake
    pub client_name: String,
    pub client_email: String,
    pub word_count: i32,
    pub usage: String,
    pub total_price: f64,
    pub script: Option<String>,
    pub project_notes: Option<String>,
    pub material_file_urls: Option<Vec<String>>,
    pub payment_method: String,
    pub stripe_payment_intent_id: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderMaterialsParam {
    pub order_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_payload_parses() {
        let payload = serde_json::json!({
            "order_id_string": "UCP-2024-0042",
            "actor_id": "7f9c24e8-3b12-4e6f-9f39-2cbbbe2ed7ee",
            "client_name": "Yassine B.",
            "client_email": "Yassine@Example.com",
            "word_count": 350,
            "usage": "radio_spot",
            "total_price": 70.0,
            "script": "Bonjour...",
            "payment_method": "card",
            "status": "pending"
        })
        .to_string();

        let params: CreateOrderInfo = serde_json::from_str(&payload).unwrap();
        assert_eq!(params.word_count, 350);
        assert_eq!(params.stripe_payment_intent_id, None);
    }

    #[test]
    fn order_payload_without_client_email_is_rejected() {
        let payload = serde_json::json!({
            "order_id_string": "UCP-2024-0042",
            "actor_id": "7f9c24e8-3b12-4e6f-9f39-2cbbbe2ed7ee",
            "client_name": "Yassine B.",
            "word_count": 350,
            "usage": "radio_spot",
            "total_price": 70.0,
            "payment_method": "card",
            "status": "pending"
        })
        .to_string();

        assert!(serde_json::from_str::<CreateOrderInfo>(&payload).is_err());
    }
}
