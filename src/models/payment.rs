use serde::Deserialize;
use serde::Serialize;

/// Request for `create_payment_intent`. `amount` is in major currency
/// units (`70`, not `7000`); the handler converts at the provider boundary.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntentInfo {
    pub amount: f64,
    pub email: Option<String>,
    pub name: Option<String>,
    pub setup_future_usage: Option<String>,
    pub currency: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_amount_is_enough() {
        let params: PaymentIntentInfo = serde_json::from_str(r#"{"amount": 70}"#).unwrap();
        assert_eq!(params.amount, 70.0);
        assert_eq!(params.email, None);
        assert_eq!(params.currency, None);
    }

    #[test]
    fn non_numeric_amount_is_rejected() {
        assert!(serde_json::from_str::<PaymentIntentInfo>(r#"{"amount": "70"}"#).is_err());
    }
}
