use axum::http::StatusCode;
use axum::Json;

pub fn into_reponse(code: i64, body: serde_json::Value) -> (StatusCode, Json<serde_json::Value>) {
    let value = serde_json::json!({
        "code": code,
        "result": body,
    });
    let status = StatusCode::from_u16(code as u16).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_matches_envelope_code() {
        let (status, _body) = into_reponse(
            400,
            serde_json::json!({
                "error": "client_email is empty!".to_string(),
            }),
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_code_falls_back_to_500() {
        let (status, _body) = into_reponse(999, serde_json::json!({}));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
