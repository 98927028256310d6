use axum::{extract::Extension, http::HeaderMap, response::IntoResponse};
use axum_macros::debug_handler;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;
use crate::models::actor::{CleanupCallbackInfo, CLEANED, ERRORED};
use crate::utils::response::into_reponse;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-cleanup-signature";

/// The cleanup service has no signing of its own, so the check is a plain
/// HMAC-SHA256 of the raw body under a shared secret, enabled only when the
/// secret is configured.
pub fn verify_signature(secret: &str, payload: &str, signature: &str) -> bool {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_e) => return false,
    };
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes()) == signature
}

#[derive(Debug, PartialEq)]
pub(crate) enum CallbackAction {
    Update(&'static str, Option<String>),
    Ignore,
}

pub(crate) fn callback_action(
    status: Option<&str>,
    download_url: Option<String>,
) -> Result<CallbackAction, &'static str> {
    match status {
        Some("succeeded") => match download_url {
            Some(url) if !url.is_empty() => Ok(CallbackAction::Update(CLEANED, Some(url))),
            _ => Err("downloadUrl is missing for a succeeded job!"),
        },
        Some("failed") => Ok(CallbackAction::Update(ERRORED, None)),
        _ => Ok(CallbackAction::Ignore),
    }
}

#[debug_handler]
pub async fn audio_cleanup_webhook(
    headers: HeaderMap,
    payload: String,
    Extension(pool): Extension<Arc<PgPool>>,
    Extension(config): Extension<Arc<Config>>,
) -> impl IntoResponse {
    if let Some(secret) = &config.cleanup_webhook_secret {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");
        if !verify_signature(secret, &payload, signature) {
            let ret = serde_json::json!({
                "error": "signature mismatch!".to_string(),
            });
            return into_reponse(401, ret);
        }
    }

    let params: CleanupCallbackInfo = match serde_json::from_str(&payload) {
        Ok(p) => p,
        Err(_e) => {
            let ret = serde_json::json!({
                "error": "callback payload is invalid!".to_string(),
            });
            return into_reponse(500, ret);
        }
    };

    let job_id = match params.job_id {
        Some(job_id) if !job_id.is_empty() => job_id,
        _ => {
            let ret = serde_json::json!({
                "error": "jobId is missing!".to_string(),
            });
            return into_reponse(500, ret);
        }
    };

    let (status, cleaned_audio_url) =
        match callback_action(params.status.as_deref(), params.download_url) {
            Ok(CallbackAction::Update(status, cleaned_audio_url)) => (status, cleaned_audio_url),
            Ok(CallbackAction::Ignore) => {
                tracing::info!(
                    "ignoring cleanup callback for job {} with status {:?}",
                    job_id,
                    params.status
                );
                let ret = serde_json::json!({
                    "status": "ignored".to_string(),
                });
                return into_reponse(200, ret);
            }
            Err(message) => {
                let ret = serde_json::json!({
                    "error": message.to_string(),
                });
                return into_reponse(500, ret);
            }
        };

    let result = sqlx::query(
        r#"UPDATE actor_recordings SET status = $1, cleaned_audio_url = $2 WHERE cleanup_job_id = $3"#,
    )
    .bind(status)
    .bind(&cleaned_audio_url)
    .bind(&job_id)
    .execute(&*pool)
    .await;

    match result {
        Ok(done) => {
            if done.rows_affected() == 0 {
                // the cleanup service did not error on unknown jobs either
                tracing::warn!("no recording found for cleanup job {}", job_id);
            }
            let ret = serde_json::json!({
                "received": true,
            });
            into_reponse(200, ret)
        }
        Err(e) => {
            let ret = serde_json::json!({
                "error": e.to_string(),
            });
            into_reponse(500, ret)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn succeeded_with_url_marks_the_recording_cleaned() {
        assert_eq!(
            callback_action(Some("succeeded"), Some("http://x".to_string())),
            Ok(CallbackAction::Update(CLEANED, Some("http://x".to_string())))
        );
    }

    #[test]
    fn succeeded_without_url_is_an_error() {
        assert!(callback_action(Some("succeeded"), None).is_err());
        assert!(callback_action(Some("succeeded"), Some(String::new())).is_err());
    }

    #[test]
    fn failed_marks_the_recording_errored() {
        assert_eq!(
            callback_action(Some("failed"), None),
            Ok(CallbackAction::Update(ERRORED, None))
        );
    }

    #[test]
    fn unknown_statuses_are_ignored() {
        assert_eq!(callback_action(Some("queued"), None), Ok(CallbackAction::Ignore));
        assert_eq!(callback_action(None, None), Ok(CallbackAction::Ignore));
    }

    #[test]
    fn signature_check_accepts_the_matching_hmac() {
        let payload = r#"{"jobId": "abc", "status": "failed"}"#;
        let mut mac = HmacSha256::new_from_slice(b"shared-secret").unwrap();
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        assert!(verify_signature("shared-secret", payload, &signature));
        assert!(!verify_signature("other-secret", payload, &signature));
        assert!(!verify_signature("shared-secret", payload, "deadbeef"));
    }
}
