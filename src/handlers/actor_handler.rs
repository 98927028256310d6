use axum::{
    extract::{ContentLengthLimit, Extension, Multipart, Query},
    response::IntoResponse,
};
use axum_macros::debug_handler;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::models::actor::{Actor, ActorRecording, CreateActorInfo, RecordingUploadParam, PROCESSING};
use crate::handlers::order_intake_handler::normalize_email;
use crate::utils::response::into_reponse;
use crate::utils::upload_storage::{recording_key, upload_object};

#[debug_handler]
pub async fn create_actor(
    payload: String,
    Extension(pool): Extension<Arc<PgPool>>,
) -> impl IntoResponse {
    tracing::debug!("payload : {:#?}", payload);
    let params: CreateActorInfo;
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

    if params.name.len() == 0 {
        let ret = serde_json::json!({
            "error": "name is empty!".to_string(),
        });
        return into_reponse(400, ret);
    }
    if params.email.len() == 0 {
        let ret = serde_json::json!({
            "error": "email is empty!".to_string(),
        });
        return into_reponse(400, ret);
    }

    let email = normalize_email(&params.email);

    let existing = sqlx::query_as::<_, Actor>(r#"SELECT * FROM actors WHERE email = $1"#)
        .bind(&email)
        .fetch_optional(&*pool)
        .await;
    match existing {
        Ok(Some(_actor)) => {
            let ret = serde_json::json!({
                "error": "email is already registered!".to_string(),
            });
            return into_reponse(400, ret);
        }
        Ok(None) => {}
        Err(e) => {
            let ret = serde_json::json!({
                "error": e.to_string(),
            });
            return into_reponse(400, ret);
        }
    }

    // the profile slug is derived from the name by a database trigger
    let record = sqlx::query_as::<_, Actor>(
        r#"INSERT INTO actors (name, email) VALUES ($1, $2) RETURNING *"#,
    )
    .bind(&params.name)
    .bind(&email)
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

async fn start_cleanup_job(
    http: &reqwest::Client,
    service_url: &str,
    audio_url: &str,
) -> anyhow::Result<String> {
    let response = http
        .post(service_url)
        .json(&serde_json::json!({ "audioUrl": audio_url }))
        .send()
        .await?;

    let body: serde_json::Value = response.json().await?;
    match body["jobId"].as_str() {
        Some(job_id) => Ok(job_id.to_string()),
        None => Err(anyhow::anyhow!("cleanup service did not accept the job!")),
    }
}

#[debug_handler]
pub async fn submit_recording(
    params: Query<RecordingUploadParam>,
    Extension(pool): Extension<Arc<PgPool>>,
    Extension(config): Extension<Arc<Config>>,
    ContentLengthLimit(mut multipart): ContentLengthLimit<Multipart, { 500 * 1024 * 1024 }>,
) -> impl IntoResponse {
    let field = match multipart.next_field().await {
        Ok(Some(field)) => field,
        Ok(None) => {
            let ret = serde_json::json!({
                "error": "no audio file was sent!".to_string(),
            });
            return into_reponse(400, ret);
        }
        Err(_e) => {
            let ret = serde_json::json!({
                "error": "multipart body is invalid!".to_string(),
            });
            return into_reponse(400, ret);
        }
    };

    let file_name = field
        .file_name()
        .map(|value| value.replace(' ', "_"))
        .unwrap_or_else(|| format!("{}.wav", Uuid::new_v4()));
    let buffer = match field.bytes().await {
        Ok(bytes) => bytes.to_vec(),
        Err(_e) => {
            let ret = serde_json::json!({
                "error": format!("failed to read {}!", file_name),
            });
            return into_reponse(400, ret);
        }
    };

    let key = recording_key(&params.actor_id, &file_name);
    let raw_audio_url = match upload_object(
        &config.assets_region,
        &config.assets_bucket,
        &key,
        "audio/wav",
        buffer,
    )
    .await
    {
        Some(url) => url,
        None => {
            let ret = serde_json::json!({
                "error": format!("failed to upload {}!", file_name),
            });
            return into_reponse(400, ret);
        }
    };

    let http = reqwest::Client::new();
    let job_id = match start_cleanup_job(&http, &config.cleanup_service_url, &raw_audio_url).await {
        Ok(job_id) => job_id,
        Err(e) => {
            let ret = serde_json::json!({
                "error": e.to_string(),
            });
            return into_reponse(400, ret);
        }
    };

    let record = sqlx::query_as::<_, ActorRecording>(
        r#"INSERT INTO actor_recordings (actor_id, cleanup_job_id, status, raw_audio_url)
           VALUES ($1, $2, $3, $4)
           RETURNING *"#,
    )
    .bind(params.actor_id)
    .bind(&job_id)
    .bind(PROCESSING)
    .bind(&raw_audio_url)
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
