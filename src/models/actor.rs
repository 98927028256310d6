use serde::Deserialize;
use serde::Serialize;
use sqlx::types::chrono::NaiveDateTime;
use uuid::Uuid;

// actor_recordings.status values; rows only leave PROCESSING through the
// cleanup webhook
pub const PROCESSING: &str = "processing";
pub const CLEANED: &str = "cleaned";
pub const ERRORED: &str = "error";

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateActorInfo {
    pub name: String,
    pub email: String,
}

#[derive(sqlx::FromRow)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub slug: Option<String>,               // filled by a database trigger
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(sqlx::FromRow)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorRecording {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub cleanup_job_id: String,             // id in the audio-cleanup service
    pub status: String,
    pub raw_audio_url: Option<String>,
    pub cleaned_audio_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingUploadParam {
    pub actor_id: Uuid,
}

/// Body the audio-cleanup service posts back when a job finishes.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupCallbackInfo {
    pub job_id: Option<String>,
    pub status: Option<String>,
    pub download_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_parses_camel_case_keys() {
        let payload = r#"{"jobId": "abc", "status": "succeeded", "downloadUrl": "http://x"}"#;
        let params: CleanupCallbackInfo = serde_json::from_str(payload).unwrap();
        assert_eq!(params.job_id.as_deref(), Some("abc"));
        assert_eq!(params.download_url.as_deref(), Some("http://x"));
    }

    #[test]
    fn callback_fields_are_optional() {
        let params: CleanupCallbackInfo = serde_json::from_str(r#"{"jobId": "abc"}"#).unwrap();
        assert_eq!(params.status, None);
        assert_eq!(params.download_url, None);
    }
}
