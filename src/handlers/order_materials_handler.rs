use axum::{
    extract::{ContentLengthLimit, Extension, Multipart, Query},
    response::IntoResponse,
};
use axum_macros::debug_handler;
use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;
use crate::models::order::{Order, OrderMaterialsParam};
use crate::utils::response::into_reponse;
use crate::utils::upload_storage::{material_key, upload_object};

pub(crate) fn has_materials(notes: &str, file_count: usize) -> bool {
    !notes.trim().is_empty() || file_count > 0
}

#[debug_handler]
pub async fn upload_order_materials(
    params: Query<OrderMaterialsParam>,
    Extension(pool): Extension<Arc<PgPool>>,
    Extension(config): Extension<Arc<Config>>,
    ContentLengthLimit(mut multipart): ContentLengthLimit<Multipart, { 500 * 1024 * 1024 }>,
) -> impl IntoResponse {
    let mut notes = String::new();
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(_e) => {
                let ret = serde_json::json!({
                    "error": "multipart body is invalid!".to_string(),
                });
                return into_reponse(400, ret);
            }
        };

        let file_name = field.file_name().map(|value| value.replace(' ', "_"));
        match file_name {
            Some(file_name) => {
                let bytes = match field.bytes().await {
                    Ok(bytes) => bytes.to_vec(),
                    Err(_e) => {
                        let ret = serde_json::json!({
                            "error": format!("failed to read {}!", file_name),
                        });
                        return into_reponse(400, ret);
                    }
                };
                files.push((file_name, bytes));
            }
            None => {
                if field.name() == Some("notes") {
                    notes = field.text().await.unwrap_or_default();
                }
            }
        }
    }

    if !has_materials(&notes, files.len()) {
        let ret = serde_json::json!({
            "error": "nothing to submit!".to_string(),
        });
        return into_reponse(400, ret);
    }

    // uploads run one at a time; each key is an upsert by path, so a
    // same-named re-upload replaces the previous object
    let mut material_urls: Vec<String> = Vec::new();
    for (file_name, buffer) in files {
        let key = material_key(&params.order_id, &file_name);
        match upload_object(
            &config.assets_region,
            &config.assets_bucket,
            &key,
            "*",
            buffer,
        )
        .await
        {
            Some(url) => material_urls.push(url),
            None => {
                let ret = serde_json::json!({
                    "error": format!("failed to upload {}!", file_name),
                });
                return into_reponse(400, ret);
            }
        }
    }

    let notes = notes.trim().to_string();
    let notes_value = if notes.is_empty() { None } else { Some(notes) };
    let urls_value = if material_urls.is_empty() {
        None
    } else {
        Some(material_urls)
    };

    let record = sqlx::query_as::<_, Order>(
        r#"UPDATE orders SET project_notes = $1, script = $2, material_file_urls = $3 WHERE id = $4 RETURNING *"#,
    )
    .bind(&notes_value)
    .bind(&notes_value)
    .bind(&urls_value)
    .bind(params.order_id)
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
    fn empty_submissions_are_rejected_before_any_upload() {
        assert!(!has_materials("", 0));
        assert!(!has_materials("   \n", 0));
    }

    #[test]
    fn notes_alone_or_files_alone_are_enough() {
        assert!(has_materials("please keep the intro slow", 0));
        assert!(has_materials("", 2));
    }
}
