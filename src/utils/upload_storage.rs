use rusoto_core::Region;
use rusoto_s3::{PutObjectRequest, S3Client, S3};
use std::str::FromStr;
use uuid::Uuid;

/// Key for an order material. Keys are namespaced by the order id and keep
/// the file's own name, so re-uploading a same-named file overwrites the
/// previous object (S3 put is an upsert by path).
pub fn material_key(order_id: &Uuid, file_name: &str) -> String {
    format!("orders/{}/{}", order_id, file_name.replace(' ', "_"))
}

pub fn recording_key(actor_id: &Uuid, file_name: &str) -> String {
    format!("recordings/{}/{}", actor_id, file_name.replace(' ', "_"))
}

pub fn public_url(bucket: &str, key: &str) -> String {
    format!("https://{}.s3.amazonaws.com/{}", bucket, key)
}

/// Uploads one object with the public-read ACL and returns its public URL,
/// or `None` when the region is unknown or the put fails.
pub async fn upload_object(
    region_name: &str,
    bucket: &str,
    key: &str,
    content_type: &str,
    buffer: Vec<u8>,
) -> Option<String> {
    let region: Region = match Region::from_str(region_name) {
        Ok(value) => value,
        Err(_e) => return None,
    };
    let s3 = S3Client::new(region);

    let file_name = key.rsplit('/').next().unwrap_or(key).to_string();
    let result = s3
        .put_object(PutObjectRequest {
            key: key.to_string(),
            content_type: Some(content_type.to_string()),
            content_disposition: Some(format!("inline; filename={}", file_name)),
            content_length: Some(buffer.len() as i64),
            body: Some(buffer.into()),
            bucket: bucket.to_string(),
            acl: Some("public-read".to_string()),
            ..Default::default()
        })
        .await;

    match result {
        Ok(_success) => Some(public_url(bucket, key)),
        Err(error) => {
            tracing::error!("failed to upload {}: {:?}", key, error);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_keys_are_namespaced_by_order() {
        let order_id = Uuid::parse_str("7f9c24e8-3b12-4e6f-9f39-2cbbbe2ed7ee").unwrap();
        assert_eq!(
            material_key(&order_id, "brief v2.pdf"),
            "orders/7f9c24e8-3b12-4e6f-9f39-2cbbbe2ed7ee/brief_v2.pdf"
        );
    }

    #[test]
    fn same_file_name_maps_to_the_same_key() {
        let order_id = Uuid::parse_str("7f9c24e8-3b12-4e6f-9f39-2cbbbe2ed7ee").unwrap();
        assert_eq!(
            material_key(&order_id, "brief.pdf"),
            material_key(&order_id, "brief.pdf")
        );
    }

    #[test]
    fn public_urls_use_the_bucket_host() {
        assert_eq!(
            public_url("ucpmaroc-assets", "orders/x/brief.pdf"),
            "https://ucpmaroc-assets.s3.amazonaws.com/orders/x/brief.pdf"
        );
    }
}
