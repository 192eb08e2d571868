use anyhow::Context;
use bytes::Bytes;
use uuid::Uuid;

use crate::state::AppState;

pub const PRESIGN_TTL_SECS: u64 = 30 * 60;
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub struct UploadItem<'a> {
    pub body: Bytes,
    pub content_type: &'a str,
}

pub fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

pub fn recipe_image_key(user_id: Uuid, recipe_id: Uuid, ext: &str) -> String {
    format!("recipes/{}/{}-{}.{}", user_id, recipe_id, Uuid::new_v4(), ext)
}

/// Stores one recipe image and returns its object key. Unknown content types are refused.
pub async fn upload_recipe_image(
    st: &AppState,
    user_id: Uuid,
    recipe_id: Uuid,
    img: UploadItem<'_>,
) -> anyhow::Result<String> {
    anyhow::ensure!(!img.body.is_empty(), "empty image");
    let ext = ext_from_mime(img.content_type)
        .with_context(|| format!("unsupported content type {}", img.content_type))?;
    let key = recipe_image_key(user_id, recipe_id, ext);
    st.storage
        .put_object(&key, img.body, img.content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;
    Ok(key)
}

pub async fn presign(st: &AppState, key: &str) -> anyhow::Result<String> {
    st.storage
        .presign_get(key, PRESIGN_TTL_SECS)
        .await
        .with_context(|| format!("presign url for key {}", key))
}

/// Best-effort removal of a replaced or orphaned object.
pub async fn discard(st: &AppState, key: &str) {
    if let Err(e) = st.storage.delete_object(key).await {
        tracing::warn!(error = %e, key, "delete_object failed");
    }
}
