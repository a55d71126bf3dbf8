//! Profile image intake: multipart parsing, type and size checks, and the
//! on-disk store served under `/uploads`.

use std::path::Path;

use actix_multipart::Multipart;
use futures::TryStreamExt;
use uuid::Uuid;

use crate::error::ApiError;

pub const IMAGE_FIELD: &str = "image";
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Extensions a filename may contribute when the content type is an
/// unlisted `image/*`.
const RASTER_EXTENSIONS: &[&str] = &["avif", "bmp", "heic", "heif", "ico", "jxl", "tif", "tiff"];

#[derive(Debug)]
pub struct ImageUpload {
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// Picks a file extension for an accepted image, rejecting anything whose
/// declared content type is not `image/*`, and SVG.
pub fn image_extension(content_type: Option<&str>, filename: Option<&str>) -> Result<String, ApiError> {
    let content_type = content_type
        .map(str::to_ascii_lowercase)
        .filter(|value| value.starts_with("image/"))
        .ok_or_else(|| ApiError::invalid_upload("Only image files are allowed"))?;
    if content_type.starts_with("image/svg") {
        return Err(ApiError::invalid_upload("SVG images are not allowed"));
    }

    let known = match content_type.as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    };
    if let Some(extension) = known {
        return Ok(extension.to_string());
    }

    let from_name = filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| RASTER_EXTENSIONS.contains(&ext.as_str()));
    Ok(from_name.unwrap_or_else(|| "img".to_string()))
}

fn malformed(err: impl std::fmt::Display) -> ApiError {
    ApiError::invalid_upload(format!("Malformed upload: {err}"))
}

/// Reads the `image` field, failing as soon as it exceeds `max_bytes`.
pub async fn read_image(mut payload: Multipart, max_bytes: usize) -> Result<ImageUpload, ApiError> {
    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        if field.name() != Some(IMAGE_FIELD) {
            while field.try_next().await.map_err(malformed)?.is_some() {}
            continue;
        }

        let content_type = field.content_type().map(|mime| mime.essence_str().to_string());
        let filename = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .map(str::to_string);
        let extension = image_extension(content_type.as_deref(), filename.as_deref())?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(malformed)? {
            if bytes.len() + chunk.len() > max_bytes {
                return Err(ApiError::invalid_upload(format!(
                    "Image exceeds the {} byte limit",
                    max_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        if bytes.is_empty() {
            return Err(ApiError::invalid_upload("Uploaded image is empty"));
        }
        return Ok(ImageUpload { extension, bytes });
    }

    Err(ApiError::invalid_upload("No image was uploaded"))
}

/// Writes the image under a fresh name and returns that name.
pub async fn store_image(dir: &Path, upload: &ImageUpload) -> Result<String, ApiError> {
    let file_name = format!("{}.{}", Uuid::new_v4(), upload.extension);
    tokio::fs::write(dir.join(&file_name), &upload.bytes)
        .await
        .map_err(|err| ApiError::internal(format!("storing upload failed: {err}")))?;
    Ok(file_name)
}

pub async fn discard_image(dir: &Path, file_name: &str) {
    if let Err(err) = tokio::fs::remove_file(dir.join(file_name)).await {
        log::warn!("Could not remove orphaned upload {file_name}: {err}");
    }
}

pub fn public_url(file_name: &str) -> String {
    format!("{PUBLIC_PREFIX}/{file_name}")
}
