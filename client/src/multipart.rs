use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::ApiError;
use crate::record::display_value;

/// Appends every field as a text part.
///
/// `null` is skipped; strings go as-is; anything else as its JSON text.
pub fn text_fields(mut form: Form, fields: &Map<String, Value>) -> Form {
    for (key, value) in fields {
        if value.is_null() {
            continue;
        }
        form = form.text(key.clone(), display_value(value));
    }
    form
}

/// Reads an upload from disk, typed by extension.
pub async fn file_part(path: &Path) -> Result<Part, ApiError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("cannot read {}: {e}", path.display())))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime.as_ref())
        .map_err(|e| ApiError::InvalidRequest(format!("bad content type {mime}: {e}")))
}

/// Appends a file part when a path was given.
pub async fn optional_file(form: Form, field: &str, path: Option<&Path>) -> Result<Form, ApiError> {
    match path {
        Some(path) => Ok(form.part(field.to_string(), file_part(path).await?)),
        None => Ok(form),
    }
}
