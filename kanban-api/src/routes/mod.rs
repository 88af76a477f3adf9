/// API route handlers
///
/// Each handler turns one request into one DTO and one service call:
///
/// - `health`: database connectivity and schema version
/// - `auth`: accounts, token renewal and the emailed-link landing pages
/// - `boards`, `tasks`, `labels`: board content, owner only
/// - `upload`, `images`: image storage and retrieval
/// - `notifications`: web-push subscriptions and the VAPID public key

pub mod auth;
pub mod boards;
pub mod health;
pub mod images;
pub mod labels;
pub mod notifications;
pub mod tasks;
pub mod upload;

use axum::extract::{multipart::MultipartRejection, Multipart};
use kanban_shared::dtos::auth::ImageUpload;
use serde_json::{Map, Value};

use crate::error::{ApiError, ApiResult};

/// A multipart body split into text fields and files
#[derive(Debug, Default)]
pub(crate) struct MultipartForm {
    pub fields: Value,
    pub files: Vec<(String, ImageUpload)>,
}

impl MultipartForm {
    /// Files sent under `name`, in order
    pub fn take_files(&mut self, name: &str) -> Vec<ImageUpload> {
        let (matching, rest) = std::mem::take(&mut self.files)
            .into_iter()
            .partition::<Vec<_>, _>(|(field, _)| field == name);
        self.files = rest;
        matching.into_iter().map(|(_, file)| file).collect()
    }
}

pub(crate) async fn read_multipart(
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<MultipartForm> {
    let mut multipart =
        multipart.map_err(|e| ApiError::BadRequest(format!("Expected a multipart body: {}", e)))?;

    let mut fields = Map::new();
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;

                // Browsers send an empty part for an untouched file input
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }

                files.push((
                    name,
                    ImageUpload {
                        file_name,
                        content_type,
                        data: data.to_vec(),
                    },
                ));
            }
            None => {
                let text = field.text().await?;
                fields.insert(name, Value::String(text));
            }
        }
    }

    Ok(MultipartForm {
        fields: Value::Object(fields),
        files,
    })
}
