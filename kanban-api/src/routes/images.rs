/// `GET /api/images/:type/:img`
///
/// Serves a stored image. Unknown folders, unknown files and unsafe names
/// all get the placeholder image instead of an error.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{app::AppState, services::file_upload::content_type_for};

const PLACEHOLDER: &[u8] = include_bytes!("../../assets/no-image.svg");

pub async fn get_image(
    State(state): State<AppState>,
    Path((folder, image)): Path<(String, String)>,
) -> Response {
    if let Some(path) = state.uploads().resolve(&folder, &image) {
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                return ([(header::CONTENT_TYPE, content_type_for(&image))], bytes).into_response()
            }
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read image");
            }
            Err(_) => {}
        }
    }

    ([(header::CONTENT_TYPE, "image/svg+xml")], PLACEHOLDER).into_response()
}
