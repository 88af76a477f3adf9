/// Image upload endpoints
///
/// - `POST /api/upload/single/:type` - one multipart `file`, returns `{fileName}`
/// - `POST /api/upload/multiple/:type` - repeated `file` parts, returns `{fileNames}`

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Request bodies above this are rejected with 413
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

fn no_files() -> ApiError {
    ApiError::BadRequest("No files were selected".to_string())
}

pub async fn upload_single(
    State(state): State<AppState>,
    Path(folder): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Value>> {
    let mut form = super::read_multipart(multipart).await?;
    let file = form.take_files("file").into_iter().next().ok_or_else(no_files)?;

    let name = state.uploads().upload_single(&folder, file).await?;
    Ok(Json(json!({ "fileName": name })))
}

pub async fn upload_multiple(
    State(state): State<AppState>,
    Path(folder): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Value>> {
    let mut form = super::read_multipart(multipart).await?;
    let files = form.take_files("file");
    if files.is_empty() {
        return Err(no_files());
    }

    let names = state.uploads().upload_multiple(&folder, files).await?;
    Ok(Json(json!({ "fileNames": names })))
}
