//! Image storage on the local filesystem
//!
//! Files land in `<uploads_dir>/<folder>/<uuid>.<ext>`. The client file name
//! only contributes its extension.

use std::path::{Path, PathBuf};

use kanban_shared::{dtos::auth::ImageUpload, DomainError, DomainResult};
use uuid::Uuid;

pub const ALLOWED_FOLDERS: [&str; 3] = ["users", "boards", "tasks"];
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Content type for a stored image, by extension
pub fn content_type_for(file_name: &str) -> &'static str {
    match extension_of(file_name).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

fn check_folder(folder: &str) -> DomainResult<()> {
    if !ALLOWED_FOLDERS.contains(&folder) {
        return Err(DomainError::bad_request(format!(
            "Invalid type: {}. Valid ones {}",
            folder,
            ALLOWED_FOLDERS.join(", ")
        )));
    }
    Ok(())
}

fn checked_extension(file: &ImageUpload) -> DomainResult<String> {
    let extension = extension_of(&file.file_name).unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(DomainError::bad_request(format!(
            "Invalid extension: {}. Valid ones {}",
            extension,
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }
    Ok(extension)
}

/// A stored name is exactly one path component
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

#[derive(Debug, Clone)]
pub struct FileUploadService {
    root: PathBuf,
}

impl FileUploadService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Stores one image and returns its new file name
    #[tracing::instrument(skip(self, file), fields(file_name = %file.file_name))]
    pub async fn upload_single(&self, folder: &str, file: ImageUpload) -> DomainResult<String> {
        check_folder(folder)?;
        let extension = checked_extension(&file)?;
        self.write(folder, &extension, &file.data).await
    }

    /// Stores every image or none: all extensions are checked before writing
    pub async fn upload_multiple(
        &self,
        folder: &str,
        files: Vec<ImageUpload>,
    ) -> DomainResult<Vec<String>> {
        check_folder(folder)?;

        let extensions = files
            .iter()
            .map(checked_extension)
            .collect::<DomainResult<Vec<_>>>()?;

        let mut names = Vec::with_capacity(files.len());
        for (file, extension) in files.iter().zip(extensions) {
            names.push(self.write(folder, &extension, &file.data).await?);
        }

        Ok(names)
    }

    /// Path of a stored image, if the request names one that could exist
    pub fn resolve(&self, folder: &str, name: &str) -> Option<PathBuf> {
        if !ALLOWED_FOLDERS.contains(&folder) || !is_plain_name(name) {
            return None;
        }
        Some(self.root.join(folder).join(name))
    }

    /// Best-effort removal of a replaced or orphaned profile image
    pub async fn remove(&self, folder: &str, name: &str) {
        let Some(path) = self.resolve(folder, name) else {
            return;
        };

        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove file");
        }
    }

    /// Removes a just-stored file when the change that would reference it
    /// failed, then hands the result back
    pub async fn discard_on_error<T>(
        &self,
        folder: &str,
        stored: Option<&str>,
        result: DomainResult<T>,
    ) -> DomainResult<T> {
        if let (Err(_), Some(name)) = (&result, stored) {
            self.remove(folder, name).await;
        }
        result
    }

    async fn write(&self, folder: &str, extension: &str, data: &[u8]) -> DomainResult<String> {
        let dir = self.root.join(folder);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to create {}: {}", dir.display(), e)))?;

        let name = format!("{}.{}", Uuid::new_v4(), extension);
        let path = dir.join(&name);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to write {}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), bytes = data.len(), "File stored");
        Ok(name)
    }
}
