use std::{
    io,
    path::{Path, PathBuf},
};

use log::*;

use crate::{
    errors::{AppError, AppResult},
    form::Attachment,
};

pub const FILE_URI_PREFIX: &str = "file://";

pub const CAMERA_DENIED: &str = "Camera access is required!";

/// What a document picker hands back for a single chosen file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedDocument {
    pub uri: String,
    pub name: String,
    pub mime_type: Option<String>,
}

impl From<PickedDocument> for Attachment {
    fn from(doc: PickedDocument) -> Self {
        Attachment::document(doc.uri, doc.name, doc.mime_type)
    }
}

/// Camera and file-picker capabilities of the host platform.
///
/// `Ok(None)` means the user backed out; denied access is
/// [`AppError::PermissionDenied`].
pub trait AttachmentPicker {
    /// Returns the URI of the captured image.
    fn capture_photo(&self) -> AppResult<Option<String>>;

    fn pick_document(&self) -> AppResult<Option<PickedDocument>>;
}

pub fn local_path(uri: &str) -> &Path {
    Path::new(uri.strip_prefix(FILE_URI_PREFIX).unwrap_or(uri))
}

pub fn file_uri(path: &Path) -> String {
    format!("{FILE_URI_PREFIX}{}", path.display())
}

pub async fn read_content(attachment: &Attachment) -> AppResult<Vec<u8>> {
    let path = local_path(attachment.uri());

    tokio::fs::read(path)
        .await
        .map_err(|source| AppError::AttachmentUnreadable {
            path: path.display().to_string(),
            source,
        })
}

/// Picker backed by paths given up front, for hosts without native pickers.
#[derive(Debug, Default, Clone)]
pub struct PathPicker {
    pub photo: Option<PathBuf>,
    pub document: Option<PathBuf>,
    pub mime_type: Option<String>,
}

impl PathPicker {
    fn resolve(path: &Path) -> AppResult<PathBuf> {
        path.canonicalize()
            .map_err(|source| AppError::AttachmentUnreadable {
                path: path.display().to_string(),
                source,
            })
            .and_then(|resolved| {
                if resolved.is_file() {
                    Ok(resolved)
                } else {
                    Err(AppError::AttachmentUnreadable {
                        path: path.display().to_string(),
                        source: io::Error::other("not a regular file"),
                    })
                }
            })
    }
}

impl AttachmentPicker for PathPicker {
    fn capture_photo(&self) -> AppResult<Option<String>> {
        let Some(path) = &self.photo else {
            return Ok(None);
        };

        let uri = file_uri(&Self::resolve(path)?);
        debug!("Camera image URI: {uri}");

        Ok(Some(uri))
    }

    fn pick_document(&self) -> AppResult<Option<PickedDocument>> {
        let Some(path) = &self.document else {
            return Ok(None);
        };

        let resolved = Self::resolve(path)?;
        let name = resolved
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let doc = PickedDocument {
            uri: file_uri(&resolved),
            name,
            mime_type: self.mime_type.clone(),
        };
        debug!("Selected file: {doc:?}");

        Ok(Some(doc))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn file_prefix_is_stripped_for_reading() {
        assert_eq!(local_path("file:///x/id.pdf"), Path::new("/x/id.pdf"));
        assert_eq!(local_path("/x/id.pdf"), Path::new("/x/id.pdf"));
        assert_eq!(local_path("content://x/id.pdf"), Path::new("content://x/id.pdf"));
    }

    #[tokio::test]
    async fn content_is_read_through_file_uri() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.4").unwrap();

        let attachment = Attachment::document(file_uri(file.path()), "id.pdf", None);

        assert_eq!(read_content(&attachment).await.unwrap(), b"%PDF-1.4");
    }

    #[tokio::test]
    async fn missing_file_is_reported_with_its_path() {
        let attachment = Attachment::photo("file:///definitely/not/here.jpg");
        let err = read_content(&attachment).await.unwrap_err();

        assert!(
            matches!(err, AppError::AttachmentUnreadable { ref path, .. } if path == "/definitely/not/here.jpg")
        );
    }

    #[test]
    fn path_picker_names_documents_after_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("id.pdf");
        std::fs::write(&path, b"pdf").unwrap();

        let picker = PathPicker {
            document: Some(path),
            mime_type: Some("application/pdf".to_owned()),
            ..Default::default()
        };

        let doc = picker.pick_document().unwrap().unwrap();
        assert_eq!(doc.name, "id.pdf");
        assert!(doc.uri.starts_with("file://"));
        assert!(picker.capture_photo().unwrap().is_none());

        let attachment = Attachment::from(doc);
        assert_eq!(attachment.mime_type(), "application/pdf");
    }

    #[test]
    fn path_picker_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        let picker = PathPicker {
            photo: Some(dir.path().to_owned()),
            ..Default::default()
        };

        assert!(matches!(
            picker.capture_photo(),
            Err(AppError::AttachmentUnreadable { .. })
        ));
    }
}
