use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{PipelineError, PipelineResult};
use crate::payload::ImagePayload;
use crate::source::ImageChangeHandler;

/// Where the bytes of a user-supplied file live
#[derive(Debug, Clone)]
pub enum FileContents {
    Bytes(Arc<[u8]>),
    Path(PathBuf),
}

/// A file handed over by the file picker or by drag-and-drop.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    /// Declared media type, empty when the platform did not provide one
    pub mime: String,
    pub contents: FileContents,
}

/// How the file reached the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOrigin {
    /// Explicit file selection; choosing the retained file again is a no-op
    Picker,
    Drop,
}

impl UploadedFile {
    pub fn from_bytes(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            contents: FileContents::Bytes(bytes.into()),
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            mime: String::new(),
            contents: FileContents::Path(path),
        }
    }

    /// Convert a file dropped onto the window. Returns `None` when the
    /// platform gave us neither bytes nor a path.
    pub fn from_dropped(file: &egui::DroppedFile) -> Option<Self> {
        let contents = if let Some(bytes) = &file.bytes {
            FileContents::Bytes(bytes.clone())
        } else if let Some(path) = &file.path {
            FileContents::Path(path.clone())
        } else {
            log::warn!("Dropped file has no accessible data: {}", file.name);
            return None;
        };

        let name = match (&file.path, file.name.is_empty()) {
            (Some(path), true) => path.display().to_string(),
            (None, true) => "unknown".to_owned(),
            _ => file.name.clone(),
        };

        Some(Self {
            name,
            mime: file.mime.clone(),
            contents,
        })
    }

    /// Identity used to recognise a re-selection of the same file
    pub fn handle(&self) -> String {
        match &self.contents {
            FileContents::Path(path) => path.display().to_string(),
            FileContents::Bytes(bytes) => format!("{}:{}", self.name, bytes.len()),
        }
    }

    /// Declared media type, or one inferred from the extension when the
    /// platform did not declare any.
    pub fn media_type(&self) -> Option<String> {
        if !self.mime.is_empty() {
            return Some(self.mime.clone());
        }

        let extension = match &self.contents {
            FileContents::Path(path) => extension_of(path),
            FileContents::Bytes(_) => extension_of(Path::new(&self.name)),
        }?;

        let mime = match extension.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "bmp" => "image/bmp",
            _ => return None,
        };
        Some(mime.to_owned())
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Turns user-supplied files into image payloads and feeds them to the
/// current-input slot.
///
/// Drag-and-drop and explicit selection share [`UploadAdapter::select`], so
/// both reject non-image files the same way.
#[derive(Debug, Default)]
pub struct UploadAdapter {
    /// The last accepted file, like the value of a file input
    selection: Option<Selection>,
}

#[derive(Debug, Clone)]
struct Selection {
    handle: String,
    name: String,
    /// Payload this file produced; the selection only counts while it is
    /// still the current input
    payload_id: usize,
}

impl UploadAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.handle.as_str())
    }

    /// Name of the uploaded file when its image is still the current input
    pub fn uploaded_name(&self, current_id: Option<usize>) -> Option<&str> {
        self.selection
            .as_ref()
            .filter(|s| Some(s.payload_id) == current_id)
            .map(|s| s.name.as_str())
    }

    /// True when picking `file` again would not trigger a new decode.
    ///
    /// Only holds while the image the file produced is still current; once
    /// another producer replaced it, picking the file again reloads it.
    pub fn is_retained(
        &self,
        file: &UploadedFile,
        origin: SelectionOrigin,
        current_id: Option<usize>,
    ) -> bool {
        origin == SelectionOrigin::Picker
            && self.selection.as_ref().is_some_and(|s| {
                s.handle == file.handle() && Some(s.payload_id) == current_id
            })
    }

    /// Read a file into a payload. The bytes are embedded unchanged.
    pub async fn decode(file: &UploadedFile) -> PipelineResult<ImagePayload> {
        let mime = file
            .media_type()
            .filter(|mime| mime.starts_with("image/"))
            .ok_or_else(|| PipelineError::InvalidFileType {
                mime: file.mime.clone(),
            })?;

        let bytes: Vec<u8> = match &file.contents {
            FileContents::Bytes(bytes) => bytes.to_vec(),
            FileContents::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| PipelineError::FileRead(format!("{}: {}", path.display(), e)))?,
        };

        log::info!("Decoded upload {} ({}, {} bytes)", file.name, mime, bytes.len());
        Ok(ImagePayload::from_bytes(&mime, &bytes))
    }

    /// Decode `file` and publish it as the current input image.
    ///
    /// Returns `Ok(false)` when the file was picked again while its image is
    /// still the current input, and nothing was done.
    pub async fn select(
        &mut self,
        file: &UploadedFile,
        origin: SelectionOrigin,
        handler: &mut dyn ImageChangeHandler,
    ) -> PipelineResult<bool> {
        if self.is_retained(file, origin, handler.current_image_id()) {
            log::debug!("File {} is already selected", file.name);
            return Ok(false);
        }

        let decoded = Self::decode(file).await;
        self.accept(file, origin, decoded, handler)?;
        Ok(true)
    }

    /// Apply the outcome of a decode started elsewhere. A failed decode
    /// leaves the input slot and the retained selection untouched.
    pub fn accept(
        &mut self,
        file: &UploadedFile,
        origin: SelectionOrigin,
        decoded: PipelineResult<ImagePayload>,
        handler: &mut dyn ImageChangeHandler,
    ) -> PipelineResult<()> {
        let payload = decoded.inspect_err(|e| log::warn!("Rejected upload {}: {}", file.name, e))?;

        self.selection = Some(Selection {
            handle: file.handle(),
            name: file.name.clone(),
            payload_id: payload.id(),
        });
        handler.handle_image_change(Some(payload));
        Ok(())
    }

    /// Remove the uploaded image and forget the retained selection so the
    /// same file can be chosen again.
    pub fn remove_image(&mut self, handler: &mut dyn ImageChangeHandler) {
        self.reset();
        handler.handle_image_change(None);
    }

    /// Forget the retained selection without touching the input slot
    pub fn reset(&mut self) {
        self.selection = None;
    }
}
