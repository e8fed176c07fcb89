use std::path::{Path, PathBuf};

use crate::error::PipelineResult;
use crate::payload::ImagePayload;

pub const EXPORT_FILE_NAME: &str = "ai-generated-image.png";

/// Holds the last generated image and saves it on request.
#[derive(Debug, Default)]
pub struct ResultStore {
    generated: Option<ImagePayload>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, payload: ImagePayload) {
        log::debug!("Generated image stored: {:?}", payload);
        self.generated = Some(payload);
    }

    pub fn get(&self) -> Option<&ImagePayload> {
        self.generated.as_ref()
    }

    pub fn clear(&mut self) {
        self.generated = None;
    }

    pub fn can_export(&self) -> bool {
        self.generated.is_some()
    }

    /// Write the stored image to `dir/ai-generated-image.png`.
    ///
    /// Does nothing and returns `Ok(None)` when there is no result. The bytes
    /// written are exactly the ones the payload carries.
    pub fn export(&self, dir: &Path) -> PipelineResult<Option<PathBuf>> {
        let Some(payload) = &self.generated else {
            log::debug!("Nothing to export");
            return Ok(None);
        };

        let bytes = payload.decode_bytes()?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(EXPORT_FILE_NAME);
        std::fs::write(&path, &bytes)?;

        log::info!("Exported generated image to {} ({} bytes)", path.display(), bytes.len());
        Ok(Some(path))
    }
}
