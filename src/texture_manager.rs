use std::collections::HashMap;

use egui::{ColorImage, Context, TextureHandle, TextureOptions};
use image::RgbaImage;
use thiserror::Error;

use crate::payload::ImagePayload;

/// Errors that can occur during texture generation
#[derive(Error, Debug)]
pub enum TextureGenerationError {
    #[error("Failed to decode image payload: {0}")]
    DecodeFailed(String),
}

/// Caches preview textures keyed by (owner id, version).
///
/// Only the newest version of each owner is kept; older ones are released
/// as soon as a newer one is uploaded.
pub struct TextureManager {
    texture_cache: HashMap<(usize, u64), TextureHandle>,
    /// Tracks when each texture was last used
    last_used: HashMap<(usize, u64), u64>,
    /// Current frame counter for LRU tracking
    current_frame: u64,
    max_cache_size: usize,
    /// Keys whose generator failed, with the reason; never retried
    failed: HashMap<(usize, u64), String>,
}

impl std::fmt::Debug for TextureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureManager")
            .field("cached", &self.texture_cache.len())
            .field("current_frame", &self.current_frame)
            .field("max_cache_size", &self.max_cache_size)
            .field("failed", &self.failed.len())
            .finish()
    }
}

impl TextureManager {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            texture_cache: HashMap::new(),
            last_used: HashMap::new(),
            current_frame: 0,
            max_cache_size: max_cache_size.max(1),
            failed: HashMap::new(),
        }
    }

    /// Should be called at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Gets or creates the texture for `owner_id` at `version`
    pub fn get_or_create_texture<F>(
        &mut self,
        owner_id: usize,
        version: u64,
        generator: F,
        ctx: &Context,
    ) -> Result<TextureHandle, TextureGenerationError>
    where
        F: FnOnce() -> Result<ColorImage, TextureGenerationError>,
    {
        let cache_key = (owner_id, version);

        if let Some(handle) = self.texture_cache.get(&cache_key) {
            self.last_used.insert(cache_key, self.current_frame);
            return Ok(handle.clone());
        }

        if let Some(reason) = self.failed.get(&cache_key) {
            return Err(TextureGenerationError::DecodeFailed(reason.clone()));
        }

        let image = match generator() {
            Ok(image) => image,
            Err(TextureGenerationError::DecodeFailed(reason)) => {
                log::warn!("No preview for {} v{}: {}", owner_id, version, reason);
                self.failed.insert(cache_key, reason.clone());
                return Err(TextureGenerationError::DecodeFailed(reason));
            }
        };

        self.invalidate_owner(owner_id);
        self.prune_cache_if_needed();

        let name = format!("preview_{}_v{}", owner_id, version);
        let handle = ctx.load_texture(name, image, TextureOptions::LINEAR);

        self.texture_cache.insert(cache_key, handle.clone());
        self.last_used.insert(cache_key, self.current_frame);

        Ok(handle)
    }

    /// Drops every cached version belonging to `owner_id`
    pub fn invalidate_owner(&mut self, owner_id: usize) {
        self.texture_cache.retain(|(id, _), _| *id != owner_id);
        self.last_used.retain(|(id, _), _| *id != owner_id);
        self.failed.retain(|(id, _), _| *id != owner_id);
    }

    /// Evict least recently used entries until there is room for one more
    fn prune_cache_if_needed(&mut self) {
        if self.texture_cache.len() < self.max_cache_size {
            return;
        }

        let mut entries: Vec<((usize, u64), u64)> =
            self.last_used.iter().map(|(k, v)| (*k, *v)).collect();

        // Oldest first
        entries.sort_by_key(|(_, frame)| *frame);

        let to_remove = entries.len() + 1 - self.max_cache_size;
        for (key, _) in entries.iter().take(to_remove) {
            self.texture_cache.remove(key);
            self.last_used.remove(key);
        }
    }

    pub fn cache_size(&self) -> usize {
        self.texture_cache.len()
    }

    #[cfg(test)]
    fn get_texture(&self, owner_id: usize, version: u64) -> Option<&TextureHandle> {
        self.texture_cache.get(&(owner_id, version))
    }
}

/// Decode a payload into an uploadable image
pub fn payload_image(payload: &ImagePayload) -> Result<ColorImage, TextureGenerationError> {
    let bytes = payload
        .decode_bytes()
        .map_err(|e| TextureGenerationError::DecodeFailed(e.to_string()))?;
    let image = image::load_from_memory(&bytes)
        .map_err(|e| TextureGenerationError::DecodeFailed(e.to_string()))?;
    Ok(rgba_image(&image.to_rgba8()))
}

pub fn rgba_image(pixels: &RgbaImage) -> ColorImage {
    let size = [pixels.width() as usize, pixels.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, pixels.as_raw())
}
