use crate::payload::ImagePayload;

/// Receives image changes from a producer (canvas or upload adapter).
///
/// `None` is an explicit clear, not "nothing happened": producers only call
/// this when the input image actually changed.
pub trait ImageChangeHandler {
    fn handle_image_change(&mut self, image: Option<ImagePayload>);

    /// Id of the image the handler currently holds, when it keeps one
    fn current_image_id(&self) -> Option<usize> {
        None
    }
}

/// Contents of the current-input slot
#[derive(Debug, Clone, Default)]
pub enum SourceSlot {
    /// Nothing has been produced yet this session
    #[default]
    Unset,
    /// A producer explicitly removed the image
    Cleared,
    Set(ImagePayload),
}

/// Single point of truth for the image about to be sent for generation.
#[derive(Debug, Default)]
pub struct ImageSourceManager {
    slot: SourceSlot,
}

impl ImageSourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_current(&mut self, image: Option<ImagePayload>) {
        self.slot = match image {
            Some(image) => {
                log::debug!("Current input image set: {:?}", image);
                SourceSlot::Set(image)
            }
            None => {
                log::debug!("Current input image cleared");
                SourceSlot::Cleared
            }
        };
    }

    pub fn current(&self) -> Option<&ImagePayload> {
        match &self.slot {
            SourceSlot::Set(image) => Some(image),
            _ => None,
        }
    }

    pub fn slot(&self) -> &SourceSlot {
        &self.slot
    }

    pub fn has_image(&self) -> bool {
        self.current().is_some()
    }
}

impl ImageChangeHandler for ImageSourceManager {
    fn handle_image_change(&mut self, image: Option<ImagePayload>) {
        self.set_current(image);
    }

    fn current_image_id(&self) -> Option<usize> {
        self.current().map(ImagePayload::id)
    }
}
