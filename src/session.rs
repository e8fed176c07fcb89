use std::sync::Arc;

use parking_lot::Mutex;

use crate::results::ResultStore;
use crate::source::ImageSourceManager;

/// Which input tab is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Draw,
    Upload,
}

impl InputMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draw => "Draw",
            Self::Upload => "Upload",
        }
    }
}

/// Application state shared between the UI thread and generation tasks.
#[derive(Debug, Default)]
pub struct Session {
    pub source: ImageSourceManager,
    pub results: ResultStore,
    mode: InputMode,
    /// Incremented by every clear-all; lets late responses be recognised
    epoch: u64,
}

pub type SharedSession = Arc<Mutex<Session>>;

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedSession {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Empty both the input and the result slot. Any request still in flight
    /// is not cancelled.
    pub fn clear_all(&mut self) {
        self.source.set_current(None);
        self.results.clear();
        self.epoch += 1;
        log::info!("Session cleared (epoch {})", self.epoch);
    }
}
