#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod config;
pub mod error;
pub mod generation;
pub mod id_generator;
pub mod input;
pub mod notifications;
pub mod panels;
pub mod payload;
pub mod results;
pub mod session;
pub mod source;
pub mod state;
pub mod stroke;
pub mod texture_manager;
pub mod tools;
pub mod upload;
pub mod util;

pub use app::SketchApp;
pub use canvas::CanvasSurface;
pub use config::AppConfig;
pub use error::{CanvasError, PipelineError, PipelineResult};
pub use generation::{GenerationOrchestrator, GenerationOutcome, InferenceTransport};
pub use payload::ImagePayload;
pub use results::ResultStore;
pub use session::{Session, SharedSession};
pub use source::{ImageChangeHandler, ImageSourceManager};
pub use tools::{ToolController, ToolType};
pub use upload::UploadAdapter;
