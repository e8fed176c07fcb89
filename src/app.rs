use futures::channel::oneshot;

use crate::canvas::CanvasSurface;
use crate::config::AppConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::generation::{GenerationOrchestrator, GenerationOutcome, HttpTransport};
use crate::input::{InputEvent, InputHandler};
use crate::notifications::Notifications;
use crate::panels;
use crate::payload::ImagePayload;
use crate::session::{InputMode, Session, SharedSession};
use crate::source::ImageChangeHandler;
use crate::texture_manager::TextureManager;
use crate::tools::ToolController;
use crate::upload::{SelectionOrigin, UploadAdapter, UploadedFile};

const TEXTURE_CACHE_SIZE: usize = 8;

struct PendingUpload {
    file: UploadedFile,
    origin: SelectionOrigin,
    receiver: oneshot::Receiver<PipelineResult<ImagePayload>>,
}

/// The desktop shell. Owns the canvas and the session, and runs network and
/// file work on a background runtime whose results are collected each frame.
pub struct SketchApp {
    pub(crate) config: AppConfig,
    pub(crate) session: SharedSession,
    pub(crate) canvas: CanvasSurface,
    pub(crate) tools: ToolController,
    pub(crate) uploads: UploadAdapter,
    pub(crate) input: InputHandler,
    pub(crate) textures: TextureManager,
    pub(crate) notifications: Notifications,
    orchestrator: GenerationOrchestrator<HttpTransport>,
    runtime: tokio::runtime::Runtime,
    pending_generation: Option<oneshot::Receiver<PipelineResult<GenerationOutcome>>>,
    pending_upload: Option<PendingUpload>,
}

impl SketchApp {
    /// Called once before the first frame.
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: AppConfig,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        config.validate()?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("sketch-vision-io")
            .enable_all()
            .build()?;
        let transport = HttpTransport::new(&config)?;
        let orchestrator = GenerationOrchestrator::new(transport, &config);
        log::info!("Using inference endpoint {}", orchestrator.endpoint());

        let canvas = CanvasSurface::default();
        let tools = ToolController::new(canvas.background());
        let input = InputHandler::new(canvas.size());

        Ok(Self {
            config,
            session: Session::shared(),
            canvas,
            tools,
            uploads: UploadAdapter::new(),
            input,
            textures: TextureManager::new(TEXTURE_CACHE_SIZE),
            notifications: Notifications::default(),
            orchestrator,
            runtime,
            pending_generation: None,
            pending_upload: None,
        })
    }

    pub(crate) fn is_generating(&self) -> bool {
        self.pending_generation.is_some() || self.orchestrator.is_in_flight()
    }

    pub(crate) fn is_uploading(&self) -> bool {
        self.pending_upload.is_some()
    }

    pub(crate) fn set_mode(&mut self, mode: InputMode) {
        self.session.lock().set_mode(mode);
    }

    /// Route pointer events from the canvas widget to the surface
    pub(crate) fn handle_canvas_events(&mut self, events: Vec<InputEvent>) {
        for event in events {
            let result = match event {
                InputEvent::PointerDown { location } if location.is_in_canvas => {
                    self.canvas.begin_stroke(location.position, self.tools.brush())
                }
                InputEvent::PointerDown { .. } => Ok(()),
                InputEvent::PointerMove { location } => {
                    if self.canvas.is_drawing() {
                        self.canvas.extend_stroke(location.position)
                    } else {
                        Ok(())
                    }
                }
                InputEvent::PointerUp { .. } => {
                    if self.canvas.is_drawing() {
                        let mut session = self.session.lock();
                        self.canvas.end_stroke(&mut session.source)
                    } else {
                        Ok(())
                    }
                }
            };

            if let Err(e) = result {
                log::warn!("Canvas input ignored: {}", e);
            }
        }
    }

    pub(crate) fn clear_canvas(&mut self) {
        let mut session = self.session.lock();
        self.canvas.clear(&mut session.source);
    }

    /// Reset input, result and both producers
    pub(crate) fn clear_all(&mut self) {
        let mut session = self.session.lock();
        session.clear_all();
        self.canvas.clear(&mut session.source);
        self.uploads.reset();
    }

    pub(crate) fn remove_upload(&mut self) {
        let mut session = self.session.lock();
        self.uploads.remove_image(&mut session.source);
    }

    pub(crate) fn pick_file(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp", "bmp"])
            .pick_file();

        if let Some(path) = picked {
            self.start_upload(UploadedFile::from_path(path), SelectionOrigin::Picker);
        }
    }

    /// Decode a file in the background; one upload at a time
    pub(crate) fn start_upload(&mut self, file: UploadedFile, origin: SelectionOrigin) {
        if self.pending_upload.is_some() {
            log::warn!("Upload of {} ignored, another file is still loading", file.name);
            return;
        }
        let current_id = self.session.lock().source.current_image_id();
        if self.uploads.is_retained(&file, origin, current_id) {
            log::debug!("{} is already the selected file", file.name);
            return;
        }

        let (sender, receiver) = oneshot::channel();
        let task_file = file.clone();
        self.runtime.spawn(async move {
            let decoded = UploadAdapter::decode(&task_file).await;
            let _ = sender.send(decoded);
        });

        self.pending_upload = Some(PendingUpload {
            file,
            origin,
            receiver,
        });
    }

    /// Kick off a generation. The trigger is disabled while one is running,
    /// this is the guard behind it.
    pub(crate) fn start_generation(&mut self) {
        if self.is_generating() {
            log::warn!("Generation already in progress");
            return;
        }

        let (sender, receiver) = oneshot::channel();
        let orchestrator = self.orchestrator.clone();
        let session = self.session.clone();
        self.runtime.spawn(async move {
            let result = orchestrator.generate(&session).await;
            let _ = sender.send(result);
        });

        self.pending_generation = Some(receiver);
    }

    pub(crate) fn export_result(&mut self) {
        let exported = self.session.lock().results.export(&self.config.export_dir);
        match exported {
            Ok(Some(path)) => self
                .notifications
                .success(format!("Saved to {}", path.display())),
            Ok(None) => {}
            Err(e) => {
                log::error!("Export failed: {}", e);
                self.notifications.error(format!("Could not save the image: {}", e));
            }
        }
    }

    fn poll_background_work(&mut self) {
        if let Some(receiver) = &mut self.pending_generation {
            match receiver.try_recv() {
                Ok(Some(result)) => {
                    self.pending_generation = None;
                    match result {
                        Ok(GenerationOutcome::Stored(_)) => {
                            self.notifications.success("Image generated successfully!")
                        }
                        Ok(GenerationOutcome::Discarded(_)) => {
                            log::info!("Generated image arrived after Clear All, not shown");
                        }
                        Err(e) => {
                            log::error!("Generation error: {}", e);
                            self.notifications
                                .error("Failed to generate image. Please try again.");
                        }
                    }
                }
                Ok(None) => {}
                Err(_) => {
                    self.pending_generation = None;
                    log::error!("Generation task ended without a result");
                    self.notifications
                        .error("Failed to generate image. Please try again.");
                }
            }
        }

        let finished = match &mut self.pending_upload {
            Some(pending) => match pending.receiver.try_recv() {
                Ok(Some(decoded)) => Some(decoded),
                Ok(None) => None,
                Err(_) => Some(Err(PipelineError::FileRead("upload task was dropped".into()))),
            },
            None => None,
        };

        if let Some(decoded) = finished {
            if let Some(pending) = self.pending_upload.take() {
                let mut session = self.session.lock();
                let accepted =
                    self.uploads
                        .accept(&pending.file, pending.origin, decoded, &mut session.source);
                drop(session);

                match accepted {
                    Ok(()) => self.notifications.success("Image uploaded successfully!"),
                    Err(PipelineError::InvalidFileType { .. }) => {
                        self.notifications.error("Please select a valid image file")
                    }
                    Err(e) => self.notifications.error(e.to_string()),
                }
            }
        }
    }

    fn collect_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() || self.session.lock().mode() != InputMode::Upload {
            return;
        }

        // Only the first file counts, like a single-file drop zone
        if let Some(file) = dropped.first().and_then(UploadedFile::from_dropped) {
            log::info!("File dropped: {}", file.name);
            self.start_upload(file, SelectionOrigin::Drop);
        }
    }
}

impl eframe::App for SketchApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.textures.begin_frame();
        self.poll_background_work();
        self.collect_dropped_files(ctx);

        panels::header_panel(ctx);
        panels::central_panel(self, ctx);
        panels::notifications_overlay(self, ctx);

        if self.is_generating() || self.is_uploading() || !self.notifications.is_empty() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
