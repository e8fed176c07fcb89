mod canvas_panel;
mod central_panel;
mod notifications_panel;
mod preview_panel;
mod tools_panel;
mod upload_panel;

pub use canvas_panel::canvas_panel;
pub use central_panel::{central_panel, header_panel};
pub use notifications_panel::notifications_overlay;
pub use preview_panel::preview_panel;
pub use tools_panel::tools_panel;
pub use upload_panel::upload_panel;
