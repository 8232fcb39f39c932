pub mod canvas;
pub mod common;
pub mod demo_button;
#[cfg(feature = "hydrate")]
mod dom;
pub mod drag_ghost;
pub mod drop_zone;
mod session;

pub use canvas::ErCanvas;
pub use demo_button::DemoButton;
pub use drag_ghost::DragGhost;
pub use drop_zone::DropZone;
pub use session::{WorkspaceContext, provide_workspace_context, use_workspace_context};
