pub mod backend;
pub mod catalog;
pub mod decorations;
pub mod draw;
pub mod frame;

pub use backend::{DrawCommand, RecordingBackend, RenderBackend, SkyBuffer, SkyVertex};
pub use catalog::{EntryId, SkyboxCatalog};
pub use decorations::DecorationCoordinator;
pub use draw::DrawSkybox;
pub use frame::{FrameContext, FrameOutput};
