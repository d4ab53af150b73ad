pub mod memory;
pub mod perspective;
pub mod services;

pub use memory::{InMemoryTable, InMemoryTableFactory, RecordingViewer, SurfaceEvent, SurfaceJournal};
pub use perspective::{PerspectiveTable, PerspectiveViewer, PerspectiveWorkerFactory};
