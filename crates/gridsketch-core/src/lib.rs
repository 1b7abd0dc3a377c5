//! GridSketch Core Library
//!
//! Geometry and interaction logic for the GridSketch whiteboard: freehand
//! stroke snapping, grid quantization, hit-testing and selection, shape
//! construction, closed-path detection and length measurement.

pub mod closed_path;
pub mod config;
pub mod document;
pub mod fill;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod library;
pub mod measure;
pub mod project;
pub mod selection;
pub mod session;
pub mod shapes;
pub mod snap;
pub mod storage;
pub mod stroke;
pub mod viewport;

pub use closed_path::{detect_closed_paths, ClosedPath, ClosedPathDetector};
pub use config::{ConfigError, EngineConfig};
pub use document::Drawing;
pub use fill::FillPolygon;
pub use grid::{snap_point_to_grid, snap_to_grid, GRID_PITCH};
pub use input::{Key, Modifiers, MouseButton, PointerEvent};
pub use library::{DrawingLibrary, LibraryEntry};
pub use measure::{format_measurement, MeasurementLabel};
pub use project::{ProjectError, ProjectRecord, ProjectStore};
pub use selection::{Selection, SelectionTarget};
pub use session::{InteractionState, Mode, Session};
pub use shapes::{construct, ShapeKind, TempShape};
pub use snap::{snap_stroke, SnapDirection, SnapTimer};
pub use storage::{MemoryStorage, Storage, StorageError};
pub use stroke::{Endpoint, SerializableColor, Stroke, StrokeStyle};
pub use viewport::Viewport;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
