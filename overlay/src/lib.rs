//! dragonfin overlay: projects session state into a widget tree and
//! optionally paints it.
//!
//! ```text
//! Session ──capture──▶ OverlayInput ──project──▶ OverlayView ──rasterize──▶ Pixmap
//! ```

mod frame;
pub mod raster;
pub mod utils;
pub mod view;
pub mod widgets;

pub use raster::{RasterError, rasterize};
pub use view::{OverlayInput, OverlayView, PanelState, project, speed_lines};
