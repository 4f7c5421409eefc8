/// Configuration, timing, and display types for hozumi.
///
/// This crate holds everything the renderers and the sequencer share:
/// the immutable writer configuration, the timing profiles, the display
/// buffers, and the renderer capability.

pub mod clock;
pub mod config;
pub mod error;
pub mod frame;
pub mod reveal;
pub mod timing;
pub mod traits;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{DisplayMode, WriterConfig};
pub use error::CoreError;
pub use frame::{Cell, CellGrid, Dashboard, Line, Segment, Tone};
pub use timing::{SpeedTier, Timing};
pub use traits::{FrameRenderer, GridRenderer};
