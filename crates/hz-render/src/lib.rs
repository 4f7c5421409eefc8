/// Terminal renderers for hozumi.
///
/// Provides the scrolling stream renderer and the fixed-grid screen renderer.
pub mod palette;
pub mod screen;
pub mod stream;

pub use screen::ScreenRenderer;
pub use stream::StreamRenderer;
