use anyhow::Result;

use crate::frame::CellGrid;

/// Draws one frame of a display buffer and takes it back off the screen.
///
/// The caller holds the frame between [`render`](FrameRenderer::render) and
/// [`erase`](FrameRenderer::erase) through a [`Clock`](crate::clock::Clock).
///
/// Implemented by: `StreamRenderer` (`Frame = [Line]`) and `ScreenRenderer`
/// (`Frame = CellGrid`).
///
/// # Example
/// ```
/// use hz_core::traits::FrameRenderer;
/// use hz_core::frame::Line;
///
/// #[derive(Default)]
/// struct Recorder { frames: Vec<Vec<String>> }
/// impl FrameRenderer for Recorder {
///     type Frame = [Line];
///     fn render(&mut self, frame: &[Line]) -> anyhow::Result<()> {
///         self.frames.push(frame.iter().map(Line::text).collect());
///         Ok(())
///     }
///     fn erase(&mut self) -> anyhow::Result<()> { Ok(()) }
/// }
///
/// let mut rec = Recorder::default();
/// rec.render(&[Line::plain("a")]).unwrap();
/// assert_eq!(rec.frames, vec![vec!["a".to_string()]]);
/// ```
pub trait FrameRenderer {
    /// Display buffer this renderer draws.
    type Frame: ?Sized;

    /// Put `frame` on the screen.
    ///
    /// # Errors
    /// Returns an error if the terminal write fails.
    fn render(&mut self, frame: &Self::Frame) -> Result<()>;

    /// Remove exactly what the last [`render`](FrameRenderer::render) drew.
    ///
    /// # Errors
    /// Returns an error if the terminal write fails.
    fn erase(&mut self) -> Result<()>;

    /// Leave the last rendered frame where it is; the next render starts
    /// after it instead of over it.
    fn settle(&mut self) {}
}

/// Renderer drawing into a fixed cell grid sized from the terminal.
pub trait GridRenderer: FrameRenderer<Frame = CellGrid> {
    /// Terminal size as `(columns, rows)`.
    ///
    /// # Errors
    /// Returns an error if the size cannot be queried.
    fn dimensions(&mut self) -> Result<(u16, u16)>;
}
