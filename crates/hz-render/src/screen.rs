use anyhow::{Context, Result, anyhow};
use hz_core::frame::CellGrid;
use hz_core::traits::{FrameRenderer, GridRenderer};
use ratatui::backend::Backend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::{DefaultTerminal, Terminal};

use crate::palette::grid_color;

/// Write a `CellGrid` straight into a `ratatui::Buffer`.
///
/// Cells outside `area` are dropped. The blank column following a wide
/// glyph is written as a space; ratatui skips it when flushing.
pub fn paint(buf: &mut Buffer, area: Rect, grid: &CellGrid) {
    for cy in 0..grid.height.min(area.height) {
        for cx in 0..grid.width.min(area.width) {
            let cell = grid.get(cx, cy);
            if let Some(buf_cell) = buf.cell_mut((area.x + cx, area.y + cy)) {
                buf_cell.set_char(cell.ch).set_fg(grid_color(cell.tone));
            }
        }
    }
}

/// Fixed-grid renderer on top of a ratatui terminal.
///
/// Every [`render`](FrameRenderer::render) is one `Terminal::draw`: the whole
/// grid is diffed and flushed in a single update.
///
/// # Example
/// ```
/// use hz_core::frame::{CellGrid, Line};
/// use hz_core::traits::FrameRenderer;
/// use hz_render::screen::ScreenRenderer;
/// use ratatui::{Terminal, backend::TestBackend};
///
/// let mut renderer = ScreenRenderer::new(Terminal::new(TestBackend::new(10, 2)).unwrap());
/// let mut grid = CellGrid::new(10, 2);
/// grid.write_row(0, &Line::plain("hi"));
/// renderer.render(&grid).unwrap();
/// ```
pub struct ScreenRenderer<B: Backend> {
    terminal: Terminal<B>,
}

impl ScreenRenderer<ratatui::backend::CrosstermBackend<std::io::Stdout>> {
    /// Enter the alternate screen in raw mode.
    ///
    /// The caller must call `ratatui::restore()` once done, error or not.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be initialised.
    pub fn init() -> Result<Self> {
        let terminal: DefaultTerminal =
            ratatui::try_init().context("cannot initialise the terminal")?;
        log::debug!("Alternate screen entered");
        Ok(Self::new(terminal))
    }
}

impl<B: Backend> ScreenRenderer<B> {
    /// Wrap an already initialised terminal.
    pub fn new(terminal: Terminal<B>) -> Self {
        Self { terminal }
    }

    /// Underlying terminal.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

impl<B: Backend> FrameRenderer for ScreenRenderer<B> {
    type Frame = CellGrid;

    fn render(&mut self, grid: &CellGrid) -> Result<()> {
        self.terminal
            .draw(|frame| {
                let area = frame.area();
                paint(frame.buffer_mut(), area, grid);
            })
            .map_err(|e| anyhow!("terminal draw failed: {e}"))?;
        Ok(())
    }

    fn erase(&mut self) -> Result<()> {
        // La frame suivante remplace les cellules.
        Ok(())
    }
}

impl<B: Backend> GridRenderer for ScreenRenderer<B> {
    fn dimensions(&mut self) -> Result<(u16, u16)> {
        let size = self
            .terminal
            .size()
            .map_err(|e| anyhow!("cannot query terminal size: {e}"))?;
        Ok((size.width, size.height))
    }
}
