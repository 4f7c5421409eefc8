use std::io::Write;

use anyhow::Result;
use crossterm::cursor::MoveUp;
use crossterm::queue;
use crossterm::style::{Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use hz_core::frame::{Line, drawn_glyph};
use hz_core::traits::FrameRenderer;

use crate::palette::stream_color;

/// How many columns a printed line may use before the terminal wraps it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Columns {
    /// Ask the terminal at every render.
    Terminal,
    /// Fixed width (tests, or a known pane).
    Fixed(u16),
}

/// Scrolling-mode renderer: prints lines, then erases them with cursor moves.
///
/// Keeps count of the terminal rows it printed since the last erase, wrapped
/// rows included, so `erase` removes exactly that many rows.
///
/// # Example
/// ```
/// use hz_core::frame::{Line, drawn_glyph};
/// use hz_core::traits::FrameRenderer;
/// use hz_render::stream::StreamRenderer;
///
/// let mut renderer = StreamRenderer::new(Vec::new()).with_columns(80);
/// renderer.render(&[Line::plain("ほずみ")]).unwrap();
/// assert_eq!(renderer.printed_rows(), 1);
/// renderer.erase().unwrap();
/// assert_eq!(renderer.printed_rows(), 0);
/// ```
pub struct StreamRenderer<W: Write> {
    out: W,
    printed_rows: usize,
    columns: Columns,
}

impl<W: Write> StreamRenderer<W> {
    /// Renderer writing to `out`, wrapping at the current terminal width.
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed_rows: 0,
            columns: Columns::Terminal,
        }
    }

    /// Use a fixed terminal width instead of querying it.
    #[must_use]
    pub fn with_columns(mut self, columns: u16) -> Self {
        self.columns = Columns::Fixed(columns);
        self
    }

    /// Terminal rows printed since the last erase or settle.
    #[must_use]
    pub fn printed_rows(&self) -> usize {
        self.printed_rows
    }

    /// Consume the renderer, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn columns(&self) -> Option<usize> {
        match self.columns {
            Columns::Fixed(0) => None,
            Columns::Fixed(c) => Some(usize::from(c)),
            Columns::Terminal => crossterm::terminal::size()
                .ok()
                .map(|(c, _)| usize::from(c))
                .filter(|&c| c > 0),
        }
    }
}

/// Text of a segment as it is printed: placeholders in, zero-width out.
fn printable(text: &str) -> String {
    text.chars().filter_map(drawn_glyph).map(|(ch, _)| ch).collect()
}

/// Terminal rows taken by a line printed at column 0 and ended by a newline.
///
/// Follows the terminal's auto-wrap: a glyph that does not fit in what is
/// left of the row moves whole to the next one, so a wide glyph facing a
/// single free column wraps early.
fn rows_for(line: &Line, columns: Option<usize>) -> usize {
    let Some(cols) = columns else {
        return 1;
    };
    let mut rows = 1;
    let mut col = 0;
    for (_, width) in line.glyphs().filter_map(|(ch, _)| drawn_glyph(ch)) {
        if col > 0 && col + width > cols {
            rows += 1;
            col = 0;
        }
        col += width;
    }
    rows
}

impl<W: Write> FrameRenderer for StreamRenderer<W> {
    type Frame = [Line];

    fn render(&mut self, frame: &[Line]) -> Result<()> {
        let columns = self.columns();
        for line in frame {
            for segment in &line.segments {
                let text = printable(&segment.text);
                match stream_color(segment.tone) {
                    Some(color) => queue!(
                        self.out,
                        SetForegroundColor(color),
                        Print(text),
                        ResetColor
                    )?,
                    None => queue!(self.out, Print(text))?,
                }
            }
            queue!(self.out, Print('\n'))?;
            self.printed_rows += rows_for(line, columns);
        }
        self.out.flush()?;
        Ok(())
    }

    fn erase(&mut self) -> Result<()> {
        for _ in 0..self.printed_rows {
            queue!(self.out, MoveUp(1), Clear(ClearType::CurrentLine))?;
        }
        self.out.flush()?;
        self.printed_rows = 0;
        Ok(())
    }

    fn settle(&mut self) {
        self.printed_rows = 0;
    }
}
