use unicode_width::UnicodeWidthChar;

/// Glyph drawn in place of anything that cannot be displayed.
pub const PLACEHOLDER: char = '?';

/// Foreground colour of a piece of text.
///
/// Renderers map tones to concrete terminal colours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Terminal default foreground.
    #[default]
    Default,
    /// Yellow. Shout banner and half of the logo.
    Highlight,
    /// Blue. Other half of the logo.
    Accent,
}

/// Run of text sharing one tone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Segment {
    /// Text of the run.
    pub text: String,
    /// Colour of the run.
    pub tone: Tone,
}

/// One display row, made of coloured segments.
///
/// # Example
/// ```
/// use hz_core::frame::{Line, Tone};
/// let line = Line::toned("Cool!", Tone::Highlight);
/// assert_eq!(line.text(), "Cool!");
/// assert_eq!(line.segments[0].tone, Tone::Highlight);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Line {
    /// Segments, left to right.
    pub segments: Vec<Segment>,
}

impl Line {
    /// Line in the default tone.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::toned(text, Tone::Default)
    }

    /// Line in a single tone.
    #[must_use]
    pub fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            segments: vec![Segment {
                text: text.into(),
                tone,
            }],
        }
    }

    /// Append a segment.
    #[must_use]
    pub fn with(mut self, text: impl Into<String>, tone: Tone) -> Self {
        self.segments.push(Segment {
            text: text.into(),
            tone,
        });
        self
    }

    /// Concatenated text, without colours.
    #[must_use]
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Glyphs of the line with their tone, in display order.
    pub fn glyphs(&self) -> impl Iterator<Item = (char, Tone)> + '_ {
        self.segments
            .iter()
            .flat_map(|s| s.text.chars().map(move |ch| (ch, s.tone)))
    }

    /// Number of terminal columns the line occupies.
    #[must_use]
    pub fn width(&self) -> usize {
        self.glyphs().map(|(ch, _)| display_width(ch)).sum()
    }
}

/// Glyph actually drawn for `ch`, with its width in columns.
///
/// Control characters and U+FFFD become [`PLACEHOLDER`]; zero-width glyphs
/// give `None` and are not drawn. Both renderers go through this, so what
/// is printed and what is counted never disagree.
///
/// # Example
/// ```
/// use hz_core::frame::{PLACEHOLDER, drawn_glyph};
/// assert_eq!(drawn_glyph('a'), Some(('a', 1)));
/// assert_eq!(drawn_glyph('ほ'), Some(('ほ', 2)));
/// assert_eq!(drawn_glyph('\n'), Some((PLACEHOLDER, 1)));
/// assert_eq!(drawn_glyph('\u{200B}'), None);
/// ```
#[inline]
#[must_use]
pub fn drawn_glyph(ch: char) -> Option<(char, usize)> {
    match UnicodeWidthChar::width(ch) {
        Some(0) => None,
        Some(w) if ch != char::REPLACEMENT_CHARACTER => Some((ch, w)),
        _ => Some((PLACEHOLDER, 1)),
    }
}

/// Columns taken by `ch` once drawn, after placeholder substitution.
#[inline]
#[must_use]
pub fn display_width(ch: char) -> usize {
    drawn_glyph(ch).map_or(0, |(_, w)| w)
}

/// Growing list of lines shown in scrolling mode.
///
/// # Example
/// ```
/// use hz_core::frame::{Dashboard, Line};
/// let mut board = Dashboard::new();
/// board.set(1, Line::plain("b"));
/// assert_eq!(board.len(), 2);
/// assert_eq!(board.lines()[0].text(), "");
/// assert_eq!(board.lines()[1].text(), "b");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dashboard {
    lines: Vec<Line>,
}

impl Dashboard {
    /// Empty dashboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace row `row`, growing the dashboard with empty lines if needed.
    pub fn set(&mut self, row: usize, line: Line) {
        if row >= self.lines.len() {
            self.lines.resize_with(row + 1, Line::default);
        }
        self.lines[row] = line;
    }

    /// Replace every row at once.
    pub fn replace(&mut self, lines: Vec<Line>) {
        self.lines = lines;
    }

    /// Current rows.
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// `true` when no row has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drop every row, keeping the allocation.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Single cell of the fixed grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Glyph to draw.
    pub ch: char,
    /// Couleur foreground.
    pub tone: Tone,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            tone: Tone::Default,
        }
    }
}

/// Fixed-size character grid for grid mode. Row-major.
///
/// # Example
/// ```
/// use hz_core::frame::{CellGrid, Line};
/// let mut grid = CellGrid::new(10, 2);
/// grid.write_row(1, &Line::plain("ほず"));
/// assert_eq!(grid.get(0, 1).ch, 'ほ');
/// assert_eq!(grid.get(2, 1).ch, 'ず');
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellGrid {
    cells: Vec<Cell>,
    /// Width in columns.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
}

impl CellGrid {
    /// Pre-allocated blank grid.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
            width,
            height,
        }
    }

    /// Cell at `(x, y)`.
    ///
    /// # Panics
    /// Panics if `(x, y)` is outside the grid.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> &Cell {
        &self.cells[self.index(x, y)]
    }

    /// Cells of row `y`, or `None` outside the grid.
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y >= self.height {
            return None;
        }
        let start = usize::from(y) * usize::from(self.width);
        Some(&self.cells[start..start + usize::from(self.width)])
    }

    /// Text of row `y` as displayed, trailing blanks trimmed.
    ///
    /// The blank column after a wide glyph is not part of the text.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        let Some(cells) = self.row(y) else {
            return String::new();
        };
        let mut text = String::with_capacity(cells.len());
        let mut continuation = false;
        for cell in cells {
            if continuation {
                continuation = false;
                continue;
            }
            text.push(cell.ch);
            continuation = display_width(cell.ch) > 1;
        }
        text.truncate(text.trim_end().len());
        text
    }

    /// Blank every cell.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Blank row `y`. No-op outside the grid.
    pub fn clear_row(&mut self, y: usize) {
        let Ok(y) = u16::try_from(y) else { return };
        if y >= self.height {
            return;
        }
        let start = self.index(0, y);
        let end = start + usize::from(self.width);
        self.cells[start..end].fill(Cell::default());
    }

    /// Clear row `y`, then write `line` from column 0.
    ///
    /// Each glyph advances the column by its display width, so a wide glyph
    /// occupies two columns and the second one stays blank. Control
    /// characters and U+FFFD are drawn as [`PLACEHOLDER`]; zero-width glyphs
    /// are skipped. Anything beyond the grid is clipped.
    pub fn write_row(&mut self, y: usize, line: &Line) {
        self.clear_row(y);
        let Ok(y) = u16::try_from(y) else { return };
        if y >= self.height {
            return;
        }
        let mut x = 0usize;
        for (ch, tone) in line.glyphs() {
            let Some((ch, width)) = drawn_glyph(ch) else {
                continue;
            };
            if x + width > usize::from(self.width) {
                break;
            }
            let idx = self.index(x as u16, y);
            self.cells[idx] = Cell { ch, tone };
            x += width;
        }
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }
}
