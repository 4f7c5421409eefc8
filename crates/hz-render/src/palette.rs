use hz_core::frame::Tone;

/// Crossterm colour of a tone, for the stream renderer.
///
/// `None` means the terminal default foreground.
///
/// # Example
/// ```
/// use hz_core::frame::Tone;
/// use hz_render::palette::stream_color;
/// assert!(stream_color(Tone::Default).is_none());
/// assert!(stream_color(Tone::Highlight).is_some());
/// ```
#[must_use]
pub fn stream_color(tone: Tone) -> Option<crossterm::style::Color> {
    use crossterm::style::Color;
    match tone {
        Tone::Default => None,
        Tone::Highlight => Some(Color::DarkYellow),
        Tone::Accent => Some(Color::DarkBlue),
    }
}

/// Ratatui colour of a tone, for the grid renderer.
#[must_use]
pub fn grid_color(tone: Tone) -> ratatui::style::Color {
    use ratatui::style::Color;
    match tone {
        Tone::Default => Color::Reset,
        Tone::Highlight => Color::Yellow,
        Tone::Accent => Color::Blue,
    }
}
