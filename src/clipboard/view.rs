//! Rendering clipboard contents into text, optionally through a viewport.

use std::borrow::Cow;

/// What the clipboard currently holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClipboardContent {
    Text(String),
    /// Image data; only the dimensions are shown.
    Image { width: usize, height: usize },
    Empty,
}

impl ClipboardContent {
    /// Text shown for this content.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text),
            Self::Image { width, height } => Cow::Owned(format!("[image {width}x{height}]")),
            Self::Empty => Cow::Borrowed("[empty clipboard]"),
        }
    }
}

/// A window onto the clipboard text: `height` lines of at most `width`
/// characters, starting `offset` lines down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
    pub offset: usize,
}

/// Render content, clipped to `viewport` if one is given.
///
/// With `ellipsis` set, clipped lines end in `…` instead of being cut flat.
pub fn render(content: &ClipboardContent, viewport: Option<Viewport>, ellipsis: bool) -> String {
    let text = content.as_text();
    let Some(viewport) = viewport else {
        return text.into_owned();
    };

    text.lines()
        .skip(viewport.offset)
        .take(viewport.height)
        .map(|line| clip_line(line, viewport.width, ellipsis))
        .collect::<Vec<_>>()
        .join("\n")
}

fn clip_line(line: &str, width: usize, ellipsis: bool) -> Cow<'_, str> {
    if line.chars().count() <= width {
        return Cow::Borrowed(line);
    }

    if ellipsis && width > 0 {
        let mut clipped: String = line.chars().take(width - 1).collect();
        clipped.push('…');
        Cow::Owned(clipped)
    } else {
        Cow::Owned(line.chars().take(width).collect())
    }
}
