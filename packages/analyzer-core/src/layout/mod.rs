//! Paginated text layout.
//!
//! Lays arbitrary text out into fixed-width lines and fixed-height pages for
//! a fixed-layout document. Each source line (split on `\n`) is wrapped on
//! its own; words are added greedily while the measured line still fits the
//! printable width. A word wider than the printable width is emitted alone on
//! its line, unbroken.

pub mod metrics;
pub mod win_ansi;

pub use metrics::{FontMetrics, Helvetica, Monospace};
pub use win_ansi::{encode_win_ansi, printed_byte, win_ansi_byte};

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Page margins in page units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Margins {
    pub fn uniform(size: f32) -> Self {
        Self {
            left: size,
            right: size,
            top: size,
            bottom: size,
        }
    }
}

/// Page size, margins and line advance, all in the same unit (PDF points
/// for the report writer).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
    pub line_height: f32,
}

/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

impl PageGeometry {
    /// A4 portrait in points.
    pub fn a4(margins: Margins, line_height: f32) -> Self {
        Self {
            width: 210.0 * PT_PER_MM,
            height: 297.0 * PT_PER_MM,
            margins,
            line_height,
        }
    }

    /// Width available for text between the side margins.
    pub fn printable_width(&self) -> f32 {
        self.width - self.margins.left - self.margins.right
    }

    /// Lowest baseline position a line may reach.
    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margins.bottom
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(LayoutError::PageSize {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.line_height > 0.0) {
            return Err(LayoutError::LineHeight(self.line_height));
        }
        let m = &self.margins;
        if m.left < 0.0 || m.right < 0.0 || m.top < 0.0 || m.bottom < 0.0 {
            return Err(LayoutError::NoPrintableArea);
        }
        if self.printable_width() <= 0.0 || self.bottom_limit() - m.top < self.line_height {
            return Err(LayoutError::NoPrintableArea);
        }
        Ok(())
    }
}

/// One wrapped line of output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line(String);

impl Line {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for Line {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lines that fit on one page, top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    lines: Vec<Line>,
}

impl Page {
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Wrap one source line (no `\n`) into lines that fit `max_width`.
///
/// Always yields at least one line; an empty source line yields one empty
/// line.
pub fn wrap_line(source: &str, max_width: f32, metrics: &dyn FontMetrics) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in source.split(' ').filter(|w| !w.is_empty()) {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if metrics.text_width(&candidate) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }

    lines.push(current);
    lines
}

/// Wrap every source line of `text` without paginating.
pub fn wrap_text(text: &str, max_width: f32, metrics: &dyn FontMetrics) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .flat_map(|line| wrap_line(line, max_width, metrics))
        .collect()
}

/// Lay `text` out into pages.
///
/// The vertical cursor starts at the top margin and advances by
/// `line_height` per line; a new page starts when the next line would pass
/// `height - bottom`. Every page holds at least one line.
pub fn render(
    text: &str,
    geometry: &PageGeometry,
    metrics: &dyn FontMetrics,
) -> Result<Vec<Page>, LayoutError> {
    geometry.validate()?;

    let max_width = geometry.printable_width();
    let limit = geometry.bottom_limit();

    let mut pages = Vec::new();
    let mut page = Page::default();
    let mut cursor = geometry.margins.top;

    for line in wrap_text(text, max_width, metrics) {
        if cursor + geometry.line_height > limit && !page.is_empty() {
            pages.push(std::mem::take(&mut page));
            cursor = geometry.margins.top;
        }
        page.lines.push(Line(line));
        cursor += geometry.line_height;
    }

    pages.push(page);

    tracing::debug!(
        pages = pages.len(),
        lines = pages.iter().map(Page::len).sum::<usize>(),
        "Rendered text layout"
    );

    Ok(pages)
}
