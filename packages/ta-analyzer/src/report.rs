//! PDF output for assessment text.
//!
//! Text is laid out with [`analyzer_core::render`] using Helvetica metrics and
//! written with the matching standard Type 1 font, so measured and printed
//! widths agree.

use analyzer_core::{encode_win_ansi, render, Helvetica, Page, PageGeometry};
use anyhow::{Context, Result};
use chrono::Local;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ReportConfig;

/// Baseline offset below the middle of a line cell, as a fraction of the
/// font size.
const BASELINE_SHIFT: f32 = 0.3;

/// Page geometry and font for a report.
#[derive(Debug, Clone, Copy)]
pub struct ReportLayout {
    pub geometry: PageGeometry,
    pub font: Helvetica,
}

impl ReportLayout {
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            geometry: config.page_geometry(),
            font: config.font(),
        }
    }

    /// Wrap and paginate `text`.
    pub fn paginate(&self, text: &str) -> Result<Vec<Page>> {
        render(text, &self.geometry, &self.font).context("Failed to lay out report text")
    }

    /// Baseline of line `index` counted from the page top, in PDF
    /// coordinates (origin bottom left).
    fn baseline(&self, index: usize) -> f32 {
        let g = &self.geometry;
        let cell_top = g.margins.top + index as f32 * g.line_height;
        g.height - (cell_top + g.line_height / 2.0 + BASELINE_SHIFT * self.font.size)
    }
}

/// `AI_Analysis_<place>.pdf` with anything but ASCII letters and digits
/// replaced by `_`.
pub fn report_file_name(place: &str) -> String {
    format!("AI_Analysis_{}.pdf", sanitize(place))
}

pub(crate) fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "area".to_string()
    } else {
        cleaned
    }
}

/// Build the PDF document for already paginated text.
pub fn build_document(pages: &[Page], layout: &ReportLayout, title: &str) -> Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let x = layout.geometry.margins.left;
    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

    for page in pages {
        let mut operations = Vec::new();
        for (index, line) in page.lines().iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec!["F1".into(), Object::Real(layout.font.size)],
            ));
            operations.push(Operation::new(
                "Td",
                vec![Object::Real(x), Object::Real(layout.baseline(index))],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(
                    encode_win_ansi(line.as_str()),
                    StringFormat::Literal,
                )],
            ));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(layout.geometry.width),
            Object::Real(layout.geometry.height),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let created = Local::now().format("D:%Y%m%d%H%M%S").to_string();
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(encode_win_ansi(title), StringFormat::Literal),
        "Producer" => Object::string_literal("TA Analyzer"),
        "CreationDate" => Object::string_literal(created),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    Ok(doc)
}

/// Lay out `text` and serialize it to PDF bytes.
pub fn pdf_bytes(text: &str, layout: &ReportLayout, title: &str) -> Result<Vec<u8>> {
    let pages = layout.paginate(text)?;
    let mut doc = build_document(&pages, layout, title)?;
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).context("Failed to serialize PDF")?;
    Ok(bytes)
}

/// Write `text` as a PDF to `path`, creating parent directories.
pub fn write_pdf(text: &str, layout: &ReportLayout, title: &str, path: &Path) -> Result<PathBuf> {
    let bytes = pdf_bytes(text, layout, title)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "Wrote PDF report");
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ReportLayout {
        ReportLayout::from_config(&ReportConfig::default())
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name("Caldes"), "AI_Analysis_Caldes.pdf");
        assert_eq!(
            report_file_name("Port of Sóller"),
            "AI_Analysis_Port_of_S_ller.pdf"
        );
        assert_eq!(report_file_name("  "), "AI_Analysis_area.pdf");
    }

    #[test]
    fn test_baselines_descend() {
        let layout = layout();
        let first = layout.baseline(0);
        let second = layout.baseline(1);
        assert!(first < layout.geometry.height - layout.geometry.margins.top);
        assert!((first - second - layout.geometry.line_height).abs() < 1e-3);
    }

    #[test]
    fn test_document_has_one_page_per_layout_page() {
        let layout = layout();
        // 30pt lines on A4 with 15mm margins: 25 lines per page.
        let text = (0..60).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
        let pages = layout.paginate(&text).unwrap();
        assert_eq!(pages.len(), 3);

        let doc = build_document(&pages, &layout, "Test").unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    /// Width of the bytes the content stream actually shows.
    fn printed_width(line: &str, font: &Helvetica) -> f32 {
        let units: u32 = encode_win_ansi(line)
            .into_iter()
            .map(|b| Helvetica::byte_width(b) as u32)
            .sum();
        units as f32 * font.size / 1000.0
    }

    #[test]
    fn test_typographic_punctuation_stays_on_page() {
        let layout = layout();
        let text = vec!["——————"; 40].join(" ")
            + "\n“Smart village” – bus line • Wi‑Fi… 日本 Šmarje’s ÆØ";
        let pages = layout.paginate(&text).unwrap();

        let printable = layout.geometry.printable_width();
        for line in pages.iter().flat_map(|p| p.lines()) {
            let width = printed_width(line.as_str(), &layout.font);
            assert!(
                width <= printable || !line.as_str().contains(' '),
                "{:?} is {}pt wide, page allows {}pt",
                line.as_str(),
                width,
                printable
            );
        }
    }

    #[test]
    fn test_write_pdf_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir
            .path()
            .join("reports")
            .join("2024")
            .join(report_file_name("Port of Sóller"));

        let written = write_pdf("Assessment — “good”", &layout(), "AI Analysis", &path).unwrap();

        assert_eq!(written, path);
        assert_eq!(
            written.file_name().unwrap(),
            "AI_Analysis_Port_of_S_ller.pdf"
        );
        let bytes = fs::read(&written).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_pdf_bytes_header() {
        let bytes = pdf_bytes("Hello\n\nWorld", &layout(), "Test").unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }
}
