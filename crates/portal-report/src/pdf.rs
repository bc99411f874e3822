//! PDF output for the newsletter.
//!
//! The document is plain text on US Letter pages, so it is written directly:
//! the three standard Type 1 fonts every PDF reader ships (Helvetica,
//! Helvetica-Bold, Symbol) mean nothing is embedded. Text is WinAnsi-encoded;
//! the arrow glyphs come from the Symbol font.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::error::ReportError;
use crate::format::{report_lines, ReportLine, ARROW_DOWN, ARROW_UP};
use crate::metrics::MetricsRecord;

/// Turns a metrics record into a document on disk.
pub trait ReportRenderer: Send + Sync {
    /// Writes the document and returns its path.
    ///
    /// # Errors
    ///
    /// [`ReportError::Render`] if the output cannot be written.
    fn render(&self, metrics: &MetricsRecord) -> Result<PathBuf, ReportError>;
}

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;
const BODY_SIZE: f32 = 10.0;
const TITLE_SIZE: f32 = 14.0;
/// Vertical advance per line, including the paragraph gap.
const LINE_ADVANCE: f32 = 24.0;
const GAP_ADVANCE: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
    Symbol,
}

impl Font {
    const ALL: [Font; 3] = [Font::Regular, Font::Bold, Font::Symbol];

    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Symbol => "F3",
        }
    }

    fn dictionary(self) -> &'static str {
        match self {
            Font::Regular => {
                "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            }
            Font::Bold => {
                "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            }
            Font::Symbol => "<< /Type /Font /Subtype /Type1 /BaseFont /Symbol >>",
        }
    }
}

/// Maps a character to `(font, byte)`. Arrows switch to Symbol; characters
/// WinAnsi cannot represent become `?`.
fn encode_char(ch: char, text_font: Font) -> (Font, u8) {
    match ch {
        ARROW_UP => (Font::Symbol, 0xAD),
        ARROW_DOWN => (Font::Symbol, 0xAF),
        '–' => (text_font, 0x96),
        '—' => (text_font, 0x97),
        '€' => (text_font, 0x80),
        '‘' => (text_font, 0x91),
        '’' => (text_font, 0x92),
        '“' => (text_font, 0x93),
        '”' => (text_font, 0x94),
        '•' => (text_font, 0x95),
        _ => match u8::try_from(u32::from(ch)) {
            Ok(byte) if (0x20..0x7F).contains(&byte) || byte >= 0xA0 => (text_font, byte),
            _ => (text_font, b'?'),
        },
    }
}

/// Splits `text` into runs of one font each.
fn runs(text: &str, text_font: Font) -> Vec<(Font, Vec<u8>)> {
    let mut runs: Vec<(Font, Vec<u8>)> = Vec::new();
    for ch in text.chars() {
        let (font, byte) = encode_char(ch, text_font);
        match runs.last_mut() {
            Some((last, bytes)) if *last == font => bytes.push(byte),
            _ => runs.push((font, vec![byte])),
        }
    }
    runs
}

/// Accumulates page content streams while laying out lines top to bottom.
struct Layout {
    pages: Vec<String>,
    current: String,
    y: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: String::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn advance(&mut self, by: f32) {
        self.y -= by;
        if self.y < MARGIN {
            self.break_page();
        }
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn text_line(&mut self, spans: &[(Font, &str)], size: f32) {
        let baseline = self.y - size;
        let _ = writeln!(self.current, "BT\n{MARGIN:.0} {baseline:.2} Td");
        for (text_font, text) in spans {
            for (font, bytes) in runs(text, *text_font) {
                let _ = writeln!(self.current, "/{} {size:.0} Tf", font.resource());
                let _ = writeln!(self.current, "<{}> Tj", hex(&bytes));
            }
        }
        self.current.push_str("ET\n");
    }

    fn push(&mut self, line: &ReportLine) {
        match line {
            ReportLine::Title(title) => {
                self.text_line(&[(Font::Bold, title.as_str())], TITLE_SIZE);
                self.advance(LINE_ADVANCE);
            }
            ReportLine::Text { bold, regular } => {
                self.text_line(
                    &[(Font::Bold, bold.as_str()), (Font::Regular, regular.as_str())],
                    BODY_SIZE,
                );
                self.advance(LINE_ADVANCE);
            }
            ReportLine::Gap => self.advance(GAP_ADVANCE),
        }
    }

    fn finish(mut self) -> Vec<String> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02X}");
        out
    })
}

/// Serializes laid-out pages as a complete PDF file.
///
/// Object numbering: 1 catalog, 2 page tree, 3..=5 fonts, then a page and
/// its content stream for each page.
fn write_document(pages: &[String]) -> Vec<u8> {
    let first_page_id = 3 + Font::ALL.len();
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| first_page_id + 2 * i).collect();

    let mut objects: Vec<Vec<u8>> = Vec::new();
    objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());
    let kids: Vec<String> = page_ids.iter().map(|id| format!("{id} 0 R")).collect();
    objects.push(
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        )
        .into_bytes(),
    );
    for font in Font::ALL {
        objects.push(font.dictionary().as_bytes().to_vec());
    }

    let font_resources: Vec<String> = Font::ALL
        .iter()
        .enumerate()
        .map(|(i, font)| format!("/{} {} 0 R", font.resource(), 3 + i))
        .collect();
    for (content, page_id) in pages.iter().zip(&page_ids) {
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH:.0} {PAGE_HEIGHT:.0}] \
                 /Resources << /Font << {} >> >> /Contents {} 0 R >>",
                font_resources.join(" "),
                page_id + 1
            )
            .into_bytes(),
        );
        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend_from_slice(content.as_bytes());
        stream.extend_from_slice(b"\nendstream");
        objects.push(stream);
    }

    let mut out: Vec<u8> = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    let mut trailer = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = writeln!(trailer, "{offset:010} 00000 n ");
    }
    let _ = writeln!(
        trailer,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF",
        objects.len() + 1
    );
    out.extend_from_slice(trailer.as_bytes());
    out
}

/// Renders the newsletter as `AoD_Weekly_Newsletter_<MM_DD_YYYY>.pdf` in
/// `output_dir`, creating the directory if needed.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    output_dir: PathBuf,
}

impl PdfRenderer {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn file_name(metrics: &MetricsRecord) -> String {
        format!(
            "AoD_Weekly_Newsletter_{}.pdf",
            metrics.pulled_on.format("%m_%d_%Y")
        )
    }
}

/// Lays out every report line and returns the finished PDF bytes.
#[must_use]
pub fn render_pdf_bytes(metrics: &MetricsRecord) -> Vec<u8> {
    let mut layout = Layout::new();
    for line in report_lines(metrics) {
        layout.push(&line);
    }
    write_document(&layout.finish())
}

impl ReportRenderer for PdfRenderer {
    fn render(&self, metrics: &MetricsRecord) -> Result<PathBuf, ReportError> {
        let path = self.output_dir.join(Self::file_name(metrics));
        let render_err = |source| ReportError::Render {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(&self.output_dir).map_err(render_err)?;
        std::fs::write(&path, render_pdf_bytes(metrics)).map_err(render_err)?;

        tracing::info!(path = %path.display(), "saved report PDF");
        Ok(path)
    }
}
