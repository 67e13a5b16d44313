//! Paginated PDF report.
//!
//! The report is first laid out as a flat list of [`Line`]s, then split into
//! pages and drawn with the built-in Helvetica faces, so no font files are
//! needed at runtime.

use std::path::{Path, PathBuf};

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::outcome::Outcome;
use crate::report::ScanReport;

use super::{truncate, ResultSink, SinkError};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const LINE_HEIGHT_MM: f32 = 5.0;
const WRAP_COLUMNS: usize = 100;
/// (297mm - two 15mm margins) / 5mm line height.
pub const LINES_PER_PAGE: usize = 53;
pub const DEFAULT_PAYLOAD_CHARS: usize = 2_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Line {
    Title(String),
    Heading(String),
    Body(String),
    Blank,
}

pub struct PdfSink {
    path: PathBuf,
    max_payload_chars: usize,
}

impl PdfSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_payload_chars: DEFAULT_PAYLOAD_CHARS,
        }
    }

    pub fn with_max_payload_chars(mut self, max_payload_chars: usize) -> Self {
        self.max_payload_chars = max_payload_chars;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn render(&self, report: &ScanReport) -> Result<Vec<u8>, SinkError> {
        let pages = paginate(layout(report, self.max_payload_chars), LINES_PER_PAGE);
        let total = pages.len();

        let (doc, first_page, first_layer) = PdfDocument::new(
            "scout report",
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "content",
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;

        for (number, page) in pages.iter().enumerate() {
            let (page_idx, layer_idx) = if number == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content")
            };
            let layer = doc.get_page(page_idx).get_layer(layer_idx);

            let mut y = PAGE_HEIGHT_MM - MARGIN_MM;
            for line in page {
                let (text, size, strong): (&str, f32, bool) = match line {
                    Line::Title(text) => (text, 14.0, true),
                    Line::Heading(text) => (text, 11.0, true),
                    Line::Body(text) => (text, 9.0, false),
                    Line::Blank => ("", 9.0, false),
                };
                if !text.is_empty() {
                    let font = if strong { &bold } else { &regular };
                    layer.use_text(sanitize(text), size, Mm(MARGIN_MM), Mm(y), font);
                }
                y -= LINE_HEIGHT_MM;
            }

            layer.use_text(
                format!("page {} / {}", number + 1, total),
                8.0,
                Mm(PAGE_WIDTH_MM - MARGIN_MM - 20.0),
                Mm(MARGIN_MM / 2.0),
                &regular,
            );
        }

        doc.save_to_bytes().map_err(pdf_error)
    }
}

impl ResultSink for PdfSink {
    fn name(&self) -> &str {
        "pdf"
    }

    fn write(&self, report: &ScanReport) -> Result<(), SinkError> {
        let bytes = self.render(report)?;
        std::fs::write(&self.path, bytes).map_err(|source| SinkError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

fn pdf_error<E: std::fmt::Display>(err: E) -> SinkError {
    SinkError::Pdf(err.to_string())
}

/// Flat line list for a report, payloads cut to `max_payload_chars`.
pub fn layout(report: &ScanReport, max_payload_chars: usize) -> Vec<Line> {
    let mut lines = vec![
        Line::Title(format!("Reconnaissance report: {}", report.target())),
        Line::Body(format!(
            "Started {} - {} sources - {:.1}s",
            report.started_at().format("%Y-%m-%d %H:%M:%S UTC"),
            report.len(),
            report.elapsed().as_secs_f64()
        )),
    ];

    for (name, outcome) in report.iter() {
        lines.push(Line::Blank);
        let body = match outcome {
            Outcome::Success { payload } => {
                lines.push(Line::Heading(format!("{name}  [SUCCESS]")));
                truncate(payload, max_payload_chars).into_owned()
            }
            Outcome::Failure { kind, message } => {
                lines.push(Line::Heading(format!("{name}  [FAILURE: {kind}]")));
                message.clone()
            }
        };
        for raw in body.lines() {
            lines.extend(wrap(raw, WRAP_COLUMNS).into_iter().map(Line::Body));
        }
    }
    lines
}

/// Splits lines into pages; a heading never ends a page on its own.
pub fn paginate(lines: Vec<Line>, per_page: usize) -> Vec<Vec<Line>> {
    let per_page = per_page.max(2);
    let mut pages: Vec<Vec<Line>> = Vec::new();
    let mut current: Vec<Line> = Vec::new();

    for line in lines {
        if current.len() == per_page {
            let orphan = match current.last() {
                Some(Line::Heading(_)) => current.pop(),
                _ => None,
            };
            pages.push(std::mem::take(&mut current));
            current.extend(orphan);
        }
        if current.is_empty() && line == Line::Blank {
            continue;
        }
        current.push(line);
    }

    if !current.is_empty() || pages.is_empty() {
        pages.push(current);
    }
    pages
}

/// Greedy word wrap, hard-splitting words longer than `width`.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: &str = word;
        while word.chars().count() > width {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            let cut = word
                .char_indices()
                .nth(width)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            out.push(word[..cut].to_string());
            word = &word[cut..];
        }

        let needed = current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
        if needed > width && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if !word.is_empty() {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
    }

    if !current.is_empty() || out.is_empty() {
        out.push(current);
    }
    out
}

/// The built-in fonts only cover Latin-1; anything else becomes `?`.
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '…' => "...".to_string(),
            '\t' => "    ".to_string(),
            c if c.is_ascii_graphic() || c == ' ' => c.to_string(),
            c if ('\u{a0}'..='\u{ff}').contains(&c) => c.to_string(),
            _ => "?".to_string(),
        })
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::FailureKind;

    fn report() -> ScanReport {
        ScanReport::new(
            "https://example.com/",
            vec![
                ("nuclei".into(), Outcome::success("[info] tech-detect https://example.com/")),
                ("shodan".into(), Outcome::failure(FailureKind::BadStatus, "401")),
            ],
        )
    }

    #[test]
    fn layout_tags_every_source() {
        let lines = layout(&report(), 100);
        let headings: Vec<&Line> = lines
            .iter()
            .filter(|l| matches!(l, Line::Heading(_)))
            .collect();
        assert_eq!(
            headings,
            [
                &Line::Heading("nuclei  [SUCCESS]".into()),
                &Line::Heading("shodan  [FAILURE: bad status]".into()),
            ]
        );
        assert!(lines.contains(&Line::Body("401".into())));
    }

    #[test]
    fn layout_truncates_payloads() {
        let long = ScanReport::new("t", vec![("wayback".into(), Outcome::success("y".repeat(5_000)))]);
        let body: usize = layout(&long, 150)
            .iter()
            .filter_map(|l| match l {
                Line::Body(text) if text.starts_with('y') => Some(text.len()),
                _ => None,
            })
            .sum();
        assert!(body <= 150 + "... [truncated]".len());
    }

    #[test]
    fn paginate_splits_and_keeps_headings_with_content() {
        let mut lines: Vec<Line> = (0..4).map(|i| Line::Body(i.to_string())).collect();
        lines.push(Line::Heading("next".into()));
        lines.push(Line::Body("after".into()));

        let pages = paginate(lines, 5);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), 4);
        assert_eq!(pages[1], [Line::Heading("next".into()), Line::Body("after".into())]);
    }

    #[test]
    fn paginate_counts() {
        let lines: Vec<Line> = (0..120).map(|i| Line::Body(i.to_string())).collect();
        let sizes: Vec<usize> = paginate(lines, 53).iter().map(Vec::len).collect();
        assert_eq!(sizes, [53, 53, 14]);
    }

    #[test]
    fn wrap_breaks_on_words_and_long_tokens() {
        assert_eq!(wrap("aaa bbb ccc", 7), ["aaa bbb", "ccc"]);
        assert_eq!(wrap("abcdefghij", 4), ["abcd", "efgh", "ij"]);
        assert_eq!(wrap("", 10), [""]);
    }

    #[test]
    fn sanitize_replaces_unsupported_glyphs() {
        assert_eq!(sanitize("ok… ✓ café"), "ok... ? café");
    }

    #[test]
    fn writes_a_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        PdfSink::new(&path).write(&report()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
