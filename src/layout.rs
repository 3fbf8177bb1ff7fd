//! Layout engine turning a [`ReportData`] value into paginated pages of
//! absolutely positioned draw commands.
//!
//! The engine is a single forward pass over the report content with a
//! running vertical cursor, followed by a footer pass once the total page
//! count is known.  It is deliberately free of any PDF backend: the output
//! is a plain [`Page`] sequence that the emitter maps one to one, which
//! keeps pagination behavior fully inspectable in tests.
//!
//! Vertical advances are fixed per-line constants rather than measured font
//! metrics, so overflow thresholds are conservative approximations.  Text
//! widths (used for centering and word wrapping) come from the same fixed
//! estimate.

use log::debug;

use crate::model::ReportData;

/// Page width in millimetres (A4 portrait).
pub const PAGE_WIDTH: f64 = 210.0;
/// Page height in millimetres (A4 portrait).
pub const PAGE_HEIGHT: f64 = 297.0;
/// Left/right content margin in millimetres.
pub const MARGIN: f64 = 15.0;

const USABLE_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;

const BAND_HEIGHT: f64 = 35.0;
const TITLE_BASELINE: f64 = 15.0;
const SUBTITLE_BASELINE: f64 = 25.0;
const CONTENT_TOP: f64 = 45.0;
const CONTINUATION_TOP: f64 = 20.0;

const TITLE_SIZE: f64 = 22.0;
const SECTION_HEADER_SIZE: f64 = 11.0;
const BODY_SIZE: f64 = 10.0;
const TABLE_BODY_SIZE: f64 = 9.0;
const FOOTER_SIZE: f64 = 8.0;

const META_LINE_STEP: f64 = 6.0;
const META_SECOND_COLUMN_X: f64 = 105.0;

const TABLE_HEAD_ROW_HEIGHT: f64 = 8.0;
const TABLE_BODY_ROW_HEIGHT: f64 = 7.0;
const TABLE_CELL_PADDING: f64 = 2.0;
const TABLE_HEAD_TEXT_DROP: f64 = 5.5;
const TABLE_BODY_TEXT_DROP: f64 = 5.0;
/// Lowest millimetre a table row may extend to before breaking the page.
const TABLE_BOTTOM_LIMIT: f64 = 280.0;

/// Cursor positions beyond this force the remarks section onto a new page.
const REMARKS_PAGE_THRESHOLD: f64 = 250.0;
const REMARKS_LINE_STEP: f64 = 5.0;

const FOOTER_BASELINE: f64 = PAGE_HEIGHT - 10.0;

const PT_TO_MM: f64 = 0.352_778;
/// Average glyph advance as a fraction of the font size.
const AVG_GLYPH_EM: f64 = 0.5;

/// Table column captions and widths in millimetres (summing to the usable
/// width).
const TABLE_COLUMNS: [(&str, f64); 4] = [
    ("Worker Name", 50.0),
    ("Role", 40.0),
    ("Hours", 25.0),
    ("Task", 65.0),
];

/// An sRGB color with 8-bit channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Creates a color from 8-bit channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

const BLACK: Color = Color::rgb(0, 0, 0);
const WHITE: Color = Color::rgb(255, 255, 255);
/// Brand blue used for the title band and table header fill.
pub const BRAND_BLUE: Color = Color::rgb(0, 85, 164);
const ALT_ROW_TINT: Color = Color::rgb(245, 247, 250);
const GRID_STROKE: Color = Color::rgb(180, 180, 180);
const FOOTER_GREY: Color = Color::rgb(150, 150, 150);

/// Font selection for a text run; the emitter maps these to the Helvetica
/// built-ins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontKind {
    /// Regular weight.
    #[default]
    Regular,
    /// Bold weight.
    Bold,
}

/// A positioned run of text.
///
/// `x` is the left edge of the run and `y` the baseline, both in
/// millimetres with `y` growing downward from the page top.  Centered text
/// is resolved to a concrete `x` during layout, so a run's position is
/// always absolute.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    /// The text content.
    pub text: String,
    /// Left edge in millimetres.
    pub x: f64,
    /// Baseline from the page top in millimetres.
    pub y: f64,
    /// Font size in points.
    pub size: f64,
    /// Font weight.
    pub font: FontKind,
    /// Text color.
    pub color: Color,
}

/// One absolutely positioned drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// A rectangle with optional fill and optional stroke, anchored at its
    /// top-left corner.
    Rect {
        /// Left edge in millimetres.
        x: f64,
        /// Top edge from the page top in millimetres.
        y: f64,
        /// Width in millimetres.
        width: f64,
        /// Height in millimetres.
        height: f64,
        /// Fill color, if the rectangle is filled.
        fill: Option<Color>,
        /// Stroke color, if the outline is drawn.
        stroke: Option<Color>,
    },
    /// A positioned text run.
    Text(TextRun),
}

/// One fixed-size output page holding draw operations in emission order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    /// Draw operations in the order they were produced.
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Iterates over the text content of this page in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run.text.as_str()),
            DrawOp::Rect { .. } => None,
        })
    }
}

/// Estimated width of `text` at `size` points, in millimetres.
///
/// A fixed average glyph advance keeps the layout deterministic and
/// backend-independent; it intentionally matches the conservative trigger
/// points of the reference document rather than exact typography.
fn estimate_text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * AVG_GLYPH_EM * PT_TO_MM
}

/// Wraps `text` to `max_width` millimetres at `size` points.
///
/// Embedded line breaks are honored as hard breaks; otherwise the text
/// breaks at word boundaries, and a single word wider than the line is
/// split at character granularity so no line exceeds the width.
fn wrap_text(text: &str, max_width: f64, size: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for segment in text.split('\n') {
        if segment.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut line = String::new();
        for word in segment.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_owned()
            } else {
                format!("{line} {word}")
            };
            if estimate_text_width(&candidate, size) <= max_width {
                line = candidate;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if estimate_text_width(word, size) <= max_width {
                line = word.to_owned();
            } else {
                // Word alone exceeds the line; split it by characters.
                let mut chunk = String::new();
                for ch in word.chars() {
                    chunk.push(ch);
                    if estimate_text_width(&chunk, size) > max_width {
                        let overflow = chunk.pop();
                        lines.push(std::mem::take(&mut chunk));
                        if let Some(ch) = overflow {
                            chunk.push(ch);
                        }
                    }
                }
                line = chunk;
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}

/// Buffers pages and tracks the running vertical cursor during the forward
/// pass.
struct Composer {
    pages: Vec<Page>,
    y: f64,
}

impl Composer {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: CONTENT_TOP,
        }
    }

    fn push(&mut self, op: DrawOp) {
        // A page always exists; the composer starts with one.
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn start_page(&mut self) {
        self.pages.push(Page::default());
        self.y = CONTINUATION_TOP;
    }

    fn text(&mut self, text: impl Into<String>, x: f64, y: f64, size: f64, font: FontKind) {
        self.colored_text(text, x, y, size, font, BLACK);
    }

    fn colored_text(
        &mut self,
        text: impl Into<String>,
        x: f64,
        y: f64,
        size: f64,
        font: FontKind,
        color: Color,
    ) {
        self.push(DrawOp::Text(TextRun {
            text: text.into(),
            x,
            y,
            size,
            font,
            color,
        }));
    }

    fn centered_text(
        &mut self,
        text: impl Into<String>,
        y: f64,
        size: f64,
        font: FontKind,
        color: Color,
    ) {
        let text = text.into();
        let x = (PAGE_WIDTH - estimate_text_width(&text, size)) / 2.0;
        self.colored_text(text, x, y, size, font, color);
    }

    fn section_header(&mut self, title: &str) {
        self.text(title, MARGIN, self.y, SECTION_HEADER_SIZE, FontKind::Bold);
    }
}

/// Lays out `data` into a page sequence, stamping `generated_on` into the
/// title band subtitle.
///
/// The pass cannot fail; backend errors belong to the emitter.  The caller
/// supplies the generation date so output stays reproducible.
pub fn lay_out_report(data: &ReportData, generated_on: &str) -> Vec<Page> {
    let mut composer = Composer::new();

    draw_title_band(&mut composer, data, generated_on);
    draw_metadata_block(&mut composer, data);
    if !data.labor_details().is_empty() {
        draw_labor_table(&mut composer, data);
    }
    if !data.remarks().is_empty() {
        draw_remarks(&mut composer, data);
    }

    let mut pages = composer.pages;
    stamp_footers(&mut pages);
    debug!("laid out report into {} pages", pages.len());
    pages
}

/// Full-width filled band with the centered title and generation date.
/// Drawn on page 1 only.
fn draw_title_band(composer: &mut Composer, data: &ReportData, generated_on: &str) {
    composer.push(DrawOp::Rect {
        x: 0.0,
        y: 0.0,
        width: PAGE_WIDTH,
        height: BAND_HEIGHT,
        fill: Some(BRAND_BLUE),
        stroke: None,
    });
    composer.centered_text(
        data.report_type(),
        TITLE_BASELINE,
        TITLE_SIZE,
        FontKind::Bold,
        WHITE,
    );
    composer.centered_text(
        format!("Generated on: {generated_on}"),
        SUBTITLE_BASELINE,
        BODY_SIZE,
        FontKind::Regular,
        WHITE,
    );
}

fn draw_metadata_block(composer: &mut Composer, data: &ReportData) {
    composer.section_header("REPORT INFORMATION");
    composer.y += 8.0;

    let y = composer.y;
    composer.text(
        format!("Date: {}", data.date()),
        MARGIN,
        y,
        BODY_SIZE,
        FontKind::Regular,
    );
    composer.text(
        format!("Engineer: {}", data.engineer_name()),
        META_SECOND_COLUMN_X,
        y,
        BODY_SIZE,
        FontKind::Regular,
    );
    composer.y += META_LINE_STEP;

    let y = composer.y;
    composer.text(
        format!("Site: {}", data.site()),
        MARGIN,
        y,
        BODY_SIZE,
        FontKind::Regular,
    );
    composer.y += META_LINE_STEP;

    let y = composer.y;
    composer.text(
        format!("Machine: {}", data.machine()),
        MARGIN,
        y,
        BODY_SIZE,
        FontKind::Regular,
    );
    composer.y += META_LINE_STEP;

    // Optional rows are skipped entirely; no blank line is left behind.
    if let Some(project_code) = data.project_code().filter(|code| !code.is_empty()) {
        let y = composer.y;
        composer.text(
            format!("Project Code: {project_code}"),
            MARGIN,
            y,
            BODY_SIZE,
            FontKind::Regular,
        );
        composer.y += META_LINE_STEP;
    }
    if let Some(location) = data.location().filter(|location| !location.is_empty()) {
        let y = composer.y;
        composer.text(
            format!("Location: {location}"),
            MARGIN,
            y,
            BODY_SIZE,
            FontKind::Regular,
        );
        composer.y += META_LINE_STEP;
    }

    let y = composer.y;
    composer.text(
        format!("Total Hours: {} hrs", data.hours_worked()),
        MARGIN,
        y,
        BODY_SIZE,
        FontKind::Bold,
    );
    composer.y += 12.0;
}

fn draw_table_header_row(composer: &mut Composer) {
    let y = composer.y;
    let mut x = MARGIN;
    for (caption, width) in TABLE_COLUMNS {
        composer.push(DrawOp::Rect {
            x,
            y,
            width,
            height: TABLE_HEAD_ROW_HEIGHT,
            fill: Some(BRAND_BLUE),
            stroke: Some(GRID_STROKE),
        });
        composer.colored_text(
            caption,
            x + TABLE_CELL_PADDING,
            y + TABLE_HEAD_TEXT_DROP,
            BODY_SIZE,
            FontKind::Bold,
            WHITE,
        );
        x += width;
    }
    composer.y += TABLE_HEAD_ROW_HEIGHT;
}

fn draw_table_body_row(composer: &mut Composer, cells: [String; 4], tinted: bool) {
    let y = composer.y;
    let fill = tinted.then_some(ALT_ROW_TINT);
    let mut x = MARGIN;
    for ((_, width), cell) in TABLE_COLUMNS.iter().zip(cells) {
        composer.push(DrawOp::Rect {
            x,
            y,
            width: *width,
            height: TABLE_BODY_ROW_HEIGHT,
            fill,
            stroke: Some(GRID_STROKE),
        });
        composer.text(
            cell,
            x + TABLE_CELL_PADDING,
            y + TABLE_BODY_TEXT_DROP,
            TABLE_BODY_SIZE,
            FontKind::Regular,
        );
        x += width;
    }
    composer.y += TABLE_BODY_ROW_HEIGHT;
}

/// Grid table of labor entries with automatic page breaks.
///
/// The header row is repeated on every continuation page, and a break never
/// splits a body row: if the next row would cross the bottom limit the
/// remainder of the table moves to a fresh page.
fn draw_labor_table(composer: &mut Composer, data: &ReportData) {
    composer.section_header("LABOR DETAILS");
    composer.y += 5.0;

    // The header only goes down if at least one body row fits beneath it.
    if composer.y + TABLE_HEAD_ROW_HEIGHT + TABLE_BODY_ROW_HEIGHT > TABLE_BOTTOM_LIMIT {
        composer.start_page();
    }
    draw_table_header_row(composer);

    for (index, entry) in data.labor_details().iter().enumerate() {
        if composer.y + TABLE_BODY_ROW_HEIGHT > TABLE_BOTTOM_LIMIT {
            composer.start_page();
            draw_table_header_row(composer);
        }
        let cells = [
            entry.name().to_owned(),
            entry.role().to_owned(),
            format!("{} hrs", entry.hours()),
            entry.task().to_owned(),
        ];
        // The alternating tint aids readability only; it carries no meaning.
        draw_table_body_row(composer, cells, index % 2 == 1);
    }

    composer.y += 12.0;
}

fn draw_remarks(composer: &mut Composer, data: &ReportData) {
    if composer.y > REMARKS_PAGE_THRESHOLD {
        composer.start_page();
    }

    composer.section_header("REMARKS");
    composer.y += 8.0;

    for line in wrap_text(data.remarks(), USABLE_WIDTH, BODY_SIZE) {
        if !line.is_empty() {
            let y = composer.y;
            composer.text(line, MARGIN, y, BODY_SIZE, FontKind::Regular);
        }
        composer.y += REMARKS_LINE_STEP;
    }
}

/// Second pass: stamp "Page i of N" on every page.  Deferred until here
/// because the total page count is unknown while content is being laid out.
fn stamp_footers(pages: &mut [Page]) {
    let total = pages.len();
    for (index, page) in pages.iter_mut().enumerate() {
        let text = format!("Page {} of {}", index + 1, total);
        let x = (PAGE_WIDTH - estimate_text_width(&text, FOOTER_SIZE)) / 2.0;
        page.ops.push(DrawOp::Text(TextRun {
            text,
            x,
            y: FOOTER_BASELINE,
            size: FOOTER_SIZE,
            font: FontKind::Regular,
            color: FOOTER_GREY,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LaborField, ReportData, ReportPatch};

    fn base_report() -> ReportData {
        ReportData::new().update(ReportPatch {
            site: Some("Site A - Manufacturing Plant".to_owned()),
            machine: Some("Turbine - Siemens".to_owned()),
            report_type: Some("Daily Operations Report".to_owned()),
            date: Some("2025-01-15".to_owned()),
            engineer_name: Some("A. Diallo".to_owned()),
            hours_worked: Some(8.0),
            ..ReportPatch::default()
        })
    }

    fn with_crew(report: ReportData, count: usize) -> ReportData {
        let mut report = report;
        for i in 0..count {
            report = report.add_labor_entry();
            let id = report
                .labor_details()
                .last()
                .map(|entry| entry.id().to_owned())
                .unwrap();
            report = report.update_labor_entry(&id, LaborField::Name, &format!("crew-{i}"));
        }
        report
    }

    fn page_texts(page: &Page) -> Vec<String> {
        page.texts().map(str::to_owned).collect()
    }

    #[test]
    fn minimal_report_fits_one_page() {
        let pages = lay_out_report(&base_report(), "2025-01-15");
        assert_eq!(pages.len(), 1);

        let texts = page_texts(&pages[0]);
        assert!(texts.contains(&"Daily Operations Report".to_owned()));
        assert!(texts.contains(&"REPORT INFORMATION".to_owned()));
        assert!(texts.contains(&"Total Hours: 8 hrs".to_owned()));
        assert!(!texts.contains(&"LABOR DETAILS".to_owned()));
        assert!(!texts.contains(&"REMARKS".to_owned()));
        assert!(texts.contains(&"Page 1 of 1".to_owned()));
    }

    #[test]
    fn optional_metadata_rows_leave_no_gap() {
        let without = lay_out_report(&base_report(), "2025-01-15");
        assert!(!without[0].texts().any(|t| t.starts_with("Project Code:")));

        let report = base_report().update(ReportPatch {
            project_code: Some("PRJ-2024-001".to_owned()),
            location: Some("Bay 4".to_owned()),
            ..ReportPatch::default()
        });
        let with = lay_out_report(&report, "2025-01-15");
        let texts = page_texts(&with[0]);
        assert!(texts.contains(&"Project Code: PRJ-2024-001".to_owned()));
        assert!(texts.contains(&"Location: Bay 4".to_owned()));

        // With two extra rows the total-hours line sits 12 mm lower.
        let total_y = |pages: &[Page]| {
            pages[0]
                .ops
                .iter()
                .find_map(|op| match op {
                    DrawOp::Text(run) if run.text.starts_with("Total Hours:") => Some(run.y),
                    _ => None,
                })
                .unwrap()
        };
        assert_eq!(total_y(&with) - total_y(&without), 2.0 * META_LINE_STEP);
    }

    #[test]
    fn long_table_repeats_header_and_keeps_every_row_once() {
        let report = with_crew(base_report(), 100);
        let pages = lay_out_report(&report, "2025-01-15");
        assert!(pages.len() > 1);

        let mut seen = Vec::new();
        for page in &pages {
            let texts = page_texts(page);
            let rows: Vec<&String> = texts.iter().filter(|t| t.starts_with("crew-")).collect();
            if !rows.is_empty() {
                assert!(
                    texts.contains(&"Worker Name".to_owned()),
                    "page with body rows is missing the table header"
                );
            }
            seen.extend(rows.into_iter().cloned());
        }

        let expected: Vec<String> = (0..100).map(|i| format!("crew-{i}")).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn title_band_appears_on_the_first_page_only() {
        let report = with_crew(base_report(), 100);
        let pages = lay_out_report(&report, "2025-01-15");
        assert!(pages.len() > 1);

        for page in &pages[1..] {
            assert!(page.texts().all(|t| t != "Daily Operations Report"));
            assert!(page.ops.iter().all(|op| !matches!(
                op,
                DrawOp::Rect {
                    fill: Some(BRAND_BLUE),
                    width,
                    ..
                } if *width == PAGE_WIDTH
            )));
        }
    }

    #[test]
    fn remarks_move_to_a_fresh_page_when_the_cursor_runs_low() {
        // 25 rows end the table past the remarks threshold but still on
        // page 1, so the remarks section must open page 2.
        let report = with_crew(base_report(), 25).update(ReportPatch {
            remarks: Some("Coolant level checked.".to_owned()),
            ..ReportPatch::default()
        });
        let pages = lay_out_report(&report, "2025-01-15");
        assert_eq!(pages.len(), 2);
        assert!(!page_texts(&pages[0]).contains(&"REMARKS".to_owned()));
        assert!(page_texts(&pages[1]).contains(&"REMARKS".to_owned()));
    }

    #[test]
    fn embedded_line_breaks_in_remarks_are_hard_breaks() {
        let report = base_report().update(ReportPatch {
            remarks: Some("Shift handover complete.\nNo incidents recorded.".to_owned()),
            ..ReportPatch::default()
        });
        let pages = lay_out_report(&report, "2025-01-15");

        let lines: Vec<&TextRun> = pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(run)
                    if run.text == "Shift handover complete."
                        || run.text == "No incidents recorded." =>
                {
                    Some(run)
                }
                _ => None,
            })
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].y - lines[0].y, REMARKS_LINE_STEP);
    }

    #[test]
    fn every_page_gets_a_correct_footer() {
        let report = with_crew(base_report(), 100);
        let pages = lay_out_report(&report, "2025-01-15");
        let total = pages.len();

        for (index, page) in pages.iter().enumerate() {
            let expected = format!("Page {} of {}", index + 1, total);
            assert!(
                page_texts(page).contains(&expected),
                "missing footer {expected:?}"
            );
        }
    }

    #[test]
    fn wrapping_respects_width_and_word_boundaries() {
        let lines = wrap_text(
            "pump seal replaced after vibration alarm during the night shift",
            40.0,
            BODY_SIZE,
        );
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(estimate_text_width(line, BODY_SIZE) <= 40.0);
        }
        let rejoined = lines.join(" ");
        assert_eq!(
            rejoined,
            "pump seal replaced after vibration alarm during the night shift"
        );
    }

    #[test]
    fn wrapping_splits_words_wider_than_the_line() {
        let lines = wrap_text("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA", 20.0, BODY_SIZE);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(estimate_text_width(line, BODY_SIZE) <= 20.0);
        }
        assert_eq!(lines.concat(), "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
    }
}
