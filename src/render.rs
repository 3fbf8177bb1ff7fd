//! Document emitter: serializes laid-out pages to PDF bytes and handles
//! the derived output name and atomic save.
//!
//! The emitter is a dumb mapping from [`DrawOp`] values to the PDF backend;
//! all placement decisions were already made by the layout engine.  Any
//! backend failure aborts the whole document, so a partial artifact is
//! never produced.

use std::fs;
use std::io::{BufWriter, Cursor};
use std::path::{Path, PathBuf};

use log::{debug, info};
use printpdf::{
    Color as PdfColor, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb,
};
use thiserror::Error;

use crate::fonts::{self, FontSet};
use crate::layout::{self, Color, DrawOp, Page, PAGE_HEIGHT, PAGE_WIDTH};
use crate::model::ReportData;

const GRID_STROKE_WIDTH_PT: f64 = 0.2;

/// Failure while producing or saving the output document.
///
/// Both variants are fatal for the attempt; the caller may retry unchanged
/// but no partial output exists either way.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The PDF backend rejected the document.
    #[error("failed to serialize the PDF document: {0}")]
    Pdf(String),
    /// Writing the output file failed.
    #[error("failed to write the report file")]
    Io(#[from] std::io::Error),
}

/// A fully rendered report ready to hand to the host's save primitive.
pub struct RenderedReport {
    /// The serialized PDF document.
    pub bytes: Vec<u8>,
    /// The deterministic output name derived from the report metadata.
    pub filename: String,
}

/// Derives the output name: report type with whitespace runs collapsed to
/// single underscores, the report date, and the first whitespace-delimited
/// token of the site.
pub fn report_filename(data: &ReportData) -> String {
    let report_type = data
        .report_type()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    let site_token = data.site().split_whitespace().next().unwrap_or("");
    format!("{}_{}_{}.pdf", report_type, data.date(), site_token)
}

fn pdf_color(color: Color) -> PdfColor {
    PdfColor::Rgb(Rgb::new(
        f64::from(color.r) / 255.0,
        f64::from(color.g) / 255.0,
        f64::from(color.b) / 255.0,
        None,
    ))
}

/// Draws one laid-out page onto a PDF layer, flipping the y axis from the
/// layout's top-down millimetres to PDF's bottom-up coordinates.
fn draw_page(layer: &PdfLayerReference, page: &Page, fonts: &FontSet) {
    layer.set_outline_thickness(GRID_STROKE_WIDTH_PT);
    for op in &page.ops {
        match op {
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
            } => {
                if fill.is_none() && stroke.is_none() {
                    continue;
                }
                if let Some(color) = fill {
                    layer.set_fill_color(pdf_color(*color));
                }
                if let Some(color) = stroke {
                    layer.set_outline_color(pdf_color(*color));
                }
                let top = PAGE_HEIGHT - y;
                let bottom = PAGE_HEIGHT - (y + height);
                let points = vec![
                    (Point::new(Mm(*x), Mm(bottom)), false),
                    (Point::new(Mm(x + width), Mm(bottom)), false),
                    (Point::new(Mm(x + width), Mm(top)), false),
                    (Point::new(Mm(*x), Mm(top)), false),
                ];
                layer.add_shape(Line {
                    points,
                    is_closed: true,
                    has_fill: fill.is_some(),
                    has_stroke: stroke.is_some(),
                    is_clipping_path: false,
                });
            }
            DrawOp::Text(run) => {
                layer.set_fill_color(pdf_color(run.color));
                layer.use_text(
                    run.text.clone(),
                    run.size,
                    Mm(run.x),
                    Mm(PAGE_HEIGHT - run.y),
                    fonts.for_kind(run.font),
                );
            }
        }
    }
}

/// Serializes a page sequence into PDF bytes.
pub fn render_pages(pages: &[Page], title: &str) -> Result<Vec<u8>, RenderError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
    let fonts = fonts::install_builtin_fonts(&doc)?;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
            doc.get_page(page_index).get_layer(layer_index)
        };
        draw_page(&layer, page, &fonts);
    }

    let mut bytes = Vec::new();
    {
        let mut writer = BufWriter::new(Cursor::new(&mut bytes));
        doc.save(&mut writer)
            .map_err(|err| RenderError::Pdf(err.to_string()))?;
    }
    debug!("serialized {} pages ({} bytes)", pages.len(), bytes.len());
    Ok(bytes)
}

/// Runs layout and emission for `data` in one synchronous pass.
///
/// The title band subtitle carries today's date as the generation date.
pub fn render_report(data: &ReportData) -> Result<RenderedReport, RenderError> {
    let generated_on = chrono::Local::now().date_naive().to_string();
    let pages = layout::lay_out_report(data, &generated_on);
    let bytes = render_pages(&pages, data.report_type())?;
    Ok(RenderedReport {
        bytes,
        filename: report_filename(data),
    })
}

/// Renders `data` and writes it under `dir` using the derived filename.
///
/// The bytes go to a temporary sibling first and are renamed into place, so
/// no partially written report is ever observable at the final path.
pub fn save_report(data: &ReportData, dir: &Path) -> Result<PathBuf, RenderError> {
    let rendered = render_report(data)?;
    let path = dir.join(&rendered.filename);
    let staging = path.with_extension("pdf.partial");
    fs::write(&staging, &rendered.bytes)?;
    fs::rename(&staging, &path)?;
    info!("saved report to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::report_filename;
    use crate::model::{ReportData, ReportPatch};

    fn report(report_type: &str, date: &str, site: &str) -> ReportData {
        ReportData::new().update(ReportPatch {
            report_type: Some(report_type.to_owned()),
            date: Some(date.to_owned()),
            site: Some(site.to_owned()),
            ..ReportPatch::default()
        })
    }

    #[test]
    fn filename_collapses_whitespace_and_keeps_the_first_site_token() {
        let data = report(
            "Daily Operations Report",
            "2025-01-15",
            "Site A - Manufacturing Plant",
        );
        assert_eq!(
            report_filename(&data),
            "Daily_Operations_Report_2025-01-15_Site.pdf"
        );
    }

    #[test]
    fn filename_treats_whitespace_runs_as_one_separator() {
        let data = report("Weekly  Summary \t Report", "2025-02-01", "Depot");
        assert_eq!(
            report_filename(&data),
            "Weekly_Summary_Report_2025-02-01_Depot.pdf"
        );
    }
}
