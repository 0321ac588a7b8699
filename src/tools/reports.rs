//! Report generation tools
//!
//! Generates the comprehensive PDF medical report: per-test range charts,
//! abnormal-result narratives, a risk summary, and care guides.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::image_crate::{DynamicImage, ImageFormat, RgbImage};
use printpdf::*;
use serde::Serialize;

use crate::analysis::{self, ClassificationRecord};
use crate::db::Database;
use crate::models::{ReferenceRange, TestResult, UserProfile};

// ============================================================================
// Color Constants (RGB 0-255)
// ============================================================================

const COLOR_TITLE: (u8, u8, u8) = (0, 51, 102); // Navy
const COLOR_NORMAL: (u8, u8, u8) = (0, 176, 80); // Green
const COLOR_ABNORMAL: (u8, u8, u8) = (255, 0, 0); // Red
const COLOR_BLACK: (u8, u8, u8) = (0, 0, 0);
const COLOR_GRAY: (u8, u8, u8) = (128, 128, 128);

// ============================================================================
// Page Layout Constants (Letter portrait, mm)
// ============================================================================

const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_LEFT: f32 = 15.0;
const MARGIN_TOP: f32 = 20.0;
const MARGIN_BOTTOM: f32 = 20.0;

/// Wrap width for 10pt body text on a letter page
const WRAP_CHARS: usize = 95;

/// Chart raster size in pixels; embedded at 150 DPI (152mm wide)
const CHART_WIDTH_PX: u32 = 900;
const CHART_HEIGHT_PX: u32 = 300;
const CHART_BLOCK_MM: f32 = 56.0;

/// White-cell differential pairs rendered together when both members are
/// present, sharing one narrative block
const DIFFERENTIAL_GROUPS: [[&str; 2]; 5] = [
    ["Lymphocytes", "Lymphocytes %"],
    ["Monocytes", "Monocytes %"],
    ["Neutrophils", "Neutrophils %"],
    ["Eosinophils", "Eosinophils %"],
    ["Basophils", "Basophils %"],
];

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateReportResponse {
    pub success: bool,
    pub file_path: String,
    pub tests_analyzed: usize,
    pub abnormal_count: i64,
    pub health_score: f64,
    pub message: String,
}

// ============================================================================
// Chart Generation (plotters)
// ============================================================================

/// Render a range-position chart as PNG bytes: shaded normal band, min/max
/// markers, and the test value highlighted against them.
pub fn generate_range_chart(
    test_name: &str,
    min: f64,
    max: f64,
    value: f64,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, String> {
    use plotters::prelude::*;

    let span = if max > min {
        (max - min) * 0.5
    } else {
        min.abs() * 0.5
    };
    let span = if span > 0.0 { span } else { 1.0 };
    let x_min = (min - span).min(value - span);
    let x_max = (max + span).max(value + span);

    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .caption(format!("{} Test Result", test_name), ("sans-serif", 28))
            .x_label_area_size(40)
            .y_label_area_size(10)
            .build_cartesian_2d(x_min..x_max, 0.0..1.0f64)
            .map_err(|e| e.to_string())?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .disable_y_axis()
            .x_desc("Test Value")
            .draw()
            .map_err(|e| e.to_string())?;

        // Shade the out-of-range side only when the value sits there
        if value < min {
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(x_min, 0.0), (min, 1.0)],
                    RGBColor(250, 128, 114).mix(0.3).filled(),
                )))
                .map_err(|e| e.to_string())?
                .label("Below Normal Range")
                .legend(|(x, y)| {
                    Rectangle::new(
                        [(x, y - 5), (x + 10, y + 5)],
                        RGBColor(250, 128, 114).mix(0.3).filled(),
                    )
                });
        }
        if value > max {
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(max, 0.0), (x_max, 1.0)],
                    RGBColor(250, 128, 114).mix(0.3).filled(),
                )))
                .map_err(|e| e.to_string())?
                .label("Above Normal Range")
                .legend(|(x, y)| {
                    Rectangle::new(
                        [(x, y - 5), (x + 10, y + 5)],
                        RGBColor(250, 128, 114).mix(0.3).filled(),
                    )
                });
        }

        // Normal band
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(min, 0.0), (max, 1.0)],
                RGBColor(135, 206, 235).mix(0.3).filled(),
            )))
            .map_err(|e| e.to_string())?
            .label("Normal Range")
            .legend(|(x, y)| {
                Rectangle::new(
                    [(x, y - 5), (x + 10, y + 5)],
                    RGBColor(135, 206, 235).mix(0.3).filled(),
                )
            });

        // Range boundary markers
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(min, 0.0), (min, 1.0)],
                RGBColor(30, 144, 255).stroke_width(2),
            )))
            .map_err(|e| e.to_string())?
            .label("Min Range")
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], RGBColor(30, 144, 255).stroke_width(2))
            });

        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(max, 0.0), (max, 1.0)],
                RGBColor(65, 105, 225).stroke_width(2),
            )))
            .map_err(|e| e.to_string())?
            .label("Max Range")
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], RGBColor(65, 105, 225).stroke_width(2))
            });

        // The value itself
        let marker = if value < min || value > max {
            RGBColor(255, 0, 0)
        } else {
            RGBColor(30, 144, 255)
        };
        chart
            .draw_series(std::iter::once(Circle::new((value, 0.35), 8, marker.filled())))
            .map_err(|e| e.to_string())?
            .label("Your Test Value")
            .legend(move |(x, y)| Circle::new((x + 10, y), 5, marker.filled()));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| e.to_string())?;

        root.present().map_err(|e| e.to_string())?;
    }

    // Convert RGB buffer to PNG
    let img =
        RgbImage::from_raw(width, height, buffer).ok_or("Failed to create image from buffer")?;

    let mut png_bytes = Vec::new();
    let dyn_img = DynamicImage::ImageRgb8(img);
    dyn_img
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| e.to_string())?;

    Ok(png_bytes)
}

// ============================================================================
// PDF Writer
// ============================================================================

fn rgb_to_printpdf(color: (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        color.0 as f32 / 255.0,
        color.1 as f32 / 255.0,
        color.2 as f32 / 255.0,
        None,
    ))
}

/// Word-wrap body text to a fixed column width
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Cursor-based writer over a multi-page portrait document
struct ReportWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    y: f32,
}

impl ReportWriter {
    fn new(title: &str) -> Result<Self, String> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");

        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| e.to_string())?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| e.to_string())?;

        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            font,
            font_bold,
            y: PAGE_HEIGHT_MM - MARGIN_TOP,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Page");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT_MM - MARGIN_TOP;
    }

    /// Start a new page unless `needed` mm still fit on this one
    fn ensure_space(&mut self, needed: f32) {
        if self.y - needed < MARGIN_BOTTOM {
            self.new_page();
        }
    }

    fn heading(&mut self, text: &str, size: f32, color: (u8, u8, u8)) {
        self.ensure_space(12.0);
        self.layer.set_fill_color(rgb_to_printpdf(color));
        self.layer
            .use_text(text, size, Mm(MARGIN_LEFT), Mm(self.y), &self.font_bold);
        self.y -= size * 0.55;
    }

    fn line(&mut self, text: &str, color: (u8, u8, u8)) {
        self.ensure_space(6.0);
        self.layer.set_fill_color(rgb_to_printpdf(color));
        self.layer
            .use_text(text, 10.0, Mm(MARGIN_LEFT), Mm(self.y), &self.font);
        self.y -= 5.0;
    }

    /// Labeled field, wrapping long values onto continuation lines
    fn field(&mut self, label: &str, value: &str) {
        let full = format!("{}: {}", label, value);
        for line in wrap_text(&full, WRAP_CHARS) {
            self.line(&line, COLOR_BLACK);
        }
    }

    fn spacer(&mut self, mm: f32) {
        self.y -= mm;
    }

    fn rule(&mut self) {
        self.ensure_space(6.0);
        self.layer.set_outline_color(rgb_to_printpdf(COLOR_GRAY));
        self.layer.set_outline_thickness(0.5);
        let line = Line {
            points: vec![
                (Point::new(Mm(MARGIN_LEFT), Mm(self.y)), false),
                (
                    Point::new(Mm(PAGE_WIDTH_MM - MARGIN_LEFT), Mm(self.y)),
                    false,
                ),
            ],
            is_closed: false,
        };
        self.layer.add_line(line);
        self.y -= 6.0;
    }

    /// Embed a PNG chart, or degrade to a placeholder note on failure
    fn chart_or_note(&mut self, test_name: &str, chart: Result<Vec<u8>, String>) {
        match chart.and_then(|png| {
            printpdf::image_crate::load_from_memory(&png).map_err(|e| e.to_string())
        }) {
            Ok(dynamic_image) => {
                self.ensure_space(CHART_BLOCK_MM);
                let pdf_image = Image::from_dynamic_image(&dynamic_image);
                let transform = ImageTransform {
                    translate_x: Some(Mm(MARGIN_LEFT)),
                    translate_y: Some(Mm(self.y - CHART_BLOCK_MM + 4.0)),
                    dpi: Some(150.0),
                    ..Default::default()
                };
                pdf_image.add_to_layer(self.layer.clone(), transform);
                self.y -= CHART_BLOCK_MM;
            }
            Err(e) => {
                tracing::warn!("chart generation failed for '{}': {}", test_name, e);
                self.line(
                    &format!("Plot Error: Could not display plot for {}.", test_name),
                    COLOR_ABNORMAL,
                );
            }
        }
    }

    fn save(self, output_path: &str) -> Result<(), String> {
        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let file = File::create(path).map_err(|e| e.to_string())?;
        let mut writer = BufWriter::new(file);
        self.doc.save(&mut writer).map_err(|e| e.to_string())
    }
}

// ============================================================================
// Report Sections
// ============================================================================

/// One classified test ready for rendering
struct AnalyzedTest {
    value: f64,
    min: f64,
    max: f64,
    record: ClassificationRecord,
}

/// Classify one latest value against the stored ranges. Err carries the
/// note rendered in place of the classification block.
fn analyze_latest(
    conn: &rusqlite::Connection,
    test_name: &str,
    raw_value: &str,
) -> Result<AnalyzedTest, String> {
    let value = raw_value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| "Invalid test or range values.".to_string())?;

    let range = ReferenceRange::get_by_name(conn, test_name)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "Test not found in reference data.".to_string())?;
    let (min, max) = range
        .bounds()
        .ok_or_else(|| "Invalid test or range values.".to_string())?;

    let record = analysis::classify(test_name, value, &range)
        .ok_or_else(|| "Invalid test or range values.".to_string())?;

    Ok(AnalyzedTest {
        value,
        min,
        max,
        record,
    })
}

/// Value line, result line, and chart for one test
fn write_test_core(writer: &mut ReportWriter, analyzed: &AnalyzedTest) {
    let result_color = if analyzed.record.result.is_abnormal() {
        COLOR_ABNORMAL
    } else {
        COLOR_NORMAL
    };

    writer.field("Test", &analyzed.record.test_name);
    writer.field("Your Value", &analyzed.value.to_string());
    writer.line(
        &format!("Result: {}", analyzed.record.result.as_str()),
        result_color,
    );
    writer.spacer(1.0);

    writer.chart_or_note(
        &analyzed.record.test_name,
        generate_range_chart(
            &analyzed.record.test_name,
            analyzed.min,
            analyzed.max,
            analyzed.value,
            CHART_WIDTH_PX,
            CHART_HEIGHT_PX,
        ),
    );
}

/// Narrative block for an abnormal classification
fn write_abnormal_narrative(writer: &mut ReportWriter, record: &ClassificationRecord) {
    writer.field("Possible Diseases", &record.indication);
    writer.field("Treatment Guide", &record.treatment_guide);
    writer.field("Suggested Doctor", &record.specialization);
    writer.field("Time to Reach Normal Range", &record.time_to_normal);
}

/// Closing lines shown for every analyzed test
fn write_test_footer(writer: &mut ReportWriter, record: &ClassificationRecord) {
    writer.field("Next Recommended Test Date", &record.retest_recommendation);
    writer.field("Health Information", &record.health_information);
    writer.spacer(4.0);
    writer.rule();
}

// ============================================================================
// Report Generation
// ============================================================================

/// Generate the comprehensive PDF medical report for a user
pub fn generate_report(
    db: &Database,
    user_id: &str,
    output_path: &str,
) -> Result<GenerateReportResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    // A missing profile is the one hard failure in this path
    let profile = UserProfile::get(&conn, user_id)
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or("User not found.")?;

    let results = TestResult::list_for_user(&conn, user_id)
        .map_err(|e| format!("Failed to load test results: {}", e))?;
    let latest = analysis::latest_raw_values(&results);

    let mut writer = ReportWriter::new("Comprehensive Medical Test Report")?;

    // Header
    writer.heading("Comprehensive Medical Test Report", 18.0, COLOR_TITLE);
    writer.spacer(4.0);
    writer.field("Patient Name", &profile.name);
    writer.field(
        "Age",
        &profile
            .age
            .map(|a| a.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
    );
    writer.field("Date", &chrono::Local::now().format("%Y-%m-%d").to_string());
    writer.rule();

    let mut processed: Vec<&str> = Vec::new();

    // Differential pairs share one narrative block
    for group in DIFFERENTIAL_GROUPS {
        if !group.iter().all(|test| latest.contains_key(*test)) {
            continue;
        }

        let analyzed: Vec<AnalyzedTest> = group
            .iter()
            .filter_map(|test| analyze_latest(&conn, test, &latest[*test]).ok())
            .collect();
        if analyzed.len() < group.len() {
            // A member failed to classify; leave the whole group to the
            // individual section so its note is rendered
            continue;
        }

        for test in &analyzed {
            write_test_core(&mut writer, test);
        }

        if let Some(abnormal) = analyzed
            .iter()
            .rev()
            .find(|t| t.record.result.is_abnormal())
        {
            write_abnormal_narrative(&mut writer, &abnormal.record);
        }
        if let Some(last) = analyzed.last() {
            write_test_footer(&mut writer, &last.record);
        }

        processed.extend(group);
    }

    // Remaining tests, individually
    for (test_name, raw_value) in &latest {
        if processed.iter().any(|p| *p == test_name.as_str()) {
            continue;
        }

        match analyze_latest(&conn, test_name, raw_value) {
            Ok(analyzed) => {
                write_test_core(&mut writer, &analyzed);
                if analyzed.record.result.is_abnormal() {
                    write_abnormal_narrative(&mut writer, &analyzed.record);
                }
                write_test_footer(&mut writer, &analyzed.record);
            }
            Err(reason) => {
                writer.field("Test", test_name);
                writer.field("Your Value", raw_value);
                writer.field("Status", &format!("Unable to analyze. Reason: {}", reason));
                writer.spacer(4.0);
                writer.rule();
            }
        }
    }

    // Risk summary over the same latest values
    let entries: Vec<(String, String)> = latest
        .iter()
        .map(|(test, value)| (test.clone(), value.clone()))
        .collect();
    let risk = analysis::calculate_risk(&entries, &*conn);

    writer.heading("Health Risk Score Summary", 13.0, COLOR_BLACK);
    writer.spacer(3.0);
    writer.field("Total Abnormal Results", &risk.abnormal_count.to_string());
    writer.field("Health Status", &risk.status);
    writer.field("Your Health Insight", &risk.message);
    writer.spacer(4.0);

    // Care guides
    writer.heading("Care Guides", 13.0, COLOR_BLACK);
    writer.spacer(3.0);
    let guides = analysis::unique_care_guides(latest.keys().map(String::as_str), &*conn);
    if guides.is_empty() {
        writer.line("No specific care guides available.", COLOR_BLACK);
    } else {
        for guide in &guides {
            for line in wrap_text(&format!("- {}", guide), WRAP_CHARS) {
                writer.line(&line, COLOR_BLACK);
            }
        }
    }

    writer.save(output_path)?;

    let tests_analyzed = latest.len();
    tracing::info!(
        "generated report for user '{}' at {} ({} tests)",
        user_id,
        output_path,
        tests_analyzed
    );

    Ok(GenerateReportResponse {
        success: true,
        file_path: output_path.to_string(),
        tests_analyzed,
        abnormal_count: risk.abnormal_count,
        health_score: risk.health_score,
        message: format!(
            "Medical report generated for {} covering {} tests",
            profile.name, tests_analyzed
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testutil::TempDb;
    use crate::models::{ReferenceRangeUpsert, TestResultCreate};

    #[test]
    fn test_wrap_text_respects_width() {
        let text = "alpha beta gamma delta epsilon";
        let lines = wrap_text(text, 12);
        assert!(lines.iter().all(|l| l.len() <= 12));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_text_empty_yields_single_line() {
        assert_eq!(wrap_text("", 20), vec![String::new()]);
    }

    #[test]
    fn test_chart_renders_png() {
        let png = generate_range_chart("Glucose", 70.0, 100.0, 120.0, 300, 150).unwrap();
        // PNG signature
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn test_chart_handles_degenerate_ranges() {
        assert!(generate_range_chart("T", 10.0, 10.0, 10.0, 300, 150).is_ok());
        assert!(generate_range_chart("T", 0.0, 0.0, 0.0, 300, 150).is_ok());
    }

    fn seed_range(conn: &rusqlite::Connection, test: &str, min: f64, max: f64) {
        ReferenceRange::set(
            conn,
            &ReferenceRangeUpsert {
                test_name: test.into(),
                min_value: Some(min),
                max_value: Some(max),
                ..Default::default()
            },
        )
        .unwrap();
    }

    fn seed_result(conn: &rusqlite::Connection, test: &str, value: &str) {
        TestResult::create(
            conn,
            &TestResultCreate {
                user_id: "u1".into(),
                test_name: test.into(),
                value: value.into(),
                date: "2025-02-01".into(),
            },
        )
        .unwrap();
    }

    #[test]
    fn test_generate_report_writes_pdf() {
        let tmp = TempDb::new("reports");
        tmp.db
            .with_conn(|conn| {
                crate::models::UserProfile::set(conn, "u1", "Alice Doe", Some(42))?;
                ReferenceRange::set(
                    conn,
                    &ReferenceRangeUpsert {
                        test_name: "Glucose".into(),
                        min_value: Some(70.0),
                        max_value: Some(100.0),
                        care_guide: Some("Limit refined sugar.".into()),
                        ..Default::default()
                    },
                )?;
                seed_result(conn, "Glucose", "120");
                // No reference range for this one; rendered as a note
                seed_result(conn, "Ferritin", "55");
                Ok(())
            })
            .unwrap();

        let output = tmp.path("report.pdf");
        let response = generate_report(&tmp.db, "u1", output.to_str().unwrap()).unwrap();

        assert!(response.success);
        assert_eq!(response.tests_analyzed, 2);
        assert_eq!(response.abnormal_count, 1);
        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(&bytes[..5], b"%PDF-");
    }

    #[test]
    fn test_generate_report_renders_differential_pair() {
        let tmp = TempDb::new("reports");
        tmp.db
            .with_conn(|conn| {
                crate::models::UserProfile::set(conn, "u1", "Alice Doe", Some(42))?;
                seed_range(conn, "Lymphocytes", 1.0, 4.8);
                seed_range(conn, "Lymphocytes %", 20.0, 40.0);
                seed_result(conn, "Lymphocytes", "5.6");
                seed_result(conn, "Lymphocytes %", "30");
                Ok(())
            })
            .unwrap();

        let output = tmp.path("report.pdf");
        let response = generate_report(&tmp.db, "u1", output.to_str().unwrap()).unwrap();

        assert!(response.success);
        assert_eq!(response.tests_analyzed, 2);
        // Only the absolute count is out of range
        assert_eq!(response.abnormal_count, 1);
        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(&bytes[..5], b"%PDF-");
    }

    #[test]
    fn test_differential_pair_falls_back_when_member_unclassifiable() {
        let tmp = TempDb::new("reports");
        tmp.db
            .with_conn(|conn| {
                crate::models::UserProfile::set(conn, "u1", "Alice Doe", Some(42))?;
                // Only the absolute count has a range; the "%" member cannot
                // be classified, so both render in the individual section
                seed_range(conn, "Lymphocytes", 1.0, 4.8);
                seed_result(conn, "Lymphocytes", "5.6");
                seed_result(conn, "Lymphocytes %", "30");
                Ok(())
            })
            .unwrap();

        let output = tmp.path("report.pdf");
        let response = generate_report(&tmp.db, "u1", output.to_str().unwrap()).unwrap();

        assert!(response.success);
        assert_eq!(response.tests_analyzed, 2);
        assert_eq!(response.abnormal_count, 1);
        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(&bytes[..5], b"%PDF-");
    }

    #[test]
    fn test_generate_report_requires_profile() {
        let tmp = TempDb::new("reports");
        let output = tmp.path("report.pdf");
        let err = generate_report(&tmp.db, "missing", output.to_str().unwrap()).unwrap_err();
        assert_eq!(err, "User not found.");
    }
}
