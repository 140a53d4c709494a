//! Page layout for the intervention report.
//!
//! Coordinates are millimetres on an A4 portrait page with the origin at the
//! top-left corner; text `y` is the baseline. The renderer flips the axis.

use chrono::NaiveDate;

use crate::models::RiskFactorReport;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 14.0;

pub const TITLE: &str = "Pre-Delinquency Intervention Report";
pub const FOOTER: &str = "Confidential - Internal Use Only";
pub const TABLE_HEADERS: [&str; 3] = [
    "Risk Factor / Distress Indicator",
    "Impact (%)",
    "Users Affected",
];

const TITLE_Y: f32 = 22.0;
const GENERATED_Y: f32 = 30.0;
const TOTAL_Y: f32 = 36.0;
const TABLE_START_Y: f32 = 45.0;
const FOOTER_GAP_MM: f32 = 10.0;

const TITLE_SIZE: f32 = 20.0;
const META_SIZE: f32 = 11.0;
const BODY_SIZE: f32 = 10.0;
const FOOTER_SIZE: f32 = 9.0;

const CELL_PADDING_MM: f32 = 4.0;
const COLUMN_WIDTHS: [f32; 3] = [100.0, 40.0, 40.0];
const COLUMN_ALIGN: [Align; 3] = [Align::Left, Align::Center, Align::Center];

const PT_TO_MM: f32 = 25.4 / 72.0;
const LINE_HEIGHT_FACTOR: f32 = 1.15;
// average Helvetica glyph advance, in ems
const REGULAR_ADVANCE_EM: f32 = 0.5;
const BOLD_ADVANCE_EM: f32 = 0.55;

const TITLE_COLOR: RgbColor = RgbColor(40, 44, 52);
const META_COLOR: RgbColor = RgbColor(100, 116, 139);
const HEAD_FILL: RgbColor = RgbColor(41, 128, 185);
const HEAD_TEXT: RgbColor = RgbColor(255, 255, 255);
const BODY_TEXT: RgbColor = RgbColor(20, 20, 20);
const GRID_LINE: RgbColor = RgbColor(200, 200, 200);
const FOOTER_COLOR: RgbColor = RgbColor(150, 150, 150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColor(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text {
        text: String,
        x: f32,
        y: f32,
        size_pt: f32,
        color: RgbColor,
        weight: FontWeight,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<RgbColor>,
        stroke: RgbColor,
    },
}

impl Element {
    /// Lowest point the element reaches on the page.
    pub fn bottom(&self) -> f32 {
        match self {
            Element::Text { y, .. } => *y,
            Element::Rect { y, height, .. } => y + height,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Element::Text { text, .. } => Some(text),
            Element::Rect { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<PageLayout>,
    /// Page index and y of the table's last row edge.
    pub table_end: (usize, f32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMeta {
    pub generated_on: NaiveDate,
}

impl ReportMeta {
    pub fn today() -> Self {
        Self {
            generated_on: chrono::Local::now().date_naive(),
        }
    }

    pub fn generated_label(&self) -> String {
        self.generated_on.format("%d/%m/%Y").to_string()
    }
}

pub fn row_height() -> f32 {
    BODY_SIZE * PT_TO_MM * LINE_HEIGHT_FACTOR + 2.0 * CELL_PADDING_MM
}

pub fn estimate_text_width(text: &str, size_pt: f32, weight: FontWeight) -> f32 {
    let advance = match weight {
        FontWeight::Regular => REGULAR_ADVANCE_EM,
        FontWeight::Bold => BOLD_ADVANCE_EM,
    };
    text.chars().count() as f32 * size_pt * PT_TO_MM * advance
}

/// Shortens `text` with a trailing `...` so it fits in `width` millimetres.
pub fn fit_to_width(text: &str, width: f32, size_pt: f32, weight: FontWeight) -> String {
    if estimate_text_width(text, size_pt, weight) <= width {
        return text.to_string();
    }

    let glyph = estimate_text_width("M", size_pt, weight);
    let max_chars = (width / glyph).floor() as usize;
    if max_chars <= 3 {
        return ".".repeat(max_chars);
    }

    let mut shortened: String = text.chars().take(max_chars - 3).collect();
    shortened.push_str("...");
    shortened
}

pub fn layout_report(report: &RiskFactorReport, meta: &ReportMeta) -> DocumentLayout {
    let bottom = PAGE_HEIGHT_MM - MARGIN_MM;
    let row_h = row_height();

    let mut first = PageLayout::default();
    first.elements.push(text(TITLE, MARGIN_MM, TITLE_Y, TITLE_SIZE, TITLE_COLOR, FontWeight::Regular));
    first.elements.push(text(
        &format!("Generated on: {}", meta.generated_label()),
        MARGIN_MM,
        GENERATED_Y,
        META_SIZE,
        META_COLOR,
        FontWeight::Regular,
    ));
    first.elements.push(text(
        &format!("Total High-Risk Profiles Analyzed: {}", report.total_high_risk),
        MARGIN_MM,
        TOTAL_Y,
        META_SIZE,
        META_COLOR,
        FontWeight::Regular,
    ));

    let mut pages = vec![first];
    let header: Vec<String> = TABLE_HEADERS.iter().map(|h| h.to_string()).collect();
    push_row(pages_last(&mut pages), TABLE_START_Y, &header, true);
    let mut y = TABLE_START_Y + row_h;

    for factor in &report.factors {
        if y + row_h > bottom {
            pages.push(PageLayout::default());
            y = MARGIN_MM;
            push_row(pages_last(&mut pages), y, &header, true);
            y += row_h;
        }

        let cells = vec![
            factor.name.clone(),
            format!("{:.1}%", factor.percent),
            factor.count.to_string(),
        ];
        push_row(pages_last(&mut pages), y, &cells, false);
        y += row_h;
    }

    let table_end = (pages.len() - 1, y);

    let mut footer_y = y + FOOTER_GAP_MM;
    if footer_y > bottom {
        pages.push(PageLayout::default());
        footer_y = MARGIN_MM + FOOTER_GAP_MM;
    }
    pages_last(&mut pages).elements.push(text(
        FOOTER,
        MARGIN_MM,
        footer_y,
        FOOTER_SIZE,
        FOOTER_COLOR,
        FontWeight::Regular,
    ));

    DocumentLayout { pages, table_end }
}

fn pages_last(pages: &mut [PageLayout]) -> &mut PageLayout {
    let last = pages.len() - 1;
    &mut pages[last]
}

fn push_row(page: &mut PageLayout, top: f32, cells: &[String], header: bool) {
    let row_h = row_height();
    let (weight, fill, color) = if header {
        (FontWeight::Bold, Some(HEAD_FILL), HEAD_TEXT)
    } else {
        (FontWeight::Regular, None, BODY_TEXT)
    };
    let baseline = top + row_h / 2.0 + BODY_SIZE * PT_TO_MM * 0.35;

    let mut x = MARGIN_MM;
    for ((cell, width), align) in cells.iter().zip(COLUMN_WIDTHS).zip(COLUMN_ALIGN) {
        page.elements.push(Element::Rect {
            x,
            y: top,
            width,
            height: row_h,
            fill,
            stroke: GRID_LINE,
        });

        let content = fit_to_width(cell, width - 2.0 * CELL_PADDING_MM, BODY_SIZE, weight);
        let text_x = match align {
            Align::Left => x + CELL_PADDING_MM,
            Align::Center => {
                x + (width - estimate_text_width(&content, BODY_SIZE, weight)) / 2.0
            }
        };
        page.elements.push(text(&content, text_x, baseline, BODY_SIZE, color, weight));
        x += width;
    }
}

fn text(
    content: &str,
    x: f32,
    y: f32,
    size_pt: f32,
    color: RgbColor,
    weight: FontWeight,
) -> Element {
    Element::Text {
        text: content.to_string(),
        x,
        y,
        size_pt,
        color,
        weight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FactorEntry;

    fn meta() -> ReportMeta {
        ReportMeta {
            generated_on: NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
        }
    }

    fn report_with(count: usize) -> RiskFactorReport {
        RiskFactorReport {
            total_high_risk: count,
            factors: (0..count)
                .map(|i| FactorEntry {
                    name: format!("Factor {i:02}"),
                    count: 1,
                    percent: 100.0 / count as f64,
                })
                .collect(),
        }
    }

    fn texts(page: &PageLayout) -> Vec<&str> {
        page.elements.iter().filter_map(Element::text).collect()
    }

    #[test]
    fn single_page_report_has_fixed_blocks() {
        let layout = layout_report(&report_with(2), &meta());
        assert_eq!(layout.pages.len(), 1);

        let page = &layout.pages[0];
        let texts = texts(page);
        assert_eq!(texts[0], TITLE);
        assert_eq!(texts[1], "Generated on: 03/02/2026");
        assert_eq!(texts[2], "Total High-Risk Profiles Analyzed: 2");
        assert!(texts.contains(&"Factor 00"));
        assert!(texts.contains(&"50.0%"));
        assert_eq!(*texts.last().unwrap(), FOOTER);
    }

    #[test]
    fn footer_sits_below_final_row() {
        let layout = layout_report(&report_with(3), &meta());
        let (page, end_y) = layout.table_end;
        assert_eq!(page, 0);
        assert!((end_y - (TABLE_START_Y + 4.0 * row_height())).abs() < 1e-3);

        let footer = layout.pages[0].elements.last().unwrap();
        assert!((footer.bottom() - (end_y + FOOTER_GAP_MM)).abs() < 1e-3);
    }

    #[test]
    fn long_tables_overflow_with_repeated_header() {
        let layout = layout_report(&report_with(40), &meta());
        assert_eq!(layout.pages.len(), 3);

        let bottom = PAGE_HEIGHT_MM - MARGIN_MM;
        for page in &layout.pages {
            assert!(texts(page).contains(&TABLE_HEADERS[0]));
            assert!(page.elements.iter().all(|el| el.bottom() <= bottom + 1e-3));
        }

        let body_rows: usize = layout
            .pages
            .iter()
            .flat_map(|page| page.elements.iter())
            .filter(|el| el.text().is_some_and(|t| t.starts_with("Factor ")))
            .count();
        assert_eq!(body_rows, 40);
    }

    #[test]
    fn footer_moves_to_fresh_page_when_table_fills_first_page() {
        let layout = layout_report(&report_with(18), &meta());
        assert_eq!(layout.pages.len(), 2);

        let (page, end_y) = layout.table_end;
        assert_eq!(page, 0);
        assert!(end_y + FOOTER_GAP_MM > PAGE_HEIGHT_MM - MARGIN_MM);

        let overflow = &layout.pages[1];
        assert_eq!(overflow.elements.len(), 1);
        assert_eq!(overflow.elements[0].text(), Some(FOOTER));
        assert!((overflow.elements[0].bottom() - (MARGIN_MM + FOOTER_GAP_MM)).abs() < 1e-3);
    }

    #[test]
    fn empty_report_still_renders_header_and_footer() {
        let layout = layout_report(&report_with(0), &meta());
        let texts = texts(&layout.pages[0]);
        assert!(texts.contains(&"Total High-Risk Profiles Analyzed: 0"));
        assert!(texts.contains(&TABLE_HEADERS[2]));
        assert_eq!(*texts.last().unwrap(), FOOTER);
    }

    #[test]
    fn long_factor_names_are_truncated() {
        let name = "Persistent salary credit delay combined with rising micro-credit usage";
        let fitted = fit_to_width(name, 92.0, BODY_SIZE, FontWeight::Regular);
        assert!(fitted.ends_with("..."));
        assert!(estimate_text_width(&fitted, BODY_SIZE, FontWeight::Regular) <= 92.0);
        assert_eq!(fit_to_width("Medical", 92.0, BODY_SIZE, FontWeight::Regular), "Medical");
    }
}
