use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect, Rgb,
};

use crate::error::ExportError;
use crate::layout::{
    DocumentLayout, Element, FontWeight, PageLayout, RgbColor, PAGE_HEIGHT_MM, PAGE_WIDTH_MM,
};

const GRID_LINE_WIDTH: f32 = 0.1;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn for_weight(&self, weight: FontWeight) -> &IndirectFontRef {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

fn render_error<E: std::fmt::Display>(err: E) -> ExportError {
    ExportError::Render(err.to_string())
}

/// Renders a laid-out document to PDF bytes using the built-in Helvetica
/// faces.
pub fn render_pdf(layout: &DocumentLayout, title: &str) -> Result<Vec<u8>, ExportError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_error)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_error)?,
    };

    let mut layers = vec![doc.get_page(first_page).get_layer(first_layer)];
    for _ in 1..layout.pages.len() {
        let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        layers.push(doc.get_page(page).get_layer(layer));
    }

    for (page, layer) in layout.pages.iter().zip(&layers) {
        draw_page(layer, page, &fonts);
    }
    drop(layers);

    let bytes = doc.save_to_bytes().map_err(render_error)?;
    tracing::debug!(pages = layout.pages.len(), bytes = bytes.len(), "rendered pdf");
    Ok(bytes)
}

fn draw_page(layer: &PdfLayerReference, page: &PageLayout, fonts: &Fonts) {
    layer.set_outline_thickness(GRID_LINE_WIDTH);

    for element in &page.elements {
        match element {
            Element::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
            } => {
                layer.set_outline_color(color(*stroke));
                let mode = match fill {
                    Some(fill) => {
                        layer.set_fill_color(color(*fill));
                        PaintMode::FillStroke
                    }
                    None => PaintMode::Stroke,
                };
                let rect = Rect::new(
                    Mm(*x),
                    Mm(PAGE_HEIGHT_MM - (y + height)),
                    Mm(x + width),
                    Mm(PAGE_HEIGHT_MM - y),
                )
                .with_mode(mode);
                layer.add_rect(rect);
            }
            Element::Text {
                text,
                x,
                y,
                size_pt,
                color: text_color,
                weight,
            } => {
                layer.set_fill_color(color(*text_color));
                layer.use_text(
                    text.as_str(),
                    *size_pt,
                    Mm(*x),
                    Mm(PAGE_HEIGHT_MM - y),
                    fonts.for_weight(*weight),
                );
            }
        }
    }
}

fn color(rgb: RgbColor) -> Color {
    let RgbColor(r, g, b) = rgb;
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}
