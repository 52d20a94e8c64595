use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::cms::masters::{ProductRecord, StationRecord};

/// Snapshot handed to the renderer: station identity plus the rate line for
/// the product pitched to the requester.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaKit {
    pub station_name: String,
    pub address: Option<String>,
    pub rate_lines: Vec<String>,
}

impl MediaKit {
    pub fn compose(station: &StationRecord, product: Option<&ProductRecord>) -> Self {
        let rate_lines = match product {
            Some(record) => vec![rate_line(record)],
            None => vec!["Rates shared on request for this station.".to_string()],
        };

        Self {
            station_name: station.name.clone(),
            address: station.address.clone(),
            rate_lines,
        }
    }
}

fn rate_line(product: &ProductRecord) -> String {
    let mut line = product.name.clone();
    if let Some(format) = &product.format {
        line.push_str(&format!(" ({format})"));
    }
    match &product.rate {
        Some(rate) => line.push_str(&format!(" - INR {} {}", rate.amount, rate.unit)),
        None => line.push_str(" - rate on request"),
    }
    line
}

/// Rendering error from the PDF backend.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("pdf rendering failed: {0}")]
    Backend(String),
}

/// Trait kept narrow so the notification flow never touches the PDF library
/// directly.
pub trait MediaKitRenderer: Send + Sync {
    fn render(&self, kit: &MediaKit) -> Result<Vec<u8>, RenderError>;
}

/// Single-page A4 rate card set in the builtin Helvetica faces.
#[derive(Debug, Default)]
pub struct RateCardPdf;

impl MediaKitRenderer for RateCardPdf {
    fn render(&self, kit: &MediaKit) -> Result<Vec<u8>, RenderError> {
        let (doc, page, layer) = PdfDocument::new(
            format!("{} media kit", kit.station_name),
            Mm(210.0),
            Mm(297.0),
            "rate card",
        );
        let heading = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(backend)?;
        let body = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(backend)?;

        let layer = doc.get_page(page).get_layer(layer);
        let mut baseline = 270.0;

        layer.use_text(kit.station_name.clone(), 20.0, Mm(20.0), Mm(baseline), &heading);
        baseline -= 10.0;

        if let Some(address) = &kit.address {
            layer.use_text(address.clone(), 11.0, Mm(20.0), Mm(baseline), &body);
            baseline -= 10.0;
        }

        layer.use_text("Advertising rates", 14.0, Mm(20.0), Mm(baseline), &heading);
        baseline -= 8.0;

        for line in &kit.rate_lines {
            layer.use_text(line.clone(), 11.0, Mm(20.0), Mm(baseline), &body);
            baseline -= 7.0;
        }

        baseline -= 6.0;
        layer.use_text(
            "Reply to this email and our sales team will take it from there.",
            10.0,
            Mm(20.0),
            Mm(baseline),
            &body,
        );

        doc.save_to_bytes().map_err(backend)
    }
}

fn backend<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Backend(err.to_string())
}
