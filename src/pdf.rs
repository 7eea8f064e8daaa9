use headless_chrome::types::PrintToPdfOptions;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("unknown paper format {0:?}")]
    UnknownFormat(String),
    #[error("invalid CSS length {0:?}, expected a number with px/in/cm/mm unit")]
    InvalidLength(String),
}

pub type Result<T> = std::result::Result<T, PdfError>;

/// Named paper sizes. The engine takes paper dimensions in inches,
/// so each format carries its portrait width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperFormat {
    Letter,
    Legal,
    Tabloid,
    Ledger,
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
}

impl PaperFormat {
    pub fn size_inches(self) -> (f64, f64) {
        match self {
            PaperFormat::Letter => (8.5, 11.0),
            PaperFormat::Legal => (8.5, 14.0),
            PaperFormat::Tabloid => (11.0, 17.0),
            PaperFormat::Ledger => (17.0, 11.0),
            PaperFormat::A0 => (33.1, 46.8),
            PaperFormat::A1 => (23.4, 33.1),
            PaperFormat::A2 => (16.54, 23.4),
            PaperFormat::A3 => (11.7, 16.54),
            PaperFormat::A4 => (8.27, 11.7),
            PaperFormat::A5 => (5.83, 8.27),
            PaperFormat::A6 => (4.13, 5.83),
        }
    }
}

impl FromStr for PaperFormat {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "letter" => Ok(PaperFormat::Letter),
            "legal" => Ok(PaperFormat::Legal),
            "tabloid" => Ok(PaperFormat::Tabloid),
            "ledger" => Ok(PaperFormat::Ledger),
            "a0" => Ok(PaperFormat::A0),
            "a1" => Ok(PaperFormat::A1),
            "a2" => Ok(PaperFormat::A2),
            "a3" => Ok(PaperFormat::A3),
            "a4" => Ok(PaperFormat::A4),
            "a5" => Ok(PaperFormat::A5),
            "a6" => Ok(PaperFormat::A6),
            _ => Err(PdfError::UnknownFormat(s.to_string())),
        }
    }
}

/// Converts a CSS length (`14.11mm`, `0.5in`, `20px`, ...) to inches.
/// Bare numbers are pixels at the CSS ratio of 96 per inch.
pub fn parse_css_length(s: &str) -> Result<f64> {
    let s = s.trim();
    let unit_start = s
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(unit_start);

    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| PdfError::InvalidLength(s.to_string()))?;

    match unit.trim().to_ascii_lowercase().as_str() {
        "" | "px" => Ok(value / 96.0),
        "in" => Ok(value),
        "cm" => Ok(value / 2.54),
        "mm" => Ok(value / 25.4),
        _ => Err(PdfError::InvalidLength(s.to_string())),
    }
}

/// Page margins as CSS lengths.
#[derive(Debug, Clone)]
pub struct Margins {
    pub top: String,
    pub right: String,
    pub bottom: String,
    pub left: String,
}

#[derive(Debug, Clone)]
pub struct PdfConfig {
    pub format: PaperFormat,
    pub landscape: bool,
    pub print_background: bool,
    pub margins: Margins,
    pub display_header_footer: bool,
    pub header_template: String,
    pub footer_template: String,
}

impl PdfConfig {
    /// Maps this configuration to the engine's print options.
    ///
    /// A non-empty footer template implies header/footer display, and when a
    /// footer height is supplied it replaces the bottom margin so the footer
    /// has room to render. The two are coupled, not independent knobs.
    pub fn to_print_options(&self, footer_height: Option<&str>) -> Result<PrintToPdfOptions> {
        let has_footer = !self.footer_template.is_empty();
        let display_header_footer = self.display_header_footer || has_footer;

        let bottom = match footer_height {
            Some(height) if has_footer => height,
            _ => self.margins.bottom.as_str(),
        };

        let (paper_width, paper_height) = self.format.size_inches();

        Ok(PrintToPdfOptions {
            landscape: Some(self.landscape),
            display_header_footer: Some(display_header_footer),
            print_background: Some(self.print_background),
            paper_width: Some(paper_width),
            paper_height: Some(paper_height),
            margin_top: Some(parse_css_length(&self.margins.top)?),
            margin_bottom: Some(parse_css_length(bottom)?),
            margin_left: Some(parse_css_length(&self.margins.left)?),
            margin_right: Some(parse_css_length(&self.margins.right)?),
            header_template: Some(self.header_template.clone()),
            footer_template: Some(self.footer_template.clone()),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PdfConfig {
        PdfConfig {
            format: PaperFormat::Letter,
            landscape: false,
            print_background: true,
            margins: Margins {
                top: "6.25mm".to_string(),
                right: "6.25mm".to_string(),
                bottom: "14.11mm".to_string(),
                left: "6.25mm".to_string(),
            },
            display_header_footer: false,
            header_template: String::new(),
            footer_template: String::new(),
        }
    }

    #[test]
    fn paper_format_parses_case_insensitively() {
        assert_eq!("Letter".parse::<PaperFormat>().unwrap(), PaperFormat::Letter);
        assert_eq!("a4".parse::<PaperFormat>().unwrap(), PaperFormat::A4);
        assert!("elephant".parse::<PaperFormat>().is_err());
    }

    #[test]
    fn letter_is_eight_and_a_half_by_eleven() {
        assert_eq!(PaperFormat::Letter.size_inches(), (8.5, 11.0));
    }

    #[test]
    fn css_lengths_convert_to_inches() {
        assert!((parse_css_length("1in").unwrap() - 1.0).abs() < 1e-9);
        assert!((parse_css_length("25.4mm").unwrap() - 1.0).abs() < 1e-9);
        assert!((parse_css_length("2.54cm").unwrap() - 1.0).abs() < 1e-9);
        assert!((parse_css_length("96px").unwrap() - 1.0).abs() < 1e-9);
        assert!((parse_css_length("96").unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn css_length_rejects_garbage() {
        assert!(parse_css_length("wide").is_err());
        assert!(parse_css_length("10parsecs").is_err());
        assert!(parse_css_length("").is_err());
    }

    #[test]
    fn empty_footer_keeps_caller_margin() {
        let options = config().to_print_options(Some("30mm")).unwrap();
        assert_eq!(options.display_header_footer, Some(false));
        let expected = parse_css_length("14.11mm").unwrap();
        assert!((options.margin_bottom.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn footer_template_forces_display_and_bottom_margin() {
        let mut config = config();
        config.footer_template = "<span class=\"pageNumber\"></span>".to_string();

        let options = config.to_print_options(Some("30mm")).unwrap();
        assert_eq!(options.display_header_footer, Some(true));
        let expected = parse_css_length("30mm").unwrap();
        assert!((options.margin_bottom.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn footer_without_declared_height_keeps_caller_margin() {
        let mut config = config();
        config.footer_template = "<span></span>".to_string();

        let options = config.to_print_options(None).unwrap();
        assert_eq!(options.display_header_footer, Some(true));
        let expected = parse_css_length("14.11mm").unwrap();
        assert!((options.margin_bottom.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn landscape_keeps_portrait_paper_dimensions() {
        let mut config = config();
        config.landscape = true;

        let options = config.to_print_options(None).unwrap();
        assert_eq!(options.landscape, Some(true));
        assert_eq!(options.paper_width, Some(8.5));
        assert_eq!(options.paper_height, Some(11.0));
    }
}
