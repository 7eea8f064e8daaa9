use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::options::WaitUntil;
use crate::pdf::PaperFormat;

/// Prints webpages to PDF or captures them as PNG using headless Chrome
#[derive(Parser, Debug)]
#[command(name = "webprint", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a URL or local HTML file to PDF
    Print {
        /// URL or local HTML file to print
        url: String,

        /// Output file; PDF bytes go to stdout if omitted
        output: Option<PathBuf>,

        #[command(flatten)]
        common: CommonOpts,

        #[command(flatten)]
        pdf: PdfOpts,

        /// Paper format (Letter, Legal, Tabloid, Ledger, A0-A6)
        #[arg(long, default_value = "Letter")]
        format: PaperFormat,

        /// Print in landscape orientation
        #[arg(long)]
        landscape: bool,

        /// Show the print header and footer
        #[arg(long)]
        display_header_footer: bool,

        /// HTML template for the print header
        #[arg(long, default_value = "", value_name = "HTML")]
        header_template: String,

        /// HTML template for the print footer; a non-empty template
        /// switches the footer on
        #[arg(long, default_value = "", value_name = "HTML")]
        footer_template: String,
    },

    /// Capture a URL or local HTML file as a PNG screenshot
    Screenshot {
        /// URL or local HTML file to capture
        url: String,

        /// Output file; PNG bytes go to stdout if omitted
        output: Option<PathBuf>,

        #[command(flatten)]
        common: CommonOpts,

        /// Capture the full page instead of just the viewport
        #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
        full_page: bool,

        /// Capture with a transparent background
        #[arg(long)]
        omit_background: bool,

        /// Browser window dimensions (WIDTHxHEIGHT, e.g. 800x600)
        #[arg(long, value_name = "WIDTHxHEIGHT")]
        viewport: Option<String>,
    },

    /// Print every document listed in a JSON batch manifest
    BulkPrint {
        /// Manifest file: {"data": [{"htmlFile", "tmpPDFFile", "pdfObject"}, ...]}
        batch_file: PathBuf,

        #[command(flatten)]
        common: CommonOpts,

        #[command(flatten)]
        pdf: PdfOpts,

        /// Paper format (Letter, Legal, Tabloid, Ledger, A0-A6)
        #[arg(long, default_value = "A4")]
        format: PaperFormat,
    },
}

#[derive(Args, Debug)]
pub struct CommonOpts {
    /// Run Chrome with its sandbox enabled (disabled by default so the
    /// tool works on restricted hosts and in containers)
    #[arg(long)]
    pub sandbox: bool,

    /// Navigation timeout in milliseconds
    #[arg(long, default_value_t = 30_000, value_name = "MS")]
    pub timeout: u64,

    /// Readiness condition navigation waits for
    #[arg(long, value_enum, default_value = "load")]
    pub wait_until: WaitUntil,

    /// Cookie to inject before navigation
    #[arg(long, value_name = "KEY:VALUE")]
    pub cookie: Option<String>,
}

#[derive(Args, Debug)]
pub struct PdfOpts {
    /// Print background graphics
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub background: bool,

    /// Top margin as a CSS length
    #[arg(long, default_value = "6.25mm", value_name = "LENGTH")]
    pub margin_top: String,

    /// Right margin as a CSS length
    #[arg(long, default_value = "6.25mm", value_name = "LENGTH")]
    pub margin_right: String,

    /// Bottom margin as a CSS length
    #[arg(long, default_value = "14.11mm", value_name = "LENGTH")]
    pub margin_bottom: String,

    /// Left margin as a CSS length
    #[arg(long, default_value = "6.25mm", value_name = "LENGTH")]
    pub margin_left: String,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_command_uses_defaults() {
        let cli = Cli::parse_from(["webprint", "print", "https://example.com"]);

        match cli.command {
            Command::Print {
                url,
                output,
                common,
                pdf,
                format,
                landscape,
                display_header_footer,
                header_template,
                footer_template,
            } => {
                assert_eq!(url, "https://example.com");
                assert!(output.is_none());
                assert!(!common.sandbox);
                assert_eq!(common.timeout, 30_000);
                assert_eq!(common.wait_until, WaitUntil::Load);
                assert!(common.cookie.is_none());
                assert!(pdf.background);
                assert_eq!(pdf.margin_top, "6.25mm");
                assert_eq!(pdf.margin_right, "6.25mm");
                assert_eq!(pdf.margin_bottom, "14.11mm");
                assert_eq!(pdf.margin_left, "6.25mm");
                assert_eq!(format, PaperFormat::Letter);
                assert!(!landscape);
                assert!(!display_header_footer);
                assert!(header_template.is_empty());
                assert!(footer_template.is_empty());
            }
            _ => panic!("expected print command"),
        }
    }

    #[test]
    fn print_command_respects_overrides() {
        let cli = Cli::parse_from([
            "webprint",
            "print",
            "page.html",
            "out.pdf",
            "--sandbox",
            "--timeout",
            "5000",
            "--wait-until",
            "networkidle0",
            "--cookie",
            "session:abc:def",
            "--background",
            "false",
            "--format",
            "a4",
            "--landscape",
            "--footer-template",
            "<span></span>",
        ]);

        match cli.command {
            Command::Print {
                output,
                common,
                pdf,
                format,
                landscape,
                footer_template,
                ..
            } => {
                assert_eq!(output.as_deref(), Some(std::path::Path::new("out.pdf")));
                assert!(common.sandbox);
                assert_eq!(common.timeout, 5000);
                assert_eq!(common.wait_until, WaitUntil::NetworkIdle0);
                assert_eq!(common.cookie.as_deref(), Some("session:abc:def"));
                assert!(!pdf.background);
                assert_eq!(format, PaperFormat::A4);
                assert!(landscape);
                assert_eq!(footer_template, "<span></span>");
            }
            _ => panic!("expected print command with overrides"),
        }
    }

    #[test]
    fn screenshot_command_uses_defaults() {
        let cli = Cli::parse_from(["webprint", "screenshot", "https://example.com"]);

        match cli.command {
            Command::Screenshot {
                full_page,
                omit_background,
                viewport,
                ..
            } => {
                assert!(full_page);
                assert!(!omit_background);
                assert!(viewport.is_none());
            }
            _ => panic!("expected screenshot command"),
        }
    }

    #[test]
    fn screenshot_viewport_is_accepted_verbatim() {
        let cli = Cli::parse_from([
            "webprint",
            "screenshot",
            "https://example.com",
            "shot.png",
            "--full-page",
            "false",
            "--omit-background",
            "--viewport",
            "800x600",
        ]);

        match cli.command {
            Command::Screenshot {
                output,
                full_page,
                omit_background,
                viewport,
                ..
            } => {
                assert_eq!(output.as_deref(), Some(std::path::Path::new("shot.png")));
                assert!(!full_page);
                assert!(omit_background);
                assert_eq!(viewport.as_deref(), Some("800x600"));
            }
            _ => panic!("expected screenshot command with overrides"),
        }
    }

    #[test]
    fn bulk_print_defaults_to_a4() {
        let cli = Cli::parse_from(["webprint", "bulk-print", "batch.json"]);

        match cli.command {
            Command::BulkPrint {
                batch_file, format, ..
            } => {
                assert_eq!(batch_file, PathBuf::from("batch.json"));
                assert_eq!(format, PaperFormat::A4);
            }
            _ => panic!("expected bulk-print command"),
        }
    }

    #[test]
    fn missing_command_is_rejected() {
        assert!(Cli::try_parse_from(["webprint"]).is_err());
        assert!(Cli::try_parse_from(["webprint", "fax"]).is_err());
    }

    #[test]
    fn invalid_wait_condition_is_rejected() {
        let result = Cli::try_parse_from([
            "webprint",
            "print",
            "https://example.com",
            "--wait-until",
            "eventually",
        ]);
        assert!(result.is_err());
    }
}
