use std::process::ExitCode;
use std::str::FromStr;

use webprint::batch;
use webprint::browser::{self, RenderRequest, ScreenshotConfig};
use webprint::cli::{self, Command, CommonOpts, PdfOpts};
use webprint::options::{LaunchConfig, NavigationConfig};
use webprint::pdf::{Margins, PaperFormat, PdfConfig};
use webprint::viewport::Viewport;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = cli::parse();

    let (operation, outcome): (&str, anyhow::Result<()>) = match cli.command {
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
            let request = RenderRequest {
                target: url,
                output,
            };
            let config = PdfConfig {
                format,
                landscape,
                print_background: pdf.background,
                margins: margins(&pdf),
                display_header_footer,
                header_template,
                footer_template,
            };

            let result = browser::print_page(
                &request,
                &config,
                &navigation(&common),
                &launch(&common),
                common.cookie.as_deref(),
            );
            ("print", result.map_err(Into::into))
        }

        Command::Screenshot {
            url,
            output,
            common,
            full_page,
            omit_background,
            viewport,
        } => {
            // Parsed before anything launches, so a bad spec reports
            // through the same path as every other error.
            let result = viewport
                .as_deref()
                .map(Viewport::from_str)
                .transpose()
                .map_err(anyhow::Error::from)
                .and_then(|viewport| {
                    let request = RenderRequest {
                        target: url,
                        output,
                    };
                    let config = ScreenshotConfig {
                        full_page,
                        omit_background,
                        viewport,
                    };
                    browser::screenshot_page(
                        &request,
                        &config,
                        &navigation(&common),
                        &launch(&common),
                        common.cookie.as_deref(),
                    )
                    .map_err(Into::into)
                });
            ("screenshot", result)
        }

        Command::BulkPrint {
            batch_file,
            common,
            pdf,
            format,
        } => {
            // Orientation and footer come per entry from the manifest.
            let config = shared_batch_config(&pdf, format);

            let result = batch::run_batch(
                &batch_file,
                &config,
                &navigation(&common),
                &launch(&common),
            );
            ("bulk-print", result.map_err(Into::into))
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{operation} failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn launch(common: &CommonOpts) -> LaunchConfig {
    LaunchConfig::new(common.sandbox)
}

fn navigation(common: &CommonOpts) -> NavigationConfig {
    NavigationConfig::new(common.timeout, common.wait_until)
}

fn margins(pdf: &PdfOpts) -> Margins {
    Margins {
        top: pdf.margin_top.clone(),
        right: pdf.margin_right.clone(),
        bottom: pdf.margin_bottom.clone(),
        left: pdf.margin_left.clone(),
    }
}

fn shared_batch_config(pdf: &PdfOpts, format: PaperFormat) -> PdfConfig {
    PdfConfig {
        format,
        landscape: false,
        print_background: pdf.background,
        margins: margins(pdf),
        display_header_footer: false,
        header_template: String::new(),
        footer_template: String::new(),
    }
}
