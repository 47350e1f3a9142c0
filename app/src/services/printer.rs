//! Printer service helpers (CUPS listing, resolution query, label submit).

use std::io::Cursor;
use std::path::{Path, PathBuf};

use ab_glyph::FontRef;
use image::ImageFormat;
use label_engine::{ComposedLabel, Dpi, LabelError, LayoutOptions};
use tokio::process::Command;

const MM_PER_INCH: f64 = 25.4;
const JOB_FILE_NAME: &str = "kdl-qr-label.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPrinter {
    pub name: String,
    pub status: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    #[error("No printer selected and no system default printer configured")]
    NoPrinter,

    #[error("Failed to run {command}: {source}")]
    Spawn {
        command: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} failed: {message}")]
    CommandFailed {
        command: &'static str,
        message: String,
    },

    #[error("Label error: {0}")]
    Label(#[from] LabelError),

    #[error("Image encode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What to print on and at which resolution.
#[derive(Debug, Clone, Default)]
pub struct PrintRequest {
    /// Printer name; `None` uses the CUPS default destination.
    pub printer: Option<String>,
    /// Resolution override; `None` asks the printer.
    pub dpi: Option<u32>,
    /// Resolution used when the printer reports none.
    pub fallback_dpi: u32,
    /// Directory for the temporary job file.
    pub work_dir: PathBuf,
}

/// A submitted print job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    pub printer: String,
    pub dpi: Dpi,
    pub width_mm: u32,
    pub height_mm: u32,
}

/// List printers known to CUPS (`lpstat -p`).
pub async fn list_system_printers() -> Result<Vec<SystemPrinter>, PrintError> {
    let output = Command::new("lpstat")
        .arg("-p")
        .output()
        .await
        .map_err(|source| PrintError::Spawn {
            command: "lpstat -p",
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        if stderr.contains("No destinations added") || stderr.contains("No printers") {
            return Ok(Vec::new());
        }
        return Err(PrintError::CommandFailed {
            command: "lpstat -p",
            message: stderr.trim().to_string(),
        });
    }

    Ok(parse_lpstat_output(&stdout))
}

/// System default printer (`lpstat -d`), if one is set.
pub async fn default_printer() -> Result<Option<String>, PrintError> {
    let output = Command::new("lpstat")
        .arg("-d")
        .output()
        .await
        .map_err(|source| PrintError::Spawn {
            command: "lpstat -d",
            source,
        })?;

    if !output.status.success() {
        return Err(PrintError::CommandFailed {
            command: "lpstat -d",
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(parse_default_destination(&String::from_utf8_lossy(
        &output.stdout,
    )))
}

/// Resolution reported by the printer driver (`lpoptions -p <name> -l`).
pub async fn query_resolution(printer_name: &str) -> Result<Option<Dpi>, PrintError> {
    let output = Command::new("lpoptions")
        .arg("-p")
        .arg(printer_name)
        .arg("-l")
        .output()
        .await
        .map_err(|source| PrintError::Spawn {
            command: "lpoptions",
            source,
        })?;

    if !output.status.success() {
        return Err(PrintError::CommandFailed {
            command: "lpoptions",
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(parse_resolution_option(&String::from_utf8_lossy(
        &output.stdout,
    )))
}

/// Print a file via CUPS using the `lpr` command.
pub async fn print_via_lpr(
    printer_name: &str,
    file: &Path,
    width_mm: u32,
    height_mm: u32,
    dpi: u32,
) -> Result<(), PrintError> {
    let media = format!("Custom.{width_mm}x{height_mm}mm");
    let output = Command::new("lpr")
        .arg("-P")
        .arg(printer_name)
        .arg("-o")
        .arg(format!("media={media}"))
        .arg("-o")
        .arg(format!("ppi={dpi}"))
        .arg(file)
        .output()
        .await
        .map_err(|source| PrintError::Spawn {
            command: "lpr",
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PrintError::CommandFailed {
            command: "lpr",
            message: stderr.trim().to_string(),
        });
    }

    Ok(())
}

/// Print one label page.
///
/// The label is laid out again for the printer's resolution, rendered to a
/// temporary PNG, submitted, and the file removed whether or not the
/// submission worked.
pub async fn print_label(
    label: &ComposedLabel,
    request: &PrintRequest,
    layout: &LayoutOptions,
    font: Option<&FontRef<'_>>,
) -> Result<PrintJob, PrintError> {
    let printer = match &request.printer {
        Some(name) => name.clone(),
        None => default_printer().await?.ok_or(PrintError::NoPrinter)?,
    };
    let dpi = resolve_dpi(&printer, request).await;

    let printed = label.relayout(dpi, layout)?;
    let img = printed.render(font)?;
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    tokio::fs::create_dir_all(&request.work_dir).await?;
    let job_file = request.work_dir.join(JOB_FILE_NAME);
    tokio::fs::write(&job_file, &png).await?;

    let width_mm = px_to_mm(printed.layout.width, dpi.x);
    let height_mm = px_to_mm(printed.layout.height, dpi.y);
    let result = print_via_lpr(&printer, &job_file, width_mm, height_mm, dpi.x).await;

    if let Err(e) = tokio::fs::remove_file(&job_file).await {
        tracing::debug!(path = %job_file.display(), error = %e, "Failed to remove job file");
    }
    result?;

    tracing::info!(
        printer = %printer,
        dpi_x = dpi.x,
        dpi_y = dpi.y,
        width_mm,
        height_mm,
        "Label sent to printer"
    );

    Ok(PrintJob {
        printer,
        dpi,
        width_mm,
        height_mm,
    })
}

async fn resolve_dpi(printer: &str, request: &PrintRequest) -> Dpi {
    if let Some(dpi) = request.dpi {
        return Dpi::square(dpi);
    }
    match query_resolution(printer).await {
        Ok(Some(dpi)) => dpi,
        Ok(None) => {
            tracing::info!(printer, dpi = request.fallback_dpi, "Printer reports no resolution, using fallback");
            Dpi::square(request.fallback_dpi)
        }
        Err(e) => {
            tracing::warn!(printer, error = %e, "Resolution query failed, using fallback");
            Dpi::square(request.fallback_dpi)
        }
    }
}

fn px_to_mm(px: u32, dpi: u32) -> u32 {
    (f64::from(px) / f64::from(dpi) * MM_PER_INCH).round() as u32
}

fn parse_lpstat_output(stdout: &str) -> Vec<SystemPrinter> {
    let mut printers = Vec::new();

    for line in stdout.lines() {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix("printer ") else {
            continue;
        };

        let mut parts = rest.splitn(2, ' ');
        let Some(name) = parts.next() else {
            continue;
        };
        let status = parts
            .next()
            .and_then(|s| s.strip_prefix("is "))
            .map(|s| s.trim().trim_end_matches('.').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        printers.push(SystemPrinter {
            name: name.to_string(),
            status,
        });
    }

    printers
}

fn parse_default_destination(stdout: &str) -> Option<String> {
    stdout.lines().find_map(|line| {
        line.trim()
            .strip_prefix("system default destination:")
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    })
}

/// Pick the default choice of the `Resolution` option.
///
/// Choices look like `300dpi` or `300x600dpi`; the default is starred. A
/// single unstarred choice is taken as the default.
fn parse_resolution_option(stdout: &str) -> Option<Dpi> {
    let choices = stdout.lines().find_map(|line| {
        let (key, choices) = line.split_once(':')?;
        let name = key.split('/').next()?.trim();
        name.eq_ignore_ascii_case("Resolution").then_some(choices)
    })?;

    let tokens: Vec<&str> = choices.split_whitespace().collect();
    let chosen = tokens
        .iter()
        .find_map(|t| t.strip_prefix('*'))
        .or_else(|| (tokens.len() == 1).then(|| tokens[0]))?;

    parse_dpi_choice(chosen)
}

fn parse_dpi_choice(choice: &str) -> Option<Dpi> {
    let lower = choice.to_ascii_lowercase();
    let value = lower.strip_suffix("dpi")?;
    let dpi = match value.split_once('x') {
        Some((x, y)) => Dpi::new(x.parse().ok()?, y.parse().ok()?),
        None => Dpi::square(value.parse().ok()?),
    };
    (dpi.x > 0 && dpi.y > 0).then_some(dpi)
}
