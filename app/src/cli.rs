//! Command line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "kdl-qr",
    version,
    about = "KDL QR tool: print QR labels for a case number and a KDL code",
    after_help = "Without a command an interactive session starts. A case number can be \
                  prefilled with `fall=<value>` or `--fall <value>`."
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Show the KDL list, favorites first.
    Codes,

    /// Generate a label (counts as a use of the KDL code).
    Label(LabelArgs),

    /// Reset favorites (clear all usage counters).
    Reset,

    /// List printers known to CUPS.
    Printers,
}

#[derive(Args, Debug)]
pub struct LabelArgs {
    /// Case number (Fallnummer). Defaults to the prefilled value.
    #[arg(long)]
    pub case: Option<String>,

    /// KDL entry by its display text, as listed by `codes`.
    #[arg(long, conflicts_with = "code")]
    pub kdl: Option<String>,

    /// KDL entry by its code.
    #[arg(long)]
    pub code: Option<String>,

    /// Write a 200x200 QR preview PNG.
    #[arg(long, value_name = "FILE")]
    pub preview: Option<PathBuf>,

    /// Write the rendered label PNG.
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Send the label to the printer.
    #[arg(long)]
    pub print: bool,

    /// Printer name (default: KDL_QR_PRINTER, then the CUPS default).
    #[arg(long, requires = "print")]
    pub printer: Option<String>,

    /// Resolution override in dpi.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub dpi: Option<u32>,
}
