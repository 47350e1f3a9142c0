//! Interactive terminal session.
//!
//! Walks through the same steps as the label window: case number, KDL
//! dropdown, generate, optional print, reset favorites.

use std::io::{self, BufRead, Write};

use code_catalog::SEPARATOR;
use label_engine::{Dpi, PREVIEW_SIZE, render_preview};

use crate::app::AppState;
use crate::services::label::Selection;
use crate::services::printer::print_label;

/// Dropdown values paired with their selection number. The separator has
/// no number.
pub fn number_entries(values: &[String]) -> Vec<(Option<usize>, &str)> {
    let mut next = 1;
    values
        .iter()
        .map(|v| {
            if v == SEPARATOR {
                (None, v.as_str())
            } else {
                let n = next;
                next += 1;
                (Some(n), v.as_str())
            }
        })
        .collect()
}

/// Display text for selection number `n`.
pub fn pick(values: &[String], n: usize) -> Option<&str> {
    number_entries(values)
        .into_iter()
        .find_map(|(num, text)| (num == Some(n)).then_some(text))
}

pub fn write_dropdown(out: &mut impl Write, values: &[String]) -> io::Result<()> {
    for (num, text) in number_entries(values) {
        match num {
            Some(n) => writeln!(out, "{n:>4}  {text}")?,
            None => writeln!(out, "      {text}")?,
        }
    }
    Ok(())
}

fn prompt(out: &mut impl Write, input: &mut impl BufRead, text: &str) -> io::Result<Option<String>> {
    write!(out, "{text}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Run the interactive loop until `q` or end of input.
pub async fn run_session(
    state: &mut AppState,
    mut input: impl BufRead,
    mut out: impl Write,
) -> anyhow::Result<()> {
    writeln!(out, "KDL QR Tool (q = quit)")?;
    let mut case_default = state.prefill.clone().unwrap_or_default();

    loop {
        let case_prompt = if case_default.is_empty() {
            "Fallnummer: ".to_string()
        } else {
            format!("Fallnummer [{case_default}]: ")
        };
        let Some(case_line) = prompt(&mut out, &mut input, &case_prompt)? else {
            break;
        };
        if case_line.eq_ignore_ascii_case("q") {
            break;
        }
        let case_input = if case_line.is_empty() {
            case_default.clone()
        } else {
            case_line
        };

        let values = state.labels.dropdown();
        writeln!(out)?;
        write_dropdown(&mut out, &values)?;
        let Some(choice) = prompt(
            &mut out,
            &mut input,
            "KDL (number or text, r = reset favorites, q = quit): ",
        )?
        else {
            break;
        };

        if choice.eq_ignore_ascii_case("q") {
            break;
        }
        if choice.eq_ignore_ascii_case("r") {
            match state.labels.reset_favorites() {
                Ok(()) => writeln!(out, "Favorites reset.")?,
                Err(e) => writeln!(out, "Error: failed to reset favorites: {e}")?,
            }
            continue;
        }

        let display = match choice.parse::<usize>() {
            Ok(n) => match pick(&values, n) {
                Some(display) => display.to_string(),
                None => {
                    writeln!(out, "Error: no KDL entry number {n}")?;
                    continue;
                }
            },
            Err(_) => choice,
        };

        let dpi = Dpi::square(state.config.fallback_dpi);
        let now = chrono::Local::now().naive_local();
        let generated = match state
            .labels
            .generate(&case_input, Selection::Display(&display), dpi, now)
        {
            Ok(generated) => generated,
            Err(e) => {
                writeln!(out, "Error: {e}")?;
                continue;
            }
        };

        case_default = generated.label.spec.case_number.clone();
        writeln!(out, "QR payload: {}", generated.label.payload)?;
        if let Some(err) = &generated.save_error {
            writeln!(out, "Warning: usage counters not saved: {err}")?;
        }

        let preview_path = state.preview_path();
        let preview = render_preview(&generated.label.payload, PREVIEW_SIZE)
            .map_err(anyhow::Error::from)
            .and_then(|img| {
                if let Some(dir) = preview_path.parent() {
                    std::fs::create_dir_all(dir)?;
                }
                img.save(&preview_path)?;
                Ok(())
            });
        match preview {
            Ok(()) => writeln!(out, "Preview: {}", preview_path.display())?,
            Err(e) => tracing::warn!(error = %e, "Failed to write QR preview"),
        }

        let Some(answer) = prompt(&mut out, &mut input, "Print label? [y/N]: ")? else {
            break;
        };
        if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("j") {
            let request = state.print_request(None, None);
            let font = state.font();
            match print_label(&generated.label, &request, state.labels.layout_options(), font.as_ref())
                .await
            {
                Ok(job) => writeln!(
                    out,
                    "Printed on {} ({}x{} dpi).",
                    job.printer, job.dpi.x, job.dpi.y
                )?,
                Err(e) => writeln!(out, "Print error: {e}")?,
            }
        }
    }

    Ok(())
}
