//! One-shot commands.

use anyhow::Context;
use image::ImageFormat;
use label_engine::{Dpi, PREVIEW_SIZE, render_preview};

use crate::app::AppState;
use crate::cli::{Cmd, LabelArgs};
use crate::services::label::Selection;
use crate::services::printer::{list_system_printers, print_label};
use crate::session::number_entries;

pub async fn run(cmd: Cmd, state: &mut AppState) -> anyhow::Result<()> {
    match cmd {
        Cmd::Codes => codes(state),
        Cmd::Label(args) => label(args, state).await,
        Cmd::Reset => reset(state),
        Cmd::Printers => printers().await,
    }
}

fn codes(state: &AppState) -> anyhow::Result<()> {
    for (num, text) in number_entries(&state.labels.dropdown()) {
        match num {
            Some(_) => {
                let code = state
                    .labels
                    .catalog()
                    .code_for_display(text)
                    .unwrap_or_default();
                println!("{code:<8}{text}");
            }
            None => println!("{text}"),
        }
    }
    Ok(())
}

async fn label(args: LabelArgs, state: &mut AppState) -> anyhow::Result<()> {
    let case_input = args
        .case
        .clone()
        .or_else(|| state.prefill.clone())
        .unwrap_or_default();
    let selection = match (&args.kdl, &args.code) {
        (Some(display), _) => Selection::Display(display),
        (None, Some(code)) => Selection::Code(code),
        (None, None) => Selection::Display(""),
    };
    let dpi = Dpi::square(args.dpi.unwrap_or(state.config.fallback_dpi));
    let now = chrono::Local::now().naive_local();

    let generated = state.labels.generate(&case_input, selection, dpi, now)?;
    println!("{}", generated.label.payload);
    if let Some(err) = &generated.save_error {
        eprintln!("Warning: usage counters not saved: {err}");
    }

    if let Some(path) = &args.preview {
        render_preview(&generated.label.payload, PREVIEW_SIZE)?
            .save_with_format(path, ImageFormat::Png)
            .with_context(|| format!("failed to write preview {}", path.display()))?;
    }

    if let Some(path) = &args.out {
        let font = state.font();
        generated
            .label
            .render(font.as_ref())?
            .save_with_format(path, ImageFormat::Png)
            .with_context(|| format!("failed to write label {}", path.display()))?;
    }

    if args.print {
        let request = state.print_request(args.printer, args.dpi);
        let font = state.font();
        let job = print_label(
            &generated.label,
            &request,
            state.labels.layout_options(),
            font.as_ref(),
        )
        .await?;
        println!(
            "Printed on {} ({}x{} dpi, {}x{} mm)",
            job.printer, job.dpi.x, job.dpi.y, job.width_mm, job.height_mm
        );
    }

    Ok(())
}

fn reset(state: &mut AppState) -> anyhow::Result<()> {
    state
        .labels
        .reset_favorites()
        .context("failed to reset favorites")?;
    println!("Favorites reset.");
    Ok(())
}

async fn printers() -> anyhow::Result<()> {
    let printers = list_system_printers().await?;
    if printers.is_empty() {
        println!("No printers configured.");
    }
    for printer in printers {
        println!("{:<32}{}", printer.name, printer.status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use code_catalog::Catalog;
    use usage_store::UsageStore;

    use super::*;
    use crate::config::AppConfig;
    use crate::services::label::LabelService;

    fn state(dir: &std::path::Path, prefill: Option<&str>) -> AppState {
        let data_dir = dir.to_string_lossy().to_string();
        let config =
            AppConfig::from_lookup(|key| (key == "KDL_QR_DATA_DIR").then(|| data_dir.clone()));
        let labels = LabelService::new(Catalog::fallback(), UsageStore::open(config.usage_file()));
        AppState::new(config, labels, prefill.map(str::to_string))
    }

    fn args(code: Option<&str>) -> LabelArgs {
        LabelArgs {
            case: None,
            kdl: None,
            code: code.map(str::to_string),
            preview: None,
            out: None,
            print: false,
            printer: None,
            dpi: None,
        }
    }

    #[tokio::test]
    async fn label_uses_prefill_and_writes_preview() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let mut state = state(dir.path(), Some("4711"));
        let preview = dir.path().join("preview.png");

        let mut label_args = args(Some("C34"));
        label_args.preview = Some(preview.clone());
        run(Cmd::Label(label_args), &mut state)
            .await
            .expect("label should succeed");

        let img = image::open(&preview).expect("preview should be a PNG");
        assert_eq!((img.width(), img.height()), (PREVIEW_SIZE, PREVIEW_SIZE));
        assert_eq!(state.labels.usage().counts().get("C34"), Some(&1));
    }

    #[tokio::test]
    async fn label_out_has_label_size_for_dpi() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let mut state = state(dir.path(), None);
        let out = dir.path().join("label.png");

        let mut label_args = args(Some("J45"));
        label_args.case = Some("12".into());
        label_args.dpi = Some(203);
        label_args.out = Some(out.clone());
        run(Cmd::Label(label_args), &mut state)
            .await
            .expect("label should succeed");

        let img = image::open(&out).expect("label should be a PNG");
        assert_eq!(img.width(), 320);
    }

    #[tokio::test]
    async fn label_without_case_fails_and_counts_nothing() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let mut state = state(dir.path(), None);

        let err = run(Cmd::Label(args(Some("J45"))), &mut state)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("case number"));
        assert!(state.labels.usage().is_empty());
    }

    #[tokio::test]
    async fn reset_clears_counters() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let mut state = state(dir.path(), Some("1"));
        run(Cmd::Label(args(Some("A01"))), &mut state)
            .await
            .expect("label should succeed");

        run(Cmd::Reset, &mut state).await.expect("reset should succeed");
        assert!(state.labels.usage().is_empty());
    }
}
