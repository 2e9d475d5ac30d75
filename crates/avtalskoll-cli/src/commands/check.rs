use avtalskoll_core::checks::{CheckKind, FractionVariant};
use avtalskoll_core::config::{builtin, load_config};
use avtalskoll_core::error::AvtalskollError;
use avtalskoll_core::input::XlsxReader;
use avtalskoll_core::report::write_report_file;
use avtalskoll_core::storage;
use std::path::PathBuf;

use crate::output;

pub fn run(
    check: &str,
    input_file: PathBuf,
    strict: bool,
    config_file: Option<PathBuf>,
    output_format: &str,
    out: Option<PathBuf>,
    out_dir: Option<PathBuf>,
) -> Result<(), AvtalskollError> {
    let kind = resolve_kind(check, strict)?;

    let config = match config_file {
        Some(path) => load_config(&path)?,
        None => builtin::load_default()?,
    };

    let bytes = storage::read_input(&input_file)?;
    let outcome = avtalskoll_core::check_workbook(&bytes, &XlsxReader::new(), kind, &config)?;

    match output_format {
        "json" => output::json::print(&outcome)?,
        _ => output::table::print(&outcome),
    }

    let target = match (out, out_dir) {
        (Some(path), _) => Some(path),
        (None, Some(dir)) => {
            std::fs::create_dir_all(&dir)?;
            let name = storage::output_file_name(kind, &storage::session_token());
            Some(storage::resolve_within(&dir, &name)?)
        }
        (None, None) => None,
    };

    if let Some(path) = target {
        write_report_file(&outcome.report, &path)?;
        eprintln!(
            "{} deviation(s) written to {}",
            outcome.deviation_count,
            path.display()
        );
    }

    Ok(())
}

fn resolve_kind(check: &str, strict: bool) -> Result<CheckKind, AvtalskollError> {
    let kind = CheckKind::from_slug(check).ok_or_else(|| {
        AvtalskollError::InvalidValue(format!(
            "unknown check '{check}'. Run 'avtalskoll checks' to list them"
        ))
    })?;

    match kind {
        CheckKind::FractionFrequency(_) if strict => {
            Ok(CheckKind::FractionFrequency(FractionVariant::DistinctSet))
        }
        _ => {
            if strict {
                tracing::warn!(check = %kind, "--strict only applies to hamtfrekvens, ignored");
            }
            Ok(kind)
        }
    }
}
