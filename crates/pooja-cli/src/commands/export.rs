use std::path::{Path, PathBuf};

use pooja_core::controller::AppState;
use pooja_core::export::{render_list_export, suggested_export_file_name};

use crate::cli::ExportFormat;
use crate::error::CliError;

pub fn run_export(
    state: &AppState,
    format: ExportFormat,
    output_path: Option<&Path>,
) -> Result<(), CliError> {
    let rendered = render_list_export(&state.title, &state.items, format.into())?;

    if let Some(path) = output_path {
        let path = export_target(path, format);
        std::fs::write(&path, rendered)?;
        println!("{}", path.display());
    } else {
        print!("{rendered}");
    }

    Ok(())
}

/// A directory target gets a timestamped file name inside it.
pub fn export_target(path: &Path, format: ExportFormat) -> PathBuf {
    if path.is_dir() {
        path.join(suggested_export_file_name(
            format.into(),
            chrono::Utc::now().timestamp_millis(),
        ))
    } else {
        path.to_path_buf()
    }
}
