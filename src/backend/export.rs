//! Writing the revised text to a `.txt` file chosen by the user.

use crate::messages::ResponseMessage;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;
use thiserror::Error;
use tracing::{error, info};

const FILE_NAME_PREFIX_CHARS: usize = 20;
const FALLBACK_FILE_STEM: &str = "texto";
const FILE_NAME_SUFFIX: &str = "_revisado.txt";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nenhum texto revisado para exportar.")]
    NothingToExport,

    #[error("Falha ao gravar o arquivo: {0}")]
    Io(#[from] std::io::Error),
}

/// Default file name derived from the beginning of the original text,
/// e.g. `"Projeto de Lei nº 12"` becomes `"Projeto_de_Lei_n_12_revisado.txt"`.
pub fn suggested_file_name(original: &str) -> String {
    let head: String = original
        .chars()
        .take(FILE_NAME_PREFIX_CHARS)
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();

    let mut stem = String::with_capacity(head.len());
    let mut in_whitespace = false;
    for c in head.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                stem.push('_');
            }
            in_whitespace = true;
        } else {
            stem.push(c);
            in_whitespace = false;
        }
    }

    let stem = if stem.is_empty() {
        FALLBACK_FILE_STEM
    } else {
        stem.as_str()
    };

    format!("{}{}", stem, FILE_NAME_SUFFIX)
}

pub fn write_revised(path: &Path, content: &str) -> Result<(), ExportError> {
    if content.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    fs::write(path, content)?;
    info!("Revised text exported to {:?}", path);
    Ok(())
}

/// Ask for a destination and write `content` there, off the UI thread.
///
/// Nothing is sent back when the user cancels the dialog.
pub fn spawn_save_dialog(
    default_dir: Option<PathBuf>,
    file_name: String,
    content: String,
    sender: Sender<ResponseMessage>,
) {
    thread::spawn(move || {
        let mut dialog = rfd::FileDialog::new()
            .set_file_name(&file_name)
            .add_filter("Texto", &["txt"]);
        if let Some(dir) = &default_dir {
            dialog = dialog.set_directory(dir);
        }

        let Some(path) = dialog.save_file() else {
            return;
        };

        let outcome = write_revised(&path, &content)
            .map(|()| path)
            .map_err(|e| {
                error!("Export failed: {}", e);
                e.to_string()
            });

        if let Err(e) = sender.send(ResponseMessage::ExportFinished(outcome)) {
            error!("Failed to report export result: {}", e);
        }
    });
}
