//! File and folder level reading and selective write-back.
//!
//! Reads go text -> tokens -> [`Ast`](crate::ast::Ast) -> models; writes go the
//! other way. Any error aborts the whole call, including for folders.

use crate::api;
use crate::config::Config;
use crate::error::PdxError;
use crate::interpreter::{Interpreter, Model};
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads one file into models.
pub fn encode_file<I: Interpreter>(
    path: impl AsRef<Path>,
    interpreter: &I,
) -> Result<Vec<I::Model>, PdxError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| PdxError::io(path, source))?;
    let models = api::interpret(&text, path, interpreter)?;
    debug!("Read {} models from {}", models.len(), path.display());
    Ok(models)
}

/// Reads every file directly inside `dir`, in file name order, and
/// concatenates the models. Sub-directories are skipped.
pub fn encode_folder<I: Interpreter>(
    dir: impl AsRef<Path>,
    interpreter: &I,
) -> Result<Vec<I::Model>, PdxError> {
    let dir = dir.as_ref();
    let mut models = Vec::new();
    for path in sorted_files(dir)? {
        models.extend(encode_file(&path, interpreter)?);
    }
    info!("Read {} models from {}", models.len(), dir.display());
    Ok(models)
}

/// Reads the domain's whole folder, as named by
/// [`Interpreter::source_path`].
pub fn encode_source<I: Interpreter>(
    interpreter: &I,
    config: &Config,
) -> Result<Vec<I::Model>, PdxError> {
    encode_folder(interpreter.source_path(config), interpreter)
}

fn sorted_files(dir: &Path) -> Result<Vec<PathBuf>, PdxError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|source| PdxError::io(dir, source))? {
        let path = entry.map_err(|source| PdxError::io(dir, source))?.path();
        if path.is_file() {
            files.push(path);
        } else {
            debug!("Skipping {}, not a file", path.display());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Writes `models` to `path`, creating parent directories as needed.
pub fn decode_to_file<I: Interpreter>(
    models: &[&I::Model],
    path: impl AsRef<Path>,
    interpreter: &I,
) -> Result<(), PdxError> {
    let path = path.as_ref();
    let text = api::render(models, path, interpreter)?;
    write_text(path, &text)?;
    info!("Wrote {} models to {}", models.len(), path.display());
    Ok(())
}

fn write_text(path: &Path, text: &str) -> Result<(), PdxError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PdxError::io(parent, source))?;
    }
    fs::write(path, text).map_err(|source| PdxError::io(path, source))
}

/// Writes back every source file that holds at least one modified model.
///
/// Models are grouped by the file they were read from, in their original
/// order. Each file with a modified model is rewritten in full under
/// `config.output_root`; files with no modified model are not touched.
/// Returns the paths that were written, in source path order.
///
/// Every file is rendered before the first one is written, so a model that
/// cannot be rendered leaves the output tree untouched.
pub fn decode_to_folder<I: Interpreter>(
    models: &[I::Model],
    interpreter: &I,
    config: &Config,
) -> Result<Vec<PathBuf>, PdxError> {
    let mut files: BTreeMap<&Path, Vec<&I::Model>> = BTreeMap::new();
    for model in models {
        files
            .entry(model.position().filepath())
            .or_default()
            .push(model);
    }

    let mut rendered = Vec::new();
    for (source, file) in files {
        if !file.iter().any(|model| model.is_modified()) {
            debug!("Skipping {}, nothing changed", source.display());
            continue;
        }
        let output = config.output_path_for(source)?;
        let text = api::render(&file, &output, interpreter)?;
        rendered.push((output, text, file.len()));
    }

    let mut written = Vec::with_capacity(rendered.len());
    for (output, text, count) in rendered {
        write_text(&output, &text)?;
        info!("Wrote {} models to {}", count, output.display());
        written.push(output);
    }
    info!("Rewrote {} files under {}", written.len(), config.output_root.display());
    Ok(written)
}
