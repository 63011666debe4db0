//! Finding, compiling and writing templates.
//!
//! Each template compiles independently, so a directory is compiled in
//! parallel with one parser per file. Generated code is rendered in memory
//! and written next to the template only when compilation succeeds.

use std::fs;
use std::path::{Path, PathBuf};

use qtc_codegen::{compile_to_string, CompileOptions};
use qtc_gosyntax::is_identifier;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::{DriverConfig, DriverError};

/// Outcome of one driver run.
#[derive(Debug, Default)]
pub struct Summary {
    /// Generated files, in template order.
    pub written: Vec<PathBuf>,
    pub failures: Vec<DriverError>,
}

impl Summary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Compile the templates selected by `config`.
///
/// Fails early only when the template directory cannot be listed; errors
/// in individual templates are collected in the summary.
pub fn run(config: &DriverConfig) -> Result<Summary, DriverError> {
    let templates = match &config.file {
        Some(file) => vec![file.clone()],
        None => find_templates(&config.dir, &config.ext)?,
    };
    info!(count = templates.len(), "compiling templates");

    let results: Vec<_> = templates
        .par_iter()
        .map(|path| compile_file(path, config.line_comments))
        .collect();

    let mut summary = Summary::default();
    for result in results {
        match result {
            Ok(path) => summary.written.push(path),
            Err(err) => summary.failures.push(err),
        }
    }
    Ok(summary)
}

/// Compile one template to `<template>.go`.
pub fn compile_file(path: &Path, line_comments: bool) -> Result<PathBuf, DriverError> {
    let package = package_name(path)?;
    let src = fs::read_to_string(path).map_err(|source| DriverError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let options = CompileOptions::new(package).with_line_comments(line_comments);
    let out = output_path(path);
    debug!(template = %path.display(), output = %out.display(), "compiling");

    let code = compile_to_string(&src, &path.to_string_lossy(), &options).map_err(|source| {
        DriverError::Compile {
            path: path.to_path_buf(),
            source,
        }
    })?;
    fs::write(&out, code).map_err(|source| DriverError::Write {
        path: out.clone(),
        source,
    })?;
    info!(template = %path.display(), output = %out.display(), "compiled");
    Ok(out)
}

/// Path of the Go file generated for `template`: the template path with
/// `.go` appended.
pub fn output_path(template: &Path) -> PathBuf {
    let mut name = template.as_os_str().to_owned();
    name.push(".go");
    PathBuf::from(name)
}

/// Go package for a template: the name of the directory holding it.
pub fn package_name(template: &Path) -> Result<String, DriverError> {
    let error = |reason: &str| DriverError::Package {
        path: template.to_path_buf(),
        reason: reason.to_string(),
    };
    let abs = std::path::absolute(template).map_err(|err| error(&err.to_string()))?;
    let dir = abs
        .parent()
        .and_then(Path::file_name)
        .ok_or_else(|| error("template is not inside a named directory"))?;
    let name = dir
        .to_str()
        .ok_or_else(|| error("directory name is not valid UTF-8"))?;
    if !is_identifier(name) {
        return Err(error(&format!(
            "directory name {name:?} is not a valid Go package name"
        )));
    }
    Ok(name.to_string())
}

/// All files under `dir` with extension `ext`, sorted. Hidden entries are
/// skipped.
pub fn find_templates(dir: &Path, ext: &str) -> Result<Vec<PathBuf>, DriverError> {
    let mut found = Vec::new();
    collect_templates(dir, ext, &mut found)?;
    found.sort();
    Ok(found)
}

fn collect_templates(dir: &Path, ext: &str, found: &mut Vec<PathBuf>) -> Result<(), DriverError> {
    let read_error = |source| DriverError::Read {
        path: dir.to_path_buf(),
        source,
    };
    for entry in fs::read_dir(dir).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let file_type = entry.file_type().map_err(read_error)?;
        if file_type.is_dir() {
            collect_templates(&path, ext, found)?;
        } else if path.extension().is_some_and(|e| e == ext) {
            found.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
