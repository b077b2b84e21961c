use std::path::{Path, PathBuf};

use hydra_api::Scheme;

use crate::error::CatalogError;
use crate::layout::check_layout;
use crate::loader::load_model;

/// Outcome of validating one metadata file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: Result<(), CatalogError>,
}

impl FileReport {
    pub fn is_valid(&self) -> bool {
        self.result.is_ok()
    }
}

/// Decode each file and check it sits where its contents say it should.
///
/// `files` may be absolute or relative to `root`.
pub fn validate_files(root: &Path, files: &[PathBuf], scheme: &Scheme) -> Vec<FileReport> {
    files
        .iter()
        .map(|file| {
            let (absolute, relative) = if file.is_absolute() {
                let relative = file.strip_prefix(root).unwrap_or(file).to_path_buf();
                (file.clone(), relative)
            } else {
                (root.join(file), file.clone())
            };
            let result = validate_file(&absolute, &relative, scheme);
            match &result {
                Ok(()) => tracing::debug!(path = %relative.display(), "valid"),
                Err(e) => tracing::debug!(path = %relative.display(), error = %e, "invalid"),
            }
            FileReport {
                path: relative,
                result,
            }
        })
        .collect()
}

fn validate_file(absolute: &Path, relative: &Path, scheme: &Scheme) -> Result<(), CatalogError> {
    let model = load_model(absolute, scheme)?;
    check_layout(relative, &model).map_err(|violation| CatalogError::Layout {
        path: relative.to_path_buf(),
        violation,
    })?;
    Ok(())
}
