//! One module per subcommand. Every task walks a directory, processes each
//! file independently, and keeps going when a single file fails: the failure
//! is logged with its filename and dropped from the aggregate output.

use std::path::{Path, PathBuf};

use cctk::{Error, g09};

pub mod conformers;
pub mod coords;
pub mod outputs;
pub mod rewrite;
pub mod scripts;

/// collect the files in `dir` ending in `ext`, sorted by name so reports
/// come out in a stable order
pub(crate) fn files_with_extension(
    dir: &Path,
    ext: &str,
) -> cctk::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| Error::file_access(dir.display(), &e))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .is_some_and(|n| n.to_string_lossy().ends_with(ext))
        })
        .collect();
    files.sort();
    if files.is_empty() {
        return Err(Error::FileAccess(
            format!("no *{ext} files in {}", dir.display()),
            std::io::ErrorKind::NotFound,
        ));
    }
    Ok(files)
}

/// drop every output file that did not terminate normally, moving it into
/// the quarantine directory beside its siblings
pub(crate) fn keep_terminated(files: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut kept = Vec::new();
    for file in files {
        match g09::check_term(&file) {
            Ok(true) => kept.push(file),
            Ok(false) => {
                log::warn!(
                    "{} did not end in normal termination",
                    file.display()
                );
                if let Err(e) = g09::quarantine(&file) {
                    log::warn!(
                        "could not quarantine {}: {e}",
                        file.display()
                    );
                }
            }
            Err(e) => {
                log::warn!("could not check {}: {e}", file.display())
            }
        }
    }
    kept
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// create `dir` unless it already exists
pub(crate) fn create_dir_idempotent(dir: &Path) -> cctk::Result<()> {
    match std::fs::create_dir(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(Error::file_access(dir.display(), &e)),
    }
}
