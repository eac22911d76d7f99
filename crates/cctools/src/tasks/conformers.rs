//! Turn HyperChem conformational-search results into one Gaussian input per
//! conformer plus a per-search summary CSV.

use std::path::Path;

use cctk::{hcs, input::JobSpec};

use crate::{config::Config, report};

/// subdirectory receiving the generated inputs
const INPUT_DIR: &str = "g09_inputs";

pub fn run(dir: &Path, config: &Config) -> cctk::Result<()> {
    let files = hcs_files(dir)?;
    let outdir = dir.join(INPUT_DIR);
    super::create_dir_idempotent(&outdir)?;

    for file in &files {
        if let Err(e) = process_file(file, &outdir, config) {
            log::warn!("could not process {}: {e}", file.display());
        }
    }
    Ok(())
}

/// the search tool writes both .hcs and .HCS
fn hcs_files(dir: &Path) -> cctk::Result<Vec<std::path::PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| cctk::Error::file_access(dir.display(), &e))?;
    let mut files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.file_name().is_some_and(|n| {
                    n.to_string_lossy().to_lowercase().ends_with("hcs")
                })
        })
        .collect();
    files.sort();
    if files.is_empty() {
        return Err(cctk::Error::FileAccess(
            format!("no conformational-search files in {}", dir.display()),
            std::io::ErrorKind::NotFound,
        ));
    }
    Ok(files)
}

fn process_file(
    path: &Path,
    outdir: &Path,
    config: &Config,
) -> cctk::Result<()> {
    let conformers =
        hcs::parse_file(path, config.charge, config.multiplicity)?;
    let stem = super::file_stem(path);
    for (i, conformer) in conformers.iter().enumerate() {
        let spec = JobSpec {
            molecule: conformer.clone(),
            nproc: config.nproc,
            mem: config.mem,
            checkpoint: None,
            method: config.method.clone(),
            basis: config.basis.clone(),
            keywords: config.keywords.clone(),
            comment: None,
        };
        spec.write_to(outdir.join(format!(
            "{stem}_c{}_{}{}",
            i + 1,
            config.suffix,
            config.input_ext
        )))?;
    }
    report::write_conformer_csv(
        path.with_file_name(format!("{stem}.csv")),
        &conformers,
    )?;
    log::info!(
        "{}: wrote {} conformer inputs",
        path.display(),
        conformers.len()
    );
    Ok(())
}
