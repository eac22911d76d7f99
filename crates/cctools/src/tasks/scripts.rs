//! Write SGE submit scripts for Gaussian input files, either one script per
//! input or bundles of `n_files` serial jobs.

use std::path::Path;

use cctk::queue::{self, SCRIPT_EXT, Sge};

use crate::config::Config;

pub fn run(
    dir: &Path,
    ext: &str,
    n_files: usize,
    prefix: &str,
    config: &Config,
) -> cctk::Result<()> {
    let files = super::files_with_extension(dir, ext)?;
    let sge = Sge::new(config.walltime.clone());

    // bundles share the nproc of their first input, so every input in a
    // bundle must request the same count
    for (i, bundle) in files.chunks(n_files.max(1)).enumerate() {
        let nproc = match queue::read_nproc(&bundle[0]) {
            Ok(n) => n,
            Err(e) => {
                log::warn!(
                    "could not read nproc from {}: {e}",
                    bundle[0].display()
                );
                continue;
            }
        };
        let jobname = if bundle.len() == 1 {
            format!("{prefix}{}_{}", i + 1, super::file_stem(&bundle[0]))
        } else {
            format!("{prefix}{}", i + 1)
        };
        let script =
            dir.join(format!("{prefix}{}.{SCRIPT_EXT}", i + 1));
        sge.write_submit_script(
            &jobname,
            nproc,
            bundle.iter().map(|f| super::file_name(f)),
            &script,
        )?;
        log::info!("wrote {}", script.display());
    }
    Ok(())
}
