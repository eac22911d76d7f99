//! Rewrite link0 and route lines across a directory of existing Gaussian
//! input files, in place.

use std::path::Path;

use cctk::input::Rewrite;

pub fn run(
    dir: &Path,
    ext: &str,
    rewrite: &Rewrite,
    chk: bool,
) -> cctk::Result<()> {
    let files = super::files_with_extension(dir, ext)?;
    for file in &files {
        let mut rw = rewrite.clone();
        if chk {
            // derive the checkpoint name from the input file itself
            rw.checkpoint =
                Some(format!("{}.chk", super::file_stem(file)));
        }
        match rw.apply(file) {
            Ok(()) => log::info!("rewrote {}", file.display()),
            Err(e) => {
                log::warn!("could not rewrite {}: {e}", file.display())
            }
        }
    }
    Ok(())
}
