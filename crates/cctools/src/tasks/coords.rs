//! Write the SI coordinate report: a plain-text and/or XYZ block per output
//! file, aggregated into `SI_coords.txt` / `SI_coords.xyz`.

use std::path::Path;

use cctk::{
    Error,
    g09::{self, Job, freq},
};

use crate::report;

const OUT_NAME: &str = "SI_coords";

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SiFormat {
    Txt,
    Xyz,
    Both,
}

impl std::fmt::Display for SiFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiFormat::Txt => write!(f, "txt"),
            SiFormat::Xyz => write!(f, "xyz"),
            SiFormat::Both => write!(f, "both"),
        }
    }
}

pub fn run(dir: &Path, ext: &str, format: SiFormat) -> cctk::Result<()> {
    let files = super::keep_terminated(super::files_with_extension(dir, ext)?);
    let mut entries = Vec::new();
    for file in &files {
        match si_entry(file) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                log::warn!("could not process {}: {e}", file.display())
            }
        }
    }

    let txt: Vec<_> = entries
        .iter()
        .map(|e| (e.filename.clone(), e.txt.clone()))
        .collect();
    let xyz: Vec<_> = entries
        .iter()
        .map(|e| (e.filename.clone(), e.xyz.clone()))
        .collect();
    match format {
        SiFormat::Txt => {
            report::write_si_txt(dir.join(format!("{OUT_NAME}.txt")), &txt)?
        }
        SiFormat::Xyz => {
            report::write_si_xyz(dir.join(format!("{OUT_NAME}.xyz")), &xyz)?
        }
        SiFormat::Both => {
            report::write_si_txt(dir.join(format!("{OUT_NAME}.txt")), &txt)?;
            report::write_si_xyz(dir.join(format!("{OUT_NAME}.xyz")), &xyz)?;
        }
    }
    Ok(())
}

struct SiEntry {
    filename: String,
    txt: Vec<String>,
    xyz: Vec<String>,
}

fn si_entry(path: &Path) -> cctk::Result<SiEntry> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::file_access(path.display(), &e))?;
    let route = g09::classify(&contents)?;
    let chunks = g09::split_jobs(&contents, &route);

    let (mut txt, molecule) = if route.has(Job::Freq) {
        let chunk = if route.has(Job::Opt) {
            chunks.get(1).ok_or_else(|| {
                Error::MalformedInput(
                    "no frequency chunk after the optimization".to_owned(),
                )
            })?
        } else {
            &chunks[0]
        };
        let freqs = freq::parse(chunk)?;
        let lines = vec![
            format!("Energy = {}", freqs.energies[0]),
            format!("Free Energy = {}", freq::free_energy(chunk)?),
            format!(
                "Number of Imaginary Frequencies = {}",
                freqs.n_imaginary()
            ),
        ];
        (lines, freq::molecule(chunk)?)
    } else if route.has(Job::Opt) {
        let opt = g09::opt::parse(&chunks[0], false)?;
        (vec![format!("Energy = {}", opt.energy)], opt.molecule)
    } else {
        // single point: the geometry echoed by the run itself
        let energy = g09::opt::scf_energy(&chunks[0])?;
        (vec![format!("Energy = {energy}")], freq::molecule(&chunks[0])?)
    };

    txt.push(String::from("Geometry"));
    txt.extend(molecule.xyz_rows());

    let filename = super::file_name(path);
    let mut xyz = vec![molecule.natoms().to_string(), filename.clone()];
    xyz.extend(molecule.xyz_rows());

    Ok(SiEntry { filename, txt, xyz })
}
