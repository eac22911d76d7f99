//! Process Gaussian09 output files: quarantine unfinished runs, extract the
//! energies and frequencies the detected jobs provide, write new inputs for
//! every optimized geometry, and aggregate everything into `g09_results.csv`.

use std::path::Path;

use cctk::{
    Error,
    g09::{self, Job, freq::Frequencies},
    input::JobSpec,
};

use crate::{
    config::Config,
    report::{self, FREQ_HEADERS, ResultsRow, SCF_HEADERS},
};

/// subdirectory receiving inputs regenerated from optimized geometries
const GEOM_DIR: &str = "geometries";

pub fn run(
    dir: &Path,
    ext: &str,
    steps: bool,
    single_point: bool,
    config: &Config,
) -> cctk::Result<()> {
    let files = super::keep_terminated(super::files_with_extension(dir, ext)?);
    if files.is_empty() {
        return Err(Error::FileAccess(
            format!("every *{ext} file in {} failed the termination check", dir.display()),
            std::io::ErrorKind::NotFound,
        ));
    }

    let mut rows = Vec::new();
    for file in &files {
        match process_file(file, steps, single_point, config) {
            Ok(row) => rows.push(row),
            Err(e) => {
                log::warn!("could not process {}: {e}", file.display())
            }
        }
    }

    // the frequency columns apply when the batch produced frequency data;
    // by contract every file ran the same calculation
    let headers = match rows.first() {
        Some(row) if row.values.len() > 1 => &FREQ_HEADERS[..],
        _ => &SCF_HEADERS[..],
    };
    report::write_results_csv(dir.join("g09_results.csv"), headers, &rows)
}

fn process_file(
    path: &Path,
    steps: bool,
    single_point: bool,
    config: &Config,
) -> cctk::Result<ResultsRow> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::file_access(path.display(), &e))?;
    let route = g09::classify(&contents)?;
    let chunks = g09::split_jobs(&contents, &route);

    let mut values = Vec::new();
    if route.has(Job::Opt) {
        let opt = g09::opt::parse(&chunks[0], steps)?;
        if let Some(trajectory) = &opt.trajectory {
            let out = path.with_file_name(format!(
                "{}_steps.csv",
                super::file_stem(path)
            ));
            report::write_trajectory_csv(out, trajectory)?;
        }

        let suffix = if route.has(Job::Freq) { "_geom" } else { "_opt" };
        write_geometry_input(path, suffix, &opt.molecule, config)?;

        if route.has(Job::Freq) {
            let chunk = chunks.get(1).ok_or_else(|| {
                Error::MalformedInput(
                    "no frequency chunk after the optimization".to_owned(),
                )
            })?;
            values = freq_values(&g09::freq::parse(chunk)?);
        } else {
            values.push(opt.energy.to_string());
        }
    } else if route.has(Job::Freq) {
        values = freq_values(&g09::freq::parse(&chunks[0])?);
    } else if single_point {
        values.push(g09::opt::scf_energy(&chunks[0])?.to_string());
    } else {
        return Err(Error::UnsupportedJob(route.tags()));
    }

    Ok(ResultsRow {
        filename: super::file_name(path),
        route: route.route.clone(),
        jobs: route.tags(),
        values,
    })
}

/// write a fresh input for the optimized geometry into the geometries
/// subdirectory beside the output file
fn write_geometry_input(
    path: &Path,
    suffix: &str,
    molecule: &cctk::molecule::Molecule,
    config: &Config,
) -> cctk::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.join(GEOM_DIR),
        _ => GEOM_DIR.into(),
    };
    super::create_dir_idempotent(&dir)?;
    let spec = JobSpec {
        molecule: molecule.clone(),
        nproc: config.nproc,
        mem: config.mem,
        checkpoint: None,
        method: config.method.clone(),
        basis: config.basis.clone(),
        keywords: config.keywords.clone(),
        comment: None,
    };
    spec.write_to(dir.join(format!(
        "{}{suffix}{}",
        super::file_stem(path),
        config.input_ext
    )))
}

fn freq_values(freqs: &Frequencies) -> Vec<String> {
    let mut values = vec![
        freqs.n_imaginary().to_string(),
        freqs
            .imaginary()
            .map(|f| f.to_string())
            .unwrap_or_else(|| String::from("NA")),
    ];
    values.extend(freqs.energies.iter().map(f64::to_string));
    values
}
