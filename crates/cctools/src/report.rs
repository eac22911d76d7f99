//! Aggregated report artifacts: the results CSV, per-search conformer CSVs,
//! optimization-trajectory CSVs, and the SI coordinate files.

use std::{fmt::Write as _, path::Path};

use cctk::{Error, molecule::Molecule};

/// columns written when frequency data is present
pub const FREQ_HEADERS: [&str; 10] = [
    "filename",
    "route",
    "jobs",
    "n_negFreq",
    "neg_freq",
    "SCFenergy",
    "electronic+ZPE",
    "electronic+enthalpy",
    "electronic+entropy",
    "electronic+free",
];

/// columns for opt or single-point jobs without frequencies
pub const SCF_HEADERS: [&str; 4] = ["filename", "route", "jobs", "SCFenergy"];

/// one row of the results CSV; `values` are the columns after the fixed
/// filename/route/jobs triple
#[derive(Clone, Debug, PartialEq)]
pub struct ResultsRow {
    pub filename: String,
    pub route: String,
    pub jobs: String,
    pub values: Vec<String>,
}

pub fn write_results_csv(
    path: impl AsRef<Path>,
    headers: &[&str],
    rows: &[ResultsRow],
) -> cctk::Result<()> {
    let mut out = String::new();
    writeln!(out, "{}", headers.join(",")).unwrap();
    for row in rows {
        write!(out, "{},\"{}\",{}", row.filename, row.route, row.jobs)
            .unwrap();
        for value in &row.values {
            write!(out, ",{value}").unwrap();
        }
        out.push('\n');
    }
    write_file(path, &out)
}

pub fn write_conformer_csv(
    path: impl AsRef<Path>,
    conformers: &[Molecule],
) -> cctk::Result<()> {
    let mut out = String::from("conformer, energy, found\n");
    for (i, conf) in conformers.iter().enumerate() {
        writeln!(out, "conf {}, {}, {}", i + 1, conf.energy, conf.found)
            .unwrap();
    }
    write_file(path, &out)
}

pub fn write_trajectory_csv(
    path: impl AsRef<Path>,
    energies: &[f64],
) -> cctk::Result<()> {
    let mut out = String::from("step,SCFenergy\n");
    for (i, energy) in energies.iter().enumerate() {
        writeln!(out, "{i},{energy}").unwrap();
    }
    write_file(path, &out)
}

/// plain-text SI blocks: the filename heads each block, structures are
/// separated by blank lines
pub fn write_si_txt(
    path: impl AsRef<Path>,
    entries: &[(String, Vec<String>)],
) -> cctk::Result<()> {
    let mut out = String::new();
    for (filename, lines) in entries {
        writeln!(out, "{filename}").unwrap();
        for line in lines {
            writeln!(out, "{line}").unwrap();
        }
        out.push_str("\n\n");
    }
    write_file(path, &out)
}

/// XYZ SI blocks; each entry already begins with its atom count and
/// filename lines
pub fn write_si_xyz(
    path: impl AsRef<Path>,
    entries: &[(String, Vec<String>)],
) -> cctk::Result<()> {
    let mut out = String::new();
    for (_, lines) in entries {
        for line in lines {
            writeln!(out, "{line}").unwrap();
        }
        out.push_str("\n\n");
    }
    write_file(path, &out)
}

fn write_file(path: impl AsRef<Path>, contents: &str) -> cctk::Result<()> {
    let path = path.as_ref();
    std::fs::write(path, contents)
        .map_err(|e| Error::file_access(path.display(), &e))
}
