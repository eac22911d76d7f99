//! Writing and rewriting Gaussian09 input files.
//!
//! The input grammar is an external contract: link0 directives, the route
//! line, the comment, the charge/multiplicity line, and the coordinates, in
//! that order, each section closed by a blank line and the whole record
//! terminated by two blank lines. Deviations make Gaussian reject or
//! misread the file, so the writer is exact about separators and precision.

use std::{fmt::Display, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, molecule::Molecule};

/// A molecule plus everything needed to run a job on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    pub molecule: Molecule,
    pub nproc: usize,
    /// memory in GB
    pub mem: usize,
    /// name of the checkpoint file; None suppresses the %chk line entirely
    pub checkpoint: Option<String>,
    pub method: String,
    pub basis: String,
    /// job keywords and options exactly as they should appear on the route
    pub keywords: String,
    pub comment: Option<String>,
}

impl JobSpec {
    fn link0(&self) -> Vec<String> {
        let mut link0 = vec![
            format!("%nprocshared={}", self.nproc),
            format!("%Mem={}GB", self.mem),
        ];
        if let Some(chk) = &self.checkpoint {
            link0.insert(0, format!("%chk={chk}"));
        }
        link0
    }

    fn route(&self) -> String {
        format!("# {}/{} {}", self.method, self.basis, self.keywords)
            .trim_end()
            .to_owned()
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_string())
            .map_err(|e| Error::file_access(path.display(), &e))
    }
}

impl Display for JobSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        debug_assert!(self.nproc > 0 && self.mem > 0);
        for line in self.link0() {
            writeln!(f, "{line}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.route())?;
        writeln!(f)?;
        writeln!(
            f,
            "{}",
            self.comment.as_deref().unwrap_or("comment line")
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "{}  {}",
            self.molecule.charge, self.molecule.multiplicity
        )?;
        for row in self.molecule.xyz_rows() {
            writeln!(f, "{row}")?;
        }
        // Gaussian requires the blank-line-terminated record
        write!(f, "\n\n")
    }
}

/// Targeted whole-line substitutions on an existing input file. Unset
/// fields leave their lines untouched; applying an empty `Rewrite`
/// reproduces the file byte for byte.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rewrite {
    /// new route, without the leading `#`
    pub route: Option<String>,
    /// checkpoint name; replaces an existing %chk line or is prepended
    pub checkpoint: Option<String>,
    /// memory in GB
    pub mem: Option<usize>,
    pub nproc: Option<usize>,
}

impl Rewrite {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// overwrite `path` in place; no backup is made
    pub fn apply(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::file_access(path.display(), &e))?;
        fs::write(path, self.rewrite(&contents))
            .map_err(|e| Error::file_access(path.display(), &e))
    }

    pub fn rewrite(&self, contents: &str) -> String {
        use std::fmt::Write;
        let lines: Vec<&str> = contents.lines().collect();
        let mut out = String::with_capacity(contents.len());
        let mut i = 0;
        if let Some(chk) = &self.checkpoint {
            writeln!(out, "%chk={chk}").unwrap();
            if lines.first().is_some_and(|l| l.contains("chk")) {
                i += 1;
            }
        }
        while i < lines.len() {
            let line = lines[i];
            i += 1;
            if let (Some(nproc), true) =
                (self.nproc, line.contains("nproc"))
            {
                writeln!(out, "%nprocshared={nproc}").unwrap();
            } else if let (Some(mem), true) =
                (self.mem, line.contains("Mem"))
            {
                writeln!(out, "%Mem={mem}GB").unwrap();
            } else if let (Some(route), true) =
                (&self.route, line.starts_with('#'))
            {
                writeln!(out, "# {route}").unwrap();
            } else {
                writeln!(out, "{line}").unwrap();
            }
        }
        out
    }
}
