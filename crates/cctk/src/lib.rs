//! Parsing and regeneration of computational-chemistry text formats:
//! Gaussian09 output logs, Gaussian09 input files, and HyperChem
//! conformational-search (`.hcs`) result files.

use std::{error::Error as StdError, fmt::Display};

pub mod g09;
pub mod hcs;
pub mod input;
pub mod molecule;
pub mod queue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// a required marker line or section is missing from a parsed file
    MalformedInput(String),

    /// the tail of an optimization job never reported `Optimization
    /// completed`; its energies and geometry cannot be trusted
    NotConverged(String),

    /// the coordinate and atom-kind maps of a [molecule::Molecule] disagree
    ArityMismatch { coords: usize, kinds: usize },

    /// the detected combination of job types has no extraction routine
    UnsupportedJob(String),

    /// a file could not be opened, read, or written
    FileAccess(String, std::io::ErrorKind),
}

impl Error {
    /// Returns `true` if the error is [`NotConverged`].
    ///
    /// [`NotConverged`]: Error::NotConverged
    #[must_use]
    pub fn is_not_converged(&self) -> bool {
        matches!(self, Self::NotConverged(..))
    }

    /// build a [Error::FileAccess] from a path-like and the underlying
    /// [std::io::Error]
    pub fn file_access(path: impl Display, err: &std::io::Error) -> Self {
        Self::FileAccess(path.to_string(), err.kind())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MalformedInput(what) => {
                write!(f, "malformed input: {what}")
            }
            Error::NotConverged(what) => {
                write!(f, "optimization did not converge: {what}")
            }
            Error::ArityMismatch { coords, kinds } => write!(
                f,
                "coordinate map has {coords} atoms but kind map has {kinds}"
            ),
            Error::UnsupportedJob(jobs) => {
                write!(f, "no extraction routine for job combination `{jobs}`")
            }
            Error::FileAccess(path, kind) => {
                write!(f, "failed to access {path}: {kind}")
            }
        }
    }
}

impl StdError for Error {}

pub type Result<T> = std::result::Result<T, Error>;
