//! Job defaults shared by every task.
//!
//! The defaults the original workflow repeated at each entry point live in
//! one place here; a TOML file can override any field.

use std::{fmt::Debug, path::Path};

use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// processors requested in %nprocshared and the SGE script
    pub nproc: usize,

    /// memory in GB for %Mem
    pub mem: usize,

    /// method or functional for the route line
    pub method: String,

    /// basis set for the route line
    pub basis: String,

    /// job keywords appended to the route line, verbatim
    pub keywords: String,

    pub charge: isize,
    pub multiplicity: usize,

    /// wall clock time for SGE scripts, HH:MM:SS
    pub walltime: String,

    /// suffix appended to generated conformer input names
    pub suffix: String,

    /// extension for generated input files (.com/.gjf)
    pub input_ext: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nproc: 4,
            mem: 2,
            method: String::from("B3LYP"),
            basis: String::from("6-31G*"),
            keywords: String::new(),
            charge: 0,
            multiplicity: 1,
            walltime: String::from("11:59:59"),
            suffix: String::from("opt"),
            input_ext: String::from(".com"),
        }
    }
}

impl Config {
    /// load a [Config] from the TOML file specified by `filename`. panics on
    /// failure to read the file and on failure to deserialize it.
    pub fn load<P>(filename: P) -> Self
    where
        P: AsRef<Path> + Debug,
    {
        let contents = std::fs::read_to_string(&filename)
            .expect("failed to load config file");
        let ret: Self = toml::from_str(&contents).unwrap_or_else(|e| {
            panic!("failed to deserialize config file '{filename:?}' with {e}")
        });

        ret.validate();

        ret
    }

    /// check that the settings in `self` make any sense
    fn validate(&self) {
        if self.nproc < 1 || self.mem < 1 {
            eprintln!(
                "In config: nproc ({}) and mem ({}) must be positive, \
                 exiting",
                self.nproc, self.mem
            );
            std::process::exit(1);
        }
    }
}
