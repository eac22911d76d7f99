//! Writing SGE submit scripts for Gaussian09 input files.
//!
//! Scripts are rendered from a Go-template-style body with `{{.jobname}}`,
//! `{{.walltime}}`, `{{.nproc}}`, and `{{.jobs}}` directives; a user
//! template can replace the default one wholesale.

use std::{fs, path::Path};

use crate::Error;

/// the extension appended to submit scripts
pub const SCRIPT_EXT: &str = "sh";

#[derive(Clone, Debug)]
pub struct Sge {
    /// wall clock time in HH:MM:SS, at most 3 days
    pub wall_time: String,

    /// override for [Sge::default_submit_script]
    pub template: Option<String>,
}

impl Sge {
    pub fn new(wall_time: impl Into<String>) -> Self {
        Self {
            wall_time: wall_time.into(),
            template: None,
        }
    }

    pub fn default_submit_script(&self) -> String {
        "#!/bin/bash
#$ -S /bin/bash
#
### Job Name
#$ -N {{.jobname}}
#
### Wall clock time as HH:MM:SS, 3 days at most
#$ -l h_rt={{.walltime}}
#
### write out files in current directory
#$ -cwd
#
### Merge '-j y' (do not merge '-j n') stderr into stdout stream:
#$ -j y
#
### Number of procs requested
#$ -pe openmp {{.nproc}}


# ------- Defining root directory for gaussian

g09root=/share/apps/Gaussian09/EM64T.SSE4.2-enabled
mkdir /local/$USER
GAUSS_SCRDIR=/local/$USER
export g09root GAUSS_SCRDIR
. $g09root/g09/bsd/g09.profile


# -------- SECTION print some infos to stdout ---------------------------------

echo \" \"
echo \"START_TIME           = `date +'%y-%m-%d %H:%M:%S %s'`\"
START_TIME=`date +%s`
echo \"HOSTNAME             = $HOSTNAME\"
echo \"JOB_NAME             = $JOB_NAME\"
echo \"JOB_ID               = $JOB_ID\"
echo \"SGE_O_WORKDIR        = $SGE_O_WORKDIR\"
echo \"NSLOTS               = $NSLOTS\"
echo \" \"


# -------- SECTION executing program ---------------------------------

echo \" \"
echo \"Running:\"
echo \" \"

{{.jobs}}


# -------- SECTION final cleanup and timing statistics ------------------------

echo \"END_TIME (success)   = `date +'%y-%m-%d %H:%M:%S %s'`\"
END_TIME=`date +%s`
echo \"RUN_TIME (hours)     = \"`echo \"$START_TIME $END_TIME\" | awk '{printf(\"%.4f\",($2-$1)/60.0/60.0)}'`

exit 0
"
        .to_owned()
    }

    /// Render the submit script for `infiles` into `filename`, one
    /// `g09 <input>` line per bundled input file.
    pub fn write_submit_script(
        &self,
        jobname: &str,
        nproc: usize,
        infiles: impl IntoIterator<Item = String>,
        filename: impl AsRef<Path>,
    ) -> crate::Result<()> {
        use std::fmt::Write;
        let mut jobs = String::new();
        for f in infiles {
            writeln!(jobs, "g09 {f}").unwrap();
        }
        let body = self
            .template
            .clone()
            .unwrap_or_else(|| self.default_submit_script())
            .replace("{{.jobname}}", jobname)
            .replace("{{.walltime}}", &self.wall_time)
            .replace("{{.nproc}}", &nproc.to_string())
            .replace("{{.jobs}}", jobs.trim_end());
        let filename = filename.as_ref();
        fs::write(filename, body)
            .map_err(|e| Error::file_access(filename.display(), &e))
    }
}

/// recover the requested processor count from the `%n` link0 line of an
/// existing input file
pub fn read_nproc(path: impl AsRef<Path>) -> crate::Result<usize> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::file_access(path.display(), &e))?;
    for line in contents.lines() {
        if line.starts_with("%n") {
            return line
                .split('=')
                .nth(1)
                .and_then(|v| v.trim().parse().ok())
                .ok_or_else(|| {
                    Error::MalformedInput(format!(
                        "unparseable processor line `{line}`"
                    ))
                });
        }
    }
    Err(Error::MalformedInput(format!(
        "no processor-count line in {}",
        path.display()
    )))
}
