use std::path::PathBuf;

use cctools::{
    config::Config,
    die,
    tasks::{conformers, coords, coords::SiFormat, outputs, rewrite, scripts},
};
use cctk::input::Rewrite;
use clap::{Parser, Subcommand};

/// process Gaussian09 outputs and HyperChem conformational searches
#[derive(Parser, Debug)]
#[command(author, about, long_about = None)]
struct Args {
    /// TOML file with job defaults (method, basis, nproc, ...)
    #[arg(short, long)]
    config: Option<String>,

    /// Serialize the effective config to JSON and exit
    #[arg(long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    task: Option<Task>,
}

#[derive(Subcommand, Debug)]
enum Task {
    /// process Gaussian output files with opt, freq, or sp jobs
    Outputs {
        /// directory holding the output files
        #[arg(default_value = ".")]
        path: PathBuf,

        /// extension of the output files
        #[arg(short, long, default_value = ".log")]
        ext: String,

        /// also write a per-file CSV with the energy of every
        /// optimization step
        #[arg(short, long, default_value_t = false)]
        steps: bool,

        /// extract the energy from bare single-point outputs
        #[arg(long, default_value_t = false)]
        sp: bool,
    },

    /// write Gaussian inputs and a summary CSV from conformational searches
    Conformers {
        /// directory holding the .hcs files
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// rewrite link0 and route lines of existing input files in place
    Rewrite {
        /// directory holding the input files
        #[arg(default_value = ".")]
        path: PathBuf,

        /// extension of the input files
        #[arg(short, long, default_value = ".com")]
        ext: String,

        /// new route line, without the leading # symbol
        #[arg(short, long)]
        route: Option<String>,

        /// add a %chk line named after each input file
        #[arg(long, default_value_t = false)]
        chk: bool,

        /// new memory in GB
        #[arg(short, long)]
        mem: Option<usize>,

        /// new processor count
        #[arg(short, long)]
        nproc: Option<usize>,
    },

    /// write SGE submit scripts for Gaussian input files
    Scripts {
        /// directory holding the input files
        #[arg(default_value = ".")]
        path: PathBuf,

        /// extension of the input files
        #[arg(short, long, default_value = ".com")]
        ext: String,

        /// number of inputs to run serially from each script; they must
        /// all request the same nproc
        #[arg(short, long, default_value_t = 1)]
        n_files: usize,

        /// prefix for the script file names
        #[arg(long, default_value = "a")]
        prefix: String,
    },

    /// write SI coordinate reports from Gaussian output files
    Coords {
        /// directory holding the output files
        #[arg(default_value = ".")]
        path: PathBuf,

        /// extension of the output files
        #[arg(short, long, default_value = ".log")]
        ext: String,

        /// report format
        #[arg(short, long, value_enum, default_value_t = SiFormat::Both)]
        format: SiFormat,
    },
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load(path),
        None => Config::default(),
    };
    if args.json {
        match serde_json::to_string_pretty(&config) {
            Ok(s) => println!("{s}"),
            Err(e) => die!("failed to serialize config with {e}"),
        }
        return;
    }
    let Some(task) = args.task else {
        die!("no task given; see --help");
    };

    let res = match task {
        Task::Outputs {
            path,
            ext,
            steps,
            sp,
        } => outputs::run(&path, &ext, steps, sp, &config),
        Task::Conformers { path } => conformers::run(&path, &config),
        Task::Rewrite {
            path,
            ext,
            route,
            chk,
            mem,
            nproc,
        } => {
            let rw = Rewrite {
                route,
                checkpoint: None,
                mem,
                nproc,
            };
            rewrite::run(&path, &ext, &rw, chk)
        }
        Task::Scripts {
            path,
            ext,
            n_files,
            prefix,
        } => scripts::run(&path, &ext, n_files, &prefix, &config),
        Task::Coords { path, ext, format } => {
            coords::run(&path, &ext, format)
        }
    };
    if let Err(e) = res {
        die!("cctools: {e}");
    }
}
