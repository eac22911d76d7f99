//! Orchestration over raw Gaussian09 output files: job-type detection from
//! the echoed route section, splitting compound outputs into per-job chunks,
//! the normal-termination check, and the quarantine policy for runs that
//! never terminated.

use std::{
    fmt::Display,
    fs::{File, create_dir},
    io::{Read, Seek, SeekFrom},
    path::{Path, PathBuf},
};

use crate::Error;

pub mod freq;
pub mod opt;

/// where [quarantine] moves output files that failed [check_term]
pub const QUARANTINE_DIR: &str = "not_normal_term";

const TERM_MARKER: &str = "Normal termination";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Job {
    /// implicit in every calculation
    SinglePoint,
    Opt,
    Freq,
    Irc,
    Stable,
}

impl Display for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Job::SinglePoint => write!(f, "sp"),
            Job::Opt => write!(f, "opt"),
            Job::Freq => write!(f, "freq"),
            Job::Irc => write!(f, "irc"),
            Job::Stable => write!(f, "stable"),
        }
    }
}

/// the route line of an output file and the job types detected on it
#[derive(Clone, Debug, PartialEq)]
pub struct RouteInfo {
    pub route: String,
    pub jobs: Vec<Job>,
}

impl RouteInfo {
    pub fn has(&self, job: Job) -> bool {
        self.jobs.contains(&job)
    }

    /// more than one job beyond the implicit single point means the output
    /// holds several sequentially terminated sub-jobs
    pub fn compound(&self) -> bool {
        self.jobs.len() > 2
    }

    /// whitespace-joined tags, in detection order
    pub fn tags(&self) -> String {
        let tags: Vec<_> =
            self.jobs.iter().map(Job::to_string).collect();
        tags.join(" ")
    }
}

/// Recover the route section and detect which jobs it requested. The route
/// is the first line starting with `#` plus every continuation line up to
/// the `-` separator that closes the echoed section.
pub fn classify(contents: &str) -> crate::Result<RouteInfo> {
    let mut lines = contents.lines();
    let mut route = String::new();
    for line in lines.by_ref() {
        let line = line.trim();
        if line.starts_with('#') {
            route.push_str(line);
            break;
        }
    }
    if route.is_empty() {
        return Err(Error::MalformedInput(
            "no route line in output".to_owned(),
        ));
    }
    for line in lines {
        let line = line.trim();
        if line.starts_with('-') {
            break;
        }
        route.push_str(line);
    }

    let lower = route.to_lowercase();
    let mut jobs = vec![Job::SinglePoint];
    for (marker, job) in [
        ("opt", Job::Opt),
        ("freq", Job::Freq),
        ("irc", Job::Irc),
        ("stable", Job::Stable),
    ] {
        if lower.contains(marker) {
            jobs.push(job);
        }
    }
    Ok(RouteInfo { route, jobs })
}

/// Split `contents` into per-job chunks. Compound outputs are cut at every
/// normal-termination line, marker included; anything else is one chunk.
pub fn split_jobs<'a>(
    contents: &'a str,
    route: &RouteInfo,
) -> Vec<Vec<&'a str>> {
    if !route.compound() {
        return vec![contents.lines().collect()];
    }
    let mut chunks = Vec::new();
    let mut current = Vec::new();
    for line in contents.lines() {
        current.push(line);
        if line.contains(TERM_MARKER) {
            chunks.push(std::mem::take(&mut current));
        }
    }
    chunks
}

/// Check whether the run terminated normally by looking at the last 3 lines
/// only, scanned in reverse with the first match winning. The tail is read
/// by seeking from the end of the file, never by scanning the whole log.
pub fn check_term(path: impl AsRef<Path>) -> crate::Result<bool> {
    let tail = last_lines(path.as_ref(), 3)?;
    Ok(tail.iter().rev().any(|l| l.contains(TERM_MARKER)))
}

/// read (up to) the last `n` lines of the file at `path`, doubling the tail
/// window until it covers them
fn last_lines(path: &Path, n: usize) -> crate::Result<Vec<String>> {
    let err = |e: &std::io::Error| Error::file_access(path.display(), e);
    let mut file = File::open(path).map_err(|e| err(&e))?;
    let size = file.seek(SeekFrom::End(0)).map_err(|e| err(&e))?;
    let mut window = 512;
    loop {
        let start = size.saturating_sub(window);
        file.seek(SeekFrom::Start(start)).map_err(|e| err(&e))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf).map_err(|e| err(&e))?;
        let text = String::from_utf8_lossy(&buf);
        let lines: Vec<_> = text.lines().collect();
        if start == 0 || lines.len() > n {
            return Ok(lines
                .iter()
                .skip(lines.len().saturating_sub(n))
                .map(|s| s.to_string())
                .collect());
        }
        window *= 2;
    }
}

/// Move an output file that failed [check_term] into [QUARANTINE_DIR] beside
/// it, creating the directory if needed. Returns the new location.
pub fn quarantine(path: impl AsRef<Path>) -> crate::Result<PathBuf> {
    let path = path.as_ref();
    let name = path.file_name().ok_or_else(|| {
        Error::FileAccess(
            path.display().to_string(),
            std::io::ErrorKind::InvalidInput,
        )
    })?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.join(QUARANTINE_DIR),
        _ => PathBuf::from(QUARANTINE_DIR),
    };
    if let Err(e) = create_dir(&dir) {
        if e.kind() != std::io::ErrorKind::AlreadyExists {
            return Err(Error::file_access(dir.display(), &e));
        }
    }
    let dest = dir.join(name);
    std::fs::rename(path, &dest)
        .map_err(|e| Error::file_access(path.display(), &e))?;
    log::warn!("quarantined {} to {}", path.display(), dest.display());
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use test_case::test_case;

    use super::*;

    const LOG: &str = "\
 %nprocshared=4
 ----------------------------------------------------------------------
 #P B3LYP/6-31G* opt freq
 ----------------------------------------------------------------------
 body of the opt job
 Normal termination of Gaussian 09 at Mon Jul  5 14:26:03 2021.
 body of the freq job
 Normal termination of Gaussian 09 at Mon Jul  5 15:02:41 2021.
";

    #[test_case("#P B3LYP/6-31G* opt freq", &[Job::SinglePoint, Job::Opt, Job::Freq]; "opt freq")]
    #[test_case("# HF/STO-3G", &[Job::SinglePoint]; "bare sp")]
    #[test_case("# B3LYP/6-31G* IRC(maxpoints=10)", &[Job::SinglePoint, Job::Irc]; "irc is case insensitive")]
    #[test_case("# wB97XD/def2TZVP stable=opt", &[Job::SinglePoint, Job::Opt, Job::Stable]; "stable implies opt marker too")]
    fn classify_detects_jobs(route: &str, want: &[Job]) {
        let contents = format!(" junk\n {route}\n ----\n rest\n");
        let got = classify(&contents).unwrap();
        assert_eq!(got.jobs, want);
    }

    #[test]
    fn classify_joins_continuation_lines() {
        let contents = "\
 #P B3LYP/6-31G*
 freq=noraman
 ----
";
        let got = classify(contents).unwrap();
        assert_eq!(got.route, "#P B3LYP/6-31G*freq=noraman");
        assert!(got.has(Job::Freq));
    }

    #[test]
    fn classify_without_route_is_malformed() {
        assert!(matches!(
            classify("no route here\n"),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn split_compound_output() {
        let route = classify(LOG).unwrap();
        assert!(route.compound());
        let chunks = split_jobs(LOG, &route);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].last().unwrap().contains(TERM_MARKER));
        assert!(chunks[1][0].contains("body of the freq job"));
    }

    #[test]
    fn single_job_is_one_chunk() {
        let route = RouteInfo {
            route: "# B3LYP/6-31G* opt".to_owned(),
            jobs: vec![Job::SinglePoint, Job::Opt],
        };
        let chunks = split_jobs(LOG, &route);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), LOG.lines().count());
    }

    #[test]
    fn check_term_scans_the_tail_in_reverse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("done.log");
        let mut f = File::create(&path).unwrap();
        write!(f, " lots of output\n \n Normal termination of Gaussian 09\n\n")
            .unwrap();
        assert!(check_term(&path).unwrap());

        let path = dir.path().join("dead.log");
        let mut f = File::create(&path).unwrap();
        write!(f, " lots of output\n Error termination via Lnk1e\n").unwrap();
        assert!(!check_term(&path).unwrap());
    }

    #[test]
    fn quarantine_is_idempotent_on_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.log", "b.log"] {
            let path = dir.path().join(name);
            std::fs::write(&path, "dead\n").unwrap();
            let dest = quarantine(&path).unwrap();
            assert!(dest.exists());
            assert!(!path.exists());
        }
        assert!(dir.path().join(QUARANTINE_DIR).join("a.log").exists());
        assert!(dir.path().join(QUARANTINE_DIR).join("b.log").exists());
    }
}
