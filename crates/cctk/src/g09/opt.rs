//! Parser for Gaussian09 geometry-optimization chunks.
//!
//! A chunk is cut into steps at every `SCF Done` line: the marker closes its
//! step, so N markers leave N+1 elements, the last holding only the tail
//! between the final energy and the termination line. The tail must report
//! `Optimization completed`; the converged geometry is the standard
//! orientation of the second-to-last element, since any block in the tail
//! belongs to a step that never got an energy of its own.

use std::collections::BTreeMap;

use crate::{Error, molecule::Molecule};

const ENERGY_MARKER: &str = "SCF Done";
const DONE_MARKER: &str = "Optimization completed";
const ORIENTATION_MARKER: &str = "Standard orientation";

/// lines between the orientation marker and the first atom row
const ORIENTATION_HEADER: usize = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct Optimization {
    /// energy of the converged geometry, in hartrees
    pub energy: f64,

    /// the converged geometry with charge, multiplicity, and title taken
    /// from the start of the job
    pub molecule: Molecule,

    /// per-step energies, present in trajectory mode
    pub trajectory: Option<Vec<f64>>,
}

pub fn parse(
    lines: &[&str],
    trajectory: bool,
) -> crate::Result<Optimization> {
    let steps = split_steps(lines);
    if steps.len() < 2 {
        return Err(Error::MalformedInput(format!(
            "no `{ENERGY_MARKER}` line in optimization chunk; \
             truncated output?"
        )));
    }
    check_converged(&steps)?;

    let (charge, multiplicity, title) = job_specs(&steps[0])?;
    let last_full = &steps[steps.len() - 2];
    let energy = scf_energy(last_full)?;
    let mut molecule = molecule_from(last_full)?;
    molecule.energy = energy;
    molecule.charge = charge;
    molecule.multiplicity = multiplicity;
    molecule.title = title;

    let trajectory = if trajectory {
        Some(
            steps[..steps.len() - 1]
                .iter()
                .map(|step| scf_energy(step))
                .collect::<crate::Result<Vec<_>>>()?,
        )
    } else {
        None
    };

    Ok(Optimization {
        energy,
        molecule,
        trajectory,
    })
}

/// close the current step at every energy marker; the trailing partial
/// buffer becomes the final element even when it is empty
fn split_steps<'a>(lines: &[&'a str]) -> Vec<Vec<&'a str>> {
    let mut steps = Vec::new();
    let mut current = Vec::new();
    for &line in lines {
        current.push(line);
        if line.contains(ENERGY_MARKER) {
            steps.push(std::mem::take(&mut current));
        }
    }
    steps.push(current);
    steps
}

fn check_converged(steps: &[Vec<&str>]) -> crate::Result<()> {
    let tail = steps.last().unwrap();
    if !tail.iter().any(|l| l.contains(DONE_MARKER)) {
        return Err(Error::NotConverged(format!(
            "`{DONE_MARKER}` not found after the last energy"
        )));
    }
    Ok(())
}

/// Extract the energy of one step: the whitespace token at index 4 of its
/// `SCF Done` line, scanning in reverse so the last occurrence wins.
pub fn scf_energy(lines: &[&str]) -> crate::Result<f64> {
    let line = lines
        .iter()
        .rev()
        .find(|l| l.contains(ENERGY_MARKER))
        .ok_or_else(|| {
            Error::MalformedInput(format!("no `{ENERGY_MARKER}` line"))
        })?;
    line.split_whitespace()
        .nth(4)
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| {
            Error::MalformedInput(format!(
                "unparseable energy line `{}`",
                line.trim()
            ))
        })
}

/// Extract the first standard-orientation block of `lines` into a
/// [Molecule]: skip the fixed header under the marker, then read rows of
/// `center  atomic-number  type  x  y  z` until the `---` separator.
pub fn molecule_from(lines: &[&str]) -> crate::Result<Molecule> {
    let start = lines
        .iter()
        .position(|l| l.contains(ORIENTATION_MARKER))
        .ok_or_else(|| {
            Error::MalformedInput(format!(
                "no `{ORIENTATION_MARKER}` block"
            ))
        })?;
    let mut coords = BTreeMap::new();
    let mut kinds = BTreeMap::new();
    let mut closed = false;
    for line in &lines[(start + ORIENTATION_HEADER).min(lines.len())..] {
        if line.contains("---") {
            closed = true;
            break;
        }
        let fields: Vec<_> = line.split_whitespace().collect();
        let row = || {
            Error::MalformedInput(format!(
                "unparseable orientation row `{}`",
                line.trim()
            ))
        };
        if fields.len() < 6 {
            return Err(row());
        }
        let atom: usize = fields[0].parse().map_err(|_| row())?;
        let kind: usize = fields[1].parse().map_err(|_| row())?;
        let xyz: Vec<f64> = fields[3..6]
            .iter()
            .map(|f| f.parse())
            .collect::<Result<_, _>>()
            .map_err(|_| row())?;
        coords.insert(atom, [xyz[0], xyz[1], xyz[2]]);
        kinds.insert(atom, kind);
    }
    if !closed {
        return Err(Error::MalformedInput(format!(
            "unterminated `{ORIENTATION_MARKER}` block"
        )));
    }
    Molecule::new(coords, kinds)
}

/// charge, multiplicity, and job title from the first step of the chunk
fn job_specs(lines: &[&str]) -> crate::Result<(isize, usize, String)> {
    let input = lines
        .iter()
        .find(|l| l.contains("Input"))
        .ok_or_else(|| {
            Error::MalformedInput("no Input= line in first step".to_owned())
        })?;
    let name = input.split('=').nth(1).unwrap_or("").trim();
    // recover the job name by dropping the filename extension
    let title = match name.rsplit_once('.') {
        Some((stem, _)) => stem.to_owned(),
        None => name.to_owned(),
    };

    let charge_line = lines
        .iter()
        .find(|l| l.contains("Charge"))
        .ok_or_else(|| {
            Error::MalformedInput(
                "no Charge line in first step".to_owned(),
            )
        })?;
    let fields: Vec<_> = charge_line.split_whitespace().collect();
    let bad = || {
        Error::MalformedInput(format!(
            "unparseable charge line `{}`",
            charge_line.trim()
        ))
    };
    let charge: isize =
        fields.get(2).and_then(|f| f.parse().ok()).ok_or_else(bad)?;
    let multiplicity: usize =
        fields.get(5).and_then(|f| f.parse().ok()).ok_or_else(bad)?;
    Ok((charge, multiplicity, title))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn orientation(y1: f64, y2: f64) -> String {
        format!(
            "                         Standard orientation:
 ---------------------------------------------------------------------
 Center     Atomic      Atomic             Coordinates (Angstroms)
 Number     Number       Type             X           Y           Z
 ---------------------------------------------------------------------
      1          6           0        0.000000    {y1:.6}    0.000000
      2          1           0        0.000000    {y2:.6}    0.000000
 ---------------------------------------------------------------------"
        )
    }

    fn chunk() -> String {
        format!(
            " Input=benzene.log
 Charge =  0 Multiplicity = 1
{}
 SCF Done:  E(RB3LYP) =  -230.97600152     A.U. after   10 cycles
{}
 SCF Done:  E(RB3LYP) =  -230.97611043     A.U. after    7 cycles
{}
 SCF Done:  E(RB3LYP) =  -230.97611098     A.U. after    4 cycles
 Optimization completed.
    -- Stationary point found.
{}
 Normal termination of Gaussian 09
",
            orientation(1.40, 2.49),
            orientation(1.396, 2.481),
            orientation(1.394991, 2.478678),
            orientation(1.394991, 2.478678),
        )
    }

    #[test]
    fn three_markers_make_four_steps() {
        let chunk = chunk();
        let lines: Vec<&str> = chunk.lines().collect();
        let steps = split_steps(&lines);
        assert_eq!(steps.len(), 4);
        // the tail holds only the post-convergence lines
        assert!(steps[3].iter().any(|l| l.contains("Optimization completed")));

        let got = parse(&lines, true).unwrap();
        assert_abs_diff_eq!(got.energy, -230.97611098);
        let trajectory = got.trajectory.unwrap();
        assert_eq!(trajectory.len(), 3);
        assert_abs_diff_eq!(trajectory[0], -230.97600152);
        assert_abs_diff_eq!(trajectory[2], -230.97611098);

        // the final geometry comes from the second-to-last step element
        let mol = &got.molecule;
        assert_eq!(mol.natoms(), 2);
        assert_eq!(mol.title, "benzene");
        assert_eq!(mol.charge, 0);
        assert_eq!(mol.multiplicity, 1);
        let (_, kind, xyz) = mol.atoms().next().unwrap();
        assert_eq!(kind, 6);
        assert_abs_diff_eq!(xyz[1], 1.394991);
    }

    #[test]
    fn missing_completion_marker_is_not_converged() {
        let chunk = chunk().replace(" Optimization completed.\n", "");
        let lines: Vec<&str> = chunk.lines().collect();
        let got = parse(&lines, false).unwrap_err();
        assert!(got.is_not_converged());
    }

    #[test]
    fn truncated_chunk_is_malformed() {
        let lines = vec![" Input=benzene.log", " no energies here"];
        assert!(matches!(
            parse(&lines, false),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn scf_energy_takes_the_last_marker() {
        let lines = vec![
            " SCF Done:  E(RHF) =  -1.0     A.U. after 2 cycles",
            " other output",
            " SCF Done:  E(RHF) =  -2.0     A.U. after 2 cycles",
        ];
        assert_abs_diff_eq!(scf_energy(&lines).unwrap(), -2.0);
    }
}
