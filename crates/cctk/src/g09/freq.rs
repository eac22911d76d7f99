//! Parser for Gaussian09 frequency chunks: the first triplet of normal-mode
//! frequencies, the imaginary-mode check, and the thermochemistry energy
//! corrections.

use crate::{Error, g09::opt, molecule::Molecule};

const FREQ_MARKER: &str = "Frequencies";
const SUM_MARKER: &str = "Sum of electronic";
const FREE_MARKER: &str = "Sum of electronic and thermal Free";

#[derive(Clone, Debug, PartialEq)]
pub struct Frequencies {
    /// the first reported triplet of normal-mode frequencies, in cm-1
    pub modes: Vec<f64>,

    /// the single-point energy followed by every thermochemistry sum in
    /// file order: +ZPE, +thermal energy, +enthalpy, +free energy
    pub energies: Vec<f64>,
}

impl Frequencies {
    /// number of imaginary modes among the extracted frequencies
    pub fn n_imaginary(&self) -> usize {
        self.modes.iter().filter(|&&f| f < 0.0).count()
    }

    /// the imaginary frequency, reported only when there is exactly one
    /// (the transition-state check)
    pub fn imaginary(&self) -> Option<f64> {
        if self.n_imaginary() == 1 {
            self.modes.iter().find(|&&f| f < 0.0).copied()
        } else {
            None
        }
    }
}

pub fn parse(lines: &[&str]) -> crate::Result<Frequencies> {
    let line = lines
        .iter()
        .find(|l| l.trim_start().starts_with(FREQ_MARKER))
        .ok_or_else(|| {
            Error::MalformedInput(format!(
                "no `{FREQ_MARKER}` line in frequency chunk"
            ))
        })?;
    let modes = line
        .split("--")
        .nth(1)
        .ok_or_else(|| {
            Error::MalformedInput(format!(
                "unparseable frequency line `{}`",
                line.trim()
            ))
        })?
        .split_whitespace()
        .map(|f| f.parse())
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|_| {
            Error::MalformedInput(format!(
                "unparseable frequency line `{}`",
                line.trim()
            ))
        })?;

    let mut energies = vec![opt::scf_energy(lines)?];
    for line in lines {
        if line.contains(SUM_MARKER) {
            energies.push(sum_value(line)?);
        }
    }
    Ok(Frequencies { modes, energies })
}

/// the last `Sum of electronic and thermal Free` value of the chunk, for
/// the SI coordinate report
pub fn free_energy(lines: &[&str]) -> crate::Result<f64> {
    let line = lines
        .iter()
        .rev()
        .find(|l| l.contains(FREE_MARKER))
        .ok_or_else(|| {
            Error::MalformedInput(format!(
                "no `{FREE_MARKER}` line in frequency chunk"
            ))
        })?;
    sum_value(line)
}

/// the geometry reported by a frequency or single-point chunk
pub fn molecule(lines: &[&str]) -> crate::Result<Molecule> {
    opt::molecule_from(lines)
}

fn sum_value(line: &str) -> crate::Result<f64> {
    line.split('=')
        .nth(1)
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| {
            Error::MalformedInput(format!(
                "unparseable thermochemistry line `{}`",
                line.trim()
            ))
        })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const CHUNK: &str = "\
 SCF Done:  E(RB3LYP) =  -230.97611098     A.U. after    4 cycles
 Harmonic frequencies (cm**-1), IR intensities (KM/Mole) ...
 Frequencies --   -45.3  102.7  550.1
 Red. masses --     2.1    3.4    4.9
 Sum of electronic and zero-point Energies=           -230.858006
 Sum of electronic and thermal Energies=              -230.851331
 Sum of electronic and thermal Enthalpies=            -230.850387
 Sum of electronic and thermal Free Energies=         -230.888426
";

    #[test]
    fn one_imaginary_mode() {
        let lines: Vec<&str> = CHUNK.lines().collect();
        let got = parse(&lines).unwrap();
        assert_eq!(got.modes, vec![-45.3, 102.7, 550.1]);
        assert_eq!(got.n_imaginary(), 1);
        assert_abs_diff_eq!(got.imaginary().unwrap(), -45.3);
    }

    #[test]
    fn energies_in_file_order() {
        let lines: Vec<&str> = CHUNK.lines().collect();
        let got = parse(&lines).unwrap();
        assert_eq!(got.energies.len(), 5);
        assert_abs_diff_eq!(got.energies[0], -230.97611098);
        assert_abs_diff_eq!(got.energies[1], -230.858006);
        assert_abs_diff_eq!(got.energies[4], -230.888426);
        assert_abs_diff_eq!(
            free_energy(&lines).unwrap(),
            -230.888426
        );
    }

    #[test]
    fn no_imaginary_value_unless_exactly_one() {
        let all_real = Frequencies {
            modes: vec![45.3, 102.7, 550.1],
            energies: vec![],
        };
        assert_eq!(all_real.n_imaginary(), 0);
        assert_eq!(all_real.imaginary(), None);

        let two = Frequencies {
            modes: vec![-45.3, -10.2, 550.1],
            energies: vec![],
        };
        assert_eq!(two.n_imaginary(), 2);
        assert_eq!(two.imaginary(), None);
    }

    #[test]
    fn missing_frequency_line_is_malformed() {
        let lines = vec![" SCF Done:  E =  -1.0     A.U."];
        assert!(matches!(parse(&lines), Err(Error::MalformedInput(_))));
    }
}
