//! In-memory molecule model shared by all of the parsers and writers.
//!
//! Atoms are kept in two ordered maps keyed by the 1-based atom index from
//! the source file: one for the atomic number and one for the Cartesian
//! coordinates. The canonical element representation is the atomic number;
//! symbols are converted at the file boundaries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Error;

pub const NUMBER_TO_SYMBOL: [&str; 119] = [
    "X", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg",
    "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn",
    "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb",
    "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm",
    "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta",
    "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At",
    "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt",
    "Ds", "Rg", "Uub", "Uut", "Uuq", "Uup", "Uuh", "Uus", "Uuo",
];

pub fn symbol_to_number(s: &str) -> Option<usize> {
    NUMBER_TO_SYMBOL.iter().position(|&x| x == s)
}

/// return the symbol for `atomic_number`, which must be in the range of
/// [NUMBER_TO_SYMBOL] as guaranteed by [Molecule::new]
pub fn symbol(atomic_number: usize) -> &'static str {
    debug_assert!(
        atomic_number != 0 && atomic_number < NUMBER_TO_SYMBOL.len()
    );
    NUMBER_TO_SYMBOL[atomic_number]
}

fn titlecase(s: &str) -> String {
    let cs: Vec<_> = s.chars().collect();
    let mut ret = String::from(cs[0]).to_uppercase();
    for c in cs.iter().skip(1) {
        ret.push_str(&c.to_lowercase().to_string());
    }
    ret
}

/// parse an element symbol, retrying with normalized case before giving up
pub fn parse_symbol(s: &str) -> crate::Result<usize> {
    if s.is_empty() {
        return Err(Error::MalformedInput(
            "empty element symbol".to_owned(),
        ));
    }
    symbol_to_number(s)
        .or_else(|| symbol_to_number(&titlecase(s)))
        .ok_or_else(|| {
            Error::MalformedInput(format!("unknown element symbol `{s}`"))
        })
}

/// A molecule parsed from one chunk of a results file, with the scalar
/// metadata the source file (or the caller) provides for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    coords: BTreeMap<usize, [f64; 3]>,
    kinds: BTreeMap<usize, usize>,

    /// electronic energy in hartrees
    pub energy: f64,

    /// how many times a conformational search found this structure
    pub found: f64,

    pub charge: isize,
    pub multiplicity: usize,
    pub title: String,
}

impl Molecule {
    /// Build a molecule from its coordinate and atomic-number maps. The maps
    /// must be keyed by the same 1-based atom indices; a size mismatch is an
    /// [Error::ArityMismatch], any other key disagreement or an
    /// out-of-range atomic number is an [Error::MalformedInput].
    pub fn new(
        coords: BTreeMap<usize, [f64; 3]>,
        kinds: BTreeMap<usize, usize>,
    ) -> crate::Result<Self> {
        if coords.len() != kinds.len() {
            return Err(Error::ArityMismatch {
                coords: coords.len(),
                kinds: kinds.len(),
            });
        }
        if !coords.keys().eq(kinds.keys()) {
            return Err(Error::MalformedInput(
                "coordinate and atom-kind maps are keyed by different \
                 atom indices"
                    .to_owned(),
            ));
        }
        if let Some((atom, &kind)) = kinds
            .iter()
            .find(|&(_, &k)| k == 0 || k >= NUMBER_TO_SYMBOL.len())
        {
            return Err(Error::MalformedInput(format!(
                "atom {atom} has atomic number {kind} outside the periodic \
                 table"
            )));
        }
        Ok(Self {
            coords,
            kinds,
            energy: 0.0,
            found: 0.0,
            charge: 0,
            multiplicity: 1,
            title: String::from("NAME"),
        })
    }

    pub fn natoms(&self) -> usize {
        self.coords.len()
    }

    /// iterate over `(atom index, atomic number, coordinates)` in index order
    pub fn atoms(&self) -> impl Iterator<Item = (usize, usize, [f64; 3])> + '_ {
        self.kinds
            .iter()
            .zip(self.coords.values())
            .map(|((&i, &k), &xyz)| (i, k, xyz))
    }

    /// one fixed-width coordinate line per atom, in the layout the input
    /// writer and the SI reports share
    pub fn xyz_rows(&self) -> Vec<String> {
        self.atoms()
            .map(|(_, kind, [x, y, z])| {
                format!(
                    "{:<2} {x:>14.8} {y:>14.8} {z:>14.8}",
                    symbol(kind)
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maps(
        n: usize,
    ) -> (BTreeMap<usize, [f64; 3]>, BTreeMap<usize, usize>) {
        let coords =
            (1..=n).map(|i| (i, [i as f64, 0.0, 0.0])).collect();
        let kinds = (1..=n).map(|i| (i, 6)).collect();
        (coords, kinds)
    }

    #[test]
    fn natoms_matches_maps() {
        let (coords, kinds) = maps(3);
        let mol = Molecule::new(coords, kinds).unwrap();
        assert_eq!(mol.natoms(), 3);
        assert_eq!(mol.multiplicity, 1);
        assert_eq!(mol.charge, 0);
    }

    #[test]
    fn arity_mismatch() {
        let (coords, _) = maps(3);
        let (_, kinds) = maps(2);
        let got = Molecule::new(coords, kinds);
        assert_eq!(
            got.unwrap_err(),
            Error::ArityMismatch { coords: 3, kinds: 2 }
        );
    }

    #[test]
    fn key_mismatch() {
        let (coords, _) = maps(2);
        let kinds = [(2_usize, 6_usize), (3, 6)].into_iter().collect();
        assert!(matches!(
            Molecule::new(coords, kinds),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn symbols() {
        assert_eq!(symbol_to_number("C"), Some(6));
        assert_eq!(parse_symbol("cl").unwrap(), 17);
        assert!(parse_symbol("Qq").is_err());
        assert_eq!(symbol(1), "H");
    }

    #[test]
    fn xyz_rows_are_fixed_width() {
        let (coords, kinds) = maps(1);
        let mol = Molecule::new(coords, kinds).unwrap();
        assert_eq!(mol.xyz_rows(), vec!["C      1.00000000     0.00000000     0.00000000"]);
    }
}
