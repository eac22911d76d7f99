//! Parser for HyperChem conformational-search (`.hcs`) result files.
//!
//! The file is a sequence of blocks separated by lines containing the
//! `Conform` marker. Everything before the first marker is the initial
//! info block holding the atom-type table shared by every conformer; each
//! following block describes one conformer: its `Energy`, how many times it
//! was `Found`, and one `X(<n>)=` coordinate line per atom.

use std::{
    collections::BTreeMap, fs::read_to_string, path::Path, sync::OnceLock,
};

use regex::Regex;

use crate::{
    Error,
    molecule::{Molecule, parse_symbol},
};

static CELL: OnceLock<[Regex; 1]> = OnceLock::new();

/// read and parse `path`, applying `charge` and `multiplicity` to every
/// conformer; the search file itself carries neither
pub fn parse_file(
    path: impl AsRef<Path>,
    charge: isize,
    multiplicity: usize,
) -> crate::Result<Vec<Molecule>> {
    let path = path.as_ref();
    let contents = read_to_string(path)
        .map_err(|e| Error::file_access(path.display(), &e))?;
    parse(&contents, charge, multiplicity)
}

pub fn parse(
    contents: &str,
    charge: isize,
    multiplicity: usize,
) -> crate::Result<Vec<Molecule>> {
    let mut blocks = split_blocks(contents);
    if blocks.is_empty() {
        return Err(Error::MalformedInput(
            "empty conformational-search file".to_owned(),
        ));
    }
    let kinds = atom_kinds(&blocks.remove(0))?;

    let mut conformers = Vec::with_capacity(blocks.len());
    for (i, block) in blocks.iter().enumerate() {
        let energy = marker_value(block, "Energy")
            .ok_or_else(|| missing("Energy", i))??;
        let found = marker_value(block, "Found")
            .ok_or_else(|| missing("Found", i))??;
        let mut molecule = Molecule::new(coordinates(block)?, kinds.clone())?;
        molecule.energy = energy;
        molecule.found = found;
        molecule.charge = charge;
        molecule.multiplicity = multiplicity;
        conformers.push(molecule);
    }
    Ok(conformers)
}

/// split at every line containing `Conform`; the marker line starts its
/// block. the block before the first marker is the initial info
fn split_blocks(contents: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in contents.lines() {
        if line.contains("Conform") && !current.is_empty() {
            blocks.push(std::mem::take(&mut current));
        }
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// extract the atom-type table from the initial info block: lines of the
/// form `atom <index> - <symbol> ...`
fn atom_kinds(init: &[&str]) -> crate::Result<BTreeMap<usize, usize>> {
    let mut kinds = BTreeMap::new();
    for line in init {
        let Some(rest) = line.strip_prefix("atom") else {
            continue;
        };
        let fields: Vec<_> = rest.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(Error::MalformedInput(format!(
                "truncated atom-type line `{line}`"
            )));
        }
        let index = fields[0].parse().map_err(|_| {
            Error::MalformedInput(format!(
                "bad atom index in atom-type line `{line}`"
            ))
        })?;
        kinds.insert(index, parse_symbol(fields[2])?);
    }
    if kinds.is_empty() {
        return Err(Error::MalformedInput(
            "no atom-type table in initial info block".to_owned(),
        ));
    }
    Ok(kinds)
}

/// the value after `=` on the first line of `block` containing `marker`
fn marker_value(
    block: &[&str],
    marker: &str,
) -> Option<crate::Result<f64>> {
    let line = block.iter().find(|l| l.contains(marker))?;
    Some(
        line.split('=')
            .nth(1)
            .map(str::trim)
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| {
                Error::MalformedInput(format!(
                    "unparseable {marker} line `{line}`"
                ))
            }),
    )
}

fn missing(marker: &str, conformer: usize) -> Error {
    Error::MalformedInput(format!(
        "no {marker} line in conformer block {}",
        conformer + 1
    ))
}

/// collect `X(<n>)= x y z` coordinate lines
fn coordinates(
    block: &[&str],
) -> crate::Result<BTreeMap<usize, [f64; 3]>> {
    let [coord_re] = CELL.get_or_init(|| {
        [Regex::new(
            r"^X\((\d+)\)=\s*(-?[\d.]+)\s+(-?[\d.]+)\s+(-?[\d.]+)",
        )
        .unwrap()]
    });
    let mut coords = BTreeMap::new();
    for line in block {
        if !line.starts_with('X') {
            continue;
        }
        let caps = coord_re.captures(line).ok_or_else(|| {
            Error::MalformedInput(format!(
                "unparseable coordinate line `{line}`"
            ))
        })?;
        let atom = caps[1].parse().unwrap();
        let xyz = [
            caps[2].parse().unwrap(),
            caps[3].parse().unwrap(),
            caps[4].parse().unwrap(),
        ];
        coords.insert(atom, xyz);
    }
    Ok(coords)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const HCS: &str = "\
[Conformational Search]
SearchType=1
atom 1 - C sp3 0
atom 2 - O sp3 0
[Conformation 1]
Energy=2.356
Found=4
X(1)= 0.125 -1.733 0.004
X(2)= 1.002 -0.554 0.110
[Conformation 2]
Energy=3.781
Found=1
X(1)= 0.125 -1.733 0.004
X(2)= -0.883 0.620 0.210
";

    #[test]
    fn parses_all_conformers() {
        let confs = parse(HCS, -1, 2).unwrap();
        assert_eq!(confs.len(), 2);
        for conf in &confs {
            assert_eq!(conf.natoms(), 2);
            assert_eq!(conf.charge, -1);
            assert_eq!(conf.multiplicity, 2);
            // the atom-type table is shared by every conformer
            let kinds: Vec<usize> =
                conf.atoms().map(|(_, k, _)| k).collect();
            assert_eq!(kinds, vec![6, 8]);
        }
        assert_abs_diff_eq!(confs[0].energy, 2.356);
        assert_abs_diff_eq!(confs[0].found, 4.0);
        assert_abs_diff_eq!(confs[1].energy, 3.781);
        let (_, _, xyz) = confs[1].atoms().nth(1).unwrap();
        assert_abs_diff_eq!(xyz[0], -0.883);
    }

    #[test]
    fn missing_energy_is_malformed() {
        let broken = HCS.replace("Energy=3.781\n", "");
        let got = parse(&broken, 0, 1).unwrap_err();
        assert_eq!(
            got,
            Error::MalformedInput(
                "no Energy line in conformer block 2".to_owned()
            )
        );
    }

    #[test]
    fn missing_atom_table_is_malformed() {
        let broken = HCS.replace("atom", "mota");
        assert!(matches!(
            parse(&broken, 0, 1),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn missing_file_is_file_access() {
        assert!(matches!(
            parse_file("/no/such/file.hcs", 0, 1),
            Err(Error::FileAccess(..))
        ));
    }
}
