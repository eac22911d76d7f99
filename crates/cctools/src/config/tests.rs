use super::*;

#[test]
fn defaults() {
    let got = Config::default();
    let want = Config {
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
    };
    assert_eq!(got, want);
}

#[test]
fn load_partial_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cctools.toml");
    std::fs::write(
        &path,
        r#"
nproc = 16
mem = 8
method = "M062X"
charge = -1
"#,
    )
    .unwrap();
    let got = Config::load(&path);
    assert_eq!(got.nproc, 16);
    assert_eq!(got.mem, 8);
    assert_eq!(got.method, "M062X");
    assert_eq!(got.charge, -1);
    // untouched fields keep their defaults
    assert_eq!(got.basis, "6-31G*");
    assert_eq!(got.multiplicity, 1);
}

#[test]
#[should_panic(expected = "failed to deserialize")]
fn unknown_fields_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cctools.toml");
    std::fs::write(&path, "nprocs = 16\n").unwrap();
    Config::load(&path);
}
