use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thermo_forge::{
    CollectingSink, DeprecationPolicy, Error, ForgeConfig, ONE_ATM, PhaseForge, ReferenceKind,
    new_phase_from_file,
};

fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, text).unwrap();
    path
}

fn isolated() -> ForgeConfig {
    ForgeConfig {
        use_env_data_path: false,
        ..ForgeConfig::default()
    }
}

const SHARED_THERMO: &str = "
elements:
- symbol: Ci
  atomic-weight: 13.003
  atomic-number: 6
species:
- {name: CO2, composition: {C: 1, O: 2}}
- {name: N2, composition: {N: 2}}
- {name: Ar, composition: {Ar: 1}}
- {name: 13CO, composition: {Ci: 1, O: 1}}
";

#[test]
fn species_and_elements_come_from_other_files() {
    let dir = TempDir::new().unwrap();
    write(&dir, "shared/thermo.yaml", SHARED_THERMO);
    let main = write(
        &dir,
        "mech.yaml",
        "
phases:
- name: air
  thermo: ideal-gas
  elements:
  - default: [O, N, Ar, C]
  - shared/thermo.yaml/elements: [Ci]
  species:
  - shared/thermo.yaml/species: [N2, CO2, 13CO]
  - species: [O2]
  state: {T: 400.0, P: 2 atm, X: {N2: 0.79, O2: 0.21}}
species:
- {name: O2, composition: {O: 2}}
",
    );

    let forge = PhaseForge::new().with_config(isolated());
    let air = forge.build_from_file(&main, "air").unwrap();

    let names: Vec<&str> = air.species().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["N2", "CO2", "13CO", "O2"]);
    assert_eq!(air.element_index("Ci"), Some(4));
    assert_eq!(air.elements()[4].atomic_weight, 13.003);
    assert_eq!(air.temperature(), 400.0);
    assert_eq!(air.pressure(), 2.0 * ONE_ATM);
    assert!((air.mole_fractions()[0] - 0.79).abs() < 1e-12);
    assert_eq!(forge.loader().cached_documents(), 2);
}

#[test]
fn first_phase_is_selected_by_empty_or_dash_id() {
    let dir = TempDir::new().unwrap();
    let main = write(
        &dir,
        "two-phases.yaml",
        "
phases:
- {name: first, thermo: ideal-gas, elements: [H], species: [H2]}
- {name: second, thermo: ideal-gas, elements: [O], species: [O2]}
species:
- {name: H2, composition: {H: 2}}
- {name: O2, composition: {O: 2}}
",
    );

    assert_eq!(new_phase_from_file(&main, "").unwrap().name(), "first");
    assert_eq!(new_phase_from_file(&main, "-").unwrap().name(), "first");
    assert_eq!(new_phase_from_file(&main, "second").unwrap().name(), "second");

    let err = new_phase_from_file(&main, "third").unwrap_err();
    assert!(matches!(
        err,
        Error::ReferenceNotFound { kind: ReferenceKind::Phase, .. }
    ));
}

#[test]
fn legacy_formats_are_rejected_without_reading() {
    let dir = TempDir::new().unwrap();
    for name in ["gri30.cti", "gri30.xml", "GRI30.XML"] {
        let path = dir.path().join(name);
        let err = new_phase_from_file(&path, "").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }), "{name}: {err}");
    }

    let main = write(
        &dir,
        "uses-legacy.yaml",
        "
phases:
- name: gas
  thermo: ideal-gas
  species:
  - old/gri30.cti/species: [H2]
",
    );
    let err = new_phase_from_file(&main, "gas").unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { .. }), "{err}");
}

#[test]
fn circular_redirects_fail_cleanly() {
    let dir = TempDir::new().unwrap();
    let main = write(
        &dir,
        "a.yaml",
        "
phases:
- {name: gas, thermo: ideal-gas, species: all}
species: b.yaml/species
",
    );
    write(&dir, "b.yaml", "species: a.yaml/species\n");

    let forge = PhaseForge::new().with_config(isolated());
    match forge.build_from_file(&main, "gas").unwrap_err() {
        Error::CircularReference { chain } => {
            assert!(chain.len() >= 3);
            assert_eq!(chain.first(), chain.last());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_files_are_reference_errors() {
    let dir = TempDir::new().unwrap();
    let main = write(
        &dir,
        "mech.yaml",
        "
phases:
- name: gas
  thermo: ideal-gas
  species:
  - nowhere/thermo.yaml/species: [H2]
",
    );

    let err = PhaseForge::new()
        .with_config(isolated())
        .build_from_file(&main, "gas")
        .unwrap_err();
    match err {
        Error::ReferenceNotFound { kind, name, .. } => {
            assert_eq!(kind, ReferenceKind::File);
            assert!(Path::new(&name).ends_with("nowhere/thermo.yaml"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn data_dirs_supply_shared_files() {
    let dir = TempDir::new().unwrap();
    write(&dir, "library/thermo.yaml", SHARED_THERMO);
    let main = write(
        &dir,
        "cases/mech.yaml",
        "
phases:
- name: inert
  thermo: ideal-gas
  elements: [N, Ar]
  species:
  - thermo.yaml/species: [N2, Ar]
",
    );

    let config = ForgeConfig {
        data_dirs: vec![dir.path().join("library")],
        ..isolated()
    };
    let inert = PhaseForge::new()
        .with_config(config)
        .build_from_file(&main, "inert")
        .unwrap();
    assert_eq!(inert.n_species(), 2);

    let err = PhaseForge::new()
        .with_config(isolated())
        .build_from_file(&main, "inert")
        .unwrap_err();
    assert!(matches!(
        err,
        Error::ReferenceNotFound { kind: ReferenceKind::File, .. }
    ));
}

#[test]
fn deprecation_notices_name_file_and_phase() {
    let dir = TempDir::new().unwrap();
    let main = write(
        &dir,
        "old.yaml",
        "
phases:
- name: gas
  thermo: ideal-gas
  elements: [H]
  species: [H2]
  deprecated: use new.yaml instead
species:
- {name: H2, composition: {H: 2}}
",
    );

    let sink = CollectingSink::new();
    let gas = PhaseForge::new()
        .with_config(isolated())
        .with_sink(&sink)
        .build_from_file(&main, "gas")
        .unwrap();
    assert_eq!(gas.n_species(), 1);

    let notices = sink.drain();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].origin.ends_with("old.yaml/gas"));
    assert_eq!(notices[0].message, "use new.yaml instead");

    let strict = ForgeConfig {
        deprecations: DeprecationPolicy::Error,
        ..isolated()
    };
    let err = PhaseForge::new()
        .with_config(strict)
        .with_sink(&sink)
        .build_from_file(&main, "gas")
        .unwrap_err();
    assert!(matches!(err, Error::Deprecated { .. }));
}
