use log::debug;

use crate::error::{Error, Location, ReferenceKind, Result};
use crate::io::{DocumentLoader, Section};
use crate::model::node::{Map, Node};
use crate::model::phase::Phase;
use crate::model::species::Species;

/// Which species of a source section to take.
enum Selection<'n> {
    All,
    Named(Vec<&'n str>),
}

impl<'n> Selection<'n> {
    fn parse(node: &'n Node) -> Result<Self> {
        if node.is_str() {
            return match node.as_str()? {
                "all" => Ok(Selection::All),
                other => Err(Error::structural(
                    node.location(),
                    format!("expected 'all' or a list of species names, found '{}'", other),
                )),
            };
        }
        Ok(Selection::Named(node.as_string_list()?))
    }
}

/// Adds the species named by a phase's `species` declaration.
///
/// Without a declaration every entry of the root `species` section is
/// added, or none when the root has no such section.
pub(super) fn add_species(
    phase: &mut Phase,
    declaration: Option<&Node>,
    root: &Map,
    loader: &DocumentLoader,
) -> Result<()> {
    let Some(declaration) = declaration else {
        if root.has_key("species") {
            let section = loader.section(root, "species", root.location())?;
            return add_from_section(phase, &section, "species", &Selection::All, root.location());
        }
        debug!("phase '{}': no species declared", phase.name());
        return Ok(());
    };
    let location = declaration.location();

    if declaration.is_str() || declaration.is_string_list() {
        let selection = Selection::parse(declaration)?;
        let section = loader.section(root, "species", location)?;
        return add_from_section(phase, &section, "species", &selection, location);
    }

    if declaration.is_map_list() {
        for item in declaration.as_map_list()? {
            let (reference, names) = item.single_entry()?;
            let selection = Selection::parse(names)?;
            let section = loader.section(root, reference, item.location())?;
            add_from_section(phase, &section, reference, &selection, item.location())?;
        }
        return Ok(());
    }

    Err(Error::structural(
        location,
        format!(
            "Could not parse species declaration of type '{}'",
            declaration.type_name()
        ),
    ))
}

fn add_from_section(
    phase: &mut Phase,
    section: &Section<'_>,
    source_name: &str,
    selection: &Selection<'_>,
    location: &Location,
) -> Result<()> {
    let mut added = 0usize;
    match selection {
        Selection::All => {
            for entry in section.node().as_map_list()? {
                added += usize::from(phase.add_species(Species::from_map(entry)?)?);
            }
        }
        Selection::Named(names) => {
            let table = section.node().index_by("name")?;
            for name in names {
                let entry = table.get(name).ok_or_else(|| {
                    Error::not_found(ReferenceKind::Species, *name, source_name, location)
                })?;
                added += usize::from(phase.add_species(Species::from_map(entry)?)?);
            }
        }
    }
    debug!("phase '{}': {} species from '{}'", phase.name(), added, source_name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::phase::UndefinedElements;
    use crate::thermo::IdealGas;

    const ROOT: &str = "
species:
- {name: H2, composition: {H: 2}}
- {name: H, composition: {H: 1}}
- {name: O2, composition: {O: 2}}
- {name: OH, composition: {O: 1, H: 1}}
- {name: H2O, composition: {H: 2, O: 1}}
extra-species:
- {name: N2, composition: {N: 2}}
";

    fn resolve(root: &str, declaration: &str) -> Result<Phase> {
        let root = Map::from_yaml_str(root, None).unwrap();
        let phase_node = Map::from_yaml_str(declaration, None).unwrap();
        let mut phase = Phase::new(Box::new(IdealGas));
        phase.set_undefined_elements(UndefinedElements::AddMissing);
        add_species(
            &mut phase,
            phase_node.get("species"),
            &root,
            &DocumentLoader::default(),
        )?;
        Ok(phase)
    }

    fn names(phase: &Phase) -> Vec<&str> {
        phase.species().iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn all_keeps_source_order() {
        let phase = resolve(ROOT, "species: all\n").unwrap();
        assert_eq!(names(&phase), ["H2", "H", "O2", "OH", "H2O"]);
    }

    #[test]
    fn missing_declaration_defaults_to_all_root_species() {
        assert_eq!(resolve(ROOT, "name: gas\n").unwrap().n_species(), 5);
        assert_eq!(resolve("phases: []\n", "name: gas\n").unwrap().n_species(), 0);
    }

    #[test]
    fn named_lists_select_in_declaration_order() {
        let phase = resolve(ROOT, "species: [H2O, H2]\n").unwrap();
        assert_eq!(names(&phase), ["H2O", "H2"]);
    }

    #[test]
    fn map_lists_mix_sections() {
        let phase = resolve(ROOT, "species:\n- species: [O2]\n- extra-species: all\n").unwrap();
        assert_eq!(names(&phase), ["O2", "N2"]);
    }

    #[test]
    fn missing_species_always_fail() {
        for declaration in [
            "species: [H2, Ar]\n",
            "species:\n- species: [Ar]\n",
            "species:\n- extra-species: [H2]\n",
        ] {
            let err = resolve(ROOT, declaration).unwrap_err();
            assert!(
                matches!(err, Error::ReferenceNotFound { kind: ReferenceKind::Species, .. }),
                "{declaration}: {err}"
            );
        }
    }

    #[test]
    fn all_requires_root_section() {
        let err = resolve("phases: []\n", "species: all\n").unwrap_err();
        assert!(matches!(
            err,
            Error::ReferenceNotFound { kind: ReferenceKind::Section, .. }
        ));
    }

    #[test]
    fn malformed_declarations_are_structural() {
        assert!(matches!(
            resolve(ROOT, "species: some\n").unwrap_err(),
            Error::Structural { .. }
        ));
        assert!(matches!(
            resolve(ROOT, "species: 3\n").unwrap_err(),
            Error::Structural { .. }
        ));
    }
}
