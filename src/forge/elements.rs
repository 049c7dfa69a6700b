use log::debug;

use crate::error::{Error, Location, ReferenceKind, Result};
use crate::io::{DocumentLoader, Section};
use crate::model::element::{ENTROPY298_UNKNOWN, ElementDef};
use crate::model::node::{Map, Node};
use crate::model::phase::Phase;

const BUILTIN_SOURCE: &str = "built-in element table";

enum ElementSource<'a> {
    Builtin,
    Table { section: Section<'a>, name: String },
}

/// Adds the elements named by a phase's `elements` declaration.
///
/// A plain list of symbols reads the root `elements` section, falling back
/// to the built-in table for symbols it lacks (or entirely when the root has
/// no such section). A list of `{source: symbols}` maps reads each named
/// source with no fallback; `default` names the built-in table.
pub(super) fn add_elements(
    phase: &mut Phase,
    declaration: &Node,
    root: &Map,
    loader: &DocumentLoader,
) -> Result<()> {
    let location = declaration.location();

    if declaration.is_string_list() {
        let symbols = declaration.as_string_list()?;
        let source = if root.has_key("elements") {
            ElementSource::Table {
                section: loader.section(root, "elements", location)?,
                name: "elements".to_string(),
            }
        } else {
            ElementSource::Builtin
        };
        return add_from_source(phase, &source, &symbols, true, location);
    }

    if declaration.is_map_list() {
        for item in declaration.as_map_list()? {
            let (reference, symbols) = item.single_entry()?;
            let symbols = symbols.as_string_list()?;
            let source = if reference.contains('/') || root.has_key(reference) {
                ElementSource::Table {
                    section: loader.section(root, reference, item.location())?,
                    name: reference.to_string(),
                }
            } else if reference == "default" {
                ElementSource::Builtin
            } else {
                return Err(Error::not_found(
                    ReferenceKind::Section,
                    reference,
                    "the root document",
                    item.location(),
                ));
            };
            add_from_source(phase, &source, &symbols, false, item.location())?;
        }
        return Ok(());
    }

    Err(Error::structural(
        location,
        format!(
            "Could not parse elements declaration of type '{}'",
            declaration.type_name()
        ),
    ))
}

fn add_from_source(
    phase: &mut Phase,
    source: &ElementSource<'_>,
    symbols: &[&str],
    allow_default: bool,
    location: &Location,
) -> Result<()> {
    match source {
        ElementSource::Builtin => {
            debug!("phase '{}': {} elements from {}", phase.name(), symbols.len(), BUILTIN_SOURCE);
            for symbol in symbols {
                phase.add_element(builtin(symbol, location)?)?;
            }
        }
        ElementSource::Table { section, name } => {
            debug!("phase '{}': {} elements from '{}'", phase.name(), symbols.len(), name);
            let table = section.node().index_by("symbol")?;
            for symbol in symbols {
                let element = match table.get(symbol) {
                    Some(entry) => parse_element(entry)?,
                    None if allow_default => builtin(symbol, location)?,
                    None => {
                        return Err(Error::not_found(
                            ReferenceKind::Element,
                            *symbol,
                            name.as_str(),
                            location,
                        ));
                    }
                };
                phase.add_element(element)?;
            }
        }
    }
    Ok(())
}

fn builtin(symbol: &str, location: &Location) -> Result<ElementDef> {
    ElementDef::builtin(symbol)
        .ok_or_else(|| Error::not_found(ReferenceKind::Element, symbol, BUILTIN_SOURCE, location))
}

fn parse_element(entry: &Map) -> Result<ElementDef> {
    let symbol = entry.require("symbol")?.as_str()?;

    let weight = entry.require("atomic-weight")?;
    let atomic_weight = weight.as_f64()?;
    if atomic_weight < 0.0 {
        return Err(Error::structural(
            weight.location(),
            format!("negative atomic weight for element '{}'", symbol),
        ));
    }

    let atomic_number = entry.get_i64_or("atomic-number", 0)?;
    let atomic_number = u32::try_from(atomic_number).map_err(|_| {
        Error::structural(
            entry.location(),
            format!("invalid atomic number {} for element '{}'", atomic_number, symbol),
        )
    })?;

    let entropy298 = entry.get_f64_or("entropy298", ENTROPY298_UNKNOWN)?;

    Ok(ElementDef::new(symbol, atomic_weight, atomic_number).with_entropy298(entropy298))
}
