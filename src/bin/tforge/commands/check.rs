use anyhow::{Context, Result, bail};

use thermo_forge::{CollectingSink, Map, PhaseForge};

use crate::cli::CheckArgs;
use crate::config::build_forge_config;
use crate::display::{Context as DisplayContext, Progress, print_check_results, print_notices};

/// Phase name, model key and build outcome for one phase definition.
type CheckRow = (String, String, Result<(), String>);

pub fn run_check(args: CheckArgs, ctx: DisplayContext) -> Result<()> {
    let config = build_forge_config(&args.common)?;
    let sink = CollectingSink::new();
    let forge = PhaseForge::new().with_config(config).with_sink(&sink);

    let root = forge
        .loader()
        .load_file(&args.file)
        .with_context(|| format!("Failed to load '{}'", args.file.display()))?;
    let phases = root
        .require("phases")
        .and_then(|node| node.as_map_list())
        .with_context(|| format!("'{}' has no usable phase list", args.file.display()))?;

    let mut progress = Progress::new(ctx.interactive, phases.len());
    let results = check_phases(&forge, &phases, &root, &mut progress);
    progress.finish();

    print_check_results(&results);
    print_notices(&sink.drain());

    let failed = results.iter().filter(|(_, _, r)| r.is_err()).count();
    if failed > 0 {
        bail!(
            "{} of {} phases in '{}' failed to build",
            failed,
            results.len(),
            args.file.display()
        );
    }
    Ok(())
}

/// Builds every phase; a failing phase becomes a failed row.
fn check_phases(
    forge: &PhaseForge<'_>,
    phases: &[&Map],
    root: &Map,
    progress: &mut Progress,
) -> Vec<CheckRow> {
    phases
        .iter()
        .map(|node| {
            let name = label(node, "name", "<unnamed>");
            let model = label(node, "thermo", "-");
            let description = format!("Phase '{}'", name);

            progress.step(&description);
            let outcome = forge.build(node, root).map(|phase| {
                format!(
                    "{} elements, {} species",
                    phase.elements().len(),
                    phase.n_species()
                )
            });
            match &outcome {
                Ok(summary) => progress.complete_step(&description, &[summary.as_str()]),
                Err(e) => progress.fail_step(&description, &e.to_string()),
            }
            (name, model, outcome.map(|_| ()).map_err(|e| e.to_string()))
        })
        .collect()
}

/// Display text for a string field; malformed values surface in the build error.
fn label(node: &Map, key: &str, fallback: &str) -> String {
    node.get(key)
        .and_then(|value| value.as_str().ok())
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_phases_become_failed_rows() {
        let root = Map::from_yaml_str(
            "
phases:
- {name: 42, thermo: ideal-gas}
- {name: gas, thermo: ideal-gas, elements: [H], species: [H2]}
- {name: broken, thermo: no-such-model}
species:
- {name: H2, composition: {H: 2}}
",
            None,
        )
        .unwrap();
        let phases = root.require("phases").unwrap().as_map_list().unwrap();
        let forge = PhaseForge::new();

        let rows = check_phases(&forge, &phases, &root, &mut Progress::new(false, phases.len()));

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].0, "<unnamed>");
        assert!(rows[0].2.as_ref().unwrap_err().contains("string"));
        assert_eq!(rows[1], ("gas".to_string(), "ideal-gas".to_string(), Ok(())));
        assert_eq!(rows[2].1, "no-such-model");
        assert!(rows[2].2.is_err());
    }
}
