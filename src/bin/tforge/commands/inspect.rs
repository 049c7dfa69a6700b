use anyhow::{Context, Result};

use thermo_forge::{CollectingSink, PhaseForge};

use crate::cli::InspectArgs;
use crate::config::build_forge_config;
use crate::display::{
    Context as DisplayContext, Progress, print_elements, print_notices, print_phase_summary,
    print_species,
};

const TOTAL_STEPS: usize = 1;

pub fn run_inspect(args: InspectArgs, ctx: DisplayContext) -> Result<()> {
    let config = build_forge_config(&args.common)?;
    let sink = CollectingSink::new();
    let forge = PhaseForge::new().with_config(config).with_sink(&sink);

    let label = match args.phase.as_str() {
        "" | "-" => "first phase".to_string(),
        name => format!("phase '{}'", name),
    };

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);
    progress.step(&format!("Building {}", label));
    let phase = forge
        .build_from_file(&args.file, &args.phase)
        .with_context(|| format!("Failed to build {} of '{}'", label, args.file.display()))?;

    let substeps = [
        format!("Model '{}'", phase.model_kind()),
        format!("{} elements", phase.elements().len()),
        format!("{} species", phase.n_species()),
        format!("{} document(s) parsed", forge.loader().cached_documents()),
    ];
    let substeps_ref: Vec<&str> = substeps.iter().map(String::as_str).collect();
    progress.complete_step(&format!("Building {}", label), &substeps_ref);
    progress.finish();

    print_phase_summary(&phase, &args.file);
    print_elements(&phase);
    print_species(&phase);
    print_notices(&sink.drain());

    Ok(())
}
