use anyhow::Result;

use thermo_forge::{Factory, ModelRegistry, StandardStateRegistry};

use crate::cli::ModelsArgs;
use crate::display::print_models;

pub fn run_models(args: ModelsArgs) -> Result<()> {
    if args.standard_states {
        print_models(
            "Standard-State Models",
            &registered(StandardStateRegistry::global()),
        );
    } else {
        print_models("Phase Models", &registered(ModelRegistry::global()));
    }
    Ok(())
}

fn registered<T: ?Sized>(registry: &Factory<T>) -> Vec<(String, Vec<String>)> {
    registry
        .keys()
        .into_iter()
        .map(|key| {
            let aliases = registry.aliases_of(&key);
            (key, aliases)
        })
        .collect()
}
