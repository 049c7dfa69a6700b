use log::debug;

use crate::error::{Error, Result};
use crate::model::phase::Phase;
use crate::model::species::Species;
use crate::registry::StandardStateRegistry;
use crate::thermo::StandardState;

/// Sub-model installed for species without an `equation-of-state` entry.
const DEFAULT_STANDARD_STATE: &str = "ideal-gas";

/// Installs one standard-state sub-model per species of a capable phase.
pub(super) fn attach_standard_states(
    phase: &mut Phase,
    registry: &StandardStateRegistry,
) -> Result<()> {
    for k in 0..phase.n_species() {
        let model = select(&phase.species()[k], registry)?;
        debug!(
            "phase '{}': species '{}' uses standard state '{}'",
            phase.name(),
            phase.species()[k].name,
            model.kind()
        );
        phase.install_standard_state(k, model)?;
    }
    Ok(())
}

/// Picks the first `equation-of-state` entry naming a registered sub-model.
fn select(species: &Species, registry: &StandardStateRegistry) -> Result<Box<dyn StandardState>> {
    let Some(eos) = species.input.get("equation-of-state") else {
        return registry.create(DEFAULT_STANDARD_STATE);
    };

    let mut tried = Vec::new();
    for entry in eos.as_map_list()? {
        let key = entry.require("model")?.as_str()?;
        if registry.exists(key) {
            let mut standard_state = registry.create(key)?;
            standard_state.set_parameters(entry)?;
            return Ok(standard_state);
        }
        tried.push(key);
    }

    Err(Error::structural(
        eos.location(),
        format!(
            "no registered standard-state model for species '{}' (tried: {})",
            species.name,
            tried.join(", ")
        ),
    ))
}
