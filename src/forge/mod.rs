//! Phase assembly from declarative phase definitions.
//!
//! [`PhaseForge`] drives the whole construction of a [`Phase`]: it creates
//! the model from the registry, resolves elements and species from local,
//! root and cross-file sources, attaches standard-state sub-models where the
//! model supports them, applies model parameters, initializes the model and
//! sets the initial state. Any failure aborts the build; a partially
//! assembled phase is never returned.

mod config;
mod diagnostics;
mod elements;
mod species;
mod standard_state;

pub use config::{DeprecationPolicy, ForgeConfig};
pub use diagnostics::{CollectingSink, DiagnosticSink, LogSink, Notice};

use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::io::{DocumentLoader, Format};
use crate::model::node::Map;
use crate::model::phase::{Phase, UndefinedElements};
use crate::model::state::{DEFAULT_TEMPERATURE, ONE_ATM};
use crate::registry::{ModelRegistry, StandardStateRegistry};

static LOG_SINK: LogSink = LogSink;

/// Builds phases from phase definitions.
///
/// Registries and the diagnostic sink are borrowed, so one forge can be
/// shared by reference across threads. Parsed input files are cached for
/// the lifetime of the forge.
///
/// # Examples
///
/// ```
/// use thermo_forge::{Map, PhaseForge};
///
/// let root = Map::from_yaml_str(
///     r#"
///     phases:
///     - name: gas
///       thermo: ideal-gas
///       elements: [O, H]
///       species: [H2, O2]
///       state: {T: 500.0, P: 1 atm}
///     species:
///     - {name: H2, composition: {H: 2}}
///     - {name: O2, composition: {O: 2}}
///     "#,
///     None,
/// )?;
///
/// let forge = PhaseForge::new();
/// let node = root.require("phases")?.find_where("name", "gas")?;
/// let gas = forge.build(node, &root)?;
/// assert_eq!(gas.n_species(), 2);
/// assert_eq!(gas.temperature(), 500.0);
/// # Ok::<(), thermo_forge::Error>(())
/// ```
pub struct PhaseForge<'a> {
    models: &'a ModelRegistry,
    standard_states: &'a StandardStateRegistry,
    sink: &'a dyn DiagnosticSink,
    config: ForgeConfig,
    loader: DocumentLoader,
}

impl PhaseForge<'static> {
    /// A forge using the global registries and the logging sink.
    pub fn new() -> Self {
        Self {
            models: ModelRegistry::global(),
            standard_states: StandardStateRegistry::global(),
            sink: &LOG_SINK,
            config: ForgeConfig::default(),
            loader: DocumentLoader::default(),
        }
    }
}

impl Default for PhaseForge<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> PhaseForge<'a> {
    pub fn with_models(self, models: &'a ModelRegistry) -> Self {
        Self { models, ..self }
    }

    pub fn with_standard_states(self, standard_states: &'a StandardStateRegistry) -> Self {
        Self {
            standard_states,
            ..self
        }
    }

    pub fn with_sink(self, sink: &'a dyn DiagnosticSink) -> Self {
        Self { sink, ..self }
    }

    /// Replaces the configuration. The file cache is reset.
    pub fn with_config(self, config: ForgeConfig) -> Self {
        Self {
            loader: DocumentLoader::new(&config),
            config,
            ..self
        }
    }

    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    pub fn loader(&self) -> &DocumentLoader {
        &self.loader
    }

    /// Builds the phase described by `phase_node` within the document `root`.
    pub fn build(&self, phase_node: &Map, root: &Map) -> Result<Phase> {
        if phase_node.has_key("reactions") && !phase_node.has_key("kinetics") {
            return Err(Error::consistency(
                phase_node.location(),
                "phase defines 'reactions' but no 'kinetics' model",
            ));
        }

        let model = phase_node.require("thermo")?.as_str()?;
        let mut phase = self.models.create_phase(model)?;
        self.setup(&mut phase, phase_node, root)?;
        Ok(phase)
    }

    /// Loads `path` and builds the phase named `id`.
    ///
    /// An empty `id` or `"-"` selects the first phase in the file.
    pub fn build_from_file(&self, path: impl AsRef<Path>, id: &str) -> Result<Phase> {
        let path = path.as_ref();
        Format::ensure_supported(path)?;

        let id = if id == "-" { "" } else { id };
        let root = self.loader.load_file(path)?;
        let phase_node = root.require("phases")?.find_where("name", id)?;
        self.build(phase_node, &root)
    }

    /// Configures an empty phase from its definition.
    ///
    /// The phase must not have been initialized; `initialize` is called
    /// exactly once here.
    pub fn setup(&self, phase: &mut Phase, phase_node: &Map, root: &Map) -> Result<()> {
        phase.set_name(phase_node.require("name")?.as_str()?);

        if let Some(notice) = phase_node.get("deprecated") {
            self.report_deprecation(phase, phase_node, root, notice.as_str()?)?;
        }

        match phase_node.get("elements") {
            Some(declaration) => {
                let policy = if phase_node.get_bool_or("skip-undeclared-elements", false)? {
                    UndefinedElements::Ignore
                } else {
                    UndefinedElements::Throw
                };
                phase.set_undefined_elements(policy);
                elements::add_elements(phase, declaration, root, &self.loader)?;
            }
            None => phase.set_undefined_elements(UndefinedElements::AddMissing),
        }

        species::add_species(phase, phase_node.get("species"), root, &self.loader)?;

        if phase.supports_standard_states() {
            standard_state::attach_standard_states(phase, self.standard_states)?;
        }

        phase.set_parameters(phase_node, root)?;
        phase.initialize()?;

        match phase_node.get("state") {
            Some(state) => phase.set_state(state.as_map()?)?,
            None => phase.set_state_tp(DEFAULT_TEMPERATURE, ONE_ATM)?,
        }

        debug!(
            "built phase '{}' ({}) with {} elements and {} species",
            phase.name(),
            phase.model_kind(),
            phase.elements().len(),
            phase.n_species()
        );
        Ok(())
    }

    fn report_deprecation(
        &self,
        phase: &Phase,
        phase_node: &Map,
        root: &Map,
        message: &str,
    ) -> Result<()> {
        let file = phase_node
            .file()
            .or_else(|| root.file())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "unknown file".to_string());
        let origin = format!("{}/{}", file, phase.name());
        self.sink.deprecated(&origin, message);

        match self.config.deprecations {
            DeprecationPolicy::Warn => Ok(()),
            DeprecationPolicy::Error => Err(Error::Deprecated {
                origin,
                message: message.to_string(),
            }),
        }
    }
}

/// Builds a phase with the global registries and default configuration.
pub fn new_phase(phase_node: &Map, root: &Map) -> Result<Phase> {
    PhaseForge::new().build(phase_node, root)
}

/// Loads `path` and builds the phase named `id` with default settings.
pub fn new_phase_from_file(path: impl AsRef<Path>, id: &str) -> Result<Phase> {
    PhaseForge::new().build_from_file(path, id)
}
