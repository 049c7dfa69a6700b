//! Name-to-constructor registries for thermodynamic and standard-state models.
//!
//! A [`Factory`] maps canonical keys and aliases to constructors. Two
//! process-wide instances exist, [`ModelRegistry::global`] and
//! [`StandardStateRegistry::global`], pre-populated with every built-in
//! model. Callers that need isolation can build their own with
//! [`Factory::empty`] or [`ModelRegistry::with_builtins`] and hand it to
//! [`PhaseForge`](crate::PhaseForge).

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::error::{Error, RegistryKind, Result};
use crate::model::phase::Phase;
use crate::thermo::*;

type Constructor<T> = Arc<dyn Fn() -> Box<T> + Send + Sync>;

struct Table<T: ?Sized> {
    constructors: BTreeMap<String, Constructor<T>>,
    aliases: HashMap<String, String>,
}

/// Thread-safe map from model names to constructors.
pub struct Factory<T: ?Sized> {
    kind: RegistryKind,
    table: RwLock<Table<T>>,
}

/// Registry of [`ThermoModel`] constructors keyed by the phase `thermo` field.
pub type ModelRegistry = Factory<dyn ThermoModel>;

/// Registry of [`StandardState`] constructors keyed by `equation-of-state` model.
pub type StandardStateRegistry = Factory<dyn StandardState>;

impl<T: ?Sized> Factory<T> {
    pub fn empty(kind: RegistryKind) -> Self {
        Self {
            kind,
            table: RwLock::new(Table {
                constructors: BTreeMap::new(),
                aliases: HashMap::new(),
            }),
        }
    }

    pub fn kind(&self) -> RegistryKind {
        self.kind
    }

    /// Registers a constructor under a new canonical key.
    pub fn register<F>(&self, key: &str, constructor: F) -> Result<()>
    where
        F: Fn() -> Box<T> + Send + Sync + 'static,
    {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        if table.constructors.contains_key(key) || table.aliases.contains_key(key) {
            return Err(Error::registration(key, "name is already registered"));
        }
        table.constructors.insert(key.to_string(), Arc::new(constructor));
        Ok(())
    }

    /// Makes `alias` resolve to the canonical key `key`.
    pub fn add_alias(&self, key: &str, alias: &str) -> Result<()> {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        if !table.constructors.contains_key(key) {
            return Err(self.not_found(key));
        }
        if table.constructors.contains_key(alias) {
            return Err(Error::registration(alias, "name is already a canonical key"));
        }
        if let Some(existing) = table.aliases.get(alias) {
            if existing != key {
                return Err(Error::registration(
                    alias,
                    format!("alias already refers to '{}'", existing),
                ));
            }
        }
        table.aliases.insert(alias.to_string(), key.to_string());
        Ok(())
    }

    /// Resolves a key or alias to its canonical key.
    pub fn canonical_name(&self, name: &str) -> Result<String> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        Self::resolve(&table, name)
            .map(str::to_string)
            .ok_or_else(|| self.not_found(name))
    }

    pub fn exists(&self, name: &str) -> bool {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        Self::resolve(&table, name).is_some()
    }

    /// Constructs a fresh instance for a key or alias.
    pub fn create(&self, name: &str) -> Result<Box<T>> {
        let constructor = {
            let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
            Self::resolve(&table, name)
                .and_then(|key| table.constructors.get(key))
                .cloned()
                .ok_or_else(|| self.not_found(name))?
        };
        Ok(constructor())
    }

    /// Canonical keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table.constructors.keys().cloned().collect()
    }

    /// Aliases of a canonical key, sorted.
    pub fn aliases_of(&self, key: &str) -> Vec<String> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        let mut aliases: Vec<String> = table
            .aliases
            .iter()
            .filter(|(_, target)| target.as_str() == key)
            .map(|(alias, _)| alias.clone())
            .collect();
        aliases.sort();
        aliases
    }

    fn resolve<'t>(table: &'t Table<T>, name: &'t str) -> Option<&'t str> {
        if table.constructors.contains_key(name) {
            return Some(name);
        }
        table.aliases.get(name).map(String::as_str)
    }

    fn not_found(&self, name: &str) -> Error {
        Error::ModelNotFound {
            registry: self.kind,
            key: name.to_string(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Factory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("kind", &self.kind)
            .field("keys", &self.keys())
            .finish()
    }
}

fn thermo<M: ThermoModel + Default + 'static>() -> Box<dyn ThermoModel> {
    Box::new(M::default())
}

fn standard<S: StandardState + Default + 'static>() -> Box<dyn StandardState> {
    Box::new(S::default())
}

const THERMO_ALIASES: &[(&str, &[&str])] = &[
    ("none", &["ThermoPhase", "None"]),
    ("ideal-gas", &["IdealGas"]),
    ("ideal-surface", &["Surface", "Surf"]),
    ("edge", &["Edge"]),
    ("electron-cloud", &["Metal"]),
    ("fixed-stoichiometry", &["StoichSubstance"]),
    ("pure-fluid", &["PureFluid"]),
    ("compound-lattice", &["LatticeSolid"]),
    ("lattice", &["Lattice"]),
    ("HMW-electrolyte", &["HMW", "HMWSoln"]),
    ("ideal-condensed", &["IdealSolidSolution", "IdealSolidSoln"]),
    ("Debye-Huckel", &["DebyeHuckel"]),
    ("ideal-molal-solution", &["IdealMolalSolution", "IdealMolalSoln"]),
    ("ideal-solution-VPSS", &["IdealSolnVPSS", "IdealSolnGas"]),
    ("ideal-gas-VPSS", &["IdealGasVPSS"]),
    ("ions-from-neutral-molecule", &["IonsFromNeutralMolecule", "IonsFromNeutral"]),
    ("Redlich-Kister", &["RedlichKister"]),
    ("Redlich-Kwong", &["RedlichKwongMFTP", "RedlichKwong"]),
    ("Maskell-solid-solution", &["MaskellSolidSolnPhase", "MaskellSolidsoln"]),
    ("liquid-water-IAPWS95", &["PureLiquidWater", "Water"]),
    ("binary-solution-tabulated", &["BinarySolutionTabulatedThermo"]),
];

const STANDARD_STATE_ALIASES: &[(&str, &[&str])] = &[
    ("constant-incompressible", &["constant_incompressible"]),
    ("water", &["waterIAPWS", "waterPDSS"]),
    ("ions-from-neutral", &["IonFromNeutral"]),
];

fn add_aliases<T: ?Sized>(factory: &Factory<T>, aliases: &[(&str, &[&str])]) -> Result<()> {
    for (key, names) in aliases {
        for alias in *names {
            factory.add_alias(key, alias)?;
        }
    }
    Ok(())
}

impl ModelRegistry {
    /// A fresh registry holding every built-in thermodynamic model.
    pub fn with_builtins() -> Result<Self> {
        let registry = Self::empty(RegistryKind::Thermo);
        registry.register("none", thermo::<NoThermo>)?;
        registry.register("ideal-gas", thermo::<IdealGas>)?;
        registry.register("plasma", thermo::<Plasma>)?;
        registry.register("ideal-surface", || Box::new(Surface::surface()))?;
        registry.register("edge", || Box::new(Surface::edge()))?;
        registry.register("electron-cloud", thermo::<ElectronCloud>)?;
        registry.register("fixed-stoichiometry", thermo::<FixedStoichiometry>)?;
        registry.register("pure-fluid", thermo::<PureFluid>)?;
        registry.register("compound-lattice", thermo::<CompoundLattice>)?;
        registry.register("lattice", thermo::<Lattice>)?;
        registry.register("HMW-electrolyte", thermo::<HmwElectrolyte>)?;
        registry.register("ideal-condensed", thermo::<IdealCondensed>)?;
        registry.register("Debye-Huckel", thermo::<DebyeHuckel>)?;
        registry.register("ideal-molal-solution", thermo::<IdealMolalSolution>)?;
        registry.register("ideal-solution-VPSS", || Box::new(IdealSolutionVpss::solution()))?;
        registry.register("ideal-gas-VPSS", || Box::new(IdealSolutionVpss::gas()))?;
        registry.register("Margules", thermo::<Margules>)?;
        registry.register("ions-from-neutral-molecule", thermo::<IonsFromNeutral>)?;
        registry.register("Redlich-Kister", thermo::<RedlichKister>)?;
        registry.register("Redlich-Kwong", || Box::new(CubicEos::redlich_kwong()))?;
        registry.register("Maskell-solid-solution", thermo::<MaskellSolidSolution>)?;
        registry.register("liquid-water-IAPWS95", thermo::<LiquidWater>)?;
        registry.register("binary-solution-tabulated", thermo::<BinarySolutionTabulated>)?;
        registry.register("Peng-Robinson", || Box::new(CubicEos::peng_robinson()))?;
        add_aliases(&registry, THERMO_ALIASES)?;
        Ok(registry)
    }

    /// The process-wide registry, built on first use.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<ModelRegistry> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            Self::with_builtins()
                .expect("built-in thermo models must register cleanly. This is a library bug.")
        })
    }

    /// Constructs an empty, uninitialized phase for a model key or alias.
    pub fn create_phase(&self, name: &str) -> Result<Phase> {
        Ok(Phase::new(self.create(name)?))
    }
}

impl StandardStateRegistry {
    /// A fresh registry holding every built-in standard-state sub-model.
    pub fn with_builtins() -> Result<Self> {
        let registry = Self::empty(RegistryKind::StandardState);
        registry.register("ideal-gas", standard::<IdealGasStandardState>)?;
        registry.register("constant-incompressible", standard::<ConstantVolume>)?;
        registry.register("water", standard::<WaterStandardState>)?;
        registry.register("ions-from-neutral", standard::<IonsFromNeutralStandardState>)?;
        registry.register("density-temperature-polynomial", || {
            Box::new(TemperaturePolynomial::density())
        })?;
        registry.register("molar-volume-temperature-polynomial", || {
            Box::new(TemperaturePolynomial::molar_volume())
        })?;
        registry.register("HKFT", standard::<Hkft>)?;
        add_aliases(&registry, STANDARD_STATE_ALIASES)?;
        Ok(registry)
    }

    /// The process-wide registry, built on first use.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<StandardStateRegistry> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            Self::with_builtins()
                .expect("built-in standard-state models must register cleanly. This is a library bug.")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn aliases_construct_the_same_model() {
        let registry = ModelRegistry::global();
        for (key, aliases) in THERMO_ALIASES {
            let canonical = registry.create(key).unwrap();
            for alias in *aliases {
                assert_eq!(registry.create(alias).unwrap().kind(), canonical.kind());
                assert_eq!(registry.canonical_name(alias).unwrap(), *key);
            }
        }
        assert_eq!(registry.create("IdealGas").unwrap().kind(), "ideal-gas");
    }

    #[test]
    fn every_builtin_reports_its_own_key() {
        let registry = ModelRegistry::global();
        let keys = registry.keys();
        assert_eq!(keys.len(), 24);
        for key in keys {
            assert_eq!(registry.create(&key).unwrap().kind(), key);
        }

        let states = StandardStateRegistry::global();
        for key in states.keys() {
            assert_eq!(states.create(&key).unwrap().kind(), key);
        }
    }

    #[test]
    fn unknown_key_is_model_not_found() {
        let err = ModelRegistry::global().create("no-such-model").unwrap_err();
        assert!(matches!(
            err,
            Error::ModelNotFound { registry: RegistryKind::Thermo, ref key } if key == "no-such-model"
        ));
        assert!(!StandardStateRegistry::global().exists("no-such-model"));
    }

    #[test]
    fn registration_conflicts_are_rejected() {
        let registry = ModelRegistry::empty(RegistryKind::Thermo);
        registry.register("ideal-gas", thermo::<IdealGas>).unwrap();
        assert!(registry.register("ideal-gas", thermo::<NoThermo>).is_err());
        assert!(matches!(
            registry.add_alias("missing", "M"),
            Err(Error::ModelNotFound { .. })
        ));

        registry.register("none", thermo::<NoThermo>).unwrap();
        registry.add_alias("ideal-gas", "IG").unwrap();
        registry.add_alias("ideal-gas", "IG").unwrap();
        assert!(registry.add_alias("none", "IG").is_err());
        assert!(registry.add_alias("none", "ideal-gas").is_err());
        assert!(registry.register("IG", thermo::<NoThermo>).is_err());
        assert_eq!(registry.aliases_of("ideal-gas"), vec!["IG".to_string()]);
    }

    #[test]
    fn custom_registry_is_isolated_from_global() {
        let registry = ModelRegistry::with_builtins().unwrap();
        registry.register("my-gas", thermo::<IdealGas>).unwrap();
        assert!(registry.exists("my-gas"));
        assert!(!ModelRegistry::global().exists("my-gas"));
    }

    #[test]
    fn concurrent_creation_is_safe() {
        let registry = ModelRegistry::global();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                thread::spawn(move || {
                    let name = if i % 2 == 0 { "IdealGas" } else { "Margules" };
                    (0..50)
                        .map(|_| registry.create(name).map(|m| m.kind()))
                        .collect::<Result<Vec<_>>>()
                })
            })
            .collect();
        for handle in handles {
            let kinds = handle.join().unwrap().unwrap();
            assert!(kinds.iter().all(|k| *k == kinds[0]));
        }
    }

    #[test]
    fn created_phases_are_uninitialized() {
        let phase = ModelRegistry::global().create_phase("Surface").unwrap();
        assert_eq!(phase.model_kind(), "ideal-surface");
        assert!(!phase.is_initialized());
        assert_eq!(phase.n_species(), 0);
    }
}
