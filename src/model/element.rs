use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;

const BUILTIN_ELEMENTS_TOML: &str = include_str!("../../resources/elements.toml");

static BUILTIN_ELEMENTS: OnceLock<HashMap<String, BuiltinElement>> = OnceLock::new();

/// Sentinel standard entropy for elements whose value was not declared.
pub const ENTROPY298_UNKNOWN: f64 = -123_456_789.0;

/// An element as registered on a phase.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDef {
    pub symbol: String,
    /// Atomic weight in kg/kmol.
    pub atomic_weight: f64,
    pub atomic_number: u32,
    /// Standard entropy at 298.15 K, or [`ENTROPY298_UNKNOWN`].
    pub entropy298: f64,
}

impl ElementDef {
    pub fn new(symbol: impl Into<String>, atomic_weight: f64, atomic_number: u32) -> Self {
        Self {
            symbol: symbol.into(),
            atomic_weight,
            atomic_number,
            entropy298: ENTROPY298_UNKNOWN,
        }
    }

    pub fn with_entropy298(mut self, entropy298: f64) -> Self {
        self.entropy298 = entropy298;
        self
    }

    /// Definition from the built-in element table, if the symbol is known.
    pub fn builtin(symbol: &str) -> Option<Self> {
        builtin_table()
            .get(symbol)
            .map(|e| Self::new(symbol, e.atomic_weight, e.atomic_number))
    }

    pub fn has_known_entropy(&self) -> bool {
        self.entropy298 != ENTROPY298_UNKNOWN
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuiltinElement {
    pub symbol: String,
    pub name: String,
    pub atomic_weight: f64,
    pub atomic_number: u32,
}

#[derive(Deserialize)]
struct ElementTable {
    element: Vec<BuiltinElement>,
}

/// Full name of a built-in element, e.g. `"hydrogen"` for `"H"`.
pub fn builtin_name(symbol: &str) -> Option<&'static str> {
    builtin_table().get(symbol).map(|e| e.name.as_str())
}

fn builtin_table() -> &'static HashMap<String, BuiltinElement> {
    BUILTIN_ELEMENTS.get_or_init(|| {
        let table: ElementTable = toml::from_str(BUILTIN_ELEMENTS_TOML)
            .expect("Failed to parse embedded element table. This is a library bug.");
        table
            .element
            .into_iter()
            .map(|e| (e.symbol.clone(), e))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn builtin_table_covers_periodic_table_and_isotopes() {
        assert_eq!(builtin_table().len(), 121);
        let og = ElementDef::builtin("Og").unwrap();
        assert_eq!(og.atomic_number, 118);
        let d = ElementDef::builtin("D").unwrap();
        assert_eq!(d.atomic_number, 1);
        assert!(d.atomic_weight > 2.0);
    }

    #[test]
    fn builtin_weights() {
        assert!(approx_eq(ElementDef::builtin("H").unwrap().atomic_weight, 1.008, 1e-9));
        assert!(approx_eq(ElementDef::builtin("Fe").unwrap().atomic_weight, 55.845, 1e-9));
        assert!(ElementDef::builtin("E").unwrap().atomic_weight < 1e-3);
    }

    #[test]
    fn unknown_symbols_have_no_default() {
        assert!(ElementDef::builtin("Xx").is_none());
        assert!(ElementDef::builtin("h").is_none());
    }

    #[test]
    fn builtin_entropy_is_unknown() {
        let o = ElementDef::builtin("O").unwrap();
        assert!(!o.has_known_entropy());
        assert!(o.with_entropy298(1.0).has_known_entropy());
        assert_eq!(builtin_name("O"), Some("oxygen"));
    }
}
