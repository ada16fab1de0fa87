//! Known unit symbols and their conversion factors.
//!
//! Factors convert a value in the registered unit into the base unit of its dimension:
//! kilograms of carbon for carbon mass, kilograms, metres, years, kelvin (as a
//! temperature difference) and US dollars.
//! Time is based on years because every rate in the model is expressed per year.

use super::dimension::Dimension;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Dimension and base-unit factor of a unit symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitInfo {
    pub dimension: Dimension,
    pub factor: f64,
}

/// Decimal prefixes, longest symbol first so that `da` wins over `d`.
pub static PREFIXES: &[(&str, f64)] = &[
    ("da", 1e1),
    ("E", 1e18),
    ("P", 1e15),
    ("T", 1e12),
    ("G", 1e9),
    ("M", 1e6),
    ("k", 1e3),
    ("h", 1e2),
    ("d", 1e-1),
    ("c", 1e-2),
    ("m", 1e-3),
    ("u", 1e-6),
    ("n", 1e-9),
];

/// Mass of carbon in a unit mass of CO2.
pub const C_PER_CO2: f64 = 12.0 / 44.0;

pub static UNIT_REGISTRY: LazyLock<UnitRegistry> = LazyLock::new(UnitRegistry::new);

/// Registry of unit symbols.
#[derive(Debug)]
pub struct UnitRegistry {
    units: HashMap<&'static str, UnitInfo>,
    /// Symbols that accept a decimal prefix.
    prefixable: Vec<&'static str>,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            units: HashMap::new(),
            prefixable: Vec::new(),
        };

        // Carbon, as carbon or as CO2
        registry.add("tC", Dimension::CARBON, 1e3, true);
        registry.add("tCO2", Dimension::CARBON, 1e3 * C_PER_CO2, true);

        registry.add("g", Dimension::MASS, 1e-3, true);
        registry.add("t", Dimension::MASS, 1e3, true);

        registry.add("m", Dimension::LENGTH, 1.0, true);

        for symbol in ["yr", "year", "years"] {
            registry.add(symbol, Dimension::TIME, 1.0, false);
        }
        registry.add("day", Dimension::TIME, 1.0 / 365.25, false);

        for symbol in ["K", "degC", "delta_degC"] {
            registry.add(symbol, Dimension::TEMPERATURE, 1.0, false);
        }

        registry.add("J", Dimension::ENERGY, 1.0, true);
        registry.add("W", Dimension::POWER, 365.25 * 24.0 * 3600.0, true);

        for symbol in ["USD", "$"] {
            registry.add(symbol, Dimension::CURRENCY, 1.0, false);
        }
        registry.add("trillion_USD", Dimension::CURRENCY, 1e12, false);

        registry.add("%", Dimension::DIMENSIONLESS, 0.01, false);

        registry
    }

    fn add(&mut self, symbol: &'static str, dimension: Dimension, factor: f64, prefixable: bool) {
        self.units.insert(symbol, UnitInfo { dimension, factor });
        if prefixable {
            self.prefixable.push(symbol);
        }
    }

    /// Look up a symbol, allowing a decimal prefix on prefixable units.
    ///
    /// An exact match always wins, so `m` is a metre rather than a milli-something.
    pub fn lookup(&self, symbol: &str) -> Option<UnitInfo> {
        if let Some(info) = self.units.get(symbol) {
            return Some(*info);
        }
        PREFIXES.iter().find_map(|(prefix, scale)| {
            let base = symbol.strip_prefix(prefix)?;
            if !self.prefixable.contains(&base) {
                return None;
            }
            self.units.get(base).map(|info| UnitInfo {
                dimension: info.dimension,
                factor: info.factor * scale,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn prefixed_carbon() {
        let gtco2 = UNIT_REGISTRY.lookup("GtCO2").unwrap();
        let gtc = UNIT_REGISTRY.lookup("GtC").unwrap();
        assert_eq!(gtco2.dimension, Dimension::CARBON);
        assert_relative_eq!(gtco2.factor / gtc.factor, 12.0 / 44.0);
        assert_relative_eq!(gtc.factor, 1e12);
    }

    #[test]
    fn exact_match_wins() {
        assert_eq!(UNIT_REGISTRY.lookup("m").unwrap().dimension, Dimension::LENGTH);
        assert_relative_eq!(UNIT_REGISTRY.lookup("mm").unwrap().factor, 1e-3);
        assert_relative_eq!(UNIT_REGISTRY.lookup("EJ").unwrap().factor, 1e18);
    }

    #[test]
    fn unknown_symbols() {
        assert!(UNIT_REGISTRY.lookup("furlong").is_none());
        // Prefixes only apply to prefixable units
        assert!(UNIT_REGISTRY.lookup("kyr").is_none());
    }
}
