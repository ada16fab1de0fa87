//! Building blocks for configuration documents.
//!
//! - [`Toggle`]: an option that is either switched off with `false` or set to a value
//! - [`RegionalValue`]: one value for every region, or a table keyed by region label

use crate::errors::{MimosaError, MimosaResult};
use crate::grid::RegionSet;
use crate::registry::ParameterValue;
use crate::units::Quantity;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// An optional feature, written as `false` to switch it off or as its value.
///
/// `false` is never read as a numeric zero.
///
/// ```
/// use mimosa_core::config::Toggle;
///
/// let off: Toggle<f64> = serde_json::from_str("false").unwrap();
/// let on: Toggle<f64> = serde_json::from_str("0.05").unwrap();
/// assert_eq!(off, Toggle::Disabled);
/// assert_eq!(on, Toggle::Enabled(0.05));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Toggle<T> {
    #[default]
    Disabled,
    Enabled(T),
}

impl<T> Toggle<T> {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Toggle::Enabled(_))
    }
}

impl Toggle<f64> {
    pub fn to_parameter(&self) -> ParameterValue {
        match self {
            Toggle::Disabled => ParameterValue::Disabled,
            Toggle::Enabled(v) => ParameterValue::Scalar(*v),
        }
    }
}

impl Toggle<Quantity> {
    /// Convert an enabled quantity into `unit`.
    pub fn to_parameter_in(&self, unit: &str, option: &str) -> MimosaResult<ParameterValue> {
        match self {
            Toggle::Disabled => Ok(ParameterValue::Disabled),
            Toggle::Enabled(q) => q
                .value_in_str(unit)
                .map(ParameterValue::Scalar)
                .map_err(|e| e.in_context(option)),
        }
    }
}

impl<T: Serialize> Serialize for Toggle<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Toggle::Disabled => serializer.serialize_bool(false),
            Toggle::Enabled(v) => v.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Toggle<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw<T> {
            Flag(bool),
            Value(T),
        }
        match Raw::<T>::deserialize(deserializer)? {
            Raw::Flag(false) => Ok(Toggle::Disabled),
            Raw::Flag(true) => Err(de::Error::custom(
                "`true` is not a value, use `false` to switch the option off or give its value",
            )),
            Raw::Value(v) => Ok(Toggle::Enabled(v)),
        }
    }
}

/// A value for every region, written either as a single value or as a table keyed by
/// region label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegionalValue<T> {
    Uniform(T),
    PerRegion(BTreeMap<String, T>),
}

impl<T: Clone> RegionalValue<T> {
    /// Values in region order. A table must name every region exactly once.
    pub fn resolve(&self, regions: &RegionSet, option: &str) -> MimosaResult<Vec<T>> {
        match self {
            RegionalValue::Uniform(v) => Ok(vec![v.clone(); regions.len()]),
            RegionalValue::PerRegion(table) => {
                if let Some(unknown) = table.keys().find(|k| regions.index_of(k).is_none()) {
                    return Err(MimosaError::invalid_option(
                        option,
                        format!("unknown region `{unknown}`"),
                    ));
                }
                regions
                    .labels()
                    .iter()
                    .map(|label| {
                        table.get(label).cloned().ok_or_else(|| {
                            MimosaError::invalid_option(
                                option,
                                format!("no value given for region `{label}`"),
                            )
                        })
                    })
                    .collect()
            }
        }
    }
}

impl<T: Default> Default for RegionalValue<T> {
    fn default() -> Self {
        RegionalValue::Uniform(T::default())
    }
}
