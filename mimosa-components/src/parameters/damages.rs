//! Damage parameters
//!
//! The `[damages]` section holds the sea-level-rise parameters shared by every damage
//! variant and one sub-table per variant.

use mimosa_core::config::RegionalValue;
use mimosa_core::errors::MimosaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Options of every damage variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DamagesParameters {
    pub sea_level: SeaLevelParameters,
    pub ad_rice2012: AdRice2012Parameters,
    pub coacch: CoacchParameters,
}

/// Sea-level rise from thermal expansion, glaciers and small ice caps (GSIC) and the
/// Greenland ice sheet (GIS).
///
/// Each contribution follows a first-order difference equation in time. Rates are
/// given per decade for thermal expansion and per year for the ice contributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeaLevelParameters {
    /// Equilibrium thermal expansion per degree of warming.
    ///
    /// Default: 0.5 m/degC
    #[serde(rename = "S1")]
    pub s1: f64,

    /// Thermal expansion at the initial period offset.
    ///
    /// Default: 0.0 m
    #[serde(rename = "S2")]
    pub s2: f64,

    /// Adjustment rate of thermal expansion per decade.
    ///
    /// Default: 0.024
    #[serde(rename = "S3")]
    pub s3: f64,

    /// GSIC melt rate per degree above the equilibrium temperature.
    ///
    /// Default: 0.0008 per year per degC
    #[serde(rename = "M1")]
    pub m1: f64,

    /// Total GSIC ice volume.
    ///
    /// Default: 0.26 m
    #[serde(rename = "M2")]
    pub m2: f64,

    /// GSIC equilibrium temperature.
    ///
    /// Default: -1.0 degC
    #[serde(rename = "M3")]
    pub m3: f64,

    /// GIS melt rate above the threshold.
    ///
    /// Default: 1.118 mm/yr per degC
    #[serde(rename = "M4")]
    pub m4: f64,

    /// Initial GIS melt rate.
    ///
    /// Default: -0.0 mm/yr
    #[serde(rename = "M5")]
    pub m5: f64,

    /// Initial GIS ice volume.
    ///
    /// Default: 7.3 m
    #[serde(rename = "M6")]
    pub m6: f64,

    /// Cumulative GSIC contribution at the initial period.
    ///
    /// Default: 0.015 m
    pub gsic_initial: f64,

    /// Cumulative GIS contribution at the initial period.
    ///
    /// Default: 0.006 m
    pub gis_initial: f64,
}

impl Default for SeaLevelParameters {
    fn default() -> Self {
        Self {
            s1: 0.5,
            s2: 0.0,
            s3: 0.024,
            m1: 0.0008,
            m2: 0.26,
            m3: -1.0,
            m4: 1.118,
            m5: 0.0,
            m6: 7.3,
            gsic_initial: 0.015,
            gis_initial: 0.006,
        }
    }
}

/// RICE 2012 damages with adaptation.
///
/// Gross damages are `a1 * T + a2 * T^a3` relative to the initial temperature. They are
/// reduced by the adaptation level, an aggregate of flow adaptation (FAD) and an
/// adaptation stock (SAD) built from adaptation investment (IAD).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdRice2012Parameters {
    /// Default: 0.0
    pub damage_a1: RegionalValue<f64>,
    /// Default: 0.00236
    pub damage_a2: RegionalValue<f64>,
    /// Default: 2.0
    pub damage_a3: RegionalValue<f64>,
    /// Default: 1.0
    pub damage_scale_factor: f64,

    /// Scale of the adaptation level.
    ///
    /// Default: 0.115
    pub adap1: RegionalValue<f64>,
    /// Weight of flow adaptation against the adaptation stock.
    ///
    /// Default: 0.5
    pub adap2: RegionalValue<f64>,
    /// Returns to scale of adaptation.
    ///
    /// Default: 0.25
    pub adap3: RegionalValue<f64>,
    /// Substitution exponent between flow and stock adaptation.
    ///
    /// Default: 0.5
    pub adapt_rho: f64,

    /// Only allow flow adaptation: adaptation investment stays at zero.
    ///
    /// Default: false
    pub fixed_adaptation: bool,

    /// Linear sea-level-rise damage coefficient (fraction of GDP per m).
    ///
    /// Default: 0.00518
    #[serde(rename = "SLRdam1")]
    pub slr_dam1: RegionalValue<f64>,
    /// Quadratic sea-level-rise damage coefficient (fraction of GDP per m^2).
    ///
    /// Default: 0.00306
    #[serde(rename = "SLRdam2")]
    pub slr_dam2: RegionalValue<f64>,
}

impl Default for AdRice2012Parameters {
    fn default() -> Self {
        Self {
            damage_a1: RegionalValue::Uniform(0.0),
            damage_a2: RegionalValue::Uniform(0.00236),
            damage_a3: RegionalValue::Uniform(2.0),
            damage_scale_factor: 1.0,
            adap1: RegionalValue::Uniform(0.115),
            adap2: RegionalValue::Uniform(0.5),
            adap3: RegionalValue::Uniform(0.25),
            adapt_rho: 0.5,
            fixed_adaptation: false,
            slr_dam1: RegionalValue::Uniform(0.00518),
            slr_dam2: RegionalValue::Uniform(0.00306),
        }
    }
}

/// COACCH reduced-form damages.
///
/// Temperature (non-SLR) and sea-level-rise damages each use a functional form chosen
/// per region, scaled by the factor of the selected quantile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoacchParameters {
    /// Default: p50
    pub quantile: Quantile,
    pub noslr: DamageFunctionParameters,
    pub slr: DamageFunctionParameters,
}

impl Default for CoacchParameters {
    fn default() -> Self {
        Self {
            quantile: Quantile::P50,
            noslr: DamageFunctionParameters {
                form: RegionalValue::Uniform(DamageForm::RobustQuadratic),
                b1: RegionalValue::Uniform(0.0),
                b2: RegionalValue::Uniform(0.3),
                b3: RegionalValue::Uniform(0.0),
                a: QuantileFactors::default(),
            },
            slr: DamageFunctionParameters {
                form: RegionalValue::Uniform(DamageForm::RobustLinear),
                b1: RegionalValue::Uniform(1.0),
                b2: RegionalValue::Uniform(0.0),
                b3: RegionalValue::Uniform(0.0),
                a: QuantileFactors::default(),
            },
        }
    }
}

/// One damage function: a form and its calibrated coefficients, per region.
///
/// Coefficients give damages in percent of GDP. `b2` and `b3` are only used by some
/// forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DamageFunctionParameters {
    pub form: RegionalValue<DamageForm>,
    pub b1: RegionalValue<f64>,
    #[serde(default)]
    pub b2: RegionalValue<f64>,
    #[serde(default)]
    pub b3: RegionalValue<f64>,
    #[serde(default)]
    pub a: QuantileFactors,
}

/// Damage quantile selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantile {
    P05,
    #[default]
    P50,
    P95,
}

/// Scaling of a damage function at each quantile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuantileFactors {
    /// Default: 0.5
    pub p05: RegionalValue<f64>,
    /// Default: 1.0
    pub p50: RegionalValue<f64>,
    /// Default: 1.8
    pub p95: RegionalValue<f64>,
}

impl QuantileFactors {
    pub fn select(&self, quantile: Quantile) -> &RegionalValue<f64> {
        match quantile {
            Quantile::P05 => &self.p05,
            Quantile::P50 => &self.p50,
            Quantile::P95 => &self.p95,
        }
    }
}

impl Default for QuantileFactors {
    fn default() -> Self {
        Self {
            p05: RegionalValue::Uniform(0.5),
            p50: RegionalValue::Uniform(1.0),
            p95: RegionalValue::Uniform(1.8),
        }
    }
}

/// Functional form of a COACCH damage function.
///
/// Robust and OLS calibrations share the same algebraic form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageForm {
    #[serde(rename = "Robust-Linear")]
    RobustLinear,
    #[serde(rename = "OLS-Linear")]
    OlsLinear,
    #[serde(rename = "Robust-Quadratic")]
    RobustQuadratic,
    #[serde(rename = "OLS-Quadratic")]
    OlsQuadratic,
    #[serde(rename = "Robust-Logistic")]
    RobustLogistic,
    #[serde(rename = "OLS-Logistic")]
    OlsLogistic,
}

impl DamageForm {
    pub const ALL: [DamageForm; 6] = [
        DamageForm::RobustLinear,
        DamageForm::OlsLinear,
        DamageForm::RobustQuadratic,
        DamageForm::OlsQuadratic,
        DamageForm::RobustLogistic,
        DamageForm::OlsLogistic,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DamageForm::RobustLinear => "Robust-Linear",
            DamageForm::OlsLinear => "OLS-Linear",
            DamageForm::RobustQuadratic => "Robust-Quadratic",
            DamageForm::OlsQuadratic => "OLS-Quadratic",
            DamageForm::RobustLogistic => "Robust-Logistic",
            DamageForm::OlsLogistic => "OLS-Logistic",
        }
    }
}

impl fmt::Display for DamageForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for DamageForm {
    type Err = MimosaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DamageForm::ALL
            .into_iter()
            .find(|form| form.label() == s)
            .ok_or_else(|| MimosaError::invalid_option("damage form", format!("unknown form `{s}`")))
    }
}
