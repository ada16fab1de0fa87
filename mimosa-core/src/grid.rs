//! The discretised index grid shared by every component.
//!
//! A model is defined on a [`TimeGrid`] of periods `t = 0..=T` mapped to calendar years,
//! and a fixed [`RegionSet`].
//! Period `t = 0` is always the initial period; relations involving `t - 1` are only
//! defined for `t > 0` and need a separate initial-period form.

use crate::errors::{MimosaError, MimosaResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;

/// Position of a single value of an indexed quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Index {
    Scalar,
    Time(usize),
    TimeRegion(usize, usize),
}

impl Index {
    /// The period of this index, if it is time-indexed.
    pub fn period(&self) -> Option<usize> {
        match self {
            Index::Scalar => None,
            Index::Time(t) | Index::TimeRegion(t, _) => Some(*t),
        }
    }

    /// The region of this index, if it is region-indexed.
    pub fn region(&self) -> Option<usize> {
        match self {
            Index::TimeRegion(_, r) => Some(*r),
            _ => None,
        }
    }
}

/// Ordered periods and the calendar year of each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    years: Vec<f64>,
}

impl TimeGrid {
    /// Create a grid from explicit calendar years.
    ///
    /// The years must be finite and strictly increasing, and at least two periods are
    /// needed so that a period length is defined for the initial period.
    pub fn new(years: Vec<f64>) -> MimosaResult<Self> {
        if years.len() < 2 {
            return Err(MimosaError::invalid_option(
                "time",
                format!("a time grid needs at least two periods, got {}", years.len()),
            ));
        }
        if let Some(year) = years.iter().find(|y| !y.is_finite()) {
            return Err(MimosaError::invalid_option(
                "time",
                format!("year {year} is not finite"),
            ));
        }
        if let Some(w) = years.windows(2).find(|w| w[1] <= w[0]) {
            return Err(MimosaError::invalid_option(
                "time",
                format!("years must be strictly increasing, {} follows {}", w[1], w[0]),
            ));
        }
        Ok(Self { years })
    }

    /// Create a grid with a constant period length from `begin` to `end` (inclusive).
    pub fn uniform(begin: f64, end: f64, dt: f64) -> MimosaResult<Self> {
        if !(dt > 0.0) {
            return Err(MimosaError::invalid_option(
                "time.dt",
                format!("period length must be positive, got {dt}"),
            ));
        }
        for (option, year) in [("time.begin", begin), ("time.end", end)] {
            if !year.is_finite() {
                return Err(MimosaError::invalid_option(
                    option,
                    format!("year {year} is not finite"),
                ));
            }
        }
        let n = ((end - begin) / dt).round() as i64;
        if n < 1 {
            return Err(MimosaError::invalid_option(
                "time.end",
                format!("end year {end} must be at least one period after {begin}"),
            ));
        }
        Self::new((0..=n).map(|i| begin + i as f64 * dt).collect())
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn periods(&self) -> Range<usize> {
        0..self.years.len()
    }

    /// Index of the final period `T`.
    pub fn final_period(&self) -> usize {
        self.years.len() - 1
    }

    /// Calendar year of period `t`.
    pub fn year(&self, t: usize) -> f64 {
        self.years[t]
    }

    pub fn years(&self) -> &[f64] {
        &self.years
    }

    pub fn begin_year(&self) -> f64 {
        self.years[0]
    }

    /// Length of the step leading into period `t`.
    ///
    /// The initial period has no predecessor, so it reuses the length of the first step.
    pub fn dt(&self, t: usize) -> f64 {
        match t {
            0 => self.years[1] - self.years[0],
            _ => self.years[t] - self.years[t - 1],
        }
    }

    /// The first period whose year is at or after `year`.
    ///
    /// Every "year(t) >= threshold" gate resolves to this period, so thresholds that
    /// fall between grid points switch on at the next period.
    pub fn first_period_at_or_after(&self, year: f64) -> Option<usize> {
        self.years.iter().position(|&y| y >= year)
    }

    /// Whether period `t` lies at or after the first period at or after `year`.
    pub fn is_at_or_after(&self, t: usize, year: f64) -> bool {
        self.first_period_at_or_after(year)
            .is_some_and(|first| t >= first)
    }
}

/// The fixed set of region labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSet {
    labels: Vec<String>,
}

impl RegionSet {
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> MimosaResult<Self> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(MimosaError::invalid_option(
                "regions",
                "at least one region is required",
            ));
        }
        let mut seen = HashSet::new();
        for label in &labels {
            if !seen.insert(label.as_str()) {
                return Err(MimosaError::invalid_option(
                    "regions",
                    format!("region `{label}` is listed twice"),
                ));
            }
        }
        Ok(Self { labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn indices(&self) -> Range<usize> {
        0..self.labels.len()
    }

    pub fn label(&self, r: usize) -> &str {
        &self.labels[r]
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }
}

/// Time grid and region set of a model instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub time: TimeGrid,
    pub regions: RegionSet,
}

impl Grid {
    pub fn new(time: TimeGrid, regions: RegionSet) -> Self {
        Self { time, regions }
    }

    pub fn year(&self, t: usize) -> f64 {
        self.time.year(t)
    }

    pub fn dt(&self, t: usize) -> f64 {
        self.time.dt(t)
    }

    pub fn periods(&self) -> Range<usize> {
        self.time.periods()
    }

    pub fn regions(&self) -> Range<usize> {
        self.regions.indices()
    }

    pub fn n_periods(&self) -> usize {
        self.time.len()
    }

    pub fn n_regions(&self) -> usize {
        self.regions.len()
    }

    pub fn final_period(&self) -> usize {
        self.time.final_period()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_grid() {
        let grid = TimeGrid::uniform(2020.0, 2100.0, 10.0).unwrap();
        assert_eq!(grid.len(), 9);
        assert_eq!(grid.year(0), 2020.0);
        assert_eq!(grid.year(8), 2100.0);
        assert_eq!(grid.final_period(), 8);
        assert_eq!(grid.dt(0), 10.0);
        assert_eq!(grid.dt(3), 10.0);
    }

    #[test]
    fn non_uniform_dt() {
        let grid = TimeGrid::new(vec![2020.0, 2025.0, 2030.0, 2040.0, 2060.0]).unwrap();
        assert_eq!(grid.dt(0), 5.0);
        assert_eq!(grid.dt(1), 5.0);
        assert_eq!(grid.dt(3), 10.0);
        assert_eq!(grid.dt(4), 20.0);
    }

    #[test]
    fn rejects_non_increasing_years() {
        assert!(TimeGrid::new(vec![2020.0, 2020.0, 2030.0]).is_err());
        assert!(TimeGrid::new(vec![2030.0, 2020.0]).is_err());
        assert!(TimeGrid::new(vec![2020.0]).is_err());
        assert!(TimeGrid::uniform(2020.0, 2100.0, 0.0).is_err());
    }

    #[test]
    fn uniform_rejects_non_finite_years() {
        for (begin, end) in [
            (2020.0, f64::INFINITY),
            (2020.0, f64::NAN),
            (f64::NEG_INFINITY, 2100.0),
        ] {
            let err = TimeGrid::uniform(begin, end, 5.0).unwrap_err();
            assert!(err.to_string().contains("not finite"), "{err}");
        }
    }

    #[test]
    fn threshold_uses_next_period() {
        let grid = TimeGrid::uniform(2020.0, 2150.0, 15.0).unwrap();
        // 2020, 2035, ..., 2090, 2105, ...
        let first = grid.first_period_at_or_after(2100.0).unwrap();
        assert_eq!(grid.year(first), 2105.0);
        assert!(!grid.is_at_or_after(first - 1, 2100.0));
        assert!(grid.is_at_or_after(first, 2100.0));
        assert!(grid.first_period_at_or_after(2500.0).is_none());
        assert!(!grid.is_at_or_after(grid.final_period(), 2500.0));
    }

    #[test]
    fn exact_threshold_is_included() {
        let grid = TimeGrid::uniform(2020.0, 2150.0, 10.0).unwrap();
        let first = grid.first_period_at_or_after(2100.0).unwrap();
        assert_eq!(grid.year(first), 2100.0);
    }

    #[test]
    fn region_set() {
        let regions = RegionSet::new(["USA", "EUR", "CHN"]).unwrap();
        assert_eq!(regions.len(), 3);
        assert_eq!(regions.index_of("EUR"), Some(1));
        assert_eq!(regions.index_of("IND"), None);
        assert_eq!(regions.label(2), "CHN");

        assert!(RegionSet::new(Vec::<String>::new()).is_err());
        assert!(RegionSet::new(["USA", "USA"]).is_err());
    }
}
