//! Exogenous regional data given at calendar years.

use crate::errors::{MimosaError, MimosaResult};
use crate::grid::Grid;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Piecewise-linear data per region, keyed by calendar year.
///
/// Values between two data years are linearly interpolated.
/// Outside the data range the first or last value is held constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalSeries {
    years: Vec<f64>,
    /// One row of values per region, in region order.
    values: Vec<Vec<f64>>,
}

impl RegionalSeries {
    pub fn new(years: Vec<f64>, values: Vec<Vec<f64>>) -> MimosaResult<Self> {
        if years.is_empty() {
            return Err(MimosaError::invalid_option(
                "scenario.years",
                "a series needs at least one year",
            ));
        }
        if years.windows(2).any(|w| w[1] <= w[0]) {
            return Err(MimosaError::invalid_option(
                "scenario.years",
                "series years must be strictly increasing",
            ));
        }
        if let Some(row) = values.iter().find(|row| row.len() != years.len()) {
            return Err(MimosaError::invalid_option(
                "scenario",
                format!(
                    "expected {} values per region, got {}",
                    years.len(),
                    row.len()
                ),
            ));
        }
        Ok(Self { years, values })
    }

    /// A series that takes the same value for every year in each region.
    pub fn constant(values: Vec<f64>) -> Self {
        Self {
            years: vec![0.0],
            values: values.into_iter().map(|v| vec![v]).collect(),
        }
    }

    pub fn n_regions(&self) -> usize {
        self.values.len()
    }

    pub fn years(&self) -> &[f64] {
        &self.years
    }

    /// Interpolated value for region `r` at `year`.
    pub fn at(&self, year: f64, r: usize) -> f64 {
        let row = &self.values[r];
        let last = self.years.len() - 1;
        if year <= self.years[0] {
            return row[0];
        }
        if year >= self.years[last] {
            return row[last];
        }
        let i = self.years.partition_point(|&y| y <= year);
        let (y0, y1) = (self.years[i - 1], self.years[i]);
        let w = (year - y0) / (y1 - y0);
        row[i - 1] + w * (row[i] - row[i - 1])
    }

    /// Sample the series at every period and region of the grid.
    ///
    /// Returns a `(periods, regions)` array.
    pub fn on_grid(&self, grid: &Grid) -> MimosaResult<Array2<f64>> {
        if self.n_regions() != grid.n_regions() {
            return Err(MimosaError::Configuration(format!(
                "series covers {} regions but the model has {}",
                self.n_regions(),
                grid.n_regions()
            )));
        }
        Ok(Array2::from_shape_fn(
            (grid.n_periods(), grid.n_regions()),
            |(t, r)| self.at(grid.year(t), r),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{RegionSet, TimeGrid};
    use is_close::is_close;

    #[test]
    fn interpolation() {
        let series =
            RegionalSeries::new(vec![2020.0, 2030.0, 2050.0], vec![vec![1.0, 2.0, 4.0]]).unwrap();
        assert!(is_close!(series.at(2010.0, 0), 1.0));
        assert!(is_close!(series.at(2025.0, 0), 1.5));
        assert!(is_close!(series.at(2030.0, 0), 2.0));
        assert!(is_close!(series.at(2040.0, 0), 3.0));
        assert!(is_close!(series.at(2100.0, 0), 4.0));
    }

    #[test]
    fn sampled_on_grid() {
        let grid = Grid::new(
            TimeGrid::uniform(2020.0, 2040.0, 10.0).unwrap(),
            RegionSet::new(["A", "B"]).unwrap(),
        );
        let series =
            RegionalSeries::new(vec![2020.0, 2040.0], vec![vec![0.0, 2.0], vec![5.0, 5.0]])
                .unwrap();
        let values = series.on_grid(&grid).unwrap();
        assert_eq!(values.shape(), &[3, 2]);
        assert!(is_close!(values[[1, 0]], 1.0));
        assert!(is_close!(values[[2, 1]], 5.0));
    }

    #[test]
    fn rejects_ragged_rows() {
        assert!(RegionalSeries::new(vec![2020.0, 2030.0], vec![vec![1.0]]).is_err());
        assert!(RegionalSeries::new(vec![2030.0, 2020.0], vec![vec![1.0, 1.0]]).is_err());
    }
}
