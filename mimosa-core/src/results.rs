//! Solved trajectories of every variable.

use crate::errors::{MimosaError, MimosaResult};
use crate::grid::{Grid, Index};
use crate::registry::{Registry, Shape};
use crate::solver::SolveStatus;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::info;

/// Values of one variable at every index.
///
/// `values` has one row per period and one column per region. Time-only variables have
/// a single column and scalar variables a single value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableResult {
    pub unit: String,
    pub shape: Shape,
    pub values: Array2<f64>,
}

/// A named table of every variable's value at every declared index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    pub name: String,
    pub years: Vec<f64>,
    pub regions: Vec<String>,
    pub status: SolveStatus,
    pub objective: f64,
    pub variables: BTreeMap<String, VariableResult>,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    variable: &'a str,
    year: Option<f64>,
    region: Option<&'a str>,
    value: f64,
}

impl ResultTable {
    /// Collect the values of every registered variable from a solver point.
    pub fn from_point(
        name: impl Into<String>,
        registry: &Registry,
        point: &[f64],
        status: SolveStatus,
        objective: f64,
    ) -> Self {
        let grid = registry.grid();
        let variables = registry
            .variables()
            .iter()
            .map(|v| {
                let block = &point[v.first_column..v.first_column + v.n_columns];
                let (rows, cols) = match v.shape {
                    Shape::Scalar => (1, 1),
                    Shape::Time => (grid.n_periods(), 1),
                    Shape::TimeRegion => (grid.n_periods(), grid.n_regions()),
                };
                let values = Array2::from_shape_fn((rows, cols), |(i, j)| block[i * cols + j]);
                (
                    v.name.clone(),
                    VariableResult {
                        unit: v.unit.clone(),
                        shape: v.shape,
                        values,
                    },
                )
            })
            .collect();

        Self {
            name: name.into(),
            years: grid.time.years().to_vec(),
            regions: grid.regions.labels().to_vec(),
            status,
            objective,
            variables,
        }
    }

    pub fn variable(&self, name: &str) -> Option<&VariableResult> {
        self.variables.get(name)
    }

    /// Value of `name` at `index`.
    pub fn get(&self, name: &str, index: Index) -> Option<f64> {
        let v = self.variables.get(name)?;
        let (i, j) = match (v.shape, index) {
            (Shape::Scalar, Index::Scalar) => (0, 0),
            (Shape::Time, Index::Time(t)) => (t, 0),
            (Shape::TimeRegion, Index::TimeRegion(t, r)) => (t, r),
            _ => return None,
        };
        v.values.get((i, j)).copied()
    }

    /// Trajectory of a time-indexed variable.
    pub fn time_series(&self, name: &str) -> Option<Vec<f64>> {
        let v = self.variables.get(name)?;
        (v.shape == Shape::Time).then(|| v.values.column(0).to_vec())
    }

    /// Trajectory of a regional variable in region `region`.
    pub fn regional_series(&self, name: &str, region: &str) -> Option<Vec<f64>> {
        let v = self.variables.get(name)?;
        let r = self.regions.iter().position(|l| l == region)?;
        (v.shape == Shape::TimeRegion).then(|| v.values.column(r).to_vec())
    }

    /// Write `<dir>/<name>.json` and `<dir>/<name>.csv`, returning both paths.
    pub fn save(&self, dir: &Path) -> MimosaResult<(PathBuf, PathBuf)> {
        std::fs::create_dir_all(dir)?;
        let json = dir.join(format!("{}.json", self.name));
        let csv = dir.join(format!("{}.csv", self.name));
        self.write_json(&json)?;
        self.write_csv(&csv)?;
        info!(json = %json.display(), csv = %csv.display(), "saved results");
        Ok((json, csv))
    }

    pub fn write_json(&self, path: &Path) -> MimosaResult<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| MimosaError::Serialisation(e.to_string()))
    }

    pub fn load_json(path: &Path) -> MimosaResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        serde_json::from_reader(reader).map_err(|e| MimosaError::Serialisation(e.to_string()))
    }

    /// Write the flat `variable,year,region,value` table.
    ///
    /// Scalars leave `year` empty and time-only variables leave `region` empty.
    pub fn write_csv(&self, path: &Path) -> MimosaResult<()> {
        let mut writer =
            csv::Writer::from_path(path).map_err(|e| MimosaError::Serialisation(e.to_string()))?;
        for (name, v) in &self.variables {
            for ((i, j), value) in v.values.indexed_iter() {
                let row = CsvRow {
                    variable: name,
                    year: (v.shape != Shape::Scalar).then(|| self.years[i]),
                    region: (v.shape == Shape::TimeRegion).then(|| self.regions[j].as_str()),
                    value: *value,
                };
                writer
                    .serialize(row)
                    .map_err(|e| MimosaError::Serialisation(e.to_string()))?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// The grid the table was produced on.
    pub fn grid(&self) -> MimosaResult<Grid> {
        Ok(Grid::new(
            crate::grid::TimeGrid::new(self.years.clone())?,
            crate::grid::RegionSet::new(self.regions.clone())?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{RegionSet, TimeGrid};
    use crate::registry::VariableDeclaration;

    fn table() -> ResultTable {
        let grid = Grid::new(
            TimeGrid::uniform(2020.0, 2040.0, 10.0).unwrap(),
            RegionSet::new(["A", "B"]).unwrap(),
        );
        let mut registry = Registry::new(grid);
        registry
            .declare_variable(VariableDeclaration::scalar("s").unit("1"), "c")
            .unwrap();
        registry
            .declare_variable(VariableDeclaration::time("x").unit("GtCO2"), "c")
            .unwrap();
        registry
            .declare_variable(VariableDeclaration::time_region("y"), "c")
            .unwrap();
        let point: Vec<f64> = (0..registry.n_columns()).map(|i| i as f64).collect();
        ResultTable::from_point("test", &registry, &point, SolveStatus::Feasible, 1.5)
    }

    #[test]
    fn lookup_by_name_and_index() {
        let table = table();
        assert_eq!(table.get("s", Index::Scalar), Some(0.0));
        assert_eq!(table.get("x", Index::Time(2)), Some(3.0));
        assert_eq!(table.get("y", Index::TimeRegion(1, 1)), Some(7.0));
        assert_eq!(table.get("y", Index::Time(1)), None);
        assert_eq!(table.get("z", Index::Scalar), None);
        assert_eq!(table.time_series("x"), Some(vec![1.0, 2.0, 3.0]));
        assert_eq!(table.regional_series("y", "B"), Some(vec![5.0, 7.0, 9.0]));
    }

    #[test]
    fn save_and_load() {
        let table = table();
        let dir = tempfile::tempdir().unwrap();
        let (json, csv) = table.save(dir.path()).unwrap();
        assert!(json.ends_with("test.json"));

        let loaded = ResultTable::load_json(&json).unwrap();
        assert_eq!(loaded, table);

        let text = std::fs::read_to_string(csv).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("variable,year,region,value"));
        assert_eq!(lines.next(), Some("s,,,0.0"));
        assert_eq!(lines.next(), Some("x,2020.0,,1.0"));
        assert_eq!(text.lines().count(), 1 + 1 + 3 + 6);
    }
}
