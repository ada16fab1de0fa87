//! Small components used to exercise the model machinery.

use crate::component::{Component, Objective};
use crate::constraint::Constraint;
use crate::errors::MimosaResult;
use crate::registry::{Bounds, Declarations, ModelView, VariableDeclaration};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToyStockParameters {
    /// Constant emission rate
    pub rate: f64,
    /// Pin the stock at the initial period
    pub anchored: bool,
    /// Provide the objective (minimise the final stock)
    pub objective: bool,
}

impl Default for ToyStockParameters {
    fn default() -> Self {
        Self {
            rate: 10.0,
            anchored: true,
            objective: true,
        }
    }
}

/// A constant emission rate accumulating into a stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToyStock {
    parameters: ToyStockParameters,
}

impl ToyStock {
    pub fn from_parameters(parameters: ToyStockParameters) -> Self {
        Self { parameters }
    }
}

#[typetag::serde]
impl Component for ToyStock {
    fn slot(&self) -> &'static str {
        "stock"
    }

    fn variant(&self) -> &'static str {
        "toy"
    }

    fn declare(&self, declarations: &mut Declarations) -> MimosaResult<()> {
        declarations.parameter("rate", self.parameters.rate)?;
        declarations.variable(VariableDeclaration::time("emissions").unit("GtCO2/yr"))?;
        declarations.variable(
            VariableDeclaration::time("stock")
                .unit("GtCO2")
                .bounds(Bounds::non_negative()),
        )
    }

    fn constraints(&self, view: &ModelView) -> MimosaResult<Vec<Constraint>> {
        let rate = view.scalar("rate")?;
        let emissions = view.time_var("emissions")?;
        let stock = view.time_var("stock")?;
        let grid = view.grid().clone();

        let mut constraints = vec![
            Constraint::global("emissions", move |t| emissions.at(t).equals(rate)),
            Constraint::global("stock", move |t| {
                stock
                    .at(t)
                    .equals(stock.at(t - 1) + grid.dt(t) * emissions.at(t - 1))
            })
            .skip_initial(),
        ];
        if self.parameters.anchored {
            constraints.push(Constraint::global_init("stock_init", move || {
                stock.at(0).equals(0.0)
            }));
        }
        Ok(constraints)
    }

    fn objective(&self, view: &ModelView) -> MimosaResult<Option<Objective>> {
        if !self.parameters.objective {
            return Ok(None);
        }
        let stock = view.time_var("stock")?;
        Ok(Some(Objective::minimize(stock.at(view.grid().final_period()))))
    }
}

/// A linear response to the stock of [`ToyStock`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToyResponse {
    pub sensitivity: f64,
    /// Name of the stock variable to respond to
    pub source: String,
    /// Name of the response constraint
    pub constraint: String,
}

impl Default for ToyResponse {
    fn default() -> Self {
        Self {
            sensitivity: 0.5,
            source: "stock".to_string(),
            constraint: "response".to_string(),
        }
    }
}

#[typetag::serde]
impl Component for ToyResponse {
    fn slot(&self) -> &'static str {
        "response"
    }

    fn variant(&self) -> &'static str {
        "linear"
    }

    fn declare(&self, declarations: &mut Declarations) -> MimosaResult<()> {
        declarations.variable(VariableDeclaration::time("response"))
    }

    fn constraints(&self, view: &ModelView) -> MimosaResult<Vec<Constraint>> {
        let response = view.time_var("response")?;
        let stock = view.time_var(&self.source)?;
        let sensitivity = self.sensitivity;
        Ok(vec![Constraint::global(self.constraint.clone(), move |t| {
            response.at(t).equals(sensitivity * stock.at(t))
        })])
    }
}
