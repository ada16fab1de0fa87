use approx::assert_relative_eq;
use is_close::is_close;
use mimosa_components::catalog::build_model;
use mimosa_components::config::ModelConfig;
use mimosa_core::errors::{ErrorKind, MimosaError};
use mimosa_core::expr::Relation;
use mimosa_core::grid::Index;
use mimosa_core::model::Model;
use mimosa_core::results::ResultTable;
use mimosa_core::solver::{FixedPointSolver, SolveStatus};

/// Two regions over five decadal periods with constant baseline emissions of
/// 10 and 20 GtCO2/yr.
const SCENARIO: &str = r#"
[time]
begin = 2020
end = 2060
dt = 10

[regions]
labels = ["North", "South"]

[scenario]
baseline_emissions = { North = 10.0, South = 20.0 }
population = { North = 1.0, South = 3.0 }
GDP = { years = [2020, 2060], values = { North = [50.0, 90.0], South = [20.0, 60.0] } }
"#;

fn config(extra: &str) -> ModelConfig {
    ModelConfig::from_toml_str(&format!("{SCENARIO}\n{extra}")).unwrap()
}

fn model(extra: &str) -> Model {
    build_model(&config(extra)).unwrap()
}

fn solve(extra: &str) -> ResultTable {
    solve_config(&config(extra))
}

fn solve_config(config: &ModelConfig) -> ResultTable {
    build_model(config)
        .unwrap()
        .solve(&FixedPointSolver::new(), &config.solver, "test")
        .unwrap()
}

/// Column of `variable` at period `t`.
fn column(model: &Model, variable: &str, t: usize) -> usize {
    model
        .registry()
        .variable(variable)
        .unwrap()
        .column(model.grid(), Index::Time(t))
        .unwrap()
}

fn relation<'a>(model: &'a Model, name: &str, index: Index) -> &'a Relation {
    &model
        .constraints()
        .iter()
        .find(|c| c.name == name && c.index == index)
        .unwrap()
        .relation
}

#[test]
fn baseline_scenario() {
    let results = solve("");
    assert_eq!(results.status, SolveStatus::Feasible);

    let cumulative = results.time_series("cumulative_emissions").unwrap();
    let temperature = results.time_series("temperature").unwrap();
    for t in 0..5 {
        let elapsed = 10.0 * t as f64;
        assert!(is_close!(cumulative[t], 30.0 * elapsed), "cumulative[{t}]");
        assert!(
            is_close!(temperature[t], 1.1 + 0.62e-3 * 30.0 * elapsed),
            "temperature[{t}]"
        );
    }

    let global = results.time_series("emissions_total_global_mitigation").unwrap();
    assert!(global.iter().all(|e| is_close!(*e, 30.0)));
    let industry = results
        .time_series("emissions_industry_global_mitigation")
        .unwrap();
    assert!(industry.iter().all(|e| is_close!(*e, 7.5)));
    let south = results
        .regional_series("emissions_other_regional_mitigation", "South")
        .unwrap();
    assert!(south.iter().all(|e| is_close!(*e, 15.0)));

    let relative = results.time_series("emission_relative_cumulative").unwrap();
    assert!(relative.iter().all(|r| is_close!(*r, 1.0)));

    // No abatement, so GDP only loses the damages
    let gdp = results.get("GDP_gross", Index::TimeRegion(4, 0)).unwrap();
    assert!(is_close!(gdp, 90.0));
    let damages = results.get("damage_costs", Index::TimeRegion(4, 0)).unwrap();
    let net = results.get("GDP_net", Index::TimeRegion(4, 0)).unwrap();
    assert!(is_close!(net, gdp * (1.0 - damages)));
    assert!(damages > 0.0);

    let npv = results.time_series("NPV").unwrap();
    assert_eq!(npv[0], 0.0);
    assert!(results.objective > 0.0);
    assert!(is_close!(results.objective, npv[4]));
}

#[test]
fn carbon_budget_boundary() {
    let exact = r#"
        [emissions]
        budget = "1200 GtCO2"
        budget_year = 2060
        no_pos_emissions_after_budget_year = false
    "#;
    let model = model(exact);
    assert_eq!(model.constraint_count("carbon_budget"), 1);
    assert_eq!(model.constraint_count("net_zero_after_budget_year"), 0);
    let results = solve(exact);
    assert_eq!(results.status, SolveStatus::Feasible);

    let config = config(
        r#"
        [emissions]
        budget = "1.199 TtCO2"
        budget_year = 2060
        no_pos_emissions_after_budget_year = false
        "#,
    );
    let err = build_model(&config)
        .unwrap()
        .solve(&FixedPointSolver::new(), &config.solver, "test")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Solver);
    match err {
        MimosaError::Solver { status, message, .. } => {
            assert_eq!(status, SolveStatus::Infeasible);
            assert!(message.contains("carbon_budget"), "{message}");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn budget_year_after_horizon() {
    let model = model(
        r#"
        [emissions]
        budget = "700 GtCO2"
        budget_year = 2100
        "#,
    );
    assert_eq!(model.constraint_count("carbon_budget"), 0);
    assert_eq!(model.constraint_count("net_zero_after_budget_year"), 0);
}

#[test]
fn trapezoidal_matches_rectangular_for_constant_emissions() {
    let trapz = solve("");
    let rect = solve("[emissions]\ncumulative_emissions_trapz = false");
    let trapz = trapz.time_series("cumulative_emissions").unwrap();
    let rect = rect.time_series("cumulative_emissions").unwrap();
    for (a, b) in trapz.iter().zip(&rect) {
        assert!(is_close!(*a, *b));
    }
}

#[test]
fn trapezoidal_differs_from_rectangular_for_rising_emissions() {
    // Global emissions rise from 30 to 70 GtCO2/yr, 10 more every period
    let document = SCENARIO.replace(
        "baseline_emissions = { North = 10.0, South = 20.0 }",
        "baseline_emissions = { years = [2020, 2060], values = { North = [10.0, 50.0], South = [20.0, 20.0] } }",
    );
    let config = |trapz: bool| {
        ModelConfig::from_toml_str(&format!(
            "{document}\n[emissions]\ncumulative_emissions_trapz = {trapz}"
        ))
        .unwrap()
    };
    let trapz = solve_config(&config(true))
        .time_series("cumulative_emissions")
        .unwrap();
    let rect = solve_config(&config(false))
        .time_series("cumulative_emissions")
        .unwrap();

    assert!(is_close!(trapz[4], 2000.0));
    assert!(is_close!(rect[4], 2200.0));
    for t in 0..5 {
        // Half of the rise over each period of 10 years
        assert_relative_eq!(rect[t] - trapz[t], 50.0 * t as f64, epsilon = 1e-6);
    }
}

#[test]
fn disabled_policies_are_absent() {
    let off = model("");
    let on = model(
        r#"
        [emissions]
        budget = "2000 GtCO2"
        budget_year = 2040
        inertia_global = 0.05
        inertia_regional = 0.05
        global_min_level = "-10 GtCO2/yr"
        regional_min_level = -5.0
        temperature_target = 2.0
        temperature_target_year = 2040
        non_increasing_emissions_after_2100 = true
        "#,
    );

    for (name, count) in [
        ("carbon_budget", 3),
        ("net_zero_after_budget_year", 3),
        ("global_inertia", 4),
        ("regional_inertia", 8),
        ("global_min_level", 5),
        ("regional_min_level", 10),
        ("temperature_target", 3),
        // every period of the grid is at or before 2100
        ("non_increasing_emissions_after_2100", 0),
    ] {
        assert_eq!(off.constraint_count(name), 0, "{name} switched off");
        assert_eq!(on.constraint_count(name), count, "{name} switched on");
    }

    let explicit_off = model(
        r#"
        [emissions]
        budget = false
        inertia_global = false
        non_negative_cumulative_emissions = false
        "#,
    );
    assert_eq!(explicit_off.constraint_count("carbon_budget"), 0);
    assert_eq!(explicit_off.constraint_count("global_inertia"), 0);
    assert_eq!(
        explicit_off.constraint_count("cumulative_emissions_non_negative"),
        0
    );
    assert_eq!(off.constraint_count("cumulative_emissions_non_negative"), 5);
}

#[test]
fn overshoot_only_with_irreversible_damages() {
    assert_eq!(model("").constraint_count("overshoot"), 0);
    let model = model("[emissions]\nperc_reversible_damages = 0.5");
    assert_eq!(model.constraint_count("overshoot"), 4);
    assert_eq!(model.constraint_count("overshoot_init"), 1);
    assert!(model.registry().variable("netnegative_emissions").is_some());
}

#[test]
fn emission_trade_variants() {
    let notrade = model("");
    assert_eq!(notrade.constraint_count("no_circular_economy"), 5);
    assert_eq!(notrade.constraint_count("ce_max_reduction"), 0);

    let with_ce = model("[components]\nemissiontrade = \"notrade_ce\"");
    assert_eq!(with_ce.constraint_count("no_circular_economy"), 0);
    assert_eq!(with_ce.constraint_count("ce_max_reduction"), 5);
    assert_eq!(with_ce.constraint_count("circular_economy_costs"), 5);

    let global = model("[components]\nemissiontrade = \"globalprice\"");
    assert_eq!(global.constraint_count("global_carbonprice"), 5);
    assert_eq!(global.constraint_count("carbonprice_equalisation"), 5);
    assert_eq!(global.constraint_count("ce_carbonprice"), 5);

    let results = solve("[components]\nemissiontrade = \"globalprice\"");
    assert_eq!(results.status, SolveStatus::Feasible);
}

#[test]
fn circular_economy_clears_at_its_marginal_cost() {
    let model = model(
        r#"
        [components]
        emissiontrade = "globalprice"

        [mitigation]
        lot_rate = 0.05
        "#,
    );
    let t = 4;
    let reduction = column(&model, "emissions_industry_global_relative_reduction_from_CE", t);
    let baseline = column(&model, "emissions_industry_global_baseline", t);
    let costs = relation(&model, "circular_economy_costs", Index::Time(t));
    let clearing = relation(&model, "ce_carbonprice", Index::Time(t));

    let mut x = vec![0.0; model.registry().n_columns()];
    x[baseline] = 7.5;
    // Cost and price columns stay at zero, so each residual is minus the rule's value
    let mut cost_at = |value: f64| {
        x[reduction] = value;
        -costs.residual(&x)
    };
    let h = 1e-5;
    let marginal = (cost_at(0.4 + h) - cost_at(0.4 - h)) / (2.0 * h) / 7.5;
    x[reduction] = 0.4;
    let price = -clearing.residual(&x);

    assert!(price > 0.0);
    assert_relative_eq!(marginal, price, max_relative = 1e-6);
}

#[test]
fn energy_industry_rejects_circular_economy() {
    for trade in ["notrade_ce", "globalprice"] {
        let err = build_model(&config(&format!(
            "[components]\nindustry = \"energy\"\nemissiontrade = \"{trade}\""
        )))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("components.emissiontrade"), "{err}");
    }
}

#[test]
fn industry_follows_reference_region() {
    for (label, region) in [("North", 0), ("South", 1)] {
        let model = model(&format!("[industry.mac]\nreference_region = \"{label}\""));
        let price = model
            .registry()
            .variable("carbonprice")
            .unwrap()
            .column(model.grid(), Index::TimeRegion(2, region))
            .unwrap();
        let matching = relation(&model, "industry_carbonprice", Index::Time(2));
        assert!(matching.columns().contains(&price), "{label}");
    }
}

#[test]
fn industry_and_damage_variants() {
    let energy = "[components]\nindustry = \"energy\"";
    let model = model(energy);
    assert_eq!(model.constraint_count("industry_emissions"), 5);
    assert_eq!(model.constraint_count("industry_abatement"), 0);
    let results = solve(energy);
    let industry = results
        .time_series("emissions_industry_global_mitigation")
        .unwrap();
    assert!(industry.iter().all(|e| is_close!(*e, 200.0 * 0.05)));

    let coacch = r#"
        [components]
        damages = "coacch"

        [damages.coacch]
        quantile = "p95"
    "#;
    let results = solve(coacch);
    let temperature = results.get("temperature", Index::Time(2)).unwrap();
    let damages = results.get("resid_damages", Index::TimeRegion(2, 1)).unwrap();
    // Robust-Quadratic with b1 = 0, b2 = 0.3 scaled by the p95 factor
    let expected = 1.8 * 0.3 * (temperature.powi(2) - 1.1f64.powi(2)) / 100.0;
    assert!(is_close!(damages, expected));
}

#[test]
fn configuration_errors() {
    let err = build_model(&config("[components]\ndamages = \"dice\"")).unwrap_err();
    assert!(matches!(err, MimosaError::UnknownVariant { .. }));
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let err = build_model(&config("[industry.mac]\nreference_region = \"East\"")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let err = build_model(&config("[emissions]\nbudget = \"700 K\"")).unwrap_err();
    assert!(matches!(err, MimosaError::Unit { .. }));

    let err = build_model(&config(
        "[damages.ad_rice2012]\ndamage_a2 = { North = 0.003 }",
    ))
    .unwrap_err();
    assert!(err.to_string().contains("South"));
}

#[test]
fn component_graph() {
    let model = model("");
    let dot = model.as_dot();
    for name in [
        "economics:exogenous",
        "emissions:default",
        "mitigation:default",
        "industry:mac",
        "emissiontrade:notrade",
        "damages:ad_rice2012",
        "objective:globalcosts",
    ] {
        assert!(dot.contains(name), "{name} missing from graph");
    }
    assert_eq!(model.objective_owner(), "objective:globalcosts");
}

#[test]
fn results_round_trip_through_json() {
    let results = solve("");
    let dir = tempfile::tempdir().unwrap();
    let (json, csv) = results.save(dir.path()).unwrap();
    assert!(csv.exists());
    let loaded = ResultTable::load_json(&json).unwrap();
    assert_eq!(
        loaded.time_series("temperature"),
        results.time_series("temperature")
    );
}
