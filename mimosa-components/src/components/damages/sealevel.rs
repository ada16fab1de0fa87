//! Sea-level rise shared by the damage variants
//!
//! Three contributions, each a first-order difference equation anchored at the
//! initial period:
//!
//! - thermal expansion `SLR`, relaxing towards `S1 * T` at rate `S3` per decade
//! - glaciers and small ice caps `CUMGSIC`, melting towards the total volume `M2`
//! - the Greenland ice sheet `CUMGIS`, melting in proportion to the remaining volume

use crate::parameters::SeaLevelParameters;
use mimosa_core::constraint::Constraint;
use mimosa_core::errors::MimosaResult;
use mimosa_core::registry::{Declarations, ModelView, VariableDeclaration};

const LENGTH: &str = "m";

pub(crate) fn declare_sea_level(
    declarations: &mut Declarations,
    p: &SeaLevelParameters,
) -> MimosaResult<()> {
    for (name, value) in [
        ("S1", p.s1),
        ("S2", p.s2),
        ("S3", p.s3),
        ("M1", p.m1),
        ("M2", p.m2),
        ("M3", p.m3),
        ("M4", p.m4),
        ("M5", p.m5),
        ("M6", p.m6),
        ("gsic_initial", p.gsic_initial),
        ("gis_initial", p.gis_initial),
    ] {
        declarations.parameter(name, value)?;
    }
    for name in ["SLR", "CUMGSIC", "CUMGIS", "total_SLR"] {
        declarations.variable(VariableDeclaration::time(name).unit(LENGTH))?;
    }
    Ok(())
}

pub(crate) fn sea_level_constraints(view: &ModelView) -> MimosaResult<Vec<Constraint>> {
    let [s1, s2, s3, m1, m2, m3, m4, m5, m6] =
        ["S1", "S2", "S3", "M1", "M2", "M3", "M4", "M5", "M6"].map(|name| view.scalar(name));
    let (s1, s2, s3) = (s1?, s2?, s3?);
    let (m1, m2, m3, m4, m5, m6) = (m1?, m2?, m3?, m4?, m5?, m6?);
    let gsic_initial = view.scalar("gsic_initial")?;
    let gis_initial = view.scalar("gis_initial")?;
    let t0 = view.scalar("T0")?;

    let temperature = view.time_var("temperature")?;
    let thermal = view.time_var("SLR")?;
    let gsic = view.time_var("CUMGSIC")?;
    let gis = view.time_var("CUMGIS")?;
    let total = view.time_var("total_SLR")?;

    let thermal_grid = view.grid().clone();
    let gsic_grid = view.grid().clone();
    let gis_grid = view.grid().clone();

    Ok(vec![
        Constraint::global("SLR_thermal", move |t| {
            let decades = thermal_grid.dt(t) / 10.0;
            thermal.at(t).equals(
                (1.0 - s3).powf(decades) * thermal.at(t - 1)
                    + s3 * decades * s1 * temperature.at(t),
            )
        })
        .skip_initial(),
        Constraint::global_init("SLR_thermal_init", move || {
            thermal.at(0).equals(s2 + s3 * (t0 * s1 - s2))
        }),
        Constraint::global("SLR_GSIC", move |t| {
            let previous = gsic.at(t - 1);
            gsic.at(t).equals(
                previous.clone()
                    + m1 / m2 * gsic_grid.dt(t) * (m2 - previous) * (temperature.at(t - 1) - m3),
            )
        })
        .skip_initial(),
        Constraint::global_init("SLR_GSIC_init", move || gsic.at(0).equals(gsic_initial)),
        Constraint::global("SLR_GIS", move |t| {
            let previous = gis.at(t - 1);
            gis.at(t).equals(
                previous.clone()
                    + gis_grid.dt(t) / 10.0 / 100.0
                        * (m4 * temperature.at(t - 1) + m5)
                        * (1.0 - previous / m6),
            )
        })
        .skip_initial(),
        Constraint::global_init("SLR_GIS_init", move || gis.at(0).equals(gis_initial)),
        Constraint::global("total_SLR", move |t| {
            total
                .at(t)
                .equals(thermal.at(t) + gsic.at(t) + gis.at(t))
        }),
    ])
}
