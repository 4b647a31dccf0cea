//! High-level wind planning orchestration.

use tracing::{debug, info};

use towpath_core::{count_commands, is_comment, sanitize_program, Dialect, WindDefinition};

use crate::error::PlanError;
use crate::layers::{layer_summary, wind_layer};
use crate::machine::WinderMachine;

/// Options controlling a planning run.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanOptions {
    /// Emit move-trace comments into the program.
    pub verbose: bool,
    /// Controller dialect for the program prologue.
    pub dialect: Dialect,
}

/// Per-layer share of the plan metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerMetrics {
    /// 1-based position in the winding sequence.
    pub index: usize,
    /// Layer type tag.
    pub wind_type: &'static str,
    /// Command lines this layer emitted, comments excluded.
    pub commands: usize,
    /// Time share of this layer (seconds).
    pub time_s: f64,
    /// Tow share of this layer (meters).
    pub tow_m: f64,
}

/// A complete planned program with its aggregate metrics.
#[derive(Debug, Clone)]
pub struct PlanResult {
    /// Sanitized program lines: parameter header first, end marker last.
    pub commands: Vec<String>,
    /// Command line count, comments excluded.
    pub commands_total: usize,
    /// Estimated execution time (seconds).
    pub total_time_s: f64,
    /// Tow consumed (meters).
    pub total_tow_m: f64,
    /// Per-layer metrics in winding order.
    pub layers: Vec<LayerMetrics>,
}

/// Plan a complete wind program.
///
/// Either returns a complete, internally consistent program or fails
/// before returning anything; there is no partial-success mode.
pub fn plan_wind(
    definition: &WindDefinition,
    options: &PlanOptions,
) -> Result<PlanResult, PlanError> {
    definition.validate()?;
    if definition.layers.is_empty() {
        return Err(PlanError::NoLayers);
    }

    let mut machine = WinderMachine::new(definition.mandrel_parameters.diameter, options.verbose);
    machine.set_feed_rate(definition.default_feed_rate)?;

    let mut program: Vec<String> = Vec::new();
    program.push(definition.header_comment());
    for command in options.dialect.prologue() {
        program.push(command.to_string());
    }

    let total = definition.layers.len();
    let mut layers = Vec::with_capacity(total);
    for (position, layer) in definition.layers.iter().enumerate() {
        let index = position + 1;
        machine.insert_comment(&layer_summary(index, total, layer));
        let lines_before = machine.gcode().len();
        let time_before = machine.time_s();
        let tow_before = machine.tow_length_m();

        wind_layer(
            &mut machine,
            layer,
            &definition.mandrel_parameters,
            &definition.tow_parameters,
        )
        .map_err(|source| PlanError::Layer { index, source })?;

        let commands = machine.gcode()[lines_before..]
            .iter()
            .filter(|line| !is_comment(line))
            .count();
        debug!(layer = index, commands, "layer planned");
        layers.push(LayerMetrics {
            index,
            wind_type: layer.wind_type(),
            commands,
            time_s: machine.time_s() - time_before,
            tow_m: machine.tow_length_m() - tow_before,
        });
    }

    machine.add_raw_gcode("M2 ; End of program");

    let total_time_s = machine.time_s();
    let total_tow_m = machine.tow_length_m();
    program.extend(machine.into_gcode());
    let commands = sanitize_program(program);
    let commands_total = count_commands(&commands);
    info!(
        commands = commands_total,
        time_s = total_time_s,
        tow_m = total_tow_m,
        "wind planned"
    );

    Ok(PlanResult {
        commands,
        commands_total,
        total_time_s,
        total_tow_m,
        layers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use towpath_core::{HoopLayer, Layer, MandrelParameters, TowParameters};

    fn hoop_definition() -> WindDefinition {
        WindDefinition {
            layers: vec![Layer::Hoop(HoopLayer { terminal: true })],
            mandrel_parameters: MandrelParameters {
                diameter: 70.0,
                wind_length: 100.0,
            },
            tow_parameters: TowParameters {
                width: 7.0,
                thickness: 0.5,
            },
            default_feed_rate: 9000.0,
        }
    }

    #[test]
    fn empty_layer_list_is_fatal() {
        let mut definition = hoop_definition();
        definition.layers.clear();
        assert!(matches!(
            plan_wind(&definition, &PlanOptions::default()),
            Err(PlanError::NoLayers)
        ));
    }

    #[test]
    fn invalid_definition_is_rejected_before_planning() {
        let mut definition = hoop_definition();
        definition.default_feed_rate = 0.0;
        assert!(matches!(
            plan_wind(&definition, &PlanOptions::default()),
            Err(PlanError::InvalidDefinition(_))
        ));
    }

    #[test]
    fn layer_metrics_sum_to_totals() {
        let mut definition = hoop_definition();
        definition.layers = vec![
            Layer::Hoop(HoopLayer { terminal: false }),
            Layer::Hoop(HoopLayer { terminal: true }),
        ];
        let result = plan_wind(&definition, &PlanOptions::default()).unwrap();
        let time: f64 = result.layers.iter().map(|layer| layer.time_s).sum();
        let tow: f64 = result.layers.iter().map(|layer| layer.tow_m).sum();
        assert!((time - result.total_time_s).abs() < 1e-9);
        assert!((tow - result.total_tow_m).abs() < 1e-9);
        assert_eq!(result.layers[0].wind_type, "hoop");
        assert_eq!(result.layers[0].index, 1);
    }
}
