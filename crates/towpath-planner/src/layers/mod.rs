//! Per-layer toolpath generators.
//!
//! Dispatch is a closed match over the [`Layer`] enum: the variant set is
//! fixed by the domain, and exhaustiveness checking catches a missing arm
//! when a layer type is added. Generators receive the layer parameters,
//! the mandrel/tow geometry, and the machine; the machine mutation surface
//! they may use is `set_feed_rate`, `move_to`, `set_position`,
//! `insert_comment`, and `add_raw_gcode`.

mod helical;
mod hoop;
mod skip;

use towpath_core::{format_number, Layer, MandrelParameters, TowParameters};

use crate::error::LayerError;
use crate::machine::WinderMachine;

/// Generate the toolpath for one layer. All-or-nothing: parameter
/// combinations that cannot produce a valid path fail before any command
/// is emitted.
pub fn wind_layer(
    machine: &mut WinderMachine,
    layer: &Layer,
    mandrel: &MandrelParameters,
    tow: &TowParameters,
) -> Result<(), LayerError> {
    match layer {
        Layer::Hoop(hoop) => hoop::wind(machine, hoop, mandrel, tow),
        Layer::Helical(helical) => helical::wind(machine, helical, mandrel, tow),
        Layer::Skip(skip) => skip::wind(machine, skip),
    }
}

/// One-line human-readable synopsis inserted as a comment before a layer's
/// commands. Informational only; no accounting effect.
pub fn layer_summary(index: usize, total: usize, layer: &Layer) -> String {
    match layer {
        Layer::Hoop(hoop) => format!(
            "Layer {index}/{total}: hoop{}",
            if hoop.terminal { " (terminal)" } else { "" }
        ),
        Layer::Helical(helical) => format!(
            "Layer {index}/{total}: helical at {} degrees, pattern {}, skip {}",
            format_number(helical.wind_angle),
            helical.pattern_number,
            helical.skip_index
        ),
        Layer::Skip(skip) => format!(
            "Layer {index}/{total}: skip {} degrees",
            format_number(skip.mandrel_rotation)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use towpath_core::{HelicalLayer, HoopLayer, SkipLayer};

    #[test]
    fn summaries_name_key_parameters() {
        let hoop = Layer::Hoop(HoopLayer { terminal: true });
        assert_eq!(layer_summary(3, 3, &hoop), "Layer 3/3: hoop (terminal)");

        let helical = Layer::Helical(HelicalLayer {
            wind_angle: 45.0,
            pattern_number: 3,
            skip_index: 2,
            lock_degrees: 5.0,
            lead_in_mm: 10.0,
            lead_out_degrees: 5.0,
            skip_initial_near_lock: None,
        });
        assert_eq!(
            layer_summary(1, 2, &helical),
            "Layer 1/2: helical at 45 degrees, pattern 3, skip 2"
        );

        let skip = Layer::Skip(SkipLayer {
            mandrel_rotation: 90.0,
        });
        assert_eq!(layer_summary(2, 2, &skip), "Layer 2/2: skip 90 degrees");
    }
}
