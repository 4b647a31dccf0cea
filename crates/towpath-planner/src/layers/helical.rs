//! Helical layer: angled multi-pass coverage across the wind length.
//!
//! Coverage model, with the wind angle measured from the mandrel axis: one
//! circuit (an out-and-back pair of passes) lays a band whose
//! circumferential footprint is `tow_width / cos(wind_angle)`. The circuit
//! count is the number of footprints needed to tile the circumference,
//! rounded up to a whole number of pattern groups (overlap is acceptable,
//! gaps are not). Successive circuits advance their start angle by
//! `360 * skip_index / pattern_number` plus one band slot; that advance
//! visits every start position exactly once iff its slot step is coprime
//! with the circuit count, which is validated before any command is
//! emitted.

use std::f64::consts::PI;

use tracing::debug;

use towpath_core::{format_number, Axis, HelicalLayer, MandrelParameters, TowParameters};

use crate::error::LayerError;
use crate::machine::{MoveTarget, WinderMachine};

/// Phase corrections closer than this to zero or a full turn collapse to
/// no rotation.
const PHASE_EPSILON: f64 = 1e-9;

/// Closed-form quantities of one helical layer, derived before emission.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HelicalPlan {
    num_circuits: u32,
    /// Start-angle advance between successive circuits (degrees).
    start_advance_degrees: f64,
    /// Mandrel rotation across one full pass (degrees).
    pass_degrees: f64,
    /// Mandrel share of the lead-in travel (degrees).
    lead_in_degrees: f64,
    /// Delivery head target during a pass (degrees; negated on the return).
    head_angle_degrees: f64,
}

fn plan_layer(
    layer: &HelicalLayer,
    mandrel: &MandrelParameters,
    tow: &TowParameters,
) -> Result<HelicalPlan, LayerError> {
    if !(layer.wind_angle > 0.0 && layer.wind_angle < 90.0) {
        return Err(LayerError::WindAngleOutOfRange {
            angle: layer.wind_angle,
        });
    }
    if layer.lead_in_mm > mandrel.wind_length {
        return Err(LayerError::LeadInTooLong {
            lead_in_mm: layer.lead_in_mm,
            wind_length_mm: mandrel.wind_length,
        });
    }
    if layer.pattern_number == 0 || layer.skip_index == 0 {
        return Err(LayerError::IncompleteCoverage {
            pattern_number: layer.pattern_number,
            skip_index: layer.skip_index,
            circuits: 0,
        });
    }

    let angle_rad = layer.wind_angle.to_radians();
    let circumference = PI * mandrel.diameter;
    let band_advance_mm = tow.width / angle_rad.cos();
    let mut num_circuits = (circumference / band_advance_mm).ceil() as u32;
    num_circuits = num_circuits.max(1);
    let remainder = num_circuits % layer.pattern_number;
    if remainder != 0 {
        num_circuits += layer.pattern_number - remainder;
    }

    // Start positions are num_circuits even slots around the circle; the
    // per-circuit advance steps `circuits/pattern * skip + 1` slots and
    // visits each slot exactly once iff that step is coprime with the
    // slot count.
    let slots = u64::from(num_circuits);
    let slot_step =
        u64::from(num_circuits / layer.pattern_number) * u64::from(layer.skip_index) + 1;
    if gcd(slot_step % slots, slots) != 1 {
        return Err(LayerError::IncompleteCoverage {
            pattern_number: layer.pattern_number,
            skip_index: layer.skip_index,
            circuits: num_circuits,
        });
    }

    Ok(HelicalPlan {
        num_circuits,
        start_advance_degrees: 360.0 * slot_step as f64 / num_circuits as f64,
        pass_degrees: mandrel.wind_length * angle_rad.tan() / circumference * 360.0,
        lead_in_degrees: layer.lead_in_mm * angle_rad.tan() / circumference * 360.0,
        head_angle_degrees: 90.0 - layer.wind_angle,
    })
}

/// Generate the multi-pass helical coverage path. Each circuit runs the
/// carriage there and back across the wind length at the wind angle, locks
/// the tow at both ends, and turns the mandrel onto the next pattern slot.
pub(crate) fn wind(
    machine: &mut WinderMachine,
    layer: &HelicalLayer,
    mandrel: &MandrelParameters,
    tow: &TowParameters,
) -> Result<(), LayerError> {
    let plan = plan_layer(layer, mandrel, tow)?;
    debug!(
        circuits = plan.num_circuits,
        advance = plan.start_advance_degrees,
        "winding helical layer"
    );
    machine.insert_comment(&format!(
        "Helical: {} circuits, start advance {} degrees",
        plan.num_circuits,
        format_number(plan.start_advance_degrees)
    ));

    let near_x = machine.position(Axis::Carriage);
    let far_x = near_x + mandrel.wind_length;
    let skip_first_lock = layer.skip_initial_near_lock.unwrap_or(false);
    let first_lock = if skip_first_lock {
        0.0
    } else {
        layer.lock_degrees
    };
    // Outbound-pass start phase of circuit 0; later circuits advance from it.
    let start_phase = (machine.position(Axis::Mandrel) + first_lock).rem_euclid(360.0);

    for circuit in 0..plan.num_circuits {
        // Near lock pins the tow, and the same rotation absorbs the phase
        // correction aligning this circuit onto its pattern slot.
        let lock = if circuit == 0 && skip_first_lock {
            0.0
        } else {
            layer.lock_degrees
        };
        let angle = machine.position(Axis::Mandrel);
        let target_phase =
            (start_phase + f64::from(circuit) * plan.start_advance_degrees).rem_euclid(360.0);
        let mut correction = (target_phase - (angle + lock)).rem_euclid(360.0);
        if correction < PHASE_EPSILON || correction > 360.0 - PHASE_EPSILON {
            correction = 0.0;
        }
        let alignment = lock + correction;
        if alignment > PHASE_EPSILON {
            machine.move_to(MoveTarget::new().mandrel(angle + alignment))?;
        }

        // Outbound pass: the lead-in ramps the delivery head into the wind
        // angle, then the pass body runs to the far end.
        let angle = machine.position(Axis::Mandrel);
        machine.move_to(
            MoveTarget::new()
                .carriage(near_x + layer.lead_in_mm)
                .mandrel(angle + plan.lead_in_degrees)
                .delivery_head(plan.head_angle_degrees),
        )?;
        let angle = machine.position(Axis::Mandrel);
        machine.move_to(
            MoveTarget::new()
                .carriage(far_x)
                .mandrel(angle + plan.pass_degrees - plan.lead_in_degrees),
        )?;

        // Far turnaround: pure rotation pinning the tow, head back to
        // neutral before the carriage reverses.
        let angle = machine.position(Axis::Mandrel);
        machine.move_to(
            MoveTarget::new()
                .mandrel(angle + layer.lock_degrees + layer.lead_out_degrees)
                .delivery_head(0.0),
        )?;

        // Return pass, mirrored.
        let angle = machine.position(Axis::Mandrel);
        machine.move_to(
            MoveTarget::new()
                .carriage(far_x - layer.lead_in_mm)
                .mandrel(angle + plan.lead_in_degrees)
                .delivery_head(-plan.head_angle_degrees),
        )?;
        let angle = machine.position(Axis::Mandrel);
        machine.move_to(
            MoveTarget::new()
                .carriage(near_x)
                .mandrel(angle + plan.pass_degrees - plan.lead_in_degrees),
        )?;

        // Near taper; the next circuit's alignment supplies the lock.
        let angle = machine.position(Axis::Mandrel);
        machine.move_to(
            MoveTarget::new()
                .mandrel(angle + layer.lead_out_degrees)
                .delivery_head(0.0),
        )?;
    }

    // Trailing lock pins the final pass.
    let angle = machine.position(Axis::Mandrel);
    machine.move_to(MoveTarget::new().mandrel(angle + layer.lock_degrees))?;
    Ok(())
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let remainder = a % b;
        a = b;
        b = remainder;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> (MandrelParameters, TowParameters) {
        (
            MandrelParameters {
                diameter: 70.0,
                wind_length: 100.0,
            },
            TowParameters {
                width: 7.0,
                thickness: 0.5,
            },
        )
    }

    fn layer() -> HelicalLayer {
        HelicalLayer {
            wind_angle: 45.0,
            pattern_number: 3,
            skip_index: 2,
            lock_degrees: 5.0,
            lead_in_mm: 10.0,
            lead_out_degrees: 5.0,
            skip_initial_near_lock: None,
        }
    }

    #[test]
    fn plan_tiles_the_circumference() {
        let (mandrel, tow) = geometry();
        let plan = plan_layer(&layer(), &mandrel, &tow).unwrap();
        // ceil(pi*70 / (7/cos 45)) = 23, rounded up to the pattern multiple.
        assert_eq!(plan.num_circuits, 24);
        // Slot step (24/3)*2 + 1 = 17 of 24 slots.
        assert!((plan.start_advance_degrees - 360.0 * 17.0 / 24.0).abs() < 1e-9);
        // 45 degrees: one wind length of rotation per pass.
        let expected_pass = 100.0 / (PI * 70.0) * 360.0;
        assert!((plan.pass_degrees - expected_pass).abs() < 1e-9);
        assert!((plan.head_angle_degrees - 45.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_degenerate_wind_angles() {
        let (mandrel, tow) = geometry();
        for angle in [0.0, 90.0, -10.0, 120.0] {
            let bad = HelicalLayer {
                wind_angle: angle,
                ..layer()
            };
            assert_eq!(
                plan_layer(&bad, &mandrel, &tow).unwrap_err(),
                LayerError::WindAngleOutOfRange { angle }
            );
        }
    }

    #[test]
    fn rejects_pattern_that_revisits_slots() {
        let (mandrel, tow) = geometry();
        // 24 circuits with stride (24/3)*1 + 1 = 9 shares a factor of 3
        // with the slot count, so a third of the slots are never reached.
        let bad = HelicalLayer {
            skip_index: 1,
            ..layer()
        };
        assert_eq!(
            plan_layer(&bad, &mandrel, &tow).unwrap_err(),
            LayerError::IncompleteCoverage {
                pattern_number: 3,
                skip_index: 1,
                circuits: 24,
            }
        );
    }

    #[test]
    fn rejects_lead_in_longer_than_wind() {
        let (mandrel, tow) = geometry();
        let bad = HelicalLayer {
            lead_in_mm: 150.0,
            ..layer()
        };
        assert!(matches!(
            plan_layer(&bad, &mandrel, &tow).unwrap_err(),
            LayerError::LeadInTooLong { .. }
        ));
    }

    #[test]
    fn failed_validation_emits_nothing() {
        let (mandrel, tow) = geometry();
        let mut machine = WinderMachine::new(mandrel.diameter, false);
        machine.set_feed_rate(9000.0).unwrap();
        let emitted_before = machine.gcode().len();
        let bad = HelicalLayer {
            skip_index: 1,
            ..layer()
        };
        assert!(wind(&mut machine, &bad, &mandrel, &tow).is_err());
        assert_eq!(machine.gcode().len(), emitted_before);
    }

    #[test]
    fn circuits_return_to_the_near_end() {
        let mandrel = MandrelParameters {
            diameter: 10.0,
            wind_length: 5.0,
        };
        let tow = TowParameters {
            width: 5.0,
            thickness: 0.2,
        };
        let small = HelicalLayer {
            wind_angle: 45.0,
            pattern_number: 1,
            skip_index: 1,
            lock_degrees: 5.0,
            lead_in_mm: 1.0,
            lead_out_degrees: 5.0,
            skip_initial_near_lock: None,
        };
        let mut machine = WinderMachine::new(mandrel.diameter, false);
        machine.set_feed_rate(6000.0).unwrap();
        wind(&mut machine, &small, &mandrel, &tow).unwrap();
        assert_eq!(machine.position(Axis::Carriage), 0.0);
        assert_eq!(machine.position(Axis::DeliveryHead), 0.0);
        // The mandrel only ever advances forward.
        assert!(machine.position(Axis::Mandrel) > 0.0);
    }

    #[test]
    fn skip_initial_near_lock_drops_first_alignment() {
        let (mandrel, tow) = geometry();
        let mut locked = WinderMachine::new(mandrel.diameter, false);
        locked.set_feed_rate(9000.0).unwrap();
        wind(&mut locked, &layer(), &mandrel, &tow).unwrap();

        let mut unlocked = WinderMachine::new(mandrel.diameter, false);
        unlocked.set_feed_rate(9000.0).unwrap();
        let skipping = HelicalLayer {
            skip_initial_near_lock: Some(true),
            ..layer()
        };
        wind(&mut unlocked, &skipping, &mandrel, &tow).unwrap();

        // Without the initial lock the first emitted motion is the lead-in,
        // not a pure rotation.
        assert_eq!(locked.gcode()[2], "G0 Y5");
        assert!(unlocked.gcode()[2].starts_with("G0 X"));
        assert_eq!(unlocked.gcode().len(), locked.gcode().len() - 1);
    }
}
