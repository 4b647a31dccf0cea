//! Hoop layer: circumferential wrap at the current carriage position.

use towpath_core::{Axis, HoopLayer, MandrelParameters, TowParameters};

use crate::error::LayerError;
use crate::machine::{MoveTarget, WinderMachine};

/// Wrap the tow one full turn around the mandrel. Non-terminal layers end
/// with an index advance of one tow width so the next layer starts beside
/// the laid band; a terminal layer leaves the carriage where it is.
pub(crate) fn wind(
    machine: &mut WinderMachine,
    layer: &HoopLayer,
    _mandrel: &MandrelParameters,
    tow: &TowParameters,
) -> Result<(), LayerError> {
    let angle = machine.position(Axis::Mandrel);
    machine.move_to(MoveTarget::new().mandrel(angle + 360.0))?;

    if !layer.terminal {
        let carriage = machine.position(Axis::Carriage);
        machine.move_to(MoveTarget::new().carriage(carriage + tow.width))?;
    }
    Ok(())
}
