//! Skip layer: re-phase the fiber start point without laying tow.

use towpath_core::{format_number, Axis, SkipLayer};

use crate::error::LayerError;
use crate::machine::{MoveTarget, WinderMachine};

/// Rotate the mandrel by the requested amount with no carriage movement.
/// Tagged as a repositioning move in the output; it is not a winding pass.
pub(crate) fn wind(machine: &mut WinderMachine, layer: &SkipLayer) -> Result<(), LayerError> {
    machine.insert_comment(&format!(
        "Skip: rotating mandrel {} degrees without winding",
        format_number(layer.mandrel_rotation)
    ));
    let angle = machine.position(Axis::Mandrel);
    machine.move_to(MoveTarget::new().mandrel(angle + layer.mandrel_rotation))?;
    Ok(())
}
