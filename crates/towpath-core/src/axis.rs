//! Machine axis model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Controllable axes of the winding machine.
///
/// The winder drives three axes: a linear carriage running along the
/// mandrel, the rotary mandrel itself, and the rotary delivery head that
/// orients the fiber eye. Each axis owns a fixed command letter used in
/// serialized motion commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Linear axis along the mandrel length (mm).
    Carriage,
    /// Rotary mandrel axis (degrees, wraps modulo 360).
    Mandrel,
    /// Rotary delivery head axis (degrees).
    DeliveryHead,
}

impl Axis {
    /// All axes in command serialization order.
    pub const ALL: [Axis; 3] = [Axis::Carriage, Axis::Mandrel, Axis::DeliveryHead];

    /// Command letter used in serialized motion commands.
    pub fn letter(self) -> char {
        match self {
            Axis::Carriage => 'X',
            Axis::Mandrel => 'Y',
            Axis::DeliveryHead => 'Z',
        }
    }

    /// Reverse lookup from a command letter.
    pub fn from_letter(letter: char) -> Option<Axis> {
        match letter.to_ascii_uppercase() {
            'X' => Some(Axis::Carriage),
            'Y' => Some(Axis::Mandrel),
            'Z' => Some(Axis::DeliveryHead),
            _ => None,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Carriage => write!(f, "carriage"),
            Axis::Mandrel => write!(f, "mandrel"),
            Axis::DeliveryHead => write!(f, "delivery head"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn command_letters_are_injective() {
        let mut seen = HashSet::new();
        for axis in Axis::ALL {
            assert!(seen.insert(axis.letter()), "duplicate letter for {axis}");
        }
    }

    #[test]
    fn letter_round_trip() {
        for axis in Axis::ALL {
            assert_eq!(Axis::from_letter(axis.letter()), Some(axis));
        }
        assert_eq!(Axis::from_letter('x'), Some(Axis::Carriage));
        assert_eq!(Axis::from_letter('F'), None);
    }
}
