//! Kinematic model of the winding machine.
//!
//! [`WinderMachine`] turns axis-target requests into discretized motion
//! commands while tracking position, feed rate, elapsed time, and tow
//! consumption. One machine instance is owned exclusively by one planning
//! run and discarded after its command sequence is extracted.

use std::f64::consts::PI;

use tracing::debug;

use towpath_core::{format_number, Axis};

use crate::error::MachineError;

/// Carriage displacements below this threshold are treated as rotary-only
/// moves and are not segmented.
const CARRIAGE_EPSILON: f64 = 1e-6;

/// Partial axis-target request: axes not set hold their last position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveTarget {
    carriage_mm: Option<f64>,
    mandrel_degrees: Option<f64>,
    delivery_head_degrees: Option<f64>,
}

impl MoveTarget {
    /// An empty target; combine with the axis setters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a carriage position (mm).
    pub fn carriage(mut self, mm: f64) -> Self {
        self.carriage_mm = Some(mm);
        self
    }

    /// Request a mandrel angle (degrees, absolute and unbounded).
    pub fn mandrel(mut self, degrees: f64) -> Self {
        self.mandrel_degrees = Some(degrees);
        self
    }

    /// Request a delivery head angle (degrees).
    pub fn delivery_head(mut self, degrees: f64) -> Self {
        self.delivery_head_degrees = Some(degrees);
        self
    }

    /// Requested value for `axis`, if any.
    pub fn get(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::Carriage => self.carriage_mm,
            Axis::Mandrel => self.mandrel_degrees,
            Axis::DeliveryHead => self.delivery_head_degrees,
        }
    }

    fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::Carriage => self.carriage_mm = Some(value),
            Axis::Mandrel => self.mandrel_degrees = Some(value),
            Axis::DeliveryHead => self.delivery_head_degrees = Some(value),
        }
    }
}

/// Stateful kinematic model of the physical winder.
///
/// Positions always reflect the last emitted command's target, never an
/// intermediate segment. Elapsed time and tow length are monotonically
/// non-decreasing.
pub struct WinderMachine {
    mandrel_diameter_mm: f64,
    verbose: bool,
    gcode: Vec<String>,
    feed_rate_mmpm: f64,
    total_time_s: f64,
    total_tow_length_mm: f64,
    carriage_mm: f64,
    mandrel_degrees: f64,
    delivery_head_degrees: f64,
}

impl WinderMachine {
    /// Create a machine bound to a mandrel diameter. `verbose` adds
    /// move-trace comments to the emitted program.
    pub fn new(mandrel_diameter_mm: f64, verbose: bool) -> Self {
        Self {
            mandrel_diameter_mm,
            verbose,
            gcode: Vec::new(),
            feed_rate_mmpm: 0.0,
            total_time_s: 0.0,
            total_tow_length_mm: 0.0,
            carriage_mm: 0.0,
            mandrel_degrees: 0.0,
            delivery_head_degrees: 0.0,
        }
    }

    /// Commands emitted so far. The machine cannot be mutated through the
    /// returned view.
    pub fn gcode(&self) -> &[String] {
        &self.gcode
    }

    /// Consume the machine and take its command sequence.
    pub fn into_gcode(self) -> Vec<String> {
        self.gcode
    }

    /// Last commanded target for `axis`.
    pub fn position(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Carriage => self.carriage_mm,
            Axis::Mandrel => self.mandrel_degrees,
            Axis::DeliveryHead => self.delivery_head_degrees,
        }
    }

    /// Estimated execution time of the emitted program (seconds).
    pub fn time_s(&self) -> f64 {
        self.total_time_s
    }

    /// Tow consumed by the emitted program (meters).
    pub fn tow_length_m(&self) -> f64 {
        self.total_tow_length_mm / 1000.0
    }

    /// Append a raw command line without accounting.
    pub fn add_raw_gcode(&mut self, command: impl Into<String>) {
        self.gcode.push(command.into());
    }

    /// Append a comment line without accounting.
    pub fn insert_comment(&mut self, text: &str) {
        self.gcode.push(format!("; {text}"));
    }

    /// Record the active feed rate and emit the feed-rate command. All
    /// subsequent moves use this rate until changed.
    pub fn set_feed_rate(&mut self, feed_rate_mmpm: f64) -> Result<(), MachineError> {
        if feed_rate_mmpm <= 0.0 {
            return Err(MachineError::NonPositiveFeedRate {
                rate: feed_rate_mmpm,
            });
        }
        self.feed_rate_mmpm = feed_rate_mmpm;
        self.gcode.push(format!("G0 F{}", format_number(feed_rate_mmpm)));
        Ok(())
    }

    /// Move to `target`. Axes not mentioned hold their last position.
    ///
    /// Rotary-only moves are emitted as a single command. Moves with a
    /// carriage displacement are discretized into `round(|delta|) + 1`
    /// equal sub-steps, every requested axis linearly interpolated, so the
    /// controller's own interpolation cannot wander off the mandrel
    /// surface path. The final sub-step's target is exactly `target`.
    pub fn move_to(&mut self, target: MoveTarget) -> Result<(), MachineError> {
        if self.feed_rate_mmpm <= 0.0 {
            return Err(MachineError::FeedRateNotSet);
        }

        let start = self.full_position();
        let mut end = start;
        for axis in Axis::ALL {
            if let Some(value) = target.get(axis) {
                end.set(axis, value);
            }
        }

        let carriage_delta =
            (end.carriage_mm.unwrap_or(0.0) - start.carriage_mm.unwrap_or(0.0)).abs();
        if carriage_delta < CARRIAGE_EPSILON {
            if self.verbose {
                let note = format!("Move {} -> {}", describe(&start), describe(&end));
                self.insert_comment(&note);
            }
            self.emit_segment(target);
            return Ok(());
        }

        let num_segments = carriage_delta.round() as usize + 1;
        if self.verbose {
            let note = format!(
                "Segmented move {} -> {} in {num_segments} steps",
                describe(&start),
                describe(&end)
            );
            self.insert_comment(&note);
        }
        debug!(segments = num_segments, "segmenting carriage move");

        for step in 1..=num_segments {
            let segment = if step == num_segments {
                end
            } else {
                let t = step as f64 / num_segments as f64;
                lerp(&start, &end, t)
            };
            self.emit_segment(segment);
        }
        Ok(())
    }

    /// Redefine the current position without motion or accounting.
    pub fn set_position(&mut self, target: MoveTarget) {
        let mut command = String::from("G92");
        for axis in Axis::ALL {
            if let Some(value) = target.get(axis) {
                command.push(' ');
                command.push(axis.letter());
                command.push_str(&format_number(value));
                self.store(axis, value);
            }
        }
        self.gcode.push(command);
    }

    /// Establish a known angular reference: redefine the current pose with
    /// the mandrel angle normalized into [0, 360), run one full physical
    /// mandrel turn to align home, then re-zero the mandrel. The full turn
    /// is real motion and is accounted; the redefinitions are free.
    pub fn zero_axes(&mut self, current_angle_degrees: f64) -> Result<(), MachineError> {
        self.set_position(
            MoveTarget::new()
                .carriage(0.0)
                .mandrel(current_angle_degrees.rem_euclid(360.0))
                .delivery_head(0.0),
        );
        self.move_to(MoveTarget::new().mandrel(360.0))?;
        self.set_position(MoveTarget::new().mandrel(0.0));
        Ok(())
    }

    fn full_position(&self) -> MoveTarget {
        MoveTarget::new()
            .carriage(self.carriage_mm)
            .mandrel(self.mandrel_degrees)
            .delivery_head(self.delivery_head_degrees)
    }

    fn store(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::Carriage => self.carriage_mm = value,
            Axis::Mandrel => self.mandrel_degrees = value,
            Axis::DeliveryHead => self.delivery_head_degrees = value,
        }
    }

    /// Emit one motion command for the axes present in `target`, accounting
    /// its distance, time, and tow usage.
    ///
    /// Distance lives in (carriage mm, mandrel surface arc mm) space: the
    /// mandrel's angular displacement converts to arc length via the bound
    /// diameter, and the delivery head contributes to neither distance nor
    /// tow.
    fn emit_segment(&mut self, target: MoveTarget) {
        let mut command = String::from("G0");
        let mut distance_sq = 0.0;
        let mut tow_sq = 0.0;
        for axis in Axis::ALL {
            let Some(value) = target.get(axis) else {
                continue;
            };
            command.push(' ');
            command.push(axis.letter());
            command.push_str(&format_number(value));
            let delta = value - self.position(axis);
            match axis {
                Axis::Carriage => {
                    distance_sq += delta * delta;
                    tow_sq += delta * delta;
                }
                Axis::Mandrel => {
                    let arc = delta / 360.0 * PI * self.mandrel_diameter_mm;
                    distance_sq += arc * arc;
                    tow_sq += arc * arc;
                }
                Axis::DeliveryHead => {}
            }
            self.store(axis, value);
        }
        self.total_time_s += distance_sq.sqrt() / self.feed_rate_mmpm * 60.0;
        self.total_tow_length_mm += tow_sq.sqrt();
        self.gcode.push(command);
    }
}

fn lerp(start: &MoveTarget, end: &MoveTarget, t: f64) -> MoveTarget {
    let mut target = MoveTarget::new();
    for axis in Axis::ALL {
        let from = start.get(axis).unwrap_or(0.0);
        let to = end.get(axis).unwrap_or(0.0);
        target.set(axis, from + (to - from) * t);
    }
    target
}

fn describe(position: &MoveTarget) -> String {
    let mut parts = Vec::with_capacity(Axis::ALL.len());
    for axis in Axis::ALL {
        if let Some(value) = position.get(axis) {
            parts.push(format!("{}{}", axis.letter(), format_number(value)));
        }
    }
    parts.join(" ")
}
