//! Feed-rate aware simulator for generated winding programs.
//!
//! The simulator replays a finished command sequence from text alone,
//! independently of whatever produced it, and recomputes execution time,
//! travel distance, and tow consumption. It recovers the mandrel geometry
//! from the program's `; Parameters` header comment; nothing else about
//! the producing machine is assumed.

use std::f64::consts::PI;

use tracing::debug;

use towpath_core::{Axis, ParametersHeader, MOTION_OPCODES, PARAMETERS_PREFIX};

use crate::error::SimulationError;

/// Fallback feed rate used until the program sets one (mm/min).
pub const DEFAULT_FEED_RATE_MMPM: f64 = 6000.0;

/// Absolute tolerance below which a displacement counts as zero. Kept
/// well under the serialized coordinate precision so any move a planner
/// accounted is also accounted here.
const ZERO_TOLERANCE: f64 = 1e-6;

/// Physical metrics recovered by replaying a program's text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationResult {
    /// Lines executed, comments included.
    pub commands_executed: usize,
    /// Motion commands that produced accountable displacement.
    pub moves: usize,
    /// Estimated execution time (seconds).
    pub estimated_time_s: f64,
    /// Carriage travel plus mandrel surface arc (mm).
    pub total_distance_mm: f64,
    /// Tow consumed (mm).
    pub tow_length_mm: f64,
    /// Distance over time when any time elapsed, otherwise the last
    /// active feed rate (mm/min).
    pub average_feed_rate_mmpm: f64,
}

/// Estimate execution time and tow usage for a program.
///
/// Pure function of the command sequence and the fallback feed rate:
/// simulating the same input twice yields identical results.
pub fn simulate_program<I, S>(
    commands: I,
    default_feed_rate: f64,
) -> Result<SimulationResult, SimulationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let program: Vec<String> = commands
        .into_iter()
        .map(|line| line.as_ref().to_string())
        .collect();
    if program.is_empty() {
        return Err(SimulationError::EmptyProgram);
    }
    if default_feed_rate <= 0.0 {
        return Err(SimulationError::NonPositiveDefaultFeedRate {
            rate: default_feed_rate,
        });
    }

    let header = extract_header(&program)?;
    let mandrel_circumference = PI * header.mandrel.diameter;

    let mut feed_rate = default_feed_rate;
    let mut last = [0.0_f64; 3];
    let mut commands_executed = 0_usize;
    let mut moves = 0_usize;
    let mut total_distance = 0.0_f64;
    let mut tow_length = 0.0_f64;
    let mut total_time = 0.0_f64;

    for (index, raw_line) in program.iter().enumerate() {
        let line_number = index + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with(';') {
            commands_executed += 1;
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(opcode) = tokens.next() else {
            continue;
        };
        commands_executed += 1;

        if !MOTION_OPCODES.contains(&opcode) {
            // Control commands carry no motion but may still set the feed
            // rate for subsequent moves.
            for token in tokens {
                if let Some(value) = token.strip_prefix('F') {
                    feed_rate = parse_number(value, line_number, token)?;
                }
            }
            continue;
        }

        let mut next = last;
        for token in tokens {
            let Some(letter) = token.chars().next() else {
                continue;
            };
            let value = &token[letter.len_utf8()..];
            if letter == 'F' {
                feed_rate = parse_number(value, line_number, token)?;
            } else if let Some(axis) = Axis::from_letter(letter) {
                next[axis_slot(axis)] = parse_number(value, line_number, token)?;
            }
        }

        let carriage_delta = next[0] - last[0];
        let mandrel_arc = (next[1] - last[1]) / 360.0 * mandrel_circumference;
        let delivery_delta = next[2] - last[2];
        last = next;

        let distance_sq = carriage_delta * carriage_delta + mandrel_arc * mandrel_arc;
        let tow_sq = carriage_delta * carriage_delta + mandrel_arc * mandrel_arc;
        let distance = distance_sq.sqrt();
        if distance < ZERO_TOLERANCE && delivery_delta.abs() < ZERO_TOLERANCE {
            continue;
        }

        if feed_rate <= 0.0 {
            return Err(SimulationError::NonPositiveFeedRate { line_number });
        }
        total_time += distance / feed_rate * 60.0;
        total_distance += distance;
        tow_length += tow_sq.sqrt();
        moves += 1;
    }

    let average_feed_rate = if total_time > 0.0 {
        total_distance / total_time * 60.0
    } else {
        feed_rate
    };
    debug!(
        commands = commands_executed,
        moves,
        time_s = total_time,
        "program simulated"
    );

    Ok(SimulationResult {
        commands_executed,
        moves,
        estimated_time_s: total_time,
        total_distance_mm: total_distance,
        tow_length_mm: tow_length,
        average_feed_rate_mmpm: average_feed_rate,
    })
}

fn axis_slot(axis: Axis) -> usize {
    match axis {
        Axis::Carriage => 0,
        Axis::Mandrel => 1,
        Axis::DeliveryHead => 2,
    }
}

/// Scan for the `; Parameters` comment and decode its geometry payload.
fn extract_header(program: &[String]) -> Result<ParametersHeader, SimulationError> {
    for line in program {
        if let Some(payload) = line.trim().strip_prefix(PARAMETERS_PREFIX) {
            return serde_json::from_str(payload).map_err(SimulationError::MalformedHeader);
        }
    }
    Err(SimulationError::MissingHeader)
}

fn parse_number(value: &str, line_number: usize, token: &str) -> Result<f64, SimulationError> {
    value
        .parse()
        .map_err(|_| SimulationError::MalformedToken {
            line_number,
            token: token.to_string(),
        })
}
