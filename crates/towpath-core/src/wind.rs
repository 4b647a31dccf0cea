//! Wind definition configuration model.
//!
//! Mirrors the `.wind` JSON schema: camelCase wire names, layers tagged by
//! `windType`. Positivity constraints the wire schema cannot express are
//! checked by [`WindDefinition::validate`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{WindFileError, WindFileResult};

/// Prefix of the program comment carrying the serialized parameter block.
///
/// This is the one channel by which a simulator recovers mandrel geometry
/// from program text, so both sides must agree on it exactly.
pub const PARAMETERS_PREFIX: &str = "; Parameters ";

/// Mandrel geometry. Read-only to the planning core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MandrelParameters {
    /// Outer diameter of the mandrel (mm).
    pub diameter: f64,
    /// Axial length available for winding (mm).
    pub wind_length: f64,
}

/// Tow (fiber bundle) geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TowParameters {
    /// Width of the laid band (mm).
    pub width: f64,
    /// Thickness of the laid band (mm).
    pub thickness: f64,
}

/// Circumferential wrap at the current carriage position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoopLayer {
    /// Marks the wind's last layer; suppresses the trailing index advance.
    #[serde(default)]
    pub terminal: bool,
}

/// Angled multi-pass coverage across the wind length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelicalLayer {
    /// Angle between the fiber path and the mandrel axis (degrees).
    pub wind_angle: f64,
    /// Number of interleaved pattern groups tiling the circumference.
    pub pattern_number: u32,
    /// Pattern-group stride between successive circuits.
    pub skip_index: u32,
    /// Extra rotation pinning the tow at each end of a pass (degrees).
    pub lock_degrees: f64,
    /// Carriage travel over which the delivery head ramps into a pass (mm).
    #[serde(rename = "leadInMM")]
    pub lead_in_mm: f64,
    /// Taper rotation on pass exit (degrees).
    pub lead_out_degrees: f64,
    /// Skip the first circuit's near-end lock when the tow is already
    /// anchored by a preceding layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_initial_near_lock: Option<bool>,
}

/// Mandrel-only rotation used to re-phase the fiber start point. Lays no tow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipLayer {
    /// Signed mandrel rotation (degrees).
    pub mandrel_rotation: f64,
}

/// One entry in the winding sequence.
///
/// Layer order is load-bearing: layers are wound in the order given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "windType", rename_all = "camelCase")]
pub enum Layer {
    Hoop(HoopLayer),
    Helical(HelicalLayer),
    Skip(SkipLayer),
}

impl Layer {
    /// Short type tag used in summaries and metrics.
    pub fn wind_type(&self) -> &'static str {
        match self {
            Layer::Hoop(_) => "hoop",
            Layer::Helical(_) => "helical",
            Layer::Skip(_) => "skip",
        }
    }
}

/// Payload of the `; Parameters` header comment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParametersHeader {
    /// Mandrel geometry snapshot.
    pub mandrel: MandrelParameters,
    /// Tow geometry snapshot.
    pub tow: TowParameters,
}

/// A complete declarative description of a wind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindDefinition {
    /// Ordered winding sequence.
    pub layers: Vec<Layer>,
    pub mandrel_parameters: MandrelParameters,
    pub tow_parameters: TowParameters,
    /// Feed rate active until a layer changes it (mm/min).
    pub default_feed_rate: f64,
}

impl WindDefinition {
    /// Parse a definition from `.wind` JSON text and validate it.
    pub fn from_json(text: &str) -> WindFileResult<Self> {
        let definition: Self = serde_json::from_str(text)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Load a definition from a `.wind` file.
    pub fn from_path(path: impl AsRef<Path>) -> WindFileResult<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Check the positivity constraints the wire schema cannot express.
    pub fn validate(&self) -> WindFileResult<()> {
        require_positive("mandrelParameters.diameter", self.mandrel_parameters.diameter)?;
        require_positive(
            "mandrelParameters.windLength",
            self.mandrel_parameters.wind_length,
        )?;
        require_positive("towParameters.width", self.tow_parameters.width)?;
        require_positive("towParameters.thickness", self.tow_parameters.thickness)?;
        require_positive("defaultFeedRate", self.default_feed_rate)?;
        for (index, layer) in self.layers.iter().enumerate() {
            if let Layer::Helical(helical) = layer {
                require_positive(&format!("layers[{index}].windAngle"), helical.wind_angle)?;
                require_positive(
                    &format!("layers[{index}].patternNumber"),
                    f64::from(helical.pattern_number),
                )?;
                require_positive(
                    &format!("layers[{index}].skipIndex"),
                    f64::from(helical.skip_index),
                )?;
                require_positive(
                    &format!("layers[{index}].lockDegrees"),
                    helical.lock_degrees,
                )?;
                require_positive(&format!("layers[{index}].leadInMM"), helical.lead_in_mm)?;
                require_positive(
                    &format!("layers[{index}].leadOutDegrees"),
                    helical.lead_out_degrees,
                )?;
            }
        }
        Ok(())
    }

    /// Machine-readable parameter snapshot embedded as the program's first
    /// comment line.
    pub fn header_comment(&self) -> String {
        let header = ParametersHeader {
            mandrel: self.mandrel_parameters,
            tow: self.tow_parameters,
        };
        let payload = serde_json::to_string(&header)
            .expect("parameter header serialization cannot fail");
        format!("{PARAMETERS_PREFIX}{payload}")
    }
}

fn require_positive(field: &str, value: f64) -> WindFileResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(WindFileError::InvalidValue {
            field: field.to_string(),
            value,
            reason: "must be positive",
        })
    }
}
