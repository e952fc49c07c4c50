use serde::{Deserialize, Deserializer, Serialize, de};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::vehicle::Drivetrain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetupType {
    Circuit,
    Rally,
    Drift,
    Drag,
    Offroad,
    Cruise,
    General,
}

impl SetupType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetupType::Circuit => "Circuit",
            SetupType::Rally => "Rally",
            SetupType::Drift => "Drift",
            SetupType::Drag => "Drag",
            SetupType::Offroad => "Offroad",
            SetupType::Cruise => "Cruise",
            SetupType::General => "General",
        }
    }

    /// Label used inside the Turkish instruction text.
    pub fn label(&self) -> &'static str {
        match self {
            SetupType::Circuit => "Pist",
            SetupType::Rally => "Ralli",
            SetupType::Drift => "Drift",
            SetupType::Drag => "Drag",
            SetupType::Offroad => "Offroad",
            SetupType::Cruise => "Cruise",
            SetupType::General => "Genel",
        }
    }
}

impl std::str::FromStr for SetupType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Circuit" => Ok(SetupType::Circuit),
            "Rally" => Ok(SetupType::Rally),
            "Drift" => Ok(SetupType::Drift),
            "Drag" => Ok(SetupType::Drag),
            "Offroad" => Ok(SetupType::Offroad),
            "Cruise" => Ok(SetupType::Cruise),
            "General" => Ok(SetupType::General),
            other => Err(format!("unknown setup type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TireCompound {
    Stock,
    Street,
    Sport,
    Race,
    Drag,
    Rally,
    Drift,
    Offroad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpringType {
    Stock,
    Race,
    Rally,
    Drift,
    Offroad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrakeType {
    Stock,
    Street,
    Race,
    Rally,
    Drift,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffType {
    Stock,
    Race,
    Rally,
    Drift,
    Offroad,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Tires {
    #[validate(range(min = 1.0, max = 3.5))]
    pub front_pressure: f64,
    #[validate(range(min = 1.0, max = 3.5))]
    pub rear_pressure: f64,
    #[validate(range(min = 100.0, max = 405.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_width: Option<f64>,
    #[validate(range(min = 100.0, max = 405.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rear_width: Option<f64>,
    #[validate(range(min = 20.0, max = 85.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_profile: Option<f64>,
    #[validate(range(min = 20.0, max = 85.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rear_profile: Option<f64>,
    #[validate(range(min = 13.0, max = 24.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_rim_size: Option<f64>,
    #[validate(range(min = 13.0, max = 24.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rear_rim_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compound: Option<TireCompound>,
}

/// Counts and upgrade levels arrive as any JSON number; `2.0` is as good as
/// `2`, while `2.5` is not a level at all.
fn whole_number<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return Err(de::Error::custom(format!(
            "expected a whole number, got {value}"
        )));
    }
    Ok(Some(value as i32))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Gearing {
    #[validate(range(min = 2.0, max = 6.1))]
    pub final_drive: f64,
    #[validate(range(min = 0.45, max = 6.5))]
    pub first_gear: f64,
    #[validate(range(min = 0.45, max = 6.5))]
    pub second_gear: f64,
    #[validate(range(min = 0.45, max = 6.5))]
    pub third_gear: f64,
    #[validate(range(min = 0.45, max = 6.5))]
    pub fourth_gear: f64,
    #[validate(range(min = 0.45, max = 6.5))]
    pub fifth_gear: f64,
    #[validate(range(min = 0.45, max = 6.5))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sixth_gear: Option<f64>,
    #[validate(range(min = 0.45, max = 6.5))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seventh_gear: Option<f64>,
    #[validate(range(min = 0.45, max = 6.5))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eighth_gear: Option<f64>,
    #[validate(range(min = 0.45, max = 6.5))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ninth_gear: Option<f64>,
    #[validate(range(min = 0.45, max = 6.5))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenth_gear: Option<f64>,
    #[validate(range(min = 2, max = 10))]
    #[serde(
        default,
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub gear_count: Option<i32>,
    #[validate(range(min = 50.0, max = 600.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_speed: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Alignment {
    #[validate(range(min = -5.0, max = 5.0))]
    pub front_camber: f64,
    #[validate(range(min = -5.0, max = 5.0))]
    pub rear_camber: f64,
    #[validate(range(min = -5.0, max = 5.0))]
    pub front_toe: f64,
    #[validate(range(min = -5.0, max = 5.0))]
    pub rear_toe: f64,
    #[validate(range(min = 1.0, max = 7.0))]
    pub front_caster: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AntirollBars {
    #[validate(range(min = 1.0, max = 65.0))]
    pub front: f64,
    #[validate(range(min = 1.0, max = 65.0))]
    pub rear: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Springs {
    #[validate(range(min = 1.0, max = 500.0))]
    pub front_stiffness: f64,
    #[validate(range(min = 1.0, max = 500.0))]
    pub rear_stiffness: f64,
    #[validate(range(min = 1.0, max = 50.0))]
    pub front_height: f64,
    #[validate(range(min = 1.0, max = 50.0))]
    pub rear_height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spring_type: Option<SpringType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Damping {
    #[validate(range(min = 1.0, max = 20.0))]
    pub front_rebound_stiffness: f64,
    #[validate(range(min = 1.0, max = 20.0))]
    pub rear_rebound_stiffness: f64,
    #[validate(range(min = 1.0, max = 20.0))]
    pub front_bump_stiffness: f64,
    #[validate(range(min = 1.0, max = 20.0))]
    pub rear_bump_stiffness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Aero {
    #[validate(range(min = 0.0, max = 1000.0))]
    pub front_downforce: f64,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub rear_downforce: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Braking {
    #[validate(range(min = 0.0, max = 100.0))]
    pub brake_balance: f64,
    #[validate(range(min = 50.0, max = 200.0))]
    pub brake_pressure: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brake_type: Option<BrakeType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RwdDifferential {
    #[validate(range(min = 0.0, max = 100.0))]
    pub rear_accel: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub rear_decel: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_type: Option<DiffType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FwdDifferential {
    #[validate(range(min = 0.0, max = 100.0))]
    pub front_accel: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub front_decel: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub rear_accel: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub rear_decel: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_type: Option<DiffType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AwdDifferential {
    #[validate(range(min = 0.0, max = 100.0))]
    pub front_accel: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub front_decel: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub rear_accel: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub rear_decel: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub center: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_type: Option<DiffType>,
}

/// Differential settings, shaped by the drivetrain.
///
/// On the wire this is a flat object; the variant is picked from the fields
/// present, trying the widest shape first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Differential {
    Awd(AwdDifferential),
    Fwd(FwdDifferential),
    Rwd(RwdDifferential),
}

impl Differential {
    pub fn drivetrain(&self) -> Drivetrain {
        match self {
            Differential::Awd(_) => Drivetrain::Awd,
            Differential::Fwd(_) => Drivetrain::Fwd,
            Differential::Rwd(_) => Drivetrain::Rwd,
        }
    }

    /// Narrows the settings to what `drivetrain` supports.
    ///
    /// Returns `None` when a field the drivetrain requires is missing.
    pub fn conform_to(self, drivetrain: Drivetrain) -> Option<Differential> {
        match (self, drivetrain) {
            (Differential::Awd(d), Drivetrain::Awd) => Some(Differential::Awd(d)),
            (Differential::Awd(d), Drivetrain::Fwd) => Some(Differential::Fwd(FwdDifferential {
                front_accel: d.front_accel,
                front_decel: d.front_decel,
                rear_accel: d.rear_accel,
                rear_decel: d.rear_decel,
                diff_type: d.diff_type,
            })),
            (Differential::Awd(d), Drivetrain::Rwd) => Some(Differential::Rwd(RwdDifferential {
                rear_accel: d.rear_accel,
                rear_decel: d.rear_decel,
                diff_type: d.diff_type,
            })),
            (Differential::Fwd(d), Drivetrain::Fwd) => Some(Differential::Fwd(d)),
            (Differential::Fwd(d), Drivetrain::Rwd) => Some(Differential::Rwd(RwdDifferential {
                rear_accel: d.rear_accel,
                rear_decel: d.rear_decel,
                diff_type: d.diff_type,
            })),
            (Differential::Rwd(d), Drivetrain::Rwd) => Some(Differential::Rwd(d)),
            _ => None,
        }
    }
}

impl Validate for Differential {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Differential::Awd(d) => d.validate(),
            Differential::Fwd(d) => d.validate(),
            Differential::Rwd(d) => d.validate(),
        }
    }
}

fn validate_differential(differential: &Differential) -> Result<(), ValidationError> {
    differential.validate().map_err(|errors| {
        let mut err = ValidationError::new("differential_range");
        err.message = Some(errors.to_string().into());
        err
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EngineUpgrades {
    #[validate(range(min = 0, max = 5))]
    #[serde(
        default,
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub intake_level: Option<i32>,
    #[validate(range(min = 0, max = 5))]
    #[serde(
        default,
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub exhaust_level: Option<i32>,
    #[validate(range(min = 0, max = 5))]
    #[serde(
        default,
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub camshaft_level: Option<i32>,
    #[validate(range(min = 0, max = 5))]
    #[serde(
        default,
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub valves_level: Option<i32>,
    #[validate(range(min = 0, max = 5))]
    #[serde(
        default,
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub engine_block_level: Option<i32>,
    #[validate(range(min = 0, max = 5))]
    #[serde(
        default,
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub piston_level: Option<i32>,
    #[validate(range(min = 0, max = 5))]
    #[serde(
        default,
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub turbo_level: Option<i32>,
    #[validate(range(min = 0, max = 5))]
    #[serde(
        default,
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub intercooler_level: Option<i32>,
    #[validate(range(min = 0, max = 5))]
    #[serde(
        default,
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub oil_level: Option<i32>,
    #[validate(range(min = 0, max = 5))]
    #[serde(
        default,
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub fly_wheel_level: Option<i32>,
    #[validate(range(min = 0, max = 5))]
    #[serde(
        default,
        deserialize_with = "whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub ignition_level: Option<i32>,
}

/// A complete tuning sheet as returned by the model and stored with a setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TuningConfiguration {
    #[validate(nested)]
    pub tires: Tires,
    #[validate(nested)]
    pub gearing: Gearing,
    #[validate(nested)]
    pub alignment: Alignment,
    #[validate(nested)]
    pub antiroll_bars: AntirollBars,
    #[validate(nested)]
    pub springs: Springs,
    #[validate(nested)]
    pub damping: Damping,
    #[validate(nested)]
    pub aero: Aero,
    #[validate(nested)]
    pub braking: Braking,
    #[validate(custom(function = "validate_differential"))]
    pub differential: Differential,
    #[validate(nested)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineUpgrades>,
    pub explanation: String,
}
