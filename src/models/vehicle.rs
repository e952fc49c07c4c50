use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Drivetrain {
    Rwd,
    Fwd,
    Awd,
}

impl Drivetrain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Drivetrain::Rwd => "RWD",
            Drivetrain::Fwd => "FWD",
            Drivetrain::Awd => "AWD",
        }
    }

    /// Front axle carries a differential (FWD and AWD).
    pub fn has_front_differential(&self) -> bool {
        matches!(self, Drivetrain::Fwd | Drivetrain::Awd)
    }

    pub fn has_center_differential(&self) -> bool {
        matches!(self, Drivetrain::Awd)
    }
}

impl fmt::Display for Drivetrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Drivetrain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RWD" => Ok(Drivetrain::Rwd),
            "FWD" => Ok(Drivetrain::Fwd),
            "AWD" => Ok(Drivetrain::Awd),
            other => Err(format!("unknown drivetrain: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnginePosition {
    Front,
    Mid,
    Rear,
}

impl EnginePosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnginePosition::Front => "Front",
            EnginePosition::Mid => "Mid",
            EnginePosition::Rear => "Rear",
        }
    }
}

impl FromStr for EnginePosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Front" => Ok(EnginePosition::Front),
            "Mid" => Ok(EnginePosition::Mid),
            "Rear" => Ok(EnginePosition::Rear),
            other => Err(format!("unknown engine position: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aspiration {
    #[serde(rename = "NA")]
    NaturallyAspirated,
    Turbo,
    #[serde(rename = "Twin-turbo")]
    TwinTurbo,
    Supercharged,
}

impl Aspiration {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aspiration::NaturallyAspirated => "NA",
            Aspiration::Turbo => "Turbo",
            Aspiration::TwinTurbo => "Twin-turbo",
            Aspiration::Supercharged => "Supercharged",
        }
    }

    pub fn is_turbocharged(&self) -> bool {
        matches!(self, Aspiration::Turbo | Aspiration::TwinTurbo)
    }
}

impl FromStr for Aspiration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NA" => Ok(Aspiration::NaturallyAspirated),
            "Turbo" => Ok(Aspiration::Turbo),
            "Twin-turbo" => Ok(Aspiration::TwinTurbo),
            "Supercharged" => Ok(Aspiration::Supercharged),
            other => Err(format!("unknown aspiration: {other}")),
        }
    }
}

/// Performance attributes of a vehicle as entered on the vehicle form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_weight_split"))]
pub struct PerformanceProfile {
    #[validate(range(min = 1))]
    pub power: i32,
    #[validate(range(min = 1))]
    pub torque: i32,
    #[validate(range(min = 1))]
    pub weight: i32,
    #[validate(range(min = 1, max = 99))]
    pub front_weight: i32,
    #[validate(range(min = 1, max = 99))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rear_weight: Option<i32>,
    #[validate(range(min = 1))]
    pub displacement: i32,
    pub drivetrain: Drivetrain,
    #[validate(length(min = 1))]
    pub category: String,
    #[validate(range(min = 1))]
    #[serde(rename = "pi")]
    pub performance_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_position: Option<EnginePosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspiration: Option<Aspiration>,
    #[validate(range(min = 1, max = 16))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cylinders: Option<i32>,
    #[validate(range(min = 1.0, max = 600.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_top_speed: Option<f64>,
    #[validate(range(min = 0.5, max = 60.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_acceleration: Option<f64>,
}

impl PerformanceProfile {
    /// Rear share of the weight; derived from the front share when not given.
    pub fn rear_weight(&self) -> i32 {
        self.rear_weight.unwrap_or(100 - self.front_weight)
    }
}

fn validate_weight_split(profile: &PerformanceProfile) -> Result<(), ValidationError> {
    match profile.rear_weight {
        Some(rear) if profile.front_weight + rear != 100 => {
            let mut err = ValidationError::new("weight_split");
            err.message = Some("frontWeight + rearWeight must equal 100".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Vehicle {
    #[validate(length(min = 1))]
    pub brand: String,
    #[validate(length(min = 1))]
    pub model: String,
    #[validate(range(min = 1950, max = 2030))]
    pub year: i32,
    #[validate(nested)]
    pub performance: PerformanceProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredVehicle {
    pub id: String,
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub created_at: DateTime<Utc>,
}
