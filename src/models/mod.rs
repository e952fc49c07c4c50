pub mod request;
pub mod setup;
pub mod tuning;
pub mod vehicle;

pub use request::{AdjustRequest, GenerateRequest};
pub use setup::{NewTuningSetup, StoredTuningSetup};
pub use tuning::{Differential, SetupType, TuningConfiguration};
pub use vehicle::{Aspiration, Drivetrain, EnginePosition, PerformanceProfile, StoredVehicle, Vehicle};
