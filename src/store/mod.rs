pub mod mock_store;
pub mod sqlite_store;
pub mod traits;

pub use traits::TuningStore;

use thiserror::Error;

use crate::models::Drivetrain;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    SQLite(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),

    #[error("Differential does not fit a {0} drivetrain")]
    DrivetrainMismatch(Drivetrain),
}
