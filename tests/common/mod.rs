#![allow(dead_code)] // each test binary uses a different subset

use axum::Router;
use tuning_service::models::{TuningConfiguration, Vehicle};

pub fn setup_logger(default_level: &str) {
    // tuning_service=debug,sqlx=warn
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn serve(app: Router) -> Result<String, Box<dyn std::error::Error + 'static>> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{}", addr))
}

pub fn supra() -> Vehicle {
    serde_json::from_value(serde_json::json!({
        "brand": "Toyota",
        "model": "Supra",
        "year": 2020,
        "performance": {
            "power": 382,
            "torque": 500,
            "weight": 1539,
            "frontWeight": 54,
            "displacement": 2998,
            "drivetrain": "RWD",
            "category": "S1",
            "pi": 800
        }
    }))
    .unwrap()
}

pub const RWD_TUNING_JSON: &str = r#"{
    "tires": { "frontPressure": 2.1, "rearPressure": 2.0 },
    "gearing": {
        "finalDrive": 3.42, "firstGear": 3.8, "secondGear": 2.4, "thirdGear": 1.7,
        "fourthGear": 1.3, "fifthGear": 1.05, "sixthGear": 0.85
    },
    "alignment": { "frontCamber": -1.5, "rearCamber": -1.0, "frontToe": 0.0, "rearToe": 0.1, "frontCaster": 5.5 },
    "antirollBars": { "front": 22.5, "rear": 18.0 },
    "springs": { "frontStiffness": 110.0, "rearStiffness": 95.5, "frontHeight": 12.0, "rearHeight": 12.5 },
    "damping": {
        "frontReboundStiffness": 9.5, "rearReboundStiffness": 8.8,
        "frontBumpStiffness": 6.0, "rearBumpStiffness": 5.6
    },
    "aero": { "frontDownforce": 120, "rearDownforce": 180 },
    "braking": { "brakeBalance": 52, "brakePressure": 105 },
    "differential": { "rearAccel": 45, "rearDecel": 20 },
    "explanation": "Kuru asfalt için dengeli bir pist kurulumu."
}"#;

pub fn rwd_tuning() -> TuningConfiguration {
    serde_json::from_str(RWD_TUNING_JSON).unwrap()
}
