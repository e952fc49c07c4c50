use chrono::{DateTime, Utc};
use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::models::{
    Drivetrain, NewTuningSetup, PerformanceProfile, StoredTuningSetup, StoredVehicle, TuningConfiguration,
    Vehicle,
};
use crate::store::{StoreError, TuningStore};

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS vehicles (
        id TEXT PRIMARY KEY,
        brand TEXT NOT NULL,
        model TEXT NOT NULL,
        year INTEGER NOT NULL,
        created_at INTEGER NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vehicle_performance (
        vehicle_id TEXT PRIMARY KEY REFERENCES vehicles(id),
        power INTEGER NOT NULL,
        torque INTEGER NOT NULL,
        weight INTEGER NOT NULL,
        front_weight INTEGER NOT NULL,
        rear_weight INTEGER NOT NULL CHECK (front_weight + rear_weight = 100),
        displacement INTEGER NOT NULL,
        drivetrain TEXT NOT NULL,
        category TEXT NOT NULL,
        pi INTEGER NOT NULL,
        engine_position TEXT,
        aspiration TEXT,
        cylinders INTEGER,
        stock_top_speed REAL,
        stock_acceleration REAL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tuning_setups (
        id TEXT PRIMARY KEY,
        vehicle_id TEXT NOT NULL REFERENCES vehicles(id),
        name TEXT NOT NULL,
        prompt TEXT NOT NULL,
        setup_type TEXT,
        tuning TEXT NOT NULL,
        explanation TEXT NOT NULL,
        created_at INTEGER NOT NULL
    );
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_tuning_setups_vehicle ON tuning_setups (vehicle_id);
    "#,
];

const SELECT_VEHICLES: &str = r#"
    SELECT
        v.id, v.brand, v.model, v.year, v.created_at,
        p.power, p.torque, p.weight, p.front_weight, p.rear_weight, p.displacement,
        p.drivetrain, p.category, p.pi, p.engine_position, p.aspiration, p.cylinders,
        p.stock_top_speed, p.stock_acceleration
    FROM vehicles v
    JOIN vehicle_performance p ON p.vehicle_id = v.id
"#;

#[derive(Debug)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

#[derive(Debug, sqlx::FromRow)]
struct VehicleRow {
    id: String,
    brand: String,
    model: String,
    year: i32,
    created_at: i64,
    power: i32,
    torque: i32,
    weight: i32,
    front_weight: i32,
    rear_weight: i32,
    displacement: i32,
    drivetrain: String,
    category: String,
    pi: i32,
    engine_position: Option<String>,
    aspiration: Option<String>,
    cylinders: Option<i32>,
    stock_top_speed: Option<f64>,
    stock_acceleration: Option<f64>,
}

#[derive(Debug, sqlx::FromRow)]
struct SetupRow {
    id: String,
    vehicle_id: String,
    name: String,
    prompt: String,
    setup_type: Option<String>,
    tuning: String,
    explanation: String,
    created_at: i64,
}

fn timestamp(micros: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::<Utc>::from_timestamp_micros(micros)
        .ok_or_else(|| StoreError::Corrupt(format!("invalid timestamp {micros}")))
}

fn parse_column<T: FromStr<Err = String>>(value: &str) -> Result<T, StoreError> {
    value.parse().map_err(StoreError::Corrupt)
}

impl TryFrom<VehicleRow> for StoredVehicle {
    type Error = StoreError;

    fn try_from(row: VehicleRow) -> Result<Self, Self::Error> {
        Ok(StoredVehicle {
            id: row.id,
            created_at: timestamp(row.created_at)?,
            vehicle: Vehicle {
                brand: row.brand,
                model: row.model,
                year: row.year,
                performance: PerformanceProfile {
                    power: row.power,
                    torque: row.torque,
                    weight: row.weight,
                    front_weight: row.front_weight,
                    rear_weight: Some(row.rear_weight),
                    displacement: row.displacement,
                    drivetrain: parse_column(&row.drivetrain)?,
                    category: row.category,
                    performance_index: row.pi,
                    engine_position: row.engine_position.as_deref().map(parse_column).transpose()?,
                    aspiration: row.aspiration.as_deref().map(parse_column).transpose()?,
                    cylinders: row.cylinders,
                    stock_top_speed: row.stock_top_speed,
                    stock_acceleration: row.stock_acceleration,
                },
            },
        })
    }
}

impl TryFrom<SetupRow> for StoredTuningSetup {
    type Error = StoreError;

    fn try_from(row: SetupRow) -> Result<Self, Self::Error> {
        let tuning: TuningConfiguration = serde_json::from_str(&row.tuning)?;
        Ok(StoredTuningSetup {
            id: row.id,
            vehicle_id: row.vehicle_id,
            name: row.name,
            prompt: row.prompt,
            setup_type: row.setup_type.as_deref().map(parse_column).transpose()?,
            tuning,
            explanation: row.explanation,
            created_at: timestamp(row.created_at)?,
        })
    }
}

impl SqliteStore {
    #[instrument(skip(configure))]
    pub async fn with_builder<F>(url: &str, configure: F) -> Result<Self, StoreError>
    where
        F: FnOnce(SqlitePoolOptions) -> SqlitePoolOptions,
    {
        debug!("Attempting to connect to SQLite at: {}", url);

        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let builder = configure(SqlitePoolOptions::new());
        let pool = builder.connect_with(options).await?;

        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }

        info!("SQLite store initialized successfully.");

        Ok(Self { pool })
    }

    /// In-memory store on a single connection, so every query sees the schema.
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::with_builder("sqlite::memory:", |b| b.max_connections(1)).await
    }
}

impl TuningStore for SqliteStore {
    #[instrument(skip(self, vehicle), fields(brand = %vehicle.brand, model = %vehicle.model))]
    async fn create_vehicle(&self, vehicle: Vehicle) -> Result<StoredVehicle, StoreError> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let mut vehicle = vehicle;
        vehicle.performance.rear_weight = Some(vehicle.performance.rear_weight());
        let p = &vehicle.performance;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO vehicles (id, brand, model, year, created_at)
            VALUES (?, ?, ?, ?, ?);
            "#,
        )
        .bind(&id)
        .bind(&vehicle.brand)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(created_at.timestamp_micros())
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO vehicle_performance (
                vehicle_id, power, torque, weight, front_weight, rear_weight, displacement,
                drivetrain, category, pi, engine_position, aspiration, cylinders,
                stock_top_speed, stock_acceleration
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?);
            "#,
        )
        .bind(&id)
        .bind(p.power)
        .bind(p.torque)
        .bind(p.weight)
        .bind(p.front_weight)
        .bind(p.rear_weight())
        .bind(p.displacement)
        .bind(p.drivetrain.as_str())
        .bind(&p.category)
        .bind(p.performance_index)
        .bind(p.engine_position.map(|e| e.as_str()))
        .bind(p.aspiration.map(|a| a.as_str()))
        .bind(p.cylinders)
        .bind(p.stock_top_speed)
        .bind(p.stock_acceleration)
        .execute(&mut *tx)
        .await?;

        tx.commit().await.map_err(|e| {
            error!("SQLite commit failed for vehicle {}: {}", id, e);
            StoreError::SQLite(e)
        })?;

        debug!("SQLite stored vehicle {}", id);
        Ok(StoredVehicle {
            id,
            vehicle,
            created_at: timestamp(created_at.timestamp_micros())?,
        })
    }

    #[instrument(skip(self))]
    async fn list_vehicles(&self) -> Result<Vec<StoredVehicle>, StoreError> {
        let query = format!("{SELECT_VEHICLES} ORDER BY v.created_at DESC, v.rowid DESC");
        let rows = sqlx::query_as::<_, VehicleRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("SQLite vehicle listing failed: {}", e);
                StoreError::SQLite(e)
            })?;

        debug!("SQLite listed {} vehicles", rows.len());
        rows.into_iter().map(StoredVehicle::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn get_vehicle(&self, id: &str) -> Result<Option<StoredVehicle>, StoreError> {
        let query = format!("{SELECT_VEHICLES} WHERE v.id = ?");
        let row = sqlx::query_as::<_, VehicleRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(StoredVehicle::try_from).transpose()
    }

    #[instrument(skip(self, setup), fields(vehicle_id = %setup.vehicle_id, name = %setup.name))]
    async fn create_tuning_setup(
        &self,
        setup: NewTuningSetup,
    ) -> Result<StoredTuningSetup, StoreError> {
        let mut setup = setup;
        let mut tx = self.pool.begin().await?;

        let drivetrain: Option<String> = sqlx::query_scalar(
            "SELECT drivetrain FROM vehicle_performance WHERE vehicle_id = ?",
        )
        .bind(&setup.vehicle_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(drivetrain) = drivetrain else {
            return Err(StoreError::VehicleNotFound(setup.vehicle_id));
        };
        let drivetrain: Drivetrain = parse_column(&drivetrain)?;
        setup.tuning.differential = setup
            .tuning
            .differential
            .conform_to(drivetrain)
            .ok_or(StoreError::DrivetrainMismatch(drivetrain))?;

        let id = Uuid::new_v4().to_string();
        let created_at = timestamp(Utc::now().timestamp_micros())?;
        let tuning_json = serde_json::to_string(&setup.tuning)?;

        sqlx::query(
            r#"
            INSERT INTO tuning_setups
                (id, vehicle_id, name, prompt, setup_type, tuning, explanation, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?);
            "#,
        )
        .bind(&id)
        .bind(&setup.vehicle_id)
        .bind(&setup.name)
        .bind(&setup.prompt)
        .bind(setup.setup_type.map(|s| s.as_str()))
        .bind(&tuning_json)
        .bind(&setup.tuning.explanation)
        .bind(created_at.timestamp_micros())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("SQLite insert failed for tuning setup {}: {}", id, e);
            StoreError::SQLite(e)
        })?;

        tx.commit().await?;

        debug!("SQLite stored tuning setup {}", id);
        Ok(StoredTuningSetup {
            id,
            vehicle_id: setup.vehicle_id,
            name: setup.name,
            prompt: setup.prompt,
            setup_type: setup.setup_type,
            explanation: setup.tuning.explanation.clone(),
            tuning: setup.tuning,
            created_at,
        })
    }

    #[instrument(skip(self))]
    async fn list_tuning_setups(
        &self,
        vehicle_id: Option<&str>,
    ) -> Result<Vec<StoredTuningSetup>, StoreError> {
        let rows = sqlx::query_as::<_, SetupRow>(
            r#"
            SELECT id, vehicle_id, name, prompt, setup_type, tuning, explanation, created_at
            FROM tuning_setups
            WHERE ?1 IS NULL OR vehicle_id = ?1
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        debug!("SQLite listed {} tuning setups", rows.len());
        rows.into_iter().map(StoredTuningSetup::try_from).collect()
    }
}
