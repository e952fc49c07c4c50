use thiserror::Error;
use tracing::{info, warn};

use crate::{
    client::{ClientError, TuningApi},
    models::{AdjustRequest, GenerateRequest, SetupType, StoredVehicle, TuningConfiguration},
};

pub const GENERATE_FAILED_MESSAGE: &str = "Tuning oluşturulamadı. Lütfen daha sonra tekrar deneyin.";
pub const ADJUST_FAILED_MESSAGE: &str = "Tuning ayarlanamadı. Lütfen daha sonra tekrar deneyin.";
pub const NO_VEHICLE_MESSAGE: &str = "Lütfen önce bir araç seçin.";
pub const NO_TUNING_MESSAGE: &str = "Düzenlenecek bir tuning bulunamadı.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no vehicle selected")]
    NoVehicle,

    #[error("no tuning to adjust")]
    NoTuning,

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// What one user is working on: the selected vehicle, the latest sheet and
/// where the last request stands.
#[derive(Debug, Default)]
pub struct TuningSession {
    current_vehicle: Option<StoredVehicle>,
    current_tuning: Option<TuningConfiguration>,
    status: GenerationStatus,
    error: Option<String>,
}

impl TuningSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_vehicle(&self) -> Option<&StoredVehicle> {
        self.current_vehicle.as_ref()
    }

    pub fn current_tuning(&self) -> Option<&TuningConfiguration> {
        self.current_tuning.as_ref()
    }

    pub fn status(&self) -> GenerationStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Switching vehicles discards the sheet built for the previous one.
    pub fn select_vehicle(&mut self, vehicle: Option<StoredVehicle>) {
        self.current_vehicle = vehicle;
        self.current_tuning = None;
        self.status = GenerationStatus::Idle;
        self.error = None;
    }

    pub async fn generate<A: TuningApi>(
        &mut self,
        api: &A,
        prompt: &str,
        setup_type: Option<SetupType>,
    ) -> Result<&TuningConfiguration, SessionError> {
        let Some(vehicle) = &self.current_vehicle else {
            self.fail(NO_VEHICLE_MESSAGE);
            return Err(SessionError::NoVehicle);
        };

        let request = GenerateRequest {
            car: vehicle.vehicle.clone(),
            prompt: prompt.to_string(),
            setup_type,
        };
        self.begin();
        match api.generate_tuning(&request).await {
            Ok(tuning) => Ok(self.succeed(tuning)),
            Err(e) => {
                warn!("Tuning generation failed: {}", e);
                self.fail(GENERATE_FAILED_MESSAGE);
                Err(e.into())
            }
        }
    }

    pub async fn adjust<A: TuningApi>(
        &mut self,
        api: &A,
        feedback: &str,
    ) -> Result<&TuningConfiguration, SessionError> {
        let Some(vehicle) = &self.current_vehicle else {
            self.fail(NO_VEHICLE_MESSAGE);
            return Err(SessionError::NoVehicle);
        };
        let Some(current_setup) = &self.current_tuning else {
            self.fail(NO_TUNING_MESSAGE);
            return Err(SessionError::NoTuning);
        };

        let request = AdjustRequest {
            car: vehicle.vehicle.clone(),
            current_setup: current_setup.clone(),
            feedback: feedback.to_string(),
        };
        self.begin();
        match api.adjust_tuning(&request).await {
            Ok(tuning) => Ok(self.succeed(tuning)),
            Err(e) => {
                // The previous sheet stays so the user can retry.
                warn!("Tuning adjustment failed: {}", e);
                self.fail(ADJUST_FAILED_MESSAGE);
                Err(e.into())
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn begin(&mut self) {
        self.status = GenerationStatus::Loading;
        self.error = None;
    }

    fn succeed(&mut self, tuning: TuningConfiguration) -> &TuningConfiguration {
        info!("Session holds a new tuning sheet");
        self.status = GenerationStatus::Success;
        self.error = None;
        self.current_tuning.insert(tuning)
    }

    fn fail(&mut self, message: &str) {
        self.status = GenerationStatus::Error;
        self.error = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::Utc;

    use super::*;
    use crate::models::tuning::tests::rwd_tuning;
    use crate::models::vehicle::tests::supra;

    #[derive(Default)]
    struct FakeApi {
        fail: bool,
        generated: Arc<Mutex<Vec<GenerateRequest>>>,
        adjusted: Arc<Mutex<Vec<AdjustRequest>>>,
    }

    impl TuningApi for FakeApi {
        async fn generate_tuning(
            &self,
            request: &GenerateRequest,
        ) -> Result<TuningConfiguration, ClientError> {
            self.generated.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(ClientError::Api {
                    status: 500,
                    message: "boom".into(),
                });
            }
            Ok(rwd_tuning())
        }

        async fn adjust_tuning(
            &self,
            request: &AdjustRequest,
        ) -> Result<TuningConfiguration, ClientError> {
            self.adjusted.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(ClientError::Api {
                    status: 500,
                    message: "boom".into(),
                });
            }
            let mut tuning = request.current_setup.clone();
            tuning.tires.front_pressure = 2.0;
            Ok(tuning)
        }
    }

    fn stored_supra() -> StoredVehicle {
        StoredVehicle {
            id: "vehicle-1".into(),
            vehicle: supra(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn generate_without_vehicle_is_an_error() {
        let api = FakeApi::default();
        let mut session = TuningSession::new();

        let result = session.generate(&api, "Islak zemin için setup", None).await;
        assert!(matches!(result, Err(SessionError::NoVehicle)));
        assert_eq!(session.status(), GenerationStatus::Error);
        assert_eq!(session.error(), Some(NO_VEHICLE_MESSAGE));
        assert!(api.generated.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn generate_then_adjust() {
        let api = FakeApi::default();
        let mut session = TuningSession::new();
        session.select_vehicle(Some(stored_supra()));

        session
            .generate(&api, "Islak zemin için setup", Some(SetupType::Circuit))
            .await
            .unwrap();
        assert_eq!(session.status(), GenerationStatus::Success);
        assert_eq!(session.current_tuning(), Some(&rwd_tuning()));
        assert_eq!(
            api.generated.lock().unwrap()[0].setup_type,
            Some(SetupType::Circuit)
        );

        let adjusted = session
            .adjust(&api, "Ön lastikler çok çabuk ısınıyor")
            .await
            .unwrap();
        assert_eq!(adjusted.tires.front_pressure, 2.0);
        assert_eq!(api.adjusted.lock().unwrap()[0].current_setup, rwd_tuning());
    }

    #[tokio::test]
    async fn failed_adjust_keeps_previous_sheet() {
        let mut session = TuningSession::new();
        session.select_vehicle(Some(stored_supra()));
        session
            .generate(&FakeApi::default(), "Islak zemin için setup", None)
            .await
            .unwrap();

        let failing = FakeApi {
            fail: true,
            ..FakeApi::default()
        };
        let result = session.adjust(&failing, "Ön lastikler çok çabuk ısınıyor").await;
        assert!(matches!(result, Err(SessionError::Client(_))));
        assert_eq!(session.status(), GenerationStatus::Error);
        assert_eq!(session.error(), Some(ADJUST_FAILED_MESSAGE));
        assert_eq!(session.current_tuning(), Some(&rwd_tuning()));
    }

    #[tokio::test]
    async fn adjust_without_tuning_is_an_error() {
        let mut session = TuningSession::new();
        session.select_vehicle(Some(stored_supra()));

        let result = session.adjust(&FakeApi::default(), "Ön lastikler çok çabuk ısınıyor").await;
        assert!(matches!(result, Err(SessionError::NoTuning)));
    }

    #[tokio::test]
    async fn select_and_reset_clear_state() {
        let mut session = TuningSession::new();
        session.select_vehicle(Some(stored_supra()));
        session
            .generate(&FakeApi::default(), "Islak zemin için setup", None)
            .await
            .unwrap();

        session.select_vehicle(Some(stored_supra()));
        assert!(session.current_tuning().is_none());
        assert_eq!(session.status(), GenerationStatus::Idle);

        session.reset();
        assert!(session.current_vehicle().is_none());
        assert!(session.error().is_none());
    }
}
