mod common;

mod client {
    use std::sync::Arc;

    use crate::common;
    use tuning_service::{
        api::{AppState, MODEL_UNAVAILABLE_MESSAGE, router},
        client::{ApiClient, ClientError},
        llm_providers::mock::MockLLMProvider,
        models::{NewTuningSetup, SetupType},
        prompts::tuning_provider::TuningProvider,
        session::{GenerationStatus, SessionError, TuningSession},
        store::sqlite_store::SqliteStore,
    };

    async fn start_service(
        llm: &MockLLMProvider,
    ) -> Result<ApiClient, Box<dyn std::error::Error + 'static>> {
        let store = SqliteStore::in_memory().await?;
        let app = router(AppState {
            store: Arc::new(store),
            tuning: Arc::new(TuningProvider::new(
                Arc::new(llm.clone()),
                Arc::new(llm.clone()),
            )),
        });
        let base_url = common::serve(app).await?;
        Ok(ApiClient::new(base_url))
    }

    #[tokio::test]
    async fn test_session_generates_adjusts_and_saves()
    -> Result<(), Box<dyn std::error::Error + 'static>> {
        common::setup_logger("error");
        let llm = MockLLMProvider::new(format!("İşte ayarlar:\n{}", common::RWD_TUNING_JSON));
        let client = start_service(&llm).await?;

        let vehicle = client.create_vehicle(&common::supra()).await?;
        assert_eq!(client.list_vehicles().await?, vec![vehicle.clone()]);

        let mut session = TuningSession::new();
        session.select_vehicle(Some(vehicle.clone()));
        let tuning = session
            .generate(&client, "Kuru asfalt için pist setup'ı", Some(SetupType::Circuit))
            .await?
            .clone();
        assert_eq!(tuning, common::rwd_tuning());
        assert_eq!(session.status(), GenerationStatus::Success);

        session
            .adjust(&client, "Virajdan çıkarken arka kayıyor")
            .await?;
        let sent = llm.last_input().unwrap_or_default();
        assert!(sent.contains("Virajdan çıkarken arka kayıyor"));
        assert!(sent.contains("\"rearAccel\": 45.0"));

        let saved = client
            .save_setup(&NewTuningSetup {
                vehicle_id: vehicle.id.clone(),
                name: "Pist".into(),
                prompt: "Kuru asfalt için pist setup'ı".into(),
                setup_type: Some(SetupType::Circuit),
                tuning,
            })
            .await?;
        let listed = client.list_setups(Some(&vehicle.id)).await?;
        assert_eq!(listed, vec![saved]);
        assert!(client.list_setups(Some("missing")).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_server_errors_surface_in_client_and_session()
    -> Result<(), Box<dyn std::error::Error + 'static>> {
        common::setup_logger("error");
        let llm = MockLLMProvider::unavailable();
        let client = start_service(&llm).await?;
        let vehicle = client.create_vehicle(&common::supra()).await?;

        let mut session = TuningSession::new();
        session.select_vehicle(Some(vehicle));
        let result = session
            .generate(&client, "Kuru asfalt için pist setup'ı", None)
            .await;

        match result {
            Err(SessionError::Client(ClientError::Api { status, message })) => {
                assert_eq!(status, 500);
                assert_eq!(message, MODEL_UNAVAILABLE_MESSAGE);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(session.status(), GenerationStatus::Error);
        assert!(session.current_tuning().is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_vehicle_is_rejected() -> Result<(), Box<dyn std::error::Error + 'static>> {
        common::setup_logger("error");
        let client = start_service(&MockLLMProvider::empty()).await?;

        let mut vehicle = common::supra();
        vehicle.performance.front_weight = 120;
        let result = client.create_vehicle(&vehicle).await;

        assert!(matches!(result, Err(ClientError::Api { status: 400, .. })));
        assert!(client.list_vehicles().await?.is_empty());

        Ok(())
    }
}
