use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use station_core::{ReportSink, SinkError, StationReport};

use crate::{BackendConfig, BackendPayload};

/// Posts reports as JSON to the weather backend.
///
/// Only `200 OK` and `201 Created` count as delivered.
pub struct HttpBackendSink {
    client: Client,
    url: String,
    sensor_id: String,
}

impl HttpBackendSink {
    pub fn new(config: &BackendConfig) -> Result<Self, SinkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SinkError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.report_url(),
            sensor_id: config.sensor_id.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ReportSink for HttpBackendSink {
    async fn send(&self, report: &StationReport) -> Result<(), SinkError> {
        let payload = BackendPayload::from_report(&self.sensor_id, report);
        tracing::debug!("POST {} {}", self.url, serde_json::to_string(&payload)?);

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        let status = response.status();
        tracing::info!("Backend responded HTTP {}", status.as_u16());

        if status == StatusCode::OK || status == StatusCode::CREATED {
            Ok(())
        } else {
            Err(SinkError::UnexpectedStatus(status.as_u16()))
        }
    }

    fn name(&self) -> &str {
        "http-backend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::sample_report;
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::post;
    use axum::{Json, Router};
    use station_core::AlertLevel;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    type Received = Arc<Mutex<Vec<serde_json::Value>>>;

    async fn spawn_backend(status: AxumStatus) -> (String, Received) {
        let received: Received = Arc::new(Mutex::new(Vec::new()));
        let store = received.clone();

        let app = Router::new().route(
            "/api/datos-climaticos",
            post(move |Json(body): Json<serde_json::Value>| {
                let store = store.clone();
                async move {
                    store.lock().await.push(body);
                    status
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (format!("http://{}", addr), received)
    }

    fn config_for(base_url: String) -> BackendConfig {
        BackendConfig {
            base_url,
            sensor_id: "TEST_STATION".to_string(),
            timeout_secs: 5,
            dry_run: false,
            ..BackendConfig::default()
        }
    }

    #[tokio::test]
    async fn test_created_is_success_and_body_matches_schema() {
        let (base_url, received) = spawn_backend(AxumStatus::CREATED).await;
        let sink = HttpBackendSink::new(&config_for(base_url)).unwrap();

        sink.send(&sample_report(AlertLevel::Critical)).await.unwrap();

        let bodies = received.lock().await;
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["sensor_id"], "TEST_STATION");
        assert_eq!(bodies[0]["alerta"], 2);
        assert_eq!(bodies[0]["temperatura"], 24.46);
        assert_eq!(bodies[0]["modo"], "simulacion");
    }

    #[tokio::test]
    async fn test_ok_is_success() {
        let (base_url, _) = spawn_backend(AxumStatus::OK).await;
        let sink = HttpBackendSink::new(&config_for(base_url)).unwrap();

        assert!(sink.send(&sample_report(AlertLevel::Normal)).await.is_ok());
    }

    #[tokio::test]
    async fn test_other_status_is_failure() {
        let (base_url, received) = spawn_backend(AxumStatus::ACCEPTED).await;
        let sink = HttpBackendSink::new(&config_for(base_url)).unwrap();

        let result = sink.send(&sample_report(AlertLevel::Warning)).await;

        assert!(matches!(result, Err(SinkError::UnexpectedStatus(202))));
        assert_eq!(received.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sink = HttpBackendSink::new(&config_for(format!("http://{}", addr))).unwrap();
        let result = sink.send(&sample_report(AlertLevel::Normal)).await;

        assert!(matches!(result, Err(SinkError::Transport(_))));
    }
}
