//! The write sink: attendance exceptions and service requests are relayed to
//! a remote script endpoint as `{ "action": route, ...fields }` documents.
//!
//! The sink acknowledges with `{ ok, message? }`. It does not always allow
//! reading its response; a success status with an unreadable body counts as
//! accepted on a best-effort basis.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::PortalError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresensiSubmission {
    pub nis: String,
    pub nama: String,
    pub tanggal: String,
    pub kelas: String,
    pub mata_pelajaran: String,
    pub status: String,
    pub cabang: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PelayananSubmission {
    pub nis: String,
    pub nama: String,
    pub cabang: String,
    pub tanggal: String,
    pub mata_pelajaran: String,
    pub materi: String,
    pub durasi: String,
    pub pengajar: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermintaanSubmission {
    pub nis: String,
    pub nama: String,
    pub cabang: String,
    pub tanggal: String,
    pub mata_pelajaran: String,
    pub pengajar: String,
    pub keperluan: String,
    pub status: String,
}

impl PermintaanSubmission {
    /// New requests always start in the waiting state.
    pub const INITIAL_STATUS: &'static str = "Menunggu";
}

#[derive(Debug, Deserialize)]
pub struct SinkAck {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub message: Option<String>,
}

pub struct ScriptSink {
    client: Client,
    url: String,
}

impl ScriptSink {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Relay an attendance exception. Date and subject come pre-filled from
    /// today's schedule; the student only picks a status.
    pub async fn submit_presensi(
        &self,
        submission: &PresensiSubmission,
    ) -> Result<(), PortalError> {
        require(&submission.tanggal, "tanggal")?;
        require(&submission.mata_pelajaran, "mataPelajaran")?;
        require(&submission.status, "status")?;
        self.post("presensi", submission).await
    }

    /// Relay a service/tutoring log entry.
    pub async fn submit_pelayanan(
        &self,
        submission: &PelayananSubmission,
    ) -> Result<(), PortalError> {
        require(&submission.tanggal, "tanggal")?;
        require(&submission.mata_pelajaran, "mataPelajaran")?;
        require(&submission.pengajar, "pengajar")?;
        self.post("pelayanan", submission).await
    }

    /// Relay a teacher contact/service request.
    pub async fn submit_permintaan(
        &self,
        submission: &PermintaanSubmission,
    ) -> Result<(), PortalError> {
        require(&submission.tanggal, "tanggal")?;
        require(&submission.mata_pelajaran, "mataPelajaran")?;
        require(&submission.pengajar, "pengajar")?;
        self.post("permintaan", submission).await
    }

    async fn post<T: Serialize>(&self, route: &str, submission: &T) -> Result<(), PortalError> {
        let mut body = serde_json::to_value(submission)
            .map_err(|e| PortalError::Write(e.to_string()))?;
        if let Some(object) = body.as_object_mut() {
            object.insert(
                "action".to_string(),
                serde_json::Value::String(route.to_string()),
            );
        }

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PortalError::Write(format!("sink unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(PortalError::Write(format!(
                "sink returned HTTP {}",
                response.status()
            )));
        }

        match response.json::<SinkAck>().await {
            Ok(ack) if ack.ok => {
                info!("Sink accepted '{}' submission", route);
                Ok(())
            }
            Ok(ack) => Err(PortalError::Write(
                ack.message
                    .unwrap_or_else(|| "sink rejected the submission".to_string()),
            )),
            Err(err) => {
                warn!(
                    "Sink response for '{}' not readable ({}); treating as accepted",
                    route, err
                );
                Ok(())
            }
        }
    }
}

fn require(value: &str, name: &'static str) -> Result<(), PortalError> {
    if value.trim().is_empty() {
        Err(PortalError::Validation(name))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn presensi() -> PresensiSubmission {
        PresensiSubmission {
            nis: "0701".to_string(),
            nama: "Budi".to_string(),
            tanggal: "2024-01-15".to_string(),
            kelas: "IPA-1".to_string(),
            mata_pelajaran: "Matematika".to_string(),
            status: "Izin".to_string(),
            cabang: "Semarang".to_string(),
        }
    }

    fn sink(url: &str) -> ScriptSink {
        ScriptSink::new(Client::new(), url)
    }

    #[tokio::test]
    async fn posts_the_route_and_camel_case_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/exec"))
            .and(body_partial_json(serde_json::json!({
                "action": "presensi",
                "mataPelajaran": "Matematika",
                "nis": "0701",
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let sink = sink(&format!("{}/exec", server.uri()));
        sink.submit_presensi(&presensi()).await.unwrap();
    }

    #[tokio::test]
    async fn sink_rejection_surfaces_its_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"ok": false, "message": "NIS tidak dikenal"}),
            ))
            .mount(&server)
            .await;

        let sink = sink(&server.uri());
        match sink.submit_presensi(&presensi()).await {
            Err(PortalError::Write(message)) => assert_eq!(message, "NIS tidak dikenal"),
            other => panic!("expected Write error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreadable_success_response_counts_as_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>opaque</html>"))
            .mount(&server)
            .await;

        let sink = sink(&server.uri());
        assert!(sink.submit_presensi(&presensi()).await.is_ok());
    }

    #[tokio::test]
    async fn validation_blocks_the_request_before_any_network_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let sink = sink(&server.uri());
        let mut submission = presensi();
        submission.status.clear();
        match sink.submit_presensi(&submission).await {
            Err(PortalError::Validation(field)) => assert_eq!(field, "status"),
            other => panic!("expected Validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn permintaan_carries_the_waiting_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "action": "permintaan",
                "status": "Menunggu",
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let sink = sink(&server.uri());
        let submission = PermintaanSubmission {
            nis: "0701".to_string(),
            nama: "Budi".to_string(),
            cabang: "Semarang".to_string(),
            tanggal: "2024-01-15".to_string(),
            mata_pelajaran: "Matematika".to_string(),
            pengajar: "Pak Andi".to_string(),
            keperluan: "jadwal tambahan".to_string(),
            status: PermintaanSubmission::INITIAL_STATUS.to_string(),
        };
        sink.submit_permintaan(&submission).await.unwrap();
    }
}
