use reqwest::{
    Client,
    Response,
};
use serde_json::{
    Map,
    Value,
};
use tracing::{
    debug,
    warn,
};

use super::{
    mapping,
    Settings,
};
use crate::core::LitrevError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone)]
pub struct SettingsClient {
    base_url: String,
    http: Client,
}

/// One editing session: the typed settings plus the raw document they were
/// loaded from. The raw document is kept so that fields the typed model does
/// not carry survive a load -> mutate -> save cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsSession {
    pub settings: Settings,
    raw: Map<String, Value>,
}

impl SettingsSession {
    pub fn from_raw(raw: Map<String, Value>) -> Self {
        let settings = mapping::settings_from_raw(&raw);
        Self { settings, raw }
    }

    pub fn raw_document(&self) -> &Map<String, Value> {
        &self.raw
    }

    pub fn save_document(&self) -> Result<Map<String, Value>, LitrevError> {
        mapping::save_document(&self.settings, &self.raw)
    }
}

impl SettingsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http: Client::new() }
    }

    pub async fn load(&self) -> Result<SettingsSession, LitrevError> {
        let url = format!("{}/api/getSettings", self.base_url);
        debug!("loading settings from {url}");

        let response = self.http.get(&url).send().await?;
        ensure_success(&response)?;

        let payload: Value = response.json().await?;
        let raw = match payload {
            Value::Object(raw) => raw,
            other => {
                warn!("settings endpoint returned a non-object payload: {other}");
                Map::new()
            }
        };

        Ok(SettingsSession::from_raw(raw))
    }

    pub async fn save(&self, session: &SettingsSession) -> Result<(), LitrevError> {
        let document = session.save_document()?;
        let url = format!("{}/api/saveSettings", self.base_url);
        debug!("saving settings to {url}");

        let response = self.http.post(&url).json(&document).send().await?;
        ensure_success(&response)?;

        Ok(())
    }
}

impl Default for SettingsClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn ensure_success(response: &Response) -> Result<(), LitrevError> {
    if !response.status().is_success() {
        return Err(LitrevError::Http {
            status: response.status().as_u16(),
            url: response.url().to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::{
        io::{
            AsyncReadExt,
            AsyncWriteExt,
        },
        net::{
            TcpListener,
            TcpStream,
        },
        sync::oneshot,
    };

    use super::*;
    use crate::settings::Script;

    /// Serves exactly one canned HTTP response and hands back the captured
    /// request text.
    async fn spawn_backend(
        status: &'static str,
        body: &'static str,
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind backend listener");
        let address = listener.local_addr().expect("backend address");
        let (request_tx, request_rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut stream, _) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(_) => return,
            };

            let request = read_request(&mut stream).await;
            let _ = request_tx.send(request);

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes()).await;
        });

        (format!("http://{address}"), request_rx)
    }

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut request = Vec::new();
        let mut chunk = [0u8; 4096];

        loop {
            match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(read) => request.extend_from_slice(&chunk[..read]),
            }
            if request_is_complete(&request) {
                break;
            }
        }

        String::from_utf8_lossy(&request).into_owned()
    }

    fn request_is_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let header_end = match text.find("\r\n\r\n") {
            Some(header_end) => header_end,
            None => return false,
        };

        let body_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);

        text.len() >= header_end + 4 + body_length
    }

    #[test]
    fn base_url_drops_a_trailing_slash() {
        let client = SettingsClient::new("http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[tokio::test]
    async fn load_builds_a_session_from_the_backend_document() {
        let (url, request) = spawn_backend(
            "200 OK",
            r#"{"project":{"review_type":"scoping_review"},"sources":[{"source_name":"crossref","search_script":{"endpoint":"search_crossref"}}],"search":{"retrieve_forthcoming":true}}"#,
        )
        .await;

        let session = SettingsClient::new(url).load().await.expect("load settings");

        assert_eq!(session.settings.project.review_type, "scoping_review");
        assert_eq!(session.settings.sources.len(), 1);
        assert_eq!(session.settings.sources[0].search_script, Script::plain("search_crossref"));
        assert!(session.raw_document().contains_key("search"));

        let request = request.await.expect("captured request");
        assert!(request.starts_with("GET /api/getSettings "));
    }

    #[tokio::test]
    async fn load_surfaces_non_success_statuses() {
        let (url, _request) = spawn_backend("500 Internal Server Error", "{}").await;

        match SettingsClient::new(url).load().await {
            Err(LitrevError::Http { status, .. }) => assert_eq!(status, 500),
            other => panic!("expected an http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn load_rejects_when_the_backend_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let address = listener.local_addr().expect("address");
        drop(listener);

        let result = SettingsClient::new(format!("http://{address}")).load().await;
        assert!(matches!(result, Err(LitrevError::Reqwest(_))));
    }

    #[tokio::test]
    async fn save_posts_the_merged_document() {
        let (url, request) = spawn_backend("200 OK", "").await;

        let raw = match json!({
            "project": { "review_type": "literature_review", "colrev_version": "0.5.0" },
            "screen": { "criteria": {} }
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let mut session = SettingsSession::from_raw(raw);
        session.settings.project.review_type = "critical_review".to_string();

        SettingsClient::new(url).save(&session).await.expect("save settings");

        let request = request.await.expect("captured request");
        assert!(request.starts_with("POST /api/saveSettings "));
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));

        let body = request.split("\r\n\r\n").nth(1).expect("request body");
        let document: Value = serde_json::from_str(body).expect("json body");
        assert_eq!(document["project"]["review_type"], json!("critical_review"));
        assert_eq!(document["project"]["colrev_version"], json!("0.5.0"));
        assert_eq!(document["screen"], json!({ "criteria": {} }));
        assert!(document["sources"].as_array().expect("sources array").is_empty());
    }
}
