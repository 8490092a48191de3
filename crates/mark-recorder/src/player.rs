//! Media player status query over the VLC HTTP interface.
//!
//! Only three fields are consumed: the current file name (from the `meta`
//! information category), the playback position, and the total length.

use reqwest::StatusCode;
use serde::Deserialize;

use clipmark_common::config::PlayerConfig;
use clipmark_common::error::{ClipmarkError, ClipmarkResult};

/// Snapshot of the player at the moment of marking.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStatus {
    /// File name of the media being played.
    pub filename: String,

    /// Playback position in percent [0, 100].
    pub percent: f64,

    /// Total media length in seconds.
    pub length_secs: f64,
}

#[derive(Debug, Deserialize)]
struct StatusXml {
    #[serde(default)]
    length: Option<f64>,
    #[serde(default)]
    position: Option<f64>,
    #[serde(default)]
    information: Option<InformationXml>,
}

#[derive(Debug, Deserialize)]
struct InformationXml {
    #[serde(rename = "category", default)]
    categories: Vec<CategoryXml>,
}

#[derive(Debug, Deserialize)]
struct CategoryXml {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "info", default)]
    infos: Vec<InfoXml>,
}

#[derive(Debug, Deserialize)]
struct InfoXml {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "#text", default)]
    value: String,
}

/// Parse a `status.xml` document into a [`PlayerStatus`].
pub fn parse_status_xml(xml: &str) -> ClipmarkResult<PlayerStatus> {
    let status: StatusXml = serde_xml_rs::from_str(xml)
        .map_err(|e| ClipmarkError::player(format!("Malformed player status: {e}")))?;

    let meta = status
        .information
        .as_ref()
        .and_then(|info| info.categories.iter().find(|c| c.name == "meta"));

    // VLC lists `filename` first in the meta category; fall back to the
    // first entry for builds that order it differently.
    let filename = meta
        .and_then(|m| {
            m.infos
                .iter()
                .find(|i| i.name == "filename")
                .or_else(|| m.infos.first())
        })
        .map(|i| i.value.trim().to_string())
        .unwrap_or_default();

    if filename.is_empty() {
        return Err(ClipmarkError::player("Couldn't get current video filename"));
    }

    let position = status
        .position
        .ok_or_else(|| ClipmarkError::player("Player status has no position"))?;
    let length_secs = status
        .length
        .ok_or_else(|| ClipmarkError::player("Player status has no length"))?;

    Ok(PlayerStatus {
        filename,
        percent: position * 100.0,
        length_secs,
    })
}

/// Client for the player's status endpoint.
pub struct VlcStatusClient {
    http: reqwest::Client,
    config: PlayerConfig,
}

impl VlcStatusClient {
    pub fn new(config: PlayerConfig) -> ClipmarkResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ClipmarkError::player(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    fn status_url(&self) -> String {
        format!(
            "{}/requests/status.xml",
            self.config.url.trim_end_matches('/')
        )
    }

    /// Query the player once. Failures are reported, never retried.
    pub async fn fetch(&self) -> ClipmarkResult<PlayerStatus> {
        let url = self.status_url();
        tracing::debug!(url = %url, "Requesting player status");

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await
            .map_err(|e| ClipmarkError::player(format!("Failed to reach player at {url}: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ClipmarkError::player(format!(
                "Problem requesting information from player, status code: {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClipmarkError::player(format!("Failed to read player status: {e}")))?;

        parse_status_xml(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYING: &str = r#"<?xml version="1.0" encoding="utf-8" standalone="yes" ?>
<root>
<fullscreen>false</fullscreen>
<apiversion>3</apiversion>
<time>30</time>
<volume>256</volume>
<length>120</length>
<state>playing</state>
<position>0.25</position>
<information>
  <category name="meta">
    <info name="filename">IMG_0042.mp4</info>
    <info name="encoded_by">Lavf58.29.100</info>
  </category>
  <category name="Stream 0">
    <info name="Type">Video</info>
  </category>
</information>
</root>"#;

    const STOPPED: &str = r#"<?xml version="1.0" encoding="utf-8" standalone="yes" ?>
<root>
<length>0</length>
<state>stopped</state>
<position>0</position>
<information>
  <category name="Stream 0">
    <info name="Type">Video</info>
  </category>
</information>
</root>"#;

    #[test]
    fn test_parse_playing_status() {
        let status = parse_status_xml(PLAYING).unwrap();
        assert_eq!(status.filename, "IMG_0042.mp4");
        assert!((status.percent - 25.0).abs() < 1e-9);
        assert!((status.length_secs - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_filename_is_player_error() {
        let err = parse_status_xml(STOPPED).unwrap_err();
        assert!(matches!(err, ClipmarkError::Player { .. }));
        assert!(err.to_string().contains("filename"));
    }

    #[test]
    fn test_garbage_body_is_player_error() {
        assert!(matches!(
            parse_status_xml("<html><body>401"),
            Err(ClipmarkError::Player { .. })
        ));
    }

    #[test]
    fn test_status_url_tolerates_trailing_slash() {
        let client = VlcStatusClient::new(PlayerConfig {
            url: "http://127.0.0.1:8080/".to_string(),
            ..PlayerConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.status_url(),
            "http://127.0.0.1:8080/requests/status.xml"
        );
    }
}
