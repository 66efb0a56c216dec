use async_trait::async_trait;
use eyre::{Result, bail};
use log::debug;
use serde::Deserialize;

use crate::config::Credentials;

const CAPTIONS_API_BASE: &str = "https://youtube.googleapis.com/youtube/v3";

/// One caption track as returned by the captions list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct CaptionTrack {
    pub id: String,
    pub snippet: CaptionSnippet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptionSnippet {
    pub language: String,
}

#[derive(Debug, Deserialize)]
struct CaptionListResponse {
    #[serde(default)]
    items: Vec<CaptionTrack>,
}

/// The two captions endpoints needed to produce a transcript.
///
/// Listing authenticates with the API key, downloading with the bearer
/// token. Kept as a trait so tests can run against an in-memory fake.
#[async_trait]
pub trait CaptionsApi: Send + Sync {
    /// List the caption tracks available for a video
    async fn list_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>>;

    /// Download one track's content, returned verbatim
    async fn fetch_track(&self, track_id: &str) -> Result<serde_json::Value>;
}

/// `CaptionsApi` backed by the public YouTube Data API
pub struct YouTubeCaptions {
    client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl YouTubeCaptions {
    pub fn new(client: reqwest::Client, credentials: Credentials) -> Self {
        Self {
            client,
            base_url: CAPTIONS_API_BASE.to_string(),
            credentials,
        }
    }
}

#[async_trait]
impl CaptionsApi for YouTubeCaptions {
    async fn list_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>> {
        let url = format!(
            "{}/captions?part=snippet&videoId={video_id}&key={}",
            self.base_url, self.credentials.api_key
        );
        debug!("Listing caption tracks for {video_id}");

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(upstream_error("captions list", resp).await);
        }

        let listing: CaptionListResponse = resp.json().await?;
        Ok(listing.items)
    }

    async fn fetch_track(&self, track_id: &str) -> Result<serde_json::Value> {
        let url = format!(
            "{}/captions/{track_id}?key={}",
            self.base_url, self.credentials.api_key
        );
        debug!("Downloading caption track {track_id}");

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.credentials.access_token)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(upstream_error("caption download", resp).await);
        }

        // The download body is usually plain caption text, but the provider
        // is mirrored verbatim either way.
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body).unwrap_or_else(|_| serde_json::Value::String(body)))
    }
}

/// Turn a non-success upstream response into an error, preferring the
/// provider's structured message over the raw status and body.
async fn upstream_error(what: &str, resp: reqwest::Response) -> eyre::Report {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    match provider_error_message(&body) {
        Some(msg) => eyre::eyre!("{msg}"),
        None => eyre::eyre!("{what} returned {status}: {body}"),
    }
}

fn provider_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

/// Fetch the transcript for a video: list its caption tracks, take the first
/// English one, download its content. Every failure on the way collapses
/// into a single "Failed to fetch transcript" error for the caller.
pub async fn fetch_transcript(api: &dyn CaptionsApi, video_id: &str) -> Result<serde_json::Value> {
    match try_fetch(api, video_id).await {
        Ok(transcript) => Ok(transcript),
        Err(e) => bail!("Failed to fetch transcript: {e:#}"),
    }
}

async fn try_fetch(api: &dyn CaptionsApi, video_id: &str) -> Result<serde_json::Value> {
    let tracks = api.list_tracks(video_id).await?;
    if tracks.is_empty() {
        bail!("No captions available for this video");
    }

    // Returned order is preserved: the first en / en-* track wins.
    let track = tracks
        .iter()
        .find(|t| t.snippet.language == "en" || t.snippet.language.starts_with("en-"))
        .ok_or_else(|| eyre::eyre!("No English captions available"))?;

    api.fetch_track(&track.id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakeApi {
        tracks: Vec<CaptionTrack>,
        downloads: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn with_tracks(tracks: Vec<CaptionTrack>) -> Self {
            Self {
                tracks,
                downloads: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CaptionsApi for FakeApi {
        async fn list_tracks(&self, _video_id: &str) -> Result<Vec<CaptionTrack>> {
            Ok(self.tracks.clone())
        }

        async fn fetch_track(&self, track_id: &str) -> Result<serde_json::Value> {
            self.downloads.lock().unwrap().push(track_id.to_string());
            Ok(serde_json::Value::String(format!("captions for {track_id}")))
        }
    }

    fn track(id: &str, language: &str) -> CaptionTrack {
        CaptionTrack {
            id: id.to_string(),
            snippet: CaptionSnippet {
                language: language.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_no_tracks() {
        let api = FakeApi::with_tracks(vec![]);
        let err = fetch_transcript(&api, "dQw4w9WgXcQ").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to fetch transcript: No captions available for this video"
        );
        // The download call must never happen when the list is empty.
        assert!(api.downloads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_english_tracks() {
        let api = FakeApi::with_tracks(vec![track("t1", "de"), track("t2", "fr")]);
        let err = fetch_transcript(&api, "dQw4w9WgXcQ").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to fetch transcript: No English captions available"
        );
        assert!(api.downloads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_exact_en_track() {
        let api = FakeApi::with_tracks(vec![track("t1", "de"), track("t2", "en")]);
        let transcript = fetch_transcript(&api, "dQw4w9WgXcQ").await.unwrap();
        assert_eq!(transcript, serde_json::json!("captions for t2"));
    }

    #[tokio::test]
    async fn test_en_variant_track() {
        let api = FakeApi::with_tracks(vec![track("t1", "en-GB")]);
        let transcript = fetch_transcript(&api, "dQw4w9WgXcQ").await.unwrap();
        assert_eq!(transcript, serde_json::json!("captions for t1"));
    }

    #[tokio::test]
    async fn test_first_english_track_wins() {
        // en-US is listed before en; list order decides, not language ranking.
        let api = FakeApi::with_tracks(vec![track("t1", "en-US"), track("t2", "en")]);
        let transcript = fetch_transcript(&api, "dQw4w9WgXcQ").await.unwrap();
        assert_eq!(transcript, serde_json::json!("captions for t1"));
        assert_eq!(*api.downloads.lock().unwrap(), vec!["t1".to_string()]);
    }

    #[tokio::test]
    async fn test_list_failure_is_collapsed() {
        struct FailingApi;

        #[async_trait]
        impl CaptionsApi for FailingApi {
            async fn list_tracks(&self, _video_id: &str) -> Result<Vec<CaptionTrack>> {
                bail!("API key not valid. Please pass a valid API key.")
            }

            async fn fetch_track(&self, _track_id: &str) -> Result<serde_json::Value> {
                unreachable!("list failed first")
            }
        }

        let err = fetch_transcript(&FailingApi, "dQw4w9WgXcQ").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to fetch transcript: API key not valid. Please pass a valid API key."
        );
    }

    #[test]
    fn test_provider_error_message() {
        let body = r#"{"error":{"code":403,"message":"The request is missing a valid API key."}}"#;
        assert_eq!(
            provider_error_message(body).as_deref(),
            Some("The request is missing a valid API key.")
        );
    }

    #[test]
    fn test_provider_error_message_unstructured() {
        assert_eq!(provider_error_message("Forbidden"), None);
        assert_eq!(provider_error_message(r#"{"error":"flat"}"#), None);
    }

    #[test]
    fn test_list_response_missing_items() {
        let listing: CaptionListResponse = serde_json::from_str(r#"{"kind":"youtube#captionListResponse"}"#).unwrap();
        assert!(listing.items.is_empty());
    }
}
