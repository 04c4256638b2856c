//! Gemini vision-service client.
//!
//! Two operations are consumed by the pipeline:
//!
//! - **detect**: sample the whole video and report candidate watermark
//!   regions per timestamp, normalized to the 0-1000 scale.
//! - **track**: follow one reference region across the video, reporting
//!   pixel-space positions with a confidence per sample; confidence 0
//!   means "not found at this sample" and is dropped at this boundary.
//!
//! The model wraps its JSON in prose at times, so the first `[...]` slice
//! of the response text is extracted before parsing.

use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use demark_models::detection::RawObservation;
use demark_models::PixelBox;

use crate::error::{DetectError, DetectResult};

/// Default production endpoint.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Models tried in order until one answers.
const FALLBACK_MODELS: &[&str] = &["gemini-2.0-flash-exp", "gemini-2.5-flash"];

/// One tracking sample in the service's pixel-space wire format.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackedPoint {
    pub ts: String,
    #[serde(rename = "box")]
    pub region: TrackedBox,
    pub confidence: f64,
}

/// Pixel-space box as reported by the tracking call. Unvalidated; the
/// caller clamps it against the real resolution.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TrackedBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Client for the Gemini vision service.
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl GeminiClient {
    /// Create a client with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Create a client from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> DetectResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| DetectError::ApiKeyMissing)?;
        Ok(Self::new(api_key))
    }

    /// Override the endpoint (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Detect watermark regions across the whole video.
    ///
    /// Returns the raw per-timestamp observations; box validation happens
    /// when a `DetectionSet` is built from them.
    pub async fn detect_watermarks(
        &self,
        video: &[u8],
        mime_type: &str,
        sampling_fps: u32,
    ) -> DetectResult<Vec<RawObservation>> {
        let prompt = detect_prompt(sampling_fps);
        let text = self.generate_with_fallback(&prompt, video, mime_type).await?;

        let json = extract_json_array(&text)?;
        let observations: Vec<RawObservation> = serde_json::from_str(json)
            .map_err(|e| DetectError::malformed(format!("detection payload: {e}")))?;

        if observations.is_empty() {
            return Err(DetectError::NoDetections);
        }

        info!(count = observations.len(), "Vision service reported observations");
        Ok(observations)
    }

    /// Track one reference region across the video.
    ///
    /// Samples the service could not find (confidence 0) are treated as
    /// missing observations and dropped here, never as a region at the
    /// origin.
    pub async fn track_watermark(
        &self,
        video: &[u8],
        mime_type: &str,
        reference: PixelBox,
        sampling_fps: u32,
    ) -> DetectResult<Vec<TrackedPoint>> {
        let prompt = track_prompt(reference, sampling_fps);
        let text = self.generate_with_fallback(&prompt, video, mime_type).await?;

        let json = extract_json_array(&text)?;
        let points: Vec<TrackedPoint> = serde_json::from_str(json)
            .map_err(|e| DetectError::malformed(format!("tracking payload: {e}")))?;

        let total = points.len();
        let points: Vec<TrackedPoint> = points
            .into_iter()
            .filter(|p| p.confidence > 0.0)
            .collect();

        if points.len() < total {
            warn!(
                dropped = total - points.len(),
                "Dropped tracking samples where the watermark was not found"
            );
        }
        if points.is_empty() {
            return Err(DetectError::NoDetections);
        }

        Ok(points)
    }

    async fn generate_with_fallback(
        &self,
        prompt: &str,
        video: &[u8],
        mime_type: &str,
    ) -> DetectResult<String> {
        let data = base64::engine::general_purpose::STANDARD.encode(video);
        let mut last_error: Option<DetectError> = None;

        for model in FALLBACK_MODELS {
            debug!(model, "Calling vision service");
            match self.generate(model, prompt, &data, mime_type).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    warn!(model, error = %e, "Vision model failed");
                    last_error = Some(e);
                }
            }
        }

        Err(DetectError::AllModelsFailed(
            last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no models configured".to_string()),
        ))
    }

    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        video_base64: &str,
        mime_type: &str,
    ) -> DetectResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: prompt.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: video_base64.to_string(),
                        },
                    },
                ],
            }],
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DetectError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| DetectError::malformed("response carried no candidates"))
    }
}

/// Extract the first `[...]` slice from model output that may wrap JSON
/// in prose or code fences.
fn extract_json_array(text: &str) -> DetectResult<&str> {
    let start = text
        .find('[')
        .ok_or_else(|| DetectError::malformed("no JSON array in response"))?;
    let end = text
        .rfind(']')
        .filter(|&end| end > start)
        .ok_or_else(|| DetectError::malformed("unterminated JSON array in response"))?;
    Ok(&text[start..=end])
}

fn detect_prompt(sampling_fps: u32) -> String {
    format!(
        r#"Analyze this entire video for watermarks or logos that appear throughout the video.
Sample the video at {sampling_fps} FPS (frames per second).

Return a JSON array of detections with the following format:
[
  {{
    "ts": "MM:SS",
    "boxes": [
      {{
        "label": "watermark",
        "box_2d": [ymin, xmin, ymax, xmax],
        "score": 0.95
      }}
    ]
  }}
]

Coordinates should be normalized to 0-1000 range.
Only detect watermarks, logos, or text overlays that appear consistently across multiple frames."#
    )
}

fn track_prompt(reference: PixelBox, sampling_fps: u32) -> String {
    format!(
        r#"You are analyzing a video to track a watermark that may move across frames.

Reference watermark location (pixels):
- Position: ({x}, {y})
- Size: {w} x {h}

Task:
1. Sample the video at {sampling_fps} FPS
2. In each frame, find where the watermark appears (it may have moved)
3. Return a JSON array with the watermark position for each sampled timestamp

Output format:
[
  {{
    "ts": "MM:SS",
    "box": {{ "x": 100, "y": 200, "w": 150, "h": 80 }},
    "confidence": 0.95
  }}
]

Important:
- Track the SAME watermark pattern across all frames
- Coordinates should be pixel values (not normalized)
- If watermark is not visible in a frame, set confidence to 0
- The watermark may move, resize, or fade"#,
        x = reference.x,
        y = reference.y,
        w = reference.w,
        h = reference.h,
    )
}
