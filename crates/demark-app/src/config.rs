//! Application configuration.

use demark_media::DEFAULT_DWELL_SECS;
use demark_models::EncodingConfig;

/// Sampling rate bounds accepted by the vision service.
pub const MIN_SAMPLING_FPS: u32 = 1;
pub const MAX_SAMPLING_FPS: u32 = 4;

/// Default transcode timeout (10 minutes).
pub const DEFAULT_TRANSCODE_TIMEOUT_SECS: u64 = 600;

/// Runtime configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Samples per second for detection/tracking.
    pub sampling_fps: u32,
    /// Dwell window in seconds for plan synthesis.
    pub dwell_secs: f64,
    /// Encoding settings for the output transcode.
    pub encoding: EncodingConfig,
    /// Wall-clock limit for the transcode.
    pub transcode_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sampling_fps: 2,
            dwell_secs: DEFAULT_DWELL_SECS,
            encoding: EncodingConfig::default(),
            transcode_timeout_secs: DEFAULT_TRANSCODE_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Build a config from the environment, falling back to defaults.
    ///
    /// Recognized variables: `DEMARK_SAMPLING_FPS`, `DEMARK_DWELL_SECS`,
    /// `DEMARK_CRF`, `DEMARK_PRESET`, `DEMARK_TRANSCODE_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(fps) = env_parse::<u32>("DEMARK_SAMPLING_FPS") {
            config.sampling_fps = fps;
        }
        if let Some(dwell) = env_parse::<f64>("DEMARK_DWELL_SECS") {
            config.dwell_secs = dwell;
        }
        if let Some(crf) = env_parse::<u8>("DEMARK_CRF") {
            config.encoding.crf = crf;
        }
        if let Ok(preset) = std::env::var("DEMARK_PRESET") {
            config.encoding.preset = preset;
        }
        if let Some(secs) = env_parse::<u64>("DEMARK_TRANSCODE_TIMEOUT_SECS") {
            config.transcode_timeout_secs = secs;
        }

        config.clamp()
    }

    /// Clamp values into their supported ranges.
    pub fn clamp(mut self) -> Self {
        self.sampling_fps = self
            .sampling_fps
            .clamp(MIN_SAMPLING_FPS, MAX_SAMPLING_FPS);
        if self.dwell_secs <= 0.0 {
            self.dwell_secs = DEFAULT_DWELL_SECS;
        }
        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok()?.parse().ok()
}
