//! Pipeline controller: the Upload -> Locate -> Review -> Process state
//! machine.
//!
//! The controller owns the authoritative video facts (duration,
//! resolution) and the current located region. One logical pipeline runs
//! per video: a second Locate/Process request while one is outstanding is
//! rejected, not queued. Cancellation discards the in-flight result when
//! it eventually resolves; it never corrupts state. Any Locate/Process
//! failure keeps the controller in its current state with the error
//! surfaced; the pipeline never silently advances.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{info, warn};

use demark_detect::{DetectResult, GeminiClient, TrackedPoint};
use demark_media::{
    remove_overlay, FfmpegRunner, FilterPlan, FilterPlanBuilder, MediaResult, RegionTrack,
    TrackSample, VideoInfo,
};
use demark_models::detection::RawObservation;
use demark_models::{
    parse_timestamp, DetectionSet, EncodingConfig, PixelBox, RemovalMethod,
};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::select::RegionSelection;

/// Pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Upload,
    Locate,
    Review,
    Process,
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Upload => "upload",
            PipelineState::Locate => "locate",
            PipelineState::Review => "review",
            PipelineState::Process => "process",
        }
    }
}

/// Facts established at upload time.
#[derive(Debug, Clone)]
pub struct VideoFacts {
    pub path: PathBuf,
    pub info: VideoInfo,
}

/// Where the overlay was located, by branch.
#[derive(Debug, Clone)]
pub enum LocatedRegion {
    /// One manually produced box, constant for the whole timeline.
    Manual(PixelBox),
    /// Per-timestamp normalized observations from the detect service.
    Detected(DetectionSet),
    /// Per-timestamp pixel samples from the tracking service.
    Tracked(Vec<TrackSample>),
}

/// Vision-service seam, mockable in tests.
#[async_trait]
pub trait Locator: Send + Sync {
    async fn detect(
        &self,
        video: &[u8],
        mime_type: &str,
        sampling_fps: u32,
    ) -> DetectResult<Vec<RawObservation>>;

    async fn track(
        &self,
        video: &[u8],
        mime_type: &str,
        reference: PixelBox,
        sampling_fps: u32,
    ) -> DetectResult<Vec<TrackedPoint>>;
}

#[async_trait]
impl Locator for GeminiClient {
    async fn detect(
        &self,
        video: &[u8],
        mime_type: &str,
        sampling_fps: u32,
    ) -> DetectResult<Vec<RawObservation>> {
        self.detect_watermarks(video, mime_type, sampling_fps).await
    }

    async fn track(
        &self,
        video: &[u8],
        mime_type: &str,
        reference: PixelBox,
        sampling_fps: u32,
    ) -> DetectResult<Vec<TrackedPoint>> {
        self.track_watermark(video, mime_type, reference, sampling_fps)
            .await
    }
}

/// Transcoder seam, mockable in tests.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn apply(
        &self,
        input: &Path,
        output: &Path,
        plan: &FilterPlan,
        info: &VideoInfo,
        encoding: &EncodingConfig,
        cancel_rx: watch::Receiver<bool>,
        timeout_secs: u64,
    ) -> MediaResult<()>;
}

/// Production transcoder backed by FFmpeg.
pub struct FfmpegTranscoder;

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn apply(
        &self,
        input: &Path,
        output: &Path,
        plan: &FilterPlan,
        info: &VideoInfo,
        encoding: &EncodingConfig,
        cancel_rx: watch::Receiver<bool>,
        timeout_secs: u64,
    ) -> MediaResult<()> {
        let runner = FfmpegRunner::new()
            .with_cancel(cancel_rx)
            .with_timeout(timeout_secs);
        let duration = info.duration;

        remove_overlay(
            input,
            output,
            plan,
            info.width,
            info.height,
            encoding,
            runner,
            move |progress| {
                // Advisory only; progress never gates a transition.
                info!(
                    percent = progress.percentage(duration),
                    speed = progress.speed,
                    "Transcode progress"
                );
            },
        )
        .await
    }
}

/// Cancels the controller's in-flight operation, if any.
#[derive(Clone)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Clears the in-flight flag when an operation finishes, on every exit
/// path.
struct OpGuard(Arc<AtomicBool>);

impl OpGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> AppResult<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            return Err(AppError::Busy);
        }
        Ok(Self(flag.clone()))
    }
}

impl Drop for OpGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// The pipeline state machine. One instance per video run; nothing is
/// shared across runs.
pub struct PipelineController {
    config: AppConfig,
    state: PipelineState,
    video: Option<VideoFacts>,
    located: Option<LocatedRegion>,
    plan: Option<FilterPlan>,
    method: RemovalMethod,
    in_flight: Arc<AtomicBool>,
    cancel_tx: watch::Sender<bool>,
}

impl PipelineController {
    pub fn new(config: AppConfig) -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self {
            config,
            state: PipelineState::Upload,
            video: None,
            located: None,
            plan: None,
            method: RemovalMethod::default(),
            in_flight: Arc::new(AtomicBool::new(false)),
            cancel_tx,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn video(&self) -> Option<&VideoFacts> {
        self.video.as_ref()
    }

    pub fn located(&self) -> Option<&LocatedRegion> {
        self.located.as_ref()
    }

    pub fn plan(&self) -> Option<&FilterPlan> {
        self.plan.as_ref()
    }

    /// Handle for cancelling the current in-flight operation.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            tx: self.cancel_tx.clone(),
        }
    }

    /// Upload -> Locate: record the authoritative video facts.
    pub fn video_loaded(&mut self, path: PathBuf, info: VideoInfo) -> AppResult<()> {
        self.require_state(PipelineState::Upload)?;

        if info.width == 0 || info.height == 0 {
            return Err(demark_models::ModelError::InvalidResolution {
                width: info.width,
                height: info.height,
            }
            .into());
        }
        if info.duration <= 0.0 {
            return Err(demark_media::MediaError::invalid_video(
                "video has no duration",
            )
            .into());
        }

        info!(
            path = %path.display(),
            duration = info.duration,
            width = info.width,
            height = info.height,
            "Video loaded"
        );
        self.video = Some(VideoFacts { path, info });
        self.state = PipelineState::Locate;
        Ok(())
    }

    /// Locate -> Review via a manually produced region.
    pub fn select_manual(&mut self, selection: &RegionSelection) -> AppResult<()> {
        self.require_state(PipelineState::Locate)?;
        let facts = self.facts()?;

        let region = selection.resolve(facts.info.width, facts.info.height)?;
        info!(%region, "Manual region selected");
        self.located = Some(LocatedRegion::Manual(region));
        self.state = PipelineState::Review;
        Ok(())
    }

    /// Locate -> Review via whole-video detection.
    ///
    /// On failure or cancellation the state and any previous detections
    /// are left untouched.
    pub async fn locate_detect<L: Locator>(
        &mut self,
        locator: &L,
        video: &[u8],
        mime_type: &str,
    ) -> AppResult<()> {
        self.require_state(PipelineState::Locate)?;
        let _guard = OpGuard::acquire(&self.in_flight)?;
        let fps = self.config.sampling_fps;

        let raw = self
            .with_cancellation(locator.detect(video, mime_type, fps))
            .await??;

        let set = DetectionSet::from_raw_observations(raw);
        if set.is_empty() {
            // Everything the service returned failed validation.
            return Err(demark_detect::DetectError::NoDetections.into());
        }

        info!(observations = set.len(), "Detection complete");
        self.located = Some(LocatedRegion::Detected(set));
        self.state = PipelineState::Review;
        Ok(())
    }

    /// Locate -> Review via reference-box tracking.
    pub async fn locate_track<L: Locator>(
        &mut self,
        locator: &L,
        video: &[u8],
        mime_type: &str,
        reference: &RegionSelection,
    ) -> AppResult<()> {
        self.require_state(PipelineState::Locate)?;
        let facts = self.facts()?;
        let (width, height) = (facts.info.width, facts.info.height);
        let reference = reference.resolve(width, height)?;

        let _guard = OpGuard::acquire(&self.in_flight)?;
        let fps = self.config.sampling_fps;

        let points = self
            .with_cancellation(locator.track(video, mime_type, reference, fps))
            .await??;

        let mut samples = Vec::with_capacity(points.len());
        for point in points {
            let t = match parse_timestamp(&point.ts) {
                Ok(secs) => secs as f64,
                Err(e) => {
                    warn!(ts = %point.ts, error = %e, "Dropping tracked sample with bad timestamp");
                    continue;
                }
            };
            match PixelBox::new(
                point.region.x,
                point.region.y,
                point.region.w,
                point.region.h,
                width,
                height,
            ) {
                Ok(region) => samples.push(TrackSample { t, region }),
                Err(e) => {
                    warn!(ts = %point.ts, error = %e, "Dropping tracked sample outside the frame");
                }
            }
        }

        if samples.is_empty() {
            return Err(demark_detect::DetectError::NoDetections.into());
        }

        info!(samples = samples.len(), "Tracking complete");
        self.located = Some(LocatedRegion::Tracked(samples));
        self.state = PipelineState::Review;
        Ok(())
    }

    /// Review edit: drop the observation at an exact timestamp.
    pub fn remove_observation(&mut self, ts: &str) -> AppResult<()> {
        self.require_state(PipelineState::Review)?;
        match &mut self.located {
            Some(LocatedRegion::Detected(set)) => {
                set.remove_observation(ts)?;
                Ok(())
            }
            _ => Err(demark_models::ModelError::not_found(ts).into()),
        }
    }

    /// Review -> Process: build the filter plan for the chosen method.
    ///
    /// An empty plan is a precondition failure: the state stays Review.
    pub fn confirm(&mut self, method: RemovalMethod) -> AppResult<()> {
        self.require_state(PipelineState::Review)?;
        let facts = self.facts()?;
        let (width, height) = (facts.info.width, facts.info.height);
        let duration = facts.info.duration;

        let track = match self.located.as_ref() {
            Some(LocatedRegion::Manual(region)) => RegionTrack::constant(*region, width, height),
            Some(LocatedRegion::Detected(set)) => {
                let mut set = set.clone();
                // Headless review: the score picks between candidates.
                set.reduce_to_best();
                RegionTrack::from_detections(&set, width, height)?
            }
            Some(LocatedRegion::Tracked(samples)) => {
                RegionTrack::from_pixel_samples(samples.clone(), width, height)
            }
            None => return Err(demark_media::MediaError::EmptyPlan.into()),
        };

        let plan = FilterPlanBuilder::new(method)
            .with_dwell_secs(self.config.dwell_secs)
            .build(&track, duration)?;

        info!(entries = plan.len(), method = %method, "Filter plan confirmed");
        self.plan = Some(plan);
        self.method = method;
        self.state = PipelineState::Process;
        Ok(())
    }

    /// Process -> Upload on success; Process unchanged on failure.
    ///
    /// A failed or cancelled transcode never exposes a partial output as
    /// success.
    pub async fn process<T: Transcoder>(
        &mut self,
        transcoder: &T,
        output: &Path,
    ) -> AppResult<()> {
        self.require_state(PipelineState::Process)?;
        let _guard = OpGuard::acquire(&self.in_flight)?;
        self.cancel_tx.send_replace(false);

        let facts = self.facts()?;
        let plan = self.plan.as_ref().ok_or(demark_media::MediaError::EmptyPlan)?;

        transcoder
            .apply(
                &facts.path,
                output,
                plan,
                &facts.info,
                &self.config.encoding,
                self.cancel_tx.subscribe(),
                self.config.transcode_timeout_secs,
            )
            .await?;

        info!(output = %output.display(), "Processing complete, pipeline reset");
        self.reset();
        Ok(())
    }

    /// Step back one stage, discarding later-stage data.
    pub fn back(&mut self) {
        match self.state {
            PipelineState::Upload => {}
            PipelineState::Locate => {
                self.video = None;
                self.state = PipelineState::Upload;
            }
            PipelineState::Review => {
                self.located = None;
                self.state = PipelineState::Locate;
            }
            PipelineState::Process => {
                self.plan = None;
                self.state = PipelineState::Review;
            }
        }
    }

    /// Clear all accumulated facts and return to Upload.
    pub fn reset(&mut self) {
        self.video = None;
        self.located = None;
        self.plan = None;
        self.state = PipelineState::Upload;
    }

    fn facts(&self) -> AppResult<&VideoFacts> {
        self.video.as_ref().ok_or(AppError::NoVideo)
    }

    fn require_state(&self, expected: PipelineState) -> AppResult<()> {
        if self.state != expected {
            return Err(AppError::InvalidState {
                expected: expected.name(),
                actual: self.state.name(),
            });
        }
        Ok(())
    }

    /// Race a service call against the cancellation channel. A stale
    /// cancellation from a previous operation is cleared first.
    async fn with_cancellation<F, T>(&self, fut: F) -> AppResult<T>
    where
        F: std::future::Future<Output = T>,
    {
        self.cancel_tx.send_replace(false);
        let mut cancel_rx = self.cancel_tx.subscribe();

        tokio::select! {
            result = fut => Ok(result),
            _ = async {
                loop {
                    if *cancel_rx.borrow() {
                        break;
                    }
                    if cancel_rx.changed().await.is_err() {
                        std::future::pending::<()>().await;
                    }
                }
            } => Err(AppError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demark_detect::{DetectError, TrackedBox};
    use demark_models::detection::{RawBox, RawObservation};

    fn info_1080p() -> VideoInfo {
        VideoInfo {
            duration: 10.0,
            width: 1920,
            height: 1080,
            fps: 30.0,
            codec: "h264".to_string(),
        }
    }

    fn loaded_controller() -> PipelineController {
        let mut controller = PipelineController::new(AppConfig::default());
        controller
            .video_loaded(PathBuf::from("input.mp4"), info_1080p())
            .unwrap();
        controller
    }

    struct StaticLocator {
        detect_result: Option<Vec<RawObservation>>,
        track_result: Option<Vec<TrackedPoint>>,
    }

    #[async_trait]
    impl Locator for StaticLocator {
        async fn detect(
            &self,
            _video: &[u8],
            _mime_type: &str,
            _fps: u32,
        ) -> DetectResult<Vec<RawObservation>> {
            self.detect_result
                .clone()
                .ok_or_else(|| DetectError::malformed("boom"))
        }

        async fn track(
            &self,
            _video: &[u8],
            _mime_type: &str,
            _reference: PixelBox,
            _fps: u32,
        ) -> DetectResult<Vec<TrackedPoint>> {
            self.track_result
                .clone()
                .ok_or_else(|| DetectError::malformed("boom"))
        }
    }

    struct PendingLocator;

    #[async_trait]
    impl Locator for PendingLocator {
        async fn detect(
            &self,
            _video: &[u8],
            _mime_type: &str,
            _fps: u32,
        ) -> DetectResult<Vec<RawObservation>> {
            std::future::pending().await
        }

        async fn track(
            &self,
            _video: &[u8],
            _mime_type: &str,
            _reference: PixelBox,
            _fps: u32,
        ) -> DetectResult<Vec<TrackedPoint>> {
            std::future::pending().await
        }
    }

    struct FakeTranscoder {
        succeed: bool,
    }

    #[async_trait]
    impl Transcoder for FakeTranscoder {
        async fn apply(
            &self,
            _input: &Path,
            _output: &Path,
            _plan: &FilterPlan,
            _info: &VideoInfo,
            _encoding: &EncodingConfig,
            _cancel_rx: watch::Receiver<bool>,
            _timeout_secs: u64,
        ) -> MediaResult<()> {
            if self.succeed {
                Ok(())
            } else {
                Err(demark_media::MediaError::ffmpeg_failed("kaput", None, Some(1)))
            }
        }
    }

    fn one_observation() -> Vec<RawObservation> {
        vec![RawObservation {
            ts: "00:00".to_string(),
            boxes: vec![RawBox {
                label: "watermark".to_string(),
                box_2d: [100, 100, 200, 300],
                score: 0.9,
            }],
        }]
    }

    #[test]
    fn test_initial_state_is_upload() {
        let controller = PipelineController::new(AppConfig::default());
        assert_eq!(controller.state(), PipelineState::Upload);
    }

    #[test]
    fn test_video_loaded_advances_to_locate() {
        let controller = loaded_controller();
        assert_eq!(controller.state(), PipelineState::Locate);
        assert!(controller.video().is_some());
    }

    #[test]
    fn test_locate_requires_locate_state() {
        let mut controller = PipelineController::new(AppConfig::default());
        let selection = RegionSelection::Coords { x: 0, y: 0, w: 10, h: 10 };
        assert!(matches!(
            controller.select_manual(&selection),
            Err(AppError::InvalidState { .. })
        ));
    }

    #[tokio::test]
    async fn test_manual_to_process_to_reset() {
        let mut controller = loaded_controller();
        let selection = RegionSelection::Coords { x: 100, y: 50, w: 300, h: 80 };

        controller.select_manual(&selection).unwrap();
        assert_eq!(controller.state(), PipelineState::Review);

        controller.confirm(RemovalMethod::InPaint).unwrap();
        assert_eq!(controller.state(), PipelineState::Process);
        // Manual mode: one entry covering the whole video.
        let plan = controller.plan().unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.entries()[0].end, 10.0);

        let transcoder = FakeTranscoder { succeed: true };
        controller
            .process(&transcoder, Path::new("out.mp4"))
            .await
            .unwrap();

        // Terminal success re-enters Upload with cleared facts.
        assert_eq!(controller.state(), PipelineState::Upload);
        assert!(controller.video().is_none());
        assert!(controller.plan().is_none());
    }

    #[tokio::test]
    async fn test_failed_detect_keeps_locate_state() {
        let mut controller = loaded_controller();
        let locator = StaticLocator {
            detect_result: None,
            track_result: None,
        };

        let result = controller.locate_detect(&locator, b"bytes", "video/mp4").await;
        assert!(matches!(result, Err(AppError::Detect(_))));
        assert_eq!(controller.state(), PipelineState::Locate);
        assert!(controller.located().is_none());
    }

    #[tokio::test]
    async fn test_detect_success_advances_to_review() {
        let mut controller = loaded_controller();
        let locator = StaticLocator {
            detect_result: Some(one_observation()),
            track_result: None,
        };

        controller
            .locate_detect(&locator, b"bytes", "video/mp4")
            .await
            .unwrap();
        assert_eq!(controller.state(), PipelineState::Review);
        assert!(matches!(
            controller.located(),
            Some(LocatedRegion::Detected(set)) if set.len() == 1
        ));
    }

    #[tokio::test]
    async fn test_detect_with_only_garbage_is_an_error() {
        let mut controller = loaded_controller();
        let locator = StaticLocator {
            detect_result: Some(vec![RawObservation {
                ts: "junk".to_string(),
                boxes: vec![],
            }]),
            track_result: None,
        };

        let result = controller.locate_detect(&locator, b"bytes", "video/mp4").await;
        assert!(matches!(
            result,
            Err(AppError::Detect(DetectError::NoDetections))
        ));
        assert_eq!(controller.state(), PipelineState::Locate);
    }

    #[tokio::test]
    async fn test_track_filters_out_of_frame_samples() {
        let mut controller = loaded_controller();
        let locator = StaticLocator {
            detect_result: None,
            track_result: Some(vec![
                TrackedPoint {
                    ts: "00:00".to_string(),
                    region: TrackedBox { x: 10, y: 10, w: 100, h: 50 },
                    confidence: 0.9,
                },
                TrackedPoint {
                    ts: "00:01".to_string(),
                    region: TrackedBox { x: 5000, y: 10, w: 100, h: 50 },
                    confidence: 0.9,
                },
            ]),
        };

        let reference = RegionSelection::Coords { x: 10, y: 10, w: 100, h: 50 };
        controller
            .locate_track(&locator, b"bytes", "video/mp4", &reference)
            .await
            .unwrap();

        assert!(matches!(
            controller.located(),
            Some(LocatedRegion::Tracked(samples)) if samples.len() == 1
        ));
    }

    #[tokio::test]
    async fn test_confirm_after_removing_all_observations_fails() {
        let mut controller = loaded_controller();
        let locator = StaticLocator {
            detect_result: Some(one_observation()),
            track_result: None,
        };
        controller
            .locate_detect(&locator, b"bytes", "video/mp4")
            .await
            .unwrap();

        controller.remove_observation("00:00").unwrap();
        let result = controller.confirm(RemovalMethod::InPaint);
        assert!(matches!(
            result,
            Err(AppError::Media(demark_media::MediaError::EmptyPlan))
        ));
        // Precondition failure keeps the reviewer where they are.
        assert_eq!(controller.state(), PipelineState::Review);
    }

    #[tokio::test]
    async fn test_remove_unknown_observation_is_not_found() {
        let mut controller = loaded_controller();
        let locator = StaticLocator {
            detect_result: Some(one_observation()),
            track_result: None,
        };
        controller
            .locate_detect(&locator, b"bytes", "video/mp4")
            .await
            .unwrap();

        assert!(matches!(
            controller.remove_observation("05:00"),
            Err(AppError::Model(
                demark_models::ModelError::ObservationNotFound(_)
            ))
        ));
    }

    #[tokio::test]
    async fn test_failed_process_keeps_process_state() {
        let mut controller = loaded_controller();
        controller
            .select_manual(&RegionSelection::Coords { x: 0, y: 0, w: 100, h: 100 })
            .unwrap();
        controller.confirm(RemovalMethod::Blur).unwrap();

        let transcoder = FakeTranscoder { succeed: false };
        let result = controller.process(&transcoder, Path::new("out.mp4")).await;

        assert!(matches!(result, Err(AppError::Media(_))));
        assert_eq!(controller.state(), PipelineState::Process);
        assert!(controller.plan().is_some());
    }

    #[test]
    fn test_back_discards_later_stage_data() {
        let mut controller = loaded_controller();
        controller
            .select_manual(&RegionSelection::Coords { x: 0, y: 0, w: 100, h: 100 })
            .unwrap();
        controller.confirm(RemovalMethod::InPaint).unwrap();

        controller.back();
        assert_eq!(controller.state(), PipelineState::Review);
        assert!(controller.plan().is_none());

        controller.back();
        assert_eq!(controller.state(), PipelineState::Locate);
        assert!(controller.located().is_none());

        controller.back();
        assert_eq!(controller.state(), PipelineState::Upload);
        assert!(controller.video().is_none());

        // Back at Upload is a no-op.
        controller.back();
        assert_eq!(controller.state(), PipelineState::Upload);
    }

    #[tokio::test]
    async fn test_busy_pipeline_rejects_second_request() {
        let mut controller = loaded_controller();
        controller.in_flight.store(true, Ordering::SeqCst);

        let locator = StaticLocator {
            detect_result: Some(one_observation()),
            track_result: None,
        };
        let result = controller.locate_detect(&locator, b"bytes", "video/mp4").await;
        assert!(matches!(result, Err(AppError::Busy)));
    }

    #[tokio::test]
    async fn test_cancellation_discards_in_flight_call() {
        let mut controller = loaded_controller();
        let handle = controller.cancel_handle();

        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            handle.cancel();
        });

        let result = controller
            .locate_detect(&PendingLocator, b"bytes", "video/mp4")
            .await;

        assert!(matches!(result, Err(AppError::Cancelled)));
        assert_eq!(controller.state(), PipelineState::Locate);
        assert!(controller.located().is_none());

        // The pipeline is usable again after cancellation.
        let locator = StaticLocator {
            detect_result: Some(one_observation()),
            track_result: None,
        };
        controller
            .locate_detect(&locator, b"bytes", "video/mp4")
            .await
            .unwrap();
        assert_eq!(controller.state(), PipelineState::Review);
    }
}
