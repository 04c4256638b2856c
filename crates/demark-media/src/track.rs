//! Region tracks: a continuous-time answer to "what rectangle, if any,
//! should be suppressed at time t".
//!
//! Sampling is sparse (1-4 samples/second against 24-60 fps video), so the
//! track interpolates between observations. The default policy is
//! **hold-until-next**: a region's last known position persists until the
//! next observation supersedes it. Linear interpolation between boxes is
//! offered as an explicit alternate, but it risks drifting through frames
//! where the overlay is actually static, so hold is the default.

use demark_models::{DetectionSet, PixelBox};

use crate::error::{MediaError, MediaResult};

/// How positions between samples are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationPolicy {
    /// Last observed box persists until the next sample (default).
    #[default]
    HoldUntilNext,
    /// Box corners interpolate linearly between samples.
    Linear,
}

/// One timestamped box sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSample {
    /// Elapsed seconds from video start.
    pub t: f64,
    /// Region position at this sample.
    pub region: PixelBox,
}

/// An immutable piecewise function from time to an optional region,
/// tagged with the resolution it was built for.
///
/// Rebuild the track if the detection set or resolution changes.
#[derive(Debug, Clone)]
pub struct RegionTrack {
    samples: Vec<TrackSample>,
    width: u32,
    height: u32,
    policy: InterpolationPolicy,
}

impl RegionTrack {
    /// Constant track for manual mode: one box for the whole timeline,
    /// modeled as a single sample at t=0.
    pub fn constant(region: PixelBox, width: u32, height: u32) -> Self {
        Self {
            samples: vec![TrackSample { t: 0.0, region }],
            width,
            height,
            policy: InterpolationPolicy::default(),
        }
    }

    /// Build a track from a detection set, denormalizing each chosen
    /// region for the given resolution.
    ///
    /// The caller must have reduced every observation to at most one
    /// active region; an observation still carrying several candidates is
    /// an integration error and fails with [`MediaError::AmbiguousRegion`].
    pub fn from_detections(set: &DetectionSet, width: u32, height: u32) -> MediaResult<Self> {
        let mut samples = Vec::with_capacity(set.len());

        for obs in set.observations() {
            if obs.regions.len() > 1 {
                return Err(MediaError::AmbiguousRegion {
                    ts: obs.ts.clone(),
                    count: obs.regions.len(),
                });
            }
            // Observations never carry zero regions once validated.
            let region = match obs.single_region() {
                Some(candidate) => candidate.box_2d.denormalize(width, height)?,
                None => continue,
            };
            samples.push(TrackSample {
                t: obs.seconds as f64,
                region,
            });
        }

        Ok(Self {
            samples,
            width,
            height,
            policy: InterpolationPolicy::default(),
        })
    }

    /// Build a track from already-pixel-space samples, as returned by the
    /// tracking collaborator. Samples are sorted by time.
    pub fn from_pixel_samples(
        mut samples: Vec<TrackSample>,
        width: u32,
        height: u32,
    ) -> Self {
        samples.sort_by(|a, b| a.t.partial_cmp(&b.t).unwrap_or(std::cmp::Ordering::Equal));
        samples.dedup_by(|a, b| a.t == b.t);
        Self {
            samples,
            width,
            height,
            policy: InterpolationPolicy::default(),
        }
    }

    /// Switch the interpolation policy.
    pub fn with_policy(mut self, policy: InterpolationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The region to suppress at time `t`, or `None` for an empty track.
    pub fn region_at(&self, t: f64) -> Option<PixelBox> {
        let (first, last) = (self.samples.first()?, self.samples.last()?);

        if t < first.t {
            return Some(first.region);
        }
        if t >= last.t {
            return Some(last.region);
        }

        // Unique i with t_i <= t < t_{i+1}.
        let idx = self.samples.partition_point(|s| s.t <= t) - 1;
        match self.policy {
            InterpolationPolicy::HoldUntilNext => Some(self.samples[idx].region),
            InterpolationPolicy::Linear => {
                let (a, b) = (&self.samples[idx], &self.samples[idx + 1]);
                let frac = (t - a.t) / (b.t - a.t);
                Some(lerp_box(a.region, b.region, frac))
            }
        }
    }

    /// Whether this track holds one region for the whole timeline.
    pub fn is_constant(&self) -> bool {
        self.samples.len() == 1
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[TrackSample] {
        &self.samples
    }

    /// Resolution this track was denormalized for.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn lerp_box(a: PixelBox, b: PixelBox, frac: f64) -> PixelBox {
    let lerp = |from: u32, to: u32| -> u32 {
        (from as f64 + (to as f64 - from as f64) * frac).round() as u32
    };
    PixelBox {
        x: lerp(a.x, b.x),
        y: lerp(a.y, b.y),
        w: lerp(a.w, b.w),
        h: lerp(a.h, b.h),
    }
}
