//! Filter-plan synthesis: from a region track to an ordered sequence of
//! time-gated removal operations.
//!
//! The plan deliberately narrows the hold-until-next semantics: instead of
//! re-running the filter for an entire inter-sample gap, each sampled
//! region is only suppressed for a bounded dwell window around its sample
//! instant, clamped to the next sample. A region the detector lost track
//! of is therefore never extended past its safety margin.

use demark_models::{PixelBox, RemovalMethod};

use crate::error::{MediaError, MediaResult};
use crate::track::RegionTrack;

/// Default dwell window in seconds, the inverse of the default 2 fps
/// sampling rate.
pub const DEFAULT_DWELL_SECS: f64 = 0.5;

/// One time-gated removal operation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanEntry {
    /// Pixel region to repair.
    pub region: PixelBox,
    /// Activation interval in seconds, half-open `(start, end)`.
    pub start: f64,
    pub end: f64,
    /// Removal method for this entry.
    pub method: RemovalMethod,
}

/// Ordered, declarative description of the removal work, consumed by the
/// filter-graph translation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPlan {
    entries: Vec<PlanEntry>,
}

impl FilterPlan {
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compiles a [`RegionTrack`] into a [`FilterPlan`].
#[derive(Debug, Clone)]
pub struct FilterPlanBuilder {
    method: RemovalMethod,
    dwell_secs: f64,
}

impl FilterPlanBuilder {
    pub fn new(method: RemovalMethod) -> Self {
        Self {
            method,
            dwell_secs: DEFAULT_DWELL_SECS,
        }
    }

    /// Override the dwell window. Values at or below zero fall back to the
    /// default.
    pub fn with_dwell_secs(mut self, dwell_secs: f64) -> Self {
        self.dwell_secs = if dwell_secs > 0.0 {
            dwell_secs
        } else {
            DEFAULT_DWELL_SECS
        };
        self
    }

    /// Build the plan for a video of `duration_secs`.
    ///
    /// - A constant track yields a single entry covering the whole video.
    /// - A sampled track yields one entry per sample, gated to
    ///   `(t_i, min(t_i + dwell, t_{i+1}))`; the last entry is clamped to
    ///   the video duration. Entries never overlap for strictly increasing
    ///   sample times.
    /// - An empty result fails with [`MediaError::EmptyPlan`]: "nothing to
    ///   remove" must surface as a precondition failure, not a no-op
    ///   output video.
    ///
    /// Every removal method gets full temporal coverage; there is no
    /// first-sample-only degradation for any method.
    pub fn build(&self, track: &RegionTrack, duration_secs: f64) -> MediaResult<FilterPlan> {
        if duration_secs <= 0.0 {
            return Err(MediaError::invalid_video(format!(
                "non-positive video duration: {duration_secs}"
            )));
        }

        if track.is_empty() {
            return Err(MediaError::EmptyPlan);
        }

        if track.is_constant() {
            let region = track
                .region_at(0.0)
                .ok_or(MediaError::EmptyPlan)?;
            return Ok(FilterPlan {
                entries: vec![PlanEntry {
                    region,
                    start: 0.0,
                    end: duration_secs,
                    method: self.method,
                }],
            });
        }

        let samples = track.samples();
        let mut entries = Vec::with_capacity(samples.len());

        for (i, sample) in samples.iter().enumerate() {
            if sample.t >= duration_secs {
                break;
            }

            let next_t = samples
                .get(i + 1)
                .map(|s| s.t)
                .unwrap_or(duration_secs);
            let end = (sample.t + self.dwell_secs).min(next_t).min(duration_secs);
            if end <= sample.t {
                continue;
            }

            entries.push(PlanEntry {
                region: sample.region,
                start: sample.t,
                end,
                method: self.method,
            });
        }

        if entries.is_empty() {
            return Err(MediaError::EmptyPlan);
        }

        Ok(FilterPlan { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackSample;

    fn pb(x: u32, y: u32, w: u32, h: u32) -> PixelBox {
        PixelBox { x, y, w, h }
    }

    fn sampled_track(times: &[f64]) -> RegionTrack {
        RegionTrack::from_pixel_samples(
            times
                .iter()
                .map(|&t| TrackSample {
                    t,
                    region: pb(10, 10, 100, 50),
                })
                .collect(),
            1920,
            1080,
        )
    }

    #[test]
    fn test_constant_track_single_full_entry() {
        let track = RegionTrack::constant(pb(10, 10, 100, 50), 1920, 1080);
        let plan = FilterPlanBuilder::new(RemovalMethod::InPaint)
            .build(&track, 10.0)
            .unwrap();

        assert_eq!(plan.len(), 1);
        let entry = &plan.entries()[0];
        assert_eq!(entry.start, 0.0);
        assert_eq!(entry.end, 10.0);
    }

    #[test]
    fn test_empty_track_fails() {
        let track = RegionTrack::from_pixel_samples(Vec::new(), 1920, 1080);
        assert!(matches!(
            FilterPlanBuilder::new(RemovalMethod::Blur).build(&track, 10.0),
            Err(MediaError::EmptyPlan)
        ));
    }

    #[test]
    fn test_dwell_window_clamped_to_next_sample() {
        // Samples 0.25s apart with a 0.5s dwell: each entry must end at
        // the next sample, never past it.
        let track = sampled_track(&[0.0, 0.25, 0.5]);
        let plan = FilterPlanBuilder::new(RemovalMethod::InPaint)
            .build(&track, 10.0)
            .unwrap();

        assert_eq!(plan.len(), 3);
        assert_eq!(plan.entries()[0].end, 0.25);
        assert_eq!(plan.entries()[1].end, 0.5);
        // Last entry gets the full dwell window.
        assert_eq!(plan.entries()[2].end, 1.0);
    }

    #[test]
    fn test_entries_never_overlap() {
        let track = sampled_track(&[0.0, 0.4, 1.0, 7.0]);
        let plan = FilterPlanBuilder::new(RemovalMethod::Blur)
            .build(&track, 10.0)
            .unwrap();

        for pair in plan.entries().windows(2) {
            assert!(pair[0].end <= pair[1].start + f64::EPSILON);
        }
    }

    #[test]
    fn test_samples_past_duration_dropped() {
        let track = sampled_track(&[0.0, 5.0, 15.0]);
        let plan = FilterPlanBuilder::new(RemovalMethod::InPaint)
            .build(&track, 10.0)
            .unwrap();

        assert_eq!(plan.len(), 2);
        assert!(plan.entries().iter().all(|e| e.end <= 10.0));
    }

    #[test]
    fn test_blur_gets_every_sample() {
        // Full temporal coverage under every method: blur must not
        // collapse to the first sample.
        let track = sampled_track(&[0.0, 1.0, 2.0, 3.0]);
        let plan = FilterPlanBuilder::new(RemovalMethod::Blur)
            .build(&track, 10.0)
            .unwrap();
        assert_eq!(plan.len(), 4);
    }
}
