//! Detection sets: what overlay regions exist at which timestamps.
//!
//! A [`DetectionSet`] is built wholesale from a vision-service response,
//! ordered by timestamp, and edited by the reviewer with whole-entry
//! semantics (entries are removed or replaced, never partially mutated).

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ModelError, ModelResult};
use crate::rect::NormalizedBox;
use crate::timestamp::{format_timestamp, parse_timestamp};

/// Wire shape of one detection-service entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawObservation {
    pub ts: String,
    #[serde(default)]
    pub boxes: Vec<RawBox>,
}

/// Wire shape of one candidate box inside a [`RawObservation`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBox {
    pub label: String,
    pub box_2d: [i64; 4],
    pub score: f64,
}

/// One validated candidate region at a sampled instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionCandidate {
    pub label: String,
    pub box_2d: NormalizedBox,
    pub score: f64,
}

/// Zero or more candidate regions detected at one sampled instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Canonical `MM:SS` timestamp of the sample.
    pub ts: String,
    /// Elapsed seconds, derived from `ts`.
    pub seconds: u64,
    /// Candidate regions, in service order.
    pub regions: Vec<RegionCandidate>,
}

impl Observation {
    /// The single active region, if this observation has been reduced to
    /// exactly one candidate.
    pub fn single_region(&self) -> Option<&RegionCandidate> {
        match self.regions.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }
}

/// A timestamp-ordered sequence of observations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionSet {
    observations: Vec<Observation>,
}

impl DetectionSet {
    /// Build a detection set from raw service output.
    ///
    /// The service is untrusted: entries with malformed timestamps and
    /// candidates with out-of-range or degenerate boxes are dropped with a
    /// warning instead of failing the whole set. Entries are sorted by
    /// timestamp; duplicate timestamps keep the first occurrence.
    pub fn from_raw_observations(raw: Vec<RawObservation>) -> Self {
        let mut observations: Vec<Observation> = Vec::with_capacity(raw.len());

        for entry in raw {
            let seconds = match parse_timestamp(&entry.ts) {
                Ok(s) => s,
                Err(e) => {
                    warn!(ts = %entry.ts, error = %e, "Dropping observation with malformed timestamp");
                    continue;
                }
            };

            let mut regions = Vec::with_capacity(entry.boxes.len());
            for raw_box in entry.boxes {
                match NormalizedBox::from_raw(raw_box.box_2d) {
                    Ok(box_2d) => regions.push(RegionCandidate {
                        label: raw_box.label,
                        box_2d,
                        score: raw_box.score.clamp(0.0, 1.0),
                    }),
                    Err(e) => {
                        warn!(ts = %entry.ts, error = %e, "Dropping invalid candidate box");
                    }
                }
            }

            if regions.is_empty() {
                warn!(ts = %entry.ts, "Dropping observation with no valid regions");
                continue;
            }

            observations.push(Observation {
                ts: format_timestamp(seconds),
                seconds,
                regions,
            });
        }

        observations.sort_by_key(|o| o.seconds);
        observations.dedup_by_key(|o| o.seconds);

        Self { observations }
    }

    /// Build a single-entry set from one already-validated observation.
    pub fn from_single(observation: Observation) -> Self {
        Self {
            observations: vec![observation],
        }
    }

    /// Remove the entry with exactly this `MM:SS` timestamp.
    ///
    /// The editor only ever removes entries it is displaying, so exact
    /// match is sufficient.
    pub fn remove_observation(&mut self, ts: &str) -> ModelResult<()> {
        let seconds = parse_timestamp(ts)?;
        let idx = self
            .observations
            .iter()
            .position(|o| o.seconds == seconds)
            .ok_or_else(|| ModelError::not_found(ts))?;
        self.observations.remove(idx);
        Ok(())
    }

    /// Replace the entry at the same timestamp, or insert in order.
    ///
    /// Whole-entry semantics: review edits swap observations out, they do
    /// not mutate candidates in place.
    pub fn replace_observation(&mut self, observation: Observation) {
        match self
            .observations
            .binary_search_by_key(&observation.seconds, |o| o.seconds)
        {
            Ok(idx) => self.observations[idx] = observation,
            Err(idx) => self.observations.insert(idx, observation),
        }
    }

    /// Latest observation at or before `t` seconds, if any.
    pub fn nearest_before(&self, t: f64) -> Option<&Observation> {
        let idx = self
            .observations
            .partition_point(|o| (o.seconds as f64) <= t);
        idx.checked_sub(1).map(|i| &self.observations[i])
    }

    /// Earliest observation strictly after `t` seconds, if any.
    pub fn nearest_after(&self, t: f64) -> Option<&Observation> {
        let idx = self
            .observations
            .partition_point(|o| (o.seconds as f64) <= t);
        self.observations.get(idx)
    }

    /// Reduce every observation to its highest-scoring candidate.
    ///
    /// Headless runs have no reviewer to pick between candidates, so the
    /// score breaks the tie before a region track is built.
    pub fn reduce_to_best(&mut self) {
        for obs in &mut self.observations {
            if obs.regions.len() > 1 {
                obs.regions.sort_by(|a, b| {
                    b.score
                        .partial_cmp(&a.score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                obs.regions.truncate(1);
            }
        }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
