//! Translation of a [`FilterPlan`] into concrete FFmpeg filter-graph
//! syntax.
//!
//! The plan itself is transcoder-agnostic; only this module knows that
//! in-painting maps to `delogo` and blur maps to a crop/boxblur/overlay
//! chain. Keeping the translation separate keeps the synthesis algorithm
//! testable without a transcoder present.

use demark_models::{PixelBox, RemovalMethod};

use crate::error::{MediaError, MediaResult};
use crate::plan::FilterPlan;

/// Blur strength for the confined boxblur chain.
const BLUR_LUMA_RADIUS: u32 = 10;
const BLUR_LUMA_POWER: u32 = 2;

/// A concrete FFmpeg filter graph for a plan.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterGraph {
    /// Simple `-vf` chain (single input, single output).
    VideoFilter(String),
    /// `-filter_complex` graph with a labeled output to map.
    FilterComplex {
        graph: String,
        output_label: String,
    },
}

/// Translate a plan into FFmpeg syntax for a `width`x`height` video.
///
/// All entries in a plan share one method, so the graph shape is uniform:
/// `delogo` chains ride `-vf`, blur chains need `-filter_complex`.
pub fn translate_plan(plan: &FilterPlan, width: u32, height: u32) -> MediaResult<FilterGraph> {
    let entries = plan.entries();
    let Some(first) = entries.first() else {
        return Err(MediaError::EmptyPlan);
    };

    match first.method {
        RemovalMethod::InPaint => Ok(FilterGraph::VideoFilter(build_delogo_chain(
            plan, width, height,
        ))),
        RemovalMethod::Blur => Ok(build_blur_graph(plan, width, height)),
    }
}

/// Comma-joined `delogo` chain, one time-gated filter per entry.
fn build_delogo_chain(plan: &FilterPlan, width: u32, height: u32) -> String {
    plan.entries()
        .iter()
        .map(|entry| {
            let b = inset_for_delogo(entry.region, width, height);
            format!(
                "delogo=x={}:y={}:w={}:h={}:enable='between(t,{:.3},{:.3})'",
                b.x, b.y, b.w, b.h, entry.start, entry.end
            )
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Labeled crop/boxblur/overlay chains, threaded through intermediate
/// labels so each entry blurs on top of the previous stage's output.
fn build_blur_graph(plan: &FilterPlan, width: u32, height: u32) -> FilterGraph {
    let mut chains: Vec<String> = Vec::new();
    let mut prev = "0:v".to_string();

    for (i, entry) in plan.entries().iter().enumerate() {
        let b = clamp_to_frame(entry.region, width, height);
        let out = format!("v{i}");
        chains.push(format!(
            "[{prev}]split=2[base{i}][roi{i}];\
             [roi{i}]crop={w}:{h}:{x}:{y},boxblur=luma_radius={r}:luma_power={p}[blur{i}];\
             [base{i}][blur{i}]overlay={x}:{y}:enable='between(t,{start:.3},{end:.3})'[{out}]",
            w = b.w,
            h = b.h,
            x = b.x,
            y = b.y,
            r = BLUR_LUMA_RADIUS,
            p = BLUR_LUMA_POWER,
            start = entry.start,
            end = entry.end,
        ));
        prev = out;
    }

    FilterGraph::FilterComplex {
        graph: chains.join(";"),
        output_label: prev,
    }
}

/// `delogo` rejects rectangles touching any frame edge; keep one pixel
/// clear on all four sides, shifting a minimal box inward when shrinking
/// alone would leave it on the far edge.
fn inset_for_delogo(region: PixelBox, width: u32, height: u32) -> PixelBox {
    let mut b = clamp_to_frame(region, width, height);

    b.x = b.x.max(1);
    b.y = b.y.max(1);
    b.w = b.w.min(width.saturating_sub(b.x + 1)).max(1);
    b.h = b.h.min(height.saturating_sub(b.y + 1)).max(1);
    if b.x + b.w >= width {
        b.x = width.saturating_sub(b.w + 1).max(1);
    }
    if b.y + b.h >= height {
        b.y = height.saturating_sub(b.h + 1).max(1);
    }

    b
}

fn clamp_to_frame(mut b: PixelBox, width: u32, height: u32) -> PixelBox {
    b.x = b.x.min(width.saturating_sub(1));
    b.y = b.y.min(height.saturating_sub(1));
    b.w = b.w.clamp(1, width - b.x);
    b.h = b.h.clamp(1, height - b.y);
    b
}
