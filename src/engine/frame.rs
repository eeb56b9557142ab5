//! Text boxes and the inspection frame
//!
//! The text box (expanded by the text gap) decides whether a dimension line
//! or arc must be split around the annotation; the inspection frame wraps
//! the text in a rounded border with separators between its sections.

use super::{TextBlock, TextMeasurer};
use crate::primitives::{DimensionGraphics, GraphicsRole, PrimitiveFactory};
use crate::style::DimStyle;
use crate::types::Vector2;

const SPLIT_TOL: f64 = 1e-9;

/// Split a segment around a text box expanded by `gap`
///
/// Returns the surviving sub-segments in order from `a` to `b`: the whole
/// segment when the box stays clear, one or two pieces when the box covers
/// an end or the middle, nothing when the box swallows the segment.
pub fn split_segment_around_text(
    a: Vector2,
    b: Vector2,
    text: &TextBlock,
    gap: f64,
) -> Vec<(Vector2, Vector2)> {
    let axis = b - a;
    let len = axis.length();
    if len < SPLIT_TOL {
        return vec![(a, b)];
    }
    let d = axis / len;

    let corners = text.corners(gap);
    let mut above = 0;
    let mut below = 0;
    for c in &corners {
        let lateral = d.cross(&(*c - a));
        if lateral > SPLIT_TOL {
            above += 1;
        } else if lateral < -SPLIT_TOL {
            below += 1;
        }
    }
    // Box entirely on one side of the line
    if above == 0 || below == 0 {
        return vec![(a, b)];
    }

    let mut tmin = f64::INFINITY;
    let mut tmax = f64::NEG_INFINITY;
    for c in &corners {
        let t = (*c - a).dot(&d);
        tmin = tmin.min(t);
        tmax = tmax.max(t);
    }
    let cut_start = tmin.max(0.0);
    let cut_end = tmax.min(len);
    if cut_start >= cut_end {
        return vec![(a, b)];
    }

    let mut segments = Vec::new();
    if cut_start > SPLIT_TOL {
        segments.push((a, a + d * cut_start));
    }
    if cut_end < len - SPLIT_TOL {
        segments.push((a + d * cut_end, b));
    }
    segments
}

/// Inspection text plus separator offsets from the box center
#[derive(Debug, Clone, PartialEq)]
pub struct InspectionLayout {
    /// Joined section content
    pub content: String,
    /// Separator positions measured from the box center along the reading
    /// direction
    pub separators: Vec<f64>,
}

/// Join inspection sections and locate the separators between them
pub fn inspection_layout(
    label: Option<&str>,
    value: &str,
    rate: Option<&str>,
    style: &DimStyle,
    measurer: &dyn TextMeasurer,
) -> InspectionLayout {
    let mut sections: Vec<&str> = Vec::new();
    if let Some(label) = label {
        sections.push(label);
    }
    sections.push(value);
    if let Some(rate) = rate {
        sections.push(rate);
    }
    let content = sections.join("  ");
    let height = style.text_height();
    let total = measurer.extents(&content, height).width();

    let mut separators = Vec::new();
    let mut consumed = String::new();
    for section in &sections[..sections.len() - 1] {
        if !consumed.is_empty() {
            consumed.push_str("  ");
        }
        consumed.push_str(section);
        let w = measurer.extents(&consumed, height).width();
        let spacer = measurer.extents("  ", height).width();
        separators.push(w + spacer * 0.5 - total * 0.5);
    }

    InspectionLayout {
        content,
        separators,
    }
}

/// Append the rounded inspection border around a text block
///
/// Two straight edges, two semicircular caps, and a vertical separator at
/// each section boundary.
pub fn inspection_frame(
    factory: &PrimitiveFactory,
    out: &mut DimensionGraphics,
    text: &TextBlock,
    gap: f64,
    separators: &[f64],
) {
    let u = text.direction;
    let v = u.perp();
    let half_w = text.width * 0.5;
    let half_h = text.height * 0.5 + gap;

    let top_a = text.position - u * half_w + v * half_h;
    let top_b = text.position + u * half_w + v * half_h;
    let bot_a = text.position - u * half_w - v * half_h;
    let bot_b = text.position + u * half_w - v * half_h;
    out.push(factory.dim_line(top_a, top_b), GraphicsRole::None);
    out.push(factory.dim_line(bot_a, bot_b), GraphicsRole::None);

    let v_angle = v.angle();
    let left_center = text.position - u * half_w;
    let right_center = text.position + u * half_w;
    out.push(
        factory.dim_arc(left_center, half_h, v_angle, v_angle + std::f64::consts::PI),
        GraphicsRole::None,
    );
    out.push(
        factory.dim_arc(right_center, half_h, v_angle - std::f64::consts::PI, v_angle),
        GraphicsRole::None,
    );

    for offset in separators {
        let base = text.position + u * *offset;
        out.push(
            factory.dim_line(base - v * half_h, base + v * half_h),
            GraphicsRole::None,
        );
    }
}
