//! Enter and drill tween descriptors.
//!
//! The engine does not animate; it computes the attribute state an arc should
//! tween *from*, leaving interpolation to the renderer. Three situations
//! produce a synthetic origin:
//!
//! - first render: every arc sweeps in from the chart start angle;
//! - root change: the new root expands out of the full chart span, while
//!   entering descendants grow outward from the center hole, appearing from
//!   the end angle when they sit entirely clockwise of the previous root's
//!   span and from the start angle otherwise;
//! - a point added after the first render pops in collapsed at its own end
//!   angle.
//!
//! An arc that already has a graphic just tweens its current attributes to
//! the target, so `from` stays empty.

use serde::Serialize;

use super::shape::ArcShape;

/// The animatable attribute set of an arc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcState {
    /// Chart center x.
    pub x: f64,
    /// Chart center y.
    pub y: f64,
    /// Inner radius.
    pub inner_r: f64,
    /// Outer radius.
    pub r: f64,
    /// Start angle in radians.
    pub start: f64,
    /// End angle in radians.
    pub end: f64,
}

impl From<&ArcShape> for ArcState {
    fn from(shape: &ArcShape) -> Self {
        Self {
            x: shape.x,
            y: shape.y,
            inner_r: shape.inner_r,
            r: shape.r,
            start: shape.start,
            end: shape.end,
        }
    }
}

/// A from/to pair for one arc. `from` is absent when the renderer should
/// tween from the arc's current on-screen attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcTween {
    /// Synthetic origin state, if one applies.
    pub from: Option<ArcState>,
    /// Target state.
    pub to: ArcState,
}

/// Chart-wide inputs for tween computation.
#[derive(Debug, Clone, Copy)]
pub struct TweenContext {
    /// Whether the series has completed its first render.
    pub has_rendered: bool,
    /// Chart start angle in radians.
    pub chart_start: f64,
    /// Chart end angle in radians.
    pub chart_end: f64,
    /// Overall inner radius (the center hole entering arcs grow out of).
    pub center_inner_r: f64,
    /// The previous root's shape, when the root changed since the last pass.
    pub previous_root: Option<ArcShape>,
}

/// Compute the tween for one arc.
pub fn enter_tween(
    shape: &ArcShape,
    is_root: bool,
    has_graphic: bool,
    ctx: &TweenContext,
) -> ArcTween {
    let to = ArcState::from(shape);

    if !ctx.has_rendered {
        return ArcTween {
            from: Some(ArcState {
                start: ctx.chart_start,
                end: ctx.chart_start,
                ..to
            }),
            to,
        };
    }

    if has_graphic {
        return ArcTween { from: None, to };
    }

    if let Some(prev) = ctx.previous_root {
        let (start, end) = if is_root {
            (ctx.chart_start, ctx.chart_end)
        } else if prev.end <= shape.start {
            (ctx.chart_end, ctx.chart_end)
        } else {
            (ctx.chart_start, ctx.chart_start)
        };
        return ArcTween {
            from: Some(ArcState {
                inner_r: ctx.center_inner_r,
                r: ctx.center_inner_r,
                start,
                end,
                ..to
            }),
            to,
        };
    }

    // New point after the first render: collapsed at its own end angle.
    ArcTween {
        from: Some(ArcState { start: to.end, ..to }),
        to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn shape(start: f64, end: f64) -> ArcShape {
        ArcShape {
            x: 100.0,
            y: 100.0,
            inner_r: 40.0,
            r: 60.0,
            thickness: 20.0,
            start,
            end,
        }
    }

    fn ctx(has_rendered: bool, previous_root: Option<ArcShape>) -> TweenContext {
        TweenContext {
            has_rendered,
            chart_start: -PI / 2.0,
            chart_end: 3.0 * PI / 2.0,
            center_inner_r: 10.0,
            previous_root,
        }
    }

    #[test]
    fn test_first_render_sweeps_from_chart_start() {
        let s = shape(0.0, PI);
        let tween = enter_tween(&s, false, false, &ctx(false, None));
        let from = tween.from.unwrap();
        assert_eq!(from.start, -PI / 2.0);
        assert_eq!(from.end, -PI / 2.0);
        // Radii are already in place; only the sweep animates.
        assert_eq!(from.inner_r, 40.0);
        assert_eq!(from.r, 60.0);
        assert_eq!(tween.to.end, PI);
    }

    #[test]
    fn test_existing_graphic_keeps_current_attrs() {
        let s = shape(0.0, PI);
        let tween = enter_tween(&s, false, true, &ctx(true, None));
        assert!(tween.from.is_none());
    }

    #[test]
    fn test_new_root_expands_from_full_span() {
        let s = shape(-PI / 2.0, 3.0 * PI / 2.0);
        let prev = shape(0.0, PI / 3.0);
        let tween = enter_tween(&s, true, false, &ctx(true, Some(prev)));
        let from = tween.from.unwrap();
        assert_eq!(from.start, -PI / 2.0);
        assert_eq!(from.end, 3.0 * PI / 2.0);
        // Entering from the center hole.
        assert_eq!(from.inner_r, 10.0);
        assert_eq!(from.r, 10.0);
    }

    #[test]
    fn test_descendants_enter_relative_to_previous_root() {
        let prev = shape(0.0, PI / 4.0);

        // Entirely clockwise of the previous root's span: appears at the end.
        let after = shape(PI / 2.0, PI);
        let tween = enter_tween(&after, false, false, &ctx(true, Some(prev)));
        let from = tween.from.unwrap();
        assert_eq!(from.start, 3.0 * PI / 2.0);
        assert_eq!(from.end, 3.0 * PI / 2.0);

        // Overlapping or before: appears at the start.
        let before = shape(0.0, PI / 8.0);
        let tween = enter_tween(&before, false, false, &ctx(true, Some(prev)));
        let from = tween.from.unwrap();
        assert_eq!(from.start, -PI / 2.0);
        assert_eq!(from.end, -PI / 2.0);
        assert_eq!(from.r, 10.0);
    }

    #[test]
    fn test_added_point_pops_in_at_own_end() {
        let s = shape(PI / 4.0, PI / 2.0);
        let tween = enter_tween(&s, false, false, &ctx(true, None));
        let from = tween.from.unwrap();
        assert_eq!(from.start, PI / 2.0);
        assert_eq!(from.end, PI / 2.0);
        assert_eq!(from.inner_r, 40.0);
    }
}
