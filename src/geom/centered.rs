//! Center, size, and angle resolution for centered (radial) series.
//!
//! Options arrive as pixel numbers or percent strings ("50%"). The center is
//! relative to the plot area; diameters are relative to the smaller plot
//! dimension. Angles arrive in degrees with 0 at 12 o'clock and are converted
//! to trig radians by the −90° offset.

use serde::{Deserialize, Serialize};

/// A length given either in pixels or as a percentage of some base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Size {
    /// Absolute pixels.
    Px(f64),
    /// A string, usually "NN%"; bare numeric strings count as pixels.
    Text(String),
}

impl Size {
    /// Percent of 100.
    pub fn percent(value: f64) -> Self {
        Self::Text(format!("{value}%"))
    }

    /// Resolve against a base length. Unparseable strings resolve to 0.
    pub fn resolve(&self, base: f64) -> f64 {
        match self {
            Self::Px(px) => *px,
            Self::Text(text) => {
                let trimmed = text.trim();
                if let Some(stripped) = trimmed.strip_suffix('%') {
                    stripped.trim().parse::<f64>().unwrap_or(0.0) / 100.0 * base
                } else {
                    trimmed.parse::<f64>().unwrap_or(0.0)
                }
            }
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

/// Resolved geometry inputs for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedGeometry {
    /// Chart center x, in plot-area pixels.
    pub cx: f64,
    /// Chart center y, in plot-area pixels.
    pub cy: f64,
    /// Overall inner radius (center hole).
    pub inner_r: f64,
    /// Overall outer radius.
    pub outer_r: f64,
    /// Start angle in radians.
    pub start_rad: f64,
    /// End angle in radians.
    pub end_rad: f64,
}

/// Resolve the center point and diameters against the plot area.
///
/// Returns `(cx, cy, diameter, inner_diameter)`. Diameters resolve against
/// the smaller plot dimension; the inner diameter is clamped to the outer.
pub fn get_center(
    center: &[Size; 2],
    size: &Size,
    inner_size: &Size,
    plot_width: f64,
    plot_height: f64,
) -> (f64, f64, f64, f64) {
    let smaller = plot_width.min(plot_height);
    let cx = center[0].resolve(plot_width);
    let cy = center[1].resolve(plot_height);
    let diameter = size.resolve(smaller).max(0.0);
    let inner = inner_size.resolve(smaller).clamp(0.0, diameter);
    (cx, cy, diameter, inner)
}

/// Convert start/end angles in degrees to trig radians.
///
/// The end angle must lie inside `(start, start + 360]` to be honored;
/// anything else (including an absent end) spans the full circle. Both are
/// offset by −90° so 0° points at 12 o'clock.
pub fn start_end_radians(start_deg: f64, end_deg: Option<f64>) -> (f64, f64) {
    let start = if start_deg.is_finite() { start_deg } else { 0.0 };
    let end = match end_deg {
        Some(end) if end.is_finite() && end > start && end - start < 360.0 => end,
        _ => start + 360.0,
    };
    ((start - 90.0).to_radians(), (end - 90.0).to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_size_resolve() {
        assert_eq!(Size::Px(25.0).resolve(400.0), 25.0);
        assert_eq!(Size::Text("50%".to_string()).resolve(400.0), 200.0);
        assert_eq!(Size::Text(" 10 %".to_string()).resolve(400.0), 40.0);
        assert_eq!(Size::Text("32".to_string()).resolve(400.0), 32.0);
        assert_eq!(Size::Text("garbage".to_string()).resolve(400.0), 0.0);
    }

    #[test]
    fn test_get_center_defaults() {
        let center = [Size::percent(50.0), Size::percent(50.0)];
        let (cx, cy, d, inner) = get_center(
            &center,
            &Size::percent(100.0),
            &Size::Px(0.0),
            600.0,
            400.0,
        );
        assert_eq!(cx, 300.0);
        assert_eq!(cy, 200.0);
        // Diameter resolves against the smaller dimension.
        assert_eq!(d, 400.0);
        assert_eq!(inner, 0.0);
    }

    #[test]
    fn test_inner_clamped_to_outer() {
        let center = [Size::Px(0.0), Size::Px(0.0)];
        let (_, _, d, inner) = get_center(
            &center,
            &Size::Px(100.0),
            &Size::Px(250.0),
            500.0,
            500.0,
        );
        assert_eq!(d, 100.0);
        assert_eq!(inner, 100.0);
    }

    #[test]
    fn test_start_end_radians_full_circle_default() {
        let (start, end) = start_end_radians(0.0, None);
        assert!((start - (-PI / 2.0)).abs() < 1e-12);
        assert!((end - (3.0 * PI / 2.0)).abs() < 1e-12);
        assert!((end - start - 2.0 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_start_end_radians_partial_span() {
        let (start, end) = start_end_radians(90.0, Some(270.0));
        assert!((start - 0.0).abs() < 1e-12);
        assert!((end - PI).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_end_falls_back_to_full_circle() {
        // End before start.
        let (start, end) = start_end_radians(180.0, Some(90.0));
        assert!((end - start - 2.0 * PI).abs() < 1e-12);
        // Span of exactly 360 keeps the full circle, wider is rejected too.
        let (start, end) = start_end_radians(0.0, Some(720.0));
        assert!((end - start - 2.0 * PI).abs() < 1e-12);
    }
}
