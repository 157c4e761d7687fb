//! Sunburst - WASM Module
//!
//! This module provides the radial layout engine for the Sunburst
//! visualization library. It is compiled to WebAssembly and exposes a
//! JavaScript-friendly API via wasm-bindgen; a canvas/SVG renderer on the JS
//! side draws the arcs from the shape buffers computed here.
//!
//! # Architecture
//!
//! - `tree`: point rows, petgraph topology, value aggregation, SoA buffers
//! - `layout`: radial partitioner and the sunburst layout driver
//! - `geom`: center/size/angle option resolution
//! - `render`: shape, data-label, and tween descriptors
//! - `spatial`: R-tree centroid index for anchor queries

use js_sys::{Float64Array, Uint32Array};
use wasm_bindgen::prelude::*;

pub mod geom;
pub mod layout;
pub mod render;
pub mod spatial;
pub mod tree;

use tree::{ChartOptions, PointInit, SunburstEngine};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Main entry point for the sunburst engine.
///
/// This struct wraps the internal SunburstEngine and provides the public API
/// exposed to JavaScript.
#[wasm_bindgen]
pub struct SunburstWasm {
    engine: SunburstEngine,
}

#[wasm_bindgen]
impl SunburstWasm {
    /// Create a new empty sunburst engine.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            engine: SunburstEngine::new(),
        }
    }

    /// Create an engine with pre-allocated capacity.
    ///
    /// # Arguments
    ///
    /// * `point_capacity` - Expected number of points
    #[wasm_bindgen(js_name = withCapacity)]
    pub fn with_capacity(point_capacity: usize) -> Self {
        Self {
            engine: SunburstEngine::with_capacity(point_capacity),
        }
    }

    // =========================================================================
    // Point Operations
    // =========================================================================

    /// Add a point, or update it in place when the id already exists.
    ///
    /// Returns the point's stable slot, the index into all buffer views.
    #[wasm_bindgen(js_name = addPoint)]
    pub fn add_point(&mut self, id: &str, parent_id: &str, value: Option<f64>) -> u32 {
        self.engine.add_point(id, parent_id, value).raw()
    }

    /// Bulk-load points from an array of `{id, parent?, value?, visible?}`
    /// objects. Returns the number of points added or updated.
    #[wasm_bindgen(js_name = setData)]
    pub fn set_data(&mut self, points: JsValue) -> Result<u32, JsValue> {
        let points: Vec<PointInit> = serde_wasm_bindgen::from_value(points)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(self.engine.set_data(&points))
    }

    /// Remove a point by id.
    ///
    /// Returns true if the point existed and was removed.
    #[wasm_bindgen(js_name = removePoint)]
    pub fn remove_point(&mut self, id: &str) -> bool {
        self.engine.remove_point(id)
    }

    /// Set a point's explicit value (pass undefined to make it a container).
    #[wasm_bindgen(js_name = setValue)]
    pub fn set_value(&mut self, id: &str, value: Option<f64>) -> bool {
        self.engine.set_value(id, value)
    }

    /// Set a point's visibility.
    #[wasm_bindgen(js_name = setVisible)]
    pub fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        self.engine.set_visible(id, visible)
    }

    /// Get the number of live points.
    #[wasm_bindgen(js_name = pointCount)]
    pub fn point_count(&self) -> u32 {
        self.engine.point_count()
    }

    /// Get the upper bound on slot indices (max slot + 1).
    /// May be larger than pointCount if points have been removed.
    #[wasm_bindgen(js_name = slotBound)]
    pub fn slot_bound(&self) -> u32 {
        self.engine.slot_bound()
    }

    /// Get a point's stable slot.
    #[wasm_bindgen(js_name = slotOf)]
    pub fn slot_of(&self, id: &str) -> Option<u32> {
        self.engine.slot_of(id).map(|n| n.raw())
    }

    /// Children ids of a point in angular order ("" for the super-root).
    #[wasm_bindgen(js_name = childrenOf)]
    pub fn children_of(&self, id: &str) -> Vec<String> {
        self.engine.children_of(id)
    }

    /// Clear all points and computed state.
    pub fn clear(&mut self) {
        self.engine.clear();
    }

    // =========================================================================
    // Options, Root Selection, Layout
    // =========================================================================

    /// Replace the chart options (center, size, angles, rootId, levels).
    #[wasm_bindgen(js_name = setOptions)]
    pub fn set_options(&mut self, options: JsValue) -> Result<(), JsValue> {
        let options: ChartOptions = serde_wasm_bindgen::from_value(options)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.engine.set_options(options);
        Ok(())
    }

    /// Current root id ("" = synthetic super-root).
    #[wasm_bindgen(js_name = rootId)]
    pub fn root_id(&self) -> String {
        self.engine.root_id().to_string()
    }

    /// Select the root point to lay out from.
    #[wasm_bindgen(js_name = setRootId)]
    pub fn set_root_id(&mut self, id: &str) {
        self.engine.set_root(id);
    }

    /// Resolve the drill target for an activated point without navigating.
    #[wasm_bindgen(js_name = drillTargetId)]
    pub fn drill_target_id(&mut self, point_id: &str) -> Option<String> {
        self.engine.drill_target(point_id)
    }

    /// Drill into (or out of) a point. Returns the new root id.
    #[wasm_bindgen(js_name = drillTo)]
    pub fn drill_to(&mut self, point_id: &str) -> Option<String> {
        self.engine.drill_to(point_id)
    }

    /// Run one layout pass against the given plot area.
    ///
    /// Returns `{laidOut, radiusPerLevel}`. On failure the previous frame
    /// stays valid; the error names the unresolved root.
    #[wasm_bindgen(js_name = computeLayout)]
    pub fn compute_layout(&mut self, plot_width: f64, plot_height: f64) -> Result<JsValue, JsValue> {
        match self.engine.compute_layout(plot_width, plot_height) {
            Ok(stats) => serde_wasm_bindgen::to_value(&stats)
                .map_err(|e| JsValue::from_str(&e.to_string())),
            Err(err) => {
                let message = err.to_string();
                web_sys::console::warn_1(&JsValue::from_str(&message));
                Err(JsValue::from_str(&message))
            }
        }
    }

    /// Mark that the renderer completed its first paint.
    #[wasm_bindgen(js_name = markRendered)]
    pub fn mark_rendered(&mut self) {
        self.engine.mark_rendered();
    }

    // =========================================================================
    // Shape Buffer Access (Zero-Copy)
    // =========================================================================

    /// Get a zero-copy view of start angles (radians, slot-indexed).
    ///
    /// # Safety
    ///
    /// The returned view is invalidated if any Rust allocation occurs.
    /// Use immediately for drawing, do not store.
    #[wasm_bindgen(js_name = startsView)]
    pub fn starts_view(&self) -> Float64Array {
        unsafe { Float64Array::view(self.engine.starts()) }
    }

    /// Get a zero-copy view of end angles.
    ///
    /// # Safety
    ///
    /// See [`SunburstWasm::starts_view`].
    #[wasm_bindgen(js_name = endsView)]
    pub fn ends_view(&self) -> Float64Array {
        unsafe { Float64Array::view(self.engine.ends()) }
    }

    /// Get a zero-copy view of inner band radii.
    #[wasm_bindgen(js_name = innerRadiiView)]
    pub fn inner_radii_view(&self) -> Float64Array {
        unsafe { Float64Array::view(self.engine.inner_radii()) }
    }

    /// Get a zero-copy view of outer band radii.
    #[wasm_bindgen(js_name = outerRadiiView)]
    pub fn outer_radii_view(&self) -> Float64Array {
        unsafe { Float64Array::view(self.engine.outer_radii()) }
    }

    /// Get a zero-copy view of centroid x coordinates.
    #[wasm_bindgen(js_name = plotXView)]
    pub fn plot_x_view(&self) -> Float64Array {
        unsafe { Float64Array::view(self.engine.plot_x()) }
    }

    /// Get a zero-copy view of centroid y coordinates.
    #[wasm_bindgen(js_name = plotYView)]
    pub fn plot_y_view(&self) -> Float64Array {
        unsafe { Float64Array::view(self.engine.plot_y()) }
    }

    /// Get a zero-copy view of resolved point values.
    #[wasm_bindgen(js_name = valuesView)]
    pub fn values_view(&self) -> Float64Array {
        unsafe { Float64Array::view(self.engine.values()) }
    }

    /// Get a zero-copy view of node depths (from the top node).
    #[wasm_bindgen(js_name = depthsView)]
    pub fn depths_view(&self) -> Uint32Array {
        unsafe { Uint32Array::view(self.engine.depths()) }
    }

    /// Get a pointer to the start-angle buffer.
    ///
    /// Used for recreating views after WASM memory growth.
    #[wasm_bindgen(js_name = startsPtr)]
    pub fn starts_ptr(&self) -> *const f64 {
        self.engine.starts().as_ptr()
    }

    /// Get the length of the shape buffers.
    #[wasm_bindgen(js_name = buffersLen)]
    pub fn buffers_len(&self) -> usize {
        self.engine.starts().len()
    }

    /// Band thickness of the latest pass.
    #[wasm_bindgen(js_name = radiusPerLevel)]
    pub fn radius_per_level(&self) -> f64 {
        self.engine.radius_per_level()
    }

    // =========================================================================
    // Per-Point Queries
    // =========================================================================

    /// Whether the latest pass reached the point.
    #[wasm_bindgen(js_name = isLaidOut)]
    pub fn is_laid_out(&self, id: &str) -> bool {
        self.engine.is_laid_out(id)
    }

    /// Whether the point should be drawn this frame.
    #[wasm_bindgen(js_name = shouldDraw)]
    pub fn should_draw(&self, id: &str) -> bool {
        use crate::render::Drawable;
        self.engine
            .point_view(id)
            .map(|view| view.should_draw())
            .unwrap_or(false)
    }

    /// Shape descriptor for a point as `{x, y, innerR, r, thickness, start,
    /// end}`, possibly stale. The empty id returns the top band.
    #[wasm_bindgen(js_name = shapeArgs)]
    pub fn shape_args(&self, id: &str) -> Result<JsValue, JsValue> {
        match self.engine.shape(id) {
            Some(shape) => serde_wasm_bindgen::to_value(&shape)
                .map_err(|e| JsValue::from_str(&e.to_string())),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Data-label placement `{x, y, rotation, width}` for a laid-out point.
    #[wasm_bindgen(js_name = dataLabel)]
    pub fn data_label(&self, id: &str) -> Result<JsValue, JsValue> {
        match self.engine.data_label(id) {
            Some(label) => serde_wasm_bindgen::to_value(&label)
                .map_err(|e| JsValue::from_str(&e.to_string())),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Tween descriptor `{from?, to}` for a laid-out point.
    #[wasm_bindgen(js_name = arcTween)]
    pub fn arc_tween(&self, id: &str, has_graphic: bool) -> Result<JsValue, JsValue> {
        match self.engine.arc_tween(id, has_graphic) {
            Some(tween) => serde_wasm_bindgen::to_value(&tween)
                .map_err(|e| JsValue::from_str(&e.to_string())),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Style overrides configured for a nesting level.
    #[wasm_bindgen(js_name = levelOptions)]
    pub fn level_options(&self, level: u32) -> Result<JsValue, JsValue> {
        match self.engine.level_options(level) {
            Some(options) => serde_wasm_bindgen::to_value(options)
                .map_err(|e| JsValue::from_str(&e.to_string())),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Find the arc containing a point, if any.
    #[wasm_bindgen(js_name = hitTest)]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<String> {
        self.engine.hit_test(x, y)
    }

    /// Find the nearest label anchor within a maximum distance.
    #[wasm_bindgen(js_name = nearestAnchor)]
    pub fn nearest_anchor(&self, x: f64, y: f64, max_distance: f64) -> Option<String> {
        self.engine.nearest_anchor(x, y, max_distance)
    }

    /// Find all label anchors within a rectangle.
    #[wasm_bindgen(js_name = anchorsInRect)]
    pub fn anchors_in_rect(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<String> {
        self.engine.anchors_in_rect(min_x, min_y, max_x, max_y)
    }
}

impl Default for SunburstWasm {
    fn default() -> Self {
        Self::new()
    }
}
