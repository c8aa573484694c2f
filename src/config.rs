//! Settings for the visualization facade.
//!
//! Every constant the highlighter uses lives in [`HighlightConfig`]; the
//! defaults reproduce the established look (teal fill at 25 % transparency,
//! `DSF`-prefixed tags) and sizes.

use crate::error::{OperationError, Result};
use crate::highlight::Rgb;
use crate::operations::creation::{DEFAULT_SLAB_EXTENT, DEFAULT_SLAB_THICKNESS};
use crate::operations::reconstruct::DEFAULT_WELD_TOLERANCE;
use crate::operations::sampling::DEFAULT_SAMPLE_STEP;
use crate::tessellation::TessellationParams;

/// Tag prefix of every element the highlighter creates.
pub const DEFAULT_TAG_PREFIX: &str = "DSF";

/// Name of the 3D view that shows tagged elements.
pub const DEFAULT_VIEW_NAME: &str = "DSF View";

/// Name of the color override filter on that view.
pub const DEFAULT_FILTER_NAME: &str = "DSF Filter";

/// Configuration of a [`Highlighter`](crate::highlight::Highlighter).
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightConfig {
    /// Prefix of generated tags (`<prefix><n>`).
    pub tag_prefix: String,
    /// Reserved name of the default view.
    pub view_name: String,
    /// Reserved name of the default filter.
    pub filter_name: String,
    /// Surface transparency of tagged elements, in percent.
    pub transparency: u8,
    /// Solid fill color of tagged elements.
    pub fill_color: Rgb,
    /// Radius of the sphere marking a single point.
    pub point_radius: f64,
    /// Radius of the spheres marking curve samples.
    pub marker_radius: f64,
    /// Normalized-parameter step between curve samples.
    pub sample_step: f64,
    /// Length factor applied to visualized vectors.
    pub vector_scale: f64,
    /// Default plane slab width.
    pub plane_width: f64,
    /// Default plane slab height.
    pub plane_height: f64,
    /// Plane slab thickness.
    pub plane_thickness: f64,
    /// Width and height of slabs marking level elevations.
    pub level_plane_extent: f64,
    /// Facet density of curved primitives.
    pub tessellation: TessellationParams,
    /// Vertex weld distance for mesh reconstruction.
    pub weld_tolerance: f64,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            tag_prefix: DEFAULT_TAG_PREFIX.to_string(),
            view_name: DEFAULT_VIEW_NAME.to_string(),
            filter_name: DEFAULT_FILTER_NAME.to_string(),
            transparency: 25,
            fill_color: Rgb::new(0, 128, 128),
            point_radius: 0.3,
            marker_radius: 0.1,
            sample_step: DEFAULT_SAMPLE_STEP,
            vector_scale: 2.0,
            plane_width: DEFAULT_SLAB_EXTENT,
            plane_height: DEFAULT_SLAB_EXTENT,
            plane_thickness: DEFAULT_SLAB_THICKNESS,
            level_plane_extent: 100.0,
            tessellation: TessellationParams::default(),
            weld_tolerance: DEFAULT_WELD_TOLERANCE,
        }
    }
}

impl HighlightConfig {
    /// Sets the tag prefix.
    #[must_use]
    pub fn with_tag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tag_prefix = prefix.into();
        self
    }

    /// Sets the default view name.
    #[must_use]
    pub fn with_view_name(mut self, name: impl Into<String>) -> Self {
        self.view_name = name.into();
        self
    }

    /// Sets the default filter name.
    #[must_use]
    pub fn with_filter_name(mut self, name: impl Into<String>) -> Self {
        self.filter_name = name.into();
        self
    }

    /// Sets the filter look.
    #[must_use]
    pub fn with_appearance(mut self, transparency: u8, fill_color: Rgb) -> Self {
        self.transparency = transparency;
        self.fill_color = fill_color;
        self
    }

    /// Sets the point and curve-marker sphere radii.
    #[must_use]
    pub fn with_marker_radii(mut self, point_radius: f64, marker_radius: f64) -> Self {
        self.point_radius = point_radius;
        self.marker_radius = marker_radius;
        self
    }

    /// Sets the curve sampling step.
    #[must_use]
    pub fn with_sample_step(mut self, step: f64) -> Self {
        self.sample_step = step;
        self
    }

    /// Sets the vector length factor.
    #[must_use]
    pub fn with_vector_scale(mut self, scale: f64) -> Self {
        self.vector_scale = scale;
        self
    }

    /// Sets the default plane slab size.
    #[must_use]
    pub fn with_plane_size(mut self, width: f64, height: f64, thickness: f64) -> Self {
        self.plane_width = width;
        self.plane_height = height;
        self.plane_thickness = thickness;
        self
    }

    /// Sets the level plane extent.
    #[must_use]
    pub fn with_level_plane_extent(mut self, extent: f64) -> Self {
        self.level_plane_extent = extent;
        self
    }

    /// Sets the tessellation parameters.
    #[must_use]
    pub fn with_tessellation(mut self, params: TessellationParams) -> Self {
        self.tessellation = params;
        self
    }

    /// Sets the mesh weld tolerance.
    #[must_use]
    pub fn with_weld_tolerance(mut self, tolerance: f64) -> Self {
        self.weld_tolerance = tolerance;
        self
    }

    /// Checks that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidArgument`] for an empty prefix or
    /// name, a transparency above 100 or a non-positive size, and the
    /// tessellation error for bad tessellation parameters.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("tag_prefix", &self.tag_prefix),
            ("view_name", &self.view_name),
            ("filter_name", &self.filter_name),
        ] {
            if value.trim().is_empty() {
                return Err(OperationError::InvalidArgument(format!("{field} must not be empty")).into());
            }
        }
        if self.transparency > 100 {
            return Err(OperationError::InvalidArgument(format!(
                "transparency must be at most 100, got {}",
                self.transparency
            ))
            .into());
        }
        for (field, value) in [
            ("point_radius", self.point_radius),
            ("marker_radius", self.marker_radius),
            ("sample_step", self.sample_step),
            ("vector_scale", self.vector_scale),
            ("plane_width", self.plane_width),
            ("plane_height", self.plane_height),
            ("plane_thickness", self.plane_thickness),
            ("level_plane_extent", self.level_plane_extent),
            ("weld_tolerance", self.weld_tolerance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(OperationError::InvalidArgument(format!(
                    "{field} must be positive, got {value}"
                ))
                .into());
            }
        }
        self.tessellation.validate()
    }
}
