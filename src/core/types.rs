use serde::{Deserialize, Serialize};

use crate::core::tolerance::SpanLimits;
use crate::error::{ChartError, ChartResult};

/// Virtual-space window. No ordering is enforced between the two ends of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Bounds {
    #[must_use]
    pub const fn new(left: f64, right: f64, bottom: f64, top: f64) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.top - self.bottom
    }

    #[must_use]
    pub fn is_valid(self, limits: SpanLimits) -> bool {
        limits.accepts(self.left, self.right) && limits.accepts(self.bottom, self.top)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(-1.0, 1.0, -1.0, 1.0)
    }
}

/// Size of the device rectangle anchored at the device origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceExtents {
    pub width: f64,
    pub height: f64,
}

impl DeviceExtents {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }

    pub fn validate(self) -> ChartResult<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(ChartError::InvalidDeviceExtents {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// `device = scale * virtual + offset` for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisAffine {
    pub scale: f64,
    pub offset: f64,
    /// Virtual coordinate mapped to device zero.
    pub origin: f64,
}

impl AxisAffine {
    /// Builds the mapping that sends `origin` to device 0 and `end` to `extent`.
    #[must_use]
    pub fn spanning(origin: f64, end: f64, extent: f64) -> Self {
        let scale = extent / (end - origin);
        Self {
            scale,
            offset: -scale * origin,
            origin,
        }
    }

    #[must_use]
    pub fn to_device(self, value: f64) -> f64 {
        self.scale * value + self.offset
    }

    /// Inverse mapping. A collapsed device extent maps every point back to `origin`.
    #[must_use]
    pub fn to_virtual(self, device: f64) -> f64 {
        if !self.scale.is_normal() {
            return self.origin;
        }
        (device - self.offset) / self.scale
    }
}

/// Forward coefficients for both axes.
///
/// The vertical axis is anchored at `top` because device space grows
/// downward while virtual space grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    pub x: AxisAffine,
    pub y: AxisAffine,
}

impl Affine {
    #[must_use]
    pub fn from_window(bounds: Bounds, extents: DeviceExtents) -> Self {
        Self {
            x: AxisAffine::spanning(bounds.left, bounds.right, extents.width),
            y: AxisAffine::spanning(bounds.top, bounds.bottom, extents.height),
        }
    }
}

/// Consistent read of a viewport: bounds, extents and their cached mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSnapshot {
    pub bounds: Bounds,
    pub device_extents: DeviceExtents,
    pub affine: Affine,
}

impl ViewportSnapshot {
    #[must_use]
    pub fn new(bounds: Bounds, device_extents: DeviceExtents) -> Self {
        Self {
            bounds,
            device_extents,
            affine: Affine::from_window(bounds, device_extents),
        }
    }
}

/// Initial state used to construct a [`crate::core::Viewport`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ViewportConfig {
    #[serde(default)]
    pub bounds: Bounds,
    #[serde(default)]
    pub device_extents: DeviceExtents,
    #[serde(default)]
    pub span_limits: SpanLimits,
}

impl ViewportConfig {
    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    #[must_use]
    pub fn with_device_extents(mut self, width: f64, height: f64) -> Self {
        self.device_extents = DeviceExtents::new(width, height);
        self
    }

    #[must_use]
    pub fn with_span_limits(mut self, span_limits: SpanLimits) -> Self {
        self.span_limits = span_limits;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        let span_limits = self.span_limits.validate()?;
        self.device_extents.validate()?;
        if !self.bounds.is_valid(span_limits) {
            return Err(ChartError::InvalidData(
                "viewport bounds must be finite with spans inside the span limits".to_owned(),
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{Affine, AxisAffine, Bounds, DeviceExtents, ViewportConfig};

    #[test]
    fn vertical_axis_maps_top_to_device_zero() {
        let affine = Affine::from_window(
            Bounds::new(0.0, 10.0, 0.0, 10.0),
            DeviceExtents::new(200.0, 100.0),
        );
        assert_eq!(affine.y.to_device(10.0), 0.0);
        assert_eq!(affine.y.to_device(0.0), 100.0);
        assert_eq!(affine.x.to_device(0.0), 0.0);
        assert_eq!(affine.x.to_device(10.0), 200.0);
    }

    #[test]
    fn collapsed_extent_inverts_to_origin() {
        let affine = AxisAffine::spanning(-3.0, 3.0, 0.0);
        assert_eq!(affine.to_device(2.0), 0.0);
        assert_eq!(affine.to_virtual(17.0), -3.0);
    }

    #[test]
    fn config_rejects_degenerate_bounds_and_negative_extents() {
        let config = ViewportConfig::default().with_bounds(Bounds::new(1.0, 1.0, 0.0, 1.0));
        assert!(config.validate().is_err());

        let config = ViewportConfig::default().with_device_extents(-1.0, 10.0);
        assert!(config.validate().is_err());

        assert!(ViewportConfig::default().validate().is_ok());
    }
}
