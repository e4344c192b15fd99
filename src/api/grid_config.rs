use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{SpanLimits, TickClass};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, LineStrokeStyle};

pub const MIN_GAP_PER_TICK_LOWER: f64 = 64.0;
pub const MIN_GAP_PER_TICK_UPPER: f64 = 65_536.0;
pub const DEFAULT_MIN_GAP_PER_TICK: f64 = 128.0;

/// Stroke settings for one tick class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLineStyle {
    pub visible: bool,
    pub color: Color,
    pub width: f64,
    #[serde(default)]
    pub stroke_style: LineStrokeStyle,
}

impl GridLineStyle {
    fn validate(self, class: &str) -> ChartResult<Self> {
        self.color.validate()?;
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(ChartError::InvalidData(format!(
                "{class} grid line width must be finite and > 0"
            )));
        }
        Ok(self)
    }
}

/// Per-class gridline appearance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridStyle {
    pub origin: GridLineStyle,
    pub major: GridLineStyle,
    pub minor: GridLineStyle,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            origin: GridLineStyle {
                visible: true,
                color: Color::rgb(0.47, 0.50, 0.55),
                width: 1.5,
                stroke_style: LineStrokeStyle::Solid,
            },
            major: GridLineStyle {
                visible: true,
                color: Color::rgb(0.78, 0.83, 0.90),
                width: 1.25,
                stroke_style: LineStrokeStyle::Solid,
            },
            minor: GridLineStyle {
                visible: true,
                color: Color::rgb(0.89, 0.92, 0.95),
                width: 1.0,
                stroke_style: LineStrokeStyle::Solid,
            },
        }
    }
}

impl GridStyle {
    #[must_use]
    pub fn for_class(&self, class: TickClass) -> GridLineStyle {
        match class {
            TickClass::Origin => self.origin,
            TickClass::Major => self.major,
            TickClass::Minor => self.minor,
        }
    }

    pub fn validate(self) -> ChartResult<Self> {
        self.origin.validate("origin")?;
        self.major.validate("major")?;
        self.minor.validate("minor")?;
        Ok(self)
    }
}

/// Host-tunable grid settings.
///
/// This type is serializable so widgets can persist grid setup next to the
/// rest of their configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Smallest device-space length of one candidate tick unit.
    ///
    /// Major ticks land at least this far apart; minor ticks subdivide each
    /// major step and sit closer together.
    #[serde(default = "default_min_gap_per_tick")]
    pub min_gap_per_tick: f64,
    #[serde(default)]
    pub span_limits: SpanLimits,
    #[serde(default)]
    pub style: GridStyle,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_gap_per_tick: DEFAULT_MIN_GAP_PER_TICK,
            span_limits: SpanLimits::default(),
            style: GridStyle::default(),
        }
    }
}

impl GridConfig {
    /// Sets the minimum gap, clamped into
    /// `[MIN_GAP_PER_TICK_LOWER, MIN_GAP_PER_TICK_UPPER]`.
    #[must_use]
    pub fn with_min_gap_per_tick(mut self, min_gap_per_tick: f64) -> Self {
        self.min_gap_per_tick = clamp_min_gap_per_tick(min_gap_per_tick);
        self
    }

    #[must_use]
    pub fn with_span_limits(mut self, span_limits: SpanLimits) -> Self {
        self.span_limits = span_limits;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: GridStyle) -> Self {
        self.style = style;
        self
    }

    /// Clamps the gap and validates limits and style.
    pub fn validate(mut self) -> ChartResult<Self> {
        self.min_gap_per_tick = clamp_min_gap_per_tick(self.min_gap_per_tick);
        self.span_limits = self.span_limits.validate()?;
        self.style = self.style.validate()?;
        Ok(self)
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize grid config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse grid config: {e}")))?;
        config.validate()
    }
}

/// Clamps a gap into the supported range; non-finite input falls back to the default.
#[must_use]
pub fn clamp_min_gap_per_tick(min_gap_per_tick: f64) -> f64 {
    if !min_gap_per_tick.is_finite() {
        debug!(
            min_gap_per_tick,
            "non-finite grid gap replaced by default"
        );
        return DEFAULT_MIN_GAP_PER_TICK;
    }
    min_gap_per_tick.clamp(MIN_GAP_PER_TICK_LOWER, MIN_GAP_PER_TICK_UPPER)
}

fn default_min_gap_per_tick() -> f64 {
    DEFAULT_MIN_GAP_PER_TICK
}
