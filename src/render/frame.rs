use serde::{Deserialize, Serialize};

use crate::core::{DeviceExtents, Tick, TickClass};
use crate::error::{ChartError, ChartResult};
use crate::render::LinePrimitive;

/// Axis a gridline belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridAxis {
    /// Ticks along the horizontal axis; drawn as vertical lines.
    Horizontal,
    /// Ticks along the vertical axis; drawn as horizontal lines.
    Vertical,
}

/// One tick placed in device space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub axis: GridAxis,
    pub tick: Tick,
    /// Device coordinate along `axis`.
    pub device_position: f64,
    pub line: LinePrimitive,
}

/// Backend-agnostic gridlines for one relayout pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GridFrame {
    pub device_extents: DeviceExtents,
    pub lines: Vec<GridLine>,
}

impl GridFrame {
    #[must_use]
    pub fn new(device_extents: DeviceExtents) -> Self {
        Self {
            device_extents,
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: GridLine) -> Self {
        self.lines.push(line);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.device_extents.is_valid() {
            return Err(ChartError::InvalidDeviceExtents {
                width: self.device_extents.width,
                height: self.device_extents.height,
            });
        }

        for grid_line in &self.lines {
            if !grid_line.device_position.is_finite() || !grid_line.tick.position.is_finite() {
                return Err(ChartError::InvalidData(
                    "grid line positions must be finite".to_owned(),
                ));
            }
            grid_line.line.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines_on(&self, axis: GridAxis) -> impl Iterator<Item = &GridLine> + '_ {
        self.lines.iter().filter(move |line| line.axis == axis)
    }

    #[must_use]
    pub fn count(&self, axis: GridAxis, class: TickClass) -> usize {
        self.lines_on(axis)
            .filter(|line| line.tick.class == class)
            .count()
    }
}
