use tracing::trace;

use crate::core::{AxisPartitioner, Viewport, ViewportSnapshot};
use crate::error::ChartResult;
use crate::render::{GridAxis, GridFrame, GridLine, LinePrimitive};

use super::GridConfig;

/// Turns a viewport window into gridlines for both axes.
///
/// Each axis keeps its own partition buffer, so calling
/// [`GridBuilder::build`] on every relayout does not reallocate once the
/// tick counts settle.
#[derive(Debug, Clone, Default)]
pub struct GridBuilder {
    config: GridConfig,
    horizontal: AxisPartitioner,
    vertical: AxisPartitioner,
}

impl GridBuilder {
    pub fn new(config: GridConfig) -> ChartResult<Self> {
        Ok(Self {
            config: config.validate()?,
            horizontal: AxisPartitioner::new(),
            vertical: AxisPartitioner::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> GridConfig {
        self.config
    }

    pub fn set_config(&mut self, config: GridConfig) -> ChartResult<()> {
        self.config = config.validate()?;
        Ok(())
    }

    /// Pushes the configured span limits into `viewport`.
    pub fn configure_viewport(&self, viewport: &Viewport) -> ChartResult<()> {
        viewport.set_span_limits(self.config.span_limits)
    }

    pub fn build(&mut self, viewport: &Viewport) -> GridFrame {
        self.build_from_snapshot(&viewport.snapshot())
    }

    pub fn build_from_snapshot(&mut self, snapshot: &ViewportSnapshot) -> GridFrame {
        let bounds = snapshot.bounds;
        let extents = snapshot.device_extents;
        let affine = snapshot.affine;
        let gap = self.config.min_gap_per_tick;
        let style = self.config.style;
        let mut frame = GridFrame::new(extents);

        let ticks = self
            .horizontal
            .partition_into(bounds.left, bounds.right, 0.0, extents.width, gap);
        for tick in ticks {
            let line_style = style.for_class(tick.class);
            if !line_style.visible {
                continue;
            }
            let x = affine.x.to_device(tick.position);
            frame.lines.push(GridLine {
                axis: GridAxis::Horizontal,
                tick: *tick,
                device_position: x,
                line: LinePrimitive::new(x, 0.0, x, extents.height, line_style.width, line_style.color)
                    .with_stroke_style(line_style.stroke_style),
            });
        }

        let ticks = self
            .vertical
            .partition_into(bounds.bottom, bounds.top, 0.0, extents.height, gap);
        for tick in ticks {
            let line_style = style.for_class(tick.class);
            if !line_style.visible {
                continue;
            }
            let y = affine.y.to_device(tick.position);
            frame.lines.push(GridLine {
                axis: GridAxis::Vertical,
                tick: *tick,
                device_position: y,
                line: LinePrimitive::new(0.0, y, extents.width, y, line_style.width, line_style.color)
                    .with_stroke_style(line_style.stroke_style),
            });
        }

        trace!(lines = frame.lines.len(), "built grid frame");
        frame
    }
}
