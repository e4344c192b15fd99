//! chart-guides: numeric core for chart grid and guide widgets.
//!
//! The crate keeps an affine mapping between a virtual plotting window and a
//! device rectangle ([`core::Viewport`]) and partitions visible axis
//! intervals into origin/major/minor ticks using the 1-2-5 per decade rule
//! ([`core::partition`]). [`api::GridBuilder`] combines the two into
//! backend-agnostic gridlines for a host widget to draw.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{GridBuilder, GridConfig};
pub use crate::core::{AxisPartitioner, Tick, TickClass, Viewport, partition};
pub use error::{ChartError, ChartResult};
