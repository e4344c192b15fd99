pub mod partition;
pub mod tolerance;
pub mod types;
pub mod viewport;
pub mod viewport_events;

pub use partition::{
    AxisPartitioner, MAX_TICKS, Tick, TickClass, TickSteps, partition, resolve_tick_steps,
    select_tick_steps,
};
pub use tolerance::{LEAN_EPSILON, STRICT_EPSILON, SpanLimits, approx_eq, floor_mod};
pub use types::{
    Affine, AxisAffine, Bounds, DeviceExtents, ViewportConfig, ViewportSnapshot,
};
pub use viewport::{Viewport, ViewportEditor};
pub use viewport_events::{ListenerId, ViewportEvent, WindowChange};
