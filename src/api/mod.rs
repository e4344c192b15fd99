mod grid_builder;
mod grid_config;

pub use grid_builder::GridBuilder;
pub use grid_config::{
    DEFAULT_MIN_GAP_PER_TICK, GridConfig, GridLineStyle, GridStyle, MIN_GAP_PER_TICK_LOWER,
    MIN_GAP_PER_TICK_UPPER, clamp_min_gap_per_tick,
};
