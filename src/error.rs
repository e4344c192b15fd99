use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("invalid device extents: width={width}, height={height}")]
    InvalidDeviceExtents { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("a viewport cannot be bound to itself")]
    SelfBinding,

    #[error("binding would create a viewport cycle")]
    BindingCycle,

    #[error("viewport is bound to another viewport and cannot be mutated directly")]
    ViewportBound,
}
