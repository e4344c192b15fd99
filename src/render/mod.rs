mod frame;
mod primitives;

pub use frame::{GridAxis, GridFrame, GridLine};
pub use primitives::{Color, LinePrimitive, LineStrokeStyle};
