use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::tolerance::{LEAN_EPSILON, STRICT_EPSILON, approx_eq, floor_mod};

/// Upper bound on ticks produced for one axis.
///
/// Inputs that would exceed it (for example a vanishing minimum gap) yield
/// an empty partition instead of an unbounded allocation.
pub const MAX_TICKS: usize = 100_000;

/// Neighbouring ticks must sit at least this many lean epsilons apart,
/// relative to the interval magnitude, to stay distinct under both epsilons.
const MIN_STEP_IN_LEAN_EPSILONS: f64 = 4.0;

/// Rendering class of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickClass {
    /// The tick sitting on virtual zero.
    Origin,
    /// A tick aligned with the major step.
    Major,
    /// Any other tick on the minor grid.
    Minor,
}

/// One gridline position in virtual space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub position: f64,
    pub class: TickClass,
}

impl Tick {
    #[must_use]
    pub const fn new(position: f64, class: TickClass) -> Self {
        Self { position, class }
    }
}

/// Major/minor step pair picked by the 1-2-5 rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickSteps {
    pub major: f64,
    pub minor: f64,
}

/// Picks the smallest major step in `{0.2, 0.5, 1.0} * 10^n` that is still
/// `>= candidate_unit`, together with its minor subdivision.
///
/// Returns `None` for non-finite or non-positive candidates.
#[must_use]
pub fn select_tick_steps(candidate_unit: f64) -> Option<TickSteps> {
    if !candidate_unit.is_finite() || candidate_unit <= 0.0 {
        return None;
    }

    let decade_exp = candidate_unit.log10().ceil();
    let decade_pow = 10.0_f64.powf(decade_exp);
    if !decade_pow.is_finite() || decade_pow <= 0.0 {
        return None;
    }
    let normalized = candidate_unit / decade_pow;

    let steps = if normalized <= 0.2 {
        let major = 0.2 * decade_pow;
        TickSteps {
            major,
            minor: 0.25 * major,
        }
    } else if normalized <= 0.5 {
        let major = 0.5 * decade_pow;
        TickSteps {
            major,
            minor: 0.2 * major,
        }
    } else {
        let major = decade_pow;
        TickSteps {
            major,
            minor: 0.2 * major,
        }
    };

    if steps.minor.is_finite() && steps.minor > 0.0 {
        Some(steps)
    } else {
        None
    }
}

/// Resolves the tick steps for an interval/device span pair.
///
/// Returns `None` for every degenerate input: non-finite values, an empty
/// interval, an empty device span or a non-positive gap.
#[must_use]
pub fn resolve_tick_steps(
    interval_start: f64,
    interval_end: f64,
    device_start: f64,
    device_end: f64,
    min_device_gap: f64,
) -> Option<TickSteps> {
    if ![
        interval_start,
        interval_end,
        device_start,
        device_end,
        min_device_gap,
    ]
    .iter()
    .all(|value| value.is_finite())
    {
        return None;
    }
    if min_device_gap <= 0.0 {
        return None;
    }

    let interval_span = (interval_end - interval_start).abs();
    let device_span = (device_end - device_start).abs();
    if interval_span == 0.0 || device_span == 0.0 || !interval_span.is_finite() {
        return None;
    }

    let device_per_unit = device_span / interval_span;
    if !device_per_unit.is_finite() || device_per_unit <= 0.0 {
        return None;
    }
    select_tick_steps(min_device_gap / device_per_unit)
}

/// Computes the classified ticks strictly inside `interval_start..interval_end`.
///
/// The interval and device span may be given in either order. Degenerate
/// input yields an empty vector.
#[must_use]
pub fn partition(
    interval_start: f64,
    interval_end: f64,
    device_start: f64,
    device_end: f64,
    min_device_gap: f64,
) -> Vec<Tick> {
    let mut ticks = Vec::new();
    fill_ticks(
        &mut ticks,
        interval_start,
        interval_end,
        device_start,
        device_end,
        min_device_gap,
    );
    ticks
}

/// Partitioner that reuses its output buffer across calls.
#[derive(Debug, Clone, Default)]
pub struct AxisPartitioner {
    ticks: Vec<Tick>,
}

impl AxisPartitioner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Same contract as [`partition`], writing into the internal buffer.
    ///
    /// The returned slice reflects only this call.
    pub fn partition_into(
        &mut self,
        interval_start: f64,
        interval_end: f64,
        device_start: f64,
        device_end: f64,
        min_device_gap: f64,
    ) -> &[Tick] {
        self.ticks.clear();
        fill_ticks(
            &mut self.ticks,
            interval_start,
            interval_end,
            device_start,
            device_end,
            min_device_gap,
        );
        &self.ticks
    }

    /// Ticks produced by the last call to [`AxisPartitioner::partition_into`].
    #[must_use]
    pub fn last_ticks(&self) -> &[Tick] {
        &self.ticks
    }
}

fn fill_ticks(
    out: &mut Vec<Tick>,
    interval_start: f64,
    interval_end: f64,
    device_start: f64,
    device_end: f64,
    min_device_gap: f64,
) {
    let Some(steps) = resolve_tick_steps(
        interval_start,
        interval_end,
        device_start,
        device_end,
        min_device_gap,
    ) else {
        return;
    };

    let i_min = interval_start.min(interval_end);
    let i_max = interval_start.max(interval_end);
    let magnitude = i_min.abs().max(i_max.abs());
    if !steps.minor.is_normal()
        || steps.minor <= MIN_STEP_IN_LEAN_EPSILONS * LEAN_EPSILON * magnitude
    {
        debug!(
            minor_step = steps.minor,
            i_min, i_max, "tick step below floating-point resolution of interval"
        );
        return;
    }

    let aligned = i_min - floor_mod(i_min, steps.minor) + steps.minor;
    let mut index = (aligned / steps.minor).round();
    let mut position = index * steps.minor;
    while position <= i_min || approx_eq(position, i_min, STRICT_EPSILON) {
        index += 1.0;
        position = index * steps.minor;
    }
    if position >= i_max || approx_eq(position, i_max, STRICT_EPSILON) {
        return;
    }

    let estimated = ((i_max - position) / steps.minor).ceil();
    if estimated >= MAX_TICKS as f64 {
        debug!(
            estimated,
            max_ticks = MAX_TICKS,
            "tick count exceeds limit; returning empty partition"
        );
        return;
    }
    out.reserve(estimated as usize + 1);

    let mut major_index = (position / steps.major).round();
    let mut next_major = major_index * steps.major;
    if next_major < position && !approx_eq(next_major, position, LEAN_EPSILON) {
        major_index += 1.0;
        next_major = major_index * steps.major;
    }

    trace!(
        major_step = steps.major,
        minor_step = steps.minor,
        first = position,
        "partitioning axis"
    );

    loop {
        position = index * steps.minor;
        if position >= i_max || approx_eq(position, i_max, STRICT_EPSILON) {
            break;
        }

        while next_major < position && !approx_eq(next_major, position, LEAN_EPSILON) {
            major_index += 1.0;
            next_major = major_index * steps.major;
        }

        let mut class = TickClass::Minor;
        if approx_eq(position, next_major, LEAN_EPSILON) {
            class = TickClass::Major;
            major_index += 1.0;
            next_major = major_index * steps.major;
        }
        if approx_eq(position, 0.0, STRICT_EPSILON) {
            class = TickClass::Origin;
            position = 0.0;
        }

        out.push(Tick::new(position, class));
        index += 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisPartitioner, TickClass, partition, select_tick_steps};

    #[test]
    fn steps_follow_one_two_five_rule() {
        let steps = select_tick_steps(1.0).expect("steps");
        assert_eq!((steps.major, steps.minor), (1.0, 0.2));

        let steps = select_tick_steps(0.15).expect("steps");
        assert!((steps.major - 0.2).abs() <= 1e-12);
        assert!((steps.minor - 0.05).abs() <= 1e-12);

        let steps = select_tick_steps(0.3).expect("steps");
        assert!((steps.major - 0.5).abs() <= 1e-12);
        assert!((steps.minor - 0.1).abs() <= 1e-12);

        let steps = select_tick_steps(7.0).expect("steps");
        assert!((steps.major - 10.0).abs() <= 1e-12);
        assert!((steps.minor - 2.0).abs() <= 1e-12);
    }

    #[test]
    fn steps_reject_non_positive_candidates() {
        assert!(select_tick_steps(0.0).is_none());
        assert!(select_tick_steps(-1.0).is_none());
        assert!(select_tick_steps(f64::NAN).is_none());
        assert!(select_tick_steps(f64::INFINITY).is_none());
    }

    #[test]
    fn partition_marks_every_fifth_minor_as_major() {
        let ticks = partition(0.5, 3.5, 0.0, 300.0, 100.0);
        let majors: Vec<f64> = ticks
            .iter()
            .filter(|tick| tick.class == TickClass::Major)
            .map(|tick| tick.position)
            .collect();
        assert_eq!(majors.len(), 3);
        for (major, expected) in majors.iter().zip([1.0, 2.0, 3.0]) {
            assert!((major - expected).abs() <= 1e-9);
        }
        assert!(ticks.iter().all(|tick| tick.class != TickClass::Origin));
    }

    #[test]
    fn reused_buffer_reflects_only_the_last_call() {
        let mut partitioner = AxisPartitioner::new();
        let first_len = partitioner.partition_into(-1.0, 1.0, 0.0, 512.0, 256.0).len();
        assert_eq!(first_len, 9);

        let second = partitioner.partition_into(5.0, 5.0, 0.0, 100.0, 10.0);
        assert!(second.is_empty());
        assert!(partitioner.last_ticks().is_empty());
    }

    #[test]
    fn step_below_interval_resolution_yields_no_ticks() {
        // A minor step of 2e-10 cannot be told apart at a magnitude of 1e6.
        assert!(partition(1e6, 1e6 + 1e-8, 0.0, 1000.0, 64.0).is_empty());
    }

    #[test]
    fn narrow_window_near_zero_keeps_its_grid() {
        let ticks = partition(-1e-12, 1e-12, 0.0, 1000.0, 128.0);
        assert_eq!(ticks.len(), 19);
        assert_eq!(
            ticks.iter().filter(|tick| tick.class == TickClass::Origin).count(),
            1
        );
        assert_eq!(
            ticks.iter().filter(|tick| tick.class == TickClass::Major).count(),
            2
        );
        assert!((ticks[0].position + 9e-13).abs() <= 1e-25);
    }

    #[test]
    fn oversized_tick_count_yields_no_ticks() {
        // Minor step 0.2 over a million units would need five million ticks.
        assert!(partition(0.0, 1e6, 0.0, 1000.0, 1e-3).is_empty());
    }
}
