use std::fmt;
use std::time::Duration;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use crate::constants::{EMPTY_WHEEL_ERROR, FULL_TURN_DEGREES, MAX_SPINS, MIN_SPINS, SPIN_DURATION_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelError {
    EmptyWheel,
}

impl fmt::Display for WheelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyWheel => write!(f, "{}", EMPTY_WHEEL_ERROR),
        }
    }
}

impl std::error::Error for WheelError {}

/// Folds any rotation into `[0, 360)`.
pub fn normalize_rotation(rotation: f64) -> f64 {
    let normalized = rotation.rem_euclid(FULL_TURN_DEGREES);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= FULL_TURN_DEGREES {
        0.0
    } else {
        normalized
    }
}

/// Index of the segment under the pointer after the wheel turned clockwise
/// by `rotation` degrees. The pointer sits at the start of segment 0.
///
/// Segments are half-open; a landing exactly on a boundary belongs to the
/// segment entered in the decreasing direction.
pub fn segment_index(count: usize, rotation: f64) -> Result<usize, WheelError> {
    if count == 0 {
        return Err(WheelError::EmptyWheel);
    }
    let normalized = normalize_rotation(rotation);
    // Same as (360 - normalized) / (360 / count), without dividing by an
    // inexact segment width first.
    let position = (FULL_TURN_DEGREES - normalized) * count as f64 / FULL_TURN_DEGREES;
    Ok((position.floor() as usize) % count)
}

/// Start and end angle of a segment in the wheel's own frame.
pub fn segment_span(count: usize, index: usize) -> Result<(f64, f64), WheelError> {
    if count == 0 {
        return Err(WheelError::EmptyWheel);
    }
    let size = FULL_TURN_DEGREES / count as f64;
    let index = index % count;
    Ok((size * index as f64, size * (index + 1) as f64))
}

/// Pure lookup of the winning label. Same inputs always give the same label.
pub fn resolve<S: AsRef<str>>(labels: &[S], final_rotation: f64) -> Result<&str, WheelError> {
    let index = segment_index(labels.len(), final_rotation)?;
    Ok(labels[index].as_ref())
}

/// Outcome of sampling a new spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinStart {
    pub rotation: f64,
    pub resolve_after: Duration,
}

/// Samples spin magnitudes. Swap the RNG for a seeded one in tests.
#[derive(Debug, Clone)]
pub struct WheelSelector<R = StdRng> {
    rng: R,
    resolve_delay: Duration,
}

impl WheelSelector<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for WheelSelector<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> WheelSelector<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            resolve_delay: Duration::from_millis(SPIN_DURATION_MS),
        }
    }

    pub fn with_resolve_delay(mut self, resolve_delay: Duration) -> Self {
        self.resolve_delay = resolve_delay;
        self
    }

    pub fn resolve_delay(&self) -> Duration {
        self.resolve_delay
    }

    /// Adds between 3 (inclusive) and 6 (exclusive) full turns to
    /// `previous_rotation`.
    pub fn start_spin<S: AsRef<str>>(
        &mut self,
        labels: &[S],
        previous_rotation: f64,
    ) -> Result<SpinStart, WheelError> {
        if labels.is_empty() {
            return Err(WheelError::EmptyWheel);
        }
        let turns = self.rng.gen_range(MIN_SPINS..MAX_SPINS);
        Ok(SpinStart {
            rotation: previous_rotation + turns * FULL_TURN_DEGREES,
            resolve_after: self.resolve_delay,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SpinPhase {
    Idle,
    Spinning,
    Resolved,
}

/// Handed to the caller when a spin starts. The caller waits
/// `resolve_after` and passes `generation` back to
/// [`SpinState::complete_spin`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinTicket {
    pub generation: u64,
    pub rotation: f64,
    pub resolve_after: Duration,
}

/// Wheel state across spins. Rotation only ever grows.
#[derive(Debug, Serialize, Clone)]
pub struct SpinState {
    labels: Vec<String>,
    rotation_degrees: f64,
    result: Option<String>,
    phase: SpinPhase,
    generation: u64,
}

impl SpinState {
    pub fn new() -> Self {
        Self {
            labels: Vec::new(),
            rotation_degrees: 0.0,
            result: None,
            phase: SpinPhase::Idle,
            generation: 0,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_spinning(&self) -> bool {
        self.phase == SpinPhase::Spinning
    }

    /// Freezes `labels` for this spin and advances the rotation. Allowed
    /// while already spinning; the earlier ticket goes stale.
    pub fn start_spin<R: Rng>(
        &mut self,
        selector: &mut WheelSelector<R>,
        labels: Vec<String>,
    ) -> Result<SpinTicket, WheelError> {
        let start = selector.start_spin(&labels, self.rotation_degrees)?;
        self.labels = labels;
        self.rotation_degrees = start.rotation;
        self.result = None;
        self.phase = SpinPhase::Spinning;
        self.generation += 1;
        log::info!(
            "Spin #{} started over {} options, rotation {:.1}",
            self.generation,
            self.labels.len(),
            self.rotation_degrees
        );
        Ok(SpinTicket {
            generation: self.generation,
            rotation: start.rotation,
            resolve_after: start.resolve_after,
        })
    }

    /// Applies the resolution for `generation`. Tickets from superseded or
    /// cancelled spins return `Ok(None)` and leave the state alone.
    pub fn complete_spin(&mut self, generation: u64) -> Result<Option<&str>, WheelError> {
        if generation != self.generation || self.phase != SpinPhase::Spinning {
            log::debug!(
                "Ignoring stale resolution #{} (current #{}, {:?})",
                generation,
                self.generation,
                self.phase
            );
            return Ok(None);
        }
        let winner = resolve(&self.labels, self.rotation_degrees)?.to_string();
        log::info!("Spin #{} landed on {:?}", generation, winner);
        self.result = Some(winner);
        self.phase = SpinPhase::Resolved;
        Ok(self.result.as_deref())
    }

    /// Suppresses any pending resolution. Rotation is kept so the wheel
    /// never snaps back.
    pub fn cancel_spin(&mut self) {
        if self.phase == SpinPhase::Spinning {
            self.generation += 1;
            self.phase = SpinPhase::Idle;
            log::debug!("Spin cancelled, generation now #{}", self.generation);
        }
    }
}

impl Default for SpinState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABCD: [&str; 4] = ["A", "B", "C", "D"];

    #[test]
    fn test_resolve_examples() {
        assert_eq!(resolve(&ABCD, 0.0).unwrap(), "A");
        assert_eq!(resolve(&ABCD, 90.0).unwrap(), "D");
        assert_eq!(resolve(&ABCD, 180.0).unwrap(), "C");
        assert_eq!(resolve(&ABCD, 270.0).unwrap(), "B");
        assert_eq!(resolve(&ABCD, 45.0).unwrap(), "D");
        assert_eq!(resolve(&ABCD, 89.999).unwrap(), "D");
        assert_eq!(resolve(&ABCD, 90.001).unwrap(), "C");
        assert_eq!(resolve(&ABCD, 359.999).unwrap(), "A");
    }

    #[test]
    fn test_resolve_empty() {
        let empty: [&str; 0] = [];
        assert_eq!(resolve(&empty, 10.0), Err(WheelError::EmptyWheel));
        assert_eq!(segment_index(0, 10.0), Err(WheelError::EmptyWheel));
        assert_eq!(segment_span(0, 0), Err(WheelError::EmptyWheel));
    }

    #[test]
    fn test_resolve_single_label() {
        for r in [0.0, 0.5, 179.0, 359.999, -20.0, 7200.0] {
            assert_eq!(resolve(&["only"], r).unwrap(), "only");
        }
    }

    #[test]
    fn test_resolve_periodic() {
        let labels = ["a", "b", "c", "d", "e", "f", "g"];
        for step in 0..720 {
            let r = step as f64 * 0.5 + 0.25;
            let expected = resolve(&labels, r).unwrap();
            for k in [-3i32, -1, 1, 2, 10] {
                assert_eq!(resolve(&labels, r + 360.0 * k as f64).unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let labels = vec!["x".to_string(), "y".to_string(), "z".to_string()];
        let first = resolve(&labels, 1234.5).unwrap().to_string();
        for _ in 0..5 {
            assert_eq!(resolve(&labels, 1234.5).unwrap(), first);
        }
    }

    #[test]
    fn test_negative_rotation_normalizes() {
        assert_eq!(normalize_rotation(-90.0), 270.0);
        assert_eq!(normalize_rotation(720.0), 0.0);
        assert!(normalize_rotation(-1e-20) < 360.0);
        assert_eq!(resolve(&ABCD, -90.0).unwrap(), "B");
    }

    #[test]
    fn test_segments_partition_the_circle() {
        // quarter-degree sweep, one sample of slack per segment
        let step = 0.25;
        let samples = (360.0 / step) as usize;
        for n in 1..=24usize {
            let mut hits = vec![0usize; n];
            let mut transitions = 0;
            let mut previous = segment_index(n, 0.0).unwrap();
            assert_eq!(previous, 0);
            for s in 0..samples {
                let index = segment_index(n, s as f64 * step).unwrap();
                hits[index] += 1;
                if index != previous {
                    // sweeping the rotation upwards walks the segments downwards
                    assert_eq!(index, (previous + n - 1) % n, "n={} r={}", n, s as f64 * step);
                    transitions += 1;
                    previous = index;
                }
            }
            // segment 0 holds r = 0 and the tail end of the sweep
            assert_eq!(transitions, if n == 1 { 0 } else { n }, "n={}", n);
            let expected = samples as f64 / n as f64;
            for (index, &count) in hits.iter().enumerate() {
                assert!(
                    (count as f64 - expected).abs() <= 1.0,
                    "n={} index={} count={} expected={}",
                    n,
                    index,
                    count,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_boundaries_use_floor() {
        // exact boundaries for n dividing 360
        for n in [2usize, 3, 4, 5, 6, 8, 9, 10, 12] {
            let size = 360.0 / n as f64;
            for k in 1..n {
                let boundary = size * k as f64;
                assert_eq!(segment_index(n, boundary).unwrap(), n - k, "n={} k={}", n, k);
                assert_eq!(segment_index(n, boundary - 0.001).unwrap(), n - k, "n={} k={}", n, k);
                assert_eq!(segment_index(n, boundary + 0.001).unwrap(), n - k - 1, "n={} k={}", n, k);
            }
        }
    }

    #[test]
    fn test_segment_span() {
        assert_eq!(segment_span(4, 0).unwrap(), (0.0, 90.0));
        assert_eq!(segment_span(4, 3).unwrap(), (270.0, 360.0));
        assert_eq!(segment_span(4, 5).unwrap(), (90.0, 180.0));
    }

    #[test]
    fn test_start_spin_bounds() {
        let mut selector = WheelSelector::seeded(7);
        let mut previous = 0.0;
        for _ in 0..1000 {
            let start = selector.start_spin(&ABCD, previous).unwrap();
            let added = start.rotation - previous;
            assert!(added >= 3.0 * 360.0 && added < 6.0 * 360.0, "added {}", added);
            assert_eq!(start.resolve_after, Duration::from_secs(3));
            previous = start.rotation;
        }
    }

    #[test]
    fn test_start_spin_rejects_empty() {
        let mut selector = WheelSelector::seeded(1);
        let empty: Vec<String> = Vec::new();
        assert_eq!(selector.start_spin(&empty, 0.0), Err(WheelError::EmptyWheel));
    }

    #[test]
    fn test_seeded_selectors_repeat() {
        let mut a = WheelSelector::seeded(42);
        let mut b = WheelSelector::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.start_spin(&ABCD, 0.0).unwrap(), b.start_spin(&ABCD, 0.0).unwrap());
        }
    }

    #[test]
    fn test_custom_resolve_delay() {
        let mut selector = WheelSelector::seeded(3).with_resolve_delay(Duration::from_millis(10));
        let start = selector.start_spin(&ABCD, 0.0).unwrap();
        assert_eq!(start.resolve_after, Duration::from_millis(10));
    }

    fn owned(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_spin_state_lifecycle() {
        let mut selector = WheelSelector::seeded(11);
        let mut state = SpinState::new();
        assert_eq!(state.phase(), SpinPhase::Idle);

        let ticket = state.start_spin(&mut selector, owned(&ABCD)).unwrap();
        assert!(state.is_spinning());
        assert_eq!(state.result(), None);
        assert_eq!(state.rotation_degrees(), ticket.rotation);

        let expected = resolve(&ABCD, ticket.rotation).unwrap().to_string();
        assert_eq!(state.complete_spin(ticket.generation).unwrap(), Some(expected.as_str()));
        assert_eq!(state.phase(), SpinPhase::Resolved);
        assert_eq!(state.result(), Some(expected.as_str()));

        // a repeated delivery of the same ticket is ignored
        assert_eq!(state.complete_spin(ticket.generation).unwrap(), None);

        let previous = state.rotation_degrees();
        let next = state.start_spin(&mut selector, owned(&ABCD)).unwrap();
        assert!(next.rotation > previous);
        assert_eq!(state.result(), None);
    }

    #[test]
    fn test_restart_makes_earlier_ticket_stale() {
        let mut selector = WheelSelector::seeded(5);
        let mut state = SpinState::new();
        let first = state.start_spin(&mut selector, owned(&ABCD)).unwrap();
        let second = state.start_spin(&mut selector, owned(&["X", "Y"])).unwrap();
        assert!(second.generation > first.generation);

        assert_eq!(state.complete_spin(first.generation).unwrap(), None);
        assert!(state.is_spinning());

        let winner = state.complete_spin(second.generation).unwrap().map(str::to_string);
        assert_eq!(winner.as_deref(), Some(resolve(&["X", "Y"], second.rotation).unwrap()));
    }

    #[test]
    fn test_frozen_labels_survive_list_edits() {
        let mut selector = WheelSelector::seeded(9);
        let mut state = SpinState::new();
        let mut live = owned(&ABCD);
        let ticket = state.start_spin(&mut selector, live.clone()).unwrap();
        live.clear();
        live.push("changed".to_string());

        let winner = state.complete_spin(ticket.generation).unwrap().unwrap();
        assert!(ABCD.contains(&winner));
    }

    #[test]
    fn test_cancel_suppresses_pending_resolution() {
        let mut selector = WheelSelector::seeded(2);
        let mut state = SpinState::new();
        let ticket = state.start_spin(&mut selector, owned(&ABCD)).unwrap();
        let rotation = state.rotation_degrees();

        state.cancel_spin();
        assert_eq!(state.phase(), SpinPhase::Idle);
        assert_eq!(state.rotation_degrees(), rotation);
        assert_eq!(state.complete_spin(ticket.generation).unwrap(), None);
        assert_eq!(state.result(), None);
    }

    #[test]
    fn test_start_spin_empty_leaves_state() {
        let mut selector = WheelSelector::seeded(2);
        let mut state = SpinState::new();
        assert_eq!(state.start_spin(&mut selector, Vec::new()), Err(WheelError::EmptyWheel));
        assert_eq!(state.phase(), SpinPhase::Idle);
        assert_eq!(state.generation(), 0);
        assert_eq!(state.rotation_degrees(), 0.0);
    }
}
