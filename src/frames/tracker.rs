//! Bounded-rate stepping of a frame toward its target.

/// Move `current` toward `target` by at most `step` frames.
///
/// Snaps onto `target` when it is within one step and never overshoots.
/// A non-positive `step` is treated as one frame so every axis still
/// converges.
#[must_use]
pub fn advance(target: i32, current: i32, step: i32) -> i32 {
    let step = step.max(1);
    if target > current {
        current.saturating_add(step).min(target)
    } else if current > target {
        current.saturating_sub(step).max(target)
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_moves_away_or_overshoots() {
        for &target in &[0, 37, 200, 400] {
            for current in (0..=400).step_by(7) {
                for step in 1..=3 {
                    let next = advance(target, current, step);
                    assert!((next - target).abs() <= (current - target).abs());
                    if next != target {
                        assert_eq!(
                            (next - target).signum(),
                            (current - target).signum()
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn converges_within_ceil_distance_over_step() {
        for &(start, target, step) in
            &[(0_i32, 400_i32, 2_i32), (400, 0, 1), (201, 200, 2), (17, 250, 3)]
        {
            let bound = ((start - target).abs() + step - 1) / step;
            let mut current = start;
            let mut calls = 0;
            while current != target {
                current = advance(target, current, step);
                calls += 1;
                assert!(calls <= bound, "took more than {bound} calls");
            }
            assert_eq!(calls, bound);
        }
    }

    #[test]
    fn snaps_exactly_when_within_one_step() {
        assert_eq!(advance(200, 199, 2), 200);
        assert_eq!(advance(200, 201, 2), 200);
        assert_eq!(advance(200, 200, 2), 200);
    }

    #[test]
    fn zero_step_still_progresses() {
        assert_eq!(advance(10, 0, 0), 1);
    }
}
