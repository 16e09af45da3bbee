//! Facing resolution.
//!
//! Entities face one of 64 abstract directions. Animations only carry a few
//! native facings (1, 4, 8, 16 or 32), so an abstract facing is bucketed onto
//! the closest native one, each bucket centred on its direction.

/// Size of the abstract facing space.
pub const FACING_DIRECTIONS: usize = 64;

/// Map an abstract facing in `[0, 64)` onto `direction_count` native facings.
///
/// Values landing on `direction_count` wrap to 0. A zero count resolves to 0.
pub fn resolve_direction(direction: usize, direction_count: usize) -> usize {
    if direction_count == 0 {
        return 0;
    }

    let count = direction_count as f64;
    let offset = (FACING_DIRECTIONS / direction_count) / 2;
    let resolved = (direction.saturating_add(offset) as f64 - FACING_DIRECTIONS as f64)
        * (-count / -(FACING_DIRECTIONS as f64))
        + count;
    let resolved = resolved.trunc() as usize;

    if resolved >= direction_count { 0 } else { resolved }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_direction_always_resolves_to_zero() {
        for d in 0..FACING_DIRECTIONS {
            assert_eq!(resolve_direction(d, 1), 0);
        }
    }

    #[test]
    fn sixteen_direction_boundaries() {
        assert_eq!(resolve_direction(0, 16), 0);
        assert_eq!(resolve_direction(31, 16), 8);
        assert_eq!(resolve_direction(32, 16), 8);
        assert_eq!(resolve_direction(61, 16), 15);
        // Wraps around at 64 - offset
        assert_eq!(resolve_direction(62, 16), 0);
        assert_eq!(resolve_direction(63, 16), 0);
    }

    #[test]
    fn resolved_value_never_reaches_count() {
        for count in [1, 2, 4, 8, 16, 32, 64] {
            for d in 0..FACING_DIRECTIONS {
                let resolved = resolve_direction(d, count);
                assert!(resolved < count, "dir {d} count {count} -> {resolved}");
                assert_eq!(resolved, resolve_direction(d, count));
            }
        }
    }

    #[test]
    fn eight_directions_are_centred() {
        // Bucket width 8, half-bucket offset 4
        assert_eq!(resolve_direction(3, 8), 0);
        assert_eq!(resolve_direction(4, 8), 1);
        assert_eq!(resolve_direction(11, 8), 1);
        assert_eq!(resolve_direction(12, 8), 2);
        assert_eq!(resolve_direction(59, 8), 7);
        assert_eq!(resolve_direction(60, 8), 0);
    }

    #[test]
    fn huge_direction_does_not_overflow() {
        assert!(resolve_direction(usize::MAX, 8) < 8);
    }

    #[test]
    fn zero_count_is_safe() {
        assert_eq!(resolve_direction(10, 0), 0);
    }
}
