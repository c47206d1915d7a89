//! Pointer position → track percentage → slide index.
//!
//! Pure functions, no state.  The scrubber track is a horizontal bar; the
//! carousel's snap positions live on the same normalised [0,1] axis, so a
//! pointer maps to the slide whose snap is nearest.

/// Distances closer than this are treated as equal when picking a snap.
///
/// Decimal midpoints such as 0.45 between 0.3 and 0.6 are not exactly
/// representable, so a strict `<` would pick whichever side rounding
/// happens to favour.
const SNAP_TIE_EPSILON: f64 = 1e-9;

/// Horizontal geometry of the scrubber track, in the same units as the
/// pointer position (terminal columns here).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackBounds {
    pub left: f64,
    pub width: f64,
}

impl TrackBounds {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }
}

/// Map a pointer x coordinate onto the track as a fraction in `[0, 1]`.
///
/// A track that has not been laid out (zero width) yields 0.
pub fn position_to_percentage(pointer_x: f64, bounds: TrackBounds) -> f64 {
    if bounds.width <= 0.0 || !bounds.width.is_finite() {
        return 0.0;
    }
    let raw = (pointer_x - bounds.left) / bounds.width;
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, 1.0)
}

/// Resolve a track percentage to a slide index.
///
/// With snap positions available the nearest snap wins, lowest index on a
/// tie.  Before the engine has produced snaps the slides are assumed to be
/// evenly spread.
pub fn percentage_to_index(percentage: f64, snaps: &[f64], image_count: usize) -> usize {
    let percentage = if percentage.is_nan() {
        0.0
    } else {
        percentage.clamp(0.0, 1.0)
    };

    if snaps.is_empty() {
        if image_count == 0 {
            return 0;
        }
        let last = (image_count - 1) as f64;
        return ((percentage * last).round().clamp(0.0, last)) as usize;
    }

    let mut nearest = 0;
    let mut nearest_diff = f64::INFINITY;
    for (i, snap) in snaps.iter().enumerate() {
        let diff = (snap - percentage).abs();
        if diff < nearest_diff - SNAP_TIE_EPSILON {
            nearest = i;
            nearest_diff = diff;
        }
    }

    if image_count == 0 {
        nearest
    } else {
        nearest.min(image_count - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_outside_track_clamps_to_edges() {
        let bounds = TrackBounds::new(10.0, 40.0);
        assert_eq!(position_to_percentage(-100.0, bounds), 0.0);
        assert_eq!(position_to_percentage(9.0, bounds), 0.0);
        assert_eq!(position_to_percentage(50.0, bounds), 1.0);
        assert_eq!(position_to_percentage(500.0, bounds), 1.0);
        assert_eq!(position_to_percentage(30.0, bounds), 0.5);
    }

    #[test]
    fn zero_width_track_maps_to_start() {
        let bounds = TrackBounds::new(10.0, 0.0);
        assert_eq!(position_to_percentage(25.0, bounds), 0.0);
        assert_eq!(position_to_percentage(f64::MAX, bounds), 0.0);
    }

    #[test]
    fn nearest_snap_wins() {
        let snaps = [0.0, 0.3, 0.6, 1.0];
        assert_eq!(percentage_to_index(0.44, &snaps, 4), 1);
        assert_eq!(percentage_to_index(0.46, &snaps, 4), 2);
        assert_eq!(percentage_to_index(0.0, &snaps, 4), 0);
        assert_eq!(percentage_to_index(0.95, &snaps, 4), 3);
    }

    #[test]
    fn exact_midpoint_resolves_to_lower_index() {
        assert_eq!(percentage_to_index(0.45, &[0.3, 0.6], 2), 0);
        assert_eq!(percentage_to_index(0.5, &[0.0, 0.5, 0.5, 1.0], 4), 1);
    }

    #[test]
    fn missing_snaps_fall_back_to_even_spacing() {
        assert_eq!(percentage_to_index(0.5, &[], 5), 2);
        assert_eq!(percentage_to_index(0.0, &[], 5), 0);
        assert_eq!(percentage_to_index(1.0, &[], 5), 4);
        assert_eq!(percentage_to_index(0.5, &[], 1), 0);
        assert_eq!(percentage_to_index(0.7, &[], 0), 0);
    }

    #[test]
    fn index_never_exceeds_image_count() {
        // Engine still reporting a longer slide list than the current feed.
        assert_eq!(percentage_to_index(1.0, &[0.0, 0.5, 1.0], 2), 1);
    }
}
