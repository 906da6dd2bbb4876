// ─────────────────────────────────────────────────────────────────────
// PMPL — Property-Based Tests (proptest) for pmpl-viz
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Axis ranges, window clipping and the colour map.

use pmpl_viz::plot::{data_range, viridis, visible_runs};
use proptest::prelude::*;

proptest! {
    /// The padded range contains every finite value.
    #[test]
    fn data_range_contains_values(values in prop::collection::vec(-1e9f64..1e9, 1..100)) {
        let r = data_range(values.iter().copied()).unwrap();
        prop_assert!(r.start < r.end);
        for v in &values {
            prop_assert!(r.start <= *v && *v <= r.end);
        }
    }

    /// Clipped runs keep only in-window points and never lose one.
    #[test]
    fn visible_runs_partition_inside_points(
        points in prop::collection::vec((-2.0f64..2.0, -2.0f64..2.0), 0..200),
    ) {
        let (x, y) = (-1.0..1.0, -1.0..1.0);
        let runs = visible_runs(&points, &x, &y);
        let inside = points
            .iter()
            .filter(|p| p.0 >= -1.0 && p.0 <= 1.0 && p.1 >= -1.0 && p.1 <= 1.0)
            .count();
        prop_assert_eq!(runs.iter().map(Vec::len).sum::<usize>(), inside);
        prop_assert!(runs.iter().all(|r| !r.is_empty()));
    }

    /// Brightness of the colour map grows with the value.
    #[test]
    fn viridis_green_channel_monotone(a in 0.0f64..1.0, b in 0.0f64..1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(viridis(lo).1 <= viridis(hi).1);
    }
}
