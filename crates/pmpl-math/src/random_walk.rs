// ─────────────────────────────────────────────────────────────────────
// PMPL — Random-Walk Laplace Estimator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Monte-Carlo solution of the Dirichlet problem for the Laplace equation.
//!
//! A symmetric random walk started at an interior node hits the boundary
//! at node `b` with probability equal to the discrete harmonic measure, so
//! the mean boundary value over many walks estimates `φ(start)`.

use pmpl_types::error::{PmplError, PmplResult};
use rand::Rng;

/// Square lattice of `nodes × nodes` points covering `[0, side]²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lattice {
    pub nodes: usize,
    pub side: f64,
}

/// Integer lattice coordinates `(i, j)`, `i` along x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node {
    pub i: usize,
    pub j: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..4)]
    }
}

impl Lattice {
    pub fn new(nodes: usize, side: f64) -> PmplResult<Self> {
        if nodes < 3 {
            return Err(PmplError::InvalidInput(format!(
                "lattice needs >= 3 nodes per side, got {nodes}"
            )));
        }
        if !side.is_finite() || side <= 0.0 {
            return Err(PmplError::InvalidInput(format!(
                "lattice side must be finite and > 0, got {side}"
            )));
        }
        Ok(Lattice { nodes, side })
    }

    /// Unit square lattice.
    pub fn unit(nodes: usize) -> PmplResult<Self> {
        Self::new(nodes, 1.0)
    }

    /// Lattice centre, rounded down.
    pub fn centre(&self) -> Node {
        let c = (self.nodes - 1) / 2;
        Node { i: c, j: c }
    }

    pub fn is_boundary(&self, node: Node) -> bool {
        let last = self.nodes - 1;
        node.i == 0 || node.j == 0 || node.i >= last || node.j >= last
    }

    /// Physical coordinates of a node.
    pub fn real_point(&self, node: Node) -> (f64, f64) {
        let scale = self.side / (self.nodes - 1) as f64;
        (node.i as f64 * scale, node.j as f64 * scale)
    }
}

/// Walk from `start` until a boundary node is reached.
///
/// Interior nodes are never at index 0, so the decrement cannot underflow.
pub fn wander<R: Rng + ?Sized>(start: Node, lattice: &Lattice, rng: &mut R) -> Node {
    let mut node = start;
    while !lattice.is_boundary(node) {
        match Direction::random(rng) {
            Direction::Left => node.i -= 1,
            Direction::Right => node.i += 1,
            Direction::Up => node.j += 1,
            Direction::Down => node.j -= 1,
        }
    }
    node
}

/// Mean boundary value over `walkers` random walks started at `start`.
pub fn estimate_potential<F, R>(
    lattice: &Lattice,
    start: Node,
    walkers: usize,
    boundary: F,
    rng: &mut R,
) -> PmplResult<f64>
where
    F: Fn(f64, f64) -> f64,
    R: Rng + ?Sized,
{
    if walkers == 0 {
        return Err(PmplError::InvalidInput(
            "random walk estimate needs walkers >= 1".to_string(),
        ));
    }
    if start.i >= lattice.nodes || start.j >= lattice.nodes {
        return Err(PmplError::InvalidInput(format!(
            "start node ({}, {}) lies outside a {}-node lattice",
            start.i, start.j, lattice.nodes
        )));
    }
    let total: f64 = (0..walkers)
        .map(|_| {
            let hit = wander(start, lattice, rng);
            let (x, y) = lattice.real_point(hit);
            boundary(x, y)
        })
        .sum();
    Ok(total / walkers as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytic::laplace_reference;
    use crate::rng::seeded;

    #[test]
    fn test_lattice_boundary_is_symmetric() {
        let lattice = Lattice::unit(5).unwrap();
        assert!(lattice.is_boundary(Node { i: 0, j: 2 }));
        assert!(lattice.is_boundary(Node { i: 4, j: 2 }));
        assert!(lattice.is_boundary(Node { i: 2, j: 0 }));
        assert!(lattice.is_boundary(Node { i: 2, j: 4 }));
        assert!(!lattice.is_boundary(Node { i: 1, j: 3 }));
        assert!(!lattice.is_boundary(Node { i: 3, j: 3 }));
    }

    #[test]
    fn test_real_point_spans_side() {
        let lattice = Lattice::new(11, 2.0).unwrap();
        assert_eq!(lattice.real_point(Node { i: 0, j: 0 }), (0.0, 0.0));
        let (x, y) = lattice.real_point(Node { i: 10, j: 5 });
        assert!((x - 2.0).abs() < 1e-15);
        assert!((y - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_centre_rounds_down() {
        assert_eq!(Lattice::unit(202).unwrap().centre(), Node { i: 100, j: 100 });
        assert_eq!(Lattice::unit(21).unwrap().centre(), Node { i: 10, j: 10 });
    }

    #[test]
    fn test_wander_ends_on_boundary() {
        let lattice = Lattice::unit(15).unwrap();
        let mut rng = seeded(Some(7), 0);
        for _ in 0..200 {
            let hit = wander(lattice.centre(), &lattice, &mut rng);
            assert!(lattice.is_boundary(hit));
            assert!(hit.i < 15 && hit.j < 15);
        }
    }

    #[test]
    fn test_wander_from_boundary_is_immediate() {
        let lattice = Lattice::unit(9).unwrap();
        let mut rng = seeded(Some(1), 0);
        let start = Node { i: 0, j: 4 };
        assert_eq!(wander(start, &lattice, &mut rng), start);
    }

    #[test]
    fn test_constant_boundary_is_reproduced_exactly() {
        let lattice = Lattice::unit(21).unwrap();
        let mut rng = seeded(Some(3), 0);
        let phi = estimate_potential(&lattice, lattice.centre(), 50, |_, _| 2.5, &mut rng).unwrap();
        assert!((phi - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_estimate_close_to_harmonic_reference() {
        let lattice = Lattice::unit(21).unwrap();
        let mut rng = seeded(Some(11), 0);
        let phi = estimate_potential(
            &lattice,
            lattice.centre(),
            20_000,
            laplace_reference,
            &mut rng,
        )
        .unwrap();
        let exact = laplace_reference(0.5, 0.5);
        assert!((phi - exact).abs() < 0.03, "estimate {phi}, exact {exact}");
    }

    #[test]
    fn test_zero_walkers_rejected() {
        let lattice = Lattice::unit(9).unwrap();
        let mut rng = seeded(Some(1), 0);
        match estimate_potential(&lattice, lattice.centre(), 0, laplace_reference, &mut rng) {
            Err(PmplError::InvalidInput(msg)) => assert!(msg.contains("walkers")),
            other => panic!("Unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_lattice_rejected() {
        assert!(Lattice::unit(2).is_err());
        assert!(Lattice::new(10, 0.0).is_err());
        assert!(Lattice::new(10, f64::NAN).is_err());
    }
}
