//! Discrete Laplacian on the tissue lattice.

use crate::grid::{idx, NX, NY, NZ};
use crate::params::Parameters;

/// Laplacian of `values` at cell (x, y, z), summed over the three axes.
///
/// Interior cells use the centered second difference. At an axis boundary
/// the operator substitutes the first-order one-sided difference
/// `(v[neighbor] - v[0]) / d^2` rather than a second-order reflective
/// approximation. That simplification is part of the model definition and
/// affects trajectories, so it is reproduced exactly. A spatially uniform
/// field yields exactly zero at every cell, boundary included.
#[must_use]
pub fn laplacian(values: &[f64], x: usize, y: usize, z: usize, p: &Parameters) -> f64 {
    let v = |x, y, z| values[idx(x, y, z)];

    let res_x = if x == 0 {
        (v(x + 1, y, z) - v(x, y, z)) / (p.delta_x * p.delta_x)
    } else if x == NX - 1 {
        (v(x - 1, y, z) - v(x, y, z)) / (p.delta_x * p.delta_x)
    } else {
        (v(x + 1, y, z) - 2.0 * v(x, y, z) + v(x - 1, y, z)) / (p.delta_x * p.delta_x)
    };

    let res_y = if y == 0 {
        (v(x, y + 1, z) - v(x, y, z)) / (p.delta_y * p.delta_y)
    } else if y == NY - 1 {
        (v(x, y - 1, z) - v(x, y, z)) / (p.delta_y * p.delta_y)
    } else {
        (v(x, y + 1, z) - 2.0 * v(x, y, z) + v(x, y - 1, z)) / (p.delta_y * p.delta_y)
    };

    let res_z = if z == 0 {
        (v(x, y, z + 1) - v(x, y, z)) / (p.delta_z * p.delta_z)
    } else if z == NZ - 1 {
        (v(x, y, z - 1) - v(x, y, z)) / (p.delta_z * p.delta_z)
    } else {
        (v(x, y, z + 1) - 2.0 * v(x, y, z) + v(x, y, z - 1)) / (p.delta_z * p.delta_z)
    };

    res_x + res_y + res_z
}
