//! Double-buffered scalar fields on the fixed 3D tissue lattice.
//!
//! The tissue domain is a 10x10x10 lattice with 0.1 mm spacing per axis
//! (1 mm^3 total). Each field stores its values as a flat `Vec<f64>` with
//! explicit index math, ping-pong buffered: reaction steps read the
//! current buffer and write the next buffer, and `commit` swaps the two.

use serde::{Deserialize, Serialize};

/// Lattice cells along x.
pub const NX: usize = 10;
/// Lattice cells along y.
pub const NY: usize = 10;
/// Lattice cells along z.
pub const NZ: usize = 10;
/// Total cell count; also the fixed denominator of every tissue aggregate.
pub const VOLUME: usize = NX * NY * NZ;

/// Flat index of lattice coordinate (x, y, z).
///
/// # Panics
///
/// Panics if any coordinate is out of range.
#[inline]
#[must_use]
pub fn idx(x: usize, y: usize, z: usize) -> usize {
    assert!(x < NX && y < NY && z < NZ, "lattice coordinate out of range");
    (x * NY + y) * NZ + z
}

/// Lattice coordinate of flat index `i`.
#[inline]
#[must_use]
pub fn coords(i: usize) -> (usize, usize, usize) {
    debug_assert!(i < VOLUME);
    (i / (NY * NZ), (i / NZ) % NY, i % NZ)
}

/// Identity of one of the four tissue fields, used for anomaly reports
/// and snapshot file naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Bacteria concentration (A).
    Bacteria,
    /// Resting macrophages (MR).
    RestingMacrophage,
    /// Activated macrophages (MA).
    ActiveMacrophage,
    /// Antibodies (F).
    Antibody,
}

impl FieldKind {
    /// Short symbol used in output file names and log lines.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Bacteria => "A",
            Self::RestingMacrophage => "Mr",
            Self::ActiveMacrophage => "Ma",
            Self::Antibody => "F",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One double-buffered scalar field over the lattice.
#[derive(Debug, Clone)]
pub struct Field {
    curr: Vec<f64>,
    next: Vec<f64>,
}

impl Field {
    /// Create a field with every cell set to `value` in both buffers.
    #[must_use]
    pub fn with_value(value: f64) -> Self {
        Self {
            curr: vec![value; VOLUME],
            next: vec![value; VOLUME],
        }
    }

    /// Create a field from a per-cell initializer, identical in both
    /// buffers.
    #[must_use]
    pub fn from_fn<F>(init: F) -> Self
    where
        F: Fn(usize, usize, usize) -> f64,
    {
        let mut curr = vec![0.0; VOLUME];
        for (i, v) in curr.iter_mut().enumerate() {
            let (x, y, z) = coords(i);
            *v = init(x, y, z);
        }
        let next = curr.clone();
        Self { curr, next }
    }

    /// Current value at (x, y, z).
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is out of range.
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> f64 {
        self.curr[idx(x, y, z)]
    }

    /// Write `value` into the next buffer at (x, y, z).
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is out of range.
    pub fn set_next(&mut self, x: usize, y: usize, z: usize, value: f64) {
        self.next[idx(x, y, z)] = value;
    }

    /// Current buffer as a flat slice.
    #[must_use]
    pub fn current(&self) -> &[f64] {
        &self.curr
    }

    /// Current buffer (read) and next buffer (write) split for a sweep.
    pub fn split_mut(&mut self) -> (&[f64], &mut [f64]) {
        (&self.curr, &mut self.next)
    }

    /// Replace the current buffer with the next buffer.
    ///
    /// Implemented as an O(1) swap; cells the sweep never writes keep the
    /// same value in both buffers, so this behaves as a full copy.
    pub fn commit(&mut self) {
        std::mem::swap(&mut self.curr, &mut self.next);
    }
}

/// The four tissue fields of the model.
#[derive(Debug, Clone)]
pub struct TissueFields {
    /// Bacteria (A).
    pub bacteria: Field,
    /// Resting macrophages (MR).
    pub resting: Field,
    /// Activated macrophages (MA).
    pub active: Field,
    /// Antibodies (F).
    pub antibody: Field,
}

impl TissueFields {
    /// Field of the given kind.
    #[must_use]
    pub fn field(&self, kind: FieldKind) -> &Field {
        match kind {
            FieldKind::Bacteria => &self.bacteria,
            FieldKind::RestingMacrophage => &self.resting,
            FieldKind::ActiveMacrophage => &self.active,
            FieldKind::Antibody => &self.antibody,
        }
    }
}
