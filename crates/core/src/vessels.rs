//! Vessel membership: which lattice cells touch blood or lymph vasculature.
//!
//! The vessel maps are fixed bands of the 10x10x10 lattice. They are part
//! of the model definition, not derived from any parameter, and gate the
//! recruitment and migration terms of the kinetics.

use crate::config::ContactPolicy;

/// Vessel network a contact query refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VesselKind {
    /// Blood vasculature: macrophage recruitment, antibody exchange.
    Blood,
    /// Lymph vasculature: activated-macrophage migration.
    Lymph,
}

/// True if cell (x, y, z) is in contact with a blood vessel.
#[must_use]
pub fn is_blood_vessel(x: usize, _y: usize, z: usize) -> bool {
    matches!(x, 0 | 1 | 8 | 9) && matches!(z, 0 | 1 | 8 | 9)
}

/// True if cell (x, y, z) is in contact with a lymph vessel.
#[must_use]
pub fn is_lymph_vessel(x: usize, _y: usize, z: usize) -> bool {
    matches!(x, 2 | 3 | 6 | 7) && matches!(z, 0 | 1 | 4 | 5)
}

/// Whether `policy` selects cell (x, y, z) for contact with `kind` vessels.
#[must_use]
pub fn in_contact(policy: ContactPolicy, kind: VesselKind, x: usize, y: usize, z: usize) -> bool {
    match policy {
        ContactPolicy::BorderOnly => x == 0,
        ContactPolicy::Homogeneous => true,
        ContactPolicy::VesselMap => match kind {
            VesselKind::Blood => is_blood_vessel(x, y, z),
            VesselKind::Lymph => is_lymph_vessel(x, y, z),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{NX, NY, NZ};

    #[test]
    fn blood_vessel_bands() {
        // Corner bands in x and z, every y
        assert!(is_blood_vessel(0, 5, 0));
        assert!(is_blood_vessel(1, 0, 9));
        assert!(is_blood_vessel(9, 9, 8));
        assert!(!is_blood_vessel(2, 5, 0));
        assert!(!is_blood_vessel(0, 5, 2));
        assert!(!is_blood_vessel(4, 4, 4));
    }

    #[test]
    fn lymph_vessel_bands() {
        assert!(is_lymph_vessel(2, 0, 0));
        assert!(is_lymph_vessel(3, 9, 5));
        assert!(is_lymph_vessel(7, 4, 4));
        assert!(!is_lymph_vessel(0, 0, 0));
        assert!(!is_lymph_vessel(2, 0, 2));
        assert!(!is_lymph_vessel(5, 5, 5));
    }

    #[test]
    fn vessel_maps_are_disjoint_in_x() {
        for x in 0..NX {
            for y in 0..NY {
                for z in 0..NZ {
                    assert!(!(is_blood_vessel(x, y, z) && is_lymph_vessel(x, y, z)));
                }
            }
        }
    }

    #[test]
    fn contact_policy_dispatch() {
        // Border policy ignores the vessel kind
        assert!(in_contact(ContactPolicy::BorderOnly, VesselKind::Blood, 0, 3, 7));
        assert!(!in_contact(ContactPolicy::BorderOnly, VesselKind::Lymph, 1, 3, 7));
        // Homogeneous selects everything
        assert!(in_contact(ContactPolicy::Homogeneous, VesselKind::Lymph, 5, 5, 5));
        // Map policy delegates to the predicates
        assert!(in_contact(ContactPolicy::VesselMap, VesselKind::Blood, 8, 2, 1));
        assert!(!in_contact(ContactPolicy::VesselMap, VesselKind::Lymph, 8, 2, 1));
    }
}
