//! Run configuration: simulation mode, vessel-contact policies and the
//! knobs fixed before a run begins.

use serde::{Deserialize, Serialize};

/// Which subset of the model equations is active for a run.
///
/// The numeric codes match the original parameter files, so `from_code`
/// accepts the same values callers have always passed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationMode {
    /// Full tissue model coupled to the lymph-node compartment (code 0).
    Coupled,
    /// Bacteria diffusion and logistic growth only (code 1).
    DiffusionOnly,
    /// Innate response only: bacteria plus both macrophage populations,
    /// no antibody and no lymph-node coupling (code 2).
    InnateOnly,
    /// Full equation set on a single-cell domain with diffusion terms
    /// omitted (code 3).
    NoDiffusionCoupled,
}

impl SimulationMode {
    /// Map a numeric mode code to a mode, `None` for unknown codes.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Coupled),
            1 => Some(Self::DiffusionOnly),
            2 => Some(Self::InnateOnly),
            3 => Some(Self::NoDiffusionCoupled),
            _ => None,
        }
    }

    /// Numeric code of this mode.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Coupled => 0,
            Self::DiffusionOnly => 1,
            Self::InnateOnly => 2,
            Self::NoDiffusionCoupled => 3,
        }
    }

    /// Diffusion terms (and the per-iteration aggregate recomputation that
    /// goes with them) are active.
    #[must_use]
    pub fn diffusion_enabled(self) -> bool {
        !matches!(self, Self::NoDiffusionCoupled)
    }

    /// Macrophage phagocytosis and activation terms are active.
    #[must_use]
    pub fn innate_enabled(self) -> bool {
        !matches!(self, Self::DiffusionOnly)
    }

    /// Opsonized-phagocytosis terms and the antibody field are active.
    #[must_use]
    pub fn opsonization_enabled(self) -> bool {
        matches!(self, Self::Coupled | Self::NoDiffusionCoupled)
    }

    /// The lymph-node ODE system is stepped and migration terms exchange
    /// material with it.
    #[must_use]
    pub fn lymph_coupled(self) -> bool {
        matches!(self, Self::Coupled | Self::NoDiffusionCoupled)
    }

    /// The spatial domain degenerates to the single cell at the origin.
    #[must_use]
    pub fn single_cell(self) -> bool {
        matches!(self, Self::NoDiffusionCoupled)
    }
}

/// How grid cells are classified as being in contact with a vessel network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactPolicy {
    /// Contact only on the x = 0 border (code 0).
    BorderOnly,
    /// Homogeneous contact everywhere (code 1).
    Homogeneous,
    /// Contact given by the hardcoded vessel map (code 2).
    VesselMap,
}

impl ContactPolicy {
    /// Map a numeric policy code to a policy, `None` for unknown codes.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::BorderOnly),
            1 => Some(Self::Homogeneous),
            2 => Some(Self::VesselMap),
            _ => None,
        }
    }
}

/// What to do when a reaction step produces a NaN cell value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NanPolicy {
    /// Log the offending iteration, field and coordinate and keep going.
    #[default]
    Warn,
    /// Abort the run on the first anomaly.
    Fail,
}

/// Everything fixed before a run begins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Active equation subset.
    pub mode: SimulationMode,
    /// Also emit full grid snapshots, not just the scalar time series.
    pub save_all_fields: bool,
    /// Simulated length in days.
    pub days: u32,
    /// Number of snapshot points over the whole run.
    pub snapshot_points: u32,
    /// Lymph-vessel contact policy (gates macrophage migration).
    pub lymph_contact: ContactPolicy,
    /// Blood-vessel contact policy (gates recruitment and antibody exchange).
    pub blood_contact: ContactPolicy,
    /// Strictness towards NaN cell values.
    pub nan_policy: NanPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mode: SimulationMode::Coupled,
            save_all_fields: false,
            days: 30,
            snapshot_points: 720,
            lymph_contact: ContactPolicy::VesselMap,
            blood_contact: ContactPolicy::VesselMap,
            nan_policy: NanPolicy::Warn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_codes_round_trip() {
        for code in 0..4 {
            let mode = SimulationMode::from_code(code).unwrap();
            assert_eq!(mode.code(), code);
        }
        assert_eq!(SimulationMode::from_code(4), None);
    }

    #[test]
    fn mode_feature_flags() {
        use SimulationMode::{Coupled, DiffusionOnly, InnateOnly, NoDiffusionCoupled};

        assert!(Coupled.diffusion_enabled());
        assert!(DiffusionOnly.diffusion_enabled());
        assert!(InnateOnly.diffusion_enabled());
        assert!(!NoDiffusionCoupled.diffusion_enabled());

        assert!(!DiffusionOnly.innate_enabled());
        assert!(InnateOnly.innate_enabled());

        assert!(Coupled.opsonization_enabled());
        assert!(NoDiffusionCoupled.opsonization_enabled());
        assert!(!InnateOnly.opsonization_enabled());
        assert!(!DiffusionOnly.opsonization_enabled());

        assert!(Coupled.lymph_coupled());
        assert!(!InnateOnly.lymph_coupled());

        assert!(NoDiffusionCoupled.single_cell());
        assert!(!Coupled.single_cell());
    }

    #[test]
    fn contact_policy_codes() {
        assert_eq!(ContactPolicy::from_code(0), Some(ContactPolicy::BorderOnly));
        assert_eq!(ContactPolicy::from_code(1), Some(ContactPolicy::Homogeneous));
        assert_eq!(ContactPolicy::from_code(2), Some(ContactPolicy::VesselMap));
        assert_eq!(ContactPolicy::from_code(3), None);
    }
}
