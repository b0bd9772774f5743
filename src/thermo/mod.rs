//! Thermodynamic and folding oracles.
//!
//! The pipeline sees four capabilities, each a pure function of a nucleotide
//! string plus fixed conditions:
//!
//! | trait | returns |
//! |---|---|
//! | [`MeltingTemperatureOracle`] | duplex Tm, °C |
//! | [`HairpinOracle`] | Tm of the most stable hairpin, °C |
//! | [`DimerOracle`] | Tm of the most stable self-dimer, °C |
//! | [`FoldingOracle`] | minimum free energy of the folded strand, kcal/mol |
//!
//! Any implementation can be plugged in through [`Oracles`]; the built-in ones
//! are [`tm::NearestNeighborTm`], [`structure::ThermoAligner`] and
//! [`fold::ZukerFolder`]. GC content needs no oracle, see [`tm::gc_percent`].
//!
//! ```
//! use rpaprime::config::DesignConfig;
//! use rpaprime::thermo::Oracles;
//! let o = Oracles::builtin(&DesignConfig::default());
//! let tm = o.tm.melting_temperature(b"CGTTCCAAAGATGTGGGCATGAGCTTAC").unwrap();
//! assert!((tm - 60.32).abs() < 0.01);
//! ```
use std::sync::Arc;

use crate::config::{DesignConfig, Material};
use crate::error::OracleError;

pub mod energy;
pub mod fold;
pub mod structure;
pub mod tm;

/// Nearest-neighbour melting temperature of a primer against its complement.
pub trait MeltingTemperatureOracle: Send + Sync {
    fn melting_temperature(&self, seq: &[u8]) -> Result<f64, OracleError>;
}

/// Melting temperature of the most stable intramolecular hairpin.
/// Returns 0.0 when the strand forms no hairpin.
pub trait HairpinOracle: Send + Sync {
    fn hairpin_tm(&self, seq: &[u8]) -> Result<f64, OracleError>;
}

/// Melting temperature of the most stable duplex between two copies of the strand.
/// Returns 0.0 when no self-dimer forms.
pub trait DimerOracle: Send + Sync {
    fn homodimer_tm(&self, seq: &[u8]) -> Result<f64, OracleError>;
}

/// Minimum free energy (kcal/mol) of single-strand secondary structure.
/// Never positive; 0.0 means unstructured.
pub trait FoldingOracle: Send + Sync {
    fn minimum_free_energy(&self, seq: &[u8], material: Material, celsius: f64) -> Result<f64, OracleError>;
}

/// The oracle set used by one evaluation run.
#[derive(Clone)]
pub struct Oracles {
    pub tm: Arc<dyn MeltingTemperatureOracle>,
    pub hairpin: Arc<dyn HairpinOracle>,
    pub dimer: Arc<dyn DimerOracle>,
    pub folding: Arc<dyn FoldingOracle>,
}

impl Oracles {
    pub fn new(
        tm: Arc<dyn MeltingTemperatureOracle>,
        hairpin: Arc<dyn HairpinOracle>,
        dimer: Arc<dyn DimerOracle>,
        folding: Arc<dyn FoldingOracle>,
    ) -> Self {
        Self { tm, hairpin, dimer, folding }
    }

    /// Built-in models parameterised by the configuration's conditions.
    pub fn builtin(config: &DesignConfig) -> Self {
        let structure = Arc::new(structure::ThermoAligner::new(config.structure_conditions.clone()));
        Self {
            tm: Arc::new(tm::NearestNeighborTm::new(config.tm_conditions.clone())),
            hairpin: structure.clone(),
            dimer: structure,
            folding: Arc::new(fold::ZukerFolder::default()),
        }
    }
}

impl std::fmt::Debug for Oracles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Oracles").finish_non_exhaustive()
    }
}
