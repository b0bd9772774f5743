//! Design parameters passed explicitly into the pipeline.
//!
//! Every default that drives candidate generation, evaluation and ranking lives
//! in [`DesignConfig`]. Configurations serialise to JSON; missing fields take
//! their defaults, so a file only needs the values it changes:
//!
//! ```
//! let cfg = rpaprime::config::DesignConfig::from_json_str(r#"{ "window_len": 32, "bounds": { "tm_max": 45.0 } }"#).unwrap();
//! assert_eq!(cfg.window_len, 32);
//! assert_eq!(cfg.bounds.tm_max, 45.0);
//! assert_eq!(cfg.bounds.tm_min, 37.0);
//! assert_eq!(cfg.top_n, 5);
//! ```
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PrimerError, Result};

/// Nucleic-acid model handed to the folding oracle.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    #[default]
    Dna,
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Material::Dna => write!(f, "dna"),
        }
    }
}

impl std::str::FromStr for Material {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dna" => Ok(Self::Dna),
            other => Err(format!("Unsupported material: {}", other)),
        }
    }
}

/// What to do when an oracle fails for a single candidate.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Record the failure in the report and continue with the next candidate.
    #[default]
    Skip,
    /// Stop the whole run at the first failing candidate.
    Abort,
}

/// Acceptance bounds. Tm and GC bounds are inclusive, structure bounds strict.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcceptanceBounds {
    pub tm_min: f64,
    pub tm_max: f64,
    pub gc_min: f64,
    pub gc_max: f64,
    /// Hairpin Tm must be strictly below this value.
    pub hairpin_tm_max: f64,
    /// Homodimer Tm must be strictly below this value.
    pub homodimer_tm_max: f64,
}

impl Default for AcceptanceBounds {
    fn default() -> Self {
        Self {
            tm_min: 37.0,
            tm_max: 42.0,
            gc_min: 30.0,
            gc_max: 50.0,
            hairpin_tm_max: 35.0,
            homodimer_tm_max: 35.0,
        }
    }
}

/// Duplex conditions for the nearest-neighbour Tm oracle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TmConditions {
    /// Na+ in mM.
    pub na_mm: f64,
    /// Concentration of the higher concentrated strand, nM.
    pub dnac1_nm: f64,
    /// Concentration of the lower concentrated strand, nM.
    pub dnac2_nm: f64,
}

impl Default for TmConditions {
    fn default() -> Self {
        Self { na_mm: 50.0, dnac1_nm: 25.0, dnac2_nm: 25.0 }
    }
}

/// Solution conditions for the hairpin and homodimer oracles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConditions {
    /// Monovalent cations, mM.
    pub mv_mm: f64,
    /// Divalent cations (Mg2+), mM.
    pub dv_mm: f64,
    /// dNTPs, mM.
    pub dntp_mm: f64,
    /// Oligo concentration, nM.
    pub dna_nm: f64,
}

impl Default for StructureConditions {
    fn default() -> Self {
        Self { mv_mm: 50.0, dv_mm: 1.5, dntp_mm: 0.6, dna_nm: 50.0 }
    }
}

/// Full parameter set for one design run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConfig {
    /// Candidate length L.
    pub window_len: usize,
    /// Primers kept per input sequence after ranking.
    pub top_n: usize,
    pub material: Material,
    /// Folding temperature in degrees Celsius.
    pub temperature_c: f64,
    pub bounds: AcceptanceBounds,
    pub tm_conditions: TmConditions,
    pub structure_conditions: StructureConditions,
    pub on_error: ErrorPolicy,
    /// Worker threads for candidate evaluation (`None`/0 = all logical cores).
    pub threads: Option<usize>,
    /// Per-candidate deadline across all oracle calls, in milliseconds.
    ///
    /// Checked each time an oracle returns: a candidate that overran fails with
    /// [`crate::error::OracleError::Timeout`], but a call that never returns is
    /// not interrupted.
    pub oracle_timeout_ms: Option<u64>,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            window_len: 30,
            top_n: 5,
            material: Material::Dna,
            temperature_c: 37.0,
            bounds: AcceptanceBounds::default(),
            tm_conditions: TmConditions::default(),
            structure_conditions: StructureConditions::default(),
            on_error: ErrorPolicy::Skip,
            threads: None,
            oracle_timeout_ms: None,
        }
    }
}

/// Named starting points for [`DesignConfig`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Preset {
    /// Recombinase polymerase amplification: 30-mers, Tm 37-42 C.
    #[default]
    Rpa,
    /// Loop-mediated isothermal amplification: 20-mers, Tm 55-65 C.
    Lamp,
}

impl std::str::FromStr for Preset {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rpa" => Ok(Self::Rpa),
            "lamp" => Ok(Self::Lamp),
            other => Err(format!("Unknown preset: {} (expected rpa or lamp)", other)),
        }
    }
}

impl DesignConfig {
    /// Build the configuration for a preset.
    pub fn preset(p: Preset) -> Self {
        match p {
            Preset::Rpa => Self::default(),
            Preset::Lamp => Self {
                window_len: 20,
                bounds: AcceptanceBounds {
                    tm_min: 55.0,
                    tm_max: 65.0,
                    gc_min: 40.0,
                    gc_max: 65.0,
                    ..AcceptanceBounds::default()
                },
                ..Self::default()
            },
        }
    }

    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Load a configuration file; fields absent from the file keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();
        let text = std::fs::read_to_string(p)
            .map_err(|source| PrimerError::ConfigIo { path: p.to_path_buf(), source })?;
        Self::from_json_str(&text)
            .map_err(|source| PrimerError::ConfigParse { path: p.to_path_buf(), source })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check internal consistency before a run.
    pub fn validate(&self) -> Result<()> {
        if self.window_len == 0 {
            return Err(PrimerError::Config("window_len must be at least 1".into()));
        }
        if self.top_n == 0 {
            return Err(PrimerError::Config("top_n must be at least 1".into()));
        }
        let b = &self.bounds;
        let all_finite = [b.tm_min, b.tm_max, b.gc_min, b.gc_max, b.hairpin_tm_max, b.homodimer_tm_max, self.temperature_c]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(PrimerError::Config("bounds and temperature must be finite numbers".into()));
        }
        if b.tm_min > b.tm_max {
            return Err(PrimerError::Config(format!("tm_min ({}) exceeds tm_max ({})", b.tm_min, b.tm_max)));
        }
        if b.gc_min > b.gc_max {
            return Err(PrimerError::Config(format!("gc_min ({}) exceeds gc_max ({})", b.gc_min, b.gc_max)));
        }
        if self.temperature_c <= -273.15 {
            return Err(PrimerError::Config("temperature_c must be above absolute zero".into()));
        }
        let t = &self.tm_conditions;
        if !(t.na_mm > 0.0 && t.dnac1_nm > 0.0 && t.dnac1_nm - t.dnac2_nm / 2.0 > 0.0) {
            return Err(PrimerError::Config(
                "tm_conditions need na_mm > 0 and dnac1_nm > dnac2_nm / 2 > 0".into(),
            ));
        }
        let s = &self.structure_conditions;
        if !(s.mv_mm > 0.0 && s.dv_mm >= 0.0 && s.dntp_mm >= 0.0 && s.dna_nm > 0.0) {
            return Err(PrimerError::Config(
                "structure_conditions need mv_mm > 0, dna_nm > 0 and non-negative dv_mm/dntp_mm".into(),
            ));
        }
        if self.oracle_timeout_ms == Some(0) {
            return Err(PrimerError::Config("oracle_timeout_ms must be positive when set".into()));
        }
        Ok(())
    }

    /// Effective worker count (`None` or 0 means all logical cores).
    pub fn effective_threads(&self) -> usize {
        match self.threads {
            Some(n) if n > 0 => n,
            _ => num_cpus::get().max(1),
        }
    }
}
