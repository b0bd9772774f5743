//! Nearest-neighbour duplex parameters for Watson–Crick DNA.
//!
//! Values are enthalpy in kcal/mol and entropy in cal/(K·mol) per stacked
//! dinucleotide, indexed by the 5'→3' dinucleotide of the top strand
//! (`AA`, `AC`, … `TT`, see [`crate::thermo::energy::stack_index`]). Both
//! orientations of a stack (e.g. `CA/GT` and `TG/AC`) share one value.
//!
//! Sources:
//! - Allawi & SantaLucia (1997) *Biochemistry* 36:10581, the default table of
//!   Biopython's `MeltingTemp.Tm_NN`, used for primer Tm.
//! - SantaLucia & Hicks (2004) *Annu. Rev. Biophys. Biomol. Struct.* 33:415:
//!   unified parameters, used for hairpins, dimers and folding.

/// Enthalpy/entropy pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thermo {
    /// kcal/mol
    pub dh: f64,
    /// cal/(K·mol)
    pub ds: f64,
}

const fn t(dh: f64, ds: f64) -> Thermo {
    Thermo { dh, ds }
}

/// A complete nearest-neighbour table with its initiation terms.
#[derive(Clone, Debug)]
pub struct NnTable {
    /// Stacks in `AA AC AG AT CA CC CG CT GA GC GG GT TA TC TG TT` order.
    pub stacks: [Thermo; 16],
    /// Duplex initiation, applied once.
    pub init: Thermo,
    /// Applied once per terminal A·T pair.
    pub terminal_at: Thermo,
    /// Applied once per terminal G·C pair.
    pub terminal_gc: Thermo,
}

/// Allawi & SantaLucia (1997).
pub const ALLAWI_1997: NnTable = NnTable {
    stacks: [
        t(-7.9, -22.2), t(-8.4, -22.4), t(-7.8, -21.0), t(-7.2, -20.4),
        t(-8.5, -22.7), t(-8.0, -19.9), t(-10.6, -27.2), t(-7.8, -21.0),
        t(-8.2, -22.2), t(-9.8, -24.4), t(-8.0, -19.9), t(-8.4, -22.4),
        t(-7.2, -21.3), t(-8.2, -22.2), t(-8.5, -22.7), t(-7.9, -22.2),
    ],
    init: t(0.0, 0.0),
    terminal_at: t(2.3, 4.1),
    terminal_gc: t(0.1, -2.8),
};

/// SantaLucia & Hicks (2004) unified parameters.
pub const SANTALUCIA_2004: NnTable = NnTable {
    stacks: [
        t(-7.6, -21.3), t(-8.4, -22.4), t(-7.8, -21.0), t(-7.2, -20.4),
        t(-8.5, -22.7), t(-8.0, -19.9), t(-10.6, -27.2), t(-7.8, -21.0),
        t(-8.2, -22.2), t(-9.8, -24.4), t(-8.0, -19.9), t(-8.4, -22.4),
        t(-7.2, -21.3), t(-8.2, -22.2), t(-8.5, -22.7), t(-7.6, -21.3),
    ],
    init: t(0.2, -5.7),
    terminal_at: t(2.2, 6.9),
    terminal_gc: t(0.0, 0.0),
};

/// Gas constant, cal/(K·mol).
pub const R: f64 = 1.987;

/// 0 °C in kelvin.
pub const KELVIN: f64 = 273.15;

/// 37 °C in kelvin; loop tables are quoted at this temperature.
pub const T37: f64 = 310.15;
