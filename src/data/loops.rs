//! Loop initiation free energies (kcal/mol at 37 °C, 1 M Na+) for DNA.
//!
//! From SantaLucia & Hicks (2004), Table 4. Sizes that are not tabulated are
//! extrapolated with the Jacobson–Stockmayer term from the nearest smaller
//! tabulated size (or the smallest one), see [`crate::thermo::energy::loop_dg`].

/// `(loop size in nt, ΔG°37)` for hairpin loops (minimum 3 nt).
pub const HAIRPIN: &[(usize, f64)] = &[
    (3, 3.5), (4, 3.5), (5, 3.3), (6, 4.0), (7, 4.2), (8, 4.3), (9, 4.5), (10, 4.6),
    (12, 5.0), (14, 5.1), (16, 5.3), (18, 5.5), (20, 5.7), (25, 6.1), (30, 6.3),
];

/// `(unpaired nt, ΔG°37)` for bulge loops.
pub const BULGE: &[(usize, f64)] = &[
    (1, 4.0), (2, 2.9), (3, 3.1), (4, 3.2), (5, 3.3), (6, 3.5), (7, 3.7), (8, 3.9),
    (9, 4.1), (10, 4.3), (12, 4.5), (14, 4.8), (16, 5.0), (18, 5.2), (20, 5.3),
    (25, 5.6), (30, 5.9),
];

/// `(total unpaired nt, ΔG°37)` for internal loops.
pub const INTERIOR: &[(usize, f64)] = &[
    (3, 3.2), (4, 3.6), (5, 4.0), (6, 4.4), (7, 4.6), (8, 4.8), (9, 4.9), (10, 4.9),
    (12, 5.2), (14, 5.4), (16, 5.6), (18, 5.8), (20, 5.9), (25, 6.3), (30, 6.6),
];

/// Jacobson–Stockmayer coefficient for loop extrapolation.
pub const JACOBSON_STOCKMAYER: f64 = 2.44;

/// Internal-loop asymmetry penalty per nt of size difference, and its cap.
pub const ASYMMETRY_PER_NT: f64 = 0.3;
pub const ASYMMETRY_MAX: f64 = 3.0;

/// Largest bulge/internal loop considered by the folding recursion.
pub const MAX_INTERNAL_LOOP: usize = 30;

/// Multiloop penalties: closing `a`, per unpaired nt `b`, per branch `c`.
pub const MULTILOOP_A: f64 = 3.4;
pub const MULTILOOP_B: f64 = 0.0;
pub const MULTILOOP_C: f64 = 0.4;

/// Shortest hairpin loop allowed.
pub const MIN_HAIRPIN_LOOP: usize = 3;
