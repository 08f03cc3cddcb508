/// All fitting parameters in one struct.
///
/// Tolerances are the only tunable "softness" in the pipeline: a landmark
/// search that fails under these values fails hard, and retrying with
/// other values is the caller's decision.
#[derive(Debug, Clone)]
pub struct FitConfig {
    // -- Compression --
    /// Maximum accumulated arc length of a merged run (length units).
    pub arc_thresh: f64,
    /// Maximum chord turn within a merged run (degrees).
    pub turn_thresh: f64,

    // -- Bottom flattening --
    /// Global-parameter window searched for the bottom axis crossing.
    pub flatten_window: (f64, f64),
    /// Optimizer precision for the bottom crossing.
    pub flatten_xatol: f64,

    // -- Landmarks --
    /// A segment is a bout candidate when its averaged tangent is within
    /// this of vertical (|x| < tol and |y| > 1 - tol).
    pub bout_tol: f64,
    /// A segment is a corner candidate when the averaged tangent jumps by
    /// more than this (sum of component deltas) from its predecessor.
    pub corner_curve_tol: f64,
    /// Samples per segment when averaging the unit tangent.
    pub tangent_samples: usize,
    /// Global-parameter margin trimmed from each 45° bracket.
    pub slope_margin: f64,

    // -- Optimizer --
    /// Parameter precision for bounded minimization.
    pub xatol: f64,
    /// Coarse samples seeding closest-point searches.
    pub closest_samples: usize,

    // -- Clothoid fitting --
    /// Global-parameter offset used for the tangent at a corner join,
    /// where the tangent is ill-defined.
    pub corner_trim: f64,
    /// Rotation refinement budget per span.
    pub max_iterations: usize,
    /// A rotation update smaller than this (radians) counts as settled.
    /// Must stay above what the closest-point search on the clothoid can
    /// resolve, about 1e-8 rad.
    pub convergence_tol: f64,
    /// A settled fit whose end is farther than this from the target
    /// landmark (length units) is not converged.
    pub end_tol: f64,
    /// Fail with `NonConvergence` instead of warning and keeping the last
    /// iterate.
    pub require_convergence: bool,
    /// Nodes used when comparing a span with its clothoid.
    pub compare_nodes: usize,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            arc_thresh: 5.0,
            turn_thresh: 30.0,
            flatten_window: (0.4, 0.6),
            flatten_xatol: 1e-9,
            bout_tol: 0.1,
            corner_curve_tol: 1.0,
            tangent_samples: 10,
            slope_margin: 0.015,
            xatol: 1e-5,
            closest_samples: 64,
            corner_trim: 0.003,
            max_iterations: 10,
            convergence_tol: 1e-6,
            end_tol: 0.1,
            require_convergence: false,
            compare_nodes: 10,
        }
    }
}

impl FitConfig {
    /// Builder-style setter for the bout tolerance.
    pub fn with_bout_tol(mut self, tol: f64) -> Self {
        self.bout_tol = tol;
        self
    }

    /// Builder-style setter for the corner tolerance.
    pub fn with_corner_curve_tol(mut self, tol: f64) -> Self {
        self.corner_curve_tol = tol;
        self
    }

    /// Builder-style setter for both compression budgets.
    pub fn with_compression(mut self, arc_thresh: f64, turn_thresh: f64) -> Self {
        self.arc_thresh = arc_thresh;
        self.turn_thresh = turn_thresh;
        self
    }

    pub fn with_require_convergence(mut self, strict: bool) -> Self {
        self.require_convergence = strict;
        self
    }
}
