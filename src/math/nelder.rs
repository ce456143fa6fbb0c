//! Deterministic Nelder-Mead simplex minimizer.
//!
//! The GARCH likelihood is optimized through penalty bounds (invalid
//! parameter regions return a huge objective value), which makes the
//! surface non-smooth at the constraint boundary. A derivative-free
//! simplex search handles that without gradient plumbing, and stays fully
//! deterministic: same start, same path, same answer.
//!
//! Standard coefficients (reflection 1, expansion 2, contraction 0.5,
//! shrink 0.5) and the fminsearch initial-simplex rule (5% relative step,
//! small absolute step for zero coordinates).

/// Outcome of a minimization run.
#[derive(Debug, Clone)]
pub struct Minimum {
    pub x: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Termination settings.
#[derive(Debug, Clone, Copy)]
pub struct NelderMeadOptions {
    /// Absolute spread of objective values across the simplex.
    pub f_tol: f64,
    /// Maximum coordinate spread across the simplex.
    pub x_tol: f64,
    /// Iteration budget per run (an iteration is one simplex update).
    pub max_iters: usize,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            f_tol: 1e-10,
            x_tol: 1e-8,
            max_iters: 0, // resolved per-dimension in `minimize`
        }
    }
}

/// Minimize `f` starting from `x0`.
///
/// Never errors: when the budget runs out the best vertex is returned with
/// `converged = false`, and the caller decides whether that is fatal.
pub fn minimize<F>(f: F, x0: &[f64], opts: NelderMeadOptions) -> Minimum
where
    F: Fn(&[f64]) -> f64,
{
    let dim = x0.len();
    let max_iters = if opts.max_iters == 0 {
        500 * dim.max(1)
    } else {
        opts.max_iters
    };

    // Initial simplex: x0 plus one perturbed vertex per coordinate.
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
    simplex.push(x0.to_vec());
    for i in 0..dim {
        let mut v = x0.to_vec();
        if v[i] != 0.0 {
            v[i] *= 1.05;
        } else {
            v[i] = 0.00025;
        }
        simplex.push(v);
    }

    let mut values: Vec<f64> = simplex.iter().map(|v| f(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iters {
        iterations += 1;

        // Order vertices best-to-worst.
        let mut order: Vec<usize> = (0..=dim).collect();
        order.sort_by(|&a, &b| {
            values[a]
                .partial_cmp(&values[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let best = order[0];
        let worst = order[dim];
        let second_worst = order[dim.saturating_sub(1).min(dim)];

        if spread_small(&simplex, &values, best, worst, opts) {
            converged = true;
            break;
        }

        // Centroid of all vertices except the worst.
        let mut centroid = vec![0.0; dim];
        for (idx, v) in simplex.iter().enumerate() {
            if idx == worst {
                continue;
            }
            for (c, vi) in centroid.iter_mut().zip(v.iter()) {
                *c += vi;
            }
        }
        for c in centroid.iter_mut() {
            *c /= dim as f64;
        }

        let reflected = affine(&centroid, &simplex[worst], 1.0);
        let f_reflected = f(&reflected);

        if f_reflected < values[best] {
            // Try to go further in the same direction.
            let expanded = affine(&centroid, &simplex[worst], 2.0);
            let f_expanded = f(&expanded);
            if f_expanded < f_reflected {
                simplex[worst] = expanded;
                values[worst] = f_expanded;
            } else {
                simplex[worst] = reflected;
                values[worst] = f_reflected;
            }
            continue;
        }

        if f_reflected < values[second_worst] {
            simplex[worst] = reflected;
            values[worst] = f_reflected;
            continue;
        }

        // Contract toward the centroid.
        let contracted = affine(&centroid, &simplex[worst], -0.5);
        let f_contracted = f(&contracted);
        if f_contracted < values[worst] {
            simplex[worst] = contracted;
            values[worst] = f_contracted;
            continue;
        }

        // Shrink everything toward the best vertex.
        let best_vertex = simplex[best].clone();
        for (idx, v) in simplex.iter_mut().enumerate() {
            if idx == best {
                continue;
            }
            for (vi, bi) in v.iter_mut().zip(best_vertex.iter()) {
                *vi = bi + 0.5 * (*vi - bi);
            }
            values[idx] = f(v);
        }
    }

    let mut best = 0;
    for i in 1..values.len() {
        if values[i] < values[best] {
            best = i;
        }
    }

    Minimum {
        x: simplex[best].clone(),
        value: values[best],
        iterations,
        converged,
    }
}

fn affine(centroid: &[f64], worst: &[f64], t: f64) -> Vec<f64> {
    // centroid + t * (centroid - worst); t=1 reflects, t=2 expands,
    // t=-0.5 contracts inside.
    centroid
        .iter()
        .zip(worst.iter())
        .map(|(c, w)| c + t * (c - w))
        .collect()
}

fn spread_small(
    simplex: &[Vec<f64>],
    values: &[f64],
    best: usize,
    worst: usize,
    opts: NelderMeadOptions,
) -> bool {
    let f_spread = (values[worst] - values[best]).abs();
    if !f_spread.is_finite() || f_spread > opts.f_tol {
        return false;
    }

    let best_vertex = &simplex[best];
    let mut x_spread = 0.0_f64;
    for v in simplex {
        for (vi, bi) in v.iter().zip(best_vertex.iter()) {
            x_spread = x_spread.max((vi - bi).abs());
        }
    }
    x_spread <= opts.x_tol
}
