//! Nelder-Mead simplex minimization for model parameter estimation.

/// Configuration for the Nelder-Mead search.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Convergence tolerance on the simplex value spread.
    pub tolerance: f64,
    /// Reflection coefficient.
    pub alpha: f64,
    /// Expansion coefficient.
    pub gamma: f64,
    /// Contraction coefficient.
    pub rho: f64,
    /// Shrinkage coefficient.
    pub sigma: f64,
    /// Relative step used to build the initial simplex.
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

/// Outcome of a Nelder-Mead run.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// Best point found.
    pub point: Vec<f64>,
    /// Objective value at the best point.
    pub value: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether the spread fell below tolerance within `max_iter`.
    pub converged: bool,
}

/// Minimize `objective` starting from `initial`, optionally clamping each
/// coordinate to `bounds`.
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: &NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let dim = initial.len();
    if dim == 0 {
        return NelderMeadResult {
            point: vec![],
            value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    // Initial simplex: the start point plus one perturbed vertex per axis.
    let mut simplex = vec![clamp(initial.to_vec(), bounds)];
    for axis in 0..dim {
        let mut vertex = initial.to_vec();
        let step = if initial[axis].abs() > 1e-10 {
            config.initial_step * initial[axis].abs()
        } else {
            config.initial_step
        };
        vertex[axis] += step;
        simplex.push(clamp(vertex, bounds));
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| objective(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;

        let mut order: Vec<usize> = (0..=dim).collect();
        order.sort_by(|&a, &b| {
            values[a]
                .partial_cmp(&values[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let best = order[0];
        let worst = order[dim];
        let second_worst = order[dim - 1];

        if values[worst] - values[best] < config.tolerance {
            converged = true;
            break;
        }

        let centroid = centroid_excluding(&simplex, worst);
        if simplex
            .iter()
            .map(|v| distance(v, &centroid))
            .fold(0.0, f64::max)
            < config.tolerance
        {
            converged = true;
            break;
        }

        let reflected = clamp(blend(&centroid, &simplex[worst], -config.alpha), bounds);
        let f_reflected = objective(&reflected);

        if f_reflected < values[second_worst] && f_reflected >= values[best] {
            simplex[worst] = reflected;
            values[worst] = f_reflected;
            continue;
        }

        if f_reflected < values[best] {
            let expanded = clamp(blend(&centroid, &reflected, config.gamma), bounds);
            let f_expanded = objective(&expanded);
            if f_expanded < f_reflected {
                simplex[worst] = expanded;
                values[worst] = f_expanded;
            } else {
                simplex[worst] = reflected;
                values[worst] = f_reflected;
            }
            continue;
        }

        // Contraction: outside towards the reflected point when it improves on
        // the worst vertex, inside towards the worst vertex otherwise.
        let target = if f_reflected < values[worst] {
            reflected.clone()
        } else {
            simplex[worst].clone()
        };
        let contracted = clamp(blend(&centroid, &target, config.rho), bounds);
        let f_contracted = objective(&contracted);
        let acceptable = if f_reflected < values[worst] {
            f_contracted <= f_reflected
        } else {
            f_contracted < values[worst]
        };
        if acceptable {
            simplex[worst] = contracted;
            values[worst] = f_contracted;
            continue;
        }

        // Shrink the whole simplex towards the best vertex.
        let anchor = simplex[best].clone();
        for i in 0..=dim {
            if i == best {
                continue;
            }
            for j in 0..dim {
                simplex[i][j] = anchor[j] + config.sigma * (simplex[i][j] - anchor[j]);
            }
            simplex[i] = clamp(std::mem::take(&mut simplex[i]), bounds);
            values[i] = objective(&simplex[i]);
        }
    }

    let best = values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0);

    NelderMeadResult {
        point: simplex[best].clone(),
        value: values[best],
        iterations,
        converged,
    }
}

/// `centroid + factor * (point - centroid)`; negative factors reflect.
fn blend(centroid: &[f64], point: &[f64], factor: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(point.iter())
        .map(|(c, p)| c + factor * (p - c))
        .collect()
}

fn centroid_excluding(simplex: &[Vec<f64>], skip: usize) -> Vec<f64> {
    let dim = simplex[0].len();
    let mut centroid = vec![0.0; dim];
    for (i, vertex) in simplex.iter().enumerate() {
        if i == skip {
            continue;
        }
        for (c, v) in centroid.iter_mut().zip(vertex.iter()) {
            *c += v;
        }
    }
    let count = (simplex.len() - 1) as f64;
    for c in &mut centroid {
        *c /= count;
    }
    centroid
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

fn clamp(mut point: Vec<f64>, bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    if let Some(bounds) = bounds {
        for (value, &(lo, hi)) in point.iter_mut().zip(bounds.iter()) {
            *value = value.clamp(lo, hi);
        }
    }
    point
}
