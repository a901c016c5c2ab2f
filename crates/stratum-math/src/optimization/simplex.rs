//! Nelder-Mead simplex.

use nalgebra::DVector;

use crate::error::MathResult;
use crate::optimization::{EndCriteria, EndCriteriaType, OptimizationMethod, Problem};

/// Nelder-Mead downhill simplex on the scalar cost.
///
/// Points outside the constraint region cost `+inf`. Stops with
/// `StationaryFunctionAccuracy` when the best cost is within
/// `function_epsilon`, and with `StationaryFunctionValue` once both the
/// spread of costs and the size of the simplex have collapsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simplex {
    /// Edge length of the initial simplex.
    pub lambda: f64,
}

impl Default for Simplex {
    fn default() -> Self {
        Self { lambda: 0.01 }
    }
}

impl Simplex {
    /// Creates a simplex method with initial edge length `lambda`.
    #[must_use]
    pub fn new(lambda: f64) -> Self {
        Self { lambda }
    }
}

fn constrained_cost(problem: &mut Problem<'_>, x: &DVector<f64>) -> MathResult<f64> {
    if !problem.constraint().test(x) {
        return Ok(f64::INFINITY);
    }
    let cost = problem.value(x)?;
    Ok(if cost.is_finite() { cost } else { f64::INFINITY })
}

impl OptimizationMethod for Simplex {
    fn minimize(
        &self,
        problem: &mut Problem<'_>,
        end_criteria: &EndCriteria,
    ) -> MathResult<EndCriteriaType> {
        const REFLECTION: f64 = 1.0;
        const EXPANSION: f64 = 2.0;
        const CONTRACTION: f64 = 0.5;
        const SHRINK: f64 = 0.5;

        let x0 = problem.current_value().clone();
        let dim = x0.len();

        let mut vertices = Vec::with_capacity(dim + 1);
        let mut costs = Vec::with_capacity(dim + 1);
        costs.push(constrained_cost(problem, &x0)?);
        vertices.push(x0.clone());
        for d in 0..dim {
            let mut x = x0.clone();
            x[d] += self.lambda;
            costs.push(constrained_cost(problem, &x)?);
            vertices.push(x);
        }

        let mut iteration = 0;
        loop {
            let mut order: Vec<usize> = (0..=dim).collect();
            order.sort_by(|&i, &j| costs[i].total_cmp(&costs[j]));
            vertices = order.iter().map(|&i| vertices[i].clone()).collect();
            costs = order.iter().map(|&i| costs[i]).collect();

            problem.set_current_value(vertices[0].clone());
            problem.set_function_value(costs[0]);

            if let Some(end) = end_criteria.check_function_accuracy(costs[0]) {
                return Ok(end);
            }
            let centroid = vertices[..dim]
                .iter()
                .fold(DVector::zeros(dim), |acc, v| acc + v)
                / dim as f64;
            let size = vertices
                .iter()
                .map(|v| (v - &centroid).norm())
                .fold(0.0_f64, f64::max);
            let size_tolerance = end_criteria.function_epsilon.max(end_criteria.root_epsilon);
            if (costs[dim] - costs[0]).abs() <= end_criteria.function_epsilon && size <= size_tolerance
            {
                return Ok(EndCriteriaType::StationaryFunctionValue);
            }
            if let Some(end) = end_criteria.check_max_iterations(iteration) {
                return Ok(end);
            }
            iteration += 1;

            let worst = vertices[dim].clone();

            let reflected = &centroid + (&centroid - &worst) * REFLECTION;
            let f_reflected = constrained_cost(problem, &reflected)?;

            if f_reflected < costs[0] {
                let expanded = &centroid + (&reflected - &centroid) * EXPANSION;
                let f_expanded = constrained_cost(problem, &expanded)?;
                if f_expanded < f_reflected {
                    vertices[dim] = expanded;
                    costs[dim] = f_expanded;
                } else {
                    vertices[dim] = reflected;
                    costs[dim] = f_reflected;
                }
                continue;
            }
            if f_reflected < costs[dim - 1] {
                vertices[dim] = reflected;
                costs[dim] = f_reflected;
                continue;
            }

            let contracted = &centroid + (&worst - &centroid) * CONTRACTION;
            let f_contracted = constrained_cost(problem, &contracted)?;
            if f_contracted < costs[dim] {
                vertices[dim] = contracted;
                costs[dim] = f_contracted;
                continue;
            }

            let best = vertices[0].clone();
            for i in 1..=dim {
                vertices[i] = &best + (&vertices[i] - &best) * SHRINK;
                costs[i] = constrained_cost(problem, &vertices[i])?;
            }
        }
    }
}
