//! MINRES solver for the augmented LS-SVM system
//!
//! The bordered LS-SVM matrix is symmetric but indefinite (the zero corner
//! rules out Cholesky and plain conjugate gradients), so the dual variables
//! are obtained with MINRES (Paige & Saunders, 1975). Each iteration needs a
//! single matrix-vector product and the residual norm is tracked cheaply
//! through the Givens rotations of the Lanczos tridiagonal.

use crate::core::{DualSolution, LSSVMError, Result, SolverConfig, SolverOutcome};
use crate::solver::LinearSystem;
use log::debug;
use ndarray::{s, Array1};

/// MINRES solver for symmetric (possibly indefinite) systems
#[derive(Debug, Clone, Default)]
pub struct MinresSolver {
    config: SolverConfig,
}

impl MinresSolver {
    /// Create a new solver with the given configuration
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve the augmented system and split the solution into bias and dual
    /// coefficients
    ///
    /// # Errors
    /// - `InvalidParameter` if the solver configuration is invalid
    /// - `NonConvergence` if the residual is still above tolerance when the
    ///   iteration cap is reached
    pub fn solve(&self, system: &LinearSystem) -> Result<SolverOutcome> {
        self.config.validate()?;

        let (x, iterations) = self.minres(system)?;
        let residual_norm = system.residual_norm(x.view());

        debug!(
            "MINRES converged in {} iterations (n = {}, residual = {:e})",
            iterations,
            system.n_samples(),
            residual_norm
        );

        let bias = x[0];
        let alpha = x.slice(s![1..]).to_owned();

        Ok(SolverOutcome {
            solution: DualSolution::new(alpha, bias),
            iterations,
            residual_norm,
        })
    }

    /// Core MINRES iteration starting from x0 = 0
    ///
    /// Returns the solution vector and the number of iterations performed.
    fn minres(&self, system: &LinearSystem) -> Result<(Array1<f64>, usize)> {
        let b = system.rhs();
        let n = system.dim();
        let mut x = Array1::<f64>::zeros(n);

        let beta1 = b.dot(&b).sqrt();
        if beta1 == 0.0 {
            return Ok((x, 0));
        }
        let target = self.config.tolerance * beta1;

        // Lanczos vectors
        let mut r1 = b.to_owned();
        let mut r2 = b.to_owned();
        let mut y = b.to_owned();

        // Search directions
        let mut w = Array1::<f64>::zeros(n);
        let mut w2 = Array1::<f64>::zeros(n);

        let mut old_beta = 0.0;
        let mut beta = beta1;
        let mut dbar = 0.0;
        let mut epsln = 0.0;
        let mut phibar = beta1;
        let mut cs = -1.0;
        let mut sn = 0.0;

        for iteration in 1..=self.config.max_iterations {
            let v = &y / beta;
            y = system.apply(v.view());
            if iteration >= 2 {
                y.scaled_add(-beta / old_beta, &r1);
            }

            let alfa = v.dot(&y);
            y.scaled_add(-alfa / beta, &r2);
            r1 = std::mem::replace(&mut r2, y.clone());

            old_beta = beta;
            beta = r2.dot(&r2).sqrt();

            // Apply the previous rotation, then build the next one
            let old_eps = epsln;
            let delta = cs * dbar + sn * alfa;
            let gbar = sn * dbar - cs * alfa;
            epsln = sn * beta;
            dbar = -cs * beta;

            let gamma = gbar.hypot(beta).max(f64::EPSILON);
            cs = gbar / gamma;
            sn = beta / gamma;
            let phi = cs * phibar;
            phibar *= sn;

            // w = (v - old_eps * w1 - delta * w2) / gamma
            let w1 = std::mem::replace(&mut w2, w);
            let mut next_w = v;
            next_w.scaled_add(-old_eps, &w1);
            next_w.scaled_add(-delta, &w2);
            next_w /= gamma;
            w = next_w;

            x.scaled_add(phi, &w);

            // phibar is the norm of the current residual
            if phibar <= target {
                return Ok((x, iteration));
            }
            if beta == 0.0 {
                // Krylov space exhausted without reaching tolerance
                return Err(LSSVMError::NonConvergence {
                    iterations: iteration,
                    residual: system.residual_norm(x.view()),
                });
            }
        }

        Err(LSSVMError::NonConvergence {
            iterations: self.config.max_iterations,
            residual: system.residual_norm(x.view()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{gram_matrix, KernelSpec};
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};

    fn small_system() -> LinearSystem {
        let x = array![[0.0, 1.0], [1.0, 0.0], [2.0, 2.0], [-1.0, 0.5]];
        let y = array![1.0, -1.0, 1.0, -1.0];
        let gram = gram_matrix(&KernelSpec::rbf(1.0).unwrap(), x.view()).unwrap();
        LinearSystem::assemble(gram.view(), y.view(), 10.0).unwrap()
    }

    #[test]
    fn test_solves_augmented_system() {
        let system = small_system();
        let outcome = MinresSolver::default().solve(&system).unwrap();

        let mut x = Array1::<f64>::zeros(system.dim());
        x[0] = outcome.solution.bias;
        x.slice_mut(s![1..]).assign(&outcome.solution.alpha);

        let rhs_norm = system.rhs().dot(&system.rhs()).sqrt();
        assert!(system.residual_norm(x.view()) <= 1e-5 * rhs_norm);
        assert!(outcome.iterations > 0);
        assert!(outcome.iterations <= system.dim() + 5);
    }

    #[test]
    fn test_dual_coefficients_sum_to_zero() {
        // First row of the system: Σα = 0
        let outcome = MinresSolver::default().solve(&small_system()).unwrap();
        assert_relative_eq!(outcome.solution.alpha.sum(), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_known_solution() {
        // Ω = 0, γ = 1 gives b = 0, α = y for balanced targets
        let gram = Array2::<f64>::zeros((2, 2));
        let targets = array![1.0, -1.0];
        let system = LinearSystem::assemble(gram.view(), targets.view(), 1.0).unwrap();

        let outcome = MinresSolver::default().solve(&system).unwrap();
        assert_relative_eq!(outcome.solution.bias, 0.0, epsilon = 1e-9);
        assert_relative_eq!(outcome.solution.alpha[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(outcome.solution.alpha[1], -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_rhs_returns_zero_solution() {
        let gram = Array2::<f64>::eye(3);
        let targets = Array1::<f64>::zeros(3);
        let system = LinearSystem::assemble(gram.view(), targets.view(), 1.0).unwrap();

        let outcome = MinresSolver::default().solve(&system).unwrap();
        assert_eq!(outcome.iterations, 0);
        assert_eq!(outcome.solution.bias, 0.0);
        assert!(outcome.solution.alpha.iter().all(|&a| a == 0.0));
    }

    #[test]
    fn test_iteration_cap_reports_non_convergence() {
        let system = small_system();
        let config = SolverConfig {
            tolerance: 1e-14,
            max_iterations: 1,
        };
        let result = MinresSolver::new(config).solve(&system);

        match result {
            Err(LSSVMError::NonConvergence {
                iterations,
                residual,
            }) => {
                assert_eq!(iterations, 1);
                assert!(residual > 0.0);
            }
            other => panic!("expected NonConvergence, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SolverConfig {
            tolerance: 0.0,
            max_iterations: 10,
        };
        assert!(matches!(
            MinresSolver::new(config).solve(&small_system()),
            Err(LSSVMError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_deterministic() {
        let system = small_system();
        let first = MinresSolver::default().solve(&system).unwrap();
        let second = MinresSolver::default().solve(&system).unwrap();

        assert_eq!(first.solution, second.solution);
        assert_eq!(first.iterations, second.iterations);
    }
}
