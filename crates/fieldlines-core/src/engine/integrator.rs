use super::config::IntegratorKind;
use nalgebra::{Point2, Vector2};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum IntegrationError {
    #[error("state became non-finite near λ = {lambda}")]
    NonFinite { lambda: f64 },
    #[error("exceeded {max_steps} steps in one sample interval near λ = {lambda}")]
    StepLimit { lambda: f64, max_steps: usize },
    #[error("step size underflow near λ = {lambda}")]
    StepUnderflow { lambda: f64 },
}

/// Solves the autonomous initial value problem `dp/dλ = v(p)`, `p(λ_0) = start`.
pub trait Integrator {
    /// Returns the solution sampled at every value of `lambdas`.
    ///
    /// `lambdas` must be monotonic; the first sample is `start` itself and
    /// is reported at `lambdas[0]`. An empty grid yields an empty result.
    fn integrate<F>(
        &self,
        velocity: F,
        start: Point2<f64>,
        lambdas: &[f64],
    ) -> Result<Vec<Point2<f64>>, IntegrationError>
    where
        F: Fn(&Point2<f64>) -> Vector2<f64>;
}

/// Fixed-step classic Runge–Kutta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rk4 {
    /// Equal steps taken between consecutive samples.
    pub substeps: usize,
}

impl Rk4 {
    #[inline]
    fn step<F>(velocity: &F, p: &Point2<f64>, h: f64) -> Point2<f64>
    where
        F: Fn(&Point2<f64>) -> Vector2<f64>,
    {
        let k1 = velocity(p);
        let k2 = velocity(&(p + k1 * (0.5 * h)));
        let k3 = velocity(&(p + k2 * (0.5 * h)));
        let k4 = velocity(&(p + k3 * h));
        p + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0)
    }
}

impl Integrator for Rk4 {
    fn integrate<F>(
        &self,
        velocity: F,
        start: Point2<f64>,
        lambdas: &[f64],
    ) -> Result<Vec<Point2<f64>>, IntegrationError>
    where
        F: Fn(&Point2<f64>) -> Vector2<f64>,
    {
        let mut out = Vec::with_capacity(lambdas.len());
        let Some(&first) = lambdas.first() else {
            return Ok(out);
        };
        out.push(start);

        let substeps = self.substeps.max(1);
        let mut p = start;
        let mut lambda = first;
        for &target in &lambdas[1..] {
            let h = (target - lambda) / substeps as f64;
            for _ in 0..substeps {
                p = Self::step(&velocity, &p, h);
            }
            if !(p.x.is_finite() && p.y.is_finite()) {
                return Err(IntegrationError::NonFinite { lambda: target });
            }
            lambda = target;
            out.push(p);
        }
        Ok(out)
    }
}

/// Adaptive Dormand–Prince 5(4) with local extrapolation.
///
/// Every sample λ is hit exactly; the step size carries over from one sample
/// interval to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DormandPrince {
    pub rtol: f64,
    pub atol: f64,
    pub max_steps: usize,
}

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;
// Difference between the fifth- and fourth-order weights.
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

impl DormandPrince {
    /// One trial step: the fifth-order solution and its error estimate.
    fn trial<F>(
        velocity: &F,
        p: &Point2<f64>,
        k1: &Vector2<f64>,
        h: f64,
    ) -> (Point2<f64>, Vector2<f64>, Vector2<f64>)
    where
        F: Fn(&Point2<f64>) -> Vector2<f64>,
    {
        let k2 = velocity(&(p + k1 * (h * A21)));
        let k3 = velocity(&(p + (k1 * A31 + k2 * A32) * h));
        let k4 = velocity(&(p + (k1 * A41 + k2 * A42 + k3 * A43) * h));
        let k5 = velocity(&(p + (k1 * A51 + k2 * A52 + k3 * A53 + k4 * A54) * h));
        let k6 = velocity(&(p + (k1 * A61 + k2 * A62 + k3 * A63 + k4 * A64 + k5 * A65) * h));
        let next = p + (k1 * B1 + k3 * B3 + k4 * B4 + k5 * B5 + k6 * B6) * h;
        let k7 = velocity(&next);
        let err = (k1 * E1 + k3 * E3 + k4 * E4 + k5 * E5 + k6 * E6 + k7 * E7) * h;
        (next, err, k7)
    }

    fn error_norm(&self, p: &Point2<f64>, next: &Point2<f64>, err: &Vector2<f64>) -> f64 {
        let scaled = |i: usize| {
            let scale = self.atol + self.rtol * p[i].abs().max(next[i].abs());
            err[i] / scale
        };
        ((scaled(0).powi(2) + scaled(1).powi(2)) / 2.0).sqrt()
    }

    fn growth(err_norm: f64) -> f64 {
        if err_norm == 0.0 {
            MAX_FACTOR
        } else {
            (SAFETY * err_norm.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
        }
    }
}

impl Integrator for DormandPrince {
    fn integrate<F>(
        &self,
        velocity: F,
        start: Point2<f64>,
        lambdas: &[f64],
    ) -> Result<Vec<Point2<f64>>, IntegrationError>
    where
        F: Fn(&Point2<f64>) -> Vector2<f64>,
    {
        let mut out = Vec::with_capacity(lambdas.len());
        let Some(&first) = lambdas.first() else {
            return Ok(out);
        };
        out.push(start);

        let mut p = start;
        let mut lambda = first;
        let mut k1 = velocity(&p);
        let mut h_abs = lambdas
            .get(1)
            .map(|&second| (second - first).abs())
            .unwrap_or(0.0);

        for &target in &lambdas[1..] {
            let mut steps = 0usize;
            while lambda != target {
                let remaining = target - lambda;
                if h_abs == 0.0 {
                    h_abs = remaining.abs();
                }
                let direction = remaining.signum();
                // Stretch slightly rather than leave a sliver of the interval.
                let last_step = h_abs * (1.0 + 1e-6) >= remaining.abs();
                let h = if last_step { remaining } else { h_abs * direction };

                if !last_step && h.abs() <= f64::EPSILON * lambda.abs().max(1.0) {
                    return Err(IntegrationError::StepUnderflow { lambda });
                }
                steps += 1;
                if steps > self.max_steps {
                    return Err(IntegrationError::StepLimit {
                        lambda,
                        max_steps: self.max_steps,
                    });
                }

                let (next, err, k_next) = Self::trial(&velocity, &p, &k1, h);
                if !(next.x.is_finite() && next.y.is_finite()) {
                    return Err(IntegrationError::NonFinite { lambda });
                }
                let err_norm = self.error_norm(&p, &next, &err);
                if err_norm <= 1.0 {
                    p = next;
                    k1 = k_next;
                    lambda = if last_step { target } else { lambda + h };
                    // A clamped final step says nothing about the natural step size.
                    if !last_step {
                        h_abs *= Self::growth(err_norm);
                    }
                } else {
                    h_abs = h.abs() * Self::growth(err_norm).min(1.0);
                }
            }
            out.push(p);
        }
        Ok(out)
    }
}

impl Integrator for IntegratorKind {
    fn integrate<F>(
        &self,
        velocity: F,
        start: Point2<f64>,
        lambdas: &[f64],
    ) -> Result<Vec<Point2<f64>>, IntegrationError>
    where
        F: Fn(&Point2<f64>) -> Vector2<f64>,
    {
        match *self {
            IntegratorKind::Rk4 { substeps } => {
                Rk4 { substeps }.integrate(velocity, start, lambdas)
            }
            IntegratorKind::DormandPrince {
                rtol,
                atol,
                max_steps,
            } => DormandPrince {
                rtol,
                atol,
                max_steps,
            }
            .integrate(velocity, start, lambdas),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::utils::geometry::linspace;

    // dp/dλ = (-y, x): circles around the origin, exact solution is a rotation.
    fn rotation(p: &Point2<f64>) -> Vector2<f64> {
        Vector2::new(-p.y, p.x)
    }

    fn exact_rotation(start: &Point2<f64>, lambda: f64) -> Point2<f64> {
        let (s, c) = lambda.sin_cos();
        Point2::new(c * start.x - s * start.y, s * start.x + c * start.y)
    }

    #[test]
    fn empty_grid_gives_empty_result() {
        let rk4 = Rk4 { substeps: 4 };
        assert!(rk4.integrate(rotation, Point2::new(1.0, 0.0), &[]).unwrap().is_empty());
        let dp = DormandPrince {
            rtol: 1e-6,
            atol: 1e-9,
            max_steps: 100,
        };
        assert!(dp.integrate(rotation, Point2::new(1.0, 0.0), &[]).unwrap().is_empty());
    }

    #[test]
    fn single_sample_is_the_start_point() {
        let start = Point2::new(0.3, -0.4);
        let out = Rk4 { substeps: 1 }.integrate(rotation, start, &[0.0]).unwrap();
        assert_eq!(out, vec![start]);
    }

    #[test]
    fn rk4_tracks_exact_rotation() {
        let start = Point2::new(1.0, 0.0);
        let lambdas = linspace(0.0, std::f64::consts::TAU, 201);
        let out = Rk4 { substeps: 4 }.integrate(rotation, start, &lambdas).unwrap();

        assert_eq!(out.len(), lambdas.len());
        assert_eq!(out[0], start);
        for (p, &lambda) in out.iter().zip(&lambdas) {
            let exact = exact_rotation(&start, lambda);
            assert!(nalgebra::distance(p, &exact) < 1e-8);
        }
    }

    #[test]
    fn rk4_more_substeps_is_more_accurate() {
        let start = Point2::new(1.0, 0.0);
        let lambdas = linspace(0.0, 20.0, 21);
        let exact = exact_rotation(&start, 20.0);

        let coarse = Rk4 { substeps: 1 }.integrate(rotation, start, &lambdas).unwrap();
        let fine = Rk4 { substeps: 8 }.integrate(rotation, start, &lambdas).unwrap();

        let coarse_err = nalgebra::distance(coarse.last().unwrap(), &exact);
        let fine_err = nalgebra::distance(fine.last().unwrap(), &exact);
        assert!(fine_err < coarse_err);
    }

    #[test]
    fn dormand_prince_meets_tolerance_on_rotation() {
        let start = Point2::new(0.0, 2.0);
        let lambdas = linspace(0.0, 10.0, 11);
        let dp = DormandPrince {
            rtol: 1e-9,
            atol: 1e-12,
            max_steps: 10_000,
        };
        let out = dp.integrate(rotation, start, &lambdas).unwrap();

        assert_eq!(out.len(), 11);
        for (p, &lambda) in out.iter().zip(&lambdas) {
            assert!(nalgebra::distance(p, &exact_rotation(&start, lambda)) < 1e-6);
        }
    }

    #[test]
    fn dormand_prince_integrates_backwards() {
        let start = Point2::new(1.0, 0.0);
        let lambdas = linspace(0.0, -3.0, 4);
        let out = DormandPrince {
            rtol: 1e-9,
            atol: 1e-12,
            max_steps: 10_000,
        }
        .integrate(rotation, start, &lambdas)
        .unwrap();
        assert!(nalgebra::distance(&out[3], &exact_rotation(&start, -3.0)) < 1e-6);
    }

    #[test]
    fn dormand_prince_reports_step_limit() {
        let dp = DormandPrince {
            rtol: 1e-12,
            atol: 1e-14,
            max_steps: 2,
        };
        let result = dp.integrate(rotation, Point2::new(1.0, 0.0), &[0.0, 100.0]);
        assert!(matches!(
            result,
            Err(IntegrationError::StepLimit { max_steps: 2, .. })
        ));
    }

    #[test]
    fn rk4_reports_non_finite_state() {
        let blow_up = |p: &Point2<f64>| Vector2::new(p.x * p.x * 1e300, 0.0);
        let result =
            Rk4 { substeps: 1 }.integrate(blow_up, Point2::new(1.0, 0.0), &[0.0, 1.0, 2.0]);
        assert!(matches!(result, Err(IntegrationError::NonFinite { .. })));
    }

    #[test]
    fn zero_velocity_keeps_the_start_point() {
        let still = |_: &Point2<f64>| Vector2::zeros();
        let start = Point2::new(4.0, -1.0);
        let lambdas = linspace(0.0, 5.0, 6);
        for kind in [IntegratorKind::default(), IntegratorKind::dormand_prince()] {
            let out = kind.integrate(still, start, &lambdas).unwrap();
            assert!(out.iter().all(|p| *p == start));
        }
    }

    #[test]
    fn integrator_kind_dispatches_to_matching_solver() {
        let start = Point2::new(1.0, 0.0);
        let lambdas = linspace(0.0, 1.0, 5);
        let via_kind = IntegratorKind::Rk4 { substeps: 3 }
            .integrate(rotation, start, &lambdas)
            .unwrap();
        let direct = Rk4 { substeps: 3 }.integrate(rotation, start, &lambdas).unwrap();
        assert_eq!(via_kind, direct);
    }
}
