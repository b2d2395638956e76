use nalgebra::Vector2;

/// Default softening term added to `|E|²` by [`stabilize`].
pub const DEFAULT_EPSILON: f64 = 0.001;

/// Field contribution of a single charge at displacement `d = p − c`.
///
/// Returns `None` when `d` is zero or so small that the contribution is not
/// representable as a finite vector.
#[inline]
pub fn point_charge_field(magnitude: f64, displacement: &Vector2<f64>) -> Option<Vector2<f64>> {
    let dist = displacement.norm();
    if dist == 0.0 {
        return None;
    }
    // Normalize first so `|d|³` cannot underflow before `|d|²` does.
    let field = (displacement / dist) * (magnitude / (dist * dist));
    (field.x.is_finite() && field.y.is_finite()).then_some(field)
}

/// Potential contribution `q / d` of a single charge; `None` at `d = 0` or
/// when `q / d` overflows.
#[inline]
pub fn point_charge_potential(magnitude: f64, displacement: &Vector2<f64>) -> Option<f64> {
    let dist = displacement.norm();
    if dist == 0.0 {
        return None;
    }
    let potential = magnitude / dist;
    potential.is_finite().then_some(potential)
}

/// Rescales a field vector by `1 / (|E|² + ε)`.
///
/// The direction is preserved and the magnitude `|E| / (|E|² + ε)` peaks at
/// `1 / (2√ε)` when `|E| = √ε`, so the result stays bounded however strong
/// the input is. A zero field maps to exactly zero, and so does a field too
/// strong to square or one that is not finite at all, matching the limit
/// `|E| → ∞`.
#[inline]
pub fn stabilize(field: &Vector2<f64>, epsilon: f64) -> Vector2<f64> {
    let denominator = field.norm_squared() + epsilon;
    if !denominator.is_finite() {
        return Vector2::zeros();
    }
    field / denominator
}

/// Upper bound on the magnitude of any vector produced by [`stabilize`].
#[inline]
pub fn stabilized_speed_bound(epsilon: f64) -> f64 {
    0.5 / epsilon.sqrt()
}
