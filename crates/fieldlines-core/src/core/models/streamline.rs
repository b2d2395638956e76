use nalgebra::Point2;

/// A traced field line: positions sampled at equally spaced λ values.
///
/// Sample `i` is the solution of `dp/dλ = Es(p)` at `λ_i`, starting from the
/// seed point at `λ_0 = 0`. The sample grid itself is owned by whoever ran
/// the trace (see `TraceResult::lambdas` in the workflows layer).
#[derive(Debug, Clone, PartialEq)]
pub struct Streamline {
    /// Index of the positive charge the line was seeded from.
    pub charge_index: usize,
    /// Index `f` of the seed on the charge's seed circle.
    pub seed_index: usize,
    /// Seed angle `θ_f` in radians.
    pub seed_angle: f64,
    samples: Vec<Point2<f64>>,
}

impl Streamline {
    pub fn new(
        charge_index: usize,
        seed_index: usize,
        seed_angle: f64,
        samples: Vec<Point2<f64>>,
    ) -> Self {
        Self {
            charge_index,
            seed_index,
            seed_angle,
            samples,
        }
    }

    pub fn samples(&self) -> &[Point2<f64>] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<Point2<f64>> {
        self.samples
    }

    /// The seed point (first sample), if any.
    pub fn start(&self) -> Option<&Point2<f64>> {
        self.samples.first()
    }

    pub fn end(&self) -> Option<&Point2<f64>> {
        self.samples.last()
    }

    /// Separate coordinate arrays, the shape most plotting layers expect.
    pub fn xy(&self) -> (Vec<f64>, Vec<f64>) {
        self.samples.iter().map(|p| (p.x, p.y)).unzip()
    }

    /// Total length of the sampled polyline.
    pub fn arc_length(&self) -> f64 {
        self.samples
            .windows(2)
            .map(|w| nalgebra::distance(&w[0], &w[1]))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
