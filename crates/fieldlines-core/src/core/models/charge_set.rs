use super::charge::Charge;
use nalgebra::Point2;
use tracing::trace;

/// An ordered, mutable collection of point charges in the xy-plane.
///
/// Charges are identified by their position in the collection. Deleting the
/// charge at index `k` shifts every charge after it down by one, so callers
/// holding indices from an earlier [`ChargeSet::closest`] lookup must treat
/// them as stale after a deletion. Operations on out-of-range indices are
/// silently ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChargeSet {
    /// Primary storage; the vector index is the charge's identity.
    charges: Vec<Charge>,
}

impl ChargeSet {
    /// Creates a new, empty charge set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the demonstration configuration used at startup.
    ///
    /// Two positive unit charges at `(±1, 0)` and two negative unit charges
    /// at `(0, ±1)`.
    pub fn demo() -> Self {
        let mut set = Self::new();
        set.add(1.0, Point2::new(1.0, 0.0));
        set.add(1.0, Point2::new(-1.0, 0.0));
        set.add(-1.0, Point2::new(0.0, 1.0));
        set.add(-1.0, Point2::new(0.0, -1.0));
        set
    }

    /// Appends a charge of the given magnitude at `position`.
    ///
    /// No validation is performed on `magnitude`; a zero-magnitude charge is
    /// stored like any other. The new charge receives index `len()` as it was
    /// before the call.
    pub fn add(&mut self, magnitude: f64, position: Point2<f64>) {
        self.charges.push(Charge::new(magnitude, position));
        trace!(index = self.charges.len() - 1, magnitude, "Charge added.");
    }

    /// Removes the charge at `index`.
    ///
    /// Does nothing if `index` is out of range. All charges after `index`
    /// move down by one position.
    ///
    /// # Return
    ///
    /// Returns the removed charge, or `None` if the index was out of range.
    pub fn delete(&mut self, index: usize) -> Option<Charge> {
        if index < self.charges.len() {
            let removed = self.charges.remove(index);
            trace!(index, "Charge deleted.");
            Some(removed)
        } else {
            trace!(index, len = self.charges.len(), "Ignoring delete of out-of-range charge.");
            None
        }
    }

    /// Moves the charge at `index` to `position`, keeping its magnitude.
    ///
    /// Does nothing if `index` is out of range.
    pub fn set_position(&mut self, index: usize, position: Point2<f64>) {
        match self.charges.get_mut(index) {
            Some(charge) => charge.position = position,
            None => trace!(index, "Ignoring move of out-of-range charge."),
        }
    }

    /// Returns an owned snapshot of `(magnitude, position)` pairs in index order.
    ///
    /// The snapshot is detached from the set; modifying it has no effect here.
    pub fn list(&self) -> Vec<(f64, Point2<f64>)> {
        self.charges.iter().map(|&c| c.into()).collect()
    }

    /// Finds the charge nearest to `position`.
    ///
    /// # Arguments
    ///
    /// * `position` - The query point.
    /// * `limit` - Maximum accepted distance (inclusive).
    ///
    /// # Return
    ///
    /// Returns the index of the nearest charge if it lies within `limit`,
    /// otherwise `None`. An empty set always yields `None`. Among equidistant
    /// charges the lowest index wins.
    pub fn closest(&self, position: &Point2<f64>, limit: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, charge) in self.charges.iter().enumerate() {
            let dist = charge.distance_to(position);
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((index, dist)),
            }
        }
        best.filter(|&(_, dist)| dist <= limit)
            .map(|(index, _)| index)
    }

    pub fn get(&self, index: usize) -> Option<&Charge> {
        self.charges.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Charge> {
        self.charges.iter()
    }

    /// Iterates over `(index, charge)` pairs of the strictly positive charges.
    pub fn positive(&self) -> impl Iterator<Item = (usize, &Charge)> {
        self.charges
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_positive())
    }

    pub fn as_slice(&self) -> &[Charge] {
        &self.charges
    }

    pub fn len(&self) -> usize {
        self.charges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charges.is_empty()
    }
}

impl FromIterator<Charge> for ChargeSet {
    fn from_iter<I: IntoIterator<Item = Charge>>(iter: I) -> Self {
        Self {
            charges: iter.into_iter().collect(),
        }
    }
}

impl Extend<Charge> for ChargeSet {
    fn extend<I: IntoIterator<Item = Charge>>(&mut self, iter: I) {
        self.charges.extend(iter);
    }
}
