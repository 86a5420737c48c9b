use crate::{StreetId, StreetSet};
use smallvec::SmallVec;

/// The route a single car drives through the network.
///
/// The first street is where the car starts; it is already at the end of that
/// street when the simulation begins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CarPath {
    streets: SmallVec<[StreetId; 8]>,
}

impl CarPath {
    /// Creates a path from the streets it visits, in order.
    pub fn new(streets: impl IntoIterator<Item = StreetId>) -> Self {
        Self {
            streets: streets.into_iter().collect(),
        }
    }

    /// The streets of the path, in order.
    pub fn streets(&self) -> &[StreetId] {
        &self.streets
    }

    /// The number of streets in the path.
    pub fn len(&self) -> usize {
        self.streets.len()
    }

    /// Returns true if the path visits no streets.
    pub fn is_empty(&self) -> bool {
        self.streets.is_empty()
    }

    /// Computes the time the car needs to reach the end of its path, in s.
    /// The starting street is not counted.
    pub(crate) fn deadline(&self, streets: &StreetSet) -> u64 {
        self.streets
            .iter()
            .skip(1)
            .map(|id| streets[*id].traversal_time() as u64)
            .sum()
    }
}
