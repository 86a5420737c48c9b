use crate::StreetId;

/// A directed road segment between two intersections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Street {
    /// The street ID.
    id: StreetId,
    /// The intersection the street starts at.
    begin: u32,
    /// The intersection the street feeds into.
    end: u32,
    /// The name of the street, unique across the network.
    name: String,
    /// The time it takes a car to drive from one end to the other, in s.
    traversal_time: u32,
}

impl Street {
    /// Creates a new street.
    pub(crate) fn new(id: StreetId, begin: u32, end: u32, name: String, traversal_time: u32) -> Self {
        Self {
            id,
            begin,
            end,
            name,
            traversal_time,
        }
    }

    /// Gets the street's ID.
    pub fn id(&self) -> StreetId {
        self.id
    }

    /// Gets the ID of the intersection at the start of the street.
    pub fn begin(&self) -> u32 {
        self.begin
    }

    /// Gets the ID of the intersection whose light controls this street.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Gets the street's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the time needed to traverse the street, in s.
    pub fn traversal_time(&self) -> u32 {
        self.traversal_time
    }
}
