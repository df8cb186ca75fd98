/// Topological location relative to the polygon being split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Location {
    Boundary,
    Interior,
    Exterior,
}

/// `(on, left, right)` classification of a graph edge.
///
/// Labels are fixed when the edge is created and record which source
/// produced it: the shell, a hole, or the splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label {
    pub on: Location,
    pub left: Location,
    pub right: Location,
}

impl Label {
    /// Shell boundary parts.
    pub const SHELL: Self = Self::new(Location::Exterior, Location::Interior);
    /// Hole boundary parts.
    pub const HOLE: Self = Self::new(Location::Interior, Location::Exterior);
    /// Splitter parts inside the polygon.
    pub const SPLITTER: Self = Self::new(Location::Interior, Location::Interior);

    #[must_use]
    pub const fn new(left: Location, right: Location) -> Self {
        Self {
            on: Location::Boundary,
            left,
            right,
        }
    }

    #[must_use]
    pub fn is_shell(self) -> bool {
        self == Self::SHELL
    }

    #[must_use]
    pub fn is_hole(self) -> bool {
        self == Self::HOLE
    }

    /// Interior on both sides: a splitter part.
    #[must_use]
    pub fn is_interior(self) -> bool {
        self.left == Location::Interior && self.right == Location::Interior
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_distinct() {
        assert!(Label::SHELL.is_shell());
        assert!(!Label::SHELL.is_hole());
        assert!(Label::HOLE.is_hole());
        assert!(!Label::HOLE.is_interior());
        assert!(Label::SPLITTER.is_interior());
        assert!(!Label::SPLITTER.is_shell());
        assert_eq!(Label::SPLITTER.on, Location::Boundary);
    }
}
