//! Arrowhead identities

/// Arrowhead type drawn at a dimension line end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrowType {
    /// Solid closed arrowhead
    #[default]
    ClosedFilled,
    /// Outlined closed arrowhead
    ClosedBlank,
    /// Open arrowhead
    Open,
    /// Filled dot
    Dot,
    /// Small dot
    DotSmall,
    /// Open dot
    DotBlank,
    /// Origin indicator (small circle)
    Origin,
    /// Right-angle bracket
    RightAngle,
    /// Oblique stroke
    Oblique,
    /// Architectural tick
    ArchitecturalTick,
    /// No arrowhead
    None,
}

impl ArrowType {
    /// Tick-style arrowheads let the dimension line run past the extension
    /// lines instead of stopping at the arrow base.
    pub fn is_tick(&self) -> bool {
        matches!(self, ArrowType::Oblique | ArrowType::ArchitecturalTick)
    }

    /// Whether the arrowhead consumes dimension-line length when testing
    /// what fits between the extension lines.
    pub fn occupies_span(&self) -> bool {
        !matches!(self, ArrowType::None) && !self.is_tick()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_classification() {
        assert!(ArrowType::Oblique.is_tick());
        assert!(ArrowType::ArchitecturalTick.is_tick());
        assert!(!ArrowType::ClosedFilled.is_tick());
    }

    #[test]
    fn test_span_occupancy() {
        assert!(ArrowType::ClosedFilled.occupies_span());
        assert!(!ArrowType::None.occupies_span());
        assert!(!ArrowType::ArchitecturalTick.occupies_span());
    }
}
