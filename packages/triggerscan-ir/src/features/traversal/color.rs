//! Three-state visitation color

/// Visitation state of one statement during a traversal.
///
/// White = not yet entered, Grey = on the current path stack,
/// Black = fully processed. Statements are only entered while White; this
/// gate is what guarantees termination on arbitrary cycles and recursion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeColor {
    #[default]
    White,
    Grey,
    Black,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_white() {
        assert_eq!(NodeColor::default(), NodeColor::White);
    }
}
