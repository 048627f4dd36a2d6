//! Cursor over a mutable ordered sequence.
//!
//! The browser removes and inserts records while paging through the
//! collection, so the position arithmetic lives here with fixed semantics
//! instead of being scattered through the UI loop: stepping wraps around
//! both ends, and after a removal the cursor stays in place unless it now
//! points past the end, in which case it wraps to the start.

/// 0-based position into a sequence whose length may change between steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pos: usize,
}

impl Cursor {
    /// A cursor at the first element.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position.
    pub fn index(&self) -> usize {
        self.pos
    }

    /// Step forward, wrapping to the start past the last element.
    pub fn advance(&mut self, len: usize) {
        if len == 0 {
            self.pos = 0;
        } else {
            self.pos = (self.pos + 1) % len;
        }
    }

    /// Step backward, wrapping to the last element before the first.
    pub fn retreat(&mut self, len: usize) {
        if len == 0 {
            self.pos = 0;
        } else if self.pos == 0 {
            self.pos = len - 1;
        } else {
            self.pos -= 1;
        }
    }

    /// Re-anchor after the sequence shrank: keep the position while it is
    /// still valid, wrap to the start otherwise.
    pub fn rebase(&mut self, len: usize) {
        if self.pos >= len {
            self.pos = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_wraps_past_end() {
        let mut cursor = Cursor::new();

        cursor.advance(3);
        assert_eq!(cursor.index(), 1);
        cursor.advance(3);
        assert_eq!(cursor.index(), 2);
        cursor.advance(3);
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn test_retreat_wraps_to_last() {
        let mut cursor = Cursor::new();

        cursor.retreat(3);
        assert_eq!(cursor.index(), 2);
        cursor.retreat(3);
        assert_eq!(cursor.index(), 1);
    }

    #[test]
    fn test_rebase_after_removal() {
        let mut cursor = Cursor::new();
        cursor.advance(3);
        cursor.advance(3);
        assert_eq!(cursor.index(), 2);

        // Removing the last element leaves the cursor past the end.
        cursor.rebase(2);
        assert_eq!(cursor.index(), 0);

        // Removing elsewhere keeps the position.
        cursor.rebase(2);
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn test_empty_sequence_pins_to_zero() {
        let mut cursor = Cursor::new();

        cursor.advance(0);
        assert_eq!(cursor.index(), 0);
        cursor.retreat(0);
        assert_eq!(cursor.index(), 0);
        cursor.rebase(0);
        assert_eq!(cursor.index(), 0);
    }
}
