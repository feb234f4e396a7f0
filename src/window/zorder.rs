use crate::constants::INITIAL_Z_INDEX;

/// Monotonic pool of stacking values.
///
/// The maximum only ever grows. Higher values are drawn later and therefore
/// appear on top; overlays are drawn above whatever the current maximum is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZOrder {
    max: u64,
}

impl Default for ZOrder {
    fn default() -> Self {
        Self {
            max: INITIAL_Z_INDEX,
        }
    }
}

impl ZOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    /// Mint a value strictly above every value handed out so far.
    pub fn next(&mut self) -> u64 {
        self.max += 1;
        self.max
    }

    /// Return the value a window at `current` should take to be frontmost.
    ///
    /// A window already at the maximum keeps its value, so raising the front
    /// window repeatedly never grows the pool.
    pub fn raise(&mut self, current: u64) -> u64 {
        if current == self.max {
            current
        } else {
            self.next()
        }
    }
}
