//! Playback state shared by the animator and its loop.

use crate::sets::FrameSequence;

/// The sequence being shown and where playback is.
///
/// `generation` changes on every start and stop. A tick carries the generation
/// of the loop that produced it, and ticks from an older generation are ignored.
#[derive(Debug, Clone, Default)]
pub struct AnimationState {
    pub sequence: FrameSequence,
    pub cursor: usize,
    pub running: bool,
    pub generation: u64,
}

impl AnimationState {
    /// Enters the running phase at cursor 0 and returns the new generation.
    pub fn begin(&mut self) -> u64 {
        self.cursor = 0;
        self.running = true;
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    pub fn halt(&mut self) {
        self.running = false;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Installs `sequence` and rewinds to its first frame.
    pub fn install(&mut self, sequence: FrameSequence) {
        self.sequence = sequence;
        self.cursor = 0;
    }

    /// Moves to the next frame for a tick of `generation`.
    ///
    /// Returns the sequence and the index to publish, or `None` when the tick is
    /// stale, playback is stopped, or there is nothing to show.
    pub fn advance(&mut self, generation: u64) -> Option<(FrameSequence, usize)> {
        if !self.running || generation != self.generation {
            return None;
        }

        let len = self.sequence.len();
        if len == 0 {
            return None;
        }

        self.cursor = (self.cursor + 1) % len;
        Some((self.sequence.clone(), self.cursor))
    }
}

#[cfg(test)]
mod tests {
    use image::RgbaImage;

    use super::*;

    fn sequence(len: usize) -> FrameSequence {
        FrameSequence::new((0..len).map(|_| RgbaImage::new(1, 1)).collect())
    }

    #[test]
    fn test_advance_wraps_around() {
        let mut state = AnimationState::default();
        state.install(sequence(3));
        let generation = state.begin();

        let cursors: Vec<usize> =
            (0..5).filter_map(|_| state.advance(generation)).map(|(_, index)| index).collect();

        assert_eq!(cursors, vec![1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_advance_ignores_stale_generation() {
        let mut state = AnimationState::default();
        state.install(sequence(3));
        let old = state.begin();
        let current = state.begin();

        assert!(state.advance(old).is_none());
        assert_eq!(state.cursor, 0);
        assert!(state.advance(current).is_some());
    }

    #[test]
    fn test_advance_on_empty_sequence_keeps_running() {
        let mut state = AnimationState::default();
        let generation = state.begin();

        assert!(state.advance(generation).is_none());
        assert!(state.running);
    }

    #[test]
    fn test_halt_drops_pending_ticks() {
        let mut state = AnimationState::default();
        state.install(sequence(2));
        let generation = state.begin();
        state.halt();

        assert!(!state.running);
        assert!(state.advance(generation).is_none());
    }

    #[test]
    fn test_install_rewinds() {
        let mut state = AnimationState::default();
        state.install(sequence(4));
        let generation = state.begin();
        state.advance(generation);
        state.advance(generation);

        state.install(sequence(2));
        assert_eq!(state.cursor, 0);
        assert!(state.running);
    }
}
