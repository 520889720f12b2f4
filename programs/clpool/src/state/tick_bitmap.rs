//! Tick Bitmap
//!
//! Packed index of initialized ticks. Each compressed tick
//! (tick / spacing) maps to one bit; 256 bits share a word keyed by
//! the compressed tick's upper bits.

use std::collections::HashMap;

use crate::errors::{PoolError, RangeError, Result};
use crate::math::bit_math::{is_bit_set, next_bit_position, prev_bit_position, toggle_bit};
use crate::math::u256::U256;

/// Word position and bit position of a compressed tick
#[inline]
pub fn position(compressed: i32) -> (i16, u8) {
    ((compressed >> 8) as i16, compressed.rem_euclid(256) as u8)
}

/// Compress a tick by the spacing, rounding toward negative infinity
#[inline]
fn compress(tick: i32, tick_spacing: i32) -> i32 {
    let compressed = tick / tick_spacing;
    if tick < 0 && tick % tick_spacing != 0 {
        compressed - 1
    } else {
        compressed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickBitmap {
    words: HashMap<i16, U256>,
}

impl TickBitmap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The 256-bit word at a word position, zero if never set
    pub fn word(&self, word_pos: i16) -> U256 {
        self.words.get(&word_pos).copied().unwrap_or_default()
    }

    pub fn is_initialized(&self, tick: i32, tick_spacing: i32) -> bool {
        if tick % tick_spacing != 0 {
            return false;
        }
        let (word_pos, bit_pos) = position(tick / tick_spacing);
        is_bit_set(self.word(word_pos), bit_pos)
    }

    /// Flip the initialized state of a tick
    ///
    /// # Errors
    /// `InvalidRange` if the tick is not a multiple of the spacing
    pub fn flip_tick(&mut self, tick: i32, tick_spacing: i32) -> Result<()> {
        if tick % tick_spacing != 0 {
            return Err(PoolError::range(RangeError::NotOnSpacing));
        }
        let (word_pos, bit_pos) = position(tick / tick_spacing);
        let word = toggle_bit(self.word(word_pos), bit_pos);
        if word.is_zero() {
            self.words.remove(&word_pos);
        } else {
            self.words.insert(word_pos, word);
        }
        Ok(())
    }

    /// Next initialized tick contained in the same word as `tick`
    ///
    /// Searches to the left (at or below `tick`) when `lte` is true,
    /// otherwise strictly to the right. When nothing is initialized in the
    /// word, returns the word boundary in the search direction with
    /// `initialized = false`. The result may lie outside the tick bounds;
    /// callers clamp it.
    pub fn next_initialized_tick_within_one_word(
        &self,
        tick: i32,
        tick_spacing: i32,
        lte: bool,
    ) -> (i32, bool) {
        let compressed = compress(tick, tick_spacing);

        if lte {
            let (word_pos, bit_pos) = position(compressed);
            match prev_bit_position(self.word(word_pos), bit_pos) {
                Some(msb) => (
                    (compressed - (bit_pos - msb) as i32) * tick_spacing,
                    true,
                ),
                None => ((compressed - bit_pos as i32) * tick_spacing, false),
            }
        } else {
            // start from the next tick since the current one is already crossed
            let (word_pos, bit_pos) = position(compressed + 1);
            match next_bit_position(self.word(word_pos), bit_pos) {
                Some(lsb) => (
                    (compressed + 1 + (lsb - bit_pos) as i32) * tick_spacing,
                    true,
                ),
                None => (
                    (compressed + 1 + (u8::MAX - bit_pos) as i32) * tick_spacing,
                    false,
                ),
            }
        }
    }
}
