use thiserror::Error;

use crate::{sequence_greater_than, sequence_less_than, wrapping_diff};

/// Largest window a `SequenceBuffer` may cover. Anything wider would make
/// "older than the window" ambiguous on a 16-bit ring.
pub const MAX_SEQUENCE_BUFFER_SIZE: usize = 32768;

/// Errors that can occur while creating a SequenceBuffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceBufferError {
    /// Requested window size is zero or too wide for 16-bit sequence numbers
    #[error("SequenceBuffer size {size} is invalid, it must be between 1 and {max}")]
    InvalidSize { size: usize, max: usize },
}

/// Fixed-size window of entries keyed by wrapping sequence number.
///
/// Each slot remembers the sequence it was written for, so a lookup only
/// succeeds for the exact sequence. Inserting a sequence newer than anything
/// seen so far slides the window forward and clears every slot it passes over;
/// inserting one older than the window is refused.
pub struct SequenceBuffer<T> {
    sequence: u16,
    // until the first insert, any sequence may start the window
    started: bool,
    entries: Vec<Option<(u16, T)>>,
}

impl<T> SequenceBuffer<T> {
    /// # Panics
    ///
    /// Panics if `size` is 0 or above [`MAX_SEQUENCE_BUFFER_SIZE`]
    pub fn new(size: usize) -> Self {
        match Self::try_new(size) {
            Ok(buffer) => buffer,
            Err(error) => panic!("{}", error),
        }
    }

    pub fn try_new(size: usize) -> Result<Self, SequenceBufferError> {
        if size == 0 || size > MAX_SEQUENCE_BUFFER_SIZE {
            return Err(SequenceBufferError::InvalidSize {
                size,
                max: MAX_SEQUENCE_BUFFER_SIZE,
            });
        }

        let mut entries = Vec::with_capacity(size);
        entries.resize_with(size, || None);

        Ok(Self {
            sequence: 0,
            started: false,
            entries,
        })
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// One past the most recent sequence inserted
    pub fn sequence(&self) -> u16 {
        self.sequence
    }

    pub fn reset(&mut self) {
        self.sequence = 0;
        self.started = false;
        for entry in self.entries.iter_mut() {
            *entry = None;
        }
    }

    /// Whether `sequence` has already slid out of the window
    pub fn is_too_old(&self, sequence: u16) -> bool {
        self.started && sequence_less_than(sequence, self.oldest())
    }

    /// Stores `value` for `sequence`, replacing anything held for it before.
    /// Returns `None` without storing when `sequence` is older than the window.
    pub fn insert(&mut self, sequence: u16, value: T) -> Option<&mut T> {
        if self.is_too_old(sequence) {
            return None;
        }

        let next = sequence.wrapping_add(1);
        if !self.started {
            self.started = true;
            self.sequence = next;
        } else if sequence_greater_than(next, self.sequence) {
            self.clear_range(self.sequence, sequence);
            self.sequence = next;
        }

        let index = self.index(sequence);
        let entry = &mut self.entries[index];
        *entry = Some((sequence, value));
        entry.as_mut().map(|(_, value)| value)
    }

    pub fn exists(&self, sequence: u16) -> bool {
        self.get(sequence).is_some()
    }

    pub fn get(&self, sequence: u16) -> Option<&T> {
        match &self.entries[self.index(sequence)] {
            Some((stored, value)) if *stored == sequence => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, sequence: u16) -> Option<&mut T> {
        let index = self.index(sequence);
        match &mut self.entries[index] {
            Some((stored, value)) if *stored == sequence => Some(value),
            _ => None,
        }
    }

    pub fn remove(&mut self, sequence: u16) -> Option<T> {
        let index = self.index(sequence);
        let entry = &mut self.entries[index];
        if matches!(entry, Some((stored, _)) if *stored == sequence) {
            return entry.take().map(|(_, value)| value);
        }
        None
    }

    fn index(&self, sequence: u16) -> usize {
        usize::from(sequence) % self.entries.len()
    }

    fn oldest(&self) -> u16 {
        // size never exceeds 32768, so this fits
        self.sequence.wrapping_sub(self.entries.len() as u16)
    }

    // clears slots for every sequence from `start` through `end` inclusive
    fn clear_range(&mut self, start: u16, end: u16) {
        let count = i32::from(wrapping_diff(start, end)) + 1;
        if count <= 0 {
            return;
        }

        let count = count as usize;
        if count >= self.entries.len() {
            for entry in self.entries.iter_mut() {
                *entry = None;
            }
            return;
        }

        for offset in 0..count {
            let index = self.index(start.wrapping_add(offset as u16));
            self.entries[index] = None;
        }
    }
}
