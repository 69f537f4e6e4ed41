//! Temporal detection memory.
//!
//! Keeps the raw candidate lists of the last N frames. Each update returns
//! the candidates of the whole window so a face that persists over several
//! frames accumulates confidence during clustering, while a one-frame flicker
//! stays weak.

use std::collections::VecDeque;

use facecap_models::FaceDetection;

/// Bounded ring of per-frame candidate lists.
#[derive(Debug, Clone)]
pub struct DetectionMemory {
    /// Window size in frames.
    capacity: usize,
    /// Candidate lists, oldest first.
    frames: VecDeque<Vec<FaceDetection>>,
}

impl DetectionMemory {
    /// Create a memory spanning `capacity` frames (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            frames: VecDeque::with_capacity(capacity),
        }
    }

    /// Record this frame's candidates and return every candidate in the
    /// window, oldest frame first.
    pub fn update(&mut self, candidates: Vec<FaceDetection>) -> Vec<FaceDetection> {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(candidates);

        self.frames.iter().flatten().copied().collect()
    }

    /// Forget all remembered frames.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Window size in frames.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Frames currently remembered.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
