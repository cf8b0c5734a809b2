//! The style stack.
//!
//! One frame per element on the current path from the root. A traversal
//! pushes when it enters an element and pops when it leaves; [`StyleGuard`]
//! ties the pop to scope exit so an early `?` return cannot leave the stack
//! unbalanced.
//!
//! The stack is an ordinary value owned by one layout pass and threaded
//! through the recursion as `&mut StyleStack`.

use std::ops::{Deref, DerefMut};

use super::frame::StyleFrame;

/// A push/pop stack of inherited style frames.
#[derive(Debug, Default)]
pub struct StyleStack {
    frames: Vec<StyleFrame>,
    pushes: usize,
    pops: usize,
}

impl StyleStack {
    /// An empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a child of the current top (or a zero frame on an empty stack).
    ///
    /// The frame is popped when the returned guard is dropped.
    pub fn push(&mut self) -> StyleGuard<'_> {
        let frame = self
            .frames
            .last()
            .map_or_else(StyleFrame::default, StyleFrame::inherit);
        self.push_frame(frame)
    }

    /// Push an explicit frame, e.g. the document base frame.
    pub fn push_frame(&mut self, frame: StyleFrame) -> StyleGuard<'_> {
        self.frames.push(frame);
        self.pushes += 1;
        let index = self.frames.len() - 1;
        StyleGuard { stack: self, index }
    }

    /// The innermost frame, if any.
    #[must_use]
    pub fn top(&self) -> Option<&StyleFrame> {
        self.frames.last()
    }

    /// Number of frames currently on the stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// True when no frame is pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Total pushes since creation.
    #[must_use]
    pub const fn pushes(&self) -> usize {
        self.pushes
    }

    /// Total pops since creation.
    #[must_use]
    pub const fn pops(&self) -> usize {
        self.pops
    }

    fn pop(&mut self) {
        if self.frames.pop().is_some() {
            self.pops += 1;
        }
    }
}

/// Scoped ownership of one pushed frame.
///
/// Dereferences to the whole stack so that recursive calls can push
/// children through the guard.
#[derive(Debug)]
pub struct StyleGuard<'a> {
    stack: &'a mut StyleStack,
    index: usize,
}

impl StyleGuard<'_> {
    /// The frame this guard pushed.
    #[must_use]
    pub fn frame(&self) -> &StyleFrame {
        &self.stack.frames[self.index]
    }

    /// Mutable access to the frame this guard pushed.
    pub fn frame_mut(&mut self) -> &mut StyleFrame {
        &mut self.stack.frames[self.index]
    }

    /// The frame directly below this one.
    #[must_use]
    pub fn parent(&self) -> Option<&StyleFrame> {
        self.index
            .checked_sub(1)
            .and_then(|i| self.stack.frames.get(i))
    }

    /// Mutable access to the frame directly below this one.
    pub fn parent_mut(&mut self) -> Option<&mut StyleFrame> {
        self.index
            .checked_sub(1)
            .and_then(|i| self.stack.frames.get_mut(i))
    }
}

impl Deref for StyleGuard<'_> {
    type Target = StyleStack;

    fn deref(&self) -> &StyleStack {
        self.stack
    }
}

impl DerefMut for StyleGuard<'_> {
    fn deref_mut(&mut self) -> &mut StyleStack {
        self.stack
    }
}

impl Drop for StyleGuard<'_> {
    fn drop(&mut self) {
        self.stack.pop();
    }
}
