//! Enclosing-block tracking for context-sensitive rewrites.

/// Kind of block a statement sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeFrame {
    Module,
    Function,
    Loop,
}

/// Stack of enclosing blocks, innermost last.
///
/// Threaded through the traversal by the engine; pushes and pops must be
/// strictly balanced around the walk of a body.
#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<ScopeFrame>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self, frame: ScopeFrame) {
        tracing::trace!(?frame, depth = self.frames.len() + 1, "enter scope");
        self.frames.push(frame);
    }

    pub fn exit(&mut self) {
        let popped = self.frames.pop();
        debug_assert!(popped.is_some(), "scope stack underflow");
        tracing::trace!(frame = ?popped, depth = self.frames.len(), "exit scope");
    }

    /// Innermost frame, or `None` outside any block.
    pub fn current(&self) -> Option<ScopeFrame> {
        self.frames.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Run `f` with `frame` pushed. The frame is popped once `f` returns,
    /// whether or not it returned an error.
    pub fn within<T>(&mut self, frame: ScopeFrame, f: impl FnOnce(&mut Self) -> T) -> T {
        self.enter(frame);
        let result = f(self);
        self.exit();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stack_has_no_current() {
        let scope = ScopeStack::new();
        assert_eq!(scope.current(), None);
        assert!(scope.is_empty());
    }

    #[test]
    fn test_innermost_frame_wins() {
        let mut scope = ScopeStack::new();
        scope.enter(ScopeFrame::Module);
        scope.enter(ScopeFrame::Function);
        scope.enter(ScopeFrame::Loop);
        assert_eq!(scope.current(), Some(ScopeFrame::Loop));
        scope.exit();
        assert_eq!(scope.current(), Some(ScopeFrame::Function));
        scope.exit();
        scope.exit();
        assert!(scope.is_empty());
    }

    #[test]
    fn test_within_pops_on_error() {
        let mut scope = ScopeStack::new();
        let result: Result<(), &str> = scope.within(ScopeFrame::Function, |inner| {
            assert_eq!(inner.current(), Some(ScopeFrame::Function));
            Err("boom")
        });
        assert!(result.is_err());
        assert_eq!(scope.depth(), 0);
    }
}
