//! Error taxonomy for graph construction and resizing.
//!
//! Errors are reported synchronously from the control thread via return
//! codes. Real-time `process()` paths never raise — they degrade silently
//! (an unready proc writes silence, an unready container no-ops, a
//! mismatched tap write is skipped).

use core::fmt;

/// Errors that can occur during graph mutation, resizing, or transport setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcError {
    /// Allocation failed while resizing a proc or packing the buffer pool.
    ///
    /// Fatal to that proc or graph until retried with a smaller size; the
    /// previous buffers are left intact.
    Memory,
    /// A proc name or published alias is already taken in this container.
    ///
    /// Recoverable — the graph is left unmodified.
    NameInUse,
    /// A path, proc class, port, or parameter name could not be resolved.
    ///
    /// Recoverable — the graph is left unmodified.
    NotFound,
    /// A change queue is saturated; the update was dropped.
    QueueFull,
    /// A frame-size or block-rate mismatch between producer and consumer.
    SizeMismatch,
}

impl fmt::Display for ProcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "allocation failed"),
            Self::NameInUse => write!(f, "name already in use"),
            Self::NotFound => write!(f, "name not found"),
            Self::QueueFull => write!(f, "change queue full"),
            Self::SizeMismatch => write!(f, "frame size mismatch"),
        }
    }
}

impl std::error::Error for ProcError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(ProcError::Memory.to_string(), "allocation failed");
        assert_eq!(ProcError::NameInUse.to_string(), "name already in use");
        assert_eq!(ProcError::NotFound.to_string(), "name not found");
        assert_eq!(ProcError::QueueFull.to_string(), "change queue full");
        assert_eq!(ProcError::SizeMismatch.to_string(), "frame size mismatch");
    }
}
