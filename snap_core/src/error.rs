//! Error types.  Every error here is local and recoverable: the caller
//! reports it and carries on with the next frame.

use thiserror::Error;

/// A landmark list that cannot form a [`HandSample`](crate::HandSample).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LandmarkError {
    #[error("expected 21 landmarks, found {found}")]
    WrongCount { found: usize },

    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// A refused effect-state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EffectError {
    #[error("no hand silhouette captured yet; show a hand first")]
    NoSilhouette,

    #[error("dust effect already running")]
    AlreadyDusting,
}
