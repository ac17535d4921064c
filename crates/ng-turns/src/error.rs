use ng_core::ActorId;

/// Alias for `Result<T, TurnError>`.
pub type TurnResult<T> = Result<T, TurnError>;

/// Caller contract violations rejected by the turn sequencer. A rejected
/// call leaves the sequencer unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    /// The actor has no participant in this sequencer.
    #[error("actor {0} is not registered")]
    NotRegistered(ActorId),

    /// A turn call came from someone other than the active participant.
    #[error("actor {caller} acted out of turn")]
    NotActive {
        /// The actor that made the call.
        caller: ActorId,
        /// The actor whose turn it actually is, if any.
        active: Option<ActorId>,
    },

    /// The actor already has a participant in this sequencer.
    #[error("actor {0} is already registered")]
    AlreadyRegistered(ActorId),

    /// The participant is bound to a different sequencer.
    #[error("actor {0} belongs to another sequencer")]
    ForeignSequencer(ActorId),
}
