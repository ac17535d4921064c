//! Round-based turn sequencing.
//!
//! Each acting entity owns a [`TurnParticipant`] registered with one
//! [`TurnSequencer`]. The sequencer activates participants in roster order;
//! a participant ends its turn with [`TurnSequencer::end_turn`] or passes it
//! on with [`TurnSequencer::start_turn_next`]. When nobody eligible is left a
//! new round starts.

/// Sequencer configuration.
pub mod config;
/// Error types for turn calls.
pub mod error;
/// The turn history log.
pub mod event;
/// Per-actor turn state and observers.
pub mod participant;
/// The turn state machine.
pub mod sequencer;

/// Re-export of [`config::TurnConfig`].
pub use config::TurnConfig;
/// Re-export error types.
pub use error::{TurnError, TurnResult};
/// Re-export event log types.
pub use event::{TurnEvent, TurnEventKind, TurnLog};
/// Re-export participant types.
pub use participant::{SubscriptionId, TurnParticipant};
/// Re-export sequencer types.
pub use sequencer::{SequencerId, TurnSequencer};
