use std::fmt;

use ng_core::ActorId;

/// What happened in the turn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEventKind {
    /// A new round began.
    RoundStarted,
    /// An actor became active.
    TurnStarted(ActorId),
    /// An actor's turn-end notification fired.
    TurnEnded(ActorId),
    /// The active actor passed the turn on without forfeiting its round.
    Yielded(ActorId),
    /// An actor entered the roster.
    Joined(ActorId),
    /// An actor left the roster.
    Left(ActorId),
}

impl TurnEventKind {
    /// The actor this event is about, if any.
    pub fn actor(&self) -> Option<ActorId> {
        match self {
            Self::RoundStarted => None,
            Self::TurnStarted(id)
            | Self::TurnEnded(id)
            | Self::Yielded(id)
            | Self::Joined(id)
            | Self::Left(id) => Some(*id),
        }
    }
}

impl fmt::Display for TurnEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundStarted => write!(f, "round started"),
            Self::TurnStarted(id) => write!(f, "{id} turn started"),
            Self::TurnEnded(id) => write!(f, "{id} turn ended"),
            Self::Yielded(id) => write!(f, "{id} yielded"),
            Self::Joined(id) => write!(f, "{id} joined"),
            Self::Left(id) => write!(f, "{id} left"),
        }
    }
}

/// A record of one turn-order change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnEvent {
    /// Round number when the event occurred.
    pub round: u32,
    /// What happened.
    pub kind: TurnEventKind,
}

/// Bounded history of turn-order changes.
#[derive(Debug, Default)]
pub struct TurnLog {
    events: Vec<TurnEvent>,
    max_events: usize,
}

impl TurnLog {
    /// Create a log holding at most `max_events` events (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest ones past capacity.
    pub fn push(&mut self, round: u32, kind: TurnEventKind) {
        self.events.push(TurnEvent { round, kind });
        if self.max_events > 0 && self.events.len() > self.max_events {
            let excess = self.events.len() - self.max_events;
            self.events.drain(..excess);
        }
    }

    /// All retained events, oldest first.
    pub fn events(&self) -> &[TurnEvent] {
        &self.events
    }

    /// Events recorded during `round`.
    pub fn events_in_round(&self, round: u32) -> Vec<&TurnEvent> {
        self.events.iter().filter(|e| e.round == round).collect()
    }

    /// Events about `actor`.
    pub fn events_for_actor(&self, actor: ActorId) -> Vec<&TurnEvent> {
        self.events
            .iter()
            .filter(|e| e.kind.actor() == Some(actor))
            .collect()
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop every event.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
