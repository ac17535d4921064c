use std::fmt;

use ng_core::ActorId;

use crate::sequencer::SequencerId;

/// Handle returned by the `on_*` methods, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(ActorId)>;

#[derive(Default)]
struct Observers {
    entries: Vec<(SubscriptionId, Observer)>,
}

impl Observers {
    fn fire(&mut self, owner: ActorId) {
        for (_, observer) in &mut self.entries {
            observer(owner);
        }
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(sub, _)| *sub != id);
        self.entries.len() != before
    }
}

/// Per-actor turn state and its lifecycle notifications.
///
/// Observers are invoked synchronously in registration order and receive
/// the owning actor's ID.
pub struct TurnParticipant {
    owner: ActorId,
    can_still_act_this_round: bool,
    sequencer: Option<SequencerId>,
    next_subscription: u64,
    on_turn_start: Observers,
    on_turn_end: Observers,
    on_round_start: Observers,
}

impl TurnParticipant {
    /// Create a participant for `owner`, free to act this round.
    pub fn new(owner: ActorId) -> Self {
        Self {
            owner,
            can_still_act_this_round: true,
            sequencer: None,
            next_subscription: 0,
            on_turn_start: Observers::default(),
            on_turn_end: Observers::default(),
            on_round_start: Observers::default(),
        }
    }

    /// The actor this participant represents.
    pub fn owner(&self) -> ActorId {
        self.owner
    }

    /// Whether the participant may still become active this round.
    pub fn can_still_act_this_round(&self) -> bool {
        self.can_still_act_this_round
    }

    pub(crate) fn set_can_still_act(&mut self, value: bool) {
        self.can_still_act_this_round = value;
    }

    /// The sequencer coordinating this participant, if any.
    pub fn sequencer(&self) -> Option<SequencerId> {
        self.sequencer
    }

    pub(crate) fn set_sequencer(&mut self, sequencer: Option<SequencerId>) {
        self.sequencer = sequencer;
    }

    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    fn next_id(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        id
    }

    /// Observe the start of this participant's turns.
    pub fn on_turn_start(&mut self, observer: impl FnMut(ActorId) + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.on_turn_start.entries.push((id, Box::new(observer)));
        id
    }

    /// Observe the end of this participant's turns.
    pub fn on_turn_end(&mut self, observer: impl FnMut(ActorId) + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.on_turn_end.entries.push((id, Box::new(observer)));
        id
    }

    /// Observe the start of every round.
    pub fn on_round_start(&mut self, observer: impl FnMut(ActorId) + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.on_round_start.entries.push((id, Box::new(observer)));
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.on_turn_start.remove(id) || self.on_turn_end.remove(id) || self.on_round_start.remove(id)
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    /// Fire turn-start.
    pub fn turn_start(&mut self) {
        self.on_turn_start.fire(self.owner);
    }

    /// Fire turn-end. Does not advance any sequencer.
    pub fn turn_end(&mut self) {
        self.on_turn_end.fire(self.owner);
    }

    /// Allow acting again and fire round-start.
    pub fn round_start(&mut self) {
        self.can_still_act_this_round = true;
        self.on_round_start.fire(self.owner);
    }
}

impl fmt::Debug for TurnParticipant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurnParticipant")
            .field("owner", &self.owner)
            .field("can_still_act_this_round", &self.can_still_act_this_round)
            .field("sequencer", &self.sequencer)
            .field("turn_start_observers", &self.on_turn_start.entries.len())
            .field("turn_end_observers", &self.on_turn_end.entries.len())
            .field("round_start_observers", &self.on_round_start.entries.len())
            .finish()
    }
}
