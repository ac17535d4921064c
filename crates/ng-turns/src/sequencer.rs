use std::fmt;

use ng_core::ActorId;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::TurnConfig;
use crate::error::{TurnError, TurnResult};
use crate::event::{TurnEventKind, TurnLog};
use crate::participant::TurnParticipant;

/// Unique identifier for a turn sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SequencerId(pub Uuid);

impl SequencerId {
    /// Generate a new random sequencer ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SequencerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SequencerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Activates participants one at a time in roster order and rolls rounds
/// over once nobody eligible is left.
///
/// Roster changes wait for the next round boundary, except that a
/// participant leaving during its own turn is removed at once and the turn
/// passes on. A participant leaving during someone else's turn can no
/// longer be activated but stays in the roster until the boundary.
#[derive(Debug)]
pub struct TurnSequencer {
    id: SequencerId,
    roster: Vec<TurnParticipant>,
    active: Option<usize>,
    round: u32,
    started: bool,
    pending_joins: Vec<TurnParticipant>,
    pending_leaves: Vec<ActorId>,
    departed: Vec<TurnParticipant>,
    log: TurnLog,
}

impl Default for TurnSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnSequencer {
    /// Create an empty, unstarted sequencer.
    pub fn new() -> Self {
        Self::with_config(TurnConfig::default())
    }

    /// Create a sequencer with the given configuration.
    pub fn with_config(config: TurnConfig) -> Self {
        Self {
            id: SequencerId::new(),
            roster: Vec::new(),
            active: None,
            round: 0,
            started: false,
            pending_joins: Vec::new(),
            pending_leaves: Vec::new(),
            departed: Vec::new(),
            log: TurnLog::new(config.max_events),
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// This sequencer's ID.
    pub fn id(&self) -> SequencerId {
        self.id
    }

    /// The current round number (0 before the first round).
    pub fn round_number(&self) -> u32 {
        self.round
    }

    /// Whether `start` has been called.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// The actor whose turn it is.
    pub fn active(&self) -> Option<ActorId> {
        self.active
            .and_then(|i| self.roster.get(i))
            .map(TurnParticipant::owner)
    }

    /// Participants in turn order.
    pub fn participants(&self) -> impl Iterator<Item = &TurnParticipant> {
        self.roster.iter()
    }

    /// Look up a registered participant, including ones waiting to join.
    pub fn participant(&self, actor: ActorId) -> Option<&TurnParticipant> {
        self.roster
            .iter()
            .chain(&self.pending_joins)
            .find(|p| p.owner() == actor)
    }

    /// Mutable access to a registered participant, e.g. to subscribe.
    pub fn participant_mut(&mut self, actor: ActorId) -> Option<&mut TurnParticipant> {
        self.roster
            .iter_mut()
            .chain(&mut self.pending_joins)
            .find(|p| p.owner() == actor)
    }

    /// Return `true` if `actor` is registered or waiting to join.
    pub fn contains(&self, actor: ActorId) -> bool {
        self.participant(actor).is_some()
    }

    /// Number of participants in the roster.
    pub fn len(&self) -> usize {
        self.roster.len()
    }

    /// Return `true` if the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    /// The turn history.
    pub fn log(&self) -> &TurnLog {
        &self.log
    }

    /// Hand back participants removed at a round boundary.
    pub fn take_departed(&mut self) -> Vec<TurnParticipant> {
        std::mem::take(&mut self.departed)
    }

    fn index_of(&self, actor: ActorId) -> Option<usize> {
        self.roster.iter().position(|p| p.owner() == actor)
    }

    fn between_rounds(&self) -> bool {
        self.active.is_none()
    }

    // -----------------------------------------------------------------------
    // Roster
    // -----------------------------------------------------------------------

    /// Add a participant.
    ///
    /// While idle the participant joins at once (and a started sequencer
    /// begins a round for it); otherwise it joins at the next round boundary.
    pub fn register(&mut self, mut participant: TurnParticipant) -> TurnResult<()> {
        let actor = participant.owner();
        if self.contains(actor) {
            warn!(target: "ng_turns::sequencer", actor = %actor, "duplicate registration rejected");
            return Err(TurnError::AlreadyRegistered(actor));
        }
        if participant.sequencer().is_some_and(|s| s != self.id) {
            warn!(target: "ng_turns::sequencer", actor = %actor, "participant belongs to another sequencer");
            return Err(TurnError::ForeignSequencer(actor));
        }

        participant.set_sequencer(Some(self.id));
        self.log.push(self.round, TurnEventKind::Joined(actor));
        if self.between_rounds() {
            debug!(target: "ng_turns::sequencer", actor = %actor, "participant joined");
            self.roster.push(participant);
            if self.started {
                self.round_start();
            }
        } else {
            debug!(target: "ng_turns::sequencer", actor = %actor, "participant joins next round");
            self.pending_joins.push(participant);
        }
        Ok(())
    }

    /// Remove a participant.
    ///
    /// Returns the participant when it leaves at once, or `None` when it is
    /// withdrawn now and removed at the next round boundary (collect it with
    /// [`take_departed`](Self::take_departed)).
    pub fn remove(&mut self, actor: ActorId) -> TurnResult<Option<TurnParticipant>> {
        if let Some(i) = self.pending_joins.iter().position(|p| p.owner() == actor) {
            let mut participant = self.pending_joins.remove(i);
            participant.set_sequencer(None);
            self.log.push(self.round, TurnEventKind::Left(actor));
            return Ok(Some(participant));
        }
        let Some(index) = self.index_of(actor) else {
            warn!(target: "ng_turns::sequencer", actor = %actor, "removal of unknown participant");
            return Err(TurnError::NotRegistered(actor));
        };
        if self.pending_leaves.contains(&actor) {
            return Ok(None);
        }

        self.log.push(self.round, TurnEventKind::Left(actor));
        match self.active {
            None => {
                debug!(target: "ng_turns::sequencer", actor = %actor, "participant left");
                Ok(Some(self.detach(index)))
            }
            Some(active) if active == index => {
                debug!(target: "ng_turns::sequencer", actor = %actor, "active participant left");
                let participant = self.detach(index);
                self.active = None;
                self.advance_from(index);
                Ok(Some(participant))
            }
            Some(_) => {
                debug!(target: "ng_turns::sequencer", actor = %actor, "participant leaves next round");
                self.roster[index].set_can_still_act(false);
                self.pending_leaves.push(actor);
                Ok(None)
            }
        }
    }

    fn detach(&mut self, index: usize) -> TurnParticipant {
        let mut participant = self.roster.remove(index);
        participant.set_sequencer(None);
        if let Some(active) = self.active
            && active > index
        {
            self.active = Some(active - 1);
        }
        participant
    }

    fn apply_roster_changes(&mut self) {
        for actor in std::mem::take(&mut self.pending_leaves) {
            if let Some(index) = self.index_of(actor) {
                let participant = self.detach(index);
                self.departed.push(participant);
            }
        }
        self.roster.append(&mut self.pending_joins);
    }

    // -----------------------------------------------------------------------
    // Turn flow
    // -----------------------------------------------------------------------

    /// Begin the first round. Calling it again has no effect.
    pub fn start(&mut self) {
        if self.started {
            debug!(target: "ng_turns::sequencer", "already started");
            return;
        }
        self.started = true;
        self.round_start();
    }

    /// Start a new round: apply roster changes, make everyone eligible, fire
    /// round-start on each participant and activate the first one.
    ///
    /// With an empty roster no one becomes active and the sequencer stays
    /// idle until someone registers.
    pub fn round_start(&mut self) {
        self.started = true;
        self.active = None;
        self.apply_roster_changes();
        self.round += 1;
        self.log.push(self.round, TurnEventKind::RoundStarted);
        debug!(
            target: "ng_turns::sequencer",
            round = self.round,
            participants = self.roster.len(),
            "round started"
        );

        for participant in &mut self.roster {
            participant.round_start();
        }

        match self.next_eligible(0) {
            Some(index) => self.activate(index),
            None => debug!(target: "ng_turns::sequencer", round = self.round, "roster empty, idle"),
        }
    }

    /// End the caller's turn and forfeit the rest of its round.
    pub fn end_turn(&mut self, caller: ActorId) -> TurnResult<()> {
        let index = self.require_active(caller)?;
        self.roster[index].set_can_still_act(false);
        self.notify_turn_end(index);
        self.advance_from(index + 1);
        Ok(())
    }

    /// Pass the turn to the next eligible participant without forfeiting the
    /// caller's round. The caller is re-activated if nobody else is eligible.
    pub fn start_turn_next(&mut self, caller: ActorId) -> TurnResult<()> {
        let index = self.require_active(caller)?;
        self.log.push(self.round, TurnEventKind::Yielded(caller));
        self.notify_turn_end(index);
        self.advance_from(index + 1);
        Ok(())
    }

    /// Fire turn-end on a participant without advancing.
    pub fn turn_end(&mut self, actor: ActorId) -> TurnResult<()> {
        let Some(index) = self.index_of(actor) else {
            warn!(target: "ng_turns::sequencer", actor = %actor, "turn end for unknown participant");
            return Err(TurnError::NotRegistered(actor));
        };
        self.notify_turn_end(index);
        Ok(())
    }

    fn require_active(&self, caller: ActorId) -> TurnResult<usize> {
        if let Some(index) = self.active
            && self.roster[index].owner() == caller
        {
            return Ok(index);
        }
        let active = self.active();
        warn!(target: "ng_turns::sequencer", caller = %caller, active = ?active, "out-of-turn call ignored");
        if !self.contains(caller) {
            return Err(TurnError::NotRegistered(caller));
        }
        Err(TurnError::NotActive { caller, active })
    }

    fn notify_turn_end(&mut self, index: usize) {
        let participant = &mut self.roster[index];
        let actor = participant.owner();
        participant.turn_end();
        self.log.push(self.round, TurnEventKind::TurnEnded(actor));
    }

    /// Scan the roster from `from` with wraparound for an eligible
    /// participant.
    fn next_eligible(&self, from: usize) -> Option<usize> {
        let len = self.roster.len();
        (0..len)
            .map(|k| (from + k) % len)
            .find(|&i| self.roster[i].can_still_act_this_round())
    }

    fn advance_from(&mut self, from: usize) {
        match self.next_eligible(from) {
            Some(index) => self.activate(index),
            None => self.round_start(),
        }
    }

    fn activate(&mut self, index: usize) {
        self.active = Some(index);
        let participant = &mut self.roster[index];
        let actor = participant.owner();
        debug!(target: "ng_turns::sequencer", round = self.round, actor = %actor, "turn started");
        self.log.push(self.round, TurnEventKind::TurnStarted(actor));
        participant.turn_start();
    }
}
