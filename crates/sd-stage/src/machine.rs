//! PlayMachine — guarded transitions over the play session

use serde::{Deserialize, Serialize};

use sd_core::{ClaimReceipt, Item};

use crate::phase::PlayPhase;

/// An event the machine may be asked to apply
#[derive(Debug, Clone, PartialEq)]
pub enum PlayEvent {
    /// User started a play
    Play,
    /// Allocator result arrived
    AttachResult(Item),
    /// Stop sequence begins
    Decelerate,
    /// Winning card grabbed
    Select,
    /// Grabbed card lifts toward the reveal
    Lift,
    /// Reward shown
    Reveal,
    /// Claim collaborator answered
    Claim(ClaimReceipt),
    /// Dismiss/close; back to idle from anywhere
    Reset,
    /// Operational failure; back to idle with a message
    Fail(String),
}

/// Ephemeral per-play record
///
/// Exclusively owned by [`PlayMachine`]; other components get
/// point-in-time reads only. Exactly one session is live at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaySession {
    pub phase: PlayPhase,
    pub selected: Option<Item>,
    pub claim: Option<ClaimReceipt>,
    pub error: Option<String>,
}

/// Outcome of an [`apply`](PlayMachine::apply) call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: PlayPhase,
    pub to: PlayPhase,
    /// False when the event was illegal from `from` and nothing changed
    pub applied: bool,
}

/// The single source of truth for play sequencing
///
/// Illegal transitions are no-ops that report `applied = false`; the
/// session is left untouched and nothing panics. All other components are
/// invoked as side effects of these transitions, never the reverse.
#[derive(Debug, Clone, Default)]
pub struct PlayMachine {
    session: PlaySession,
}

impl PlayMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> PlayPhase {
        self.session.phase
    }

    pub fn session(&self) -> &PlaySession {
        &self.session
    }

    /// Attempt a transition
    pub fn apply(&mut self, event: PlayEvent) -> Transition {
        use PlayPhase::*;

        let from = self.session.phase;
        let to = match (&event, from) {
            (PlayEvent::Play, Idle) => {
                self.session.selected = None;
                self.session.claim = None;
                self.session.error = None;
                Some(Spinning)
            }
            (PlayEvent::AttachResult(item), Spinning) => {
                self.session.selected = Some(item.clone());
                Some(Spinning)
            }
            (PlayEvent::Decelerate, Spinning | Decelerating) => Some(Decelerating),
            (PlayEvent::Select, Decelerating) => Some(Selecting),
            (PlayEvent::Lift, Selecting) => Some(Lifting),
            (PlayEvent::Reveal, Selecting | Lifting) => Some(Reveal),
            (PlayEvent::Claim(receipt), Reveal) => {
                self.session.claim = Some(receipt.clone());
                Some(Settle)
            }
            (PlayEvent::Reset, _) => {
                self.session = PlaySession::default();
                Some(Idle)
            }
            (PlayEvent::Fail(message), _) => {
                self.session.selected = None;
                self.session.claim = None;
                self.session.error = Some(message.clone());
                Some(Idle)
            }
            _ => None,
        };

        match to {
            Some(to) => {
                self.session.phase = to;
                log::debug!("play: {} -> {}", from.type_name(), to.type_name());
                Transition {
                    from,
                    to,
                    applied: true,
                }
            }
            None => {
                log::debug!(
                    "play: ignored {} while {}",
                    event_name(&event),
                    from.type_name()
                );
                Transition {
                    from,
                    to: from,
                    applied: false,
                }
            }
        }
    }
}

fn event_name(event: &PlayEvent) -> &'static str {
    match event {
        PlayEvent::Play => "play",
        PlayEvent::AttachResult(_) => "attach_result",
        PlayEvent::Decelerate => "decelerate",
        PlayEvent::Select => "select",
        PlayEvent::Lift => "lift",
        PlayEvent::Reveal => "reveal",
        PlayEvent::Claim(_) => "claim",
        PlayEvent::Reset => "reset",
        PlayEvent::Fail(_) => "fail",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> Item {
        Item::new("gem", 2.0)
    }

    fn receipt() -> ClaimReceipt {
        ClaimReceipt::success("p-1", "gem")
    }

    fn all_events() -> Vec<PlayEvent> {
        vec![
            PlayEvent::Play,
            PlayEvent::AttachResult(item()),
            PlayEvent::Decelerate,
            PlayEvent::Select,
            PlayEvent::Lift,
            PlayEvent::Reveal,
            PlayEvent::Claim(receipt()),
            PlayEvent::Reset,
            PlayEvent::Fail("boom".into()),
        ]
    }

    fn all_phases() -> Vec<PlayPhase> {
        vec![
            PlayPhase::Idle,
            PlayPhase::Spinning,
            PlayPhase::Decelerating,
            PlayPhase::Selecting,
            PlayPhase::Lifting,
            PlayPhase::Reveal,
            PlayPhase::Settle,
        ]
    }

    /// Mirror of the transition table
    fn is_legal(event: &PlayEvent, from: PlayPhase) -> bool {
        use PlayPhase::*;
        match event {
            PlayEvent::Play => from == Idle,
            PlayEvent::AttachResult(_) => from == Spinning,
            PlayEvent::Decelerate => matches!(from, Spinning | Decelerating),
            PlayEvent::Select => from == Decelerating,
            PlayEvent::Lift => from == Selecting,
            PlayEvent::Reveal => matches!(from, Selecting | Lifting),
            PlayEvent::Claim(_) => from == Reveal,
            PlayEvent::Reset | PlayEvent::Fail(_) => true,
        }
    }

    #[test]
    fn test_happy_path() {
        let mut machine = PlayMachine::new();
        assert!(machine.apply(PlayEvent::Play).applied);
        assert_eq!(machine.phase(), PlayPhase::Spinning);

        assert!(machine.apply(PlayEvent::AttachResult(item())).applied);
        assert_eq!(machine.phase(), PlayPhase::Spinning);
        assert_eq!(machine.session().selected.as_ref().unwrap().id, "gem");

        assert!(machine.apply(PlayEvent::Decelerate).applied);
        assert!(machine.apply(PlayEvent::Select).applied);
        assert!(machine.apply(PlayEvent::Lift).applied);
        assert!(machine.apply(PlayEvent::Reveal).applied);
        assert!(machine.apply(PlayEvent::Claim(receipt())).applied);
        assert_eq!(machine.phase(), PlayPhase::Settle);
        assert!(machine.session().claim.as_ref().unwrap().success);

        assert!(machine.apply(PlayEvent::Reset).applied);
        assert_eq!(machine.session(), &PlaySession::default());
    }

    #[test]
    fn test_reveal_straight_from_selecting() {
        let mut machine = PlayMachine::new();
        machine.session.phase = PlayPhase::Selecting;
        assert!(machine.apply(PlayEvent::Reveal).applied);
        assert_eq!(machine.phase(), PlayPhase::Reveal);
    }

    #[test]
    fn test_illegal_transitions_change_nothing() {
        for phase in all_phases() {
            for event in all_events() {
                if is_legal(&event, phase) {
                    continue;
                }
                let mut machine = PlayMachine::new();
                machine.session.phase = phase;
                machine.session.selected = Some(item());
                machine.session.error = Some("previous".into());
                let snapshot = machine.session.clone();

                let transition = machine.apply(event.clone());
                assert!(!transition.applied, "{event:?} from {phase:?}");
                assert_eq!(transition.from, phase);
                assert_eq!(transition.to, phase);
                assert_eq!(machine.session, snapshot, "{event:?} from {phase:?}");
            }
        }
    }

    #[test]
    fn test_every_table_row_applies() {
        for phase in all_phases() {
            for event in all_events() {
                if !is_legal(&event, phase) {
                    continue;
                }
                let mut machine = PlayMachine::new();
                machine.session.phase = phase;
                assert!(
                    machine.apply(event.clone()).applied,
                    "{event:?} from {phase:?}"
                );
            }
        }
    }

    #[test]
    fn test_play_clears_previous_session() {
        let mut machine = PlayMachine::new();
        machine.apply(PlayEvent::Fail("allocator down".into()));
        assert!(machine.session().error.is_some());

        machine.apply(PlayEvent::Play);
        assert!(machine.session().error.is_none());
        assert!(machine.session().selected.is_none());
        assert!(machine.session().claim.is_none());
    }

    #[test]
    fn test_late_allocator_result_is_discarded() {
        let mut machine = PlayMachine::new();
        machine.apply(PlayEvent::Play);
        machine.apply(PlayEvent::Reset);

        // Result resolves after the reset: must not corrupt the session
        let transition = machine.apply(PlayEvent::AttachResult(item()));
        assert!(!transition.applied);
        assert!(machine.session().selected.is_none());
    }

    #[test]
    fn test_second_play_while_active_is_noop() {
        let mut machine = PlayMachine::new();
        machine.apply(PlayEvent::Play);
        let transition = machine.apply(PlayEvent::Play);
        assert!(!transition.applied);
        assert_eq!(machine.phase(), PlayPhase::Spinning);
    }

    #[test]
    fn test_fail_from_any_phase_stores_error() {
        for phase in all_phases() {
            let mut machine = PlayMachine::new();
            machine.session.phase = phase;
            machine.session.selected = Some(item());
            machine.apply(PlayEvent::Fail("network".into()));
            assert_eq!(machine.phase(), PlayPhase::Idle);
            assert_eq!(machine.session().error.as_deref(), Some("network"));
            assert!(machine.session().selected.is_none());
        }
    }
}
