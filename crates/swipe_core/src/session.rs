//! Session state and the controller that walks it card by card.
//!
//! [`Session`] is a plain value: the items of one pass, a cursor and the two
//! decision lists. [`SessionController`] is the only thing that mutates it,
//! and reports every visible change as a [`SessionEvent`] so hosts render
//! without reaching into the state.

use shared::{
    domain::{Decision, Item, SessionId},
    error::SupplyError,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    decision::resolve,
    gesture::{DragFeedback, GestureTracker, PointerSignal},
    item_source::{fetch_with_fallback, ItemSource, SupplyOrigin},
    summary::Summary,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    items: Vec<Item>,
    cursor: usize,
    liked: Vec<Item>,
    disliked: Vec<Item>,
}

impl Session {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            id: SessionId::new(),
            items,
            cursor: 0,
            liked: Vec::new(),
            disliked: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn liked(&self) -> &[Item] {
        &self.liked
    }

    pub fn disliked(&self) -> &[Item] {
        &self.disliked
    }

    pub fn current(&self) -> Option<&Item> {
        self.items.get(self.cursor)
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.items.len()
    }

    /// 1-based number of the card on screen, clamped to the total.
    pub fn progress(&self) -> Progress {
        let total = self.total();
        Progress {
            current: (self.cursor + 1).min(total),
            total,
        }
    }

    pub fn summary(&self) -> Summary {
        Summary::from_session(&self.liked, &self.disliked, self.total())
    }

    /// Files the current item under `decision` and moves the cursor.
    /// Cancel and an exhausted session leave everything untouched.
    fn record(&mut self, decision: Decision) -> bool {
        let Some(item) = self.current().cloned() else {
            return false;
        };
        match decision {
            Decision::Like => self.liked.push(item),
            Decision::Dislike => self.disliked.push(item),
            Decision::Cancel => return false,
        }
        self.cursor += 1;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Loading,
    Presenting,
    Terminal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Presented {
        item: Item,
        position: usize,
        total: usize,
    },
    /// The card snaps back to rest with its previews cleared.
    CardReset,
    Finished(Summary),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub decision: Decision,
    pub displacement: f32,
    pub event: SessionEvent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    Ignored,
    Started,
    Dragged(DragFeedback),
    Resolved(Resolution),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("decisions are not accepted while the session is {0:?}")]
    NotAcceptingDecisions(SessionPhase),
    #[error("items can only be loaded while the session is loading, not {0:?}")]
    NotLoading(SessionPhase),
    #[error(transparent)]
    Supply(#[from] SupplyError),
}

pub struct SessionController {
    total_items: usize,
    phase: SessionPhase,
    session: Session,
    gesture: GestureTracker,
}

impl SessionController {
    pub fn new(total_items: usize) -> Self {
        Self {
            total_items,
            phase: SessionPhase::Idle,
            session: Session::empty(),
            gesture: GestureTracker::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// True while items are being fetched; gesture input is dropped.
    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::Loading
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_item(&self) -> Option<&Item> {
        match self.phase {
            SessionPhase::Presenting => self.session.current(),
            _ => None,
        }
    }

    pub fn progress(&self) -> Progress {
        self.session.progress()
    }

    pub fn summary(&self) -> Option<Summary> {
        (self.phase == SessionPhase::Terminal).then(|| self.session.summary())
    }

    /// Fetches a fresh batch and presents its first item.
    pub async fn start(
        &mut self,
        primary: &dyn ItemSource,
        fallback: &dyn ItemSource,
    ) -> Result<SessionEvent, SessionError> {
        let count = self.begin_loading();
        let supplied = fetch_with_fallback(primary, fallback, count).await?;
        if supplied.origin == SupplyOrigin::Fallback {
            info!(count, "session running on fallback items");
        }
        self.load(supplied.items)
    }

    /// Drops the current session and waits for items. Returns how many to fetch.
    pub fn begin_loading(&mut self) -> usize {
        self.session = Session::empty();
        self.gesture.reset();
        self.phase = SessionPhase::Loading;
        self.total_items
    }

    /// Clears the decisions and cursor; a fresh batch must follow through
    /// [`Self::load`] or [`Self::start`]. Items are never reused.
    pub fn reset(&mut self) -> usize {
        info!(
            previous_session = %self.session.id(),
            "resetting session"
        );
        self.begin_loading()
    }

    pub fn load(&mut self, items: Vec<Item>) -> Result<SessionEvent, SessionError> {
        if self.phase != SessionPhase::Loading {
            return Err(SessionError::NotLoading(self.phase));
        }
        if items.len() != self.total_items {
            return Err(SupplyError::Short {
                expected: self.total_items,
                actual: items.len(),
            }
            .into());
        }

        self.session = Session::new(items);
        info!(
            session_id = %self.session.id(),
            total = self.total_items,
            "session loaded"
        );
        Ok(self.present_or_finish())
    }

    pub fn decide(&mut self, decision: Decision) -> Result<SessionEvent, SessionError> {
        if self.phase != SessionPhase::Presenting {
            return Err(SessionError::NotAcceptingDecisions(self.phase));
        }
        self.gesture.reset();

        debug!(
            session_id = %self.session.id(),
            cursor = self.session.cursor(),
            decision = decision.label(),
            "decision"
        );
        if !self.session.record(decision) {
            return Ok(SessionEvent::CardReset);
        }
        Ok(self.present_or_finish())
    }

    fn present_or_finish(&mut self) -> SessionEvent {
        match self.session.current() {
            Some(item) => {
                self.phase = SessionPhase::Presenting;
                SessionEvent::Presented {
                    item: item.clone(),
                    position: self.session.cursor(),
                    total: self.session.total(),
                }
            }
            None => {
                self.phase = SessionPhase::Terminal;
                let summary = self.session.summary();
                info!(
                    session_id = %self.session.id(),
                    liked = summary.liked_count,
                    disliked = summary.disliked_count,
                    "session finished"
                );
                SessionEvent::Finished(summary)
            }
        }
    }

    pub fn press(&mut self, x: f32) -> bool {
        self.phase == SessionPhase::Presenting && self.gesture.on_start(x)
    }

    pub fn drag(&mut self, x: f32) -> Option<DragFeedback> {
        if self.phase != SessionPhase::Presenting {
            return None;
        }
        self.gesture.on_move(x)
    }

    /// Ends the drag and commits whatever the displacement resolves to.
    pub fn release(&mut self) -> Result<Option<Resolution>, SessionError> {
        if self.phase != SessionPhase::Presenting {
            self.gesture.reset();
            return Ok(None);
        }
        let Some(displacement) = self.gesture.on_end() else {
            return Ok(None);
        };
        let decision = resolve(displacement);
        let event = self.decide(decision)?;
        Ok(Some(Resolution {
            decision,
            displacement,
            event,
        }))
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    pub fn handle_pointer(&mut self, signal: PointerSignal) -> Result<PointerOutcome, SessionError> {
        let outcome = match signal {
            PointerSignal::Press(x) => {
                if self.press(x) {
                    PointerOutcome::Started
                } else {
                    PointerOutcome::Ignored
                }
            }
            PointerSignal::Move(x) => self
                .drag(x)
                .map(PointerOutcome::Dragged)
                .unwrap_or(PointerOutcome::Ignored),
            PointerSignal::Release => self
                .release()?
                .map(PointerOutcome::Resolved)
                .unwrap_or(PointerOutcome::Ignored),
        };
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
