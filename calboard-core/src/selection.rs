//! Tracks the single event being composed or edited.
//!
//! Only one flow can be open at a time. Selections made while a flow is
//! open are ignored until it is cancelled, saved or deleted, so two drafts
//! never clobber each other's fields.

use log::{debug, warn};

use crate::error::{CalboardError, CalboardResult};
use crate::event::{Event, EventDraft};
use crate::repository::EventRepository;
use crate::store::PersistenceStore;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    CreatingNew(EventDraft),
    Editing { id: String, draft: EventDraft },
}

#[derive(Debug, Default)]
pub struct SelectionController {
    state: Selection,
}

impl SelectionController {
    pub fn new() -> Self {
        SelectionController::default()
    }

    pub fn state(&self) -> &Selection {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == Selection::Idle
    }

    pub fn draft(&self) -> Option<&EventDraft> {
        match &self.state {
            Selection::Idle => None,
            Selection::CreatingNew(draft) | Selection::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn editing_id(&self) -> Option<&str> {
        match &self.state {
            Selection::Editing { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Explicit "add" action: open a blank draft.
    pub fn begin_new(&mut self) -> bool {
        self.open(Selection::CreatingNew(EventDraft::default()))
    }

    /// Date cell clicked: open a draft starting and ending on that date.
    pub fn select_date(&mut self, date: &str) -> bool {
        self.open(Selection::CreatingNew(EventDraft::on_date(date)))
    }

    /// Existing event clicked. Holidays are read-only and never enter editing.
    pub fn select_event(&mut self, event: &Event) -> bool {
        if event.is_global {
            debug!("'{}' is a holiday and cannot be edited", event.title);
            return false;
        }

        self.open(Selection::Editing {
            id: event.id.clone(),
            draft: event.to_draft(),
        })
    }

    fn open(&mut self, next: Selection) -> bool {
        if !self.is_idle() {
            debug!("Ignoring selection while another event is open");
            return false;
        }
        self.state = next;
        true
    }

    fn draft_mut(&mut self) -> Option<&mut EventDraft> {
        match &mut self.state {
            Selection::Idle => None,
            Selection::CreatingNew(draft) | Selection::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> bool {
        self.draft_mut().map(|d| d.title = title.into()).is_some()
    }

    pub fn set_start(&mut self, start: impl Into<String>) -> bool {
        self.draft_mut().map(|d| d.start = start.into()).is_some()
    }

    pub fn set_end(&mut self, end: impl Into<String>) -> bool {
        self.draft_mut().map(|d| d.end = end.into()).is_some()
    }

    pub fn cancel(&mut self) {
        self.state = Selection::Idle;
    }

    /// Click outside the open dialog. Cancels whatever flow is open.
    pub fn dismiss(&mut self) -> bool {
        if self.is_idle() {
            return false;
        }
        self.cancel();
        true
    }

    /// Save the open draft: add when creating, update when editing.
    ///
    /// Validation failures leave the flow open for correction. Returns
    /// `Ok(None)` when nothing is open.
    pub fn commit<S: PersistenceStore>(
        &mut self,
        repo: &mut EventRepository<S>,
    ) -> CalboardResult<Option<Event>> {
        let result = match &self.state {
            Selection::Idle => return Ok(None),
            Selection::CreatingNew(draft) => {
                draft.validate()?;
                repo.add_user_event(draft)
            }
            Selection::Editing { id, draft } => {
                draft.validate()?;
                repo.update_user_event(id, draft)
            }
        };

        self.settle(result).map(Some)
    }

    /// Delete the event being edited. A no-op unless editing.
    pub fn delete<S: PersistenceStore>(
        &mut self,
        repo: &mut EventRepository<S>,
    ) -> CalboardResult<Option<Event>> {
        let Selection::Editing { id, .. } = &self.state else {
            debug!("Delete requested with no event selected");
            return Ok(None);
        };

        let result = repo.delete_user_event(id);
        self.settle(result).map(Some)
    }

    fn settle(&mut self, result: CalboardResult<Event>) -> CalboardResult<Event> {
        match result {
            Ok(event) => {
                self.state = Selection::Idle;
                Ok(event)
            }
            Err(CalboardError::NotFound(id)) => {
                warn!("Selected event '{id}' no longer exists; closing it");
                self.state = Selection::Idle;
                Err(CalboardError::NotFound(id))
            }
            Err(e) => Err(e),
        }
    }
}
