mod draft;
mod error;
mod pagination;

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub use draft::{FilterDraft, FilterSlots};
pub use error::ControllerError;
pub use pagination::{pagination_range, PageMarker, WINDOW_RADIUS};

use crate::cache::{QueryKey, TaskCache};
use crate::client::FetchError;
use crate::model::{ModelError, NewTask, Paginated, Session, Task, TaskFilters, TaskId};
use crate::service::TaskQueryService;

/// What happened to the result of a list fetch.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Written to the cache slot of the key it was issued for.
    Stored(Arc<Paginated<Task>>),
    /// The applied key moved on while the request was in flight.
    Discarded,
}

/// A list request issued for the key that was current at `generation`.
///
/// Counts as in flight until dropped, so an abandoned `refresh` future does
/// not keep page changes blocked.
pub(crate) struct FetchTicket<'a> {
    state: &'a Mutex<ControllerState>,
    key: QueryKey,
    generation: u64,
}

impl Drop for FetchTicket<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if state.generation == self.generation {
            state.in_flight = state.in_flight.saturating_sub(1);
        }
    }
}

struct ControllerState {
    slots: FilterSlots,
    page: u32,
    size: u32,
    last_page: Option<u32>,
    /// Bumped on every change of the applied key; older fetches are stale.
    generation: u64,
    in_flight: usize,
    error: Option<String>,
}

impl ControllerState {
    fn key(&self, user_id: &Option<String>) -> QueryKey {
        QueryKey::new(
            self.slots.applied.clone(),
            self.page,
            self.size,
            user_id.clone(),
        )
    }

    fn set_key(&mut self, user_id: &Option<String>, filters: TaskFilters, page: u32, size: u32) {
        let before = self.key(user_id);
        self.slots.applied = filters;
        self.page = page;
        self.size = size;
        if self.key(user_id) != before {
            self.generation += 1;
            self.in_flight = 0;
            self.error = None;
        }
    }
}

/// Owns the draft and applied filters plus the page cursor, and runs the
/// list fetches whose results land in the task cache.
pub struct FilterController<S> {
    service: Arc<S>,
    cache: Arc<TaskCache>,
    user_id: Option<String>,
    state: Mutex<ControllerState>,
}

impl<S> FilterController<S>
where
    S: TaskQueryService,
{
    pub fn new(service: Arc<S>, cache: Arc<TaskCache>, session: &Session, page_size: u32) -> Self {
        Self {
            service,
            cache,
            user_id: session.user_id().map(str::to_string),
            state: Mutex::new(ControllerState {
                slots: FilterSlots::default(),
                page: 1,
                size: page_size.max(1),
                last_page: None,
                generation: 0,
                in_flight: 0,
                error: None,
            }),
        }
    }

    pub fn cache(&self) -> &Arc<TaskCache> {
        &self.cache
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    pub fn current_key(&self) -> QueryKey {
        self.state.lock().key(&self.user_id)
    }

    /// Cached page of the applied key, if it was fetched already.
    pub fn current(&self) -> Option<Arc<Paginated<Task>>> {
        self.cache.read(&self.current_key())
    }

    pub fn draft(&self) -> FilterDraft {
        self.state.lock().slots.draft.clone()
    }

    pub fn applied(&self) -> TaskFilters {
        self.state.lock().slots.applied.clone()
    }

    pub fn page(&self) -> u32 {
        self.state.lock().page
    }

    pub fn page_size(&self) -> u32 {
        self.state.lock().size
    }

    pub fn last_page(&self) -> Option<u32> {
        self.state.lock().last_page
    }

    /// Message of the last failed fetch for the applied key.
    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub fn is_fetching(&self) -> bool {
        self.state.lock().in_flight > 0
    }

    pub fn pagination(&self) -> Vec<PageMarker> {
        let state = self.state.lock();
        pagination_range(state.page, state.last_page.unwrap_or(1))
    }

    /// Edits the filter form. Never issues a request.
    pub fn edit_draft<F>(&self, edit: F)
    where
        F: FnOnce(&mut FilterDraft),
    {
        edit(&mut self.state.lock().slots.draft);
    }

    /// Promotes the draft to the applied filters, back on page 1, and fetches.
    #[instrument(skip(self))]
    pub async fn apply(&self) -> Result<FetchOutcome, ControllerError> {
        {
            let mut state = self.state.lock();
            let filters = state.slots.draft.parse()?;
            let size = state.size;
            state.set_key(&self.user_id, filters, 1, size);
        }
        info!(key = ?self.current_key(), "filters applied");
        self.refresh().await
    }

    /// Clears both filter slots and fetches the unfiltered first page.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<FetchOutcome, ControllerError> {
        {
            let mut state = self.state.lock();
            state.slots.draft = FilterDraft::default();
            let size = state.size;
            state.set_key(&self.user_id, TaskFilters::default(), 1, size);
        }
        self.refresh().await
    }

    /// Moves to page `n`. Returns `None`, changing nothing, when `n` is out of
    /// `1..=last_page` or a fetch for the applied key is still running.
    #[instrument(skip(self))]
    pub async fn go_to_page(&self, n: u32) -> Result<Option<FetchOutcome>, ControllerError> {
        {
            let mut state = self.state.lock();
            let last_page = state.last_page.unwrap_or(1);
            if n < 1 || n > last_page || state.in_flight > 0 {
                debug!(page = n, last_page, in_flight = state.in_flight, "page change rejected");
                return Ok(None);
            }
            let filters = state.slots.applied.clone();
            let size = state.size;
            state.set_key(&self.user_id, filters, n, size);
        }
        self.refresh().await.map(Some)
    }

    /// Changes the page size and goes back to page 1.
    #[instrument(skip(self))]
    pub async fn set_page_size(&self, size: u32) -> Result<FetchOutcome, ControllerError> {
        if size == 0 {
            return Err(ModelError::InvalidPageSize(size).into());
        }
        {
            let mut state = self.state.lock();
            let filters = state.slots.applied.clone();
            state.set_key(&self.user_id, filters, 1, size);
        }
        self.refresh().await
    }

    /// Authoritative read of the applied key.
    pub async fn refresh(&self) -> Result<FetchOutcome, ControllerError> {
        let ticket = self.begin_fetch();
        let result = self.service.list(&ticket.key).await;
        self.complete_fetch(ticket, result)
    }

    /// Re-reads `key` if it is still the applied key; other slots are left
    /// for whoever applies them again.
    pub async fn refetch(&self, key: &QueryKey) -> Result<Option<FetchOutcome>, ControllerError> {
        if *key != self.current_key() {
            debug!(key = ?key, "skipping refetch of a key that is no longer applied");
            return Ok(None);
        }
        self.refresh().await.map(Some)
    }

    /// Creates a task owned by the session user unless `data` names one, then refreshes.
    #[instrument(skip(self, data), fields(title = %data.title))]
    pub async fn create_task(&self, mut data: NewTask) -> Result<Task, ControllerError> {
        if data.usuario_id.is_none() {
            data.usuario_id = self.user_id.clone();
        }
        let task = self.service.create(&data).await?;
        info!(task_id = %task.id, "task created");
        if let Err(err) = self.refresh().await {
            warn!(reason = %err, "refresh after create failed");
        }
        Ok(task)
    }

    /// Soft deletes a task. When it was the last one on a page past the first,
    /// steps back one page before refreshing.
    #[instrument(skip(self))]
    pub async fn disable_task(&self, id: &TaskId) -> Result<(), ControllerError> {
        self.service.disable(id).await?;
        info!(task_id = %id, "task disabled");

        let emptied_page = self
            .current()
            .map(|page| page.len() == 1 && page.task(id).is_some())
            .unwrap_or(false);
        {
            let mut state = self.state.lock();
            if emptied_page && state.page > 1 {
                let filters = state.slots.applied.clone();
                let (page, size) = (state.page - 1, state.size);
                state.set_key(&self.user_id, filters, page, size);
            }
        }
        if let Err(err) = self.refresh().await {
            warn!(reason = %err, "refresh after disable failed");
        }
        Ok(())
    }

    pub(crate) fn begin_fetch(&self) -> FetchTicket<'_> {
        let mut state = self.state.lock();
        state.in_flight += 1;
        let ticket = FetchTicket {
            state: &self.state,
            key: state.key(&self.user_id),
            generation: state.generation,
        };
        debug!(key = ?ticket.key, generation = ticket.generation, "fetch issued");
        ticket
    }

    /// Lands a fetch result. Results of a superseded key are dropped without
    /// touching the cache; failures are recorded and never touch the cache.
    pub(crate) fn complete_fetch(
        &self,
        ticket: FetchTicket<'_>,
        result: Result<Paginated<Task>, FetchError>,
    ) -> Result<FetchOutcome, ControllerError> {
        let (key, generation) = (ticket.key.clone(), ticket.generation);
        drop(ticket);

        let mut state = self.state.lock();
        if generation != state.generation {
            debug!(key = ?key, generation, "discarding stale fetch");
            return match result {
                Ok(_) => Ok(FetchOutcome::Discarded),
                Err(err) => Err(err.into()),
            };
        }

        match result {
            Ok(page) => {
                state.last_page = Some(page.last_page.max(1));
                state.error = None;
                let stored = self.cache.write(key, page);
                Ok(FetchOutcome::Stored(stored))
            }
            Err(err) => {
                warn!(key = ?key, reason = %err, "fetch failed");
                state.error = Some(err.to_string());
                Err(err.into())
            }
        }
    }
}
