use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::error::SyncError;
use super::view::Board;
use crate::cache::{Mutation, QueryKey};
use crate::client::FetchError;
use crate::controller::FilterController;
use crate::model::{Paginated, Task, TaskId, TaskPatch, TaskState};
use crate::service::TaskQueryService;

/// An optimistically applied drop waiting for the server's answer.
#[derive(Debug)]
pub struct Transition {
    task_id: TaskId,
    key: QueryKey,
    from: TaskState,
    target: TaskState,
    seq: u64,
    restore_point: Mutation<Paginated<Task>>,
}

impl Transition {
    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn from(&self) -> TaskState {
        self.from
    }

    pub fn target(&self) -> TaskState {
        self.target
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug)]
pub enum TransitionOutcome {
    /// Dropped onto its own column; nothing was sent.
    Unchanged,
    Confirmed,
    /// The server refused; the slot went back to the restore point.
    RolledBack(FetchError),
    /// A later drop of the same task took over; no rollback was applied.
    Superseded,
}

/// Turns drops into optimistic cache changes confirmed through the task service.
///
/// Per task only the latest drop counts: every transition carries a sequence
/// number and its confirm or rollback is discarded once a newer one exists.
/// Every transition still ends with a refetch of its slot.
pub struct BoardSynchronizer<S> {
    controller: Arc<FilterController<S>>,
    latest: Mutex<HashMap<TaskId, u64>>,
    next_seq: AtomicU64,
}

impl<S> BoardSynchronizer<S>
where
    S: TaskQueryService,
{
    pub fn new(controller: Arc<FilterController<S>>) -> Self {
        Self {
            controller,
            latest: Mutex::new(HashMap::new()),
            next_seq: AtomicU64::new(1),
        }
    }

    pub fn controller(&self) -> &Arc<FilterController<S>> {
        &self.controller
    }

    /// Columns of the page shown for the applied filters.
    pub fn board(&self) -> Option<Board> {
        self.controller
            .current()
            .map(|page| Board::partition(&page))
    }

    /// Handles a drop end to end.
    pub async fn drop_task(
        &self,
        id: &TaskId,
        target: TaskState,
    ) -> Result<TransitionOutcome, SyncError> {
        match self.begin(id, target)? {
            Some(transition) => Ok(self.complete(transition).await),
            None => Ok(TransitionOutcome::Unchanged),
        }
    }

    /// Applies the drop to the cache right away. `None` when the task already
    /// sits in `target`.
    pub fn begin(&self, id: &TaskId, target: TaskState) -> Result<Option<Transition>, SyncError> {
        let key = self.controller.current_key();
        let cache = self.controller.cache();

        let mut latest = self.latest.lock();
        let page = cache
            .read(&key)
            .ok_or_else(|| SyncError::NotLoaded(key.clone()))?;
        let from = page
            .task(id)
            .map(|task| task.state)
            .ok_or_else(|| SyncError::UnknownTask(id.clone()))?;
        if from == target {
            debug!(task_id = %id, state = %from, "drop onto own column");
            return Ok(None);
        }

        let restore_point = cache
            .mutate(&key, |page| page.with_task_state(id, target))
            .ok_or_else(|| SyncError::NotLoaded(key.clone()))?;
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        latest.insert(id.clone(), seq);
        info!(task_id = %id, %from, to = %target, seq, "optimistic transition applied");

        Ok(Some(Transition {
            task_id: id.clone(),
            key,
            from,
            target,
            seq,
            restore_point,
        }))
    }

    /// Sends the transition to the server and settles the cache slot.
    #[instrument(skip(self, transition), fields(task_id = %transition.task_id, seq = transition.seq))]
    pub async fn complete(&self, transition: Transition) -> TransitionOutcome {
        let result = self
            .controller
            .service()
            .partial_update(&transition.task_id, &TaskPatch::state(transition.target))
            .await;

        let outcome = self.settle(&transition, result);
        self.controller.cache().invalidate(&transition.key);
        if let Err(err) = self.controller.refetch(&transition.key).await {
            warn!(reason = %err, "refetch after transition failed");
        }
        outcome
    }

    fn settle(&self, transition: &Transition, result: Result<Task, FetchError>) -> TransitionOutcome {
        let mut latest = self.latest.lock();
        if latest.get(&transition.task_id) != Some(&transition.seq) {
            debug!("stale transition result discarded");
            return TransitionOutcome::Superseded;
        }
        latest.remove(&transition.task_id);

        match result {
            Ok(_) => {
                info!(to = %transition.target, "transition confirmed");
                TransitionOutcome::Confirmed
            }
            Err(err) => {
                warn!(reason = %err, "transition failed, rolling back");
                self.roll_back(transition);
                TransitionOutcome::RolledBack(err)
            }
        }
    }

    fn roll_back(&self, transition: &Transition) {
        let cache = self.controller.cache();
        let Mutation { previous, revision } = transition.restore_point.clone();
        if cache.restore_if_unchanged(&transition.key, revision, previous) {
            return;
        }
        // The slot moved on; revert only this task.
        cache.mutate(&transition.key, |page| {
            page.with_task_state(&transition.task_id, transition.from)
        });
    }
}
