use std::collections::HashMap;
use std::sync::Mutex;

use tokio::task::JoinHandle;

use crate::wire::Id;

/// Owns the tasks spawned to service in-flight server requests (§5: "A
/// task scope owns spawned tasks and cancels them on shutdown"). Tasks
/// are keyed by request id so [`TaskScope::cancel`] can abort a single
/// handler; `auto_cancel` (default true) aborts everything still
/// outstanding when the scope drops.
pub struct TaskScope {
    tasks: Mutex<HashMap<Id, JoinHandle<()>>>,
    auto_cancel: bool,
}

impl TaskScope {
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(HashMap::new()),
            auto_cancel: true,
        }
    }

    pub fn with_auto_cancel(auto_cancel: bool) -> Self {
        Self {
            tasks: Mutex::new(HashMap::new()),
            auto_cancel,
        }
    }

    /// Registers `handle` under `id`, first aborting and dropping any
    /// prior task registered under the same id (a client should never
    /// reuse an id for a still-pending request, but a handler that
    /// finishes between registration calls could otherwise leak).
    pub fn track(&self, id: Id, handle: JoinHandle<()>) {
        let mut tasks = self.tasks.lock().unwrap();
        if let Some(previous) = tasks.insert(id, handle) {
            previous.abort();
        }
    }

    /// Drops the bookkeeping entry for `id` once its task has completed
    /// normally (called by the task itself just before returning).
    pub fn finish(&self, id: &Id) {
        self.tasks.lock().unwrap().remove(id);
    }

    /// Aborts the task bound to `id`, per §4.9's cancellation contract:
    /// "the request simply never completes and the handler's cooperative
    /// task is terminated at its next suspension point". No response is
    /// emitted for it.
    pub fn cancel(&self, id: &Id) -> bool {
        match self.tasks.lock().unwrap().remove(id) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Aborts every outstanding task (§4.9 `cancel_all`).
    pub fn cancel_all(&self) {
        let mut tasks = self.tasks.lock().unwrap();
        for (_, handle) in tasks.drain() {
            handle.abort();
        }
    }

    pub fn outstanding(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }
}

impl Default for TaskScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        if self.auto_cancel {
            self.cancel_all();
        }
    }
}
