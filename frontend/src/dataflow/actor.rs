//! Single-value state owned by one async processing loop.

use std::future::Future;
use std::sync::Arc;
use zoon::{Mutable, Signal, Task, TaskHandle};

/// Reactive state container mutated only by its processor loop.
///
/// The processor receives the backing `Mutable` and usually loops over one or
/// more relay streams with `select!`. Dropping the last clone of the Actor
/// drops its `TaskHandle`, which aborts the loop together with any timer it
/// is awaiting.
///
/// ```rust
/// let (play_pause_clicked_relay, mut clicks) = relay();
///
/// let paused = Actor::new(false, move |state| async move {
///     while let Some(()) = clicks.next().await {
///         state.update(|paused| !paused);
///     }
/// });
/// ```
#[derive(Clone, Debug)]
pub struct Actor<T>
where
    T: Clone + 'static,
{
    state: Mutable<T>,
    #[allow(dead_code)]
    task_handle: Arc<TaskHandle>,
}

impl<T> Actor<T>
where
    T: Clone + 'static,
{
    pub fn new<F, Fut>(initial_state: T, processor: F) -> Self
    where
        F: FnOnce(Mutable<T>) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let state = Mutable::new(initial_state);
        let task_handle = Arc::new(Task::start_droppable(processor(state.clone())));

        Self { state, task_handle }
    }

    /// The only read access; UI binds to projections of the state.
    pub fn signal_ref<U>(&self, f: impl Fn(&T) -> U + 'static) -> impl Signal<Item = U>
    where
        U: 'static,
    {
        self.state.signal_ref(f)
    }
}
