use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Coalesces a burst of input values into a single dispatch
///
/// Each [`push`](Debouncer::push) restarts the idle timer. Once no value has
/// arrived for `interval`, the latest value is dispatched, unless it equals the
/// previously dispatched one. Dropping the debouncer stops the worker; a value
/// still waiting on its timer is discarded.
pub struct Debouncer<T> {
    input_tx: mpsc::UnboundedSender<T>,
    worker: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: PartialEq + Clone + Send + 'static,
{
    /// Spawns the debounce worker on the current tokio runtime
    pub fn new<F>(interval: Duration, dispatch: F) -> Self
    where
        F: Fn(T) + Send + 'static,
    {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(Self::run(interval, input_rx, dispatch));
        Self { input_tx, worker }
    }

    pub fn push(&self, value: T) {
        if self.input_tx.send(value).is_err() {
            tracing::debug!("Debouncer worker already stopped, input dropped");
        }
    }

    async fn run<F>(interval: Duration, mut input_rx: mpsc::UnboundedReceiver<T>, dispatch: F)
    where
        F: Fn(T),
    {
        let mut last_dispatched: Option<T> = None;

        while let Some(mut pending) = input_rx.recv().await {
            // Keep absorbing input until the stream has been idle for `interval`
            loop {
                tokio::select! {
                    next = input_rx.recv() => match next {
                        Some(value) => pending = value,
                        None => return,
                    },
                    _ = tokio::time::sleep(interval) => break,
                }
            }

            if last_dispatched.as_ref() == Some(&pending) {
                continue;
            }
            last_dispatched = Some(pending.clone());
            dispatch(pending);
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.worker.abort();
    }
}
