//! Latest-wins guard for fetchers whose inputs change while a call is in
//! flight.
//!
//! Two mechanisms back each other up. Starting a call aborts the previous
//! one through its [`AbortHandle`], which drops the stale future at its next
//! poll. A generation counter then makes sure that whatever does complete
//! only reports success if it is still the newest call, so the caller can
//! commit its result without re-checking.

use crate::error::FetchError;
use futures::future::{AbortHandle, Abortable};
use log::debug;
use std::cell::{Cell, RefCell};
use std::future::Future;

#[derive(Debug, Default)]
pub struct LatestOnly {
    generation: Cell<u64>,
    in_flight: RefCell<Option<AbortHandle>>,
}

impl LatestOnly {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `call` as the newest call, superseding any previous one.
    ///
    /// Resolves to [`FetchError::Cancelled`] when the call was aborted or a
    /// newer call started before it finished. On any other outcome nothing
    /// newer exists, so the result may be committed immediately.
    pub async fn run<T, F>(&self, call: F) -> Result<T, FetchError>
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        let (handle, registration) = AbortHandle::new_pair();
        if let Some(previous) = self.in_flight.replace(Some(handle)) {
            debug!("superseding in-flight request");
            previous.abort();
        }
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);

        let outcome = Abortable::new(call, registration).await;

        if self.generation.get() != generation {
            return Err(FetchError::Cancelled);
        }
        self.in_flight.replace(None);
        match outcome {
            Ok(result) => result,
            Err(_aborted) => Err(FetchError::Cancelled),
        }
    }

    /// Abort whatever is in flight, e.g. when the owner unmounts or its
    /// inputs became empty.
    pub fn cancel(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        if let Some(previous) = self.in_flight.replace(None) {
            debug!("cancelling in-flight request");
            previous.abort();
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.borrow().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    async fn slow(value: u32, ms: u64) -> Result<u32, FetchError> {
        sleep(Duration::from_millis(ms)).await;
        Ok(value)
    }

    #[tokio::test(start_paused = true)]
    async fn newer_call_wins() {
        let guard = LatestOnly::new();
        let (a, b) = futures::join!(guard.run(slow(1, 100)), guard.run(slow(2, 10)));
        assert_eq!(a, Err(FetchError::Cancelled));
        assert_eq!(b, Ok(2));
        assert!(!guard.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_aborts_in_flight() {
        let guard = LatestOnly::new();
        let (result, ()) = futures::join!(guard.run(slow(1, 100)), async {
            sleep(Duration::from_millis(5)).await;
            guard.cancel();
        });
        assert_eq!(result, Err(FetchError::Cancelled));
    }

    #[tokio::test]
    async fn errors_pass_through() {
        let guard = LatestOnly::new();
        let result: Result<(), _> = guard.run(async { Err(FetchError::Status(503)) }).await;
        assert_eq!(result, Err(FetchError::Status(503)));
    }
}
