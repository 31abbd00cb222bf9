//! Mounted flag for async loaders.
//!
//! A view hands a [`ViewScope`] to whatever it starts loading and calls
//! [`ViewScope::unmount`] when it goes away; results that arrive afterwards
//! are discarded instead of being applied to stale state.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ViewScope {
    mounted: Arc<AtomicBool>,
}

impl ViewScope {
    pub fn mounted() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Await `work`; `None` if the view was unmounted by the time it finished.
    pub async fn run<F: Future>(&self, work: F) -> Option<F::Output> {
        let output = work.await;
        self.is_mounted().then_some(output)
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::mounted()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn keeps_result_while_mounted() {
        let scope = ViewScope::mounted();
        assert_eq!(scope.run(async { 7 }).await, Some(7));
    }

    #[tokio::test]
    async fn drops_result_after_unmount() {
        let scope = ViewScope::mounted();
        let unmounter = scope.clone();
        let work = async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            42
        };
        let pending = tokio::spawn({
            let scope = scope.clone();
            async move { scope.run(work).await }
        });
        unmounter.unmount();
        assert_eq!(pending.await.unwrap(), None);
        assert!(!scope.is_mounted());
    }
}
