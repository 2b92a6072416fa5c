use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::Result;
use crate::reports::paginated::Paginated;

struct State<T> {
    current: Arc<Paginated<T>>,
    /// Ticket of the most recently issued navigation
    issued: u64,
}

/// Holds the page a caller is showing and serialises navigation on it.
///
/// Every navigation takes a ticket; its result is only installed if no
/// later navigation was issued while the fetch was in flight. Superseded
/// results are dropped and reported as `Ok(None)`.
pub struct Navigator<T> {
    state: Mutex<State<T>>,
}

impl<T: Send + Sync + 'static> Navigator<T> {
    pub fn new(initial: Paginated<T>) -> Self {
        Self {
            state: Mutex::new(State {
                current: Arc::new(initial),
                issued: 0,
            }),
        }
    }

    /// Navigator showing the empty placeholder
    pub fn placeholder() -> Self {
        Self::new(Paginated::empty())
    }

    pub fn current(&self) -> Arc<Paginated<T>> {
        Arc::clone(&self.state.lock().current)
    }

    /// Replace the current page with the result of `load`, e.g. a first
    /// fetch through [`super::Reports`]
    pub async fn load<F>(&self, load: F) -> Result<Option<Arc<Paginated<T>>>>
    where
        F: Future<Output = Result<Paginated<T>>>,
    {
        let ticket = self
            .issue(|_| true)
            .map(|(ticket, _)| ticket)
            .unwrap_or_default();
        let page = load.await?;

        Ok(self.install(ticket, page))
    }

    /// Move to the next page; `Ok(None)` if there is none or the result was superseded
    pub async fn next(&self) -> Result<Option<Arc<Paginated<T>>>> {
        let Some((ticket, current)) = self.issue(Paginated::has_next) else {
            return Ok(None);
        };
        let page = current.next().await?;

        Ok(self.install(ticket, page))
    }

    /// Move to the previous page; `Ok(None)` if there is none or the result was superseded
    pub async fn prev(&self) -> Result<Option<Arc<Paginated<T>>>> {
        let Some((ticket, current)) = self.issue(Paginated::has_prev) else {
            return Ok(None);
        };
        let page = current.prev().await?;

        Ok(self.install(ticket, page))
    }

    fn issue(&self, allowed: impl Fn(&Paginated<T>) -> bool) -> Option<(u64, Arc<Paginated<T>>)> {
        let mut state = self.state.lock();

        if !allowed(&state.current) {
            return None;
        }

        state.issued += 1;
        Some((state.issued, Arc::clone(&state.current)))
    }

    fn install(&self, ticket: u64, page: Paginated<T>) -> Option<Arc<Paginated<T>>> {
        let mut state = self.state.lock();

        if ticket != state.issued {
            debug!(ticket, latest = state.issued, "discarding superseded page");
            return None;
        }

        let page = Arc::new(page);
        state.current = Arc::clone(&page);

        Some(page)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime};
    use tokio::sync::Notify;

    use super::*;
    use crate::reports::interval::{IntervalPager, IntervalType};
    use crate::reports::paginated::{Fetched, PageLoader};
    use crate::utils::FixedClock;

    /// Loader labelling each page with its start date. When gated, the
    /// first navigation blocks until a later one has completed.
    struct ScriptedLoader {
        calls: AtomicUsize,
        gate: Option<Notify>,
    }

    impl ScriptedLoader {
        fn gated() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                gate: Some(Notify::new()),
            })
        }

        fn immediate() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                gate: None,
            })
        }
    }

    #[async_trait]
    impl PageLoader<String> for ScriptedLoader {
        async fn load(&self, pager: &IntervalPager, _now: NaiveDateTime) -> Result<Fetched<String>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(gate) = &self.gate {
                match call {
                    // Initial page
                    0 => {}
                    1 => gate.notified().await,
                    _ => gate.notify_one(),
                }
            }

            Ok(Fetched {
                data: vec![pager.current().start_date().to_string()],
                has_prev: true,
                has_next: true,
            })
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 15)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap()
    }

    async fn navigator(loader: Arc<ScriptedLoader>) -> Navigator<String> {
        let page = Paginated::<String>::create(
            loader,
            Arc::new(FixedClock(now())),
            IntervalPager::create(IntervalType::Monthly, now()),
        )
        .await
        .unwrap();

        Navigator::new(page)
    }

    #[tokio::test]
    async fn test_latest_navigation_wins() {
        let loader = ScriptedLoader::gated();
        let navigator = navigator(loader.clone()).await;

        let (stale, fresh) = tokio::join!(navigator.next(), navigator.prev());

        assert!(stale.unwrap().is_none());
        let fresh = fresh.unwrap().unwrap();
        assert_eq!(fresh.current().data, vec!["2024-04-01".to_string()]);
        assert_eq!(navigator.current().current().data, fresh.current().data);
        assert_eq!(loader.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_sequential_navigation_installs_each_page() {
        let navigator = navigator(ScriptedLoader::immediate()).await;

        let page = navigator.prev().await.unwrap().unwrap();
        assert_eq!(page.current().interval.start_date().to_string(), "2024-04-01");

        let page = navigator.prev().await.unwrap().unwrap();
        assert_eq!(page.current().interval.start_date().to_string(), "2024-03-01");
        assert!(Arc::ptr_eq(&page, &navigator.current()));
    }

    #[tokio::test]
    async fn test_placeholder_does_not_navigate() {
        let navigator = Navigator::<String>::placeholder();

        assert!(navigator.next().await.unwrap().is_none());
        assert!(navigator.prev().await.unwrap().is_none());
        assert!(navigator.current().is_placeholder());
    }

    #[tokio::test]
    async fn test_load_replaces_placeholder() {
        let navigator = Navigator::<String>::placeholder();
        let loader = ScriptedLoader::immediate();

        let page = navigator
            .load(Paginated::<String>::create(
                loader,
                Arc::new(FixedClock(now())),
                IntervalPager::create(IntervalType::Weekly, now()),
            ))
            .await
            .unwrap()
            .unwrap();

        assert!(!navigator.current().is_placeholder());
        assert_eq!(page.current().data, vec!["2024-05-13".to_string()]);
    }
}
