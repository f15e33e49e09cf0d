use crate::state::WorkStatus;
use crate::PressError;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use url::Url;

/// Shared crawl state: the visited set and the pending-work table
///
/// Both collections live behind a single mutex so that claiming a URL and
/// registering it as pending happen in one indivisible step. A URL enters the
/// visited set at most once and never leaves it; it enters the pending table
/// when claimed and leaves it when its unit of work finishes.
#[derive(Debug, Default)]
pub struct CrawlState {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    visited: HashSet<Url>,
    pending: HashMap<Url, WorkStatus>,
}

impl CrawlState {
    /// Creates an empty crawl state
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self, operation: &'static str) -> Result<MutexGuard<'_, Inner>, PressError> {
        self.inner
            .lock()
            .map_err(|_| PressError::StatePoisoned(operation))
    }

    /// Atomically claims `url` for processing
    ///
    /// Returns `Ok(true)` iff this call inserted the URL into the visited set;
    /// the caller then owns the obligation to process it, and the URL is
    /// recorded as `Queued` in the pending table. Returns `Ok(false)` if the
    /// URL was already claimed by anyone, at any point during the run.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitepress::state::CrawlState;
    /// use url::Url;
    ///
    /// let state = CrawlState::new();
    /// let url = Url::parse("https://site.example/a").unwrap();
    /// assert!(state.try_claim(&url).unwrap());
    /// assert!(!state.try_claim(&url).unwrap());
    /// ```
    pub fn try_claim(&self, url: &Url) -> Result<bool, PressError> {
        let mut inner = self.lock("claim")?;
        if !inner.visited.insert(url.clone()) {
            return Ok(false);
        }
        inner.pending.insert(url.clone(), WorkStatus::Queued);
        Ok(true)
    }

    /// Marks a claimed URL as running
    pub fn start(&self, url: &Url) -> Result<(), PressError> {
        let mut inner = self.lock("start")?;
        match inner.pending.get_mut(url) {
            Some(status) => *status = WorkStatus::Running,
            None => {
                tracing::warn!("Starting {} which was not pending", url);
                inner.pending.insert(url.clone(), WorkStatus::Running);
            }
        }
        Ok(())
    }

    /// Removes a URL from the pending table once its unit of work is done
    pub fn finish(&self, url: &Url) -> Result<(), PressError> {
        let mut inner = self.lock("finish")?;
        if inner.pending.remove(url).is_none() {
            tracing::warn!("Finished {} which was not pending", url);
        }
        Ok(())
    }

    /// Returns true if the URL has been claimed during this run
    pub fn is_visited(&self, url: &Url) -> Result<bool, PressError> {
        Ok(self.lock("membership check")?.visited.contains(url))
    }

    /// Number of URLs claimed so far
    pub fn visited_count(&self) -> Result<usize, PressError> {
        Ok(self.lock("visited count")?.visited.len())
    }

    /// Number of URLs queued or running
    pub fn pending_count(&self) -> Result<usize, PressError> {
        Ok(self.lock("pending count")?.pending.len())
    }

    /// Number of URLs currently running
    pub fn running_count(&self) -> Result<usize, PressError> {
        Ok(self
            .lock("running count")?
            .pending
            .values()
            .filter(|status| status.is_running())
            .count())
    }

    /// Returns true when no URL is queued or running
    pub fn is_quiescent(&self) -> Result<bool, PressError> {
        Ok(self.lock("quiescence check")?.pending.is_empty())
    }

    /// Snapshot of the pending table, sorted by URL
    pub fn pending_snapshot(&self) -> Result<Vec<(Url, WorkStatus)>, PressError> {
        let inner = self.lock("pending snapshot")?;
        let mut snapshot: Vec<(Url, WorkStatus)> = inner
            .pending
            .iter()
            .map(|(url, status)| (url.clone(), *status))
            .collect();
        snapshot.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(snapshot)
    }

    /// All visited URLs, sorted
    pub fn visited_urls(&self) -> Result<Vec<Url>, PressError> {
        let inner = self.lock("visited listing")?;
        let mut urls: Vec<Url> = inner.visited.iter().cloned().collect();
        urls.sort();
        Ok(urls)
    }
}
