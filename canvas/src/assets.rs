//! Object-URL bookkeeping for the uploaded image.
//!
//! An upload becomes an object URL that must be revoked exactly once. The
//! old URL stays live until its replacement has decoded, so the stage never
//! flashes a broken image. The ledger only decides *which* URLs to release;
//! the bridge does the actual `URL.revokeObjectURL`.

#[cfg(test)]
#[path = "assets_test.rs"]
mod assets_test;

/// Outcome of a finished load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    /// The URL is now live. `released` is the URL it replaced, if any.
    Applied { released: Option<String> },
    /// The URL was superseded before it finished loading and is already released.
    Stale,
}

/// Tracks the live image URL and at most one pending replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectUrlLedger {
    live: Option<String>,
    pending: Option<String>,
}

impl ObjectUrlLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// URL currently shown.
    #[must_use]
    pub fn live(&self) -> Option<&str> {
        self.live.as_deref()
    }

    /// URL still loading.
    #[must_use]
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Record a new upload. Returns URLs to release now: an older pending
    /// upload that this one supersedes.
    pub fn stage(&mut self, url: impl Into<String>) -> Vec<String> {
        self.pending.replace(url.into()).into_iter().collect()
    }

    /// The load for `url` finished.
    pub fn commit(&mut self, url: &str) -> Commit {
        if self.pending.as_deref() != Some(url) {
            log::debug!("assets: ignoring superseded load {url}");
            return Commit::Stale;
        }
        let next = self.pending.take();
        let released = std::mem::replace(&mut self.live, next);
        Commit::Applied { released }
    }

    /// The load for `url` failed. The layer is dropped, so both the failed
    /// URL and the one it would have replaced are released.
    pub fn fail(&mut self, url: &str) -> Vec<String> {
        if self.pending.as_deref() != Some(url) {
            return Vec::new();
        }
        self.pending.take().into_iter().chain(self.live.take()).collect()
    }

    /// Deletion or page teardown: release everything still held. A load
    /// finishing afterwards commits as [`Commit::Stale`].
    pub fn drain(&mut self) -> Vec<String> {
        self.live.take().into_iter().chain(self.pending.take()).collect()
    }
}
