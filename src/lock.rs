// ABOUTME: Per-file async locks serializing concurrent edits to the same path
// ABOUTME: Acquisition is bounded by a timeout so contended edits fail instead of queueing forever
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// Registry of lazily-created locks keyed by resolved path
pub struct FileLocks {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
    timeout: Duration,
}

impl FileLocks {
    /// Create an empty registry with the given acquisition timeout
    pub fn new(timeout: Duration) -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
            timeout,
        }
    }

    /// Acquire the lock for `path`, or `None` if the timeout expires first
    ///
    /// The returned guard releases the lock when dropped.
    pub async fn acquire(&self, path: &Path) -> Option<OwnedMutexGuard<()>> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Entries only referenced by the map are idle
            locks.retain(|p, l| p == path || Arc::strong_count(l) > 1);
            Arc::clone(locks.entry(path.to_path_buf()).or_default())
        };

        let guard = tokio::time::timeout(self.timeout, lock.lock_owned())
            .await
            .ok();
        if guard.is_none() {
            debug!(path = %path.display(), timeout = ?self.timeout, "File lock timed out");
        }
        guard
    }
}
