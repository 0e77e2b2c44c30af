//! Deprecation notices.

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tracing::warn;

/// One recorded use of deprecated template syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeprecationNotice {
    pub key: String,
    pub message: String,
}

/// Collects deprecation notices for the current request.
///
/// Every call to [`log`](Self::log) records a notice and emits a `warn!`.
#[derive(Debug, Default)]
pub struct Deprecator {
    notices: Mutex<Vec<DeprecationNotice>>,
}

impl Deprecator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self, key: impl Into<String>, message: impl Into<String>) {
        let notice = DeprecationNotice {
            key: key.into(),
            message: message.into(),
        };
        warn!(key = %notice.key, "{}", notice.message);
        self.lock().push(notice);
    }

    /// Notices recorded so far, oldest first.
    pub fn notices(&self) -> Vec<DeprecationNotice> {
        self.lock().clone()
    }

    pub fn total(&self) -> usize {
        self.lock().len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<DeprecationNotice>> {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
