use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::TabularResult;

/// Identifies the component that emitted a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SenderId(u64);

impl SenderId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SenderId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Receives the notifications of a query executor or statement provider.
///
/// Per run, either `error_received` fires alone, or `tabular_result_received`
/// fires followed by `entities_received`. Callbacks run on the background
/// task that completed the query.
pub trait QueryListener<T>: Send + Sync {
    fn error_received(&self, sender: SenderId, message: &str) {
        let _ = (sender, message);
    }

    fn tabular_result_received(&self, sender: SenderId, result: &TabularResult) {
        let _ = (sender, result);
    }

    fn entities_received(&self, sender: SenderId, entities: &[T]) {
        let _ = (sender, entities);
    }
}
