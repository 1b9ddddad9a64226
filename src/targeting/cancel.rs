//! Per-invocation cancellation.
//!
//! A `CancellationToken` is created by whoever starts an ability and passed
//! to every targeting call that ability makes. Cancelling it resolves only
//! that ability's pending requests to "no target"; unrelated requests keep
//! waiting.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::channel::oneshot;

#[derive(Default)]
struct TokenInner {
    cancelled: Cell<bool>,
    waiters: RefCell<Vec<oneshot::Sender<()>>>,
}

/// Cloneable cancellation signal.
#[derive(Clone, Default)]
pub struct CancellationToken {
    inner: Rc<TokenInner>,
}

impl CancellationToken {
    /// A fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel and wake every waiter. Idempotent.
    pub fn cancel(&self) {
        self.inner.cancelled.set(true);
        let waiters = std::mem::take(&mut *self.inner.waiters.borrow_mut());
        for waiter in waiters {
            let _ = waiter.send(());
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.get()
    }

    /// Completes once the token is cancelled.
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        let (tx, rx) = oneshot::channel();
        self.inner.waiters.borrow_mut().push(tx);
        // The sender lives in `self` until `cancel`, so this only wakes on cancel.
        let _ = rx.await;
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
