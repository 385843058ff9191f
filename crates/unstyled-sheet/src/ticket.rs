#![forbid(unsafe_code)]

//! Settle tickets: awaitable handles for explicit-target settles.
//!
//! [`SheetState::animate_to`](crate::SheetState::animate_to) returns a
//! [`SettleTicket`]. The sheet keeps the matching [`TicketResolver`] with the
//! in-flight settle and resolves it exactly once:
//!
//! - [`SettleOutcome::Reached`] when the settle lands on its target;
//! - [`SettleOutcome::Superseded`] when a later settle, a drag grab, or a
//!   jump replaces it, or when the sheet is dropped first.
//!
//! Supersession is not an error. The ticket implements [`Future`] so async
//! hosts can `.await` it; frame-driven hosts poll [`SettleTicket::outcome`].

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll, Waker};

use crate::detent::Detent;

/// How an explicit-target settle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleOutcome {
    /// The sheet came to rest at the requested detent.
    Reached(Detent),
    /// A later request replaced this one before it finished.
    Superseded,
}

impl SettleOutcome {
    /// Whether the settle reached its target.
    #[inline]
    #[must_use]
    pub fn is_reached(&self) -> bool {
        matches!(self, Self::Reached(_))
    }
}

#[derive(Debug, Default)]
struct TicketInner {
    outcome: Option<SettleOutcome>,
    waker: Option<Waker>,
}

fn lock(inner: &Mutex<TicketInner>) -> MutexGuard<'_, TicketInner> {
    inner.lock().unwrap_or_else(|e| e.into_inner())
}

/// Observer side of a settle. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SettleTicket {
    inner: Arc<Mutex<TicketInner>>,
}

/// Resolver side of a settle, held by the sheet.
///
/// Dropping an unresolved resolver resolves the ticket as superseded.
#[derive(Debug)]
pub struct TicketResolver {
    inner: Arc<Mutex<TicketInner>>,
}

impl SettleTicket {
    /// Create a linked ticket/resolver pair.
    #[must_use]
    pub fn pair() -> (Self, TicketResolver) {
        let inner = Arc::new(Mutex::new(TicketInner::default()));
        (
            Self {
                inner: Arc::clone(&inner),
            },
            TicketResolver { inner },
        )
    }

    /// A ticket that is already resolved.
    #[must_use]
    pub fn resolved(outcome: SettleOutcome) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TicketInner {
                outcome: Some(outcome),
                waker: None,
            })),
        }
    }

    /// The outcome, once the settle has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<SettleOutcome> {
        lock(&self.inner).outcome.clone()
    }

    /// Whether the settle has ended.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        lock(&self.inner).outcome.is_some()
    }
}

impl Future for SettleTicket {
    type Output = SettleOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut inner = lock(&self.inner);
        match &inner.outcome {
            Some(outcome) => Poll::Ready(outcome.clone()),
            None => {
                inner.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

impl TicketResolver {
    /// Resolve the ticket. Later resolutions are ignored.
    pub fn resolve(self, outcome: SettleOutcome) {
        self.resolve_in_place(outcome);
    }

    fn resolve_in_place(&self, outcome: SettleOutcome) {
        let waker = {
            let mut inner = lock(&self.inner);
            if inner.outcome.is_some() {
                return;
            }
            inner.outcome = Some(outcome);
            inner.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl Drop for TicketResolver {
    fn drop(&mut self) {
        self.resolve_in_place(SettleOutcome::Superseded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::Wake;

    struct CountingWaker(AtomicUsize);

    impl Wake for CountingWaker {
        fn wake(self: Arc<Self>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn starts_unresolved() {
        let (ticket, _resolver) = SettleTicket::pair();
        assert!(!ticket.is_resolved());
        assert_eq!(ticket.outcome(), None);
    }

    #[test]
    fn resolve_reaches_all_clones() {
        let (ticket, resolver) = SettleTicket::pair();
        let clone = ticket.clone();
        resolver.resolve(SettleOutcome::Reached(Detent::hidden()));
        assert_eq!(ticket.outcome(), Some(SettleOutcome::Reached(Detent::hidden())));
        assert!(clone.outcome().is_some_and(|o| o.is_reached()));
    }

    #[test]
    fn dropping_resolver_supersedes() {
        let (ticket, resolver) = SettleTicket::pair();
        drop(resolver);
        assert_eq!(ticket.outcome(), Some(SettleOutcome::Superseded));
    }

    #[test]
    fn poll_registers_and_wakes() {
        let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));
        let waker = Waker::from(Arc::clone(&counter));
        let mut cx = Context::from_waker(&waker);

        let (mut ticket, resolver) = SettleTicket::pair();
        assert!(Pin::new(&mut ticket).poll(&mut cx).is_pending());

        resolver.resolve(SettleOutcome::Superseded);
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
        assert_eq!(
            Pin::new(&mut ticket).poll(&mut cx),
            Poll::Ready(SettleOutcome::Superseded)
        );
    }

    #[test]
    fn already_resolved_ticket_is_ready() {
        let mut ticket = SettleTicket::resolved(SettleOutcome::Reached(Detent::fully_expanded()));
        let mut cx = Context::from_waker(Waker::noop());
        assert!(Pin::new(&mut ticket).poll(&mut cx).is_ready());
    }
}
