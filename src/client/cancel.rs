//! Per-attempt cancellation.
//!
//! A [`CancellationToken`] and its [`CancellationSignal`] are minted together.
//! The signal travels inside the request descriptor and wraps the in-flight
//! exchange; the token stays with whoever owns the attempt. Aborting the token
//! drops the exchange future, which cancels the underlying HTTP request, and
//! makes it resolve to [`FetchError::Aborted`].
//!
//! # Examples
//!
//! ```
//! use alias_fetch::client::CancellationToken;
//!
//! let (token, _signal) = CancellationToken::pair();
//! assert!(!token.is_aborted());
//! token.abort();
//! token.abort(); // no-op
//! assert!(token.is_aborted());
//! ```

use crate::error::{FetchError, Result};
use futures::future::{AbortHandle, AbortRegistration, Abortable};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Owner side of an attempt's cancellation.
///
/// Clones refer to the same attempt.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    handle: AbortHandle,
    aborted: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Mint a token together with the signal that observes it.
    pub fn pair() -> (CancellationToken, CancellationSignal) {
        let (handle, registration) = AbortHandle::new_pair();
        let token = CancellationToken {
            handle,
            aborted: Arc::new(AtomicBool::new(false)),
        };
        (token, CancellationSignal { registration })
    }

    /// Abort the attempt. Aborting more than once, or after the attempt
    /// finished, does nothing.
    pub fn abort(&self) {
        if !self.aborted.swap(true, Ordering::SeqCst) {
            self.handle.abort();
        }
    }

    /// Whether [`abort`](Self::abort) has been called.
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }
}

/// Observer side of an attempt's cancellation, carried by the descriptor.
#[derive(Debug)]
pub struct CancellationSignal {
    registration: AbortRegistration,
}

impl CancellationSignal {
    /// Run `future` until it completes or the paired token is aborted.
    pub async fn guard<F, T>(self, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match Abortable::new(future, self.registration).await {
            Ok(outcome) => outcome,
            Err(_aborted) => Err(FetchError::Aborted),
        }
    }
}
