// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-operation-class in-flight markers.
//!
//! At most one call of a class is outstanding. A second call is either
//! rejected (`Reject`, or `Supersede` with the same key) or replaces the
//! outstanding one (`Supersede` with a different key). A replaced call
//! is aborted and, if its result still arrives, it is discarded without
//! touching the marker of its successor.

use crate::error::NetworkError;
use futures_util::future::{AbortHandle, AbortRegistration, Abortable};
use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::future::Future;

/// What a new call does when another call of the class is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPolicy {
    /// Reject every call while one is outstanding.
    Reject,
    /// Reject a call with the same key; cancel and replace one with a different key.
    Supersede,
}

struct Outstanding<K> {
    key: K,
    generation: u64,
    abort: AbortHandle,
}

/// In-flight marker for one operation class.
pub struct SingleFlight<K> {
    name: &'static str,
    policy: FlightPolicy,
    slot: RefCell<Option<Outstanding<K>>>,
    generation: Cell<u64>,
}

impl<K: Clone + PartialEq + Debug> SingleFlight<K> {
    pub fn new(name: &'static str, policy: FlightPolicy) -> Self {
        Self {
            name,
            policy,
            slot: RefCell::new(None),
            generation: Cell::new(0),
        }
    }

    /// Whether a call of this class is outstanding.
    pub fn is_outstanding(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Key of the outstanding call, if any.
    pub fn outstanding_key(&self) -> Option<K> {
        self.slot.borrow().as_ref().map(|o| o.key.clone())
    }

    /// Claim the marker for `key`.
    pub fn begin(&self, key: K) -> Result<Flight<'_, K>, NetworkError> {
        let mut slot = self.slot.borrow_mut();

        if let Some(current) = slot.as_ref() {
            let reject = match self.policy {
                FlightPolicy::Reject => true,
                FlightPolicy::Supersede => current.key == key,
            };
            if reject {
                tracing::debug!(
                    operation = self.name,
                    key = ?key,
                    "Rejecting duplicate request"
                );
                return Err(NetworkError::DuplicateRequest);
            }

            tracing::debug!(
                operation = self.name,
                previous = ?current.key,
                next = ?key,
                "Cancelling superseded request"
            );
            current.abort.abort();
        }

        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);

        let (abort, registration) = AbortHandle::new_pair();
        *slot = Some(Outstanding {
            key,
            generation,
            abort,
        });

        Ok(Flight {
            owner: self,
            generation,
            registration: Some(registration),
        })
    }

    fn is_current(&self, generation: u64) -> bool {
        matches!(self.slot.borrow().as_ref(), Some(o) if o.generation == generation)
    }

    fn release(&self, generation: u64) {
        let mut slot = self.slot.borrow_mut();
        if matches!(slot.as_ref(), Some(o) if o.generation == generation) {
            *slot = None;
        }
    }
}

/// A claimed marker. The marker is released exactly once: when the flight
/// finishes, fails, or is dropped, and only if it has not been superseded.
pub struct Flight<'a, K: Clone + PartialEq + Debug> {
    owner: &'a SingleFlight<K>,
    generation: u64,
    registration: Option<AbortRegistration>,
}

impl<K: Clone + PartialEq + Debug> Flight<'_, K> {
    /// Drive `request` to completion and release the marker.
    ///
    /// A superseded flight returns [`NetworkError::Cancelled`] whatever the
    /// request produced.
    pub async fn run<T, F>(mut self, request: F) -> Result<T, NetworkError>
    where
        F: Future<Output = Result<T, NetworkError>>,
    {
        let outcome = match self.registration.take() {
            Some(registration) => Abortable::new(request, registration).await,
            None => Ok(request.await),
        };

        let current = self.owner.is_current(self.generation);
        drop(self);

        match outcome {
            Ok(result) if current => result,
            _ => Err(NetworkError::Cancelled),
        }
    }
}

impl<K: Clone + PartialEq + Debug> Drop for Flight<'_, K> {
    fn drop(&mut self) {
        self.owner.release(self.generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::poll;
    use std::task::Poll;
    use tokio::sync::Notify;

    #[tokio::test]
    async fn test_reject_policy_blocks_second_call() {
        let flight = SingleFlight::new("page", FlightPolicy::Reject);
        let first = flight.begin(1u32).unwrap();

        assert_eq!(flight.begin(2).err(), Some(NetworkError::DuplicateRequest));
        assert!(flight.is_outstanding());

        let result = first.run(async { Ok::<_, NetworkError>(7) }).await;
        assert_eq!(result, Ok(7));
        assert!(!flight.is_outstanding());
    }

    #[tokio::test]
    async fn test_marker_released_on_failure() {
        let flight = SingleFlight::new("like", FlightPolicy::Reject);
        let result = flight
            .begin(())
            .unwrap()
            .run(async { Err::<(), _>(NetworkError::HttpStatus(500)) })
            .await;

        assert_eq!(result, Err(NetworkError::HttpStatus(500)));
        assert!(!flight.is_outstanding());
    }

    #[tokio::test]
    async fn test_marker_released_when_dropped() {
        let flight = SingleFlight::new("page", FlightPolicy::Reject);
        let claimed = flight.begin(1u32).unwrap();
        drop(claimed);
        assert!(!flight.is_outstanding());
    }

    #[tokio::test]
    async fn test_supersede_same_key_is_duplicate() {
        let flight = SingleFlight::new("token", FlightPolicy::Supersede);
        let _first = flight.begin("abc".to_string()).unwrap();
        assert_eq!(
            flight.begin("abc".to_string()).err(),
            Some(NetworkError::DuplicateRequest)
        );
    }

    #[tokio::test]
    async fn test_superseded_flight_is_cancelled_and_keeps_successor_marker() {
        let flight = SingleFlight::new("token", FlightPolicy::Supersede);
        let gate = Notify::new();

        let first = flight.begin("old".to_string()).unwrap().run(async {
            gate.notified().await;
            Ok::<_, NetworkError>("old-token")
        });
        tokio::pin!(first);
        assert!(matches!(poll!(&mut first), Poll::Pending));

        let second = flight.begin("new".to_string()).unwrap();
        assert_eq!(flight.outstanding_key(), Some("new".to_string()));

        assert_eq!(first.await, Err(NetworkError::Cancelled));
        assert_eq!(
            flight.outstanding_key(),
            Some("new".to_string()),
            "stale completion must not clear the successor's marker"
        );

        let result = second.run(async { Ok::<_, NetworkError>("new-token") }).await;
        assert_eq!(result, Ok("new-token"));
        assert!(!flight.is_outstanding());
    }
}
