// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Processing gate — admits one request at a time per dispatcher.
//
// A request must hold a `ProcessingTicket` while it touches an image. A second
// request arriving meanwhile is turned away with `PolybotError::Busy` rather
// than queued. The ticket releases on drop, so error paths cannot leave the
// gate stuck closed.

use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use polybot_core::error::{PolybotError, Result};
use tracing::{debug, warn};

/// Exclusive admission for one dispatcher. Clones share the same gate.
#[derive(Debug, Clone, Default)]
pub struct ProcessingGate {
    lock: Arc<Mutex<()>>,
}

/// Proof of admission; the gate reopens when this is dropped.
#[derive(Debug)]
pub struct ProcessingTicket<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl ProcessingGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the gate without waiting.
    pub fn try_acquire(&self) -> Result<ProcessingTicket<'_>> {
        match self.lock.try_lock() {
            Ok(guard) => {
                debug!("processing gate acquired");
                Ok(ProcessingTicket { _guard: guard })
            }
            Err(TryLockError::WouldBlock) => {
                warn!("previous request still processing, rejecting");
                Err(PolybotError::Busy)
            }
            // A panicking request poisons the mutex but guards no data.
            Err(TryLockError::Poisoned(poisoned)) => Ok(ProcessingTicket {
                _guard: poisoned.into_inner(),
            }),
        }
    }

    /// Whether a request currently holds the gate.
    pub fn is_busy(&self) -> bool {
        matches!(self.lock.try_lock(), Err(TryLockError::WouldBlock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;

    #[test]
    fn second_ticket_is_refused_until_first_drops() {
        let gate = ProcessingGate::new();
        let ticket = gate.try_acquire().unwrap();
        assert!(gate.is_busy());
        assert!(matches!(gate.try_acquire().unwrap_err(), PolybotError::Busy));

        drop(ticket);
        assert!(!gate.is_busy());
        assert!(gate.try_acquire().is_ok());
    }

    #[test]
    fn clones_share_the_gate_across_threads() {
        let gate = ProcessingGate::new();
        let other = gate.clone();
        let (held_tx, held_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let worker = thread::spawn(move || {
            let _ticket = other.try_acquire().unwrap();
            held_tx.send(()).unwrap();
            release_rx.recv().unwrap();
        });

        held_rx.recv().unwrap();
        assert!(matches!(gate.try_acquire().unwrap_err(), PolybotError::Busy));
        release_tx.send(()).unwrap();
        worker.join().unwrap();
        assert!(gate.try_acquire().is_ok());
    }

    #[test]
    fn separate_gates_are_independent() {
        let a = ProcessingGate::new();
        let b = ProcessingGate::new();
        let _held = a.try_acquire().unwrap();
        assert!(b.try_acquire().is_ok());
    }

    #[test]
    fn panicked_holder_does_not_wedge_the_gate() {
        let gate = ProcessingGate::new();
        let other = gate.clone();
        let _ = thread::spawn(move || {
            let _ticket = other.try_acquire().unwrap();
            panic!("filter blew up");
        })
        .join();
        assert!(gate.try_acquire().is_ok());
    }
}
