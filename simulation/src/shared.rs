//! Single-writer handoff of the photon state to the views.
//!
//! The frame driver owns the only [`PhysicsWriter`]; views hold
//! [`PhysicsReader`]s. A publish replaces the whole [`PhotonSnapshot`] at once,
//! so a reader sees either the previous tick or the current one, never a mix.
//! Views must place the photon from a snapshot instead of re-deriving the
//! phase from β and time.
//!
//! The handles are `!Send`: all access happens on the thread that drives the
//! frame loop. Moving rendering to another thread means swapping the `Rc<Cell>`
//! for an `Arc`-backed slot while keeping whole-snapshot publication.

use std::cell::Cell;
use std::rc::Rc;

use crate::kinematics::{Direction, PhotonState};

/// The photon state as published for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotonSnapshot {
    /// Frame counter of the tick that wrote this snapshot.
    pub frame: u64,
    pub phase: f32,
    pub direction: Direction,
}

impl PhotonSnapshot {
    pub fn new(frame: u64, photon: PhotonState) -> Self {
        Self {
            frame,
            phase: photon.phase,
            direction: photon.direction,
        }
    }
}

/// Creates the writer/reader pair around an initial snapshot.
pub fn channel(initial: PhotonSnapshot) -> (PhysicsWriter, PhysicsReader) {
    let slot = Rc::new(Cell::new(initial));
    (
        PhysicsWriter {
            slot: Rc::clone(&slot),
        },
        PhysicsReader { slot },
    )
}

/// The write side. Deliberately not `Clone`.
#[derive(Debug)]
pub struct PhysicsWriter {
    slot: Rc<Cell<PhotonSnapshot>>,
}

impl PhysicsWriter {
    pub fn publish(&mut self, snapshot: PhotonSnapshot) {
        self.slot.set(snapshot);
    }

    pub fn reader(&self) -> PhysicsReader {
        PhysicsReader {
            slot: Rc::clone(&self.slot),
        }
    }
}

/// A read-only view of the latest published snapshot.
#[derive(Debug, Clone)]
pub struct PhysicsReader {
    slot: Rc<Cell<PhotonSnapshot>>,
}

impl PhysicsReader {
    pub fn snapshot(&self) -> PhotonSnapshot {
        self.slot.get()
    }

    pub fn phase(&self) -> f32 {
        self.slot.get().phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readers_see_latest_publish() {
        let (mut writer, reader) = channel(PhotonSnapshot::new(0, PhotonState::default()));
        let second = writer.reader();
        assert_eq!(reader.phase(), 0.5);

        let photon = PhotonState {
            phase: 0.75,
            direction: Direction::Down,
        };
        writer.publish(PhotonSnapshot::new(7, photon));

        for r in [&reader, &second] {
            let snap = r.snapshot();
            assert_eq!(snap.frame, 7);
            assert_eq!(snap.phase, 0.75);
            assert_eq!(snap.direction, Direction::Down);
        }
    }

    #[test]
    fn test_cloned_reader_shares_slot() {
        let (mut writer, reader) = channel(PhotonSnapshot::new(0, PhotonState::default()));
        let clone = reader.clone();
        writer.publish(PhotonSnapshot::new(
            1,
            PhotonState {
                phase: 0.1,
                direction: Direction::Up,
            },
        ));
        assert_eq!(clone.snapshot(), reader.snapshot());
    }
}
