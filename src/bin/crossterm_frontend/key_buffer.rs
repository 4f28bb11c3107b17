use crossterm::event::KeyCode;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

type Presses = VecDeque<(KeyCode, Instant)>;

/// Recent key presses, shared between the terminal listener and the emulator.
///
/// Terminals report presses but never releases,
/// so a key counts as held for `hold` after it was pressed.
/// Share it through an `Arc`.
pub struct KeyBuffer {
    hold: Duration,
    presses: Mutex<Presses>,
    arrived: Condvar,
}

impl KeyBuffer {
    pub fn new(hold: Duration) -> KeyBuffer {
        KeyBuffer {
            hold,
            presses: Mutex::new(VecDeque::new()),
            arrived: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Presses> {
        // A panicking holder cannot leave the queue half-written
        self.presses.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn forget_stale(&self, presses: &mut Presses) {
        while let Some(&(_, at)) = presses.front() {
            if at.elapsed() < self.hold {
                break;
            }
            presses.pop_front();
        }
    }

    /// Record a press and wake up anyone waiting for one.
    pub fn push(&self, key_code: KeyCode) {
        let mut presses = self.lock();
        self.forget_stale(&mut presses);
        presses.push_back((key_code, Instant::now()));
        self.arrived.notify_one();
    }

    /// Whether `key_code` was pressed recently enough to still count as held.
    pub fn contains(&self, key_code: KeyCode) -> bool {
        let mut presses = self.lock();
        self.forget_stale(&mut presses);
        presses.iter().any(|&(pressed, _)| pressed == key_code)
    }

    /// Take the oldest recent press, blocking until there is one.
    pub fn pop_blocking(&self) -> KeyCode {
        let mut presses = self.lock();
        loop {
            self.forget_stale(&mut presses);
            if let Some((key_code, _)) = presses.pop_front() {
                return key_code;
            }
            presses = self
                .arrived
                .wait(presses)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }
}
