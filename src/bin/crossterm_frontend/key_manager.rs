use super::key_buffer::KeyBuffer;
use crossterm::event::{self, Event, KeyCode};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How long a key counts as held after being pressed.
const HOLD: Duration = Duration::from_millis(250);
/// How often the listener looks at the stop flag.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Owns a thread that reads terminal key events for as long as the manager lives.
pub struct KeyManager {
    stopped: Arc<AtomicBool>,
    keys: Arc<KeyBuffer>,
    listener: Option<JoinHandle<()>>,
}

impl KeyManager {
    pub fn new() -> KeyManager {
        let stopped = Arc::new(AtomicBool::new(false));
        let keys = Arc::new(KeyBuffer::new(HOLD));
        let listener = spawn_listener(stopped.clone(), keys.clone());
        KeyManager {
            stopped,
            keys,
            listener: Some(listener),
        }
    }

    pub fn is_pressed(&self, key_code: KeyCode) -> bool {
        self.keys.contains(key_code)
    }

    /// Block until the next key press.
    pub fn next_key(&self) -> KeyCode {
        self.keys.pop_blocking()
    }
}

impl Drop for KeyManager {
    fn drop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
        if let Some(listener) = self.listener.take() {
            if listener.join().is_err() {
                log::error!("Key listener panicked");
            }
        }
    }
}

fn spawn_listener(stopped: Arc<AtomicBool>, keys: Arc<KeyBuffer>) -> JoinHandle<()> {
    thread::spawn(move || {
        while !stopped.load(Ordering::SeqCst) {
            match event::poll(POLL_INTERVAL).and_then(|ready| {
                if ready {
                    event::read().map(Some)
                } else {
                    Ok(None)
                }
            }) {
                Ok(Some(Event::Key(key_event))) => {
                    log::debug!("Key {:?}", key_event);
                    keys.push(key_event.code);
                }
                Ok(_) => {}
                Err(e) => {
                    log::error!("Could not read terminal events: {}", e);
                    break;
                }
            }
        }
    })
}
