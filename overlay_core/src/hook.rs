// Hand-off between the OS input hook and the engine loop.
// The hook callback must return quickly: it only enqueues raw events with
// try_send and stores the latest pointer position in an atomic.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};

use crate::error::OverlayError;
use crate::types::*;

/// Raw events buffered between two ticks before new ones are dropped.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Latest pointer position, shared without locking.
///
/// Both coordinates are packed as `f32` bits into one `AtomicU64`, so a reader
/// never sees an x from one update paired with a y from another.
#[derive(Debug, Clone, Default)]
pub struct PointerCell {
    packed: Arc<AtomicU64>,
}

impl PointerCell {
    pub fn new(initial: ScreenPoint) -> Self {
        let cell = PointerCell::default();
        cell.store(initial);
        cell
    }

    pub fn store(&self, position: ScreenPoint) {
        let packed = ((position.x.to_bits() as u64) << 32) | position.y.to_bits() as u64;
        self.packed.store(packed, Ordering::Relaxed);
    }

    pub fn load(&self) -> ScreenPoint {
        let packed = self.packed.load(Ordering::Relaxed);
        ScreenPoint::new(
            f32::from_bits((packed >> 32) as u32),
            f32::from_bits(packed as u32),
        )
    }
}

/// Hook-side end of the raw event queue. Cheap to clone, never blocks.
#[derive(Debug, Clone)]
pub struct HookSender {
    tx: Sender<RawInput>,
    dropped: Arc<AtomicU64>,
}

impl HookSender {
    /// Enqueue a raw event. A full queue drops the event rather than stall the hook.
    pub fn send(&self, event: RawInput) -> Result<(), OverlayError> {
        match self.tx.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(event)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                log::warn!("[HOOK] Queue full, dropped {:?}", event.kind);
                Ok(())
            }
            Err(TrySendError::Disconnected(_)) => Err(OverlayError::HookDisconnected),
        }
    }

    /// Number of events dropped because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Engine-side end of the raw event queue.
#[derive(Debug)]
pub struct HookReceiver {
    rx: Receiver<RawInput>,
}

impl HookReceiver {
    /// Take every queued event, oldest first, without waiting.
    pub fn drain(&self) -> Vec<RawInput> {
        let mut events = Vec::with_capacity(self.rx.len());
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }
}

/// Create the bounded raw event queue.
pub fn input_channel(capacity: usize) -> (HookSender, HookReceiver) {
    let (tx, rx) = bounded(capacity.max(1));
    (
        HookSender {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        },
        HookReceiver { rx },
    )
}

/// Everything the OS hook thread needs: the event queue and the pointer cell.
#[derive(Debug, Clone)]
pub struct InputHook {
    pub events: HookSender,
    pub pointer: PointerCell,
}

impl InputHook {
    pub fn key_down(
        &self,
        timestamp: Timestamp,
        key: Key,
        ctrl: bool,
    ) -> Result<(), OverlayError> {
        self.events.send(RawInput::key_down(timestamp, key, ctrl))
    }

    pub fn key_up(
        &self,
        timestamp: Timestamp,
        key: Key,
        ctrl: bool,
    ) -> Result<(), OverlayError> {
        self.events.send(RawInput::key_up(timestamp, key, ctrl))
    }

    pub fn mouse_click(&self, timestamp: Timestamp, button: u8) -> Result<(), OverlayError> {
        self.events.send(RawInput {
            timestamp,
            kind: RawInputKind::MouseClick { button },
        })
    }

    pub fn pointer_moved(&self, position: ScreenPoint) {
        self.pointer.store(position);
    }
}
