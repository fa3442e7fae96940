//! Typed event channel for out-of-band session notifications.
//!
//! The session pushes notifications (plot state changed, console prompt,
//! locator requested, busy toggled) that are not direct responses to any
//! request. Components subscribe to the [`EventBus`] with an [`EventFilter`]
//! and receive matching [`SessionEvent`]s on an `mpsc` channel; each
//! subscription lives as long as its receiver.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

use crate::model::plots::PlotsState;

// ─────────────────────────────────────────────────────────────────────────────
// EventKind – bitflags
// ─────────────────────────────────────────────────────────────────────────────

/// Bitflags describing the categories an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKind(pub u32);

impl EventKind {
    /// A new plot state is available (identifier, dimensions, manipulator).
    pub const PLOTS_CHANGED: Self = Self(1 << 0);
    /// The console returned to its input prompt.
    pub const CONSOLE_PROMPT: Self = Self(1 << 1);
    /// The session entered locator mode and wants a point picked.
    pub const LOCATOR: Self = Self(1 << 2);
    /// The session became busy / idle.
    pub const BUSY: Self = Self(1 << 3);

    /// Wildcard: matches every event kind.
    pub const ALL: Self = Self(u32::MAX);

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for EventKind {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for EventKind {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for EventKind {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "EMPTY");
        }
        if *self == EventKind::ALL {
            return write!(f, "ALL");
        }

        let pairs: &[(EventKind, &str)] = &[
            (EventKind::PLOTS_CHANGED, "PLOTS_CHANGED"),
            (EventKind::CONSOLE_PROMPT, "CONSOLE_PROMPT"),
            (EventKind::LOCATOR, "LOCATOR"),
            (EventKind::BUSY, "BUSY"),
        ];

        let mut names = Vec::new();
        let mut known_bits: u32 = 0;
        for (kind, name) in pairs {
            known_bits |= kind.0;
            if self.contains(*kind) {
                names.push((*name).to_string());
            }
        }
        let extra = self.0 & !known_bits;
        if extra != 0 {
            names.push(format!("0x{extra:x}"));
        }
        write!(f, "{}", names.join("|"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SessionEvent
// ─────────────────────────────────────────────────────────────────────────────

/// An out-of-band notification from the session. `kinds` says which
/// categories apply; the optional fields carry the matching payloads.
#[derive(Debug, Clone)]
pub struct SessionEvent {
    pub kinds: EventKind,
    /// Present for `PLOTS_CHANGED`.
    pub plots_state: Option<PlotsState>,
    /// Present for `BUSY`.
    pub busy: Option<bool>,
}

impl SessionEvent {
    pub fn plots_changed(state: PlotsState) -> Self {
        Self {
            kinds: EventKind::PLOTS_CHANGED,
            plots_state: Some(state),
            busy: None,
        }
    }

    pub fn console_prompt() -> Self {
        Self {
            kinds: EventKind::CONSOLE_PROMPT,
            plots_state: None,
            busy: None,
        }
    }

    pub fn locator() -> Self {
        Self {
            kinds: EventKind::LOCATOR,
            plots_state: None,
            busy: None,
        }
    }

    pub fn busy(busy: bool) -> Self {
        Self {
            kinds: EventKind::BUSY,
            plots_state: None,
            busy: Some(busy),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventFilter
// ─────────────────────────────────────────────────────────────────────────────

/// OR-mask selecting which event categories a subscriber receives: an event
/// is delivered when `event.kinds.intersects(filter.mask)`.
#[derive(Debug, Clone, Copy)]
pub struct EventFilter {
    pub mask: EventKind,
}

impl EventFilter {
    pub const fn all() -> Self {
        Self {
            mask: EventKind::ALL,
        }
    }

    pub const fn only(mask: EventKind) -> Self {
        Self { mask }
    }

    #[inline]
    pub fn matches(&self, event: &SessionEvent) -> bool {
        event.kinds.intersects(self.mask)
    }
}

impl Default for EventFilter {
    fn default() -> Self {
        Self::all()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventBus
// ─────────────────────────────────────────────────────────────────────────────

struct Subscriber {
    filter: EventFilter,
    sender: Sender<SessionEvent>,
}

/// Distributes session events to subscribers. Cloneable handle; the transport
/// side calls [`emit`](Self::emit), UI-side components drain their receivers
/// once per frame.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Mutex<BusInner>>,
}

struct BusInner {
    subscribers: Vec<Subscriber>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(BusInner {
                subscribers: Vec::new(),
            })),
        }
    }

    /// Subscribe to events matching `filter`.
    pub fn subscribe(&self, filter: EventFilter) -> Receiver<SessionEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut inner = self.inner.lock().unwrap();
        inner.subscribers.push(Subscriber { filter, sender: tx });
        rx
    }

    /// Subscribe to all events (no filtering).
    pub fn subscribe_all(&self) -> Receiver<SessionEvent> {
        self.subscribe(EventFilter::all())
    }

    /// Deliver `event` to all matching subscribers. Subscribers whose
    /// receiver was dropped are pruned on the first matching delivery.
    pub fn emit(&self, event: SessionEvent) {
        let mut inner = self.inner.lock().unwrap();
        inner.subscribers.retain(|sub| {
            if sub.filter.matches(&event) {
                sub.sender.send(event.clone()).is_ok()
            } else {
                true
            }
        });
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────
