//! Real-time change propagation to session observers.
//!
//! Clients watching a session (its detail view, or a pending request
//! they submitted) hold a WebSocket connection that is joined to that
//! session's room. Committed domain events flow from the event bus
//! through the bridge into the room's broadcast channel:
//!
//! ```text
//! command handler ──publish──▶ event bus
//!                                  │ subscribes
//!                                  ▼
//!                        SessionChangeBridge
//!                                  │ resolves session, broadcasts
//!                                  ▼
//!                         SessionChangeHub
//!                    room: session-A   room: session-B
//!                    ├── observer-1    └── observer-3
//!                    └── observer-2
//! ```
//!
//! # Components
//!
//! - [`messages`] - Wire protocol between server and observers
//! - [`hub`] - Room management keyed by session
//! - [`event_bridge`] - Bridge between the event bus and the hub

pub mod event_bridge;
pub mod hub;
pub mod messages;

pub use event_bridge::{SessionChangeBridge, REALTIME_EVENT_TYPES};
pub use hub::{ObserverId, SessionChangeHub};
pub use messages::{
    ChangeKind, ConnectedMessage, ErrorMessage, ObserverMessage, ServerMessage, SessionChange,
    SessionChangeMessage,
};
