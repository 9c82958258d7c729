//! Geofence request coordination state machine.
//!
//! The coordinator mediates between a caller's intent ("add this fence" /
//! "remove this fence by id") and an external location backend, ensuring
//! only one operation is in flight and routing backend callbacks to
//! completion.
//!
//! # Protocol
//!
//! ```text
//! Disconnected --request_add/request_remove--> Connecting
//! Connecting --on_connected--> Connected            (remove: execute now)
//! Connecting --on_connected--> Preparing            (add: async preparation)
//! Preparing --on_prepared--> Connected              (execute add)
//! Connected --on_operation_result--> Disconnected   (explicit disconnect)
//! Connecting/Preparing/Connected --on_connection_failed--> Disconnected
//!     (resolvable: a resolution ticket is retained; on_resolution(true)
//!      re-arms the pending operation and retries the connection once)
//! Connecting --on_disconnected--> Disconnected
//! any in-flight --on_timeout--> Disconnected
//! ```
//!
//! Terminal state after any path is `Disconnected`; the coordinator must be
//! re-armed by a new request to reconnect. The backend connection handle is
//! owned by exactly one session and never reused after disconnection.
//!
//! # Effects
//!
//! [`RequestCoordinator`] is a pure, synchronous machine: caller requests
//! and backend callbacks mutate session state and emit [`Effect`] values
//! describing what the adapter must do next (connect, register fences,
//! notify the host). The async side lives in [`crate::service`], which
//! executes effects against a [`crate::backend::LocationBackend`]. This
//! split keeps the machine fully testable without a backend.

mod machine;
mod outcome;
mod session;

pub use machine::{Effect, RequestAck, RequestCoordinator};
pub use outcome::{SessionError, SessionOutcome, TimeoutPhase};
pub use session::{ConnectionSession, PendingOperation, SessionState};
