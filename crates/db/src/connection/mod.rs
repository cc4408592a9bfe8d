//! Lifecycle management for the single logical database connection.
//!
//! [`ConnectionManager`] owns the pool and the [`ConnectionState`]. Lost
//! connections and scheduled retries are delivered as [`ConnectionEvent`]s
//! over a channel and handled by one listener task, so state is only ever
//! mutated by the manager.

pub mod events;
pub mod manager;
pub mod reconnect;
pub mod state;

pub use events::ConnectionEvent;
pub use manager::{ConnectionManager, Connector, PgConnector};
pub use reconnect::ReconnectPolicy;
pub use state::{ConnectionPhase, ConnectionState, ConnectionStatus};
