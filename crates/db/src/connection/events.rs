//! Events consumed by the connection listener task.

/// Something happened to the database link that the manager must react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// An established connection stopped working (failed liveness probe or
    /// a connection-class error seen by a repository call).
    Lost { reason: String },

    /// The fixed reconnection delay elapsed; try to connect again.
    RetryDue,
}
