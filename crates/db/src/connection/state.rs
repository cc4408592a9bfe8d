//! Connection state and the read-only status snapshot.

use serde::Serialize;

/// Where the database link is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionPhase {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
    Disconnecting,
}

impl ConnectionPhase {
    /// Numeric readiness code: 0 disconnected, 1 connected, 2 connecting,
    /// 3 disconnecting. `Error` reports as disconnected.
    pub fn ready_state(self) -> u8 {
        match self {
            ConnectionPhase::Disconnected | ConnectionPhase::Error => 0,
            ConnectionPhase::Connected => 1,
            ConnectionPhase::Connecting => 2,
            ConnectionPhase::Disconnecting => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionPhase::Disconnected => "disconnected",
            ConnectionPhase::Connecting => "connecting",
            ConnectionPhase::Connected => "connected",
            ConnectionPhase::Error => "error",
            ConnectionPhase::Disconnecting => "disconnecting",
        }
    }
}

/// Mutable state owned by the connection manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionState {
    pub phase: ConnectionPhase,
    /// Reconnection attempts since the last successful connect.
    pub attempts: u32,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub name: Option<String>,
    pub last_error: Option<String>,
}

/// Point-in-time view of the connection, as reported by the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub is_connected: bool,
    pub state: ConnectionPhase,
    pub ready_state: u8,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub name: Option<String>,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl From<&ConnectionState> for ConnectionStatus {
    fn from(state: &ConnectionState) -> Self {
        Self {
            is_connected: state.phase == ConnectionPhase::Connected,
            state: state.phase,
            ready_state: state.phase.ready_state(),
            host: state.host.clone(),
            port: state.port,
            name: state.name.clone(),
            attempts: state.attempts,
            last_error: state.last_error.clone(),
        }
    }
}
