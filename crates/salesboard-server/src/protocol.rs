//! WebSocket protocol messages for the Salesboard server.
//!
//! Defines the message types exchanged between client and server.

use serde::{Deserialize, Serialize};

use salesboard::Dashboard;
use salesboard::widgets::WidgetValue;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Request the dashboard for the current selection.
    GetState,

    /// Update a widget value.
    WidgetUpdate {
        /// Widget identifier (`region` or `segment`).
        widget_id: String,
        /// New widget value.
        value: WidgetValue,
    },

    /// Select every region and segment again.
    ResetFilters,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full dashboard snapshot.
    DashboardState {
        /// Widgets, KPI cards, statistic cards and figures.
        dashboard: Box<Dashboard>,
    },

    /// Error message.
    Error {
        /// Error description.
        message: String,
    },
}
