//! Dashboard session management.
//!
//! Each browser connection owns one [`DashboardSession`]. The base table is
//! shared read-only; the session only holds that connection's widget values.

use std::sync::Arc;

use salesboard::widgets::{REGION_WIDGET, SEGMENT_WIDGET, WidgetContext, WidgetValue};
use salesboard::{Dashboard, DashboardConfig};
use salesboard_core::{Dataset, FilterSelection};

use crate::error::{ServerError, ServerResult};
use crate::protocol::ServerMessage;

/// Filter state of one connection.
pub struct DashboardSession {
    dataset: Arc<Dataset>,
    config: DashboardConfig,
    widgets: WidgetContext,
}

impl DashboardSession {
    /// Create a session with every region and segment selected.
    pub fn new(dataset: Arc<Dataset>, config: DashboardConfig) -> Self {
        Self {
            dataset,
            config,
            widgets: WidgetContext::new(),
        }
    }

    /// Rebuild the dashboard for the current widget values.
    pub fn dashboard(&mut self) -> Dashboard {
        Dashboard::from_context(&self.dataset, &mut self.widgets, &self.config)
    }

    /// Current selection, as the widgets would resolve it.
    pub fn selection(&self) -> FilterSelection {
        self.widgets.clone().filter_selection(&self.dataset)
    }

    /// Get the full dashboard state message.
    pub fn get_state(&mut self) -> ServerMessage {
        ServerMessage::DashboardState {
            dashboard: Box::new(self.dashboard()),
        }
    }

    /// Store a widget value and return the refreshed dashboard.
    pub fn update_widget(&mut self, widget_id: &str, value: WidgetValue) -> ServerResult<ServerMessage> {
        if widget_id != REGION_WIDGET && widget_id != SEGMENT_WIDGET {
            return Err(ServerError::InvalidOperation(format!(
                "unknown widget '{}'",
                widget_id
            )));
        }
        tracing::debug!("Widget {} updated to {:?}", widget_id, value);
        self.widgets.set(widget_id, value);
        Ok(self.get_state())
    }

    /// Clear every widget value and return the refreshed dashboard.
    pub fn reset_filters(&mut self) -> ServerMessage {
        self.widgets.reset();
        self.get_state()
    }
}
