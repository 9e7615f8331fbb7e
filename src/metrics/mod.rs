use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Counters describing how the frame has been driven so far.
#[derive(Debug, Default, Clone)]
pub struct FrameMetrics {
    windows_shown: u64,
    windows_hidden: u64,
    windows_enqueued: u64,
    panels_shown: u64,
    panels_hidden: u64,
    input_blocks: u64,
    rejected_requests: u64,
}

impl FrameMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_window_shown(&mut self) {
        self.windows_shown = self.windows_shown.saturating_add(1);
    }

    pub fn record_window_hidden(&mut self) {
        self.windows_hidden = self.windows_hidden.saturating_add(1);
    }

    pub fn record_window_enqueued(&mut self) {
        self.windows_enqueued = self.windows_enqueued.saturating_add(1);
    }

    pub fn record_panel_shown(&mut self) {
        self.panels_shown = self.panels_shown.saturating_add(1);
    }

    pub fn record_panel_hidden(&mut self) {
        self.panels_hidden = self.panels_hidden.saturating_add(1);
    }

    pub fn record_input_block(&mut self) {
        self.input_blocks = self.input_blocks.saturating_add(1);
    }

    pub fn record_rejected(&mut self) {
        self.rejected_requests = self.rejected_requests.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            windows_shown: self.windows_shown,
            windows_hidden: self.windows_hidden,
            windows_enqueued: self.windows_enqueued,
            panels_shown: self.panels_shown,
            panels_hidden: self.panels_hidden,
            input_blocks: self.input_blocks,
            rejected_requests: self.rejected_requests,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub windows_shown: u64,
    pub windows_hidden: u64,
    pub windows_enqueued: u64,
    pub panels_shown: u64,
    pub panels_hidden: u64,
    pub input_blocks: u64,
    pub rejected_requests: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "frame_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("windows_shown".to_string(), json!(self.windows_shown));
        map.insert("windows_hidden".to_string(), json!(self.windows_hidden));
        map.insert("windows_enqueued".to_string(), json!(self.windows_enqueued));
        map.insert("panels_shown".to_string(), json!(self.panels_shown));
        map.insert("panels_hidden".to_string(), json!(self.panels_hidden));
        map.insert("input_blocks".to_string(), json!(self.input_blocks));
        map.insert("rejected_requests".to_string(), json!(self.rejected_requests));
        map
    }
}
