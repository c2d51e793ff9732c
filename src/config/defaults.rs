//! Default value functions for configuration.

use topic_proto::transport::MAX_LINE_LEN;

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

// =============================================================================
// Connection Defaults
// =============================================================================

pub fn default_keepalive_secs() -> u64 {
    120
}

pub fn default_keepalive_interval_secs() -> u64 {
    30
}

pub fn default_max_line_len() -> usize {
    MAX_LINE_LEN
}

// =============================================================================
// Console Defaults
// =============================================================================

pub fn default_event_queue() -> usize {
    256
}

// =============================================================================
// Logging Defaults
// =============================================================================

pub fn default_log_filter() -> String {
    "warn".to_string()
}
