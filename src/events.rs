//! Event System
//!
//! Types and implementations for worker events shown in the activity log.

use crate::error_classifier::LogLevel;
use crate::logging;
use chrono::Local;
use std::fmt::Display;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Worker {
    /// Worker that fetches proxy records from the backend.
    Refresher,
    /// Clipboard copies triggered from the dashboard.
    Clipboard,
    /// Session-level messages (login, identity changes).
    Session,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Refresh,
    Waiting,
    Shutdown,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Event {
    pub worker: Worker,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
}

impl Event {
    fn new(worker: Worker, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            worker,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
        }
    }

    pub fn refresher_with_level(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Worker::Refresher, msg, event_type, log_level)
    }

    pub fn clipboard(msg: String) -> Self {
        Self::new(Worker::Clipboard, msg, EventType::Success, LogLevel::Info)
    }

    pub fn session(msg: String) -> Self {
        Self::new(Worker::Session, msg, EventType::Refresh, LogLevel::Info)
    }

    pub fn should_display(&self) -> bool {
        // Always show success events and info level events
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        logging::passes_threshold(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.event_type, self.timestamp, self.msg)
    }
}
