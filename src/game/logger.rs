//! Centralized logger for game events

use serde::{Deserialize, Serialize};

/// How much the logger reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum VerbosityLevel {
    Silent,
    Minimal,
    #[default]
    Normal,
    Verbose,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Capture only to the in-memory buffer (default: the engine is usually
    /// embedded, the host decides what to surface)
    #[default]
    Memory,
    /// Output only to stdout
    Stdout,
    /// Both stdout and the in-memory buffer
    Both,
}

/// A captured log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
}

/// Game event logger with an in-memory buffer
#[derive(Debug, Clone, Default)]
pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    buffer: Vec<LogEntry>,
}

impl GameLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            ..Self::default()
        }
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn log(&mut self, level: VerbosityLevel, message: impl Into<String>) {
        if level > self.verbosity || self.verbosity == VerbosityLevel::Silent {
            return;
        }
        let message = message.into();
        if matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both) {
            println!("{}", message);
        }
        if matches!(self.output_mode, OutputMode::Memory | OutputMode::Both) {
            self.buffer.push(LogEntry { level, message });
        }
    }

    /// Normal-verbosity event
    pub fn event(&mut self, message: impl Into<String>) {
        self.log(VerbosityLevel::Normal, message);
    }

    /// Verbose-only detail
    pub fn detail(&mut self, message: impl Into<String>) {
        self.log(VerbosityLevel::Verbose, message);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
