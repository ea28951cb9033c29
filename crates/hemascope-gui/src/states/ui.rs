use std::path::PathBuf;

use hemascope_core::case::CaseData;

const MAX_LOG_LINES: usize = 500;

/// Overall UI state.
#[derive(Default)]
pub struct UIState {
    pub case_path: Option<PathBuf>,
    pub case: Option<CaseData>,

    /// A case or image request is in flight.
    pub busy: bool,

    pub dark_mode: bool,
    pub show_about: bool,

    /// Log messages.
    pub log_messages: Vec<String>,
}

impl UIState {
    pub fn new() -> Self {
        Self {
            dark_mode: true,
            ..Self::default()
        }
    }

    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > MAX_LOG_LINES {
            let excess = self.log_messages.len() - MAX_LOG_LINES;
            self.log_messages.drain(..excess);
        }
    }
}
