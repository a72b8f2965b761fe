#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
}

const READY_STATUS: &str = "Ready. Press Ctrl+S to submit.";

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_raw(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
    }

    pub fn editing(&mut self, label: &str) {
        self.message = format!("Editing {label}");
    }

    pub fn nothing_to_save(&mut self) {
        self.message = "No changes to save".to_string();
    }

    pub fn invalid(&mut self, count: usize, first: &str) {
        self.message = if count > 1 {
            format!("{first} (+{} more issue(s))", count - 1)
        } else {
            first.to_string()
        };
    }

    pub fn submitted(&mut self) {
        self.message = "Saved".to_string();
    }

    pub fn submit_failed(&mut self, reason: &str) {
        self.message = format!("Save failed: {reason}. Your input was kept.");
    }

    pub fn busy(&mut self) {
        self.message = "A save is already in progress".to_string();
    }

    pub fn pending_exit(&mut self) {
        self.message =
            "Unsaved changes. Press Ctrl+Q or Esc again to discard them and close.".to_string();
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
