// ── Regenerate control ──
//
// State of the "regenerate service actions" button: disabled with an
// info text while the request runs, re-enabled exactly once when it
// completes either way.

use tracing::{info, warn};

use crate::error::CoreError;

pub const RUNNING_TEXT: &str = "Running Generation...";
pub const SUCCESS_TEXT: &str = "Success generate ServiceAction list";
pub const FAILURE_TEXT: &str = "Error with generate ServiceAction list. See server logs.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegenerateControl {
    enabled: bool,
    info: Option<&'static str>,
}

impl Default for RegenerateControl {
    fn default() -> Self {
        Self {
            enabled: true,
            info: None,
        }
    }
}

impl RegenerateControl {
    /// Disable the control and show the running text. Returns `false`
    /// when a run is already in progress.
    pub fn begin(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        self.enabled = false;
        self.info = Some(RUNNING_TEXT);
        true
    }

    /// Record the outcome and re-enable. Returns `false` when no run was
    /// in progress, leaving the control untouched.
    pub fn finish(&mut self, result: &Result<(), CoreError>) -> bool {
        if self.enabled {
            return false;
        }
        self.enabled = true;
        self.info = Some(match result {
            Ok(()) => {
                info!("service actions regenerated");
                SUCCESS_TEXT
            }
            Err(e) => {
                warn!(error = %e, "service action regeneration failed");
                FAILURE_TEXT
            }
        });
        true
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn info(&self) -> Option<&'static str> {
        self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_disables_until_finish() {
        let mut control = RegenerateControl::default();
        assert!(control.begin());
        assert!(!control.is_enabled());
        assert_eq!(control.info(), Some(RUNNING_TEXT));
        assert!(!control.begin());

        assert!(control.finish(&Ok(())));
        assert!(control.is_enabled());
        assert_eq!(control.info(), Some(SUCCESS_TEXT));
    }

    #[test]
    fn failure_re_enables_exactly_once() {
        let mut control = RegenerateControl::default();
        control.begin();
        let failed = Err(CoreError::Rejected {
            status: 500,
            payload: "boom".into(),
        });

        assert!(control.finish(&failed));
        assert!(!control.finish(&Ok(())));
        assert!(control.is_enabled());
        assert_eq!(control.info(), Some(FAILURE_TEXT));
    }
}
