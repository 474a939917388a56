//! Collaborator seam
//!
//! The engine never talks to the child process or the window directly. It
//! calls out through [`Host`]: replies go to the child, dirty ranges and the
//! bell go to the window, and user-visible errors go to the message line.

use crate::core::DirtyRange;
use crate::error::TermError;

/// Outward-facing services the terminal engine relies on
pub trait Host {
    /// Queue bytes for the child process (non-blocking)
    fn send_to_child(&mut self, bytes: &[u8]);

    /// Ask the window to redraw `range`
    fn request_redraw(&mut self, _range: DirtyRange) {}

    fn bell(&mut self) {}

    /// Show an error to the user
    fn notify_error(&mut self, _err: &TermError) {}

    /// Show or hide the shell-input sub-window
    fn set_shell_input_visible(&mut self, _visible: bool) {}
}

/// A host that records every call
#[derive(Debug, Default)]
pub struct RecordingHost {
    /// Everything sent to the child, concatenated
    pub sent: Vec<u8>,
    pub redraws: Vec<DirtyRange>,
    pub bells: usize,
    pub errors: Vec<TermError>,
    /// Last visibility requested for the shell-input sub-window
    pub shell_input_visible: Option<bool>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain what was sent to the child
    pub fn take_sent(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.sent)
    }
}

impl Host for RecordingHost {
    fn send_to_child(&mut self, bytes: &[u8]) {
        self.sent.extend_from_slice(bytes);
    }

    fn request_redraw(&mut self, range: DirtyRange) {
        self.redraws.push(range);
    }

    fn bell(&mut self) {
        self.bells += 1;
    }

    fn notify_error(&mut self, err: &TermError) {
        self.errors.push(err.clone());
    }

    fn set_shell_input_visible(&mut self, visible: bool) {
        self.shell_input_visible = Some(visible);
    }
}
