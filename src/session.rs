//! Mode Transition Controller
//!
//! An editing session is either EDITING (the editor owns the view) or
//! TERMINAL (a [`Terminal`] owns it and the child's output scrolls through
//! it). Entering terminal mode snapshots the view settings the editor cares
//! about and starts a fresh engine seeded with the prompt line; leaving
//! appends everything the terminal produced to the permanent line store and
//! restores the snapshot.

use crate::app::TermConfig;
use crate::core::{DirtyRange, LineStore, VecLineStore};
use crate::error::SessionError;
use crate::host::Host;
use crate::input::Key;
use crate::terminal::Terminal;

/// Which state the session is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Editing,
    Terminal,
}

/// Outcome of a mode transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Changed,
    /// Already in the requested mode
    NoChange,
}

/// Scrollbar display of the editing view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollbarMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Sub-views of the editing window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewId {
    #[default]
    Main,
    /// The one-line shell input window
    ShellInput,
    /// The command line
    Command,
}

/// Editor view settings the terminal borrows while it runs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditorView {
    /// View holding the cursor
    pub active: ViewId,
    pub show_line_numbers: bool,
    pub first_visible_line: usize,
    pub insert_mode: bool,
    pub scrollbar: ScrollbarMode,
    /// Line the editing cursor is on
    pub cursor_line: usize,
}

/// What leaving terminal mode puts back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RestoreRecord {
    show_line_numbers: bool,
    first_visible_line: usize,
    insert_mode: bool,
    scrollbar: ScrollbarMode,
}

impl RestoreRecord {
    fn capture(view: &EditorView) -> Self {
        Self {
            show_line_numbers: view.show_line_numbers,
            first_visible_line: view.first_visible_line,
            insert_mode: view.insert_mode,
            scrollbar: view.scrollbar,
        }
    }

    fn apply(self, view: &mut EditorView) {
        view.show_line_numbers = self.show_line_numbers;
        view.first_visible_line = self.first_visible_line;
        view.insert_mode = self.insert_mode;
        view.scrollbar = self.scrollbar;
    }
}

/// One editing session and, while in terminal mode, its terminal
#[derive(Debug)]
pub struct Session<S: LineStore = VecLineStore> {
    config: TermConfig,
    view: EditorView,
    /// The permanent line store
    lines: S,
    terminal: Option<Terminal>,
    restore: Option<RestoreRecord>,
}

impl<S: LineStore> Session<S> {
    /// A session in EDITING mode over `lines`
    pub fn new(config: TermConfig, lines: S) -> Self {
        Self {
            config,
            view: EditorView::default(),
            lines,
            terminal: None,
            restore: None,
        }
    }

    pub fn mode(&self) -> Mode {
        if self.terminal.is_some() {
            Mode::Terminal
        } else {
            Mode::Editing
        }
    }

    pub fn view(&self) -> &EditorView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut EditorView {
        &mut self.view
    }

    pub fn lines(&self) -> &S {
        &self.lines
    }

    pub fn terminal(&self) -> Option<&Terminal> {
        self.terminal.as_ref()
    }

    pub fn terminal_mut(&mut self) -> Option<&mut Terminal> {
        self.terminal.as_mut()
    }

    /// EDITING to TERMINAL
    ///
    /// The last line of the permanent store is taken as the prompt and
    /// becomes the first line of the terminal view.
    pub fn enter_terminal(&mut self, host: &mut dyn Host) -> Transition {
        if self.terminal.is_some() {
            return Transition::NoChange;
        }

        self.view.active = ViewId::Main;
        self.restore = Some(RestoreRecord::capture(&self.view));
        self.view.show_line_numbers = false;
        self.view.insert_mode = false;

        let prompt = self
            .lines
            .total_lines()
            .checked_sub(1)
            .and_then(|last| self.lines.delete(last))
            .unwrap_or_default();

        let mut terminal = Terminal::new(self.config.clone());
        terminal.seed_prompt(prompt);
        let rows = terminal.screen().rows();
        self.terminal = Some(terminal);

        tracing::debug!(rows, "entered terminal mode");
        host.set_shell_input_visible(false);
        host.request_redraw(DirtyRange::Rows {
            first: 0,
            last: rows - 1,
        });
        Transition::Changed
    }

    /// TERMINAL to EDITING
    ///
    /// Every line the terminal produced is appended to the permanent store
    /// in order; renditions still on live lines are dropped.
    pub fn leave_terminal(&mut self, host: &mut dyn Host) -> Transition {
        let Some(terminal) = self.terminal.take() else {
            return Transition::NoChange;
        };

        let rows = terminal.screen().rows();
        let produced = terminal.into_lines();
        let count = produced.len();
        for line in produced {
            self.lines.append(line);
        }

        if let Some(record) = self.restore.take() {
            record.apply(&mut self.view);
        }
        self.view.active = ViewId::Main;
        self.view.cursor_line = self.lines.total_lines().saturating_sub(1);

        tracing::debug!(count, "left terminal mode");
        host.set_shell_input_visible(true);
        host.request_redraw(DirtyRange::Rows {
            first: 0,
            last: rows - 1,
        });
        Transition::Changed
    }

    /// Feed child output to the terminal and ask the host to redraw
    pub fn process_output(
        &mut self,
        data: &[u8],
        host: &mut dyn Host,
    ) -> Result<DirtyRange, SessionError> {
        let terminal = self.terminal.as_mut().ok_or(SessionError::NotInTerminalMode)?;
        let dirty = terminal.process(data, host);
        if !dirty.is_clean() {
            host.request_redraw(dirty);
        }
        Ok(dirty)
    }

    /// Translate a key press and send it to the child
    ///
    /// A locked keyboard drops the key. With local echo on, the bytes are
    /// also fed back through the terminal.
    pub fn send_key(&mut self, key: Key, host: &mut dyn Host) -> Result<(), SessionError> {
        let terminal = self.terminal.as_mut().ok_or(SessionError::NotInTerminalMode)?;
        if terminal.state().keyboard_locked {
            tracing::debug!(?key, "keyboard locked, dropping key");
            return Ok(());
        }
        let Some(bytes) = terminal.translate_key(key) else {
            return Ok(());
        };

        host.send_to_child(&bytes);
        if terminal.state().local_echo {
            let dirty = terminal.echo(&bytes, host);
            if !dirty.is_clean() {
                host.request_redraw(dirty);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;

    fn session(lines: &[&str]) -> Session {
        let store = VecLineStore::from_lines(lines.iter().map(|l| l.as_bytes().to_vec()));
        Session::new(TermConfig::default().with_size(4, 20), store)
    }

    #[test]
    fn test_enter_and_leave() {
        let mut session = session(&["earlier", "$ "]);
        session.view_mut().show_line_numbers = true;
        session.view_mut().insert_mode = true;
        session.view_mut().first_visible_line = 7;
        session.view_mut().active = ViewId::Command;
        let mut host = RecordingHost::new();

        assert_eq!(session.enter_terminal(&mut host), Transition::Changed);
        assert_eq!(session.mode(), Mode::Terminal);
        assert_eq!(session.view().active, ViewId::Main);
        assert!(!session.view().show_line_numbers);
        assert!(!session.view().insert_mode);
        assert_eq!(host.shell_input_visible, Some(false));
        assert_eq!(session.lines().total_lines(), 1);

        let terminal = session.terminal().unwrap();
        assert_eq!(terminal.screen().row_text(0), "$ ");
        assert_eq!(terminal.screen().cursor().col, 2);

        session.process_output(b"ls\r\nfile\r\n$ ", &mut host).unwrap();

        assert_eq!(session.leave_terminal(&mut host), Transition::Changed);
        assert_eq!(session.mode(), Mode::Editing);
        assert!(session.view().show_line_numbers);
        assert!(session.view().insert_mode);
        assert_eq!(session.view().first_visible_line, 7);
        assert_eq!(host.shell_input_visible, Some(true));

        let lines: Vec<&[u8]> = session.lines().iter().collect();
        assert_eq!(lines, vec![&b"earlier"[..], b"$ ls", b"file", b"$ "]);
        assert_eq!(session.view().cursor_line, 3);
    }

    #[test]
    fn test_transitions_are_idempotent() {
        let mut session = session(&[]);
        let mut host = RecordingHost::new();

        assert_eq!(session.leave_terminal(&mut host), Transition::NoChange);
        assert_eq!(session.enter_terminal(&mut host), Transition::Changed);
        session.process_output(b"typed", &mut host).unwrap();
        assert_eq!(session.enter_terminal(&mut host), Transition::NoChange);
        assert_eq!(session.terminal().unwrap().screen().row_text(0), "typed");
    }

    #[test]
    fn test_requires_terminal_mode() {
        let mut session = session(&[]);
        let mut host = RecordingHost::new();
        assert_eq!(
            session.process_output(b"x", &mut host),
            Err(SessionError::NotInTerminalMode)
        );
        assert_eq!(
            session.send_key(Key::Char(b'x'), &mut host),
            Err(SessionError::NotInTerminalMode)
        );
    }

    #[test]
    fn test_process_output_requests_redraw() {
        let mut session = session(&[]);
        let mut host = RecordingHost::new();
        session.enter_terminal(&mut host);
        host.redraws.clear();

        let dirty = session.process_output(b"hi", &mut host).unwrap();
        assert_eq!(host.redraws, vec![dirty]);
        session.process_output(b"", &mut host).unwrap();
        assert_eq!(host.redraws.len(), 1);
    }

    #[test]
    fn test_send_key_modes() {
        let mut session = session(&[]);
        let mut host = RecordingHost::new();
        session.enter_terminal(&mut host);

        session.send_key(Key::Up, &mut host).unwrap();
        assert_eq!(host.take_sent(), b"\x1b[A");

        // Local echo
        session.process_output(b"\x1b[12l", &mut host).unwrap();
        session.send_key(Key::Char(b'k'), &mut host).unwrap();
        assert_eq!(host.take_sent(), b"k");
        assert_eq!(session.terminal().unwrap().screen().row_text(0), "k");

        // Echo while the child's sequence is incomplete
        session.process_output(b"\x1b[2", &mut host).unwrap();
        session.send_key(Key::Char(b'j'), &mut host).unwrap();
        session.process_output(b"Gy", &mut host).unwrap();
        assert_eq!(host.take_sent(), b"j");
        assert_eq!(session.terminal().unwrap().screen().row_text(0), "ky");

        // Keyboard locked
        session.process_output(b"\x1b[2h", &mut host).unwrap();
        session.send_key(Key::Char(b'z'), &mut host).unwrap();
        assert!(host.take_sent().is_empty());
    }
}
