//! Terminal Engine
//!
//! Ties together the dispatcher, the terminal state and the screen model.
//! This is the main integration point: child output goes in through
//! [`Terminal::process`], key presses come out through
//! [`Terminal::translate_key`].

use crate::app::TermConfig;
use crate::core::{DirtyRange, Screen, Snapshot, TerminalState};
use crate::extract::ColorEncoding;
use crate::host::Host;
use crate::input::{self, Key, KeyModes};
use crate::parser::Dispatcher;

/// One terminal session's engine
#[derive(Debug)]
pub struct Terminal {
    state: TerminalState,
    screen: Screen,
    dispatcher: Dispatcher,
    /// Parses locally echoed keys apart from the child's stream
    echo: Dispatcher,
    config: TermConfig,
}

impl Terminal {
    /// Create a terminal sized and configured by `config`
    pub fn new(config: TermConfig) -> Self {
        let mut screen = Screen::new(config.rows, config.cols, config.max_line_len);
        screen.set_history_renditions(config.history_renditions);
        Self {
            state: TerminalState::new(config.rows, config.cols, config.autowrap),
            screen,
            dispatcher: Dispatcher::new(config.identity),
            echo: Dispatcher::new(config.identity),
            config,
        }
    }

    pub fn state(&self) -> &TerminalState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut TerminalState {
        &mut self.state
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn config(&self) -> &TermConfig {
        &self.config
    }

    /// Bytes of an escape sequence cut off at the end of the last chunk
    pub fn pending(&self) -> &[u8] {
        self.dispatcher.pending()
    }

    /// Process a chunk of child output
    ///
    /// Chunks may split escape sequences anywhere; the result is the same
    /// as feeding the bytes in one piece. Returns what needs redrawing.
    pub fn process(&mut self, data: &[u8], host: &mut dyn Host) -> DirtyRange {
        self.dispatcher
            .process(data, &mut self.state, &mut self.screen, host)
    }

    /// Show bytes typed by the user (local echo)
    ///
    /// Echoed bytes never join a sequence the child left unfinished.
    pub fn echo(&mut self, data: &[u8], host: &mut dyn Host) -> DirtyRange {
        self.echo
            .process(data, &mut self.state, &mut self.screen, host)
    }

    /// Bytes the child should receive for `key` in the current modes
    pub fn translate_key(&self, key: Key) -> Option<Vec<u8>> {
        input::translate_key(key, KeyModes::from(&self.state))
    }

    /// Power-on modes, margins and tab stops; the screen is kept
    pub fn reset(&mut self) {
        self.state.reset();
        self.dispatcher.reset();
        self.echo.reset();
    }

    /// Start the view with `prompt` on its first line
    pub fn seed_prompt(&mut self, prompt: Vec<u8>) {
        self.screen.seed_prompt(prompt);
    }

    /// A history line with its renditions recovered through the color table
    pub fn history_colored(&self, line: usize) -> Option<(Vec<u8>, Option<ColorEncoding>)> {
        self.screen.history_colored(line, &self.config.color_table)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.screen, &self.state, &self.config.color_table)
    }

    /// Tear down the engine, returning history and used live lines as text
    pub fn into_lines(self) -> Vec<Vec<u8>> {
        self.screen.into_lines()
    }
}
