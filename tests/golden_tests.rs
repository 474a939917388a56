//! Golden tests for the terminal engine
//!
//! Each test feeds a byte sequence to a terminal and compares the resulting
//! screen, cursor, history and replies against the expected state.

use padterm::core::{LineStore, Snapshot};
use padterm::extract::extract;
use padterm::input::Key;
use padterm::{RecordingHost, TermConfig, TermError, Terminal};

/// Run a golden test, returning the terminal and everything it replied
fn run_golden_test(input: &[u8], rows: usize, cols: usize) -> (Terminal, RecordingHost) {
    let mut terminal = Terminal::new(TermConfig::default().with_size(rows, cols));
    let mut host = RecordingHost::new();
    terminal.process(input, &mut host);
    (terminal, host)
}

/// Same, feeding the input in chunks of `chunk_size` bytes
fn run_golden_test_chunked(input: &[u8], rows: usize, cols: usize, chunk_size: usize) -> Snapshot {
    let mut terminal = Terminal::new(TermConfig::default().with_size(rows, cols));
    let mut host = RecordingHost::new();
    for chunk in input.chunks(chunk_size) {
        terminal.process(chunk, &mut host);
    }
    terminal.snapshot()
}

// ============================================================================
// Basic printing and cursor motion
// ============================================================================

#[test]
fn test_cursor_movement() {
    // Hello[3C]World[2D]XX[H][2J][5;10H]Positioned
    let input = b"Hello\x1b[3CWorld\x1b[2DXX\x1b[H\x1b[2J\x1b[5;10HPositioned";
    let (terminal, _) = run_golden_test(input, 24, 80);

    assert_eq!(terminal.screen().row_text(0), "");
    assert_eq!(terminal.screen().row_text(4), "         Positioned");
    assert_eq!(terminal.screen().cursor().row, 4);
    assert_eq!(terminal.screen().cursor().col, 19);
}

#[test]
fn test_relative_motion_clamps_to_region() {
    let (terminal, _) = run_golden_test(b"\x1b[3;6r\x1b[4;1H\x1b[20B", 10, 20);
    assert_eq!(terminal.screen().cursor().row, 5);

    let (terminal, _) = run_golden_test(b"\x1b[3;6r\x1b[4;1H\x1b[20A", 10, 20);
    assert_eq!(terminal.screen().cursor().row, 2);

    // Outside the region the whole screen is the limit
    let (terminal, _) = run_golden_test(b"\x1b[3;6r\x1b[9;1H\x1b[20B\x1b[99C", 10, 20);
    assert_eq!(terminal.screen().cursor().row, 9);
    assert_eq!(terminal.screen().cursor().col, 19);
}

#[test]
fn test_newline_and_carriage_return() {
    let (terminal, _) = run_golden_test(b"Line1\r\nLine2\r\nLine3", 24, 80);
    assert_eq!(terminal.screen().row_text(0), "Line1");
    assert_eq!(terminal.screen().row_text(1), "Line2");
    assert_eq!(terminal.screen().row_text(2), "Line3");
}

#[test]
fn test_linefeed_newline_mode() {
    let (terminal, _) = run_golden_test(b"\x1b[20habc\ndef", 24, 80);
    assert_eq!(terminal.screen().row_text(1), "def");
}

#[test]
fn test_autowrap_exact_width() {
    let (terminal, _) = run_golden_test(&[b'A'; 10], 5, 10);
    assert_eq!(terminal.screen().cursor().row, 1);
    assert_eq!(terminal.screen().cursor().col, 0);
    assert_eq!(terminal.screen().row_text(1), "");
    assert_eq!(terminal.screen().history().total_lines(), 0);
}

#[test]
fn test_line_wrapping() {
    let (terminal, _) = run_golden_test(&[b'A'; 85], 24, 80);
    assert_eq!(terminal.screen().row_text(0), "A".repeat(80));
    assert_eq!(terminal.screen().row_text(1), "AAAAA");
}

// ============================================================================
// Editing
// ============================================================================

#[test]
fn test_erase_to_end_of_line() {
    let (terminal, _) = run_golden_test(b"Hello World\x1b[6G\x1b[K", 24, 80);
    assert_eq!(terminal.screen().row_text(0), "Hello");
}

#[test]
fn test_erase_from_start_of_line() {
    let (terminal, _) = run_golden_test(b"Hello World\x1b[5G\x1b[1K", 24, 80);
    assert_eq!(terminal.screen().row_text(0), "      World");
}

#[test]
fn test_erase_display_from_start() {
    let (terminal, _) = run_golden_test(b"one\r\ntwo\r\nthree\x1b[2;2H\x1b[1J", 5, 20);
    assert_eq!(terminal.screen().row_text(0), "");
    assert_eq!(terminal.screen().row_text(1), "  o");
    assert_eq!(terminal.screen().row_text(2), "three");
}

#[test]
fn test_insert_chars() {
    let (terminal, _) = run_golden_test(b"ABCDEF\x1b[3G\x1b[2@", 24, 80);
    assert_eq!(terminal.screen().row_text(0), "AB  CDEF");
}

#[test]
fn test_delete_chars() {
    let (terminal, _) = run_golden_test(b"ABCDEF\x1b[3G\x1b[2P", 24, 80);
    assert_eq!(terminal.screen().row_text(0), "ABEF");
}

#[test]
fn test_erase_chars_continue_onto_next_line() {
    let (terminal, _) = run_golden_test(b"abcdefghij\x1b[2;1Hklmnop\x1b[1;8H\x1b[5X", 5, 10);
    assert_eq!(terminal.screen().row_text(0), "abcdefg   ");
    assert_eq!(terminal.screen().row_text(1), "  mnop");
}

#[test]
fn test_insert_lines() {
    let (terminal, _) = run_golden_test(b"Line1\r\nLine2\r\nLine3\x1b[2;1H\x1b[L", 5, 20);
    assert_eq!(terminal.screen().row_text(0), "Line1");
    assert_eq!(terminal.screen().row_text(1), "");
    assert_eq!(terminal.screen().row_text(2), "Line2");
    assert_eq!(terminal.screen().row_text(3), "Line3");
}

#[test]
fn test_delete_lines() {
    let (terminal, _) = run_golden_test(b"Line1\r\nLine2\r\nLine3\x1b[1;1H\x1b[M", 5, 20);
    assert_eq!(terminal.screen().row_text(0), "Line2");
    assert_eq!(terminal.screen().row_text(1), "Line3");
    assert_eq!(terminal.screen().row_text(2), "");
}

#[test]
fn test_line_too_long_notifies_host() {
    let mut config = TermConfig::default().with_size(3, 8);
    config.max_line_len = 8;
    let mut terminal = Terminal::new(config);
    let mut host = RecordingHost::new();

    terminal.process(b"abcdefgh\x1b[1;1H\x1b[4hXY", &mut host);
    assert_eq!(terminal.screen().row_text(0), "XYabcdef");
    assert_eq!(
        host.errors,
        vec![
            TermError::LineTooLong { row: 0, max: 8 },
            TermError::LineTooLong { row: 0, max: 8 },
        ]
    );
}

// ============================================================================
// Scrolling
// ============================================================================

#[test]
fn test_scroll_with_margins() {
    let mut input = Vec::new();
    for row in 1..=12 {
        input.extend_from_slice(format!("\x1b[{row};1Hrow{row}").as_bytes());
    }
    input.extend_from_slice(b"\x1b[2;10r\x1b[10;1H\n");
    let (terminal, _) = run_golden_test(&input, 12, 20);
    let screen = terminal.screen();

    // The line at the top margin went to history
    assert_eq!(screen.history().total_lines(), 1);
    assert_eq!(screen.history().get(0), Some(&b"row2"[..]));
    assert_eq!(screen.row_text(0), "row1");
    assert_eq!(screen.row_text(1), "row3");
    assert_eq!(screen.row_text(8), "row10");
    assert_eq!(screen.row_text(9), "");
    assert_eq!(screen.row_text(10), "row11");
    assert_eq!(screen.cursor().row, 9);
}

#[test]
fn test_reverse_index_at_top_margin() {
    let (terminal, _) = run_golden_test(b"\x1b[2;4r\x1b[2;1Htop\x1b[3;1Hmid\x1b[2;1H\x1bM", 5, 20);
    let screen = terminal.screen();
    assert_eq!(screen.row_text(1), "");
    assert_eq!(screen.row_text(2), "top");
    assert_eq!(screen.row_text(3), "mid");
    assert_eq!(screen.cursor().row, 1);
}

#[test]
fn test_scroll_up_and_down_commands() {
    let (terminal, _) = run_golden_test(b"a\r\nb\r\nc\x1b[2S", 3, 10);
    assert_eq!(terminal.screen().row_text(0), "c");
    assert_eq!(terminal.screen().history().total_lines(), 2);

    let (terminal, _) = run_golden_test(b"a\r\nb\r\nc\x1b[T", 3, 10);
    assert_eq!(terminal.screen().row_text(0), "");
    assert_eq!(terminal.screen().row_text(1), "a");
    assert_eq!(terminal.screen().row_text(2), "b");
}

#[test]
fn test_history_keeps_renditions_inline() {
    let (terminal, _) = run_golden_test(b"\x1b[31mred\x1b[0mtext\r\n\n", 2, 20);
    let history = terminal.screen().history();
    assert_eq!(history.get(0), Some(&b"\x1b[31mred\x1b[0mtext"[..]));

    let (plain, encoding) = extract(history.get(0).unwrap_or_default(), &Default::default());
    assert_eq!(plain, b"redtext");
    assert_eq!(encoding.unwrap().to_string(), "0,3,red-on-default;");
}

#[test]
fn test_history_plain_when_renditions_disabled() {
    let mut config = TermConfig::default().with_size(2, 20);
    config.history_renditions = false;
    let mut terminal = Terminal::new(config);
    terminal.process(b"\x1b[31mred\x1b[0mtext\r\n\n", &mut RecordingHost::new());
    assert_eq!(terminal.screen().history().get(0), Some(&b"redtext"[..]));
}

// ============================================================================
// Renditions
// ============================================================================

#[test]
fn test_basic_colors() {
    let (terminal, _) = run_golden_test(b"\x1b[31mRed\x1b[0m \x1b[32;44mGreen\x1b[m \x1b[7mRev", 24, 80);
    let snapshot = terminal.snapshot();
    let line = &snapshot.lines[0];
    assert_eq!(line.text, "Red Green Rev");

    let pairs: Vec<(usize, usize, &str)> = line
        .runs
        .iter()
        .map(|r| (r.first_col, r.end_col, r.pair.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (0, 3, "red-on-default"),
            (4, 9, "green-on-blue"),
            (10, 13, "background-on-foreground"),
        ]
    );
}

#[test]
fn test_color_table_substitution() {
    let mut config = TermConfig::default().with_size(3, 20);
    config
        .color_table
        .set(1, padterm::core::ColorPair::new("yellow", "red"));
    let mut terminal = Terminal::new(config);
    terminal.process(b"\x1b[31merr", &mut RecordingHost::new());
    assert_eq!(terminal.snapshot().lines[0].runs[0].pair, "yellow-on-red");
}

#[test]
fn test_overwrite_splits_run() {
    let (terminal, _) = run_golden_test(b"\x1b[34mabcdef\x1b[m\x1b[1;3HXY", 3, 20);
    let runs: Vec<(usize, usize)> = terminal.snapshot().lines[0]
        .runs
        .iter()
        .map(|r| (r.first_col, r.end_col))
        .collect();
    assert_eq!(runs, vec![(0, 2), (4, 6)]);
}

// ============================================================================
// Modes, reports, VT52
// ============================================================================

#[test]
fn test_origin_mode_positioning() {
    let (terminal, host) = run_golden_test(b"\x1b[5;15r\x1b[?6h\x1b[1;1Hx\x1b[99;99H\x1b[6n", 24, 80);
    let screen = terminal.screen();
    assert_eq!(screen.row_text(4), "x");
    assert_eq!(screen.cursor().row, 14);
    assert_eq!(screen.cursor().col, 79);
    assert_eq!(host.sent, b"\x1b[11;80R");
}

#[test]
fn test_origin_mode_reset_homes_to_screen() {
    let (terminal, _) = run_golden_test(b"\x1b[5;15r\x1b[?6h\x1b[3;3H\x1b[?6l", 24, 80);
    assert_eq!(terminal.screen().cursor().row, 0);
    assert_eq!(terminal.screen().cursor().col, 0);
}

#[test]
fn test_save_restore_cursor() {
    let (terminal, _) = run_golden_test(b"\x1b[5;10H\x1b7\x1b[1;1HX\x1b8Y", 24, 80);
    assert_eq!(terminal.screen().row_text(4), "         Y");

    let (terminal, _) = run_golden_test(b"\x1b[3;4H\x1b[s\x1b[H\x1b[u", 24, 80);
    assert_eq!(terminal.screen().cursor().row, 2);
    assert_eq!(terminal.screen().cursor().col, 3);
}

#[test]
fn test_tab_stops() {
    let (terminal, _) = run_golden_test(b"a\tb\tc\x1b[2Zd\x1b[2Ie", 3, 40);
    let gap = " ".repeat(7);
    assert_eq!(terminal.screen().row_text(0), format!("a{gap}d{gap}c{gap}e"));
    assert_eq!(terminal.screen().cursor().col, 25);
}

#[test]
fn test_device_reports() {
    let (_, host) = run_golden_test(b"\x1b[c\x1b[0c\x1b[5n\x1b[3;7H\x1b[6n\x1b[1c", 24, 80);
    assert_eq!(host.sent, b"\x1b[?6c\x1b[?6c\x1b[0n\x1b[3;7R");
}

#[test]
fn test_unknown_sequences_are_ignored() {
    let (terminal, host) = run_golden_test(b"A\x1b[5zB\x1b[?1049hC\x1b#8D\x1b(BE\x1b[1:2HF", 3, 20);
    assert_eq!(terminal.screen().row_text(0), "ABCDEF");
    assert!(host.errors.is_empty());
}

#[test]
fn test_vt52_session() {
    let input = b"\x1b[?2l\x1bY(%hello\x1bHtop\x1bI\x1bZ\x1b<\x1b[c";
    let (terminal, host) = run_golden_test(input, 12, 20);
    let screen = terminal.screen();
    assert_eq!(screen.row_text(9), "     hello");
    assert_eq!(screen.row_text(1), "top");
    assert_eq!(screen.row_text(0), "");
    assert!(!terminal.state().vt52);
    assert_eq!(host.sent, b"\x1b/Z\x1b[?6c");
}

#[test]
fn test_vt52_address_split_across_chunks() {
    let input = b"\x1b[?2l\x1bY\"#x";
    for chunk_size in 1..input.len() {
        let snapshot = run_golden_test_chunked(input, 10, 20, chunk_size);
        assert_eq!(snapshot.lines[2].text, "   x", "chunk size {chunk_size}");
    }
}

#[test]
fn test_chunk_boundary_parsing() {
    let input = b"\x1b[31mHello\x1b[0m \x1b[2;5HWorld\x1b[1;1H\x1b[4h>\x1b[?7l";
    let expected = run_golden_test_chunked(input, 5, 20, input.len());
    for chunk_size in 1..input.len() {
        assert_eq!(
            run_golden_test_chunked(input, 5, 20, chunk_size),
            expected,
            "chunk size {chunk_size}"
        );
    }
}

#[test]
fn test_key_translation_after_mode_changes() {
    let (mut terminal, mut host) = run_golden_test(b"", 24, 80);
    assert_eq!(terminal.translate_key(Key::Keypad5), Some(b"5".to_vec()));

    terminal.process(b"\x1b=", &mut host);
    assert_eq!(terminal.translate_key(Key::Keypad5), Some(b"\x1bOu".to_vec()));

    terminal.process(b"\x1b[?2l", &mut host);
    assert_eq!(terminal.translate_key(Key::Keypad5), Some(b"\x1b?u".to_vec()));
    assert_eq!(terminal.translate_key(Key::F1), Some(b"\x1bP".to_vec()));
}
