//! Screen benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use padterm::core::{Color, CursorMove, Rendition, Screen, TerminalState};

fn bench_screen_print(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen");

    let text = b"Hello, World! ";
    group.bench_function("insert_chars", |b| {
        b.iter(|| {
            let state = TerminalState::new(24, 80, true);
            let mut screen = Screen::new(24, 80, 1024);
            for &byte in text.iter().cycle().take(80 * 24) {
                let _ = screen.insert_char(&state, byte);
            }
            black_box(screen)
        })
    });

    group.finish();
}

fn bench_screen_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen");

    // Fill screen and scroll into history
    group.bench_function("scroll", |b| {
        b.iter(|| {
            let state = TerminalState::new(24, 80, true);
            let mut screen = Screen::new(24, 80, 1024);
            for i in 0..100 {
                for byte in format!("Line {}: Some text content here", i).bytes() {
                    let _ = screen.insert_char(&state, byte);
                }
                screen.move_cursor(&state, CursorMove::by(1, 0).scrolling());
                screen.move_cursor(&state, CursorMove::to_col(0));
            }
            black_box(screen)
        })
    });

    group.finish();
}

fn bench_screen_renditions(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen");

    // Alternate renditions every few columns so runs split and coalesce
    group.bench_function("rendition_runs", |b| {
        b.iter(|| {
            let mut state = TerminalState::new(24, 80, true);
            let mut screen = Screen::new(24, 80, 1024);
            for col in 0..80 * 24 {
                state.rendition = match col % 6 {
                    0 => Some(Rendition {
                        fg: Color::Indexed((col % 8) as u8),
                        ..Rendition::default()
                    }),
                    3 => None,
                    _ => state.rendition,
                };
                let _ = screen.insert_char(&state, b'x');
            }
            black_box(screen)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_screen_print,
    bench_screen_scroll,
    bench_screen_renditions
);

criterion_main!(benches);
