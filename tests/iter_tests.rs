//! Tests for the animated iteration wrapper.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use bunny::animation::ART_ROWS;
use bunny::wrapper::{BunnyBuilder, Lifecycle};
use bunny::{BunnyIterator, Error, WriteLock};
use rand::Rng;

mod common;
use common::helpers::*;

#[test]
fn test_yields_same_elements_in_order() {
    let mut rng = rand::rng();
    for _ in 0..10 {
        let len = rng.random_range(0..200);
        let input: Vec<u32> = (0..len).map(|_| rng.random()).collect();

        let term = create_test_term();
        let output: Vec<u32> = create_test_builder(&term)
            .build(input.clone())
            .unwrap()
            .collect();
        assert_eq!(output, input);

        let hidden: Vec<u32> = BunnyBuilder::hidden().build(input.clone()).unwrap().collect();
        assert_eq!(hidden, input);

        let eager: Vec<u32> = create_eager_builder(&term)
            .build(input.clone())
            .unwrap()
            .collect();
        assert_eq!(eager, input);
    }
}

#[test]
fn test_n_counts_every_element() {
    let term = create_test_term();
    let mut bunny = create_test_builder(&term).build(0..37).unwrap();
    let consumed = bunny.by_ref().count();
    assert_eq!(consumed, 37);
    assert_eq!(bunny.n(), 37);
    assert!(bunny.is_closed());
}

#[test]
fn test_disabled_writes_nothing_and_takes_no_lock() {
    let term = create_test_term();
    let (lock, log) = create_recording_write_lock(&["process", "thread"]);

    let output: Vec<i32> = create_eager_builder(&term)
        .disable(true)
        .write_lock(Arc::new(lock))
        .build(0..500)
        .unwrap()
        .collect();

    assert_eq!(output.len(), 500);
    assert!(term.is_empty());
    assert!(events(&log).is_empty());
}

#[test]
fn test_disabled_does_no_bookkeeping() {
    let mut bunny = BunnyBuilder::hidden().build(0..10).unwrap();
    assert_eq!(bunny.by_ref().count(), 10);
    assert_eq!(bunny.n(), 0);
    assert!(bunny.is_disabled());
    assert!(bunny.is_closed());
}

#[test]
fn test_close_after_partial_consumption() {
    let term = create_test_term();
    let mut bunny = create_eager_builder(&term).build(0..10).unwrap();

    assert_eq!(bunny.by_ref().take(3).count(), 3);
    bunny.close().unwrap();

    assert_eq!(bunny.n(), 3);
    assert!(bunny.is_closed());
    assert!(bar_line(&term).unwrap().contains("3/10"));

    // Closing again, or dropping, draws nothing more.
    let ops_after_close = term.len();
    bunny.close().unwrap();
    assert_eq!(term.len(), ops_after_close);
    drop(bunny);
    assert_eq!(term.len(), ops_after_close);
}

#[test]
fn test_closed_bunny_yields_nothing() {
    let term = create_test_term();
    let mut bunny = create_test_builder(&term).build(0..10).unwrap();
    bunny.next();
    bunny.close().unwrap();

    assert_eq!(bunny.next(), None);
    assert_eq!(bunny.size_hint(), (0, Some(0)));
    assert_eq!(bunny.n(), 1);
}

#[test]
fn test_breaking_out_closes_on_drop() {
    let term = create_test_term();
    {
        let bunny = create_eager_builder(&term).build(1..=10).unwrap();
        for epoch in bunny {
            if epoch == 4 {
                break;
            }
        }
    }

    assert!(bar_line(&term).unwrap().contains("4/10"));
    assert_eq!(term.ops().last(), Some(&TermOp::Flush));
}

#[test]
fn test_lifecycle_moves_forward() {
    let term = create_test_term();
    let mut bunny = create_test_builder(&term).build(0..2).unwrap();
    assert_eq!(bunny.lifecycle(), Lifecycle::Constructed);

    bunny.next();
    assert_eq!(bunny.lifecycle(), Lifecycle::Iterating);

    bunny.next();
    bunny.next();
    assert_eq!(bunny.lifecycle(), Lifecycle::Closed);
}

#[test]
fn test_art_redrawn_for_every_element() {
    let term = create_test_term();
    let count = create_test_builder(&term)
        .mininterval(Duration::from_secs(3600))
        .build(0..25)
        .unwrap()
        .count();

    assert_eq!(count, 25);
    assert_eq!(art_lines_with(&term, "TRAINING").len(), 25);
    assert_eq!(art_lines_with(&term, "(•ㅅ•)").len(), 25);
}

#[test]
fn test_art_shows_element_right_justified() {
    let term = create_test_term();
    let _: Vec<_> = create_test_builder(&term).build(vec![7, 12345]).unwrap().collect();

    let labels = art_lines_with(&term, "       |");
    assert!(labels.iter().any(|line| line.ends_with("|        7       |")));
    assert!(labels.iter().any(|line| line.ends_with("|    12345       |")));
}

#[test]
fn test_art_drifts_right_with_known_total() {
    let term = create_test_term();
    let _: Vec<_> = create_test_builder(&term).build(1..=10).unwrap().collect();

    let tops = art_lines_with(&term, "TRAINING");
    // 80 columns leave a 40 column track.
    assert_eq!(tops.first().unwrap(), &format!("{}|    TRAINING    |", " ".repeat(4)));
    assert_eq!(tops.last().unwrap(), &format!("{}|    TRAINING    |", " ".repeat(40)));
}

#[test]
fn test_art_stays_put_without_total() {
    let term = create_test_term();
    let evens: Vec<_> = create_test_builder(&term)
        .build((0..10).filter(|n| n % 2 == 0))
        .unwrap()
        .collect();

    assert_eq!(evens, vec![0, 2, 4, 6, 8]);
    for line in art_lines_with(&term, "TRAINING") {
        assert!(line.starts_with('|'));
    }
}

#[test]
fn test_art_moves_cursor_over_its_rows() {
    let term = create_test_term();
    let _: Vec<_> = create_test_builder(&term).build(0..1).unwrap().collect();
    assert!(term.ops().contains(&TermOp::Up(ART_ROWS)));
}

#[test]
fn test_eager_repaints_every_element() {
    let term = create_test_term();
    let (lock, log) = create_recording_write_lock(&["thread"]);

    let count = create_eager_builder(&term)
        .write_lock(Arc::new(lock))
        .build(0..12)
        .unwrap()
        .count();

    // Initial draw, one per element, and the final one on close.
    assert_eq!(count, 12);
    assert_eq!(count_repaints(&log, "thread", 12), 14);
    // Plus one art draw per element.
    assert_eq!(count_acquisitions(&log, "thread"), 26);
}

#[test]
fn test_mininterval_holds_back_repaints() {
    let term = create_test_term();
    let (builder, log) = create_counting_builder(&term);
    let count = builder
        .mininterval(Duration::from_secs(3600))
        .build(0..100)
        .unwrap()
        .count();

    assert_eq!(count, 100);
    assert_eq!(count_repaints(&log, "thread", 100), 2);
}

#[test]
fn test_pinned_miniters_gates_clock_checks() {
    let term = create_test_term();
    let (builder, log) = create_counting_builder(&term);
    let mut bunny = builder
        .mininterval(Duration::ZERO)
        .miniters(5)
        .build(0..12)
        .unwrap();

    assert_eq!(bunny.by_ref().take(12).count(), 12);
    // Repaints at 5 and 10, plus the initial draw.
    assert_eq!(count_repaints(&log, "thread", 12), 3);
    assert_eq!(bunny.state().last_print_n, 10);
    assert_eq!(bunny.state().miniters, 5.0);
}

#[test]
fn test_dynamic_miniters_ratchets_without_smoothing() {
    let term = create_test_term();
    let mut bunny = create_test_builder(&term)
        .mininterval(Duration::ZERO)
        .maxinterval(Duration::ZERO)
        .smoothing(0.0)
        .build(0..20)
        .unwrap();

    assert_eq!(bunny.by_ref().take(20).count(), 20);
    assert_eq!(bunny.state().miniters, 1.0);
    assert_eq!(bunny.state().avg_time, None);
}

#[test]
fn test_avg_time_is_smoothed_after_repaints() {
    let term = create_test_term();
    let mut bunny = create_eager_builder(&term).build(0..5).unwrap();

    for _ in bunny.by_ref().take(5) {
        thread::sleep(Duration::from_millis(2));
    }
    let avg = bunny.state().avg_time.unwrap();
    assert!(avg > 0.0);
}

#[test]
fn test_position_moves_to_its_row() {
    let term = create_test_term();
    let _: Vec<_> = create_eager_builder(&term)
        .position(2)
        .build(0..3)
        .unwrap()
        .collect();

    let ops = term.ops();
    assert!(ops.contains(&TermOp::Down(2)));
    assert!(ops.contains(&TermOp::Up(2)));
}

#[test]
fn test_no_leave_clears_region() {
    let term = create_test_term();
    let _: Vec<_> = create_test_builder(&term)
        .leave(false)
        .build(0..3)
        .unwrap()
        .collect();

    let ops = term.ops();
    let tail = &ops[ops.len() - (2 * ART_ROWS + 1)..];
    assert_eq!(tail[0], TermOp::Up(1));
    assert_eq!(tail[1], TermOp::ClearLine);
    assert_eq!(tail.last(), Some(&TermOp::Flush));
    assert_eq!(term.contents(), "");
}

#[test]
fn test_gui_mode_is_rejected() {
    let term = create_test_term();
    let result = create_test_builder(&term).gui(true).build(0..3);

    assert!(matches!(result, Err(Error::GuiDeprecated)));
    assert!(term.is_empty());
}

#[test]
fn test_extension_trait() {
    let term = create_test_term();
    let letters: Vec<char> = "bunny"
        .chars()
        .bunny_with(create_test_builder(&term).desc(TEST_DESC))
        .unwrap()
        .collect();

    assert_eq!(letters, vec!['b', 'u', 'n', 'n', 'y']);
    assert!(bar_line(&term).unwrap().starts_with("epochs: "));
}

#[test]
fn test_monitor_unblocks_large_miniters() {
    let term = create_test_term();
    let (builder, log) = create_counting_builder(&term);
    let mut bunny = builder
        .mininterval(Duration::ZERO)
        .maxinterval(Duration::from_millis(50))
        .monitor_interval(Duration::from_millis(5))
        .miniters(1000)
        .build(0..10)
        .unwrap();

    bunny.next();
    assert_eq!(count_repaints(&log, "thread", 1), 1);

    thread::sleep(Duration::from_millis(300));
    bunny.next();

    assert_eq!(count_repaints(&log, "thread", 2), 2);
    assert_eq!(bunny.state().miniters, 1.0);
}

#[test]
fn test_maxinterval_breach_rescales_miniters() {
    let term = create_test_term();
    let mut bunny = create_test_builder(&term)
        .mininterval(Duration::ZERO)
        .maxinterval(Duration::from_millis(50))
        .smoothing(0.5)
        .build(0..20)
        .unwrap();

    // Quick elements pull the smoothed threshold toward one.
    assert_eq!(bunny.by_ref().take(10).count(), 10);
    assert!(bunny.state().miniters > 0.9);

    // A gap past maxinterval rescales by rule of three. Smoothing would have
    // kept the threshold near one.
    thread::sleep(Duration::from_millis(100));
    bunny.next();

    let miniters = bunny.state().miniters;
    assert!(miniters > 0.0);
    assert!(miniters <= 0.5 + 1e-9, "miniters = {miniters}");
    assert_eq!(bunny.state().last_print_n, 11);
}

#[test]
fn test_default_bars_share_the_process_lock() {
    let term = create_test_term();
    let outer = create_test_builder(&term).build(0..3).unwrap();
    let inner = create_test_builder(&term).position(1).build(0..3).unwrap();

    assert!(Arc::ptr_eq(outer.write_lock(), inner.write_lock()));
    assert!(Arc::ptr_eq(outer.write_lock(), &WriteLock::shared()));
}

#[test]
fn test_hidden_bars_do_not_share_the_process_lock() {
    let bunny = BunnyBuilder::hidden().build(0..3).unwrap();
    assert!(bunny.write_lock().is_empty());
}
