#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;

#[test]
fn buffer_keeps_program_output_in_order() {
    let handler = buffer_handler();
    handler.print("a");
    handler.println("b");
    handler.print("c");
    assert_eq!(handler.output(), "ab\nc");
}

#[test]
fn results_and_traces_are_framed() {
    let handler = buffer_handler();
    handler.result(3);
    handler.trace_assignment("x", "[1, 2]");
    assert_eq!(handler.output(), "// Result: 3\n~< Trace: x := [1, 2] >~\n");
}

#[test]
fn clear_drops_captured_output() {
    let handler = buffer_handler();
    handler.println("hello");
    handler.clear();
    assert!(handler.output().is_empty());
}

#[test]
fn only_buffers_capture() {
    for handler in [stdout_handler(), silent_handler()] {
        handler.clear();
        assert_eq!(handler.output(), "");
    }
    let silent = silent_handler();
    silent.result("ignored");
    assert_eq!(silent.output(), "");
}

#[test]
fn clones_share_one_buffer() {
    use std::thread;

    let handler = buffer_handler();
    let other = Arc::clone(&handler);
    let worker = thread::spawn(move || {
        for _ in 0..50 {
            other.println("a");
        }
    });
    for _ in 0..50 {
        handler.println("b");
    }
    worker.join().unwrap();
    assert_eq!(handler.output().lines().count(), 100);
}
