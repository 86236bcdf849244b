use std::io;
use std::path::PathBuf;
use std::time::Duration;
use std::time::Instant;

use futures::stream;
use phototerm_preview::DisplayMode;
use phototerm_preview::TerminalSize;
use phototerm_tui::SessionError;
use phototerm_tui::selection::Input;
use phototerm_tui::selection::Phase;
use phototerm_tui::selection::SessionOutcome;
use pretty_assertions::assert_eq;

use crate::common::CLEAR_SCREEN;
use crate::common::Failure;
use crate::common::MockRenderer;
use crate::common::screen;
use crate::common::scripted;
use crate::common::session;

const SIZE: TerminalSize = TerminalSize::new(120, 40);

#[tokio::test]
async fn marks_lock_and_proceed_return_selection_in_list_order() {
    let mut session = session(DisplayMode::Blocks, MockRenderer::new(), 5, SIZE);

    let outcome = session
        .run(scripted(vec![
            Input::Down,
            Input::Down,
            Input::Toggle,
            Input::First,
            Input::Toggle,
            Input::Last,
            Input::Lock,
            Input::Confirm,
        ]))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SessionOutcome::Confirmed(vec![
            PathBuf::from("/photos/img0.jpg"),
            PathBuf::from("/photos/img2.jpg"),
        ])
    );
}

#[tokio::test]
async fn timeout_on_one_image_leaves_navigation_working() {
    let renderer = MockRenderer::new().failing("img3.jpg", Failure::Timeout);
    let mut session = session(DisplayMode::Blocks, renderer, 5, SIZE);

    let outcome = session
        .run(scripted(vec![
            Input::Down,
            Input::Down,
            Input::Down,
            Input::Down,
            Input::Up,
            Input::Up,
            Input::Cancel,
        ]))
        .await
        .unwrap();

    assert_eq!(outcome, SessionOutcome::Cancelled);
    assert_eq!(session.controller().state().cursor(), 2);
    assert!(screen(session.out()).contains("[Preview timed out]"));
    // img0..img4, img3 again (failures are not cached), img2 from cache.
    assert_eq!(session.dispatcher().renderer().calls(), 6);
}

#[tokio::test]
async fn lock_without_marks_stays_browsing() {
    let mut session = session(DisplayMode::Blocks, MockRenderer::new(), 3, SIZE);

    let outcome = session
        .run(scripted(vec![Input::Lock, Input::Confirm, Input::Proceed]))
        .await
        .unwrap();

    // The stream ran dry without ever locking.
    assert_eq!(outcome, SessionOutcome::Cancelled);
    assert!(!session.controller().state().is_locked());
}

#[tokio::test]
async fn closed_input_counts_as_cancel() {
    let mut session = session(DisplayMode::Blocks, MockRenderer::new(), 2, SIZE);

    let outcome = session.run(scripted(Vec::new())).await.unwrap();

    assert_eq!(outcome, SessionOutcome::Cancelled);
    assert_eq!(session.controller().phase(), Phase::Cancelled);
}

#[tokio::test]
async fn ctrl_c_key_interrupts() {
    let mut session = session(DisplayMode::Blocks, MockRenderer::new(), 2, SIZE);

    let outcome = session
        .run(scripted(vec![Input::Toggle, Input::Interrupt, Input::Confirm]))
        .await
        .unwrap();

    assert_eq!(outcome, SessionOutcome::Interrupted);
}

#[tokio::test]
async fn interrupt_aborts_a_slow_render() {
    let renderer = MockRenderer::new().slow(Duration::from_secs(30));
    let mut session = session(DisplayMode::Blocks, renderer, 3, SIZE);
    let started = Instant::now();

    let outcome = session
        .run_with_interrupt(
            stream::pending::<io::Result<Input>>(),
            tokio::time::sleep(Duration::from_millis(50)),
        )
        .await
        .unwrap();

    assert_eq!(outcome, SessionOutcome::Interrupted);
    assert_eq!(session.controller().phase(), Phase::Interrupted);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(session.dispatcher().cache().is_empty());
}

#[tokio::test]
async fn navigation_repaints_without_clearing() {
    let mut session = session(DisplayMode::Blocks, MockRenderer::new(), 3, SIZE);

    session
        .run(scripted(vec![Input::Down, Input::Down, Input::Cancel]))
        .await
        .unwrap();

    assert_eq!(screen(session.out()).matches(CLEAR_SCREEN).count(), 1);
}

#[tokio::test]
async fn toggling_repaints_in_full() {
    let mut session = session(DisplayMode::Blocks, MockRenderer::new(), 3, SIZE);

    session
        .run(scripted(vec![Input::Toggle, Input::Cancel]))
        .await
        .unwrap();

    let screen = screen(session.out());
    assert_eq!(screen.matches(CLEAR_SCREEN).count(), 2);
    assert!(screen.contains("Images (1/3 selected)"));
}

#[tokio::test]
async fn resize_clears_the_graphics_screen_again() {
    let mut session = session(DisplayMode::Kitty, MockRenderer::new(), 3, SIZE);

    session
        .run(scripted(vec![Input::Down, Input::Resize, Input::Cancel]))
        .await
        .unwrap();

    assert_eq!(screen(session.out()).matches(CLEAR_SCREEN).count(), 2);
}

#[tokio::test]
async fn input_errors_end_the_session() {
    let mut session = session(DisplayMode::Blocks, MockRenderer::new(), 2, SIZE);
    let inputs = stream::iter(vec![
        Ok(Input::Down),
        Err(io::Error::other("tty went away")),
    ]);

    let err = session.run(inputs).await.unwrap_err();

    assert!(matches!(err, SessionError::Io(_)));
}

#[tokio::test]
async fn ctrl_c_key_aborts_a_slow_render() {
    let renderer = MockRenderer::new().slow(Duration::from_secs(30));
    let mut session = session(DisplayMode::Blocks, renderer, 3, SIZE);
    let started = Instant::now();

    let outcome = session
        .run_with_interrupt(
            scripted(vec![Input::Interrupt]),
            std::future::pending::<()>(),
        )
        .await
        .unwrap();

    assert_eq!(outcome, SessionOutcome::Interrupted);
    assert_eq!(session.controller().phase(), Phase::Interrupted);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(session.dispatcher().cache().is_empty());
}

#[tokio::test]
async fn keys_typed_during_a_render_are_handled_in_order() {
    let renderer = MockRenderer::new().slow(Duration::from_millis(20));
    let mut session = session(DisplayMode::Blocks, renderer, 3, SIZE);

    // Every key is read while the first paint is still rendering.
    let outcome = session
        .run(scripted(vec![
            Input::Down,
            Input::Toggle,
            Input::Lock,
            Input::Confirm,
        ]))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SessionOutcome::Confirmed(vec![PathBuf::from("/photos/img1.jpg")])
    );
}
