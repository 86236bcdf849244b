use phototerm_preview::DisplayMode;
use phototerm_preview::TerminalSize;
use phototerm_tui::SessionError;
use phototerm_tui::paint::ImageStatus;
use phototerm_tui::paint::RenderDispatcher;
use phototerm_tui::selection::Input;
use phototerm_tui::selection::SelectionController;
use pretty_assertions::assert_eq;

use crate::common::CLEAR_SCREEN;
use crate::common::Failure;
use crate::common::MockRenderer;
use crate::common::classification;
use crate::common::images;
use crate::common::screen;

const SIZE: TerminalSize = TerminalSize::new(120, 40);

fn setup(mode: DisplayMode, renderer: MockRenderer) -> (SelectionController, RenderDispatcher<MockRenderer>) {
    (
        SelectionController::new(images(5)).unwrap(),
        RenderDispatcher::new(classification(mode), renderer),
    )
}

#[tokio::test]
async fn block_paint_is_served_from_cache_byte_for_byte() {
    let (controller, mut dispatcher) = setup(DisplayMode::Blocks, MockRenderer::new());
    let mut first = Vec::new();
    let mut second = Vec::new();

    dispatcher
        .paint(controller.state(), true, SIZE, &mut first)
        .await
        .unwrap();
    dispatcher
        .paint(controller.state(), true, SIZE, &mut second)
        .await
        .unwrap();

    assert_eq!(dispatcher.renderer().calls(), 1);
    assert_eq!(dispatcher.cache().len(), 1);
    assert_eq!(first, second);
    assert!(screen(&first).contains("img0.jpg 60x35 row 0"));
}

#[tokio::test]
async fn partial_block_paint_skips_the_clear() {
    let (mut controller, mut dispatcher) = setup(DisplayMode::Blocks, MockRenderer::new());
    let mut full = Vec::new();
    let mut partial = Vec::new();

    dispatcher
        .paint(controller.state(), true, SIZE, &mut full)
        .await
        .unwrap();
    controller.handle(Input::Down);
    dispatcher
        .paint(controller.state(), false, SIZE, &mut partial)
        .await
        .unwrap();

    assert!(screen(&full).contains(CLEAR_SCREEN));
    assert!(!screen(&partial).contains(CLEAR_SCREEN));
    assert!(screen(&partial).contains("img1.jpg 60x35 row 0"));
}

#[tokio::test]
async fn partial_block_paint_pads_rows_the_previous_image_used() {
    let renderer = MockRenderer::new().failing("img1.jpg", Failure::Timeout);
    let (mut controller, mut dispatcher) = setup(DisplayMode::Blocks, renderer);
    let mut full = Vec::new();
    let mut partial = Vec::new();

    dispatcher
        .paint(controller.state(), true, SIZE, &mut full)
        .await
        .unwrap();
    controller.handle(Input::Down);
    let report = dispatcher
        .paint(controller.state(), false, SIZE, &mut partial)
        .await
        .unwrap();

    // Three image rows before, one diagnostic row now.
    let geometry = report.geometry;
    let column = geometry.image_column_start + 1;
    let blank = " ".repeat(usize::from(geometry.image_width));
    let partial = screen(&partial);
    assert!(partial.contains(&format!("\x1b[1;{column}H[Preview timed out]")));
    for row in 1..geometry.list_height {
        let padded = format!("\x1b[{};{column}H{blank}", row + 1);
        assert!(partial.contains(&padded), "row {row} not padded");
    }
}

#[tokio::test]
async fn resize_misses_the_cache() {
    let (controller, mut dispatcher) = setup(DisplayMode::Blocks, MockRenderer::new());
    let mut out = Vec::new();

    dispatcher
        .paint(controller.state(), true, TerminalSize::new(120, 40), &mut out)
        .await
        .unwrap();
    dispatcher
        .paint(controller.state(), true, TerminalSize::new(100, 40), &mut out)
        .await
        .unwrap();
    dispatcher
        .paint(controller.state(), true, TerminalSize::new(100, 30), &mut out)
        .await
        .unwrap();

    let sizes: Vec<(u16, u16)> = dispatcher
        .renderer()
        .requests()
        .iter()
        .map(|r| (r.width, r.height))
        .collect();
    assert_eq!(sizes, vec![(60, 35), (58, 35), (58, 29)]);
}

#[tokio::test]
async fn timeout_is_shown_inline_and_list_still_drawn() {
    let renderer = MockRenderer::new().failing("img0.jpg", Failure::Timeout);
    let (controller, mut dispatcher) = setup(DisplayMode::Blocks, renderer);
    let mut out = Vec::new();

    let report = dispatcher
        .paint(controller.state(), true, SIZE, &mut out)
        .await
        .unwrap();

    assert_eq!(
        report.image,
        ImageStatus::Diagnostic("[Preview timed out]".to_string())
    );
    let screen = screen(&out);
    assert!(screen.contains("[Preview timed out]"));
    assert!(screen.contains("Images (0/5 selected)"));
    assert!(screen.contains("img4.jpg"));
    assert!(dispatcher.cache().is_empty());
}

#[tokio::test]
async fn renderer_stderr_is_shown_in_graphics_mode() {
    let renderer =
        MockRenderer::new().failing("img0.jpg", Failure::Exit("bad header\n".to_string()));
    let (controller, mut dispatcher) = setup(DisplayMode::Iterm, renderer);
    let mut out = Vec::new();

    let report = dispatcher
        .paint(controller.state(), true, SIZE, &mut out)
        .await
        .unwrap();

    assert_eq!(
        report.image,
        ImageStatus::Diagnostic("[Preview error: bad header]".to_string())
    );
    assert!(screen(&out).contains("[Preview error: bad header]"));
}

#[tokio::test]
async fn missing_renderer_is_fatal() {
    let renderer = MockRenderer::new().failing("img0.jpg", Failure::Missing);
    let (controller, mut dispatcher) = setup(DisplayMode::Blocks, renderer);
    let mut out = Vec::new();

    let err = dispatcher
        .paint(controller.state(), true, SIZE, &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Render(ref e) if e.is_fatal()));
}

#[tokio::test]
async fn graphics_clears_only_on_first_paint() {
    let (controller, mut dispatcher) = setup(DisplayMode::Kitty, MockRenderer::new());
    let mut first = Vec::new();
    let mut second = Vec::new();

    dispatcher
        .paint(controller.state(), true, SIZE, &mut first)
        .await
        .unwrap();
    dispatcher
        .paint(controller.state(), true, SIZE, &mut second)
        .await
        .unwrap();

    let payload = "\x1b_Gname=img0.jpg,w=60,h=35\x1b\\";
    let (first, second) = (screen(&first), screen(&second));
    assert!(first.starts_with(CLEAR_SCREEN));
    assert!(!second.contains(CLEAR_SCREEN));
    assert!(second.starts_with("\x1b[1;1H"));
    assert!(first.contains(payload));
    assert!(second.contains(payload));
    assert_eq!(dispatcher.renderer().calls(), 1);
}

#[tokio::test]
async fn kitty_placements_are_removed_only_when_the_image_changes() {
    let (mut controller, mut dispatcher) = setup(DisplayMode::Kitty, MockRenderer::new());
    let delete = "\x1b_Ga=d";
    let mut paints = Vec::new();

    for step in 0..3 {
        if step == 2 {
            controller.handle(Input::Down);
        }
        let mut out = Vec::new();
        dispatcher
            .paint(controller.state(), false, SIZE, &mut out)
            .await
            .unwrap();
        paints.push(screen(&out));
    }

    assert!(paints[0].contains(delete));
    assert!(!paints[1].contains(delete));
    assert!(paints[2].contains(delete));
    assert!(paints[2].contains("name=img1.jpg"));
}

#[tokio::test]
async fn invalidate_forces_the_next_graphics_clear() {
    let (controller, mut dispatcher) = setup(DisplayMode::Iterm, MockRenderer::new());
    let mut out = Vec::new();
    dispatcher
        .paint(controller.state(), true, SIZE, &mut out)
        .await
        .unwrap();

    dispatcher.invalidate();
    let mut after = Vec::new();
    dispatcher
        .paint(controller.state(), true, SIZE, &mut after)
        .await
        .unwrap();

    assert!(screen(&after).contains(CLEAR_SCREEN));
}

#[tokio::test]
async fn sixel_uses_the_stacked_layout() {
    let (controller, mut dispatcher) = setup(DisplayMode::Sixel, MockRenderer::new());
    let mut out = Vec::new();

    let report = dispatcher
        .paint(controller.state(), true, SIZE, &mut out)
        .await
        .unwrap();

    assert_eq!(report.geometry.image_column_start, 0);
    assert_eq!(report.geometry.image_row_start, report.geometry.list_height);
    let request = &dispatcher.renderer().requests()[0];
    assert_eq!(request.mode, DisplayMode::Sixel);
    assert_eq!((request.width, request.height), (60, 26));
}

#[tokio::test]
async fn side_by_side_image_stays_inside_the_terminal() {
    for cols in [40u16, 62, 80, 120, 300] {
        let (controller, mut dispatcher) = setup(DisplayMode::Iterm, MockRenderer::new());
        let mut out = Vec::new();
        let size = TerminalSize::new(cols, 24);

        let report = dispatcher
            .paint(controller.state(), true, size, &mut out)
            .await
            .unwrap();

        let geometry = report.geometry;
        assert!(geometry.image_column_start + geometry.image_width <= cols, "cols={cols}");
        assert!((20..=60).contains(&geometry.image_width));
    }
}
