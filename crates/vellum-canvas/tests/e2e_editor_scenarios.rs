#![forbid(unsafe_code)]

//! End-to-end editing scenarios driven through pointer events.
//!
//! Each test builds a small document, measures section boxes the way a host
//! would, replays a pointer script, and checks both the document and the
//! host notifications.
//!
//! Run:
//!   cargo test -p vellum-canvas --test e2e_editor_scenarios

use vellum_canvas::content::TextContent;
use vellum_canvas::snap::GuideAxis;
use vellum_canvas::{
    Block, BlockContent, BlockId, BlockPatch, BlockType, CancelReason, CanvasEditor, Document,
    EditorConfig, HostCall, HostLog, InteractionEffect, InteractionPreview, Length,
    PercentPosition, PercentSize, Section, SectionId, Viewport,
};
use vellum_core::event::{Modifiers, PointerEvent};
use vellum_core::geometry::{Rect, Size};

fn sid(raw: u64) -> SectionId {
    SectionId::new(raw).expect("non-zero")
}

fn bid(raw: u64) -> BlockId {
    BlockId::new(raw).expect("non-zero")
}

fn shape(raw: u64, x: f64, y: f64, w: f64, h: f64, z: i32) -> Block {
    Block::new(bid(raw), BlockContent::default_for(BlockType::Shape))
        .with_position(x, y)
        .with_size(PercentSize::fixed(w, h))
        .with_z_index(z)
}

fn no_snap() -> EditorConfig {
    EditorConfig {
        snapping_enabled: false,
        ..EditorConfig::default()
    }
}

/// Replay down, one move, and up for pointer 1.
fn drag(editor: &mut CanvasEditor<HostLog>, from: (f64, f64), to: (f64, f64)) {
    editor
        .handle_pointer(&PointerEvent::down(1, from.0, from.1))
        .expect("down");
    editor
        .handle_pointer(&PointerEvent::moved(1, to.0, to.1))
        .expect("move");
    editor
        .handle_pointer(&PointerEvent::up(1, to.0, to.1))
        .expect("up");
}

// ============================================================================
// Snapping
// ============================================================================

fn snap_editor(config: EditorConfig) -> CanvasEditor<HostLog> {
    let mut document = Document::default();
    document
        .push_section(Section::new(sid(1), "Gallery", 500.0))
        .expect("section");
    // Dragged block: 100..220 x 400..450.
    document
        .append_block(sid(1), shape(1, 10.0, 80.0, 12.0, 10.0, 0))
        .expect("dragged");
    // Sibling: 500..700 x 250..350.
    document
        .append_block(sid(1), shape(2, 50.0, 50.0, 20.0, 20.0, 1))
        .expect("sibling");
    let mut editor = CanvasEditor::with_config(document, HostLog::new(), config).expect("valid");
    editor
        .set_section_box(sid(1), Rect::new(0.0, 0.0, 1000.0, 500.0))
        .expect("section box");
    editor
}

#[test]
fn left_edge_snaps_to_sibling_left_edge() {
    let mut editor = snap_editor(EditorConfig::default());
    editor
        .handle_pointer(&PointerEvent::down(1, 150.0, 420.0))
        .expect("down");
    // Candidate left edge lands at 503, three pixels from the sibling's 500.
    editor
        .handle_pointer(&PointerEvent::moved(1, 553.0, 420.0))
        .expect("move");

    match editor.preview() {
        Some(InteractionPreview::Move { rect, guides, .. }) => {
            assert_eq!(rect.x, 500.0);
            assert_eq!(rect.y, 400.0);
            assert!(
                guides
                    .iter()
                    .any(|g| g.axis == GuideAxis::Vertical && g.offset == 500.0)
            );
            assert!(guides.iter().all(|g| g.axis == GuideAxis::Vertical));
        }
        other => panic!("expected a move preview, got {other:?}"),
    }

    editor
        .handle_pointer(&PointerEvent::up(1, 553.0, 420.0))
        .expect("up");
    assert_eq!(
        editor.document().block(bid(1)).map(|b| b.position),
        Some(PercentPosition::new(50.0, 80.0))
    );
    assert!(editor.guides().is_empty());
}

#[test]
fn block_near_sibling_snaps_to_its_left_edge_percent() {
    let mut document = Document::default();
    document
        .push_section(Section::new(sid(1), "Details", 500.0))
        .expect("section");
    // Dragged: 480..580 x 240..290. Sibling: 500..700 x 250..350, on top.
    document
        .append_block(sid(1), shape(1, 48.0, 48.0, 10.0, 10.0, 0))
        .expect("dragged");
    document
        .append_block(sid(1), shape(2, 50.0, 50.0, 20.0, 20.0, 1))
        .expect("sibling");
    let mut editor = CanvasEditor::new(document, HostLog::new()).expect("valid");
    editor
        .set_section_box(sid(1), Rect::new(0.0, 0.0, 1000.0, 500.0))
        .expect("section box");

    // Left edge ends 3px short of the sibling's left edge.
    drag(&mut editor, (490.0, 245.0), (507.0, 245.0));

    let block = editor.document().block(bid(1)).expect("block");
    assert_eq!(block.position, PercentPosition::new(50.0, 48.0));
}

#[test]
fn alt_drag_bypasses_snapping() {
    let mut editor = snap_editor(EditorConfig::default());
    editor
        .handle_pointer(&PointerEvent::down(1, 150.0, 420.0))
        .expect("down");
    let alt_move = PointerEvent::moved(1, 553.0, 420.0).with_modifiers(Modifiers::ALT);
    editor.handle_pointer(&alt_move).expect("move");
    assert!(editor.guides().is_empty());
    editor
        .handle_pointer(&PointerEvent::up(1, 553.0, 420.0).with_modifiers(Modifiers::ALT))
        .expect("up");
    assert_eq!(
        editor.document().block(bid(1)).map(|b| b.position),
        Some(PercentPosition::new(50.3, 80.0))
    );
}

// ============================================================================
// Threshold
// ============================================================================

#[test]
fn movement_at_threshold_is_still_a_click() {
    let mut editor = snap_editor(EditorConfig::default());
    editor
        .handle_pointer(&PointerEvent::down(1, 150.0, 420.0))
        .expect("down");
    editor
        .handle_pointer(&PointerEvent::moved(1, 155.0, 425.0))
        .expect("move");
    editor
        .handle_pointer(&PointerEvent::up(1, 155.0, 425.0))
        .expect("up");

    assert_eq!(editor.selected_block_id(), Some(bid(1)));
    assert!(editor.host().is_empty());
    assert_eq!(
        editor.document().block(bid(1)).map(|b| b.position),
        Some(PercentPosition::new(10.0, 80.0))
    );
}

#[test]
fn escape_discards_the_drag() {
    let mut editor = snap_editor(no_snap());
    editor
        .handle_pointer(&PointerEvent::down(1, 150.0, 420.0))
        .expect("down");
    editor
        .handle_pointer(&PointerEvent::moved(1, 300.0, 300.0))
        .expect("move");
    assert!(editor.preview().is_some());

    assert!(editor.cancel(CancelReason::EscapeKey).is_some());
    assert!(editor.preview().is_none());
    let late_up = editor
        .handle_pointer(&PointerEvent::up(1, 300.0, 300.0))
        .expect("up");
    assert!(late_up.is_none());
    assert!(editor.host().is_empty());
}

// ============================================================================
// Viewports
// ============================================================================

#[test]
fn mobile_drop_writes_mobile_override_only() {
    let mut document = Document::default();
    document
        .push_section(Section::new(sid(1), "Intro", 300.0))
        .expect("section");
    document
        .append_block(sid(1), shape(1, 0.0, 0.0, 10.0, 10.0, 0))
        .expect("block");
    let mut editor = CanvasEditor::with_config(document, HostLog::new(), no_snap()).expect("valid");
    editor
        .set_section_box(sid(1), Rect::new(0.0, 0.0, 800.0, 300.0))
        .expect("desktop box");

    // The host re-measures the section at the narrower breakpoint.
    editor.set_viewport(Viewport::Mobile);
    editor
        .set_section_box(sid(1), Rect::new(0.0, 0.0, 400.0, 300.0))
        .expect("mobile box");
    drag(&mut editor, (10.0, 10.0), (110.0, 10.0));

    let block = editor.document().block(bid(1)).expect("block");
    assert_eq!(block.position, PercentPosition::new(0.0, 0.0));
    assert_eq!(
        block.layouts.get(&Viewport::Mobile).and_then(|l| l.position),
        Some(PercentPosition::new(25.0, 0.0))
    );
    assert_eq!(
        editor.host().calls(),
        &[HostCall::BlockChange {
            block_id: bid(1),
            patch: BlockPatch::position(PercentPosition::new(25.0, 0.0)),
            viewport: Viewport::Mobile,
        }]
    );
}

// ============================================================================
// Resize
// ============================================================================

fn text_editor() -> CanvasEditor<HostLog> {
    let mut document = Document::default();
    document
        .push_section(Section::new(sid(1), "About", 500.0))
        .expect("section");
    let text = Block::new(
        bid(1),
        BlockContent::Text(TextContent {
            text: "<p>We shoot weddings.</p>".into(),
        }),
    )
    .with_position(10.0, 10.0)
    .with_size(PercentSize::new(Length::Value(40.0), Length::Auto));
    document.append_block(sid(1), text).expect("text");

    let mut editor = CanvasEditor::new(document, HostLog::new()).expect("valid");
    editor
        .set_section_box(sid(1), Rect::new(0.0, 0.0, 1000.0, 500.0))
        .expect("section box");
    // Rendered box: 100..500 x 50..110.
    editor
        .set_intrinsic_size(bid(1), Size::new(400.0, 60.0))
        .expect("measured");
    editor.select(Some(bid(1))).expect("select");
    editor
}

#[test]
fn vertical_resize_keeps_auto_height() {
    let mut editor = text_editor();
    editor
        .handle_pointer(&PointerEvent::down(1, 300.0, 110.0))
        .expect("down on bottom grip");
    editor
        .handle_pointer(&PointerEvent::moved(1, 300.0, 210.0))
        .expect("move");
    assert!(matches!(
        editor.preview(),
        Some(InteractionPreview::Resize { rect, .. }) if rect.height == 60.0
    ));
    editor
        .handle_pointer(&PointerEvent::up(1, 300.0, 210.0))
        .expect("up");

    let block = editor.document().block(bid(1)).expect("block");
    assert_eq!(block.size, PercentSize::new(Length::Value(40.0), Length::Auto));
}

#[test]
fn corner_resize_changes_width_but_not_auto_height() {
    let mut editor = text_editor();
    drag(&mut editor, (500.0, 110.0), (600.0, 300.0));
    let block = editor.document().block(bid(1)).expect("block");
    assert_eq!(block.size, PercentSize::new(Length::Value(50.0), Length::Auto));
}

// ============================================================================
// Sections
// ============================================================================

fn two_sections() -> CanvasEditor<HostLog> {
    let mut document = Document::default();
    document
        .push_section(Section::new(sid(1), "Cover", 500.0))
        .expect("first");
    document
        .push_section(Section::new(sid(2), "Pricing", 400.0))
        .expect("second");
    document
        .append_block(sid(1), shape(1, 10.0, 10.0, 10.0, 10.0, 4))
        .expect("block");
    document
        .append_block(sid(2), shape(2, 80.0, 80.0, 10.0, 10.0, 0))
        .expect("block");
    let mut editor = CanvasEditor::with_config(document, HostLog::new(), no_snap()).expect("valid");
    editor
        .set_section_box(sid(1), Rect::new(0.0, 0.0, 1000.0, 500.0))
        .expect("first box");
    editor
        .set_section_box(sid(2), Rect::new(0.0, 500.0, 1000.0, 400.0))
        .expect("second box");
    editor
}

#[test]
fn dropping_into_another_section_moves_the_block() {
    let mut editor = two_sections();
    // Block 1 spans 100..200 x 50..100; release over the second section.
    drag(&mut editor, (150.0, 75.0), (150.0, 675.0));

    let document = editor.document();
    assert_eq!(document.locate(bid(1)).map(|(s, _)| s), Some(sid(2)));
    assert_eq!(document.block_ids(sid(2)), vec![bid(2), bid(1)]);
    assert!(document.blocks(sid(1)).is_empty());
    let moved = document.block(bid(1)).expect("moved");
    assert_eq!(moved.position, PercentPosition::new(10.0, 37.5));
    assert_eq!(moved.z_index, 4);
    assert_eq!(
        editor.host().calls(),
        &[HostCall::BlockMove {
            block_id: bid(1),
            section_id: sid(2),
            position: PercentPosition::new(10.0, 37.5),
        }]
    );
}

/// An 800px section stacked above a 400px one, measured at `viewport`.
fn wide_and_narrow(viewport: Viewport, block: Block) -> CanvasEditor<HostLog> {
    let mut document = Document::default();
    document
        .push_section(Section::new(sid(1), "Wide", 300.0))
        .expect("wide");
    document
        .push_section(Section::new(sid(2), "Narrow", 300.0))
        .expect("narrow");
    document.append_block(sid(1), block).expect("block");
    let mut editor = CanvasEditor::with_config(document, HostLog::new(), no_snap()).expect("valid");
    editor.set_viewport(viewport);
    editor
        .set_section_box(sid(1), Rect::new(0.0, 0.0, 800.0, 300.0))
        .expect("wide box");
    editor
        .set_section_box(sid(2), Rect::new(0.0, 300.0, 400.0, 300.0))
        .expect("narrow box");
    editor
}

#[test]
fn drop_position_is_relative_to_the_destination_width() {
    let mut editor = wide_and_narrow(Viewport::Desktop, shape(1, 0.0, 0.0, 10.0, 10.0, 0));

    // The block's left edge lands at x = 100 inside the narrow section.
    drag(&mut editor, (10.0, 10.0), (110.0, 310.0));

    let moved = editor.document().block(bid(1)).expect("moved");
    assert_eq!(editor.document().locate(bid(1)).map(|(s, _)| s), Some(sid(2)));
    assert_eq!(moved.position, PercentPosition::new(25.0, 0.0));
}

#[test]
fn mobile_cross_section_drop_rebases_the_base_position() {
    let mut editor = wide_and_narrow(Viewport::Mobile, shape(1, 0.0, 0.0, 10.0, 10.0, 0));

    drag(&mut editor, (10.0, 10.0), (110.0, 310.0));

    let moved = editor.document().block(bid(1)).expect("moved");
    assert_eq!(editor.document().locate(bid(1)).map(|(s, _)| s), Some(sid(2)));
    assert_eq!(moved.position, PercentPosition::new(25.0, 0.0));
    assert!(moved.layouts.get(&Viewport::Mobile).is_none());
    assert_eq!(
        editor.host().calls(),
        &[HostCall::BlockMove {
            block_id: bid(1),
            section_id: sid(2),
            position: PercentPosition::new(25.0, 0.0),
        }]
    );
}

#[test]
fn mobile_cross_section_drop_rewrites_an_existing_override() {
    let mut block = shape(1, 50.0, 50.0, 10.0, 10.0, 0);
    block.layout_mut(Viewport::Mobile).position = Some(PercentPosition::new(0.0, 0.0));
    let mut editor = wide_and_narrow(Viewport::Mobile, block);

    drag(&mut editor, (10.0, 10.0), (110.0, 310.0));

    let moved = editor.document().block(bid(1)).expect("moved");
    let dropped = PercentPosition::new(25.0, 0.0);
    assert_eq!(moved.position, dropped);
    assert_eq!(
        moved.layouts.get(&Viewport::Mobile).and_then(|l| l.position),
        Some(dropped)
    );
    assert_eq!(
        editor.host().calls(),
        &[
            HostCall::BlockMove {
                block_id: bid(1),
                section_id: sid(2),
                position: dropped,
            },
            HostCall::BlockChange {
                block_id: bid(1),
                patch: BlockPatch::position(dropped),
                viewport: Viewport::Mobile,
            },
        ]
    );
}

#[test]
fn release_outside_every_section_cancels_the_drag() {
    let mut editor = two_sections();
    editor
        .handle_pointer(&PointerEvent::down(1, 150.0, 75.0))
        .expect("down");
    editor
        .handle_pointer(&PointerEvent::moved(1, 300.0, 75.0))
        .expect("move");
    // No move event reaches the editor before the release lands off canvas.
    let released = editor
        .handle_pointer(&PointerEvent::up(1, 1500.0, 75.0))
        .expect("up")
        .expect("transition");

    assert!(matches!(
        released.effect,
        InteractionEffect::Canceled {
            reason: CancelReason::LeftBounds,
            ..
        }
    ));
    let block = editor.document().block(bid(1)).expect("block");
    assert_eq!(block.position, PercentPosition::new(10.0, 10.0));
    assert!(editor.preview().is_none());
    assert!(editor.host().is_empty());
}

#[test]
fn section_handle_reports_live_and_final_heights() {
    let mut editor = two_sections();
    editor
        .handle_pointer(&PointerEvent::down(1, 400.0, 899.0))
        .expect("down on second section's bottom edge");
    for y in [920.0, 960.0, 1000.0] {
        editor
            .handle_pointer(&PointerEvent::moved(1, 400.0, y))
            .expect("move");
    }
    editor
        .handle_pointer(&PointerEvent::up(1, 400.0, 1000.0))
        .expect("up");

    let finals: Vec<(SectionId, f64)> = editor.host().final_section_heights().collect();
    assert_eq!(finals, vec![(sid(2), 501.0)]);
    assert_eq!(editor.host().len(), 4);
    assert_eq!(editor.document().section(sid(2)).map(|s| s.height), Some(501.0));
    assert_eq!(editor.document().section(sid(1)).map(|s| s.height), Some(500.0));
}

// ============================================================================
// Layers
// ============================================================================

#[test]
fn moving_third_layer_to_top_renumbers_section() {
    let mut document = Document::default();
    document
        .push_section(Section::new(sid(1), "Moodboard", 600.0))
        .expect("section");
    for (raw, z) in [(1, 0), (2, 1), (3, 2), (4, 3)] {
        document
            .append_block(sid(1), shape(raw, 0.0, 0.0, 10.0, 10.0, z))
            .expect("block");
    }
    let mut editor = CanvasEditor::new(document, HostLog::new()).expect("valid");

    let before: Vec<u64> = editor
        .layer_entries(sid(1))
        .expect("entries")
        .iter()
        .map(|e| e.block_id.get())
        .collect();
    assert_eq!(before, vec![4, 3, 2, 1]);

    editor.reorder_layers(sid(1), 2, 0).expect("reorder");

    let after: Vec<(u64, i32)> = editor
        .layer_entries(sid(1))
        .expect("entries")
        .iter()
        .map(|e| (e.block_id.get(), e.z_index))
        .collect();
    assert_eq!(after, vec![(2, 3), (4, 2), (3, 1), (1, 0)]);

    let reported: Vec<(u64, Option<i32>)> = editor
        .host()
        .calls()
        .iter()
        .filter_map(|call| match call {
            HostCall::BlockChange {
                block_id, patch, ..
            } => Some((block_id.get(), patch.z_index)),
            _ => None,
        })
        .collect();
    assert_eq!(
        reported,
        vec![(2, Some(3)), (4, Some(2)), (3, Some(1)), (1, Some(0))]
    );
}

#[test]
fn hidden_layer_cannot_be_grabbed() {
    let mut editor = two_sections();
    editor.set_viewport(Viewport::Tablet);
    assert!(!editor.toggle_visibility(bid(1)).expect("toggle"));

    let block = editor.document().block(bid(1)).expect("block");
    assert!(block.visible);
    assert_eq!(
        block.layouts.get(&Viewport::Tablet).and_then(|l| l.visible),
        Some(false)
    );
    assert!(editor.hit_test(vellum_core::geometry::Point::new(150.0, 75.0)).is_none());
}
