//! Six-box code entry: typing, paste and backspace move keyboard focus between boxes.

mod common;

use common::TestCtx;
use egui::{Event, Id, Key};
use secure_business::{EmailVerifyInput, Route};

fn slot_id(index: usize) -> Id {
    Id::new(("email_otp", "otp_slot", index))
}

fn focused_slot(test_ctx: &TestCtx<'_>) -> Option<usize> {
    let focused = test_ctx.harness().ctx.memory(|memory| memory.focused())?;
    (0..6).find(|index| slot_id(*index) == focused)
}

fn slots(test_ctx: &TestCtx<'_>) -> Vec<Option<char>> {
    let otp = &test_ctx.state().ctx.state::<EmailVerifyInput>().otp;
    (0..6).map(|index| otp.slot(index)).collect()
}

fn run_frames(test_ctx: &mut TestCtx<'_>, frames: usize) {
    for _ in 0..frames {
        test_ctx.harness_mut().step();
    }
}

async fn focused_on_first_slot() -> TestCtx<'static> {
    let mut test_ctx = TestCtx::new_app_at(Route::EmailVerify).await;
    test_ctx
        .harness()
        .ctx
        .memory_mut(|memory| memory.request_focus(slot_id(0)));
    run_frames(&mut test_ctx, 2);
    assert_eq!(focused_slot(&test_ctx), Some(0));
    test_ctx
}

#[tokio::test]
async fn test_typed_digit_moves_focus_to_next_slot() {
    let mut test_ctx = focused_on_first_slot().await;

    test_ctx.harness_mut().event(Event::Text("7".to_owned()));
    run_frames(&mut test_ctx, 3);

    assert_eq!(
        slots(&test_ctx),
        vec![Some('7'), None, None, None, None, None]
    );
    assert_eq!(focused_slot(&test_ctx), Some(1));
}

#[tokio::test]
async fn test_typed_letter_is_ignored() {
    let mut test_ctx = focused_on_first_slot().await;

    test_ctx.harness_mut().event(Event::Text("a".to_owned()));
    run_frames(&mut test_ctx, 3);

    assert_eq!(slots(&test_ctx), vec![None; 6]);
    assert_eq!(focused_slot(&test_ctx), Some(0));
}

#[tokio::test]
async fn test_paste_fills_from_first_slot_and_focuses_after_it() {
    let mut test_ctx = focused_on_first_slot().await;
    test_ctx.harness_mut().event(Event::Text("9".to_owned()));
    run_frames(&mut test_ctx, 3);
    assert_eq!(focused_slot(&test_ctx), Some(1));

    // Pasting into the second box still starts at the first one.
    test_ctx.harness_mut().event(Event::Paste("12".to_owned()));
    run_frames(&mut test_ctx, 3);

    assert_eq!(
        slots(&test_ctx),
        vec![Some('1'), Some('2'), None, None, None, None]
    );
    assert_eq!(focused_slot(&test_ctx), Some(2));
}

#[tokio::test]
async fn test_paste_of_full_code_focuses_last_slot() {
    let mut test_ctx = focused_on_first_slot().await;

    test_ctx
        .harness_mut()
        .event(Event::Paste("12ab3456".to_owned()));
    run_frames(&mut test_ctx, 3);

    assert_eq!(
        slots(&test_ctx),
        "123456".chars().map(Some).collect::<Vec<_>>()
    );
    assert_eq!(focused_slot(&test_ctx), Some(5));
}

#[tokio::test]
async fn test_backspace_in_empty_slot_moves_back() {
    let mut test_ctx = focused_on_first_slot().await;
    test_ctx.harness_mut().event(Event::Paste("12".to_owned()));
    run_frames(&mut test_ctx, 3);
    assert_eq!(focused_slot(&test_ctx), Some(2));

    test_ctx.harness_mut().key_press(Key::Backspace);
    run_frames(&mut test_ctx, 3);

    assert_eq!(focused_slot(&test_ctx), Some(1));
    assert_eq!(
        slots(&test_ctx),
        vec![Some('1'), Some('2'), None, None, None, None],
        "Moving back does not erase the previous digit"
    );
}
