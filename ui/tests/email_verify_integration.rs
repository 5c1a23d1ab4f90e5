//! Email verification page and the late-response guard on page change.

mod common;

use std::time::Duration;

use common::TestCtx;
use egui::accesskit::Role;
use kittest::Queryable;
use secure_business::{EmailVerifyInput, Route, SessionCompute};
use secure_states::StateSyncStatus;

fn verify(test_ctx: &mut TestCtx<'_>) {
    test_ctx
        .harness()
        .get_by_role_and_label(Role::Button, "Verify email")
        .click();
    test_ctx.harness_mut().step();
}

fn enter_code(test_ctx: &mut TestCtx<'_>, code: &str) {
    test_ctx
        .state_mut()
        .ctx
        .update::<EmailVerifyInput>(|input| input.otp.paste(code));
    test_ctx.harness_mut().step();
}

#[tokio::test]
async fn test_incomplete_code_is_rejected_locally() {
    let mut test_ctx = TestCtx::new_app().await;
    test_ctx.log_in("Jane", false);
    test_ctx.navigate(Route::EmailVerify);
    enter_code(&mut test_ctx, "12");

    verify(&mut test_ctx);
    test_ctx.settle().await;

    assert_eq!(test_ctx.route(), Route::EmailVerify);
    assert!(
        test_ctx
            .harness()
            .query_by_label("Please enter all 6 digits of the OTP.")
            .is_some()
    );
}

#[tokio::test]
async fn test_verified_code_refreshes_profile_and_goes_home() {
    let mut test_ctx = TestCtx::new_app().await;
    test_ctx.mock_status("POST", "/verify-otp", 200).await;
    test_ctx
        .mock_json(
            "GET",
            "/profile",
            200,
            serde_json::json!({ "name": "Jane", "isAccountVerified": true }),
        )
        .await;
    test_ctx.log_in("Jane", false);
    test_ctx.navigate(Route::EmailVerify);
    enter_code(&mut test_ctx, "654321");

    verify(&mut test_ctx);
    test_ctx.settle().await;

    assert_eq!(test_ctx.route(), Route::Home);
    let verified = test_ctx
        .state()
        .ctx
        .cached::<SessionCompute>()
        .and_then(|session| session.user.as_ref())
        .is_some_and(|user| user.is_account_verified);
    assert!(verified, "Profile should be reloaded after verification");
    assert!(
        test_ctx
            .harness()
            .query_by_label("Email verified successfully!")
            .is_some()
    );
}

#[tokio::test]
async fn test_wrong_code_shows_server_message() {
    let mut test_ctx = TestCtx::new_app().await;
    test_ctx
        .mock_json(
            "POST",
            "/verify-otp",
            400,
            serde_json::json!({ "message": "Invalid OTP" }),
        )
        .await;
    test_ctx.log_in("Jane", false);
    test_ctx.navigate(Route::EmailVerify);
    enter_code(&mut test_ctx, "000000");

    verify(&mut test_ctx);
    test_ctx.settle().await;

    assert_eq!(test_ctx.route(), Route::EmailVerify);
    assert!(test_ctx.harness().query_by_label("Invalid OTP").is_some());
}

#[tokio::test]
async fn test_response_after_leaving_page_is_ignored() {
    let mut test_ctx = TestCtx::new_app().await;
    test_ctx
        .mock_delayed("POST", "/verify-otp", 200, Duration::from_millis(400))
        .await;
    test_ctx.log_in("Jane", false);
    test_ctx.navigate(Route::EmailVerify);
    enter_code(&mut test_ctx, "654321");

    verify(&mut test_ctx);
    test_ctx.harness_mut().step();
    assert!(test_ctx.harness().query_by_label("Verifying...").is_some());

    test_ctx.navigate(Route::Home);
    tokio::time::sleep(Duration::from_millis(600)).await;
    test_ctx.settle().await;

    assert_eq!(test_ctx.route(), Route::Home);
    assert!(
        test_ctx
            .harness()
            .query_by_label("Email verified successfully!")
            .is_none(),
        "A cancelled verification must not toast"
    );
}

#[tokio::test]
async fn test_idle_frames_leave_the_input_untouched() {
    let mut test_ctx = TestCtx::new_app_at(Route::EmailVerify).await;
    test_ctx.harness_mut().step();
    test_ctx.harness_mut().step();

    assert_eq!(
        test_ctx.state().ctx.sync_status::<EmailVerifyInput>(),
        Some(StateSyncStatus::Clean)
    );
}

#[tokio::test]
async fn test_leaving_during_profile_reload_keeps_the_session() {
    let mut test_ctx = TestCtx::new_app().await;
    test_ctx.mock_status("POST", "/verify-otp", 200).await;
    test_ctx
        .mock_json_delayed(
            "GET",
            "/profile",
            serde_json::json!({ "name": "Jane", "isAccountVerified": true }),
            Duration::from_millis(300),
        )
        .await;
    test_ctx.log_in("Jane", false);
    test_ctx.navigate(Route::EmailVerify);
    enter_code(&mut test_ctx, "654321");

    verify(&mut test_ctx);
    tokio::time::sleep(Duration::from_millis(100)).await;
    test_ctx.navigate(Route::Login);
    tokio::time::sleep(Duration::from_millis(400)).await;
    test_ctx.settle().await;

    let verified = test_ctx
        .state()
        .ctx
        .cached::<SessionCompute>()
        .and_then(|session| session.user.as_ref())
        .is_some_and(|user| user.is_account_verified);
    assert!(verified, "Profile reload should finish after leaving the page");
}
