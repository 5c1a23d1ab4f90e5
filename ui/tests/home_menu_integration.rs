//! Home page greeting and the menu bar's login button and profile dropdown.

mod common;

use common::TestCtx;
use egui::accesskit::Role;
use kittest::Queryable;
use secure_business::{DropdownState, Route};

fn open_dropdown(test_ctx: &mut TestCtx<'_>) {
    test_ctx
        .state_mut()
        .ctx
        .update::<DropdownState>(|dropdown| dropdown.open = true);
    test_ctx.harness_mut().step();
    test_ctx.harness_mut().step();
}

#[tokio::test]
async fn test_home_greets_developer_when_logged_out() {
    let mut test_ctx = TestCtx::new_app().await;
    let harness = test_ctx.harness_mut();
    harness.step();

    assert!(harness.query_by_label("Hey Developer!").is_some());
    assert!(harness.query_by_label("Welcome to our app").is_some());
    assert!(
        harness
            .query_by_role_and_label(Role::Button, "Login")
            .is_some(),
        "Logged-out menu should offer the login button"
    );
}

#[tokio::test]
async fn test_home_greets_logged_in_user_and_shows_avatar() {
    let mut test_ctx = TestCtx::new_app().await;
    test_ctx.log_in("jane doe", true);

    let harness = test_ctx.harness();
    assert!(harness.query_by_label("Hey jane doe!").is_some());
    assert!(
        harness.query_by_role_and_label(Role::Button, "J").is_some(),
        "Avatar should show the upper-cased initial"
    );
    assert!(
        harness
            .query_by_role_and_label(Role::Button, "Login")
            .is_none()
    );
}

#[tokio::test]
async fn test_menu_login_button_opens_login_page() {
    let mut test_ctx = TestCtx::new_app().await;
    test_ctx.harness_mut().step();

    test_ctx
        .harness()
        .get_by_role_and_label(Role::Button, "Login")
        .click();
    test_ctx.harness_mut().step();
    test_ctx.harness_mut().step();

    assert_eq!(test_ctx.route(), Route::Login);
    assert!(
        test_ctx
            .harness()
            .query_by_label("Login to your account!")
            .is_some()
    );
}

#[tokio::test]
async fn test_title_link_returns_home() {
    let mut test_ctx = TestCtx::new_app_at(Route::Login).await;

    test_ctx.harness().get_by_label("Secure").click();
    test_ctx.harness_mut().step();
    test_ctx.harness_mut().step();

    assert_eq!(test_ctx.route(), Route::Home);
    assert!(test_ctx.harness().query_by_label("Hey Developer!").is_some());
}

#[tokio::test]
async fn test_dropdown_hides_verify_email_for_verified_user() {
    let mut test_ctx = TestCtx::new_app().await;
    test_ctx.log_in("Jane", true);
    open_dropdown(&mut test_ctx);

    let harness = test_ctx.harness();
    assert!(harness.query_by_label("Logout").is_some());
    assert!(harness.query_by_label("Verify Email").is_none());
}

#[tokio::test]
async fn test_logout_returns_to_logged_out_menu() {
    let mut test_ctx = TestCtx::new_app().await;
    test_ctx.mock_status("POST", "/logout", 200).await;
    test_ctx.log_in("Jane", true);
    test_ctx.navigate(Route::Login);
    open_dropdown(&mut test_ctx);

    test_ctx.harness().get_by_label("Logout").click();
    test_ctx.harness_mut().step();
    test_ctx.settle().await;

    assert_eq!(test_ctx.route(), Route::Home);
    assert!(!test_ctx.state().ctx.state::<DropdownState>().open);
    let harness = test_ctx.harness();
    assert!(harness.query_by_label("Hey Developer!").is_some());
    assert!(
        harness
            .query_by_role_and_label(Role::Button, "Login")
            .is_some()
    );
}

#[tokio::test]
async fn test_failed_logout_shows_server_message() {
    let mut test_ctx = TestCtx::new_app().await;
    test_ctx
        .mock_json(
            "POST",
            "/logout",
            500,
            serde_json::json!({ "message": "Session store unavailable" }),
        )
        .await;
    test_ctx.log_in("Jane", true);
    open_dropdown(&mut test_ctx);

    test_ctx.harness().get_by_label("Logout").click();
    test_ctx.harness_mut().step();
    test_ctx.settle().await;

    let harness = test_ctx.harness();
    assert!(
        harness
            .query_by_label("Session store unavailable")
            .is_some()
    );
    assert!(harness.query_by_label("Hey Jane!").is_some());
}

#[tokio::test]
async fn test_verify_email_entry_sends_code_and_opens_page() {
    let mut test_ctx = TestCtx::new_app().await;
    test_ctx.mock_status("POST", "/send-otp", 200).await;
    test_ctx.log_in("Jane", false);
    open_dropdown(&mut test_ctx);

    test_ctx.harness().get_by_label("Verify Email").click();
    test_ctx.harness_mut().step();
    test_ctx.settle().await;

    assert_eq!(test_ctx.route(), Route::EmailVerify);
    let harness = test_ctx.harness();
    assert!(harness.query_by_label("Email Verify OTP").is_some());
    assert!(
        harness
            .query_by_label("OTP has been sent successfully.")
            .is_some()
    );
}
