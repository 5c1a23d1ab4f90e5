//! Backend endpoint paths, relative to `BusinessConfig::api_base_url`.

pub const REGISTER: &str = "/register";
pub const LOGIN: &str = "/login";
pub const LOGOUT: &str = "/logout";
pub const SEND_OTP: &str = "/send-otp";
pub const VERIFY_OTP: &str = "/verify-otp";
pub const SEND_RESET_OTP: &str = "/send-reset-otp";
pub const RESET_PASSWORD: &str = "/reset-password";
pub const IS_AUTHENTICATED: &str = "/is-authenticated";
pub const PROFILE: &str = "/profile";

/// Fallback for a failed request whose body carries no `message`.
pub const GENERIC_RETRY_MESSAGE: &str = "Something went wrong, please try again.";
/// Fallback for auth form and logout failures.
pub const GENERIC_MESSAGE: &str = "Something went wrong.";
