use secure_business::{BusinessConfig, SessionProbeCommand, ToastFeed, build_state_ctx};
use secure_states::StateCtx;

/// The main application state.
pub struct State {
    /// The state context for business logic.
    pub ctx: StateCtx,
    /// Toasts pushed by commands, drained every frame.
    pub toasts: ToastFeed,
}

impl Default for State {
    fn default() -> Self {
        let (mut ctx, toasts) = build_state_ctx(load_config());
        ctx.enqueue_command::<SessionProbeCommand>();

        Self { ctx, toasts }
    }
}

impl State {
    /// A state talking to `base_url`, without the startup session probe.
    pub fn test(base_url: String) -> Self {
        let (ctx, toasts) = build_state_ctx(BusinessConfig::new(base_url));

        Self { ctx, toasts }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config() -> BusinessConfig {
    BusinessConfig::from_env().unwrap_or_else(|err| {
        log::warn!("Falling back to the default backend address: {err}");
        BusinessConfig::default()
    })
}

#[cfg(target_arch = "wasm32")]
fn load_config() -> BusinessConfig {
    BusinessConfig::default()
}
