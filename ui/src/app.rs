use std::time::Duration;

use secure_business::{Route, sync_page_lifecycle};

use crate::{pages, state::State, widgets};

/// How often to poll for command results while requests are in flight.
const PENDING_REPAINT: Duration = Duration::from_millis(100);

pub struct SecureApp {
    state: State,
}

impl SecureApp {
    /// Called once before the first frame.
    pub fn new(state: State) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }
}

impl eframe::App for SecureApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply command results, tear down the old page if the route moved, and
        // re-derive the menu before anything is drawn.
        self.state.ctx.sync_computes();
        sync_page_lifecycle(&mut self.state.ctx);
        self.state.ctx.run_computed();
        self.state.ctx.sync_computes();

        let route = *self.state.ctx.state::<Route>();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            widgets::menubar(&mut self.state.ctx, ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| match route {
            Route::Home => pages::home_page(&mut self.state, ui),
            Route::Login => pages::login_page(&mut self.state, ui),
            Route::ResetPassword => pages::reset_password_page(&mut self.state, ui),
            Route::EmailVerify => pages::email_verify_page(&mut self.state, ui),
        });

        widgets::toasts(&mut self.state.toasts, ctx);

        // Startup commands and anything queued outside a widget.
        self.state.ctx.flush_commands();

        if *self.state.ctx.state::<Route>() != route {
            ctx.request_repaint();
        } else if self.state.ctx.task_count() > 0 {
            ctx.request_repaint_after(PENDING_REPAINT);
        }
    }
}
