use crate::common::{Config, Result};
use crate::core::{LoginOutcome, LoginService, Webcam, WebcamState};
use crate::gui::dialogs::{self, big_button, MessageBox, RegisterAction, RegisterDialog};
use crate::storage::LogEntry;
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::time::{Duration, Instant};

const PENDING_REPAINT: Duration = Duration::from_millis(100);

pub struct FaceLoginApp {
    webcam: Webcam,
    login: LoginService,
    preview_size: egui::Vec2,
    controls_width: f32,

    // Preview texture and the webcam generation it was built from
    preview: Option<egui::TextureHandle>,
    preview_generation: Option<u64>,

    message: Option<MessageBox>,
    register: Option<RegisterDialog>,

    // Background login
    pending_login: Option<Receiver<Result<LoginOutcome>>>,

    identity_count: usize,
    last_login: Option<LogEntry>,
}

impl FaceLoginApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: &Config, mut webcam: Webcam, login: LoginService) -> Self {
        webcam.start(Instant::now());

        let mut app = Self {
            webcam,
            login,
            preview_size: egui::vec2(config.window.preview_width as f32, config.window.preview_height as f32),
            controls_width: (config.window.width - config.window.preview_width as f32 - 40.0).max(200.0),
            preview: None,
            preview_generation: None,
            message: None,
            register: None,
            pending_login: None,
            identity_count: 0,
            last_login: None,
        };
        app.refresh_status();
        app
    }

    fn refresh_status(&mut self) {
        match self.login.database().identities() {
            Ok(names) => self.identity_count = names.len(),
            Err(e) => tracing::warn!("Could not list registered identities: {}", e),
        }
        match self.login.access_log().entries() {
            Ok(mut entries) => self.last_login = entries.pop(),
            Err(e) => tracing::warn!("Could not read access log: {}", e),
        }
    }

    fn start_login(&mut self, ctx: &egui::Context) {
        let frame = match self.webcam.capture() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Cannot login: {}", e);
                self.message = Some(MessageBox::error("Webcam is not active. Cannot login."));
                return;
            }
        };

        let (tx, rx) = channel();
        self.pending_login = Some(rx);

        let service = self.login.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let result = service.login(&frame);
            // The receiver is gone only if the window closed mid-login.
            let _ = tx.send(result);
            ctx.request_repaint();
        });
    }

    fn check_login(&mut self) {
        let Some(receiver) = self.pending_login.as_ref() else {
            return;
        };

        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                tracing::error!("Login worker exited without a result");
                self.pending_login = None;
                self.message = Some(MessageBox::error("Face recognition failed."));
                return;
            }
        };
        self.pending_login = None;

        match &result {
            Ok(outcome) if outcome.is_success() => self.refresh_status(),
            Ok(_) => {}
            Err(e) => tracing::error!("Error during login: {}", e),
        }
        self.message = Some(MessageBox::for_login(&result));
    }

    fn open_register(&mut self) {
        match self.webcam.capture() {
            Ok(frame) => self.register = Some(RegisterDialog::new(frame)),
            Err(e) => {
                tracing::warn!("Cannot register: {}", e);
                self.message = Some(MessageBox::error("Webcam is not active. Cannot register."));
            }
        }
    }

    fn accept_register(&mut self) {
        let Some(dialog) = self.register.as_ref() else {
            return;
        };

        let name = dialog.name.trim().to_string();
        if name.is_empty() {
            self.message = Some(MessageBox::error("Please enter a name"));
            return;
        }

        match self.login.database().register(&name, &dialog.frame) {
            Ok(_) => {
                self.message = Some(MessageBox::success(format!("User '{}' registered successfully", name)));
                self.register = None;
                self.refresh_status();
            }
            Err(e) => {
                tracing::error!("Error during registration: {}", e);
                self.message = Some(MessageBox::error(format!("Registration failed: {}", e)));
            }
        }
    }

    fn refresh_preview(&mut self, ctx: &egui::Context) {
        let generation = self.webcam.generation();
        if self.preview_generation == Some(generation) {
            return;
        }

        let image = dialogs::to_color_image(self.webcam.display_frame());
        match self.preview.as_mut() {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => self.preview = Some(ctx.load_texture("webcam", image, egui::TextureOptions::LINEAR)),
        }
        self.preview_generation = Some(generation);
    }

    fn render_preview(&self, ui: &mut egui::Ui) {
        let Some(texture) = self.preview.as_ref() else {
            return;
        };

        let size = dialogs::fit_size(self.webcam.display_frame(), self.preview_size);
        ui.allocate_ui(self.preview_size, |ui| {
            ui.centered_and_justified(|ui| {
                ui.add(egui::Image::new(egui::load::SizedTexture::new(texture.id(), size)));
            });
        });

        if self.webcam.state() == WebcamState::Inactive {
            ui.colored_label(egui::Color32::LIGHT_RED, "Webcam unavailable, retrying...");
        }
    }

    fn render_controls(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let busy = self.pending_login.is_some();

        ui.add_space(200.0);
        let login_text = if busy { "Checking..." } else { "Login" };
        if ui.add_enabled(!busy, big_button(login_text, dialogs::GREEN, egui::Color32::WHITE)).clicked() {
            self.start_login(ctx);
        }

        ui.add_space(40.0);
        if ui.add_enabled(!busy, big_button("Register", dialogs::GRAY, egui::Color32::BLACK)).clicked() {
            self.open_register();
        }

        ui.add_space(40.0);
        ui.label(format!("Registered users: {}", self.identity_count));
        if let Some(entry) = &self.last_login {
            ui.label(format!("Last login: {} at {}", entry.name, entry.timestamp));
        }
    }
}

impl eframe::App for FaceLoginApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) {
            self.webcam.release();
            return;
        }

        self.webcam.tick(Instant::now());
        self.check_login();
        self.refresh_preview(ctx);

        egui::SidePanel::right("controls")
            .resizable(false)
            .exact_width(self.controls_width)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| self.render_controls(ui, ctx));
            });

        egui::CentralPanel::default().show(ctx, |ui| self.render_preview(ui));

        // Messages first, so one raised below is drawn from the next frame on.
        if let Some(message) = &self.message {
            if message.show(ctx) {
                self.message = None;
            }
        } else if let Some(dialog) = self.register.as_mut() {
            match dialog.show(ctx, self.preview_size) {
                RegisterAction::Accept => self.accept_register(),
                RegisterAction::Cancel => self.register = None,
                RegisterAction::None => {}
            }
        }

        let until_due = self.webcam.next_due().saturating_duration_since(Instant::now());
        let wait = if self.pending_login.is_some() { until_due.min(PENDING_REPAINT) } else { until_due };
        ctx.request_repaint_after(wait);
    }
}
