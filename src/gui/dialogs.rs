use crate::common::Result;
use crate::core::{failure_message, LoginOutcome};
use eframe::egui;
use image::RgbImage;

pub const GREEN: egui::Color32 = egui::Color32::from_rgb(0, 128, 0);
pub const GRAY: egui::Color32 = egui::Color32::from_rgb(160, 160, 160);
pub const RED: egui::Color32 = egui::Color32::from_rgb(200, 0, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    fn title(self) -> &'static str {
        match self {
            MessageKind::Success => "Success",
            MessageKind::Error => "Error",
        }
    }
}

/// A dismissable message window, shown on top of everything else.
#[derive(Debug, Clone)]
pub struct MessageBox {
    pub kind: MessageKind,
    pub text: String,
}

impl MessageBox {
    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: MessageKind::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: MessageKind::Error, text: text.into() }
    }

    /// The box shown when a login attempt finishes.
    pub fn for_login(result: &Result<LoginOutcome>) -> Self {
        match result {
            Ok(outcome) if outcome.is_success() => Self::success(outcome.message()),
            Ok(outcome) => Self::error(outcome.message()),
            Err(e) => Self::error(failure_message(e)),
        }
    }

    /// Returns `true` once the user dismissed the box.
    pub fn show(&self, ctx: &egui::Context) -> bool {
        let mut dismissed = false;

        egui::Window::new(self.kind.title())
            .collapsible(false)
            .resizable(false)
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.add_space(10.0);
                ui.label(egui::RichText::new(&self.text).size(18.0));
                ui.add_space(10.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        dismissed || ctx.input(|i| i.key_pressed(egui::Key::Escape))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAction {
    None,
    Accept,
    Cancel,
}

/// State of the "Register New User" window: the frame frozen when it opened
/// and the name being typed.
pub struct RegisterDialog {
    pub frame: RgbImage,
    pub name: String,
    texture: Option<egui::TextureHandle>,
    focus_requested: bool,
}

impl RegisterDialog {
    pub fn new(frame: RgbImage) -> Self {
        Self {
            frame,
            name: String::new(),
            texture: None,
            focus_requested: false,
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, preview_size: egui::Vec2) -> RegisterAction {
        let mut action = RegisterAction::None;

        let texture = self.texture.get_or_insert_with(|| {
            ctx.load_texture("register_capture", to_color_image(&self.frame), egui::TextureOptions::LINEAR)
        });
        let size = fit_size(&self.frame, preview_size);
        let texture_id = texture.id();

        egui::Window::new("Register New User")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.add(egui::Image::new(egui::load::SizedTexture::new(texture_id, size)));

                    ui.add_space(20.0);
                    ui.vertical(|ui| {
                        ui.label(egui::RichText::new("Enter your name").size(20.0));
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut self.name)
                                .desired_width(240.0)
                                .font(egui::TextStyle::Heading),
                        );
                        if !self.focus_requested {
                            response.request_focus();
                            self.focus_requested = true;
                        }
                        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            action = RegisterAction::Accept;
                        }

                        ui.add_space(40.0);
                        if ui.add(big_button("Accept", GREEN, egui::Color32::WHITE)).clicked() {
                            action = RegisterAction::Accept;
                        }
                        ui.add_space(20.0);
                        if ui.add(big_button("Cancel", RED, egui::Color32::BLACK)).clicked() {
                            action = RegisterAction::Cancel;
                        }
                    });
                });
            });

        action
    }
}

pub fn big_button(text: &str, fill: egui::Color32, text_color: egui::Color32) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.to_string()).size(20.0).color(text_color))
        .fill(fill)
        .min_size(egui::vec2(180.0, 60.0))
}

pub fn to_color_image(frame: &RgbImage) -> egui::ColorImage {
    egui::ColorImage::from_rgb([frame.width() as usize, frame.height() as usize], frame.as_raw())
}

/// Largest size with the frame's aspect ratio that fits in `bounds`.
pub fn fit_size(frame: &RgbImage, bounds: egui::Vec2) -> egui::Vec2 {
    let width = frame.width().max(1) as f32;
    let height = frame.height().max(1) as f32;
    let scale = (bounds.x / width).min(bounds.y / height);
    egui::vec2(width * scale, height * scale)
}
