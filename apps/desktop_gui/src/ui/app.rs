use std::time::Duration;

use client_core::ChatClient;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui_commonmark::{CommonMarkCache, CommonMarkViewer};
use shared::domain::{ChatMessage, Preferences, Theme};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{events::UiEvent, orchestration::dispatch_backend_command};
use crate::ui::theme::{visuals_for_preferences, ChatPalette};

const BUBBLE_WIDTH_FRACTION: f32 = 0.75;

pub struct DesktopGuiApp {
    client: ChatClient,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    markdown_cache: CommonMarkCache,
    applied_preferences: Option<Preferences>,
    rendered_revision: Option<u64>,
    composer_focus_requested: bool,
    backend_status: Option<String>,
}

impl DesktopGuiApp {
    pub fn new(client: ChatClient, cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            client,
            cmd_tx,
            ui_rx,
            markdown_cache: CommonMarkCache::default(),
            applied_preferences: None,
            rendered_revision: None,
            composer_focus_requested: true,
            backend_status: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::ReplyReceived(outcome) => {
                    self.client.resolve(outcome);
                    self.composer_focus_requested = true;
                }
                UiEvent::BackendUnavailable(reason) => {
                    tracing::error!("backend unavailable: {reason}");
                    self.backend_status = Some(reason);
                }
            }
        }
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        let prefs = self.client.preferences();
        if self.applied_preferences == Some(prefs) {
            return;
        }

        let mut style = (*ctx.style()).clone();
        style.visuals = visuals_for_preferences(prefs);
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        style.spacing.button_padding = egui::vec2(10.0, 6.0);
        style.spacing.interact_size = egui::vec2(40.0, 30.0);
        ctx.set_style(style);
        self.applied_preferences = Some(prefs);
    }

    fn submit_composer(&mut self) {
        let Some(request) = self.client.submit() else {
            return;
        };
        tracing::debug!(chars = request.message.chars().count(), "submitting message");
        if let Err(err) = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::DeliverMessage { request },
        ) {
            self.client.resolve(Err(err));
        }
    }

    fn show_header(&mut self, ctx: &egui::Context, palette: &ChatPalette) {
        let frame = egui::Frame::NONE
            .fill(palette.header_background)
            .inner_margin(egui::Margin::symmetric(16, 10))
            .stroke(egui::Stroke::new(1.0, palette.divider));

        egui::TopBottomPanel::top("chat_header")
            .frame(frame)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(
                            egui::RichText::new("🤖 n8n Chatbot")
                                .size(18.0)
                                .strong()
                                .color(palette.header_text),
                        );
                        ui.label(
                            egui::RichText::new(format!(
                                "Session: {}...",
                                self.client.session_id().short()
                            ))
                            .size(11.0)
                            .color(palette.muted_text),
                        );
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let prefs = self.client.preferences();
                        if ui.button(theme_toggle_label(prefs.theme)).clicked() {
                            let theme = self.client.toggle_theme();
                            tracing::info!(theme = theme.as_stored(), "theme toggled");
                        }

                        let contrast_label = if prefs.high_contrast {
                            "⚡ Contrast"
                        } else {
                            "⚡"
                        };
                        let contrast_button = egui::Button::new(contrast_label)
                            .stroke(egui::Stroke::new(2.0, palette.contrast_toggle_stroke));
                        if ui
                            .add(contrast_button)
                            .on_hover_text("Toggle high contrast")
                            .clicked()
                        {
                            let on = self.client.toggle_high_contrast();
                            tracing::info!(high_contrast = on, "contrast toggled");
                        }
                    });
                });
            });
    }

    fn show_composer(&mut self, ctx: &egui::Context, palette: &ChatPalette) {
        let frame = egui::Frame::NONE
            .fill(palette.header_background)
            .inner_margin(egui::Margin::symmetric(16, 10))
            .stroke(egui::Stroke::new(1.0, palette.divider));

        let mut submit_requested = false;
        egui::TopBottomPanel::bottom("chat_composer")
            .frame(frame)
            .show(ctx, |ui| {
                let awaiting = self.client.is_awaiting_reply();
                ui.horizontal(|ui| {
                    let send_width = 72.0;
                    let input_width =
                        (ui.available_width() - send_width - ui.spacing().item_spacing.x).max(80.0);
                    let response = ui.add(
                        egui::TextEdit::singleline(self.client.input_mut())
                            .hint_text("Type your message...")
                            .text_color(palette.input_text)
                            .desired_width(input_width)
                            .margin(egui::Margin::symmetric(10, 8)),
                    );
                    if self.composer_focus_requested {
                        response.request_focus();
                        self.composer_focus_requested = false;
                    }
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        submit_requested = true;
                        self.composer_focus_requested = true;
                    }

                    let send = egui::Button::new(
                        egui::RichText::new("Send").strong().color(palette.send_text),
                    )
                    .fill(palette.send_fill)
                    .corner_radius(egui::CornerRadius::same(8))
                    .min_size(egui::vec2(send_width, 32.0));
                    if ui.add_enabled(!awaiting, send).clicked() {
                        submit_requested = true;
                    }
                });

                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(self.client.preferences().mode_hint())
                            .size(11.0)
                            .color(palette.muted_text),
                    );
                    if let Some(status) = &self.backend_status {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(
                                egui::RichText::new(status)
                                    .size(11.0)
                                    .color(egui::Color32::LIGHT_RED),
                            );
                        });
                    }
                });
            });

        if submit_requested {
            self.submit_composer();
        }
    }

    fn show_transcript(&mut self, ctx: &egui::Context, palette: &ChatPalette) {
        let frame = egui::Frame::NONE
            .fill(palette.app_background)
            .inner_margin(egui::Margin::symmetric(16, 12));

        let revision = self.client.revision();
        let scroll_to_latest = self.rendered_revision != Some(revision);

        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("chat_transcript")
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    let bubble_width = ui.available_width() * BUBBLE_WIDTH_FRACTION;
                    for (index, message) in self.client.transcript().iter().enumerate() {
                        show_bubble(
                            ui,
                            &mut self.markdown_cache,
                            palette,
                            index,
                            message,
                            bubble_width,
                        );
                    }

                    if self.client.is_awaiting_reply() {
                        ui.horizontal(|ui| {
                            ui.add(egui::Spinner::new().color(palette.muted_text));
                            ui.label(
                                egui::RichText::new("Bot is typing...")
                                    .italics()
                                    .color(palette.muted_text),
                            );
                        });
                    }

                    if scroll_to_latest {
                        ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                    }
                });
        });

        self.rendered_revision = Some(revision);
    }
}

/// The theme toggle shows the mode currently in effect.
fn theme_toggle_label(theme: Theme) -> &'static str {
    match theme {
        Theme::Dark => "🌙 Dark",
        Theme::Light => "☀️ Light",
    }
}

fn show_bubble(
    ui: &mut egui::Ui,
    cache: &mut CommonMarkCache,
    palette: &ChatPalette,
    index: usize,
    message: &ChatMessage,
    max_width: f32,
) {
    let (fill, text_color, layout) = if message.is_user() {
        (
            palette.user_bubble,
            palette.user_text,
            egui::Layout::right_to_left(egui::Align::TOP),
        )
    } else {
        (
            palette.bot_bubble,
            palette.bot_text,
            egui::Layout::left_to_right(egui::Align::TOP),
        )
    };

    let mut frame = egui::Frame::NONE
        .fill(fill)
        .corner_radius(egui::CornerRadius::same(12))
        .inner_margin(egui::Margin::symmetric(12, 8));
    if palette.bubble_shadow {
        frame = frame.shadow(egui::epaint::Shadow {
            offset: [0, 2],
            blur: 6,
            spread: 0,
            color: egui::Color32::from_black_alpha(60),
        });
    }

    ui.with_layout(layout, |ui| {
        frame.show(ui, |ui| {
            ui.set_max_width(max_width);
            ui.visuals_mut().override_text_color = Some(text_color);
            ui.push_id(("bubble", index), |ui| {
                CommonMarkViewer::new().show(ui, cache, &message.text);
            });
        });
    });
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.apply_theme_if_needed(ctx);

        let palette = ChatPalette::for_preferences(self.client.preferences());
        self.show_header(ctx, &palette);
        self.show_composer(ctx, &palette);
        self.show_transcript(ctx, &palette);

        if self.client.is_awaiting_reply() {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}
