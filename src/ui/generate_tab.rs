//! Generate tab UI rendering

use std::time::Instant;

use eframe::egui::{self, RichText, Vec2};

use crate::app::AtelierApp;
use crate::state::BackendStatus;
use crate::ui::{render_offline_banner, render_section_frame};

/// Render the generate tab content
pub fn render_generate_tab(app: &mut AtelierApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();

    render_offline_banner(app, ui);

    egui::ScrollArea::vertical()
        .id_salt("generate_scroll")
        .show(ui, |ui| {
            // Prompt section
            render_section_frame(app, ui, "Prompt", |app, ui| {
                let response = ui.add(
                    egui::TextEdit::multiline(&mut app.prompt)
                        .hint_text("Describe the image you want to generate...")
                        .desired_width(f32::INFINITY)
                        .desired_rows(4),
                );
                if response.changed() {
                    app.negative.on_prompt_edited(&app.prompt, Instant::now());
                }
            });

            ui.add_space(12.0);

            // Negative prompt section
            render_section_frame(app, ui, "Negative Prompt (Auto-Generated)", |app, ui| {
                ui.horizontal(|ui| {
                    if app.negative.loading {
                        ui.spinner();
                        ui.label(RichText::new("Generating...").color(theme.text_muted).size(11.0));
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let can_regenerate = !app.prompt.trim().is_empty()
                            && !app.negative.loading
                            && app.health.status != BackendStatus::Offline;
                        if ui
                            .add_enabled(can_regenerate, egui::Button::new("Regenerate"))
                            .on_hover_text("Regenerate negative prompt")
                            .clicked()
                        {
                            app.regenerate_negative_prompt();
                        }
                    });
                });
                ui.add_space(4.0);

                ui.add(
                    egui::TextEdit::multiline(&mut app.negative.text)
                        .hint_text("Elements you want to exclude from the image...")
                        .desired_width(f32::INFINITY)
                        .desired_rows(3),
                );

                if let Some(ref err) = app.negative.error {
                    ui.add_space(4.0);
                    ui.label(RichText::new(err).color(theme.error).size(11.0));
                }
            });

            ui.add_space(16.0);

            // Submit button - full width, prominent
            let can_generate =
                !app.generation.loading && app.health.status != BackendStatus::Offline;
            let label = if app.generation.loading {
                "Generating..."
            } else {
                "Generate Image"
            };

            let generate_btn = egui::Button::new(
                RichText::new(label)
                    .color(if can_generate {
                        theme.bg_darkest
                    } else {
                        theme.text_muted
                    })
                    .size(16.0)
                    .strong(),
            )
            .fill(if can_generate {
                theme.accent
            } else {
                theme.bg_medium
            })
            .min_size(Vec2::new(ui.available_width(), 44.0))
            .corner_radius(6);

            if ui.add_enabled(can_generate, generate_btn).clicked() {
                app.start_generation();
            }

            if app.generation.loading {
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(RichText::new("This can take a while...").color(theme.text_muted));
                });
            }

            // Inline error alert
            if let Some(ref err) = app.generation.error {
                ui.add_space(8.0);
                egui::Frame::new()
                    .fill(theme.error.gamma_multiply(0.15))
                    .corner_radius(6)
                    .inner_margin(10)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(RichText::new(err).color(theme.error));
                    });
            }

            // Result section
            render_result(app, ui);
        });
}

/// Render the generated image, save/open actions, and the enhanced prompt
fn render_result(app: &mut AtelierApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();

    let Some(image_url) = app.generation.image_url.clone() else {
        return;
    };

    ui.add_space(16.0);

    render_section_frame(app, ui, "Generated Image", |app, ui| {
        if let Some(texture) = app.generation.texture.clone() {
            let available = ui.available_width();
            let size = texture.size_vec2();
            let scale = (available / size.x).min(1.0);
            ui.add(
                egui::Image::new(&texture)
                    .fit_to_exact_size(size * scale)
                    .corner_radius(4),
            );
        } else {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new("Loading image...").color(theme.text_muted));
            });
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(app.generation.has_image(), egui::Button::new("Save..."))
                .clicked()
            {
                if let Some(event) = app.generation.save_to_disk() {
                    app.handle_events(vec![event]);
                }
            }

            if ui.link("Open in browser").clicked() {
                if let Err(e) = open::that(&image_url) {
                    tracing::warn!("Failed to open browser: {}", e);
                }
            }
        });

        if let Some(enhanced) = app.generation.enhanced_prompt.clone() {
            ui.add_space(12.0);
            egui::Frame::new()
                .fill(theme.bg_light.gamma_multiply(0.5))
                .corner_radius(4)
                .inner_margin(12)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(
                        RichText::new("Enhanced Prompt")
                            .color(theme.accent)
                            .size(12.0)
                            .strong(),
                    );
                    ui.add_space(6.0);
                    ui.label(RichText::new(enhanced).color(theme.text_secondary));
                });
        }
    });
}
