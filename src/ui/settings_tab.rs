//! Settings tab UI rendering

use eframe::egui::{self, RichText};

use crate::app::AtelierApp;
use crate::config::BACKEND_URL_ENV;
use crate::ui::{render_section_frame, theme::ThemePreset};

/// Render the settings tab
pub fn render_settings_tab(app: &mut AtelierApp, ui: &mut egui::Ui) {
    let theme = app.ui.current_theme.clone();

    egui::ScrollArea::vertical()
        .id_salt("settings_scroll")
        .show(ui, |ui| {
            // Backend section
            render_section_frame(app, ui, "Backend", |app, ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Server URL:").color(theme.text_muted));
                    ui.add(
                        egui::TextEdit::singleline(&mut app.settings_url)
                            .hint_text("http://localhost:8000")
                            .desired_width(300.0),
                    );
                    if ui.button("Apply").clicked() {
                        app.apply_backend_url();
                    }
                });

                ui.add_space(8.0);
                ui.label(
                    RichText::new(format!("In effect: {}", app.client.base_url()))
                        .color(theme.text_secondary)
                        .size(11.0),
                );

                // The environment variable always wins over this setting
                if std::env::var(BACKEND_URL_ENV).is_ok() {
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new(format!(
                            "{} is set and overrides the URL configured here",
                            BACKEND_URL_ENV
                        ))
                        .color(theme.warning)
                        .size(11.0),
                    );
                }
            });

            ui.add_space(12.0);

            // Appearance section
            render_section_frame(app, ui, "Appearance", |app, ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Theme:").color(theme.text_muted));

                    let current_name = app.config.studio.theme.name();
                    egui::ComboBox::from_id_salt("theme_select")
                        .selected_text(current_name)
                        .show_ui(ui, |ui| {
                            for preset in ThemePreset::all() {
                                if ui
                                    .selectable_label(
                                        app.config.studio.theme == *preset,
                                        preset.name(),
                                    )
                                    .clicked()
                                {
                                    app.config.studio.theme = *preset;
                                    app.ui.current_theme = preset.theme();
                                    app.ui.theme_dirty = true;
                                    app.save_config();
                                }
                            }
                        });
                });
            });
        });
}
