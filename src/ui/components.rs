//! Shared UI components for Atelier

use eframe::egui::{self, Color32, CornerRadius, RichText, Vec2};

use crate::app::AtelierApp;
use crate::state::{BackendStatus, Tab};

/// Render a tab button
pub fn render_tab(app: &mut AtelierApp, ui: &mut egui::Ui, tab: Tab, label: &str, enabled: bool) {
    let theme = &app.ui.current_theme;
    let is_active = app.ui.active_tab == tab;

    let (bg, text_color) = if is_active {
        (theme.bg_medium, theme.accent)
    } else if enabled {
        (Color32::TRANSPARENT, theme.text_secondary)
    } else {
        (Color32::TRANSPARENT, theme.text_muted)
    };

    let button = egui::Button::new(RichText::new(label).color(text_color))
        .fill(bg)
        .corner_radius(CornerRadius {
            nw: 6,
            ne: 6,
            sw: 0,
            se: 0,
        })
        .min_size(Vec2::new(90.0, 32.0));

    if ui.add_enabled(enabled, button).clicked() {
        app.ui.active_tab = tab;
    }
}

/// Render the warning banner shown while the backend is unreachable
pub fn render_offline_banner(app: &mut AtelierApp, ui: &mut egui::Ui) {
    if app.health.status != BackendStatus::Offline {
        return;
    }

    let theme = app.ui.current_theme.clone();

    egui::Frame::new()
        .fill(theme.error.gamma_multiply(0.15))
        .corner_radius(8)
        .inner_margin(12)
        .stroke(egui::Stroke::new(1.0, theme.error))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                RichText::new("Backend Not Available")
                    .color(theme.error)
                    .strong(),
            );
            ui.add_space(4.0);
            ui.label(
                RichText::new(format!(
                    "The backend server is not responding. Please make sure it's running at {}",
                    app.client.base_url()
                ))
                .color(theme.text_secondary)
                .size(12.0),
            );
            ui.add_space(8.0);
            if ui.button("Retry").clicked() {
                app.retry_health_check();
            }
        });

    ui.add_space(12.0);
}

/// Render a titled section frame
pub fn render_section_frame<F>(app: &mut AtelierApp, ui: &mut egui::Ui, title: &str, content: F)
where
    F: FnOnce(&mut AtelierApp, &mut egui::Ui),
{
    let theme = app.ui.current_theme.clone();

    egui::Frame::new()
        .fill(theme.bg_medium)
        .corner_radius(8)
        .inner_margin(16)
        .stroke(egui::Stroke::new(1.0, theme.border))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).color(theme.accent).size(13.0).strong());
            ui.add_space(12.0);
            content(app, ui);
        });
}
