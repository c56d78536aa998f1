use eframe::egui::{self, Color32, Stroke, Visuals};
use serde::{Deserialize, Serialize};

/// Available theme presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreset {
    #[default]
    Indigo,
    Rose,
    Graphite,
}

impl ThemePreset {
    /// Get all available presets
    pub fn all() -> &'static [ThemePreset] {
        &[ThemePreset::Indigo, ThemePreset::Rose, ThemePreset::Graphite]
    }

    /// Get display name for the preset
    pub fn name(&self) -> &'static str {
        match self {
            ThemePreset::Indigo => "Indigo",
            ThemePreset::Rose => "Rose",
            ThemePreset::Graphite => "Graphite",
        }
    }

    /// Get the theme colors for this preset
    pub fn theme(&self) -> Theme {
        match self {
            ThemePreset::Indigo => Theme::indigo(),
            ThemePreset::Rose => Theme::rose(),
            ThemePreset::Graphite => Theme::graphite(),
        }
    }
}

/// Theme color definitions
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors
    pub bg_darkest: Color32,
    pub bg_dark: Color32,
    pub bg_medium: Color32,
    pub bg_light: Color32,

    // Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    // Accent colors
    pub accent: Color32,
    pub accent_hover: Color32,
    pub accent_muted: Color32,

    // Semantic colors
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,

    // UI element colors
    pub border: Color32,
    pub selection: Color32,
}

impl Theme {
    /// Indigo theme - default studio look
    pub fn indigo() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(15, 15, 22),
            bg_dark: Color32::from_rgb(22, 22, 32),
            bg_medium: Color32::from_rgb(30, 30, 44),
            bg_light: Color32::from_rgb(44, 44, 62),

            text_primary: Color32::from_rgb(248, 248, 252),
            text_secondary: Color32::from_rgb(198, 200, 215),
            text_muted: Color32::from_rgb(135, 138, 160),

            accent: Color32::from_rgb(99, 102, 241),        // Indigo-500
            accent_hover: Color32::from_rgb(129, 140, 248), // Indigo-400
            accent_muted: Color32::from_rgb(67, 70, 180),   // Darker indigo

            success: Color32::from_rgb(34, 197, 94),  // Green-500
            warning: Color32::from_rgb(234, 179, 8),  // Yellow-500
            error: Color32::from_rgb(239, 68, 68),    // Red-500

            border: Color32::from_rgb(58, 58, 78),
            selection: Color32::from_rgb(99, 102, 241).gamma_multiply(0.3),
        }
    }

    /// Rose theme - warm gallery look
    pub fn rose() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(24, 15, 18),
            bg_dark: Color32::from_rgb(32, 22, 26),
            bg_medium: Color32::from_rgb(44, 30, 36),
            bg_light: Color32::from_rgb(62, 44, 52),

            text_primary: Color32::from_rgb(253, 245, 248),
            text_secondary: Color32::from_rgb(220, 200, 208),
            text_muted: Color32::from_rgb(160, 135, 145),

            accent: Color32::from_rgb(244, 63, 94),         // Rose-500
            accent_hover: Color32::from_rgb(251, 113, 133), // Rose-400
            accent_muted: Color32::from_rgb(190, 40, 70),   // Darker rose

            success: Color32::from_rgb(74, 222, 128),  // Green-400
            warning: Color32::from_rgb(250, 204, 21),  // Yellow-400
            error: Color32::from_rgb(248, 113, 113),   // Red-400

            border: Color32::from_rgb(80, 58, 66),
            selection: Color32::from_rgb(244, 63, 94).gamma_multiply(0.3),
        }
    }

    /// Graphite theme - neutral, low-contrast
    pub fn graphite() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(16, 16, 18),
            bg_dark: Color32::from_rgb(24, 24, 27),
            bg_medium: Color32::from_rgb(32, 32, 36),
            bg_light: Color32::from_rgb(48, 48, 54),

            text_primary: Color32::from_rgb(250, 250, 250),
            text_secondary: Color32::from_rgb(200, 200, 200),
            text_muted: Color32::from_rgb(140, 140, 140),

            accent: Color32::from_rgb(161, 161, 170),       // Zinc-400
            accent_hover: Color32::from_rgb(212, 212, 216), // Zinc-300
            accent_muted: Color32::from_rgb(113, 113, 122), // Zinc-500

            success: Color32::from_rgb(34, 197, 94),
            warning: Color32::from_rgb(234, 179, 8),
            error: Color32::from_rgb(239, 68, 68),

            border: Color32::from_rgb(63, 63, 70),
            selection: Color32::from_rgb(161, 161, 170).gamma_multiply(0.3),
        }
    }

    /// Apply this theme to egui's visuals
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();

        // Window and panel backgrounds
        visuals.window_fill = self.bg_dark;
        visuals.panel_fill = self.bg_dark;
        visuals.faint_bg_color = self.bg_medium;
        visuals.extreme_bg_color = self.bg_darkest;

        // Widget backgrounds
        visuals.widgets.noninteractive.bg_fill = self.bg_medium;
        visuals.widgets.noninteractive.weak_bg_fill = self.bg_light;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        // Inactive widgets
        visuals.widgets.inactive.bg_fill = self.bg_medium;
        visuals.widgets.inactive.weak_bg_fill = self.bg_light;
        visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_primary);

        // Hovered widgets
        visuals.widgets.hovered.bg_fill = self.bg_light;
        visuals.widgets.hovered.weak_bg_fill = self.bg_light;
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.accent);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);

        // Active/pressed widgets
        visuals.widgets.active.bg_fill = self.accent_muted;
        visuals.widgets.active.weak_bg_fill = self.accent_muted;
        visuals.widgets.active.bg_stroke = Stroke::new(1.0, self.accent_hover);
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);

        // Open widgets (dropdowns, etc)
        visuals.widgets.open.bg_fill = self.bg_light;
        visuals.widgets.open.weak_bg_fill = self.bg_light;
        visuals.widgets.open.bg_stroke = Stroke::new(1.0, self.accent);
        visuals.widgets.open.fg_stroke = Stroke::new(1.0, self.text_primary);

        // Selection
        visuals.selection.bg_fill = self.selection;
        visuals.selection.stroke = Stroke::new(1.0, self.accent);

        // Hyperlinks
        visuals.hyperlink_color = self.accent;

        // Window styling
        visuals.window_stroke = Stroke::new(1.0, self.border);
        visuals.window_shadow = egui::epaint::Shadow::NONE;

        // Popup styling
        visuals.popup_shadow = egui::epaint::Shadow::NONE;

        ctx.set_visuals(visuals);
    }
}
