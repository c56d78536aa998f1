use std::time::{Duration, Instant};

use eframe::egui::{self, RichText};

use crate::backend::BackendClient;
use crate::config::Config;
use crate::state::{
    BackendStatus, GenerationState, HealthState, NegativePromptState, StateEvent, Tab, UiState,
};
use crate::ui;

/// Main application state
pub struct AtelierApp {
    /// Application configuration
    pub config: Config,
    /// Client for the generation backend
    pub client: BackendClient,
    /// Backend availability probe
    pub health: HealthState,
    /// Negative-prompt field and its triggers
    pub negative: NegativePromptState,
    /// Image generation operation
    pub generation: GenerationState,
    /// Raw prompt text as typed
    pub prompt: String,
    /// Draft of the backend URL edited in the settings tab
    pub settings_url: String,
    /// UI state (theme, active tab)
    pub ui: UiState,
    /// Status message for the status bar
    pub status_message: String,
}

impl AtelierApp {
    /// Create a new application instance and kick off the health probe
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let config = Config::load().unwrap_or_default();

        let base_url = config.backend_url();
        let client = BackendClient::new(&base_url).expect("Failed to create HTTP client");
        tracing::info!("Using backend at {}", base_url);

        let theme = config.studio.theme.theme();
        let settings_url = config.backend.url.clone().unwrap_or_default();

        let mut app = Self {
            config,
            client,
            health: HealthState::default(),
            negative: NegativePromptState::default(),
            generation: GenerationState::default(),
            prompt: String::new(),
            settings_url,
            ui: UiState::new(theme),
            status_message: "Ready".to_string(),
        };

        let event = app.health.start(&app.client);
        app.handle_events(event.into_iter().collect());

        app
    }

    /// Save configuration to disk
    pub fn save_config(&self) {
        if let Err(e) = self.config.save() {
            tracing::error!("Failed to save config: {}", e);
        }
    }

    /// Re-run the availability probe (offline banner action)
    pub fn retry_health_check(&mut self) {
        let event = self.health.start(&self.client);
        self.handle_events(event.into_iter().collect());
    }

    /// Apply the backend URL edited in settings: persist it, rebuild the
    /// client, and re-probe
    pub fn apply_backend_url(&mut self) {
        let trimmed = self.settings_url.trim();
        self.config.backend.url = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self.save_config();

        let url = self.config.backend_url();
        match BackendClient::new(&url) {
            Ok(client) => {
                self.client = client;
                self.retry_health_check();
            }
            Err(e) => {
                tracing::error!("Failed to rebuild HTTP client: {}", e);
                self.status_message = format!("Error: {}", e);
            }
        }
    }

    /// Submit the image-generation form
    pub fn start_generation(&mut self) {
        let event = self.generation.start(
            &self.prompt,
            &self.negative.text,
            self.health.status,
            &self.client,
        );
        self.handle_events(event.into_iter().collect());
    }

    /// Manual Regenerate action for the negative prompt
    pub fn regenerate_negative_prompt(&mut self) {
        if self.prompt.trim().is_empty() || self.health.status == BackendStatus::Offline {
            return;
        }
        let event = self.negative.dispatch(&self.prompt, &self.client);
        self.handle_events(vec![event]);
    }

    /// Fold events from state poll methods into the app
    pub fn handle_events(&mut self, events: Vec<StateEvent>) {
        for event in events {
            match event {
                StateEvent::StatusMessage(msg) => self.status_message = msg,
                StateEvent::LogInfo(msg) => tracing::info!("{}", msg),
                StateEvent::LogError(msg) => tracing::error!("{}", msg),
            }
        }
    }

    /// Poll all async tasks and the debounce timer
    fn poll_tasks(&mut self, ctx: &egui::Context) {
        let mut events = self.health.poll(ctx);
        events.extend(self.negative.poll(ctx));
        events.extend(self.generation.poll(ctx, &self.client));

        if let Some(event) =
            self.negative
                .maybe_fire(&self.prompt, self.health.status, &self.client, Instant::now())
        {
            events.push(event);
        }

        // Keep frames coming while the timer is armed; egui repaints only
        // on input otherwise and the deadline would never be observed
        if self.negative.debounce_pending() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        self.handle_events(events);
    }

    /// Status indicator text and color for the tab bar
    fn status_indicator(&self) -> (&'static str, egui::Color32) {
        let theme = &self.ui.current_theme;
        match self.health.status {
            BackendStatus::Checking => ("Checking...", theme.warning),
            BackendStatus::Online => ("Online", theme.success),
            BackendStatus::Offline => ("Offline", theme.error),
        }
    }
}

impl eframe::App for AtelierApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.ui.theme_dirty {
            self.ui.current_theme.apply(ctx);
            self.ui.theme_dirty = false;
        }

        // Poll async tasks
        self.poll_tasks(ctx);

        // Tab bar
        egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui::render_tab(self, ui, Tab::Generate, "Generate", true);
                ui::render_tab(self, ui, Tab::Video, "Video (soon)", false);
                ui::render_tab(self, ui, Tab::Settings, "Settings", true);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let (text, color) = self.status_indicator();
                    ui.label(RichText::new(text).color(color).size(12.0));
                    ui.label(
                        RichText::new("Backend:")
                            .color(self.ui.current_theme.text_muted)
                            .size(12.0),
                    );
                });
            });
            ui.add_space(2.0);
        });

        // Status bar at bottom
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status_message);
            });
        });

        // Main content area
        egui::CentralPanel::default().show(ctx, |ui| match self.ui.active_tab {
            Tab::Generate => ui::render_generate_tab(self, ui),
            Tab::Settings => ui::render_settings_tab(self, ui),
            Tab::Video => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new("Video generation is coming soon")
                            .color(self.ui.current_theme.text_muted),
                    );
                });
            }
        });
    }
}
