//! UI modules for Atelier
//!
//! Rendering code only; all behavior lives in the state structs. Organized
//! by tab, with shared widgets in `components`.

mod components;
mod generate_tab;
mod settings_tab;
pub mod theme;

pub use components::{render_offline_banner, render_section_frame, render_tab};
pub use generate_tab::render_generate_tab;
pub use settings_tab::render_settings_tab;
