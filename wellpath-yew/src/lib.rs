//! # Wellpath Yew Components
//!
//! Browser front end for the challenge progress timeline.

pub mod app;
pub mod components;
pub mod hooks;
pub mod pages;
pub mod providers;
pub mod services;

// Re-exports for convenience
pub use app::App;
pub use components::{CatalogPanel, ChallengeTimeline, DateTimeline, FilterBar, StepItem};
pub use hooks::{use_snapshot, use_timeline};
pub use pages::ProgressScreen;
pub use providers::{ProgressProvider, ProgressProviderProps};
pub use services::HttpProgressApi;
