mod progress_provider;

pub use progress_provider::{ProgressProvider, ProgressProviderProps};
