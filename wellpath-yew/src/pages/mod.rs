mod progress_screen;

pub use progress_screen::ProgressScreen;
