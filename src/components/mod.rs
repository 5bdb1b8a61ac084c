mod backdrop;
mod theme_toggle;

pub use backdrop::Backdrop;
pub use theme_toggle::ThemeToggle;
