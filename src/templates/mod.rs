pub mod engine;
pub mod helpers;
pub mod theme;
pub mod view;

pub use engine::{TemplateEngine, LOGO_FILE};
pub use theme::Theme;
pub use view::DocumentView;
