pub mod render;
pub mod text;
pub mod view;
pub use render::{Align, PhaseRenderer, RenderError, Renderer, SkiaRenderer, theme};
pub use view::{FieldView, FormView, ResultView, SessionView};
