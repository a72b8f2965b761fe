//! Field renderers and the read-only form view built on top of them.

pub mod palette;
pub mod registry;
pub mod renderers;
pub mod view;

pub use palette::{ChoiceLabels, NumericFormat, RenderPalette, StatusMarkers};
pub use registry::{FieldContext, FieldRenderer, FieldStatus, RendererRegistry, field_lines};
pub use view::{FormView, SectionView, plain_text};
