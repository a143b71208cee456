// File: crates/plotkit-core/src/lib.rs
// Summary: Core library entry point; exports the geometry pipeline, render-context contract and PNG codec.

pub mod geometry;
pub mod transform;
pub mod axis;
pub mod line_clip;
pub mod polygon_clip;
pub mod decimate;
pub mod color;
pub mod render_context;
pub mod rendering;
pub mod recording;
pub mod svg;
pub mod image;
pub mod png;
pub mod error;

pub use geometry::{DataPoint, Insets, Rect, ScreenPoint, Size};
pub use transform::{inverse_transform, transform, AxisTransform};
pub use axis::{Axis, PlotAxes, ScaleKind};
pub use line_clip::{LineClip, LineClipper};
pub use polygon_clip::{clip_polygon, RectEdge};
pub use decimate::{decimate, decimated};
pub use color::Color;
pub use render_context::{
    EdgeRendering, Font, HorizontalAlignment, LineJoin, RenderContext, Stroke, TextLayout, VerticalAlignment,
};
pub use rendering::{draw_clipped_line, draw_data_line, LineOptions};
pub use recording::{Primitive, RecordingContext};
pub use svg::SvgRenderContext;
pub use image::{PixelBuffer, RasterImage};
pub use png::{ImageInfo, PngEncoderOptions};
pub use error::{PngError, PngResult};
