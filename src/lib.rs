//! Frameloom turns trees of frame-indexed widgets into small animated images.
//!
//! The pipeline:
//!
//! - Build a widget tree and wrap it in a [`Root`]
//! - Collect roots into [`Screens`], which paints every frame once on demand
//! - Optionally post-process frames with a [`FilterChain`] (see [`RenderFilters`])
//! - Encode under a duration budget to WebP, GIF or AVIF through a [`FrameSink`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod effects;
pub(crate) mod encode;
pub(crate) mod render;
pub(crate) mod widget;

pub use crate::foundation::core::{
    Affine, BezPath, CanvasMeta, IRect, Point, Rgba8, Rgba8Premul, Vec2,
};
pub use crate::foundation::error::{LoomError, LoomResult};
pub use crate::foundation::math::{CanonicalHasher, hex_digest};

pub use crate::animation::ease::Curve;
pub use crate::animation::transform::{Direction, FillMode, Origin, Rounding, Transform};

pub use crate::render::canvas::Canvas;
pub use crate::render::fonts::{
    CellFace, DEFAULT_FONT, EmojiAtlas, FontFace, FontMetrics, font, font_names, register_font,
};

pub use crate::widget::block::Block;
pub use crate::widget::color_transform::ColorTransform;
pub use crate::widget::filter::{Filtered, Rotate, Shear};
pub use crate::widget::raster::{Emoji, Image, MAX_TEXT_WIDTH, Text, TextStyle};
pub use crate::widget::root::{DEFAULT_DELAY_MS, MAX_FRAME_COUNT, Root, paint_roots};
pub use crate::widget::sequence::Sequence;
pub use crate::widget::shape::{Arc, Line, Polygon, PolygonStroke};
pub use crate::widget::transformation::{Keyframe, Transformation};
pub use crate::widget::{BoxedWidget, Widget, paint_widget};

pub use crate::effects::color_filter::{ColorFilter, Matrix3};
pub use crate::effects::image_filter::{
    ColorMatrix, FilterChain, ImageFilter, Magnify, PixelEffect,
};
pub use crate::effects::render_filters::RenderFilters;

pub use crate::encode::avif::AvifSink;
pub use crate::encode::gif::GifSink;
pub use crate::encode::opts::{
    AVIF_QUALITY_ENV, AVIF_SPEED_ENV, AvifOpts, EncodeOpts, GIF_SPEED_ENV, GifOpts,
    WEBP_LEVEL_ENV, WebpOpts,
};
pub use crate::encode::screens::{OutputFormat, Screens};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig, frame_durations};
pub use crate::encode::webp::WebpSink;
