pub(crate) mod color_filter;
pub(crate) mod image_filter;
pub(crate) mod render_filters;
