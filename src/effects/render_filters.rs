use crate::effects::color_filter::ColorFilter;
use crate::effects::image_filter::{ColorMatrix, FilterChain, Magnify};
use crate::foundation::error::{LoomError, LoomResult};

fn default_magnify() -> u32 {
    1
}

/// Caller-facing post-processing knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RenderFilters {
    /// Integer upscale factor, at least 1.
    #[serde(default = "default_magnify")]
    pub magnify: u32,
    #[serde(default)]
    pub color_filter: ColorFilter,
    /// Deliver frames at twice the logical canvas size.
    #[serde(default)]
    pub output_2x: bool,
}

impl Default for RenderFilters {
    fn default() -> Self {
        Self {
            magnify: 1,
            color_filter: ColorFilter::None,
            output_2x: false,
        }
    }
}

impl std::fmt::Display for RenderFilters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "magnify={}, color_filter={:?}, output_2x={}",
            self.magnify,
            self.color_filter.name(),
            self.output_2x
        )
    }
}

impl RenderFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_magnify(mut self, magnify: u32) -> Self {
        self.magnify = magnify;
        self
    }

    pub fn with_color_filter(mut self, color_filter: ColorFilter) -> Self {
        self.color_filter = color_filter;
        self
    }

    pub fn with_output_2x(mut self, output_2x: bool) -> Self {
        self.output_2x = output_2x;
        self
    }

    pub fn from_json(json: &str) -> LoomResult<Self> {
        let filters: Self = serde_json::from_str(json)?;
        filters.validate()?;
        Ok(filters)
    }

    pub fn validate(&self) -> LoomResult<()> {
        if self.magnify == 0 {
            return Err(LoomError::validation("magnify must be >= 1"));
        }
        Ok(())
    }

    /// Upscale factor applied to frames painted on a canvas that is (or is not) already 2x.
    pub fn magnify_factor(&self, canvas_is_2x: bool) -> u32 {
        let boost = if self.output_2x && !canvas_is_2x { 2 } else { 1 };
        self.magnify.max(1).saturating_mul(boost)
    }

    /// Filter chain: magnify first (when > 1), then the color matrix (unless `none`).
    pub fn to_chain(&self, canvas_is_2x: bool) -> LoomResult<FilterChain> {
        self.validate()?;
        let mut chain = FilterChain::new();
        let factor = self.magnify_factor(canvas_is_2x);
        if factor > 1 {
            chain.push(Magnify(factor));
        }
        if self.color_filter != ColorFilter::None {
            chain.push(ColorMatrix::from(self.color_filter));
        }
        tracing::debug!(filters = %self, stages = chain.len(), "built render filter chain");
        Ok(chain)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/render_filters.rs"]
mod tests;
