use crate::foundation::error::{LoomError, LoomResult};

pub type Matrix3 = [[f32; 3]; 3];

/// Named 3x3 RGB matrices applied to whole frames.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ColorFilter {
    #[default]
    None,
    Dimmed,
    Redshift,
    Warm,
    Sunset,
    Sepia,
    Vintage,
    Dusk,
    Cool,
    Bw,
    Ice,
    Moonlight,
    Neon,
    Pastel,
}

impl ColorFilter {
    pub const ALL: [Self; 14] = [
        Self::None,
        Self::Dimmed,
        Self::Redshift,
        Self::Warm,
        Self::Sunset,
        Self::Sepia,
        Self::Vintage,
        Self::Dusk,
        Self::Cool,
        Self::Bw,
        Self::Ice,
        Self::Moonlight,
        Self::Neon,
        Self::Pastel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Dimmed => "dimmed",
            Self::Redshift => "redshift",
            Self::Warm => "warm",
            Self::Sunset => "sunset",
            Self::Sepia => "sepia",
            Self::Vintage => "vintage",
            Self::Dusk => "dusk",
            Self::Cool => "cool",
            Self::Bw => "bw",
            Self::Ice => "ice",
            Self::Moonlight => "moonlight",
            Self::Neon => "neon",
            Self::Pastel => "pastel",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::None => "No transformation",
            Self::Dimmed => "Darkens image uniformly while preserving hue",
            Self::Redshift => "Chromatic adaptation towards a ~3400K white point",
            Self::Warm => "Adds a subtle warm, orange/yellow hue",
            Self::Sunset => "Emulates the deep pink/orange of a setting sun",
            Self::Sepia => "Warm antique brown tone of aged photographs",
            Self::Vintage => "Muted brown/green nostalgic tones",
            Self::Dusk => "Fades brightness and adds a reddish cast",
            Self::Cool => "Adds a cool, blue tint",
            Self::Bw => "Perceptual grayscale using BT.601 luminance weights",
            Self::Ice => "Pale desaturation with a bluish cast",
            Self::Moonlight => "Dim blue-gray night lighting",
            Self::Neon => "Boosted contrast with magenta-blue hues",
            Self::Pastel => "Softened tones with a gentle highlight boost",
        }
    }

    pub fn matrix(self) -> Matrix3 {
        match self {
            Self::None => [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            Self::Dimmed => [[0.25, 0.0, 0.0], [0.0, 0.25, 0.0], [0.0, 0.0, 0.25]],
            // Bradford adaptation D65 -> 3400K, projected into linear sRGB.
            Self::Redshift => [
                [1.2066, 0.3380, 0.0383],
                [-0.0164, 0.8985, 0.0098],
                [-0.0156, -0.0500, 0.4201],
            ],
            Self::Warm => [[1.1, 0.05, 0.0], [0.0, 1.0, 0.0], [0.05, 0.0, 0.9]],
            Self::Sunset => [[1.2, 0.2, 0.0], [0.1, 1.0, 0.1], [0.0, 0.1, 0.6]],
            Self::Sepia => [
                [0.393, 0.769, 0.189],
                [0.349, 0.686, 0.168],
                [0.272, 0.534, 0.131],
            ],
            Self::Vintage => [[1.0, 0.6, 0.2], [0.3, 0.9, 0.2], [0.2, 0.4, 0.6]],
            Self::Dusk => [[1.1, 0.0, 0.2], [0.0, 0.8, 0.1], [0.0, 0.1, 0.6]],
            Self::Cool => [[0.9, 0.0, 0.2], [0.0, 1.0, 0.0], [-0.1, 0.0, 1.1]],
            Self::Bw => [
                [0.299, 0.587, 0.114],
                [0.299, 0.587, 0.114],
                [0.299, 0.587, 0.114],
            ],
            Self::Ice => [[0.8, 0.9, 1.0], [0.8, 0.9, 1.0], [1.0, 1.0, 1.2]],
            Self::Moonlight => [[0.6, 0.2, 0.4], [0.2, 0.7, 0.2], [0.3, 0.3, 0.9]],
            Self::Neon => [[0.9, 0.0, 1.1], [0.0, 1.0, 0.6], [0.2, 0.5, 1.3]],
            Self::Pastel => [[1.2, 0.1, 0.1], [0.1, 1.2, 0.1], [0.1, 0.1, 1.2]],
        }
    }

    /// Catalog names in ascending order.
    pub fn supported_names() -> Vec<&'static str> {
        let mut names = Self::ALL.iter().map(|f| f.name()).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    /// Resolve a user-supplied name; the empty string selects `none`.
    pub fn validate(input: &str) -> LoomResult<Self> {
        if input.is_empty() {
            return Ok(Self::None);
        }
        Self::ALL
            .into_iter()
            .find(|f| f.name() == input)
            .ok_or_else(|| {
                LoomError::validation(format!(
                    "invalid color filter: {input:?}\nSupported filters: {}",
                    Self::supported_names().join(", ")
                ))
            })
    }
}

impl std::fmt::Display for ColorFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ColorFilter {
    type Err = LoomError;

    fn from_str(s: &str) -> LoomResult<Self> {
        Self::validate(s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/color_filter.rs"]
mod tests;
