//! Condition text → bundled display asset.

/// Images the screen knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherAsset {
    Sun,
    PartlyCloudy,
    Cloud,
    ModerateRain,
    HeavyRain,
    Mist,
    /// Shown for any condition text without a dedicated image.
    Generic,
}

const CONDITION_ASSETS: &[(&str, WeatherAsset)] = &[
    ("partly cloudy", WeatherAsset::PartlyCloudy),
    ("moderate rain", WeatherAsset::ModerateRain),
    ("patchy rain possible", WeatherAsset::ModerateRain),
    ("patchy rain nearby", WeatherAsset::ModerateRain),
    ("sunny", WeatherAsset::Sun),
    ("clear", WeatherAsset::Sun),
    ("overcast", WeatherAsset::Cloud),
    ("cloudy", WeatherAsset::Cloud),
    ("light rain", WeatherAsset::ModerateRain),
    ("moderate rain at times", WeatherAsset::ModerateRain),
    ("heavy rain", WeatherAsset::HeavyRain),
    ("heavy rain at times", WeatherAsset::HeavyRain),
    ("moderate or heavy freezing rain", WeatherAsset::HeavyRain),
    ("moderate or heavy rain shower", WeatherAsset::HeavyRain),
    ("moderate or heavy rain with thunder", WeatherAsset::HeavyRain),
    ("mist", WeatherAsset::Mist),
    ("fog", WeatherAsset::Mist),
];

impl WeatherAsset {
    /// Look up the asset for a provider condition string.
    ///
    /// Matching ignores case and surrounding whitespace; the provider is not
    /// consistent about either.
    pub fn for_condition(text: &str) -> Self {
        let key = text.trim().to_lowercase();
        CONDITION_ASSETS
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, asset)| *asset)
            .unwrap_or(WeatherAsset::Generic)
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Sun => "sun.png",
            Self::PartlyCloudy => "partlycloudy.png",
            Self::Cloud => "cloud.png",
            Self::ModerateRain => "moderaterain.png",
            Self::HeavyRain => "heavyrain.png",
            Self::Mist => "mist.png",
            Self::Generic => "weather.png",
        }
    }

    /// Terminal stand-in for the image.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Sun => "☀",
            Self::PartlyCloudy => "⛅",
            Self::Cloud => "☁",
            Self::ModerateRain => "🌦",
            Self::HeavyRain => "🌧",
            Self::Mist => "🌫",
            Self::Generic => "🌡",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_conditions_map_to_their_asset() {
        assert_eq!(WeatherAsset::for_condition("Sunny"), WeatherAsset::Sun);
        assert_eq!(WeatherAsset::for_condition("Clear"), WeatherAsset::Sun);
        assert_eq!(WeatherAsset::for_condition("Overcast"), WeatherAsset::Cloud);
        assert_eq!(
            WeatherAsset::for_condition("Moderate or heavy rain with thunder"),
            WeatherAsset::HeavyRain
        );
    }

    #[test]
    fn lookup_ignores_case_and_padding() {
        assert_eq!(WeatherAsset::for_condition("Partly Cloudy "), WeatherAsset::PartlyCloudy);
        assert_eq!(WeatherAsset::for_condition("  MIST"), WeatherAsset::Mist);
    }

    #[test]
    fn unknown_condition_falls_back_to_generic() {
        assert_eq!(WeatherAsset::for_condition("Blizzard"), WeatherAsset::Generic);
        assert_eq!(WeatherAsset::for_condition(""), WeatherAsset::Generic);
        assert_eq!(WeatherAsset::Generic.file_name(), "weather.png");
    }
}
