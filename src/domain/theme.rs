// Room theme configuration: palette plus AI keyword settings.

/// Visual assets attached to a theme.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeAssets {
    pub background_url: String,
    pub particle_effect: Option<String>,
}

/// Keywords and prompt style the backend feeds its image generator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeAiSettings {
    pub keywords: Vec<String>,
    pub prompt_style: String,
}

/// Per-theme gameplay tuning delivered by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeGameRules {
    pub spawn_rate: f32,
    pub max_imposters: u32,
}

impl Default for ThemeGameRules {
    fn default() -> Self {
        Self {
            spawn_rate: 1.0,
            max_imposters: 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeConfig {
    pub theme_id: String,
    pub theme_name: String,
    pub assets: ThemeAssets,
    pub palette: Vec<String>,
    pub ai_settings: ThemeAiSettings,
    pub game_rules: ThemeGameRules,
}
