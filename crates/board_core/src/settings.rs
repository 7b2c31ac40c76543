use std::{collections::HashMap, fs};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("board.toml") {
        apply_file_settings(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("BOARD_SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("APP__SERVER_URL") {
        settings.server_url = v;
    }

    settings
}

fn apply_file_settings(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("server_url") {
            settings.server_url = v.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_value_overrides_default() {
        let mut settings = Settings::default();
        apply_file_settings(
            &mut settings,
            "server_url = \"http://board.internal:9000\"\n",
        );
        assert_eq!(settings.server_url, "http://board.internal:9000");
    }

    #[test]
    fn malformed_file_keeps_defaults() {
        let mut settings = Settings::default();
        apply_file_settings(&mut settings, "server_url = [this is not toml");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn unknown_file_keys_are_ignored() {
        let mut settings = Settings::default();
        apply_file_settings(&mut settings, "bind_addr = \"0.0.0.0:9\"\n");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn prefixed_env_var_wins_over_plain() {
        std::env::set_var("BOARD_SERVER_URL", "http://plain.example:8000");
        std::env::set_var("APP__SERVER_URL", "http://prefixed.example:8000");

        let settings = load_settings();
        assert_eq!(settings.server_url, "http://prefixed.example:8000");

        std::env::remove_var("BOARD_SERVER_URL");
        std::env::remove_var("APP__SERVER_URL");
    }
}
