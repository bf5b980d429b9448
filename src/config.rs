use ratatui::style::Color;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub accent: Color,
    pub data_root: String,
    pub detail_base: String,
    pub bilingual: bool,
    pub open_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            accent: Color::Yellow,
            data_root: "./data".to_string(),
            detail_base: "chapter.html".to_string(),
            bilingual: true,
            open_command: None,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config/rchapters/rchapters.conf"))
}

pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(content) => parse_config(&content),
        Err(_) => Config::default(),
    }
}

pub fn parse_config(content: &str) -> Config {
    let mut config = Config::default();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, val)) = line.split_once('=') else {
            continue;
        };
        let val = val.trim().trim_matches('"').trim_matches('\'');

        match key.trim() {
            "theme_color" => {
                if let Some(color) = parse_color(val) {
                    config.accent = color;
                }
            }
            "data_root" if !val.is_empty() => config.data_root = val.to_string(),
            "detail_base" if !val.is_empty() => config.detail_base = val.to_string(),
            "bilingual" => match val {
                "true" | "yes" | "1" => config.bilingual = true,
                "false" | "no" | "0" => config.bilingual = false,
                _ => log::warn!("ignoring bilingual = {:?}", val),
            },
            "open_command" if !val.is_empty() => config.open_command = Some(val.to_string()),
            other => log::debug!("unknown config key {:?}", other),
        }
    }
    config
}

fn parse_color(val: &str) -> Option<Color> {
    if !val.starts_with('#') || val.len() != 7 {
        return None;
    }
    let r = u8::from_str_radix(val.get(1..3)?, 16);
    let g = u8::from_str_radix(val.get(3..5)?, 16);
    let b = u8::from_str_radix(val.get(5..7)?, 16);

    match (r, g, b) {
        (Ok(r), Ok(g), Ok(b)) => Some(Color::Rgb(r, g, b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_keys() {
        let config = parse_config(
            r##"
            # viewer settings
            theme_color = "#1e90ff"
            data_root = 'https://example.org/book'
            detail_base = https://example.org/read
            bilingual = false
            open_command = xdg-open
            "##,
        );
        assert_eq!(config.accent, Color::Rgb(0x1e, 0x90, 0xff));
        assert_eq!(config.data_root, "https://example.org/book");
        assert_eq!(config.detail_base, "https://example.org/read");
        assert!(!config.bilingual);
        assert_eq!(config.open_command.as_deref(), Some("xdg-open"));
    }

    #[test]
    fn bad_values_keep_defaults() {
        let config = parse_config("theme_color = blue\nbilingual = maybe\ndata_root =\nnonsense");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn rejects_malformed_hex() {
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#zz0000"), None);
        assert_eq!(parse_color("#ffé000"), None);
        assert_eq!(parse_color("#000000"), Some(Color::Rgb(0, 0, 0)));
    }
}
