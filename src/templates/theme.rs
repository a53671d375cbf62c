use serde::Serialize;

/// Paleta de colores de un documento (hex sin `#`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub name: &'static str,
    pub primary: &'static str,
    pub header_bg: &'static str,
    pub accent: &'static str,
}

pub const PAID_COLOR: &str = "27ae60";
pub const OVERDUE_COLOR: &str = "e74c3c";
pub const MUTED_BACKGROUND: &str = "f8f9fa";
pub const RULE_COLOR: &str = "ecf0f1";
pub const DETAIL_COLOR: &str = "7f8c8d";
pub const BODY_TEXT_COLOR: &str = "34495e";

const THEMES: [Theme; 6] = [
    Theme { name: "blue", primary: "2c3e50", header_bg: "2d3436", accent: "3498db" },
    Theme { name: "green", primary: "27ae60", header_bg: "1e8449", accent: "58d68d" },
    Theme { name: "red", primary: "e74c3c", header_bg: "c0392b", accent: "f1948a" },
    Theme { name: "purple", primary: "9b59b6", header_bg: "8e44ad", accent: "d7bde2" },
    Theme { name: "orange", primary: "e67e22", header_bg: "d35400", accent: "f5b041" },
    Theme { name: "black", primary: "2c3e50", header_bg: "2c3e50", accent: "95a5a6" },
];

impl Theme {
    /// Busca por nombre (inglés o francés); si no existe devuelve el azul
    pub fn by_name(name: &str) -> &'static Theme {
        let wanted = match name.trim().to_lowercase().as_str() {
            "bleu" => "blue".to_string(),
            "vert" => "green".to_string(),
            "rouge" => "red".to_string(),
            "violet" => "purple".to_string(),
            "noir" => "black".to_string(),
            other => other.to_string(),
        };

        THEMES
            .iter()
            .find(|theme| theme.name == wanted)
            .unwrap_or(&THEMES[0])
    }

    pub fn all() -> &'static [Theme] {
        &THEMES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn french_names_are_aliases() {
        assert_eq!(Theme::by_name("vert").name, "green");
        assert_eq!(Theme::by_name("Rouge").name, "red");
        assert_eq!(Theme::by_name("orange").header_bg, "d35400");
    }

    #[test]
    fn unknown_theme_falls_back_to_blue() {
        assert_eq!(Theme::by_name("fuchsia").name, "blue");
        assert_eq!(Theme::by_name("").primary, "2c3e50");
    }
}
