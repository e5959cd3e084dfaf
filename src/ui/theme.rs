use ratatui::style::Color;

use crate::calendar::EventType;

pub const FALLBACK_EVENT_HEX: &str = "#a0a0a0";

pub fn event_color_hex(event_type: EventType) -> &'static str {
    match event_type {
        EventType::Birthday => "#ff6b6b",
        EventType::Anniversary => "#ff8cc8",
        EventType::Holiday => "#4ecdc4",
        EventType::Vacation => "#45b7d1",
        EventType::Reunion => "#f9ca24",
        EventType::Celebration => "#f0932b",
        EventType::Appointment => "#eb4d4b",
        EventType::Meeting => "#6c5ce7",
        EventType::Other => FALLBACK_EVENT_HEX,
    }
}

/// Parses `#rrggbb`; anything else yields `None`.
pub fn hex_to_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

pub fn event_color(event_type: EventType) -> Color {
    hex_to_color(event_color_hex(event_type)).unwrap_or(Color::Gray)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub title: Color,
    pub hour_label: Color,
    pub half_hour_rule: Color,
    pub now_marker: Color,
    pub event_text: Color,
    pub status_bar: Color,
    pub loading: Color,
    pub error: Color,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            name: "default".to_string(),
            title: Color::Cyan,
            hour_label: Color::Yellow,
            half_hour_rule: Color::DarkGray,
            now_marker: Color::Red,
            event_text: Color::Black,
            status_bar: Color::White,
            loading: Color::Cyan,
            error: Color::Red,
        }
    }

    pub fn gruvbox() -> Self {
        Self {
            name: "gruvbox".to_string(),
            title: Color::Rgb(251, 184, 108),
            hour_label: Color::Rgb(254, 128, 25),
            half_hour_rule: Color::Rgb(146, 131, 116),
            now_marker: Color::Rgb(251, 73, 52),
            event_text: Color::Rgb(40, 40, 40),
            status_bar: Color::Rgb(235, 219, 178),
            loading: Color::Rgb(142, 192, 124),
            error: Color::Rgb(251, 73, 52),
        }
    }

    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            title: Color::Rgb(136, 192, 208),
            hour_label: Color::Rgb(235, 203, 139),
            half_hour_rule: Color::Rgb(76, 86, 106),
            now_marker: Color::Rgb(191, 97, 106),
            event_text: Color::Rgb(46, 52, 64),
            status_bar: Color::Rgb(216, 222, 233),
            loading: Color::Rgb(129, 161, 193),
            error: Color::Rgb(191, 97, 106),
        }
    }

    pub fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            title: Color::Rgb(139, 233, 253),
            hour_label: Color::Rgb(241, 250, 140),
            half_hour_rule: Color::Rgb(98, 114, 164),
            now_marker: Color::Rgb(255, 85, 85),
            event_text: Color::Rgb(40, 42, 54),
            status_bar: Color::Rgb(248, 248, 242),
            loading: Color::Rgb(255, 121, 198),
            error: Color::Rgb(255, 85, 85),
        }
    }

    pub fn get_by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "gruvbox" => Self::gruvbox(),
            "nord" => Self::nord(),
            "dracula" => Self::dracula(),
            _ => Self::default_theme(),
        }
    }

    pub fn available_themes() -> Vec<&'static str> {
        vec!["default", "gruvbox", "nord", "dracula"]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_a_palette_entry() {
        assert_eq!(event_color_hex(EventType::Birthday), "#ff6b6b");
        assert_eq!(event_color_hex(EventType::Meeting), "#6c5ce7");
        assert_eq!(event_color_hex(EventType::Other), FALLBACK_EVENT_HEX);
    }

    #[test]
    fn hex_colors_convert_to_rgb() {
        assert_eq!(hex_to_color("#4ecdc4"), Some(Color::Rgb(0x4e, 0xcd, 0xc4)));
        assert_eq!(event_color(EventType::Holiday), Color::Rgb(0x4e, 0xcd, 0xc4));
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert_eq!(hex_to_color("4ecdc4"), None);
        assert_eq!(hex_to_color("#4ecd"), None);
        assert_eq!(hex_to_color("#zzzzzz"), None);
    }

    #[test]
    fn unknown_theme_name_falls_back_to_default() {
        assert_eq!(Theme::get_by_name("neon").name, "default");
        assert_eq!(Theme::get_by_name("Nord").name, "nord");
    }

    #[test]
    fn every_listed_theme_resolves_to_itself() {
        for name in Theme::available_themes() {
            assert_eq!(Theme::get_by_name(name).name, name);
        }
    }
}
