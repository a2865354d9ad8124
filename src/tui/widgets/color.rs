use ratatui::style::Color;

/// Config names for the terminal palette. "lightgray" has no distinct
/// ratatui color and is accepted as an alias of gray.
const NAMED: &[(&str, Color)] = &[
    ("black", Color::Black),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("blue", Color::Blue),
    ("magenta", Color::Magenta),
    ("cyan", Color::Cyan),
    ("white", Color::White),
    ("gray", Color::Gray),
    ("darkgray", Color::DarkGray),
    ("lightred", Color::LightRed),
    ("lightgreen", Color::LightGreen),
    ("lightyellow", Color::LightYellow),
    ("lightblue", Color::LightBlue),
    ("lightmagenta", Color::LightMagenta),
    ("lightcyan", Color::LightCyan),
];

/// Parse a theme color: a palette name, `#RRGGBB`, `#RGB` or `rgb(r, g, b)`.
/// Unknown values render as white.
pub fn parse_color(color_str: &str) -> Color {
    let s = color_str.trim().to_lowercase();
    let name = match s.as_str() {
        "grey" => "gray",
        "darkgrey" => "darkgray",
        "lightgray" | "lightgrey" => "gray",
        other => other,
    };

    if let Some((_, color)) = NAMED.iter().find(|(n, _)| *n == name) {
        return *color;
    }

    s.strip_prefix('#')
        .and_then(parse_hex)
        .or_else(|| parse_rgb(&s))
        .unwrap_or(Color::White)
}

fn parse_hex(hex: &str) -> Option<Color> {
    let digits: Vec<u8> = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8))
        .collect::<Option<_>>()?;
    match digits.as_slice() {
        [r, g, b] => Some(Color::Rgb(r * 17, g * 17, b * 17)),
        [r1, r2, g1, g2, b1, b2] => Some(Color::Rgb(r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2)),
        _ => None,
    }
}

fn parse_rgb(s: &str) -> Option<Color> {
    let inner = s.strip_prefix("rgb(")?.strip_suffix(')')?;
    let parts: Vec<u8> = inner
        .split(',')
        .map(|p| p.trim().parse().ok())
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        [r, g, b] => Some(Color::Rgb(*r, *g, *b)),
        _ => None,
    }
}

/// Inverse of [`parse_color`], used when a derived color is written back to a theme
pub fn format_color_for_display(color: &Color) -> String {
    match color {
        Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
        Color::Indexed(_) => "indexed".to_string(),
        Color::Reset => "reset".to_string(),
        other => NAMED
            .iter()
            .find(|(_, c)| c == other)
            .map(|(name, _)| name.to_string())
            .unwrap_or_else(|| "white".to_string()),
    }
}

/// WCAG relative luminance of an RGB color, 0.0 (dark) to 1.0 (light)
fn luminance(r: u8, g: u8, b: u8) -> f64 {
    let channel = |v: u8| {
        let v = v as f64 / 255.0;
        if v <= 0.03928 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
}

/// Black or white text, whichever reads better on `background`.
/// Named colors use a fixed list of dark ones since terminals render them differently.
pub fn get_contrast_text_color(background: Color) -> Color {
    let dark = match background {
        Color::Rgb(r, g, b) => luminance(r, g, b) < 0.5,
        other => matches!(other, Color::Black | Color::Blue | Color::Magenta | Color::Red),
    };
    if dark { Color::White } else { Color::Black }
}
