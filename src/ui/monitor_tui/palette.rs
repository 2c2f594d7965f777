use std::collections::BTreeMap;
use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};

use crate::core::config::ThemesConfig;
use crate::core::ThemeKind;
use crate::error::{DashError, Result};

/// Semantic style slots a dashboard element can be painted with
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StyleTag {
    Header,
    Footer,
    Info,
    Error,
    Warning,
    Success,
    Label,
    Value,
    Dim,
    Timestamp,
    Message,
    Background,
}

impl StyleTag {
    pub const ALL: [StyleTag; 12] = [
        StyleTag::Header,
        StyleTag::Footer,
        StyleTag::Info,
        StyleTag::Error,
        StyleTag::Warning,
        StyleTag::Success,
        StyleTag::Label,
        StyleTag::Value,
        StyleTag::Dim,
        StyleTag::Timestamp,
        StyleTag::Message,
        StyleTag::Background,
    ];

    /// Name used in the `[themes.*]` config tables
    pub fn key(self) -> &'static str {
        match self {
            StyleTag::Header => "header",
            StyleTag::Footer => "footer",
            StyleTag::Info => "info",
            StyleTag::Error => "error",
            StyleTag::Warning => "warning",
            StyleTag::Success => "success",
            StyleTag::Label => "label",
            StyleTag::Value => "value",
            StyleTag::Dim => "dim",
            StyleTag::Timestamp => "timestamp",
            StyleTag::Message => "message",
            StyleTag::Background => "background",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.key() == key)
    }
}

/// Resolved styles for every [`StyleTag`]
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    styles: BTreeMap<StyleTag, Style>,
}

impl Palette {
    pub fn dark() -> Self {
        Self::from_defaults(&[
            (StyleTag::Header, "bold white on blue"),
            (StyleTag::Footer, "italic gray"),
            (StyleTag::Info, "cyan"),
            (StyleTag::Error, "bold red"),
            (StyleTag::Warning, "bold yellow"),
            (StyleTag::Success, "bold green"),
            (StyleTag::Label, "bold green"),
            (StyleTag::Value, "bold cyan"),
            (StyleTag::Dim, "dim"),
            (StyleTag::Timestamp, "gray"),
            (StyleTag::Message, "bold white"),
            (StyleTag::Background, "white on black"),
        ])
    }

    pub fn light() -> Self {
        Self::from_defaults(&[
            (StyleTag::Header, "bold black on light-cyan"),
            (StyleTag::Footer, "italic dark-gray"),
            (StyleTag::Info, "blue"),
            (StyleTag::Error, "bold red"),
            (StyleTag::Warning, "bold magenta"),
            (StyleTag::Success, "bold green"),
            (StyleTag::Label, "bold blue"),
            (StyleTag::Value, "bold black"),
            (StyleTag::Dim, "dim"),
            (StyleTag::Timestamp, "dark-gray"),
            (StyleTag::Message, "black"),
            (StyleTag::Background, "black on white"),
        ])
    }

    fn from_defaults(entries: &[(StyleTag, &str)]) -> Self {
        let styles = entries
            .iter()
            .map(|&(tag, spec)| (tag, parse_style(spec).unwrap_or_default()))
            .collect();
        Self { styles }
    }

    pub fn style(&self, tag: StyleTag) -> Style {
        self.styles.get(&tag).copied().unwrap_or_default()
    }

    /// Replace styles with the ones named in `overrides`
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Result<Self> {
        for (key, spec) in overrides {
            let tag = StyleTag::from_key(key)
                .ok_or_else(|| DashError::config(format!("unknown theme style '{}'", key)))?;
            self.styles.insert(tag, parse_style(spec)?);
        }
        Ok(self)
    }
}

/// A palette bound to the theme it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub kind: ThemeKind,
    pub palette: Palette,
}

impl Theme {
    pub fn style(&self, tag: StyleTag) -> Style {
        self.palette.style(tag)
    }
}

/// Both palettes, built once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct Themes {
    dark: Palette,
    light: Palette,
}

impl Themes {
    pub fn from_config(config: &ThemesConfig) -> Result<Self> {
        Ok(Self {
            dark: Palette::dark().with_overrides(&config.dark)?,
            light: Palette::light().with_overrides(&config.light)?,
        })
    }

    pub fn resolve(&self, kind: ThemeKind) -> Theme {
        let palette = match kind {
            ThemeKind::Dark => self.dark.clone(),
            ThemeKind::Light => self.light.clone(),
        };
        Theme { kind, palette }
    }
}

impl Default for Themes {
    fn default() -> Self {
        Self {
            dark: Palette::dark(),
            light: Palette::light(),
        }
    }
}

/// Parse a style string such as `"bold red on white"`.
///
/// Words are modifiers or color names; the word after `on` is the
/// background. Color names follow ratatui's parser (`light-cyan`, `#ff8800`,
/// `208`).
pub fn parse_style(spec: &str) -> Result<Style> {
    let mut style = Style::default();
    let mut words = spec.split_whitespace();

    while let Some(word) = words.next() {
        let lower = word.to_ascii_lowercase();
        if lower == "on" {
            let color = words
                .next()
                .ok_or_else(|| DashError::style(spec, "'on' must be followed by a color"))?;
            style = style.bg(parse_color(spec, color)?);
            continue;
        }
        if let Some(modifier) = parse_modifier(&lower) {
            style = style.add_modifier(modifier);
            continue;
        }
        if lower == "none" || lower == "default" {
            continue;
        }
        style = style.fg(parse_color(spec, word)?);
    }

    Ok(style)
}

fn parse_modifier(word: &str) -> Option<Modifier> {
    let modifier = match word {
        "bold" => Modifier::BOLD,
        "dim" => Modifier::DIM,
        "italic" => Modifier::ITALIC,
        "underline" => Modifier::UNDERLINED,
        "blink" => Modifier::SLOW_BLINK,
        "reverse" => Modifier::REVERSED,
        "strike" | "strikethrough" => Modifier::CROSSED_OUT,
        _ => return None,
    };
    Some(modifier)
}

fn parse_color(spec: &str, word: &str) -> Result<Color> {
    Color::from_str(word).map_err(|_| DashError::style(spec, format!("unknown color '{}'", word)))
}
