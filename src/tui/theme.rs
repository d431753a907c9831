// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::{env, error::Error, fmt};

use ratatui::style::{Color, Modifier, Style};

use crate::ui::NoticeKind;

#[derive(Debug, Clone, Default)]
pub(crate) struct TuiTheme {
    palette: Option<TuiPalette>,
}

impl TuiTheme {
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        let palette = palette_override_from_env()?;
        Ok(Self { palette })
    }

    pub(crate) fn base_style(&self) -> Style {
        match &self.palette {
            Some(palette) => Style::default().fg(palette.fg).bg(palette.bg),
            None => Style::default(),
        }
    }

    fn role_color(&self, role: PaletteRole) -> Color {
        match &self.palette {
            Some(palette) => palette.role_color(role),
            None => role.default_color(),
        }
    }

    pub(crate) fn panel_border_style(&self, focused: bool) -> Style {
        if focused {
            self.base_style().fg(self.role_color(PaletteRole::Accent))
        } else {
            self.base_style()
        }
    }

    pub(crate) fn header_style(&self) -> Style {
        self.base_style().add_modifier(Modifier::BOLD)
    }

    pub(crate) fn selection_style(&self) -> Style {
        self.base_style()
            .add_modifier(Modifier::REVERSED | Modifier::BOLD)
    }

    pub(crate) fn tab_style(&self, active: bool) -> Style {
        if active {
            self.base_style()
                .fg(self.role_color(PaletteRole::Accent))
                .add_modifier(Modifier::BOLD)
        } else {
            self.base_style().fg(self.role_color(PaletteRole::Muted))
        }
    }

    pub(crate) fn key_style(&self) -> Style {
        self.base_style()
            .fg(self.role_color(PaletteRole::Info))
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn label_style(&self) -> Style {
        self.base_style().fg(self.role_color(PaletteRole::Muted))
    }

    pub(crate) fn error_style(&self) -> Style {
        self.base_style().fg(self.role_color(PaletteRole::Error))
    }

    /// Dim style for "(empty list)" and friends.
    pub(crate) fn placeholder_style(&self) -> Style {
        self.base_style()
            .fg(self.role_color(PaletteRole::Muted))
            .add_modifier(Modifier::ITALIC)
    }

    pub(crate) fn badge_style(&self, on: bool) -> Style {
        let role = if on {
            PaletteRole::Success
        } else {
            PaletteRole::Muted
        };
        self.base_style()
            .fg(self.role_color(role))
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn notice_style(&self, kind: NoticeKind) -> Style {
        let role = match kind {
            NoticeKind::Success => PaletteRole::Success,
            NoticeKind::Error => PaletteRole::Error,
            NoticeKind::Info => PaletteRole::Info,
        };
        self.base_style().fg(self.role_color(role))
    }
}

/// Palette slots by UI role rather than terminal color index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PaletteRole {
    Accent,
    Success,
    Error,
    Info,
    Muted,
}

impl PaletteRole {
    const fn idx(self) -> usize {
        match self {
            Self::Accent => 0,
            Self::Success => 1,
            Self::Error => 2,
            Self::Info => 3,
            Self::Muted => 4,
        }
    }

    fn default_color(self) -> Color {
        match self {
            Self::Accent => Color::LightGreen,
            Self::Success => Color::Green,
            Self::Error => Color::Red,
            Self::Info => Color::Cyan,
            Self::Muted => Color::DarkGray,
        }
    }
}

#[derive(Debug, Clone)]
struct TuiPalette {
    fg: Color,
    bg: Color,
    roles: [Color; 5],
}

impl TuiPalette {
    const CSV_LEN: usize = 7;

    fn parse_csv(value: &str) -> Result<Self, String> {
        let parts: Vec<&str> = value.split(',').map(|part| part.trim()).collect();
        if parts.len() != Self::CSV_LEN {
            return Err(format!(
                "expected {} comma-separated colors (fg,bg,accent,success,error,info,muted), got {}",
                Self::CSV_LEN,
                parts.len()
            ));
        }

        let fg = parse_palette_color(parts[0])?;
        let bg = parse_palette_color(parts[1])?;

        let mut roles = [Color::Reset; 5];
        for (idx, part) in parts.iter().skip(2).enumerate() {
            roles[idx] = parse_palette_color(part)?;
        }

        Ok(Self { fg, bg, roles })
    }

    fn role_color(&self, role: PaletteRole) -> Color {
        self.roles[role.idx()]
    }
}

fn palette_override_from_env() -> Result<Option<TuiPalette>, ThemeError> {
    let value = match env::var("CARAVEL_TUI_PALETTE") {
        Ok(value) => value,
        Err(env::VarError::NotPresent) => return Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            return Err(ThemeError::InvalidEnv {
                name: "CARAVEL_TUI_PALETTE".to_owned(),
                value: "<non-unicode>".to_owned(),
            });
        }
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let parsed = TuiPalette::parse_csv(trimmed).map_err(|error| ThemeError::InvalidEnv {
        name: "CARAVEL_TUI_PALETTE".to_owned(),
        value: format!("{trimmed} ({error})"),
    })?;

    Ok(Some(parsed))
}

fn parse_palette_color(value: &str) -> Result<Color, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("empty color".to_owned());
    }

    let hex = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color: {trimmed} (expected #RRGGBB)"));
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex color: {trimmed}"))?;
    let r = ((rgb >> 16) & 0xFF) as u8;
    let g = ((rgb >> 8) & 0xFF) as u8;
    let b = (rgb & 0xFF) as u8;
    Ok(Color::Rgb(r, g, b))
}

#[derive(Debug, Clone)]
pub(crate) enum ThemeError {
    InvalidEnv { name: String, value: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
        }
    }
}

impl Error for ThemeError {}
