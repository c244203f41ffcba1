//! Visual themes
//!
//! A theme is a named set of style tokens selectable per profile. The
//! set is closed; unknown stored values resolve to the default theme.

use serde::{Deserialize, Serialize};

/// Identifier for a selectable theme
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum ThemeId {
    DeepSpace,
    Nebula,
    Midnight,
    Aurora,
}

impl From<String> for ThemeId {
    fn from(tag: String) -> Self {
        ThemeId::from_tag(&tag)
    }
}

impl ThemeId {
    /// Resolve a stored tag, falling back to `DeepSpace`
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "nebula" => ThemeId::Nebula,
            "midnight" => ThemeId::Midnight,
            "aurora" => ThemeId::Aurora,
            _ => ThemeId::DeepSpace,
        }
    }

    /// The tag stored in the backend for this theme
    pub fn as_tag(&self) -> &'static str {
        match self {
            ThemeId::DeepSpace => "deep-space",
            ThemeId::Nebula => "nebula",
            ThemeId::Midnight => "midnight",
            ThemeId::Aurora => "aurora",
        }
    }

    /// Style tokens for this theme
    pub fn tokens(&self) -> &'static Theme {
        THEMES
            .iter()
            .find(|t| t.id == *self)
            .unwrap_or(&THEMES[0])
    }
}

impl std::fmt::Display for ThemeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

/// Style tokens for one theme
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Theme {
    pub id: ThemeId,
    pub name: &'static str,
    pub background: &'static str,
    pub button: &'static str,
    pub text: &'static str,
    pub accent: &'static str,
}

/// All selectable themes, in display order
pub const THEMES: &[Theme] = &[
    Theme {
        id: ThemeId::DeepSpace,
        name: "Deep Space",
        background: "gradient(#0B1D3A, #000000)",
        button: "rgba(255,255,255,0.10)",
        text: "#F3F4F6",
        accent: "#EC407A",
    },
    Theme {
        id: ThemeId::Nebula,
        name: "Nebula",
        background: "gradient(#2E1065, #4C1D95, #0B1D3A)",
        button: "rgba(106,27,154,0.40)",
        text: "#FFFFFF",
        accent: "#F472B6",
    },
    Theme {
        id: ThemeId::Midnight,
        name: "Midnight",
        background: "#000000",
        button: "#171717",
        text: "#E5E7EB",
        accent: "#FFFFFF",
    },
    Theme {
        id: ThemeId::Aurora,
        name: "Aurora",
        background: "gradient(#022C22, #064E3B, #0B1D3A)",
        button: "rgba(16,185,129,0.30)",
        text: "#ECFDF5",
        accent: "#34D399",
    },
];
