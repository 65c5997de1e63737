//! Display preferences: interface language and color theme.

use nixt_storage::keys;
use nixt_traits::{KeyValueStore, StoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ar,
    En,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Rtl,
    Ltr,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Ar => "ar",
            Language::En => "en",
        }
    }

    pub fn direction(&self) -> TextDirection {
        match self {
            Language::Ar => TextDirection::Rtl,
            Language::En => TextDirection::Ltr,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ar" => Ok(Language::Ar),
            "en" => Ok(Language::En),
            other => Err(format!("Unsupported language '{}', expected ar or en", other)),
        }
    }
}

impl fmt::Display for TextDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextDirection::Rtl => write!(f, "rtl"),
            TextDirection::Ltr => write!(f, "ltr"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemePalette {
    pub name: &'static str,
    pub background: &'static str,
    pub text_main: &'static str,
    pub text_dim: &'static str,
}

pub const THEMES: [ThemePalette; 5] = [
    ThemePalette {
        name: "blue-black",
        background: "radial-gradient(circle at bottom center, #001a4d 0%, #000000 85%)",
        text_main: "#ffffff",
        text_dim: "rgba(255, 255, 255, 0.6)",
    },
    ThemePalette {
        name: "purple-black",
        background: "radial-gradient(circle at bottom center, #2d004d 0%, #000000 85%)",
        text_main: "#ffffff",
        text_dim: "rgba(255, 255, 255, 0.6)",
    },
    ThemePalette {
        name: "green-black",
        background: "radial-gradient(circle at bottom center, #004d33 0%, #000000 85%)",
        text_main: "#ffffff",
        text_dim: "rgba(255, 255, 255, 0.6)",
    },
    ThemePalette {
        name: "dark-grey-black",
        background: "linear-gradient(to bottom, #1a1a1a, #000000)",
        text_main: "#ffffff",
        text_dim: "rgba(255, 255, 255, 0.6)",
    },
    ThemePalette {
        name: "blue-white",
        background: "radial-gradient(circle at bottom center, #e6f0ff 0%, #ffffff 70%)",
        text_main: "#000000",
        text_dim: "rgba(0, 0, 0, 0.6)",
    },
];

pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored language, `ar` when unset or unrecognized.
    pub fn language(&self) -> StoreResult<Language> {
        Ok(self
            .store
            .get(keys::LANGUAGE)?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default())
    }

    pub fn set_language(&self, language: Language) -> StoreResult<()> {
        self.store.set(keys::LANGUAGE, language.code())?;
        debug!(%language, "Language changed");
        Ok(())
    }

    pub fn direction(&self) -> StoreResult<TextDirection> {
        Ok(self.language()?.direction())
    }

    /// Stored theme index, 0 when unset or out of range.
    pub fn theme(&self) -> StoreResult<usize> {
        Ok(self
            .store
            .get(keys::THEME)?
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|index| *index < THEMES.len())
            .unwrap_or(0))
    }

    pub fn palette(&self) -> StoreResult<&'static ThemePalette> {
        Ok(&THEMES[self.theme()?])
    }

    /// Returns false, leaving the stored theme alone, when `index` is out of range.
    pub fn set_theme(&self, index: usize) -> StoreResult<bool> {
        if index >= THEMES.len() {
            debug!(index, "Ignoring out-of-range theme");
            return Ok(false);
        }
        self.store.set(keys::THEME, &index.to_string())?;
        Ok(true)
    }

    /// Advance to the next theme, wrapping after the last one.
    pub fn next_theme(&self) -> StoreResult<usize> {
        let next = (self.theme()? + 1) % THEMES.len();
        self.store.set(keys::THEME, &next.to_string())?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nixt_storage::MemoryKeyValueStore;

    fn prefs() -> (Arc<MemoryKeyValueStore>, Preferences) {
        let kv = Arc::new(MemoryKeyValueStore::new());
        (kv.clone(), Preferences::new(kv))
    }

    #[test]
    fn test_language_defaults_to_arabic() {
        let (kv, prefs) = prefs();
        assert_eq!(prefs.language().unwrap(), Language::Ar);
        assert_eq!(prefs.direction().unwrap(), TextDirection::Rtl);

        kv.set(keys::LANGUAGE, "fr").unwrap();
        assert_eq!(prefs.language().unwrap(), Language::Ar);

        prefs.set_language(Language::En).unwrap();
        assert_eq!(kv.get(keys::LANGUAGE).unwrap().as_deref(), Some("en"));
        assert_eq!(prefs.direction().unwrap(), TextDirection::Ltr);
    }

    #[test]
    fn test_theme_bounds() {
        let (kv, prefs) = prefs();
        assert_eq!(prefs.theme().unwrap(), 0);

        assert!(prefs.set_theme(4).unwrap());
        assert!(!prefs.set_theme(5).unwrap());
        assert_eq!(prefs.theme().unwrap(), 4);
        assert_eq!(prefs.palette().unwrap().name, "blue-white");

        kv.set(keys::THEME, "17").unwrap();
        assert_eq!(prefs.theme().unwrap(), 0);
    }

    #[test]
    fn test_next_theme_wraps() {
        let (_kv, prefs) = prefs();
        prefs.set_theme(3).unwrap();
        assert_eq!(prefs.next_theme().unwrap(), 4);
        assert_eq!(prefs.next_theme().unwrap(), 0);
    }
}
