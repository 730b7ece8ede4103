//! Display settings: background images and panel opacity.
//!
//! Each value lives in its own key and falls back to its own default.

use super::{KvStore, StoreError};
use crate::error::AppError;
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;

pub const OPACITY_MIN: f64 = 0.05;
pub const OPACITY_MAX: f64 = 0.95;
/// Substituted for input that does not parse as a number.
pub const OPACITY_FALLBACK: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundKey {
    Pc,
    Mobile,
}

impl BackgroundKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundKey::Pc => "bg:pc",
            BackgroundKey::Mobile => "bg:mobile",
        }
    }
}

impl FromStr for BackgroundKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bg:pc" => Ok(BackgroundKey::Pc),
            "bg:mobile" => Ok(BackgroundKey::Mobile),
            _ => Err(AppError::BadRequest(format!(
                "Unknown background key: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpacityKey {
    Card,
    Article,
    Sidebar,
    Editor,
}

impl OpacityKey {
    pub const ALL: [OpacityKey; 4] = [
        OpacityKey::Card,
        OpacityKey::Article,
        OpacityKey::Sidebar,
        OpacityKey::Editor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OpacityKey::Card => "card",
            OpacityKey::Article => "article",
            OpacityKey::Sidebar => "sidebar",
            OpacityKey::Editor => "editor",
        }
    }

    pub fn default_value(&self) -> f64 {
        match self {
            OpacityKey::Card | OpacityKey::Article => 0.28,
            OpacityKey::Sidebar => 0.22,
            OpacityKey::Editor => 0.25,
        }
    }

    fn store_key(&self) -> String {
        format!("opacity:{}", self.as_str())
    }
}

impl FromStr for OpacityKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OpacityKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown opacity key: {}", s)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackgroundImages {
    pub pc: String,
    pub mobile: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpacitySettings {
    pub card: f64,
    pub article: f64,
    pub sidebar: f64,
    pub editor: f64,
}

impl Default for OpacitySettings {
    fn default() -> Self {
        Self {
            card: OpacityKey::Card.default_value(),
            article: OpacityKey::Article.default_value(),
            sidebar: OpacityKey::Sidebar.default_value(),
            editor: OpacityKey::Editor.default_value(),
        }
    }
}

/// Parse the longest decimal prefix of `s` after leading whitespace.
///
/// `"0.5px"` reads as 0.5 and `"Infinity"` as infinity; a string with no
/// leading digits yields `None`.
fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        return Some(if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = bytes[end..].iter().take_while(|b| b.is_ascii_digit()).count();
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = bytes[end + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = bytes[exp_end..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}

/// Coerce a submitted opacity into `[OPACITY_MIN, OPACITY_MAX]`.
///
/// Numbers are taken as-is and strings by their leading decimal prefix;
/// anything else (including NaN) becomes [`OPACITY_FALLBACK`].
pub fn clamp_opacity(raw: &serde_json::Value) -> f64 {
    let parsed = match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => parse_leading_float(s),
        _ => None,
    };
    let value = match parsed {
        Some(v) if !v.is_nan() => v,
        _ => OPACITY_FALLBACK,
    };
    value.clamp(OPACITY_MIN, OPACITY_MAX)
}

/// Settings operations over a [`KvStore`].
#[derive(Clone)]
pub struct SettingsStore {
    store: Arc<dyn KvStore>,
}

impl SettingsStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub async fn get_background_images(&self) -> Result<BackgroundImages, StoreError> {
        let pc = self.store.get(BackgroundKey::Pc.as_str()).await?;
        let mobile = self.store.get(BackgroundKey::Mobile.as_str()).await?;
        Ok(BackgroundImages {
            pc: pc.unwrap_or_default(),
            mobile: mobile.unwrap_or_default(),
        })
    }

    /// Store a background URL as given. An empty URL clears the image.
    pub async fn save_background_image(
        &self,
        key: BackgroundKey,
        url: &str,
    ) -> Result<(), StoreError> {
        self.store.put(key.as_str(), url).await
    }

    async fn get_opacity(&self, key: OpacityKey) -> Result<f64, StoreError> {
        let stored = self.store.get(&key.store_key()).await?;
        Ok(stored
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or_else(|| key.default_value()))
    }

    pub async fn get_opacity_settings(&self) -> Result<OpacitySettings, StoreError> {
        Ok(OpacitySettings {
            card: self.get_opacity(OpacityKey::Card).await?,
            article: self.get_opacity(OpacityKey::Article).await?,
            sidebar: self.get_opacity(OpacityKey::Sidebar).await?,
            editor: self.get_opacity(OpacityKey::Editor).await?,
        })
    }

    /// Clamp and persist an opacity value. Returns what was stored.
    pub async fn save_opacity_setting(
        &self,
        key: OpacityKey,
        raw: &serde_json::Value,
    ) -> Result<f64, StoreError> {
        let value = clamp_opacity(raw);
        self.store.put(&key.store_key(), &value.to_string()).await?;
        Ok(value)
    }
}
