use std::str::FromStr;

use crate::foundation::error::{MergeError, MergeResult};

/// Fully resolved outer border around the composed canvas, in pixels.
///
/// Values are not validated; negative sides shrink the canvas and shift placements
/// toward (or past) the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Margin {
    /// Top side.
    pub top: i32,
    /// Right side.
    pub right: i32,
    /// Bottom side.
    pub bottom: i32,
    /// Left side.
    pub left: i32,
}

impl Margin {
    /// Same value on all four sides.
    pub fn uniform(v: i32) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    /// Explicit sides in CSS order.
    pub fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// `left + right`.
    pub fn horizontal(&self) -> i64 {
        i64::from(self.left) + i64::from(self.right)
    }

    /// `top + bottom`.
    pub fn vertical(&self) -> i64 {
        i64::from(self.top) + i64::from(self.bottom)
    }

    /// Parse CSS margin shorthand: `"a"`, `"v h"`, `"t h b"` or `"t r b l"`.
    ///
    /// Tokens past the fourth are ignored. Missing sides follow the CSS fallback
    /// chain (right from top, bottom from top, left from right).
    pub fn parse_shorthand(s: &str) -> MergeResult<Self> {
        let mut sides = Vec::with_capacity(4);
        for token in s.split_whitespace().take(4) {
            let v = token.parse::<i32>().map_err(|e| {
                MergeError::parse(format!("invalid margin token '{token}' in '{s}': {e}"))
            })?;
            sides.push(v);
        }

        let Some(&top) = sides.first() else {
            return Err(MergeError::parse("margin shorthand must contain a value"));
        };
        let right = sides.get(1).copied().unwrap_or(top);
        let bottom = sides.get(2).copied().unwrap_or(top);
        let left = sides.get(3).copied().unwrap_or(right);

        Ok(Self::new(top, right, bottom, left))
    }
}

impl FromStr for Margin {
    type Err = MergeError;

    fn from_str(s: &str) -> MergeResult<Self> {
        Self::parse_shorthand(s)
    }
}

/// Margin as the caller wrote it: a number, a CSS shorthand string or per-side values.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(untagged)]
pub enum MarginSpec {
    /// Same value on every side.
    Uniform(i32),
    /// CSS-style shorthand such as `"10 20"`.
    Shorthand(String),
    /// Individual sides; missing ones are zero.
    Sides(MarginSides),
}

/// Per-side margin input; every side defaults to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
pub struct MarginSides {
    /// Top side.
    #[serde(default)]
    pub top: i32,
    /// Right side.
    #[serde(default)]
    pub right: i32,
    /// Bottom side.
    #[serde(default)]
    pub bottom: i32,
    /// Left side.
    #[serde(default)]
    pub left: i32,
}

impl MarginSpec {
    /// Resolve into four explicit sides.
    pub fn resolve(&self) -> MergeResult<Margin> {
        match self {
            Self::Uniform(v) => Ok(Margin::uniform(*v)),
            Self::Shorthand(s) => Margin::parse_shorthand(s),
            Self::Sides(s) => Ok(Margin::new(s.top, s.right, s.bottom, s.left)),
        }
    }
}

/// Resolve an optional margin; absent means no margin.
pub fn resolve_margin(spec: Option<&MarginSpec>) -> MergeResult<Margin> {
    spec.map_or_else(|| Ok(Margin::default()), MarginSpec::resolve)
}

impl From<i32> for MarginSpec {
    fn from(v: i32) -> Self {
        Self::Uniform(v)
    }
}

impl From<&str> for MarginSpec {
    fn from(s: &str) -> Self {
        Self::Shorthand(s.to_string())
    }
}

impl From<String> for MarginSpec {
    fn from(s: String) -> Self {
        Self::Shorthand(s)
    }
}

impl From<Margin> for MarginSpec {
    fn from(m: Margin) -> Self {
        Self::Sides(MarginSides {
            top: m.top,
            right: m.right,
            bottom: m.bottom,
            left: m.left,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/margin.rs"]
mod tests;
