//! HTML building helpers.

use std::collections::BTreeMap;
use std::fmt;

/// Escapes text for use in element content or a quoted attribute value.
#[must_use]
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escapes the characters that would open markup inside element content.
/// Quotes stay as typed.
pub(crate) fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Ordered list of CSS declarations rendered into a `style` attribute.
///
/// Setting a property that is already present replaces its value in place,
/// so later layers override earlier ones without changing the order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    /// Creates an empty style.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            declarations: Vec::new(),
        }
    }

    /// Starts from the element's raw CSS map.
    #[must_use]
    pub fn from_styles(styles: &BTreeMap<String, String>) -> Self {
        let mut style = Self::new();
        for (property, value) in styles {
            style.set(property, value);
        }
        style
    }

    /// Sets one declaration. Empty values are ignored.
    pub fn set(&mut self, property: &str, value: &str) -> &mut Self {
        let property = property.trim();
        let value = value.trim();
        if property.is_empty() || value.is_empty() {
            return self;
        }
        match self.declarations.iter_mut().find(|(p, _)| p == property) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self
                .declarations
                .push((property.to_string(), value.to_string())),
        }
        self
    }

    /// Sets a declaration when a value is present.
    pub fn set_opt(&mut self, property: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.set(property, value);
        }
        self
    }

    /// Sets a declaration only if it is not already present.
    pub fn set_default(&mut self, property: &str, value: &str) -> &mut Self {
        if !self.declarations.iter().any(|(p, _)| p == property) {
            self.set(property, value);
        }
        self
    }

    /// Returns true if no declarations are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Renders ` style="..."`, or nothing when empty.
    #[must_use]
    pub fn attribute(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" style=\"{}\"", escape_html(&self.to_string()))
        }
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (property, value)) in self.declarations.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{property}: {value};")?;
        }
        Ok(())
    }
}

/// Halves a CSS pixel length (`"20px"` -> `"10px"`); other units are kept.
#[must_use]
pub fn half_length(length: &str) -> String {
    let trimmed = length.trim();
    trimmed
        .strip_suffix("px")
        .and_then(|n| n.trim().parse::<f64>().ok())
        .map_or_else(|| trimmed.to_string(), |n| format!("{}px", n / 2.0))
}
