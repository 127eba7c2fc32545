//! Stylesheets for the short token classes
//!
//! A category without its own style inherits its nearest styled ancestor's,
//! so a theme only lists what it wants to change.

use crate::tokens::TokenCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    pub color: Option<String>,
    pub background: Option<String>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl Style {
    pub fn color(color: &str) -> Self {
        Self {
            color: Some(color.to_string()),
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn with_background(mut self, background: &str) -> Self {
        self.background = Some(background.to_string());
        self
    }

    fn declarations(&self) -> Vec<String> {
        let mut declarations = Vec::new();
        if let Some(color) = &self.color {
            declarations.push(format!("color: {}", color));
        }
        if let Some(background) = &self.background {
            declarations.push(format!("background-color: {}", background));
        }
        if self.bold {
            declarations.push("font-weight: bold".to_string());
        }
        if self.italic {
            declarations.push("font-style: italic".to_string());
        }
        declarations
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub styles: BTreeMap<TokenCategory, Style>,
}

impl Theme {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            styles: BTreeMap::new(),
        }
    }

    pub fn with_style(mut self, category: TokenCategory, style: Style) -> Self {
        self.styles.insert(category, style);
        self
    }

    /// Light theme in the style of the common site-generator default
    pub fn github() -> Self {
        Self::new("github")
            .with_style(TokenCategory::Error, Style::color("#a61717").with_background("#e3d2d2"))
            .with_style(TokenCategory::Comment, Style::color("#999988").italic())
            .with_style(TokenCategory::CommentPreproc, Style::color("#999999").bold())
            .with_style(TokenCategory::CommentPreprocFile, Style::color("#999999").bold())
            .with_style(TokenCategory::Keyword, Style::color("#000000").bold())
            .with_style(TokenCategory::KeywordType, Style::color("#445588").bold())
            .with_style(TokenCategory::NameBuiltin, Style::color("#0086b3"))
            .with_style(TokenCategory::NameClass, Style::color("#445588").bold())
            .with_style(TokenCategory::NameFunction, Style::color("#990000").bold())
            .with_style(TokenCategory::NameNamespace, Style::color("#555555"))
            .with_style(TokenCategory::String, Style::color("#d14"))
            .with_style(TokenCategory::Number, Style::color("#009999"))
            .with_style(TokenCategory::Operator, Style::color("#000000").bold())
    }

    /// Own style, or the nearest ancestor's
    pub fn style_for(&self, category: TokenCategory) -> Option<&Style> {
        let mut current = Some(category);
        while let Some(category) = current {
            if let Some(style) = self.styles.get(&category) {
                return Some(style);
            }
            current = category.parent();
        }
        None
    }

    /// One rule per styled category, scoped under `scope`
    pub fn css(&self, scope: &str) -> String {
        let mut css = String::new();
        for category in TokenCategory::ALL {
            let class = category.css_class();
            if class.is_empty() {
                continue;
            }
            let Some(style) = self.style_for(category) else {
                continue;
            };
            let declarations = style.declarations();
            if declarations.is_empty() {
                continue;
            }
            // writing to a String cannot fail
            let _ = writeln!(
                css,
                "{} .{} {{ {}; }}",
                scope,
                class,
                declarations.join("; ")
            );
        }
        css
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::github()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inheritance() {
        let theme = Theme::github();
        assert_eq!(
            theme.style_for(TokenCategory::NumberHex),
            theme.style_for(TokenCategory::Number)
        );
        assert_eq!(
            theme.style_for(TokenCategory::CommentSingle),
            theme.style_for(TokenCategory::Comment)
        );
        assert!(theme.style_for(TokenCategory::Punctuation).is_none());
    }

    #[test]
    fn test_css() {
        let css = Theme::github().css(".highlight");
        assert!(css.contains(".highlight .kt { color: #445588; font-weight: bold; }"));
        assert!(css.contains(".highlight .mh { color: #009999; }"));
        assert!(!css.contains(".highlight . "));
    }
}
