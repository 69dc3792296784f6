use serde::{Deserialize, Serialize};
use std::fmt;

/// How to find an element on the page.
///
/// Locators are resolved afresh by the driver every time they are used, so a
/// locator never goes stale the way an element handle does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum Locator {
    Css(String),
    Id(String),
    LinkText(String),
    XPath(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Locator::Id(id.into())
    }

    pub fn link_text(text: impl Into<String>) -> Self {
        Locator::LinkText(text.into())
    }

    pub fn xpath(path: impl Into<String>) -> Self {
        Locator::XPath(path.into())
    }

    pub fn value(&self) -> &str {
        match self {
            Locator::Css(v) | Locator::Id(v) | Locator::LinkText(v) | Locator::XPath(v) => v,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(v) => write!(f, "css={}", v),
            Locator::Id(v) => write!(f, "id={}", v),
            Locator::LinkText(v) => write!(f, "link={}", v),
            Locator::XPath(v) => write!(f, "xpath={}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_strategy() {
        assert_eq!(Locator::id("email").to_string(), "id=email");
        assert_eq!(
            Locator::css(".page-title span.base").to_string(),
            "css=.page-title span.base"
        );
        assert_eq!(Locator::link_text("Sign In").to_string(), "link=Sign In");
    }

    #[test]
    fn test_yaml_shape() {
        let locator: Locator = serde_yaml::from_str("by: css\nvalue: '#search'").unwrap();
        assert_eq!(locator, Locator::css("#search"));
        assert_eq!(locator.value(), "#search");
    }
}
