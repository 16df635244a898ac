use fantoccini::Locator;
use serde::{Deserialize, Serialize};

/// Locator strategy accepted by the element-targeting tools.
///
/// fantoccini only speaks css/xpath/id on the wire, so `name`, `tag`, and
/// `class` are translated to equivalent CSS selectors — the same rewriting
/// browsers apply to Selenium's `By` shorthands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LocatorStrategy {
    Id,
    Css,
    Xpath,
    Name,
    Tag,
    Class,
}

/// A strategy applied to a value: owns the selector string so it can outlive
/// the argument bag it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedLocator {
    Id(String),
    Css(String),
    XPath(String),
}

impl LocatorStrategy {
    pub fn resolve(self, value: &str) -> ResolvedLocator {
        match self {
            LocatorStrategy::Id => ResolvedLocator::Id(value.to_string()),
            LocatorStrategy::Css => ResolvedLocator::Css(value.to_string()),
            LocatorStrategy::Xpath => ResolvedLocator::XPath(value.to_string()),
            LocatorStrategy::Name => {
                ResolvedLocator::Css(format!("[name=\"{}\"]", css_escape(value)))
            }
            LocatorStrategy::Tag => ResolvedLocator::Css(value.to_string()),
            LocatorStrategy::Class => ResolvedLocator::Css(format!(".{value}")),
        }
    }
}

impl ResolvedLocator {
    pub fn as_locator(&self) -> Locator<'_> {
        match self {
            ResolvedLocator::Id(s) => Locator::Id(s),
            ResolvedLocator::Css(s) => Locator::Css(s),
            ResolvedLocator::XPath(s) => Locator::XPath(s),
        }
    }

    /// The selector text, for error messages.
    pub fn describe(&self) -> &str {
        match self {
            ResolvedLocator::Id(s) | ResolvedLocator::Css(s) | ResolvedLocator::XPath(s) => s,
        }
    }
}

fn css_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_passes_through() {
        assert_eq!(
            LocatorStrategy::Id.resolve("submit-btn"),
            ResolvedLocator::Id("submit-btn".into())
        );
    }

    #[test]
    fn test_name_becomes_attribute_selector() {
        assert_eq!(
            LocatorStrategy::Name.resolve("email"),
            ResolvedLocator::Css("[name=\"email\"]".into())
        );
    }

    #[test]
    fn test_name_escapes_quotes() {
        assert_eq!(
            LocatorStrategy::Name.resolve("a\"b"),
            ResolvedLocator::Css("[name=\"a\\\"b\"]".into())
        );
    }

    #[test]
    fn test_class_gets_dot_prefix() {
        assert_eq!(
            LocatorStrategy::Class.resolve("nav-item"),
            ResolvedLocator::Css(".nav-item".into())
        );
    }

    #[test]
    fn test_tag_is_plain_css() {
        assert_eq!(
            LocatorStrategy::Tag.resolve("button"),
            ResolvedLocator::Css("button".into())
        );
    }

    #[test]
    fn test_strategy_deserializes_lowercase() {
        let by: LocatorStrategy = serde_json::from_str("\"xpath\"").unwrap();
        assert_eq!(by, LocatorStrategy::Xpath);
        assert!(serde_json::from_str::<LocatorStrategy>("\"link\"").is_err());
    }
}
