//! Physical table names from type or table identifiers.

/// Turns a logical identifier into a prefixed, snake_case table name.
///
/// The identifier may be a bare table name (`"widgets"`) or a qualified
/// type path (`"shop::models::WidgetPart"`, `"App\\Models\\Widget"`); only
/// the last path segment is used. No pluralisation is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableResolver {
    prefix: String,
}

impl TableResolver {
    /// Creates a resolver prepending `prefix` to every table name.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Returns the configured table prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Resolves an identifier to its physical table name.
    ///
    /// Resolution is idempotent: a name already carrying the prefix keeps
    /// it verbatim and only the remainder is snake_cased.
    #[must_use]
    pub fn resolve(&self, identifier: &str) -> String {
        let base = base_name(identifier);
        let rest = base.strip_prefix(self.prefix.as_str()).unwrap_or(base);
        format!("{}{}", self.prefix, snake_case(rest))
    }

    /// Resolves the table name of a Rust type from its type path.
    #[must_use]
    pub fn resolve_type<T: ?Sized>(&self) -> String {
        self.resolve(std::any::type_name::<T>())
    }
}

/// Returns the last path segment of a qualified name, without generics.
#[must_use]
pub fn base_name(identifier: &str) -> &str {
    let without_generics = identifier
        .split_once('<')
        .map_or(identifier, |(head, _)| head);
    without_generics
        .rsplit(|c| c == ':' || c == '\\' || c == '.' || c == '/')
        .next()
        .unwrap_or(without_generics)
        .trim()
}

/// Converts `StudlyCase`, `camelCase` or spaced names to snake_case.
///
/// Acronyms stay together (`HTTPRequest` becomes `http_request`) and input
/// that is already snake_case is returned unchanged.
#[must_use]
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' || c == '-' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            continue;
        }
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary && !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case_conversion() {
        assert_eq!(snake_case("Widget"), "widget");
        assert_eq!(snake_case("WidgetPart"), "widget_part");
        assert_eq!(snake_case("widgetPart"), "widget_part");
        assert_eq!(snake_case("HTTPRequest"), "http_request");
        assert_eq!(snake_case("Order2Item"), "order2_item");
        assert_eq!(snake_case("Widget_Part"), "widget_part");
        assert_eq!(snake_case("order items"), "order_items");
    }

    #[test]
    fn test_base_name_drops_paths_and_generics() {
        assert_eq!(base_name("shop::models::WidgetPart"), "WidgetPart");
        assert_eq!(base_name("App\\Models\\Widget"), "Widget");
        assert_eq!(base_name("alloc::vec::Vec<shop::Widget>"), "Vec");
        assert_eq!(base_name("widgets"), "widgets");
    }

    #[test]
    fn test_resolve_applies_prefix() {
        let resolver = TableResolver::new("wp_");
        assert_eq!(resolver.resolve("widgets"), "wp_widgets");
        assert_eq!(resolver.resolve("shop::WidgetPart"), "wp_widget_part");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let resolver = TableResolver::new("wp_");
        for identifier in ["widgets", "WidgetPart", "App\\Models\\OrderLine", "wp_widgets"] {
            let once = resolver.resolve(identifier);
            assert_eq!(resolver.resolve(&once), once);
        }
        assert_eq!(resolver.resolve("wp_widget_part"), "wp_widget_part");

        let upper = TableResolver::new("WP_");
        for identifier in ["widgets", "WidgetPart", "WP_widgets"] {
            let once = upper.resolve(identifier);
            assert!(once.starts_with("WP_"), "{once}");
            assert_eq!(upper.resolve(&once), once);
        }
        assert_eq!(upper.resolve("widgets"), "WP_widgets");
    }

    #[test]
    fn test_resolve_without_prefix() {
        let resolver = TableResolver::default();
        assert_eq!(resolver.resolve("Widget"), "widget");
        assert_eq!(resolver.prefix(), "");
    }

    #[test]
    fn test_resolve_type() {
        struct OrderLine;
        let resolver = TableResolver::new("app_");
        assert_eq!(resolver.resolve_type::<OrderLine>(), "app_order_line");
    }
}
