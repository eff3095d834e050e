//! Path classification
//!
//! Every path reaches one handler; the route only decides between the help
//! text and a lookup, and extracts the address embedded in the path.

use std::sync::LazyLock;

use regex::Regex;

static HELP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^.*/help$").expect("valid regex"));
static ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/address/(?P<address>[0-9a-fA-F.:]+)$").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Help,
    Lookup { address: Option<&'a str> },
}

impl<'a> Route<'a> {
    pub fn from_path(path: &'a str) -> Self {
        if HELP.is_match(path) {
            return Route::Help;
        }

        let address = ADDRESS
            .captures(path)
            .and_then(|caps| caps.name("address"))
            .map(|m| m.as_str());
        Route::Lookup { address }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_routes() {
        assert_eq!(Route::from_path("/help"), Route::Help);
        assert_eq!(Route::from_path("/any/path/ending/in/help"), Route::Help);
        assert_eq!(Route::from_path("/address/help"), Route::Help);
        assert_ne!(Route::from_path("/helpful"), Route::Help);
        assert_ne!(Route::from_path("/help/ping"), Route::Help);
    }

    #[test]
    fn test_address_routes() {
        assert_eq!(
            Route::from_path("/address/4.3.2.1"),
            Route::Lookup {
                address: Some("4.3.2.1")
            }
        );
        assert_eq!(
            Route::from_path("/address/2600::1"),
            Route::Lookup {
                address: Some("2600::1")
            }
        );
    }

    #[test]
    fn test_paths_without_address() {
        for path in ["/", "/address", "/address/", "/address/example.com", "/foo", "/address/4.3.2.1/ping"] {
            assert_eq!(Route::from_path(path), Route::Lookup { address: None }, "{}", path);
        }
    }
}
