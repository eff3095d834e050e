//! Target address resolution
//!
//! Sources in order: the request path, the last `X-Forwarded-For` entry,
//! then the quoted `for=` value of `Forwarded`. A present `X-Forwarded-For`
//! decides the address on its own, even when its last entry is blank. No
//! syntax checks happen here.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static FORWARDED_FOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"for="(?P<address>[^";]+)""#).expect("valid regex"));

/// Pick the address to look up, or `None` when no source has one.
pub fn resolve(
    path_address: Option<&str>,
    x_forwarded_for: Option<&str>,
    forwarded: Option<&str>,
) -> Option<String> {
    if let Some(address) = path_address.filter(|a| !a.is_empty()) {
        debug!("address {:?} (set by path)", address);
        return Some(address.to_string());
    }

    if let Some(header) = x_forwarded_for {
        let address = last_forwarded_for(header);
        debug!("address {:?} (set by x_forwarded_for)", address);
        return Some(address.to_string());
    }

    let address = forwarded.and_then(forwarded_for)?;
    debug!("address {:?} (set by forwarded)", address);
    Some(address.to_string())
}

/// Last comma separated entry, trimmed.
fn last_forwarded_for(header: &str) -> &str {
    header.rsplit(',').next().unwrap_or_default().trim()
}

fn forwarded_for(header: &str) -> Option<&str> {
    FORWARDED_FOR
        .captures(header)
        .and_then(|caps| caps.name("address"))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_forwarded_for_alone() {
        assert_eq!(resolve(None, Some("4.3.2.1"), None).as_deref(), Some("4.3.2.1"));
    }

    #[test]
    fn test_x_forwarded_for_uses_last_entry() {
        assert_eq!(
            resolve(None, Some("10.1.1.1, 4.3.2.1"), None).as_deref(),
            Some("4.3.2.1")
        );
        assert_eq!(
            resolve(None, Some(" 1.1.1.1 ,2.2.2.2,  2600::1 "), None).as_deref(),
            Some("2600::1")
        );
    }

    #[test]
    fn test_forwarded_alone() {
        assert_eq!(
            resolve(None, None, Some(r#"for="4.3.2.1""#)).as_deref(),
            Some("4.3.2.1")
        );
        assert_eq!(
            resolve(None, None, Some(r#"proto=https;for="2600::1";by=proxy"#)).as_deref(),
            Some("2600::1")
        );
    }

    #[test]
    fn test_forwarded_requires_quoted_value() {
        assert_eq!(resolve(None, None, Some("for=4.3.2.1")), None);
        assert_eq!(resolve(None, None, Some(r#"for="""#)), None);
    }

    #[test]
    fn test_precedence() {
        let xff = Some("5.5.5.5");
        let fwd = Some(r#"for="6.6.6.6""#);
        assert_eq!(resolve(Some("4.3.2.1"), xff, fwd).as_deref(), Some("4.3.2.1"));
        assert_eq!(resolve(None, xff, fwd).as_deref(), Some("5.5.5.5"));
        assert_eq!(resolve(None, None, fwd).as_deref(), Some("6.6.6.6"));
    }

    #[test]
    fn test_blank_x_forwarded_for_still_decides() {
        let fwd = Some(r#"for="6.6.6.6""#);
        assert_eq!(resolve(None, Some("4.3.2.1, "), fwd).as_deref(), Some(""));
        assert_eq!(resolve(None, Some(""), fwd).as_deref(), Some(""));
        assert_eq!(resolve(None, Some("  "), None).as_deref(), Some(""));
    }

    #[test]
    fn test_nothing_to_resolve() {
        assert_eq!(resolve(None, None, None), None);
        assert_eq!(resolve(None, None, Some("by=proxy")), None);
    }

    #[test]
    fn test_no_validation() {
        assert_eq!(
            resolve(None, Some("definitely-not-an-ip"), None).as_deref(),
            Some("definitely-not-an-ip")
        );
    }
}
