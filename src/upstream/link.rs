//! `Link` response header parsing.
//!
//! The upstream advertises further pages with an RFC 8288 style header:
//!
//! ```text
//! <https://api.example.com/orgs/x/repos?page=2>; rel="next", <https://api.example.com/orgs/x/repos?page=5>; rel="last"
//! ```

const LINK_SEPARATOR: char = ',';
const PARAM_SEPARATOR: char = ';';
const REL_NEXT: &str = "rel=\"next\"";

/// Extract the `rel="next"` target from a `Link` header value.
///
/// Returns `None` when no segment ends with `rel="next"` or when that
/// segment's target is not wrapped in angle brackets.
pub fn next_page_url(header: &str) -> Option<&str> {
    header
        .split(LINK_SEPARATOR)
        .map(str::trim)
        .filter(|segment| segment.ends_with(REL_NEXT))
        .find_map(|segment| {
            let target = segment.split(PARAM_SEPARATOR).next()?.trim();
            target.strip_prefix('<')?.strip_suffix('>')
        })
}
