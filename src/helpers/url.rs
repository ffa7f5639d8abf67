//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters escaped inside a single path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/images/logo.svg") // -> "/blog/images/logo.svg"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Route of a post page
///
/// # Examples
/// ```ignore
/// post_url(&config, "como-utilizar-hooks") // -> "/post/como-utilizar-hooks"
/// ```
pub fn post_url(config: &SiteConfig, uid: &str) -> String {
    url_for(
        config,
        &format!("post/{}", utf8_percent_encode(uid, PATH_SEGMENT)),
    )
}

/// Whether `slug` is safe to use as an output directory name
pub fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
