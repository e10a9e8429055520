//! Login redirect URLs

use studygate_host_api::PageLocation;

/// Query parameter carrying the page to return to after login
pub const REDIRECT_PARAM: &str = "redirect";

/// Login entry point carrying `from` as the return target
pub fn login_url(login_path: &str, from: &PageLocation) -> String {
    format!(
        "{}?{}={}",
        login_path,
        REDIRECT_PARAM,
        urlencoding::encode(&from.request_target())
    )
}

/// Return target encoded in a login page location.
///
/// Only same-site targets are honoured; absolute and protocol-relative URLs
/// are ignored.
pub fn redirect_target(login_location: &PageLocation) -> Option<String> {
    let query = login_location.query.as_deref()?;

    let raw = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == REDIRECT_PARAM)
        .map(|(_, value)| value)?;

    let target = urlencoding::decode(raw).ok()?.into_owned();
    if target.is_empty() || target.contains("://") || target.starts_with("//") {
        return None;
    }
    Some(target)
}
