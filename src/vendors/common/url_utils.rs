use url::{ParseError, Url};

/// Resolve `reference` (as found in an `src` attribute) against the page URL
/// and drop any query or fragment.
pub fn resolve_reference(base: &str, reference: &str) -> Result<String, ParseError> {
    let mut url = Url::parse(base)?.join(reference.trim())?;
    url.set_query(None);
    url.set_fragment(None);
    Ok(url.to_string())
}

/// Append `elem` to the path of `base` as additional segments.
///
/// Unlike [`Url::join`], the last segment of `base` is never replaced, so a
/// base without a trailing slash behaves like one with it.
pub fn join_path(base: &str, elem: &str) -> Result<String, ParseError> {
    let mut url = Url::parse(base)?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| ParseError::RelativeUrlWithCannotBeABaseBase)?;
        segments.pop_if_empty();
        for part in elem.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                _ => {
                    segments.push(part);
                }
            }
        }
    }
    Ok(url.to_string())
}
