use crate::dom::Dom;

const NAV_LINKS: &str = ".nav-link";

pub const ACTIVE_CLASS: &str = "active";

/// File name of the page being displayed: the last segment of `pathname`, or `default_page`
/// when the path ends in `/`.
pub fn current_page<'a>(pathname: &'a str, default_page: &'a str) -> &'a str {
    pathname
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(default_page)
}

/// Mark the navigation links pointing at the current page as active, and every other link as
/// inactive. Safe to call repeatedly. Returns how many links are active.
pub fn highlight<D: Dom>(dom: &D, default_page: &str) -> usize {
    let pathname = dom.pathname();
    let page = current_page(&pathname, default_page);

    let mut active = 0;
    for link in dom.query_all(NAV_LINKS) {
        if dom.attribute(&link, "href").as_deref() == Some(page) {
            dom.add_class(&link, ACTIVE_CLASS);
            active += 1;
        } else {
            dom.remove_class(&link, ACTIVE_CLASS);
        }
    }

    tracing::debug!(page, active, "highlighted navigation");
    active
}
