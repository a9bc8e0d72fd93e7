use std::rc::Rc;

use crate::{
    dom::{Dom, Event, EventKind, Target},
    error::Result,
};

const IN_PAGE_LINKS: &str = r##"a[href^="#"]"##;

/// The fixed header that scroll targets must clear.
pub const HEADER: &str = ".header";

/// Scroll offset that brings `target` to the top of the viewport, just below the fixed header.
pub fn offset_below_header<D: Dom>(dom: &D, target: &D::Node) -> f64 {
    let header_height = dom
        .query(HEADER)
        .map_or(0.0, |header| dom.offset_height(&header));

    dom.offset_top(target) - header_height
}

/// Smoothly scroll so that `target` sits just below the fixed header.
pub fn scroll_to_element<D: Dom>(dom: &D, target: &D::Node) {
    let top = offset_below_header(dom, target);
    tracing::debug!(top, "scrolling to element");

    dom.scroll_to(top);
}

/// Make every in-page anchor scroll smoothly instead of jumping. Returns the number of anchors
/// wired up.
pub fn install<D: Dom>(dom: &D) -> Result<usize> {
    let links = dom.query_all(IN_PAGE_LINKS);

    for link in &links {
        dom.listen(Target::Node(link.clone()), EventKind::Click, {
            let dom = dom.clone();
            let link = link.clone();

            Rc::new(move |event: &dyn Event<D::Node>| {
                event.prevent_default();

                let target = dom
                    .attribute(&link, "href")
                    .and_then(|href| href.strip_prefix('#').map(str::to_string))
                    .filter(|fragment| !fragment.is_empty())
                    .and_then(|fragment| dom.element_by_id(&fragment));

                if let Some(target) = target {
                    scroll_to_element(&dom, &target);
                }
            })
        })?;
    }

    Ok(links.len())
}
