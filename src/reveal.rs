use std::rc::Rc;

use crate::{
    dom::{Dom, Intersection, ObserverOptions},
    error::Result,
};

/// Elements that animate in the first time they scroll into view.
const REVEALED_ON_SCROLL: &str = ".service-card, .insight-card, .about-text, .about-visual";

pub const REVEALED_CLASS: &str = "animate-in";

/// Start watching the reveal targets. Returns how many elements are observed.
pub fn install<D: Dom>(dom: &D, options: &ObserverOptions) -> Result<usize> {
    let targets = dom.query_all(REVEALED_ON_SCROLL);
    if targets.is_empty() {
        tracing::debug!("nothing to reveal on scroll");
        return Ok(0);
    }

    dom.observe_intersections(&targets, options, {
        let dom = dom.clone();

        Rc::new(move |entries: &[Intersection<D::Node>]| {
            for entry in entries.iter().filter(|entry| entry.is_intersecting) {
                // One way only, leaving the viewport again keeps the element revealed
                if !dom.has_class(&entry.target, REVEALED_CLASS) {
                    dom.add_class(&entry.target, REVEALED_CLASS);
                }
            }
        })
    })?;

    Ok(targets.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessDom;

    #[test]
    fn reveals_once_and_never_reverts() {
        let dom = HeadlessDom::new();
        let card = dom.insert(dom.body(), "div", &[("class", "service-card")]);

        assert_eq!(install(&dom, &ObserverOptions::default()).unwrap(), 1);
        assert!(!dom.has_class(&card, REVEALED_CLASS));

        for _ in 0..3 {
            dom.intersect(card, true);
            dom.intersect(card, false);
        }

        assert_eq!(dom.classes(card), vec!["service-card", REVEALED_CLASS]);
    }

    #[test]
    fn leaving_before_entering_does_nothing() {
        let dom = HeadlessDom::new();
        let text = dom.insert(dom.body(), "div", &[("class", "about-text")]);
        install(&dom, &ObserverOptions::default()).unwrap();

        dom.intersect(text, false);
        assert!(!dom.has_class(&text, REVEALED_CLASS));
    }

    #[test]
    fn observes_with_configured_options() {
        let dom = HeadlessDom::new();
        dom.insert(dom.body(), "div", &[("class", "insight-card")]);
        dom.insert(dom.body(), "div", &[("class", "about-visual")]);
        dom.insert(dom.body(), "div", &[("class", "unrelated")]);

        assert_eq!(install(&dom, &ObserverOptions::default()).unwrap(), 2);
        assert_eq!(
            dom.observer_options(),
            vec![ObserverOptions {
                threshold: 0.1,
                root_margin: "0px 0px -50px 0px".to_string(),
            }]
        );
    }

    #[test]
    fn skipped_without_targets() {
        let dom = HeadlessDom::new();

        assert_eq!(install(&dom, &ObserverOptions::default()).unwrap(), 0);
        assert!(dom.observer_options().is_empty());
    }
}
