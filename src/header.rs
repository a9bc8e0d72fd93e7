use std::{rc::Rc, time::Duration};

use crate::{
    dom::{Dom, Event, EventKind, Target},
    error::Result,
    smooth_scroll::HEADER,
    timer::throttle,
};

pub const SCROLLED_CLASS: &str = "header-scrolled";

/// Style `header` according to how far the window is scrolled.
pub fn apply_scroll_state<D: Dom>(dom: &D, header: &D::Node, threshold: f64) {
    if dom.scroll_y() > threshold {
        dom.add_class(header, SCROLLED_CLASS);
    } else {
        dom.remove_class(header, SCROLLED_CLASS);
    }
}

/// Restyle the header as the window scrolls, checking at most once per `sample`. Returns
/// whether the page has a header to style.
pub fn install<D: Dom>(dom: &D, threshold: f64, sample: Duration) -> Result<bool> {
    let Some(header) = dom.query(HEADER) else {
        tracing::debug!("no header, skipping scroll styling");
        return Ok(false);
    };

    let restyle = throttle(dom.clone(), sample, {
        let dom = dom.clone();
        move |()| apply_scroll_state(&dom, &header, threshold)
    });

    dom.listen(
        Target::Window,
        EventKind::Scroll,
        Rc::new(move |_: &dyn Event<D::Node>| restyle(())),
    )?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessDom;

    const SAMPLE: Duration = Duration::from_millis(100);

    #[test]
    fn toggles_past_threshold() {
        let dom = HeadlessDom::new();
        let header = dom.insert(dom.body(), "header", &[("class", "header")]);
        assert!(install(&dom, 100.0, SAMPLE).unwrap());

        dom.scroll_window(150.0);
        assert!(dom.has_class(&header, SCROLLED_CLASS));

        dom.advance(SAMPLE);
        dom.scroll_window(100.0);
        assert!(!dom.has_class(&header, SCROLLED_CLASS));
    }

    #[test]
    fn bursts_are_sampled() {
        let dom = HeadlessDom::new();
        let header = dom.insert(dom.body(), "header", &[("class", "header")]);
        install(&dom, 100.0, SAMPLE).unwrap();

        dom.scroll_window(10.0);
        for offset in 1..=50 {
            dom.scroll_window(10.0 + f64::from(offset) * 10.0);
        }

        // Only the first event of the burst was looked at
        assert!(!dom.has_class(&header, SCROLLED_CLASS));
        assert_eq!(dom.pending_timers(), 1);

        dom.advance(SAMPLE);
        dom.scroll_window(510.0);
        assert!(dom.has_class(&header, SCROLLED_CLASS));
    }

    #[test]
    fn skipped_without_header() {
        let dom = HeadlessDom::new();
        assert!(!install(&dom, 100.0, SAMPLE).unwrap());
    }
}
