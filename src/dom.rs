//! The document capability every controller is written against. Implemented for the browser by
//! [`crate::web::WebPage`], and in memory by `headless::HeadlessDom` (behind the `headless`
//! feature).

use std::{fmt::Debug, rc::Rc};

use crate::{error::Result, timer::Timers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Submit,
    Scroll,
    DomContentLoaded,
}

impl EventKind {
    /// Whether the event propagates from its target up to the document and window.
    pub fn bubbles(self) -> bool {
        matches!(self, EventKind::Click | EventKind::Submit)
    }
}

impl From<EventKind> for String {
    /// Convert to an event name for use in JS listeners.
    fn from(event: EventKind) -> Self {
        use EventKind::*;
        match event {
            Click => "click",
            Submit => "submit",
            Scroll => "scroll",
            DomContentLoaded => "DOMContentLoaded",
        }
        .to_string()
    }
}

/// Where a listener is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<N> {
    Window,
    Document,
    Node(N),
}

/// The parts of a dispatched event that the controllers need.
pub trait Event<N> {
    /// Element the event was dispatched to, if it was an element.
    fn target(&self) -> Option<N>;

    fn prevent_default(&self);
}

pub type Listener<N> = Rc<dyn Fn(&dyn Event<N>)>;

/// Options for viewport intersection observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    /// Fraction of the element that must be visible before it counts as intersecting.
    pub threshold: f64,

    /// CSS margin applied to the viewport, eg `0px 0px -50px 0px` to trigger slightly before an
    /// element scrolls fully into view.
    pub root_margin: String,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
        }
    }
}

/// A single intersection change reported by an observer.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection<N> {
    pub target: N,
    pub is_intersecting: bool,
}

pub type IntersectionCallback<N> = Rc<dyn Fn(&[Intersection<N>])>;

/// A rendered document, as seen by the controllers: find elements, mutate their visual state,
/// read layout metrics, and subscribe to platform signals.
///
/// Mutations that the platform may reject but that the controllers cannot do anything about
/// (class and style changes, scrolling) are infallible here; implementations log and move on.
pub trait Dom: Timers + Clone + 'static {
    /// Handle to an element. Cheap to clone.
    type Node: 'static + Clone + PartialEq + Debug;

    /// First element in document order matching `selector`.
    fn query(&self, selector: &str) -> Option<Self::Node>;

    /// All elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;

    /// First descendant of `scope` matching `selector`.
    fn query_in(&self, scope: &Self::Node, selector: &str) -> Option<Self::Node>;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Create a detached element.
    fn create_element(&self, tag: &str) -> Result<Self::Node>;

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<()>;

    /// Detach `node` from its parent.
    fn remove(&self, node: &Self::Node);

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);

    fn text(&self, node: &Self::Node) -> String;
    fn set_text(&self, node: &Self::Node, text: &str);

    /// Set an inline style property. An empty value clears it.
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);

    /// Current value of a form control.
    fn value(&self, node: &Self::Node) -> String;
    fn set_value(&self, node: &Self::Node, value: &str);

    fn set_disabled(&self, node: &Self::Node, disabled: bool);

    /// Distance from the top of the document, in CSS pixels.
    fn offset_top(&self, node: &Self::Node) -> f64;

    /// Rendered height, in CSS pixels.
    fn offset_height(&self, node: &Self::Node) -> f64;

    /// Current vertical scroll offset of the window.
    fn scroll_y(&self) -> f64;

    /// Smoothly scroll the window to a vertical offset.
    fn scroll_to(&self, top: f64);

    /// Navigate the browser to `href`.
    fn navigate(&self, href: &str);

    /// Path component of the current location.
    fn pathname(&self) -> String;

    /// Attach a block of CSS rules to the document.
    fn inject_stylesheet(&self, css: &str) -> Result<()>;

    /// Register `listener` for `kind` events reaching `target`. Listeners live as long as the page.
    fn listen(
        &self,
        target: Target<Self::Node>,
        kind: EventKind,
        listener: Listener<Self::Node>,
    ) -> Result<()>;

    /// Observe `nodes` entering and leaving the viewport.
    fn observe_intersections(
        &self,
        nodes: &[Self::Node],
        options: &ObserverOptions,
        callback: IntersectionCallback<Self::Node>,
    ) -> Result<()>;
}
