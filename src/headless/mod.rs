//! An in-memory document with a virtual clock. Implements [`Dom`] without a browser, and exposes
//! drivers (clicks, submits, scrolling, intersections, time) and inspectors for tests.

mod selector;

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
    time::Duration,
};

pub use self::selector::{SelectorList, Subject};
use crate::{
    dom::{
        Dom, Event, EventKind, Intersection, IntersectionCallback, Listener, ObserverOptions,
        Target,
    },
    error::{Error, Result},
    timer::{TimerHandle, Timers},
};

/// Handle to an element in a [`HeadlessDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Default)]
struct NodeData {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    style: BTreeMap<String, String>,
    value: String,
    disabled: bool,
    offset_top: f64,
    offset_height: f64,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Subject for NodeData {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|existing| existing == class)
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

struct Observer {
    nodes: Vec<NodeId>,
    options: ObserverOptions,
    callback: IntersectionCallback<NodeId>,
}

struct PendingTimer {
    handle: TimerHandle,
    due: Duration,
    callback: Box<dyn FnOnce()>,
}

struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
    head: NodeId,
    body: NodeId,

    listeners: Vec<(Target<NodeId>, EventKind, Listener<NodeId>)>,
    observers: Vec<Observer>,

    now: Duration,
    next_timer: i32,
    timers: Vec<PendingTimer>,

    scroll_y: f64,
    scroll_requests: Vec<f64>,
    navigations: Vec<String>,
    pathname: String,
    stylesheets: Vec<String>,

    /// Injected failures, for exercising error paths.
    failing_timers: bool,
    failing_listeners: Option<EventKind>,
}

impl Document {
    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    fn create(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            tag: tag.to_ascii_lowercase(),
            ..NodeData::default()
        });
        id
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node_mut(id).parent.take() {
            self.node_mut(parent).children.retain(|child| *child != id);
        }
    }

    fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// `id` followed by its ancestors, nearest first.
    fn ancestry(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            path.push(parent);
            current = parent;
        }
        path
    }

    /// Descendants of `scope` in document order, excluding `scope` itself.
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = self.node(scope).children.iter().rev().copied().collect::<Vec<_>>();
        while let Some(id) = stack.pop() {
            found.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        found
    }

    fn select(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let Some(selector) = SelectorList::parse(selector) else {
            tracing::debug!(selector, "unsupported selector");
            return Vec::new();
        };

        self.descendants(scope)
            .into_iter()
            .filter(|id| selector.matches(self.node(*id)))
            .collect()
    }
}

struct HeadlessEvent {
    target: Option<NodeId>,
    default_prevented: Cell<bool>,
}

impl Event<NodeId> for HeadlessEvent {
    fn target(&self) -> Option<NodeId> {
        self.target
    }

    fn prevent_default(&self) {
        self.default_prevented.set(true);
    }
}

/// Shared handle to an in-memory document. Clones refer to the same document.
#[derive(Clone)]
pub struct HeadlessDom(Rc<RefCell<Document>>);

impl Default for HeadlessDom {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDom {
    /// Create a document containing `<html>`, `<head>` and `<body>`, at path `/`.
    pub fn new() -> Self {
        let mut document = Document {
            nodes: Vec::new(),
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
            listeners: Vec::new(),
            observers: Vec::new(),
            now: Duration::ZERO,
            next_timer: 1,
            timers: Vec::new(),
            scroll_y: 0.0,
            scroll_requests: Vec::new(),
            navigations: Vec::new(),
            pathname: "/".to_string(),
            stylesheets: Vec::new(),
            failing_timers: false,
            failing_listeners: None,
        };

        let root = document.create("html");
        let head = document.create("head");
        let body = document.create("body");
        document.append(root, head);
        document.append(root, body);

        document.root = root;
        document.head = head;
        document.body = body;

        Self(Rc::new(RefCell::new(document)))
    }

    pub fn head(&self) -> NodeId {
        self.0.borrow().head
    }

    pub fn body(&self) -> NodeId {
        self.0.borrow().body
    }

    /// Create an element under `parent`. `class` and `id` entries of `attributes` behave as they
    /// would in markup.
    pub fn insert(&self, parent: NodeId, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let mut document = self.0.borrow_mut();
        let id = document.create(tag);
        {
            let node = document.node_mut(id);
            for (name, value) in attributes {
                if *name == "class" {
                    node.classes = value.split_whitespace().map(str::to_string).collect();
                } else {
                    node.attributes.insert(name.to_string(), value.to_string());
                }
            }
        }
        document.append(parent, id);
        id
    }

    /// Set the layout metrics reported for `node`.
    pub fn set_layout(&self, node: NodeId, offset_top: f64, offset_height: f64) {
        let mut document = self.0.borrow_mut();
        let node = document.node_mut(node);
        node.offset_top = offset_top;
        node.offset_height = offset_height;
    }

    pub fn set_pathname(&self, pathname: &str) {
        self.0.borrow_mut().pathname = pathname.to_string();
    }

    /// Type into a form control, without dispatching anything.
    pub fn type_into(&self, node: NodeId, value: &str) {
        self.0.borrow_mut().node_mut(node).value = value.to_string();
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.0.borrow().node(node).classes.clone()
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.0.borrow().node(node).style.get(property).cloned()
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.0.borrow().node(node).disabled
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.0.borrow().node(node).children.clone()
    }

    /// Offsets passed to [`Dom::scroll_to`], oldest first.
    pub fn scroll_requests(&self) -> Vec<f64> {
        self.0.borrow().scroll_requests.clone()
    }

    /// Locations passed to [`Dom::navigate`], oldest first.
    pub fn navigations(&self) -> Vec<String> {
        self.0.borrow().navigations.clone()
    }

    pub fn stylesheets(&self) -> Vec<String> {
        self.0.borrow().stylesheets.clone()
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.0.borrow().now
    }

    pub fn pending_timers(&self) -> usize {
        self.0.borrow().timers.len()
    }

    /// Make [`Timers::set_timeout`] reject every call while `failing` is set.
    pub fn fail_timers(&self, failing: bool) {
        self.0.borrow_mut().failing_timers = failing;
    }

    /// Make [`Dom::listen`] reject listeners for `kind`, or stop rejecting with [`None`].
    pub fn fail_listeners(&self, kind: Option<EventKind>) {
        self.0.borrow_mut().failing_listeners = kind;
    }

    /// Move the virtual clock forward, running every timer that falls due on the way, in due
    /// order. Timers scheduled by those callbacks run too if they fall inside the window.
    pub fn advance(&self, by: Duration) {
        let deadline = self.now() + by;

        loop {
            let callback = {
                let mut document = self.0.borrow_mut();
                let next = document
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.due <= deadline)
                    .min_by_key(|(_, timer)| (timer.due, timer.handle.0))
                    .map(|(index, _)| index);

                match next {
                    Some(index) => {
                        let timer = document.timers.remove(index);
                        document.now = timer.due;
                        timer.callback
                    }
                    None => break,
                }
            };

            callback();
        }

        self.0.borrow_mut().now = deadline;
    }

    /// Click on `node`. Disabled elements swallow the click, as in a browser. Returns whether a
    /// listener prevented the default action.
    pub fn click(&self, node: NodeId) -> bool {
        if self.is_disabled(node) {
            return false;
        }

        self.dispatch(Target::Node(node), EventKind::Click)
    }

    /// Submit `form`. Returns whether a listener prevented the default action.
    pub fn submit(&self, form: NodeId) -> bool {
        self.dispatch(Target::Node(form), EventKind::Submit)
    }

    /// Scroll the window to `y` and dispatch a scroll event.
    pub fn scroll_window(&self, y: f64) {
        self.0.borrow_mut().scroll_y = y;
        self.dispatch(Target::Window, EventKind::Scroll);
    }

    /// Report `node` entering or leaving the viewport to every observer watching it.
    pub fn intersect(&self, node: NodeId, is_intersecting: bool) {
        let callbacks = self
            .0
            .borrow()
            .observers
            .iter()
            .filter(|observer| observer.nodes.contains(&node))
            .map(|observer| Rc::clone(&observer.callback))
            .collect::<Vec<_>>();

        let entries = [Intersection {
            target: node,
            is_intersecting,
        }];
        for callback in callbacks {
            callback(&entries);
        }
    }

    /// Options of every registered intersection observer.
    pub fn observer_options(&self) -> Vec<ObserverOptions> {
        self.0
            .borrow()
            .observers
            .iter()
            .map(|observer| observer.options.clone())
            .collect()
    }

    /// Run the listeners on the propagation path of an event. Listeners are collected before any
    /// of them runs, so they are free to mutate the document.
    fn dispatch(&self, origin: Target<NodeId>, kind: EventKind) -> bool {
        let (target, listeners) = {
            let document = self.0.borrow();

            let (target, mut path) = match origin {
                Target::Node(node) => {
                    let ancestry = document.ancestry(node);
                    let connected = ancestry.last() == Some(&document.root);
                    let mut path = ancestry.into_iter().map(Target::Node).collect::<Vec<_>>();
                    if connected {
                        path.push(Target::Document);
                        path.push(Target::Window);
                    }
                    (Some(node), path)
                }
                Target::Document => (None, vec![Target::Document, Target::Window]),
                Target::Window => (None, vec![Target::Window]),
            };

            if !kind.bubbles() {
                path.truncate(1);
            }

            let listeners = path
                .iter()
                .flat_map(|step| {
                    document
                        .listeners
                        .iter()
                        .filter(move |(target, event, _)| target == step && *event == kind)
                        .map(|(_, _, listener)| Rc::clone(listener))
                })
                .collect::<Vec<_>>();

            (target, listeners)
        };

        let event = HeadlessEvent {
            target,
            default_prevented: Cell::new(false),
        };
        for listener in listeners {
            listener(&event);
        }

        event.default_prevented.get()
    }
}

impl Timers for HeadlessDom {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Result<TimerHandle> {
        let mut document = self.0.borrow_mut();
        if document.failing_timers {
            return Err(Error::Js("setTimeout rejected".to_string()));
        }

        let handle = TimerHandle(document.next_timer);
        document.next_timer += 1;

        let due = document.now + delay;
        document.timers.push(PendingTimer {
            handle,
            due,
            callback,
        });

        Ok(handle)
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        self.0
            .borrow_mut()
            .timers
            .retain(|timer| timer.handle != handle);
    }
}

impl Dom for HeadlessDom {
    type Node = NodeId;

    fn query(&self, selector: &str) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        let document = self.0.borrow();
        document.select(document.root, selector)
    }

    fn query_in(&self, scope: &NodeId, selector: &str) -> Option<NodeId> {
        self.0.borrow().select(*scope, selector).into_iter().next()
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let document = self.0.borrow();
        document
            .descendants(document.root)
            .into_iter()
            .find(|node| document.node(*node).attribute("id") == Some(id))
    }

    fn create_element(&self, tag: &str) -> Result<NodeId> {
        Ok(self.0.borrow_mut().create(tag))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<()> {
        self.0.borrow_mut().append(*parent, *child);
        Ok(())
    }

    fn remove(&self, node: &NodeId) {
        self.0.borrow_mut().detach(*node);
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.0.borrow().node(*node).parent
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        self.0.borrow().ancestry(*node).contains(ancestor)
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.0.borrow().node(*node).has_class(class)
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        let mut document = self.0.borrow_mut();
        let node = document.node_mut(*node);
        if !node.has_class(class) {
            node.classes.push(class.to_string());
        }
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        self.0
            .borrow_mut()
            .node_mut(*node)
            .classes
            .retain(|existing| existing != class);
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        let document = self.0.borrow();
        let node = document.node(*node);
        if name == "class" {
            return Some(node.classes.join(" "));
        }
        node.attribute(name).map(str::to_string)
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        let mut document = self.0.borrow_mut();
        let node = document.node_mut(*node);
        if name == "class" {
            node.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn text(&self, node: &NodeId) -> String {
        self.0.borrow().node(*node).text.clone()
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        self.0.borrow_mut().node_mut(*node).text = text.to_string();
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) {
        let mut document = self.0.borrow_mut();
        let style = &mut document.node_mut(*node).style;
        if value.is_empty() {
            style.remove(property);
        } else {
            style.insert(property.to_string(), value.to_string());
        }
    }

    fn value(&self, node: &NodeId) -> String {
        self.0.borrow().node(*node).value.clone()
    }

    fn set_value(&self, node: &NodeId, value: &str) {
        self.type_into(*node, value);
    }

    fn set_disabled(&self, node: &NodeId, disabled: bool) {
        self.0.borrow_mut().node_mut(*node).disabled = disabled;
    }

    fn offset_top(&self, node: &NodeId) -> f64 {
        self.0.borrow().node(*node).offset_top
    }

    fn offset_height(&self, node: &NodeId) -> f64 {
        self.0.borrow().node(*node).offset_height
    }

    fn scroll_y(&self) -> f64 {
        self.0.borrow().scroll_y
    }

    fn scroll_to(&self, top: f64) {
        let mut document = self.0.borrow_mut();
        document.scroll_requests.push(top);
        document.scroll_y = top;
    }

    fn navigate(&self, href: &str) {
        self.0.borrow_mut().navigations.push(href.to_string());
    }

    fn pathname(&self) -> String {
        self.0.borrow().pathname.clone()
    }

    fn inject_stylesheet(&self, css: &str) -> Result<()> {
        let head = self.head();
        let style = self.create_element("style")?;
        self.set_text(&style, css);
        self.append_child(&head, &style)?;

        self.0.borrow_mut().stylesheets.push(css.to_string());
        Ok(())
    }

    fn listen(
        &self,
        target: Target<NodeId>,
        kind: EventKind,
        listener: Listener<NodeId>,
    ) -> Result<()> {
        let mut document = self.0.borrow_mut();
        if document.failing_listeners == Some(kind) {
            return Err(Error::Js(format!("addEventListener rejected {}", String::from(kind))));
        }

        document.listeners.push((target, kind, listener));
        Ok(())
    }

    fn observe_intersections(
        &self,
        nodes: &[NodeId],
        options: &ObserverOptions,
        callback: IntersectionCallback<NodeId>,
    ) -> Result<()> {
        self.0.borrow_mut().observers.push(Observer {
            nodes: nodes.to_vec(),
            options: options.clone(),
            callback,
        });
        Ok(())
    }
}
