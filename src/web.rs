use std::{rc::Rc, time::Duration};

use js_sys::{Array, Function};
use wasm_bindgen::{prelude::Closure, JsCast, JsValue};
use web_sys::{
    Document, Element, EventTarget, HtmlElement, HtmlInputElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, ScrollBehavior,
    ScrollToOptions, Window,
};

use crate::{
    dom::{
        Dom, Event, EventKind, Intersection, IntersectionCallback, Listener, ObserverOptions,
        Target,
    },
    error::{Error, Result},
    timer::{TimerHandle, Timers},
};

/// Wrapper so that a [`web_sys::Event`] can be handed to controllers.
struct WebEvent(web_sys::Event);

impl Event<Element> for WebEvent {
    fn target(&self) -> Option<Element> {
        self.0.target()?.dyn_into::<Element>().ok()
    }

    fn prevent_default(&self) {
        self.0.prevent_default();
    }
}

/// The live page, backed by the browser's [`Window`] and [`Document`].
#[derive(Clone)]
pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    /// Capture the global `window` and its `document`.
    pub fn from_window() -> Result<Self> {
        let window = web_sys::window().ok_or(Error::MissingGlobal("window"))?;
        let document = window.document().ok_or(Error::MissingGlobal("document"))?;

        Ok(Self { window, document })
    }

    /// Run `callback` once the markup has been parsed. Runs immediately if that has already
    /// happened, as is the case when the module is loaded with `defer` or at the end of `<body>`.
    pub fn when_ready<F>(&self, callback: F) -> Result<()>
    where
        F: 'static + Fn(&WebPage),
    {
        if self.document.ready_state() != "loading" {
            callback(self);
            return Ok(());
        }

        let page = self.clone();
        self.listen(
            Target::Document,
            EventKind::DomContentLoaded,
            Rc::new(move |_: &dyn Event<Element>| callback(&page)),
        )
    }

    fn event_target(&self, target: &Target<Element>) -> EventTarget {
        match target {
            Target::Window => self.window.clone().into(),
            Target::Document => self.document.clone().into(),
            Target::Node(element) => element.clone().into(),
        }
    }
}

/// Log a rejected call that the controllers have no way to recover from.
fn report(operation: &'static str, result: std::result::Result<impl Sized, JsValue>) {
    if let Err(error) = result {
        tracing::warn!(operation, error = %Error::from(error), "platform call failed");
    }
}

fn as_html(node: &Element) -> Option<&HtmlElement> {
    node.dyn_ref::<HtmlElement>()
}

impl Timers for WebPage {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Result<TimerHandle> {
        let closure: Function = Closure::once_into_js(move || callback()).unchecked_into();
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);

        let handle = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(&closure, millis)?;

        Ok(TimerHandle(handle))
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        self.window.clear_timeout_with_handle(handle.0);
    }
}

impl Dom for WebPage {
    type Node = Element;

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };

        (0..list.length())
            .filter_map(|index| list.get(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn query_in(&self, scope: &Element, selector: &str) -> Option<Element> {
        scope.query_selector(selector).ok().flatten()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn create_element(&self, tag: &str) -> Result<Element> {
        Ok(self.document.create_element(tag)?)
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<()> {
        parent.append_child(child)?;
        Ok(())
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        let node: &web_sys::Node = node;
        ancestor.contains(Some(node))
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &Element, class: &str) {
        report("add_class", node.class_list().add_1(class));
    }

    fn remove_class(&self, node: &Element, class: &str) {
        report("remove_class", node.class_list().remove_1(class));
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        report("set_attribute", node.set_attribute(name, value));
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        let Some(element) = as_html(node) else {
            return;
        };

        let style = element.style();
        if value.is_empty() {
            report("remove_property", style.remove_property(property));
        } else {
            report("set_property", style.set_property(property, value));
        }
    }

    fn value(&self, node: &Element) -> String {
        node.dyn_ref::<HtmlInputElement>()
            .map(HtmlInputElement::value)
            .unwrap_or_default()
    }

    fn set_value(&self, node: &Element, value: &str) {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        }
    }

    fn set_disabled(&self, node: &Element, disabled: bool) {
        if disabled {
            report("set_attribute", node.set_attribute("disabled", ""));
        } else {
            report("remove_attribute", node.remove_attribute("disabled"));
        }
    }

    fn offset_top(&self, node: &Element) -> f64 {
        as_html(node).map_or(0.0, |element| f64::from(element.offset_top()))
    }

    fn offset_height(&self, node: &Element) -> f64 {
        as_html(node).map_or(0.0, |element| f64::from(element.offset_height()))
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or_default()
    }

    fn scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);

        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn navigate(&self, href: &str) {
        report("navigate", self.window.location().set_href(href));
    }

    fn pathname(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    fn inject_stylesheet(&self, css: &str) -> Result<()> {
        let head = self.document.head().ok_or(Error::MissingGlobal("head"))?;

        let style = self.document.create_element("style")?;
        style.set_text_content(Some(css));
        head.append_child(&style)?;

        Ok(())
    }

    fn listen(
        &self,
        target: Target<Element>,
        kind: EventKind,
        listener: Listener<Element>,
    ) -> Result<()> {
        let closure: Function = Closure::<dyn Fn(web_sys::Event)>::new(move |event| {
            listener(&WebEvent(event));
        })
        .into_js_value()
        .unchecked_into();

        self.event_target(&target)
            .add_event_listener_with_callback(&String::from(kind), &closure)?;

        Ok(())
    }

    fn observe_intersections(
        &self,
        nodes: &[Element],
        options: &ObserverOptions,
        callback: IntersectionCallback<Element>,
    ) -> Result<()> {
        let closure: Function =
            Closure::<dyn Fn(Array, IntersectionObserver)>::new(move |entries: Array, _| {
                let entries = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| Intersection {
                        target: entry.target(),
                        is_intersecting: entry.is_intersecting(),
                    })
                    .collect::<Vec<_>>();

                callback(&entries);
            })
            .into_js_value()
            .unchecked_into();

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);

        let observer = IntersectionObserver::new_with_options(&closure, &init)?;
        for node in nodes {
            observer.observe(node);
        }

        Ok(())
    }
}
