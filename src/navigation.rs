use std::rc::Rc;

use crate::{
    dom::{Dom, Event, EventKind, Target},
    error::Result,
};

const NAV: &str = ".nav";
const MENU: &str = ".nav-menu";
const LINK_CLASS: &str = "nav-link";

/// Present on the menu while it is open.
pub const OPEN_CLASS: &str = "nav-menu-open";
pub const TOGGLE_CLASS: &str = "mobile-toggle";

const TOGGLE_LABEL: &str = "Toggle navigation menu";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Closed,
    Open,
}

impl NavState {
    /// Glyph shown on the toggle control.
    pub fn glyph(self) -> &'static str {
        match self {
            NavState::Closed => "☰",
            NavState::Open => "✕",
        }
    }

    fn flipped(self) -> Self {
        match self {
            NavState::Closed => NavState::Open,
            NavState::Open => NavState::Closed,
        }
    }
}

/// The collapsible menu shown on narrow screens. The open state lives on the menu element as
/// [`OPEN_CLASS`], so it is never out of sync with what is displayed.
pub struct MobileNavigation<D: Dom> {
    dom: D,
    nav: D::Node,
    menu: D::Node,
    toggle: D::Node,
}

impl<D: Dom> MobileNavigation<D> {
    /// Add the toggle control to the navigation bar and wire up its listeners. Returns [`None`]
    /// when the page has no navigation menu.
    pub fn install(dom: &D) -> Result<Option<Rc<Self>>> {
        let (Some(nav), Some(menu)) = (dom.query(NAV), dom.query(MENU)) else {
            tracing::debug!("no navigation menu, skipping mobile toggle");
            return Ok(None);
        };

        let toggle = dom.create_element("button")?;
        dom.add_class(&toggle, TOGGLE_CLASS);
        dom.set_attribute(&toggle, "aria-label", TOGGLE_LABEL);
        dom.set_text(&toggle, NavState::Closed.glyph());
        dom.append_child(&nav, &toggle)?;

        let navigation = Rc::new(Self {
            dom: dom.clone(),
            nav,
            menu,
            toggle,
        });

        dom.listen(Target::Node(navigation.toggle.clone()), EventKind::Click, {
            let navigation = Rc::clone(&navigation);
            Rc::new(move |_: &dyn Event<D::Node>| {
                navigation.toggle();
            })
        })?;

        // Any click landing outside the navigation bar closes the menu
        dom.listen(Target::Document, EventKind::Click, {
            let navigation = Rc::clone(&navigation);
            Rc::new(move |event: &dyn Event<D::Node>| {
                let inside = event
                    .target()
                    .is_some_and(|target| navigation.dom.contains(&navigation.nav, &target));

                if !inside {
                    navigation.close();
                }
            })
        })?;

        // Following a menu link closes the menu
        dom.listen(Target::Node(navigation.menu.clone()), EventKind::Click, {
            let navigation = Rc::clone(&navigation);
            Rc::new(move |event: &dyn Event<D::Node>| {
                let on_link = event
                    .target()
                    .is_some_and(|target| navigation.dom.has_class(&target, LINK_CLASS));

                if on_link {
                    navigation.close();
                }
            })
        })?;

        Ok(Some(navigation))
    }

    pub fn state(&self) -> NavState {
        if self.dom.has_class(&self.menu, OPEN_CLASS) {
            NavState::Open
        } else {
            NavState::Closed
        }
    }

    /// Flip between open and closed, returning the new state.
    pub fn toggle(&self) -> NavState {
        let next = self.state().flipped();
        self.apply(next);
        next
    }

    pub fn close(&self) {
        self.apply(NavState::Closed);
    }

    fn apply(&self, state: NavState) {
        match state {
            NavState::Open => self.dom.add_class(&self.menu, OPEN_CLASS),
            NavState::Closed => self.dom.remove_class(&self.menu, OPEN_CLASS),
        }

        self.dom.set_text(&self.toggle, state.glyph());
    }

    pub fn toggle_control(&self) -> &D::Node {
        &self.toggle
    }
}
