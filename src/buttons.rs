use std::rc::Rc;

use crate::{
    config::{Config, Timings},
    confirm::{ConfirmationCycle, Flow},
    dom::{Dom, Event, EventKind, Target},
    error::Result,
    smooth_scroll::scroll_to_element,
    timer::schedule,
};

const PRIMARY_BUTTONS: &str = ".hero-button, .cta-button";
const HERO_CLASS: &str = "hero-button";

/// Sections the hero button leads to, most specific first.
const HERO_TARGETS: [&str; 2] = [".data-engineering", ".about-content"];

const PRESSED: &str = "scale(0.95)";

/// Labels and timing of the fake consultation request.
pub fn schedule_flow(timings: &Timings) -> Flow {
    Flow {
        idle_label: "Schedule a Consultation",
        pending_label: "Scheduling...",
        confirmed_label: "Request Sent!",
        confirmed_style: &[
            ("background", "rgba(16, 185, 129, 0.3)"),
            ("border-color", "rgba(16, 185, 129, 0.5)"),
        ],
        pending_dwell: timings.schedule_pending,
        confirmed_dwell: timings.schedule_confirmed,
    }
}

/// What a primary button does once pressed.
enum Role<D: Dom> {
    /// Lead the visitor further into the site.
    Hero,

    /// Pretend to book a consultation.
    CallToAction(Rc<ConfirmationCycle<D>>),
}

/// Wire up press feedback and the role specific behaviour of every primary button. Returns how
/// many buttons were found.
pub fn install<D: Dom>(dom: &D, config: &Config) -> Result<usize> {
    let buttons = dom.query_all(PRIMARY_BUTTONS);
    let fallback_page = Rc::<str>::from(config.fallback_page.as_str());
    let press_feedback = config.timings.press_feedback;

    for button in &buttons {
        let role = if dom.has_class(button, HERO_CLASS) {
            Role::Hero
        } else {
            Role::CallToAction(ConfirmationCycle::new(
                dom,
                button,
                schedule_flow(&config.timings),
            ))
        };

        dom.listen(Target::Node(button.clone()), EventKind::Click, {
            let dom = dom.clone();
            let button = button.clone();
            let fallback_page = Rc::clone(&fallback_page);

            Rc::new(move |_: &dyn Event<D::Node>| {
                dom.set_style(&button, "transform", PRESSED);
                schedule(&dom, press_feedback, {
                    let dom = dom.clone();
                    let button = button.clone();
                    move || dom.set_style(&button, "transform", "")
                });

                match &role {
                    Role::Hero => lead_on(&dom, &fallback_page),
                    Role::CallToAction(cycle) => cycle.start(),
                }
            })
        })?;
    }

    Ok(buttons.len())
}

/// Scroll to the hero target on this page, or go to `fallback_page` if there is none.
fn lead_on<D: Dom>(dom: &D, fallback_page: &str) {
    match HERO_TARGETS.iter().find_map(|selector| dom.query(selector)) {
        Some(section) => scroll_to_element(dom, &section),
        None => {
            tracing::debug!(fallback_page, "no section to scroll to, navigating");
            dom.navigate(fallback_page);
        }
    }
}
