use std::{rc::Rc, time::Duration};

use crate::{
    config::Timings,
    confirm::{ConfirmationCycle, Flow},
    dom::{Dom, Event, EventKind, Target},
    error::Result,
    form_error,
    validate::{self, is_valid_email},
};

const FORM: &str = ".newsletter-form";
const INPUT: &str = ".newsletter-input";
const BUTTON: &str = ".newsletter-button";

pub const INVALID_EMAIL: &str = "Please enter a valid email address";

/// Labels and timing of the fake subscription.
pub fn subscribe_flow(timings: &Timings) -> Flow {
    Flow {
        idle_label: "Subscribe",
        pending_label: "Subscribing...",
        confirmed_label: "Subscribed!",
        confirmed_style: &[("background", "#10b981")],
        pending_dwell: timings.subscribe_pending,
        confirmed_dwell: timings.subscribe_confirmed,
    }
}

/// Take over the newsletter form: nothing is sent anywhere, a valid address just plays the
/// subscription animation, and an invalid one shows an inline error. Returns the cycle driving
/// the submit button, or [`None`] if the page has no complete newsletter form.
pub fn install<D: Dom>(dom: &D, timings: &Timings) -> Result<Option<Rc<ConfirmationCycle<D>>>> {
    let Some(form) = dom.query(FORM) else {
        tracing::debug!("no newsletter form");
        return Ok(None);
    };
    let (Some(input), Some(button)) = (dom.query_in(&form, INPUT), dom.query_in(&form, BUTTON))
    else {
        tracing::debug!("newsletter form is missing its input or button");
        return Ok(None);
    };

    let cycle = ConfirmationCycle::with_on_confirmed(dom, &button, subscribe_flow(timings), {
        let dom = dom.clone();
        let input = input.clone();
        move || dom.set_value(&input, "")
    });

    let error_linger: Duration = timings.form_error;
    dom.listen(Target::Node(form), EventKind::Submit, {
        let dom = dom.clone();
        let cycle = Rc::clone(&cycle);

        Rc::new(move |event: &dyn Event<D::Node>| {
            event.prevent_default();

            let email = dom.value(&input);
            if is_valid_email(validate::trim(&email)) {
                cycle.start();
            } else if let Err(error) = form_error::show(&dom, &input, INVALID_EMAIL, error_linger) {
                tracing::warn!(%error, "unable to show form error");
            }
        })
    })?;

    Ok(Some(cycle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        confirm::Phase,
        headless::{HeadlessDom, NodeId},
    };

    struct Form {
        dom: HeadlessDom,
        form: NodeId,
        input: NodeId,
        button: NodeId,
    }

    fn form() -> Form {
        let dom = HeadlessDom::new();
        let footer = dom.insert(dom.body(), "footer", &[]);
        let form = dom.insert(footer, "form", &[("class", "newsletter-form")]);
        let input = dom.insert(form, "input", &[("class", "newsletter-input")]);
        let button = dom.insert(form, "button", &[("class", "newsletter-button")]);
        dom.set_text(&button, "Subscribe");

        Form {
            dom,
            form,
            input,
            button,
        }
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn valid_address_plays_subscription() {
        let Form {
            dom,
            form,
            input,
            button,
        } = form();
        let cycle = install(&dom, &Timings::default()).unwrap().unwrap();

        dom.type_into(input, "  a@b.co ");
        assert!(dom.submit(form));

        assert_eq!(cycle.phase(), Phase::Pending);
        assert_eq!(dom.text(&button), "Subscribing...");
        assert!(dom.is_disabled(button));

        dom.advance(ms(1000));
        assert_eq!(dom.text(&button), "Subscribed!");
        assert_eq!(dom.style(button, "background").as_deref(), Some("#10b981"));
        assert_eq!(dom.value(&input), "");

        dom.advance(ms(2000));
        assert_eq!(dom.text(&button), "Subscribe");
        assert_eq!(dom.style(button, "background"), None);
        assert!(!dom.is_disabled(button));
        assert!(dom.query(".error-message").is_none());
    }

    #[test]
    fn invalid_address_shows_one_transient_error() {
        let Form {
            dom, form, input, ..
        } = form();
        let cycle = install(&dom, &Timings::default()).unwrap().unwrap();

        dom.type_into(input, "not-an-email");
        dom.submit(form);
        dom.advance(ms(500));
        dom.submit(form);

        let errors = dom.query_all(".error-message");
        assert_eq!(errors.len(), 1);
        assert_eq!(dom.text(&errors[0]), INVALID_EMAIL);
        assert_eq!(cycle.phase(), Phase::Idle);
        assert_eq!(dom.value(&input), "not-an-email");

        dom.advance(ms(3000));
        assert!(dom.query_all(".error-message").is_empty());
        assert_eq!(dom.style(input, "border-color"), None);
    }

    #[test]
    fn resubmitting_while_pending_is_ignored() {
        let Form {
            dom,
            form,
            input,
            button,
        } = form();
        install(&dom, &Timings::default()).unwrap();

        dom.type_into(input, "user@example.com");
        dom.submit(form);
        dom.advance(ms(500));
        dom.submit(form);
        dom.advance(ms(500));

        assert_eq!(dom.text(&button), "Subscribed!");
        dom.advance(ms(2000));
        assert_eq!(dom.text(&button), "Subscribe");
        assert_eq!(dom.pending_timers(), 0);
    }

    #[test]
    fn pasted_byte_order_mark_is_trimmed() {
        let Form {
            dom,
            form,
            input,
            button,
        } = form();
        install(&dom, &Timings::default()).unwrap();

        dom.type_into(input, "\u{feff}user@example.com");
        dom.submit(form);

        assert_eq!(dom.text(&button), "Subscribing...");
        assert!(dom.query(".error-message").is_none());
    }

    #[test]
    fn skipped_without_form() {
        let dom = HeadlessDom::new();
        assert!(install(&dom, &Timings::default()).unwrap().is_none());
    }
}
