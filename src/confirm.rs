//! A button that pretends to do something slow: it shows an in-progress label, then a
//! confirmation, then goes back to how it was.

use std::{cell::Cell, rc::Rc, time::Duration};

use crate::{dom::Dom, timer::schedule};

/// Where a [`ConfirmationCycle`] is. Transitions only ever go `Idle → Pending → Confirmed → Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Confirmed,
}

/// Labels, styling and dwell times of one kind of simulated action.
#[derive(Debug, Clone, PartialEq)]
pub struct Flow {
    pub idle_label: &'static str,
    pub pending_label: &'static str,
    pub confirmed_label: &'static str,

    /// Inline styles applied while confirmed, and cleared when going back to idle.
    pub confirmed_style: &'static [(&'static str, &'static str)],

    pub pending_dwell: Duration,
    pub confirmed_dwell: Duration,
}

/// Drives one button through a [`Flow`].
pub struct ConfirmationCycle<D: Dom> {
    dom: D,
    button: D::Node,
    flow: Flow,
    phase: Cell<Phase>,

    /// Extra work to do on entering [`Phase::Confirmed`].
    on_confirmed: Option<Box<dyn Fn()>>,
}

impl<D: Dom> ConfirmationCycle<D> {
    pub fn new(dom: &D, button: &D::Node, flow: Flow) -> Rc<Self> {
        Rc::new(Self {
            dom: dom.clone(),
            button: button.clone(),
            flow,
            phase: Cell::new(Phase::Idle),
            on_confirmed: None,
        })
    }

    pub fn with_on_confirmed<F>(dom: &D, button: &D::Node, flow: Flow, on_confirmed: F) -> Rc<Self>
    where
        F: 'static + Fn(),
    {
        Rc::new(Self {
            dom: dom.clone(),
            button: button.clone(),
            flow,
            phase: Cell::new(Phase::Idle),
            on_confirmed: Some(Box::new(on_confirmed)),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    /// Begin the cycle. Ignored unless idle, so a cycle in flight cannot be restarted.
    pub fn start(self: &Rc<Self>) {
        if self.phase() != Phase::Idle {
            tracing::debug!(phase = ?self.phase(), "cycle already running");
            return;
        }

        self.enter(Phase::Pending);

        let cycle = Rc::clone(self);
        let scheduled = schedule(&self.dom, self.flow.pending_dwell, move || {
            cycle.enter(Phase::Confirmed);

            let done = Rc::clone(&cycle);
            let scheduled = schedule(&cycle.dom, cycle.flow.confirmed_dwell, move || {
                done.enter(Phase::Idle);
            });
            if scheduled.is_none() {
                cycle.enter(Phase::Idle);
            }
        });

        // Never leave the button disabled if the cycle cannot move on
        if scheduled.is_none() {
            self.enter(Phase::Idle);
        }
    }

    /// Apply the visual state of `phase`.
    fn enter(&self, phase: Phase) {
        let (dom, button, flow) = (&self.dom, &self.button, &self.flow);

        match phase {
            Phase::Pending => {
                dom.set_text(button, flow.pending_label);
                dom.set_disabled(button, true);
            }
            Phase::Confirmed => {
                dom.set_text(button, flow.confirmed_label);
                for (property, value) in flow.confirmed_style {
                    dom.set_style(button, property, value);
                }

                if let Some(on_confirmed) = &self.on_confirmed {
                    on_confirmed();
                }
            }
            Phase::Idle => {
                dom.set_text(button, flow.idle_label);
                for (property, _) in flow.confirmed_style {
                    dom.set_style(button, property, "");
                }
                dom.set_disabled(button, false);
            }
        }

        tracing::debug!(label = flow.idle_label, ?phase, "confirmation cycle");
        self.phase.set(phase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessDom;

    const FLOW: Flow = Flow {
        idle_label: "Go",
        pending_label: "Going...",
        confirmed_label: "Gone!",
        confirmed_style: &[("background", "green")],
        pending_dwell: Duration::from_millis(100),
        confirmed_dwell: Duration::from_millis(200),
    };

    #[test]
    fn walks_through_every_phase() {
        let dom = HeadlessDom::new();
        let button = dom.insert(dom.body(), "button", &[]);
        dom.set_text(&button, "Go");

        let confirmed = Rc::new(Cell::new(0));
        let cycle = ConfirmationCycle::with_on_confirmed(&dom, &button, FLOW, {
            let confirmed = Rc::clone(&confirmed);
            move || confirmed.set(confirmed.get() + 1)
        });

        cycle.start();
        assert_eq!(cycle.phase(), Phase::Pending);
        assert_eq!(dom.text(&button), "Going...");
        assert!(dom.is_disabled(button));

        dom.advance(Duration::from_millis(100));
        assert_eq!(cycle.phase(), Phase::Confirmed);
        assert_eq!(dom.text(&button), "Gone!");
        assert_eq!(dom.style(button, "background").as_deref(), Some("green"));
        assert_eq!(confirmed.get(), 1);

        dom.advance(Duration::from_millis(200));
        assert_eq!(cycle.phase(), Phase::Idle);
        assert_eq!(dom.text(&button), "Go");
        assert_eq!(dom.style(button, "background"), None);
        assert!(!dom.is_disabled(button));
    }

    #[test]
    fn restart_while_running_is_ignored() {
        let dom = HeadlessDom::new();
        let button = dom.insert(dom.body(), "button", &[]);
        let cycle = ConfirmationCycle::new(&dom, &button, FLOW);

        cycle.start();
        dom.advance(Duration::from_millis(50));
        cycle.start();
        dom.advance(Duration::from_millis(150));
        cycle.start();

        assert_eq!(cycle.phase(), Phase::Confirmed);
        assert_eq!(dom.pending_timers(), 1);

        dom.advance(Duration::from_millis(150));
        assert_eq!(cycle.phase(), Phase::Idle);
        assert_eq!(dom.pending_timers(), 0);
    }

    #[test]
    fn returns_to_idle_when_pending_timer_is_refused() {
        let dom = HeadlessDom::new();
        let button = dom.insert(dom.body(), "button", &[]);
        let cycle = ConfirmationCycle::new(&dom, &button, FLOW);

        dom.fail_timers(true);
        cycle.start();

        assert_eq!(cycle.phase(), Phase::Idle);
        assert_eq!(dom.text(&button), "Go");
        assert!(!dom.is_disabled(button));

        dom.fail_timers(false);
        cycle.start();
        assert_eq!(cycle.phase(), Phase::Pending);
    }

    #[test]
    fn returns_to_idle_when_confirmed_timer_is_refused() {
        let dom = HeadlessDom::new();
        let button = dom.insert(dom.body(), "button", &[]);
        let cycle = ConfirmationCycle::new(&dom, &button, FLOW);

        cycle.start();
        dom.fail_timers(true);
        dom.advance(Duration::from_millis(100));

        assert_eq!(cycle.phase(), Phase::Idle);
        assert_eq!(dom.text(&button), "Go");
        assert_eq!(dom.style(button, "background"), None);
        assert!(!dom.is_disabled(button));
        assert_eq!(dom.pending_timers(), 0);
    }
}
