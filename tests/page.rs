use std::time::Duration;

use showcase::{
    config::Config,
    dom::{Dom, EventKind, ObserverOptions},
    headless::{HeadlessDom, NodeId},
    install,
    navigation::NavState,
};

struct Landing {
    dom: HeadlessDom,
    header: NodeId,
    nav_links: Vec<NodeId>,
    services_link: NodeId,
    services: NodeId,
    cards: Vec<NodeId>,
    hero: NodeId,
    cta: NodeId,
    newsletter: NodeId,
    email: NodeId,
    subscribe: NodeId,
}

/// A landing page shaped like the site's `index.html`.
fn landing() -> Landing {
    let dom = HeadlessDom::new();
    let body = dom.body();

    let header = dom.insert(body, "header", &[("class", "header")]);
    dom.set_layout(header, 0.0, 72.0);
    let nav = dom.insert(header, "nav", &[("class", "nav")]);
    let menu = dom.insert(nav, "ul", &[("class", "nav-menu")]);
    let nav_links = ["index.html", "about.html", "insights.html"]
        .into_iter()
        .map(|href| {
            let item = dom.insert(menu, "li", &[]);
            dom.insert(item, "a", &[("class", "nav-link"), ("href", href)])
        })
        .collect();

    let hero_section = dom.insert(body, "section", &[("class", "hero")]);
    let hero = dom.insert(hero_section, "button", &[("class", "hero-button")]);
    let services_link = dom.insert(hero_section, "a", &[("href", "#services")]);

    let services = dom.insert(
        body,
        "section",
        &[("id", "services"), ("class", "data-engineering")],
    );
    dom.set_layout(services, 800.0, 600.0);
    let cards = (0..3)
        .map(|_| dom.insert(services, "div", &[("class", "service-card")]))
        .collect();

    let cta_section = dom.insert(body, "section", &[("class", "cta")]);
    let cta = dom.insert(cta_section, "button", &[("class", "cta-button")]);
    dom.set_text(&cta, "Schedule a Consultation");

    let footer = dom.insert(body, "footer", &[]);
    let newsletter = dom.insert(footer, "form", &[("class", "newsletter-form")]);
    let email = dom.insert(
        newsletter,
        "input",
        &[("class", "newsletter-input"), ("type", "email")],
    );
    let subscribe = dom.insert(newsletter, "button", &[("class", "newsletter-button")]);
    dom.set_text(&subscribe, "Subscribe");

    dom.set_pathname("/");

    Landing {
        dom,
        header,
        nav_links,
        services_link,
        services,
        cards,
        hero,
        cta,
        newsletter,
        email,
        subscribe,
    }
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn wires_every_component() {
    let page = landing();
    let installed = install(&page.dom, &Config::default());

    assert!(installed.stylesheet);
    assert!(installed.navigation.is_some());
    assert!(installed.newsletter.is_some());
    assert!(installed.header);
    assert_eq!(installed.in_page_links, 1);
    assert_eq!(installed.revealed_on_scroll, 3);
    assert_eq!(installed.active_links, 1);
    assert_eq!(installed.primary_buttons, 2);

    assert!(page.dom.has_class(&page.nav_links[0], "active"));
    assert!(!page.dom.has_class(&page.nav_links[1], "active"));
    assert_eq!(page.dom.stylesheets().len(), 1);
}

#[test]
fn bare_page_is_left_alone() {
    let dom = HeadlessDom::new();
    let installed = install(&dom, &Config::default());

    assert!(installed.navigation.is_none());
    assert!(installed.newsletter.is_none());
    assert!(!installed.header);
    assert_eq!(installed.in_page_links, 0);
    assert_eq!(installed.revealed_on_scroll, 0);
    assert_eq!(installed.primary_buttons, 0);

    // Nothing is listening, so nothing breaks either
    dom.click(dom.body());
    dom.scroll_window(400.0);
    dom.advance(ms(5000));
}

#[test]
fn menu_link_closes_menu_and_highlighting_is_stable() {
    let page = landing();
    let installed = install(&page.dom, &Config::default());
    let navigation = installed.navigation.unwrap();

    page.dom.click(*navigation.toggle_control());
    assert_eq!(navigation.state(), NavState::Open);

    page.dom.click(page.nav_links[1]);
    assert_eq!(navigation.state(), NavState::Closed);

    navigation.toggle();
    page.dom.click(page.cards[0]);
    assert_eq!(navigation.state(), NavState::Closed);
}

#[test]
fn anchors_and_hero_scroll_below_header() {
    let page = landing();
    install(&page.dom, &Config::default());

    assert!(page.dom.click(page.services_link));
    page.dom.click(page.hero);

    assert_eq!(page.dom.scroll_requests(), vec![728.0, 728.0]);
    assert!(page.dom.navigations().is_empty());
    assert_eq!(page.dom.offset_top(&page.services), 800.0);
}

#[test]
fn scrolling_styles_header_and_reveals_cards() {
    let page = landing();
    install(&page.dom, &Config::default());

    page.dom.scroll_window(300.0);
    assert!(page.dom.has_class(&page.header, "header-scrolled"));

    page.dom.intersect(page.cards[1], true);
    page.dom.intersect(page.cards[1], false);
    page.dom.intersect(page.cards[1], true);
    assert_eq!(page.dom.classes(page.cards[1]), vec!["service-card", "animate-in"]);
    assert!(!page.dom.has_class(&page.cards[0], "animate-in"));

    page.dom.advance(ms(100));
    page.dom.scroll_window(0.0);
    assert!(!page.dom.has_class(&page.header, "header-scrolled"));
}

#[test]
fn newsletter_and_consultation_run_independently() {
    let page = landing();
    install(&page.dom, &Config::default());

    page.dom.type_into(page.email, "not-an-email");
    page.dom.submit(page.newsletter);
    assert_eq!(page.dom.query_all(".error-message").len(), 1);

    page.dom.click(page.cta);
    page.dom.advance(ms(1000));
    assert_eq!(page.dom.text(&page.cta), "Request Sent!");

    page.dom.type_into(page.email, "a@b.co");
    page.dom.submit(page.newsletter);
    assert_eq!(page.dom.text(&page.subscribe), "Subscribing...");

    page.dom.advance(ms(2000));
    assert!(page.dom.query_all(".error-message").is_empty());
    assert_eq!(page.dom.text(&page.subscribe), "Subscribed!");

    page.dom.advance(ms(2000));
    assert_eq!(page.dom.text(&page.subscribe), "Subscribe");
    assert_eq!(page.dom.text(&page.cta), "Schedule a Consultation");
    assert_eq!(page.dom.pending_timers(), 0);
}

#[test]
fn failing_component_does_not_stop_the_others() {
    let page = landing();
    page.dom.fail_listeners(Some(EventKind::Submit));

    let installed = install(&page.dom, &Config::default());

    assert!(installed.newsletter.is_none());
    assert!(installed.stylesheet);
    assert!(installed.navigation.is_some());
    assert!(installed.header);
    assert_eq!(installed.in_page_links, 1);
    assert_eq!(installed.revealed_on_scroll, 3);
    assert_eq!(installed.primary_buttons, 2);

    page.dom.type_into(page.email, "a@b.co");
    assert!(!page.dom.submit(page.newsletter));
    assert_eq!(page.dom.text(&page.subscribe), "Subscribe");

    page.dom.click(page.cta);
    assert_eq!(page.dom.text(&page.cta), "Scheduling...");
}

#[test]
fn invalid_config_falls_back_to_defaults() {
    let page = landing();
    let mut config = Config::default();
    config.reveal.threshold = 2.0;
    config.header_scroll_threshold = 5000.0;

    install(&page.dom, &config);

    assert_eq!(page.dom.observer_options(), vec![ObserverOptions::default()]);
    page.dom.scroll_window(300.0);
    assert!(page.dom.has_class(&page.header, "header-scrolled"));
}
