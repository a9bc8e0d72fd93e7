pub mod active_link;
pub mod buttons;
pub mod config;
pub mod confirm;
pub mod dom;
pub mod error;
pub mod form_error;
pub mod header;
#[cfg(any(test, feature = "headless"))]
pub mod headless;
pub mod logging;
pub mod navigation;
pub mod newsletter;
pub mod reveal;
pub mod smooth_scroll;
pub mod styles;
pub mod timer;
pub mod validate;
pub mod web;

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::{
    config::Config,
    confirm::ConfirmationCycle,
    dom::Dom,
    error::Result,
    navigation::MobileNavigation,
    web::WebPage,
};

#[wasm_bindgen(start)]
pub fn main() -> std::result::Result<(), JsValue> {
    // Configure the panic hook to log to console.error
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    let config = Config::default();
    logging::init(&config);

    let page = WebPage::from_window()?;
    page.when_ready(move |page| {
        install(page, &config);
    })?;

    Ok(())
}

/// What [`install`] managed to wire up on the page.
pub struct Installed<D: Dom> {
    pub stylesheet: bool,
    pub navigation: Option<Rc<MobileNavigation<D>>>,
    pub newsletter: Option<Rc<ConfirmationCycle<D>>>,
    pub in_page_links: usize,
    pub revealed_on_scroll: usize,
    pub active_links: usize,
    pub primary_buttons: usize,
    pub header: bool,
}

/// Log a component that failed to install, and carry on with the others.
fn report<T: Default>(component: &'static str, result: Result<T>) -> T {
    result.unwrap_or_else(|error| {
        tracing::warn!(component, %error, "component not installed");
        T::default()
    })
}

/// Wire every controller to the document. Components whose markup is absent are skipped, and a
/// component failing to install does not stop the others. An invalid `config` is replaced by the
/// defaults.
pub fn install<D: Dom>(dom: &D, config: &Config) -> Installed<D> {
    let fallback;
    let config = match config.validate() {
        Ok(()) => config,
        Err(error) => {
            tracing::warn!(%error, "falling back to default configuration");
            fallback = Config::default();
            &fallback
        }
    };

    let installed = Installed {
        stylesheet: report("stylesheet", styles::install(dom).map(|()| true)),
        navigation: report("mobile navigation", MobileNavigation::install(dom)),
        in_page_links: report("smooth scrolling", smooth_scroll::install(dom)),
        newsletter: report("newsletter", newsletter::install(dom, &config.timings)),
        revealed_on_scroll: report("scroll reveal", reveal::install(dom, &config.reveal)),
        active_links: active_link::highlight(dom, &config.default_page),
        primary_buttons: report("primary buttons", buttons::install(dom, config)),
        header: report(
            "header styling",
            header::install(
                dom,
                config.header_scroll_threshold,
                config.timings.scroll_sample,
            ),
        ),
    };

    tracing::info!(
        stylesheet = installed.stylesheet,
        navigation = installed.navigation.is_some(),
        newsletter = installed.newsletter.is_some(),
        in_page_links = installed.in_page_links,
        revealed_on_scroll = installed.revealed_on_scroll,
        active_links = installed.active_links,
        primary_buttons = installed.primary_buttons,
        header = installed.header,
        "page interactivity installed"
    );

    installed
}
