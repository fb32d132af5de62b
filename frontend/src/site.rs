//! Wires every component to the live document.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use log::{debug, error, info, warn};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Window};

use crate::config::{Settings, SETTINGS_ELEMENT_ID};
use crate::contact::{ContactForm, FieldControls, SubmitStart};
use crate::counter::{self, Counter, CounterAnimation, CounterFrame, Latch};
use crate::dom::UiNode;
use crate::error::SiteError;
use crate::facets::FacetCard;
use crate::nav::{NavElements, Navigation};
use crate::reveal::{self, ObserverOptions};
use crate::sender::{FormSender, HttpSender, SimulatedSender};
use crate::throttle::{Debounce, Throttle};
use crate::validation::Field;
use crate::web::{self, WebNode};

const NAVBAR: &str = ".navbar";
const MENU_TOGGLE: &str = ".nav-toggle";
const NAV_MENU: &str = ".nav-menu";
const NAV_LINK: &str = ".nav-link";
const SECTION: &str = "section[id]";
const BACK_TO_TOP: &str = ".back-to-top";
const REVEAL: &str = ".animate-on-scroll";
const STATS_SECTION: &str = ".stats-section";
const COUNTER: &str = ".stat-number";
const FACET: &str = ".info-facet";
const FACET_BUTTON: &str = ".facet-expand-btn";
const FACET_HEADER: &str = ".facet-header";
const FACET_CONTENT: &str = ".facet-expandable-content";
const CONTACT_FORM_ID: &str = "contactForm";
const FORM_STATUS_ID: &str = "formStatus";
const SUBMIT_BUTTON: &str = "button[type=\"submit\"]";

/// Runs [`init`] once the document has been parsed.
pub fn boot() {
    let document = match web::document() {
        Ok(document) => document,
        Err(e) => {
            error!("Cannot start: {}", e);
            return;
        }
    };
    if document.ready_state() == "loading" {
        if let Err(e) = web::listen(&document, "DOMContentLoaded", |_| run()) {
            error!("Could not wait for DOMContentLoaded: {}", e);
        }
    } else {
        run();
    }
}

fn run() {
    match init() {
        Ok(()) => info!("Lays Holdings website initialized successfully"),
        Err(e) => error!("Website initialization failed: {}", e),
    }
}

/// Subscribes every handler and derives the initial page state.
pub fn init() -> Result<(), SiteError> {
    let window = web::window()?;
    let document = web::document()?;
    let settings = load_settings(&document);

    init_navigation(&window, &document, &settings)?;
    init_reveal(&window, &document, &settings)?;
    init_counters(&document, &settings)?;
    init_facets(&document)?;
    init_contact_form(&document, &settings)?;
    Ok(())
}

fn load_settings(document: &Document) -> Settings {
    let Some(node) = web::by_id(document, SETTINGS_ELEMENT_ID) else {
        return Settings::default();
    };
    match Settings::from_json(&node.text()) {
        Ok(settings) => {
            debug!("Loaded settings overrides: {:?}", settings);
            settings
        }
        Err(e) => {
            warn!("Ignoring settings overrides: {}", e);
            Settings::default()
        }
    }
}

fn init_navigation(window: &Window, document: &Document, settings: &Settings) -> Result<(), SiteError> {
    let Some(navbar) = web::query(document, NAVBAR) else {
        debug!("No navbar on this page; scroll reactor disabled");
        return Ok(());
    };
    let toggle = web::query(document, MENU_TOGGLE);
    let back_to_top = web::query(document, BACK_TO_TOP);
    let nav = Rc::new(RefCell::new(Navigation::new(
        NavElements {
            navbar,
            toggle: toggle.clone(),
            menu: web::query(document, NAV_MENU),
            links: web::query_all(document, NAV_LINK),
            sections: web::query_all(document, SECTION),
            back_to_top: back_to_top.clone(),
        },
        settings.clone(),
    )));
    nav.borrow_mut().on_scroll(web::scroll_y(window));

    {
        let nav = nav.clone();
        let throttle = Rc::new(RefCell::new(Throttle::new()));
        let scroll_window = window.clone();
        let delay = settings.scroll_throttle_ms;
        web::listen(window, "scroll", move |_| {
            if !throttle.borrow_mut().offer(web::scroll_y(&scroll_window)) {
                return;
            }
            let throttle = throttle.clone();
            let nav = nav.clone();
            web::after(delay, move || {
                let latest = throttle.borrow_mut().fire();
                if let Some(scroll_y) = latest {
                    nav.borrow_mut().on_scroll(scroll_y);
                }
            });
        })?;
    }

    {
        let nav = nav.clone();
        let debounce = Rc::new(RefCell::new(Debounce::new()));
        let resize_window = window.clone();
        let delay = settings.resize_debounce_ms;
        web::listen(window, "resize", move |_| {
            let ticket = debounce.borrow_mut().offer(web::viewport(&resize_window).width);
            let debounce = debounce.clone();
            let nav = nav.clone();
            web::after(delay, move || {
                let latest = debounce.borrow_mut().fire(ticket);
                if let Some(width) = latest {
                    nav.borrow_mut().on_resize(width);
                }
            });
        })?;
    }

    if let Some(toggle) = toggle {
        let nav = nav.clone();
        web::listen(toggle.element(), "click", move |_| nav.borrow_mut().toggle_menu())?;
    }

    let links = nav.borrow().links().to_vec();
    for link in links {
        let nav = nav.clone();
        let link_window = window.clone();
        let target = link.clone();
        web::listen(link.element(), "click", move |event| {
            let offset = nav.borrow_mut().select_link(&target);
            if let Some(top) = offset {
                event.prevent_default();
                web::smooth_scroll_to(&link_window, top);
            }
        })?;
    }

    {
        let nav = nav.clone();
        web::listen(document, "click", move |event| {
            if let Some(target) = WebNode::from_event(&event) {
                nav.borrow_mut().on_document_click(&target);
            }
        })?;
    }

    if let Some(button) = back_to_top {
        let top_window = window.clone();
        web::listen(button.element(), "click", move |event| {
            event.prevent_default();
            web::smooth_scroll_to(&top_window, 0.0);
        })?;
    }

    debug!("Navigation wired");
    Ok(())
}

fn init_reveal(window: &Window, document: &Document, settings: &Settings) -> Result<(), SiteError> {
    let nodes = web::query_all(document, REVEAL);
    let total = nodes.len();
    let pending = reveal::baseline(nodes, &web::viewport(window));
    debug!("{} of {} entry animations deferred until visible", pending.len(), total);
    if pending.is_empty() {
        return Ok(());
    }

    let observer = web::intersection_observer(&ObserverOptions::for_reveal(settings), |entry, observer| {
        let node = WebNode::new(entry.target());
        if reveal::on_intersection(&node, entry.is_intersecting()) {
            observer.unobserve(node.element());
        }
    })?;
    for node in &pending {
        observer.observe(node.element());
    }
    Ok(())
}

fn init_counters(document: &Document, settings: &Settings) -> Result<(), SiteError> {
    for section in web::query_all(document, STATS_SECTION) {
        observe_stats_section(section, settings)?;
    }
    Ok(())
}

/// Each stats section counts up once, with its own latch.
fn observe_stats_section(section: WebNode, settings: &Settings) -> Result<(), SiteError> {
    let counters: Vec<Counter<WebNode>> = section
        .query_all(COUNTER)
        .into_iter()
        .filter_map(Counter::from_node)
        .collect();
    if counters.is_empty() {
        return Ok(());
    }

    let mut latch = Latch::default();
    let mut counters = Some(counters);
    let animation_settings = settings.clone();
    let threshold = settings.counter_threshold;
    let observer = web::intersection_observer(&ObserverOptions::for_counters(settings), move |entry, observer| {
        let visible = counter::is_visible_enough(entry.is_intersecting(), entry.intersection_ratio(), threshold);
        if !visible || !latch.try_fire() {
            return;
        }
        observer.disconnect();
        for counter in counters.take().into_iter().flatten() {
            let mut animation = CounterAnimation::new(counter.target, &animation_settings);
            let started = web::animate_frames(move || {
                let frame = animation.tick();
                counter.render(frame);
                matches!(frame, CounterFrame::Running(_))
            });
            if let Err(e) = started {
                error!("Counter animation could not start: {}", e);
            }
        }
    })?;
    observer.observe(section.element());
    Ok(())
}

fn init_facets(document: &Document) -> Result<(), SiteError> {
    for card in web::query_all(document, FACET) {
        let (Some(button), Some(_)) = (card.query(FACET_BUTTON), card.query(FACET_CONTENT)) else {
            continue;
        };
        let header = card.query(FACET_HEADER);
        let facet = FacetCard::new(card.clone(), button, header);
        web::listen(card.element(), "click", move |event| {
            if let Some(target) = WebNode::from_event(&event) {
                facet.on_click(&target);
            }
        })?;
    }
    Ok(())
}

fn init_contact_form(document: &Document, settings: &Settings) -> Result<(), SiteError> {
    let Some(form_node) = web::by_id(document, CONTACT_FORM_ID) else {
        debug!("No contact form on this page");
        return Ok(());
    };

    let mut fields = BTreeMap::new();
    for field in Field::ALL {
        if let Some(input) = form_node.query(&format!("#{}", field.id())) {
            let error = web::by_id(document, &format!("{}Error", field.id()));
            fields.insert(field, FieldControls { input, error });
        }
    }
    let inputs: Vec<(Field, WebNode)> = fields
        .iter()
        .map(|(field, controls)| (*field, controls.input.clone()))
        .collect();
    let submit_button = form_node
        .query(SUBMIT_BUTTON)
        .ok_or_else(|| SiteError::MissingElement(SUBMIT_BUTTON.to_string()))?;
    let status = web::by_id(document, FORM_STATUS_ID);

    let sender: Rc<dyn FormSender> = match form_node.attribute("data-endpoint") {
        Some(endpoint) => Rc::new(HttpSender { url: Settings::endpoint_url(&endpoint) }),
        None => Rc::new(SimulatedSender { delay_ms: settings.simulated_send_ms }),
    };
    let form = Rc::new(RefCell::new(ContactForm::new(fields, submit_button, status)));
    let hide_ms = settings.status_hide_ms;

    {
        let form = form.clone();
        web::listen(form_node.element(), "submit", move |event| {
            event.prevent_default();
            let start = form.borrow_mut().begin_submit();
            match start {
                SubmitStart::Busy => {}
                SubmitStart::Invalid { status, .. } => hide_status_later(&form, status, hide_ms),
                SubmitStart::Ready(fields) => {
                    let form = form.clone();
                    let sender = sender.clone();
                    spawn_local(async move {
                        let result = sender.send(&fields).await;
                        let status = form.borrow_mut().finish_submit(result);
                        hide_status_later(&form, status, hide_ms);
                    });
                }
            }
        })?;
    }

    for (field, input) in inputs {
        let blur_form = form.clone();
        web::listen(input.element(), "blur", move |_| {
            blur_form.borrow_mut().on_blur(field);
        })?;
        let input_form = form.clone();
        web::listen(input.element(), "input", move |_| input_form.borrow_mut().on_input(field))?;
    }

    debug!("Contact form wired");
    Ok(())
}

fn hide_status_later(form: &Rc<RefCell<ContactForm<WebNode>>>, generation: u64, delay_ms: u32) {
    let form = form.clone();
    web::after(delay_ms, move || {
        form.borrow_mut().hide_status(generation);
    });
}
