use log::debug;

use crate::config::Settings;
use crate::dom::UiNode;

/// Flags derived from the scroll offset alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollFlags {
    pub is_scrolled: bool,
    pub show_back_to_top: bool,
}

impl ScrollFlags {
    pub fn from_offset(scroll_y: f64, settings: &Settings) -> Self {
        Self {
            is_scrolled: scroll_y > settings.scrolled_offset,
            show_back_to_top: scroll_y > settings.back_to_top_offset,
        }
    }
}

/// Vertical extent of a page section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSpan {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

/// The last section, in document order, whose lead-shifted span holds `scroll_y`.
pub fn active_section(sections: &[SectionSpan], scroll_y: f64, lead: f64) -> Option<&str> {
    sections
        .iter()
        .filter(|section| {
            let start = section.top - lead;
            scroll_y >= start && scroll_y < start + section.height
        })
        .last()
        .map(|section| section.id.as_str())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavState {
    pub is_menu_open: bool,
    pub active_section: Option<String>,
}

/// Elements the reactor drives. Only the navbar is mandatory.
pub struct NavElements<N> {
    pub navbar: N,
    pub toggle: Option<N>,
    pub menu: Option<N>,
    pub links: Vec<N>,
    pub sections: Vec<N>,
    pub back_to_top: Option<N>,
}

pub struct Navigation<N: UiNode> {
    elements: NavElements<N>,
    settings: Settings,
    state: NavState,
}

impl<N: UiNode> Navigation<N> {
    pub fn new(elements: NavElements<N>, settings: Settings) -> Self {
        Self {
            elements,
            settings,
            state: NavState::default(),
        }
    }

    pub fn is_menu_open(&self) -> bool {
        self.state.is_menu_open
    }

    pub fn links(&self) -> &[N] {
        &self.elements.links
    }

    /// Recomputes every scroll-derived flag and reflects it on the page.
    pub fn on_scroll(&mut self, scroll_y: f64) {
        let flags = ScrollFlags::from_offset(scroll_y, &self.settings);
        self.elements.navbar.set_class("scrolled", flags.is_scrolled);
        if let Some(button) = &self.elements.back_to_top {
            button.set_class("visible", flags.show_back_to_top);
        }

        let spans = self.section_spans();
        let current = active_section(&spans, scroll_y, self.settings.section_lead).map(str::to_string);
        // No match keeps the previous highlight.
        if let Some(id) = current {
            if self.state.active_section.as_deref() != Some(id.as_str()) {
                debug!("Active section is now {}", id);
                self.state.active_section = Some(id);
            }
        }
        self.highlight_active_link();
    }

    pub fn toggle_menu(&mut self) {
        self.set_menu_open(!self.state.is_menu_open);
    }

    pub fn close_menu(&mut self) {
        if self.state.is_menu_open {
            self.set_menu_open(false);
        }
    }

    /// A nav link was activated. Closes the menu and returns the offset to
    /// smooth-scroll to, if the link points at a section on this page.
    pub fn select_link(&mut self, link: &N) -> Option<f64> {
        self.close_menu();
        let target = link.attribute("href")?;
        let id = target.strip_prefix('#')?;
        let section = self
            .elements
            .sections
            .iter()
            .find(|section| section.id().as_deref() == Some(id))?;
        Some((section.offset_top() - self.settings.header_offset).max(0.0))
    }

    /// Any click on the document. Closes an open menu unless the click landed
    /// inside the menu or on the toggle.
    pub fn on_document_click(&mut self, target: &N) {
        if !self.state.is_menu_open {
            return;
        }
        let inside_menu = self.elements.menu.as_ref().map_or(false, |menu| menu.contains(target));
        let on_toggle = self.elements.toggle.as_ref().map_or(false, |toggle| toggle.contains(target));
        if !inside_menu && !on_toggle {
            self.set_menu_open(false);
        }
    }

    /// Debounced resize. Widening past the breakpoint closes the mobile menu.
    pub fn on_resize(&mut self, viewport_width: f64) {
        if viewport_width > self.settings.menu_breakpoint {
            self.close_menu();
        }
    }

    fn set_menu_open(&mut self, open: bool) {
        self.state.is_menu_open = open;
        if let Some(menu) = &self.elements.menu {
            menu.set_class("active", open);
        }
        if let Some(toggle) = &self.elements.toggle {
            toggle.set_class("active", open);
            toggle.set_attribute("aria-expanded", if open { "true" } else { "false" });
        }
    }

    fn section_spans(&self) -> Vec<SectionSpan> {
        self.elements
            .sections
            .iter()
            .filter_map(|section| {
                Some(SectionSpan {
                    id: section.id()?,
                    top: section.offset_top(),
                    height: section.offset_height(),
                })
            })
            .collect()
    }

    fn highlight_active_link(&self) {
        let active = self.state.active_section.as_ref().map(|id| format!("#{}", id));
        for link in &self.elements.links {
            let is_active = active.is_some() && link.attribute("href") == active;
            link.set_class("active", is_active);
            link.set_attribute("aria-current", if is_active { "true" } else { "false" });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::fake::FakeNode;

    fn page() -> (Navigation<FakeNode>, FakeNode, FakeNode, Vec<FakeNode>) {
        let navbar = FakeNode::with_id("navbar");
        let toggle = FakeNode::with_id("menu-toggle");
        let menu = FakeNode::with_id("nav-menu");
        let back_to_top = FakeNode::with_id("back-to-top");
        let links: Vec<FakeNode> = ["#home", "#about", "#contact"]
            .iter()
            .map(|href| FakeNode::new().with_attr("href", href))
            .collect();
        for link in &links {
            menu.append(link);
        }
        let sections = vec![
            FakeNode::with_id("home").with_section(0.0, 600.0),
            FakeNode::with_id("about").with_section(600.0, 800.0),
            FakeNode::with_id("contact").with_section(1400.0, 500.0),
        ];
        let nav = Navigation::new(
            NavElements {
                navbar: navbar.clone(),
                toggle: Some(toggle),
                menu: Some(menu.clone()),
                links: links.clone(),
                sections,
                back_to_top: Some(back_to_top),
            },
            Settings::default(),
        );
        (nav, navbar, menu, links)
    }

    #[test]
    fn scroll_flags_use_strict_thresholds() {
        let settings = Settings::default();
        assert_eq!(
            ScrollFlags::from_offset(50.0, &settings),
            ScrollFlags { is_scrolled: false, show_back_to_top: false }
        );
        assert_eq!(
            ScrollFlags::from_offset(51.0, &settings),
            ScrollFlags { is_scrolled: true, show_back_to_top: false }
        );
        assert_eq!(
            ScrollFlags::from_offset(301.0, &settings),
            ScrollFlags { is_scrolled: true, show_back_to_top: true }
        );
    }

    #[test]
    fn last_matching_section_wins() {
        let spans = vec![
            SectionSpan { id: "a".into(), top: 0.0, height: 1000.0 },
            SectionSpan { id: "b".into(), top: 400.0, height: 300.0 },
        ];
        assert_eq!(active_section(&spans, 350.0, 100.0), Some("b"));
        assert_eq!(active_section(&spans, 100.0, 100.0), Some("a"));
        // Span end is exclusive.
        assert_eq!(active_section(&spans, 900.0, 100.0), None);
    }

    #[test]
    fn scrolling_highlights_one_link_and_keeps_it_past_the_end() {
        let (mut nav, navbar, _, links) = page();
        nav.on_scroll(700.0);
        assert!(navbar.has_class("scrolled"));
        assert!(links[1].has_class("active"));
        assert_eq!(links.iter().filter(|l| l.has_class("active")).count(), 1);

        nav.on_scroll(5000.0);
        assert!(links[1].has_class("active"));
        assert_eq!(links.iter().filter(|l| l.has_class("active")).count(), 1);

        nav.on_scroll(0.0);
        assert!(!navbar.has_class("scrolled"));
        assert!(links[0].has_class("active"));
        assert!(!links[1].has_class("active"));
    }

    #[test]
    fn back_to_top_follows_scroll_offset() {
        let back_to_top = FakeNode::with_id("back-to-top");
        let mut nav = Navigation::new(
            NavElements {
                navbar: FakeNode::with_id("navbar"),
                toggle: None,
                menu: None,
                links: Vec::new(),
                sections: Vec::new(),
                back_to_top: Some(back_to_top.clone()),
            },
            Settings::default(),
        );
        nav.on_scroll(300.0);
        assert!(!back_to_top.has_class("visible"));
        nav.on_scroll(301.0);
        assert!(back_to_top.has_class("visible"));
        nav.on_scroll(120.0);
        assert!(!back_to_top.has_class("visible"));
    }

    #[test]
    fn aria_state_mirrors_menu_and_active_link() {
        let toggle = FakeNode::with_id("menu-toggle");
        let links: Vec<FakeNode> = ["#home", "#about"]
            .iter()
            .map(|href| FakeNode::new().with_attr("href", href))
            .collect();
        let mut nav = Navigation::new(
            NavElements {
                navbar: FakeNode::with_id("navbar"),
                toggle: Some(toggle.clone()),
                menu: Some(FakeNode::with_id("nav-menu")),
                links: links.clone(),
                sections: vec![
                    FakeNode::with_id("home").with_section(0.0, 600.0),
                    FakeNode::with_id("about").with_section(600.0, 800.0),
                ],
                back_to_top: None,
            },
            Settings::default(),
        );

        nav.toggle_menu();
        assert_eq!(toggle.attribute("aria-expanded").as_deref(), Some("true"));
        assert!(toggle.has_class("active"));
        nav.toggle_menu();
        assert_eq!(toggle.attribute("aria-expanded").as_deref(), Some("false"));

        nav.on_scroll(650.0);
        assert_eq!(links[0].attribute("aria-current").as_deref(), Some("false"));
        assert_eq!(links[1].attribute("aria-current").as_deref(), Some("true"));
    }

    #[test]
    fn selecting_a_link_closes_menu_and_offsets_for_header() {
        let (mut nav, _, menu, links) = page();
        nav.toggle_menu();
        assert!(menu.has_class("active"));
        assert_eq!(nav.select_link(&links[2]), Some(1330.0));
        assert!(!nav.is_menu_open());
        assert!(!menu.has_class("active"));
    }

    #[test]
    fn external_links_do_not_scroll() {
        let (mut nav, _, _, _) = page();
        let external = FakeNode::new().with_attr("href", "https://example.com");
        assert_eq!(nav.select_link(&external), None);
        let dangling = FakeNode::new().with_attr("href", "#missing");
        assert_eq!(nav.select_link(&dangling), None);
    }

    #[test]
    fn outside_click_closes_menu_but_inside_click_does_not() {
        let (mut nav, _, _, links) = page();
        nav.toggle_menu();
        nav.on_document_click(&links[0]);
        assert!(nav.is_menu_open());
        nav.on_document_click(&FakeNode::new());
        assert!(!nav.is_menu_open());
    }

    #[test]
    fn widening_past_breakpoint_closes_menu() {
        let (mut nav, _, _, _) = page();
        nav.toggle_menu();
        nav.on_resize(768.0);
        assert!(nav.is_menu_open());
        nav.on_resize(769.0);
        assert!(!nav.is_menu_open());
    }
}
