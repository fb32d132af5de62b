use crate::dom::UiNode;

pub const EXPANDED_ATTR: &str = "data-expanded";

/// An expandable `.info-facet` card.
pub struct FacetCard<N> {
    pub card: N,
    pub expand_button: N,
    pub header: Option<N>,
}

impl<N: UiNode> FacetCard<N> {
    pub fn new(card: N, expand_button: N, header: Option<N>) -> Self {
        if card.attribute(EXPANDED_ATTR).is_none() {
            card.set_attribute(EXPANDED_ATTR, "false");
        }
        Self { card, expand_button, header }
    }

    pub fn is_expanded(&self) -> bool {
        self.card.attribute(EXPANDED_ATTR).as_deref() == Some("true")
    }

    pub fn toggle(&self) -> bool {
        let expanded = !self.is_expanded();
        self.card.set_attribute(EXPANDED_ATTR, if expanded { "true" } else { "false" });
        expanded
    }

    /// A click anywhere in the card. Only the expand control and the header
    /// toggle; each click toggles at most once even though the control may
    /// sit inside the header.
    pub fn on_click(&self, target: &N) -> bool {
        let on_button = self.expand_button.contains(target);
        let on_header = self.header.as_ref().map_or(false, |header| header.contains(target));
        if on_button || on_header {
            self.toggle();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::fake::FakeNode;

    fn facet() -> (FacetCard<FakeNode>, FakeNode, FakeNode, FakeNode) {
        let card = FakeNode::new();
        let header = FakeNode::new();
        let title = FakeNode::new();
        let button = FakeNode::new();
        let highlights = FakeNode::new();
        header.append(&title);
        header.append(&button);
        card.append(&header);
        card.append(&highlights);
        (FacetCard::new(card, button.clone(), Some(header)), title, button, highlights)
    }

    #[test]
    fn starts_collapsed() {
        let (facet, _, _, _) = facet();
        assert!(!facet.is_expanded());
        assert_eq!(facet.card.attribute(EXPANDED_ATTR).as_deref(), Some("false"));
    }

    #[test]
    fn button_and_header_toggle_once_per_click() {
        let (facet, title, button, _) = facet();
        assert!(facet.on_click(&button));
        assert!(facet.is_expanded());
        assert!(facet.on_click(&title));
        assert!(!facet.is_expanded());
    }

    #[test]
    fn clicks_outside_the_header_are_ignored() {
        let (facet, _, _, highlights) = facet();
        assert!(!facet.on_click(&highlights));
        assert!(!facet.is_expanded());
    }

    #[test]
    fn cards_do_not_share_state() {
        let (first, _, first_button, _) = facet();
        let (second, _, _, _) = facet();
        first.on_click(&first_button);
        assert!(first.is_expanded());
        assert!(!second.is_expanded());
    }
}
