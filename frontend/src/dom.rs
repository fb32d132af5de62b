//! A small abstraction over the page's element tree.
//!
//! Every interactive component is generic over [`UiNode`], so the same logic
//! drives the live document in the browser and an in-memory tree in tests.

/// Bounding box relative to the viewport, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Edge-inclusive: a box touching the viewport border still counts as inside.
    pub fn contains(&self, rect: &Rect) -> bool {
        rect.top >= 0.0
            && rect.left >= 0.0
            && rect.bottom <= self.height
            && rect.right <= self.width
    }
}

/// An addressable, mutable UI element.
///
/// Handles are cheap to clone and all clones refer to the same element,
/// so mutation goes through `&self`.
pub trait UiNode: Clone {
    fn id(&self) -> Option<String>;
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);
    fn has_class(&self, class: &str) -> bool;
    /// Adds `class` when `on`, removes it otherwise.
    fn set_class(&self, class: &str, on: bool);
    fn text(&self) -> String;
    fn set_text(&self, text: &str);
    fn markup(&self) -> String;
    fn set_markup(&self, markup: &str);
    /// Current value of a form control; empty for anything else.
    fn value(&self) -> String;
    fn set_value(&self, value: &str);
    fn set_disabled(&self, disabled: bool);
    fn is_disabled(&self) -> bool;
    fn bounding_rect(&self) -> Rect;
    /// Distance from the document top to the element's top edge.
    fn offset_top(&self) -> f64;
    fn offset_height(&self) -> f64;
    /// True when `other` is this node or one of its descendants.
    fn contains(&self, other: &Self) -> bool;
}


#[cfg(test)]
mod tests {
    use super::fake::FakeNode;
    use super::*;

    #[test]
    fn viewport_containment_is_edge_inclusive() {
        let viewport = Viewport { width: 1280.0, height: 800.0 };
        assert!(viewport.contains(&Rect { top: 0.0, left: 0.0, bottom: 800.0, right: 1280.0 }));
        assert!(!viewport.contains(&Rect { top: -1.0, left: 0.0, bottom: 200.0, right: 200.0 }));
        assert!(!viewport.contains(&Rect { top: 700.0, left: 0.0, bottom: 801.0, right: 200.0 }));
    }

    #[test]
    fn containment_follows_children() {
        let header = FakeNode::new();
        let button = FakeNode::new();
        let icon = FakeNode::new();
        header.append(&button);
        button.append(&icon);
        assert!(header.contains(&icon));
        assert!(button.contains(&button));
        assert!(!icon.contains(&header));
    }
}
