//! One-shot entry animations for `.animate-on-scroll` elements.

use crate::config::Settings;
use crate::dom::{UiNode, Viewport};

pub const ANIMATED_CLASS: &str = "animated";

/// Intersection observer configuration for entry animations.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: String,
}

impl ObserverOptions {
    pub fn for_reveal(settings: &Settings) -> Self {
        Self {
            threshold: settings.reveal_threshold,
            root_margin: settings.reveal_root_margin.clone(),
        }
    }

    pub fn for_counters(settings: &Settings) -> Self {
        Self {
            threshold: settings.counter_threshold,
            root_margin: "0px".to_string(),
        }
    }
}

pub fn has_animated<N: UiNode>(node: &N) -> bool {
    node.has_class(ANIMATED_CLASS)
}

/// Marks everything already fully on screen and returns the rest, which the
/// caller must hand to an intersection observer.
pub fn baseline<N: UiNode>(nodes: Vec<N>, viewport: &Viewport) -> Vec<N> {
    nodes
        .into_iter()
        .filter(|node| {
            if viewport.contains(&node.bounding_rect()) {
                node.set_class(ANIMATED_CLASS, true);
                false
            } else {
                true
            }
        })
        .collect()
}

/// Handles one intersection report. Returns `true` when the node no longer
/// needs observing.
pub fn on_intersection<N: UiNode>(node: &N, is_intersecting: bool) -> bool {
    if has_animated(node) {
        return true;
    }
    if is_intersecting {
        node.set_class(ANIMATED_CLASS, true);
    }
    is_intersecting
}
