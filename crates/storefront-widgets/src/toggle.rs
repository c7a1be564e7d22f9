//! Floating promo element that is only shown near the top of the page on
//! small screens.

use crate::dom::{Document, ElementId};
use crate::page::Page;

pub const FLOATING_WIDGET_ID: &str = "floatingWidget";

/// Breakpoint and offsets of the floating widget.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleSettings {
    /// Widths up to and including this are treated as mobile.
    pub mobile_breakpoint: u32,
    /// Scroll offsets strictly below this show the widget.
    pub reveal_offset: f64,
    pub transition: String,
}

impl Default for ToggleSettings {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 767,
            reveal_offset: 100.0,
            transition: "opacity 0.4s ease".to_owned(),
        }
    }
}

/// How the mounted widget behaves for the rest of the page lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleMode {
    /// Mobile: hidden until scroll events say otherwise.
    ScrollReveal,
    /// Desktop: always visible, no scroll listener.
    Static,
}

#[derive(Debug, Clone)]
pub struct ScrollToggle {
    target: ElementId,
    mode: ToggleMode,
    reveal_offset: f64,
}

impl ScrollToggle {
    /// Mounts on `#floatingWidget`, reading the viewport width once.
    ///
    /// Returns `None` (with a warning) when the element is missing.
    pub fn mount(page: &mut Page, settings: &ToggleSettings) -> Option<Self> {
        let Some(target) = page.document.get_element_by_id(FLOATING_WIDGET_ID) else {
            tracing::warn!(id = FLOATING_WIDGET_ID, "floating widget element not found");
            return None;
        };

        let doc = &mut page.document;
        let mode = if page.viewport.width <= settings.mobile_breakpoint {
            doc.set_style(target, "opacity", "0");
            doc.set_style(target, "transition", &settings.transition);
            ToggleMode::ScrollReveal
        } else {
            show(doc, target);
            doc.set_style(target, "transition", "none");
            ToggleMode::Static
        };

        Some(Self {
            target,
            mode,
            reveal_offset: settings.reveal_offset,
        })
    }

    #[must_use]
    pub fn mode(&self) -> ToggleMode {
        self.mode
    }

    #[must_use]
    pub fn target(&self) -> ElementId {
        self.target
    }

    /// Whether a scroll listener is attached.
    #[must_use]
    pub fn listens_to_scroll(&self) -> bool {
        self.mode == ToggleMode::ScrollReveal
    }

    /// Scroll handler; runs on every scroll event, unthrottled.
    pub fn on_scroll(&self, page: &mut Page) {
        if !self.listens_to_scroll() {
            return;
        }
        let offset = page.scroll_offset();
        if offset < self.reveal_offset {
            show(&mut page.document, self.target);
        } else {
            page.document.set_style(self.target, "opacity", "0");
            page.document.set_style(self.target, "pointer-events", "none");
        }
    }

    /// Returns `true` when the element is fully opaque.
    #[must_use]
    pub fn is_visible(&self, doc: &Document) -> bool {
        doc.style(self.target, "opacity") == Some("1")
    }
}

fn show(doc: &mut Document, target: ElementId) {
    doc.set_style(target, "opacity", "1");
    doc.set_style(target, "pointer-events", "auto");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Node;
    use crate::page::Viewport;

    fn page_with_widget(width: u32) -> Page {
        let mut page = Page::default();
        let body = page.document.body();
        page.document
            .append(body, Node::new("div").id(FLOATING_WIDGET_ID));
        page.viewport = Viewport {
            width,
            scroll_y: 0.0,
        };
        page
    }

    #[test]
    fn mobile_starts_hidden_with_transition() {
        let mut page = page_with_widget(500);
        let toggle = ScrollToggle::mount(&mut page, &ToggleSettings::default()).unwrap();
        assert_eq!(toggle.mode(), ToggleMode::ScrollReveal);
        assert!(!toggle.is_visible(&page.document));
        assert_eq!(
            page.document.style(toggle.target(), "transition"),
            Some("opacity 0.4s ease")
        );
    }

    #[test]
    fn mobile_scroll_near_top_shows() {
        let mut page = page_with_widget(500);
        let toggle = ScrollToggle::mount(&mut page, &ToggleSettings::default()).unwrap();
        page.viewport.scroll_y = 50.0;
        toggle.on_scroll(&mut page);
        assert!(toggle.is_visible(&page.document));
        assert_eq!(
            page.document.style(toggle.target(), "pointer-events"),
            Some("auto")
        );
    }

    #[test]
    fn mobile_scroll_past_offset_hides() {
        let mut page = page_with_widget(500);
        let toggle = ScrollToggle::mount(&mut page, &ToggleSettings::default()).unwrap();
        page.viewport.scroll_y = 150.0;
        toggle.on_scroll(&mut page);
        assert!(!toggle.is_visible(&page.document));
        assert_eq!(
            page.document.style(toggle.target(), "pointer-events"),
            Some("none")
        );
    }

    #[test]
    fn offset_boundary_hides() {
        let mut page = page_with_widget(767);
        let toggle = ScrollToggle::mount(&mut page, &ToggleSettings::default()).unwrap();
        page.viewport.scroll_y = 100.0;
        toggle.on_scroll(&mut page);
        assert!(!toggle.is_visible(&page.document));
    }

    #[test]
    fn zero_scroll_y_falls_back_to_scroll_top() {
        let mut page = page_with_widget(500);
        let toggle = ScrollToggle::mount(&mut page, &ToggleSettings::default()).unwrap();
        page.document.set_scroll_top(400.0);
        toggle.on_scroll(&mut page);
        assert!(!toggle.is_visible(&page.document));
    }

    #[test]
    fn desktop_is_static_and_visible() {
        let mut page = page_with_widget(1024);
        let toggle = ScrollToggle::mount(&mut page, &ToggleSettings::default()).unwrap();
        assert_eq!(toggle.mode(), ToggleMode::Static);
        assert!(!toggle.listens_to_scroll());
        assert!(toggle.is_visible(&page.document));
        assert_eq!(page.document.style(toggle.target(), "transition"), Some("none"));

        page.viewport.scroll_y = 5000.0;
        toggle.on_scroll(&mut page);
        assert!(toggle.is_visible(&page.document));
    }

    #[test]
    fn missing_element_is_guarded() {
        let mut page = Page::default();
        assert!(ScrollToggle::mount(&mut page, &ToggleSettings::default()).is_none());
    }
}
