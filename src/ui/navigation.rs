//! Navigation and document-title capabilities
//!
//! Any `Fn(&str)` closure works as either capability, which is how a Leptos
//! app plugs in `use_navigate()` and how tests record calls.

/// Moves the client to another view
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate(&self, path: &str) {
        self(path)
    }
}

/// Updates the visible document title
pub trait DocumentTitle: Send + Sync {
    fn set_title(&self, title: &str);
}

impl<F> DocumentTitle for F
where
    F: Fn(&str) + Send + Sync,
{
    fn set_title(&self, title: &str) {
        self(title)
    }
}

/// Full page navigation through `window.location`
#[cfg(feature = "hydrate")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationNavigator;

#[cfg(feature = "hydrate")]
impl Navigator for LocationNavigator {
    fn navigate(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.location().set_href(path) {
            leptos::logging::warn!("Navigation to {} failed: {:?}", path, e);
        }
    }
}

/// Writes `document.title`
#[cfg(feature = "hydrate")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserDocumentTitle;

#[cfg(feature = "hydrate")]
impl DocumentTitle for BrowserDocumentTitle {
    fn set_title(&self, title: &str) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            document.set_title(title);
        }
    }
}
