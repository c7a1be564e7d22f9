//! Storefront widgets over a headless page model.
//!
//! Four widgets share one [`Page`]: cross-sell variant cards, a floating
//! scroll toggle, free-shipping progress elements and volume-discount
//! selectors. [`Storefront`] mounts them and routes page events between
//! them; network access goes through [`CartApi`].

pub mod api;
pub mod card;
pub mod dom;
pub mod events;
pub mod page;
pub mod progress;
pub mod runtime;
pub mod toggle;
pub mod volume;

pub use api::CartApi;
pub use card::{SubmitOutcome, VariantCard};
pub use dom::{Document, ElementId, Node, Selector, SelectorError};
pub use events::{EventBus, EventTarget, Listener, PageEvent};
pub use page::{HostGlobals, Page, Viewport, DISPATCH_LOG_CAPACITY};
pub use progress::{ProgressBar, ProgressBars, RefreshOutcome, RefreshState};
pub use runtime::Storefront;
pub use toggle::{ScrollToggle, ToggleMode, ToggleSettings};
pub use volume::{
    PriceTarget, VariantChange, VolumeDiscount, VolumeDiscountOptions, PRICE_TARGETS,
};
