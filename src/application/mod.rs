//! Application layer: what the pages do with the domain.
pub mod homepage;
pub mod session;
pub mod store_context;

pub use homepage::{HeroInformation, SiteConfig};
pub use session::{seeded_cart, spawn_catalog_load, CartBadge, CartView, SharedSession, StoreSession, StoreView};
pub use store_context::{StoreContext, StoreContextError, StoreIdentity};
