pub mod controller;
pub mod logging;
pub mod view;

pub use controller::{
    CompletedLoad, FeedViewController, LoadOutcome, PanelState, PendingLoad, Ticket, Visibility,
};
pub use logging::{init_logging, Logger};
pub use view::{BriefsView, CardView, FeedView, HealthView, Link, PanelError};

pub mod prelude {
    pub use super::controller::*;
    pub use super::view::*;
    pub use nd_core::{FilterState, NewsApi, Result, Tab};
}
