pub mod poller;
pub mod twelvedata;

pub use poller::{format_alert, Poller, PollerHandle};
pub use twelvedata::TwelveDataClient;
