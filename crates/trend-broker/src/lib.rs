//! Venue integrations.

mod paper;

pub use paper::{PaperOrder, PaperVenue};
