pub mod health;
pub mod profile;
pub mod sse;
pub mod updates;

pub use health::health;
pub use profile::get_profile;
pub use sse::stream_deliveries;
pub use updates::{post_update, UpdateResponse};
