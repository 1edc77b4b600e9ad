mod relay;
mod relay_event;

pub use relay::*;
pub use relay_event::*;
