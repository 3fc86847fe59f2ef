pub mod pump;

pub use pump::{PumpReport, UpdatePump, UpdateSender};
