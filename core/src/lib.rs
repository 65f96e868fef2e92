pub mod deviation;
pub mod error;
mod reading;
mod reconcile;
mod record;
pub mod tray;

pub use reading::*;
pub use reconcile::*;
pub use record::*;
pub use tray::{RawTrayId, TrayId};

pub static CORE_VERSION: &str = env!("CARGO_PKG_VERSION");
