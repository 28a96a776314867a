pub mod diff;
pub mod snapshots;
pub mod store;
pub mod util;

pub use diff::*;
pub use snapshots::*;
pub use store::*;
pub use util::*;
