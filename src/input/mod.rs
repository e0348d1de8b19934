mod header;
mod target;

pub use header::{parse_headers, Header};
pub use target::{load_targets, parse_targets, Target, TargetSource};
