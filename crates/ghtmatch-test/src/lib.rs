//! ghtmatch-test - Regression test harness for ghtmatch
//!
//! Every `tests/*_reg.rs` file follows the same shape:
//!
//! ```ignore
//! use ghtmatch_test::RegParams;
//!
//! let mut rp = RegParams::new("match");
//! rp.compare_values(36.0, hits as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: "compare" (default) or "display"; display mode also
//!   writes intermediate images under `tests/regout`.

mod error;
pub mod fixtures;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // ghtmatch-test is at crates/ghtmatch-test
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
