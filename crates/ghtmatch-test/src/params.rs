//! Check bookkeeping for `*_reg` tests

use crate::error::{TestError, TestResult};
use crate::regout_dir;
use ghtmatch_core::Pix;
use ghtmatch_io::ImageFormat;
use std::fs;

/// Whether a run only checks or also dumps images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    #[default]
    Compare,
    /// Also write images under `tests/regout`
    Display,
}

impl RegTestMode {
    /// `REGTEST_MODE=display` selects [`RegTestMode::Display`]; anything else compares.
    pub fn from_env() -> Self {
        let display = std::env::var("REGTEST_MODE")
            .is_ok_and(|v| v.eq_ignore_ascii_case("display"));
        if display { Self::Display } else { Self::Compare }
    }
}

/// Counts checks and collects failures so one test reports all of them at
/// [`RegParams::cleanup`].
pub struct RegParams {
    /// Prefix for messages and output files, e.g. "match"
    pub test_name: String,
    /// 1-based number of the latest check
    index: usize,
    pub mode: RegTestMode,
    success: bool,
    failures: Vec<String>,
}

impl RegParams {
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();
        eprintln!("\n==== {}_reg ({:?}) ====", test_name, mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, what: String) -> bool {
        let msg = format!("{}_reg #{}: {}", self.test_name, self.index, what);
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
        false
    }

    /// Passes when `|expected - actual| <= delta`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();
        if diff <= delta {
            return true;
        }
        self.fail(format!(
            "expected {}, got {} (off by {}, tolerance {})",
            expected, actual, diff, delta
        ))
    }

    /// Passes when `ok`; `what` names the condition in the failure report.
    pub fn check(&mut self, what: &str, ok: bool) -> bool {
        self.index += 1;
        ok || self.fail(format!("{} does not hold", what))
    }

    /// Passes when both images have the same geometry and samples; a
    /// failure names the first differing pixel.
    pub fn compare_pix(&mut self, expected: &Pix, actual: &Pix) -> bool {
        self.index += 1;
        if !expected.sizes_equal(actual) {
            return self.fail(format!(
                "image {:?} {}bpp vs {:?} {}bpp",
                expected.dimensions(),
                expected.depth().bits(),
                actual.dimensions(),
                actual.depth().bits()
            ));
        }
        let width = expected.width() as usize;
        match expected.data().iter().zip(actual.data()).position(|(a, b)| a != b) {
            Some(i) => self.fail(format!("pixels differ at ({}, {})", i % width, i / width)),
            None => true,
        }
    }

    /// In display mode, save `pix` as `<regout>/<test>.<NN>.<ext>` and return
    /// the path. Compare mode only bumps the index.
    pub fn write_pix(&mut self, pix: &Pix, format: ImageFormat) -> TestResult<Option<String>> {
        self.index += 1;
        if !self.display() {
            return Ok(None);
        }
        fs::create_dir_all(regout_dir())?;
        let path = format!(
            "{}/{}.{:02}.{}",
            regout_dir(),
            self.test_name,
            self.index,
            format.extension()
        );
        ghtmatch_io::write_image(pix, &path, format).map_err(|e| TestError::ImageWrite {
            path: path.clone(),
            message: e.to_string(),
        })?;
        eprintln!("  -> {}", path);
        Ok(Some(path))
    }

    /// Print the summary; `true` when no check failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("{}_reg: {} checks passed", self.test_name, self.index);
        } else {
            eprintln!("{}_reg: {} of {} checks failed", self.test_name, self.failures.len(), self.index);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        self.success
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghtmatch_core::PixelDepth;

    #[test]
    fn test_compare_values() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.is_success());
        assert_eq!(rp.failures().len(), 1);
        assert_eq!(rp.index(), 2);
    }

    #[test]
    fn test_compare_pix_mismatch_location() {
        let a = Pix::from_data(3, 2, PixelDepth::Bit8, vec![0, 0, 0, 0, 0, 0]).unwrap();
        let b = Pix::from_data(3, 2, PixelDepth::Bit8, vec![0, 0, 0, 0, 7, 0]).unwrap();
        let mut rp = RegParams::new("test");
        assert!(rp.compare_pix(&a, &a));
        assert!(!rp.compare_pix(&a, &b));
        assert!(rp.failures()[0].contains("(1, 1)"));
    }
}
