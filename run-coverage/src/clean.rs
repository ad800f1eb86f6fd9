//! Removal of coverage artifacts.

use error::Result;

use covrun::{PathContext, RunConfig, clean_dir, remove_file_if_exists};

use std::path::Path;

bitflags! {
    /// Collection of things to be cleaned.
    ///
    /// These bitflags would be used in [`clean()`].
    ///
    /// [`clean()`]: ./fn.clean.html
    pub struct CleanTargets: u8 {
        /// Delete `coverage.json`, `coverage.lcov` and `coverage.html`.
        const REPORT = 1;
        /// Delete the raw and merged profiles, and the test results.
        const PROFILE = 2;
        /// Delete the whole build tree.
        const BUILD = 4;
    }
}

fn remove_file(path: &Path) -> Result<()> {
    if path.exists() {
        progress!("Remove", "{}", path.display());
    }
    remove_file_if_exists(path)?;
    Ok(())
}

/// Removes the selected artifacts. Missing files are skipped silently.
pub fn clean(config: &RunConfig, paths: &PathContext, targets: CleanTargets) -> Result<()> {
    if targets.contains(CleanTargets::BUILD) {
        progress!("Remove", "{}", paths.build().display());
        clean_dir(paths.build())?;
        return Ok(());
    }

    if targets.contains(CleanTargets::REPORT) {
        for report in &paths.reports() {
            remove_file(report)?;
        }
    }
    if targets.contains(CleanTargets::PROFILE) {
        remove_file(&paths.raw_profile())?;
        remove_file(&paths.profile_data(config))?;
        remove_file(&paths.test_results())?;
    }
    Ok(())
}
