//! Totals read back from an `llvm-cov export` JSON report.
//!
//! The JSON report has this shape, of which only the `totals` are used:
//!
//! ```json
//! {
//!     "type": "llvm.coverage.json.export",
//!     "version": "2.0.1",
//!     "data": [
//!         {
//!             "files": [...],
//!             "functions": [...],
//!             "totals": {
//!                 "lines": {"count": 120, "covered": 100, "percent": 83.3},
//!                 "functions": {"count": 12, "covered": 11, "percent": 91.6},
//!                 "regions": {"count": 200, "covered": 150, "notcovered": 50, "percent": 75},
//!                 "branches": {"count": 40, "covered": 30, "notcovered": 10, "percent": 75}
//!             }
//!         }
//!     ]
//! }
//! ```

use error::{Result, ResultExt};

use serde_json::from_reader;

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::ops::AddAssign;
use std::path::Path;

/// Number of covered items out of the total.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Counts {
    pub count: u64,
    pub covered: u64,
}

impl Counts {
    /// Percentage of covered items. An empty set counts as fully covered.
    pub fn percent(&self) -> f64 {
        if self.count == 0 {
            100.0
        } else {
            self.covered as f64 * 100.0 / self.count as f64
        }
    }
}

impl AddAssign for Counts {
    fn add_assign(&mut self, other: Counts) {
        self.count += other.count;
        self.covered += other.covered;
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.2}% ({}/{})", self.percent(), self.covered, self.count)
    }
}

/// Coverage totals of a whole export.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Summary {
    pub lines: Counts,
    pub functions: Counts,
    pub regions: Counts,
    /// Absent before LLVM 12.
    #[serde(default)]
    pub branches: Counts,
}

impl AddAssign for Summary {
    fn add_assign(&mut self, other: Summary) {
        self.lines += other.lines;
        self.functions += other.functions;
        self.regions += other.regions;
        self.branches += other.branches;
    }
}

#[derive(Deserialize)]
struct Export {
    data: Vec<ExportData>,
}

#[derive(Deserialize)]
struct ExportData {
    totals: Summary,
}

impl Summary {
    /// Reads the totals from a JSON export, summing over all exported objects.
    pub fn from_reader<R: Read>(reader: R) -> Result<Summary> {
        let export: Export = from_reader(reader)?;
        let mut summary = Summary::default();
        for data in export.data {
            summary += data.totals;
        }
        Ok(summary)
    }

    /// Reads the totals from a `coverage.json` file.
    pub fn from_path(path: &Path) -> Result<Summary> {
        let file = File::open(path).chain_err(|| format!("cannot open `{}`", path.display()))?;
        Summary::from_reader(BufReader::new(file)).chain_err(|| format!("cannot parse `{}`", path.display()))
    }
}

/// Displays as `lines 83.33% (100/120), functions ...`.
impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "lines {}, functions {}, regions {}", self.lines, self.functions, self.regions)?;
        if self.branches.count != 0 {
            write!(f, ", branches {}", self.branches)?;
        }
        Ok(())
    }
}
