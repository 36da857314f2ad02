pub mod dump;
pub mod restore;

use std::time::Duration;

use crate::tools::ToolLocator;

pub use dump::DumpRunner;
pub use restore::RestoreRunner;

pub struct MySqlTools {
    locator: ToolLocator,
    timeout: Duration,
}

impl MySqlTools {
    pub fn new(locator: ToolLocator, timeout: Duration) -> MySqlTools {
        MySqlTools { locator, timeout }
    }

    pub(crate) fn locator(&self) -> &ToolLocator {
        &self.locator
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }
}
