use std::fs;
use std::path::Path;

use report_types::RunInput;
use tracing::debug;

use crate::Error;

/// Load a recorded run from a JSON file.
pub fn load(path: &Path) -> Result<RunInput, Error> {
    let text = fs::read_to_string(path).map_err(Error::Io)?;
    let input: RunInput = serde_json::from_str(&text).map_err(Error::Serialize)?;

    if input.timings.is_empty() {
        return Err(Error::InvalidConfig(format!(
            "{}: a run needs at least one rank's timings",
            path.display()
        )));
    }

    debug!(path = %path.display(), ranks = input.process_count(), niters = input.niters, "run_input_loaded");
    Ok(input)
}
