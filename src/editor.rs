use std::fs;
use std::process::Command;

use crate::error::{Error, Result};

/// Edit `initial_content` in `$EDITOR` (default `vi`) and return the result.
pub fn open_editor(initial_content: &str) -> Result<String> {
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    let tmp_file = std::env::temp_dir().join(format!("surveyor_{}.md", std::process::id()));
    fs::write(&tmp_file, initial_content).map_err(|e| Error::io(&tmp_file, e))?;

    let status = Command::new(&editor)
        .arg(&tmp_file)
        .status()
        .map_err(|e| Error::Editor(format!("cannot open editor '{}': {}", editor, e)))?;

    if !status.success() {
        let _ = fs::remove_file(&tmp_file);
        return Err(Error::Editor(format!("'{}' exited with {}", editor, status)));
    }

    let result = fs::read_to_string(&tmp_file).map_err(|e| Error::io(&tmp_file, e))?;
    let _ = fs::remove_file(&tmp_file);
    Ok(result.trim_end_matches('\n').to_string())
}
