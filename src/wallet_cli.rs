//! Driver for the external wallet tool.
//!
//! The contract with the tool is purely textual: three newline-terminated
//! answers on stdin (coldkey name, hotkey name, word count), and free-form
//! output scanned for the configured mnemonic marker.

use log::debug;
use serde::{Deserialize, Serialize};
use std::io;
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::extractor;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletToolConfig {
    /// Program to invoke, e.g. `btcli`.
    pub program: String,
    /// Arguments selecting the new-hotkey subcommand, e.g. `wallet new_hotkey`.
    pub args: Vec<String>,
    /// Output fragment that precedes the mnemonic phrase.
    pub marker: String,
}

/// Why a single hotkey creation produced no mnemonic. `ToolFailed` and
/// `MarkerNotFound` keep "the tool crashed" distinguishable from "the tool
/// succeeded but changed its message format".
#[derive(Debug, Error)]
pub enum CreateHotkeyError {
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("i/o with `{program}` failed: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` failed ({status}) without printing a mnemonic line")]
    ToolFailed { program: String, status: ExitStatus },
    #[error("`{program}` exited cleanly but printed no mnemonic line (marker {marker:?} not found; did its output format change?)")]
    MarkerNotFound { program: String, marker: String },
}

pub struct WalletTool {
    config: WalletToolConfig,
}

impl WalletTool {
    pub fn new(config: WalletToolConfig) -> Self {
        WalletTool { config }
    }

    /// Runs the tool once and returns the extracted mnemonic. One subprocess
    /// at a time, fully drained before this returns; no timeout.
    pub async fn create_hotkey(
        &self,
        coldkey: &str,
        hotkey: &str,
        words: u32,
    ) -> Result<String, CreateHotkeyError> {
        let program = self.config.program.clone();
        let mut child = Command::new(&self.config.program)
            .args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CreateHotkeyError::Spawn {
                program: program.clone(),
                source,
            })?;

        // Answer the tool's prompts in order: wallet name, hotkey name,
        // word count. Dropping stdin afterwards closes the pipe so the tool
        // sees EOF after the last answer.
        let payload = format!("{}\n{}\n{}\n", coldkey, hotkey, words);
        let mut stdin_error = None;
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(err) = stdin.write_all(payload.as_bytes()).await {
                if err.kind() == io::ErrorKind::BrokenPipe {
                    // Tool exited before draining its prompts; the exit
                    // status and captured output carry the real story.
                    debug!("{} closed stdin early: {}", program, err);
                } else {
                    stdin_error = Some(err);
                }
            }
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| CreateHotkeyError::Io {
                program: program.clone(),
                source,
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        if !combined.is_empty() && !combined.ends_with('\n') {
            // Keep an unterminated stdout line from merging with stderr.
            combined.push('\n');
        }
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        // Success is decided by output content alone.
        if let Some(mnemonic) = extractor::extract_mnemonic(&combined, &self.config.marker) {
            return Ok(mnemonic.to_string());
        }

        // No mnemonic in there, so the output is safe to log.
        debug!(
            "{} output for hotkey {}: {}",
            program,
            hotkey,
            combined.trim_end()
        );
        if let Some(source) = stdin_error {
            return Err(CreateHotkeyError::Io { program, source });
        }
        if !output.status.success() {
            return Err(CreateHotkeyError::ToolFailed {
                program,
                status: output.status,
            });
        }
        Err(CreateHotkeyError::MarkerNotFound {
            program,
            marker: self.config.marker.clone(),
        })
    }
}
