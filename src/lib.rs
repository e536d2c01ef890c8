use anyhow::Result;
use chrono::{DateTime, Local};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub mod extractor;
pub mod mnemonic_log;
pub mod wallet_cli;

pub use crate::extractor::{extract_mnemonic, DEFAULT_MNEMONIC_MARKER};
pub use crate::mnemonic_log::MnemonicLog;
pub use crate::wallet_cli::{CreateHotkeyError, WalletTool, WalletToolConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Name of the coldkey wallet the hotkeys are created under. Must
    /// already exist; this tool never creates or destroys it.
    pub coldkey: String,
    /// Hotkey names to create, processed in the given order.
    pub hotkeys: Vec<String>,
    /// Mnemonic word count requested from the tool.
    pub words: u32,
    pub tool: WalletToolConfig,
    /// Directory the mnemonic log is written to.
    pub out_dir: PathBuf,
    /// Creation attempts per hotkey; 1 means no retry.
    pub attempts: u32,
    /// Pause between attempts for the same hotkey.
    pub retry_delay_ms: u64,
    /// Pause between consecutive hotkeys.
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HotkeyOutcome {
    pub hotkey: String,
    pub created: bool,
    pub attempts: u32,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub coldkey: String,
    pub started: DateTime<Local>,
    pub total: usize,
    pub created: usize,
    pub failed: usize,
    pub log_file: PathBuf,
    pub outcomes: Vec<HotkeyOutcome>,
}

pub struct HotkeyBatcher {
    config: BatchConfig,
    tool: WalletTool,
}

impl HotkeyBatcher {
    pub fn new(config: BatchConfig) -> Self {
        let tool = WalletTool::new(config.tool.clone());
        HotkeyBatcher { config, tool }
    }

    /// Runs the whole batch: writes the log header, then drives the wallet
    /// tool once per hotkey, strictly sequentially. Per-hotkey failures are
    /// reported and skipped; only log-file i/o aborts the run.
    pub async fn run(&self) -> Result<RunSummary> {
        let started = Local::now();
        let mut log = MnemonicLog::create(&self.config.out_dir, &self.config.coldkey, started)?;
        println!("Writing mnemonics to {}", log.path().display());

        let mut outcomes = Vec::with_capacity(self.config.hotkeys.len());
        for (i, hotkey) in self.config.hotkeys.iter().enumerate() {
            if i > 0 && self.config.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.delay_ms)).await;
            }
            outcomes.push(self.create_one(hotkey, &mut log).await?);
        }

        let created = outcomes.iter().filter(|o| o.created).count();
        let summary = RunSummary {
            coldkey: self.config.coldkey.clone(),
            started,
            total: outcomes.len(),
            created,
            failed: outcomes.len() - created,
            log_file: log.path().to_path_buf(),
            outcomes,
        };
        info!(
            "Batch finished: {}/{} hotkeys created under {}",
            summary.created, summary.total, summary.coldkey
        );
        Ok(summary)
    }

    async fn create_one(&self, hotkey: &str, log: &mut MnemonicLog) -> Result<HotkeyOutcome> {
        let attempts = self.config.attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self
                .tool
                .create_hotkey(&self.config.coldkey, hotkey, self.config.words)
                .await
            {
                Ok(mnemonic) => {
                    log.append_entry(hotkey, &mnemonic)?;
                    println!("created hotkey {}", hotkey);
                    info!("Created hotkey {} on attempt {}", hotkey, attempt);
                    return Ok(HotkeyOutcome {
                        hotkey: hotkey.to_string(),
                        created: true,
                        attempts: attempt,
                        error: None,
                    });
                }
                Err(err) => {
                    if attempt >= attempts {
                        println!("failed to create hotkey {}: {}", hotkey, err);
                        return Ok(HotkeyOutcome {
                            hotkey: hotkey.to_string(),
                            created: false,
                            attempts: attempt,
                            error: Some(err.to_string()),
                        });
                    }
                    warn!(
                        "Attempt {}/{} for hotkey {} failed: {}, retrying",
                        attempt, attempts, hotkey, err
                    );
                    tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
                }
            }
        }
    }
}
