//! Append-only log file for captured mnemonic phrases.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::debug;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name for a run started at `created`, e.g.
/// `mnemonics_coldkeyA_20250806_143000.txt`.
pub fn log_file_name(coldkey: &str, created: DateTime<Local>) -> String {
    format!("mnemonics_{}_{}.txt", coldkey, created.format("%Y%m%d_%H%M%S"))
}

/// One log file per run: a header naming the coldkey and the run start
/// time, then one block per successfully created hotkey.
pub struct MnemonicLog {
    path: PathBuf,
    file: File,
}

impl MnemonicLog {
    /// Creates the log file in `dir` and writes the run header. Fails if a
    /// file with the same name already exists rather than truncating it.
    pub fn create(dir: &Path, coldkey: &str, created: DateTime<Local>) -> Result<Self> {
        let path = dir.join(log_file_name(coldkey, created));
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .with_context(|| format!("failed to create mnemonic log {}", path.display()))?;
        writeln!(file, "Coldkey: {}", coldkey)?;
        writeln!(file, "Created: {}", created.format("%Y-%m-%d %H:%M:%S"))?;
        file.flush()?;
        debug!("Opened mnemonic log at {}", path.display());
        Ok(MnemonicLog { path, file })
    }

    /// Appends one (hotkey, mnemonic) block: a blank separator line, the
    /// hotkey name, the mnemonic. Flushed immediately so an interrupted run
    /// keeps everything extracted so far.
    pub fn append_entry(&mut self, hotkey: &str, mnemonic: &str) -> Result<()> {
        writeln!(self.file)?;
        writeln!(self.file, "Hotkey: {}", hotkey)?;
        writeln!(self.file, "{}", mnemonic)?;
        self.file
            .flush()
            .with_context(|| format!("failed to flush mnemonic log {}", self.path.display()))?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn fixed_timestamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn file_name_embeds_coldkey_and_timestamp() {
        assert_eq!(
            log_file_name("coldkeyA", fixed_timestamp()),
            "mnemonics_coldkeyA_20240102_030405.txt"
        );
    }

    #[test]
    fn create_writes_the_header() {
        let dir = tempdir().unwrap();
        let log = MnemonicLog::create(dir.path(), "coldkeyA", fixed_timestamp()).unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents, "Coldkey: coldkeyA\nCreated: 2024-01-02 03:04:05\n");
    }

    #[test]
    fn entries_append_in_order() {
        let dir = tempdir().unwrap();
        let mut log = MnemonicLog::create(dir.path(), "coldkeyA", fixed_timestamp()).unwrap();

        log.append_entry("hotkey1", "alpha bravo charlie").unwrap();
        log.append_entry("hotkey2", "delta echo foxtrot").unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            contents,
            "Coldkey: coldkeyA\n\
             Created: 2024-01-02 03:04:05\n\
             \n\
             Hotkey: hotkey1\n\
             alpha bravo charlie\n\
             \n\
             Hotkey: hotkey2\n\
             delta echo foxtrot\n"
        );
    }

    #[test]
    fn refuses_to_overwrite_an_existing_log() {
        let dir = tempdir().unwrap();
        let ts = fixed_timestamp();
        let _first = MnemonicLog::create(dir.path(), "coldkeyA", ts).unwrap();
        assert!(MnemonicLog::create(dir.path(), "coldkeyA", ts).is_err());
    }

    #[test]
    fn distinct_timestamps_give_distinct_files() {
        let later = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 6).unwrap();
        assert_ne!(
            log_file_name("coldkeyA", fixed_timestamp()),
            log_file_name("coldkeyA", later)
        );
    }
}
