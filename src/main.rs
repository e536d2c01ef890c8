use anyhow::Result;
use chrono::Local;
use clap::{App, Arg, ErrorKind};
use log::debug;
use std::env;
use std::path::PathBuf;

use hotkey_batcher::{
    mnemonic_log, BatchConfig, HotkeyBatcher, RunSummary, WalletToolConfig,
    DEFAULT_MNEMONIC_MARKER,
};

fn build_app() -> App<'static> {
    App::new("hotkey-batcher")
        .version("0.1.0")
        .about("Batch-create hotkeys under an existing coldkey wallet, capturing each mnemonic to a timestamped log file")
        .arg(
            Arg::with_name("coldkey")
                .value_name("COLDKEY")
                .help("Name of the existing coldkey wallet")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("hotkeys")
                .value_name("HOTKEY")
                .help("Names of the hotkeys to create, in order")
                .required(true)
                .multiple_values(true)
                .index(2),
        )
        .arg(
            Arg::with_name("words")
                .long("words")
                .value_name("N")
                .help("Mnemonic word count requested from the tool")
                .takes_value(true)
                .default_value("12"),
        )
        .arg(
            Arg::with_name("tool")
                .long("tool")
                .value_name("PROGRAM")
                .help("Wallet tool to drive [env: HOTKEY_TOOL] [default: btcli]")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("tool-args")
                .long("tool-args")
                .value_name("ARGS")
                .help("Arguments selecting the tool's new-hotkey subcommand [env: HOTKEY_TOOL_ARGS] [default: wallet new_hotkey]")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("marker")
                .long("marker")
                .value_name("TEXT")
                .help("Output fragment that precedes the mnemonic [env: MNEMONIC_MARKER]")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("out-dir")
                .long("out-dir")
                .value_name("DIR")
                .help("Directory the mnemonic log is written to")
                .takes_value(true)
                .default_value("."),
        )
        .arg(
            Arg::with_name("attempts")
                .long("attempts")
                .value_name("N")
                .help("Creation attempts per hotkey before giving up")
                .takes_value(true)
                .default_value("1"),
        )
        .arg(
            Arg::with_name("retry-delay")
                .long("retry-delay")
                .value_name("MS")
                .help("Pause between attempts for the same hotkey")
                .takes_value(true)
                .default_value("1000"),
        )
        .arg(
            Arg::with_name("delay")
                .long("delay")
                .value_name("MS")
                .help("Pause between consecutive hotkeys")
                .takes_value(true)
                .default_value("0"),
        )
        .arg(
            Arg::with_name("dry-run")
                .long("dry-run")
                .help("Print what would run without invoking the tool or writing files"),
        )
        .arg(
            Arg::with_name("json-summary")
                .long("json-summary")
                .help("Also print the run summary as JSON"),
        )
}

fn env_or(cli_value: Option<&str>, var: &str, fallback: &str) -> String {
    match cli_value {
        Some(value) => value.to_string(),
        None => env::var(var).unwrap_or_else(|_| fallback.to_string()),
    }
}

fn print_plan(config: &BatchConfig) {
    println!(
        "Would run: {} {}",
        config.tool.program,
        config.tool.args.join(" ")
    );
    println!("Coldkey:   {}", config.coldkey);
    println!("Hotkeys:   {}", config.hotkeys.join(", "));
    println!("Words:     {}", config.words);
    println!(
        "Log file:  {}",
        config
            .out_dir
            .join(mnemonic_log::log_file_name(&config.coldkey, Local::now()))
            .display()
    );
    println!("Dry run, nothing executed.");
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("Hotkeys processed: {}", summary.total);
    println!("Created:           {}", summary.created);
    println!("Failed:            {}", summary.failed);
    for outcome in &summary.outcomes {
        match &outcome.error {
            None => println!("  ok      {}", outcome.hotkey),
            Some(error) => println!("  failed  {} ({})", outcome.hotkey, error),
        }
    }
    println!("Mnemonic log: {}", summary.log_file.display());
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let matches = match build_app().try_get_matches() {
        Ok(matches) => matches,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            // Usage violations exit with status 1, before any subprocess
            // call or file write.
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    let program = env_or(matches.value_of("tool"), "HOTKEY_TOOL", "btcli");
    let tool_args = env_or(
        matches.value_of("tool-args"),
        "HOTKEY_TOOL_ARGS",
        "wallet new_hotkey",
    );
    let marker = env_or(
        matches.value_of("marker"),
        "MNEMONIC_MARKER",
        DEFAULT_MNEMONIC_MARKER,
    );

    let config = BatchConfig {
        coldkey: matches.value_of("coldkey").unwrap().to_string(),
        hotkeys: matches
            .values_of("hotkeys")
            .unwrap()
            .map(|s| s.to_string())
            .collect(),
        words: matches.value_of("words").unwrap().parse()?,
        tool: WalletToolConfig {
            program,
            args: tool_args.split_whitespace().map(|s| s.to_string()).collect(),
            marker,
        },
        out_dir: PathBuf::from(matches.value_of("out-dir").unwrap()),
        attempts: matches.value_of("attempts").unwrap().parse()?,
        retry_delay_ms: matches.value_of("retry-delay").unwrap().parse()?,
        delay_ms: matches.value_of("delay").unwrap().parse()?,
    };
    debug!("Batch config: {:?}", config);

    if matches.is_present("dry-run") {
        print_plan(&config);
        return Ok(());
    }

    let summary = HotkeyBatcher::new(config).run().await?;
    print_summary(&summary);
    if matches.is_present("json-summary") {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    // Per-hotkey failures are already reported above; the batch itself
    // completed, so the process exits 0.
    Ok(())
}
