//! RFXtrx to MQTT bridge.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rfxtrx2mqtt::config::{Config, DEFAULT_CONFIG_PATH};
use rfxtrx2mqtt::transport::serial::SerialConfig;
use rfxtrx2mqtt::{RfxCom, ScanMode, Scanner};

/// Bridge between an RFXtrx transceiver and an MQTT broker.
#[derive(Parser, Debug)]
#[command(name = "rfxtrx2mqtt")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Print each discovered device once instead of bridging.
    #[arg(long)]
    scan: bool,

    /// Print every received device event instead of bridging.
    #[arg(long)]
    stream: bool,

    /// Skip devices already listed in the configuration.
    #[arg(long)]
    new: bool,

    /// Configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

/// Rewrites the single-dash flags `-scan`, `-stream` and `-new`.
fn normalize_args(args: impl IntoIterator<Item = String>) -> Vec<String> {
    args.into_iter()
        .map(|arg| match arg.as_str() {
            "-scan" | "-stream" | "-new" => format!("-{arg}"),
            _ => arg,
        })
        .collect()
}

fn main() -> ExitCode {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = Args::parse_from(normalize_args(std::env::args()));

    tracing::info!(
        target: "main",
        "### RFXTRX 2 MQTT bridge V{} ###",
        env!("CARGO_PKG_VERSION")
    );

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(target: "main", "Error loading config file {}: {}", args.config.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(target: "main", "failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut serial = SerialConfig::new(config.serial.port.clone());
    if let Some(rate) = config.serial.baud_rate {
        serial = serial.baud_rate(rate);
    }
    let mut rfx = RfxCom::with_serial_config(serial);
    tracing::info!(target: "rfxcom", "Opening RFXCOM on {}", config.serial.port);

    let result = runtime.block_on(async {
        if args.scan || args.stream {
            let mode = if args.scan {
                ScanMode::Scan
            } else {
                ScanMode::Stream
            };
            let scanner = if args.new {
                Scanner::new_only(mode, &config)
            } else {
                Scanner::new(mode)
            };
            rfxtrx2mqtt::scan::run(&mut rfx, scanner).await
        } else {
            rfxtrx2mqtt::bridge::service::run(&config, &mut rfx).await
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(target: "main", "{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::parse_from(normalize_args(args.iter().map(|a| (*a).to_owned())))
    }

    #[test]
    fn test_legacy_flags() {
        let args = parse(&["rfxtrx2mqtt", "-scan", "-new"]);
        assert!(args.scan);
        assert!(args.new);
        assert!(!args.stream);
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn test_long_flags() {
        let args = parse(&["rfxtrx2mqtt", "--stream", "--config", "/etc/rfx.yaml"]);
        assert!(args.stream);
        assert!(!args.scan);
        assert_eq!(args.config, PathBuf::from("/etc/rfx.yaml"));
    }
}
