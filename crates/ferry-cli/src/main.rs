use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use ferry_core::{Config, StorageKind};
use ferry_transfer::{
    HadoopShell, SessionParams, StorageLocation, TransferAdapter, TransferOutcome, TransferRequest,
};

#[derive(Parser, Debug)]
#[command(name = "ferry")]
#[command(about = "Move a single artifact between storage locations")]
struct Args {
    /// Source location: a local directory, s3://bucket/prefix,
    /// gs://bucket/prefix or hdfs://nameservice/dir
    #[arg(long, value_name = "LOCATION")]
    source: StorageLocation,

    /// Target location, same forms as --source
    #[arg(long, value_name = "LOCATION")]
    target: StorageLocation,

    /// Name of the artifact file to move
    #[arg(long, value_name = "NAME")]
    filename: String,

    /// Replace the target file if it already exists
    #[arg(long)]
    overwrite: bool,

    /// Delete the source artifact after the copy is confirmed
    #[arg(long)]
    delete_source: bool,

    /// Backend session parameter, repeatable (e.g. region=eu-west-1)
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_key_val)]
    session_param: Vec<(String, String)>,

    /// Build a fresh backend session for this call instead of sharing one
    #[arg(long)]
    no_session_reuse: bool,

    /// Output format: json or text (default: text)
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))
}

/// Session parameters for the object-store side of the route: configured
/// defaults first, explicit flags on top.
fn session_params(args: &Args, config: &Config) -> SessionParams {
    let mut params = SessionParams::new();
    let object_kind = [args.source.kind(), args.target.kind()]
        .into_iter()
        .find(|kind| kind.is_object_store());
    match object_kind {
        Some(StorageKind::S3) => {
            if let Some(region) = config.s3_region() {
                params.insert("region", region);
            }
            if let Some(endpoint) = config.s3_endpoint() {
                params.insert("endpoint", endpoint);
            }
        }
        Some(StorageKind::Gcs) => {
            if let Some(account) = config.gcs_service_account() {
                params.insert("service_account", account);
            }
        }
        _ => {}
    }
    for (key, value) in &args.session_param {
        params.insert(key.as_str(), value.as_str());
    }
    params
}

fn print_text(args: &Args, outcome: &TransferOutcome) {
    if outcome.skipped {
        println!(
            "Skipped: {} already exists and --overwrite is off",
            outcome.destination
        );
    } else {
        match outcome.bytes {
            Some(bytes) => println!(
                "Copied {} -> {} ({} bytes)",
                args.filename, outcome.destination, bytes
            ),
            None => println!("Copied {} -> {}", args.filename, outcome.destination),
        }
    }
    if outcome.source_deleted {
        println!("Source deleted");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    tracing::debug!(
        environment = %config.environment(),
        is_production = config.is_production(),
        "Environment configuration loaded"
    );

    let reuse = !args.no_session_reuse && config.session_reuse();
    let request = TransferRequest::new(
        args.source.clone(),
        args.target.clone(),
        args.filename.clone(),
    )
    .with_overwrite(args.overwrite)
    .with_delete_source(args.delete_source)
    .with_session_params(session_params(&args, &config))
    .with_session_reuse(reuse);

    let adapter =
        TransferAdapter::new().with_hdfs_shell(Arc::new(HadoopShell::new(config.hadoop_bin())));

    let outcome = adapter.transfer(&request).await?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&outcome)?),
        _ => print_text(&args, &outcome),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_format_is_rejected_at_parse_time() {
        let result = Args::try_parse_from([
            "ferry",
            "--source",
            "/tmp/a",
            "--target",
            "/tmp/b",
            "--filename",
            "model.bin",
            "--format",
            "xml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_known_formats_parse() {
        for format in ["text", "json"] {
            let args = Args::try_parse_from([
                "ferry",
                "--source",
                "/tmp/a",
                "--target",
                "/tmp/b",
                "--filename",
                "model.bin",
                "--format",
                format,
            ])
            .unwrap();
            assert_eq!(args.format, format);
        }
    }

    #[test]
    fn test_format_defaults_to_text() {
        let args = Args::try_parse_from([
            "ferry",
            "--source",
            "/tmp/a",
            "--target",
            "/tmp/b",
            "--filename",
            "model.bin",
        ])
        .unwrap();
        assert_eq!(args.format, "text");
    }
}
