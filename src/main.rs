use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use proxyprobe::probe::{build_url, print_probe_outcome, run_probe, ProbeConfig};

#[derive(Parser, Debug)]
#[command(
    name = "proxyprobe",
    version,
    about = "One-shot smoke probe for proxy deployments",
    disable_help_subcommand = true
)]
struct Cli {
    /// Proxy base URL to probe
    #[arg(value_name = "PROXY_URL")]
    proxy: String,

    /// Forward this target URL through the proxy's `url` query parameter
    #[arg(short, long, value_name = "URL", conflicts_with = "param")]
    forward: Option<String>,

    /// Append a query parameter to the proxy URL (repeatable)
    #[arg(short = 'q', long = "param", value_name = "KEY=VALUE")]
    param: Vec<String>,

    /// Send a request header (repeatable)
    #[arg(short = 'H', long = "header", value_name = "NAME:VALUE")]
    header: Vec<String>,

    /// Preview at most N characters of the response body
    #[arg(short, long, value_name = "CHARS")]
    preview: Option<usize>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = probe_config(&cli)?;

    let url = build_url(&config).context("building probe url")?;
    println!("{} {}", "Probing".bold(), url.as_str().cyan());

    let outcome = run_probe(&config);
    print_probe_outcome(&outcome);

    Ok(if outcome.is_fatal() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn probe_config(cli: &Cli) -> Result<ProbeConfig> {
    let mut config = match &cli.forward {
        Some(target) => ProbeConfig::forward(&cli.proxy, target),
        None => {
            let params = cli
                .param
                .iter()
                .map(|raw| parse_param(raw))
                .collect::<Result<Vec<_>>>()?;
            ProbeConfig::query(&cli.proxy, params)
        }
    };

    for raw in &cli.header {
        let (name, value) = parse_header(raw)?;
        config = config.with_header(name, value);
    }

    if let Some(chars) = cli.preview {
        config = config.with_preview_chars(chars);
    }

    Ok(config)
}

fn parse_param(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("invalid query parameter {raw:?}, expected KEY=VALUE"))?;
    Ok((key.to_string(), value.to_string()))
}

fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .with_context(|| format!("invalid header {raw:?}, expected NAME:VALUE"))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}
