use colored::{Color, Colorize};
use serde::Deserialize;

use super::{classify::ErrorBodyShape, models::ProbeOutcome};

pub fn print_probe_outcome(outcome: &ProbeOutcome) {
    match outcome {
        ProbeOutcome::Success {
            status,
            content_type,
            preview,
            body,
            duration_ms,
        } => {
            print_status_line(*status, *duration_ms);
            if let Some(content_type) = content_type {
                println!("{} {}", "Content-Type:".bold(), content_type.dimmed());
            }
            if let Some(count) = result_count(body) {
                println!("{} {}", "Result count:".bold(), count);
            }
            println!("{}", "Preview".bold());
            println!("{}", preview.dimmed());
        }
        ProbeOutcome::UpstreamError {
            status,
            shape,
            preview,
            duration_ms,
            ..
        } => {
            print_status_line(*status, *duration_ms);
            match shape {
                ErrorBodyShape::Structured { message } => {
                    println!("{}", "Upstream returned a structured error.".yellow());
                    println!(
                        "{} {}",
                        "Message:".bold(),
                        message.as_deref().unwrap_or("(no message)")
                    );
                }
                ErrorBodyShape::UnrecognizedJson => {
                    println!(
                        "{}",
                        "Body is valid JSON but not a recognized upstream error shape.".yellow()
                    );
                }
                ErrorBodyShape::NotJson => {
                    println!(
                        "{}",
                        "Body is not valid JSON; the proxy may be returning raw HTML or plain text."
                            .red()
                    );
                }
            }
            println!("{}", "Error body".bold());
            println!("{}", preview.dimmed());
        }
        ProbeOutcome::TransportFailure { reason } => {
            println!("{} {}", "Connection failed:".red().bold(), reason);
            println!("Check that the proxy is deployed and DNS has propagated.");
        }
        ProbeOutcome::UnexpectedFailure { message } => {
            println!("{} {}", "Unexpected failure:".red().bold(), message);
        }
    }
}

fn print_status_line(status: u16, duration_ms: f64) {
    let status_color = if status >= 400 {
        Color::Red
    } else if status >= 300 {
        Color::Yellow
    } else {
        Color::Green
    };

    println!(
        "{} {} {}",
        "Status:".bold(),
        format!("{}", status).color(status_color),
        format!("({:.1} ms)", duration_ms).dimmed()
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSummary {
    result_count: u64,
}

// Search upstreams answer with a JSON object carrying `resultCount`; surface
// it so a glance at the output confirms the proxy passed real results back.
fn result_count(body: &[u8]) -> Option<u64> {
    serde_json::from_slice::<SearchSummary>(body)
        .ok()
        .map(|summary| summary.result_count)
}
