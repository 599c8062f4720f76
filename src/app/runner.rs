use std::sync::Arc;

use tracing::{error, info};

use crate::args::{OutputFormat, TesterArgs};
use crate::error::{AppError, AppResult, MetricsError, ValidationError};
use crate::fetcher::{Fetcher, RunConfig};
use crate::http::{ClientSettings, HttpExecutor, build_client, parse_target};

use super::{export, report};

/// Runs one load test from fully resolved arguments and prints its report.
pub(crate) async fn run_local(args: &TesterArgs) -> AppResult<()> {
    let Some(raw_url) = args.url.as_deref() else {
        error!("Missing URL (set --url or provide in config).");
        return Err(AppError::validation(ValidationError::MissingUrl));
    };
    let target = parse_target(raw_url)?;

    let client = build_client(&ClientSettings::from(args))?;
    let executor = Arc::new(HttpExecutor::new(client));
    let config = RunConfig::new(target, args.requests, args.concurrent);
    let mut fetcher = Fetcher::new(config, executor);

    fetcher.run().await?;
    let summary = fetcher.summary()?;
    let responses = fetcher.responses()?;
    info!(
        "Completed {} requests ({} failed)",
        summary.total_requests, summary.failed_requests
    );

    if args.display {
        let lines = report::display_lines(responses);
        // Keep stdout a single JSON document in json mode.
        if args.output_format == OutputFormat::Json {
            for line in lines {
                eprintln!("{}", line);
            }
        } else {
            for line in lines {
                println!("{}", line);
            }
        }
    }

    match args.output_format {
        OutputFormat::Text => {
            let lines = report::summary_lines(
                &summary,
                fetcher.config().target().as_str(),
                args.concurrent.get(),
            );
            for line in lines {
                println!("{}", line);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report::summary_json(&summary))?;
            println!("{}", json);
        }
    }

    if let Some(path) = args.export_csv.as_deref() {
        export::export_csv(path, responses)
            .await
            .map_err(|err| MetricsError::Io {
                context: "CSV export",
                source: err,
            })?;
        info!("Exported {} responses to {}", responses.len(), path);
    }

    if let Some(path) = args.export_json.as_deref() {
        export::export_json(path, &summary, responses)
            .await
            .map_err(|err| MetricsError::Io {
                context: "JSON export",
                source: err,
            })?;
        info!("Exported summary to {}", path);
    }

    Ok(())
}
