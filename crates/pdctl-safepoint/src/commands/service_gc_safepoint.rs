//! Service GC safepoint command - list and delete service safepoints.

use std::io::Write;

use anyhow::Result;
use clap::{Args, CommandFactory, Subcommand};
use reqwest::Method;
use reqwest::header::HeaderMap;

use crate::client::{HttpDispatcher, RequestDispatcher};
use crate::error::SafepointError;
use crate::safepoint::{
    SERVICE_GC_SAFEPOINT_PREFIX, ServiceSafepointListing, service_safepoint_path,
};
use crate::{Config, OutputFormat};

/// Arguments for the service-gc-safepoint command.
#[derive(Debug, Args)]
pub struct ServiceGcSafepointArgs {
    /// Optional subcommand; without one, safepoints are listed.
    #[command(subcommand)]
    pub command: Option<ServiceGcSafepointCommand>,
}

/// Subcommands of service-gc-safepoint.
#[derive(Debug, Subcommand)]
pub enum ServiceGcSafepointCommand {
    /// Delete a service GC safepoint.
    #[command(hide = true, override_usage = "pdctl service-gc-safepoint delete <service ID>")]
    Delete(DeleteArgs),
}

/// Arguments for the delete subcommand.
///
/// The argument count is checked by [`delete`] rather than by clap so that a
/// wrong count prints usage instead of failing the process.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Service ID whose safepoint is deleted.
    #[arg(value_name = "SERVICE_ID", num_args = 0.., allow_hyphen_values = true)]
    pub service_ids: Vec<String>,
}

/// Result of a delete invocation that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The coordinator accepted the delete; holds the raw response body.
    Deleted(String),
    /// The argument count was wrong and no request was sent.
    Usage,
}

/// Execute the service-gc-safepoint command.
///
/// Operation failures are reported on stdout and do not fail the process.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed or stdout
/// cannot be written.
pub async fn execute(args: ServiceGcSafepointArgs, config: &Config) -> Result<()> {
    let dispatcher = HttpDispatcher::new(config)?;
    let mut out = std::io::stdout();
    run(args, &config.format, &dispatcher, &mut out).await
}

/// Runs the command against `dispatcher`, writing all output to `out`.
///
/// # Errors
///
/// Returns an error only if `out` cannot be written.
pub async fn run<W: Write>(
    args: ServiceGcSafepointArgs,
    format: &OutputFormat,
    dispatcher: &dyn RequestDispatcher,
    out: &mut W,
) -> Result<()> {
    match args.command {
        None => {
            let rendered = match format {
                OutputFormat::Json => list(dispatcher).await,
                OutputFormat::Table => fetch_sorted(dispatcher).await.map(|l| render_table(&l)),
            };
            match rendered {
                Ok(text) => writeln!(out, "{text}")?,
                Err(err) => writeln!(out, "{err}")?,
            }
        }
        Some(ServiceGcSafepointCommand::Delete(delete_args)) => {
            match delete(dispatcher, &delete_args.service_ids).await {
                Ok(DeleteOutcome::Deleted(body)) => writeln!(out, "{body}")?,
                Ok(DeleteOutcome::Usage) => write!(out, "{}", delete_usage())?,
                Err(err) => writeln!(out, "{err}")?,
            }
        }
    }
    Ok(())
}

/// Fetches all service safepoints and returns them as indented JSON, sorted
/// by safepoint ascending.
///
/// # Errors
///
/// Returns an error if the request fails or the body cannot be decoded or
/// re-encoded.
pub async fn list(dispatcher: &dyn RequestDispatcher) -> Result<String, SafepointError> {
    let listing = fetch_sorted(dispatcher).await?;
    serde_json::to_string_pretty(&listing).map_err(SafepointError::Marshal)
}

/// Fetches all service safepoints and sorts them by safepoint ascending.
///
/// # Errors
///
/// Returns an error if the request fails or the body cannot be decoded.
pub async fn fetch_sorted(
    dispatcher: &dyn RequestDispatcher,
) -> Result<ServiceSafepointListing, SafepointError> {
    let body = dispatcher
        .do_request(SERVICE_GC_SAFEPOINT_PREFIX, Method::GET, HeaderMap::new())
        .await
        .map_err(SafepointError::Get)?;

    let mut listing: ServiceSafepointListing =
        serde_json::from_str(&body).map_err(SafepointError::Unmarshal)?;
    tracing::debug!(
        entries = listing.service_gc_safepoints.len(),
        gc_safe_point = listing.gc_safe_point,
        "decoded service GC safepoints"
    );

    listing.sort_by_safe_point();
    Ok(listing)
}

/// Deletes the safepoint of the single service named in `args`.
///
/// Any argument count other than one yields [`DeleteOutcome::Usage`] without
/// contacting the coordinator.
///
/// # Errors
///
/// Returns an error if the delete request fails.
pub async fn delete(
    dispatcher: &dyn RequestDispatcher,
    args: &[String],
) -> Result<DeleteOutcome, SafepointError> {
    let [service_id] = args else {
        return Ok(DeleteOutcome::Usage);
    };

    let path = service_safepoint_path(service_id);
    let body = dispatcher
        .do_request(&path, Method::DELETE, HeaderMap::new())
        .await
        .map_err(SafepointError::Delete)?;

    Ok(DeleteOutcome::Deleted(body))
}

fn delete_usage() -> String {
    let mut cli = crate::Cli::command();
    cli.build();
    cli.find_subcommand_mut("service-gc-safepoint")
        .and_then(|cmd| cmd.find_subcommand_mut("delete"))
        .map(|cmd| cmd.render_help().to_string())
        .unwrap_or_default()
}

fn render_table(listing: &ServiceSafepointListing) -> String {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct SafepointRow {
        #[tabled(rename = "Service ID")]
        service_id: String,
        #[tabled(rename = "Safe Point")]
        safe_point: u64,
        #[tabled(rename = "Expired At")]
        expired_at: String,
    }

    let rows: Vec<_> = listing
        .service_gc_safepoints
        .iter()
        .map(|sp| SafepointRow {
            service_id: sp.service_id.clone(),
            safe_point: sp.safe_point,
            expired_at: format_expired_at(sp.expired_at),
        })
        .collect();

    format!(
        "{}\nGC safe point: {}",
        Table::new(rows),
        listing.gc_safe_point
    )
}

fn format_expired_at(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0).map_or_else(
        || secs.to_string(),
        |ts| ts.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}
