//! Worker Demo
//!
//! A small job service wrapped in the three filter kinds:
//!
//! - `check_auth` (before) rejects unauthorized dispatches by returning
//!   `false`, halting the run before the endpoint is reached
//! - `time_it` (around) measures how long the rest of the chain takes
//! - `log_call` (after) records that the endpoint completed
//!
//! Two hosts of the same definition are registered: one whose instances
//! carry a token and one whose instances do not, so both the completed and
//! the halted paths are visible in the output.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package worker-demo
//! ```

use std::time::Instant;

use anyhow::Result;
use serde_json::json;
use tracing::info;

use sift::prelude::*;

/// Request-scoped service instance, materialized per dispatch.
struct JobService {
    token: Option<String>,
    queued: Vec<&'static str>,
}

impl JobService {
    fn with_token(token: Option<&str>) -> Self {
        Self {
            token: token.map(str::to_string),
            queued: vec!["reindex", "compact", "vacuum"],
        }
    }
}

/// Builds the shared service definition; the service name distinguishes
/// the two registrations.
fn job_descriptor(name: &str) -> ServiceDescriptor<JobService> {
    ServiceDescriptor::builder(name)
        .endpoint("do_work", |svc: &JobService| {
            info!(jobs = svc.queued.len(), "running queued jobs");
            Ok(json!({ "completed": svc.queued }))
        })
        .endpoint("status", |svc: &JobService| {
            Ok(json!({ "queued": svc.queued.len() }))
        })
        .method("check_auth", |svc: &JobService| {
            Ok(json!(svc.token.is_some()))
        })
        .method("log_call", |svc: &JobService| {
            info!(jobs = svc.queued.len(), "job dispatch finished");
            Ok(Value::Null)
        })
        .around_method("time_it", |_: &JobService, proceed| {
            let started = Instant::now();
            let value = proceed.call()?;
            info!(elapsed_us = started.elapsed().as_micros() as u64, "timed dispatch");
            Ok(value)
        })
        .before_filter("check_auth", FilterOptions::new())
        .around_filter("time_it", FilterOptions::new().only(["do_work"]))
        .after_filter("log_call", FilterOptions::new().except(["status"]))
        .build()
}

fn main() -> Result<()> {
    LoggingBuilder::new()
        .with_level(tracing::Level::DEBUG)
        .init();

    let host = ServiceHost::new();
    host.register(job_descriptor("jobs"), || {
        JobService::with_token(Some("s3cret"))
    })?;
    host.register(job_descriptor("guest-jobs"), || {
        JobService::with_token(None)
    })?;

    match host.dispatch("jobs", "do_work")? {
        Outcome::Completed(value) => info!(%value, "authorized dispatch completed"),
        Outcome::Halted => info!("authorized dispatch halted"),
    }

    // No timing filter applies to `status`, and `log_call` is excluded.
    match host.dispatch("jobs", "status")? {
        Outcome::Completed(value) => info!(%value, "status query completed"),
        Outcome::Halted => info!("status query halted"),
    }

    // The guest instance carries no token: `check_auth` returns false and
    // the endpoint never runs.
    let outcome = host.dispatch("guest-jobs", "do_work")?;
    info!(halted = outcome.is_halted(), "guest dispatch finished");

    Ok(())
}
