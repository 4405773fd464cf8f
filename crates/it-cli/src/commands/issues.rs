//! `it issues`

use anyhow::{bail, Result};
use clap::Args;
use it_client::{RefreshOutcome, LOAD_FAILED_MESSAGE};
use it_core::Id;
use it_queries::{FilterDimension, FilterState, SortDirection, SortField, SortState};
use serde_json::json;

use crate::context::AppContext;

#[derive(Args, Debug, Default)]
pub struct IssuesArgs {
    /// Issue type id (repeatable)
    #[arg(long = "type", value_name = "ID")]
    pub types: Vec<Id>,

    /// Severity id (repeatable)
    #[arg(long = "severity", value_name = "ID")]
    pub severities: Vec<Id>,

    /// Priority id (repeatable)
    #[arg(long = "priority", value_name = "ID")]
    pub priorities: Vec<Id>,

    /// Status id (repeatable)
    #[arg(long = "status", value_name = "ID")]
    pub statuses: Vec<Id>,

    /// Assignee user id (repeatable)
    #[arg(long = "assignee", value_name = "ID")]
    pub assignees: Vec<Id>,

    /// Creator user id (repeatable)
    #[arg(long = "creator", value_name = "ID")]
    pub creators: Vec<Id>,

    /// Only issues without an assignee
    #[arg(long)]
    pub unassigned: bool,

    /// Free-text search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort field (title, type, severity, priority, status, updated_at, assigned_to_id)
    #[arg(long)]
    pub sort: Option<SortField>,

    /// Sort direction (asc, desc)
    #[arg(long)]
    pub direction: Option<SortDirection>,

    /// Print the query and issues as JSON
    #[arg(long)]
    pub json: bool,
}

impl IssuesArgs {
    pub fn filter_state(&self) -> FilterState {
        let mut filters = FilterState::new();
        let dimensions = [
            (FilterDimension::Type, &self.types),
            (FilterDimension::Severity, &self.severities),
            (FilterDimension::Priority, &self.priorities),
            (FilterDimension::Status, &self.statuses),
            (FilterDimension::Assignee, &self.assignees),
            (FilterDimension::Creator, &self.creators),
        ];
        for (dimension, ids) in dimensions {
            for &id in ids {
                if !filters.is_selected(dimension, id) {
                    filters.toggle(dimension, id);
                }
            }
        }
        if let Some(search) = &self.search {
            filters.set_search(search.clone());
        }
        filters.set_unassigned(self.unassigned);
        filters
    }

    /// `--direction` alone flips the default sort
    pub fn sort_state(&self) -> SortState {
        let default = SortState::default();
        match (self.sort, self.direction) {
            (Some(field), direction) => SortState::new(field, direction.unwrap_or_default()),
            (None, Some(direction)) => SortState::new(default.field, direction),
            (None, None) => default,
        }
    }
}

pub async fn run(ctx: &AppContext, args: IssuesArgs) -> Result<()> {
    let listing = ctx.listing(args.filter_state(), args.sort_state());
    let outcome = listing.refresh().await;
    let snapshot = listing.snapshot();

    if args.json {
        let out = json!({
            "params": listing.params().to_json(),
            "issues": snapshot.issues,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!(
            "{}",
            super::render_snapshot(ctx.renderer(), &snapshot, listing.sort(), ctx.timestamp_format())
        );
    }

    // Reported once, through the error returned from main
    match outcome {
        RefreshOutcome::Failed => bail!(LOAD_FAILED_MESSAGE),
        _ => Ok(()),
    }
}
