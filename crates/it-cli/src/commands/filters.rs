//! `it filters`

use anyhow::{Context, Result};
use it_client::TrackerGateway;
use it_models::{Taxonomies, TaxonomyKind};
use it_queries::FilterState;
use it_views::render_filter_options;

use crate::context::AppContext;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let gateway = &ctx.gateway;
    let (types, severities, priorities, statuses, users) = tokio::try_join!(
        gateway.list_taxonomy(TaxonomyKind::Type),
        gateway.list_taxonomy(TaxonomyKind::Severity),
        gateway.list_taxonomy(TaxonomyKind::Priority),
        gateway.list_taxonomy(TaxonomyKind::Status),
        gateway.list_users(),
    )
    .context("Failed to load filter values")?;

    let mut taxonomies = Taxonomies::default();
    taxonomies.set(TaxonomyKind::Type, types);
    taxonomies.set(TaxonomyKind::Severity, severities);
    taxonomies.set(TaxonomyKind::Priority, priorities);
    taxonomies.set(TaxonomyKind::Status, statuses);

    print!(
        "{}",
        render_filter_options(&ctx.renderer(), &taxonomies, &users, &FilterState::new())
    );
    Ok(())
}
