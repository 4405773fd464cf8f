//! `it browse`: line-oriented interactive list

use std::io::Write;

use anyhow::Result;
use it_client::IssueListing;
use it_core::Id;
use it_queries::{FilterDimension, FilterState, SortField, SortState};
use it_views::{render_filter_options, IssueDetailView, IssueListView, ListEvents, TextRenderer};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::context::AppContext;

const HELP: &str = "\
Commands:
  type|severity|priority|status|assignee|creator <id>   toggle a filter value
  unassigned                                           toggle the unassigned filter
  search [text]                                        set the search text (empty clears)
  sort <field>                                         sort by a column, again to reverse
  open <row>                                           show one issue
  filters                                              show available filter values
  clear                                                remove all filters and the search
  refresh                                              reload the list
  help                                                 this text
  quit                                                 leave";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Toggle(FilterDimension, Id),
    ToggleUnassigned,
    Search(String),
    Sort(SortField),
    Open(usize),
    Filters,
    Clear,
    Refresh,
    Help,
    Quit,
}

/// Parse an input line; `Ok(None)` for a blank line
pub fn parse_command(line: &str) -> Result<Option<BrowseCommand>, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "" => return Ok(None),
        "unassigned" => BrowseCommand::ToggleUnassigned,
        "search" | "/" => BrowseCommand::Search(rest.to_string()),
        "sort" => BrowseCommand::Sort(rest.parse()?),
        "open" | "o" => BrowseCommand::Open(parse_number(rest, "row")?),
        "filters" | "f" => BrowseCommand::Filters,
        "clear" => BrowseCommand::Clear,
        "refresh" | "r" => BrowseCommand::Refresh,
        "help" | "h" | "?" => BrowseCommand::Help,
        "quit" | "q" | "exit" => BrowseCommand::Quit,
        other => match other.parse::<FilterDimension>() {
            Ok(dimension) => BrowseCommand::Toggle(dimension, parse_number(rest, "id")?),
            Err(_) => return Err(format!("unknown command {:?}, try \"help\"", other)),
        },
    };
    Ok(Some(command))
}

fn parse_number<T: std::str::FromStr>(text: &str, what: &str) -> Result<T, String> {
    if text.is_empty() {
        return Err(format!("missing {}", what));
    }
    text.parse()
        .map_err(|_| format!("invalid {}: {:?}", what, text))
}

/// Routes list clicks back into the listing
struct Clicks<'a> {
    listing: &'a IssueListing,
    selected: Option<Id>,
}

impl ListEvents for Clicks<'_> {
    fn issue_selected(&mut self, id: Id) {
        self.selected = Some(id);
    }

    fn sort_requested(&mut self, field: SortField) {
        let sort = self.listing.request_sort(field);
        tracing::debug!(field = %sort.field, direction = %sort.direction, "Sort changed");
    }
}

pub async fn run(ctx: &AppContext) -> Result<()> {
    let listing = ctx.listing(FilterState::new(), SortState::default());
    let renderer = ctx.renderer();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut reload = true;

    loop {
        if reload {
            listing.refresh().await;
            print_list(ctx, &listing, renderer);
        }

        print!("> ");
        std::io::stdout().flush().ok();
        let Some(line) = lines.next_line().await? else {
            break;
        };

        reload = match parse_command(&line) {
            Ok(Some(BrowseCommand::Quit)) => break,
            Ok(Some(command)) => apply(ctx, &listing, renderer, command).await,
            Ok(None) => false,
            Err(message) => {
                eprintln!("{}", message);
                false
            }
        };
    }
    Ok(())
}

/// Run one command; true when the list has to be reloaded
async fn apply(ctx: &AppContext, listing: &IssueListing, renderer: TextRenderer, command: BrowseCommand) -> bool {
    match command {
        BrowseCommand::Toggle(dimension, id) => {
            listing.toggle_filter(dimension, id);
            true
        }
        BrowseCommand::ToggleUnassigned => {
            listing.toggle_unassigned();
            true
        }
        BrowseCommand::Search(text) => {
            listing.set_search(text);
            true
        }
        BrowseCommand::Clear => {
            listing.clear_filters();
            true
        }
        BrowseCommand::Refresh => true,
        BrowseCommand::Sort(field) => {
            let snapshot = listing.snapshot();
            let view = IssueListView::new(&snapshot.issues);
            let mut clicks = Clicks { listing, selected: None };
            let clicked = view
                .columns()
                .position_of(field)
                .is_some_and(|index| view.click_header(index, &mut clicks));
            if !clicked {
                listing.request_sort(field);
            }
            true
        }
        BrowseCommand::Open(row) => {
            let snapshot = listing.snapshot();
            let view = IssueListView::new(&snapshot.issues);
            let mut clicks = Clicks { listing, selected: None };
            let opened = row
                .checked_sub(1)
                .is_some_and(|index| view.click_row(index, &mut clicks));
            let Some(id) = clicks.selected.filter(|_| opened) else {
                eprintln!("No row {}", row);
                return false;
            };
            match listing.issue_detail(id).await {
                Ok(issue) => {
                    let detail = IssueDetailView::new(&issue, &snapshot.users, renderer, ctx.timestamp_format());
                    println!("{}", detail.render());
                }
                Err(e) => {
                    tracing::error!(issue_id = id, error = %e, "Error fetching issue detail");
                    eprintln!("Could not load issue #{}. Please try again later.", id);
                }
            }
            false
        }
        BrowseCommand::Filters => {
            let snapshot = listing.snapshot();
            print!(
                "{}",
                render_filter_options(&renderer, &snapshot.taxonomies, &snapshot.users, &listing.filters())
            );
            false
        }
        BrowseCommand::Help => {
            println!("{}", HELP);
            false
        }
        BrowseCommand::Quit => false,
    }
}

fn print_list(ctx: &AppContext, listing: &IssueListing, renderer: TextRenderer) {
    let snapshot = listing.snapshot();
    print!(
        "{}",
        super::render_snapshot(renderer.numbered(), &snapshot, listing.sort(), ctx.timestamp_format())
    );
    if let Some(error) = &snapshot.error {
        eprintln!("{}", error);
    }

    let filters = listing.filters();
    let mut status = format!("{} issue(s)", snapshot.issues.len());
    if filters.has_active_filters() {
        status.push_str(", filtered");
    }
    if !filters.search().is_empty() {
        status.push_str(&format!(", search {:?}", filters.search()));
    }
    println!("{}  (\"help\" for commands)", status);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use it_client::{MockTrackerGateway, TrackerGateway};
    use it_queries::SortDirection;

    #[test]
    fn test_parse_filter_toggles() {
        assert_eq!(
            parse_command("type 2"),
            Ok(Some(BrowseCommand::Toggle(FilterDimension::Type, 2)))
        );
        assert_eq!(
            parse_command("  Assignee   7 "),
            Ok(Some(BrowseCommand::Toggle(FilterDimension::Assignee, 7)))
        );
        assert!(parse_command("status").is_err());
        assert!(parse_command("status x").is_err());
    }

    #[test]
    fn test_parse_search_keeps_inner_spaces() {
        assert_eq!(
            parse_command("search login  button"),
            Ok(Some(BrowseCommand::Search("login  button".into())))
        );
        assert_eq!(parse_command("search"), Ok(Some(BrowseCommand::Search(String::new()))));
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("sort updated"), Ok(Some(BrowseCommand::Sort(SortField::UpdatedAt))));
        assert_eq!(parse_command("open 3"), Ok(Some(BrowseCommand::Open(3))));
        assert_eq!(parse_command("q"), Ok(Some(BrowseCommand::Quit)));
        assert_eq!(parse_command("unassigned"), Ok(Some(BrowseCommand::ToggleUnassigned)));
        assert!(parse_command("sort color").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[test]
    fn test_header_click_toggles_sort() {
        let gateway: Arc<dyn TrackerGateway> = Arc::new(MockTrackerGateway::new());
        let listing = IssueListing::new(gateway);
        let issues = vec![it_models::Issue::new(1, "One")];
        let view = IssueListView::new(&issues);
        let index = view.columns().position_of(SortField::Title).unwrap();

        let mut clicks = Clicks { listing: &listing, selected: None };
        view.click_header(index, &mut clicks);
        assert_eq!(listing.sort(), SortState::new(SortField::Title, SortDirection::Asc));
        view.click_header(index, &mut clicks);
        assert_eq!(listing.sort(), SortState::new(SortField::Title, SortDirection::Desc));

        assert!(view.click_row(0, &mut clicks));
        assert_eq!(clicks.selected, Some(1));
    }
}
