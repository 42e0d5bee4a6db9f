//! Command line interface and the non-interactive commands

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::fmt::Write;
use tracing::info;

use crate::api::CompanyApi;
use crate::config::Config;
use crate::console_tui::ui::truncate_string;
use crate::i18n::{keys, Translate};
use crate::listing::{CompanyListing, ListingView, LoadState};
use crate::models::{BlueTickStatus, CompanyFilter, CompanyId, CompanyListQuery};
use crate::presentation;
use crate::workflow::{BlueTickWorkflow, WorkflowError, WorkflowTarget};

#[derive(Parser, Debug)]
#[command(name = "bluetick-console")]
#[command(about = "Admin console for reviewing company blue tick verification")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Start the interactive console (default)
    Tui {
        /// Open the workflow screen directly: `new` or a company id
        #[arg(long)]
        route: Option<WorkflowTarget>,
    },
    /// Print one page of companies
    List {
        /// Company name search
        #[arg(long)]
        search: Option<String>,
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Rows per page (50, 60, 70 or 80)
        #[arg(long)]
        size: Option<u32>,
        /// accepted, rejected, in-progress, canceled, not-requested, leader or store
        #[arg(long)]
        filter: Option<CompanyFilter>,
    },
    /// Print the blue tick status and history of a company
    Show {
        /// `new` or a company id
        route: WorkflowTarget,
    },
    /// Accept a pending blue tick request
    Confirm { id: i64 },
    /// Reject a pending blue tick request
    Reject {
        id: i64,
        #[arg(long, default_value = "")]
        reason: String,
    },
    /// Cancel an accepted blue tick
    Cancel {
        id: i64,
        #[arg(long, default_value = "")]
        reason: String,
    },
}

/// Run a non-interactive command and return what it prints
pub async fn execute(
    command: &Commands,
    config: &Config,
    api: &dyn CompanyApi,
    t: &dyn Translate,
) -> Result<String> {
    match command {
        Commands::Tui { .. } => bail!("The tui command needs an interactive terminal"),
        Commands::List {
            search,
            page,
            size,
            filter,
        } => {
            let query = CompanyListQuery {
                search: search.clone(),
                page: *page,
                size: size.unwrap_or(config.listing.default_page_size),
                filter: *filter,
            };
            list_companies(query, api, t).await
        }
        Commands::Show { route } => show_blue_tick(*route, api, t).await,
        Commands::Confirm { id } => {
            change_status(CompanyId(*id), BlueTickStatus::Accepted, "", api, t).await
        }
        Commands::Reject { id, reason } => {
            change_status(CompanyId(*id), BlueTickStatus::Rejected, reason, api, t).await
        }
        Commands::Cancel { id, reason } => {
            change_status(CompanyId(*id), BlueTickStatus::Canceled, reason, api, t).await
        }
    }
}

async fn list_companies(
    query: CompanyListQuery,
    api: &dyn CompanyApi,
    t: &dyn Translate,
) -> Result<String> {
    let mut listing = CompanyListing::with_query(query)?;
    listing.load(api).await;

    let mut out = String::new();
    match listing.view() {
        ListingView::Loading => bail!("Company list did not load"),
        ListingView::Failed(error) => bail!("Failed to load companies: {}", error),
        ListingView::Empty => writeln!(out, "{}", t.text(keys::EMPTY_LIST))?,
        ListingView::Table(rows) => {
            writeln!(
                out,
                "{:<8} {:<40} {:<16} {:<10} {:<10}",
                "Id",
                t.text(keys::COMPANY),
                t.text(keys::STATUS),
                t.text(keys::IS_LEADER),
                t.text(keys::IS_STORE)
            )?;
            writeln!(out, "{}", "-".repeat(88))?;
            for company in rows {
                writeln!(
                    out,
                    "{:<8} {} {:<16} {:<10} {:<10}",
                    company.id.0,
                    truncate_string(&company.company_name, 40),
                    t.phrase(presentation::badge(company.blue_tick_status()).label),
                    yes_no(company.verified_for_leader),
                    yes_no(company.verified_for_store)
                )?;
            }
            writeln!(out)?;
            writeln!(
                out,
                "Page {} of {} ({} companies)",
                listing.query().page,
                listing.total_pages(),
                listing.count()
            )?;
        }
    }
    Ok(out)
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

async fn load_workflow(target: WorkflowTarget, api: &dyn CompanyApi) -> Result<BlueTickWorkflow> {
    let mut workflow = BlueTickWorkflow::new(target);
    workflow.refresh(api).await;
    if let LoadState::Failed(error) = workflow.load_state() {
        bail!("Failed to load blue tick: {}", error);
    }
    Ok(workflow)
}

async fn show_blue_tick(
    target: WorkflowTarget,
    api: &dyn CompanyApi,
    t: &dyn Translate,
) -> Result<String> {
    let workflow = load_workflow(target, api).await?;
    let shown = workflow.presentation();

    let mut out = String::new();
    if let Some(name) = &workflow.details().company_name {
        writeln!(out, "{}", name)?;
    }
    writeln!(out, "{}: {}", t.text(keys::STATUS), t.phrase(shown.indicator.label))?;
    for line in shown.title_lines(t) {
        writeln!(out, "{}", line)?;
    }

    let actions: Vec<String> = [shown.confirm, shown.reject]
        .into_iter()
        .flatten()
        .filter(|_| shown.has_title())
        .map(|action| {
            format!(
                "{} ({})",
                t.phrase(action.label),
                match action.target {
                    BlueTickStatus::Accepted => "confirm",
                    BlueTickStatus::Canceled => "cancel",
                    _ => "reject",
                }
            )
        })
        .collect();
    if !actions.is_empty() {
        writeln!(out, "Actions: {}", actions.join(", "))?;
    }

    writeln!(out)?;
    writeln!(out, "{}", t.text(keys::HISTORY))?;
    if workflow.history().is_empty() {
        writeln!(out, "{}", t.phrase(&[keys::EMPTY, keys::REQUEST, keys::LIST]))?;
    } else {
        for entry in workflow.history() {
            writeln!(
                out,
                "{:<17} {:<16} {}",
                entry.display_date(),
                t.phrase(presentation::badge(entry.status).label),
                entry.display_description()
            )?;
        }
    }
    Ok(out)
}

async fn change_status(
    company_id: CompanyId,
    target: BlueTickStatus,
    reason: &str,
    api: &dyn CompanyApi,
    t: &dyn Translate,
) -> Result<String> {
    let mut workflow = load_workflow(WorkflowTarget::Existing(company_id), api).await?;
    let from = workflow.current_status();
    if !presentation::allows_transition(from, target) {
        return Err(WorkflowError::ActionUnavailable { from, to: target }.into());
    }

    if target == BlueTickStatus::Accepted {
        workflow.open_confirm()?;
    } else {
        workflow.open_reject()?;
    }
    workflow.set_reason(reason);
    let status = workflow.submit(api, t).await?;

    info!("Company {} blue tick: {} -> {}", company_id, from, status);
    Ok(format!(
        "Blue tick of company {} changed from {} to {}\n",
        company_id,
        from.label(),
        status.label()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{page_of, FakeApi};
    use crate::i18n::Catalog;

    #[test]
    fn test_parse_commands() {
        let cli = Cli::try_parse_from([
            "bluetick-console",
            "list",
            "--search",
            "acme",
            "--size",
            "60",
            "--filter",
            "in-progress",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::List {
                search: Some("acme".to_string()),
                page: 1,
                size: Some(60),
                filter: Some(CompanyFilter::Status(BlueTickStatus::InProgress)),
            })
        );

        let cli = Cli::try_parse_from(["bluetick-console", "tui", "--route", "new"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Tui {
                route: Some(WorkflowTarget::New)
            })
        );

        assert!(Cli::try_parse_from(["bluetick-console", "show", "abc"]).is_err());
        assert!(Cli::try_parse_from(["bluetick-console"]).unwrap().command.is_none());
    }

    #[tokio::test]
    async fn test_list_prints_table_or_empty() {
        let api = FakeApi::new();
        api.push_page(page_of(2, 2));
        api.push_page(page_of(0, 0));
        let t = Catalog::english();
        let command = Commands::List {
            search: None,
            page: 1,
            size: None,
            filter: None,
        };

        let out = execute(&command, &Config::default(), &api, &t).await.unwrap();
        assert!(out.contains("Company 2"));
        assert!(out.contains("Page 1 of 1 (2 companies)"));

        let out = execute(&command, &Config::default(), &api, &t).await.unwrap();
        assert_eq!(out.trim(), "Empty List");
    }

    #[tokio::test]
    async fn test_show_lists_actions_and_history() {
        let api = FakeApi::with_details(BlueTickStatus::InProgress);
        let t = Catalog::english();

        let command = Commands::Show {
            route: WorkflowTarget::Existing(CompanyId(3)),
        };
        let out = execute(&command, &Config::default(), &api, &t).await.unwrap();
        assert!(out.contains("Acme"));
        assert!(out.contains("Status: Pending"));
        assert!(out.contains("Actions: Confirm (confirm), Reject (reject)"));
        assert!(out.contains("Empty Request List"));
    }

    #[tokio::test]
    async fn test_cancel_requires_reason_and_transition() {
        let api = FakeApi::with_details(BlueTickStatus::Accepted);
        let t = Catalog::english();
        let config = Config::default();

        let err = execute(&Commands::Cancel { id: 3, reason: " ".to_string() }, &config, &api, &t)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "reason: Please Enter Reasons");

        let err = execute(&Commands::Reject { id: 3, reason: "late".to_string() }, &config, &api, &t)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cannot be changed"));
        assert_eq!(api.action_count(), 0);

        let out = execute(&Commands::Cancel { id: 3, reason: "fraud".to_string() }, &config, &api, &t)
            .await
            .unwrap();
        assert_eq!(out, "Blue tick of company 3 changed from Accepted to Canceled\n");
        assert_eq!(api.action_count(), 1);
    }
}
