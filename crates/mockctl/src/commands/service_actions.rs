//! Service action command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Tabled;

use mockctl_core::regenerate::RUNNING_TEXT;
use mockctl_core::{Admin, Record, RecordId, ServiceAction};

use crate::cli::{GlobalOpts, OutputFormat, ServiceActionsArgs, ServiceActionsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ServiceActionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Threshold (ms)")]
    threshold: String,
    #[tabled(rename = "Groups")]
    groups: String,
}

impl From<&ServiceAction> for ServiceActionRow {
    fn from(a: &ServiceAction) -> Self {
        Self {
            id: a.id.to_string(),
            name: a.name.clone(),
            threshold: a.thresholdms.to_string(),
            groups: a.groups.join(", "),
        }
    }
}

fn detail(action: &ServiceAction) -> String {
    let mut pairs: Vec<(&str, String)> = vec![("ID", action.id.to_string())];
    pairs.extend(
        ServiceAction::FIELDS
            .iter()
            .map(|spec| (spec.label, action.field_text(spec.name))),
    );
    output::render_detail(&pairs)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    admin: &Admin,
    args: ServiceActionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ServiceActionsCommand::List(list_args) => {
            let mut list = admin.service_action_list();
            list.activate().await;
            if let Some(err) = list.take_error() {
                return Err(err.into());
            }
            util::apply_list_args(&mut list, &list_args)?;

            let out = output::render_list(
                &global.output,
                list.rows(),
                |a| ServiceActionRow::from(a),
                |a| a.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            if let (OutputFormat::Table, Some(table)) = (&global.output, list.table()) {
                output::print_status(&output::page_footer(table.params()), global.quiet);
            }
            Ok(())
        }

        ServiceActionsCommand::Get { id } => {
            let mut edit = admin.service_action_edit();
            edit.activate(RecordId::new(id)).await;
            if let Some(err) = edit.take_load_error() {
                return Err(not_found_or(err, id));
            }
            let Some(session) = edit.session() else {
                return Err(CliError::Internal("service action was not loaded".into()));
            };
            let out = output::render_single(&global.output, session.working(), detail, |a| {
                a.id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ServiceActionsCommand::Edit { id, fields } => {
            let mut edit = admin.service_action_edit();
            edit.activate(RecordId::new(id)).await;
            if let Some(err) = edit.take_load_error() {
                return Err(not_found_or(err, id));
            }
            util::apply_fields(&mut edit, &fields)?;
            if edit.is_clean() {
                output::print_status("No changes", global.quiet);
                return Ok(());
            }
            edit.save().await?;
            output::print_status(&format!("✓ Service action {id} updated"), global.quiet);
            Ok(())
        }

        ServiceActionsCommand::Regenerate => {
            let mut list = admin.service_action_list();
            let spinner = spinner(global.quiet);

            let result = list.regenerate().await;
            spinner.finish_and_clear();

            let info = list.regenerate_control().info().unwrap_or_default();
            match result {
                Ok(()) => {
                    output::print_status(&format!("✓ {info}"), global.quiet);
                    if let Some(table) = list.table() {
                        output::print_status(
                            &format!("{} service actions", table.total()),
                            global.quiet,
                        );
                    }
                    Ok(())
                }
                Err(err) => {
                    eprintln!("{info}");
                    Err(err.into())
                }
            }
        }
    }
}

/// Spinner on stderr while the server regenerates; hidden when quiet or
/// not attached to a terminal.
fn spinner(quiet: bool) -> ProgressBar {
    if quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(RUNNING_TEXT);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn not_found_or(err: mockctl_core::CoreError, id: i64) -> CliError {
    if err.is_not_found() {
        CliError::NotFound {
            kind: "Service action".into(),
            id: id.to_string(),
            list_command: "service-actions".into(),
        }
    } else {
        err.into()
    }
}
