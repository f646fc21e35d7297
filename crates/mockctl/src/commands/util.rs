//! Shared helpers for command handlers.

use std::io::IsTerminal;

use mockctl_core::{EditController, ListController, Record, SortSpec, TableView};

use crate::cli::{FieldArgs, ListArgs};
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.to_owned(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Split a `FIELD=VALUE` assignment.
pub fn parse_assignment(raw: &str) -> Result<(&str, &str), CliError> {
    match raw.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => Ok((field.trim(), value)),
        _ => Err(CliError::Validation {
            field: "set".into(),
            reason: format!("expected FIELD=VALUE, got {raw:?}"),
        }),
    }
}

/// Apply every `--set` assignment to the controller's working copy.
pub fn apply_fields<R: Record>(
    edit: &mut EditController<R>,
    fields: &FieldArgs,
) -> Result<(), CliError> {
    for raw in &fields.sets {
        let (field, value) = parse_assignment(raw)?;
        edit.set_field(field, value)?;
    }
    Ok(())
}

/// Apply paging, sort and filter flags to a loaded list.
pub fn apply_list_args<R: Record>(
    list: &mut ListController<R>,
    args: &ListArgs,
) -> Result<(), CliError> {
    let sorting: SortSpec = args.sort.parse::<SortSpec>().map_err(|e| CliError::Validation {
        field: "sort".into(),
        reason: e.to_string(),
    })?;
    if !R::COLUMNS.contains(&sorting.field.as_str())
        && !R::FIELDS.iter().any(|spec| spec.name == sorting.field)
        && sorting.field != "id"
    {
        return Err(CliError::Validation {
            field: "sort".into(),
            reason: format!("{} has no field {:?}", R::KIND, sorting.field),
        });
    }

    list.set_filter(args.filter.clone());
    if let Some(table) = list.table_mut() {
        configure_table(table, args, sorting);
    }
    Ok(())
}

fn configure_table<R: Record>(table: &mut TableView<R>, args: &ListArgs, sorting: SortSpec) {
    table.set_sorting(Some(sorting));
    if args.all {
        table.set_count(table.total().max(1));
        table.set_page(1);
    } else {
        table.set_count(args.count);
        table.set_page(args.page);
    }
}
