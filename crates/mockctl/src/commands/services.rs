//! Service command handlers.

use tabled::Tabled;

use mockctl_core::{Admin, EditController, Record, RecordId, Service, ServiceForm};

use crate::cli::{GlobalOpts, ListArgs, OutputFormat, ServicesArgs, ServicesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    type_request: String,
    #[tabled(rename = "Local target")]
    local_target: String,
    #[tabled(rename = "Remote target")]
    remote_target: String,
    #[tabled(rename = "Timeout (ms)")]
    timeout: String,
    #[tabled(rename = "Mock")]
    use_mock_group: String,
}

impl ServiceRow {
    fn new(s: &Service, color: bool) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name.clone(),
            type_request: s.type_request.clone(),
            local_target: s.local_target.clone(),
            remote_target: s.remote_target.clone(),
            timeout: s.timeoutms.to_string(),
            use_mock_group: output::flag_cell(s.use_mock_group, color),
        }
    }
}

/// Field-by-field view of a service form.
fn detail(form: &ServiceForm, service: &Service) -> String {
    let mut pairs: Vec<(&str, String)> = vec![("ID", service.id.to_string())];
    pairs.extend(
        Service::FIELDS
            .iter()
            .map(|spec| (spec.label, service.field_text(spec.name))),
    );

    let reference = form.reference();
    let environment = reference
        .selected_environment()
        .map(|env| env.name.clone())
        .or_else(|| service.environment_name.clone())
        .unwrap_or_default();
    let mock_group = reference.selected_mock_group().map_or_else(
        || service.mock_group_id.map(|id| id.to_string()).unwrap_or_default(),
        |group| format!("{} ({})", group.name, group.id),
    );
    pairs.push(("Environment", environment));
    pairs.push(("Mock group", mock_group));
    if let Some(url) = form.proxy_url() {
        pairs.push(("Proxy URL", url));
    }
    output::render_detail(&pairs)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(admin: &Admin, args: ServicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let scope = admin.group().map(str::to_owned);

    match args.command {
        ServicesCommand::List(list) => list_services(admin, scope, &list, global).await,

        ServicesCommand::Get { id } => {
            let mut form = admin.service_edit(scope);
            form.activate(RecordId::new(id)).await;
            if let Some(err) = form.take_load_error() {
                return Err(not_found_or(err, id));
            }
            let Some(session) = form.session() else {
                return Err(CliError::Internal("service was not loaded".into()));
            };
            let service = session.working();
            let out = output::render_single(
                &global.output,
                service,
                |s| detail(&form, s),
                |s| s.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ServicesCommand::New {
            name,
            fields,
            mock_group,
            environment,
        } => {
            let mut form = admin.service_new(scope);
            form.activate().await;

            form.set_field("name", &name)?;
            let edit: &mut EditController<Service> = &mut form;
            util::apply_fields(edit, &fields)?;
            select_options(&mut form, mock_group, environment.as_deref())?;

            form.save().await?;
            output::print_status(&format!("✓ Service '{name}' created"), global.quiet);
            Ok(())
        }

        ServicesCommand::Edit {
            id,
            fields,
            mock_group,
            environment,
        } => {
            let mut form = admin.service_edit(scope);
            form.activate(RecordId::new(id)).await;
            if let Some(err) = form.take_load_error() {
                return Err(not_found_or(err, id));
            }

            let edit: &mut EditController<Service> = &mut form;
            util::apply_fields(edit, &fields)?;
            select_options(&mut form, mock_group, environment.as_deref())?;

            if form.is_clean() {
                output::print_status("No changes", global.quiet);
                return Ok(());
            }
            form.save().await?;
            output::print_status(&format!("✓ Service {id} updated"), global.quiet);
            Ok(())
        }

        ServicesCommand::Delete { id } => {
            if !util::confirm(&format!("Delete service {id}?"), global.yes)? {
                return Ok(());
            }
            let mut form = admin.service_edit(scope);
            form.activate(RecordId::new(id)).await;
            if let Some(err) = form.take_load_error() {
                return Err(not_found_or(err, id));
            }
            form.destroy().await?;
            output::print_status(&format!("✓ Service {id} deleted"), global.quiet);
            Ok(())
        }
    }
}

async fn list_services(
    admin: &Admin,
    scope: Option<String>,
    args: &ListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut list = admin.service_list(scope);
    list.activate().await;
    if let Some(err) = list.take_error() {
        return Err(err.into());
    }
    util::apply_list_args(&mut list, args)?;

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        list.rows(),
        |s| ServiceRow::new(s, color),
        |s| s.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);

    if let (OutputFormat::Table, Some(table)) = (&global.output, list.table()) {
        output::print_status(&output::page_footer(table.params()), global.quiet);
    }
    Ok(())
}

fn select_options(
    form: &mut ServiceForm,
    mock_group: Option<i64>,
    environment: Option<&str>,
) -> Result<(), CliError> {
    if let Some(name) = environment {
        form.select_environment_named(name)?;
    }
    if let Some(id) = mock_group {
        form.select_mock_group_id(RecordId::new(id))?;
    }
    Ok(())
}

fn not_found_or(err: mockctl_core::CoreError, id: i64) -> CliError {
    if err.is_not_found() {
        CliError::NotFound {
            kind: "Service".into(),
            id: id.to_string(),
            list_command: "services".into(),
        }
    } else {
        err.into()
    }
}
