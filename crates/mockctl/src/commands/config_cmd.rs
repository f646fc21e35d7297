//! Config subcommand handlers.

use dialoguer::{Input, Select};

use mockctl_config::{self as config, Config, Profile};
use mockctl_core::FlagEncoding;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{active_profile_name, profile_names};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Config as TOML for the table view. Profiles come out sorted by name.
fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(cfg)
        .map_or_else(|e| format!("# cannot render config: {e}"), |s| s.trim_end().to_owned())
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(&global.output, &cfg, format_config, |_| {
                "config".into()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("local");
            if cfg.profiles.is_empty() {
                output::print_status("No profiles configured. Run: mockctl config init", global.quiet);
                return Ok(());
            }
            for name in cfg.profiles.keys() {
                let marker = if name == default { " *" } else { "" };
                println!("{name}{marker}");
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: profile_names(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::print_status(&format!("✓ Default profile set to '{name}'"), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("mockctl configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let mut cfg = config::load_config_or_default();

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(active_profile_name(global, &cfg))
        .interact_text()
        .map_err(prompt_err)?;

    let server: String = Input::new()
        .with_prompt("Mock server URL")
        .default("http://localhost:9010".into())
        .validate_with(|input: &String| -> Result<(), String> {
            url::Url::parse(input)
                .map(|_| ())
                .map_err(|e| format!("invalid URL: {e}"))
        })
        .interact_text()
        .map_err(prompt_err)?;

    let group: String = Input::new()
        .with_prompt("Group scope (empty for all groups)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    let encodings = &["yes / no strings", "JSON booleans"];
    let encoding = Select::new()
        .with_prompt("How does the server expect yes/no fields?")
        .items(encodings)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let mut profile = Profile::new(server);
    profile.group = Some(group.trim().to_owned()).filter(|g| !g.is_empty());
    profile.flag_encoding = if encoding == 0 {
        FlagEncoding::YesNo
    } else {
        FlagEncoding::Bool
    };

    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());
    config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: mockctl services list");
    Ok(())
}
