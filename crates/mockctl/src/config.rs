//! Flag-aware resolution of the active profile into a `ClientConfig`.
//!
//! Precedence: command-line flag > `MOCKCTL_*` environment > profile >
//! `[defaults]`. File loading itself lives in `mockctl-config`.

use std::time::Duration;

use mockctl_config::{Config, Profile, load_config_or_default, profile_to_client_config};
use mockctl_core::{ClientConfig, FlagEncoding, TlsVerification};

use crate::cli::{FlagEncodingArg, GlobalOpts};
use crate::error::CliError;

impl From<FlagEncodingArg> for FlagEncoding {
    fn from(arg: FlagEncodingArg) -> Self {
        match arg {
            FlagEncodingArg::YesNo => Self::YesNo,
            FlagEncodingArg::Bool => Self::Bool,
        }
    }
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "local".into())
}

/// Build the connection settings for this invocation.
pub fn resolve_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = load_config_or_default();
    resolve_with(&cfg, global)
}

pub(crate) fn resolve_with(cfg: &Config, global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let profile = match (cfg.profiles.get(&profile_name), &global.server) {
        (Some(profile), _) => profile.clone(),
        (None, Some(server)) => Profile::new(server.clone()),
        // An explicit --profile that does not exist is an error even
        // when --server is absent.
        (None, None) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: profile_names(cfg),
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: mockctl_config::config_path().display().to_string(),
            });
        }
    };

    let mut config = profile_to_client_config(&profile, &cfg.defaults)?;
    apply_overrides(&mut config, global)?;
    Ok(config)
}

fn apply_overrides(config: &mut ClientConfig, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(server) = &global.server {
        config.url = server.parse().map_err(|_| CliError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {server}"),
        })?;
    }
    if let Some(group) = &global.group {
        config.group = Some(group.clone()).filter(|g| !g.is_empty());
    }
    if global.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(encoding) = global.flag_encoding {
        config.flag_encoding = encoding.into();
    }
    Ok(())
}

pub(crate) fn profile_names(cfg: &Config) -> String {
    let names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["mockctl"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["config", "path"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn sample() -> Config {
        let mut cfg = Config::default();
        let mut profile = Profile::new("http://localhost:9010");
        profile.group = Some("billing".into());
        cfg.profiles.insert("local".into(), profile);
        cfg.default_profile = Some("local".into());
        cfg
    }

    #[test]
    fn default_profile_is_used() {
        let config = resolve_with(&sample(), &global(&[])).unwrap();
        assert_eq!(config.url.as_str(), "http://localhost:9010/");
        assert_eq!(config.group.as_deref(), Some("billing"));
    }

    #[test]
    fn flags_override_profile() {
        let config = resolve_with(
            &sample(),
            &global(&["--group", "ops", "-k", "--timeout", "3", "--flag-encoding", "bool"]),
        )
        .unwrap();
        assert_eq!(config.group.as_deref(), Some("ops"));
        assert_eq!(config.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.flag_encoding, FlagEncoding::Bool);
    }

    #[test]
    fn server_flag_works_without_config() {
        let config =
            resolve_with(&Config::default(), &global(&["--server", "http://mocks:8080"])).unwrap();
        assert_eq!(config.url.as_str(), "http://mocks:8080/");
        assert_eq!(config.group, None);
    }

    #[test]
    fn empty_group_means_all() {
        let config = resolve_with(&sample(), &global(&["--group", ""])).unwrap();
        assert_eq!(config.group, None);
    }

    #[test]
    fn missing_profile_is_reported() {
        let err = resolve_with(&sample(), &global(&["--profile", "prod"])).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "prod");
                assert_eq!(available, "local");
            }
            other => panic!("expected ProfileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn nothing_configured() {
        let err = resolve_with(&Config::default(), &global(&[])).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }
}
