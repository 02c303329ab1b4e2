// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;

use anyhow::{Context, Result, anyhow, bail};
use chatsum_api::Client;
use chatsum_app::{Orchestrator, Route, SettingsStore};
use chatsum_db::Store;
use config::Config;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const CHECK_TIMEOUT: Duration = Duration::from_secs(30);

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `chatsum --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;
    logging::init(config.log_level(), config.log_file().as_deref());

    let db_path = config.db_path()?;
    let store = Store::open(&db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [storage].db_path or CHATSUM_DB_PATH",
            db_path.display()
        )
    })?;
    store.bootstrap()?;
    let settings = SettingsStore::load(store);

    let timeout = config.api_timeout()?;
    let client = Client::new(config.api_base_url(), timeout).with_context(|| {
        format!(
            "invalid [api] config in {}; fix base_url/timeout values",
            options.config_path.display()
        )
    })?;

    let route = Route::parse(options.route.as_deref().unwrap_or("/"));
    tracing::info!(route = %route, base_url = client.base_url(), "starting session");
    let mut session = Orchestrator::start(Arc::new(client), settings, route);

    if options.check_only {
        return check(&mut session, timeout.unwrap_or(CHECK_TIMEOUT));
    }

    chatsum_tui::run_app(&mut session)
}

/// Loads reference data and resolves the starting route without a terminal.
fn check<G, S>(session: &mut Orchestrator<G, S>, timeout: Duration) -> Result<()>
where
    G: chatsum_app::ApiGateway + 'static,
    S: chatsum_app::KeyValueStore,
{
    if !session.wait_idle(timeout) {
        bail!("startup did not finish within {}s", timeout.as_secs());
    }
    if let Some(error) = session.error() {
        return Err(anyhow!("{error}"));
    }
    if let Some(notice) = session.notice() {
        bail!("{}", notice.message);
    }

    let state = session.state();
    let (characters, groups) = state
        .reference
        .as_ref()
        .map(|reference| (reference.characters.len(), reference.groups.len()))
        .unwrap_or_default();
    println!(
        "ok: {characters} characters, {groups} group chats; route {}",
        session.route()
    );
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    route: Option<String>,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        route: None,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--route" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--route requires a path such as /characters/Alice"))?;
                options.route = Some(value.as_ref().to_owned());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("chatsum");
    println!("  --config <path>          Use a specific config path");
    println!("  --route <path>           Start at a route, e.g. /characters/Alice/2024-01-01.jsonl");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Load reference data and resolve the route, then exit");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, check, parse_cli_args};
    use anyhow::Result;
    use chatsum_app::{
        ApiGateway, BackupTarget, Group, KeyValueStore, ModelInfo, Orchestrator, RestoreReceipt,
        Route, SettingsStore, SummaryOptions,
    };
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/chatsum-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                route: None,
                print_config_path: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_and_route() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml", "--route", "/groupChats/Party"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        assert_eq!(options.route.as_deref(), Some("/groupChats/Party"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));

        let error = parse_cli_args(vec!["--route"], default_options_path())
            .expect_err("missing route value should fail");
        assert!(error.to_string().contains("--route requires"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_check_and_help_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check", "-h"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(options.show_help);
        Ok(())
    }

    #[derive(Default)]
    struct Memory(HashMap<String, String>);

    impl KeyValueStore for Memory {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.0.get(key).cloned())
        }

        fn put(&mut self, key: &str, value: &str) -> Result<()> {
            self.0.insert(key.to_owned(), value.to_owned());
            Ok(())
        }
    }

    /// Serves one character and fails every list request when `offline`.
    struct Archive {
        offline: bool,
    }

    impl Archive {
        fn guard(&self) -> Result<()> {
            if self.offline {
                anyhow::bail!("cannot reach archive");
            }
            Ok(())
        }
    }

    impl ApiGateway for Archive {
        fn list_characters(&self, _user: &str) -> Result<Vec<String>> {
            self.guard()?;
            Ok(vec!["Alice".to_owned()])
        }

        fn list_groups(&self, _user: &str) -> Result<Vec<Group>> {
            self.guard()?;
            Ok(Vec::new())
        }

        fn list_models(&self) -> Result<Vec<ModelInfo>> {
            self.guard()?;
            Ok(Vec::new())
        }

        fn list_users(&self) -> Result<Vec<String>> {
            self.guard()?;
            Ok(Vec::new())
        }

        fn list_chats(&self, _user: &str, _character: &str) -> Result<Vec<String>> {
            Ok(vec!["a.jsonl".to_owned()])
        }

        fn chat_content(&self, _user: &str, _character: &str, _chat: &str) -> Result<String> {
            Ok("# Alice".to_owned())
        }

        fn group_chat_content(&self, _user: &str, _chat: &str) -> Result<String> {
            anyhow::bail!("no group chats")
        }

        fn summarize_chat(
            &self,
            _user: &str,
            _character: &str,
            _chat: &str,
            _options: &SummaryOptions,
        ) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn summarize_group_chat(
            &self,
            _user: &str,
            _chat: &str,
            _options: &SummaryOptions,
        ) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn list_backups(&self, _user: &str, _target: &BackupTarget) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn backup_content(
            &self,
            _user: &str,
            _target: &BackupTarget,
            _backup: &str,
        ) -> Result<String> {
            anyhow::bail!("no backups")
        }

        fn restore_backup(
            &self,
            _user: &str,
            _target: &BackupTarget,
            _backup: &str,
        ) -> Result<RestoreReceipt> {
            anyhow::bail!("no backups")
        }
    }

    fn session(offline: bool, href: &str) -> Orchestrator<Archive, Memory> {
        Orchestrator::start(
            Arc::new(Archive { offline }),
            SettingsStore::load(Memory::default()),
            Route::parse(href),
        )
    }

    #[test]
    fn check_resolves_deep_link() -> Result<()> {
        let mut session = session(false, "/characters/Alice/a.jsonl");
        check(&mut session, Duration::from_secs(5))?;
        assert_eq!(session.route().href(), "/characters/Alice/a.jsonl");
        Ok(())
    }

    #[test]
    fn check_reports_unreachable_archive() {
        let mut session = session(true, "/");
        let error = check(&mut session, Duration::from_secs(5))
            .expect_err("offline archive should fail the check");
        assert!(error.to_string().contains("cannot reach archive"));
    }
}
