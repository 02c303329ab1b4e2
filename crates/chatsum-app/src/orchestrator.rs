// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Session driver: owns all navigation state and runs gateway calls on
//! worker threads. Results come back over a channel and are applied here,
//! on the owning thread, in arrival order.

use crate::backups::{BackupBrowser, BackupEvent, BackupOutcome, BackupTarget, BackupTicket};
use crate::gateway::{ApiGateway, execute_backup, execute_fetch, load_reference_data};
use crate::model::{Group, ReferenceData, View};
use crate::navigation::{
    FetchOutcome, FetchTicket, NavCommand, NavEvent, NavigationMachine, NavigationState,
};
use crate::route::Route;
use crate::settings::{KeyValueStore, SettingKey, Settings, SettingsStore};
use crate::summary::SummaryResult;
use anyhow::{Result, bail};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    ReferenceLoaded(Result<ReferenceData, String>),
    Fetched(FetchOutcome),
    Backup(BackupOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient, action-local message. Unlike [`Orchestrator::error`] it never
/// blocks further actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub struct Orchestrator<G, S> {
    gateway: Arc<G>,
    settings: SettingsStore<S>,
    machine: NavigationMachine,
    backups: BackupBrowser,
    history: Vec<Route>,
    tx: Sender<WorkerEvent>,
    rx: Receiver<WorkerEvent>,
    outstanding: usize,
    reference_loading: bool,
    fatal: Option<String>,
    notice: Option<Notice>,
}

impl<G: ApiGateway + 'static, S: KeyValueStore> Orchestrator<G, S> {
    /// Builds the session and starts loading reference data in the
    /// background. Deep links in `initial_route` resolve once it arrives.
    pub fn start(gateway: Arc<G>, settings: SettingsStore<S>, initial_route: Route) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut orchestrator = Self {
            gateway,
            settings,
            machine: NavigationMachine::new(initial_route.clone()),
            backups: BackupBrowser::default(),
            history: vec![initial_route],
            tx,
            rx,
            outstanding: 0,
            reference_loading: true,
            fatal: None,
            notice: None,
        };
        orchestrator.spawn_reference_load();
        orchestrator
    }

    pub fn state(&self) -> &NavigationState {
        self.machine.state()
    }

    pub fn route(&self) -> &Route {
        self.machine.route()
    }

    /// Every route the session has shown, oldest first.
    pub fn history(&self) -> &[Route] {
        &self.history
    }

    pub fn summary(&self) -> Option<&SummaryResult> {
        self.machine.summary()
    }

    pub fn settings(&self) -> &Settings {
        self.settings.settings()
    }

    pub fn backups(&self) -> &BackupBrowser {
        &self.backups
    }

    pub fn loading(&self) -> bool {
        self.reference_loading || self.machine.is_loading() || self.backups.is_loading()
    }

    /// Session-fatal failure; set only when reference data cannot be loaded.
    pub fn error(&self) -> Option<&str> {
        self.fatal.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn is_hydrated(&self) -> bool {
        self.machine.is_hydrated()
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Applies every worker result that has already arrived.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.handle(event);
            handled += 1;
        }
        handled
    }

    /// Blocks for at most `timeout` waiting for one worker result.
    pub fn wait_next(&mut self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => {
                self.handle(event);
                true
            }
            Err(_) => false,
        }
    }

    /// Applies results until no worker is outstanding. Returns false if the
    /// deadline passed first.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.outstanding > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(event) => self.handle(event),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }

    pub fn select_character(&mut self, name: &str) {
        self.navigate(NavCommand::SelectCharacter(name.to_owned()));
    }

    pub fn select_group(&mut self, group: Group) {
        self.navigate(NavCommand::SelectGroup(group));
    }

    pub fn select_item(&mut self, chat: &str) {
        self.navigate(NavCommand::SelectItem(chat.to_owned()));
    }

    pub fn back(&mut self) {
        self.navigate(NavCommand::Back);
    }

    pub fn switch_view(&mut self, view: View) {
        self.navigate(NavCommand::SwitchView(view));
    }

    pub fn summarize(&mut self) {
        let options = self.settings.settings().summary_options();
        self.navigate(NavCommand::Summarize(options));
    }

    pub fn select_summary_segment(&mut self, index: usize) {
        self.navigate(NavCommand::SelectSummarySegment(index));
    }

    pub fn close_summary(&mut self) {
        self.navigate(NavCommand::CloseSummary);
    }

    pub fn update_setting(&mut self, key: SettingKey, value: &str) -> Result<()> {
        self.settings.set(key, value)?;
        info!(setting = key.as_str(), "setting updated");
        Ok(())
    }

    pub fn open_backups(&mut self) -> Result<()> {
        if self.fatal.is_some() {
            bail!("session unavailable");
        }
        let Some(target) = BackupTarget::from_entity(&self.machine.state().entity) else {
            bail!("select a character or group to browse backups");
        };
        let ticket = self.backups.open(target);
        self.spawn_backup(ticket);
        Ok(())
    }

    pub fn select_backup(&mut self, backup: &str) {
        if let Some(ticket) = self.backups.select(backup) {
            self.spawn_backup(ticket);
        }
    }

    pub fn restore_backup(&mut self) {
        if let Some(ticket) = self.backups.restore() {
            self.spawn_backup(ticket);
        }
    }

    pub fn close_backups(&mut self) {
        self.backups.close();
    }

    fn navigate(&mut self, command: NavCommand) {
        if self.fatal.is_some() {
            debug!(?command, "ignoring command after fatal error");
            return;
        }
        if !self.machine.is_hydrated() {
            debug!(?command, "ignoring command before reference data");
            return;
        }
        let events = self.machine.dispatch(command);
        self.apply(events);
    }

    fn apply(&mut self, events: Vec<NavEvent>) {
        for event in events {
            match event {
                NavEvent::FetchRequested(ticket) => self.spawn_fetch(ticket),
                NavEvent::RoutePushed(route) => self.history.push(route),
                NavEvent::SummaryReady => {
                    info!(
                        segments = self.machine.summary().map_or(0, SummaryResult::len),
                        "summary ready"
                    );
                }
                NavEvent::ActionFailed(failure) => {
                    self.notice = Some(Notice::error(format!(
                        "{} failed: {}",
                        failure.operation, failure.message
                    )));
                }
            }
        }
    }

    fn handle(&mut self, event: WorkerEvent) {
        self.outstanding = self.outstanding.saturating_sub(1);
        match event {
            WorkerEvent::ReferenceLoaded(Ok(reference)) => {
                self.reference_loading = false;
                info!(
                    characters = reference.characters.len(),
                    groups = reference.groups.len(),
                    "reference data loaded"
                );
                let events = self.machine.hydrate(reference);
                self.apply(events);
            }
            WorkerEvent::ReferenceLoaded(Err(message)) => {
                self.reference_loading = false;
                error!(error = %message, "reference data load failed");
                self.fatal = Some(message);
            }
            WorkerEvent::Fetched(outcome) => {
                let events = self.machine.resolve(outcome);
                self.apply(events);
            }
            WorkerEvent::Backup(outcome) => match self.backups.resolve(outcome) {
                Some(BackupEvent::Restored(receipt)) => {
                    info!(file = %receipt.new_file_name, "backup restored");
                    self.notice = Some(Notice::info(format!(
                        "{}: {}",
                        receipt.message, receipt.new_file_name
                    )));
                }
                Some(BackupEvent::Failed(failure)) => {
                    self.notice = Some(Notice::error(format!(
                        "{} failed: {}",
                        failure.operation, failure.message
                    )));
                }
                None => {}
            },
        }
    }

    fn spawn_reference_load(&mut self) {
        let gateway = Arc::clone(&self.gateway);
        let user = self.settings.settings().username.clone();
        let tx = self.tx.clone();
        self.outstanding += 1;
        thread::spawn(move || {
            let result = load_reference_data(gateway.as_ref(), &user)
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(WorkerEvent::ReferenceLoaded(result));
        });
    }

    fn spawn_fetch(&mut self, ticket: FetchTicket) {
        debug!(
            generation = ticket.generation,
            operation = ticket.request.operation(),
            "fetch requested"
        );
        let gateway = Arc::clone(&self.gateway);
        let user = self.settings.settings().username.clone();
        let tx = self.tx.clone();
        self.outstanding += 1;
        thread::spawn(move || {
            let result = execute_fetch(gateway.as_ref(), &user, &ticket.request)
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(WorkerEvent::Fetched(FetchOutcome {
                generation: ticket.generation,
                result,
            }));
        });
    }

    fn spawn_backup(&mut self, ticket: BackupTicket) {
        let gateway = Arc::clone(&self.gateway);
        let user = self.settings.settings().username.clone();
        let tx = self.tx.clone();
        self.outstanding += 1;
        thread::spawn(move || {
            let result = execute_backup(gateway.as_ref(), &user, &ticket.target, &ticket.request)
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(WorkerEvent::Backup(BackupOutcome {
                token: ticket.token,
                result,
            }));
        });
    }
}
