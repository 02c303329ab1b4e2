// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! The navigation state machine.
//!
//! Commands mutate [`NavigationState`] and return [`NavEvent`]s for the
//! caller to carry out: network fetches and route pushes. Fetch results come
//! back through [`NavigationMachine::resolve`] tagged with the generation
//! that requested them. Every state-changing command advances the
//! generation, so a result is applied only if nothing happened in between.

use crate::model::{Group, ReferenceData, SelectedEntity, View};
use crate::route::{self, Route, RouteSeed};
use crate::summary::{SummaryOptions, SummaryResult};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavPhase {
    Browsing,
    EntitySelected,
    ItemSelected,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationState {
    pub view: View,
    pub entity: SelectedEntity,
    pub item: Option<String>,
    pub chat_content: Option<String>,
    /// Chat list of the selected character; groups carry theirs inline.
    pub character_chats: Vec<String>,
    pub reference: Option<ReferenceData>,
    pub generation: u64,
}

impl NavigationState {
    pub fn phase(&self) -> NavPhase {
        match (&self.entity, &self.item) {
            (SelectedEntity::None, _) => NavPhase::Browsing,
            (_, None) => NavPhase::EntitySelected,
            (_, Some(_)) => NavPhase::ItemSelected,
        }
    }

    pub fn chats(&self) -> &[String] {
        match &self.entity {
            SelectedEntity::None => &[],
            SelectedEntity::Character(_) => &self.character_chats,
            SelectedEntity::Group(group) => &group.chats,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavCommand {
    SelectCharacter(String),
    SelectGroup(Group),
    SelectItem(String),
    Back,
    Summarize(SummaryOptions),
    SwitchView(View),
    SelectSummarySegment(usize),
    CloseSummary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    CharacterChats {
        character: String,
    },
    CharacterChat {
        character: String,
        chat: String,
    },
    GroupChat {
        group: String,
        chat: String,
    },
    CharacterSummary {
        character: String,
        chat: String,
        options: SummaryOptions,
    },
    GroupSummary {
        group: String,
        chat: String,
        options: SummaryOptions,
    },
}

impl FetchRequest {
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::CharacterChats { .. } => "list_chats",
            Self::CharacterChat { .. } | Self::GroupChat { .. } => "load_chat",
            Self::CharacterSummary { .. } | Self::GroupSummary { .. } => "summarize",
        }
    }

    fn content(entity: &SelectedEntity, chat: &str) -> Option<Self> {
        match entity {
            SelectedEntity::None => None,
            SelectedEntity::Character(character) => Some(Self::CharacterChat {
                character: character.clone(),
                chat: chat.to_owned(),
            }),
            SelectedEntity::Group(group) => Some(Self::GroupChat {
                group: group.name.clone(),
                chat: chat.to_owned(),
            }),
        }
    }

    fn summary(entity: &SelectedEntity, chat: &str, options: SummaryOptions) -> Option<Self> {
        match entity {
            SelectedEntity::None => None,
            SelectedEntity::Character(character) => Some(Self::CharacterSummary {
                character: character.clone(),
                chat: chat.to_owned(),
                options,
            }),
            SelectedEntity::Group(group) => Some(Self::GroupSummary {
                group: group.name.clone(),
                chat: chat.to_owned(),
                options,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub request: FetchRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPayload {
    Chats(Vec<String>),
    Content(String),
    Summary(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub generation: u64,
    pub result: Result<FetchPayload, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFailure {
    pub operation: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    FetchRequested(FetchTicket),
    RoutePushed(Route),
    SummaryReady,
    ActionFailed(ActionFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pending {
    Character {
        character: String,
        then_item: Option<String>,
        hydrating: bool,
    },
    Item {
        item: String,
        hydrating: bool,
    },
    Summary,
}

impl Pending {
    const fn operation(&self) -> &'static str {
        match self {
            Self::Character { .. } => "select_character",
            Self::Item { .. } => "select_item",
            Self::Summary => "summarize",
        }
    }

    const fn hydrating(&self) -> bool {
        match self {
            Self::Character { hydrating, .. } | Self::Item { hydrating, .. } => *hydrating,
            Self::Summary => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NavigationMachine {
    state: NavigationState,
    seed: RouteSeed,
    route: Route,
    pending: Option<Pending>,
    hydrated: bool,
    summary: Option<SummaryResult>,
}

impl NavigationMachine {
    pub fn new(initial_route: Route) -> Self {
        let seed = route::decode(&initial_route);
        let state = NavigationState {
            view: seed.view,
            ..NavigationState::default()
        };
        Self {
            state,
            seed,
            route: initial_route,
            pending: None,
            hydrated: false,
            summary: None,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// The route the address bar currently shows.
    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn summary(&self) -> Option<&SummaryResult> {
        self.summary.as_ref()
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn dispatch(&mut self, command: NavCommand) -> Vec<NavEvent> {
        match command {
            NavCommand::SelectCharacter(name) => self.select_character(name),
            NavCommand::SelectGroup(group) => self.select_group(group),
            NavCommand::SelectItem(item) => self.select_item(item),
            NavCommand::Back => self.back(),
            NavCommand::Summarize(options) => self.summarize(options),
            NavCommand::SwitchView(view) => self.switch_view(view),
            NavCommand::SelectSummarySegment(index) => {
                if let Some(summary) = self.summary.as_mut() {
                    summary.select(index);
                }
                Vec::new()
            }
            NavCommand::CloseSummary => {
                self.summary = None;
                Vec::new()
            }
        }
    }

    /// Applies reference data and resolves the deep link from the initial
    /// route. Runs once; later calls are ignored.
    pub fn hydrate(&mut self, reference: ReferenceData) -> Vec<NavEvent> {
        if self.hydrated {
            warn!("reference data already applied; ignoring repeated hydration");
            return Vec::new();
        }
        self.hydrated = true;

        let seed = self.seed.clone();
        let character_known = seed
            .character
            .as_deref()
            .is_some_and(|name| reference.has_character(name));
        let group = seed
            .group
            .as_deref()
            .and_then(|name| reference.find_group(name))
            .cloned();
        self.state.reference = Some(reference);

        if let Some(character) = seed.character {
            if !character_known {
                info!(character = %character, "deep-linked character not found; showing list");
                self.state.view = seed.view;
                return self.sync_route().into_iter().collect();
            }
            info!(character = %character, "resolving character deep link");
            let generation = self.advance();
            self.pending = Some(Pending::Character {
                character: character.clone(),
                then_item: seed.item,
                hydrating: true,
            });
            return vec![fetch(generation, FetchRequest::CharacterChats { character })];
        }

        if let Some(name) = seed.group {
            let Some(group) = group else {
                info!(group = %name, "deep-linked group not found; showing list");
                self.state.view = seed.view;
                return self.sync_route().into_iter().collect();
            };
            info!(group = %name, "resolving group deep link");
            let generation = self.advance();
            self.state.view = View::GroupChats;
            self.state.entity = SelectedEntity::Group(group);
            if let Some(item) = seed.item {
                let request = FetchRequest::GroupChat {
                    group: name,
                    chat: item.clone(),
                };
                self.pending = Some(Pending::Item {
                    item,
                    hydrating: true,
                });
                return vec![fetch(generation, request)];
            }
        }

        self.sync_route().into_iter().collect()
    }

    pub fn resolve(&mut self, outcome: FetchOutcome) -> Vec<NavEvent> {
        if outcome.generation != self.state.generation {
            debug!(
                generation = outcome.generation,
                current = self.state.generation,
                "discarding superseded fetch result"
            );
            return Vec::new();
        }
        let Some(pending) = self.pending.take() else {
            debug!(
                generation = outcome.generation,
                "fetch result with nothing pending"
            );
            return Vec::new();
        };

        match outcome.result {
            Ok(payload) => self.apply(pending, payload),
            Err(message) => self.fail(pending, message),
        }
    }

    fn select_character(&mut self, character: String) -> Vec<NavEvent> {
        let generation = self.advance();
        self.pending = Some(Pending::Character {
            character: character.clone(),
            then_item: None,
            hydrating: false,
        });
        vec![fetch(generation, FetchRequest::CharacterChats { character })]
    }

    fn select_group(&mut self, group: Group) -> Vec<NavEvent> {
        self.advance();
        self.pending = None;
        self.state.view = View::GroupChats;
        self.state.entity = SelectedEntity::Group(group);
        self.state.item = None;
        self.state.chat_content = None;
        self.state.character_chats.clear();
        self.sync_route().into_iter().collect()
    }

    fn select_item(&mut self, item: String) -> Vec<NavEvent> {
        let Some(request) = FetchRequest::content(&self.state.entity, &item) else {
            debug!(chat = %item, "ignoring chat selection without a character or group");
            return Vec::new();
        };
        let generation = self.advance();
        self.pending = Some(Pending::Item {
            item,
            hydrating: false,
        });
        vec![fetch(generation, request)]
    }

    fn back(&mut self) -> Vec<NavEvent> {
        // An unresolved selection is cancelled rather than unwinding a level.
        if matches!(
            self.pending,
            Some(Pending::Character { .. } | Pending::Item { .. })
        ) {
            self.advance();
            self.pending = None;
            return self.sync_route().into_iter().collect();
        }

        if self.state.item.is_some() {
            self.advance();
            self.pending = None;
            self.state.item = None;
            self.state.chat_content = None;
        } else if self.state.entity.is_some() {
            self.advance();
            self.pending = None;
            self.state.entity = SelectedEntity::None;
            self.state.character_chats.clear();
        } else {
            return Vec::new();
        }
        self.sync_route().into_iter().collect()
    }

    fn summarize(&mut self, options: SummaryOptions) -> Vec<NavEvent> {
        let request = match (&self.state.item, self.state.chat_content.is_some()) {
            (Some(item), true) => FetchRequest::summary(&self.state.entity, item, options),
            _ => None,
        };
        let Some(request) = request else {
            debug!("ignoring summarize without a loaded chat");
            return Vec::new();
        };
        let generation = self.advance();
        self.pending = Some(Pending::Summary);
        self.summary = None;
        vec![fetch(generation, request)]
    }

    fn switch_view(&mut self, view: View) -> Vec<NavEvent> {
        if self.state.entity.is_some() || self.state.view == view {
            return Vec::new();
        }
        self.advance();
        self.pending = None;
        self.state.view = view;
        self.sync_route().into_iter().collect()
    }

    fn apply(&mut self, pending: Pending, payload: FetchPayload) -> Vec<NavEvent> {
        match (pending, payload) {
            (
                Pending::Character {
                    character,
                    then_item,
                    hydrating,
                },
                FetchPayload::Chats(chats),
            ) => {
                self.state.view = View::Characters;
                self.state.entity = SelectedEntity::Character(character.clone());
                self.state.item = None;
                self.state.chat_content = None;
                self.state.character_chats = chats;
                if let Some(item) = then_item {
                    self.pending = Some(Pending::Item {
                        item: item.clone(),
                        hydrating,
                    });
                    return vec![fetch(
                        self.state.generation,
                        FetchRequest::CharacterChat {
                            character,
                            chat: item,
                        },
                    )];
                }
                self.sync_route().into_iter().collect()
            }
            (Pending::Item { item, .. }, FetchPayload::Content(content)) => {
                self.state.item = Some(item);
                self.state.chat_content = Some(content);
                self.sync_route().into_iter().collect()
            }
            (Pending::Summary, FetchPayload::Summary(parts)) => {
                self.summary = Some(SummaryResult::from_parts(parts));
                vec![NavEvent::SummaryReady]
            }
            (pending, payload) => {
                let kind = match payload {
                    FetchPayload::Chats(_) => "chat list",
                    FetchPayload::Content(_) => "chat content",
                    FetchPayload::Summary(_) => "summary",
                };
                self.fail(pending, format!("unexpected {kind} response"))
            }
        }
    }

    fn fail(&mut self, pending: Pending, message: String) -> Vec<NavEvent> {
        let operation = pending.operation();
        warn!(operation, error = %message, "navigation action failed");
        let mut events = Vec::new();
        if pending.hydrating() {
            events.extend(self.sync_route());
        }
        events.push(NavEvent::ActionFailed(ActionFailure { operation, message }));
        events
    }

    fn advance(&mut self) -> u64 {
        self.state.generation = self.state.generation.saturating_add(1);
        self.state.generation
    }

    fn sync_route(&mut self) -> Option<NavEvent> {
        let next = route::encode(
            self.state.view,
            &self.state.entity,
            self.state.item.as_deref(),
        );
        if next == self.route {
            return None;
        }
        debug!(route = %next, "route pushed");
        self.route = next.clone();
        Some(NavEvent::RoutePushed(next))
    }
}

fn fetch(generation: u64, request: FetchRequest) -> NavEvent {
    NavEvent::FetchRequested(FetchTicket {
        generation,
        request,
    })
}
