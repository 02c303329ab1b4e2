// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Translation between address-bar routes and navigation selections.
//!
//! Character routes carry the selection in percent-encoded path segments
//! (`/characters/{name}/{chat}`); group routes carry it in the query string
//! (`/groupChats?group={name}&chat={chat}`). Decoding never fails: anything
//! it cannot make sense of becomes the default seed.

use crate::model::{Group, SelectedEntity, View};
use std::fmt;
use url::form_urlencoded;

const GROUP_PARAM: &str = "group";
const CHAT_PARAM: &str = "chat";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Route {
    pub fn bare(view: View) -> Self {
        Self {
            path: format!("/{}", view.as_str()),
            query: Vec::new(),
        }
    }

    /// Splits an href into path and query; the fragment, if any, is dropped.
    pub fn parse(href: &str) -> Self {
        let href = href.split('#').next().unwrap_or_default();
        let (path, query) = match href.split_once('?') {
            Some((path, query)) => (path, query),
            None => (href, ""),
        };
        let path = if path.is_empty() { "/" } else { path };

        Self {
            path: path.to_owned(),
            query: form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    pub fn href(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.query)
            .finish();
        format!("{}?{}", self.path, query)
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

impl Default for Route {
    fn default() -> Self {
        Self::bare(View::default())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

/// The part of a navigation state a route can express. Groups are named
/// only; the full record is resolved against reference data later.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteSeed {
    pub view: View,
    pub character: Option<String>,
    pub group: Option<String>,
    pub item: Option<String>,
}

impl RouteSeed {
    /// Normal form of a selection: what survives an encode/decode cycle.
    pub fn of(view: View, entity: &SelectedEntity, item: Option<&str>) -> Self {
        let item = item.filter(|item| !item.is_empty()).map(str::to_owned);
        match (view, entity) {
            (View::Characters, SelectedEntity::Character(name)) if !name.is_empty() => Self {
                view,
                character: Some(name.clone()),
                group: None,
                item,
            },
            (View::GroupChats, SelectedEntity::Group(group)) if !group.name.is_empty() => Self {
                view,
                character: None,
                group: Some(group.name.clone()),
                item,
            },
            _ => Self {
                view,
                ..Self::default()
            },
        }
    }

    pub fn to_route(&self) -> Route {
        let entity = match (self.view, &self.character, &self.group) {
            (View::Characters, Some(name), _) => SelectedEntity::Character(name.clone()),
            (View::GroupChats, _, Some(name)) => SelectedEntity::Group(Group {
                name: name.clone(),
                members: Vec::new(),
                chats: Vec::new(),
            }),
            _ => SelectedEntity::None,
        };
        encode(self.view, &entity, self.item.as_deref())
    }
}

pub fn encode(view: View, entity: &SelectedEntity, item: Option<&str>) -> Route {
    let item = item.filter(|item| !item.is_empty());
    match (view, entity) {
        (View::Characters, SelectedEntity::Character(name)) if !name.is_empty() => {
            let mut path = format!("/{}/{}", view.as_str(), urlencoding::encode(name));
            if let Some(item) = item {
                path.push('/');
                path.push_str(&urlencoding::encode(item));
            }
            Route {
                path,
                query: Vec::new(),
            }
        }
        (View::GroupChats, SelectedEntity::Group(group)) if !group.name.is_empty() => {
            let mut query = vec![(GROUP_PARAM.to_owned(), group.name.clone())];
            if let Some(item) = item {
                query.push((CHAT_PARAM.to_owned(), item.to_owned()));
            }
            Route {
                path: format!("/{}", view.as_str()),
                query,
            }
        }
        _ => Route::bare(view),
    }
}

pub fn decode(route: &Route) -> RouteSeed {
    decode_strict(route).unwrap_or_default()
}

fn decode_strict(route: &Route) -> Option<RouteSeed> {
    let segments = route
        .path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>();
    let Some((first, rest)) = segments.split_first() else {
        return Some(RouteSeed::default());
    };

    let view = View::parse(first)?;
    match view {
        View::Characters => {
            if rest.len() > 2 {
                return None;
            }
            let character = match rest.first() {
                Some(raw) => Some(decode_segment(raw)?),
                None => None,
            };
            let item = match rest.get(1) {
                Some(raw) => Some(decode_segment(raw)?),
                None => None,
            };
            Some(RouteSeed {
                view,
                character,
                group: None,
                item,
            })
        }
        View::GroupChats => {
            if !rest.is_empty() {
                return None;
            }
            let group = non_empty(route.query_value(GROUP_PARAM));
            let item = group
                .as_ref()
                .and_then(|_| non_empty(route.query_value(CHAT_PARAM)));
            Some(RouteSeed {
                view,
                character: None,
                group,
                item,
            })
        }
    }
}

fn decode_segment(raw: &str) -> Option<String> {
    urlencoding::decode(raw).ok().map(|value| value.into_owned())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|value| !value.is_empty()).map(str::to_owned)
}
