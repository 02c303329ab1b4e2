// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Characters,
    GroupChats,
}

impl View {
    pub const ALL: [Self; 2] = [Self::Characters, Self::GroupChats];

    /// Route slug, also the first path segment of an encoded route.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Characters => "characters",
            Self::GroupChats => "groupChats",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "characters" => Some(Self::Characters),
            "groupChats" => Some(Self::GroupChats),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Characters => "characters",
            Self::GroupChats => "group chats",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub members: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub chats: Vec<String>,
}

/// The archive server encodes an empty list as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectedEntity {
    #[default]
    None,
    Character(String),
    Group(Group),
}

impl SelectedEntity {
    pub const fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Character(name) => Some(name),
            Self::Group(group) => Some(&group.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub model: String,
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferenceData {
    pub characters: BTreeSet<String>,
    pub groups: Vec<Group>,
    pub models: Vec<ModelInfo>,
    pub users: Vec<String>,
}

impl ReferenceData {
    pub fn has_character(&self, name: &str) -> bool {
        self.characters.contains(name)
    }

    pub fn find_group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RestoreReceipt {
    pub message: String,
    #[serde(rename = "newFileName")]
    pub new_file_name: String,
}
