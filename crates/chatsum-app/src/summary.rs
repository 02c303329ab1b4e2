// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Parameters forwarded verbatim to the remote summarizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOptions {
    pub model: String,
    pub max_tokens: String,
    pub word_limit: String,
}

/// Summary segments in display order: the rolled-up final segment first,
/// followed by the partial summaries as the backend produced them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummaryResult {
    segments: Vec<String>,
    selected: usize,
}

impl SummaryResult {
    pub fn from_parts(mut parts: Vec<String>) -> Self {
        if let Some(last) = parts.pop() {
            parts.insert(0, last);
        }
        Self {
            segments: parts,
            selected: 0,
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn current(&self) -> Option<&str> {
        self.segments.get(self.selected).map(String::as_str)
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.segments.len() {
            return false;
        }
        self.selected = index;
        true
    }

    pub fn label(index: usize) -> String {
        if index == 0 {
            "Final Summary".to_owned()
        } else {
            format!("Part {index}")
        }
    }
}
