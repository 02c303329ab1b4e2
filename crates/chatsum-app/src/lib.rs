// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod backups;
pub mod gateway;
pub mod model;
pub mod navigation;
pub mod orchestrator;
pub mod route;
pub mod settings;
pub mod summary;

pub use backups::*;
pub use gateway::*;
pub use model::*;
pub use navigation::*;
pub use orchestrator::*;
pub use route::{Route, RouteSeed};
pub use settings::*;
pub use summary::*;
