// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod domain;        // entities, value objects, node-id graph
pub mod engine;        // generation pipeline
pub mod errors;        // error handling
pub mod observability;
pub mod service;       // store-backed entry point
pub mod stores;        // collaborator contracts + in-memory backends
