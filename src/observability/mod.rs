// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! All diagnostic output from the generation pipeline goes through message
//! types defined under [`messages`], each implementing `Display` for the
//! human-readable line and [`messages::StructuredLog`] for machine-readable
//! fields and span creation. Keeping the message text in one place avoids
//! magic strings scattered through the engine and keeps log output
//! consistent across subsystems.
//!
//! Messages are organized by subsystem:
//! * `messages::builder` - dependency inference events
//! * `messages::sorter` - ordering, cycle detection, and recovery events
//! * `messages::overrides` - override application events
//! * `messages::generator` - pipeline lifecycle events

pub mod messages;
