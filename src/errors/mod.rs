// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod domain;

pub use domain::{DomainError, DomainResult};
