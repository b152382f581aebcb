// ABOUTME: Library root re-exporting server modules for integration testing
// ABOUTME: Enables tests/ to access router, state, and handler modules
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

pub mod health;
pub mod router;
pub mod state;
pub mod tools;
