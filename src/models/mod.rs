// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: canvas state, project snapshots, sessions, and size presets.

pub mod canvas;
pub mod presets;
pub mod project;
pub mod session;
