// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the Resize P application.

pub mod auth_modal;
pub mod canvas;
pub mod toolbar;
pub mod visibility;
pub mod windows;
