// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for media files, the local store, and saved projects.

pub mod media;
pub mod projects;
pub mod serialization;
pub mod storage;
