// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Saved project export.
//!
//! This module exports the saved project list to YAML or JSON files.

use crate::models::project::Project;
use anyhow::{bail, Result};
use std::path::Path;

/// Export projects to YAML format.
pub fn export_yaml(projects: &[Project], path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(projects)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export projects to JSON format.
pub fn export_json(projects: &[Project], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(projects)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Export projects, choosing the format from the file extension.
pub fn export(projects: &[Project], path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => export_yaml(projects, path),
        Some("json") => export_json(projects, path),
        other => bail!("Unsupported file extension: {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::canvas::CanvasState;
    use chrono::Utc;

    fn projects() -> Vec<Project> {
        let mut canvas = CanvasState::default();
        canvas.place("cat.png".into(), 300, 200);
        vec![Project::snapshot(&canvas, Utc::now()).unwrap()]
    }

    #[test]
    fn test_export_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("projects.json");
        export(&projects(), &json_path).unwrap();
        let back: Vec<serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0]["originalSize"]["width"], 300);

        let yaml_path = dir.path().join("projects.yml");
        export(&projects(), &yaml_path).unwrap();
        let yaml = std::fs::read_to_string(&yaml_path).unwrap();
        assert!(yaml.contains("source: cat.png"));
    }

    #[test]
    fn test_export_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        assert!(export(&projects(), &dir.path().join("projects.txt")).is_err());
    }
}
