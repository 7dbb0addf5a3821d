use anyhow::Result;
use log::error;
use serde_json::{json, Map, Value};
use std::path::PathBuf;

use mxa_analyzer::workspace::{ArtifactKind, Workspace};

use super::output::{
    heading, print_json, print_record, print_table, print_tag_metadata, table_json,
};
use super::OutputFormat;

const TABLE_PREVIEW_ROWS: usize = 20;

/// One JSON object with a key per filled slot
fn workspace_json(workspace: &Workspace) -> Result<Value> {
    let mut out = Map::new();
    if let Some(table) = &workspace.scan_table {
        out.insert(
            "scan_table".into(),
            table_json(table, Some(TABLE_PREVIEW_ROWS)),
        );
    }
    if let Some(record) = &workspace.session {
        out.insert("session".into(), serde_json::to_value(record)?);
    }
    if let Some(record) = &workspace.protocol {
        out.insert("protocol".into(), serde_json::to_value(record)?);
    }
    if let Some(image) = &workspace.image {
        out.insert(
            "image".into(),
            json!({
                "pages": image.page_count(),
                "metadata": serde_json::to_value(image.metadata())?,
            }),
        );
    }
    Ok(Value::Object(out))
}

fn print_text(workspace: &Workspace) -> Result<()> {
    if let Some(table) = &workspace.scan_table {
        println!("{}", heading("Scan Table"));
        print_table(table, Some(TABLE_PREVIEW_ROWS), OutputFormat::Text)?;
        println!();
    }
    if let Some(record) = &workspace.session {
        print_record("Session Descriptor", record, OutputFormat::Text)?;
        println!();
    }
    if let Some(record) = &workspace.protocol {
        print_record("Protocol Descriptor", record, OutputFormat::Text)?;
        println!();
    }
    if let Some(image) = &workspace.image {
        println!("{} ({} pages)", heading("Image"), image.page_count());
        print_tag_metadata(&image.metadata(), OutputFormat::Text)?;
    }
    Ok(())
}

/// Load every file into its slot; one failure does not stop the others
pub fn run(files: Vec<PathBuf>, format: OutputFormat) -> Result<()> {
    let mut workspace = Workspace::new();
    let mut failures = 0usize;

    for path in &files {
        match workspace.load_path(path) {
            Ok(kind) => eprintln!("Loaded {} from {}", kind.label(), path.display()),
            Err(e) => {
                error!("{}: {}", path.display(), e);
                eprintln!("Failed to load {}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    match format {
        OutputFormat::Json => print_json(&workspace_json(&workspace)?)?,
        OutputFormat::Text => print_text(&workspace)?,
    }

    let loaded = [
        ArtifactKind::ScanTable,
        ArtifactKind::Session,
        ArtifactKind::Protocol,
        ArtifactKind::Image,
    ]
    .iter()
    .filter(|&&k| workspace.is_loaded(k))
    .count();

    if failures > 0 {
        anyhow::bail!(
            "{} of {} files failed to load ({} slots filled)",
            failures,
            files.len(),
            loaded
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCAN_CSV: &str = "\
Well,ImageFileName,ExcitationEmissionFilter,PositionXUm,PositionYUm,PositionZUm
A01,a.tif,DAPI,1,2,0
";

    #[test]
    fn test_json_output_is_one_object_per_slot() {
        let mut workspace = Workspace::new();
        workspace
            .load(ArtifactKind::ScanTable, SCAN_CSV.as_bytes().to_vec())
            .unwrap();
        workspace
            .load(
                ArtifactKind::Protocol,
                br#"{"acquisitionEngineProtocol": {"commandId": "X1"}}"#.to_vec(),
            )
            .unwrap();

        let value = workspace_json(&workspace).unwrap();
        let text = serde_json::to_string_pretty(&value).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();

        let keys: Vec<&str> = parsed.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["scan_table", "protocol"]);
        assert_eq!(parsed["scan_table"][0]["ImageFileName"], "a.tif");
        assert_eq!(
            parsed["protocol"]["Acquisition Engine Protocol"]["Command ID"],
            "X1"
        );
    }

    #[test]
    fn test_json_output_empty_workspace() {
        assert_eq!(workspace_json(&Workspace::new()).unwrap(), json!({}));
    }
}
