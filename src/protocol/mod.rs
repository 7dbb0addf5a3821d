//! # Acquisition Protocol Descriptors
//!
//! A protocol descriptor (`.mxprotocol`) holds a reusable acquisition protocol
//! as two subtrees: `acquisitionEngineProtocol`, the command-level definition
//! consumed by the acquisition engine, and `uiModel`, the settings as the
//! acquisition software presents them.
//!
//! Both subtrees are flattened with static key maps. The engine section uses
//! friendly labels ([`ACQUISITION_ENGINE_KEYS`]); the UI section is labeled by
//! the dotted path itself ([`UI_MODEL_PATHS`]). Unresolved paths are reported
//! as empty strings.

use log::debug;
use serde_json::Value;

use crate::document::{parse_document, DocumentError};
use crate::keymap::{KeyMap, PathList};
use crate::record::{CategorizedRecord, Section};
use crate::tree::resolve_path;


/// Name of the engine-protocol category.
pub const ACQUISITION_ENGINE_CATEGORY: &str = "Acquisition Engine Protocol";

/// Name of the UI-model category.
pub const UI_MODEL_CATEGORY: &str = "UI Model";

/// Engine-protocol fields, relative to `acquisitionEngineProtocol`.
///
/// `protocolDefinition.protocolName` and `protocolName` share the label
/// "Protocol Name"; see [`KeyMap`] for how the collision resolves.
pub const ACQUISITION_ENGINE_KEYS: KeyMap = KeyMap::new(&[
    ("commandId", "Command ID"),
    ("commandName", "Command Name"),
    ("protocolDefinition.protocolName", "Protocol Name"),
    ("protocolDefinition.acquisitionName", "Acquisition Name"),
    (
        "commandData.acquisitionEngineProtocol.commandDefinitions",
        "Command Definitions",
    ),
    (
        "commandData.acquisitionEngineProtocol.data.devicePositions",
        "Device Positions",
    ),
    (
        "commandData.acquisitionEngineProtocol.data.labwareDefinition",
        "Labware Definition",
    ),
    ("commandData.acquisitionEngineProtocol.data.siteList", "Site List"),
    ("commandData.acquisitionEngineProtocol.data.wellList", "Well List"),
    ("protocolDefinition.commandSequence.commands", "Command Sequence"),
    ("protocolDefinition.fileSaveLocation", "File Save Location"),
    ("protocolDefinition.isInteractiveProtocol", "Is Interactive Protocol"),
    ("protocolDefinition.mxProtocolFilePath", "MX Protocol File Path"),
    ("protocolDefinition.postProcessingOptions", "Post Processing Options"),
    (
        "protocolDefinition.sendShadingCorrectedImagesToUi",
        "Send Shading Corrected Images to UI",
    ),
    ("protocolName", "Protocol Name"),
    ("protocolVersion", "Protocol Version"),
]);

/// UI-model fields, relative to `uiModel`, labeled by path.
pub const UI_MODEL_PATHS: PathList = PathList::new(&[
    "acquisitionName",
    "objective.name",
    "objective.magnification",
    "cameraName",
    "autofocus.channel.channelName",
    "autofocus.autofocusSettingsPerObjectiveList",
    "targetedAcquisition.enabled",
    "targetedAcquisition.parameters",
    "timeSeries.enabled",
    "timeSeries",
    "zSeries.enabled",
    "zSeries",
    "wellsSitesData",
]);

static NULL: Value = Value::Null;

/// Build the categorized record from an already decoded document.
pub fn categorize_protocol(root: &Value) -> CategorizedRecord {
    let engine = resolve_path(root, &["acquisitionEngineProtocol"])
        .value()
        .unwrap_or(&NULL);
    let ui = resolve_path(root, &["uiModel"]).value().unwrap_or(&NULL);

    let mut record = CategorizedRecord::new();
    record.push(
        ACQUISITION_ENGINE_CATEGORY,
        Section::Fields(ACQUISITION_ENGINE_KEYS.resolve(engine)),
    );
    record.push(UI_MODEL_CATEGORY, Section::Fields(UI_MODEL_PATHS.resolve(ui)));
    record
}

/// Extract a protocol descriptor from its JSON text.
///
/// Fails only when the text is not a JSON document.
pub fn extract_protocol(text: &str) -> Result<CategorizedRecord, DocumentError> {
    extract_protocol_bytes(text.as_bytes())
}

/// Extract a protocol descriptor from raw file bytes.
pub fn extract_protocol_bytes(bytes: &[u8]) -> Result<CategorizedRecord, DocumentError> {
    let root = parse_document(bytes, "protocol descriptor")?;
    let record = categorize_protocol(&root);
    debug!("Extracted protocol descriptor: {} categories", record.len());
    Ok(record)
}
