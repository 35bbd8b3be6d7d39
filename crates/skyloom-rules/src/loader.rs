use serde_json::Value;
use skyloom_core::SkyboxEntry;

use crate::metadata::Metadata;
use crate::registry::TypeRegistry;
use crate::validator::validate_entry;
use crate::DecodeError;

/// One raw document in a reload batch.
#[derive(Debug, Clone, Copy)]
pub struct SkyboxDocument<'a> {
    /// Where the document came from (file name, resource path); used in logs.
    pub id: &'a str,
    /// JSON text.
    pub contents: &'a str,
}

#[derive(Debug)]
pub struct LoadedSkybox {
    pub id: String,
    pub entry: SkyboxEntry,
}

#[derive(Debug)]
pub struct SkippedDocument {
    pub id: String,
    pub error: DecodeError,
}

/// Outcome of a reload batch. Order of `entries` follows input order.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub entries: Vec<LoadedSkybox>,
    pub skipped: Vec<SkippedDocument>,
}

impl LoadReport {
    pub fn into_entries(self) -> Vec<SkyboxEntry> {
        self.entries.into_iter().map(|loaded| loaded.entry).collect()
    }
}

/// Decode one parsed document: read the header, resolve the type, then take
/// either the legacy (version 1) or the versioned path.
pub fn decode_document(registry: &TypeRegistry, document: &Value) -> Result<SkyboxEntry, DecodeError> {
    let metadata = Metadata::from_value(document)?;
    let descriptor = registry.resolve(&metadata.type_name)?;

    let entry = if metadata.is_legacy() {
        if metadata.schema_version != 1 {
            return Err(DecodeError::UnsupportedSchemaVersion {
                type_name: descriptor.name().to_string(),
                version: metadata.schema_version,
            });
        }
        let (Some(mut entry), Some(decode)) = (
            descriptor.instantiate().filter(|_| descriptor.legacy_supported()),
            descriptor.legacy_decoder(),
        ) else {
            return Err(DecodeError::UnsupportedLegacySchema(
                descriptor.name().to_string(),
            ));
        };
        log::debug!("Decoding '{}' with the legacy schema", descriptor.name());
        decode(document, &mut entry)?;
        entry
    } else {
        let decode = registry.decoder_for(descriptor.name(), metadata.schema_version)?;
        decode(document)?
    };

    validate_entry(&entry).map_err(|errors| {
        let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
        DecodeError::MalformedDocument(joined.join("; "))
    })?;
    Ok(entry)
}

/// Parse JSON text and decode it.
pub fn decode_str(registry: &TypeRegistry, json: &str) -> Result<SkyboxEntry, DecodeError> {
    let document: Value = serde_json::from_str(json).map_err(DecodeError::malformed)?;
    decode_document(registry, &document)
}

/// Decode a whole batch. A bad document is logged and skipped; it never
/// stops the rest of the batch.
pub fn decode_all(registry: &TypeRegistry, documents: &[SkyboxDocument<'_>]) -> LoadReport {
    let mut report = LoadReport::default();
    for doc in documents {
        match decode_str(registry, doc.contents) {
            Ok(entry) => report.entries.push(LoadedSkybox {
                id: doc.id.to_string(),
                entry,
            }),
            Err(error) => {
                match &error {
                    DecodeError::MalformedDocument(_) => {
                        log::error!("Skipping skybox '{}': {}", doc.id, error)
                    }
                    _ => log::warn!("Skipping skybox '{}': {}", doc.id, error),
                }
                report.skipped.push(SkippedDocument {
                    id: doc.id.to_string(),
                    error,
                });
            }
        }
    }
    log::info!(
        "Decoded {} skybox document(s), skipped {}",
        report.entries.len(),
        report.skipped.len()
    );
    report
}
