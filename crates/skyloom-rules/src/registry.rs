use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde_json::Value;
use skyloom_core::constants::{
    ANIMATED_SQUARE_TEXTURED_SKYBOX, MONO_COLOR_SKYBOX,
    SINGLE_SPRITE_ANIMATED_SQUARE_TEXTURED_SKYBOX, SINGLE_SPRITE_SQUARE_TEXTURED_SKYBOX,
    SQUARE_TEXTURED_SKYBOX,
};
use skyloom_core::SkyboxEntry;
use thiserror::Error;

use crate::metadata::normalize_type_name;
use crate::{legacy, schema, DecodeError};

/// Builds the default instance the legacy decoder fills in.
pub type Factory = fn() -> SkyboxEntry;
/// Reads flat, loosely-typed legacy keys into a default instance.
pub type LegacyDecoder = fn(&Value, &mut SkyboxEntry) -> Result<(), DecodeError>;
/// Decodes a whole versioned document into a finished entry.
pub type VersionedDecoder = fn(&Value) -> Result<SkyboxEntry, DecodeError>;

/// Setup-phase failures. These indicate a programming error in whoever
/// registers types, not bad user data.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Skybox type name '{0}' is already registered")]
    DuplicateType(String),
    #[error("Skybox type '{type_name}' registers schema version {version}; versioned decoders start at 2")]
    InvalidSchemaVersion { type_name: String, version: u32 },
    #[error("Skybox type '{0}' declares legacy support without both a factory and a legacy decoder")]
    IncompleteLegacySupport(String),
}

/// Registry record for one skybox type.
#[derive(Clone)]
pub struct SkyboxTypeDescriptor {
    name: String,
    aliases: Vec<String>,
    legacy_supported: bool,
    factory: Option<Factory>,
    legacy_decoder: Option<LegacyDecoder>,
    decoders: BTreeMap<u32, VersionedDecoder>,
}

impl SkyboxTypeDescriptor {
    pub fn new(
        name: &str,
        legacy_supported: bool,
        factory: Option<Factory>,
        legacy_decoder: Option<LegacyDecoder>,
    ) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            legacy_supported,
            factory,
            legacy_decoder,
            decoders: BTreeMap::new(),
        }
    }

    /// Additional name this type resolves from.
    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn versioned(mut self, schema_version: u32, decoder: VersionedDecoder) -> Self {
        self.decoders.insert(schema_version, decoder);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn legacy_supported(&self) -> bool {
        self.legacy_supported
    }

    pub fn schema_versions(&self) -> impl Iterator<Item = u32> + '_ {
        self.decoders.keys().copied()
    }

    /// Fresh default instance, if the type has a factory.
    pub fn instantiate(&self) -> Option<SkyboxEntry> {
        self.factory.map(|factory| factory())
    }

    pub fn legacy_decoder(&self) -> Option<LegacyDecoder> {
        self.legacy_decoder
    }

    pub fn decoder(&self, schema_version: u32) -> Option<VersionedDecoder> {
        self.decoders.get(&schema_version).copied()
    }

    fn lookup_names(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .map(|n| normalize_type_name(n))
    }
}

impl fmt::Debug for SkyboxTypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkyboxTypeDescriptor")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("legacy_supported", &self.legacy_supported)
            .field("schema_versions", &self.decoders.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Collects descriptors during setup. Consumed by [`TypeRegistryBuilder::build`].
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    descriptors: Vec<SkyboxTypeDescriptor>,
    index: HashMap<String, usize>,
}

impl TypeRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type. Names and aliases must be unique after normalisation.
    pub fn register(
        &mut self,
        descriptor: SkyboxTypeDescriptor,
    ) -> Result<&mut Self, RegistryError> {
        if descriptor.legacy_supported
            && (descriptor.factory.is_none() || descriptor.legacy_decoder.is_none())
        {
            return Err(RegistryError::IncompleteLegacySupport(descriptor.name));
        }
        let below_two = descriptor.schema_versions().find(|&v| v < 2);
        if let Some(version) = below_two {
            return Err(RegistryError::InvalidSchemaVersion {
                type_name: descriptor.name,
                version,
            });
        }

        let names: Vec<String> = descriptor.lookup_names().collect();
        for (i, name) in names.iter().enumerate() {
            if self.index.contains_key(name) || names[..i].contains(name) {
                return Err(RegistryError::DuplicateType(name.clone()));
            }
        }

        let slot = self.descriptors.len();
        for name in names {
            self.index.insert(name, slot);
        }
        log::info!(
            "Registered skybox type '{}' (legacy: {}, versions: {:?})",
            descriptor.name,
            descriptor.legacy_supported,
            descriptor.schema_versions().collect::<Vec<_>>()
        );
        self.descriptors.push(descriptor);
        Ok(self)
    }

    pub fn build(self) -> TypeRegistry {
        TypeRegistry {
            descriptors: self.descriptors,
            index: self.index,
        }
    }
}

/// Immutable table of skybox types, built once before the first reload.
#[derive(Debug)]
pub struct TypeRegistry {
    descriptors: Vec<SkyboxTypeDescriptor>,
    index: HashMap<String, usize>,
}

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::new()
    }

    /// Find a type by name or alias (separator- and case-insensitive).
    pub fn resolve(&self, type_name: &str) -> Result<&SkyboxTypeDescriptor, DecodeError> {
        self.index
            .get(&normalize_type_name(type_name))
            .map(|&slot| &self.descriptors[slot])
            .ok_or_else(|| DecodeError::UnknownSkyboxType(type_name.to_string()))
    }

    /// Versioned decoder for a (type, version) pair.
    pub fn decoder_for(
        &self,
        type_name: &str,
        schema_version: i64,
    ) -> Result<VersionedDecoder, DecodeError> {
        let descriptor = self.resolve(type_name)?;
        u32::try_from(schema_version)
            .ok()
            .and_then(|version| descriptor.decoder(version))
            .ok_or_else(|| DecodeError::UnsupportedSchemaVersion {
                type_name: descriptor.name.clone(),
                version: schema_version,
            })
    }

    pub fn descriptors(&self) -> &[SkyboxTypeDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Register the five built-in skybox types.
pub fn register_builtins(builder: &mut TypeRegistryBuilder) -> Result<(), RegistryError> {
    builder
        .register(
            SkyboxTypeDescriptor::new(
                MONO_COLOR_SKYBOX,
                true,
                Some(legacy::new_mono_color),
                Some(legacy::decode_mono_color),
            )
            .alias("monocolor")
            .versioned(2, schema::decode_mono_color),
        )?
        .register(
            SkyboxTypeDescriptor::new(
                SQUARE_TEXTURED_SKYBOX,
                true,
                Some(legacy::new_square_textured),
                Some(legacy::decode_square_textured),
            )
            .alias("square-textured")
            .versioned(2, schema::decode_square_textured),
        )?
        .register(
            SkyboxTypeDescriptor::new(SINGLE_SPRITE_SQUARE_TEXTURED_SKYBOX, false, None, None)
                .alias("single-sprite-square-textured")
                .versioned(2, schema::decode_single_sprite_square_textured),
        )?
        .register(
            SkyboxTypeDescriptor::new(ANIMATED_SQUARE_TEXTURED_SKYBOX, false, None, None)
                .alias("animated-square-textured")
                .versioned(2, schema::decode_animated_square_textured),
        )?
        .register(
            SkyboxTypeDescriptor::new(
                SINGLE_SPRITE_ANIMATED_SQUARE_TEXTURED_SKYBOX,
                false,
                None,
                None,
            )
            .alias("single-sprite-animated-square-textured")
            .versioned(2, schema::decode_single_sprite_animated_square_textured),
        )?;
    Ok(())
}

/// Registry holding only the built-in types.
pub fn builtin_registry() -> Result<TypeRegistry, RegistryError> {
    let mut builder = TypeRegistry::builder();
    register_builtins(&mut builder)?;
    Ok(builder.build())
}
