//! Persona library
//!
//! A persona is pure configuration: a name plus style directives for the
//! report writer. Personas never influence the numbers.
//!
//! Personas are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/coach/config/personas.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Embedded default personas (compiled into binary)
const DEFAULT_PERSONAS: &str = include_str!("../../../config/personas.toml");

/// A conversational style for the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Stable identifier, e.g. "tough-love"
    pub id: String,
    /// Display name, e.g. "Tough Love"
    pub name: String,
    pub directives: Vec<String>,
}

impl Persona {
    /// Directives joined into one paragraph
    pub fn style(&self) -> String {
        self.directives.join(" ")
    }
}

#[derive(Debug, Deserialize)]
struct RawLibrary {
    default: Option<String>,
    #[serde(default, rename = "persona")]
    personas: Vec<Persona>,
}

/// Loaded set of personas
#[derive(Debug, Clone)]
pub struct PersonaLibrary {
    personas: Vec<Persona>,
    default_id: String,
    /// Path to override file (if one was used)
    override_path: Option<PathBuf>,
}

impl PersonaLibrary {
    /// Load from the default override location, falling back to embedded defaults
    ///
    /// A broken override is logged and ignored.
    pub fn load() -> Result<Self> {
        let Some(path) = default_personas_path() else {
            return Self::embedded();
        };
        match Self::from_path(&path) {
            Ok(library) => Ok(library),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring invalid persona override");
                Self::embedded()
            }
        }
    }

    /// Load from an explicit path; a missing file falls back to embedded defaults
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Self::embedded();
        }
        debug!(path = %path.display(), "Loading persona override");
        let content = fs::read_to_string(path)
            .map_err(|e| Error::InvalidData(format!("Failed to read personas: {}", e)))?;
        let mut library = parse_library(&content)?;
        library.override_path = Some(path.to_path_buf());
        Ok(library)
    }

    /// Embedded personas only
    pub fn embedded() -> Result<Self> {
        parse_library(DEFAULT_PERSONAS)
    }

    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    pub fn override_path(&self) -> Option<&Path> {
        self.override_path.as_deref()
    }

    /// Find a persona by id or (case-insensitive) display name
    pub fn get(&self, key: &str) -> Result<&Persona> {
        let key = key.trim();
        self.personas
            .iter()
            .find(|p| p.id == key || p.name.eq_ignore_ascii_case(key))
            .ok_or_else(|| Error::NotFound(format!("persona '{}'", key)))
    }

    pub fn default_persona(&self) -> &Persona {
        // parse_library guarantees the default id exists
        self.personas
            .iter()
            .find(|p| p.id == self.default_id)
            .unwrap_or(&self.personas[0])
    }
}

/// Default persona override path
pub fn default_personas_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("coach").join("config").join("personas.toml"))
}

fn parse_library(content: &str) -> Result<PersonaLibrary> {
    let raw: RawLibrary = toml::from_str(content)
        .map_err(|e| Error::InvalidData(format!("Invalid personas TOML: {}", e)))?;

    if raw.personas.is_empty() {
        return Err(Error::InvalidData("persona library is empty".into()));
    }
    for (i, persona) in raw.personas.iter().enumerate() {
        if raw.personas[..i].iter().any(|p| p.id == persona.id) {
            return Err(Error::InvalidData(format!(
                "duplicate persona id '{}'",
                persona.id
            )));
        }
    }

    let default_id = raw.default.unwrap_or_else(|| raw.personas[0].id.clone());
    if !raw.personas.iter().any(|p| p.id == default_id) {
        return Err(Error::InvalidData(format!(
            "default persona '{}' is not defined",
            default_id
        )));
    }

    Ok(PersonaLibrary {
        personas: raw.personas,
        default_id,
        override_path: None,
    })
}
