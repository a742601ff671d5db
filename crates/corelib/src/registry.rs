//! Global hash engine registry (thread-safe).
use std::collections::BTreeMap;
use std::sync::{Arc, Once, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crypto::blake3::Blake3;
use crate::crypto::engine::{HashEngine, OneShot};
use crate::crypto::keccak::Keccak256;
use crate::crypto::scratchpad::{self, ScratchpadEngine};
use crate::errors::RegistryError;

/// Engine used when callers do not pick one.
pub const DEFAULT_ENGINE_ID: &str = scratchpad::ENGINE_ID;

static REGISTRY: RwLock<BTreeMap<&'static str, Arc<dyn HashEngine>>> =
    RwLock::new(BTreeMap::new());
static INIT: Once = Once::new();

/// Public info returned by listing APIs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineInfo {
    pub id: String,
    pub memory_hard: bool,
    pub default: bool,
}

fn normalize(id: &str) -> String {
    id.trim().to_ascii_lowercase()
}

/// Add an engine under its id. Ids must already be in lookup form
/// (lowercase, trimmed) so that [`get_engine`] can find them.
pub fn register_engine(engine: Arc<dyn HashEngine>) -> Result<(), RegistryError> {
    let id = engine.id();
    if id.is_empty() || normalize(id) != id {
        return Err(RegistryError::InvalidEngineId(id.to_string()));
    }
    let mut guard = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    if guard.contains_key(id) {
        return Err(RegistryError::DuplicateEngine(id.to_string()));
    }
    debug!(engine = id, "registered hash engine");
    guard.insert(id, engine);
    Ok(())
}

pub fn list_engine_infos() -> Vec<EngineInfo> {
    ensure_builtins_registered();
    let guard = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    guard
        .iter()
        .map(|(id, engine)| EngineInfo {
            id: id.to_string(),
            memory_hard: engine.memory_hard(),
            default: *id == DEFAULT_ENGINE_ID,
        })
        .collect()
}

/// Look up an engine by id. Ids are matched case-insensitively.
pub fn get_engine(id: &str) -> Result<Arc<dyn HashEngine>, RegistryError> {
    ensure_builtins_registered();
    let guard = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    guard
        .get(normalize(id).as_str())
        .cloned()
        .ok_or_else(|| RegistryError::EngineNotFound(id.to_string()))
}

pub fn default_engine() -> Arc<dyn HashEngine> {
    ensure_builtins_registered();
    let guard = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    match guard.get(DEFAULT_ENGINE_ID) {
        Some(engine) => engine.clone(),
        None => Arc::new(ScratchpadEngine),
    }
}

/// Registers the builtin engines exactly once.
pub fn ensure_builtins_registered() {
    INIT.call_once(|| {
        // ignore duplicates: a caller may have registered a builtin id first
        let _ = register_engine(Arc::new(ScratchpadEngine));
        let _ = register_engine(Arc::new(OneShot::<Blake3>::default()));
        let _ = register_engine(Arc::new(OneShot::<Keccak256>::default()));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::Digest;
    use crate::errors::HashError;

    struct Zeroes;

    impl HashEngine for Zeroes {
        fn id(&self) -> &'static str {
            "test-zeroes"
        }

        fn hash(&self, _input: &[u8]) -> Result<Digest, HashError> {
            Ok(Digest::from_bytes([0u8; 32]))
        }
    }

    #[test]
    fn builtins_are_listed() {
        let infos = list_engine_infos();
        for id in ["blake3", "keccak256", "scratchpad"] {
            assert!(infos.iter().any(|i| i.id == id), "missing {id}");
        }
        let defaults: Vec<_> = infos.iter().filter(|i| i.default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, DEFAULT_ENGINE_ID);
        assert!(defaults[0].memory_hard);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(get_engine(" BLAKE3 ").unwrap().id(), "blake3");
    }

    #[test]
    fn unknown_engine_is_an_error() {
        assert!(matches!(
            get_engine("sha1"),
            Err(RegistryError::EngineNotFound(id)) if id == "sha1"
        ));
    }

    #[test]
    fn custom_engines_can_be_plugged_in() {
        register_engine(Arc::new(Zeroes)).unwrap();
        assert!(matches!(
            register_engine(Arc::new(Zeroes)),
            Err(RegistryError::DuplicateEngine(_))
        ));
        let engine = get_engine("test-zeroes").unwrap();
        assert_eq!(engine.hash(b"anything").unwrap().as_bytes(), &[0u8; 32]);
    }

    struct Named(&'static str);

    impl HashEngine for Named {
        fn id(&self) -> &'static str {
            self.0
        }

        fn hash(&self, _input: &[u8]) -> Result<Digest, HashError> {
            Ok(Digest::from_bytes([7u8; 32]))
        }
    }

    #[test]
    fn non_lookup_form_ids_are_rejected() {
        for id in ["MixedCase", " padded ", ""] {
            assert!(matches!(
                register_engine(Arc::new(Named(id))),
                Err(RegistryError::InvalidEngineId(bad)) if bad == id
            ));
        }
        assert!(!list_engine_infos().iter().any(|i| i.id == "MixedCase"));

        register_engine(Arc::new(Named("mixedcase"))).unwrap();
        assert_eq!(get_engine("MixedCase").unwrap().id(), "mixedcase");
    }

    #[test]
    fn default_engine_is_scratchpad() {
        assert_eq!(default_engine().id(), DEFAULT_ENGINE_ID);
    }
}
