use std::{collections::HashMap, fs, path::PathBuf};

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use tracing::warn;

use crate::audit::DEFAULT_LOCALE;

use super::{interpolate, DefaultPhrases, PhraseLookup};

/// Loads phrase packs from `<locale>.json` files under a base directory.
///
/// Each file is a flat JSON object mapping phrase keys
/// (`audit.missing_title.issue`, ...) to templates with `{var}`
/// placeholders. Lookups fall back from the requested locale to the
/// default locale's file and finally to the built-in pack, so a partial
/// translation never breaks rendering.
pub struct FilePhraseRepository {
    base_path: PathBuf,
    cache: OnceCell<HashMap<String, HashMap<String, String>>>,
}

impl FilePhraseRepository {
    /// Create a repository rooted at the given directory.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            cache: OnceCell::new(),
        }
    }

    /// Eagerly load and validate every pack, returning the locale count.
    pub fn load(&self) -> Result<usize> {
        Ok(self.packs()?.len())
    }

    fn packs(&self) -> Result<&HashMap<String, HashMap<String, String>>> {
        self.cache.get_or_try_init(|| {
            let mut packs = HashMap::new();
            if !self.base_path.exists() {
                return Ok(packs);
            }
            let entries = fs::read_dir(&self.base_path).with_context(|| {
                format!(
                    "failed to read phrase pack directory at {}",
                    self.base_path.display()
                )
            })?;
            for entry in entries {
                let path = entry?.path();
                if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                    continue;
                }
                let Some(locale) = path.file_stem().and_then(|stem| stem.to_str()) else {
                    continue;
                };
                let raw = fs::read_to_string(&path).with_context(|| {
                    format!("failed to read phrase pack at {}", path.display())
                })?;
                let pack: HashMap<String, String> =
                    serde_json::from_str(&raw).with_context(|| {
                        format!("invalid JSON structure in phrase pack at {}", path.display())
                    })?;
                packs.insert(locale.to_string(), pack);
            }
            Ok(packs)
        })
    }

    fn template(&self, locale: &str, key: &str) -> Option<String> {
        let packs = match self.packs() {
            Ok(packs) => packs,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "phrase packs unavailable, using built-ins");
                return None;
            }
        };
        packs
            .get(locale)
            .and_then(|pack| pack.get(key))
            .or_else(|| packs.get(DEFAULT_LOCALE).and_then(|pack| pack.get(key)))
            .cloned()
    }
}

impl PhraseLookup for FilePhraseRepository {
    fn phrase(&self, locale: &str, key: &str, vars: &[(&'static str, String)]) -> Option<String> {
        self.template(locale, key)
            .map(|template| interpolate(&template, vars))
            .or_else(|| DefaultPhrases::template(key).map(|template| interpolate(template, vars)))
    }
}
