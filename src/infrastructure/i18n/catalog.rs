use std::{collections::HashMap, fs, path::Path};

use serde_json::Value;

/// Locale-keyed message bundles with default-locale fallback.
///
/// Bundles are nested JSON objects flattened into dot-separated keys at load
/// time, e.g. `{"contact":{"errors":{"name_required":"..."}}}` becomes
/// `contact.errors.name_required`. Lookups try the requested locale first and
/// fall back to the default bundle for missing keys, so partially translated
/// locales degrade gracefully instead of showing raw keys.
pub struct MessageCatalog {
    default_locale: String,
    bundles: HashMap<String, HashMap<String, String>>,
}

impl MessageCatalog {
    pub fn empty(default_locale: &str) -> Self {
        MessageCatalog {
            default_locale: default_locale.to_string(),
            bundles: HashMap::new(),
        }
    }

    /// Load every `{locale}.json` in `dir`. The default locale's bundle must
    /// load; a broken bundle for any other locale is skipped with a warning,
    /// leaving those locales on the fallback path.
    pub fn from_dir(dir: impl AsRef<Path>, default_locale: &str) -> anyhow::Result<Self> {
        let mut catalog = MessageCatalog::empty(default_locale);

        for entry in fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(locale) = path.file_stem().and_then(|s| s.to_str()).map(String::from)
            else {
                continue;
            };

            let parsed = fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|raw| serde_json::from_str::<Value>(&raw).map_err(Into::into));

            match parsed {
                Ok(value) => catalog.insert_bundle(&locale, &value),
                Err(e) if locale == default_locale => {
                    anyhow::bail!("default locale bundle {:?} failed to load: {}", path, e)
                }
                Err(e) => {
                    tracing::warn!("skipping message bundle {:?}: {}", path, e);
                }
            }
        }

        if !catalog.bundles.contains_key(default_locale) {
            anyhow::bail!("no bundle found for default locale {:?}", default_locale);
        }
        Ok(catalog)
    }

    pub fn insert_bundle(&mut self, locale: &str, messages: &Value) {
        let mut flat = HashMap::new();
        flatten(messages, String::new(), &mut flat);
        self.bundles.insert(locale.to_string(), flat);
    }

    /// Resolve `key` for `locale`, falling back to the default locale.
    pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
        self.bundles
            .get(locale)
            .and_then(|bundle| bundle.get(key))
            .or_else(|| {
                self.bundles
                    .get(&self.default_locale)
                    .and_then(|bundle| bundle.get(key))
            })
            .map(String::as_str)
    }

    /// Like [`get`](Self::get), with a final hard-coded fallback.
    pub fn text<'a>(&'a self, locale: &str, key: &str, fallback: &'a str) -> &'a str {
        self.get(locale, key).unwrap_or(fallback)
    }
}

fn flatten(value: &Value, prefix: String, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let key = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten(v, key, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix, s.clone());
        }
        // Non-string leaves are not messages
        _ => {}
    }
}
