use serde::{Deserialize, Serialize};

/// Request paths exempted from gate synchronization.
///
/// Prefixes match on `/` boundaries: `/assets` covers `/assets` and
/// `/assets/app.css` but not `/assets2/app.css`. The default set contains
/// the conventional static-assets prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawBypassRules")]
pub struct BypassRules {
    prefixes: Vec<String>,
}

/// Unvalidated mirror of [`BypassRules`]; deserialized input is normalized
/// through the same path as programmatic construction.
#[derive(Deserialize)]
struct RawBypassRules {
    prefixes: Vec<String>,
}

impl From<RawBypassRules> for BypassRules {
    fn from(raw: RawBypassRules) -> Self {
        Self::with_prefixes(raw.prefixes)
    }
}

impl Default for BypassRules {
    fn default() -> Self {
        Self::with_prefixes(["/assets"])
    }
}

impl BypassRules {
    /// Rules matching the given path prefixes.
    ///
    /// Prefixes are normalized (surrounding whitespace and slashes removed);
    /// entries that normalize to nothing are dropped.
    pub fn with_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefixes = prefixes
            .into_iter()
            .filter_map(|p| {
                let normalized = normalize_prefix(p.as_ref());
                (!normalized.is_empty()).then_some(normalized)
            })
            .collect();
        Self { prefixes }
    }

    /// Rules that bypass nothing: every request goes through the gate.
    pub fn none() -> Self {
        Self {
            prefixes: Vec::new(),
        }
    }

    /// Whether `path` (as reported by the request URI) is in the bypass set.
    pub fn matches(&self, path: &str) -> bool {
        let path = path.trim_matches('/');
        self.prefixes
            .iter()
            .any(|prefix| prefix_matches(prefix, path))
    }

    /// The normalized prefixes in effect.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

fn normalize_prefix(raw: &str) -> String {
    let value = raw.trim().trim_matches('/');
    if value == "." {
        return String::new();
    }
    value.to_string()
}

fn prefix_matches(prefix: &str, path: &str) -> bool {
    if path == prefix {
        return true;
    }

    if !path.starts_with(prefix) {
        return false;
    }

    path.as_bytes().get(prefix.len()) == Some(&b'/')
}
