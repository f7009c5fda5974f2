//! `Entry` and `Vault` types: the plaintext content of a vault file.
//!
//! Once decrypted, the payload is a JSON object keyed by entry name:
//!
//! ```json
//! { "shodan_api": { "key": "abc123", "inTools": ["Recon-NG", "Spiderfoot"] } }
//! ```
//!
//! Object order is the vault order.  A payload that repeats a name is
//! rejected when loaded instead of letting the last occurrence win.

use std::collections::BTreeSet;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// One named API credential and the tools allowed to receive it.
#[derive(Clone, PartialEq, Eq)]
pub struct Entry {
    /// Unique entry name, e.g. `shodan_api`.
    pub name: String,

    /// The API key.  Empty after a wipe or before one is set.
    pub secret: String,

    /// External tools that get this key on propagation.
    pub tools: BTreeSet<String>,
}

impl Entry {
    pub fn new<I, S>(name: &str, secret: &str, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            secret: secret.to_string(),
            tools: tools.into_iter().map(Into::into).collect(),
        }
    }
}

impl Drop for Entry {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("secret", &"[REDACTED]")
            .field("tools", &self.tools)
            .finish()
    }
}

/// On-disk body of an entry, borrowed for serialization.
#[derive(Serialize)]
struct EntryBodyRef<'a> {
    key: &'a str,
    #[serde(rename = "inTools")]
    in_tools: &'a BTreeSet<String>,
}

/// On-disk body of an entry, owned for deserialization.
#[derive(Deserialize)]
struct EntryBody {
    #[serde(default)]
    key: String,
    #[serde(rename = "inTools", default)]
    in_tools: BTreeSet<String>,
}

impl Drop for EntryBody {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// Ordered collection of entries with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vault {
    entries: Vec<Entry>,
}

impl Vault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Vec<Entry> {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the entry called `name`, if any.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

impl Serialize for Vault {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(
                &entry.name,
                &EntryBodyRef {
                    key: &entry.secret,
                    in_tools: &entry.tools,
                },
            )?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Vault {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct VaultVisitor;

        impl<'de> Visitor<'de> for VaultVisitor {
            type Value = Vault;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of entry name to {key, inTools}")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Vault, A::Error> {
                let mut entries: Vec<Entry> = Vec::with_capacity(access.size_hint().unwrap_or(0));

                while let Some((name, body)) = access.next_entry::<String, EntryBody>()? {
                    if entries.iter().any(|e| e.name == name) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate entry '{name}'"
                        )));
                    }
                    entries.push(Entry {
                        secret: body.key.clone(),
                        tools: body.in_tools.clone(),
                        name,
                    });
                }

                Ok(Vault { entries })
            }
        }

        deserializer.deserialize_map(VaultVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_vault_order_with_original_field_names() {
        let mut vault = Vault::new();
        vault
            .entries_mut()
            .push(Entry::new("zeta_api", "z", ["Spiderfoot"]));
        vault.entries_mut().push(Entry::new("alpha_api", "", Vec::<String>::new()));

        let json = serde_json::to_string(&vault).unwrap();
        assert_eq!(
            json,
            r#"{"zeta_api":{"key":"z","inTools":["Spiderfoot"]},"alpha_api":{"key":"","inTools":[]}}"#
        );
    }

    #[test]
    fn load_preserves_file_order() {
        let json = r#"{"b":{"key":"2","inTools":[]},"a":{"key":"1","inTools":["Recon-NG"]}}"#;
        let vault: Vault = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = vault.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert!(vault.get("a").unwrap().tools.contains("Recon-NG"));
    }

    #[test]
    fn load_rejects_duplicate_names() {
        let json = r#"{"x":{"key":"1","inTools":[]},"x":{"key":"2","inTools":[]}}"#;
        let err = serde_json::from_str::<Vault>(json).unwrap_err();
        assert!(err.to_string().contains("duplicate entry 'x'"));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let vault: Vault = serde_json::from_str(r#"{"github_api":{}}"#).unwrap();
        let entry = vault.get("github_api").unwrap();
        assert!(entry.secret.is_empty());
        assert!(entry.tools.is_empty());
    }

    #[test]
    fn debug_output_redacts_secret() {
        let entry = Entry::new("shodan_api", "very-secret", ["Spiderfoot"]);
        let shown = format!("{entry:?}");
        assert!(!shown.contains("very-secret"));
        assert!(shown.contains("shodan_api"));
    }
}
