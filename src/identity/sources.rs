//! Identity datasets stored under the mapping information directory.
//!
//! Every dataset is optional: a missing file is "no data", never an error.

use crate::parser::schema::{AddressInfo, ClaimEntry, IdentifierInfo, SpecialAddressEntry};
use crate::utils::config::{LEGAL_LINKS_FILE, SPECIAL_ADDRESSES_FILE};
use crate::utils::error::{IdentityError, TimeframeError};
use crate::utils::timeframe::{claim_window, Timeframe};
use log::debug;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// An assertion that `claimant` is owned by `owner` during `[from, to)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub claimant: String,
    pub owner: String,
    pub from: String,
    pub to: String,
}

impl Claim {
    pub fn new(
        claimant: impl Into<String>,
        owner: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            claimant: claimant.into(),
            owner: owner.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Days during which the claim holds
    pub fn window(&self) -> Result<Timeframe, TimeframeError> {
        claim_window(&self.from, &self.to)
    }
}

/// Identity data the classifier needs for one ledger
#[derive(Debug, Clone, Default)]
pub struct IdentityData {
    /// `(tag, entity name)` in file order
    pub identifiers: Vec<(String, String)>,

    /// Address -> entity name
    pub addresses: HashMap<String, String>,

    /// Addresses that never identify a block producer
    pub special_addresses: HashSet<String>,
}

impl IdentityData {
    /// Entity registered for exactly this identifier
    pub fn identifier_exact(&self, identifier: &str) -> Option<&str> {
        self.identifiers
            .iter()
            .find(|(tag, _)| tag == identifier)
            .map(|(_, name)| name.as_str())
    }

    /// Entity of the first known tag that occurs inside `identifiers`
    pub fn identifier_within(&self, identifiers: &str) -> Option<&str> {
        self.identifiers
            .iter()
            .find(|(tag, _)| !tag.is_empty() && identifiers.contains(tag.as_str()))
            .map(|(_, name)| name.as_str())
    }

    pub fn address_owner(&self, address: &str) -> Option<&str> {
        self.addresses.get(address).map(String::as_str)
    }

    pub fn is_special(&self, address: &str) -> bool {
        self.special_addresses.contains(address)
    }
}

/// Directory-backed access to the identity datasets
#[derive(Debug, Clone)]
pub struct MappingInfo {
    root: PathBuf,
}

impl MappingInfo {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Known identifiers of a ledger, in file order
    pub fn identifiers(&self, ledger: &str) -> Result<Vec<(String, String)>, IdentityError> {
        let path = self.root.join("identifiers").join(format!("{}.json", ledger));
        let entries: Vec<(String, IdentifierInfo)> = read_ordered(&path)?;
        Ok(entries.into_iter().map(|(tag, info)| (tag, info.name)).collect())
    }

    /// Known addresses of a ledger
    pub fn addresses(&self, ledger: &str) -> Result<HashMap<String, String>, IdentityError> {
        let path = self.root.join("addresses").join(format!("{}.json", ledger));
        let entries: HashMap<String, AddressInfo> = read_optional(&path)?.unwrap_or_default();
        Ok(entries
            .into_iter()
            .map(|(address, info)| (address, info.name))
            .collect())
    }

    /// Special addresses of a ledger
    pub fn special_addresses(&self, ledger: &str) -> Result<HashSet<String>, IdentityError> {
        let path = self.root.join(SPECIAL_ADDRESSES_FILE);
        let mut all: HashMap<String, Vec<SpecialAddressEntry>> =
            read_optional(&path)?.unwrap_or_default();
        Ok(all
            .remove(ledger)
            .unwrap_or_default()
            .into_iter()
            .map(|entry| entry.address)
            .collect())
    }

    /// Ownership claims from the ledger's cluster file
    pub fn cluster_claims(&self, ledger: &str) -> Result<Vec<Claim>, IdentityError> {
        self.claims(&self.root.join("clusters").join(format!("{}.json", ledger)))
    }

    /// Ownership claims from the legal links file shared by all ledgers
    pub fn legal_link_claims(&self) -> Result<Vec<Claim>, IdentityError> {
        self.claims(&self.root.join(LEGAL_LINKS_FILE))
    }

    /// Everything the classifier needs for one ledger
    pub fn identity_data(&self, ledger: &str) -> Result<IdentityData, IdentityError> {
        let data = IdentityData {
            identifiers: self.identifiers(ledger)?,
            addresses: self.addresses(ledger)?,
            special_addresses: self.special_addresses(ledger)?,
        };
        debug!(
            "Identity data for {}: {} identifiers, {} addresses, {} special addresses",
            ledger,
            data.identifiers.len(),
            data.addresses.len(),
            data.special_addresses.len()
        );
        Ok(data)
    }

    fn claims(&self, path: &Path) -> Result<Vec<Claim>, IdentityError> {
        let groups: Vec<(String, Vec<ClaimEntry>)> = read_ordered(path)?;
        Ok(groups
            .into_iter()
            .flat_map(|(owner, entries)| {
                entries.into_iter().map(move |entry| Claim {
                    claimant: entry.name,
                    owner: owner.clone(),
                    from: entry.from,
                    to: entry.to,
                })
            })
            .collect())
    }
}

/// Read a JSON file, treating "not found" as no data
fn read_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, IdentityError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No identity data at {}", path.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(IdentityError::ReadFailed {
                path: path.display().to_string(),
                source,
            })
        }
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| IdentityError::InvalidData {
            path: path.display().to_string(),
            source,
        })
}

/// Read a JSON object as `(key, value)` pairs in file order
fn read_ordered<T: DeserializeOwned>(path: &Path) -> Result<Vec<(String, T)>, IdentityError> {
    let Some(object) = read_optional::<serde_json::Map<String, serde_json::Value>>(path)? else {
        return Ok(Vec::new());
    };

    object
        .into_iter()
        .map(|(key, value)| {
            serde_json::from_value(value)
                .map(|parsed| (key, parsed))
                .map_err(|source| IdentityError::InvalidData {
                    path: path.display().to_string(),
                    source,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_missing_files_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let info = MappingInfo::new(dir.path());

        let data = info.identity_data("bitcoin").unwrap();
        assert!(data.identifiers.is_empty());
        assert!(data.addresses.is_empty());
        assert!(data.special_addresses.is_empty());
        assert!(info.cluster_claims("bitcoin").unwrap().is_empty());
        assert!(info.legal_link_claims().unwrap().is_empty());
    }

    #[test]
    fn test_identifiers_keep_file_order() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "identifiers/bitcoin.json",
            r#"{"zz": {"name": "Last"}, "aa": {"name": "First", "link": "x"}}"#,
        );

        let identifiers = MappingInfo::new(dir.path()).identifiers("bitcoin").unwrap();
        assert_eq!(
            identifiers,
            vec![
                ("zz".to_string(), "Last".to_string()),
                ("aa".to_string(), "First".to_string())
            ]
        );
    }

    #[test]
    fn test_special_addresses_per_ledger() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            SPECIAL_ADDRESSES_FILE,
            r#"{"ethereum": [{"address": "0xdead", "source": "burn"}]}"#,
        );

        let info = MappingInfo::new(dir.path());
        assert!(info.special_addresses("ethereum").unwrap().contains("0xdead"));
        assert!(info.special_addresses("bitcoin").unwrap().is_empty());
    }

    #[test]
    fn test_claims_flatten_groups() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "clusters/bitcoin.json",
            r#"{"X": [{"name": "Y", "from": "2021", "to": ""}, {"name": "W"}], "V": [{"name": "U", "from": "", "to": "2020"}]}"#,
        );

        let claims = MappingInfo::new(dir.path()).cluster_claims("bitcoin").unwrap();
        assert_eq!(
            claims,
            vec![
                Claim::new("Y", "X", "2021", ""),
                Claim::new("W", "X", "", ""),
                Claim::new("U", "V", "", "2020"),
            ]
        );
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "addresses/bitcoin.json", "{not json");

        let result = MappingInfo::new(dir.path()).addresses("bitcoin");
        assert!(matches!(result, Err(IdentityError::InvalidData { .. })));
    }

    #[test]
    fn test_identifier_lookups() {
        let data = IdentityData {
            identifiers: vec![
                ("/slush/".to_string(), "Braiins".to_string()),
                ("F2Pool".to_string(), "F2Pool".to_string()),
            ],
            ..Default::default()
        };

        assert_eq!(data.identifier_within("Mined by F2Pool/slush/"), Some("Braiins"));
        assert_eq!(data.identifier_exact("F2Pool"), Some("F2Pool"));
        assert_eq!(data.identifier_exact("f2pool"), None);
        assert_eq!(data.identifier_within("nothing here"), None);
    }
}
