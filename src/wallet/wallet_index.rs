use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use chrono::Local;
use chrono::NaiveDateTime;
use chrono::Timelike;
use serde::Deserialize;
use serde::Serialize;

use super::seed_phrase::WordCount;
use crate::error::ValidationError;

/// Where a wallet's vault file lives and what it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRecord {
    pub file: PathBuf,

    #[serde(with = "created_format")]
    pub created: NaiveDateTime,

    pub word_count: WordCount,
}

impl WalletRecord {
    /// A record stamped with the current local time, truncated to seconds.
    pub fn new(file: PathBuf, word_count: WordCount) -> Self {
        let now = Local::now().naive_local();
        Self {
            file,
            created: now.with_nanosecond(0).unwrap_or(now),
            word_count,
        }
    }
}

mod created_format {
    use chrono::NaiveDateTime;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub(super) fn serialize<S: Serializer>(
        created: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&created.format(FORMAT))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Wallet name to record mapping.
///
/// Names are unique and iterate in sorted order, which is also the order
/// used for numbered selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletIndex {
    wallets: BTreeMap<String, WalletRecord>,
}

impl WalletIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.wallets.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&WalletRecord> {
        self.wallets.get(name)
    }

    /// Insert or replace. Returns the replaced record, if any.
    pub fn insert(&mut self, name: impl Into<String>, record: WalletRecord) -> Option<WalletRecord> {
        self.wallets.insert(name.into(), record)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WalletRecord)> {
        self.wallets.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// The name of a wallet whose record points at `file`.
    pub fn owner_of(&self, file: &Path) -> Option<&str> {
        self.wallets
            .iter()
            .find(|(_, record)| record.file == file)
            .map(|(name, _)| name.as_str())
    }

    /// Point an existing record at a new vault file location.
    ///
    /// Returns `false` if there is no wallet by that name.
    pub fn relocate(&mut self, name: &str, file: &Path) -> bool {
        match self.wallets.get_mut(name) {
            Some(record) => {
                record.file = file.to_path_buf();
                true
            }
            None => false,
        }
    }

    /// Resolve user input to a wallet name.
    ///
    /// Accepts a 1-based position in iteration order or an exact name. A
    /// number is tried as a position first.
    pub fn resolve(&self, selection: &str) -> Result<&str, ValidationError> {
        let selection = selection.trim();

        if let Ok(position) = selection.parse::<usize>() {
            if let Some((name, _)) = position
                .checked_sub(1)
                .and_then(|i| self.wallets.iter().nth(i))
            {
                return Ok(name.as_str());
            }
        }

        self.wallets
            .get_key_value(selection)
            .map(|(name, _)| name.as_str())
            .ok_or(ValidationError::UnknownSelection)
    }

    /// Take over every entry of `other` whose name is not already present.
    ///
    /// Entries already in `self` win. Returns the number of names added.
    pub fn absorb_missing(&mut self, other: WalletIndex) -> usize {
        let mut added = 0;
        for (name, record) in other.wallets {
            if let Entry::Vacant(slot) = self.wallets.entry(name) {
                slot.insert(record);
                added += 1;
            }
        }
        added
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(file: &str) -> WalletRecord {
        WalletRecord {
            file: PathBuf::from(file),
            created: NaiveDate::from_ymd_opt(2024, 3, 9)
                .and_then(|d| d.and_hms_opt(14, 5, 7))
                .unwrap(),
            word_count: WordCount::Twelve,
        }
    }

    fn sample_index() -> WalletIndex {
        let mut index = WalletIndex::new();
        index.insert("hot", record("hot.seed"));
        index.insert("cold-1", record("cold-1.seed"));
        index.insert("backup", record("backup.seed"));
        index
    }

    #[test]
    fn json_layout() {
        let mut index = WalletIndex::new();
        index.insert("cold-1", record("/data/cold-1.seed"));

        let json: serde_json::Value = serde_json::from_slice(&index.to_json().unwrap()).unwrap();

        assert_eq!(
            serde_json::json!({
                "cold-1": {
                    "file": "/data/cold-1.seed",
                    "created": "2024-03-09 14:05:07",
                    "word_count": 12
                }
            }),
            json
        );
    }

    #[test]
    fn json_roundtrip() {
        let index = sample_index();
        let restored = WalletIndex::from_json(&index.to_json().unwrap()).unwrap();

        assert_eq!(index, restored);
    }

    #[test]
    fn rejects_bad_word_count_on_load() {
        let json = br#"{"w":{"file":"w.seed","created":"2024-03-09 14:05:07","word_count":13}}"#;

        assert!(WalletIndex::from_json(json).is_err());
    }

    #[test]
    fn resolve_by_number_and_name() {
        let index = sample_index();

        assert_eq!(Ok("backup"), index.resolve("1"));
        assert_eq!(Ok("cold-1"), index.resolve(" 2 "));
        assert_eq!(Ok("hot"), index.resolve("hot"));
        assert_eq!(Err(ValidationError::UnknownSelection), index.resolve("0"));
        assert_eq!(Err(ValidationError::UnknownSelection), index.resolve("4"));
        assert_eq!(Err(ValidationError::UnknownSelection), index.resolve("cold"));
    }

    #[test]
    fn numeric_names_resolve_when_out_of_range() {
        let mut index = WalletIndex::new();
        index.insert("2021", record("2021.seed"));

        assert_eq!(Ok("2021"), index.resolve("1"));
        assert_eq!(Ok("2021"), index.resolve("2021"));
    }

    #[test]
    fn relocate_updates_only_known_names() {
        let mut index = sample_index();

        assert!(index.relocate("hot", Path::new("/mnt/usb/hot.seed")));
        assert!(!index.relocate("missing", Path::new("/mnt/usb/x.seed")));
        assert_eq!(
            Path::new("/mnt/usb/hot.seed"),
            index.get("hot").unwrap().file
        );
    }

    #[test]
    fn owner_of_finds_the_record_for_a_file() {
        let index = sample_index();

        assert_eq!(Some("hot"), index.owner_of(Path::new("hot.seed")));
        assert_eq!(None, index.owner_of(Path::new("elsewhere/hot.seed")));
    }

    #[test]
    fn absorb_keeps_existing_entries() {
        let mut in_memory = WalletIndex::new();
        in_memory.insert("hot", record("moved/hot.seed"));

        let added = in_memory.absorb_missing(sample_index());

        assert_eq!(2, added);
        assert_eq!(3, in_memory.len());
        assert_eq!(Path::new("moved/hot.seed"), in_memory.get("hot").unwrap().file);
    }

    #[test]
    fn new_record_has_whole_seconds() {
        let record = WalletRecord::new(PathBuf::from("x.seed"), WordCount::Eighteen);

        assert_eq!(0, record.created.nanosecond());
    }
}
