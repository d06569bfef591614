use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One race participant.
///
/// Names are trimmed and must not be blank. Neither names nor values are
/// unique: ties and duplicates are expected and resolved by the layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct Record {
    name: String,
    value: u64,
    icon_ref: String,
}

impl Record {
    pub fn new(name: impl AsRef<str>, value: u64) -> ChartResult<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(ChartError::InvalidData(
                "record name must not be blank".to_owned(),
            ));
        }

        Ok(Self {
            name: name.to_owned(),
            value,
            icon_ref: String::new(),
        })
    }

    /// Attaches an icon reference (URL, raster path or literal glyph).
    #[must_use]
    pub fn with_icon(mut self, icon_ref: impl AsRef<str>) -> Self {
        self.icon_ref = icon_ref.as_ref().trim().to_owned();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.value
    }

    #[must_use]
    pub fn icon_ref(&self) -> &str {
        &self.icon_ref
    }

    #[must_use]
    pub fn has_icon(&self) -> bool {
        !self.icon_ref.is_empty()
    }
}

#[derive(Deserialize)]
struct RawRecord {
    name: String,
    value: u64,
    #[serde(default)]
    icon_ref: String,
}

impl TryFrom<RawRecord> for Record {
    type Error = ChartError;

    fn try_from(raw: RawRecord) -> ChartResult<Self> {
        Ok(Self::new(raw.name, raw.value)?.with_icon(raw.icon_ref))
    }
}

/// Input indices ordered by value ascending, ties kept in input order.
#[must_use]
pub fn value_order(records: &[Record]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by_key(|&index| records[index].value);
    order
}

#[cfg(test)]
mod tests {
    use super::{Record, value_order};

    #[test]
    fn record_name_is_trimmed_and_blank_is_rejected() {
        let record = Record::new("  Ana  ", 3).expect("valid record");
        assert_eq!(record.name(), "Ana");
        assert!(Record::new("   ", 3).is_err());
    }

    #[test]
    fn value_order_is_stable_for_ties() {
        let records = vec![
            Record::new("c", 5).expect("c"),
            Record::new("a", 1).expect("a"),
            Record::new("b", 5).expect("b"),
            Record::new("d", 1).expect("d"),
        ];
        assert_eq!(value_order(&records), vec![1, 3, 0, 2]);
    }

    #[test]
    fn deserialized_record_is_validated() {
        let ok: Record =
            serde_json::from_str(r#"{"name":" Bo ","value":7,"icon_ref":" 🐢 "}"#).expect("ok");
        assert_eq!(ok.name(), "Bo");
        assert_eq!(ok.icon_ref(), "🐢");

        let blank = serde_json::from_str::<Record>(r#"{"name":"  ","value":7}"#);
        assert!(blank.is_err());
    }
}
