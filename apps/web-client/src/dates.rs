//! ISO calendar dates (`YYYY-MM-DD`) as the API sends them.

use time::format_description::FormatItem;
use time::macros::format_description;
use time::Date;

const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse `YYYY-MM-DD`. Longer strings (full timestamps) are cut to the date part.
pub fn parse_iso_date(raw: &str) -> Result<Date, time::error::Parse> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    Date::parse(date_part, ISO_DATE)
}

pub fn format_iso_date(date: Date) -> String {
    // ISO_DATE only has year/month/day components, all present on a Date.
    date.format(ISO_DATE).unwrap_or_default()
}

/// `#[serde(with = "crate::dates::iso")]`
pub mod iso {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_iso_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_iso_date(&raw).map_err(de::Error::custom)
    }

    /// `#[serde(with = "crate::dates::iso::option")]`
    pub mod option {
        use serde::{de, Deserialize, Deserializer, Serializer};
        use time::Date;

        pub fn serialize<S: Serializer>(
            date: &Option<Date>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => serializer.serialize_str(&super::super::format_iso_date(*date)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Date>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.trim().is_empty() => super::super::parse_iso_date(&raw)
                    .map(Some)
                    .map_err(de::Error::custom),
                _ => Ok(None),
            }
        }
    }
}
