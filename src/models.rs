//! Core data structures for BEPS section parsing.
//!
//! Every zone of a section produces its own record type. Each record knows
//! how to flatten itself into the ordered string fields of a report row, so
//! writers never depend on positional conventions.

use crate::constants::{END_USE_CATEGORIES, END_USE_CATEGORY_COUNT, METER_COLUMNS};
use serde::Serialize;
use std::fmt;

/// Energy types a DOE-2 meter can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EnergyType {
    #[serde(rename = "ELECTRICITY")]
    Electricity,
    #[serde(rename = "NATURAL-GAS")]
    NaturalGas,
    #[serde(rename = "LPG")]
    Lpg,
    #[serde(rename = "FUEL-OIL")]
    FuelOil,
    #[serde(rename = "DIESEL-OIL")]
    DieselOil,
    #[serde(rename = "COAL")]
    Coal,
    #[serde(rename = "METHANOL")]
    Methanol,
    #[serde(rename = "OTHER-FUEL")]
    OtherFuel,
    #[serde(rename = "STEAM")]
    Steam,
    #[serde(rename = "CHILLED-WATER")]
    ChilledWater,
}

impl EnergyType {
    pub const ALL: [EnergyType; 10] = [
        EnergyType::Electricity,
        EnergyType::NaturalGas,
        EnergyType::Lpg,
        EnergyType::FuelOil,
        EnergyType::DieselOil,
        EnergyType::Coal,
        EnergyType::Methanol,
        EnergyType::OtherFuel,
        EnergyType::Steam,
        EnergyType::ChilledWater,
    ];

    /// Token used for this energy type in the report
    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyType::Electricity => "ELECTRICITY",
            EnergyType::NaturalGas => "NATURAL-GAS",
            EnergyType::Lpg => "LPG",
            EnergyType::FuelOil => "FUEL-OIL",
            EnergyType::DieselOil => "DIESEL-OIL",
            EnergyType::Coal => "COAL",
            EnergyType::Methanol => "METHANOL",
            EnergyType::OtherFuel => "OTHER-FUEL",
            EnergyType::Steam => "STEAM",
            EnergyType::ChilledWater => "CHILLED-WATER",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == token)
    }
}

impl fmt::Display for EnergyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata row produced by a header parser; its layout is up to the parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderRow {
    pub fields: Vec<String>,
}

impl HeaderRow {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// Column labels of the meter table, identical for every report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryHeader {
    labels: Vec<&'static str>,
}

impl Default for CategoryHeader {
    fn default() -> Self {
        Self {
            labels: METER_COLUMNS
                .iter()
                .chain(END_USE_CATEGORIES.iter())
                .copied()
                .collect(),
        }
    }
}

impl CategoryHeader {
    pub fn labels(&self) -> &[&'static str] {
        &self.labels
    }
}

/// Name and energy type from a meter identity line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeterIdentity {
    pub name: String,
    pub energy_type: EnergyType,
}

/// Unit and per-category values from one data line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryData {
    pub unit: String,
    /// Literal values in [`END_USE_CATEGORIES`] order
    pub values: [String; END_USE_CATEGORY_COUNT],
}

impl CategoryData {
    /// Value reported for an end-use category label
    pub fn value(&self, category: &str) -> Option<&str> {
        END_USE_CATEGORIES
            .iter()
            .position(|c| *c == category)
            .map(|i| self.values[i].as_str())
    }

    /// Value of the TOTAL column
    pub fn total(&self) -> &str {
        &self.values[END_USE_CATEGORY_COUNT - 1]
    }
}

/// A named meter with its end-use breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeterRecord {
    pub meter: MeterIdentity,
    pub data: CategoryData,
}

/// One TOTAL SITE / SOURCE ENERGY line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TotalEnergyRecord {
    pub name: String,
    pub value: String,
    pub unit: String,
    pub value_per_gross_area: String,
    pub unit_per_gross_area: String,
    pub value_per_net_area: String,
    pub unit_per_net_area: String,
}

/// A `label = value` annotation such as unmet-hour percentages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PercentHoursRecord {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteRow {
    pub text: String,
}

/// One output row of a parsed section, tagged with the zone that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "zone", rename_all = "snake_case")]
pub enum BepsRow {
    Header(HeaderRow),
    Categories(CategoryHeader),
    Meter(MeterRecord),
    Summary(CategoryData),
    Total(TotalEnergyRecord),
    PercentHours(PercentHoursRecord),
    Note(NoteRow),
}

impl BepsRow {
    /// Ordered string fields of this row as they appear in tabular output
    pub fn fields(&self) -> Vec<&str> {
        match self {
            BepsRow::Header(row) => row.fields.iter().map(String::as_str).collect(),
            BepsRow::Categories(header) => header.labels().to_vec(),
            BepsRow::Meter(record) => {
                let mut fields = vec![record.meter.name.as_str(), record.meter.energy_type.as_str()];
                push_category_data(&mut fields, &record.data);
                fields
            }
            BepsRow::Summary(data) => {
                let mut fields = vec!["", ""];
                push_category_data(&mut fields, data);
                fields
            }
            BepsRow::Total(total) => vec![
                total.name.as_str(),
                total.value.as_str(),
                total.unit.as_str(),
                total.value_per_gross_area.as_str(),
                total.unit_per_gross_area.as_str(),
                total.value_per_net_area.as_str(),
                total.unit_per_net_area.as_str(),
            ],
            BepsRow::PercentHours(record) => vec![record.label.as_str(), record.value.as_str()],
            BepsRow::Note(note) => vec![note.text.as_str()],
        }
    }

    /// Number of fields in the flattened row
    pub fn arity(&self) -> usize {
        self.fields().len()
    }
}

fn push_category_data<'a>(fields: &mut Vec<&'a str>, data: &'a CategoryData) {
    fields.push(data.unit.as_str());
    fields.extend(data.values.iter().map(String::as_str));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> CategoryData {
        CategoryData {
            unit: "MBTU".to_string(),
            values: std::array::from_fn(|i| format!("{}.0", i + 1)),
        }
    }

    #[test]
    fn test_energy_type_tokens() {
        for energy_type in EnergyType::ALL {
            assert_eq!(EnergyType::from_token(energy_type.as_str()), Some(energy_type));
        }
        assert_eq!(EnergyType::from_token("ELECTRIC"), None);
    }

    #[test]
    fn test_category_header_is_fixed() {
        let header = CategoryHeader::default();
        assert_eq!(header.labels().len(), crate::constants::METER_ROW_ARITY);
        assert_eq!(&header.labels()[..4], &["METER", "TYPE", "UNIT", "LIGHTS"]);
        assert_eq!(header.labels()[15], "TOTAL");
    }

    #[test]
    fn test_meter_row_fields() {
        let row = BepsRow::Meter(MeterRecord {
            meter: MeterIdentity {
                name: "EM1".to_string(),
                energy_type: EnergyType::Electricity,
            },
            data: sample_data(),
        });

        let fields = row.fields();
        assert_eq!(fields.len(), crate::constants::METER_ROW_ARITY);
        assert_eq!(&fields[..3], &["EM1", "ELECTRICITY", "MBTU"]);
        assert_eq!(fields[15], "13.0");
    }

    #[test]
    fn test_summary_row_has_empty_identity() {
        let row = BepsRow::Summary(sample_data());
        let fields = row.fields();
        assert_eq!(row.arity(), crate::constants::METER_ROW_ARITY);
        assert_eq!(&fields[..3], &["", "", "MBTU"]);
    }

    #[test]
    fn test_category_value_lookup() {
        let data = sample_data();
        assert_eq!(data.value("LIGHTS"), Some("1.0"));
        assert_eq!(data.value("SPACE HEATING"), Some("4.0"));
        assert_eq!(data.value("UNKNOWN"), None);
        assert_eq!(data.total(), "13.0");
    }

    #[test]
    fn test_row_serializes_with_zone_tag() {
        let row = BepsRow::PercentHours(PercentHoursRecord {
            label: "ELECTRICITY PERCENT".to_string(),
            value: "45.2".to_string(),
        });

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["zone"], "percent_hours");
        assert_eq!(json["label"], "ELECTRICITY PERCENT");
        assert_eq!(json["value"], "45.2");
    }
}
