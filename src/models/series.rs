use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Marker emitted for a table cell whose source value is missing
pub const MISSING_SENTINEL: &str = "N/A";

/// The six daily variables requested from the archive, in request order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DailyVariable {
    TemperatureMax,
    TemperatureMin,
    TemperatureMean,
    ApparentTemperatureMax,
    ApparentTemperatureMin,
    ApparentTemperatureMean,
}

impl DailyVariable {
    pub const ALL: [DailyVariable; 6] = [
        DailyVariable::TemperatureMax,
        DailyVariable::TemperatureMin,
        DailyVariable::TemperatureMean,
        DailyVariable::ApparentTemperatureMax,
        DailyVariable::ApparentTemperatureMin,
        DailyVariable::ApparentTemperatureMean,
    ];

    /// Variable name as used by the archive API and in stored payloads
    pub fn api_name(self) -> &'static str {
        match self {
            DailyVariable::TemperatureMax => "temperature_2m_max",
            DailyVariable::TemperatureMin => "temperature_2m_min",
            DailyVariable::TemperatureMean => "temperature_2m_mean",
            DailyVariable::ApparentTemperatureMax => "apparent_temperature_max",
            DailyVariable::ApparentTemperatureMin => "apparent_temperature_min",
            DailyVariable::ApparentTemperatureMean => "apparent_temperature_mean",
        }
    }

    /// Comma-joined list for the archive `daily` query parameter
    pub fn query_list() -> String {
        Self::ALL
            .iter()
            .map(|v| v.api_name())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Raw archive payload, as stored and served back by the backend.
///
/// Everything except `daily` is carried through untouched so a stored file
/// round-trips without loss.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSeriesResponse {
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub latitude: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub longitude: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub daily_units: Option<Map<String, Value>>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub daily: Option<DailySeries>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `daily` block: a date axis plus parallel value arrays.
///
/// Arrays may be absent, shorter than `time`, or contain `null`s. Read them
/// through [`DailySeries::column`] rather than indexing directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    #[serde(default, deserialize_with = "lenient_labels")]
    pub time: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient_values",
        skip_serializing_if = "Option::is_none"
    )]
    pub temperature_2m_max: Option<Vec<Option<f64>>>,
    #[serde(
        default,
        deserialize_with = "lenient_values",
        skip_serializing_if = "Option::is_none"
    )]
    pub temperature_2m_min: Option<Vec<Option<f64>>>,
    #[serde(
        default,
        deserialize_with = "lenient_values",
        skip_serializing_if = "Option::is_none"
    )]
    pub temperature_2m_mean: Option<Vec<Option<f64>>>,
    #[serde(
        default,
        deserialize_with = "lenient_values",
        skip_serializing_if = "Option::is_none"
    )]
    pub apparent_temperature_max: Option<Vec<Option<f64>>>,
    #[serde(
        default,
        deserialize_with = "lenient_values",
        skip_serializing_if = "Option::is_none"
    )]
    pub apparent_temperature_min: Option<Vec<Option<f64>>>,
    #[serde(
        default,
        deserialize_with = "lenient_values",
        skip_serializing_if = "Option::is_none"
    )]
    pub apparent_temperature_mean: Option<Vec<Option<f64>>>,
}

impl DailySeries {
    fn values(&self, variable: DailyVariable) -> Option<&[Option<f64>]> {
        let values = match variable {
            DailyVariable::TemperatureMax => &self.temperature_2m_max,
            DailyVariable::TemperatureMin => &self.temperature_2m_min,
            DailyVariable::TemperatureMean => &self.temperature_2m_mean,
            DailyVariable::ApparentTemperatureMax => &self.apparent_temperature_max,
            DailyVariable::ApparentTemperatureMin => &self.apparent_temperature_min,
            DailyVariable::ApparentTemperatureMean => &self.apparent_temperature_mean,
        };
        values.as_deref()
    }

    /// Bounds-checked accessor over one variable's array
    pub fn column(&self, variable: DailyVariable) -> Column<'_> {
        Column {
            values: self.values(variable).unwrap_or(&[]),
        }
    }
}

// Payload shape problems read as absent data rather than failing the whole
// response.

/// Any value that does not fit `T` reads as `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Date axis: `null` or a non-array is empty; non-string entries keep their JSON text
fn lenient_labels<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let labels = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(labels)
}

/// Value array: a non-array is absent; a non-numeric element is a gap
fn lenient_values<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<Option<f64>>>, D::Error> {
    let values = match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(items.iter().map(Value::as_f64).collect()),
        _ => None,
    };
    Ok(values)
}

/// Read-only view of one daily variable. Out-of-range positions, absent
/// arrays and `null` elements all read as [`CellValue::Missing`].
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    values: &'a [Option<f64>],
}

impl<'a> Column<'a> {
    pub fn get(&self, index: usize) -> CellValue {
        match self.values.get(index) {
            Some(Some(value)) => CellValue::Value(*value),
            _ => CellValue::Missing,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The underlying values, for chart series that keep gaps as `null`
    pub fn as_slice(&self) -> &'a [Option<f64>] {
        self.values
    }
}

/// One table cell: a raw number or the `"N/A"` sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue {
    Value(f64),
    Missing,
}

impl CellValue {
    pub fn value(self) -> Option<f64> {
        match self {
            CellValue::Value(v) => Some(v),
            CellValue::Missing => None,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Value(v) => write!(f, "{v}"),
            CellValue::Missing => f.write_str(MISSING_SENTINEL),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Value(v) => serializer.serialize_f64(*v),
            CellValue::Missing => serializer.serialize_str(MISSING_SENTINEL),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Chart-ready data: a shared date axis and one series per variable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub series: Vec<NamedSeries>,
}

/// One calendar day of the six temperature variables
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub id: usize,
    pub date: String,
    pub temp_max: CellValue,
    pub temp_min: CellValue,
    pub temp_mean: CellValue,
    pub apparent_temp_max: CellValue,
    pub apparent_temp_min: CellValue,
    pub apparent_temp_mean: CellValue,
}

impl TableRow {
    /// Cells in column order, excluding `id` and `date`
    pub fn cells(&self) -> [CellValue; 6] {
        [
            self.temp_max,
            self.temp_min,
            self.temp_mean,
            self.apparent_temp_max,
            self.apparent_temp_min,
            self.apparent_temp_mean,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_list_matches_archive_names() {
        assert_eq!(
            DailyVariable::query_list(),
            "temperature_2m_max,temperature_2m_min,temperature_2m_mean,\
             apparent_temperature_max,apparent_temperature_min,apparent_temperature_mean"
        );
    }

    #[test]
    fn test_column_reads_missing_for_gaps() {
        let daily: DailySeries = serde_json::from_value(json!({
            "time": ["2023-01-01", "2023-01-02", "2023-01-03"],
            "temperature_2m_max": [5.2, null],
        }))
        .unwrap();

        let max = daily.column(DailyVariable::TemperatureMax);
        assert_eq!(max.get(0), CellValue::Value(5.2));
        assert_eq!(max.get(1), CellValue::Missing);
        assert_eq!(max.get(2), CellValue::Missing);

        let min = daily.column(DailyVariable::TemperatureMin);
        assert!(min.is_empty());
        assert_eq!(min.get(0), CellValue::Missing);
    }

    #[test]
    fn test_cell_value_serializes_number_or_sentinel() {
        assert_eq!(serde_json::to_value(CellValue::Value(-3.5)).unwrap(), json!(-3.5));
        assert_eq!(serde_json::to_value(CellValue::Missing).unwrap(), json!("N/A"));
        assert_eq!(CellValue::Missing.to_string(), "N/A");
    }

    #[test]
    fn test_raw_response_preserves_unknown_fields() {
        let payload = json!({
            "latitude": 40.71,
            "longitude": -74.0,
            "timezone": "America/New_York",
            "generationtime_ms": 1.25,
            "daily_units": {"time": "iso8601", "temperature_2m_max": "°C"},
            "daily": {"time": ["2023-01-01"], "temperature_2m_max": [5.2]}
        });

        let raw: RawSeriesResponse = serde_json::from_value(payload.clone()).unwrap();
        assert_eq!(raw.extra["timezone"], "America/New_York");
        assert_eq!(serde_json::to_value(&raw).unwrap(), payload);
    }

    #[test]
    fn test_table_row_uses_camel_case() {
        let row = TableRow {
            id: 1,
            date: "2023-01-01".to_string(),
            temp_max: CellValue::Value(5.2),
            temp_min: CellValue::Missing,
            temp_mean: CellValue::Value(1.0),
            apparent_temp_max: CellValue::Value(2.0),
            apparent_temp_min: CellValue::Value(-4.0),
            apparent_temp_mean: CellValue::Value(-1.0),
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["tempMax"], 5.2);
        assert_eq!(json["tempMin"], "N/A");
        assert_eq!(json["apparentTempMean"], -1.0);
    }

    #[test]
    fn test_null_time_axis_reads_as_empty() {
        let raw: RawSeriesResponse = serde_json::from_value(json!({
            "daily": {"time": null, "temperature_2m_max": [5.2]}
        }))
        .unwrap();

        let daily = raw.daily.unwrap();
        assert!(daily.time.is_empty());
        assert_eq!(daily.column(DailyVariable::TemperatureMax).len(), 1);
    }

    #[test]
    fn test_non_numeric_elements_read_as_missing() {
        let daily: DailySeries = serde_json::from_value(json!({
            "time": ["2023-01-01", "2023-01-02", "2023-01-03"],
            "temperature_2m_max": ["bad", 4.5, {"x": 1}],
            "temperature_2m_min": "not an array"
        }))
        .unwrap();

        let max = daily.column(DailyVariable::TemperatureMax);
        assert_eq!(max.get(0), CellValue::Missing);
        assert_eq!(max.get(1), CellValue::Value(4.5));
        assert_eq!(max.get(2), CellValue::Missing);
        assert!(daily.temperature_2m_min.is_none());
    }

    #[test]
    fn test_malformed_daily_block_reads_as_absent() {
        let raw: RawSeriesResponse = serde_json::from_value(json!({
            "latitude": "north",
            "daily": "unavailable"
        }))
        .unwrap();

        assert!(raw.daily.is_none());
        assert!(raw.latitude.is_none());
    }
}
