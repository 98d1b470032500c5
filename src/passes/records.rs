//! Entry pass records
//!
//! The endpoint is schema-less, so every field is optional and decoding never
//! fails: a field holding the wrong JSON type is simply treated as absent.

use serde_json::{Map, Value};

/// One entry pass as returned by the remote endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct PassRecord {
    /// Opaque identifier, kept as whatever JSON value the endpoint sent
    pub id: Option<Value>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub pass_numbers: Option<Vec<i64>>,
    pub pass_numbers_status: Option<Vec<PassStatus>>,
    pub no_of_passes: Option<i64>,
    pub people_count: Option<i64>,
    pub payment: Option<Payment>,
    raw: Value,
}

/// Entry of `passNumbersStatus`
#[derive(Debug, Clone, PartialEq)]
pub struct PassStatus {
    pub number: Option<i64>,
    /// Every other key of the entry, untouched
    pub details: Map<String, Value>,
}

/// Amounts collected per payment method
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payment {
    pub upi: Option<f64>,
    pub cash: Option<f64>,
    pub card: Option<f64>,
}

impl PassRecord {
    /// Decode a record from one element of the fetched array.
    ///
    /// Non-object elements produce a record with every field absent.
    pub fn from_value(value: Value) -> Self {
        let empty = Map::new();
        let map = value.as_object().unwrap_or(&empty);

        Self {
            id: map.get("id").filter(|v| !v.is_null()).cloned(),
            name: get_text_field(map, "name").map(str::to_string),
            category: get_text_field(map, "category").map(str::to_string),
            pass_numbers: get_array_field(map, "passNumbers")
                .map(|arr| arr.iter().filter_map(as_integer).collect()),
            pass_numbers_status: get_array_field(map, "passNumbersStatus")
                .map(|arr| arr.iter().filter_map(PassStatus::from_value).collect()),
            no_of_passes: get_int_field(map, "noOfPasses"),
            people_count: get_int_field(map, "peopleCount"),
            payment: get_map_field(map, "payment").map(Payment::from_map),
            raw: value,
        }
    }

    /// The JSON exactly as the endpoint sent it
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Key used to label the record when rendering: `id`, then `passNo`,
    /// then `passNumber`, then its position in the collection.
    pub fn display_key(&self, index: usize) -> String {
        let from_raw = |key: &str| self.raw.get(key).and_then(scalar_to_string);

        self.id
            .as_ref()
            .and_then(scalar_to_string)
            .or_else(|| from_raw("passNo"))
            .or_else(|| from_raw("passNumber"))
            .unwrap_or_else(|| format!("#{}", index + 1))
    }
}

impl PassStatus {
    fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let number = get_int_field(map, "number");
        let details = map
            .iter()
            .filter(|(k, _)| k.as_str() != "number")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Some(Self { number, details })
    }
}

impl Payment {
    fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            upi: get_number_field(map, "upi"),
            cash: get_number_field(map, "cash"),
            card: get_number_field(map, "card"),
        }
    }
}

/// Decode every element of a fetched array
pub fn decode_records(items: Vec<Value>) -> Vec<PassRecord> {
    items.into_iter().map(PassRecord::from_value).collect()
}

fn get_text_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

fn get_int_field(map: &Map<String, Value>, key: &str) -> Option<i64> {
    map.get(key).and_then(as_integer)
}

fn get_number_field(map: &Map<String, Value>, key: &str) -> Option<f64> {
    map.get(key).and_then(Value::as_f64)
}

fn get_array_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a [Value]> {
    map.get(key).and_then(Value::as_array).map(Vec::as_slice)
}

fn get_map_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    map.get(key).and_then(Value::as_object)
}

/// JSON numbers with no fractional part count as integers (`5.0 == 5`)
fn as_integer(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
