//! Avro container encoder.
//!
//! Пишет одну запись на Avro object container file (вместе с заголовком
//! схемы и sync-маркерами), поэтому каждый payload самоописываемый и
//! декодируется без раздачи entity-классов или артефактов схемы. Одна
//! запись на контейнер — осознанный trade-off, а не кривой batching:
//! downstream-потребители видят каждое сообщение как независимую,
//! самодостаточную единицу.

use apache_avro::{Reader, Schema, Writer};

use courier_api::{DataFormat, EncodedPayload, PublishError, Record, RecordEncoder};

mod convert;

use convert::{avro_to_value, value_to_avro};

// ---- Encoder ----

#[derive(Debug)]
pub struct AvroEncoder {
    schema: Schema,
}

impl AvroEncoder {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    /// Распарсить схему из её JSON-объявления.
    pub fn parse(schema_json: &str) -> Result<Self, PublishError> {
        let schema = Schema::parse_str(schema_json)
            .map_err(|e| PublishError::schema(format!("avro: failed to parse schema: {e}")))?;
        Ok(Self { schema })
    }

    /// Загрузить схему из `.avsc`-файла.
    pub fn from_file(path: &str) -> Result<Self, PublishError> {
        let schema_str = std::fs::read_to_string(path)
            .map_err(|e| PublishError::io(format!("avro: failed to read schema file '{path}': {e}")))?;
        Self::parse(&schema_str)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl RecordEncoder for AvroEncoder {
    /// Закодировать одну запись в однозаписный Avro-контейнер.
    ///
    /// Writer финализируется (блоки сброшены, footer записан) через
    /// `into_inner()` до того, как байты буфера будут прочитаны; любой сбой
    /// по пути прерывает весь encode без частичного payload'а.
    fn encode(&self, record: &Record) -> Result<EncodedPayload, PublishError> {
        let value = value_to_avro(&record.value, &self.schema)
            .map_err(|e| e.with_context(format!("record `{}`", record.key)))?;

        let mut writer = Writer::new(&self.schema, Vec::with_capacity(512));
        writer
            .append(value)
            .map_err(|e| PublishError::encode(format!("avro append: {e}")))?;
        let bytes = writer
            .into_inner()
            .map_err(|e| PublishError::encode(format!("avro finalize: {e}")))?;

        Ok(EncodedPayload::new(bytes, DataFormat::Avro))
    }

    fn format(&self) -> DataFormat {
        DataFormat::Avro
    }
}

/// Прочитать обратно все записи самоописываемого контейнера.
///
/// Декодирование ведёт встроенная схема, внешняя не нужна.
pub fn read_container(bytes: &[u8]) -> Result<Vec<serde_json::Value>, PublishError> {
    let reader =
        Reader::new(bytes).map_err(|e| PublishError::encode(format!("avro container open: {e}")))?;
    let mut records = Vec::new();
    for value in reader {
        let value =
            value.map_err(|e| PublishError::encode(format!("avro container read: {e}")))?;
        records.push(avro_to_value(&value));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_api::ErrorKind;

    const EMPLOYEE_SCHEMA: &str = r#"
    {
        "type": "record",
        "name": "Employee",
        "fields": [
            {"name": "name", "type": "string"},
            {"name": "id", "type": "long"}
        ]
    }"#;

    fn employee(name: &str, id: i64) -> Record {
        Record::new(name, serde_json::json!({"name": name, "id": id}))
    }

    #[test]
    fn round_trip_single_record() {
        let encoder = AvroEncoder::parse(EMPLOYEE_SCHEMA).unwrap();
        let payload = encoder.encode(&employee("Alice", 42)).unwrap();

        assert!(!payload.is_empty());
        assert_eq!(payload.format(), DataFormat::Avro);

        let records = read_container(payload.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], serde_json::json!({"name": "Alice", "id": 42}));
    }

    #[test]
    fn round_trip_boundary_values() {
        let encoder = AvroEncoder::parse(EMPLOYEE_SCHEMA).unwrap();
        let payload = encoder.encode(&employee("", 0)).unwrap();

        let records = read_container(payload.as_bytes()).unwrap();
        assert_eq!(records, vec![serde_json::json!({"name": "", "id": 0})]);
    }

    #[test]
    fn two_encodes_decode_to_equal_records() {
        // Побайтовое равенство не гарантировано (случайный sync-маркер
        // контейнера), совпадать обязано декодированное содержимое.
        let encoder = AvroEncoder::parse(EMPLOYEE_SCHEMA).unwrap();
        let record = employee("Bob", 7);
        let a = encoder.encode(&record).unwrap();
        let b = encoder.encode(&record).unwrap();

        assert_eq!(
            read_container(a.as_bytes()).unwrap(),
            read_container(b.as_bytes()).unwrap()
        );
    }

    #[test]
    fn missing_field_fails() {
        let encoder = AvroEncoder::parse(EMPLOYEE_SCHEMA).unwrap();
        let record = Record::new("Alice", serde_json::json!({"name": "Alice"}));
        let e = encoder.encode(&record).unwrap_err();
        assert_eq!(e.kind, ErrorKind::Schema);
        assert!(e.message.contains("missing field `id`"), "{e}");
    }

    #[test]
    fn unknown_field_fails() {
        let encoder = AvroEncoder::parse(EMPLOYEE_SCHEMA).unwrap();
        let record = Record::new(
            "Alice",
            serde_json::json!({"name": "Alice", "id": 42, "salary": 1000}),
        );
        let e = encoder.encode(&record).unwrap_err();
        assert_eq!(e.kind, ErrorKind::Schema);
        assert!(e.message.contains("`salary`"), "{e}");
    }

    #[test]
    fn schema_default_fills_missing_field() {
        let schema = r#"
        {
            "type": "record",
            "name": "Employee",
            "fields": [
                {"name": "name", "type": "string"},
                {"name": "id", "type": "long", "default": -1}
            ]
        }"#;
        let encoder = AvroEncoder::parse(schema).unwrap();
        let record = Record::new("Carol", serde_json::json!({"name": "Carol"}));
        let payload = encoder.encode(&record).unwrap();

        let records = read_container(payload.as_bytes()).unwrap();
        assert_eq!(records[0], serde_json::json!({"name": "Carol", "id": -1}));
    }

    #[test]
    fn nullable_field_round_trips() {
        let schema = r#"
        {
            "type": "record",
            "name": "Employee",
            "fields": [
                {"name": "name", "type": "string"},
                {"name": "id", "type": ["null", "long"]}
            ]
        }"#;
        let encoder = AvroEncoder::parse(schema).unwrap();
        let record = Record::new("Dana", serde_json::json!({"name": "Dana", "id": null}));
        let payload = encoder.encode(&record).unwrap();

        let records = read_container(payload.as_bytes()).unwrap();
        assert_eq!(records[0], serde_json::json!({"name": "Dana", "id": null}));
    }

    #[test]
    fn bad_schema_declaration_fails() {
        let e = AvroEncoder::parse("{not json").unwrap_err();
        assert_eq!(e.kind, ErrorKind::Schema);
    }

    #[test]
    fn garbage_is_not_a_container() {
        assert!(read_container(b"not an avro container").is_err());
    }
}
