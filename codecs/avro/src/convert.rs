use apache_avro::Schema;
use apache_avro::types::Value;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use courier_api::PublishError;

// ═══════════════════════════════════════════════════════════════
//  Avro → JSON conversion
// ═══════════════════════════════════════════════════════════════

pub(crate) fn avro_to_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::json!(i),
        Value::Long(l) => serde_json::json!(l),
        Value::Float(f) => serde_json::json!(f),
        Value::Double(d) => serde_json::json!(d),
        Value::Bytes(b) | Value::Fixed(_, b) => serde_json::Value::String(BASE64.encode(b)),
        Value::String(s) | Value::Enum(_, s) => serde_json::Value::String(s.clone()),
        Value::Union(_, inner) => avro_to_value(inner),
        Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(avro_to_value).collect())
        }
        Value::Map(entries) => {
            let map: serde_json::Map<String, serde_json::Value> = entries
                .iter()
                .map(|(k, v)| (k.clone(), avro_to_value(v)))
                .collect();
            serde_json::Value::Object(map)
        }
        Value::Record(fields) => {
            let map: serde_json::Map<String, serde_json::Value> = fields
                .iter()
                .map(|(k, v)| (k.clone(), avro_to_value(v)))
                .collect();
            serde_json::Value::Object(map)
        }
        Value::Date(d) => serde_json::json!(d),
        Value::TimeMillis(t) => serde_json::json!(t),
        Value::TimeMicros(t) => serde_json::json!(t),
        Value::TimestampMillis(t) => serde_json::json!(t),
        Value::TimestampMicros(t) => serde_json::json!(t),
        Value::TimestampNanos(t) => serde_json::json!(t),
        Value::Decimal(d) => {
            // Decimal — сырые байты в base64
            let bytes: Vec<u8> = d.try_into().unwrap_or_default();
            serde_json::Value::String(BASE64.encode(&bytes))
        }
        Value::BigDecimal(d) => serde_json::Value::String(d.to_string()),
        Value::Uuid(u) => serde_json::Value::String(u.to_string()),
        Value::Duration(_) => serde_json::Value::Null,
        Value::LocalTimestampMillis(t) => serde_json::json!(t),
        Value::LocalTimestampMicros(t) => serde_json::json!(t),
        Value::LocalTimestampNanos(t) => serde_json::json!(t),
    }
}

// ═══════════════════════════════════════════════════════════════
//  JSON → Avro conversion (strict)
// ═══════════════════════════════════════════════════════════════

/// Конверсия serde_json::Value → apache_avro::types::Value по схеме.
///
/// Строгая: record-значение обязано нести ровно объявленный схемой набор
/// полей. Отсутствующее поле без default'а в схеме, лишнее неизвестное
/// поле или значение, которое тип схемы не вмещает — всё это ошибка,
/// молча ничего не выбрасывается и не обрезается.
pub(crate) fn value_to_avro(
    val: &serde_json::Value,
    schema: &Schema,
) -> Result<Value, PublishError> {
    match (val, schema) {
        // Union первым, чтобы null и скаляры завернулись в нужный вариант
        (val, Schema::Union(union_schema)) => {
            for (idx, variant) in union_schema.variants().iter().enumerate() {
                if let Ok(v) = value_to_avro(val, variant) {
                    return Ok(Value::Union(idx as u32, Box::new(v)));
                }
            }
            Err(PublishError::schema(format!(
                "avro: cannot convert value to union: {val}"
            )))
        }
        (serde_json::Value::Null, Schema::Null) => Ok(Value::Null),
        (serde_json::Value::Bool(b), Schema::Boolean) => Ok(Value::Boolean(*b)),
        (serde_json::Value::Number(n), Schema::Int) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Value::Int)
            .ok_or_else(|| PublishError::schema(format!("avro: {n} does not fit int"))),
        (serde_json::Value::Number(n), Schema::Long) => n
            .as_i64()
            .map(Value::Long)
            .ok_or_else(|| PublishError::schema(format!("avro: {n} does not fit long"))),
        (serde_json::Value::Number(n), Schema::Float) => n
            .as_f64()
            .map(|v| Value::Float(v as f32))
            .ok_or_else(|| PublishError::schema(format!("avro: {n} is not a float"))),
        (serde_json::Value::Number(n), Schema::Double) => n
            .as_f64()
            .map(Value::Double)
            .ok_or_else(|| PublishError::schema(format!("avro: {n} is not a double"))),
        (serde_json::Value::String(s), Schema::String) => Ok(Value::String(s.clone())),
        (serde_json::Value::String(s), Schema::Enum(enum_schema)) => enum_schema
            .symbols
            .iter()
            .position(|sym| sym == s)
            .map(|idx| Value::Enum(idx as u32, s.clone()))
            .ok_or_else(|| PublishError::schema(format!("avro: unknown enum symbol: {s}"))),
        (serde_json::Value::String(s), Schema::Bytes) => BASE64
            .decode(s)
            .map(Value::Bytes)
            .map_err(|e| PublishError::schema(format!("avro: bad base64 bytes: {e}"))),
        (serde_json::Value::Array(items), Schema::Array(inner)) => {
            let avro_items: Result<Vec<Value>, PublishError> = items
                .iter()
                .map(|item| value_to_avro(item, &inner.items))
                .collect();
            Ok(Value::Array(avro_items?))
        }
        (serde_json::Value::Object(map), Schema::Map(inner)) => {
            let mut entries = std::collections::HashMap::with_capacity(map.len());
            for (k, v) in map {
                entries.insert(k.clone(), value_to_avro(v, &inner.types)?);
            }
            Ok(Value::Map(entries))
        }
        (serde_json::Value::Object(map), Schema::Record(record_schema)) => {
            // Лишних неизвестных полей быть не должно
            for key in map.keys() {
                if !record_schema.fields.iter().any(|f| &f.name == key) {
                    return Err(PublishError::schema(format!(
                        "avro: field `{key}` not declared in record `{}`",
                        record_schema.name
                    )));
                }
            }
            let mut fields = Vec::with_capacity(record_schema.fields.len());
            for field in &record_schema.fields {
                let avro_val = match map.get(&field.name) {
                    Some(field_val) => value_to_avro(field_val, &field.schema)?,
                    None => match &field.default {
                        Some(default) => value_to_avro(default, &field.schema)?,
                        None => {
                            return Err(PublishError::schema(format!(
                                "avro: missing field `{}` in record `{}`",
                                field.name, record_schema.name
                            )));
                        }
                    },
                };
                fields.push((field.name.clone(), avro_val));
            }
            Ok(Value::Record(fields))
        }
        (val, _) => Err(PublishError::schema(format!(
            "avro: value does not match schema: {val}"
        ))),
    }
}
