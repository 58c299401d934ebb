use ddss_core::{Event, MetadataValue};
use serde::Serialize;
use serde_json::{Map, Value};

/// The canonical downstream serialization of a decoded event: `index_time`,
/// `time`, `event`, `host`, `sourcetype`, `source`, `fields`.
#[derive(Debug, Serialize)]
pub struct EventRecord {
    pub index_time: i64,
    pub time: i64,
    pub event: String,
    pub host: String,
    pub sourcetype: String,
    pub source: String,
    pub fields: Map<String, Value>,
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        let mut fields = Map::new();
        for (key, value) in &event.metadata_fields {
            fields.insert(key.clone(), metadata_value_to_json(value));
        }
        Self {
            index_time: event.index_time,
            time: event.event_time,
            event: event.message_string(),
            host: event.host.clone(),
            sourcetype: event.sourcetype.clone(),
            source: event.source.clone(),
            fields,
        }
    }
}

fn metadata_value_to_json(value: &MetadataValue) -> Value {
    match value {
        MetadataValue::Scalar(s) => Value::String(s.clone()),
        MetadataValue::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn converts_scalar_and_list_fields() {
        let mut event = Event::default();
        event.index_time = 100;
        event.event_time = 200;
        event.host = "h".into();
        event.message = b"hi".to_vec();
        let mut fields = HashMap::new();
        fields.insert("k1".to_string(), MetadataValue::Scalar("v1".into()));
        fields.insert(
            "k2".to_string(),
            MetadataValue::List(vec!["a".into(), "b".into()]),
        );
        event.metadata_fields = fields;

        let record = EventRecord::from(&event);
        assert_eq!(record.index_time, 100);
        assert_eq!(record.time, 200);
        assert_eq!(record.event, "hi");
        assert_eq!(record.fields.get("k1"), Some(&Value::String("v1".into())));
        assert_eq!(
            record.fields.get("k2"),
            Some(&Value::Array(vec![Value::String("a".into()), Value::String("b".into())]))
        );
    }
}
