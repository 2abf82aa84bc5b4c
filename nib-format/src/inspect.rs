//! A JSON view of an archive for humans and other tools.

use serde_json::{json, Map, Value as Json};

use crate::{Archive, Entry, Object, Value};

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn value_json(value: &Value) -> Json {
    match value {
        Value::Int8(v) => json!(v),
        Value::Int16(v) => json!(v),
        Value::Int32(v) => json!(v),
        Value::Int64(v) => json!(v),
        Value::True => json!(true),
        Value::False => json!(false),
        Value::Float(v) => json!(v),
        Value::Double(v) => json!(v),
        Value::Data(bytes) => json!(hex(bytes)),
        Value::Nil => Json::Null,
        Value::Object(index) => json!({ "$object": index }),
    }
}

impl Archive {
    fn entry_json(&self, entry: &Entry) -> Json {
        json!({
            "key": self.key(entry),
            "key_index": entry.key_index,
            "type": entry.value.type_name(),
            "value": value_json(&entry.value),
        })
    }

    fn object_json(&self, index: usize, object: &Object) -> Json {
        let mut map = Map::new();
        map.insert("index".into(), json!(index));
        map.insert(
            "class".into(),
            json!(self.class_name(object).map(|c| c.as_str())),
        );
        map.insert("class_name_index".into(), json!(object.class_name_index));
        map.insert(
            "values_start_index".into(),
            json!(object.values_start_index),
        );
        map.insert("values_count".into(), json!(object.values_count));

        let entries = match self.object_entries(object) {
            Some(entries) => Json::Array(entries.iter().map(|e| self.entry_json(e)).collect()),
            None => Json::Null,
        };
        map.insert("entries".into(), entries);

        Json::Object(map)
    }

    /// Render the archive with class names and keys resolved where the
    /// indices allow it. Data values are lowercase hex strings and object
    /// references are `{"$object": index}`.
    pub fn to_json(&self) -> Json {
        json!({
            "version": self.version.to_string(),
            "objects": self
                .objects
                .iter()
                .enumerate()
                .map(|(i, o)| self.object_json(i, o))
                .collect::<Vec<_>>(),
            "keys": self.keys,
            "class_names": self
                .class_names
                .iter()
                .map(|c| json!({ "name": c.class_name, "extra_values": c.extra_values }))
                .collect::<Vec<_>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClassName;

    #[test]
    fn resolves_names() {
        let mut archive = Archive::default();
        archive.keys.push("enabled".into());
        archive.class_names.push(ClassName::new("NSButton"));
        archive.objects.push(Object {
            class_name_index: 0,
            values_start_index: 0,
            values_count: 2,
        });
        archive.entries.push(Entry {
            key_index: 0,
            value: Value::True,
        });
        archive.entries.push(Entry {
            key_index: 4,
            value: Value::Data(vec![0x0f, 0xa0]),
        });

        let json = archive.to_json();
        assert_eq!(json["version"], "1.10");

        let object = &json["objects"][0];
        assert_eq!(object["class"], "NSButton");
        assert_eq!(object["entries"][0]["key"], "enabled");
        assert_eq!(object["entries"][0]["value"], true);
        assert_eq!(object["entries"][1]["key"], Json::Null);
        assert_eq!(object["entries"][1]["type"], "data");
        assert_eq!(object["entries"][1]["value"], "0fa0");
        assert_eq!(json["class_names"][0]["name"], "NSButton");
    }

    #[test]
    fn out_of_range_entries() {
        let mut archive = Archive::default();
        archive.objects.push(Object {
            class_name_index: 3,
            values_start_index: 0,
            values_count: 1,
        });

        let json = archive.to_json();
        assert_eq!(json["objects"][0]["class"], Json::Null);
        assert_eq!(json["objects"][0]["entries"], Json::Null);
    }

    #[test]
    fn object_references() {
        assert_eq!(value_json(&Value::Object(-4)), json!({ "$object": -4 }));
        assert_eq!(value_json(&Value::Nil), Json::Null);
        assert_eq!(value_json(&Value::Int64(i64::MAX)), json!(i64::MAX));
    }
}
