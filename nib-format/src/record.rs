use crate::value::Value;

/// An archived object: its class plus a contiguous run of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    /// Index into the archive's class names.
    pub class_name_index: usize,

    /// Index of the first entry belonging to this object.
    pub values_start_index: usize,

    /// Number of entries belonging to this object.
    pub values_count: usize,
}

impl Object {
    /// The entry index range of this object, if it does not overflow.
    #[inline(always)]
    pub fn values_range(&self) -> Option<std::ops::Range<usize>> {
        let end = self.values_start_index.checked_add(self.values_count)?;
        Some(self.values_start_index..end)
    }
}

/// A key/value pair belonging to an object.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Index into the archive's keys.
    pub key_index: usize,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassName {
    /// Opaque values stored alongside the name. Usually empty.
    pub extra_values: Vec<i32>,

    /// The name, without its NUL terminator.
    pub class_name: String,
}

impl ClassName {
    pub fn new<S: Into<String>>(class_name: S) -> ClassName {
        ClassName {
            extra_values: vec![],
            class_name: class_name.into(),
        }
    }

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        &self.class_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_range() {
        let object = Object {
            class_name_index: 0,
            values_start_index: 3,
            values_count: 2,
        };
        assert_eq!(object.values_range(), Some(3..5));

        let object = Object {
            class_name_index: 0,
            values_start_index: usize::MAX,
            values_count: 2,
        };
        assert_eq!(object.values_range(), None);
    }
}
