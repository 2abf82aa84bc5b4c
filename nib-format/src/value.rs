use std::fmt;

pub mod constants {
    pub const VALUE_INT8: u8 = 0x00;
    pub const VALUE_INT16: u8 = 0x01;
    pub const VALUE_INT32: u8 = 0x02;
    pub const VALUE_INT64: u8 = 0x03;
    pub const VALUE_TRUE: u8 = 0x04;
    pub const VALUE_FALSE: u8 = 0x05;
    pub const VALUE_FLOAT: u8 = 0x06;
    pub const VALUE_DOUBLE: u8 = 0x07;
    pub const VALUE_DATA: u8 = 0x08;
    pub const VALUE_NIL: u8 = 0x09;
    pub const VALUE_OBJECT: u8 = 0x0a;
}

use self::constants::*;

/// The payload of an [`Entry`](crate::Entry).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    True,
    False,
    Float(f32),
    Double(f64),
    Data(Vec<u8>),
    Nil,
    /// Index into the archive's objects. Kept signed, as stored.
    Object(i32),
}

impl Value {
    /// The byte written in front of the payload.
    pub const fn tag(&self) -> u8 {
        use Value::*;

        match self {
            Int8(_) => VALUE_INT8,
            Int16(_) => VALUE_INT16,
            Int32(_) => VALUE_INT32,
            Int64(_) => VALUE_INT64,
            True => VALUE_TRUE,
            False => VALUE_FALSE,
            Float(_) => VALUE_FLOAT,
            Double(_) => VALUE_DOUBLE,
            Data(_) => VALUE_DATA,
            Nil => VALUE_NIL,
            Object(_) => VALUE_OBJECT,
        }
    }

    pub const fn type_name(&self) -> &'static str {
        use Value::*;

        match self {
            Int8(_) => "int8",
            Int16(_) => "int16",
            Int32(_) => "int32",
            Int64(_) => "int64",
            True | False => "bool",
            Float(_) => "float",
            Double(_) => "double",
            Data(_) => "data",
            Nil => "nil",
            Object(_) => "object",
        }
    }

    #[inline(always)]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::True => Some(true),
            Value::False => Some(false),
            _ => None,
        }
    }

    /// Any of the integer variants, widened.
    #[inline(always)]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int8(v) => Some(v.into()),
            Value::Int16(v) => Some(v.into()),
            Value::Int32(v) => Some(v.into()),
            Value::Int64(v) => Some(v),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn as_data(&self) -> Option<&[u8]> {
        match self {
            Value::Data(data) => Some(data),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn as_object(&self) -> Option<i32> {
        match self {
            Value::Object(index) => Some(*index),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        if value {
            Value::True
        } else {
            Value::False
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Value::*;

        match self {
            Int8(v) => write!(f, "{}", v),
            Int16(v) => write!(f, "{}", v),
            Int32(v) => write!(f, "{}", v),
            Int64(v) => write!(f, "{}", v),
            True => f.write_str("true"),
            False => f.write_str("false"),
            Float(v) => write!(f, "{}f", v),
            Double(v) => write!(f, "{}", v),
            Data(bytes) => {
                f.write_str("<")?;
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 && i % 4 == 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{:02x}", b)?;
                }
                f.write_str(">")
            }
            Nil => f.write_str("nil"),
            Object(index) => write!(f, "@{}", index),
        }
    }
}
