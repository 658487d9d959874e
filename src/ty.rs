// Column type

use std::convert::TryFrom;
use std::fmt;
use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{ExecError, ExecResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeLabel {
    // Signed 4 bytes integer
    Integer,
    Text,
    Boolean,
}

impl TypeLabel {
    pub fn name(&self) -> &'static str {
        match self {
            TypeLabel::Integer => "integer",
            TypeLabel::Text => "text",
            TypeLabel::Boolean => "boolean",
        }
    }
}

impl fmt::Display for TypeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Tags written in front of every value of a minimal tuple.
const TAG_NULL: u8 = 0;
const TAG_INTEGER: u8 = 1;
const TAG_TEXT: u8 = 2;
const TAG_BOOLEAN: u8 = 3;

/// One typed column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Null,
    Integer(i32),
    Text(String),
    Boolean(bool),
}

impl Datum {
    /// Type of the value, `None` for a null.
    pub fn type_label(&self) -> Option<TypeLabel> {
        match self {
            Datum::Null => None,
            Datum::Integer(_) => Some(TypeLabel::Integer),
            Datum::Text(_) => Some(TypeLabel::Text),
            Datum::Boolean(_) => Some(TypeLabel::Boolean),
        }
    }

    pub fn is_null(&self) -> bool {
        *self == Datum::Null
    }

    // A null fits every column.
    pub fn conforms_to(&self, tl: TypeLabel) -> bool {
        match self.type_label() {
            None => true,
            Some(own) => own == tl,
        }
    }

    pub fn as_string(&self) -> String {
        match self {
            Datum::Null => "NULL".to_string(),
            Datum::Integer(i) => i.to_string(),
            Datum::Text(s) => s.clone(),
            Datum::Boolean(b) => b.to_string(),
        }
    }

    pub fn write_bytes(&self, wrt: &mut dyn Write) -> io::Result<()> {
        match self {
            Datum::Null => wrt.write_u8(TAG_NULL),
            Datum::Integer(i) => {
                wrt.write_u8(TAG_INTEGER)?;
                wrt.write_i32::<LittleEndian>(*i)
            }
            Datum::Text(s) => {
                let len = u32::try_from(s.len()).map_err(|_| {
                    io::Error::new(io::ErrorKind::InvalidInput, "text value longer than 4 GiB")
                })?;
                wrt.write_u8(TAG_TEXT)?;
                wrt.write_u32::<LittleEndian>(len)?;
                wrt.write_all(s.as_bytes())
            }
            Datum::Boolean(b) => {
                wrt.write_u8(TAG_BOOLEAN)?;
                wrt.write_u8(*b as u8)
            }
        }
    }

    // Reads back one value written by `write_bytes`.
    pub fn read_bytes(rdr: &mut dyn Read) -> ExecResult<Datum> {
        let tag = rdr.read_u8()?;

        match tag {
            TAG_NULL => Ok(Datum::Null),
            TAG_INTEGER => Ok(Datum::Integer(rdr.read_i32::<LittleEndian>()?)),
            TAG_TEXT => {
                let len = rdr.read_u32::<LittleEndian>()? as usize;
                let mut buf = vec![0u8; len];
                rdr.read_exact(&mut buf)?;
                String::from_utf8(buf)
                    .map(Datum::Text)
                    .map_err(|e| ExecError::Corrupted(format!("text value is not UTF-8: {}", e)))
            }
            TAG_BOOLEAN => Ok(Datum::Boolean(rdr.read_u8()? != 0)),
            other => Err(ExecError::Corrupted(format!("unknown value tag {}", other))),
        }
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conforms_to() {
        assert!(Datum::Integer(1).conforms_to(TypeLabel::Integer));
        assert!(!Datum::Integer(1).conforms_to(TypeLabel::Text));
        assert!(Datum::Null.conforms_to(TypeLabel::Boolean));
        assert!(Datum::Null.is_null());
        assert!(!Datum::Boolean(false).is_null());
    }

    #[test]
    fn test_as_string() {
        assert_eq!(Datum::Integer(-3).as_string(), "-3");
        assert_eq!(Datum::Text("abc".to_string()).as_string(), "abc");
        assert_eq!(Datum::Null.as_string(), "NULL");
    }

    #[test]
    fn test_read_unknown_tag() {
        let bytes = [9u8];
        let err = Datum::read_bytes(&mut &bytes[..]).unwrap_err();

        assert!(matches!(err, ExecError::Corrupted(_)));
    }

    #[test]
    fn test_read_truncated_text() {
        let mut buf = Vec::new();
        Datum::Text("hello".to_string()).write_bytes(&mut buf).unwrap();
        buf.truncate(buf.len() - 2);

        assert!(matches!(Datum::read_bytes(&mut &buf[..]), Err(ExecError::Encoding(_))));
    }
}
