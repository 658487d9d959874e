use std::convert::TryFrom;
use std::fmt;
use std::io::Cursor;
use std::rc::Rc;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::catalog::attribute::Attribute;
use crate::error::{ExecError, ExecResult};
use crate::ty::Datum;

// The attribute count of a minimal tuple is stored as a u16.
pub const MAX_TUPLE_ATTRS: usize = u16::MAX as usize;

// This manages metadata (e.g. column definitions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleDesc {
    attrs: Vec<Attribute>,
}

impl TupleDesc {
    pub fn new(attrs: Vec<Attribute>) -> TupleDesc {
        TupleDesc { attrs }
    }

    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    pub fn attrs_count(&self) -> usize {
        self.attrs.len()
    }

    // Checks that `values` could be stored into a slot of this shape.
    pub fn validate(&self, values: &[Datum]) -> ExecResult<()> {
        if self.attrs_count() > MAX_TUPLE_ATTRS {
            return Err(ExecError::TooManyColumns {
                natts: self.attrs_count(),
                max: MAX_TUPLE_ATTRS,
            });
        }

        if values.len() != self.attrs_count() {
            return Err(ExecError::ArityMismatch {
                expected: self.attrs_count(),
                got: values.len(),
            });
        }

        for (attr, value) in self.attrs.iter().zip(values.iter()) {
            if !value.conforms_to(attr.type_label) {
                return Err(ExecError::TypeMismatch {
                    column: attr.name.clone(),
                    expected: attr.type_label,
                    // conforms_to only fails for non-null values
                    got: value.type_label().unwrap_or(attr.type_label),
                });
            }
        }

        Ok(())
    }
}

impl fmt::Display for TupleDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols: Vec<String> = self.attrs.iter().map(|a| a.to_string()).collect();
        write!(f, "({})", cols.join(", "))
    }
}

/// A self-contained copy of one row.
///
/// Layout (little endian): `u16` attribute count, then every value as
/// written by [`Datum::write_bytes`]. A minimal tuple owns its bytes, so
/// copying one never aliases the slot it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinimalTuple {
    data: Vec<u8>,
}

impl MinimalTuple {
    pub fn form(values: &[Datum]) -> ExecResult<MinimalTuple> {
        let natts = u16::try_from(values.len()).map_err(|_| ExecError::TooManyColumns {
            natts: values.len(),
            max: MAX_TUPLE_ATTRS,
        })?;
        let mut data = Vec::new();
        data.write_u16::<LittleEndian>(natts)?;

        for value in values {
            value.write_bytes(&mut data)?;
        }

        Ok(MinimalTuple { data })
    }

    pub fn natts(&self) -> ExecResult<usize> {
        let mut rdr = Cursor::new(&self.data);
        Ok(rdr.read_u16::<LittleEndian>()? as usize)
    }

    pub fn deform(&self) -> ExecResult<Vec<Datum>> {
        let mut rdr = Cursor::new(&self.data);
        let natts = rdr.read_u16::<LittleEndian>()? as usize;
        let mut values = Vec::with_capacity(natts);

        for _ in 0..natts {
            values.push(Datum::read_bytes(&mut rdr)?);
        }

        Ok(values)
    }

    // index is 0-origin.
    pub fn get_column(&self, index: usize) -> ExecResult<Datum> {
        let mut rdr = Cursor::new(&self.data);
        let natts = rdr.read_u16::<LittleEndian>()? as usize;

        if index >= natts {
            return Err(ExecError::ColumnIndexOutOfBounds { index, natts });
        }

        // Values are variable length, so walk up to the requested one.
        for _ in 0..index {
            Datum::read_bytes(&mut rdr)?;
        }

        Datum::read_bytes(&mut rdr)
    }
}

/// A reusable holder for one row of a fixed shape.
///
/// A slot is either empty or holds exactly one tuple. Storing into it
/// replaces whatever it held before.
#[derive(Debug)]
pub struct TupleTableSlot {
    tuple_desc: Rc<TupleDesc>,
    tuple: Option<MinimalTuple>,
}

impl TupleTableSlot {
    pub fn new(tuple_desc: Rc<TupleDesc>) -> TupleTableSlot {
        TupleTableSlot {
            tuple_desc,
            tuple: None,
        }
    }

    pub fn tuple_desc(&self) -> &Rc<TupleDesc> {
        &self.tuple_desc
    }

    pub fn is_empty(&self) -> bool {
        self.tuple.is_none()
    }

    pub fn clear(&mut self) {
        self.tuple = None;
    }

    pub fn store_values(&mut self, values: &[Datum]) -> ExecResult<()> {
        self.tuple_desc.validate(values)?;
        self.tuple = Some(MinimalTuple::form(values)?);
        Ok(())
    }

    pub fn store_minimal_tuple(&mut self, tuple: MinimalTuple) -> ExecResult<()> {
        let natts = tuple.natts()?;

        if natts != self.tuple_desc.attrs_count() {
            return Err(ExecError::ArityMismatch {
                expected: self.tuple_desc.attrs_count(),
                got: natts,
            });
        }

        self.tuple = Some(tuple);
        Ok(())
    }

    /// Copies the contents of `src` into this slot.
    ///
    /// An empty `src` empties this slot too. The descriptors must have the
    /// same number of columns.
    pub fn copy_from(&mut self, src: &TupleTableSlot) -> ExecResult<()> {
        if src.tuple_desc.attrs_count() != self.tuple_desc.attrs_count() {
            return Err(ExecError::ArityMismatch {
                expected: self.tuple_desc.attrs_count(),
                got: src.tuple_desc.attrs_count(),
            });
        }

        self.tuple = src.tuple.clone();
        Ok(())
    }

    /// Returns an owned copy of the held tuple.
    pub fn copy_tuple(&self) -> Option<MinimalTuple> {
        self.tuple.clone()
    }

    // index is 0-origin.
    pub fn get_column(&self, index: usize) -> ExecResult<Datum> {
        let natts = self.tuple_desc.attrs_count();

        if index >= natts {
            return Err(ExecError::ColumnIndexOutOfBounds { index, natts });
        }

        match &self.tuple {
            Some(tuple) => tuple.get_column(index),
            None => Ok(Datum::Null),
        }
    }

    pub fn get_index_from_name(&self, name: &str) -> Option<usize> {
        self.tuple_desc.attrs().iter().position(|a| a.name == name)
    }

    /// All column values of the held tuple; an empty slot yields no values.
    pub fn values(&self) -> ExecResult<Vec<Datum>> {
        match &self.tuple {
            Some(tuple) => tuple.deform(),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::TypeLabel;

    fn two_int_desc() -> Rc<TupleDesc> {
        Rc::new(TupleDesc::new(vec![
            Attribute::new("id", TypeLabel::Integer),
            Attribute::new("age", TypeLabel::Integer),
        ]))
    }

    #[test]
    fn test_tuple_table_slot_get_set_column() {
        let mut slot = TupleTableSlot::new(two_int_desc());

        assert!(slot.is_empty());
        slot.store_values(&[Datum::Integer(10), Datum::Integer(22)]).unwrap();

        assert!(!slot.is_empty());
        assert_eq!(slot.get_column(0).unwrap().as_string(), "10".to_string());
        assert_eq!(slot.get_column(1).unwrap().as_string(), "22".to_string());
        assert_eq!(slot.get_index_from_name("age"), Some(1));
    }

    #[test]
    fn test_get_column_out_of_index() {
        let mut slot = TupleTableSlot::new(two_int_desc());
        slot.store_values(&[Datum::Integer(1), Datum::Null]).unwrap();

        assert!(matches!(
            slot.get_column(2),
            Err(ExecError::ColumnIndexOutOfBounds { index: 2, natts: 2 })
        ));
    }

    #[test]
    fn test_store_values_checks_shape() {
        let mut slot = TupleTableSlot::new(two_int_desc());

        assert!(matches!(
            slot.store_values(&[Datum::Integer(1)]),
            Err(ExecError::ArityMismatch { expected: 2, got: 1 })
        ));
        assert!(matches!(
            slot.store_values(&[Datum::Integer(1), Datum::Text("x".to_string())]),
            Err(ExecError::TypeMismatch { .. })
        ));
        assert!(slot.is_empty());
    }

    #[test]
    fn test_copy_from_does_not_alias() {
        let desc = two_int_desc();
        let mut src = TupleTableSlot::new(desc.clone());
        let mut dst = TupleTableSlot::new(desc);

        src.store_values(&[Datum::Integer(1), Datum::Integer(2)]).unwrap();
        dst.copy_from(&src).unwrap();
        src.store_values(&[Datum::Integer(3), Datum::Integer(4)]).unwrap();

        assert_eq!(dst.values().unwrap(), vec![Datum::Integer(1), Datum::Integer(2)]);

        src.clear();
        dst.copy_from(&src).unwrap();
        assert!(dst.is_empty());
    }

    #[test]
    fn test_minimal_tuple_mixed_values() {
        let values = vec![
            Datum::Text("héllo".to_string()),
            Datum::Null,
            Datum::Boolean(true),
            Datum::Integer(-7),
        ];
        let tuple = MinimalTuple::form(&values).unwrap();

        assert_eq!(tuple.natts().unwrap(), 4);
        assert_eq!(tuple.get_column(2).unwrap(), Datum::Boolean(true));
        assert_eq!(tuple.deform().unwrap(), values);
    }

    #[test]
    fn test_too_many_columns() {
        let attrs = (0..MAX_TUPLE_ATTRS + 1)
            .map(|i| Attribute::new(format!("c{}", i), TypeLabel::Integer))
            .collect();
        let values = vec![Datum::Integer(1); MAX_TUPLE_ATTRS + 1];
        let mut slot = TupleTableSlot::new(Rc::new(TupleDesc::new(attrs)));

        assert!(matches!(
            slot.store_values(&values),
            Err(ExecError::TooManyColumns { natts: 65536, max: 65535 })
        ));
        assert!(slot.is_empty());
        assert!(matches!(MinimalTuple::form(&values), Err(ExecError::TooManyColumns { .. })));
    }

    #[test]
    fn test_widest_tuple() {
        let values = vec![Datum::Boolean(false); MAX_TUPLE_ATTRS];
        let tuple = MinimalTuple::form(&values).unwrap();

        assert_eq!(tuple.natts().unwrap(), MAX_TUPLE_ATTRS);
    }

    #[test]
    fn test_copy_tuple_is_independent() {
        let mut slot = TupleTableSlot::new(two_int_desc());
        slot.store_values(&[Datum::Integer(5), Datum::Integer(6)]).unwrap();

        let copy = slot.copy_tuple().unwrap();
        slot.store_values(&[Datum::Integer(7), Datum::Integer(8)]).unwrap();
        slot.clear();

        assert_eq!(copy.deform().unwrap(), vec![Datum::Integer(5), Datum::Integer(6)]);
        assert!(slot.copy_tuple().is_none());
    }

    #[test]
    fn test_store_minimal_tuple_checks_arity() {
        let mut slot = TupleTableSlot::new(two_int_desc());
        let tuple = MinimalTuple::form(&[Datum::Integer(1)]).unwrap();

        assert!(slot.store_minimal_tuple(tuple).is_err());
    }
}
