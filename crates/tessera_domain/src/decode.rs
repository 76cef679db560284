//! The decoder interface stores populate from.
//!
//! The JSON tokenizer lives outside this workspace. Whatever it produces only
//! has to implement [`FieldSource`]: a record that visits its `(key, value)`
//! pairs in whatever order they appear. Keys a store does not know are
//! ignored and `null` values are treated as absent.
//!
//! [`Record`] and [`Value`] are an owned implementation used by callers that
//! already hold decoded data, and by the tests.

use tessera_foundation::{Error, ErrorContext, ExternalId, Result};

/// A borrowed field value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue<'a> {
    /// JSON `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A string.
    Str(&'a str),
    /// An array of integer identifiers.
    Ids(&'a [i64]),
    /// An array of nested records.
    Objects(&'a [Record]),
}

impl<'a> FieldValue<'a> {
    /// Returns true for `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The value as an integer.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidField`](tessera_foundation::ErrorKind::InvalidField)
    /// naming `key` if the value is not an integer.
    pub fn as_int(&self, key: &str) -> Result<i64> {
        match *self {
            Self::Int(n) => Ok(n),
            _ => Err(Error::invalid_field(key, "integer")),
        }
    }

    /// The value as an identifier.
    ///
    /// # Errors
    ///
    /// Returns an invalid field error if the value is not an integer.
    pub fn as_id(&self, key: &str) -> Result<ExternalId> {
        self.as_int(key).map(ExternalId)
    }

    /// The value as a string.
    ///
    /// # Errors
    ///
    /// Returns an invalid field error if the value is not a string.
    pub fn as_str(&self, key: &str) -> Result<&'a str> {
        match *self {
            Self::Str(s) => Ok(s),
            _ => Err(Error::invalid_field(key, "string")),
        }
    }

    /// The value as a boolean.
    ///
    /// # Errors
    ///
    /// Returns an invalid field error if the value is not a boolean.
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        match *self {
            Self::Bool(b) => Ok(b),
            _ => Err(Error::invalid_field(key, "boolean")),
        }
    }

    /// The value as an array of identifiers.
    ///
    /// # Errors
    ///
    /// Returns an invalid field error if the value is not an id array.
    pub fn as_ids(&self, key: &str) -> Result<&'a [i64]> {
        match *self {
            Self::Ids(ids) => Ok(ids),
            _ => Err(Error::invalid_field(key, "array of ids")),
        }
    }

    /// The value as an array of nested records.
    ///
    /// # Errors
    ///
    /// Returns an invalid field error if the value is not an object array.
    pub fn as_objects(&self, key: &str) -> Result<&'a [Record]> {
        match *self {
            Self::Objects(records) => Ok(records),
            _ => Err(Error::invalid_field(key, "array of objects")),
        }
    }
}

/// A decoded record that can be visited field by field.
pub trait FieldSource {
    /// Calls `visit` once per field. Stops at the first error `visit` returns.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `visit`, or a decoding error of the
    /// source itself.
    fn for_each_field(
        &self,
        visit: &mut dyn FnMut(&str, FieldValue<'_>) -> Result<()>,
    ) -> Result<()>;
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn for_each_field(
        &self,
        visit: &mut dyn FnMut(&str, FieldValue<'_>) -> Result<()>,
    ) -> Result<()> {
        (**self).for_each_field(visit)
    }
}

/// An owned field value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// JSON `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A string.
    Str(String),
    /// An array of integer identifiers.
    Ids(Vec<i64>),
    /// An array of nested records.
    Objects(Vec<Record>),
}

impl Value {
    /// Borrows this value as a [`FieldValue`].
    #[must_use]
    pub fn as_field(&self) -> FieldValue<'_> {
        match self {
            Self::Null => FieldValue::Null,
            Self::Bool(b) => FieldValue::Bool(*b),
            Self::Int(n) => FieldValue::Int(*n),
            Self::Str(s) => FieldValue::Str(s),
            Self::Ids(ids) => FieldValue::Ids(ids),
            Self::Objects(records) => FieldValue::Objects(records),
        }
    }
}

/// An owned record: fields in the order they were added.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.push((key.into(), value));
        self
    }

    /// Adds a `null` field.
    #[must_use]
    pub fn null(self, key: impl Into<String>) -> Self {
        self.field(key, Value::Null)
    }

    /// Adds a boolean field.
    #[must_use]
    pub fn bool(self, key: impl Into<String>, value: bool) -> Self {
        self.field(key, Value::Bool(value))
    }

    /// Adds an integer field.
    #[must_use]
    pub fn int(self, key: impl Into<String>, value: i64) -> Self {
        self.field(key, Value::Int(value))
    }

    /// Adds a string field.
    #[must_use]
    pub fn str(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.field(key, Value::Str(value.into()))
    }

    /// Adds an id array field.
    #[must_use]
    pub fn ids(self, key: impl Into<String>, ids: impl IntoIterator<Item = i64>) -> Self {
        self.field(key, Value::Ids(ids.into_iter().collect()))
    }

    /// Adds a nested record array field.
    #[must_use]
    pub fn objects(self, key: impl Into<String>, records: impl IntoIterator<Item = Record>) -> Self {
        self.field(key, Value::Objects(records.into_iter().collect()))
    }

    /// Looks up a field by key. The first occurrence wins.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FieldSource for Record {
    fn for_each_field(
        &self,
        visit: &mut dyn FnMut(&str, FieldValue<'_>) -> Result<()>,
    ) -> Result<()> {
        for (key, value) in &self.fields {
            visit(key, value.as_field())?;
        }
        Ok(())
    }
}

/// Completes a record visit. A visit error is tagged with the record's id
/// when one was decoded; a clean visit must have produced an id.
pub(crate) fn finish_record(visited: Result<()>, id: Option<ExternalId>) -> Result<ExternalId> {
    match (visited, id) {
        (Ok(()), Some(id)) => Ok(id),
        (Ok(()), None) => Err(Error::missing_field("id")),
        (Err(err), Some(id)) => Err(with_id(err, id)),
        (Err(err), None) => Err(err),
    }
}

/// Tags an error with the store and batch position it came from, keeping any
/// identifier already attached.
pub(crate) fn in_record(err: Error, store: &'static str, record: usize) -> Error {
    let context = err
        .context
        .clone()
        .unwrap_or_default()
        .with_store(store)
        .with_record(record);
    err.with_context(context)
}

fn with_id(err: Error, id: ExternalId) -> Error {
    let context = err.context.clone().unwrap_or_else(ErrorContext::new).with_id(id);
    err.with_context(context)
}
