//! Copy-on-derive field storage bound to a logger
//!
//! A `FieldSet` is a root segment followed by a stack of open groups. Fields
//! attached with [`FieldSet::with`] always land in the innermost open group
//! (or the root when none is open). Deriving never mutates the parent: every
//! derived set is a fresh value, shared behind `Arc` by the logger.

use super::value::{Field, Value};

#[derive(Debug, Clone, Default)]
struct GroupScope {
    name: String,
    fields: Vec<Field>,
}

#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    root: Vec<Field>,
    groups: Vec<GroupScope>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// New set with `fields` appended to the innermost scope
    #[must_use]
    pub fn with(&self, fields: impl IntoIterator<Item = Field>) -> Self {
        let mut derived = self.clone();
        match derived.groups.last_mut() {
            Some(group) => group.fields.extend(fields),
            None => derived.root.extend(fields),
        }
        derived
    }

    /// New set with a group named `name` opened; an empty name changes nothing
    #[must_use]
    pub fn with_group(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        let mut derived = self.clone();
        if !name.is_empty() {
            derived.groups.push(GroupScope {
                name,
                fields: Vec::new(),
            });
        }
        derived
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty() && self.groups.iter().all(|group| group.fields.is_empty())
    }

    /// Names of the open groups, outermost first
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.name.as_str())
    }

    /// Flatten into a field list with `call_fields` placed in the innermost scope.
    ///
    /// Groups are folded from the inside out into nested [`Value::Group`]
    /// fields; a group that ends up empty is dropped.
    pub fn merge(&self, call_fields: Vec<Field>) -> Vec<Field> {
        let mut inner = call_fields;
        for group in self.groups.iter().rev() {
            let mut fields = group.fields.clone();
            fields.append(&mut inner);
            if !fields.is_empty() {
                inner = vec![Field {
                    key: group.name.clone(),
                    value: Value::Group(fields),
                }];
            }
        }

        let mut merged = self.root.clone();
        merged.append(&mut inner);
        merged
    }
}
