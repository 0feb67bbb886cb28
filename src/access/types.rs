use serde_json::{Map, Value};

pub type Role = String;
pub type Resource = String;
pub type Attribute = String;

pub const ALL_ATTRIBUTES: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

/// Whether a grant covers any instance of a resource or only the caller's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Possession {
    Any,
    Own,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) struct Rule {
    pub resource: Resource,
    pub action: Action,
    pub possession: Possession,
    pub attributes: Vec<Attribute>,
}

/// Outcome of a permission query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    role: Role,
    resource: Resource,
    attributes: Vec<Attribute>,
}

impl Permission {
    pub(super) fn new(role: Role, resource: Resource, attributes: Vec<Attribute>) -> Self {
        Self {
            role,
            resource,
            attributes,
        }
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Attribute patterns the query resolved to; empty when nothing matched.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn granted(&self) -> bool {
        self.attributes.iter().any(|attr| !attr.starts_with('!'))
    }

    /// `"*"` admits everything, `"!attr"` excludes `attr` even when otherwise admitted.
    pub fn allows(&self, attribute: &str) -> bool {
        let mut admitted = false;
        for pattern in &self.attributes {
            match pattern.strip_prefix('!') {
                Some(excluded) if excluded == attribute || excluded == ALL_ATTRIBUTES => {
                    return false
                }
                Some(_) => {}
                None => admitted |= pattern == attribute || pattern == ALL_ATTRIBUTES,
            }
        }
        admitted
    }

    /// Keeps only the allowed top-level fields of a JSON object.
    ///
    /// Arrays are filtered element-wise; any other value is returned as is
    /// when the permission is granted and as `null` otherwise.
    pub fn filter(&self, data: &Value) -> Value {
        match data {
            Value::Object(fields) => Value::Object(
                fields
                    .iter()
                    .filter(|(name, _)| self.allows(name))
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect::<Map<_, _>>(),
            ),
            Value::Array(items) => Value::Array(items.iter().map(|item| self.filter(item)).collect()),
            other if self.granted() => other.clone(),
            _ => Value::Null,
        }
    }
}
