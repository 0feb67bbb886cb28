//! Role-based access control over resource attributes.
//!
//! Grants are declared up front through [`AccessControl::grant`] and queried
//! through [`AccessControl::can`]. A granted "any" action also satisfies the
//! "own" variant of the same action.

use self::types::{Action, Attribute, Permission, Possession, Role, Rule, ALL_ATTRIBUTES};
use std::collections::HashMap;
use thiserror::Error;

pub mod table;
pub mod types;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("role not found: {0}")]
    UnknownRole(Role),
    #[error("invalid role name: {0:?}")]
    InvalidRole(Role),
}

#[derive(Debug, Clone, Default)]
pub struct AccessControl {
    grants: HashMap<Role, Vec<Rule>>,
}

impl AccessControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&mut self, role: impl Into<Role>) -> Result<Grant<'_>, AccessError> {
        let role = role.into();
        if role.trim().is_empty() {
            return Err(AccessError::InvalidRole(role));
        }
        self.grants.entry(role.clone()).or_default();
        Ok(Grant { control: self, role })
    }

    pub fn can(&self, role: &str) -> Result<Query<'_>, AccessError> {
        let rules = self
            .grants
            .get(role)
            .ok_or_else(|| AccessError::UnknownRole(role.to_owned()))?;
        Ok(Query {
            role: role.to_owned(),
            rules,
        })
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.grants.contains_key(role)
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.grants.keys().map(String::as_str)
    }
}

/// Declares permissions for one role.
#[derive(Debug)]
pub struct Grant<'a> {
    control: &'a mut AccessControl,
    role: Role,
}

impl<'a> Grant<'a> {
    /// Grants `action` on `resource`; an empty attribute list means every attribute.
    pub fn allow<I, A>(self, action: Action, possession: Possession, resource: &str, attributes: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Attribute>,
    {
        let mut attributes: Vec<Attribute> = attributes.into_iter().map(Into::into).collect();
        if attributes.is_empty() {
            attributes.push(ALL_ATTRIBUTES.to_owned());
        }

        let rules = self.control.grants.entry(self.role.clone()).or_default();
        rules.retain(|rule| {
            !(rule.resource == resource && rule.action == action && rule.possession == possession)
        });
        rules.push(Rule {
            resource: resource.to_owned(),
            action,
            possession,
            attributes,
        });
        self
    }

    pub fn create<I, A>(self, resource: &str, attributes: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Attribute>,
    {
        self.allow(Action::Create, Possession::Any, resource, attributes)
    }

    pub fn read<I, A>(self, resource: &str, attributes: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Attribute>,
    {
        self.allow(Action::Read, Possession::Any, resource, attributes)
    }

    pub fn read_own<I, A>(self, resource: &str, attributes: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Attribute>,
    {
        self.allow(Action::Read, Possession::Own, resource, attributes)
    }

    pub fn update<I, A>(self, resource: &str, attributes: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Attribute>,
    {
        self.allow(Action::Update, Possession::Any, resource, attributes)
    }

    pub fn delete<I, A>(self, resource: &str, attributes: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Attribute>,
    {
        self.allow(Action::Delete, Possession::Any, resource, attributes)
    }
}

/// Permission lookups for one role.
#[derive(Debug, Clone)]
pub struct Query<'a> {
    role: Role,
    rules: &'a [Rule],
}

impl<'a> Query<'a> {
    pub fn permission(&self, action: Action, possession: Possession, resource: &str) -> Permission {
        let mut attributes = Vec::new();
        for rule in self.rules.iter().filter(|rule| {
            rule.resource == resource
                && rule.action == action
                && (rule.possession == possession || rule.possession == Possession::Any)
        }) {
            attributes.extend(rule.attributes.iter().cloned());
        }
        Permission::new(self.role.clone(), resource.to_owned(), attributes)
    }

    pub fn create_any(&self, resource: &str) -> Permission {
        self.permission(Action::Create, Possession::Any, resource)
    }

    pub fn read_any(&self, resource: &str) -> Permission {
        self.permission(Action::Read, Possession::Any, resource)
    }

    pub fn read_own(&self, resource: &str) -> Permission {
        self.permission(Action::Read, Possession::Own, resource)
    }

    pub fn update_any(&self, resource: &str) -> Permission {
        self.permission(Action::Update, Possession::Any, resource)
    }

    pub fn delete_any(&self, resource: &str) -> Permission {
        self.permission(Action::Delete, Possession::Any, resource)
    }
}
