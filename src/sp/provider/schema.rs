// Copyright (c) 2019-2023 Snowplow Analytics Ltd. All rights reserved.

//! Declarative attribute schemas for the provider, its data sources and
//! resources.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Int64,
    Bool,
    List(Box<AttributeType>),
    Object(BTreeMap<String, AttributeType>),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    attr_type: AttributeType,
    required: bool,
    optional: bool,
    computed: bool,
    sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Attribute {
    fn new(attr_type: AttributeType) -> Self {
        Self {
            attr_type,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            description: None,
        }
    }

    pub fn required(attr_type: AttributeType) -> Self {
        Self {
            required: true,
            ..Self::new(attr_type)
        }
    }

    pub fn optional(attr_type: AttributeType) -> Self {
        Self {
            optional: true,
            ..Self::new(attr_type)
        }
    }

    pub fn computed(attr_type: AttributeType) -> Self {
        Self {
            computed: true,
            ..Self::new(attr_type)
        }
    }

    pub fn required_string() -> Self {
        Self::required(AttributeType::String)
    }

    pub fn optional_string() -> Self {
        Self::optional(AttributeType::String)
    }

    pub fn computed_string() -> Self {
        Self::computed(AttributeType::String)
    }

    pub fn computed_list(element: AttributeType) -> Self {
        Self::computed(list(element))
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn attr_type(&self) -> &AttributeType {
        &self.attr_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_computed(&self) -> bool {
        self.computed
    }

    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    pub fn description(&self) -> Option<&String> {
        self.description.as_ref()
    }
}

/// An ordered set of named attributes.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Schema {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_attribute<S: Into<String>>(mut self, name: S, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn description(&self) -> Option<&String> {
        self.description.as_ref()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&String, &Attribute)> {
        self.attributes.iter()
    }

    /// Restricts `state` to the declared top-level attributes. Undeclared
    /// keys are dropped and missing declared keys become `null`.
    pub fn project(&self, state: Value) -> Value {
        let mut state = match state {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let projected = self
            .attributes
            .keys()
            .map(|name| (name.clone(), state.remove(name).unwrap_or(Value::Null)))
            .collect::<Map<String, Value>>();
        Value::Object(projected)
    }
}

/// An object type from `(name, type)` pairs.
pub fn object(fields: Vec<(&str, AttributeType)>) -> AttributeType {
    AttributeType::Object(
        fields
            .into_iter()
            .map(|(name, t)| (name.to_string(), t))
            .collect(),
    )
}

pub fn list(element: AttributeType) -> AttributeType {
    AttributeType::List(Box::new(element))
}
