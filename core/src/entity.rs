//! Resolved entities and their relationship slots.
//!
//! # Design
//! `Entity` is a closed sum over the built-in kinds plus `Custom` for kinds a
//! host registers at runtime through an [`EntityShape`]. Variants that share a
//! struct (the job-like kinds, founded companies, primary locations) are still
//! distinct variants, so dispatch on the kind tag always yields a distinct
//! concrete kind even when two payloads look identical.

use std::collections::BTreeMap;

use serde_json::Value;
use uuid::Uuid;

use crate::model::{
    Acquisition, Category, Customer, Degree, FundingRound, Investment, Ipo, Job, Location, Office,
    Organization, Person, Product, Video,
};

/// Read access shared by every entity kind.
pub trait Model: std::fmt::Debug {
    fn uuid(&self) -> Option<Uuid>;

    /// The resolved relationship slot `name`, if it holds anything.
    fn relationship(&self, name: &str) -> Option<&Relationship>;

    /// Names of the relationship slots that hold something.
    fn relationship_names(&self) -> Vec<&str>;
}

/// What a relationship slot holds once resolved. An empty slot is `None` on
/// the owning entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Relationship {
    /// One embedded entity, owned by its parent.
    One(Box<Entity>),
    /// Several embedded entities.
    Many(Vec<Entity>),
    /// Linkage by permalink only; fetch it with `Client::follow`.
    Reference(Reference),
}

impl Relationship {
    /// The embedded entities, empty for a reference.
    pub fn entities(&self) -> &[Entity] {
        match self {
            Relationship::One(entity) => std::slice::from_ref(entity.as_ref()),
            Relationship::Many(entities) => entities,
            Relationship::Reference(_) => &[],
        }
    }

    pub fn as_one(&self) -> Option<&Entity> {
        match self {
            Relationship::One(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Relationship::Reference(reference) => Some(reference),
            _ => None,
        }
    }
}

/// A weak link to another entity: the resource kind and its permalink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: String,
    pub permalink: String,
}

/// Declarative definition of a host-supplied kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityShape {
    pub kind: String,
    pub attributes: Vec<String>,
    /// `(relationship name, target kind tag)` pairs.
    pub relationships: Vec<(String, String)>,
}

impl EntityShape {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(name.into());
        self
    }

    pub fn relationship(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.relationships.push((name.into(), target.into()));
        self
    }
}

/// An entity built from an [`EntityShape`]. Only declared attributes are
/// kept; absent or null ones are left out of the map.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomEntity {
    pub kind: String,
    pub uuid: Option<Uuid>,
    pub attributes: BTreeMap<String, Value>,
    pub relationships: BTreeMap<String, Relationship>,
}

impl CustomEntity {
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}

impl Model for CustomEntity {
    fn uuid(&self) -> Option<Uuid> {
        self.uuid
    }

    fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.get(name)
    }

    fn relationship_names(&self) -> Vec<&str> {
        self.relationships.keys().map(String::as_str).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Organization(Organization),
    FoundedCompany(Organization),
    Person(Person),
    Product(Product),
    Category(Category),
    FundingRound(FundingRound),
    Acquisition(Acquisition),
    Ipo(Ipo),
    Investment(Investment),
    Location(Location),
    PrimaryLocation(Location),
    Office(Office),
    Customer(Customer),
    Degree(Degree),
    Video(Video),
    CurrentTeam(Job),
    PastTeam(Job),
    BoardMember(Job),
    PrimaryAffiliation(Job),
    AdvisoryRole(Job),
    Custom(CustomEntity),
}

impl Entity {
    /// Name of the concrete kind this entity resolved to.
    pub fn kind(&self) -> &str {
        match self {
            Entity::Organization(_) => "Organization",
            Entity::FoundedCompany(_) => "FoundedCompany",
            Entity::Person(_) => "Person",
            Entity::Product(_) => "Product",
            Entity::Category(_) => "Category",
            Entity::FundingRound(_) => "FundingRound",
            Entity::Acquisition(_) => "Acquisition",
            Entity::Ipo(_) => "Ipo",
            Entity::Investment(_) => "Investment",
            Entity::Location(_) => "Location",
            Entity::PrimaryLocation(_) => "PrimaryLocation",
            Entity::Office(_) => "Office",
            Entity::Customer(_) => "Customer",
            Entity::Degree(_) => "Degree",
            Entity::Video(_) => "Video",
            Entity::CurrentTeam(_) => "CurrentTeam",
            Entity::PastTeam(_) => "PastTeam",
            Entity::BoardMember(_) => "BoardMembersAndAdvisor",
            Entity::PrimaryAffiliation(_) => "PrimaryAffiliation",
            Entity::AdvisoryRole(_) => "AdvisoryRole",
            Entity::Custom(custom) => &custom.kind,
        }
    }

    pub fn model(&self) -> &dyn Model {
        match self {
            Entity::Organization(m) | Entity::FoundedCompany(m) => m,
            Entity::Person(m) => m,
            Entity::Product(m) => m,
            Entity::Category(m) => m,
            Entity::FundingRound(m) => m,
            Entity::Acquisition(m) => m,
            Entity::Ipo(m) => m,
            Entity::Investment(m) => m,
            Entity::Location(m) | Entity::PrimaryLocation(m) => m,
            Entity::Office(m) => m,
            Entity::Customer(m) => m,
            Entity::Degree(m) => m,
            Entity::Video(m) => m,
            Entity::CurrentTeam(m)
            | Entity::PastTeam(m)
            | Entity::BoardMember(m)
            | Entity::PrimaryAffiliation(m)
            | Entity::AdvisoryRole(m) => m,
            Entity::Custom(m) => m,
        }
    }

    pub fn uuid(&self) -> Option<Uuid> {
        self.model().uuid()
    }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.model().relationship(name)
    }

    pub fn relationship_names(&self) -> Vec<&str> {
        self.model().relationship_names()
    }
}
