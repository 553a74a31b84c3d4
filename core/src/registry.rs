//! Kind-tag registry and the recursive resolver.
//!
//! # Design
//! The registry maps a kind tag (`"organizations"`, `"current_team"`, ...) to
//! a constructor plus the relationships that kind declares. Lookups never
//! fall back to an untyped value: an unknown tag is
//! [`ClientError::UnsupportedEntity`]. Item type names found in
//! heterogeneous payloads (`"Organization"`, `"PersonSummary"`) are aliases
//! onto tags, matched case-insensitively.
//!
//! Resolution recurses through `relationships` with an explicit depth count,
//! since the wire format does not rule out cycles.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::trace;
use uuid::Uuid;

use crate::entity::{CustomEntity, Entity, EntityShape, Reference, Relationship};
use crate::error::{ClientError, Result};
use crate::model::Construct;

pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Builds an entity from one JSON node. Constructors resolve their own
/// relationships through the [`Resolver`] they are handed.
pub type Constructor = Arc<dyn Fn(&Value, &Resolver<'_>) -> Result<Entity> + Send + Sync>;

struct Registration {
    relationships: Vec<(String, String)>,
    construct: Constructor,
}

#[derive(Clone)]
pub struct Registry {
    entries: HashMap<String, Arc<Registration>>,
    aliases: HashMap<String, String>,
    max_depth: usize,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.entries.keys().collect();
        tags.sort();
        f.debug_struct("Registry")
            .field("tags", &tags)
            .field("aliases", &self.aliases.len())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Registry {
    /// A registry with no kinds at all.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            aliases: HashMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Every kind the Crunchbase API returns.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();

        registry.register_model("categories", Entity::Category);
        registry.register_model("organizations", Entity::Organization);
        registry.register_model("founded_companies", Entity::FoundedCompany);
        registry.register_model("people", Entity::Person);
        registry.register_model("products", Entity::Product);
        registry.register_model("ipos", Entity::Ipo);
        registry.register_model("funding_rounds", Entity::FundingRound);
        registry.register_model("funding-rounds", Entity::FundingRound);
        registry.register_model("acquisitions", Entity::Acquisition);
        registry.register_model("investments", Entity::Investment);
        registry.register_model("locations", Entity::Location);
        registry.register_model("headquarters", Entity::Location);
        registry.register_model("primary_location", Entity::PrimaryLocation);
        registry.register_model("offices", Entity::Office);
        registry.register_model("customers", Entity::Customer);
        registry.register_model("degrees", Entity::Degree);
        registry.register_model("videos", Entity::Video);
        registry.register_model("current_team", Entity::CurrentTeam);
        registry.register_model("past_team", Entity::PastTeam);
        registry.register_model("board_members_and_advisors", Entity::BoardMember);
        registry.register_model("primary_affiliation", Entity::PrimaryAffiliation);
        registry.register_model("advisor_at", Entity::AdvisoryRole);

        for (alias, tag) in [
            ("Organization", "organizations"),
            ("OrganizationSummary", "organizations"),
            ("Person", "people"),
            ("PersonSummary", "people"),
            ("Product", "products"),
            ("ProductSummary", "products"),
            ("Category", "categories"),
            ("FundingRound", "funding_rounds"),
            ("Acquisition", "acquisitions"),
            ("Investment", "investments"),
            ("Ipo", "ipos"),
            ("Location", "locations"),
            ("Address", "locations"),
            ("Office", "offices"),
            ("Customer", "customers"),
            ("Degree", "degrees"),
            ("Video", "videos"),
            ("FoundedCompany", "founded_companies"),
            ("PrimaryLocation", "primary_location"),
            ("PrimaryAffiliation", "primary_affiliation"),
            ("AdvisoryRole", "advisor_at"),
            ("CurrentTeam", "current_team"),
            ("PastTeam", "past_team"),
            ("BoardMembersAndAdvisor", "board_members_and_advisors"),
        ] {
            registry.alias(alias, tag);
        }

        registry
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Register a host-supplied constructor under `tag`. Replacing an
    /// existing kind keeps the relationships it declared.
    pub fn register<F>(&mut self, tag: impl Into<String>, constructor: F)
    where
        F: Fn(&Value, &Resolver<'_>) -> Result<Entity> + Send + Sync + 'static,
    {
        let tag = tag.into();
        let relationships = self
            .entries
            .get(&tag)
            .map(|entry| entry.relationships.clone())
            .unwrap_or_default();
        self.insert(tag, relationships, Arc::new(constructor));
    }

    /// Like [`Registry::register`], declaring `(name, target)` relationships
    /// for the kind.
    pub fn register_with_relationships<F>(
        &mut self,
        tag: impl Into<String>,
        relationships: &[(&str, &str)],
        constructor: F,
    ) where
        F: Fn(&Value, &Resolver<'_>) -> Result<Entity> + Send + Sync + 'static,
    {
        let relationships = relationships
            .iter()
            .map(|(name, target)| (name.to_string(), target.to_string()))
            .collect();
        self.insert(tag.into(), relationships, Arc::new(constructor));
    }

    /// Register a declarative shape. Its entities resolve to
    /// [`Entity::Custom`].
    pub fn register_shape(&mut self, shape: EntityShape) {
        let tag = shape.kind.clone();
        let relationships = shape.relationships.clone();
        let construct: Constructor = Arc::new(move |node: &Value, resolver: &Resolver<'_>| {
            let properties = properties_of(node)?;
            let attributes = shape
                .attributes
                .iter()
                .filter_map(|name| match properties.get(name) {
                    Some(Value::Null) | None => None,
                    Some(value) => Some((name.clone(), value.clone())),
                })
                .collect();

            let mut relationships = BTreeMap::new();
            for (name, target) in &shape.relationships {
                if let Some(rel) = resolver.relationship(node, name, target)? {
                    relationships.insert(name.clone(), rel);
                }
            }

            Ok(Entity::Custom(CustomEntity {
                kind: shape.kind.clone(),
                uuid: uuid_of(node)?,
                attributes,
                relationships,
            }))
        });
        self.insert(tag, relationships, construct);
    }

    /// Make `type_name` (matched case-insensitively) resolve like `tag`.
    pub fn alias(&mut self, type_name: &str, tag: impl Into<String>) {
        self.aliases.insert(type_name.to_ascii_lowercase(), tag.into());
    }

    fn register_model<M: Construct>(&mut self, tag: &str, wrap: fn(M) -> Entity) {
        let construct: Constructor = Arc::new(move |node: &Value, resolver: &Resolver<'_>| {
            let mut model: M = resolver.attributes(node)?;
            for (name, target) in M::RELATIONSHIPS {
                if let Some(rel) = resolver.relationship(node, name, target)? {
                    model.attach(name, rel);
                }
            }
            Ok(wrap(model))
        });
        let relationships = M::RELATIONSHIPS
            .iter()
            .map(|(name, target)| (name.to_string(), target.to_string()))
            .collect();
        self.insert(tag.to_string(), relationships, construct);
    }

    fn insert(&mut self, tag: String, relationships: Vec<(String, String)>, construct: Constructor) {
        self.entries.insert(
            tag,
            Arc::new(Registration {
                relationships,
                construct,
            }),
        );
    }

    fn lookup(&self, tag: &str) -> Option<&Registration> {
        if let Some(entry) = self.entries.get(tag) {
            return Some(entry.as_ref());
        }
        self.aliases
            .get(&tag.to_ascii_lowercase())
            .and_then(|canonical| self.entries.get(canonical))
            .map(Arc::as_ref)
    }

    /// Whether `tag` (or an alias of it) has a constructor.
    pub fn is_registered(&self, tag: &str) -> bool {
        self.lookup(tag).is_some()
    }

    /// Whether `tag` itself is registered. Aliases are item type names, not
    /// resource paths, so they do not count.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<_> = self.entries.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Declared `(name, target)` relationships of `tag`.
    pub fn relationships_of(&self, tag: &str) -> Result<&[(String, String)]> {
        self.lookup(tag)
            .map(|entry| entry.relationships.as_slice())
            .ok_or_else(|| ClientError::UnsupportedEntity(tag.to_string()))
    }

    /// Check that every tag in `tags`, and every relationship target any
    /// registered kind declares, resolves. Meant to run once at startup.
    pub fn validate<'a>(&self, tags: impl IntoIterator<Item = &'a str>) -> Result<()> {
        for tag in tags {
            if !self.is_registered(tag) {
                return Err(ClientError::UnsupportedEntity(tag.to_string()));
            }
        }
        for entry in self.entries.values() {
            for (_, target) in &entry.relationships {
                if !self.is_registered(target) {
                    return Err(ClientError::UnsupportedEntity(target.clone()));
                }
            }
        }
        Ok(())
    }

    /// Resolve `node` as the kind registered under `tag`.
    pub fn resolve(&self, tag: &str, node: &Value) -> Result<Entity> {
        Resolver {
            registry: self,
            depth: 0,
        }
        .construct(tag, node)
    }

    /// Resolve `node` by its own `type` field.
    pub fn resolve_typed(&self, node: &Value) -> Result<Entity> {
        let type_name = node.get("type").and_then(Value::as_str).ok_or_else(|| {
            ClientError::MalformedResponse("item carries no type field".to_string())
        })?;
        self.resolve(type_name, node)
    }

    /// Resolve the value found under `relationships.<relation_name>` of a
    /// `parent_kind` node, using the target kind the parent declares.
    pub fn resolve_relationship(
        &self,
        parent_kind: &str,
        relation_name: &str,
        node: &Value,
    ) -> Result<Option<Relationship>> {
        let target = self
            .relationships_of(parent_kind)?
            .iter()
            .find(|(name, _)| name == relation_name)
            .map(|(_, target)| target.clone())
            .ok_or_else(|| {
                ClientError::UnsupportedEntity(format!("{parent_kind}.{relation_name}"))
            })?;
        Resolver {
            registry: self,
            depth: 0,
        }
        .related(&target, node)
    }
}

/// Resolution context handed to constructors: the registry plus the current
/// nesting depth.
pub struct Resolver<'r> {
    registry: &'r Registry,
    depth: usize,
}

impl<'r> Resolver<'r> {
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    fn construct(&self, tag: &str, node: &Value) -> Result<Entity> {
        let entry = self
            .registry
            .lookup(tag)
            .ok_or_else(|| ClientError::UnsupportedEntity(tag.to_string()))?;
        if !node.is_object() {
            return Err(ClientError::MalformedResponse(format!(
                "expected an object for {tag}, found {node}"
            )));
        }
        trace!(tag, depth = self.depth, "resolving entity");
        (entry.construct)(node, self)
    }

    /// Deserialize the node's attribute set: its `properties` object (or the
    /// node itself), with the node's top-level `uuid` merged in.
    pub fn attributes<T: DeserializeOwned>(&self, node: &Value) -> Result<T> {
        let mut properties = properties_of(node)?.clone();
        if let Some(uuid) = node.get("uuid") {
            properties.entry("uuid").or_insert_with(|| uuid.clone());
        }
        serde_json::from_value(Value::Object(properties))
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }

    /// Resolve relationship `name` of `node` as `target` kind. Absent or null
    /// relationships resolve to `None`.
    pub fn relationship(
        &self,
        node: &Value,
        name: &str,
        target: &str,
    ) -> Result<Option<Relationship>> {
        match node.get("relationships").and_then(|r| r.get(name)) {
            Some(value) => self.related(target, value),
            None => Ok(None),
        }
    }

    fn related(&self, target: &str, value: &Value) -> Result<Option<Relationship>> {
        let child = Resolver {
            registry: self.registry,
            depth: self.depth + 1,
        };
        match relationship_payload(value) {
            Value::Null => Ok(None),
            Value::Array(items) if items.is_empty() => Ok(None),
            Value::String(permalink) => Ok(Some(Relationship::Reference(Reference {
                kind: target.to_string(),
                permalink: permalink.clone(),
            }))),
            payload => {
                if child.depth > self.registry.max_depth {
                    return Err(ClientError::RelationshipTooDeep {
                        depth: self.registry.max_depth,
                    });
                }
                match payload {
                    Value::Array(items) => items
                        .iter()
                        .map(|item| child.construct(target, item))
                        .collect::<Result<Vec<_>>>()
                        .map(|entities| Some(Relationship::Many(entities))),
                    object => child
                        .construct(target, object)
                        .map(|entity| Some(Relationship::One(Box::new(entity)))),
                }
            }
        }
    }
}

/// The sub-node holding a relationship's payload: `data`, `item` or `items`
/// when present, else the value itself.
fn relationship_payload(value: &Value) -> &Value {
    if let Value::Object(map) = value {
        for key in ["data", "item", "items"] {
            if let Some(payload) = map.get(key) {
                return payload;
            }
        }
    }
    value
}

fn properties_of(node: &Value) -> Result<&Map<String, Value>> {
    match node.get("properties") {
        Some(Value::Object(properties)) => Ok(properties),
        _ => node.as_object().ok_or_else(|| {
            ClientError::MalformedResponse(format!("expected an object node, found {node}"))
        }),
    }
}

fn uuid_of(node: &Value) -> Result<Option<Uuid>> {
    match node.get("uuid").and_then(Value::as_str) {
        Some(raw) => Uuid::parse_str(raw)
            .map(Some)
            .map_err(|e| ClientError::MalformedResponse(format!("invalid uuid {raw}: {e}"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn org_node() -> Value {
        json!({
            "type": "Organization",
            "uuid": "df6628127f970b439d3e12f10ecbca7e",
            "properties": {
                "permalink": "facebook",
                "name": "Facebook",
                "num_employees_min": 5001,
                "is_closed": false
            },
            "relationships": {
                "headquarters": {"data": {"type": "Address", "properties": {"city": "Menlo Park"}}},
                "founders": {"data": [
                    {"type": "Person", "properties": {"first_name": "Mark", "last_name": "Zuckerberg"}},
                    {"type": "Person", "properties": {"first_name": "Dustin", "last_name": "Moskovitz"}}
                ]},
                "ipo": {"data": null},
                "categories": {"data": []}
            }
        })
    }

    #[test]
    fn organization_attributes_and_relationships() {
        let entity = Registry::builtin().resolve("organizations", &org_node()).unwrap();
        let Entity::Organization(org) = &entity else {
            panic!("expected organization, got {}", entity.kind());
        };
        assert_eq!(org.name.as_deref(), Some("Facebook"));
        assert_eq!(org.num_employees_min, Some(5001));
        assert_eq!(org.is_closed, Some(false));
        assert!(org.description.is_none());
        assert_eq!(
            org.uuid.map(|u| u.simple().to_string()).as_deref(),
            Some("df6628127f970b439d3e12f10ecbca7e")
        );

        let mut names = entity.relationship_names();
        names.sort_unstable();
        assert_eq!(names, vec!["founders", "headquarters"]);

        let hq = org.headquarters.as_ref().and_then(Relationship::as_one).unwrap();
        assert!(matches!(hq, Entity::Location(l) if l.city.as_deref() == Some("Menlo Park")));
        assert_eq!(org.founders.as_ref().unwrap().entities().len(), 2);
        assert!(org.ipo.is_none());
        assert!(org.categories.is_none());
    }

    #[test]
    fn missing_relationships_object_leaves_slots_empty() {
        let node = json!({"properties": {"name": "Bare"}});
        let entity = Registry::builtin().resolve("organizations", &node).unwrap();
        assert!(entity.relationship_names().is_empty());
    }

    #[test]
    fn unregistered_tag_is_rejected() {
        let err = Registry::builtin().resolve("unobtainium", &org_node()).unwrap_err();
        assert!(matches!(err, ClientError::UnsupportedEntity(tag) if tag == "unobtainium"));
    }

    #[test]
    fn same_fields_different_tags_resolve_to_different_kinds() {
        let node = json!({"properties": {"title": "CEO", "is_current": true}});
        let registry = Registry::builtin();
        let current = registry.resolve("current_team", &node).unwrap();
        let past = registry.resolve("past_team", &node).unwrap();
        assert_eq!(current.kind(), "CurrentTeam");
        assert_eq!(past.kind(), "PastTeam");
        assert_ne!(current, past);
    }

    #[test]
    fn job_person_relationship_resolves_embedded_node() {
        // Job cards embed the person directly, without a data wrapper.
        let node = json!({
            "type": "Job",
            "properties": {"title": "Director"},
            "relationships": {
                "person": {"type": "Person", "properties": {"first_name": "Ada", "last_name": "Lovelace"}}
            }
        });
        let entity = Registry::builtin().resolve("board_members_and_advisors", &node).unwrap();
        let Entity::BoardMember(job) = entity else {
            panic!("expected board member");
        };
        let person = job.person.as_ref().and_then(Relationship::as_one).unwrap();
        let Entity::Person(person) = person else {
            panic!("expected person");
        };
        assert_eq!(person.full_name().as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn string_relationship_is_a_reference() {
        let node = json!({"relationships": {"person": {"data": "ada-lovelace"}}});
        let entity = Registry::builtin().resolve("current_team", &node).unwrap();
        let reference = entity.relationship("person").and_then(Relationship::as_reference).unwrap();
        assert_eq!(
            reference,
            &Reference {
                kind: "people".to_string(),
                permalink: "ada-lovelace".to_string()
            }
        );
    }

    #[test]
    fn aliases_match_case_insensitively() {
        let registry = Registry::builtin();
        let entity = registry
            .resolve_typed(&json!({"type": "PERSONSUMMARY", "properties": {"first_name": "A"}}))
            .unwrap();
        assert_eq!(entity.kind(), "Person");
        assert!(registry.is_registered("Organization"));
        assert!(!registry.is_registered("Unobtainium"));
    }

    #[test]
    fn wrongly_typed_attribute_is_malformed() {
        let node = json!({"properties": {"num_employees_min": "lots"}});
        let err = Registry::builtin().resolve("organizations", &node).unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }

    #[test]
    fn cyclic_payload_hits_depth_guard() {
        // organization -> current_team -> organization -> ... nested deeper than the limit.
        let mut node = json!({"properties": {"name": "leaf"}});
        for i in 0..6 {
            node = if i % 2 == 0 {
                json!({"properties": {"title": "CEO"}, "relationships": {"organization": {"data": node}}})
            } else {
                json!({"properties": {"name": "org"}, "relationships": {"current_team": {"data": [node]}}})
            };
        }
        let registry = Registry::builtin().with_max_depth(3);
        let err = registry.resolve("organizations", &node).unwrap_err();
        assert!(matches!(err, ClientError::RelationshipTooDeep { depth: 3 }));

        assert!(Registry::builtin().resolve("organizations", &node).is_ok());
    }

    #[test]
    fn resolve_relationship_uses_declared_target() {
        let registry = Registry::builtin();
        let rel = registry
            .resolve_relationship("organizations", "headquarters", &json!({"data": {"properties": {"city": "Austin"}}}))
            .unwrap()
            .unwrap();
        assert_eq!(rel.as_one().unwrap().kind(), "Location");

        assert!(registry
            .resolve_relationship("organizations", "ipo", &json!({"data": null}))
            .unwrap()
            .is_none());

        let err = registry
            .resolve_relationship("organizations", "spaceships", &json!({}))
            .unwrap_err();
        assert!(matches!(err, ClientError::UnsupportedEntity(_)));
    }

    #[test]
    fn host_shapes_extend_the_registry() {
        let mut registry = Registry::builtin();
        registry.register_shape(
            EntityShape::new("events")
                .attribute("name")
                .attribute("starts_on")
                .attribute("venue_name")
                .relationship("organizer", "organizations"),
        );
        registry.alias("Event", "events");

        let node = json!({
            "type": "Event",
            "properties": {"name": "Disrupt", "starts_on": "2017-09-18", "venue_name": null, "ignored": 1},
            "relationships": {"organizer": {"data": {"properties": {"name": "TechCrunch"}}}}
        });
        let entity = registry.resolve_typed(&node).unwrap();
        let Entity::Custom(event) = &entity else {
            panic!("expected custom entity");
        };
        assert_eq!(event.kind, "events");
        assert_eq!(event.attribute("name"), Some(&json!("Disrupt")));
        assert!(event.attribute("venue_name").is_none());
        assert!(event.attribute("ignored").is_none());
        assert_eq!(entity.relationship("organizer").unwrap().as_one().unwrap().kind(), "Organization");
    }

    #[test]
    fn host_constructors_can_replace_builtin_kinds() {
        let mut registry = Registry::builtin();
        registry.register("videos", |node, resolver| {
            let mut video: crate::model::Video = resolver.attributes(node)?;
            video.title = video.title.map(|t| t.to_uppercase());
            Ok(Entity::Video(video))
        });
        let entity = registry.resolve("videos", &json!({"properties": {"title": "demo"}})).unwrap();
        assert!(matches!(entity, Entity::Video(v) if v.title.as_deref() == Some("DEMO")));
    }

    #[test]
    fn replacing_a_builtin_keeps_its_relationships() {
        let mut registry = Registry::builtin();
        registry.register("organizations", |node, resolver| {
            let org: crate::model::Organization = resolver.attributes(node)?;
            Ok(Entity::Organization(org))
        });

        let rel = registry
            .resolve_relationship("organizations", "headquarters", &json!({"data": {"properties": {"city": "Austin"}}}))
            .unwrap()
            .unwrap();
        assert_eq!(rel.as_one().unwrap().kind(), "Location");
        assert!(registry
            .relationships_of("organizations")
            .unwrap()
            .iter()
            .any(|(name, target)| name == "founders" && target == "people"));
        registry.validate(["organizations"]).unwrap();
    }

    #[test]
    fn host_constructors_can_declare_relationships() {
        let mut registry = Registry::builtin();
        registry.register_with_relationships("events", &[("organizer", "organizations")], |node, resolver| {
            let organizer = resolver.relationship(node, "organizer", "organizations")?;
            let mut relationships = BTreeMap::new();
            if let Some(rel) = organizer {
                relationships.insert("organizer".to_string(), rel);
            }
            Ok(Entity::Custom(CustomEntity {
                kind: "events".to_string(),
                uuid: None,
                attributes: BTreeMap::new(),
                relationships,
            }))
        });

        assert_eq!(
            registry.relationships_of("events").unwrap(),
            &[("organizer".to_string(), "organizations".to_string())]
        );
        let rel = registry
            .resolve_relationship("events", "organizer", &json!({"data": {"properties": {"name": "TechCrunch"}}}))
            .unwrap()
            .unwrap();
        assert_eq!(rel.as_one().unwrap().kind(), "Organization");
    }

    #[test]
    fn has_tag_ignores_aliases() {
        let registry = Registry::builtin();
        assert!(registry.has_tag("people"));
        assert!(!registry.has_tag("Person"));
        assert!(registry.is_registered("Person"));
    }

    #[test]
    fn validate_reports_missing_tags_and_targets() {
        let registry = Registry::builtin();
        registry.validate(["organizations", "people", "Person"]).unwrap();
        let err = registry.validate(["organizations", "spaceships"]).unwrap_err();
        assert!(matches!(err, ClientError::UnsupportedEntity(t) if t == "spaceships"));

        let mut partial = Registry::empty();
        partial.register_model("current_team", Entity::CurrentTeam);
        let err = partial.validate(["current_team"]).unwrap_err();
        assert!(matches!(err, ClientError::UnsupportedEntity(t) if t == "people" || t == "organizations"));
    }
}
