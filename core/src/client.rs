//! Blocking client for the Crunchbase REST API.
//!
//! # Design
//! `Client` ties the pipeline together: it builds the URI (query builder),
//! appends the credential, fetches through the redirect-following
//! [`Transport`], unwraps the envelope, and hands the payload to the
//! [`Registry`] for typed resolution. Configuration is moved in at
//! construction and only read afterwards; the client holds no per-request
//! state, so two lookups of the same permalink yield independent entities.

use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::entity::{Entity, Reference};
use crate::envelope;
use crate::error::{ClientError, Result};
use crate::http::{HttpRequest, HttpSend, UreqSender};
use crate::query::Query;
use crate::registry::Registry;
use crate::result_set::ResultSet;
use crate::transport::Transport;

const MODEL_NAME: &str = "model_name";

/// One entry of a batch search: an entity by type and uuid, plus the
/// relationships to embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRequest {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub uuid: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<String>,
}

impl BatchRequest {
    pub fn new(entity_type: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            uuid: uuid.into(),
            relationships: Vec::new(),
        }
    }

    pub fn with_relationship(mut self, name: impl Into<String>) -> Self {
        self.relationships.push(name.into());
        self
    }
}

#[derive(Serialize)]
struct BatchBody<'a> {
    requests: &'a [BatchRequest],
}

#[derive(Debug, Clone)]
pub struct Client<S = UreqSender> {
    config: ClientConfig,
    transport: Transport<S>,
    registry: Registry,
}

impl Client<UreqSender> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_sender(config, UreqSender::new())
    }

    /// Build from `CRUNCHBASE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ClientConfig::from_env()?))
    }
}

impl<S: HttpSend> Client<S> {
    pub fn with_sender(config: ClientConfig, sender: S) -> Self {
        let transport = Transport::new(sender, config.timeout(), config.debug);
        Self {
            config,
            transport,
            registry: Registry::builtin(),
        }
    }

    /// Replace the entity registry, e.g. with one extended by host kinds.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn transport(&self) -> &Transport<S> {
        &self.transport
    }

    pub fn api_url(&self) -> String {
        self.config.api_url()
    }

    /// Look up one entity by permalink and resolve it as `entity_name`.
    /// `entity_name` is a resource tag such as `organizations`; anything
    /// else, item type names included, fails before any request is sent.
    pub fn single_entity(&self, permalink: &str, entity_name: &str) -> Result<Entity> {
        if !self.registry.has_tag(entity_name) {
            return Err(ClientError::UnsupportedEntity(entity_name.to_string()));
        }
        let data = self.fetch(permalink, entity_name)?;
        self.registry.resolve(entity_name, &data)
    }

    /// The raw `data` payload of `{resource}/{permalink}`.
    pub fn fetch(&self, permalink: &str, resource: &str) -> Result<Value> {
        let uri = format!("{}{resource}/{}", self.api_url(), urlencoding::encode(permalink));
        self.get_json(&uri)
    }

    /// Search `resource_list`, defaulting `page` and `order`. Items resolve
    /// as `resource_list`.
    pub fn search(&self, options: &Query, resource_list: &str) -> Result<ResultSet> {
        let query = options.normalized(true);
        let uri = format!("{}{resource_list}?{}", self.api_url(), query.to_query_string());
        let data = self.get_json(&uri)?;
        ResultSet::new(query, &data, Some(resource_list), &self.registry)
    }

    /// List `resource_list`, defaulting `page` only. A `model_name` option,
    /// if present, overrides the item kind and is not sent to the server.
    pub fn list(&self, options: &Query, resource_list: &str) -> Result<ResultSet> {
        let mut options = options.clone();
        let model_name = options
            .remove(MODEL_NAME)
            .unwrap_or_else(|| resource_list.to_string());
        let query = options.normalized(false);
        let uri = format!("{}{resource_list}?{}", self.api_url(), query.to_query_string());
        let data = self.get_json(&uri)?;
        ResultSet::new(query, &data, Some(&model_name), &self.registry)
    }

    /// `{resource}/{permalink}/{category}` with `page` and `order` defaults.
    /// Items resolve as the `model_name` option when given, else as
    /// `category`.
    pub fn lists_for_category(
        &self,
        resource: &str,
        permalink: &str,
        category: &str,
        options: &Query,
    ) -> Result<ResultSet> {
        let mut options = options.clone();
        let model_name = options
            .remove(MODEL_NAME)
            .unwrap_or_else(|| category.to_string());
        let query = options.normalized(true);
        let uri = format!(
            "{}{resource}/{}/{category}?{}",
            self.api_url(),
            urlencoding::encode(permalink),
            query.to_query_string()
        );
        let data = self.get_json(&uri)?;
        ResultSet::new(query, &data, Some(&model_name), &self.registry)
    }

    pub fn organization_lists(&self, permalink: &str, category: &str, options: &Query) -> Result<ResultSet> {
        self.lists_for_category("organizations", permalink, category, options)
    }

    pub fn person_lists(&self, permalink: &str, category: &str, options: &Query) -> Result<ResultSet> {
        self.lists_for_category("people", permalink, category, options)
    }

    pub fn funding_round_lists(&self, permalink: &str, category: &str, options: &Query) -> Result<ResultSet> {
        self.lists_for_category("funding-rounds", permalink, category, options)
    }

    /// One request returning entities of mixed kinds; each resolves by its
    /// own `type`.
    pub fn batch_search(&self, requests: &[BatchRequest]) -> Result<ResultSet> {
        if requests.is_empty() {
            return Err(ClientError::MissingParams(
                "batch search needs at least one request".to_string(),
            ));
        }
        let body = serde_json::to_string(&BatchBody { requests })
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
        let uri = self.authorize(&format!("{}batch_search", self.api_url()))?;
        let raw = self.transport.execute(
            HttpRequest::post_json(uri, body),
            self.config.redirect_limit,
        )?;
        let data = envelope::decode(&raw)?;
        ResultSet::new(Query::new(), &data, None, &self.registry)
    }

    /// Resolve a reference-only relationship with a separate lookup.
    pub fn follow(&self, reference: &Reference) -> Result<Entity> {
        self.single_entity(&reference.permalink, &reference.kind)
    }

    /// Fetch `uri` with the credential appended and return the envelope's
    /// `data` slot.
    pub fn get_json(&self, uri: &str) -> Result<Value> {
        let uri = self.authorize(uri)?;
        let raw = self.transport.fetch(&uri, self.config.redirect_limit)?;
        envelope::decode(&raw)
    }

    fn authorize(&self, uri: &str) -> Result<String> {
        let key = self
            .config
            .user_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ClientError::MissingCredential)?;
        let separator = if uri.contains('?') { '&' } else { '?' };
        Ok(format!("{uri}{separator}user_key={}", urlencoding::encode(key)))
    }
}
