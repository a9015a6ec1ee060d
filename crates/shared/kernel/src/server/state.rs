use super::error::ApiError;
use crate::security::resource::{Entity, ResourceGuard};
use crate::security::token::{TokenError, TokenService};
use autoims_database::Database;
use autoims_domain::config::ApiConfig;
use autoims_domain::registry::{FeatureSlice, InitializedSlice};
use axum::extract::FromRef;
use fxhash::FxHashMap;
use moka::sync::Cache;
use std::any::TypeId;
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

#[autoims_derive::autoims_error]
pub enum ApiStateError {
    #[error("State validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("State missing feature slice{}: {message}", format_context(.context))]
    MissingSlice { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("State token setup failed{}: {source}", format_context(.context))]
    Token { source: TokenError, context: Option<Cow<'static, str>> },
}

/// Users recently confirmed to exist, keyed by id.
pub type SessionCache = Cache<i64, ()>;

#[derive(Debug)]
pub struct ApiStateInner {
    pub config: ApiConfig,
    pub database: Database,
    pub tokens: TokenService,
    pub sessions: SessionCache,
    slices: FxHashMap<TypeId, InitializedSlice>,
}

#[derive(Debug, Clone)]
pub struct ApiState {
    inner: Arc<ApiStateInner>,
}

impl ApiState {
    #[must_use]
    pub fn builder() -> ApiStateBuilder {
        ApiStateBuilder::default()
    }

    #[must_use]
    pub fn get_slice<T: FeatureSlice>(&self) -> Option<&T> {
        self.inner.slices.get(&TypeId::of::<T>()).and_then(InitializedSlice::downcast_ref::<T>)
    }

    /// Returns the slice if it is registered.
    ///
    /// # Errors
    /// [`ApiStateError::MissingSlice`] when it is not.
    pub fn try_get_slice<T: FeatureSlice>(&self) -> Result<&T, ApiStateError> {
        self.get_slice::<T>().ok_or_else(|| ApiStateError::MissingSlice {
            message: std::any::type_name::<T>().into(),
            context: None,
        })
    }

    /// 404 "<label> not found" unless the row exists.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing row, `Internal` when the lookup fails.
    pub async fn require(&self, entity: Entity, id: i64) -> Result<(), ApiError> {
        self.database.call(move |conn| ResourceGuard::require(conn, entity, id)).await?;
        Ok(())
    }

    /// Names of the registered slices, sorted.
    pub fn slice_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.inner.slices.values().map(|slice| slice.name).collect();
        names.sort_unstable();
        names
    }
}

impl Deref for ApiState {
    type Target = ApiStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FromRef<ApiState> for ApiConfig {
    fn from_ref(state: &ApiState) -> Self {
        state.inner.config.clone()
    }
}

impl FromRef<ApiState> for Database {
    fn from_ref(state: &ApiState) -> Self {
        state.inner.database.clone()
    }
}

impl FromRef<ApiState> for TokenService {
    fn from_ref(state: &ApiState) -> Self {
        state.inner.tokens.clone()
    }
}

#[derive(Debug, Default)]
pub struct ApiStateBuilder {
    config: Option<ApiConfig>,
    database: Option<Database>,
    tokens: Option<TokenService>,
    slices: FxHashMap<TypeId, InitializedSlice>,
}

impl ApiStateBuilder {
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn db(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    /// Overrides the token service; by default it is built from `security.identity.jwt`.
    pub fn tokens(mut self, tokens: TokenService) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn register_slice(mut self, slice: InitializedSlice) -> Self {
        self.slices.insert(slice.id, slice);
        self
    }

    pub fn register_slices<I>(mut self, slices: I) -> Self
    where
        I: IntoIterator<Item = InitializedSlice>,
    {
        self.slices.extend(slices.into_iter().map(|slice| (slice.id, slice)));
        self
    }

    /// # Errors
    ///
    /// `Validation` when the config or database is missing, `Token` when the
    /// JWT settings are unusable.
    pub fn build(self) -> Result<ApiState, ApiStateError> {
        let config = self.config.ok_or_else(|| ApiStateError::Validation {
            message: "ApiConfig not provided".into(),
            context: None,
        })?;
        let database = self.database.ok_or_else(|| ApiStateError::Validation {
            message: "Database not provided".into(),
            context: None,
        })?;
        let tokens = match self.tokens {
            Some(tokens) => tokens,
            None => TokenService::from_config(&config.security.identity.jwt)
                .context("Building token service")?,
        };

        let identity = &config.security.identity;
        let sessions = Cache::builder()
            .max_capacity(identity.session_cache_capacity)
            .time_to_live(Duration::from_secs(identity.session_cache_ttl_seconds))
            .build();

        Ok(ApiState {
            inner: Arc::new(ApiStateInner { config, database, tokens, sessions, slices: self.slices }),
        })
    }
}
