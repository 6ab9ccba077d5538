//! Entry point tying a connection to table resolution.

use std::fmt;
use std::sync::Arc;

use quarry_core::TableResolver;

use crate::accessor::Accessors;
use crate::builder::QueryBuilder;
use crate::config::Config;
use crate::connection::Connection;
use crate::model::Model;

/// A shared database handle plus the table resolver builders use.
///
/// Cloning is cheap; every clone shares the same connection.
#[derive(Clone)]
pub struct Database {
    connection: Arc<dyn Connection>,
    resolver: TableResolver,
}

impl Database {
    /// Wraps a connection with an explicit resolver.
    pub fn new(connection: impl Connection + 'static, resolver: TableResolver) -> Self {
        Self::from_arc(Arc::new(connection), resolver)
    }

    /// Wraps a shared connection.
    #[must_use]
    pub const fn from_arc(connection: Arc<dyn Connection>, resolver: TableResolver) -> Self {
        Self {
            connection,
            resolver,
        }
    }

    /// Wraps a connection, taking the table prefix from `config`.
    pub fn with_config(connection: impl Connection + 'static, config: &Config) -> Self {
        Self::new(connection, config.resolver())
    }

    /// Returns the underlying connection.
    #[must_use]
    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    /// Returns the table resolver.
    #[must_use]
    pub const fn resolver(&self) -> &TableResolver {
        &self.resolver
    }

    /// Starts a query on `identifier`, a table or type name.
    #[must_use]
    pub fn table(&self, identifier: &str) -> QueryBuilder {
        QueryBuilder::new(Arc::clone(&self.connection), &self.resolver, identifier)
    }

    /// Starts a query on `identifier` with a non-default primary key.
    #[must_use]
    pub fn table_with_key(&self, identifier: &str, primary_key: &str) -> QueryBuilder {
        QueryBuilder::build(
            Arc::clone(&self.connection),
            self.resolver.resolve(identifier),
            primary_key,
            Accessors::new(),
        )
    }

    /// Starts a query on the table bound to `M`, with its accessors.
    #[must_use]
    pub fn model<M: Model>(&self) -> QueryBuilder {
        QueryBuilder::for_model::<M>(Arc::clone(&self.connection), &self.resolver)
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}
