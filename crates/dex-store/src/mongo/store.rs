use std::time::Duration;

use dex_core::{Bson, Deadline, Document, DocumentStore, Pokemon, StoreError};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::options::{ClientOptions, Credential, ServerAddress};
use mongodb::sync::{Client, Collection, Cursor, Database};
use tracing::info;

use crate::provision::Provision;

/// Server error code for an operation that ran past its `maxTimeMS`.
const MAX_TIME_MS_EXPIRED: i32 = 50;

/// Where the server lives and how to authenticate against it.
#[derive(Debug, Clone)]
pub struct MongoTarget {
    pub host: String,
    pub port: u16,
    /// Empty means no authentication.
    pub user: String,
    pub pass: String,
    pub database: String,
    /// Upper bound for server selection and for opening a connection.
    /// `None` keeps the driver defaults.
    pub timeout: Option<Duration>,
}

impl MongoTarget {
    fn client_options(&self) -> ClientOptions {
        let mut options = ClientOptions::default();
        options.hosts = vec![ServerAddress::Tcp {
            host: self.host.clone(),
            port: Some(self.port),
        }];
        if !self.user.is_empty() {
            // passed as-is, never through a connection string
            let mut credential = Credential::default();
            credential.username = Some(self.user.clone());
            credential.password = Some(self.pass.clone());
            options.credential = Some(credential);
        }
        let timeout = self.timeout.filter(|t| !t.is_zero());
        options.server_selection_timeout = timeout;
        options.connect_timeout = timeout;
        options
    }
}

/// MongoDB backend over the driver's blocking API.
///
/// The driver keeps its own connection pool, so one handle is shared by all
/// requests.
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Connect to `target` and select its database. The server is contacted
    /// once so bad credentials fail here rather than on the first request.
    pub fn connect(target: &MongoTarget) -> Result<Self, StoreError> {
        let store = Self::open(target)?;
        store.ensure_database()?;
        Ok(store)
    }

    /// Build the client without talking to the server.
    fn open(target: &MongoTarget) -> Result<Self, StoreError> {
        let client = Client::with_options(target.client_options()).map_err(store_error)?;
        Ok(Self {
            database: client.database(&target.database),
            client,
        })
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    /// Log whether the configured database already exists. MongoDB creates it
    /// with its first collection.
    fn ensure_database(&self) -> Result<(), StoreError> {
        let names = self
            .client
            .list_database_names()
            .run()
            .map_err(store_error)?;
        let database = self.database.name();
        if names.iter().any(|name| name == database) {
            info!(database, "database exists");
        } else {
            info!(database, "database not found, it will be created with its first collection");
        }
        Ok(())
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

fn store_error(err: MongoError) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::Command(command) if command.code == MAX_TIME_MS_EXPIRED => StoreError::Timeout,
        ErrorKind::InvalidArgument { .. } => StoreError::InvalidQuery(err.to_string()),
        _ => StoreError::Backend(err.to_string()),
    }
}

/// A call that fails after its deadline has passed timed out, whatever the
/// driver reported (server selection, a dropped connection, ...).
fn within(deadline: Deadline, err: StoreError) -> StoreError {
    if deadline.is_expired() {
        StoreError::Timeout
    } else {
        err
    }
}

fn decode(doc: Document) -> Result<Pokemon, StoreError> {
    bson::from_document(doc).map_err(|e| StoreError::Decode(e.to_string()))
}

fn drain(cursor: Cursor<Document>, deadline: Deadline) -> Result<Vec<Document>, StoreError> {
    let docs = cursor
        .map(|doc| doc.map_err(|e| within(deadline, store_error(e))))
        .collect::<Result<Vec<_>, _>>()?;
    deadline.remaining()?;
    Ok(docs)
}

impl DocumentStore for MongoStore {
    fn find(
        &self,
        collection: &str,
        filter: Document,
        deadline: Deadline,
    ) -> Result<Vec<Pokemon>, StoreError> {
        let coll = self.collection(collection);
        let mut find = coll.find(filter);
        if let Some(limit) = deadline.remaining()? {
            find = find.max_time(limit);
        }
        let cursor = find.run().map_err(|e| within(deadline, store_error(e)))?;
        drain(cursor, deadline)?.into_iter().map(decode).collect()
    }

    fn find_one(
        &self,
        collection: &str,
        filter: Document,
        deadline: Deadline,
    ) -> Result<Option<Pokemon>, StoreError> {
        let coll = self.collection(collection);
        let mut find_one = coll.find_one(filter);
        if let Some(limit) = deadline.remaining()? {
            find_one = find_one.max_time(limit);
        }
        find_one
            .run()
            .map_err(|e| within(deadline, store_error(e)))?
            .map(decode)
            .transpose()
    }

    fn count(
        &self,
        collection: &str,
        filter: Document,
        deadline: Deadline,
    ) -> Result<u64, StoreError> {
        let coll = self.collection(collection);
        let mut count = coll.count_documents(filter);
        if let Some(limit) = deadline.remaining()? {
            count = count.max_time(limit);
        }
        count.run().map_err(|e| within(deadline, store_error(e)))
    }

    fn distinct(
        &self,
        collection: &str,
        field: &str,
        filter: Document,
        deadline: Deadline,
    ) -> Result<Vec<Bson>, StoreError> {
        let coll = self.collection(collection);
        let mut distinct = coll.distinct(field, filter);
        if let Some(limit) = deadline.remaining()? {
            distinct = distinct.max_time(limit);
        }
        distinct.run().map_err(|e| within(deadline, store_error(e)))
    }

    fn aggregate(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
        deadline: Deadline,
    ) -> Result<Vec<Document>, StoreError> {
        let coll = self.collection(collection);
        let mut aggregate = coll.aggregate(pipeline);
        if let Some(limit) = deadline.remaining()? {
            aggregate = aggregate.max_time(limit);
        }
        let cursor = aggregate.run().map_err(|e| within(deadline, store_error(e)))?;
        drain(cursor, deadline)
    }
}

impl Provision for MongoStore {
    fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        self.database
            .list_collection_names()
            .run()
            .map_err(store_error)
    }

    fn ensure_collection(&self, name: &str) -> Result<bool, StoreError> {
        if self.collection_names()?.iter().any(|existing| existing == name) {
            return Ok(false);
        }
        self.database
            .create_collection(name)
            .run()
            .map_err(store_error)?;
        Ok(true)
    }

    fn insert_many(&self, collection: &str, docs: Vec<Document>) -> Result<usize, StoreError> {
        if docs.is_empty() {
            return Ok(0);
        }
        let coll = self.collection(collection);
        let result = coll.insert_many(docs).run().map_err(store_error)?;
        Ok(result.inserted_ids.len())
    }

    fn clear(&self, collection: &str) -> Result<(), StoreError> {
        let coll = self.collection(collection);
        coll.delete_many(Document::new()).run().map_err(store_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    fn target() -> MongoTarget {
        MongoTarget {
            host: "mongo".into(),
            port: 27018,
            user: String::new(),
            pass: String::new(),
            database: "PokeDex".into(),
            timeout: None,
        }
    }

    #[test]
    fn options_point_at_configured_host() {
        let options = target().client_options();
        assert_eq!(options.hosts.len(), 1);
        assert!(matches!(
            &options.hosts[0],
            ServerAddress::Tcp { host, port: Some(27018) } if host == "mongo"
        ));
        assert!(options.credential.is_none());
        assert_eq!(options.server_selection_timeout, None);
        assert_eq!(options.connect_timeout, None);
    }

    #[test]
    fn credentials_with_reserved_characters_are_kept_verbatim() {
        let options = MongoTarget {
            user: "dex@admin".into(),
            pass: "p@ss:w/rd%".into(),
            ..target()
        }
        .client_options();
        let credential = options.credential.unwrap();
        assert_eq!(credential.username.as_deref(), Some("dex@admin"));
        assert_eq!(credential.password.as_deref(), Some("p@ss:w/rd%"));
    }

    #[test]
    fn request_timeout_bounds_selection_and_connect() {
        let options = MongoTarget {
            timeout: Some(Duration::from_millis(2500)),
            ..target()
        }
        .client_options();
        assert_eq!(options.server_selection_timeout, Some(Duration::from_millis(2500)));
        assert_eq!(options.connect_timeout, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn failure_after_deadline_is_timeout() {
        let err = StoreError::Backend("server selection timeout".into());
        assert!(matches!(
            within(Deadline::after(Duration::ZERO), err),
            StoreError::Timeout
        ));

        let err = StoreError::Backend("connection refused".into());
        assert!(matches!(
            within(Deadline::after(Duration::from_secs(60)), err),
            StoreError::Backend(_)
        ));
        assert!(matches!(
            within(Deadline::NONE, StoreError::InvalidQuery("bad".into())),
            StoreError::InvalidQuery(_)
        ));
    }

    #[test]
    fn unreachable_server_fails_within_timeout() {
        // nothing listens on port 1
        let store = MongoStore::open(&MongoTarget {
            host: "127.0.0.1".into(),
            port: 1,
            timeout: Some(Duration::from_millis(300)),
            ..target()
        })
        .unwrap();

        let started = Instant::now();
        let err = store
            .count("kanto_pokemons", Document::new(), Deadline::after(Duration::from_millis(50)))
            .unwrap_err();
        assert!(matches!(err, StoreError::Timeout), "{err:?}");
        assert!(started.elapsed() < Duration::from_secs(10));

        let err = store
            .count("kanto_pokemons", Document::new(), Deadline::NONE)
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)), "{err:?}");
    }
}
