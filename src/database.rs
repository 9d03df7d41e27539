use crate::constants::*;
use futures::stream::StreamExt;
use mongodb::bson::Document;
use mongodb::error::{ErrorKind, Result as MongoResult};
use mongodb::options::{ClientOptions, FindOptions, InsertManyOptions, UpdateOptions};
use mongodb::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

// error code raised by the server when an insert collides on _id
const DUPLICATE_KEY_ERROR_CODE: i32 = 11000;

pub struct AppDatabase(Client);

#[cfg_attr(test, automock)]
impl AppDatabase {
    /// Connection parameters come from the environment, pool sizes fall
    /// back to the constants. Missing MONGODB_URI is fatal at startup.
    pub async fn new() -> MongoResult<Self> {
        let uri = std::env::var("MONGODB_URI").expect("MONGODB_URI not found in .env file");
        let min_pool = std::env::var("MONGODB_MIN_POOL_SIZE")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(MONGO_MIN_POOL_SIZE);
        let max_pool = std::env::var("MONGODB_MAX_POOL_SIZE")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(MONGO_MAX_POOL_SIZE);
        let mut client_options = ClientOptions::parse(uri).await?;
        client_options.max_pool_size = Some(max_pool);
        client_options.min_pool_size = Some(min_pool);
        client_options.connect_timeout = Some(Duration::from_secs(MONGO_CONN_TIMEOUT));
        let client = Client::with_options(client_options)?;
        Ok(Self(client))
    }

    pub async fn find<T>(
        &self,
        db: &str,
        coll: &str,
        filter: Option<Document>,
        options: Option<FindOptions>,
    ) -> MongoResult<Vec<T>>
    where
        T: DeserializeOwned + Unpin + Send + Sync + 'static,
    {
        let coll = self.0.database(db).collection::<T>(coll);
        let mut cursor = coll.find(filter, options).await?;
        let mut data = vec![];
        while let Some(doc) = cursor.next().await {
            data.push(doc?);
        }
        Ok(data)
    }

    /// Unordered bulk insert which tolerates duplicate key conflicts.
    /// Returns the indexes of the documents which were actually inserted,
    /// conflicting documents are skipped. Any other write error is
    /// propagated as-is.
    pub async fn insert_many_skip_duplicates<T>(
        &self,
        db: &str,
        coll: &str,
        docs: Vec<T>,
    ) -> MongoResult<Vec<usize>>
    where
        T: Serialize + Send + Sync + 'static,
    {
        let total = docs.len();
        let coll = self.0.database(db).collection::<T>(coll);
        let options = InsertManyOptions::builder().ordered(Some(false)).build();
        match coll.insert_many(docs, Some(options)).await {
            Ok(_) => Ok((0..total).collect()),
            Err(err) => {
                let duplicates = match err.kind.as_ref() {
                    ErrorKind::BulkWrite(failure) if failure.write_concern_error.is_none() => {
                        let write_errors = failure.write_errors.as_deref().unwrap_or(&[]);
                        if write_errors
                            .iter()
                            .all(|e| e.code == DUPLICATE_KEY_ERROR_CODE)
                        {
                            Some(write_errors.iter().map(|e| e.index).collect::<Vec<_>>())
                        } else {
                            None
                        }
                    }
                    _ => None,
                };
                match duplicates {
                    Some(duplicates) => {
                        Ok((0..total).filter(|i| !duplicates.contains(i)).collect())
                    }
                    None => Err(err),
                }
            }
        }
    }

    /// Returns the number of documents matched by the filter
    pub async fn update_one(
        &self,
        db: &str,
        coll: &str,
        filter: Document,
        update: Document,
        options: Option<UpdateOptions>,
    ) -> MongoResult<u64> {
        let coll = self.0.database(db).collection::<Document>(coll);
        let result = coll.update_one(filter, update, options).await?;
        Ok(result.matched_count)
    }
}
