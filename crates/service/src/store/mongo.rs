use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::options::{FindOptions, UpdateOptions};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::{
    DeleteOutcome, DocumentId, InsertOutcome, NewReview, NewService, Review, ReviewPatch,
    ServiceItem, UpdateOutcome,
};

use crate::errors::ServiceError;
use crate::store::repository::CatalogRepository;

/// Connect and ping. The handle is shared process-wide; the driver owns
/// pooling and concurrency. A failure here is fatal to startup.
pub async fn connect(uri: &str, db_name: &str) -> anyhow::Result<Database> {
    let client = Client::with_uri_str(uri).await?;
    let db = client.database(db_name);
    db.run_command(doc! {"ping": 1}, None).await?;
    info!(db = %db_name, "connected to document store");
    Ok(db)
}

/// Persisted shape of a catalog entry. Descriptive fields default when
/// absent; nothing is enforced beyond the id.
#[derive(Debug, Serialize, Deserialize)]
struct ServiceDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    price: String,
    #[serde(default)]
    description: String,
}

impl From<ServiceDocument> for ServiceItem {
    fn from(d: ServiceDocument) -> Self {
        Self {
            id: d.id.to_hex(),
            name: d.name,
            image: d.image,
            price: d.price,
            description: d.description,
        }
    }
}

/// Persisted shape of a review. `date` is stored as an RFC 3339 string, so
/// the store's lexicographic sort is chronological.
#[derive(Debug, Serialize, Deserialize)]
struct ReviewDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(rename = "serviceId", default)]
    service_id: String,
    #[serde(rename = "userId", default)]
    user_id: String,
    #[serde(default)]
    review: String,
    #[serde(default)]
    rating: i32,
    #[serde(default)]
    date: Option<DateTime<Utc>>,
}

impl From<ReviewDocument> for Review {
    fn from(d: ReviewDocument) -> Self {
        Self {
            id: d.id.to_hex(),
            service_id: d.service_id,
            user_id: d.user_id,
            review: d.review,
            rating: d.rating,
            date: d.date,
        }
    }
}

/// MongoDB-backed repository over the `services` and `reviews` collections.
pub struct MongoCatalogRepository {
    services: Collection<ServiceDocument>,
    reviews: Collection<ReviewDocument>,
}

impl MongoCatalogRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            services: db.collection("services"),
            reviews: db.collection("reviews"),
        }
    }
}

fn hex_of(inserted_id: &bson::Bson) -> String {
    inserted_id
        .as_object_id()
        .map(|oid| oid.to_hex())
        .unwrap_or_else(|| inserted_id.to_string())
}

#[async_trait]
impl CatalogRepository for MongoCatalogRepository {
    async fn list_services(&self, limit: Option<i64>) -> Result<Vec<ServiceItem>, ServiceError> {
        let opts = FindOptions::builder().sort(doc! {"_id": -1}).limit(limit).build();
        let cursor = self.services.find(doc! {}, opts).await?;
        let docs: Vec<ServiceDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Into::into).collect())
    }

    async fn find_service(&self, id: &DocumentId) -> Result<Option<ServiceItem>, ServiceError> {
        let found = self
            .services
            .find_one(doc! {"_id": id.as_object_id()}, None)
            .await?;
        Ok(found.map(Into::into))
    }

    async fn insert_service(&self, input: NewService) -> Result<InsertOutcome, ServiceError> {
        let document = ServiceDocument {
            id: ObjectId::new(),
            name: input.name,
            image: input.image,
            price: input.price,
            description: input.description,
        };
        let res = self.services.insert_one(document, None).await?;
        Ok(InsertOutcome { acknowledged: true, inserted_id: hex_of(&res.inserted_id) })
    }

    async fn insert_review(&self, input: NewReview) -> Result<InsertOutcome, ServiceError> {
        let document = ReviewDocument {
            id: ObjectId::new(),
            service_id: input.service_id,
            user_id: input.user_id,
            review: input.review,
            rating: input.rating,
            date: Some(input.date.unwrap_or_else(Utc::now)),
        };
        let res = self.reviews.insert_one(document, None).await?;
        Ok(InsertOutcome { acknowledged: true, inserted_id: hex_of(&res.inserted_id) })
    }

    async fn list_reviews(&self) -> Result<Vec<Review>, ServiceError> {
        let cursor = self.reviews.find(doc! {}, None).await?;
        let docs: Vec<ReviewDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Into::into).collect())
    }

    async fn reviews_for_service(&self, service_id: &str) -> Result<Vec<Review>, ServiceError> {
        let opts = FindOptions::builder().sort(doc! {"date": -1}).build();
        let cursor = self.reviews.find(doc! {"serviceId": service_id}, opts).await?;
        let docs: Vec<ReviewDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Into::into).collect())
    }

    async fn reviews_for_user(&self, user_id: &str) -> Result<Vec<Review>, ServiceError> {
        let opts = FindOptions::builder().sort(doc! {"date": -1}).build();
        let cursor = self.reviews.find(doc! {"userId": user_id}, opts).await?;
        let docs: Vec<ReviewDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Into::into).collect())
    }

    async fn find_review(&self, id: &DocumentId) -> Result<Option<Review>, ServiceError> {
        let found = self
            .reviews
            .find_one(doc! {"_id": id.as_object_id()}, None)
            .await?;
        Ok(found.map(Into::into))
    }

    async fn update_review(
        &self,
        id: &DocumentId,
        patch: ReviewPatch,
    ) -> Result<UpdateOutcome, ServiceError> {
        let opts = UpdateOptions::builder().upsert(true).build();
        let res = self
            .reviews
            .update_one(
                doc! {"_id": id.as_object_id()},
                doc! {"$set": {"review": patch.review, "rating": patch.rating}},
                opts,
            )
            .await?;
        Ok(UpdateOutcome {
            acknowledged: true,
            matched_count: res.matched_count,
            modified_count: res.modified_count,
            upserted_id: res.upserted_id.as_ref().map(hex_of),
        })
    }

    async fn delete_review(&self, id: &DocumentId) -> Result<DeleteOutcome, ServiceError> {
        let res = self
            .reviews
            .delete_one(doc! {"_id": id.as_object_id()}, None)
            .await?;
        Ok(DeleteOutcome { acknowledged: true, deleted_count: res.deleted_count })
    }
}
