use async_trait::async_trait;

use models::{
    DeleteOutcome, DocumentId, InsertOutcome, NewReview, NewService, Review, ReviewPatch,
    ServiceItem, UpdateOutcome,
};

use crate::errors::ServiceError;

/// Gateway over the two document collections. Every HTTP handler composes
/// exactly one of these operations; no joins, transactions, or derived state.
///
/// Contract notes:
/// - service listings return newest first; review listings sort by date
///   descending (documents without a date sort last)
/// - `insert_review` fills a missing `date` with the insertion time
/// - `update_review` upserts: a missing id creates a new document
/// - `delete_review` on a missing id succeeds with a zero count
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_services(&self, limit: Option<i64>) -> Result<Vec<ServiceItem>, ServiceError>;
    async fn find_service(&self, id: &DocumentId) -> Result<Option<ServiceItem>, ServiceError>;
    async fn insert_service(&self, input: NewService) -> Result<InsertOutcome, ServiceError>;

    async fn insert_review(&self, input: NewReview) -> Result<InsertOutcome, ServiceError>;
    async fn list_reviews(&self) -> Result<Vec<Review>, ServiceError>;
    async fn reviews_for_service(&self, service_id: &str) -> Result<Vec<Review>, ServiceError>;
    async fn reviews_for_user(&self, user_id: &str) -> Result<Vec<Review>, ServiceError>;
    async fn find_review(&self, id: &DocumentId) -> Result<Option<Review>, ServiceError>;
    async fn update_review(
        &self,
        id: &DocumentId,
        patch: ReviewPatch,
    ) -> Result<UpdateOutcome, ServiceError>;
    async fn delete_review(&self, id: &DocumentId) -> Result<DeleteOutcome, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryCatalogRepository {
        services: Mutex<Vec<ServiceItem>>, // insertion order; listed reversed
        reviews: Mutex<Vec<Review>>,
    }

    fn newest_first(mut reviews: Vec<Review>) -> Vec<Review> {
        reviews.sort_by(|a, b| b.date.cmp(&a.date));
        reviews
    }

    #[async_trait]
    impl CatalogRepository for MemoryCatalogRepository {
        async fn list_services(
            &self,
            limit: Option<i64>,
        ) -> Result<Vec<ServiceItem>, ServiceError> {
            let services = self.services.lock().unwrap();
            let take = limit.map(|n| n as usize).unwrap_or(usize::MAX);
            Ok(services.iter().rev().take(take).cloned().collect())
        }

        async fn find_service(
            &self,
            id: &DocumentId,
        ) -> Result<Option<ServiceItem>, ServiceError> {
            let hex = id.to_hex();
            let services = self.services.lock().unwrap();
            Ok(services.iter().find(|s| s.id == hex).cloned())
        }

        async fn insert_service(&self, input: NewService) -> Result<InsertOutcome, ServiceError> {
            let id = DocumentId::new().to_hex();
            let mut services = self.services.lock().unwrap();
            services.push(ServiceItem {
                id: id.clone(),
                name: input.name,
                image: input.image,
                price: input.price,
                description: input.description,
            });
            Ok(InsertOutcome { acknowledged: true, inserted_id: id })
        }

        async fn insert_review(&self, input: NewReview) -> Result<InsertOutcome, ServiceError> {
            let id = DocumentId::new().to_hex();
            let mut reviews = self.reviews.lock().unwrap();
            reviews.push(Review {
                id: id.clone(),
                service_id: input.service_id,
                user_id: input.user_id,
                review: input.review,
                rating: input.rating,
                date: Some(input.date.unwrap_or_else(Utc::now)),
            });
            Ok(InsertOutcome { acknowledged: true, inserted_id: id })
        }

        async fn list_reviews(&self) -> Result<Vec<Review>, ServiceError> {
            Ok(self.reviews.lock().unwrap().clone())
        }

        async fn reviews_for_service(
            &self,
            service_id: &str,
        ) -> Result<Vec<Review>, ServiceError> {
            let reviews = self.reviews.lock().unwrap();
            Ok(newest_first(
                reviews.iter().filter(|r| r.service_id == service_id).cloned().collect(),
            ))
        }

        async fn reviews_for_user(&self, user_id: &str) -> Result<Vec<Review>, ServiceError> {
            let reviews = self.reviews.lock().unwrap();
            Ok(newest_first(
                reviews.iter().filter(|r| r.user_id == user_id).cloned().collect(),
            ))
        }

        async fn find_review(&self, id: &DocumentId) -> Result<Option<Review>, ServiceError> {
            let hex = id.to_hex();
            let reviews = self.reviews.lock().unwrap();
            Ok(reviews.iter().find(|r| r.id == hex).cloned())
        }

        async fn update_review(
            &self,
            id: &DocumentId,
            patch: ReviewPatch,
        ) -> Result<UpdateOutcome, ServiceError> {
            let hex = id.to_hex();
            let mut reviews = self.reviews.lock().unwrap();
            if let Some(existing) = reviews.iter_mut().find(|r| r.id == hex) {
                let modified = existing.review != patch.review || existing.rating != patch.rating;
                existing.review = patch.review;
                existing.rating = patch.rating;
                return Ok(UpdateOutcome {
                    acknowledged: true,
                    matched_count: 1,
                    modified_count: u64::from(modified),
                    upserted_id: None,
                });
            }
            // Upsert path: only the patched fields exist on the new document.
            reviews.push(Review {
                id: hex.clone(),
                service_id: String::new(),
                user_id: String::new(),
                review: patch.review,
                rating: patch.rating,
                date: None,
            });
            Ok(UpdateOutcome {
                acknowledged: true,
                matched_count: 0,
                modified_count: 0,
                upserted_id: Some(hex),
            })
        }

        async fn delete_review(&self, id: &DocumentId) -> Result<DeleteOutcome, ServiceError> {
            let hex = id.to_hex();
            let mut reviews = self.reviews.lock().unwrap();
            let before = reviews.len();
            reviews.retain(|r| r.id != hex);
            Ok(DeleteOutcome {
                acknowledged: true,
                deleted_count: (before - reviews.len()) as u64,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MemoryCatalogRepository;
    use super::*;
    use chrono::{TimeZone, Utc};

    fn review(service_id: &str, user_id: &str, day: u32) -> NewReview {
        NewReview {
            service_id: service_id.into(),
            user_id: user_id.into(),
            review: format!("day {day}"),
            rating: 5,
            date: Some(Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()),
        }
    }

    #[tokio::test]
    async fn reviews_for_service_are_filtered_and_sorted() {
        let repo = MemoryCatalogRepository::default();
        repo.insert_review(review("S1", "U1", 1)).await.unwrap();
        repo.insert_review(review("S2", "U1", 2)).await.unwrap();
        repo.insert_review(review("S1", "U2", 3)).await.unwrap();

        let got = repo.reviews_for_service("S1").await.unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].review, "day 3");
        assert_eq!(got[1].review, "day 1");
        assert!(got.iter().all(|r| r.service_id == "S1"));
    }

    #[tokio::test]
    async fn update_missing_review_upserts() {
        let repo = MemoryCatalogRepository::default();
        let id = DocumentId::new();
        let outcome = repo
            .update_review(&id, ReviewPatch { review: "Great".into(), rating: 4 })
            .await
            .unwrap();
        assert_eq!(outcome.matched_count, 0);
        assert_eq!(outcome.upserted_id, Some(id.to_hex()));

        let stored = repo.find_review(&id).await.unwrap().unwrap();
        assert_eq!(stored.review, "Great");
        assert_eq!(stored.rating, 4);
    }

    #[tokio::test]
    async fn delete_missing_review_is_vacuous() {
        let repo = MemoryCatalogRepository::default();
        let outcome = repo.delete_review(&DocumentId::new()).await.unwrap();
        assert_eq!(outcome.deleted_count, 0);
    }

    #[tokio::test]
    async fn home_listing_limits_to_newest() {
        let repo = MemoryCatalogRepository::default();
        for n in 1..=4 {
            repo.insert_service(NewService {
                name: format!("dish-{n}"),
                image: String::new(),
                price: String::new(),
                description: String::new(),
            })
            .await
            .unwrap();
        }
        let got = repo.list_services(Some(3)).await.unwrap();
        assert_eq!(got.len(), 3);
        assert_eq!(got[0].name, "dish-4");
    }
}
