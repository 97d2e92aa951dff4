//! Cause Application Service (Use Case)
//!
//! Fundraising campaigns and the donation orders booked against them.

use std::sync::Arc;

use aps_crm::domain::services::listing::{matches, paginate};
use aps_crm::domain::{order_matches_cause, AmountOperation, DONATED_AMOUNT_KEY};
use aps_crm::{
    post_types, Cause, DomainError, OfflinePayment, OfflinePaymentRepository, OrderStatus, Page,
    PageRequest, PostRepository, SortOrder,
};

use crate::services::html::html_to_text;

pub const CAUSE_SORT_KEYS: &[(&str, &str)] = &[
    ("id", "id"),
    ("date", "date"),
    ("title", "title"),
    ("goal", "goal"),
    ("donors", "donors"),
    ("donated", "donated"),
];

pub const PAYMENT_SORT_KEYS: &[(&str, &str)] = &[
    ("id", "id"),
    ("date", "bookingDate"),
    ("bookingDate", "bookingDate"),
    ("title", "causeTitle"),
    ("causeTitle", "causeTitle"),
    ("status", "status"),
    ("amount", "amount"),
    ("paymentDate", "paymentDate"),
    ("paymentMethod", "paymentMethod"),
];

/// Application service for causes and offline payments
pub struct CauseService<P: PostRepository, O: OfflinePaymentRepository> {
    posts: Arc<P>,
    orders: Arc<O>,
}

impl<P: PostRepository, O: OfflinePaymentRepository> CauseService<P, O> {
    pub fn new(posts: Arc<P>, orders: Arc<O>) -> Self {
        Self { posts, orders }
    }

    /// Published causes with excerpts reduced to plain text
    pub async fn load_all(&self) -> Result<Vec<Cause>, DomainError> {
        let records = self
            .posts
            .find_by_type(post_types::CAUSE, &["publish"])
            .await?;
        Ok(records
            .iter()
            .map(|r| {
                let mut cause = Cause::from_record(r);
                cause.excerpt = html_to_text(&cause.excerpt);
                cause
            })
            .collect())
    }

    pub async fn list(&self, q: Option<&str>, page: &PageRequest) -> Result<Page<Cause>, DomainError> {
        Ok(paginate(
            self.load_all().await?,
            q,
            page,
            CAUSE_SORT_KEYS,
            SortOrder::desc("date"),
        ))
    }

    /// Add to or subtract from the donated total; never below zero
    pub async fn adjust_amount(
        &self,
        id: u64,
        value: f64,
        operation: AmountOperation,
    ) -> Result<(), DomainError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(DomainError::validation("Valoarea trebuie să fie pozitivă."));
        }
        if !self
            .posts
            .adjust_meta_amount(id, DONATED_AMOUNT_KEY, operation.signed(value))
            .await?
        {
            return Err(DomainError::not_found("Cause", id));
        }

        tracing::info!("Cause {} donated amount adjusted by {:?} {}", id, operation, value);
        Ok(())
    }

    pub async fn list_payments(
        &self,
        q: Option<&str>,
        page: &PageRequest,
    ) -> Result<Page<OfflinePayment>, DomainError> {
        let orders = self.orders.find_all().await?;
        let filtered = match q.map(str::trim).filter(|q| !q.is_empty()) {
            Some(needle) => orders
                .into_iter()
                .filter(|o| matches(o, needle) || order_matches_cause(o, needle))
                .collect(),
            None => orders,
        };
        Ok(paginate(
            filtered,
            None,
            page,
            PAYMENT_SORT_KEYS,
            SortOrder::desc("id"),
        ))
    }

    /// Set a manual status; orders paid online are immutable
    pub async fn update_payment_status(
        &self,
        id: u64,
        raw_status: &str,
    ) -> Result<OfflinePayment, DomainError> {
        let status = OrderStatus::parse_settable(raw_status).map_err(DomainError::validation)?;
        let mut order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Order", id))?;
        if order.status == OrderStatus::OnlinePaid {
            return Err(DomainError::Conflict(
                "Comenzile plătite online nu pot fi modificate.".into(),
            ));
        }

        if !self.orders.update_status(id, &status).await? {
            return Err(DomainError::not_found("Order", id));
        }
        tracing::info!("Order {} status {} -> {}", id, order.status, status);
        order.status = status;
        Ok(order)
    }

    pub async fn delete_payment(&self, id: u64) -> Result<(), DomainError> {
        if !self.orders.delete(id).await? {
            return Err(DomainError::not_found("Order", id));
        }
        tracing::info!("Deleted order {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{
        date, post, InMemoryOfflinePaymentRepository, InMemoryPostRepository,
    };

    fn order(id: u64, cause_id: u64, status: OrderStatus) -> OfflinePayment {
        OfflinePayment {
            id,
            user_id: None,
            cause_id: Some(cause_id),
            cause_title: Some(format!("Campania {}", cause_id)),
            booking_date: Some(date(2025, 2, id as u32)),
            status,
            amount: Some(id as f64 * 10.0),
            payment_date: None,
            payment_method: Some("offline".into()),
        }
    }

    fn service() -> (
        CauseService<InMemoryPostRepository, InMemoryOfflinePaymentRepository>,
        Arc<InMemoryPostRepository>,
    ) {
        let mut with_excerpt = post(1, post_types::CAUSE, "publish", &[(DONATED_AMOUNT_KEY, "100")]);
        with_excerpt.post.excerpt = "<p>Ajută <b>copiii</b></p>".into();
        let mut newer = post(2, post_types::CAUSE, "publish", &[(DONATED_AMOUNT_KEY, "5")]);
        newer.post.date = date(2025, 6, 1);
        let posts = Arc::new(InMemoryPostRepository::with(vec![
            with_excerpt,
            newer,
            post(3, post_types::CAUSE, "draft", &[]),
        ]));
        let orders = Arc::new(InMemoryOfflinePaymentRepository::with(vec![
            order(7, 1, OrderStatus::Pending),
            order(8, 2, OrderStatus::OnlinePaid),
            order(12, 1, OrderStatus::Approved),
        ]));
        (CauseService::new(posts.clone(), orders), posts)
    }

    #[tokio::test]
    async fn test_causes_newest_first_with_text_excerpt() {
        let (service, _) = service();
        let page = service
            .list(None, &PageRequest::new(0, 10, Vec::new()))
            .await
            .unwrap();
        let ids: Vec<u64> = page.content.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(page.content[1].excerpt, "Ajută copiii");
    }

    #[tokio::test]
    async fn test_adjust_amount() {
        let (service, posts) = service();
        service
            .adjust_amount(1, 25.5, AmountOperation::Add)
            .await
            .unwrap();
        assert_eq!(posts.record(1).unwrap().meta_number(DONATED_AMOUNT_KEY), Some(125.5));

        service
            .adjust_amount(2, 50.0, AmountOperation::Subtract)
            .await
            .unwrap();
        assert_eq!(posts.record(2).unwrap().meta_number(DONATED_AMOUNT_KEY), Some(0.0));

        assert!(matches!(
            service.adjust_amount(1, 0.0, AmountOperation::Add).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.adjust_amount(3, 1.0, AmountOperation::Add).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_payments_search_by_cause_id_and_label() {
        let (service, _) = service();
        let request = PageRequest::new(0, 10, Vec::new());

        let by_cause = service.list_payments(Some("1"), &request).await.unwrap();
        let ids: Vec<u64> = by_cause.content.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![12, 7]);

        let by_label = service.list_payments(Some("aprobat"), &request).await.unwrap();
        assert_eq!(by_label.content.len(), 1);
        assert_eq!(by_label.content[0].id, 12);
    }

    #[tokio::test]
    async fn test_payment_status_rules() {
        let (service, _) = service();
        let updated = service.update_payment_status(7, "approved").await.unwrap();
        assert_eq!(updated.status, OrderStatus::Approved);

        assert!(matches!(
            service.update_payment_status(7, "online-paid").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.update_payment_status(8, "rejected").await,
            Err(DomainError::Conflict(_))
        ));
        assert!(matches!(
            service.update_payment_status(99, "pending").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_payment() {
        let (service, _) = service();
        service.delete_payment(7).await.unwrap();
        assert!(matches!(
            service.delete_payment(7).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
