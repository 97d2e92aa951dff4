//! In-memory port implementations for application service tests

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use aps_crm::domain::parse_number;
use aps_crm::ports::BorderouRenderer;
use aps_crm::{
    Borderou, BorderouRepository, DomainError, FlagsUpdate, Mailer, NewPost, OfflinePayment,
    OfflinePaymentRepository, OrderStatus, OutgoingEmail, Page, PageRequest, PostFlags,
    PostRecord, PostRepository, RefreshToken, RefreshTokenRepository, Setting, SettingRepository,
    User, UserRepository, UserRole, WpPost,
};

use crate::services::{MailComposer, Templates};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|day| day.and_hms_opt(12, 0, 0))
        .unwrap()
}

/// Post record with the given meta
pub fn post(id: u64, post_type: &str, status: &str, meta: &[(&str, &str)]) -> PostRecord {
    PostRecord {
        post: WpPost {
            id,
            post_type: post_type.to_string(),
            status: status.to_string(),
            title: format!("Post {}", id),
            excerpt: String::new(),
            name: format!("post-{}", id),
            date: date(2025, 3, 1),
            guid: format!("https://aps.ro/?p={}", id),
        },
        meta: meta
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        flags: PostFlags::default(),
    }
}

// ============================================
// Users & tokens
// ============================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    pub users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn with(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }

    pub fn get(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self.get(email.trim()))
    }

    async fn find_by_reset_token_hash(&self, token_hash: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.reset_token_hash.as_deref() == Some(token_hash))
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let mut users = self.users.lock().unwrap().clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn search(
        &self,
        q: Option<&str>,
        roles: &[UserRole],
        page: &PageRequest,
    ) -> Result<Page<User>, DomainError> {
        let matching: Vec<User> = self
            .find_all()
            .await?
            .into_iter()
            .filter(|u| q.map_or(true, |q| u.matches(q.trim())))
            .filter(|u| roles.is_empty() || roles.contains(&u.role))
            .collect();
        let total = matching.len() as u64;
        let content = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .collect();
        Ok(Page::new(content, total, page))
    }

    async fn insert(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.id == user.id || u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(DomainError::Conflict("Duplicate entry for key 'email'".into()));
        }
        users.push(user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(DomainError::Conflict("Duplicate entry for key 'email'".into()));
        }
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| DomainError::not_found("User", user.id))?;
        *slot = user.clone();
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.users.lock().unwrap().len() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryRefreshTokenRepository {
    pub tokens: Mutex<Vec<RefreshToken>>,
    /// Serve tokens as not yet revoked, like a read racing a rotation
    pub stale_reads: AtomicBool,
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn create(&self, token: &RefreshToken) -> Result<RefreshToken, DomainError> {
        let mut tokens = self.tokens.lock().unwrap();
        let mut stored = token.clone();
        stored.id = tokens.len() as i64 + 1;
        tokens.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.token_hash == token_hash)
            .cloned()
            .map(|mut t| {
                if self.stale_reads.load(Ordering::SeqCst) {
                    t.revoked = false;
                }
                t
            }))
    }

    async fn revoke(&self, id: i64, replaced_by: Option<&str>) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.lock().unwrap();
        match tokens.iter_mut().find(|t| t.id == id && !t.revoked) {
            Some(token) => {
                token.revoked = true;
                token.replaced_by = replaced_by.map(str::to_string);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<u64, DomainError> {
        let mut tokens = self.tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|t| t.user_id != user_id);
        Ok((before - tokens.len()) as u64)
    }
}

// ============================================
// Settings
// ============================================

#[derive(Default)]
pub struct InMemorySettingRepository {
    pub settings: Mutex<Vec<Setting>>,
}

impl InMemorySettingRepository {
    pub fn with(settings: Vec<Setting>) -> Self {
        let settings = settings
            .into_iter()
            .enumerate()
            .map(|(i, mut s)| {
                s.id = i as i64 + 1;
                s
            })
            .collect();
        Self {
            settings: Mutex::new(settings),
        }
    }
}

#[async_trait]
impl SettingRepository for InMemorySettingRepository {
    async fn find_all(&self) -> Result<Vec<Setting>, DomainError> {
        let mut all = self.settings.lock().unwrap().clone();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn find_by_names(&self, names: &[&str]) -> Result<Vec<Setting>, DomainError> {
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .filter(|s| names.contains(&s.name.as_str()))
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Setting>, DomainError> {
        Ok(self.settings.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Setting>, DomainError> {
        Ok(self
            .settings
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.name == name)
            .cloned())
    }

    async fn save(&self, setting: &Setting) -> Result<Setting, DomainError> {
        let mut settings = self.settings.lock().unwrap();
        let mut stored = setting.clone();
        if stored.id == 0 {
            stored.id = settings.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        }
        settings.retain(|s| s.id != stored.id);
        settings.push(stored.clone());
        Ok(stored)
    }
}

// ============================================
// WordPress posts & orders
// ============================================

#[derive(Default)]
pub struct InMemoryPostRepository {
    pub records: Mutex<Vec<PostRecord>>,
    pub files: HashMap<u64, String>,
    pub site_users: u64,
}

impl InMemoryPostRepository {
    pub fn with(records: Vec<PostRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    pub fn record(&self, id: u64) -> Option<PostRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.post.id == id)
            .cloned()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_type(
        &self,
        post_type: &str,
        statuses: &[&str],
    ) -> Result<Vec<PostRecord>, DomainError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.post.post_type == post_type && statuses.contains(&r.post.status.as_str()))
            .cloned()
            .collect())
    }

    async fn find_by_id(
        &self,
        post_type: &str,
        id: u64,
    ) -> Result<Option<PostRecord>, DomainError> {
        Ok(self.record(id).filter(|r| r.post.post_type == post_type))
    }

    async fn attached_files(&self, ids: &[u64]) -> Result<HashMap<u64, String>, DomainError> {
        Ok(self
            .files
            .iter()
            .filter(|(id, _)| ids.contains(id))
            .map(|(id, file)| (*id, file.clone()))
            .collect())
    }

    async fn create(&self, post: &NewPost) -> Result<u64, DomainError> {
        let mut records = self.records.lock().unwrap();
        let id = records.iter().map(|r| r.post.id).max().unwrap_or(0) + 1;
        records.push(PostRecord {
            post: WpPost {
                id,
                post_type: post.post_type.clone(),
                status: post.status.clone(),
                title: post.title.clone(),
                excerpt: String::new(),
                name: String::new(),
                date: post.date,
                guid: String::new(),
            },
            meta: post.meta.iter().cloned().collect(),
            flags: PostFlags::default(),
        });
        Ok(id)
    }

    async fn upsert_meta(&self, post_id: u64, key: &str, value: &str) -> Result<(), DomainError> {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.post.id == post_id) {
            record.meta.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    async fn adjust_meta_amount(
        &self,
        post_id: u64,
        key: &str,
        delta: f64,
    ) -> Result<bool, DomainError> {
        let mut records = self.records.lock().unwrap();
        let Some(value) = records
            .iter_mut()
            .find(|r| r.post.id == post_id)
            .and_then(|r| r.meta.get_mut(key))
        else {
            return Ok(false);
        };
        let current = parse_number(value).unwrap_or(0.0);
        *value = (current + delta).max(0.0).to_string();
        Ok(true)
    }

    async fn update_flags(&self, post_id: u64, update: &FlagsUpdate) -> Result<(), DomainError> {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.post.id == post_id) {
            record.flags = update.apply(record.flags);
        }
        Ok(())
    }

    async fn delete(&self, post_type: &str, id: u64) -> Result<bool, DomainError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| !(r.post.id == id && r.post.post_type == post_type));
        Ok(records.len() < before)
    }

    async fn count_site_users(&self) -> Result<u64, DomainError> {
        Ok(self.site_users)
    }
}

#[derive(Default)]
pub struct InMemoryOfflinePaymentRepository {
    pub orders: Mutex<Vec<OfflinePayment>>,
}

impl InMemoryOfflinePaymentRepository {
    pub fn with(orders: Vec<OfflinePayment>) -> Self {
        Self {
            orders: Mutex::new(orders),
        }
    }
}

#[async_trait]
impl OfflinePaymentRepository for InMemoryOfflinePaymentRepository {
    async fn find_all(&self) -> Result<Vec<OfflinePayment>, DomainError> {
        let mut orders = self.orders.lock().unwrap().clone();
        orders.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(orders)
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<OfflinePayment>, DomainError> {
        Ok(self.orders.lock().unwrap().iter().find(|o| o.id == id).cloned())
    }

    async fn update_status(&self, id: u64, status: &OrderStatus) -> Result<bool, DomainError> {
        let mut orders = self.orders.lock().unwrap();
        match orders.iter_mut().find(|o| o.id == id) {
            Some(order) => {
                order.status = status.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: u64) -> Result<bool, DomainError> {
        let mut orders = self.orders.lock().unwrap();
        let before = orders.len();
        orders.retain(|o| o.id != id);
        Ok(orders.len() < before)
    }
}

#[derive(Default)]
pub struct InMemoryBorderouRepository {
    pub documents: Mutex<Vec<Borderou>>,
    pub assigned: Mutex<Vec<(u64, i64)>>,
}

#[async_trait]
impl BorderouRepository for InMemoryBorderouRepository {
    async fn create(
        &self,
        date: NaiveDate,
        post_ids: &[u64],
        render: BorderouRenderer<'_>,
    ) -> Result<Borderou, DomainError> {
        let mut documents = self.documents.lock().unwrap();
        let id = documents.len() as i64 + 1;
        let borderou = Borderou {
            id,
            date,
            xml: render(id),
        };
        documents.push(borderou.clone());
        self.assigned
            .lock()
            .unwrap()
            .extend(post_ids.iter().map(|post_id| (*post_id, id)));
        Ok(borderou)
    }
}

// ============================================
// Mail
// ============================================

/// Mailer that records messages; recipients in `failing` are rejected
#[derive(Default)]
pub struct RecordingMailer {
    pub messages: Mutex<Vec<OutgoingEmail>>,
    pub failing: Vec<String>,
}

impl RecordingMailer {
    pub fn failing_for(recipients: &[&str]) -> Self {
        Self {
            failing: recipients.iter().map(|r| r.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), DomainError> {
        if self.failing.contains(&email.to) {
            return Err(DomainError::ExternalService(format!("SMTP rejected {}", email.to)));
        }
        self.messages.lock().unwrap().push(email);
        Ok(())
    }
}

pub fn composer(mailer: Arc<RecordingMailer>) -> Arc<MailComposer> {
    Arc::new(MailComposer::new(
        mailer,
        Templates::builtin(),
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/images"),
    ))
}
