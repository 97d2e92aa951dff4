//! Auth Application Service (Use Case)
//!
//! Registration, login, refresh-token rotation and both password recovery
//! flows (emailed link and emailed one-time code).

use std::sync::Arc;

use chrono::{Datelike, Duration, Utc};
use uuid::Uuid;

use aps_crm::{
    setting_keys, DomainError, LoginPlatform, RefreshToken, RefreshTokenRepository,
    SettingRepository, User, UserRepository, UserStatus,
};

use crate::auth::{hash_password, random_otp, random_token, sha256_hex, verify_password, JwtManager};
use crate::services::templates::{OTP, RESET_PASSWORD};
use crate::services::MailComposer;

const MIN_PASSWORD_LEN: usize = 8;
const RESET_SUBJECT: &str = "Resetează parola contului tău - APS CRM";
const OTP_SUBJECT: &str = "Cod resetare parolă - APS CRM";

/// Token lifetimes and recovery limits
#[derive(Debug, Clone)]
pub struct AuthPolicy {
    pub refresh_ttl: Duration,
    pub reset_url_base: String,
    pub reset_ttl_minutes: i64,
    pub otp_ttl_minutes: i64,
    pub otp_max_attempts: i32,
    pub otp_lockout_minutes: i64,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            refresh_ttl: Duration::days(30),
            reset_url_base: "http://localhost:8080/api/v1/auth/reset?token=".to_string(),
            reset_ttl_minutes: 60,
            otp_ttl_minutes: 15,
            otp_max_attempts: 5,
            otp_lockout_minutes: 15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub email: String,
    pub password: String,
}

/// Issued access and refresh tokens
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    /// Milliseconds
    pub expires_in: u64,
    pub refresh_token: String,
    /// Milliseconds
    pub refresh_expires_in: u64,
}

fn check_password(password: &str, confirm: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(
            "Parola trebuie să aibă cel puțin 8 caractere.",
        ));
    }
    if password != confirm {
        return Err(DomainError::validation("Parolele nu coincid."));
    }
    Ok(())
}

fn greeting_name(user: &User) -> String {
    let first = user.first_name.trim();
    if first.is_empty() {
        String::new()
    } else {
        format!(" {}", first)
    }
}

/// Application service for authentication
pub struct AuthService<U, T, S>
where
    U: UserRepository,
    T: RefreshTokenRepository,
    S: SettingRepository,
{
    users: Arc<U>,
    tokens: Arc<T>,
    settings: Arc<S>,
    jwt: Arc<JwtManager>,
    mail: Arc<MailComposer>,
    policy: AuthPolicy,
}

impl<U, T, S> AuthService<U, T, S>
where
    U: UserRepository,
    T: RefreshTokenRepository,
    S: SettingRepository,
{
    pub fn new(
        users: Arc<U>,
        tokens: Arc<T>,
        settings: Arc<S>,
        jwt: Arc<JwtManager>,
        mail: Arc<MailComposer>,
        policy: AuthPolicy,
    ) -> Self {
        Self {
            users,
            tokens,
            settings,
            jwt,
            mail,
            policy,
        }
    }

    /// Create a pending account
    pub async fn register(&self, cmd: RegisterCommand) -> Result<User, DomainError> {
        let first_name = cmd.first_name.trim().to_string();
        let last_name = cmd.last_name.trim().to_string();
        let email = cmd.email.trim().to_lowercase();

        if first_name.is_empty() || last_name.is_empty() {
            return Err(DomainError::validation("Numele și prenumele sunt obligatorii."));
        }
        if email.parse::<lettre::Address>().is_err() {
            return Err(DomainError::validation(format!("Adresă de email invalidă: {}", cmd.email.trim())));
        }
        if cmd.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(
                "Parola trebuie să aibă cel puțin 8 caractere.",
            ));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email already registered.".into()));
        }

        let user = User::new(
            first_name,
            last_name,
            email,
            hash_password(&cmd.password)?,
            cmd.gender.map(|g| g.trim().to_string()).filter(|g| !g.is_empty()),
        );
        let saved = self.users.insert(&user).await.map_err(|e| match e {
            DomainError::Conflict(_) => DomainError::Conflict("Email already registered.".into()),
            other => other,
        })?;

        tracing::info!("Registered user {} ({})", saved.email, saved.id);
        Ok(saved)
    }

    async fn require_active_for_login(&self) -> Result<bool, DomainError> {
        Ok(self
            .settings
            .find_by_name(setting_keys::REQUIRE_ACTIVE_FOR_LOGIN)
            .await?
            .is_some_and(|s| s.is_enabled()))
    }

    async fn issue_session(&self, user: User) -> Result<Session, DomainError> {
        self.issue_session_with(user, random_token()).await
    }

    async fn issue_session_with(
        &self,
        user: User,
        refresh_token: String,
    ) -> Result<Session, DomainError> {
        let access_token = self.jwt.issue(&user)?;
        self.tokens
            .create(&RefreshToken::new(
                user.id,
                sha256_hex(&refresh_token),
                Utc::now() + self.policy.refresh_ttl,
            ))
            .await?;

        Ok(Session {
            user,
            access_token,
            expires_in: self.jwt.expires_in_ms(),
            refresh_token,
            refresh_expires_in: self.policy.refresh_ttl.num_milliseconds().max(0) as u64,
        })
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        platform: LoginPlatform,
    ) -> Result<Session, DomainError> {
        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or(DomainError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash) {
            tracing::warn!("Failed login for {}", user.email);
            return Err(DomainError::InvalidCredentials);
        }

        if platform == LoginPlatform::Mobile
            && user.status != UserStatus::Active
            && self.require_active_for_login().await?
        {
            tracing::warn!("Mobile login refused for inactive account {}", user.email);
            return Err(DomainError::Forbidden("Contul tău nu este încă activ.".into()));
        }

        tracing::info!("User {} logged in ({:?})", user.email, platform);
        self.issue_session(user).await
    }

    /// Exchange a refresh token for new tokens, revoking the old one
    pub async fn refresh(&self, raw_token: &str) -> Result<Session, DomainError> {
        let invalid = || DomainError::Unauthorized("Refresh token invalid sau expirat.".into());

        let stored = self
            .tokens
            .find_by_hash(&sha256_hex(raw_token.trim()))
            .await?
            .filter(|t| t.is_usable(Utc::now()))
            .ok_or_else(invalid)?;
        let user = self
            .users
            .find_by_id(stored.user_id)
            .await?
            .ok_or_else(invalid)?;

        // Only the caller that flips the revoked flag gets a new session
        let next = random_token();
        if !self
            .tokens
            .revoke(stored.id, Some(&sha256_hex(&next)))
            .await?
        {
            tracing::warn!("Refresh token {} already rotated", stored.id);
            return Err(invalid());
        }
        self.issue_session_with(user, next).await
    }

    /// Revoke every refresh token of a user
    pub async fn logout(&self, user_id: Uuid) -> Result<u64, DomainError> {
        let removed = self.tokens.delete_by_user(user_id).await?;
        tracing::info!("Logged out user {} ({} refresh tokens removed)", user_id, removed);
        Ok(removed)
    }

    /// Email a reset link; unknown addresses are ignored
    pub async fn request_password_reset(&self, email: &str) -> Result<(), DomainError> {
        let Some(mut user) = self.users.find_by_email(email.trim()).await? else {
            tracing::info!("Password reset requested for unknown email {}", email.trim());
            return Ok(());
        };

        let token = random_token();
        user.reset_token_hash = Some(sha256_hex(&token));
        user.reset_token_expires_at =
            Some(Utc::now() + Duration::minutes(self.policy.reset_ttl_minutes));
        user.updated_at = Utc::now();
        self.users.update(&user).await?;

        let link = format!("{}{}", self.policy.reset_url_base, token);
        let ttl = self.policy.reset_ttl_minutes.to_string();
        let year = Utc::now().year().to_string();
        let first_name = greeting_name(&user);
        let html = self.mail.templates().render(
            RESET_PASSWORD,
            &[
                ("FIRST_NAME_OPT", &first_name),
                ("RESET_LINK", &link),
                ("TTL_MINUTES", &ttl),
                ("YEAR", &year),
            ],
        )?;

        self.mail
            .send_html(&user.email, RESET_SUBJECT, &html)
            .await
            .map_err(|e| {
                tracing::error!("Failed sending reset email to {}: {}", user.email, e);
                DomainError::ExternalService("Nu am putut trimite e-mailul de resetare.".into())
            })?;
        tracing::info!("Password reset link sent to {}", user.email);
        Ok(())
    }

    pub async fn confirm_password_reset(
        &self,
        token: &str,
        password: &str,
        confirm: &str,
    ) -> Result<(), DomainError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(DomainError::validation("Token lipsă."));
        }
        check_password(password, confirm)?;

        let mut user = self
            .users
            .find_by_reset_token_hash(&sha256_hex(token))
            .await?
            .ok_or_else(|| DomainError::validation("Token invalid sau expirat."))?;
        if user
            .reset_token_expires_at
            .map_or(true, |expires| expires < Utc::now())
        {
            return Err(DomainError::validation(
                "Token expirat. Solicită o nouă resetare.",
            ));
        }

        user.password_hash = hash_password(password)?;
        user.clear_reset_token();
        user.updated_at = Utc::now();
        self.users.update(&user).await?;

        tracing::info!("Password reset completed for {}", user.email);
        Ok(())
    }

    /// Email a one-time code; unknown or locked accounts are ignored
    pub async fn request_password_reset_otp(&self, email: &str) -> Result<(), DomainError> {
        let now = Utc::now();
        let Some(mut user) = self.users.find_by_email(email.trim()).await? else {
            tracing::info!("OTP requested for unknown email {}", email.trim());
            return Ok(());
        };
        if user.is_otp_locked(now) {
            tracing::warn!("OTP requested for locked account {}", user.email);
            return Ok(());
        }

        let code = random_otp();
        user.otp_hash = Some(hash_password(&code)?);
        user.otp_expires_at = Some(now + Duration::minutes(self.policy.otp_ttl_minutes));
        user.otp_attempts = 0;
        user.otp_locked_until = None;
        user.updated_at = now;
        self.users.update(&user).await?;

        let ttl = self.policy.otp_ttl_minutes.to_string();
        let year = now.year().to_string();
        let first_name = greeting_name(&user);
        let html = self.mail.templates().render(
            OTP,
            &[
                ("FIRST_NAME_OPT", &first_name),
                ("OTP_CODE", &code),
                ("TTL_MINUTES", &ttl),
                ("YEAR", &year),
            ],
        )?;

        self.mail
            .send_html(&user.email, OTP_SUBJECT, &html)
            .await
            .map_err(|e| {
                tracing::error!("Failed sending OTP email to {}: {}", user.email, e);
                DomainError::ExternalService(
                    "Nu am putut trimite emailul cu codul de resetare.".into(),
                )
            })?;
        tracing::info!("Password reset code sent to {}", user.email);
        Ok(())
    }

    pub async fn reset_password_with_otp(
        &self,
        email: &str,
        otp: &str,
        password: &str,
        confirm: &str,
    ) -> Result<(), DomainError> {
        check_password(password, confirm)?;

        let now = Utc::now();
        let invalid = || DomainError::validation("Cod invalid sau expirat.");
        let mut user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or_else(invalid)?;

        if user.is_otp_locked(now) {
            return Err(DomainError::validation(
                "Prea multe încercări. Încearcă mai târziu.",
            ));
        }
        let Some(otp_hash) = user.otp_hash.clone() else {
            return Err(invalid());
        };
        if user.otp_expires_at.map_or(true, |expires| expires < now) {
            return Err(invalid());
        }

        if !verify_password(otp.trim(), &otp_hash) {
            user.otp_attempts += 1;
            if user.otp_attempts >= self.policy.otp_max_attempts {
                user.otp_locked_until =
                    Some(now + Duration::minutes(self.policy.otp_lockout_minutes));
                tracing::warn!("OTP locked for {} after {} attempts", user.email, user.otp_attempts);
            }
            user.updated_at = now;
            self.users.update(&user).await?;
            return Err(DomainError::validation("Cod invalid."));
        }

        user.password_hash = hash_password(password)?;
        user.clear_otp();
        user.updated_at = now;
        self.users.update(&user).await?;

        tracing::info!("Password reset with code completed for {}", user.email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{
        composer, InMemoryRefreshTokenRepository, InMemorySettingRepository,
        InMemoryUserRepository, RecordingMailer,
    };
    use aps_crm::{Setting, SettingType};

    type TestAuth =
        AuthService<InMemoryUserRepository, InMemoryRefreshTokenRepository, InMemorySettingRepository>;

    struct Fixture {
        service: TestAuth,
        users: Arc<InMemoryUserRepository>,
        tokens: Arc<InMemoryRefreshTokenRepository>,
        mailer: Arc<RecordingMailer>,
    }

    fn fixture_with(mailer: RecordingMailer, settings: Vec<Setting>) -> Fixture {
        let users = Arc::new(InMemoryUserRepository::default());
        let tokens = Arc::new(InMemoryRefreshTokenRepository::default());
        let mailer = Arc::new(mailer);
        let service = AuthService::new(
            users.clone(),
            tokens.clone(),
            Arc::new(InMemorySettingRepository::with(settings)),
            Arc::new(JwtManager::new(
                b"0123456789abcdef0123456789abcdef",
                std::time::Duration::from_secs(3600),
            )),
            composer(mailer.clone()),
            AuthPolicy::default(),
        );
        Fixture {
            service,
            users,
            tokens,
            mailer,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(RecordingMailer::default(), Vec::new())
    }

    fn register_cmd(email: &str) -> RegisterCommand {
        RegisterCommand {
            first_name: "Ana".into(),
            last_name: "Pop".into(),
            gender: Some("F".into()),
            email: email.into(),
            password: "parola-buna".into(),
        }
    }

    /// Hex token following `token=` in the reset link
    fn token_from_mail(html: &str) -> String {
        let start = html.find("token=").unwrap() + "token=".len();
        html[start..]
            .chars()
            .take_while(|c| c.is_ascii_hexdigit())
            .collect()
    }

    fn otp_from_mail(html: &str) -> String {
        let marker = "background:#f8fafc\">";
        let start = html.find(marker).unwrap() + marker.len();
        html[start..start + 6].to_string()
    }

    #[tokio::test]
    async fn test_register_creates_pending_user() {
        let f = fixture();
        let user = f.service.register(register_cmd(" Ana@APS.ro ")).await.unwrap();
        assert_eq!(user.email, "ana@aps.ro");
        assert_eq!(user.status, UserStatus::Pending);
        assert_ne!(user.password_hash, "parola-buna");
    }

    #[tokio::test]
    async fn test_register_validation_and_duplicates() {
        let f = fixture();
        let mut bad = register_cmd("ana@aps.ro");
        bad.first_name = "  ".into();
        assert!(matches!(f.service.register(bad).await, Err(DomainError::Validation(_))));

        assert!(matches!(
            f.service.register(register_cmd("not-an-email")).await,
            Err(DomainError::Validation(_))
        ));

        let mut short = register_cmd("ana@aps.ro");
        short.password = "scurt".into();
        assert!(matches!(f.service.register(short).await, Err(DomainError::Validation(_))));

        f.service.register(register_cmd("ana@aps.ro")).await.unwrap();
        let err = f.service.register(register_cmd("ana@aps.ro")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(ref m) if m == "Email already registered."));
    }

    #[tokio::test]
    async fn test_insert_never_overwrites_existing_account() {
        let f = fixture();
        let ana = f.service.register(register_cmd("ana@aps.ro")).await.unwrap();

        let intruder = User::new(
            "Alt".into(),
            "Cont".into(),
            "ana@aps.ro".into(),
            hash_password("alta-parola").unwrap(),
            None,
        );
        assert!(matches!(
            f.users.insert(&intruder).await,
            Err(DomainError::Conflict(_))
        ));
        assert!(matches!(
            f.users.update(&intruder).await,
            Err(DomainError::NotFound { .. })
        ));

        let stored = f.users.get("ana@aps.ro").unwrap();
        assert_eq!(stored.id, ana.id);
        assert!(verify_password("parola-buna", &stored.password_hash));
    }

    #[tokio::test]
    async fn test_login_and_wrong_credentials() {
        let f = fixture();
        f.service.register(register_cmd("ana@aps.ro")).await.unwrap();

        let session = f
            .service
            .login("ana@aps.ro", "parola-buna", LoginPlatform::Web)
            .await
            .unwrap();
        assert_eq!(session.expires_in, 3_600_000);
        assert_eq!(session.refresh_token.len(), 64);
        assert_eq!(f.tokens.tokens.lock().unwrap().len(), 1);

        assert!(matches!(
            f.service.login("ana@aps.ro", "gresit!!", LoginPlatform::Web).await,
            Err(DomainError::InvalidCredentials)
        ));
        assert!(matches!(
            f.service.login("nimeni@aps.ro", "parola-buna", LoginPlatform::Web).await,
            Err(DomainError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_mobile_login_requires_active_when_enabled() {
        let setting = Setting::new(
            setting_keys::REQUIRE_ACTIVE_FOR_LOGIN,
            SettingType::Boolean,
            "true",
            "false",
        );
        let f = fixture_with(RecordingMailer::default(), vec![setting]);
        f.service.register(register_cmd("ana@aps.ro")).await.unwrap();

        assert!(matches!(
            f.service.login("ana@aps.ro", "parola-buna", LoginPlatform::Mobile).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(f
            .service
            .login("ana@aps.ro", "parola-buna", LoginPlatform::Web)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_refresh_rotates_and_rejects_reuse() {
        let f = fixture();
        f.service.register(register_cmd("ana@aps.ro")).await.unwrap();
        let first = f
            .service
            .login("ana@aps.ro", "parola-buna", LoginPlatform::Web)
            .await
            .unwrap();

        let second = f.service.refresh(&first.refresh_token).await.unwrap();
        assert_ne!(second.refresh_token, first.refresh_token);
        {
            let tokens = f.tokens.tokens.lock().unwrap();
            let old = tokens
                .iter()
                .find(|t| t.token_hash == sha256_hex(&first.refresh_token))
                .unwrap();
            assert!(old.revoked);
            assert_eq!(old.replaced_by, Some(sha256_hex(&second.refresh_token)));
        }

        assert!(matches!(
            f.service.refresh(&first.refresh_token).await,
            Err(DomainError::Unauthorized(_))
        ));
        assert!(matches!(
            f.service.refresh("unknown").await,
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_refresh_race_issues_one_session() {
        let f = fixture();
        f.service.register(register_cmd("ana@aps.ro")).await.unwrap();
        let first = f
            .service
            .login("ana@aps.ro", "parola-buna", LoginPlatform::Web)
            .await
            .unwrap();

        // Both callers read the token before either revokes it
        f.tokens
            .stale_reads
            .store(true, std::sync::atomic::Ordering::SeqCst);
        assert!(f.service.refresh(&first.refresh_token).await.is_ok());
        assert!(matches!(
            f.service.refresh(&first.refresh_token).await,
            Err(DomainError::Unauthorized(_))
        ));
        assert_eq!(f.tokens.tokens.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_expired_refresh_token_is_rejected() {
        let f = fixture();
        let user = f.service.register(register_cmd("ana@aps.ro")).await.unwrap();
        f.tokens
            .create(&RefreshToken::new(
                user.id,
                sha256_hex("stale"),
                Utc::now() - Duration::minutes(1),
            ))
            .await
            .unwrap();
        assert!(matches!(
            f.service.refresh("stale").await,
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_logout_removes_tokens() {
        let f = fixture();
        let user = f.service.register(register_cmd("ana@aps.ro")).await.unwrap();
        f.service.login("ana@aps.ro", "parola-buna", LoginPlatform::Web).await.unwrap();
        f.service.login("ana@aps.ro", "parola-buna", LoginPlatform::Web).await.unwrap();
        assert_eq!(f.service.logout(user.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_reset_link_flow() {
        let f = fixture();
        f.service.register(register_cmd("ana@aps.ro")).await.unwrap();
        f.service.request_password_reset("nimeni@aps.ro").await.unwrap();
        assert!(f.mailer.sent().is_empty());

        f.service.request_password_reset("ana@aps.ro").await.unwrap();
        let sent = f.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].html.contains("Salut Ana"));
        let token = token_from_mail(&sent[0].html);
        assert_eq!(token.len(), 64);

        let stored = f.users.get("ana@aps.ro").unwrap();
        assert_eq!(stored.reset_token_hash, Some(sha256_hex(&token)));

        let err = |r: Result<(), DomainError>| r.unwrap_err().to_string();
        assert_eq!(
            err(f.service.confirm_password_reset(" ", "parola-noua", "parola-noua").await),
            "Token lipsă."
        );
        assert_eq!(
            err(f.service.confirm_password_reset(&token, "scurt", "scurt").await),
            "Parola trebuie să aibă cel puțin 8 caractere."
        );
        assert_eq!(
            err(f.service.confirm_password_reset(&token, "parola-noua", "parola-alta").await),
            "Parolele nu coincid."
        );
        assert_eq!(
            err(f.service.confirm_password_reset("abc", "parola-noua", "parola-noua").await),
            "Token invalid sau expirat."
        );

        f.service
            .confirm_password_reset(&token, "parola-noua", "parola-noua")
            .await
            .unwrap();
        let updated = f.users.get("ana@aps.ro").unwrap();
        assert!(updated.reset_token_hash.is_none());
        assert!(verify_password("parola-noua", &updated.password_hash));
    }

    #[tokio::test]
    async fn test_expired_reset_token() {
        let f = fixture();
        f.service.register(register_cmd("ana@aps.ro")).await.unwrap();
        let mut user = f.users.get("ana@aps.ro").unwrap();
        user.reset_token_hash = Some(sha256_hex("vechi"));
        user.reset_token_expires_at = Some(Utc::now() - Duration::minutes(1));
        f.users.update(&user).await.unwrap();

        let err = f
            .service
            .confirm_password_reset("vechi", "parola-noua", "parola-noua")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Token expirat. Solicită o nouă resetare.");
    }

    #[tokio::test]
    async fn test_reset_mail_failure_is_external_error() {
        let f = fixture_with(RecordingMailer::failing_for(&["ana@aps.ro"]), Vec::new());
        f.service.register(register_cmd("ana@aps.ro")).await.unwrap();
        let err = f.service.request_password_reset("ana@aps.ro").await.unwrap_err();
        assert!(matches!(err, DomainError::ExternalService(ref m) if m == "Nu am putut trimite e-mailul de resetare."));
    }

    #[tokio::test]
    async fn test_otp_flow() {
        let f = fixture();
        f.service.register(register_cmd("ana@aps.ro")).await.unwrap();
        f.service.request_password_reset_otp("ana@aps.ro").await.unwrap();
        let code = otp_from_mail(&f.mailer.sent()[0].html);
        assert!(code.chars().all(|c| c.is_ascii_digit()));

        f.service
            .reset_password_with_otp("ana@aps.ro", &code, "parola-noua", "parola-noua")
            .await
            .unwrap();
        let user = f.users.get("ana@aps.ro").unwrap();
        assert!(user.otp_hash.is_none());
        assert!(verify_password("parola-noua", &user.password_hash));

        let err = f
            .service
            .reset_password_with_otp("ana@aps.ro", &code, "parola-noua", "parola-noua")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Cod invalid sau expirat.");
    }

    #[tokio::test]
    async fn test_otp_lockout_after_max_attempts() {
        let f = fixture();
        f.service.register(register_cmd("ana@aps.ro")).await.unwrap();
        f.service.request_password_reset_otp("ana@aps.ro").await.unwrap();
        let code = otp_from_mail(&f.mailer.sent()[0].html);
        let wrong = if code == "000000" { "111111" } else { "000000" };

        for _ in 0..5 {
            let err = f
                .service
                .reset_password_with_otp("ana@aps.ro", wrong, "parola-noua", "parola-noua")
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), "Cod invalid.");
        }
        let locked = f.users.get("ana@aps.ro").unwrap();
        assert_eq!(locked.otp_attempts, 5);
        assert!(locked.is_otp_locked(Utc::now()));

        // The right code no longer helps while locked
        let err = f
            .service
            .reset_password_with_otp("ana@aps.ro", &code, "parola-noua", "parola-noua")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Prea multe încercări. Încearcă mai târziu.");

        // A locked account gets no new code
        f.service.request_password_reset_otp("ana@aps.ro").await.unwrap();
        assert_eq!(f.mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_otp_checks_password_policy_first() {
        let f = fixture();
        let err = f
            .service
            .reset_password_with_otp("nimeni@aps.ro", "123456", "scurt", "scurt")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Parola trebuie să aibă cel puțin 8 caractere.");
        let err = f
            .service
            .reset_password_with_otp("nimeni@aps.ro", "123456", "parola-noua", "parola-noua")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Cod invalid sau expirat.");
    }
}
