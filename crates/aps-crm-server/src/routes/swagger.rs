//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::application::JobReport;
use crate::error::ProblemDetail;
use crate::models::{
    AddressResponse,
    AmountKpiResponse,
    // Causes
    AmountRequest,
    BorderouRequest,
    CauseKpiResponse,
    CausePage,
    CauseResponse,
    D177DetailResponse,
    D177Page,
    D177Response,
    F230DetailResponse,
    F230KpiResponse,
    F230Page,
    F230Response,
    // Forms
    FlagsRequest,
    FlagsResponse,
    ForgotPasswordRequest,
    IbanKpiResponse,
    IbanPage,
    // IBAN
    IbanRequest,
    IbanResponse,
    // KPI
    KpiResponse,
    LoginRequest,
    LoginResponse,
    LoginUser,
    OfflinePaymentPage,
    OfflinePaymentResponse,
    OtpResetRequest,
    PaymentStatusRequest,
    PeopleKpiResponse,
    RefreshRequest,
    // Auth
    RegisterRequest,
    RequireActiveRequest,
    RequireActiveResponse,
    ResetConfirmRequest,
    // Mail
    SendMailRequest,
    // Settings
    SettingResponse,
    SettingValueRequest,
    SponsorshipPage,
    SponsorshipResponse,
    UpdatePremiumRequest,
    UpdateStatusRequest,
    UserPage,
    // Users
    UserResponse,
    VolunteerDetailResponse,
    VolunteerKpiResponse,
    VolunteerPage,
    // Volunteers
    VolunteerResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth endpoints
        super::auth::register,
        super::auth::login,
        super::auth::refresh,
        super::auth::logout,
        super::auth::forgot,
        super::auth::reset_page,
        super::auth::reset_confirm,
        super::auth::reset_success,
        super::auth::forgot_otp,
        super::auth::reset_otp,
        // User endpoints
        super::users::me,
        super::users::list_users,
        super::users::search_users,
        super::users::search_web_users,
        super::users::update_status,
        super::users::update_premium,
        super::users::delete_user,
        // Volunteer endpoints
        super::volunteers::list_volunteers,
        super::volunteers::search_volunteers,
        super::volunteers::get_volunteer,
        super::volunteers::delete_volunteer,
        // Cause endpoints
        super::causes::list_causes,
        super::causes::adjust_amount,
        super::causes::list_payments,
        super::causes::update_payment_status,
        super::causes::delete_payment,
        // Sponsorship endpoints
        super::sponsorship::list_sponsorships,
        super::sponsorship::search_sponsorships,
        super::sponsorship::update_flags,
        super::sponsorship::delete_sponsorship,
        super::d177::list_d177,
        super::d177::search_d177,
        super::d177::get_d177,
        super::d177::update_flags,
        super::d177::delete_d177,
        // Formular 230 endpoints
        super::f230::list_forms,
        super::f230::search_forms,
        super::f230::get_form,
        super::f230::update_flags,
        super::f230::delete_form,
        super::f230::create_borderou,
        // IBAN endpoints
        super::iban::list_ibans,
        super::iban::search_ibans,
        super::iban::create_iban,
        super::iban::update_iban,
        super::iban::delete_iban,
        // Setting endpoints
        super::settings::list_settings,
        super::settings::list_xml_settings,
        super::settings::update_setting,
        super::settings::reset_setting,
        super::settings::get_require_active,
        super::settings::set_require_active,
        // KPI, reports and mail
        super::kpi::get_kpi,
        super::reports::export,
        super::mail::send_mail,
        super::mail::run_reminder,
        super::mail::run_birthday,
    ),
    info(
        title = "APS CRM API",
        version = "0.2.0",
        description = "CRM backend for Asociatia Actiune pentru Sanatate\n\nVolunteers, donations, sponsorships and Formular 230 on top of the association's WordPress database.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Registration, sessions and password recovery"),
        (name = "Users", description = "CRM and mobile accounts"),
        (name = "Volunteers", description = "Volunteer applications"),
        (name = "Causes", description = "Donation campaigns and offline payments"),
        (name = "Forms", description = "Sponsorship contracts and D177 declarations"),
        (name = "Formular 230", description = "Tax redirection forms and Borderou 230"),
        (name = "IBAN", description = "Beneficiaries of the tax redirection"),
        (name = "Settings", description = "CRM configuration"),
        (name = "KPI", description = "Dashboard figures"),
        (name = "Reports", description = "CSV exports"),
        (name = "Mail", description = "Manual emails and scheduled mail jobs"),
    ),
    components(
        schemas(
            ProblemDetail,
            // Auth
            RegisterRequest,
            LoginRequest,
            LoginUser,
            LoginResponse,
            RefreshRequest,
            ForgotPasswordRequest,
            ResetConfirmRequest,
            OtpResetRequest,
            // Users
            UserResponse,
            UpdateStatusRequest,
            UpdatePremiumRequest,
            UserPage,
            // Volunteers
            VolunteerResponse,
            VolunteerDetailResponse,
            VolunteerPage,
            // Causes
            CauseResponse,
            AmountRequest,
            OfflinePaymentResponse,
            PaymentStatusRequest,
            CausePage,
            OfflinePaymentPage,
            // Forms
            FlagsRequest,
            FlagsResponse,
            SponsorshipResponse,
            SponsorshipPage,
            D177Response,
            D177DetailResponse,
            D177Page,
            F230Response,
            AddressResponse,
            F230DetailResponse,
            F230Page,
            BorderouRequest,
            // IBAN
            IbanRequest,
            IbanResponse,
            IbanPage,
            // Settings
            SettingResponse,
            SettingValueRequest,
            RequireActiveResponse,
            RequireActiveRequest,
            // KPI
            KpiResponse,
            VolunteerKpiResponse,
            AmountKpiResponse,
            F230KpiResponse,
            IbanKpiResponse,
            CauseKpiResponse,
            PeopleKpiResponse,
            // Mail
            SendMailRequest,
            JobReport,
        )
    ),
)]
pub struct ApiDoc;
