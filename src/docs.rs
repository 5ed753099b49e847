use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

use crate::api::adjustments::{AdjustmentCreatePayload, ReviewPayload};
use crate::api::device::{EnrollResultPayload, PunchPayload, TimeResponsePayload};
use crate::api::payroll::PayrollPeriod;
use crate::api::reports::{
    MonthlyReportResponse, MonthlySummaryItem, UserReportResponse, WorkHourBalanceResponse,
};
use crate::api::time_records::{
    ManualAuthGrant, TimeRecordCreateAdmin, TimeRecordDeleteAdmin, TimeRecordUpdateAdmin,
};
use crate::auth::handlers::LoginResponse;
use crate::device::feedback::DeviceFeedback;
use crate::model::adjustment::{AdjustmentRequest, AdjustmentRequestCreate};
use crate::model::audit::{AuditLog, ManualAdjustment};
use crate::model::enums::{AdjustmentStatus, AdjustmentType, RecordType};
use crate::model::holiday::{Holiday, HolidayCreate};
use crate::model::manual_auth::ManualPunchAuthorization;
use crate::model::payroll::PayrollClosure;
use crate::model::time_record::TimeRecord;
use crate::model::user::User;
use crate::model::work_schedule::{WorkSchedule, WorkScheduleEntry};
use crate::models::LoginReqDto;
use crate::service::anomaly::{Anomaly, AnomalyKind};
use crate::service::balance::{DayBalance, PeriodTotals};
use crate::service::biometric::{BiometricSyncAck, BiometricSyncData};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ponto Eletrônico API",
        version = "1.0.0",
        description = r#"
## Sistema de Ponto Eletrônico

Backend for an electronic timeclock: biometric and manual punches, daily
attendance reconciliation, worked-vs-expected hour balances and payroll
period closures.

### Key Features
- **Punch ingestion** from biometric terminals with an idempotency window
- **Anomaly detection** over the daily punch ledger
- **Balance reports** against per-weekday schedules, holidays and waivers
- **Payroll period gate** blocking edits once a month is closed

Most endpoints are protected with **JWT Bearer authentication**; the device
endpoints use a static API key instead.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::login,

        crate::api::device::register_punch,
        crate::api::device::enroll_biometric,
        crate::api::device::sync_templates,
        crate::api::device::sync_start,
        crate::api::device::sync_ack,
        crate::api::device::device_time,

        crate::api::time_records::register_entry,
        crate::api::time_records::register_exit,
        crate::api::time_records::toggle_record_type,
        crate::api::time_records::record_toggle_history,
        crate::api::time_records::my_records,
        crate::api::time_records::admin_list,
        crate::api::time_records::admin_create,
        crate::api::time_records::admin_update,
        crate::api::time_records::admin_delete,
        crate::api::time_records::authorize_manual_punch,
        crate::api::time_records::deauthorize_manual_punch,

        crate::api::anomalies::my_anomalies,
        crate::api::anomalies::all_anomalies,
        crate::api::anomalies::user_anomalies,

        crate::api::reports::monthly_summary,
        crate::api::reports::user_report,
        crate::api::reports::my_work_hours,

        crate::api::adjustments::create_adjustment,
        crate::api::adjustments::my_adjustments,
        crate::api::adjustments::list_adjustments,
        crate::api::adjustments::approve_adjustment,
        crate::api::adjustments::reject_adjustment,

        crate::api::payroll::close_period,
        crate::api::payroll::reopen_period,
        crate::api::payroll::period_status,

        crate::api::schedules::read_user_schedules,
        crate::api::schedules::replace_user_schedules,

        crate::api::holidays::create_holiday,
        crate::api::holidays::list_holidays,
        crate::api::holidays::delete_holiday,

        crate::api::audit::list_audit_logs,

        crate::api::users::list_users,
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            RecordType,
            AdjustmentType,
            AdjustmentStatus,
            TimeRecord,
            WorkSchedule,
            WorkScheduleEntry,
            Holiday,
            HolidayCreate,
            AdjustmentRequest,
            AdjustmentRequestCreate,
            AdjustmentCreatePayload,
            ReviewPayload,
            PayrollClosure,
            PayrollPeriod,
            AuditLog,
            ManualAdjustment,
            User,
            ManualPunchAuthorization,
            ManualAuthGrant,
            Anomaly,
            AnomalyKind,
            DayBalance,
            PeriodTotals,
            MonthlySummaryItem,
            MonthlyReportResponse,
            UserReportResponse,
            WorkHourBalanceResponse,
            TimeRecordCreateAdmin,
            TimeRecordUpdateAdmin,
            TimeRecordDeleteAdmin,
            PunchPayload,
            EnrollResultPayload,
            TimeResponsePayload,
            DeviceFeedback,
            BiometricSyncData,
            BiometricSyncAck,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login and token lifecycle"),
        (name = "Device", description = "Biometric terminal protocol"),
        (name = "Records", description = "Punches and administrative edits"),
        (name = "Anomalies", description = "Punch ledger reconciliation"),
        (name = "Reports", description = "Worked-vs-expected balances"),
        (name = "Adjustments", description = "Waivers, certificates and missing punches"),
        (name = "Payroll", description = "Period close/reopen gate"),
        (name = "Schedules", description = "Per-weekday expected hours"),
        (name = "Holidays", description = "Global holiday calendar"),
        (name = "Audit", description = "Administrative action trail"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
