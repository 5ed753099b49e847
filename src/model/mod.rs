pub mod adjustment;
pub mod audit;
pub mod biometric;
pub mod enums;
pub mod holiday;
pub mod manual_auth;
pub mod payroll;
pub mod time_record;
pub mod user;
pub mod work_schedule;
