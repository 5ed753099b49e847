pub mod adjustments;
pub mod anomalies;
pub mod audit;
pub mod device;
pub mod holidays;
pub mod payroll;
pub mod reports;
pub mod schedules;
pub mod time_records;
pub mod users;
