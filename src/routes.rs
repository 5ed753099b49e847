use crate::{
    api::{
        adjustments, anomalies, audit, device, holidays, payroll, reports, schedules,
        time_records, users,
    },
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let device_limiter = Arc::new(build_limiter(config.rate_device_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Device routes, guarded by the ApiKey extractor per handler
    cfg.service(
        web::scope("/device")
            .wrap(device_limiter)
            .service(web::resource("/punch").route(web::post().to(device::register_punch)))
            .service(web::resource("/enroll").route(web::post().to(device::enroll_biometric)))
            .service(web::resource("/sync").route(web::get().to(device::sync_templates)))
            .service(web::resource("/sync/start").route(web::post().to(device::sync_start)))
            .service(web::resource("/sync/ack").route(web::post().to(device::sync_ack)))
            .service(web::resource("/time").route(web::get().to(device::device_time))),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(protected_limiter)
            .service(web::resource("/me").route(web::get().to(handlers::me)))
            .service(
                web::scope("/records")
                    .service(
                        web::resource("/entry").route(web::post().to(time_records::register_entry)),
                    )
                    .service(
                        web::resource("/exit").route(web::post().to(time_records::register_exit)),
                    )
                    .service(web::resource("/my").route(web::get().to(time_records::my_records)))
                    .service(
                        web::resource("/admin/list").route(web::get().to(time_records::admin_list)),
                    )
                    .service(
                        web::resource("/admin/authorize/{user_id}")
                            .route(web::post().to(time_records::authorize_manual_punch)),
                    )
                    .service(
                        web::resource("/admin/deauthorize/{user_id}")
                            .route(web::post().to(time_records::deauthorize_manual_punch)),
                    )
                    .service(
                        web::resource("/admin/{id}")
                            .route(web::put().to(time_records::admin_update))
                            .route(web::delete().to(time_records::admin_delete)),
                    )
                    .service(
                        web::resource("/admin").route(web::post().to(time_records::admin_create)),
                    )
                    .service(
                        web::resource("/{id}/toggle")
                            .route(web::put().to(time_records::toggle_record_type)),
                    )
                    .service(
                        web::resource("/{id}/toggles")
                            .route(web::get().to(time_records::record_toggle_history)),
                    ),
            )
            .service(
                web::scope("/anomalies")
                    .service(web::resource("/my").route(web::get().to(anomalies::my_anomalies)))
                    .service(web::resource("/all").route(web::get().to(anomalies::all_anomalies)))
                    .service(
                        web::resource("/user/{user_id}")
                            .route(web::get().to(anomalies::user_anomalies)),
                    ),
            )
            .service(
                web::scope("/reports")
                    .service(
                        web::resource("/monthly").route(web::get().to(reports::monthly_summary)),
                    )
                    .service(
                        web::resource("/user/{user_id}").route(web::get().to(reports::user_report)),
                    ),
            )
            .service(
                web::scope("/work-hours")
                    .service(web::resource("/my").route(web::get().to(reports::my_work_hours))),
            )
            .service(
                web::scope("/adjustments")
                    .service(
                        web::resource("")
                            .route(web::post().to(adjustments::create_adjustment))
                            .route(web::get().to(adjustments::list_adjustments)),
                    )
                    .service(web::resource("/my").route(web::get().to(adjustments::my_adjustments)))
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(adjustments::approve_adjustment)),
                    )
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(adjustments::reject_adjustment)),
                    ),
            )
            .service(
                web::scope("/payroll")
                    .service(web::resource("/close").route(web::post().to(payroll::close_period)))
                    .service(web::resource("/reopen").route(web::post().to(payroll::reopen_period)))
                    .service(web::resource("/status").route(web::get().to(payroll::period_status))),
            )
            .service(
                web::scope("/schedules").service(
                    web::resource("/user/{user_id}")
                        .route(web::get().to(schedules::read_user_schedules))
                        .route(web::put().to(schedules::replace_user_schedules)),
                ),
            )
            .service(
                web::scope("/holidays")
                    .service(
                        web::resource("")
                            .route(web::post().to(holidays::create_holiday))
                            .route(web::get().to(holidays::list_holidays)),
                    )
                    .service(
                        web::resource("/{id}").route(web::delete().to(holidays::delete_holiday)),
                    ),
            )
            .service(web::resource("/audit").route(web::get().to(audit::list_audit_logs)))
            .service(web::resource("/users").route(web::get().to(users::list_users))),
    );
}
