use crate::{
    api::{attendance, employee, leave_request, payroll},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let burst = requests_per_min.max(1);
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request((60_000 / u64::from(burst)).max(1))
        .burst_size(burst)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let limiter = build_limiter(config.rate_protected_per_min);

    // Every route below requires an AuthUser session
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(limiter)
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(web::resource("").route(web::get().to(attendance::list_attendance)))
                    .service(web::resource("/today").route(web::get().to(attendance::today)))
                    .service(web::resource("/punch-in").route(web::post().to(attendance::punch_in)))
                    .service(web::resource("/punch-out").route(web::post().to(attendance::punch_out)))
                    .service(web::resource("/pause").route(web::post().to(attendance::pause)))
                    .service(web::resource("/resume").route(web::post().to(attendance::resume)))
                    // /attendance/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(attendance::update_attendance))
                            .route(web::delete().to(attendance::delete_attendance)),
                    ),
            )
            .service(
                web::scope("/employee")
                    // /employee/{id}
                    .service(web::resource("/{id}").route(web::get().to(employee::get_employee)))
                    .service(
                        web::resource("/{id}/leave-eligibility")
                            .route(web::get().to(employee::leave_eligibility)),
                    ),
            )
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // /leave/{id}/approve, /leave/{id}/reject
                    .service(
                        web::resource("/{id}/{decision}")
                            .route(web::put().to(leave_request::decide_leave)),
                    ),
            )
            .service(
                web::scope("/payroll")
                    .service(web::resource("/earnings").route(web::get().to(payroll::earnings))),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limiter_builds_for_any_rate() {
        // zero and very high rates both fall back to a valid quota
        let _ = build_limiter(0);
        let _ = build_limiter(60);
        let _ = build_limiter(1_000_000);
    }
}
