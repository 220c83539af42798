use crate::{
    api::{commit, comparison, import, suspect},
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("limiter period and burst are non-zero");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(build_limiter(config.rate_protected_per_min)) // rate limiting
            .configure(api_routes),
    );
}

/// Everything under the API prefix. Callers wrap it with authentication.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/import")
            // /import
            .service(
                web::resource("")
                    .route(web::put().to(import::load_import))
                    .route(web::get().to(import::import_status)),
            ),
    )
    .service(
        web::scope("/reconcile")
            // /reconcile/{employee}
            .service(web::resource("/{employee}").route(web::get().to(comparison::get_comparison)))
            // /reconcile/{employee}/commit
            .service(web::resource("/{employee}/commit").route(web::post().to(commit::commit)))
            // /reconcile/{employee}/delete
            .service(web::resource("/{employee}/delete").route(web::post().to(commit::delete))),
    )
    .service(
        web::scope("/suspect")
            // /suspect
            .service(web::resource("").route(web::get().to(suspect::counts)))
            // /suspect/{employee}
            .service(web::resource("/{employee}").route(web::get().to(suspect::list)))
            // /suspect/{employee}/{date}, date may contain slashes
            .service(
                web::resource("/{employee}/{date:.+}")
                    .route(web::put().to(suspect::add))
                    .route(web::delete().to(suspect::remove)),
            ),
    );
}
