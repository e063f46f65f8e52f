use actix_web::web;

use crate::handlers::{
    contact::{method_not_allowed, submit_contact},
    home::home,
    json_error::JsonError,
    system::health_check,
};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default().error_handler(|err, _req| JsonError::from(err).into()),
    );

    cfg.service(home);
    cfg.service(health_check);

    cfg.service(
        web::scope("/api").service(
            web::resource("/contact")
                .route(web::post().to(submit_contact))
                .default_service(web::route().to(method_not_allowed)),
        ),
    );
}
