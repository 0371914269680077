//! HTTP handlers and route configuration.

mod auth;
mod health;
mod pagination;
mod posts;
mod root;
mod users;

use actix_web::web;

/// Route names used for link generation.
pub(crate) const POST_LIST: &str = "post_list";
pub(crate) const POST_DETAIL: &str = "post_detail";
pub(crate) const USER_LIST: &str = "user_list";
pub(crate) const USER_DETAIL: &str = "user_detail";

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/", web::get().to(root::api_root))
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Posts
            .service(
                web::resource("/posts/")
                    .name(POST_LIST)
                    .route(web::get().to(posts::list_posts))
                    .route(web::post().to(posts::create_post)),
            )
            .service(
                web::resource("/posts/{id}/")
                    .name(POST_DETAIL)
                    .route(web::get().to(posts::get_post))
                    .route(web::put().to(posts::replace_post))
                    .route(web::patch().to(posts::update_post))
                    .route(web::delete().to(posts::delete_post)),
            )
            // Users (read-only)
            .service(
                web::resource("/users/")
                    .name(USER_LIST)
                    .route(web::get().to(users::list_users)),
            )
            .service(
                web::resource("/users/{id}/")
                    .name(USER_DETAIL)
                    .route(web::get().to(users::get_user)),
            ),
    );
}
