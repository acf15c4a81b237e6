pub mod exam_handler;
pub mod graphql_handler;
pub mod health_handler;

use actix_web::web;

pub use exam_handler::{
    add_review, can_review, create_exam, delete_exam, delete_review, get_exam, list_exams,
    submit_score, update_exam,
};
pub use graphql_handler::{graphiql, graphql};
pub use health_handler::{health_check, health_check_ready};

/// Registers every route. Expects `AppState`, `JwtService` and the GraphQL
/// `Schema` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_ready)
        .service(list_exams)
        .service(create_exam)
        .service(get_exam)
        .service(update_exam)
        .service(delete_exam)
        .service(submit_score)
        .service(can_review)
        .service(add_review)
        .service(delete_review)
        .service(graphql)
        .service(graphiql);
}
