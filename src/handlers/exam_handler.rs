use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{require_admin, AuthenticatedUser},
    errors::AppError,
    middleware::get_request_id,
    models::dto::{
        request::{
            AddReviewRequest, CreateExamRequest, PaginationParams, SubmitScoreRequest,
            UpdateExamRequest,
        },
        response::DeleteExamResponse,
    },
};

#[get("/api/exams")]
pub async fn list_exams(
    state: web::Data<AppState>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    let page = state.exam_service.list_exams(&query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/api/exams/{id}")]
pub async fn get_exam(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let detail = state.exam_service.get_exam_detail(&id).await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[post("/api/exams")]
pub async fn create_exam(
    state: web::Data<AppState>,
    request: web::Json<CreateExamRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let exam = state
        .exam_service
        .create_exam(request.into_inner(), &auth.0.sub)
        .await?;
    Ok(HttpResponse::Created().json(exam))
}

#[put("/api/exams/{id}")]
pub async fn update_exam(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateExamRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let exam = state
        .exam_service
        .update_exam(&id, request.into_inner(), &auth.0.sub, auth.0.is_admin())
        .await?;
    Ok(HttpResponse::Ok().json(exam))
}

#[delete("/api/exams/{id}")]
pub async fn delete_exam(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state
        .exam_service
        .delete_exam(&id, &auth.0.sub, auth.0.is_admin())
        .await?;
    Ok(HttpResponse::Ok().json(DeleteExamResponse {
        message: "Exam deleted successfully".to_string(),
    }))
}

#[post("/api/exams/{id}/score")]
pub async fn submit_score(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubmitScoreRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    log::debug!(
        "[{}] score submission for exam '{}'",
        get_request_id(&req).unwrap_or_default(),
        id
    );

    let response = state
        .exam_service
        .submit_score(&id, &auth.0.sub, request.score, request.part_index)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/exams/{id}/can-review")]
pub async fn can_review(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state.exam_service.can_review(&id, &auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/api/exams/{id}/review")]
pub async fn add_review(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<AddReviewRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;
    log::debug!(
        "[{}] review submission for exam '{}'",
        get_request_id(&req).unwrap_or_default(),
        id
    );

    let exam = state
        .exam_service
        .add_review(&id, &auth.0.sub, request.rating, &request.comment)
        .await?;
    Ok(HttpResponse::Created().json(exam))
}

#[delete("/api/exams/{id}/review/{review_id}")]
pub async fn delete_review(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (exam_id, review_id) = path.into_inner();
    let exam = state
        .exam_service
        .delete_review(&exam_id, &review_id, &auth.0.sub, auth.0.is_admin())
        .await?;
    Ok(HttpResponse::Ok().json(exam))
}
