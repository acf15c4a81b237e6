use async_graphql::{
    Context, EmptySubscription, ErrorExtensions, Object, Result, Schema as GraphQLSchema, ID,
};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{extract_claims_from_context, require_admin},
    errors::AppResult,
    models::dto::{
        request::{AddReviewRequest, CreateExamRequest, PaginationParams, SubmitScoreRequest},
        response::{
            CanReviewResponse, DeleteExamResponse, ExamDetailDto, ExamDto, PaginatedExams,
            SubmitScoreResponse,
        },
    },
};

pub type Schema = GraphQLSchema<QueryRoot, MutationRoot, EmptySubscription>;

// Service errors become GraphQL errors carrying an `extensions.code`.
fn gql<T>(result: AppResult<T>) -> Result<T> {
    result.map_err(|e| e.extend())
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn exam(&self, ctx: &Context<'_>, id: ID) -> Result<ExamDetailDto> {
        let state = ctx.data::<AppState>()?;
        gql(extract_claims_from_context(ctx))?;

        gql(state.exam_service.get_exam_detail(&id).await)
    }

    async fn exams(
        &self,
        ctx: &Context<'_>,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> Result<PaginatedExams> {
        let state = ctx.data::<AppState>()?;
        let pagination = PaginationParams { offset, limit };

        gql(state.exam_service.list_exams(&pagination).await)
    }

    async fn can_review(&self, ctx: &Context<'_>, exam_id: ID) -> Result<CanReviewResponse> {
        let state = ctx.data::<AppState>()?;
        let claims = gql(extract_claims_from_context(ctx))?;

        gql(state.exam_service.can_review(&exam_id, &claims.sub).await)
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn submit_score(
        &self,
        ctx: &Context<'_>,
        exam_id: ID,
        input: SubmitScoreRequest,
    ) -> Result<SubmitScoreResponse> {
        let state = ctx.data::<AppState>()?;
        let claims = gql(extract_claims_from_context(ctx))?;

        gql(state
            .exam_service
            .submit_score(&exam_id, &claims.sub, input.score, input.part_index)
            .await)
    }

    async fn add_review(
        &self,
        ctx: &Context<'_>,
        exam_id: ID,
        input: AddReviewRequest,
    ) -> Result<ExamDto> {
        let state = ctx.data::<AppState>()?;
        let claims = gql(extract_claims_from_context(ctx))?;
        gql(input.validate().map_err(Into::into))?;

        gql(state
            .exam_service
            .add_review(&exam_id, &claims.sub, input.rating, &input.comment)
            .await)
    }

    async fn delete_review(
        &self,
        ctx: &Context<'_>,
        exam_id: ID,
        review_id: ID,
    ) -> Result<ExamDto> {
        let state = ctx.data::<AppState>()?;
        let claims = gql(extract_claims_from_context(ctx))?;

        gql(state
            .exam_service
            .delete_review(&exam_id, &review_id, &claims.sub, claims.is_admin())
            .await)
    }

    async fn create_exam(&self, ctx: &Context<'_>, input: CreateExamRequest) -> Result<ExamDto> {
        let state = ctx.data::<AppState>()?;
        let claims = gql(extract_claims_from_context(ctx))?;
        gql(require_admin(&claims))?;

        gql(state.exam_service.create_exam(input, &claims.sub).await)
    }

    async fn delete_exam(&self, ctx: &Context<'_>, id: ID) -> Result<DeleteExamResponse> {
        let state = ctx.data::<AppState>()?;
        let claims = gql(extract_claims_from_context(ctx))?;

        gql(state
            .exam_service
            .delete_exam(&id, &claims.sub, claims.is_admin())
            .await)?;
        Ok(DeleteExamResponse {
            message: "Exam deleted successfully".to_string(),
        })
    }
}

pub fn create_schema(app_state: AppState) -> Schema {
    GraphQLSchema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(app_state)
        .finish()
}
