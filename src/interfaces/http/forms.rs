use super::AppState;
use super::dto::{ConsultationCreated, ContactCreated, EvaluationCreated, MentorshipCreated};
use super::error::json_body;
use crate::domain::submission::{
    ConsultationSubmission, ContactSubmission, MentorshipSubmission, SelfEvaluationSubmission,
};
use crate::error::Result;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;

type Body<T> = std::result::Result<Json<T>, JsonRejection>;

pub async fn contact(
    State(state): State<AppState>,
    payload: Body<ContactSubmission>,
) -> Result<(StatusCode, Json<ContactCreated>)> {
    let contact = state.intake.submit_contact(json_body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(ContactCreated::new(contact.id))))
}

pub async fn self_evaluation(
    State(state): State<AppState>,
    payload: Body<SelfEvaluationSubmission>,
) -> Result<(StatusCode, Json<EvaluationCreated>)> {
    let evaluation = state
        .intake
        .submit_self_evaluation(json_body(payload)?)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(EvaluationCreated {
            success: true,
            evaluation_id: evaluation.id,
        }),
    ))
}

pub async fn book_consultation(
    State(state): State<AppState>,
    payload: Body<ConsultationSubmission>,
) -> Result<(StatusCode, Json<ConsultationCreated>)> {
    let consultation = state.intake.book_consultation(json_body(payload)?).await?;
    Ok((
        StatusCode::CREATED,
        Json(ConsultationCreated {
            success: true,
            consultation_id: consultation.id,
        }),
    ))
}

pub async fn mentorship_enrollment(
    State(state): State<AppState>,
    payload: Body<MentorshipSubmission>,
) -> Result<(StatusCode, Json<MentorshipCreated>)> {
    let mentorship = state.intake.enroll_mentorship(json_body(payload)?).await?;
    Ok((
        StatusCode::CREATED,
        Json(MentorshipCreated {
            success: true,
            mentorship_id: mentorship.id,
        }),
    ))
}
