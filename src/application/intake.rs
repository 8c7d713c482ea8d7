use crate::domain::ports::{Record, SharedRepository};
use crate::domain::submission::{
    Consultation, ConsultationSubmission, Contact, ContactSubmission, Mentorship,
    MentorshipSubmission, SelfEvaluation, SelfEvaluationSubmission, Submission, User,
    UserSubmission,
};
use crate::error::{PulseError, Result};
use crate::infrastructure::Stores;
use tracing::{debug, info};

/// Validates form submissions and persists the ones that pass.
///
/// A submission is either stored whole or not at all: validation and the
/// payment reference check both run before the record is created.
#[derive(Clone)]
pub struct IntakeService {
    stores: Stores,
}

impl IntakeService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    async fn intake<S: Submission>(
        &self,
        repo: &SharedRepository<S::Record>,
        submission: S,
    ) -> Result<S::Record> {
        let collection = <S::Record as Record>::COLLECTION;
        let payment_ref = submission.payment_ref();
        let new = submission.validate().inspect_err(|err| {
            debug!(collection, %err, "submission rejected");
        })?;

        if let Some(payment_id) = payment_ref
            && self.stores.payments.get(payment_id).await?.is_none()
        {
            return Err(PulseError::invalid(
                "paymentId",
                format!("payment {payment_id} does not exist"),
            ));
        }

        let record = repo.create(new).await?;
        info!(
            collection,
            id = record.id(),
            payment_id = ?payment_ref,
            "submission stored"
        );
        Ok(record)
    }

    pub async fn submit_contact(&self, submission: ContactSubmission) -> Result<Contact> {
        self.intake(&self.stores.contacts, submission).await
    }

    pub async fn submit_self_evaluation(
        &self,
        submission: SelfEvaluationSubmission,
    ) -> Result<SelfEvaluation> {
        self.intake(&self.stores.self_evaluations, submission).await
    }

    pub async fn book_consultation(
        &self,
        submission: ConsultationSubmission,
    ) -> Result<Consultation> {
        self.intake(&self.stores.consultations, submission).await
    }

    pub async fn enroll_mentorship(&self, submission: MentorshipSubmission) -> Result<Mentorship> {
        self.intake(&self.stores.mentorships, submission).await
    }

    /// Stores a new user. A taken username is a conflict.
    pub async fn register_user(&self, submission: UserSubmission) -> Result<User> {
        self.intake(&self.stores.users, submission).await
    }

    pub async fn user(&self, id: u64) -> Result<Option<User>> {
        self.stores.users.get(id).await
    }

    pub async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.stores.users.find_by_key(username).await
    }
}
