//! Form submissions and the records they become.
//!
//! Each form has a raw `*Submission` type mirroring the JSON the client
//! posts (every field defaults, so a missing field is reported as a field
//! error rather than a parse failure), a validated `New*` value, and the
//! stored record.

use super::choices::{
    Challenge, Consultant, Funding, Industry, Stage, TeamShape, TeamSize, TimeSlot,
};
use super::ports::Record;
use super::validation::{Choice, Validator};
use crate::error::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

const NAME_LEN: RangeInclusive<usize> = 2..=100;
const LONG_TEXT_LEN: RangeInclusive<usize> = 10..=500;
const SUBJECT_LEN: RangeInclusive<usize> = 5..=150;
const MESSAGE_LEN: RangeInclusive<usize> = 10..=2000;
const CHALLENGE_COUNT: RangeInclusive<usize> = 1..=3;
const USERNAME_LEN: RangeInclusive<usize> = 3..=50;

/// A submission the intake accepts: validated into the `New` value of its record.
pub trait Submission: Send + 'static {
    type Record: Record;

    /// Payment the submission claims to belong to, checked against the store.
    fn payment_ref(&self) -> Option<u64> {
        None
    }

    fn validate(self) -> Result<<Self::Record as Record>::New>;
}

// ============================================================================
// SELF-EVALUATION
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelfEvaluationSubmission {
    pub founder_name: String,
    pub founder_email: String,
    pub startup_name: String,
    pub industry: String,
    pub business_description: String,
    pub stage: String,
    pub funding: String,
    pub team_size: String,
    pub challenges: Vec<String>,
    pub payment_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSelfEvaluation {
    pub founder_name: String,
    pub founder_email: String,
    pub startup_name: String,
    pub industry: Industry,
    pub business_description: String,
    pub stage: Stage,
    pub funding: Funding,
    pub team_size: TeamSize,
    pub challenges: Vec<Challenge>,
    pub payment_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfEvaluation {
    pub id: u64,
    pub founder_name: String,
    pub founder_email: String,
    pub startup_name: String,
    pub industry: Industry,
    pub business_description: String,
    pub stage: Stage,
    pub funding: Funding,
    pub team_size: TeamSize,
    /// Comma-joined challenge tags, e.g. `funding,product`.
    pub challenges: String,
    pub payment_id: Option<u64>,
    pub created_at: DateTime<Utc>,
}

impl SelfEvaluation {
    pub fn challenge_tags(&self) -> Vec<Challenge> {
        self.challenges
            .split(',')
            .filter_map(Challenge::parse)
            .collect()
    }
}

impl Submission for SelfEvaluationSubmission {
    type Record = SelfEvaluation;

    fn payment_ref(&self) -> Option<u64> {
        self.payment_id
    }

    fn validate(self) -> Result<NewSelfEvaluation> {
        let mut v = Validator::new();
        let founder_name = v.text("founderName", &self.founder_name, NAME_LEN);
        let founder_email = v.email("founderEmail", &self.founder_email);
        let startup_name = v.text("startupName", &self.startup_name, NAME_LEN);
        let industry = v.choice::<Industry>("industry", &self.industry);
        let business_description =
            v.text("businessDescription", &self.business_description, LONG_TEXT_LEN);
        let stage = v.choice::<Stage>("stage", &self.stage);
        let funding = v.choice::<Funding>("funding", &self.funding);
        let team_size = v.choice::<TeamSize>("teamSize", &self.team_size);
        let challenges = v.tags::<Challenge>("challenges", &self.challenges, CHALLENGE_COUNT);

        match (industry, stage, funding, team_size) {
            (Some(industry), Some(stage), Some(funding), Some(team_size)) if v.is_clean() => {
                Ok(NewSelfEvaluation {
                    founder_name,
                    founder_email,
                    startup_name,
                    industry,
                    business_description,
                    stage,
                    funding,
                    team_size,
                    challenges,
                    payment_id: self.payment_id,
                })
            }
            _ => Err(v.into_error()),
        }
    }
}

impl Record for SelfEvaluation {
    type New = NewSelfEvaluation;
    const COLLECTION: &'static str = "self_evaluations";

    fn assemble(id: u64, created_at: DateTime<Utc>, new: NewSelfEvaluation) -> Self {
        let challenges = new
            .challenges
            .iter()
            .map(Challenge::as_str)
            .collect::<Vec<_>>()
            .join(",");
        Self {
            id,
            founder_name: new.founder_name,
            founder_email: new.founder_email,
            startup_name: new.startup_name,
            industry: new.industry,
            business_description: new.business_description,
            stage: new.stage,
            funding: new.funding,
            team_size: new.team_size,
            challenges,
            payment_id: new.payment_id,
            created_at,
        }
    }

    fn id(&self) -> u64 {
        self.id
    }
}

// ============================================================================
// CONSULTATION
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsultationSubmission {
    pub name: String,
    pub email: String,
    pub consultant: String,
    pub date: String,
    pub time: String,
    pub topics: String,
    pub payment_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConsultation {
    pub name: String,
    pub email: String,
    pub consultant: Consultant,
    pub date: NaiveDate,
    pub time: TimeSlot,
    pub topics: String,
    pub payment_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub consultant: Consultant,
    pub date: NaiveDate,
    pub time: TimeSlot,
    pub topics: String,
    pub payment_id: Option<u64>,
    pub created_at: DateTime<Utc>,
}

impl Submission for ConsultationSubmission {
    type Record = Consultation;

    fn payment_ref(&self) -> Option<u64> {
        self.payment_id
    }

    fn validate(self) -> Result<NewConsultation> {
        let mut v = Validator::new();
        let name = v.text("name", &self.name, NAME_LEN);
        let email = v.email("email", &self.email);
        let consultant = v.choice::<Consultant>("consultant", &self.consultant);
        let date = v.date("date", &self.date);
        let time = v.choice::<TimeSlot>("time", &self.time);
        let topics = v.text("topics", &self.topics, LONG_TEXT_LEN);

        match (consultant, date, time) {
            (Some(consultant), Some(date), Some(time)) if v.is_clean() => Ok(NewConsultation {
                name,
                email,
                consultant,
                date,
                time,
                topics,
                payment_id: self.payment_id,
            }),
            _ => Err(v.into_error()),
        }
    }
}

impl Record for Consultation {
    type New = NewConsultation;
    const COLLECTION: &'static str = "consultations";

    fn assemble(id: u64, created_at: DateTime<Utc>, new: NewConsultation) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            consultant: new.consultant,
            date: new.date,
            time: new.time,
            topics: new.topics,
            payment_id: new.payment_id,
            created_at,
        }
    }

    fn id(&self) -> u64 {
        self.id
    }
}

// ============================================================================
// MENTORSHIP
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MentorshipSubmission {
    pub name: String,
    pub email: String,
    pub startup_name: String,
    pub industry: String,
    pub stage: String,
    pub team: String,
    pub goals: String,
    pub payment_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMentorship {
    pub name: String,
    pub email: String,
    pub startup_name: String,
    pub industry: Industry,
    pub stage: Stage,
    pub team: TeamShape,
    pub goals: String,
    pub payment_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mentorship {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub startup_name: String,
    pub industry: Industry,
    pub stage: Stage,
    pub team: TeamShape,
    pub goals: String,
    pub payment_id: Option<u64>,
    pub created_at: DateTime<Utc>,
}

impl Submission for MentorshipSubmission {
    type Record = Mentorship;

    fn payment_ref(&self) -> Option<u64> {
        self.payment_id
    }

    fn validate(self) -> Result<NewMentorship> {
        let mut v = Validator::new();
        let name = v.text("name", &self.name, NAME_LEN);
        let email = v.email("email", &self.email);
        let startup_name = v.text("startupName", &self.startup_name, NAME_LEN);
        let industry = v.choice::<Industry>("industry", &self.industry);
        let stage = v.choice::<Stage>("stage", &self.stage);
        let team = v.choice::<TeamShape>("team", &self.team);
        let goals = v.text("goals", &self.goals, LONG_TEXT_LEN);

        match (industry, stage, team) {
            (Some(industry), Some(stage), Some(team)) if v.is_clean() => Ok(NewMentorship {
                name,
                email,
                startup_name,
                industry,
                stage,
                team,
                goals,
                payment_id: self.payment_id,
            }),
            _ => Err(v.into_error()),
        }
    }
}

impl Record for Mentorship {
    type New = NewMentorship;
    const COLLECTION: &'static str = "mentorships";

    fn assemble(id: u64, created_at: DateTime<Utc>, new: NewMentorship) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            startup_name: new.startup_name,
            industry: new.industry,
            stage: new.stage,
            team: new.team,
            goals: new.goals,
            payment_id: new.payment_id,
            created_at,
        }
    }

    fn id(&self) -> u64 {
        self.id
    }
}

// ============================================================================
// CONTACT
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Submission for ContactSubmission {
    type Record = Contact;

    fn validate(self) -> Result<NewContact> {
        let mut v = Validator::new();
        let name = v.text("name", &self.name, NAME_LEN);
        let email = v.email("email", &self.email);
        let subject = v.text("subject", &self.subject, SUBJECT_LEN);
        let message = v.text("message", &self.message, MESSAGE_LEN);

        if v.is_clean() {
            Ok(NewContact {
                name,
                email,
                subject,
                message,
            })
        } else {
            Err(v.into_error())
        }
    }
}

impl Record for Contact {
    type New = NewContact;
    const COLLECTION: &'static str = "contacts";

    fn assemble(id: u64, created_at: DateTime<Utc>, new: NewContact) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            subject: new.subject,
            message: new.message,
            created_at,
        }
    }

    fn id(&self) -> u64 {
        self.id
    }
}

// ============================================================================
// USER
// ============================================================================

/// Opaque password string.
///
/// Stored exactly as received; hashing is not implemented. `Debug` is redacted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserSubmission {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: Password,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub username: String,
    pub password: Password,
    pub created_at: DateTime<Utc>,
}

impl Submission for UserSubmission {
    type Record = User;

    fn validate(self) -> Result<NewUser> {
        let mut v = Validator::new();
        let username = v.text("username", &self.username, USERNAME_LEN);
        if self.password.is_empty() {
            v.fail("password", "is required");
        }

        if v.is_clean() {
            Ok(NewUser {
                username,
                password: Password::new(self.password),
            })
        } else {
            Err(v.into_error())
        }
    }
}

impl Record for User {
    type New = NewUser;
    const COLLECTION: &'static str = "users";

    fn assemble(id: u64, created_at: DateTime<Utc>, new: NewUser) -> Self {
        Self {
            id,
            username: new.username,
            password: new.password,
            created_at,
        }
    }

    fn id(&self) -> u64 {
        self.id
    }

    const UNIQUE_KEY: bool = true;

    fn lookup_key(&self) -> Option<&str> {
        Some(&self.username)
    }
}
