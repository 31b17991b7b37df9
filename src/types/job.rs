// src/types/job.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HireError, HireResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RemotePolicy {
    Remote,
    Hybrid,
    Onsite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum ContractType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Seniority {
    Junior,
    Mid,
    Senior,
    Lead,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: i64,
    pub company_id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub remote_policy: RemotePolicy,
    pub contract_type: ContractType,
    pub salary_min: i64,
    pub salary_max: i64,
    pub salary_currency: String,
    #[sqlx(json)]
    pub required_skills: Vec<String>,
    #[sqlx(json)]
    pub nice_to_have_skills: Vec<String>,
    pub seniority: Seniority,
    pub experience_years_min: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Posting context shown next to a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobSummary {
    pub id: i64,
    pub title: String,
    pub location: String,
    pub salary_min: i64,
    pub salary_max: i64,
}

/// Skills may be sent as a JSON list or as the comma separated text of a form field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillList {
    List(Vec<String>),
    Text(String),
}

impl Default for SkillList {
    fn default() -> Self {
        SkillList::List(Vec::new())
    }
}

impl SkillList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            SkillList::List(items) => crate::utils::clean_list(items),
            SkillList::Text(text) => crate::utils::parse_skills(&text),
        }
    }
}

/// Payload of the create and edit forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInput {
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(default = "default_remote_policy")]
    pub remote_policy: RemotePolicy,
    #[serde(default = "default_contract_type")]
    pub contract_type: ContractType,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    #[serde(default = "default_currency")]
    pub salary_currency: String,
    #[serde(default)]
    pub required_skills: SkillList,
    #[serde(default)]
    pub nice_to_have_skills: SkillList,
    #[serde(default = "default_seniority")]
    pub seniority: Seniority,
    #[serde(default)]
    pub experience_years_min: Option<i64>,
}

fn default_remote_policy() -> RemotePolicy {
    RemotePolicy::Hybrid
}

fn default_contract_type() -> ContractType {
    ContractType::FullTime
}

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_seniority() -> Seniority {
    Seniority::Mid
}

/// A posting after validation, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidJob {
    pub title: String,
    pub description: String,
    pub location: String,
    pub remote_policy: RemotePolicy,
    pub contract_type: ContractType,
    pub salary_min: i64,
    pub salary_max: i64,
    pub salary_currency: String,
    pub required_skills: Vec<String>,
    pub nice_to_have_skills: Vec<String>,
    pub seniority: Seniority,
    pub experience_years_min: Option<i64>,
}

pub const SALARY_FLOOR: i64 = 10_000;
pub const SALARY_CEILING: i64 = 500_000;

impl JobInput {
    /// Apply the posting form rules, collecting every field error.
    pub fn validate(self) -> HireResult<ValidJob> {
        let mut errors: Vec<String> = Vec::new();

        let title = self.title.trim().to_string();
        let description = self.description.trim().to_string();
        let location = self.location.trim().to_string();
        let required_skills = self.required_skills.into_vec();
        let nice_to_have_skills = self.nice_to_have_skills.into_vec();

        if title.is_empty() {
            errors.push("title: Title is required".to_string());
        }
        if description.is_empty() {
            errors.push("description: Description is required".to_string());
        }
        if location.is_empty() {
            errors.push("location: Location is required".to_string());
        }
        if self.salary_min.is_none() {
            errors.push("salary_min: Minimum salary is required".to_string());
        }
        if self.salary_max.is_none() {
            errors.push("salary_max: Maximum salary is required".to_string());
        }
        if required_skills.is_empty() {
            errors.push("required_skills: At least one required skill".to_string());
        }

        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min >= max {
                errors.push(
                    "salary_max: Maximum salary must be greater than the minimum".to_string(),
                );
            }
            if min < SALARY_FLOOR || max > SALARY_CEILING {
                errors.push(format!(
                    "salary_min: Salary range must lie between {} and {}",
                    SALARY_FLOOR, SALARY_CEILING
                ));
            }
        }

        if matches!(self.experience_years_min, Some(years) if years < 0) {
            errors.push("experience_years_min: Must not be negative".to_string());
        }

        let salary_currency = self.salary_currency.trim().to_uppercase();
        if salary_currency.len() != 3 {
            errors.push("salary_currency: Use a three letter currency code".to_string());
        }

        if !errors.is_empty() {
            return Err(HireError::validation(errors.join("; ")));
        }

        Ok(ValidJob {
            title,
            description,
            location,
            remote_policy: self.remote_policy,
            contract_type: self.contract_type,
            salary_min: self.salary_min.unwrap_or_default(),
            salary_max: self.salary_max.unwrap_or_default(),
            salary_currency,
            required_skills,
            nice_to_have_skills,
            seniority: self.seniority,
            experience_years_min: self.experience_years_min,
        })
    }
}
