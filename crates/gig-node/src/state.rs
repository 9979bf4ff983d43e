//! Form state for the marketplace tabs.

use crate::api::{NewJobPost, NewUser, PaymentMethod, ProjectType};

pub const PROJECT_TYPES: &[&str] = &["Full-time", "Part-time", "Contract", "One-time"];
pub const PAYMENT_METHODS: &[&str] = &["Crypto", "Fiat", "Hybrid"];

#[derive(Debug)]
pub struct JobFormState {
    pub title: String,
    pub description: String,
    pub project_type: String,
    /// Comma-separated skill list as typed.
    pub skills: String,
    pub budget: String,
    pub payment_method: String,
}

impl Default for JobFormState {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            project_type: PROJECT_TYPES[0].to_owned(),
            skills: String::new(),
            budget: String::new(),
            payment_method: PAYMENT_METHODS[0].to_owned(),
        }
    }
}

impl JobFormState {
    pub fn validate(&self) -> Result<NewJobPost, String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Title is required".to_owned());
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err("Description is required".to_owned());
        }
        let project_type = ProjectType::from_label(&self.project_type)
            .ok_or_else(|| format!("Unknown project type: {}", self.project_type))?;
        let payment_method = PaymentMethod::from_label(&self.payment_method)
            .ok_or_else(|| format!("Unknown payment method: {}", self.payment_method))?;
        let skills: Vec<String> = self
            .skills
            .split(',')
            .map(str::trim)
            .filter(|skill| !skill.is_empty())
            .map(str::to_owned)
            .collect();
        if skills.is_empty() {
            return Err("At least one skill is required".to_owned());
        }
        let budget: f64 = self
            .budget
            .trim()
            .parse()
            .map_err(|_| "Budget must be a number".to_owned())?;
        if budget <= 0.0 {
            return Err("Budget must be positive".to_owned());
        }
        Ok(NewJobPost {
            title: title.to_owned(),
            description: description.to_owned(),
            project_type,
            skills,
            budget,
            payment_method,
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Default)]
pub struct SignupFormState {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupFormState {
    pub fn validate(&self) -> Result<NewUser, String> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err("Username is required".to_owned());
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err("Email is required".to_owned());
        }
        if !email.contains('@') {
            return Err("Email looks invalid".to_owned());
        }
        if self.password.is_empty() {
            return Err("Password is required".to_owned());
        }
        Ok(NewUser {
            username: username.to_owned(),
            email: email.to_owned(),
            password: self.password.clone(),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_form_requires_fields() {
        let form = JobFormState::default();
        assert!(form.validate().is_err());
    }

    #[test]
    fn job_form_parses_skills_and_budget() {
        let form = JobFormState {
            title: "Smart contract audit".into(),
            description: "Review staking contracts".into(),
            skills: " solidity , security,  ".into(),
            budget: "2500".into(),
            ..JobFormState::default()
        };
        let job = form.validate().expect("valid form");
        assert_eq!(job.skills, vec!["solidity", "security"]);
        assert_eq!(job.budget, 2500.0);
    }

    #[test]
    fn job_form_rejects_bad_budget() {
        let form = JobFormState {
            title: "t".into(),
            description: "d".into(),
            skills: "rust".into(),
            budget: "free".into(),
            ..JobFormState::default()
        };
        assert_eq!(form.validate().unwrap_err(), "Budget must be a number");

        let form = JobFormState {
            budget: "-5".into(),
            ..form
        };
        assert_eq!(form.validate().unwrap_err(), "Budget must be positive");
    }

    #[test]
    fn signup_form_checks_email_shape() {
        let form = SignupFormState {
            username: "ada".into(),
            email: "not-an-email".into(),
            password: "hunter2".into(),
        };
        assert_eq!(form.validate().unwrap_err(), "Email looks invalid");
    }
}
