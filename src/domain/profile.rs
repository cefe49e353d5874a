//! Candidate profile: personal details, list sections and job preferences.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::jobs::JobType;
use super::{FieldIssue, check_url, split_list};
use crate::editor::{FieldError, ListEditor, Record, RequiredFields};

// ─────────────────────────────────────────────────────────────────────────────
// Field parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse a form boolean. Checkbox and select values are both accepted.
pub fn parse_bool(field: &str, value: &str) -> Result<bool, FieldError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" | "" => Ok(false),
        _ => Err(FieldError::invalid(field, "expected true or false")),
    }
}

/// Parse an optional value; a blank input clears it.
pub fn parse_opt<T: FromStr>(field: &str, value: &str, expected: &str) -> Result<Option<T>, FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| FieldError::invalid(field, format!("expected {expected}")))
}

/// Parse an optional `YYYY-MM-DD` date.
pub fn parse_date(field: &str, value: &str) -> Result<Option<NaiveDate>, FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| FieldError::invalid(field, "expected a date as YYYY-MM-DD"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Personal info
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub phone: String,
    pub location: String,
    pub linkedin_url: String,
    pub github_url: String,
    pub portfolio_url: String,
}

impl PersonalInfo {
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        let slot = match field {
            "phone" => &mut self.phone,
            "location" => &mut self.location,
            "linkedin_url" => &mut self.linkedin_url,
            "github_url" => &mut self.github_url,
            "portfolio_url" => &mut self.portfolio_url,
            other => return Err(FieldError::UnknownField(other.to_string())),
        };
        *slot = value.trim().to_string();
        Ok(())
    }

    fn validate(&self, issues: &mut Vec<FieldIssue>) {
        check_url("personal.linkedin_url", &self.linkedin_url, issues);
        check_url("personal.github_url", &self.github_url, issues);
        check_url("personal.portfolio_url", &self.portfolio_url, issues);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Education
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Degree {
    #[default]
    Btech,
    Mtech,
    Bca,
    Mca,
    Bsc,
    Msc,
    Other,
}

impl Degree {
    pub const ALL: [Degree; 7] = [
        Degree::Btech,
        Degree::Mtech,
        Degree::Bca,
        Degree::Mca,
        Degree::Bsc,
        Degree::Msc,
        Degree::Other,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Btech => "btech",
            Self::Mtech => "mtech",
            Self::Bca => "bca",
            Self::Mca => "mca",
            Self::Bsc => "bsc",
            Self::Msc => "msc",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Btech => "B.Tech",
            Self::Mtech => "M.Tech",
            Self::Bca => "BCA",
            Self::Mca => "MCA",
            Self::Bsc => "B.Sc",
            Self::Msc => "M.Sc",
            Self::Other => "Other",
        }
    }
}

impl FromStr for Degree {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s.trim().to_lowercase())
            .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub degree: Degree,
    #[serde(default)]
    pub field_of_study: String,
    #[serde(default)]
    pub start_year: Option<i32>,
    #[serde(default)]
    pub end_year: Option<i32>,
    #[serde(default)]
    pub cgpa: Option<f32>,
    #[serde(default)]
    pub percentage: Option<f32>,
}

impl Record for Education {
    fn id(&self) -> &str {
        &self.id
    }

    fn blank(id: String) -> Self {
        Self {
            id,
            institution: String::new(),
            degree: Degree::Btech,
            field_of_study: String::new(),
            start_year: None,
            end_year: None,
            cgpa: None,
            percentage: None,
        }
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "institution" => self.institution = value.to_string(),
            "degree" => {
                self.degree = value
                    .parse()
                    .map_err(|()| FieldError::invalid(field, "unknown degree"))?;
            }
            "field_of_study" => self.field_of_study = value.to_string(),
            "start_year" => self.start_year = parse_opt(field, value, "a year")?,
            "end_year" => self.end_year = parse_opt(field, value, "a year")?,
            "cgpa" => {
                let cgpa: Option<f32> = parse_opt(field, value, "a number")?;
                if cgpa.is_some_and(|c| !(0.0..=10.0).contains(&c)) {
                    return Err(FieldError::invalid(field, "must be between 0 and 10"));
                }
                self.cgpa = cgpa;
            }
            "percentage" => {
                let pct: Option<f32> = parse_opt(field, value, "a number")?;
                if pct.is_some_and(|p| !(0.0..=100.0).contains(&p)) {
                    return Err(FieldError::invalid(field, "must be between 0 and 100"));
                }
                self.percentage = pct;
            }
            other => return Err(FieldError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Experience
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
}

impl Record for Experience {
    fn id(&self) -> &str {
        &self.id
    }

    fn blank(id: String) -> Self {
        Self {
            id,
            company: String::new(),
            position: String::new(),
            start_date: None,
            end_date: None,
            is_current: false,
            description: String::new(),
            location: String::new(),
        }
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "company" => self.company = value.to_string(),
            "position" => self.position = value.to_string(),
            "start_date" => self.start_date = parse_date(field, value)?,
            "end_date" => self.end_date = parse_date(field, value)?,
            "is_current" => {
                self.is_current = parse_bool(field, value)?;
                if self.is_current {
                    self.end_date = None;
                }
            }
            "description" => self.description = value.to_string(),
            "location" => self.location = value.to_string(),
            other => return Err(FieldError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Projects
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Comma separated.
    #[serde(default)]
    pub technologies: String,
    #[serde(default)]
    pub github_url: String,
    #[serde(default)]
    pub live_url: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_ongoing: bool,
}

impl Project {
    #[must_use]
    pub fn technologies_list(&self) -> Vec<String> {
        split_list(&self.technologies)
    }
}

impl Record for Project {
    fn id(&self) -> &str {
        &self.id
    }

    fn blank(id: String) -> Self {
        Self {
            id,
            title: String::new(),
            description: String::new(),
            technologies: String::new(),
            github_url: String::new(),
            live_url: String::new(),
            start_date: None,
            end_date: None,
            is_ongoing: false,
        }
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "title" => self.title = value.to_string(),
            "description" => self.description = value.to_string(),
            "technologies" => self.technologies = value.to_string(),
            "github_url" => self.github_url = value.trim().to_string(),
            "live_url" => self.live_url = value.trim().to_string(),
            "start_date" => self.start_date = parse_date(field, value)?,
            "end_date" => self.end_date = parse_date(field, value)?,
            "is_ongoing" => {
                self.is_ongoing = parse_bool(field, value)?;
                if self.is_ongoing {
                    self.end_date = None;
                }
            }
            other => return Err(FieldError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Skills
// ─────────────────────────────────────────────────────────────────────────────

pub const SKILL_CATEGORIES: [&str; 6] = ["Programming", "Framework", "Database", "Tool", "Cloud", "Other"];

pub const POPULAR_SKILLS: [&str; 22] = [
    "JavaScript", "Python", "Java", "React", "Node.js", "HTML/CSS",
    "TypeScript", "MongoDB", "MySQL", "Git", "AWS", "Docker",
    "Express.js", "Django", "Spring Boot", "PostgreSQL", "Redis",
    "GraphQL", "REST API", "Linux", "Kubernetes", "Firebase",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 4] = [
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
        SkillLevel::Expert,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        };
        f.write_str(label)
    }
}

impl FromStr for SkillLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == s.trim().to_lowercase())
            .ok_or(())
    }
}

fn default_category() -> String {
    SKILL_CATEGORIES[0].to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub level: SkillLevel,
    #[serde(default = "default_category")]
    pub category: String,
}

impl Record for Skill {
    fn id(&self) -> &str {
        &self.id
    }

    fn blank(id: String) -> Self {
        Self {
            id,
            name: String::new(),
            level: SkillLevel::Intermediate,
            category: default_category(),
        }
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "name" => {
                let name = value.trim();
                if name.is_empty() {
                    return Err(FieldError::invalid(field, "skill name cannot be blank"));
                }
                self.name = name.to_string();
            }
            "level" => {
                self.level = value
                    .parse()
                    .map_err(|()| FieldError::invalid(field, "unknown skill level"))?;
            }
            "category" => {
                let category = SKILL_CATEGORIES
                    .iter()
                    .find(|c| c.eq_ignore_ascii_case(value.trim()))
                    .ok_or_else(|| FieldError::invalid(field, "unknown skill category"))?;
                self.category = (*category).to_string();
            }
            other => return Err(FieldError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

/// Values for a new skill before it joins the list.
#[derive(Debug, Clone, Deserialize)]
pub struct SkillDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub level: SkillLevel,
    #[serde(default = "default_category")]
    pub category: String,
}

impl Default for SkillDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            level: SkillLevel::Intermediate,
            category: default_category(),
        }
    }
}

/// Add a skill unless its name is blank or already listed (case-insensitive).
///
/// Returns the new record's identifier when one was added.
pub fn add_skill(skills: &mut ListEditor<Skill>, draft: &SkillDraft) -> Result<Option<String>, FieldError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(FieldError::invalid("name", "skill name cannot be blank"));
    }
    if skills.iter().any(|s| s.name.eq_ignore_ascii_case(name)) {
        return Ok(None);
    }
    let mut staged = Skill::blank(String::new());
    staged.set_field("name", name)?;
    staged.set_field("category", &draft.category)?;
    staged.level = draft.level;
    Ok(Some(skills.push_with(|skill| *skill = staged)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Job preferences
// ─────────────────────────────────────────────────────────────────────────────

pub const POPULAR_ROLES: [&str; 12] = [
    "Software Developer", "Frontend Developer", "Backend Developer", "Full Stack Developer",
    "Data Scientist", "Machine Learning Engineer", "DevOps Engineer", "Product Manager",
    "UI/UX Designer", "Quality Assurance", "Business Analyst", "Cybersecurity Analyst",
];

pub const POPULAR_LOCATIONS: [&str; 11] = [
    "Bangalore", "Mumbai", "Delhi", "Hyderabad", "Chennai", "Pune",
    "Kolkata", "Ahmedabad", "Gurgaon", "Noida", "Remote",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPreferences {
    /// Comma separated.
    pub preferred_roles: String,
    /// Comma separated.
    pub preferred_locations: String,
    pub job_types: Vec<JobType>,
    pub min_salary: Option<u32>,
    pub max_salary: Option<u32>,
    pub remote_work: bool,
    pub willing_to_relocate: bool,
}

impl Default for JobPreferences {
    fn default() -> Self {
        Self {
            preferred_roles: String::new(),
            preferred_locations: String::new(),
            job_types: vec![JobType::Internship, JobType::FullTime],
            min_salary: None,
            max_salary: None,
            remote_work: true,
            willing_to_relocate: true,
        }
    }
}

/// Append `entry` to a comma separated list unless already present.
fn append_unique(list: &mut String, entry: &str) -> bool {
    let entry = entry.trim();
    let mut entries = split_list(list);
    if entry.is_empty() || entries.iter().any(|e| e == entry) {
        return false;
    }
    entries.push(entry.to_string());
    *list = entries.join(", ");
    true
}

impl JobPreferences {
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "preferred_roles" => self.preferred_roles = value.to_string(),
            "preferred_locations" => self.preferred_locations = value.to_string(),
            "min_salary" => self.min_salary = parse_opt(field, value, "a whole number")?,
            "max_salary" => self.max_salary = parse_opt(field, value, "a whole number")?,
            "remote_work" => self.remote_work = parse_bool(field, value)?,
            "willing_to_relocate" => self.willing_to_relocate = parse_bool(field, value)?,
            other => return Err(FieldError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    /// Check or uncheck a job type.
    pub fn toggle_job_type(&mut self, job_type: JobType) {
        if let Some(idx) = self.job_types.iter().position(|t| *t == job_type) {
            self.job_types.remove(idx);
        } else {
            self.job_types.push(job_type);
        }
    }

    pub fn add_role(&mut self, role: &str) -> bool {
        append_unique(&mut self.preferred_roles, role)
    }

    pub fn add_location(&mut self, location: &str) -> bool {
        append_unique(&mut self.preferred_locations, location)
    }

    fn validate(&self, issues: &mut Vec<FieldIssue>) {
        if let (Some(min), Some(max)) = (self.min_salary, self.max_salary) {
            if min > max {
                issues.push(FieldIssue::new(
                    "preferences.min_salary",
                    "minimum salary cannot exceed maximum salary",
                ));
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Profile
// ─────────────────────────────────────────────────────────────────────────────

/// The list sections of a profile, addressed by name in URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSection {
    Education,
    Experience,
    Projects,
    Skills,
}

impl ProfileSection {
    pub const ALL: [ProfileSection; 4] = [
        ProfileSection::Education,
        ProfileSection::Experience,
        ProfileSection::Projects,
        ProfileSection::Skills,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Education => "education",
            Self::Experience => "experience",
            Self::Projects => "projects",
            Self::Skills => "skills",
        }
    }
}

impl FromStr for ProfileSection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|p| p.as_str() == s).ok_or(())
    }
}

impl fmt::Display for ProfileSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub personal: PersonalInfo,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub skills: Vec<Skill>,
    pub preferences: JobPreferences,
    pub updated_at: Option<DateTime<Utc>>,
}

fn push_missing(missing: &mut Vec<&'static str>, name: &'static str, blank: bool) {
    if blank && !missing.contains(&name) {
        missing.push(name);
    }
}

impl RequiredFields for Profile {
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for edu in &self.education {
            push_missing(&mut missing, "education.institution", edu.institution.trim().is_empty());
            push_missing(&mut missing, "education.field_of_study", edu.field_of_study.trim().is_empty());
            push_missing(&mut missing, "education.start_year", edu.start_year.is_none());
            push_missing(&mut missing, "education.end_year", edu.end_year.is_none());
        }
        for exp in &self.experience {
            push_missing(&mut missing, "experience.company", exp.company.trim().is_empty());
            push_missing(&mut missing, "experience.position", exp.position.trim().is_empty());
            push_missing(&mut missing, "experience.start_date", exp.start_date.is_none());
            push_missing(&mut missing, "experience.description", exp.description.trim().is_empty());
        }
        for project in &self.projects {
            push_missing(&mut missing, "projects.title", project.title.trim().is_empty());
            push_missing(&mut missing, "projects.description", project.description.trim().is_empty());
            push_missing(&mut missing, "projects.technologies", project.technologies.trim().is_empty());
            push_missing(&mut missing, "projects.start_date", project.start_date.is_none());
        }
        for skill in &self.skills {
            push_missing(&mut missing, "skills.name", skill.name.trim().is_empty());
        }
        let prefs = &self.preferences;
        push_missing(&mut missing, "preferences.preferred_roles", prefs.preferred_roles.trim().is_empty());
        push_missing(&mut missing, "preferences.preferred_locations", prefs.preferred_locations.trim().is_empty());
        push_missing(&mut missing, "preferences.job_types", prefs.job_types.is_empty());
        missing
    }
}

impl Profile {
    /// Format rules checked on every save.
    #[must_use]
    pub fn validate(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        self.personal.validate(&mut issues);
        for edu in &self.education {
            if let (Some(start), Some(end)) = (edu.start_year, edu.end_year) {
                if end < start {
                    issues.push(FieldIssue::new(
                        format!("education.{}.end_year", edu.id),
                        "end year is before start year",
                    ));
                }
            }
        }
        for project in &self.projects {
            check_url(&format!("projects.{}.github_url", project.id), &project.github_url, &mut issues);
            check_url(&format!("projects.{}.live_url", project.id), &project.live_url, &mut issues);
        }
        self.preferences.validate(&mut issues);
        issues
    }

    /// Rough completeness percentage shown on the dashboard.
    #[must_use]
    pub fn completion(&self) -> u8 {
        let checks = [
            !self.personal.phone.is_empty(),
            !self.personal.location.is_empty(),
            !self.education.is_empty(),
            !self.experience.is_empty() || !self.projects.is_empty(),
            !self.skills.is_empty(),
            !self.preferences.preferred_roles.is_empty(),
        ];
        let done = checks.iter().filter(|c| **c).count();
        u8::try_from(done * 100 / checks.len()).unwrap_or(100)
    }
}
